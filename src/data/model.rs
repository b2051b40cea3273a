use std::collections::{BTreeSet, HashMap};
use std::fmt;

/// Column holding the file a row was loaded from.
pub const SOURCE_FILE_COLUMN: &str = "__source_file";
/// Column holding the group label (country) of a row.
pub const COUNTRY_COLUMN: &str = "country";

// ---------------------------------------------------------------------------
// CellValue – a single cell of a table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell mirroring the dtypes a CSV reader infers.
/// Kept `Ord` so unique values can live in a `BTreeSet`.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

// -- Manual Eq/Ord so we can put CellValue in BTreeSet --

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use CellValue::*;
        fn discriminant(v: &CellValue) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                String(_) => 4,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (String(a), String(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl std::hash::Hash for CellValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::String(s) => s.hash(state),
            CellValue::Integer(i) => i.hash(state),
            CellValue::Float(f) => f.to_bits().hash(state),
            CellValue::Bool(b) => b.hash(state),
            CellValue::Null => {}
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v:.4}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl CellValue {
    /// Guess the type of a raw CSV field.
    ///
    /// Surrounding whitespace is ignored when reading numbers and booleans;
    /// text cells keep it.
    pub fn guess(s: &str) -> Self {
        if s.is_empty() {
            return CellValue::Null;
        }
        let trimmed = s.trim();
        if let Ok(i) = trimmed.parse::<i64>() {
            return CellValue::Integer(i);
        }
        if let Ok(f) = trimmed.parse::<f64>() {
            return CellValue::Float(f);
        }
        if trimmed == "true" || trimmed == "false" {
            return CellValue::Bool(trimmed == "true");
        }
        CellValue::String(s.to_string())
    }

    /// Try to interpret the value as an `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, CellValue::Integer(_) | CellValue::Float(_))
    }

    /// Text used for grouping keys and CSV export (no float rounding).
    pub fn to_field(&self) -> String {
        match self {
            CellValue::String(s) => s.clone(),
            CellValue::Integer(i) => i.to_string(),
            // NaN is a missing reading and is written as an empty field.
            CellValue::Float(v) if v.is_nan() => String::new(),
            // Debug formatting is the shortest round-trip form and keeps a
            // decimal point on integral values ("1.0", not "1").
            CellValue::Float(v) => format!("{v:?}"),
            CellValue::Bool(b) => b.to_string(),
            CellValue::Null => String::new(),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::String(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::String(s)
    }
}

impl From<f64> for CellValue {
    fn from(v: f64) -> Self {
        CellValue::Float(v)
    }
}

impl From<i64> for CellValue {
    fn from(v: i64) -> Self {
        CellValue::Integer(v)
    }
}

// ---------------------------------------------------------------------------
// Table – rows of cells under ordered column names
// ---------------------------------------------------------------------------

/// An in-memory table. Every row has exactly `columns.len()` cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl Table {
    /// A table with no columns and no rows.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A table with the given columns and no rows.
    pub fn with_columns<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Table {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row, padding with `Null` or truncating to the column count.
    pub fn push_row(&mut self, mut row: Vec<CellValue>) {
        row.resize(self.columns.len(), CellValue::Null);
        self.rows.push(row);
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Iterate the cells of one column, or `None` if it does not exist.
    pub fn column(&self, name: &str) -> Option<impl Iterator<Item = &CellValue> + '_> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(move |row| &row[idx]))
    }

    /// Cell at `row` in column `name`.
    pub fn value(&self, row: usize, name: &str) -> Option<&CellValue> {
        let idx = self.column_index(name)?;
        self.rows.get(row).map(|r| &r[idx])
    }

    /// Set every row of `name` to `value`, adding the column at the end if
    /// it is missing and overwriting it otherwise.
    pub fn set_constant_column(&mut self, name: &str, value: CellValue) {
        match self.column_index(name) {
            Some(idx) => {
                for row in &mut self.rows {
                    row[idx] = value.clone();
                }
            }
            None => {
                self.columns.push(name.to_string());
                for row in &mut self.rows {
                    row.push(value.clone());
                }
            }
        }
    }

    /// A copy of the table without the named columns.
    pub fn without_columns(&self, drop: &[&str]) -> Table {
        let keep: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .filter(|(_, c)| !drop.contains(&c.as_str()))
            .map(|(i, _)| i)
            .collect();
        Table {
            columns: keep.iter().map(|&i| self.columns[i].clone()).collect(),
            rows: self
                .rows
                .iter()
                .map(|row| keep.iter().map(|&i| row[i].clone()).collect())
                .collect(),
        }
    }

    /// Sorted set of distinct values of a column.
    pub fn unique_values(&self, name: &str) -> BTreeSet<CellValue> {
        self.column(name)
            .map(|cells| cells.cloned().collect())
            .unwrap_or_default()
    }

    /// Concatenate tables row-wise. Columns are the union in first-seen
    /// order; cells for columns a table lacks are `Null`.
    pub fn concat(tables: Vec<Table>) -> Table {
        let mut columns: Vec<String> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();
        for t in &tables {
            for col in &t.columns {
                if !positions.contains_key(col) {
                    positions.insert(col.clone(), columns.len());
                    columns.push(col.clone());
                }
            }
        }

        let total: usize = tables.iter().map(Table::len).sum();
        let mut rows = Vec::with_capacity(total);
        for t in tables {
            let mapping: Vec<usize> = t.columns.iter().map(|c| positions[c]).collect();
            for row in t.rows {
                let mut out = vec![CellValue::Null; columns.len()];
                for (cell, &pos) in row.into_iter().zip(&mapping) {
                    out[pos] = cell;
                }
                rows.push(out);
            }
        }

        Table { columns, rows }
    }
}
