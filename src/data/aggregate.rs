use std::cmp::Ordering;
use std::collections::HashMap;
use std::ops::RangeInclusive;

use super::error::AggregationError;
use super::model::{CellValue, Table, COUNTRY_COLUMN};
use super::schema::is_numeric_column;

/// Preferred grouping dimensions, most specific first.
pub const DIMENSION_PREFERENCE: [&str; 3] = ["region", "site", COUNTRY_COLUMN];

/// Legal range for the number of ranked rows.
pub const TOP_N_RANGE: RangeInclusive<usize> = 3..=30;

// ---------------------------------------------------------------------------
// Grouping
// ---------------------------------------------------------------------------

/// Pick the breakdown column: `region`, else `site`, else `country`.
pub fn choose_grouping_dimension(table: &Table) -> Result<&'static str, AggregationError> {
    DIMENSION_PREFERENCE
        .into_iter()
        .find(|c| table.has_column(c))
        .ok_or(AggregationError::NoGroupingDimension)
}

/// Non-null values of one variable for a (dimension, label) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueGroup {
    pub dimension_value: CellValue,
    pub label: CellValue,
    pub values: Vec<f64>,
}

/// Split `variable` by the pair (`dimension`, `label_column`).
///
/// Groups come back in first-encountered order. Rows with a null key are
/// skipped; null values are left out of `values`.
pub fn group_values(
    table: &Table,
    dimension: &str,
    label_column: &str,
    variable: &str,
) -> Result<Vec<ValueGroup>, AggregationError> {
    let dim_idx = require_column(table, dimension)?;
    let label_idx = require_column(table, label_column)?;
    let var_idx = require_column(table, variable)?;
    if !is_numeric_column(table, variable) {
        return Err(AggregationError::NotNumeric(variable.to_string()));
    }

    let mut groups: Vec<ValueGroup> = Vec::new();
    let mut index: HashMap<(&CellValue, &CellValue), usize> = HashMap::new();

    for row in table.rows() {
        let (dim, label) = (&row[dim_idx], &row[label_idx]);
        if dim.is_null() || label.is_null() {
            continue;
        }
        let slot = *index.entry((dim, label)).or_insert_with(|| {
            groups.push(ValueGroup {
                dimension_value: dim.clone(),
                label: label.clone(),
                values: Vec::new(),
            });
            groups.len() - 1
        });
        if let Some(v) = row[var_idx].as_f64() {
            groups[slot].values.push(v);
        }
    }

    Ok(groups)
}

fn require_column(table: &Table, name: &str) -> Result<usize, AggregationError> {
    table
        .column_index(name)
        .ok_or_else(|| AggregationError::MissingColumn(name.to_string()))
}

// ---------------------------------------------------------------------------
// Ranking
// ---------------------------------------------------------------------------

/// One line of the ranking table.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregationRow {
    pub dimension_value: CellValue,
    pub label: CellValue,
    /// Mean of the non-null values; NaN when there are none.
    pub mean: f64,
    /// Number of non-null values.
    pub count: usize,
}

/// Rank (dimension, label) pairs by the mean of `variable`.
///
/// Sorted descending by mean; ties keep first-encountered order and NaN
/// means sort last. `n` is clamped to [`TOP_N_RANGE`].
pub fn top_groups(
    table: &Table,
    dimension: &str,
    label_column: &str,
    variable: &str,
    n: usize,
) -> Result<Vec<AggregationRow>, AggregationError> {
    let n = n.clamp(*TOP_N_RANGE.start(), *TOP_N_RANGE.end());

    let mut rows: Vec<AggregationRow> = group_values(table, dimension, label_column, variable)?
        .into_iter()
        .map(|g| {
            let count = g.values.len();
            let mean = if count == 0 {
                f64::NAN
            } else {
                g.values.iter().sum::<f64>() / count as f64
            };
            AggregationRow {
                dimension_value: g.dimension_value,
                label: g.label,
                mean,
                count,
            }
        })
        .collect();

    rows.sort_by(|a, b| descending_nan_last(a.mean, b.mean));
    rows.truncate(n);
    Ok(rows)
}

fn descending_nan_last(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn readings(rows: &[(&str, &str, Option<f64>)]) -> Table {
        let mut t = Table::with_columns(["region", "country", "GHI", "note"]);
        for (region, country, ghi) in rows {
            t.push_row(vec![
                CellValue::from(*region),
                CellValue::from(*country),
                ghi.map(CellValue::Float).unwrap_or(CellValue::Null),
                CellValue::from("n/a"),
            ]);
        }
        t
    }

    #[test]
    fn dimension_preference() {
        assert_eq!(choose_grouping_dimension(&Table::with_columns(["site", "region", "country"])).unwrap(), "region");
        assert_eq!(choose_grouping_dimension(&Table::with_columns(["country", "site"])).unwrap(), "site");
        assert_eq!(choose_grouping_dimension(&Table::with_columns(["country"])).unwrap(), "country");
        assert!(matches!(
            choose_grouping_dimension(&Table::with_columns(["GHI"])),
            Err(AggregationError::NoGroupingDimension)
        ));
    }

    #[test]
    fn higher_mean_ranks_first() {
        let t = readings(&[
            ("X", "Benin", Some(10.0)),
            ("X", "Benin", Some(20.0)),
            ("Y", "Togo", Some(100.0)),
            ("X", "Benin", Some(30.0)),
        ]);
        let top = top_groups(&t, "region", "country", "GHI", 2).unwrap();

        assert_eq!(top.len(), 2);
        assert_eq!(top[0].dimension_value, CellValue::from("Y"));
        assert_eq!(top[0].mean, 100.0);
        assert_eq!(top[0].count, 1);
        assert_eq!(top[1].dimension_value, CellValue::from("X"));
        assert_eq!(top[1].mean, 20.0);
        assert_eq!(top[1].count, 3);
    }

    #[test]
    fn pairs_split_by_label_and_ties_are_stable() {
        let t = readings(&[
            ("R1", "Benin", Some(5.0)),
            ("R1", "Togo", Some(5.0)),
            ("R2", "Benin", Some(5.0)),
        ]);
        let top = top_groups(&t, "region", "country", "GHI", 10).unwrap();
        let keys: Vec<(String, String)> = top
            .iter()
            .map(|r| (r.dimension_value.to_string(), r.label.to_string()))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("R1".to_string(), "Benin".to_string()),
                ("R1".to_string(), "Togo".to_string()),
                ("R2".to_string(), "Benin".to_string()),
            ]
        );
    }

    #[test]
    fn nulls_are_not_counted_and_all_null_sorts_last() {
        let t = readings(&[
            ("A", "Benin", None),
            ("B", "Benin", Some(1.0)),
            ("B", "Benin", None),
        ]);
        let top = top_groups(&t, "region", "country", "GHI", 3).unwrap();
        assert_eq!(top[0].dimension_value, CellValue::from("B"));
        assert_eq!(top[0].count, 1);
        assert!(top[1].mean.is_nan());
        assert_eq!(top[1].count, 0);
    }

    #[test]
    fn n_is_clamped() {
        let rows: Vec<(String, f64)> = (0..40).map(|i| (format!("R{i}"), i as f64)).collect();
        let mut t = Table::with_columns(["region", "country", "GHI"]);
        for (r, v) in &rows {
            t.push_row(vec![CellValue::from(r.as_str()), "Benin".into(), CellValue::Float(*v)]);
        }
        assert_eq!(top_groups(&t, "region", "country", "GHI", 1).unwrap().len(), 3);
        assert_eq!(top_groups(&t, "region", "country", "GHI", 100).unwrap().len(), 30);
    }

    #[test]
    fn bad_variable_fails() {
        let t = readings(&[("A", "Benin", Some(1.0))]);
        assert!(matches!(
            top_groups(&t, "region", "country", "note", 5),
            Err(AggregationError::NotNumeric(c)) if c == "note"
        ));
        assert!(matches!(
            top_groups(&t, "region", "country", "DNI", 5),
            Err(AggregationError::MissingColumn(c)) if c == "DNI"
        ));
    }
}
