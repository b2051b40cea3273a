use super::model::Table;

/// Names of the columns that can be plotted as numbers, in table order.
///
/// A column qualifies when every non-null cell is an integer or a float; an
/// all-null column qualifies too. A table without rows has none.
pub fn numeric_columns(table: &Table) -> Vec<String> {
    if table.is_empty() {
        return Vec::new();
    }
    table
        .columns()
        .iter()
        .filter(|name| is_numeric_column(table, name))
        .cloned()
        .collect()
}

/// Whether a single column qualifies for [`numeric_columns`].
pub fn is_numeric_column(table: &Table, name: &str) -> bool {
    match table.column(name) {
        Some(mut cells) => cells.all(|c| c.is_null() || c.is_numeric()),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::CellValue;

    #[test]
    fn empty_table_has_no_numeric_columns() {
        assert!(numeric_columns(&Table::empty()).is_empty());
        assert!(numeric_columns(&Table::with_columns(["GHI"])).is_empty());
    }

    #[test]
    fn picks_only_numeric_columns() {
        let mut t = Table::with_columns(["GHI", "site"]);
        t.push_row(vec![CellValue::Float(1.0), "A".into()]);
        t.push_row(vec![CellValue::Integer(2), "B".into()]);
        assert_eq!(numeric_columns(&t), vec!["GHI"]);
    }

    #[test]
    fn nulls_do_not_disqualify_but_text_does() {
        let mut t = Table::with_columns(["a", "b", "c"]);
        t.push_row(vec![CellValue::Null, CellValue::Integer(1), CellValue::Integer(1)]);
        t.push_row(vec![CellValue::Null, CellValue::Null, "x".into()]);
        t.push_row(vec![CellValue::Null, CellValue::Bool(true), CellValue::Integer(2)]);
        assert_eq!(numeric_columns(&t), vec!["a"]);
        assert!(!is_numeric_column(&t, "missing"));
    }
}
