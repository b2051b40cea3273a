use std::path::Path;

use anyhow::{anyhow, Context, Result};

use super::model::{Table, COUNTRY_COLUMN, SOURCE_FILE_COLUMN};

/// Default file name offered by the export dialog.
pub const DEFAULT_EXPORT_FILE_NAME: &str = "solar_selected_data.csv";

/// Serialise `table` as UTF-8 CSV, header first, in column order.
///
/// With `include_metadata` off, the `__source_file` and `country` columns
/// are dropped. Floats are written so that they reload as floats.
pub fn to_csv_bytes(table: &Table, include_metadata: bool) -> Result<Vec<u8>> {
    let stripped;
    let table = if include_metadata {
        table
    } else {
        stripped = table.without_columns(&[SOURCE_FILE_COLUMN, COUNTRY_COLUMN]);
        &stripped
    };

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(table.columns())
        .context("writing CSV header")?;
    for (row_no, row) in table.rows().iter().enumerate() {
        writer
            .write_record(row.iter().map(|cell| cell.to_field()))
            .with_context(|| format!("writing CSV row {row_no}"))?;
    }
    writer
        .into_inner()
        .map_err(|e| anyhow!("flushing CSV buffer: {}", e.error()))
}

/// Write [`to_csv_bytes`] output to `path`.
pub fn write_csv(table: &Table, path: &Path, include_metadata: bool) -> Result<()> {
    let bytes = to_csv_bytes(table, include_metadata)?;
    std::fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))?;
    log::info!("Exported {} rows to {}", table.len(), path.display());
    Ok(())
}
