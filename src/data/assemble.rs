use std::fmt;
use std::ops::RangeInclusive;
use std::path::Path;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::catalog::{capitalize, files_by_group};
use super::error::ParseError;
use super::loader::{load_file, parse_csv};
use super::model::{CellValue, Table, COUNTRY_COLUMN};

/// Group label given to uploaded rows that carry none.
pub const UPLOAD_LABEL: &str = "Uploaded";

// ---------------------------------------------------------------------------
// Local files
// ---------------------------------------------------------------------------

/// Load and concatenate every catalog file belonging to `groups`.
///
/// Rows follow `groups` order, then file discovery order. Files that fail to
/// load or have no rows are dropped; the result is empty if none remain.
pub fn load_for_groups<S: AsRef<str>>(groups: &[S], dir: &Path) -> Table {
    let catalog = files_by_group(dir);
    let tables: Vec<Table> = groups
        .iter()
        .filter_map(|g| catalog.get(g.as_ref()))
        .flatten()
        .map(|path| load_file(path))
        .filter(|t| !t.is_empty())
        .collect();

    if tables.is_empty() {
        return Table::empty();
    }
    Table::concat(tables)
}

// ---------------------------------------------------------------------------
// Upload
// ---------------------------------------------------------------------------

/// Parse an uploaded CSV payload.
///
/// Unlike [`load_file`], failures are returned so the caller can show them.
/// Rows without a `country` column are labelled `"Uploaded"`.
pub fn from_upload(raw: &[u8]) -> Result<Table, ParseError> {
    let text = std::str::from_utf8(raw)?;
    let mut table = parse_csv(text.as_bytes())?;
    if !table.has_column(COUNTRY_COLUMN) {
        table.set_constant_column(COUNTRY_COLUMN, CellValue::from(UPLOAD_LABEL));
    }
    Ok(table)
}

// ---------------------------------------------------------------------------
// Synthetic generator
// ---------------------------------------------------------------------------

pub const ROW_COUNT_RANGE: RangeInclusive<usize> = 10..=20_000;
pub const REGIONS_RANGE: RangeInclusive<u32> = 1..=50;
pub const SITE_COUNT: u32 = 1000;
pub const DEFAULT_GROUPS: [&str; 2] = ["Benin", "Togo"];

/// Inputs for [`generate_synthetic`].
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorParams {
    pub row_count: usize,
    pub group_names: Vec<String>,
    pub regions_per_group: u32,
    /// Fixed seed for reproducible output; `None` draws from entropy.
    pub seed: Option<u64>,
}

impl Default for GeneratorParams {
    fn default() -> Self {
        Self {
            row_count: 200,
            group_names: Vec::new(),
            regions_per_group: 5,
            seed: None,
        }
    }
}

impl GeneratorParams {
    /// Trimmed, capitalised, de-duplicated group names, or the defaults.
    pub fn normalized_groups(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for raw in &self.group_names {
            let name = raw.trim();
            if name.is_empty() {
                continue;
            }
            let name = capitalize(name);
            if !names.contains(&name) {
                names.push(name);
            }
        }
        if names.is_empty() {
            names = DEFAULT_GROUPS.iter().map(|s| s.to_string()).collect();
        }
        names
    }
}

/// Split a comma-separated list of group names.
pub fn parse_group_list(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Fabricate a table of irradiance-like readings.
///
/// Columns: `country`, `region`, `site`, `GHI`, `temperature`. Row count and
/// regions per group are clamped to [`ROW_COUNT_RANGE`] and
/// [`REGIONS_RANGE`].
pub fn generate_synthetic(params: &GeneratorParams) -> Table {
    let rows = params
        .row_count
        .clamp(*ROW_COUNT_RANGE.start(), *ROW_COUNT_RANGE.end());
    let regions = params
        .regions_per_group
        .clamp(*REGIONS_RANGE.start(), *REGIONS_RANGE.end());
    let groups = params.normalized_groups();

    let mut rng = match params.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut table = Table::with_columns([COUNTRY_COLUMN, "region", "site", "GHI", "temperature"]);
    for _ in 0..rows {
        let group = &groups[rng.gen_range(0..groups.len())];
        let region = rng.gen_range(1..=regions);
        let site = rng.gen_range(1..=SITE_COUNT);
        let ghi = gauss(&mut rng, 300.0, 100.0).abs();
        let temperature = gauss(&mut rng, 28.0, 5.0);
        table.push_row(vec![
            CellValue::String(group.clone()),
            CellValue::String(format!("Region-{region}")),
            CellValue::String(format!("Site-{site}")),
            CellValue::Float(ghi),
            CellValue::Float(temperature),
        ]);
    }

    log::info!(
        "Generated {rows} synthetic rows for {:?} ({regions} regions each)",
        groups
    );
    table
}

/// Box-Muller transform for a normal draw.
fn gauss<R: Rng>(rng: &mut R, mean: f64, std_dev: f64) -> f64 {
    let u1: f64 = rng.gen::<f64>().max(1e-15);
    let u2: f64 = rng.gen();
    let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
    mean + std_dev * z
}

// ---------------------------------------------------------------------------
// Source priority
// ---------------------------------------------------------------------------

/// Which source produced the assembled dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveSource {
    Upload,
    Generated,
    Local,
    None,
}

impl fmt::Display for ActiveSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActiveSource::Upload => write!(f, "uploaded CSV"),
            ActiveSource::Generated => write!(f, "generated data"),
            ActiveSource::Local => write!(f, "local CSV files"),
            ActiveSource::None => write!(f, "none"),
        }
    }
}

/// Candidate sources for one assembly.
#[derive(Debug, Clone, Default)]
pub struct SourceRequest {
    pub upload: Option<Vec<u8>>,
    pub generated: Option<Table>,
    pub groups: Vec<String>,
}

/// Result of [`assemble_dataset`].
#[derive(Debug)]
pub struct Assembled {
    pub table: Table,
    pub source: ActiveSource,
    /// Set when an upload was offered but could not be parsed.
    pub upload_error: Option<ParseError>,
}

/// Pick the dataset by priority: upload, then generated, then local files.
///
/// A source that fails or comes back empty yields to the next one.
pub fn assemble_dataset(request: SourceRequest, dir: &Path) -> Assembled {
    let mut upload_error = None;

    if let Some(bytes) = request.upload {
        match from_upload(&bytes) {
            Ok(table) if !table.is_empty() => {
                log::info!("Using uploaded CSV ({} rows)", table.len());
                return Assembled {
                    table,
                    source: ActiveSource::Upload,
                    upload_error: None,
                };
            }
            Ok(_) => log::info!("Uploaded CSV has no rows, falling back"),
            Err(e) => {
                log::error!("Could not read uploaded CSV: {e}");
                upload_error = Some(e);
            }
        }
    }

    if let Some(table) = request.generated.filter(|t| !t.is_empty()) {
        return Assembled {
            table,
            source: ActiveSource::Generated,
            upload_error,
        };
    }

    if !request.groups.is_empty() {
        let table = load_for_groups(request.groups.as_slice(), dir);
        if !table.is_empty() {
            return Assembled {
                table,
                source: ActiveSource::Local,
                upload_error,
            };
        }
    }

    Assembled {
        table: Table::empty(),
        source: ActiveSource::None,
        upload_error,
    }
}
