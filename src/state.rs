use std::path::Path;

use anyhow::{Context, Result};

use crate::color::ColorMap;
use crate::config::AppConfig;
use crate::data::aggregate::{choose_grouping_dimension, top_groups, AggregationRow};
use crate::data::assemble::{
    assemble_dataset, generate_synthetic, parse_group_list, ActiveSource, GeneratorParams,
    SourceRequest,
};
use crate::data::catalog::{files_by_group, FilesByGroup};
use crate::data::distribution::{distribution, DistributionGroup};
use crate::data::export::{to_csv_bytes, write_csv};
use crate::data::model::{Table, COUNTRY_COLUMN};
use crate::data::schema::numeric_columns;

/// Group names the generator offers when the catalog is empty.
const FALLBACK_GENERATOR_GROUPS: &str = "Benin, Togo, SierraLeone";

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// A CSV picked through the upload dialog.
#[derive(Debug, Clone)]
pub struct Upload {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// Outcome of the last upload attempt, shown in the side panel.
#[derive(Debug, Clone, PartialEq)]
pub enum UploadStatus {
    Loaded(String),
    Failed(String),
}

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: AppConfig,

    /// Local files by group label.
    pub catalog: FilesByGroup,
    /// Sorted group names with their selection flag.
    pub group_selection: Vec<(String, bool)>,

    pub upload: Option<Upload>,
    pub upload_status: Option<UploadStatus>,

    /// Generator inputs, as edited in the side panel.
    pub gen_rows: usize,
    pub gen_countries: String,
    pub gen_regions: u32,
    /// Last generated table (None until the user clicks Generate).
    pub generated: Option<Table>,

    /// The assembled dataset and where it came from.
    pub dataset: Table,
    pub source: ActiveSource,

    pub numeric_columns: Vec<String>,
    pub variable: Option<String>,
    pub dimension: Option<&'static str>,
    pub top_n: usize,
    pub show_raw: bool,
    pub export_metadata: bool,

    /// Derived from the dataset and the selections above.
    pub distribution: Vec<DistributionGroup>,
    pub ranking: Vec<AggregationRow>,
    pub color_map: ColorMap,

    /// Error from the last plot/ranking computation.
    pub analysis_error: Option<String>,
    /// Status / error message shown in the top bar.
    pub status_message: Option<String>,
}

impl AppState {
    /// Build the state from config: scan the catalog and load the default
    /// selection (all groups).
    pub fn new(config: AppConfig) -> Self {
        let mut state = AppState {
            gen_rows: config.generator.rows,
            gen_countries: config.generator.countries.clone(),
            gen_regions: config.generator.regions_per_group,
            top_n: config.display.top_n,
            show_raw: config.display.show_raw,
            export_metadata: config.display.export_metadata,
            config,
            catalog: FilesByGroup::default(),
            group_selection: Vec::new(),
            upload: None,
            upload_status: None,
            generated: None,
            dataset: Table::empty(),
            source: ActiveSource::None,
            numeric_columns: Vec::new(),
            variable: None,
            dimension: None,
            distribution: Vec::new(),
            ranking: Vec::new(),
            color_map: ColorMap::default(),
            analysis_error: None,
            status_message: None,
        };
        state.rescan();
        state
    }

    pub fn data_dir(&self) -> &Path {
        &self.config.data.dir
    }

    /// Re-read the data directory, select every group and reload.
    pub fn rescan(&mut self) {
        self.catalog = files_by_group(&self.config.data.dir);
        let mut names = self.catalog.group_names();
        names.sort();
        if self.gen_countries.trim().is_empty() {
            self.gen_countries = if names.is_empty() {
                FALLBACK_GENERATOR_GROUPS.to_string()
            } else {
                names.join(", ")
            };
        }
        self.group_selection = names.into_iter().map(|g| (g, true)).collect();
        self.reload();
    }

    /// Selected groups, in sorted order.
    pub fn selected_groups(&self) -> Vec<String> {
        self.group_selection
            .iter()
            .filter(|(_, on)| *on)
            .map(|(g, _)| g.clone())
            .collect()
    }

    pub fn set_group_selected(&mut self, group: &str, selected: bool) {
        if let Some(entry) = self.group_selection.iter_mut().find(|(g, _)| g == group) {
            entry.1 = selected;
        }
        self.reload();
    }

    pub fn select_all_groups(&mut self) {
        self.group_selection.iter_mut().for_each(|e| e.1 = true);
        self.reload();
    }

    pub fn select_no_groups(&mut self) {
        self.group_selection.iter_mut().for_each(|e| e.1 = false);
        self.reload();
    }

    // -- sources --

    /// Read an upload from disk and make it the candidate upload source.
    pub fn upload_file(&mut self, path: &Path) {
        match std::fs::read(path) {
            Ok(bytes) => {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                self.set_upload(name, bytes);
            }
            Err(e) => {
                log::error!("Failed to read {}: {e}", path.display());
                self.upload_status = Some(UploadStatus::Failed(format!(
                    "Could not read uploaded CSV: {e}"
                )));
            }
        }
    }

    pub fn set_upload(&mut self, name: String, bytes: Vec<u8>) {
        self.upload = Some(Upload { name, bytes });
        self.reload();
    }

    pub fn clear_upload(&mut self) {
        self.upload = None;
        self.upload_status = None;
        self.reload();
    }

    pub fn generator_params(&self) -> GeneratorParams {
        GeneratorParams {
            row_count: self.gen_rows,
            group_names: parse_group_list(&self.gen_countries),
            regions_per_group: self.gen_regions,
            seed: self.config.generator.seed,
        }
    }

    /// Fabricate a fresh synthetic table and reload.
    pub fn generate(&mut self) {
        self.generated = Some(generate_synthetic(&self.generator_params()));
        self.reload();
    }

    pub fn clear_generated(&mut self) {
        self.generated = None;
        self.reload();
    }

    /// Re-assemble the dataset from the current sources.
    pub fn reload(&mut self) {
        let request = SourceRequest {
            upload: self.upload.as_ref().map(|u| u.bytes.clone()),
            generated: self.generated.clone(),
            groups: self.selected_groups(),
        };
        let assembled = assemble_dataset(request, &self.config.data.dir);

        if let Some(upload) = &self.upload {
            self.upload_status = Some(match (&assembled.upload_error, assembled.source) {
                (Some(e), _) => UploadStatus::Failed(format!("Could not read uploaded CSV: {e}")),
                (None, ActiveSource::Upload) => {
                    UploadStatus::Loaded(format!("Loaded {} as data source", upload.name))
                }
                (None, _) => UploadStatus::Failed(format!("{} contains no rows", upload.name)),
            });
        }

        self.set_dataset(assembled.table, assembled.source);
    }

    /// Ingest a newly assembled dataset, reset the variable and colours.
    pub fn set_dataset(&mut self, dataset: Table, source: ActiveSource) {
        self.numeric_columns = numeric_columns(&dataset);
        let keep = self
            .variable
            .as_ref()
            .is_some_and(|v| self.numeric_columns.contains(v));
        if !keep {
            self.variable = self.numeric_columns.first().cloned();
        }
        self.color_map = ColorMap::new(&dataset.unique_values(COUNTRY_COLUMN));

        log::info!(
            "Dataset from {source}: {} rows, {} columns",
            dataset.len(),
            dataset.columns().len()
        );
        self.dataset = dataset;
        self.source = source;
        self.status_message = None;
        self.recompute();
    }

    // -- analysis --

    pub fn set_variable(&mut self, variable: String) {
        self.variable = Some(variable);
        self.recompute();
    }

    pub fn set_top_n(&mut self, n: usize) {
        self.top_n = n;
        self.recompute();
    }

    /// Recompute the grouping dimension, plot data and ranking.
    pub fn recompute(&mut self) {
        self.distribution.clear();
        self.ranking.clear();
        self.dimension = None;
        self.analysis_error = None;

        let Some(variable) = self.variable.clone() else {
            return;
        };
        if self.dataset.is_empty() {
            return;
        }

        let dimension = match choose_grouping_dimension(&self.dataset) {
            Ok(d) => d,
            Err(e) => {
                log::error!("{e}");
                self.analysis_error = Some(e.to_string());
                return;
            }
        };
        self.dimension = Some(dimension);

        let result = distribution(&self.dataset, dimension, COUNTRY_COLUMN, &variable).and_then(
            |dist| {
                let ranking =
                    top_groups(&self.dataset, dimension, COUNTRY_COLUMN, &variable, self.top_n)?;
                Ok((dist, ranking))
            },
        );
        match result {
            Ok((dist, ranking)) => {
                self.distribution = dist;
                self.ranking = ranking;
            }
            Err(e) => {
                log::warn!("Could not compute top regions: {e}");
                self.analysis_error = Some(format!("Could not compute top regions: {e}"));
            }
        }
    }

    // -- export --

    pub fn export_bytes(&self) -> Result<Vec<u8>> {
        to_csv_bytes(&self.dataset, self.export_metadata)
    }

    pub fn export_to(&mut self, path: &Path) {
        let result = write_csv(&self.dataset, path, self.export_metadata)
            .context("exporting dataset");
        match result {
            Ok(()) => {
                self.status_message = Some(format!("Exported to {}", path.display()));
            }
            Err(e) => {
                log::error!("{e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn state_for(dir: &Path) -> AppState {
        let mut config = AppConfig::default();
        config.data.dir = dir.to_path_buf();
        config.generator.seed = Some(11);
        AppState::new(config)
    }

    fn write_fixtures(dir: &Path) {
        std::fs::write(
            dir.join("benin-malanville.csv"),
            "region,GHI,Tamb\nNorth,100,30\nSouth,300,31\n",
        )
        .unwrap();
        std::fs::write(dir.join("togo-dapaong.csv"), "region,GHI,Tamb\nNorth,200,29\n").unwrap();
    }

    #[test]
    fn starts_with_all_local_groups() {
        let dir = TempDir::new().unwrap();
        write_fixtures(dir.path());
        let state = state_for(dir.path());

        assert_eq!(state.selected_groups(), vec!["Benin", "Togo"]);
        assert_eq!(state.source, ActiveSource::Local);
        assert_eq!(state.dataset.len(), 3);
        assert_eq!(state.numeric_columns, vec!["GHI", "Tamb"]);
        assert_eq!(state.variable.as_deref(), Some("GHI"));
        assert_eq!(state.dimension, Some("region"));
        assert_eq!(state.ranking[0].mean, 300.0);
        assert_eq!(state.gen_countries, "Benin, Togo");
    }

    #[test]
    fn empty_directory_offers_fallback_groups() {
        let dir = TempDir::new().unwrap();
        let state = state_for(dir.path());
        assert_eq!(state.source, ActiveSource::None);
        assert!(state.dataset.is_empty());
        assert_eq!(state.gen_countries, FALLBACK_GENERATOR_GROUPS);
        assert!(state.ranking.is_empty());
        assert!(state.analysis_error.is_none());
    }

    #[test]
    fn upload_beats_generated_beats_local() {
        let dir = TempDir::new().unwrap();
        write_fixtures(dir.path());
        let mut state = state_for(dir.path());

        state.generate();
        assert_eq!(state.source, ActiveSource::Generated);
        assert_eq!(state.dataset.len(), state.gen_rows);

        state.set_upload("mine.csv".into(), b"site,DNI\nA,1\nB,2\n".to_vec());
        assert_eq!(state.source, ActiveSource::Upload);
        assert_eq!(state.dimension, Some("site"));
        assert_eq!(state.variable.as_deref(), Some("DNI"));
        assert!(matches!(state.upload_status, Some(UploadStatus::Loaded(_))));

        state.set_upload("bad.csv".into(), b"a\n1,2\n".to_vec());
        assert_eq!(state.source, ActiveSource::Generated);
        assert!(matches!(state.upload_status, Some(UploadStatus::Failed(_))));

        state.clear_upload();
        state.clear_generated();
        assert_eq!(state.source, ActiveSource::Local);
    }

    #[test]
    fn deselecting_groups_empties_dataset() {
        let dir = TempDir::new().unwrap();
        write_fixtures(dir.path());
        let mut state = state_for(dir.path());

        state.set_group_selected("Benin", false);
        assert_eq!(state.dataset.len(), 1);
        state.select_no_groups();
        assert!(state.dataset.is_empty());
        assert_eq!(state.source, ActiveSource::None);
        state.select_all_groups();
        assert_eq!(state.dataset.len(), 3);
    }

    #[test]
    fn changing_variable_and_top_n_recomputes() {
        let dir = TempDir::new().unwrap();
        write_fixtures(dir.path());
        let mut state = state_for(dir.path());

        state.set_variable("Tamb".into());
        assert_eq!(state.ranking[0].mean, 31.0);

        state.set_variable("country".into());
        assert!(state.ranking.is_empty());
        assert!(state.analysis_error.as_deref().unwrap().contains("not numeric"));

        state.set_variable("GHI".into());
        state.set_top_n(3);
        assert_eq!(state.ranking.len(), 3);
    }

    #[test]
    fn export_respects_metadata_flag() {
        let dir = TempDir::new().unwrap();
        write_fixtures(dir.path());
        let mut state = state_for(dir.path());

        let with_meta = String::from_utf8(state.export_bytes().unwrap()).unwrap();
        assert!(with_meta.starts_with("region,GHI,Tamb,__source_file,country\n"));

        state.export_metadata = false;
        let without = String::from_utf8(state.export_bytes().unwrap()).unwrap();
        assert!(without.starts_with("region,GHI,Tamb\n"));

        let out = dir.path().join("out").join("x.csv");
        state.export_to(&out);
        assert!(state.status_message.as_deref().unwrap().starts_with("Error"));
    }
}
