use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Directory scan
// ---------------------------------------------------------------------------

/// Extension of the files the catalog picks up.
pub const TABULAR_EXTENSION: &str = "csv";

/// Return all `.csv` files in `dir`, sorted by file name.
///
/// A missing or unreadable directory yields an empty list.
pub fn list_files(dir: &Path) -> Vec<PathBuf> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            log::debug!("Data directory {} not readable: {e}", dir.display());
            return Vec::new();
        }
    };

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && has_tabular_extension(path))
        .collect();
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    files
}

fn has_tabular_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(TABULAR_EXTENSION))
}

/// Infer a group label from a file name like `benin-malanville.csv`.
///
/// Takes the leading run of ASCII letters and capitalises it. Names with no
/// leading letter come back unchanged.
pub fn extract_group_label(path: impl AsRef<Path>) -> String {
    let path = path.as_ref();
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned());

    let prefix_len = name
        .bytes()
        .take_while(|b| b.is_ascii_alphabetic())
        .count();
    if prefix_len == 0 {
        return name;
    }
    capitalize(&name[..prefix_len])
}

/// First character upper-case, the rest lower-case.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

// ---------------------------------------------------------------------------
// Grouping
// ---------------------------------------------------------------------------

/// Catalog files keyed by group label, in first-seen group order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilesByGroup {
    groups: Vec<(String, Vec<PathBuf>)>,
}

impl FilesByGroup {
    pub fn from_files(files: Vec<PathBuf>) -> Self {
        let mut catalog = FilesByGroup::default();
        for file in files {
            let label = extract_group_label(&file);
            match catalog.groups.iter_mut().find(|(g, _)| *g == label) {
                Some((_, paths)) => paths.push(file),
                None => catalog.groups.push((label, vec![file])),
            }
        }
        catalog
    }

    /// Files for one group, in discovery order.
    pub fn get(&self, label: &str) -> Option<&[PathBuf]> {
        self.groups
            .iter()
            .find(|(g, _)| g == label)
            .map(|(_, paths)| paths.as_slice())
    }

    pub fn group_names(&self) -> Vec<String> {
        self.groups.iter().map(|(g, _)| g.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[PathBuf])> {
        self.groups
            .iter()
            .map(|(g, paths)| (g.as_str(), paths.as_slice()))
    }
}

/// Scan `dir` and group its files by inferred label.
pub fn files_by_group(dir: &Path) -> FilesByGroup {
    let catalog = FilesByGroup::from_files(list_files(dir));
    log::debug!(
        "Catalog of {}: {} group(s) {:?}",
        dir.display(),
        catalog.len(),
        catalog.group_names()
    );
    catalog
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn label_from_leading_letters() {
        assert_eq!(extract_group_label("benin-malanville.csv"), "Benin");
        assert_eq!(extract_group_label("SIERRALEONE_bumbuna.csv"), "Sierraleone");
        assert_eq!(extract_group_label("togo2.csv"), "Togo");
        assert_eq!(extract_group_label(Path::new("data/togo-dapaong.csv")), "Togo");
    }

    #[test]
    fn label_without_letters_is_filename() {
        assert_eq!(extract_group_label("123data.csv"), "123data.csv");
        assert_eq!(extract_group_label("-x.csv"), "-x.csv");
    }

    #[test]
    fn missing_directory_is_empty() {
        let dir = TempDir::new().unwrap();
        assert!(list_files(&dir.path().join("nope")).is_empty());
        assert!(files_by_group(&dir.path().join("nope")).is_empty());
    }

    #[test]
    fn lists_only_csv_files() {
        let dir = TempDir::new().unwrap();
        for name in ["b.csv", "a.CSV", "notes.txt", "c.csv.bak"] {
            std::fs::write(dir.path().join(name), "x\n1\n").unwrap();
        }
        std::fs::create_dir(dir.path().join("sub.csv")).unwrap();

        let names: Vec<String> = list_files(dir.path())
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.CSV", "b.csv"]);
    }

    #[test]
    fn groups_keep_first_seen_order() {
        let files = vec![
            PathBuf::from("togo-a.csv"),
            PathBuf::from("benin-a.csv"),
            PathBuf::from("togo-b.csv"),
        ];
        let catalog = FilesByGroup::from_files(files);

        assert_eq!(catalog.group_names(), vec!["Togo", "Benin"]);
        assert_eq!(
            catalog.get("Togo").unwrap(),
            &[PathBuf::from("togo-a.csv"), PathBuf::from("togo-b.csv")]
        );
        assert!(catalog.get("Niger").is_none());
        let counts: Vec<(&str, usize)> = catalog.iter().map(|(g, f)| (g, f.len())).collect();
        assert_eq!(counts, vec![("Togo", 2), ("Benin", 1)]);
    }
}
