use std::path::PathBuf;

use clap::Parser;

/// Command-line arguments for the dashboard.
#[derive(Clone, Parser, Debug, Default)]
#[command(
    name = "solar-dashboard",
    version,
    about = "Interactive dashboard for exploring solar measurement data"
)]
pub struct Args {
    /// Directory scanned for CSV files (overrides the config file)
    #[arg(long = "data-dir", value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Configuration file to use instead of the default location
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Fixed seed for the random dataset generator
    #[arg(long)]
    pub seed: Option<u64>,

    /// Number of rows in the ranking table (3-30)
    #[arg(long = "top-n", value_name = "N")]
    pub top_n: Option<usize>,

    /// Write a default configuration file and exit
    #[arg(long = "write-config")]
    pub write_config: bool,

    /// Overwrite an existing file with --write-config
    #[arg(long, requires = "write_config")]
    pub force: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_overrides() {
        let args = Args::try_parse_from([
            "solar-dashboard",
            "--data-dir",
            "/tmp/solar",
            "--seed",
            "42",
            "--top-n",
            "5",
        ])
        .unwrap();
        assert_eq!(args.data_dir, Some(PathBuf::from("/tmp/solar")));
        assert_eq!(args.seed, Some(42));
        assert_eq!(args.top_n, Some(5));
        assert!(!args.write_config);
    }

    #[test]
    fn force_requires_write_config() {
        assert!(Args::try_parse_from(["solar-dashboard", "--force"]).is_err());
        assert!(Args::try_parse_from(["solar-dashboard", "--write-config", "--force"]).is_ok());
    }
}
