use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use solar_dashboard::data::assemble::{generate_synthetic, GeneratorParams};
use solar_dashboard::data::export::write_csv;

/// Site files written by the generator, one per country.
const SITES: [(&str, &str); 3] = [
    ("benin-malanville.csv", "Benin"),
    ("sierraleone-bumbuna.csv", "SierraLeone"),
    ("togo-dapaong.csv", "Togo"),
];

/// Write demo CSV files for the dashboard's data directory.
#[derive(Parser, Debug)]
#[command(name = "generate_sample", version)]
struct Args {
    /// Directory to write the CSV files into
    #[arg(long = "out-dir", default_value = "data")]
    out_dir: PathBuf,

    /// Rows per file
    #[arg(long, default_value_t = 500)]
    rows: usize,

    /// Base seed; each file uses seed + its index
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Regions per country
    #[arg(long, default_value_t = 5)]
    regions: u32,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("creating {}", args.out_dir.display()))?;

    for (i, (file_name, country)) in SITES.iter().enumerate() {
        let table = generate_synthetic(&GeneratorParams {
            row_count: args.rows,
            group_names: vec![country.to_string()],
            regions_per_group: args.regions,
            seed: Some(args.seed.wrapping_add(i as u64)),
        });
        let path = args.out_dir.join(file_name);
        // The dashboard derives `country` from the file name.
        write_csv(&table, &path, false)?;
        println!("Wrote {} rows to {}", table.len(), path.display());
    }

    Ok(())
}
