use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use mzdeiso::feature::{Feature, FeatureRow};
use mzdeiso::grouper::DEFAULT_ISOTOPE_SPACING;
use mzdeiso::io::save_feature_table;

const COMPOUNDS: usize = 60;
const NOISE_FEATURES: usize = 40;

/// Write a synthetic feature table with known isotope clusters
pub fn run(output: PathBuf) -> Result<()> {
    info!("Generating demo feature table...");
    let rows = generate_mock_features();
    let compounds_z2 = (0..COMPOUNDS).filter(|&i| compound_charge(i) == 2).count();

    save_feature_table(&output, &rows)
        .with_context(|| format!("Failed to write demo table: {}", output.display()))?;

    info!("Demo table complete!");
    info!("  Output file: {}", output.display());
    info!("  Features: {}", rows.len());
    info!(
        "  Isotope clusters: {} ({} at z=1, {} at z=2)",
        COMPOUNDS,
        COMPOUNDS - compounds_z2,
        compounds_z2
    );
    info!("  Singletons: {}", NOISE_FEATURES);
    info!("\nTry: mzdeiso group {}", output.display());

    Ok(())
}

fn compound_charge(i: usize) -> i32 {
    if i % 4 == 3 {
        2
    } else {
        1
    }
}

/// Isotope clusters of 2 to 4 peaks, well separated in RT, plus singletons.
fn generate_mock_features() -> Vec<FeatureRow> {
    let mut rows = Vec::new();
    let mut id: i64 = 1;

    for i in 0..COMPOUNDS {
        let charge = compound_charge(i);
        let mono_mz = 180.0 + i as f64 * 17.31 + (i as f64 * 0.123).sin() * 0.5;
        let rt = 0.5 + i as f64 * 0.4;
        let apex = 1e6 * (0.2 + (i as f64 * 0.456).sin().abs() * 0.8);
        let isotopes = 2 + i % 3;

        for n in 0..isotopes {
            let mz_noise = (id as f64 * 0.789).sin() * 0.0008;
            let rt_noise = (id as f64 * 0.321).sin() * 0.02;
            let relative = 0.55_f64.powi(n as i32);

            let feature = Feature::new(
                mono_mz + n as f64 * DEFAULT_ISOTOPE_SPACING / charge as f64 + mz_noise,
                rt + rt_noise,
                apex * relative,
            );
            let mut row = FeatureRow::new(id, feature);
            if n == 0 {
                row.fragment_scans = vec![1000 + i as i64];
            }
            rows.push(row);
            id += 1;
        }
    }

    for i in 0..NOISE_FEATURES {
        let mz = 150.0 + i as f64 * 29.77 + 0.35;
        let rt = 0.7 + i as f64 * 0.4;
        let height = 5e4 * (0.5 + (i as f64 * 0.654).sin().abs());
        rows.push(FeatureRow::new(id, Feature::new(mz, rt, height)).with_comment("noise"));
        id += 1;
    }

    rows
}
