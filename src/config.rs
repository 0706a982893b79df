//! Configuration for an analysis run.

use crate::stats::{DEFAULT_BILLED_THRESHOLD, DEFAULT_INSURANCE_TYPES};
use clap::Parser;
use std::path::PathBuf;

pub const INSURANCE_FILE: &str = "insurance.csv";
pub const CLAIMS_FILE: &str = "claim_data.csv";

pub const CHARGES_BY_REGION_CHART: &str = "charges_by_region.png";
pub const CHARGES_BY_BMI_CHART: &str = "charges_by_bmi_category.png";
pub const DENIED_BY_TYPE_CHART: &str = "denied_claims_by_insurance_type.png";

/// Where the inputs live, where charts go, and the claim analysis knobs.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Directory holding the input files; empty means the working directory
    pub data_dir: PathBuf,
    /// Directory charts are written to; empty means the working directory
    pub output_dir: PathBuf,
    pub insurance_file: String,
    pub claims_file: String,
    /// Insurance types compared in the denial-rate section
    pub insurance_types: Vec<String>,
    /// Billed amount splitting high and low claims
    pub billed_threshold: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::new(),
            output_dir: PathBuf::new(),
            insurance_file: INSURANCE_FILE.to_string(),
            claims_file: CLAIMS_FILE.to_string(),
            insurance_types: DEFAULT_INSURANCE_TYPES.iter().map(|s| s.to_string()).collect(),
            billed_threshold: DEFAULT_BILLED_THRESHOLD,
        }
    }
}

impl AnalysisConfig {
    pub fn insurance_path(&self) -> PathBuf {
        self.data_dir.join(&self.insurance_file)
    }

    pub fn claims_path(&self) -> PathBuf {
        self.data_dir.join(&self.claims_file)
    }

    pub fn chart_path(&self, file_name: &str) -> PathBuf {
        self.output_dir.join(file_name)
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "care-analysis",
    about = "Healthcare charges and claims analysis"
)]
pub struct Cli {
    /// Directory containing the input CSV files (default: current dir)
    #[clap(long)]
    pub data_dir: Option<PathBuf>,
    /// Directory the bar charts are written to (default: current dir)
    #[clap(long)]
    pub output_dir: Option<PathBuf>,
    /// Insurance charges file name
    #[clap(long, default_value = INSURANCE_FILE)]
    pub insurance_file: String,
    /// Claims file name
    #[clap(long, default_value = CLAIMS_FILE)]
    pub claims_file: String,
}

impl From<Cli> for AnalysisConfig {
    fn from(cli: Cli) -> Self {
        Self {
            data_dir: cli.data_dir.unwrap_or_default(),
            output_dir: cli.output_dir.unwrap_or_default(),
            insurance_file: cli.insurance_file,
            claims_file: cli.claims_file,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_resolve_to_working_directory() {
        let config = AnalysisConfig::default();
        assert_eq!(config.insurance_path(), PathBuf::from("insurance.csv"));
        assert_eq!(config.claims_path(), PathBuf::from("claim_data.csv"));
        assert_eq!(
            config.chart_path(CHARGES_BY_REGION_CHART),
            PathBuf::from("charges_by_region.png")
        );
        assert_eq!(config.insurance_types, vec!["Commercial", "Medicare"]);
    }

    #[test]
    fn cli_flags_override_directories() {
        let cli = Cli::parse_from(["care-analysis", "--data-dir", "in", "--output-dir", "out"]);
        let config = AnalysisConfig::from(cli);
        assert_eq!(config.insurance_path(), PathBuf::from("in/insurance.csv"));
        assert_eq!(
            config.chart_path(DENIED_BY_TYPE_CHART),
            PathBuf::from("out/denied_claims_by_insurance_type.png")
        );
        assert_eq!(config.billed_threshold, 200.0);
    }
}
