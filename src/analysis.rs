//! Analysis Pipeline
//! Runs the charges analysis (A–C) and the claims analysis (D–E) in order.

use crate::charts::{BarChart, StaticChartRenderer};
use crate::config::{
    AnalysisConfig, CHARGES_BY_BMI_CHART, CHARGES_BY_REGION_CHART, DENIED_BY_TYPE_CHART,
};
use crate::data::{ClaimDataset, DataLoader, LoaderError, PolicyDataset};
use crate::report::Reporter;
use crate::stats::StatsCalculator;
use log::{info, warn};
use std::io::{self, Write};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error(transparent)]
    Loader(#[from] LoaderError),
    #[error("Failed to write report: {0}")]
    Io(#[from] io::Error),
}

/// Drives one complete run against a report stream.
pub struct Analysis<'a, W: Write> {
    config: &'a AnalysisConfig,
    reporter: Reporter<W>,
}

impl<'a, W: Write> Analysis<'a, W> {
    pub fn new(config: &'a AnalysisConfig, out: W) -> Self {
        Self {
            config,
            reporter: Reporter::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.reporter.into_inner()
    }

    /// Run both pipelines.
    ///
    /// Both inputs are checked for existence before anything is analysed; a
    /// load failure stops the run and is returned to the caller.
    pub fn run(&mut self) -> Result<(), AnalysisError> {
        let insurance_path = self.config.insurance_path();
        let claims_path = self.config.claims_path();
        DataLoader::ensure_exists(&insurance_path)?;
        DataLoader::ensure_exists(&claims_path)?;

        let policies = DataLoader::load_policies(&insurance_path)?;
        self.analyze_policies(&policies)?;

        let claims = DataLoader::load_claims(&claims_path)?;
        self.analyze_claims(&claims)?;

        self.reporter.complete()?;
        Ok(())
    }

    /// Print a fatal error the way the report prints everything else.
    pub fn report_error(&mut self, err: &AnalysisError) -> io::Result<()> {
        self.reporter.error(err)
    }

    pub fn analyze_policies(&mut self, dataset: &PolicyDataset) -> Result<(), AnalysisError> {
        let records = &dataset.records;
        info!(
            "Analysing {} policy records ({} dropped)",
            records.len(),
            dataset.dropped_rows
        );
        self.reporter.section("Insurance Data Analysis")?;

        // A
        let by_smoker = StatsCalculator::mean_by_group(records, |r| r.smoker, |r| r.charges);
        self.reporter.smoking_summary(&by_smoker)?;

        // B
        let by_region =
            StatsCalculator::mean_by_group(records, |r| r.region.clone(), |r| r.charges);
        self.reporter.region_summary(&by_region)?;
        let chart = BarChart::new(
            "Average Healthcare Charges by Region",
            "Region",
            "Average Charges ($)",
            by_region.iter().map(|(k, v)| (k.clone(), *v)),
        );
        self.save_chart(&chart, CHARGES_BY_REGION_CHART)?;

        // C
        let by_bmi = StatsCalculator::mean_by_group(records, |r| r.bmi_category(), |r| r.charges);
        let by_bmi = StatsCalculator::sorted_by_value(&by_bmi);
        self.reporter.bmi_summary(&by_bmi)?;
        let chart = BarChart::new(
            "Average Healthcare Charges by BMI Category",
            "BMI Category",
            "Average Charges ($)",
            by_bmi.iter().map(|(k, v)| (k.label(), *v)),
        );
        self.save_chart(&chart, CHARGES_BY_BMI_CHART)?;

        Ok(())
    }

    pub fn analyze_claims(&mut self, dataset: &ClaimDataset) -> Result<(), AnalysisError> {
        let records = &dataset.records;
        info!(
            "Analysing {} claim records ({} dropped)",
            records.len(),
            dataset.dropped_rows
        );
        self.reporter.section("Claims Data Analysis")?;

        if !dataset.has_full_schema() {
            self.reporter
                .schema_warning(&self.config.claims_file, &dataset.missing_columns)?;
        }

        // D
        let rates = StatsCalculator::denial_rate_by_type(records, &self.config.insurance_types);
        self.reporter
            .denial_summary(&rates, &self.config.insurance_types)?;
        let chart = BarChart::new(
            "Percentage of Denied Claims by Insurance Type",
            "Insurance Type",
            "Percentage Denied (%)",
            rates.iter().map(|(k, v)| (k.clone(), *v)),
        );
        self.save_chart(&chart, DENIED_BY_TYPE_CHART)?;
        self.reporter.blank()?;

        // E
        let correlation =
            StatsCalculator::flag_correlation(records, |c| c.is_denied(), |c| c.billed_amount);
        let split = StatsCalculator::threshold_split_rate(
            records,
            |c| c.billed_amount,
            self.config.billed_threshold,
            |c| c.is_denied(),
        );
        self.reporter.correlation_summary(correlation, &split)?;

        Ok(())
    }

    /// Render a chart into the output directory. A chart that cannot be
    /// written is reported and skipped; only report-stream failures abort.
    fn save_chart(&mut self, chart: &BarChart, file_name: &str) -> io::Result<()> {
        if chart.bars.is_empty() {
            warn!("Skipping chart '{}': no data", chart.title);
            return Ok(());
        }

        let path = self.config.chart_path(file_name);
        match StaticChartRenderer::render_bar_chart(chart, &path) {
            Ok(()) => self.reporter.chart_saved(&path),
            Err(err) => {
                warn!("Chart {} not written: {}", path.display(), err);
                self.reporter.chart_failed(&path, &err)
            }
        }
    }
}
