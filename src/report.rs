//! Console Report
//! Formats aggregate results into the A–E text summary.

use crate::data::{BmiCategory, Smoker};
use crate::stats::{StatsCalculator, ThresholdSplit};
use std::collections::BTreeMap;
use std::fmt::Display;
use std::io::{self, Write};
use std::path::Path;

/// `$` amount with two decimals and comma thousands separators.
pub fn format_currency(value: f64) -> String {
    if !value.is_finite() {
        return format!("${}", value);
    }

    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 && fixed.bytes().any(|b| b.is_ascii_digit() && b != b'0') {
        "-"
    } else {
        ""
    };
    format!("{sign}${grouped}.{frac_part}")
}

pub fn format_percent(value: f64) -> String {
    format!("{:.2}", value)
}

pub fn format_correlation(value: f64) -> String {
    format!("{:.4}", value)
}

/// Upper-case the first letter, lower-case the rest.
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

/// Writes the analysis report to any output stream.
pub struct Reporter<W: Write> {
    out: W,
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn section(&mut self, title: &str) -> io::Result<()> {
        writeln!(self.out, "=== {} ===", title)
    }

    pub fn blank(&mut self) -> io::Result<()> {
        writeln!(self.out)
    }

    /// A. Smokers vs non-smokers.
    pub fn smoking_summary(&mut self, means: &BTreeMap<Smoker, f64>) -> io::Result<()> {
        let mean_of = |s: Smoker| means.get(&s).copied().unwrap_or(f64::NAN);

        writeln!(self.out, "A. Average Charges by Smoking Status")?;
        writeln!(self.out, "   Smokers: {}", format_currency(mean_of(Smoker::Yes)))?;
        writeln!(self.out, "   Non-Smokers: {}", format_currency(mean_of(Smoker::No)))?;
        self.blank()
    }

    /// B. Mean charges per region and the most expensive one.
    pub fn region_summary(&mut self, means: &BTreeMap<String, f64>) -> io::Result<()> {
        writeln!(self.out, "B. Average Charges by Region")?;
        for (region, charge) in means {
            writeln!(self.out, "   {}: {}", capitalize(region), format_currency(*charge))?;
        }
        self.blank()?;

        if let Some((region, charge)) = StatsCalculator::highest(means) {
            writeln!(
                self.out,
                "   The region with the highest average charges is {} with {}.",
                capitalize(region),
                format_currency(charge)
            )?;
            self.blank()?;
        }
        Ok(())
    }

    /// C. Mean charges per BMI category, already sorted by the caller.
    pub fn bmi_summary(&mut self, means: &[(BmiCategory, f64)]) -> io::Result<()> {
        writeln!(self.out, "C. Average Charges by BMI Category")?;
        for (category, charge) in means {
            writeln!(self.out, "   {}: {}", category, format_currency(*charge))?;
        }
        self.blank()?;

        let highest = StatsCalculator::highest(means.iter().map(|(k, v)| (k, v)));
        if let Some((category, charge)) = highest {
            writeln!(
                self.out,
                "   The BMI category with the highest average charges is {} with {}.",
                category,
                format_currency(charge)
            )?;
            self.blank()?;
        }
        Ok(())
    }

    pub fn schema_warning(&mut self, file_name: &str, missing: &[String]) -> io::Result<()> {
        writeln!(
            self.out,
            "Warning: '{}' does not have all the expected columns. \
             Adjust the code accordingly. Missing: {}.",
            file_name,
            missing.join(", ")
        )
    }

    /// D. Denial percentage per insurance type.
    pub fn denial_summary<S: Display>(
        &mut self,
        rates: &BTreeMap<String, f64>,
        insurance_types: &[S],
    ) -> io::Result<()> {
        writeln!(self.out, "D. Percentage of Denied Claims by Insurance Type")?;
        if rates.is_empty() {
            let types: Vec<String> = insurance_types.iter().map(|t| t.to_string()).collect();
            writeln!(self.out, "   No claims found for {}.", types.join(", "))?;
        }
        for (itype, pct) in rates {
            writeln!(self.out, "   {}: {}% denied", itype, format_percent(*pct))?;
        }
        Ok(())
    }

    /// E. Denial vs billed amount.
    pub fn correlation_summary(
        &mut self,
        correlation: f64,
        split: &ThresholdSplit,
    ) -> io::Result<()> {
        let threshold = format_currency(split.threshold);
        let threshold = threshold.trim_end_matches(".00");

        writeln!(self.out, "E. Correlation between Denial Status and Billed Amount")?;
        writeln!(self.out, "   Pearson correlation: {}", format_correlation(correlation))?;
        writeln!(
            self.out,
            "   (A positive correlation means as Billed Amount increases, denial likelihood tends to increase.)"
        )?;
        self.blank()?;
        writeln!(
            self.out,
            "   Percentage of denied claims when Billed Amount > {}: {}%",
            threshold,
            format_percent(split.above)
        )?;
        writeln!(
            self.out,
            "   Percentage of denied claims when Billed Amount <= {}: {}%",
            threshold,
            format_percent(split.at_or_below)
        )?;
        self.blank()
    }

    pub fn chart_saved(&mut self, path: &Path) -> io::Result<()> {
        writeln!(self.out, "A bar chart has been saved as {}.", path.display())
    }

    pub fn chart_failed(&mut self, path: &Path, err: &dyn Display) -> io::Result<()> {
        writeln!(self.out, "Could not save bar chart {}: {}", path.display(), err)
    }

    pub fn error(&mut self, err: &dyn Display) -> io::Result<()> {
        writeln!(self.out, "Error: {}", err)
    }

    pub fn complete(&mut self) -> io::Result<()> {
        writeln!(self.out, "Analysis complete.")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(f: impl FnOnce(&mut Reporter<Vec<u8>>) -> io::Result<()>) -> String {
        let mut reporter = Reporter::new(Vec::new());
        f(&mut reporter).unwrap();
        String::from_utf8(reporter.into_inner()).unwrap()
    }

    #[test]
    fn currency_has_separators_and_two_decimals() {
        assert_eq!(format_currency(0.0), "$0.00");
        assert_eq!(format_currency(999.999), "$1,000.00");
        assert_eq!(format_currency(13270.422265), "$13,270.42");
        assert_eq!(format_currency(1234567.891), "$1,234,567.89");
        assert_eq!(format_currency(-4500.5), "-$4,500.50");
        assert_eq!(format_currency(f64::NAN), "$NaN");
    }

    #[test]
    fn percent_and_correlation_precision() {
        assert_eq!(format_percent(30.0), "30.00");
        assert_eq!(format_percent(100.0 / 3.0), "33.33");
        assert_eq!(format_correlation(0.123456), "0.1235");
        assert_eq!(format_correlation(f64::NAN), "NaN");
    }

    #[test]
    fn capitalize_region_names() {
        assert_eq!(capitalize("southeast"), "Southeast");
        assert_eq!(capitalize("NORTHWEST"), "Northwest");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn smoking_section_layout() {
        let mut means = BTreeMap::new();
        means.insert(Smoker::Yes, 25000.0);
        means.insert(Smoker::No, 5000.0);

        let text = render(|r| r.smoking_summary(&means));
        assert_eq!(
            text,
            "A. Average Charges by Smoking Status\n   Smokers: $25,000.00\n   Non-Smokers: $5,000.00\n\n"
        );
    }

    #[test]
    fn region_section_names_the_highest() {
        let mut means = BTreeMap::new();
        means.insert("northeast".to_string(), 13406.38);
        means.insert("southeast".to_string(), 14735.41);

        let text = render(|r| r.region_summary(&means));
        assert!(text.contains("   Northeast: $13,406.38\n"));
        assert!(text.contains(
            "The region with the highest average charges is Southeast with $14,735.41."
        ));
    }

    #[test]
    fn empty_region_section_skips_highest_line() {
        let text = render(|r| r.region_summary(&BTreeMap::new()));
        assert!(!text.contains("highest"));
    }

    #[test]
    fn bmi_section_keeps_given_order() {
        let means = vec![(BmiCategory::Normal, 10000.0), (BmiCategory::Obese, 15000.0)];
        let text = render(|r| r.bmi_summary(&means));
        let normal = text.find("Normal").unwrap();
        let obese = text.find("Obese").unwrap();
        assert!(normal < obese);
        assert!(text.contains("is Obese with $15,000.00."));
    }

    #[test]
    fn denial_section_lines() {
        let mut rates = BTreeMap::new();
        rates.insert("Commercial".to_string(), 30.0);
        rates.insert("Medicare".to_string(), 0.0);

        let text = render(|r| r.denial_summary(&rates, &["Commercial", "Medicare"]));
        assert!(text.contains("   Commercial: 30.00% denied\n"));
        assert!(text.contains("   Medicare: 0.00% denied\n"));

        let empty = render(|r| r.denial_summary(&BTreeMap::new(), &["Commercial", "Medicare"]));
        assert!(empty.contains("No claims found for Commercial, Medicare."));
    }

    #[test]
    fn schema_warning_names_file_and_missing_columns() {
        let missing = vec!["Claim ID".to_string(), "Outcome".to_string()];
        let text = render(|r| r.schema_warning("claim_data.csv", &missing));
        assert_eq!(
            text,
            "Warning: 'claim_data.csv' does not have all the expected columns. \
             Adjust the code accordingly. Missing: Claim ID, Outcome.\n"
        );
    }

    #[test]
    fn correlation_section_lines() {
        let split = ThresholdSplit {
            threshold: 200.0,
            above: 50.0,
            above_count: 2,
            at_or_below: 100.0 / 3.0,
            at_or_below_count: 3,
        };
        let text = render(|r| r.correlation_summary(0.41234, &split));
        assert!(text.contains("   Pearson correlation: 0.4123\n"));
        assert!(text.contains("Billed Amount > $200: 50.00%"));
        assert!(text.contains("Billed Amount <= $200: 33.33%"));
    }
}
