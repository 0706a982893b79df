//! Care Analysis - Healthcare Charges & Claims Analysis
//!
//! Loads the insurance charges and claims CSV files into typed records,
//! computes grouped means, denial rates and a denial/billing correlation,
//! prints the report and writes bar charts of the grouped results.

pub mod analysis;
pub mod charts;
pub mod config;
pub mod data;
pub mod report;
pub mod stats;
