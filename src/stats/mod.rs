//! Stats module - Aggregate computations

mod calculator;

pub use calculator::{
    StatsCalculator, ThresholdSplit, DEFAULT_BILLED_THRESHOLD, DEFAULT_INSURANCE_TYPES,
};
