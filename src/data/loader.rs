//! CSV Data Loader Module
//! Reads the policy and claims CSV files with Polars and converts them into
//! typed records, dropping rows that are missing required values.

use crate::data::records::{
    parse_flag, ClaimRecord, PolicyRecord, Sex, Smoker, CLAIM_COLUMNS, CLAIM_KEY_COLUMNS,
    POLICY_COLUMNS,
};
use log::{debug, info, warn};
use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Cell contents read as missing, on top of empty fields.
pub const MISSING_MARKERS: [&str; 18] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("'{}' file not found.", .0.display())]
    NotFound(PathBuf),
    #[error("Could not parse '{}' as CSV: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: PolarsError,
    },
    #[error("The dataset '{}' does not have the expected columns (missing: {})", .path.display(), .missing.join(", "))]
    Schema { path: PathBuf, missing: Vec<String> },
    #[error("Failed to read column: {0}")]
    Column(#[from] PolarsError),
}

/// Policy rows that survived validation.
#[derive(Debug, Clone, Default)]
pub struct PolicyDataset {
    pub records: Vec<PolicyRecord>,
    pub dropped_rows: usize,
}

/// Claim rows that survived validation, plus any schema gaps found.
#[derive(Debug, Clone, Default)]
pub struct ClaimDataset {
    pub records: Vec<ClaimRecord>,
    pub dropped_rows: usize,
    pub missing_columns: Vec<String>,
}

impl ClaimDataset {
    pub fn has_full_schema(&self) -> bool {
        self.missing_columns.is_empty()
    }
}

/// Loads the two analysis datasets.
pub struct DataLoader;

impl DataLoader {
    /// Fail with `NotFound` unless `path` exists.
    pub fn ensure_exists(path: &Path) -> Result<(), LoaderError> {
        if path.exists() {
            Ok(())
        } else {
            Err(LoaderError::NotFound(path.to_path_buf()))
        }
    }

    /// Load the insurance charges dataset.
    ///
    /// All seven policy columns must be present. Rows with a missing or
    /// unparseable value in any of them are dropped.
    pub fn load_policies(path: &Path) -> Result<PolicyDataset, LoaderError> {
        let df = Self::read_csv(path)?;

        let columns = Self::column_names(&df);
        let missing = Self::missing_columns(&columns, &POLICY_COLUMNS);
        if !missing.is_empty() {
            return Err(LoaderError::Schema {
                path: path.to_path_buf(),
                missing,
            });
        }

        let age = Self::float_values(&df, "age")?;
        let sex = Self::text_values(&df, "sex")?;
        let bmi = Self::float_values(&df, "bmi")?;
        let children = Self::float_values(&df, "children")?;
        let smoker = Self::text_values(&df, "smoker")?;
        let region = Self::text_values(&df, "region")?;
        let charges = Self::float_values(&df, "charges")?;

        let mut records = Vec::with_capacity(df.height());
        for i in 0..df.height() {
            let row = (|| {
                Some(PolicyRecord {
                    age: age[i]?,
                    sex: Sex::parse(sex[i].as_deref()?)?,
                    bmi: bmi[i]?,
                    children: Self::as_count(children[i]?)?,
                    smoker: Smoker::parse(smoker[i].as_deref()?)?,
                    region: region[i].clone()?,
                    charges: charges[i]?,
                })
            })();

            match row {
                Some(record) => records.push(record),
                None => debug!("Dropping policy row {} with missing values", i + 1),
            }
        }

        let dropped_rows = df.height() - records.len();
        info!(
            "Loaded {} policy rows from {} ({} dropped)",
            records.len(),
            path.display(),
            dropped_rows
        );

        Ok(PolicyDataset {
            records,
            dropped_rows,
        })
    }

    /// Load the claims dataset.
    ///
    /// Absent columns are reported on the result rather than failing; rows
    /// without an insurance type, claim status or billed amount are dropped.
    pub fn load_claims(path: &Path) -> Result<ClaimDataset, LoaderError> {
        let df = Self::read_csv(path)?;

        let columns = Self::column_names(&df);
        let missing_columns = Self::missing_columns(&columns, &CLAIM_COLUMNS);
        if !missing_columns.is_empty() {
            warn!(
                "{} is missing expected columns: {}",
                path.display(),
                missing_columns.join(", ")
            );
        }
        for key in CLAIM_KEY_COLUMNS {
            if !columns.iter().any(|c| c == key) {
                warn!("Key column '{}' is absent; every claim row will be dropped", key);
            }
        }

        let claim_id = Self::text_values(&df, "Claim ID")?;
        let provider_id = Self::text_values(&df, "Provider ID")?;
        let patient_id = Self::text_values(&df, "Patient ID")?;
        let date_of_service = Self::text_values(&df, "Date of Service")?;
        let billed_amount = Self::float_values(&df, "Billed Amount")?;
        let procedure_code = Self::text_values(&df, "Procedure Code")?;
        let diagnosis_code = Self::text_values(&df, "Diagnosis Code")?;
        let allowed_amount = Self::float_values(&df, "Allowed Amount")?;
        let paid_amount = Self::float_values(&df, "Paid Amount")?;
        let insurance_type = Self::text_values(&df, "Insurance Type")?;
        let claim_status = Self::text_values(&df, "Claim Status")?;
        let reason_code = Self::text_values(&df, "Reason Code")?;
        let follow_up = Self::text_values(&df, "Follow-up Required")?;
        let ar_status = Self::text_values(&df, "AR Status")?;
        let outcome = Self::text_values(&df, "Outcome")?;

        let mut records = Vec::with_capacity(df.height());
        for i in 0..df.height() {
            let (Some(billed), Some(itype), Some(status)) = (
                billed_amount[i],
                insurance_type[i].clone(),
                claim_status[i].clone(),
            ) else {
                debug!("Dropping claim row {} with missing key values", i + 1);
                continue;
            };

            records.push(ClaimRecord {
                claim_id: claim_id[i].clone(),
                provider_id: provider_id[i].clone(),
                patient_id: patient_id[i].clone(),
                date_of_service: date_of_service[i].clone(),
                billed_amount: billed,
                procedure_code: procedure_code[i].clone(),
                diagnosis_code: diagnosis_code[i].clone(),
                allowed_amount: allowed_amount[i],
                paid_amount: paid_amount[i],
                insurance_type: itype,
                claim_status: status,
                reason_code: reason_code[i].clone(),
                follow_up_required: follow_up[i].as_deref().and_then(parse_flag),
                ar_status: ar_status[i].clone(),
                outcome: outcome[i].clone(),
            });
        }

        let dropped_rows = df.height() - records.len();
        info!(
            "Loaded {} claim rows from {} ({} dropped)",
            records.len(),
            path.display(),
            dropped_rows
        );

        Ok(ClaimDataset {
            records,
            dropped_rows,
            missing_columns,
        })
    }

    fn read_csv(path: &Path) -> Result<DataFrame, LoaderError> {
        Self::ensure_exists(path)?;

        let parse_err = |source: PolarsError| LoaderError::Parse {
            path: path.to_path_buf(),
            source,
        };

        let null_values = MISSING_MARKERS.iter().map(|m| (*m).into()).collect();

        LazyCsvReader::new(path)
            .with_has_header(true)
            .with_infer_schema_length(Some(10000))
            .with_ignore_errors(true)
            .with_null_values(Some(NullValues::AllColumns(null_values)))
            .finish()
            .map_err(parse_err)?
            .collect()
            .map_err(parse_err)
    }

    fn column_names(df: &DataFrame) -> Vec<String> {
        df.get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    fn missing_columns(present: &[String], expected: &[&str]) -> Vec<String> {
        expected
            .iter()
            .filter(|name| !present.iter().any(|c| c == *name))
            .map(|name| name.to_string())
            .collect()
    }

    /// Numeric values of a column; nulls, NaNs and unparseable cells are `None`.
    /// An absent column reads as all `None`.
    fn float_values(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>, LoaderError> {
        let Ok(column) = df.column(name) else {
            return Ok(vec![None; df.height()]);
        };

        let values = column.cast(&DataType::Float64)?;
        let values = values
            .f64()?
            .into_iter()
            .map(|v| v.filter(|x| !x.is_nan()))
            .collect();
        Ok(values)
    }

    /// Trimmed text values of a column; nulls and blank cells are `None`.
    /// An absent column reads as all `None`.
    fn text_values(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>, LoaderError> {
        let Ok(column) = df.column(name) else {
            return Ok(vec![None; df.height()]);
        };

        let values = column.cast(&DataType::String)?;
        let values = values
            .as_materialized_series()
            .str()?
            .into_iter()
            .map(|v| {
                v.map(str::trim)
                    .filter(|s| !s.is_empty() && !MISSING_MARKERS.contains(s))
                    .map(|s| s.to_string())
            })
            .collect();
        Ok(values)
    }

    fn as_count(value: f64) -> Option<u32> {
        (value >= 0.0 && value.fract() == 0.0 && value <= u32::MAX as f64).then(|| value as u32)
    }
}
