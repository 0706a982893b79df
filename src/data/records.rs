//! Record Schemas
//! Typed rows for the policy (charges) and claims datasets.

use std::fmt;

/// Columns every policy row must carry.
pub const POLICY_COLUMNS: [&str; 7] = [
    "age", "sex", "bmi", "children", "smoker", "region", "charges",
];

/// Columns expected in the claims file header.
pub const CLAIM_COLUMNS: [&str; 15] = [
    "Claim ID",
    "Provider ID",
    "Patient ID",
    "Date of Service",
    "Billed Amount",
    "Procedure Code",
    "Diagnosis Code",
    "Allowed Amount",
    "Paid Amount",
    "Insurance Type",
    "Claim Status",
    "Reason Code",
    "Follow-up Required",
    "AR Status",
    "Outcome",
];

/// Claim columns a row cannot be analysed without.
pub const CLAIM_KEY_COLUMNS: [&str; 3] = ["Insurance Type", "Claim Status", "Billed Amount"];

/// Status value that marks a claim as denied.
pub const DENIED_STATUS: &str = "Denied";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "male" | "m" => Some(Sex::Male),
            "female" | "f" => Some(Sex::Female),
            _ => None,
        }
    }
}

/// Smoking status, ordered so that `Yes` groups before `No`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Smoker {
    Yes,
    No,
}

impl Smoker {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "yes" => Some(Smoker::Yes),
            "no" => Some(Smoker::No),
            _ => None,
        }
    }
}

/// Body-mass-index band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl BmiCategory {
    /// Bands are inclusive-low, exclusive-high: 18.5, 25 and 30.
    pub fn from_bmi(bmi: f64) -> Self {
        if bmi < 18.5 {
            BmiCategory::Underweight
        } else if bmi < 25.0 {
            BmiCategory::Normal
        } else if bmi < 30.0 {
            BmiCategory::Overweight
        } else {
            BmiCategory::Obese
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BmiCategory::Underweight => "Underweight",
            BmiCategory::Normal => "Normal",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::Obese => "Obese",
        }
    }
}

impl fmt::Display for BmiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One row of the insurance charges dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyRecord {
    pub age: f64,
    pub sex: Sex,
    pub bmi: f64,
    pub children: u32,
    pub smoker: Smoker,
    pub region: String,
    pub charges: f64,
}

impl PolicyRecord {
    pub fn bmi_category(&self) -> BmiCategory {
        BmiCategory::from_bmi(self.bmi)
    }
}

/// One row of the claims dataset.
///
/// Only the three key columns are guaranteed; everything else is kept as
/// read and may be missing.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ClaimRecord {
    pub claim_id: Option<String>,
    pub provider_id: Option<String>,
    pub patient_id: Option<String>,
    pub date_of_service: Option<String>,
    pub billed_amount: f64,
    pub procedure_code: Option<String>,
    pub diagnosis_code: Option<String>,
    pub allowed_amount: Option<f64>,
    pub paid_amount: Option<f64>,
    pub insurance_type: String,
    pub claim_status: String,
    pub reason_code: Option<String>,
    pub follow_up_required: Option<bool>,
    pub ar_status: Option<String>,
    pub outcome: Option<String>,
}

impl ClaimRecord {
    pub fn is_denied(&self) -> bool {
        self.claim_status == DENIED_STATUS
    }
}

/// Parse a yes/no style flag as it appears in the follow-up column.
pub fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "yes" | "y" | "true" | "1" => Some(true),
        "no" | "n" | "false" | "0" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bmi_boundaries_are_inclusive_low() {
        assert_eq!(BmiCategory::from_bmi(17.9), BmiCategory::Underweight);
        assert_eq!(BmiCategory::from_bmi(18.5), BmiCategory::Normal);
        assert_eq!(BmiCategory::from_bmi(24.99), BmiCategory::Normal);
        assert_eq!(BmiCategory::from_bmi(25.0), BmiCategory::Overweight);
        assert_eq!(BmiCategory::from_bmi(29.99), BmiCategory::Overweight);
        assert_eq!(BmiCategory::from_bmi(30.0), BmiCategory::Obese);
        assert_eq!(BmiCategory::from_bmi(0.0), BmiCategory::Underweight);
    }

    #[test]
    fn enums_parse_case_insensitively() {
        assert_eq!(Smoker::parse("YES"), Some(Smoker::Yes));
        assert_eq!(Smoker::parse(" no "), Some(Smoker::No));
        assert_eq!(Smoker::parse("maybe"), None);
        assert_eq!(Sex::parse("Female"), Some(Sex::Female));
        assert_eq!(Sex::parse(""), None);
    }

    #[test]
    fn denial_is_exact_status_match() {
        let mut claim = ClaimRecord {
            claim_status: "Denied".to_string(),
            ..Default::default()
        };
        assert!(claim.is_denied());
        claim.claim_status = "Paid".to_string();
        assert!(!claim.is_denied());
    }

    #[test]
    fn follow_up_flag_accepts_common_spellings() {
        assert_eq!(parse_flag("Yes"), Some(true));
        assert_eq!(parse_flag("false"), Some(false));
        assert_eq!(parse_flag("unknown"), None);
    }
}
