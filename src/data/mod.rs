//! Data module - CSV loading and typed records

mod loader;
mod records;

pub use loader::{ClaimDataset, DataLoader, LoaderError, PolicyDataset};
pub use records::{
    BmiCategory, ClaimRecord, PolicyRecord, Sex, Smoker, CLAIM_COLUMNS, CLAIM_KEY_COLUMNS,
    DENIED_STATUS, POLICY_COLUMNS,
};
