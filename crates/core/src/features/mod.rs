pub mod assemble;
pub mod schema;

pub use assemble::assemble;
pub use schema::{FeatureRow, FeatureSchema};

/// Column names the model was trained on.
pub mod columns {
    pub const AMT_INCOME_TOTAL: &str = "AMT_INCOME_TOTAL";
    pub const AMT_CREDIT: &str = "AMT_CREDIT";
    pub const AMT_ANNUITY: &str = "AMT_ANNUITY";
    pub const DAYS_BIRTH: &str = "DAYS_BIRTH";
    pub const EXT_SOURCE_2: &str = "EXT_SOURCE_2";
    pub const EXT_SOURCE_3: &str = "EXT_SOURCE_3";
    pub const BUREAU_LOAN_COUNT: &str = "BUREAU_LOAN_COUNT";
    pub const CREDIT_TERM: &str = "CREDIT_TERM";
}
