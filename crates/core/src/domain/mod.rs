pub mod applicant;
pub mod contract;
