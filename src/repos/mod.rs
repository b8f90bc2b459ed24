pub mod account_repo;
pub mod error;
pub mod patient_repo;
