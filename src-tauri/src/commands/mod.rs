pub mod fields;
pub mod payment;
pub mod receipt;
pub mod reports;
pub mod session;
