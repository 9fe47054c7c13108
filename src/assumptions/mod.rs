//! Statutory tables and formula constants
//!
//! Everything here is hardcoded for a single year; nothing is fetched at
//! runtime.

pub mod ssa;
pub mod tax_tables;
pub mod withdrawals;

pub use tax_tables::{FilingStatus, TaxBracket, TAX_YEAR};
