//! Per-player resource economy: points, balls, and time-based replenishment.

pub mod account;
pub mod ledger;

pub use account::PlayerAccount;
pub use ledger::{AccountLedger, AccountSnapshot};
