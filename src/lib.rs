#![forbid(unsafe_code)]

pub mod account;
pub mod bank;
pub mod csv_writer;
pub mod error;
pub mod json_store;
pub mod transaction;
pub mod types;

pub use account::{AccountNumberSequence, BankAccount};
pub use bank::Bank;
pub use error::LedgerError;
pub use transaction::Transaction;
pub use types::{AccountNumber, AccountType, Amount, Pin, Timestamp, TransactionKind};
