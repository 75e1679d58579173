use thiserror::Error;

use crate::types::{AccountNumber, Amount};

/// Why a ledger operation was rejected
///
/// A rejected operation never changes any balance or transaction history.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    #[error("Amount must be positive (amount = {0})")]
    InvalidAmount(Amount),

    #[error("Insufficient funds (account = {account}, requested = {requested}, available = {available})")]
    InsufficientFunds {
        account: AccountNumber,
        requested: Amount,
        available: Amount,
    },

    #[error("Balance would leave the representable range (account = {account}, amount = {amount})")]
    OutOfRange {
        account: AccountNumber,
        amount: Amount,
    },

    #[error("No account numbers left to hand out")]
    AccountNumbersExhausted,

    #[error("Account does not exist (account = {0})")]
    UnknownAccount(AccountNumber),

    #[error("Cannot transfer from an account to itself (account = {0})")]
    SameAccount(AccountNumber),
}
