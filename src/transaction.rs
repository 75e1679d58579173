use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{convert::TryFrom, fmt};

use crate::types::{Amount, Timestamp, TransactionKind};

/// A single, immutable event in an account's ledger
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    timestamp: Timestamp,
    kind: TransactionKind,
    amount: Amount,
    balance_after: Amount,
}

/// A `Transaction` as it is laid out in the ledger file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub date: String,

    #[serde(rename = "type")]
    pub kind: TransactionKind,

    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub amount: Amount,

    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub balance_after: Amount,
}

impl Transaction {
    pub fn new(
        timestamp: impl Into<Timestamp>,
        kind: TransactionKind,
        amount: Amount,
        balance_after: Amount,
    ) -> Self {
        Self {
            timestamp: timestamp.into(),
            kind,
            amount,
            balance_after,
        }
    }

    /// Like `new`, but with the timestamp given in its textual `YYYY-MM-DD HH:MM:SS` form
    pub fn from_formatted(
        date: &str,
        kind: TransactionKind,
        amount: Amount,
        balance_after: Amount,
    ) -> Result<Self> {
        let timestamp: Timestamp = date.parse()?;
        Ok(Self::new(timestamp, kind, amount, balance_after))
    }

    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    pub fn kind(&self) -> TransactionKind {
        self.kind
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn balance_after(&self) -> Amount {
        self.balance_after
    }

    /// The amount with its effect on the balance as sign (credits positive, debits negative)
    pub fn signed_amount(&self) -> Amount {
        if self.kind.is_credit() {
            self.amount
        } else {
            -self.amount
        }
    }

    pub fn to_record(&self) -> TransactionRecord {
        TransactionRecord {
            date: self.timestamp.to_string(),
            kind: self.kind,
            amount: self.amount,
            balance_after: self.balance_after,
        }
    }

    /// Fails if the record's date does not follow the ledger timestamp format exactly
    pub fn from_record(record: TransactionRecord) -> Result<Self> {
        let TransactionRecord {
            date,
            kind,
            amount,
            balance_after,
        } = record;

        Self::from_formatted(&date, kind, amount, balance_after)
            .with_context(|| format!("Invalid transaction record ({} of {})", kind, amount))
    }
}

impl TryFrom<TransactionRecord> for Transaction {
    type Error = anyhow::Error;

    fn try_from(record: TransactionRecord) -> Result<Self> {
        Self::from_record(record)
    }
}

impl From<&Transaction> for TransactionRecord {
    fn from(transaction: &Transaction) -> Self {
        transaction.to_record()
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | {} | Amount: ${} | Balance After: ${}",
            self.timestamp, self.kind, self.amount, self.balance_after
        )
    }
}
