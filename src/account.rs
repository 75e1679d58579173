use anyhow::{Context, Result};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::convert::TryFrom;

use crate::error::LedgerError;
use crate::transaction::{Transaction, TransactionRecord};
use crate::types::{AccountNumber, AccountType, Amount, Pin, Timestamp, TransactionKind};

/// Hands out unique, increasing account numbers
///
/// Once `AccountNumber::MAX` has been handed out (or loaded) the sequence is exhausted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountNumberSequence {
    next: Option<AccountNumber>,
}

impl AccountNumberSequence {
    pub const FIRST: AccountNumber = 1001;

    pub fn starting_at(first: AccountNumber) -> Self {
        Self { next: Some(first) }
    }

    /// The number the next call to `next` will return, `None` if exhausted
    pub fn peek(&self) -> Option<AccountNumber> {
        self.next
    }

    pub fn next(&mut self) -> Result<AccountNumber, LedgerError> {
        let number = self.next.ok_or(LedgerError::AccountNumbersExhausted)?;
        self.next = number.checked_add(1);
        Ok(number)
    }

    /// Make sure `number` (and everything below it) is never handed out again
    pub fn advance_past(&mut self, number: AccountNumber) {
        self.next = match (self.next, number.checked_add(1)) {
            (Some(next), Some(after)) => Some(next.max(after)),
            _ => None,
        };
    }
}

impl Default for AccountNumberSequence {
    fn default() -> Self {
        Self::starting_at(Self::FIRST)
    }
}

/// An account together with its full transaction history
#[derive(Debug, Clone, PartialEq)]
pub struct BankAccount {
    account_number: AccountNumber,
    owner: String,
    account_type: AccountType,
    balance: Amount,
    interest_rate: Amount,
    fee: Amount,
    pin: Pin,
    transactions: Vec<Transaction>,
}

/// A `BankAccount` as it is laid out in the ledger file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountRecord {
    pub account_number: AccountNumber,
    pub owner: String,
    pub account_type: AccountType,

    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub balance: Amount,

    pub transactions: Vec<TransactionRecord>,

    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub interest_rate: Amount,

    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub fee: Amount,

    pub pin: Pin,
}

impl BankAccount {
    pub fn open(
        sequence: &mut AccountNumberSequence,
        owner: impl Into<String>,
        initial_balance: Amount,
        account_type: AccountType,
    ) -> Result<Self, LedgerError> {
        Self::open_with_rng(
            sequence,
            owner,
            initial_balance,
            account_type,
            &mut rand::thread_rng(),
        )
    }

    pub fn open_with_rng(
        sequence: &mut AccountNumberSequence,
        owner: impl Into<String>,
        initial_balance: Amount,
        account_type: AccountType,
        rng: &mut impl rand::Rng,
    ) -> Result<Self, LedgerError> {
        let account = Self {
            account_number: sequence.next()?,
            owner: owner.into(),
            interest_rate: account_type.interest_rate(),
            fee: account_type.monthly_fee(),
            account_type,
            balance: initial_balance,
            pin: Pin::generate(rng),
            transactions: Vec::new(),
        };
        debug!(
            "{} account opened for {} (account = {})",
            account.account_type, account.owner, account.account_number
        );
        Ok(account)
    }

    pub fn account_number(&self) -> AccountNumber {
        self.account_number
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn account_type(&self) -> &AccountType {
        &self.account_type
    }

    pub fn balance(&self) -> Amount {
        self.balance
    }

    pub fn interest_rate(&self) -> Amount {
        self.interest_rate
    }

    pub fn fee(&self) -> Amount {
        self.fee
    }

    pub fn pin(&self) -> Pin {
        self.pin
    }

    pub fn check_pin(&self, pin: Pin) -> bool {
        self.pin == pin
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// All transactions in the order they happened
    pub fn statement(&self) -> impl Iterator<Item = &Transaction> + '_ {
        self.transactions.iter()
    }

    fn record(&mut self, kind: TransactionKind, amount: Amount) {
        self.transactions
            .push(Transaction::new(Timestamp::now(), kind, amount, self.balance));
        debug!(
            "{} of {} applied, new balance is {} (account = {})",
            kind, amount, self.balance, self.account_number
        );
    }

    fn checked_balance(
        &self,
        balance: Option<Amount>,
        amount: Amount,
    ) -> Result<Amount, LedgerError> {
        balance.ok_or_else(|| {
            let err = LedgerError::OutOfRange {
                account: self.account_number,
                amount,
            };
            warn!("{}", err);
            err
        })
    }

    fn check_debit(&self, amount: Amount) -> Result<(), LedgerError> {
        let result = if amount <= Amount::ZERO {
            Err(LedgerError::InvalidAmount(amount))
        } else if amount > self.balance {
            Err(LedgerError::InsufficientFunds {
                account: self.account_number,
                requested: amount,
                available: self.balance,
            })
        } else {
            Ok(())
        };
        if let Err(err) = &result {
            warn!("{}", err);
        }
        result
    }

    pub fn deposit(&mut self, amount: Amount) -> Result<(), LedgerError> {
        if amount <= Amount::ZERO {
            let err = LedgerError::InvalidAmount(amount);
            warn!("{}", err);
            return Err(err);
        }

        self.balance = self.checked_balance(self.balance.checked_add(amount), amount)?;
        self.record(TransactionKind::Deposit, amount);
        Ok(())
    }

    pub fn withdraw(&mut self, amount: Amount) -> Result<(), LedgerError> {
        self.check_debit(amount)?;

        self.balance -= amount;
        self.record(TransactionKind::Withdraw, amount);
        Ok(())
    }

    /// Move funds to `recipient`
    ///
    /// Only the sender's funds are checked. Both sides are booked or neither is.
    pub fn transfer(
        &mut self,
        amount: Amount,
        recipient: &mut BankAccount,
    ) -> Result<(), LedgerError> {
        self.check_debit(amount)?;
        let credited = recipient.checked_balance(recipient.balance.checked_add(amount), amount)?;

        self.balance -= amount;
        recipient.balance = credited;
        self.record(TransactionKind::TransferOut, amount);
        recipient.record(TransactionKind::TransferIn, amount);
        Ok(())
    }

    /// Credit interest on a positive savings balance, returns the interest if any was credited
    pub fn apply_interest(&mut self) -> Option<Amount> {
        if self.account_type != AccountType::Savings || self.balance <= Amount::ZERO {
            return None;
        }

        let interest = self.balance.checked_mul(self.interest_rate)?;
        self.balance = self
            .checked_balance(self.balance.checked_add(interest), interest)
            .ok()?;
        self.record(TransactionKind::Interest, interest);
        Some(interest)
    }

    /// Charge the monthly fee, returns the fee if one was charged
    ///
    /// The fee is charged even if it leaves the balance negative.
    /// Neither interest nor fee is booked if the new balance is not representable.
    pub fn apply_fee(&mut self) -> Option<Amount> {
        if self.fee <= Amount::ZERO {
            return None;
        }

        let fee = self.fee;
        self.balance = self.checked_balance(self.balance.checked_sub(fee), fee).ok()?;
        self.record(TransactionKind::MonthlyFee, fee);
        Some(fee)
    }

    pub fn to_record(&self) -> AccountRecord {
        AccountRecord {
            account_number: self.account_number,
            owner: self.owner.clone(),
            account_type: self.account_type.clone(),
            balance: self.balance,
            transactions: self.transactions.iter().map(Transaction::to_record).collect(),
            interest_rate: self.interest_rate,
            fee: self.fee,
            pin: self.pin,
        }
    }

    /// Rebuild an account exactly as recorded, nothing is derived from the account type
    pub fn from_record(record: AccountRecord) -> Result<Self> {
        let AccountRecord {
            account_number,
            owner,
            account_type,
            balance,
            transactions,
            interest_rate,
            fee,
            pin,
        } = record;

        let transactions = transactions
            .into_iter()
            .map(Transaction::try_from)
            .collect::<Result<Vec<_>>>()
            .with_context(|| format!("Invalid account record (account = {})", account_number))?;

        Ok(Self {
            account_number,
            owner,
            account_type,
            balance,
            interest_rate,
            fee,
            pin,
            transactions,
        })
    }
}

impl TryFrom<AccountRecord> for BankAccount {
    type Error = anyhow::Error;

    fn try_from(record: AccountRecord) -> Result<Self> {
        Self::from_record(record)
    }
}
