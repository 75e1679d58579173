use anyhow::Result;
use log::{debug, warn};
use std::path::Path;

use crate::account::{AccountNumberSequence, BankAccount};
use crate::error::LedgerError;
use crate::json_store::{load_accounts, save_accounts};
use crate::types::{AccountNumber, AccountType, Amount};

/// Owns a set of accounts and the sequence their numbers are drawn from
#[derive(Debug, Default)]
pub struct Bank {
    sequence: AccountNumberSequence,
    accounts: Vec<BankAccount>,
}

impl<'a> IntoIterator for &'a Bank {
    type Item = &'a BankAccount;

    type IntoIter = std::slice::Iter<'a, BankAccount>;

    fn into_iter(self) -> Self::IntoIter {
        self.accounts.iter()
    }
}

impl Bank {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sequence(sequence: AccountNumberSequence) -> Self {
        Self {
            sequence,
            accounts: Vec::new(),
        }
    }

    /// Take over existing accounts, new accounts will be numbered after the highest existing one
    pub fn from_accounts(accounts: Vec<BankAccount>) -> Self {
        let mut sequence = AccountNumberSequence::default();
        for account in &accounts {
            sequence.advance_past(account.account_number());
        }
        Self { sequence, accounts }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::from_accounts(load_accounts(path)?))
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        save_accounts(&self.accounts, path)
    }

    pub fn sequence(&self) -> &AccountNumberSequence {
        &self.sequence
    }

    pub fn open_account(
        &mut self,
        owner: impl Into<String>,
        initial_balance: Amount,
        account_type: AccountType,
    ) -> Result<AccountNumber, LedgerError> {
        let account = BankAccount::open(&mut self.sequence, owner, initial_balance, account_type)?;
        let number = account.account_number();
        self.accounts.push(account);
        Ok(number)
    }

    /// All accounts in the order they were opened or loaded
    pub fn accounts(&self) -> &[BankAccount] {
        &self.accounts
    }

    pub fn into_accounts(self) -> Vec<BankAccount> {
        self.accounts
    }

    fn index_of(&self, number: AccountNumber) -> Result<usize, LedgerError> {
        self.accounts
            .iter()
            .position(|account| account.account_number() == number)
            .ok_or_else(|| {
                warn!("Account does not exist (account = {})", number);
                LedgerError::UnknownAccount(number)
            })
    }

    pub fn account(&self, number: AccountNumber) -> Result<&BankAccount, LedgerError> {
        let index = self.index_of(number)?;
        Ok(&self.accounts[index])
    }

    pub fn account_mut(&mut self, number: AccountNumber) -> Result<&mut BankAccount, LedgerError> {
        let index = self.index_of(number)?;
        Ok(&mut self.accounts[index])
    }

    pub fn deposit(&mut self, number: AccountNumber, amount: Amount) -> Result<(), LedgerError> {
        self.account_mut(number)?.deposit(amount)
    }

    pub fn withdraw(&mut self, number: AccountNumber, amount: Amount) -> Result<(), LedgerError> {
        self.account_mut(number)?.withdraw(amount)
    }

    pub fn transfer(
        &mut self,
        from: AccountNumber,
        to: AccountNumber,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        if from == to {
            warn!("Cannot transfer from an account to itself (account = {})", from);
            return Err(LedgerError::SameAccount(from));
        }

        let sender = self.index_of(from)?;
        let recipient = self.index_of(to)?;

        let (sender, recipient) = if sender < recipient {
            let (head, tail) = self.accounts.split_at_mut(recipient);
            (&mut head[sender], &mut tail[0])
        } else {
            let (head, tail) = self.accounts.split_at_mut(sender);
            (&mut tail[0], &mut head[recipient])
        };
        sender.transfer(amount, recipient)
    }

    /// Credit interest and charge the monthly fee on every account
    pub fn apply_month_end(&mut self) {
        for account in &mut self.accounts {
            let interest = account.apply_interest();
            let fee = account.apply_fee();
            debug!(
                "Month end done, interest = {:?}, fee = {:?} (account = {})",
                interest,
                fee,
                account.account_number()
            );
        }
    }
}
