use anyhow::Result;
use csv;
use serde::{ser::SerializeStruct, Serialize, Serializer};

use crate::account::BankAccount;
use crate::transaction::Transaction;

/// One line of the account overview
struct AccountSummary<'a>(&'a BankAccount);

impl Serialize for AccountSummary<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let account = self.0;
        let mut state = serializer.serialize_struct("AccountSummary", 5)?;
        state.serialize_field("account_number", &account.account_number())?;
        state.serialize_field("owner", account.owner())?;
        state.serialize_field("account_type", account.account_type().as_str())?;
        state.serialize_field("balance", &account.balance())?;
        state.serialize_field("transactions", &account.transactions().len())?;
        state.end()
    }
}

/// One line of an account statement
struct StatementLine<'a>(&'a Transaction);

impl Serialize for StatementLine<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let transaction = self.0;
        let mut state = serializer.serialize_struct("StatementLine", 4)?;
        state.serialize_field("date", &transaction.timestamp().to_string())?;
        state.serialize_field("type", transaction.kind().label())?;
        state.serialize_field("amount", &transaction.amount())?;
        state.serialize_field("balance_after", &transaction.balance_after())?;
        state.end()
    }
}

/// Write an overview of all accounts to the provided destination (in CSV format)
pub fn write_accounts<'a>(
    destination: &mut dyn std::io::Write,
    accounts: impl IntoIterator<Item = &'a BankAccount>,
) -> Result<()> {
    let mut writer = csv::WriterBuilder::new().from_writer(destination);

    for account in accounts {
        writer.serialize(AccountSummary(account))?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the statement (all transactions, oldest first) of one account (in CSV format)
pub fn write_statement(destination: &mut dyn std::io::Write, account: &BankAccount) -> Result<()> {
    let mut writer = csv::WriterBuilder::new().from_writer(destination);

    for transaction in account.statement() {
        writer.serialize(StatementLine(transaction))?;
    }
    writer.flush()?;
    Ok(())
}
