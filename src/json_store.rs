use anyhow::{Context, Result};
use log::info;
use std::{
    fs::File,
    io::{BufReader, BufWriter, ErrorKind, Write},
    path::Path,
};

use crate::account::{AccountRecord, BankAccount};

/// Write all accounts (with their full history) as a JSON array to the provided destination
pub fn write_accounts_json<'a>(
    destination: impl Write,
    accounts: impl IntoIterator<Item = &'a BankAccount>,
) -> Result<()> {
    let records: Vec<AccountRecord> = accounts.into_iter().map(BankAccount::to_record).collect();
    serde_json::to_writer(destination, &records)?;
    Ok(())
}

/// Read accounts from a JSON array as written by `write_accounts_json`
pub fn read_accounts_json(source: impl std::io::Read) -> Result<Vec<BankAccount>> {
    let records: Vec<AccountRecord> = serde_json::from_reader(source)?;
    records.into_iter().map(BankAccount::from_record).collect()
}

/// Save all accounts to `path`, replacing whatever the file held before
pub fn save_accounts<'a>(
    accounts: impl IntoIterator<Item = &'a BankAccount>,
    path: impl AsRef<Path>,
) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)
        .with_context(|| format!("Cannot create ledger file (path = {})", path.display()))?;

    let mut writer = BufWriter::new(file);
    write_accounts_json(&mut writer, accounts)
        .with_context(|| format!("Cannot write ledger file (path = {})", path.display()))?;
    writer.flush()?;

    info!("Accounts saved (path = {})", path.display());
    Ok(())
}

/// Load all accounts from `path`
///
/// A missing file is a fresh ledger and yields no accounts, any other failure is an error.
pub fn load_accounts(path: impl AsRef<Path>) -> Result<Vec<BankAccount>> {
    let path = path.as_ref();
    let file = match File::open(path) {
        Ok(file) => file,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            info!("No saved accounts found (path = {})", path.display());
            return Ok(Vec::new());
        }
        Err(err) => {
            return Err(err)
                .with_context(|| format!("Cannot open ledger file (path = {})", path.display()))
        }
    };

    let accounts = read_accounts_json(BufReader::new(file))
        .with_context(|| format!("Cannot parse ledger file (path = {})", path.display()))?;
    info!(
        "{} accounts loaded (path = {})",
        accounts.len(),
        path.display()
    );
    Ok(accounts)
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::account::AccountNumberSequence;
    use crate::types::{AccountType, Amount, TransactionKind};
    use rust_decimal_macros::dec;

    const SAMPLE: &str = r#"[
  {
    "account_number": 1001,
    "owner": "Alice",
    "account_type": "Savings",
    "balance": 1230.0,
    "transactions": [
      {"date": "2024-01-01 12:00:00", "type": "Deposit", "amount": 200, "balance_after": 1200.0}
    ],
    "interest_rate": 0.01,
    "fee": 0,
    "pin": 4821
  }
]"#;

    fn sample_accounts() -> Vec<BankAccount> {
        let mut sequence = AccountNumberSequence::default();
        let mut alice =
            BankAccount::open(&mut sequence, "Alice", dec!(1000), AccountType::Savings).unwrap();
        let mut bob =
            BankAccount::open(&mut sequence, "Bob", dec!(500), AccountType::Checking).unwrap();
        let carol =
            BankAccount::open(&mut sequence, "Carol", dec!(0.5), AccountType::from("Joint"))
                .unwrap();

        alice.deposit(dec!(200)).unwrap();
        bob.withdraw(dec!(100)).unwrap();
        alice.transfer(dec!(300), &mut bob).unwrap();
        alice.apply_interest();
        bob.apply_fee();

        vec![alice, bob, carol]
    }

    #[test]
    fn read_documented_layout() {
        let accounts = read_accounts_json(SAMPLE.as_bytes()).unwrap();
        assert_eq!(accounts.len(), 1);

        let account = &accounts[0];
        assert_eq!(account.account_number(), 1001);
        assert_eq!(account.owner(), "Alice");
        assert_eq!(account.account_type(), &AccountType::Savings);
        assert_eq!(account.balance(), dec!(1230));
        assert_eq!(account.interest_rate(), dec!(0.01));
        assert_eq!(account.fee(), Amount::ZERO);
        assert_eq!(account.pin().value(), 4821);

        let transaction = &account.transactions()[0];
        assert_eq!(transaction.kind(), TransactionKind::Deposit);
        assert_eq!(transaction.amount(), dec!(200));
        assert_eq!(transaction.balance_after(), dec!(1200));
        assert_eq!(transaction.timestamp().to_string(), "2024-01-01 12:00:00");
    }

    #[test]
    fn reject_bad_date() {
        let broken = SAMPLE.replace("2024-01-01 12:00:00", "2024-01-01T12:00:00Z");
        read_accounts_json(broken.as_bytes()).unwrap_err();
    }

    #[test]
    fn reject_missing_key() {
        let broken = SAMPLE.replace(r#""pin": 4821"#, r#""code": 4821"#);
        read_accounts_json(broken.as_bytes()).unwrap_err();
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("accounts.json");
        let accounts = sample_accounts();

        save_accounts(&accounts, &path).unwrap();
        let loaded = load_accounts(&path).unwrap();

        assert_eq!(loaded, accounts);
    }

    #[test]
    fn compounded_interest_survives_save() {
        let mut sequence = AccountNumberSequence::default();
        let mut account =
            BankAccount::open(&mut sequence, "Alice", dec!(1234.57), AccountType::Savings)
                .unwrap();
        for _ in 0..8 {
            account.apply_interest().unwrap();
        }
        assert_eq!(account.balance().scale(), 18);

        let mut buffer = vec![];
        write_accounts_json(&mut buffer, vec![&account]).unwrap();
        let loaded = read_accounts_json(&buffer[..]).unwrap();

        assert_eq!(loaded, vec![account.clone()]);
        assert_eq!(loaded[0].balance().to_string(), account.balance().to_string());
        for (restored, original) in loaded[0].statement().zip(account.statement()) {
            assert_eq!(restored.amount().to_string(), original.amount().to_string());
            assert_eq!(
                restored.balance_after().to_string(),
                original.balance_after().to_string()
            );
        }
    }

    #[test]
    fn save_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("accounts.json");
        let accounts = sample_accounts();

        save_accounts(&accounts, &path).unwrap();
        save_accounts(&accounts[..1], &path).unwrap();

        let loaded = load_accounts(&path).unwrap();
        assert_eq!(loaded, accounts[..1].to_vec());
    }

    #[test]
    fn load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = load_accounts(dir.path().join("nothing-here.json")).unwrap();
        assert!(loaded.is_empty());
    }

    #[test]
    fn load_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("accounts.json");
        std::fs::write(&path, "not json").unwrap();

        load_accounts(&path).unwrap_err();
    }
}
