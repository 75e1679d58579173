#![forbid(unsafe_code)]

use anyhow::Result;
use log::warn;
use std::io::Write;

use bank_ledger::{
    csv_writer::{write_accounts, write_statement},
    AccountType, Amount, Bank,
};

const DEFAULT_LEDGER_FILE: &str = "accounts.json";

fn main() -> Result<()> {
    pretty_env_logger::init();

    let path = std::env::args()
        .nth(1) // skip executable name
        .unwrap_or_else(|| DEFAULT_LEDGER_FILE.to_owned());

    let mut bank = Bank::load(&path)?;

    let alice = bank.open_account("Alice", Amount::from(1000), AccountType::Savings)?;
    let bob = bank.open_account("Bob", Amount::from(500), AccountType::Checking)?;

    let results = vec![
        bank.deposit(alice, Amount::from(200)),
        bank.withdraw(bob, Amount::from(100)),
        bank.transfer(alice, bob, Amount::from(300)),
    ];
    for err in results.into_iter().filter_map(|result| result.err()) {
        warn!("Demo operation rejected: {}", err);
    }

    bank.apply_month_end();

    let stdout = std::io::stdout();
    let mut stdout = stdout.lock();
    write_accounts(&mut stdout, &bank)?;
    for account in &bank {
        writeln!(stdout)?;
        writeln!(stdout, "Statement for account {}:", account.account_number())?;
        write_statement(&mut stdout, account)?;
    }

    bank.save(&path)?;

    Ok(())
}
