use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime, SubsecRound};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

pub type AccountNumber = u32;

pub type Amount = Decimal;

/// The only accepted textual layout of a ledger timestamp
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// The flavour of an account, which decides its interest rate and monthly fee
///
/// Any string is a valid account type, unknown ones simply earn no interest and pay no fee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AccountType {
    Checking,
    Savings,
    Business,
    Other(String),
}

impl AccountType {
    pub fn as_str(&self) -> &str {
        match self {
            AccountType::Checking => "Checking",
            AccountType::Savings => "Savings",
            AccountType::Business => "Business",
            AccountType::Other(name) => name,
        }
    }

    /// Yearly rate credited by `apply_interest`, fixed when the account is opened
    pub fn interest_rate(&self) -> Amount {
        match self {
            AccountType::Savings => Decimal::new(1, 2),
            _ => Amount::ZERO,
        }
    }

    /// Flat amount charged by `apply_fee`, fixed when the account is opened
    pub fn monthly_fee(&self) -> Amount {
        match self {
            AccountType::Checking | AccountType::Business => Decimal::new(5, 0),
            _ => Amount::ZERO,
        }
    }
}

impl Default for AccountType {
    fn default() -> Self {
        AccountType::Checking
    }
}

impl From<&str> for AccountType {
    fn from(name: &str) -> Self {
        match name {
            "Checking" => AccountType::Checking,
            "Savings" => AccountType::Savings,
            "Business" => AccountType::Business,
            other => AccountType::Other(other.to_owned()),
        }
    }
}

impl From<String> for AccountType {
    fn from(name: String) -> Self {
        match AccountType::from(name.as_str()) {
            AccountType::Other(_) => AccountType::Other(name),
            known => known,
        }
    }
}

impl From<AccountType> for String {
    fn from(account_type: AccountType) -> Self {
        match account_type {
            AccountType::Other(name) => name,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The different ledger events as labelled in the saved ledger file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionKind {
    Deposit,
    Withdraw,
    #[serde(rename = "Transfer Out", alias = "TransferOut")]
    TransferOut,
    #[serde(rename = "Transfer In", alias = "TransferIn")]
    TransferIn,
    Interest,
    #[serde(rename = "Monthly Fee", alias = "MonthlyFee")]
    MonthlyFee,
}

impl TransactionKind {
    pub fn label(self) -> &'static str {
        match self {
            TransactionKind::Deposit => "Deposit",
            TransactionKind::Withdraw => "Withdraw",
            TransactionKind::TransferOut => "Transfer Out",
            TransactionKind::TransferIn => "Transfer In",
            TransactionKind::Interest => "Interest",
            TransactionKind::MonthlyFee => "Monthly Fee",
        }
    }

    /// Whether the event adds to (rather than takes from) the balance
    pub fn is_credit(self) -> bool {
        matches!(
            self,
            TransactionKind::Deposit | TransactionKind::TransferIn | TransactionKind::Interest
        )
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A point in time with second precision
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(NaiveDateTime);

impl Timestamp {
    pub fn now() -> Self {
        Local::now().naive_local().into()
    }

    pub fn as_datetime(&self) -> NaiveDateTime {
        self.0
    }
}

impl From<NaiveDateTime> for Timestamp {
    fn from(datetime: NaiveDateTime) -> Self {
        Self(datetime.trunc_subsecs(0))
    }
}

impl FromStr for Timestamp {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let datetime = NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT)
            .with_context(|| format!("Malformed timestamp (date = {:?})", s))?;
        Ok(Self(datetime))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(TIMESTAMP_FORMAT))
    }
}

/// A four digit personal identification number
///
/// Stored with every account but not checked by any ledger operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pin(u16);

impl Pin {
    pub const MIN: u16 = 1000;
    pub const MAX: u16 = 9999;

    pub fn generate(rng: &mut impl rand::Rng) -> Self {
        Self(rng.gen_range(Self::MIN..=Self::MAX))
    }

    pub fn value(self) -> u16 {
        self.0
    }
}

impl From<u16> for Pin {
    fn from(value: u16) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::NaiveDate;
    use rand::{rngs::StdRng, SeedableRng};
    use rust_decimal_macros::dec;

    #[test]
    fn rates_and_fees_by_type() {
        assert_eq!(AccountType::Savings.interest_rate(), dec!(0.01));
        assert_eq!(AccountType::Savings.monthly_fee(), Amount::ZERO);
        assert_eq!(AccountType::Checking.interest_rate(), Amount::ZERO);
        assert_eq!(AccountType::Checking.monthly_fee(), dec!(5));
        assert_eq!(AccountType::Business.monthly_fee(), dec!(5));

        let other = AccountType::from("Brokerage");
        assert_eq!(other, AccountType::Other("Brokerage".to_owned()));
        assert_eq!(other.interest_rate(), Amount::ZERO);
        assert_eq!(other.monthly_fee(), Amount::ZERO);
    }

    #[test]
    fn account_type_is_a_plain_string_in_json() {
        let json = serde_json::to_string(&AccountType::Savings).unwrap();
        assert_eq!(json, r#""Savings""#);

        let parsed: AccountType = serde_json::from_str(r#""Joint""#).unwrap();
        assert_eq!(parsed.as_str(), "Joint");
    }

    #[test]
    fn kind_labels() {
        let json = serde_json::to_string(&TransactionKind::MonthlyFee).unwrap();
        assert_eq!(json, r#""Monthly Fee""#);

        let parsed: TransactionKind = serde_json::from_str(r#""TransferOut""#).unwrap();
        assert_eq!(parsed, TransactionKind::TransferOut);
        let parsed: TransactionKind = serde_json::from_str(r#""Transfer In""#).unwrap();
        assert_eq!(parsed, TransactionKind::TransferIn);

        serde_json::from_str::<TransactionKind>(r#""Refund""#).unwrap_err();
    }

    #[test]
    fn timestamp_format() {
        let timestamp: Timestamp = "2024-01-01 12:00:00".parse().unwrap();
        assert_eq!(timestamp.to_string(), "2024-01-01 12:00:00");

        "2024-01-01T12:00:00".parse::<Timestamp>().unwrap_err();
        "2024-01-01 12:00".parse::<Timestamp>().unwrap_err();
        "2024-01-01 12:00:00.5".parse::<Timestamp>().unwrap_err();
    }

    #[test]
    fn timestamp_drops_subseconds() {
        let datetime = NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_milli_opt(8, 30, 15, 999)
            .unwrap();
        let timestamp = Timestamp::from(datetime);
        assert_eq!(timestamp.to_string(), "2024-03-05 08:30:15");
        assert_eq!(timestamp, "2024-03-05 08:30:15".parse().unwrap());
    }

    #[test]
    fn pin_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let pin = Pin::generate(&mut rng).value();
            assert!((Pin::MIN..=Pin::MAX).contains(&pin));
        }
    }
}
