// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(pub u64);

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Whether money came in (`Credit`) or went out (`Debit`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxKind {
    Credit,
    Debit,
}

impl TxKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TxKind::Credit => "credit",
            TxKind::Debit => "debit",
        }
    }

    /// The contribution of `amount` to a running balance.
    pub fn signed(&self, amount: Decimal) -> Decimal {
        match self {
            TxKind::Credit => amount,
            TxKind::Debit => -amount,
        }
    }
}

impl fmt::Display for TxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TxKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "credit" => Ok(TxKind::Credit),
            "debit" => Ok(TxKind::Debit),
            other => Err(Error::Validation(format!(
                "unknown transaction type '{}', expected credit or debit",
                other
            ))),
        }
    }
}

/// The fixed category set every transaction is filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Salary,
    Bills,
    Food,
    Transportation,
    Shopping,
    Entertainment,
    Healthcare,
    Investment,
    Others,
}

impl Category {
    pub const ALL: &'static [Category] = &[
        Category::Salary,
        Category::Bills,
        Category::Food,
        Category::Transportation,
        Category::Shopping,
        Category::Entertainment,
        Category::Healthcare,
        Category::Investment,
        Category::Others,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Salary => "Salary",
            Category::Bills => "Bills",
            Category::Food => "Food",
            Category::Transportation => "Transportation",
            Category::Shopping => "Shopping",
            Category::Entertainment => "Entertainment",
            Category::Healthcare => "Healthcare",
            Category::Investment => "Investment",
            Category::Others => "Others",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| Error::UnknownCategory(wanted.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    #[serde(rename = "type")]
    pub kind: TxKind,
    pub amount: Decimal,
    pub description: String,
    pub category: Category,
    #[serde(deserialize_with = "wire_date")]
    pub date: NaiveDate,
}

impl Transaction {
    pub fn signed_amount(&self) -> Decimal {
        self.kind.signed(self.amount)
    }

    /// Reject a record whose amount is negative.
    pub fn check(&self) -> Result<(), Error> {
        if self.amount < Decimal::ZERO {
            return Err(Error::Validation(format!(
                "transaction {} has negative amount {}",
                self.id, self.amount
            )));
        }
        Ok(())
    }
}

/// Check every record in `records` and that no id appears twice.
pub fn check_batch(records: &[Transaction]) -> Result<(), Error> {
    let mut seen = HashSet::with_capacity(records.len());
    for tx in records {
        tx.check()?;
        if !seen.insert(tx.id) {
            return Err(Error::Validation(format!(
                "duplicate transaction id {}",
                tx.id
            )));
        }
    }
    Ok(())
}

/// Parse a record date: either `YYYY-MM-DD` or an RFC 3339 timestamp, which
/// is reduced to its UTC calendar date.
pub fn parse_wire_date(raw: &str) -> Result<NaiveDate, Error> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| {
            DateTime::parse_from_rfc3339(raw).map(|dt| dt.with_timezone(&Utc).date_naive())
        })
        .map_err(|_| Error::Validation(format!("invalid date '{}'", raw)))
}

fn wire_date<'de, D: Deserializer<'de>>(de: D) -> Result<NaiveDate, D::Error> {
    let raw = String::deserialize(de)?;
    parse_wire_date(&raw).map_err(serde::de::Error::custom)
}

/// A validated transaction that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTransaction {
    #[serde(rename = "type")]
    pub kind: TxKind,
    pub amount: Decimal,
    pub description: String,
    pub category: Category,
    pub date: NaiveDate,
}

impl NewTransaction {
    pub fn with_id(self, id: TransactionId) -> Transaction {
        Transaction {
            id,
            kind: self.kind,
            amount: self.amount,
            description: self.description,
            category: self.category,
            date: self.date,
        }
    }
}

/// Raw add-transaction form input, exactly as typed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionDraft {
    pub kind: String,
    pub amount: String,
    pub description: String,
    pub category: String,
    pub date: String,
}

impl TransactionDraft {
    /// Validate the form into a [`NewTransaction`].
    ///
    /// Amount and description must be non-empty, the amount must be a
    /// non-negative decimal, the category must be known and the date must be
    /// `YYYY-MM-DD`.
    pub fn validate(&self) -> Result<NewTransaction, Error> {
        let amount_raw = self.amount.trim();
        if amount_raw.is_empty() {
            return Err(Error::Validation("amount is required".into()));
        }
        let description = self.description.trim();
        if description.is_empty() {
            return Err(Error::Validation("description is required".into()));
        }
        let amount = amount_raw
            .parse::<Decimal>()
            .map_err(|_| Error::Validation(format!("invalid amount '{}'", amount_raw)))?;
        if amount < Decimal::ZERO {
            return Err(Error::Validation(format!(
                "amount must not be negative, got {}",
                amount
            )));
        }
        let kind = self.kind.parse::<TxKind>()?;
        let category = self.category.parse::<Category>()?;
        let date_raw = self.date.trim();
        let date = NaiveDate::parse_from_str(date_raw, "%Y-%m-%d").map_err(|_| {
            Error::Validation(format!("invalid date '{}', expected YYYY-MM-DD", date_raw))
        })?;

        Ok(NewTransaction {
            kind,
            amount,
            description: description.to_string(),
            category,
            date,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PolicyStatus {
    #[serde(alias = "active", alias = "ACTIVE")]
    Active,
    #[serde(alias = "lapsed", alias = "LAPSED")]
    Lapsed,
    #[serde(alias = "expired", alias = "EXPIRED")]
    Expired,
    #[serde(alias = "cancelled", alias = "CANCELLED")]
    Cancelled,
}

impl fmt::Display for PolicyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PolicyStatus::Active => "Active",
            PolicyStatus::Lapsed => "Lapsed",
            PolicyStatus::Expired => "Expired",
            PolicyStatus::Cancelled => "Cancelled",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Policy {
    pub id: u64,
    #[serde(rename = "type")]
    pub policy_type: String,
    pub provider: String,
    pub status: PolicyStatus,
    pub premium: Decimal,
    pub coverage: Decimal,
    pub expiry_date: NaiveDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    #[serde(alias = "low", alias = "LOW")]
    Low,
    #[serde(alias = "medium", alias = "MEDIUM")]
    Medium,
    #[serde(alias = "high", alias = "HIGH")]
    High,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Portfolio {
    pub id: u64,
    pub name: String,
    #[serde(rename = "type")]
    pub portfolio_type: String,
    pub value: Decimal,
    pub returns: Decimal, // percent
    pub risk: RiskLevel,
    pub last_updated: NaiveDate,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> TransactionDraft {
        TransactionDraft {
            kind: "debit".into(),
            amount: "1500.50".into(),
            description: " Groceries ".into(),
            category: "food".into(),
            date: "2024-02-10".into(),
        }
    }

    #[test]
    fn draft_validates_and_trims() {
        let new = draft().validate().unwrap();
        assert_eq!(new.kind, TxKind::Debit);
        assert_eq!(new.amount, "1500.50".parse::<Decimal>().unwrap());
        assert_eq!(new.description, "Groceries");
        assert_eq!(new.category, Category::Food);
        assert_eq!(new.date, NaiveDate::from_ymd_opt(2024, 2, 10).unwrap());
    }

    #[test]
    fn draft_rejects_missing_amount_and_description() {
        let mut d = draft();
        d.amount = "  ".into();
        assert_eq!(
            d.validate().unwrap_err(),
            Error::Validation("amount is required".into())
        );

        let mut d = draft();
        d.description = String::new();
        assert_eq!(
            d.validate().unwrap_err(),
            Error::Validation("description is required".into())
        );
    }

    #[test]
    fn draft_accepts_zero_but_not_negative_amounts() {
        let mut d = draft();
        d.amount = "0".into();
        assert!(d.validate().is_ok());

        d.amount = "-5".into();
        assert!(matches!(d.validate(), Err(Error::Validation(_))));
    }

    #[test]
    fn draft_rejects_unknown_category() {
        let mut d = draft();
        d.category = "Gambling".into();
        assert_eq!(
            d.validate().unwrap_err(),
            Error::UnknownCategory("Gambling".into())
        );
    }

    #[test]
    fn transaction_uses_type_on_the_wire() {
        let json = r#"{"id":7,"type":"credit","amount":50000,"description":"Salary","category":"Salary","date":"2024-02-15"}"#;
        let tx: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(tx.id, TransactionId(7));
        assert_eq!(tx.kind, TxKind::Credit);
        assert_eq!(tx.signed_amount(), Decimal::from(50000));

        let back = serde_json::to_value(&tx).unwrap();
        assert_eq!(back["type"], "credit");
    }

    #[test]
    fn transaction_date_accepts_iso_timestamps() {
        let json = r#"{"id":8,"type":"debit","amount":"250","description":"Bus","category":"Transportation","date":"2024-02-18T00:00:00.000Z"}"#;
        let tx: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(tx.date, NaiveDate::from_ymd_opt(2024, 2, 18).unwrap());
        assert_eq!(serde_json::to_value(&tx).unwrap()["date"], "2024-02-18");

        assert_eq!(
            parse_wire_date("2024-02-18T23:30:00-02:00").unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 19).unwrap()
        );
        assert!(parse_wire_date("18/02/2024").is_err());
    }

    #[test]
    fn batch_check_rejects_negative_amounts_and_repeated_ids() {
        let tx = |id: u64, amount: i64| Transaction {
            id: TransactionId(id),
            kind: TxKind::Debit,
            amount: Decimal::from(amount),
            description: "Rent".into(),
            category: Category::Bills,
            date: NaiveDate::from_ymd_opt(2024, 2, 14).unwrap(),
        };
        assert!(check_batch(&[tx(1, 10), tx(2, 0)]).is_ok());
        assert_eq!(
            check_batch(&[tx(1, 10), tx(2, -5)]).unwrap_err(),
            Error::Validation("transaction 2 has negative amount -5".into())
        );
        assert_eq!(
            check_batch(&[tx(4, 10), tx(4, 20)]).unwrap_err(),
            Error::Validation("duplicate transaction id 4".into())
        );
    }

    #[test]
    fn portfolio_risk_is_case_insensitive() {
        let json = r#"{"id":1,"name":"Growth","type":"Stocks","value":1500000,"returns":"12.5","risk":"high","lastUpdated":"2024-02-15"}"#;
        let p: Portfolio = serde_json::from_str(json).unwrap();
        assert_eq!(p.risk, RiskLevel::High);
        assert_eq!(p.returns, "12.5".parse::<Decimal>().unwrap());
    }
}
