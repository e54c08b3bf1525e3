// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;

/// Passenger classification used for fare computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PassengerType {
    /// Full fare.
    Regular,
    /// Discounted.
    Student,
    /// Person with disability. Discounted.
    Pwd,
    /// Discounted.
    SeniorCitizen,
}

impl PassengerType {
    /// All classifications in display order.
    pub const ALL: [Self; 4] = [Self::Regular, Self::Student, Self::Pwd, Self::SeniorCitizen];

    /// Returns the wire representation of the classification.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Regular => "REGULAR",
            Self::Student => "STUDENT",
            Self::Pwd => "PWD",
            Self::SeniorCitizen => "SENIOR_CITIZEN",
        }
    }

    /// Returns true if this classification receives the statutory discount.
    #[must_use]
    pub const fn is_discounted(&self) -> bool {
        matches!(self, Self::Student | Self::Pwd | Self::SeniorCitizen)
    }
}

impl FromStr for PassengerType {
    type Err = DomainError;

    /// Parses a classification, accepting any letter case and spaces or
    /// hyphens in place of underscores. Anything else is rejected rather
    /// than falling back to the regular fare.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s.trim().to_uppercase().replace([' ', '-'], "_");
        match normalized.as_str() {
            "REGULAR" => Ok(Self::Regular),
            "STUDENT" => Ok(Self::Student),
            "PWD" => Ok(Self::Pwd),
            "SENIOR_CITIZEN" => Ok(Self::SeniorCitizen),
            _ => Err(DomainError::InvalidPassengerType(s.to_string())),
        }
    }
}

impl std::fmt::Display for PassengerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Operational status of a van.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VanStatus {
    /// In service; trips may be scheduled.
    #[default]
    Active,
    /// Temporarily out of service.
    Maintenance,
    /// Retired.
    Inactive,
}

impl VanStatus {
    /// Returns the persisted representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Maintenance => "MAINTENANCE",
            Self::Inactive => "INACTIVE",
        }
    }
}

impl FromStr for VanStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "ACTIVE" => Ok(Self::Active),
            "MAINTENANCE" => Ok(Self::Maintenance),
            "INACTIVE" => Ok(Self::Inactive),
            _ => Err(DomainError::InvalidVanStatus {
                status: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for VanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A monetary amount held in minor units (centavos).
///
/// Rendered and serialized with exactly two decimals, e.g. `"170.00"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money(i64);

impl Money {
    /// Zero.
    pub const ZERO: Self = Self(0);

    /// Creates an amount from minor units.
    #[must_use]
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Creates an amount from whole units.
    #[must_use]
    pub const fn from_units(units: i64) -> Self {
        Self(units * 100)
    }

    /// Returns the amount in minor units.
    #[must_use]
    pub const fn cents(&self) -> i64 {
        self.0
    }
}

impl std::ops::Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl std::ops::Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign: &str = if self.0 < 0 { "-" } else { "" };
        let abs: u64 = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

impl FromStr for Money {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed: &str = s.trim();
        let (negative, digits) = trimmed
            .strip_prefix('-')
            .map_or((false, trimmed), |rest| (true, rest));
        let (whole, fraction) = digits.split_once('.').unwrap_or((digits, ""));
        if whole.is_empty() || fraction.len() > 2 {
            return Err(format!("'{s}' is not a two-decimal amount"));
        }
        let whole: i64 = whole
            .parse()
            .map_err(|e| format!("'{s}' is not a two-decimal amount: {e}"))?;
        let fraction: i64 = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<i64>().map_err(|e| e.to_string())? * 10,
            _ => fraction.parse::<i64>().map_err(|e| e.to_string())?,
        };
        let cents: i64 = whole * 100 + fraction;
        Ok(Self(if negative { -cents } else { cents }))
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw: String = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Payment channel recorded on a ticket (e.g. `CASH`, `GCASH`).
///
/// Stored uppercased. The set of channels is open-ended.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PaymentMethod(String);

impl PaymentMethod {
    /// Longest accepted method name.
    pub const MAX_LEN: usize = 32;

    /// Returns the normalized method name.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.0
    }
}

impl FromStr for PaymentMethod {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s.trim().to_uppercase();
        if normalized.is_empty() {
            return Err(DomainError::InvalidPaymentMethod(String::from(
                "payment method is required",
            )));
        }
        if normalized.len() > Self::MAX_LEN {
            return Err(DomainError::InvalidPaymentMethod(format!(
                "payment method must be at most {} characters",
                Self::MAX_LEN
            )));
        }
        Ok(Self(normalized))
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Passenger age as received from a form: either a JSON number or a
/// numeric string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AgeInput {
    /// A JSON number.
    Number(i64),
    /// A string that should contain a number.
    Text(String),
}

/// Validated passenger details captured on a ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassengerDetails {
    pub name: String,
    pub address: String,
    pub age: u8,
    pub phone: String,
    pub emergency_contact: String,
}
