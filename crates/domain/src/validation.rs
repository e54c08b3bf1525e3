// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::types::{AgeInput, PassengerDetails};
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Date, Time};

/// Oldest accepted passenger age.
pub const MAX_PASSENGER_AGE: i64 = 150;

/// Largest van supported. Seat numbers are two digits.
pub const MAX_VAN_CAPACITY: i64 = 99;

const DATE_FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");
const TIME_FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[hour]:[minute]");
const TIME_FORMAT_WITH_SECONDS: &[BorrowedFormatItem<'_>] =
    format_description!("[hour]:[minute]:[second]");

fn required(field: &'static str, value: &str) -> Result<String, DomainError> {
    let trimmed: &str = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::MissingPassengerField { field });
    }
    Ok(trimmed.to_string())
}

/// Parses a passenger age from a number or a numeric string.
///
/// # Errors
///
/// Returns an error if the value is not an integer between 1 and 150.
pub fn parse_age(age: &AgeInput) -> Result<u8, DomainError> {
    let value: i64 = match age {
        AgeInput::Number(n) => *n,
        AgeInput::Text(s) => {
            let trimmed: &str = s.trim();
            if trimmed.is_empty() {
                return Err(DomainError::MissingPassengerField { field: "age" });
            }
            trimmed
                .parse::<i64>()
                .map_err(|_| DomainError::InvalidAge(format!("'{s}' is not a number")))?
        }
    };

    if !(1..=MAX_PASSENGER_AGE).contains(&value) {
        return Err(DomainError::InvalidAge(format!(
            "{value} is outside 1..={MAX_PASSENGER_AGE}"
        )));
    }

    u8::try_from(value).map_err(|e| DomainError::InvalidAge(e.to_string()))
}

/// Validates and normalizes passenger details.
///
/// All text fields are trimmed and must be non-empty.
///
/// # Errors
///
/// Returns an error naming the first missing or invalid field.
pub fn validate_passenger_details(
    name: &str,
    address: &str,
    age: &AgeInput,
    phone: &str,
    emergency_contact: &str,
) -> Result<PassengerDetails, DomainError> {
    Ok(PassengerDetails {
        name: required("passenger_name", name)?,
        address: required("address", address)?,
        age: parse_age(age)?,
        phone: required("phone", phone)?,
        emergency_contact: required("emergency_contact", emergency_contact)?,
    })
}

/// Normalizes a plate number to upper case.
///
/// # Errors
///
/// Returns an error if the plate is empty, longer than 16 characters, or
/// contains anything other than letters, digits, spaces and hyphens.
pub fn normalize_plate_number(raw: &str) -> Result<String, DomainError> {
    let plate: String = raw.trim().to_uppercase();
    if plate.is_empty() {
        return Err(DomainError::InvalidPlateNumber(String::from(
            "plate number is required",
        )));
    }
    if plate.len() > 16 {
        return Err(DomainError::InvalidPlateNumber(format!(
            "'{plate}' is longer than 16 characters"
        )));
    }
    if !plate
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == ' ' || c == '-')
    {
        return Err(DomainError::InvalidPlateNumber(format!(
            "'{plate}' contains invalid characters"
        )));
    }
    Ok(plate)
}

/// Validates a van model description.
///
/// # Errors
///
/// Returns an error if the model is blank.
pub fn validate_van_model(raw: &str) -> Result<String, DomainError> {
    let model: &str = raw.trim();
    if model.is_empty() {
        return Err(DomainError::InvalidVanModel(String::from(
            "model is required",
        )));
    }
    Ok(model.to_string())
}

/// Validates a van capacity.
///
/// # Errors
///
/// Returns an error if the capacity is outside 1..=99.
pub fn validate_capacity(capacity: i64) -> Result<u8, DomainError> {
    if !(1..=MAX_VAN_CAPACITY).contains(&capacity) {
        return Err(DomainError::InvalidCapacity { capacity });
    }
    u8::try_from(capacity).map_err(|_| DomainError::InvalidCapacity { capacity })
}

/// Returns the seat numbers of a van with the given capacity:
/// `"01"`, `"02"`, ... zero-padded to two digits.
#[must_use]
pub fn seat_numbers_for_capacity(capacity: u8) -> Vec<String> {
    (1..=capacity).map(|n| format!("{n:02}")).collect()
}

/// Validates route endpoints and derives the display name.
///
/// Returns `(origin, destination, name)`. When `name` is absent or blank it
/// defaults to `"<origin> - <destination>"`.
///
/// # Errors
///
/// Returns an error if either endpoint is blank or both name the same place.
pub fn validate_route_fields(
    origin: &str,
    destination: &str,
    name: Option<&str>,
) -> Result<(String, String, String), DomainError> {
    let origin: &str = origin.trim();
    let destination: &str = destination.trim();
    if origin.is_empty() {
        return Err(DomainError::InvalidRoute(String::from(
            "origin is required",
        )));
    }
    if destination.is_empty() {
        return Err(DomainError::InvalidRoute(String::from(
            "destination is required",
        )));
    }
    if origin.eq_ignore_ascii_case(destination) {
        return Err(DomainError::InvalidRoute(format!(
            "origin and destination are both '{origin}'"
        )));
    }

    let name: String = name
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map_or_else(|| format!("{origin} - {destination}"), ToString::to_string);

    Ok((origin.to_string(), destination.to_string(), name))
}

/// Normalizes optional driver details. Blank values become `None`.
///
/// # Errors
///
/// Returns an error if a phone number is given without a driver name.
pub fn normalize_driver(
    name: Option<&str>,
    phone: Option<&str>,
) -> Result<(Option<String>, Option<String>), DomainError> {
    let name: Option<String> = name
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string);
    let phone: Option<String> = phone
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string);

    if name.is_none() && phone.is_some() {
        return Err(DomainError::InvalidDriver(String::from(
            "driver phone given without a driver name",
        )));
    }
    Ok((name, phone))
}

/// Parses an ISO 8601 calendar date (`YYYY-MM-DD`).
///
/// # Errors
///
/// Returns an error if the string is not a valid date.
pub fn parse_trip_date(value: &str) -> Result<Date, DomainError> {
    Date::parse(value.trim(), DATE_FORMAT).map_err(|e| DomainError::DateParseError {
        date_string: value.to_string(),
        error: e.to_string(),
    })
}

/// Formats a date as `YYYY-MM-DD`.
#[must_use]
pub fn format_trip_date(date: Date) -> String {
    date.format(DATE_FORMAT)
        .unwrap_or_else(|_| date.to_string())
}

/// Parses a time of day as `HH:MM` or `HH:MM:SS`.
///
/// # Errors
///
/// Returns an error if the string is not a valid time.
pub fn parse_time_of_day(value: &str) -> Result<Time, DomainError> {
    let trimmed: &str = value.trim();
    Time::parse(trimmed, TIME_FORMAT)
        .or_else(|_| Time::parse(trimmed, TIME_FORMAT_WITH_SECONDS))
        .map_err(|e| DomainError::TimeParseError {
            time_string: value.to_string(),
            error: e.to_string(),
        })
}

/// Formats a time of day as `HH:MM`.
#[must_use]
pub fn format_time_of_day(time: Time) -> String {
    format!("{:02}:{:02}", time.hour(), time.minute())
}

/// Validates that an optional arrival time falls after departure.
///
/// # Errors
///
/// Returns an error if arrival is not strictly after departure.
pub fn validate_schedule(departure: Time, arrival: Option<Time>) -> Result<(), DomainError> {
    match arrival {
        Some(arrival) if arrival <= departure => Err(DomainError::ArrivalBeforeDeparture {
            departure: format_time_of_day(departure),
            arrival: format_time_of_day(arrival),
        }),
        _ => Ok(()),
    }
}
