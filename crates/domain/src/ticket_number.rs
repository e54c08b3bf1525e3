// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Ticket number format: `VT-YYYYMMDD-XXXXXXXX`.
//!
//! The date is the issuance date; the suffix is eight upper-case base-36
//! characters derived from caller-supplied entropy.

use time::Date;

/// Prefix shared by all ticket numbers.
pub const TICKET_NUMBER_PREFIX: &str = "VT";

/// Number of characters in the random suffix.
pub const TICKET_SUFFIX_LEN: usize = 8;

const ALPHABET: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Formats a ticket number from the issuance date and a random value.
#[must_use]
pub fn format_ticket_number(issued_on: Date, entropy: u64) -> String {
    let mut remaining: u64 = entropy;
    let mut suffix: String = String::with_capacity(TICKET_SUFFIX_LEN);
    for _ in 0..TICKET_SUFFIX_LEN {
        let index: usize = usize::try_from(remaining % 36).unwrap_or_default();
        suffix.push(char::from(ALPHABET[index]));
        remaining /= 36;
    }

    format!(
        "{TICKET_NUMBER_PREFIX}-{:04}{:02}{:02}-{suffix}",
        issued_on.year(),
        u8::from(issued_on.month()),
        issued_on.day()
    )
}

/// Returns true if `value` has the shape of a ticket number.
#[must_use]
pub fn is_well_formed_ticket_number(value: &str) -> bool {
    let mut parts = value.split('-');
    let (Some(prefix), Some(date), Some(suffix), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return false;
    };

    prefix == TICKET_NUMBER_PREFIX
        && date.len() == 8
        && date.bytes().all(|b| b.is_ascii_digit())
        && suffix.len() == TICKET_SUFFIX_LEN
        && suffix
            .bytes()
            .all(|b| b.is_ascii_digit() || b.is_ascii_uppercase())
}
