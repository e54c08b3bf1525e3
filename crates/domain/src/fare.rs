// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Fare computation.
//!
//! Every ticket carries the same base fare and transaction fee. Discounted
//! classifications (student, PWD, senior citizen) receive a flat discount.

use crate::types::{Money, PassengerType};
use serde::{Deserialize, Serialize};

/// Base fare for a single seat.
pub const REGULAR_FARE: Money = Money::from_units(200);

/// Processing fee added to every ticket.
pub const TRANSACTION_FEE: Money = Money::from_units(10);

/// Discount applied to discounted classifications.
pub const CLASSIFICATION_DISCOUNT: Money = Money::from_units(40);

/// Itemized fare for one ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FareBreakdown {
    pub regular_fare: Money,
    pub transaction_fee: Money,
    pub discount: Money,
    pub total_fare: Money,
}

/// Computes the fare for a passenger classification.
///
/// `total_fare = regular_fare - discount + transaction_fee`
#[must_use]
pub fn compute_fare(passenger_type: PassengerType) -> FareBreakdown {
    let discount: Money = if passenger_type.is_discounted() {
        CLASSIFICATION_DISCOUNT
    } else {
        Money::ZERO
    };

    FareBreakdown {
        regular_fare: REGULAR_FARE,
        transaction_fee: TRANSACTION_FEE,
        discount,
        total_fare: REGULAR_FARE - discount + TRANSACTION_FEE,
    }
}
