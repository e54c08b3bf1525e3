// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Passenger classification is not one of the known values.
    InvalidPassengerType(String),
    /// A required passenger field is missing or blank.
    MissingPassengerField {
        /// The name of the field.
        field: &'static str,
    },
    /// Passenger age is not a positive number.
    InvalidAge(String),
    /// Payment method is empty or invalid.
    InvalidPaymentMethod(String),
    /// Ticket status string is not recognized.
    InvalidTicketStatus {
        /// The status string that failed to parse.
        status: String,
    },
    /// Payment status string is not recognized.
    InvalidPaymentStatus {
        /// The status string that failed to parse.
        status: String,
    },
    /// Trip status string is not recognized.
    InvalidTripStatus {
        /// The status string that failed to parse.
        status: String,
    },
    /// Van status string is not recognized.
    InvalidVanStatus {
        /// The status string that failed to parse.
        status: String,
    },
    /// A status transition is not permitted by the lifecycle rules.
    InvalidStatusTransition {
        /// Which status axis was being changed (ticket, payment, trip).
        axis: &'static str,
        /// The current status.
        from: String,
        /// The requested status.
        to: String,
        /// Why the transition was rejected.
        reason: String,
    },
    /// A status update was requested that changes nothing.
    NoStatusChange,
    /// An explicit payment status was supplied on a self-service issuance.
    PaymentStatusOverrideNotAllowed,
    /// Van capacity is outside the supported range.
    InvalidCapacity {
        /// The rejected capacity.
        capacity: i64,
    },
    /// Plate number is empty or malformed.
    InvalidPlateNumber(String),
    /// Van model is empty.
    InvalidVanModel(String),
    /// Route fields are empty or inconsistent.
    InvalidRoute(String),
    /// Driver details are malformed.
    InvalidDriver(String),
    /// A date string could not be parsed.
    DateParseError {
        /// The input that failed to parse.
        date_string: String,
        /// The parser error.
        error: String,
    },
    /// A time-of-day string could not be parsed.
    TimeParseError {
        /// The input that failed to parse.
        time_string: String,
        /// The parser error.
        error: String,
    },
    /// Arrival time is not after departure time.
    ArrivalBeforeDeparture {
        /// Departure time as supplied.
        departure: String,
        /// Arrival time as supplied.
        arrival: String,
    },
    /// Tickets cannot be issued for the trip in its current status.
    TripNotBookable {
        /// The trip identifier.
        trip_id: i64,
        /// The trip's current status.
        status: String,
    },
    /// Trips can only be scheduled on active vans.
    VanNotActive {
        /// The van identifier.
        van_id: i64,
        /// The van's current status.
        status: String,
    },
    /// The seat is already held by a live ticket.
    SeatUnavailable {
        /// The seat number.
        seat_number: String,
        /// Current occupancy of the seat.
        occupancy: String,
    },
    /// The seat does not belong to the trip's van.
    SeatNotOnTrip {
        /// The seat identifier.
        seat_id: i64,
        /// The trip identifier.
        trip_id: i64,
    },
    /// A QR payload could not be serialized.
    QrPayloadError(String),
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPassengerType(value) => write!(
                f,
                "Invalid passenger type '{value}': expected REGULAR, STUDENT, PWD or SENIOR_CITIZEN"
            ),
            Self::MissingPassengerField { field } => {
                write!(f, "Passenger field '{field}' is required")
            }
            Self::InvalidAge(msg) => write!(f, "Invalid age: {msg}"),
            Self::InvalidPaymentMethod(msg) => write!(f, "Invalid payment method: {msg}"),
            Self::InvalidTicketStatus { status } => write!(f, "Invalid ticket status: {status}"),
            Self::InvalidPaymentStatus { status } => {
                write!(f, "Invalid payment status: {status}")
            }
            Self::InvalidTripStatus { status } => write!(f, "Invalid trip status: {status}"),
            Self::InvalidVanStatus { status } => write!(f, "Invalid van status: {status}"),
            Self::InvalidStatusTransition {
                axis,
                from,
                to,
                reason,
            } => write!(
                f,
                "Invalid {axis} status transition from {from} to {to}: {reason}"
            ),
            Self::NoStatusChange => write!(f, "Status update does not change anything"),
            Self::PaymentStatusOverrideNotAllowed => write!(
                f,
                "Payment status can only be set explicitly on staff-assisted issuance"
            ),
            Self::InvalidCapacity { capacity } => {
                write!(f, "Invalid van capacity {capacity}: must be between 1 and 99")
            }
            Self::InvalidPlateNumber(msg) => write!(f, "Invalid plate number: {msg}"),
            Self::InvalidVanModel(msg) => write!(f, "Invalid van model: {msg}"),
            Self::InvalidRoute(msg) => write!(f, "Invalid route: {msg}"),
            Self::InvalidDriver(msg) => write!(f, "Invalid driver details: {msg}"),
            Self::DateParseError { date_string, error } => {
                write!(f, "Failed to parse date '{date_string}': {error}")
            }
            Self::TimeParseError { time_string, error } => {
                write!(f, "Failed to parse time '{time_string}': {error}")
            }
            Self::ArrivalBeforeDeparture { departure, arrival } => write!(
                f,
                "Arrival time {arrival} must be after departure time {departure}"
            ),
            Self::TripNotBookable { trip_id, status } => write!(
                f,
                "Trip {trip_id} is {status} and no longer accepts bookings"
            ),
            Self::VanNotActive { van_id, status } => {
                write!(f, "Van {van_id} is {status}; trips require an ACTIVE van")
            }
            Self::SeatUnavailable {
                seat_number,
                occupancy,
            } => write!(f, "Seat {seat_number} is not available ({occupancy})"),
            Self::SeatNotOnTrip { seat_id, trip_id } => {
                write!(f, "Seat {seat_id} does not belong to the van of trip {trip_id}")
            }
            Self::QrPayloadError(msg) => write!(f, "Failed to build QR payload: {msg}"),
        }
    }
}

impl std::error::Error for DomainError {}
