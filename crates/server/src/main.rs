// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

mod identity;
mod json;

use axum::{
    Json, Router,
    extract::{Path, Query, State as AxumState},
    http::{HeaderName, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, warn};
use vantrip_api::{
    ApiError, CreateTripRequest, DeletedResponse, FareQuoteResponse, IssueTicketRequest,
    IssueTicketResponse, ListRoutesResponse, ListSeatsResponse, ListTicketsResponse,
    ListTripsRequest, ListTripsResponse, ListVansResponse, QrSettings, RouteInfo, RouteRequest,
    SeatAvailabilityResponse, SeatMapResponse, TicketStatusHistoryResponse,
    TicketVerificationResponse, TripInfo, UpdateTicketStatusRequest, UpdateTicketStatusResponse,
    UpdateTripStatusRequest, UpdateVanStatusRequest, VanInfo, VanRequest,
};
use vantrip_domain::{DEFAULT_QR_SERVICE_URL, DEFAULT_QR_SIZE};
use vantrip_persistence::SqlitePersistence;

use crate::identity::AdminIdentity;
use crate::json::ApiJson;

/// Van Trip Server - HTTP server for van-trip ticketing
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long, env = "VANTRIP_DATABASE")]
    database: Option<String>,

    /// `MySQL`/`MariaDB` connection URL. Takes precedence over `--database`.
    #[cfg(feature = "mysql")]
    #[arg(long, env = "VANTRIP_MYSQL_URL")]
    mysql_url: Option<String>,

    /// Address to bind the server to
    #[arg(short, long, env = "VANTRIP_BIND", default_value = "127.0.0.1")]
    bind: String,

    /// Port to bind the server to
    #[arg(short, long, env = "VANTRIP_PORT", default_value_t = 3000)]
    port: u16,

    /// Base URL of the QR image rendering service
    #[arg(long, env = "VANTRIP_QR_SERVICE_URL", default_value = DEFAULT_QR_SERVICE_URL)]
    qr_service_url: String,

    /// Edge length of rendered QR images in pixels
    #[arg(long, env = "VANTRIP_QR_SIZE", default_value_t = DEFAULT_QR_SIZE)]
    qr_size: u16,

    /// Header carrying the login of the administrator authenticated upstream
    #[arg(long, env = "VANTRIP_IDENTITY_HEADER", default_value = "X-Authenticated-User")]
    identity_header: String,
}

/// Application state shared across handlers.
///
/// The persistence layer sits behind a Mutex; seat exclusivity itself is
/// enforced by the store, not by this lock.
#[derive(Clone)]
pub struct AppState {
    /// The persistence layer.
    persistence: Arc<Mutex<SqlitePersistence>>,
    /// Where QR images are rendered.
    qr: Arc<QrSettings>,
    /// Header carrying the admin identity.
    identity_header: HeaderName,
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
pub struct HttpError {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error message.
    pub message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match err {
            ApiError::AuthenticationFailed { .. } => StatusCode::UNAUTHORIZED,
            ApiError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::DomainRuleViolation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal { .. } => {
                error!(error = %err, "Request failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        if status.is_client_error() {
            warn!(status = status.as_u16(), error = %err, "Request rejected");
        }
        Self {
            status,
            message: err.to_string(),
        }
    }
}

// ============================================================================
// Public handlers
// ============================================================================

/// Handler for GET `/fares/{passenger_type}`.
async fn handle_quote_fare(
    Path(passenger_type): Path<String>,
) -> Result<Json<FareQuoteResponse>, HttpError> {
    Ok(Json(vantrip_api::quote_fare(&passenger_type)?))
}

/// Handler for GET `/trips`.
///
/// Accepts optional `date` and `route_id` query parameters.
async fn handle_list_trips(
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<ListTripsRequest>,
) -> Result<Json<ListTripsResponse>, HttpError> {
    info!(date = ?query.date, route_id = ?query.route_id, "Handling list_trips request");

    let mut persistence = app_state.persistence.lock().await;
    let response: ListTripsResponse = vantrip_api::list_trips(&mut persistence, &query)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/trips/{trip_id}`.
async fn handle_get_trip(
    AxumState(app_state): AxumState<AppState>,
    Path(trip_id): Path<i64>,
) -> Result<Json<TripInfo>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(vantrip_api::get_trip(&mut persistence, trip_id)?))
}

/// Handler for GET `/trips/{trip_id}/seats`.
async fn handle_get_seat_map(
    AxumState(app_state): AxumState<AppState>,
    Path(trip_id): Path<i64>,
) -> Result<Json<SeatMapResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(vantrip_api::get_seat_map(
        &mut persistence,
        trip_id,
        false,
    )?))
}

/// Handler for GET `/trips/{trip_id}/seats/{seat_id}`.
async fn handle_check_seat(
    AxumState(app_state): AxumState<AppState>,
    Path((trip_id, seat_id)): Path<(i64, i64)>,
) -> Result<Json<SeatAvailabilityResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(vantrip_api::check_seat_availability(
        &mut persistence,
        trip_id,
        seat_id,
    )?))
}

/// Handler for POST `/trips/{trip_id}/tickets`.
///
/// Self-service issuance. The ticket awaits payment.
async fn handle_issue_ticket(
    AxumState(app_state): AxumState<AppState>,
    Path(trip_id): Path<i64>,
    ApiJson(req): ApiJson<IssueTicketRequest>,
) -> Result<(StatusCode, Json<IssueTicketResponse>), HttpError> {
    info!(trip_id, seat_id = ?req.seat_id, "Handling self-service issue_ticket request");

    let mut persistence = app_state.persistence.lock().await;
    let response: IssueTicketResponse =
        vantrip_api::issue_ticket(&mut persistence, trip_id, &req, None, &app_state.qr)?;
    drop(persistence);

    Ok((StatusCode::CREATED, Json(response)))
}

/// Handler for GET `/tickets/{ticket_number}`.
async fn handle_verify_ticket(
    AxumState(app_state): AxumState<AppState>,
    Path(ticket_number): Path<String>,
) -> Result<Json<TicketVerificationResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(vantrip_api::verify_ticket(
        &mut persistence,
        &ticket_number,
        &app_state.qr,
    )?))
}

// ============================================================================
// Admin handlers: routes and vans
// ============================================================================

/// Handler for POST `/admin/routes`.
async fn handle_create_route(
    AxumState(app_state): AxumState<AppState>,
    AdminIdentity(admin): AdminIdentity,
    ApiJson(req): ApiJson<RouteRequest>,
) -> Result<(StatusCode, Json<RouteInfo>), HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let route: RouteInfo = vantrip_api::create_route(&mut persistence, &req, &admin)?;
    Ok((StatusCode::CREATED, Json(route)))
}

/// Handler for GET `/admin/routes`.
async fn handle_list_routes(
    AxumState(app_state): AxumState<AppState>,
    AdminIdentity(admin): AdminIdentity,
) -> Result<Json<ListRoutesResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(vantrip_api::list_routes(&mut persistence, &admin)?))
}

/// Handler for GET `/admin/routes/{route_id}`.
async fn handle_get_route(
    AxumState(app_state): AxumState<AppState>,
    AdminIdentity(admin): AdminIdentity,
    Path(route_id): Path<i64>,
) -> Result<Json<RouteInfo>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(vantrip_api::get_route(
        &mut persistence,
        route_id,
        &admin,
    )?))
}

/// Handler for PUT `/admin/routes/{route_id}`.
async fn handle_update_route(
    AxumState(app_state): AxumState<AppState>,
    AdminIdentity(admin): AdminIdentity,
    Path(route_id): Path<i64>,
    ApiJson(req): ApiJson<RouteRequest>,
) -> Result<Json<RouteInfo>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(vantrip_api::update_route(
        &mut persistence,
        route_id,
        &req,
        &admin,
    )?))
}

/// Handler for DELETE `/admin/routes/{route_id}`.
async fn handle_delete_route(
    AxumState(app_state): AxumState<AppState>,
    AdminIdentity(admin): AdminIdentity,
    Path(route_id): Path<i64>,
) -> Result<Json<DeletedResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(vantrip_api::delete_route(
        &mut persistence,
        route_id,
        &admin,
    )?))
}

/// Handler for POST `/admin/vans`.
async fn handle_create_van(
    AxumState(app_state): AxumState<AppState>,
    AdminIdentity(admin): AdminIdentity,
    ApiJson(req): ApiJson<VanRequest>,
) -> Result<(StatusCode, Json<VanInfo>), HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let van: VanInfo = vantrip_api::create_van(&mut persistence, &req, &admin)?;
    Ok((StatusCode::CREATED, Json(van)))
}

/// Handler for GET `/admin/vans`.
async fn handle_list_vans(
    AxumState(app_state): AxumState<AppState>,
    AdminIdentity(admin): AdminIdentity,
) -> Result<Json<ListVansResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(vantrip_api::list_vans(&mut persistence, &admin)?))
}

/// Handler for GET `/admin/vans/{van_id}`.
async fn handle_get_van(
    AxumState(app_state): AxumState<AppState>,
    AdminIdentity(admin): AdminIdentity,
    Path(van_id): Path<i64>,
) -> Result<Json<VanInfo>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(vantrip_api::get_van(&mut persistence, van_id, &admin)?))
}

/// Handler for PUT `/admin/vans/{van_id}`.
async fn handle_update_van(
    AxumState(app_state): AxumState<AppState>,
    AdminIdentity(admin): AdminIdentity,
    Path(van_id): Path<i64>,
    ApiJson(req): ApiJson<VanRequest>,
) -> Result<Json<VanInfo>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(vantrip_api::update_van(
        &mut persistence,
        van_id,
        &req,
        &admin,
    )?))
}

/// Handler for PUT `/admin/vans/{van_id}/status`.
async fn handle_set_van_status(
    AxumState(app_state): AxumState<AppState>,
    AdminIdentity(admin): AdminIdentity,
    Path(van_id): Path<i64>,
    ApiJson(req): ApiJson<UpdateVanStatusRequest>,
) -> Result<Json<VanInfo>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(vantrip_api::set_van_status(
        &mut persistence,
        van_id,
        &req,
        &admin,
    )?))
}

/// Handler for DELETE `/admin/vans/{van_id}`.
async fn handle_delete_van(
    AxumState(app_state): AxumState<AppState>,
    AdminIdentity(admin): AdminIdentity,
    Path(van_id): Path<i64>,
) -> Result<Json<DeletedResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(vantrip_api::delete_van(
        &mut persistence,
        van_id,
        &admin,
    )?))
}

/// Handler for GET `/admin/vans/{van_id}/seats`.
async fn handle_list_van_seats(
    AxumState(app_state): AxumState<AppState>,
    AdminIdentity(admin): AdminIdentity,
    Path(van_id): Path<i64>,
) -> Result<Json<ListSeatsResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(vantrip_api::list_van_seats(
        &mut persistence,
        van_id,
        &admin,
    )?))
}

// ============================================================================
// Admin handlers: trips and tickets
// ============================================================================

/// Handler for POST `/admin/trips`.
async fn handle_create_trip(
    AxumState(app_state): AxumState<AppState>,
    AdminIdentity(admin): AdminIdentity,
    ApiJson(req): ApiJson<CreateTripRequest>,
) -> Result<(StatusCode, Json<TripInfo>), HttpError> {
    info!(van_id = req.van_id, trip_date = %req.trip_date, "Handling create_trip request");

    let mut persistence = app_state.persistence.lock().await;
    let trip: TripInfo = vantrip_api::create_trip(&mut persistence, &req, &admin)?;
    Ok((StatusCode::CREATED, Json(trip)))
}

/// Handler for PUT `/admin/trips/{trip_id}/status`.
async fn handle_update_trip_status(
    AxumState(app_state): AxumState<AppState>,
    AdminIdentity(admin): AdminIdentity,
    Path(trip_id): Path<i64>,
    ApiJson(req): ApiJson<UpdateTripStatusRequest>,
) -> Result<Json<TripInfo>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(vantrip_api::update_trip_status(
        &mut persistence,
        trip_id,
        &req,
        &admin,
    )?))
}

/// Handler for DELETE `/admin/trips/{trip_id}`.
async fn handle_delete_trip(
    AxumState(app_state): AxumState<AppState>,
    AdminIdentity(admin): AdminIdentity,
    Path(trip_id): Path<i64>,
) -> Result<Json<DeletedResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(vantrip_api::delete_trip(
        &mut persistence,
        trip_id,
        &admin,
    )?))
}

/// Handler for GET `/admin/trips/{trip_id}/seats`.
///
/// Same as the public seat map, with ticket numbers.
async fn handle_admin_seat_map(
    AxumState(app_state): AxumState<AppState>,
    AdminIdentity(_admin): AdminIdentity,
    Path(trip_id): Path<i64>,
) -> Result<Json<SeatMapResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(vantrip_api::get_seat_map(
        &mut persistence,
        trip_id,
        true,
    )?))
}

/// Handler for POST `/admin/trips/{trip_id}/tickets`.
///
/// Staff-assisted issuance. Payment defaults to `PAID`.
async fn handle_admin_issue_ticket(
    AxumState(app_state): AxumState<AppState>,
    AdminIdentity(admin): AdminIdentity,
    Path(trip_id): Path<i64>,
    ApiJson(req): ApiJson<IssueTicketRequest>,
) -> Result<(StatusCode, Json<IssueTicketResponse>), HttpError> {
    info!(
        trip_id,
        seat_id = ?req.seat_id,
        admin = admin.login(),
        "Handling staff issue_ticket request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: IssueTicketResponse = vantrip_api::issue_ticket(
        &mut persistence,
        trip_id,
        &req,
        Some(&admin),
        &app_state.qr,
    )?;
    drop(persistence);

    Ok((StatusCode::CREATED, Json(response)))
}

/// Handler for GET `/admin/trips/{trip_id}/tickets`.
async fn handle_list_trip_tickets(
    AxumState(app_state): AxumState<AppState>,
    AdminIdentity(admin): AdminIdentity,
    Path(trip_id): Path<i64>,
) -> Result<Json<ListTicketsResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(vantrip_api::list_trip_tickets(
        &mut persistence,
        trip_id,
        &admin,
        &app_state.qr,
    )?))
}

/// Handler for PUT `/admin/tickets/{ticket_number}/status`.
async fn handle_update_ticket_status(
    AxumState(app_state): AxumState<AppState>,
    AdminIdentity(admin): AdminIdentity,
    Path(ticket_number): Path<String>,
    ApiJson(req): ApiJson<UpdateTicketStatusRequest>,
) -> Result<Json<UpdateTicketStatusResponse>, HttpError> {
    info!(
        ticket_number = %ticket_number,
        ticket_status = ?req.ticket_status,
        payment_status = ?req.payment_status,
        admin = admin.login(),
        "Handling update_ticket_status request"
    );

    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(vantrip_api::update_ticket_status(
        &mut persistence,
        &ticket_number,
        &req,
        &admin,
        &app_state.qr,
    )?))
}

/// Handler for GET `/admin/tickets/{ticket_number}/history`.
async fn handle_ticket_history(
    AxumState(app_state): AxumState<AppState>,
    AdminIdentity(admin): AdminIdentity,
    Path(ticket_number): Path<String>,
) -> Result<Json<TicketStatusHistoryResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(vantrip_api::get_ticket_status_history(
        &mut persistence,
        &ticket_number,
        &admin,
    )?))
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/fares/{passenger_type}", get(handle_quote_fare))
        .route("/trips", get(handle_list_trips))
        .route("/trips/{trip_id}", get(handle_get_trip))
        .route("/trips/{trip_id}/seats", get(handle_get_seat_map))
        .route("/trips/{trip_id}/seats/{seat_id}", get(handle_check_seat))
        .route("/trips/{trip_id}/tickets", post(handle_issue_ticket))
        .route("/tickets/{ticket_number}", get(handle_verify_ticket))
        .route(
            "/admin/routes",
            post(handle_create_route).get(handle_list_routes),
        )
        .route(
            "/admin/routes/{route_id}",
            get(handle_get_route)
                .put(handle_update_route)
                .delete(handle_delete_route),
        )
        .route("/admin/vans", post(handle_create_van).get(handle_list_vans))
        .route(
            "/admin/vans/{van_id}",
            get(handle_get_van)
                .put(handle_update_van)
                .delete(handle_delete_van),
        )
        .route("/admin/vans/{van_id}/status", put(handle_set_van_status))
        .route("/admin/vans/{van_id}/seats", get(handle_list_van_seats))
        .route("/admin/trips", post(handle_create_trip))
        .route(
            "/admin/trips/{trip_id}",
            axum::routing::delete(handle_delete_trip),
        )
        .route(
            "/admin/trips/{trip_id}/status",
            put(handle_update_trip_status),
        )
        .route("/admin/trips/{trip_id}/seats", get(handle_admin_seat_map))
        .route(
            "/admin/trips/{trip_id}/tickets",
            post(handle_admin_issue_ticket).get(handle_list_trip_tickets),
        )
        .route(
            "/admin/tickets/{ticket_number}/status",
            put(handle_update_ticket_status),
        )
        .route(
            "/admin/tickets/{ticket_number}/history",
            get(handle_ticket_history),
        )
        .with_state(app_state)
}

/// Opens the store selected on the command line.
fn open_persistence(args: &Args) -> Result<SqlitePersistence, Box<dyn std::error::Error>> {
    #[cfg(feature = "mysql")]
    if let Some(url) = &args.mysql_url {
        info!("Using MySQL/MariaDB database");
        return Ok(SqlitePersistence::new_with_mysql(url)?);
    }

    let persistence: SqlitePersistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        SqlitePersistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        SqlitePersistence::new_in_memory()?
    };
    Ok(persistence)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Van Trip Server");

    let persistence: SqlitePersistence = open_persistence(&args)?;
    let identity_header: HeaderName = HeaderName::try_from(args.identity_header.as_str())?;

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        qr: Arc::new(QrSettings {
            service_url: args.qr_service_url.clone(),
            size: args.qr_size,
        }),
        identity_header,
    };

    // Build router
    let app: Router = build_router(app_state);

    // Bind to address
    let addr: std::net::SocketAddr = format!("{}:{}", args.bind, args.port).parse()?;
    info!("Server listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
