//! REST API server for the payment form.
//!
//! # Usage
//!
//! ```bash
//! # Start server, converting through the currency API
//! CURRCONV_API_KEY=... payform-server
//!
//! # With custom port and a fixed rate (no network access)
//! payform-server --port 8080 --fixed-rate 0.0025
//! ```
//!
//! # Swagger UI
//!
//! Visit http://localhost:3000/swagger-ui/ for interactive API documentation.

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, Method, StatusCode},
    response::Json,
    routing::{get, post},
    Form, Router,
};
use clap::Parser;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

use payment_form::{
    Config, CurrConvClient, CurrencyConverter, FixedRateConverter, PaymentFormValidator,
    PaymentProcessor, PaymentSubmission, PaymentView, SystemClock,
};

// ============================================================================
// OpenAPI Documentation
// ============================================================================

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Payment Form API",
        version = "0.1.0",
        description = "Payment form validation with HUF to EUR conversion.",
        license(name = "MIT"),
        contact(name = "API Support")
    ),
    tags(
        (name = "Payment", description = "Payment form submission"),
        (name = "System", description = "Health and status endpoints")
    ),
    paths(submit_payment, validate_payment, health),
    components(schemas(PaymentRequest, PaymentResponse, StoredResponse, HealthResponse))
)]
struct ApiDoc;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Deserialize, ToSchema)]
#[schema(example = json!({
    "cc-number": "4539 1488 0343 6467",
    "expiration-month": "12",
    "expiration-year": "30",
    "amount-huf": "1000"
}))]
struct PaymentRequest {
    /// Card number, 16 digits. Whitespace is ignored.
    #[serde(rename = "cc-number", default)]
    card_number: String,
    /// Two-digit expiration month (01-12)
    #[serde(rename = "expiration-month", default)]
    expiration_month: String,
    /// Last two digits of the expiration year
    #[serde(rename = "expiration-year", default)]
    expiration_year: String,
    /// Whole amount in HUF, 1 to 1 000 000 by default
    #[serde(rename = "amount-huf", default)]
    amount: String,
}

impl From<PaymentRequest> for PaymentSubmission {
    fn from(req: PaymentRequest) -> Self {
        PaymentSubmission::new(
            req.card_number,
            req.expiration_month,
            req.expiration_year,
            req.amount,
        )
    }
}

#[derive(Serialize, ToSchema)]
#[schema(example = json!({
    "accepted": true,
    "field_errors": {},
    "errors": [],
    "stored": {
        "card_number": "****-****-****-6467",
        "expiration_month": "12",
        "expiration_year": "30",
        "amount": 1000
    },
    "amount_eur": "2.57 €"
}))]
struct PaymentResponse {
    /// Whether every field passed validation
    accepted: bool,
    /// Error messages keyed by form field name
    field_errors: BTreeMap<String, Vec<String>>,
    /// All error messages in validation order (card, date, amount)
    errors: Vec<String>,
    /// Values stored from the submission
    stored: StoredResponse,
    /// Converted amount, two decimals followed by the euro symbol
    #[serde(skip_serializing_if = "Option::is_none")]
    amount_eur: Option<String>,
    /// Why the currency conversion failed
    #[serde(skip_serializing_if = "Option::is_none")]
    conversion_error: Option<String>,
}

#[derive(Serialize, ToSchema)]
struct StoredResponse {
    /// Masked card number (last four digits only)
    card_number: Option<String>,
    /// Two-digit month
    expiration_month: Option<String>,
    /// Two-digit year
    expiration_year: Option<String>,
    /// Amount in HUF
    amount: Option<u64>,
}

impl From<PaymentView> for PaymentResponse {
    fn from(view: PaymentView) -> Self {
        Self {
            accepted: view.accepted,
            field_errors: view
                .field_errors
                .into_iter()
                .map(|(field, messages)| (field.to_string(), messages))
                .collect(),
            errors: view.errors,
            stored: StoredResponse {
                card_number: view.stored.card_number,
                expiration_month: view.stored.expiration_month,
                expiration_year: view.stored.expiration_year,
                amount: view.stored.amount,
            },
            amount_eur: view.amount_eur,
            conversion_error: view.conversion_error,
        }
    }
}

#[derive(Serialize, ToSchema)]
struct HealthResponse {
    /// Service status
    status: String,
    /// API version
    version: String,
}

// ============================================================================
// Handlers
// ============================================================================

struct AppState {
    processor: PaymentProcessor<SystemClock>,
}

/// Submit the payment form and convert the amount on success
#[utoipa::path(
    post,
    path = "/payment",
    request_body(content = PaymentRequest, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Validation result", body = PaymentResponse),
        (status = 502, description = "Accepted but conversion failed", body = PaymentResponse)
    ),
    tag = "Payment"
)]
async fn submit_payment(
    State(state): State<Arc<AppState>>,
    Form(req): Form<PaymentRequest>,
) -> (StatusCode, Json<PaymentResponse>) {
    let outcome = state.processor.process(&req.into()).await;
    let view = PaymentView::from(&outcome);
    let status = if view.conversion_failed() {
        StatusCode::BAD_GATEWAY
    } else {
        StatusCode::OK
    };
    (status, Json(view.into()))
}

/// Validate a submission without converting the amount
#[utoipa::path(
    post,
    path = "/validate",
    request_body = PaymentRequest,
    responses(
        (status = 200, description = "Validation result", body = PaymentResponse)
    ),
    tag = "Payment"
)]
async fn validate_payment(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PaymentRequest>,
) -> Json<PaymentResponse> {
    let report = state.processor.validator().validate(&req.into());
    Json(PaymentView::from_report(&report).into())
}

/// Health check
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    ),
    tag = "System"
)]
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============================================================================
// Main
// ============================================================================

#[derive(Parser)]
#[command(name = "payform-server", version, about = "Payment form REST API")]
struct Args {
    /// JSON configuration file
    #[arg(long, env = "PAYFORM_CONFIG")]
    config: Option<PathBuf>,

    /// Bind address
    #[arg(long)]
    host: Option<String>,

    /// Bind port
    #[arg(long)]
    port: Option<u16>,

    /// Currency API key
    #[arg(long, env = "CURRCONV_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Currency API endpoint
    #[arg(long)]
    endpoint: Option<String>,

    /// Currency API timeout in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Convert at a fixed HUF to EUR rate instead of calling the API
    #[arg(long)]
    fixed_rate: Option<Decimal>,
}

impl Args {
    fn into_config(self) -> Result<(Config, Option<Decimal>), payment_form::ConfigError> {
        let mut config = match &self.config {
            Some(path) => Config::from_json_file(path)?,
            None => Config::default(),
        };
        if let Some(host) = self.host {
            config.server.host = host;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if self.api_key.is_some() {
            config.converter.api_key = self.api_key;
        }
        if let Some(endpoint) = self.endpoint {
            config.converter.endpoint = endpoint;
        }
        if let Some(timeout_secs) = self.timeout_secs {
            config.converter.timeout_secs = timeout_secs;
        }
        config.check()?;
        Ok((config, self.fixed_rate))
    }
}

fn build_converter(
    config: &Config,
    fixed_rate: Option<Decimal>,
) -> Result<Arc<dyn CurrencyConverter>, String> {
    if let Some(rate) = fixed_rate {
        let converter = FixedRateConverter::new(rate)
            .ok_or_else(|| "fixed rate must be positive".to_string())?;
        tracing::info!(%rate, "using fixed exchange rate");
        return Ok(Arc::new(converter));
    }

    if config.converter.api_key.is_none() {
        tracing::warn!("no currency API key configured, conversions will likely fail");
    }
    let client = CurrConvClient::new(&config.converter).map_err(|e| e.to_string())?;
    Ok(Arc::new(client))
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let (config, fixed_rate) = match Args::parse().into_config() {
        Ok(loaded) => loaded,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };
    tracing::debug!(?config, "configuration loaded");

    let limits = match config.form.limits() {
        Ok(limits) => limits,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    let converter = match build_converter(&config, fixed_rate) {
        Ok(converter) => converter,
        Err(e) => {
            tracing::error!(error = %e, "failed to build currency converter");
            return ExitCode::FAILURE;
        }
    };

    let state = Arc::new(AppState {
        processor: PaymentProcessor::new(PaymentFormValidator::new().limits(limits), converter),
    });

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .allow_origin(Any);

    // Build router with Swagger UI
    let app = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/payment", post(submit_payment))
        .route("/validate", post(validate_payment))
        .route("/health", get(health))
        .with_state(state)
        .layer(cors)
        .layer(tower_http::trace::TraceLayer::new_for_http());

    let bind = format!("{}:{}", config.server.host, config.server.port);
    let addr: SocketAddr = match bind.parse() {
        Ok(addr) => addr,
        Err(e) => {
            tracing::error!(error = %e, host = %config.server.host, "invalid bind address");
            return ExitCode::FAILURE;
        }
    };

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(error = %e, %addr, "failed to bind");
            return ExitCode::FAILURE;
        }
    };
    tracing::info!("Starting server on http://{}", addr);
    tracing::info!(
        "Swagger UI available at http://localhost:{}/swagger-ui/",
        config.server.port
    );

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(error = %e, "server error");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
