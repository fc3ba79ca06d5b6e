use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use axum_prometheus::PrometheusMetricLayer;
use clap::{Args, Parser, Subcommand};
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::json;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

use jobdesk::config::{AppConfig, ModerationConfig};
use jobdesk::error::AppError;
use jobdesk::moderation::{
    moderation_router, AdminAccount, AdminId, BoardStore, Capability, EmployerAccount, EmployerId,
    MemoryBoardStore, ModerationHub, NullNotifier, SubscriptionPlan, UserAccount, UserId,
};
use jobdesk::telemetry;

#[derive(Clone)]
struct OpsState {
    readiness: Arc<AtomicBool>,
    metrics: PrometheusHandle,
}

#[derive(Parser, Debug)]
#[command(
    name = "jobdesk",
    about = "Moderation and lifecycle control service for the job board",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    host: Option<String>,

    /// Override the configured port for the HTTP server
    #[arg(long)]
    port: Option<u16>,

    /// Seed demo accounts and bearer tokens into the in-memory store
    #[arg(long)]
    seed_demo: bool,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => run_server(args).await,
    }
}

async fn run_server(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry, config.environment)?;

    let store = Arc::new(MemoryBoardStore::new());
    if args.seed_demo {
        seed_demo_data(&store, &config.moderation);
    }
    let hub = Arc::new(ModerationHub::new(
        store,
        Arc::new(NullNotifier),
        &config.moderation,
    ));

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let ops = OpsState {
        readiness: readiness_flag.clone(),
        metrics: prometheus_handle,
    };

    let app = Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .with_state(ops)
        .merge(moderation_router(hub))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "job board moderation service ready");

    axum::serve(listener, app).await?;
    Ok(())
}

// Demo-only fixtures so the service can be exercised without a registration
// flow. Tokens are static and must never be enabled in production.
fn seed_demo_data(store: &MemoryBoardStore, moderation: &ModerationConfig) {
    let admin = AdminAccount::new(
        AdminId("admin-000001".to_string()),
        "Demo Admin".to_string(),
        vec![
            Capability::UserManagement,
            Capability::EmployerManagement,
            Capability::JobManagement,
            Capability::Analytics,
        ],
    );
    let user = UserAccount::new(UserId("user-000001".to_string()), "Demo Seeker".to_string());
    let mut employer = EmployerAccount::new(
        EmployerId("emp-000001".to_string()),
        "Demo Staffing".to_string(),
        SubscriptionPlan::Free,
    );
    employer.job_posting_limit = moderation.free_plan_limit;

    let seeded = store
        .insert_admin(admin.clone())
        .and_then(|_| store.insert_user(user.clone()))
        .and_then(|_| store.insert_employer(employer.clone()))
        .and_then(|_| store.register_admin_token("demo-admin-token", &admin.id))
        .and_then(|_| store.register_user_token("demo-user-token", &user.id))
        .and_then(|_| store.register_employer_token("demo-employer-token", &employer.id));

    match seeded {
        Ok(()) => info!(
            admin = %admin.id.0,
            user = %user.id.0,
            employer = %employer.id.0,
            "seeded demo accounts (tokens: demo-admin-token, demo-user-token, demo-employer-token)"
        ),
        Err(err) => tracing::warn!(error = %err, "failed to seed demo accounts"),
    }
}

async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn readiness_endpoint(State(state): State<OpsState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

async fn metrics_endpoint(State(state): State<OpsState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
