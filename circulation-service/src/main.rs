use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use common_observability::CirculationMetrics;
use sqlx::PgPool;
use tokio::net::TcpListener;

use circulation_service::{build_router, AppState, DEFAULT_LOAN_LIMIT, DEFAULT_LOAN_PERIOD_DAYS};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let db = PgPool::connect(&database_url).await?;
    // Ensure database schema is up to date before serving traffic
    sqlx::migrate!("./migrations").run(&db).await?;

    let loan_limit = env::var("LOAN_LIMIT")
        .ok()
        .and_then(|v| v.parse::<i64>().ok())
        .unwrap_or(DEFAULT_LOAN_LIMIT);
    let loan_period_days = env::var("LOAN_PERIOD_DAYS")
        .ok()
        .and_then(|v| v.parse::<i64>().ok())
        .unwrap_or(DEFAULT_LOAN_PERIOD_DAYS);

    let metrics = Arc::new(CirculationMetrics::new());
    let state = AppState {
        db,
        loan_limit,
        loan_period_days,
        metrics,
    };

    let app = build_router(state);

    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(8088);
    let ip: std::net::IpAddr = host.parse()?;
    let addr = SocketAddr::from((ip, port));
    println!("starting circulation-service on {addr}");
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
