use shop_api::{app, auth::services::ensure_admin, AppConfig, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "shop_api=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let config = AppConfig::from_env()?;
    let addr = config.socket_addr()?;
    let (app_state, db) = AppState::init(config).await?;

    if let Some(seed) = app_state.config.admin.as_ref() {
        ensure_admin(app_state.users.as_ref(), seed).await?;
    }

    let result = app::serve(app::build_app(app_state), addr).await;

    db.close().await;
    tracing::info!("database pool closed");
    result
}
