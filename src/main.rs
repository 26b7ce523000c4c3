mod app;
mod auth;
mod checkins;
mod config;
mod dates;
mod error;
mod extract;
mod foods;
mod logs;
mod photos;
mod plans;
mod state;
mod storage;
mod summary;
mod water;
mod weight;
mod workout;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "fitflow=debug,axum=info,tower_http=info".to_string());
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

    let app_state = state::AppState::init().await?;

    sqlx::migrate!("./migrations").run(&app_state.db).await?;

    let bind = app_state.config.bind_address();
    app::serve(app::build_app(app_state), &bind).await
}
