use axum::Router;
use dotenvy::dotenv;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;

use eventshare_server::config::Config;
use eventshare_server::routes::create_routes;
use eventshare_server::state::AppState;
use eventshare_server::store;

#[tokio::main]
async fn main() {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "eventshare_server=debug,tower_http=debug".into()),
        )
        .init();

    let config = Config::from_env();

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await
        .expect("Failed to connect to database");

    tracing::info!("Successfully connected to database");

    sqlx::migrate!()
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    tracing::info!("Migrations run successfully");

    store::categories::seed_defaults(&pool)
        .await
        .expect("Failed to seed initial categories");

    tokio::fs::create_dir_all(&config.photo_upload_dir)
        .await
        .expect("Failed to create photo upload directory");

    let addr = config.bind_addr;
    let app: Router = create_routes(AppState::new(pool, config));

    tracing::info!("🚀 Server running at http://{}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .expect("Failed to bind address");

    axum::serve(listener, app).await.expect("Server failed");
}
