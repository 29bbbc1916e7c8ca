use axum::{Router, http::header, routing::get};
use poolio::api::{handlers::api_routes, openapi::ApiDoc};
use poolio::config::CONFIG;
use poolio::core::models::user::User;
use poolio::core::services::LedgerService;
use poolio::infrastructure::logging::{LoggingService, in_memory::InMemoryLogging};
use poolio::infrastructure::storage::{Storage, in_memory::InMemoryStorage};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

// Demo dataset matching the seed the presentation client expects.
async fn seed_demo<L: LoggingService, S: Storage>(
    service: &LedgerService<L, S>,
) -> Result<(), poolio::LedgerError> {
    let admin = service
        .add_user(User {
            id: "admin".to_string(),
            name: "Admin".to_string(),
            email: "admin@demo.com".to_string(),
        })
        .await?;

    let users = [
        ("u1", "Alice", "alice@demo.com"),
        ("u2", "Bob", "bob@demo.com"),
        ("u3", "Charlie", "charlie@demo.com"),
        ("u4", "Diana", "diana@demo.com"),
        ("u5", "Shivam", "shivam@demo.com"),
    ];
    let mut member_ids = Vec::new();
    for (id, name, email) in users {
        let user = service
            .add_user(User {
                id: id.to_string(),
                name: name.to_string(),
                email: email.to_string(),
            })
            .await?;
        member_ids.push(user.id);
    }

    let group = service
        .create_group("Demo Group".to_string(), &admin.id, member_ids)
        .await?;
    info!(group_id = %group.id, "seeded demo group");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt().with_env_filter(CONFIG.log_level.as_str()).init();

    // Initialize storage and logging
    let storage = InMemoryStorage::new();
    let logging = InMemoryLogging::new();
    let service = Arc::new(LedgerService::new(storage, logging));

    if CONFIG.seed_demo {
        seed_demo(service.as_ref()).await?;
    }

    let app = Router::new()
        .route("/", get(|| async { "OK" }))
        .nest("/api", api_routes(service))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(CONFIG.request_timeout_secs)))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([http::Method::GET, http::Method::POST])
                .allow_headers([header::CONTENT_TYPE]),
        )
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = SocketAddr::from(([127, 0, 0, 1], CONFIG.port));
    info!("Server running at http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
