use dotenvy::dotenv;
use matricula::config::server::ServerConfig;
use matricula::logging::init_tracing;
use matricula::router::init_router;
use matricula::state::init_app_state;

#[tokio::main]
async fn main() {
    dotenv().ok();
    init_tracing();

    let state = init_app_state().await;
    let app = init_router(state);

    let addr = ServerConfig::from_env().addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind server address");
    println!("🚀 Server running on http://{addr}");
    println!("📚 Swagger UI available at http://{addr}/swagger-ui");
    println!("📖 Scalar UI available at http://{addr}/scalar");
    axum::serve(listener, app)
        .await
        .expect("Server stopped unexpectedly");
}
