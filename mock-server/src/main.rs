use mock_panel::MockPanel;
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    tracing_subscriber::fmt::init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let api_key = std::env::var("PANEL_API_KEY").unwrap_or_else(|_| "ptlc_mock".to_string());
    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    info!("mock panel listening on http://{addr}/api");
    MockPanel::new(&api_key)
        .with_server("abc123", &["steve", "alex"])
        .serve(listener)
        .await
}
