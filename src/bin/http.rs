#[cfg(feature = "http_api")]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use std::net::SocketAddr;

    use triage_tool::{TaskBoard, http_api};

    let addr: SocketAddr = std::env::var("TRIAGE_TOOL_HTTP_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
        .parse()?;

    println!("triage-tool HTTP API listening on http://{addr}");
    let board = TaskBoard::new();
    http_api::serve(addr, board).await?;
    Ok(())
}

#[cfg(not(feature = "http_api"))]
fn main() {
    eprintln!("Rebuild with the `http_api` feature to enable the HTTP server.");
}
