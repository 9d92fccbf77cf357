//! HTTP surface of the SSE server: routes, controllers and the demo event producer.

use log::*;
use service::config::Config;
use sse::Server;
use tokio::net::TcpListener;

mod controller;
mod router;
pub mod ticker;

pub use router::define_routes;

/// Binds the configured address and serves until Ctrl-C.
///
/// On shutdown every open event stream is cancelled first, so the graceful shutdown
/// does not wait on clients that would otherwise stay connected forever.
pub async fn init_server(config: Config, sse_server: Server) -> std::io::Result<()> {
    let listen_addr = config.listen_addr();
    let listener = TcpListener::bind(&listen_addr).await?;

    info!("Server starting... listening for connections on http://{listen_addr}");

    axum::serve(listener, define_routes(sse_server.clone()))
        .with_graceful_shutdown(shutdown_signal(sse_server))
        .await
}

async fn shutdown_signal(sse_server: Server) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to install Ctrl-C handler: {e}");
        std::future::pending::<()>().await;
    }

    info!("Shutdown requested, closing open event streams");
    sse_server.shutdown();
}
