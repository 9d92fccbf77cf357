use log::*;
use service::{config::Config, logging::Logger};
use sse::Server;
use web::ticker::TickerHooks;

#[tokio::main]
async fn main() {
    let config = Config::new();

    if let Err(e) = Logger::init_logger(&config) {
        eprintln!("Failed to start logger: {e}");
    }

    info!(
        "Starting up SSE server in {} mode (queue capacity {}, event interval {:?})",
        config.runtime_env(),
        config.channel_capacity,
        config.event_interval(),
    );

    let mut sse_server = Server::new(TickerHooks::new(&config));
    if let Some(max) = config.max_stream_duration() {
        info!("Event streams are limited to {max:?}");
        sse_server = sse_server.with_max_stream_duration(max);
    }

    if let Err(e) = web::init_server(config, sse_server).await {
        error!("Server failed: {e}");
        std::process::exit(1);
    }
}
