use crate::controller::health_check_controller;
use axum::{routing::get, Router};
use sse::handler::serve_events;
use sse::Server;

pub fn define_routes(sse_server: Server) -> Router {
    Router::new()
        .merge(health_routes())
        .merge(event_routes(sse_server))
}

fn health_routes() -> Router {
    Router::new().route("/health", get(health_check_controller::health_check))
}

fn event_routes(sse_server: Server) -> Router {
    Router::new()
        .route("/events", get(serve_events))
        .with_state(sse_server)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ticker::TickerHooks;
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode};
    use clap::Parser;
    use service::config::Config;
    use std::time::Duration;
    use tower::ServiceExt;

    fn ticker_server(args: &[&str]) -> Server {
        let args = std::iter::once("sse_server_rs").chain(args.iter().copied());
        Server::new(TickerHooks::new(&Config::parse_from(args)))
    }

    async fn body_string(body: Body) -> String {
        let bytes = tokio::time::timeout(
            Duration::from_secs(2),
            axum::body::to_bytes(body, usize::MAX),
        )
        .await
        .expect("stream did not end")
        .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn health_check_responds() {
        let app = define_routes(Server::default());

        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response.into_body()).await, "healthy");
    }

    #[tokio::test]
    async fn events_route_streams_the_ticker() {
        let app = define_routes(ticker_server(&["--event-interval-ms", "1"]));

        let request = Request::builder()
            .uri("/events")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["content-type"], "text/event-stream");
        assert_eq!(response.headers()["access-control-allow-origin"], "*");
        assert_eq!(
            body_string(response.into_body()).await,
            "event: event-0\ndata: 0\n\n\
             event: event-1\ndata: 1\n\n\
             event: event-2\ndata: 2\n\n\
             event: event-3\ndata: 3\n\n"
        );
    }

    #[tokio::test]
    async fn events_route_rejects_unlisted_origins() {
        let app = define_routes(ticker_server(&[
            "--allowed-origins",
            "https://app.example",
        ]));

        let request = Request::builder()
            .uri("/events")
            .header("origin", "https://evil.example")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert!(response.headers().get("content-type").is_none());
    }

    #[tokio::test]
    async fn events_route_only_answers_get() {
        let app = define_routes(Server::default());

        let request = Request::builder()
            .method(Method::POST)
            .uri("/events")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
