//! Minimal HTTP surface for the hosting platform.
//!
//! `GET /` and `GET /health` exist so the platform keeps the process
//! alive; in webhook mode the teloxide webhook route is merged into the
//! same router and served on the same port.

use std::net::SocketAddr;

use axum::routing::get;
use axum::Router;

use crate::consts::replies;

pub fn routes() -> Router {
    Router::new().route("/", get(home)).route("/health", get(health))
}

async fn home() -> &'static str {
    replies::HOME
}

async fn health() -> &'static str {
    "OK"
}

/// Spawns the health server on its own task (polling mode only; webhook
/// mode serves the merged router from `main`).
pub fn spawn(addr: SocketAddr) {
    tokio::spawn(async move {
        if let Err(e) = axum::Server::bind(&addr).serve(routes().into_make_service()).await {
            log::error!("health server failed: {e}");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn probes_answer_as_the_platform_expects() {
        let server = axum::Server::bind(&"127.0.0.1:0".parse().unwrap())
            .serve(routes().into_make_service());
        let addr = server.local_addr();
        tokio::spawn(server);

        let base = format!("http://{addr}");

        let health = reqwest::get(format!("{base}/health")).await.unwrap();
        assert_eq!(health.status(), 200);
        assert_eq!(health.text().await.unwrap(), "OK");

        let home = reqwest::get(format!("{base}/")).await.unwrap();
        assert_eq!(home.status(), 200);
        assert_eq!(home.text().await.unwrap(), replies::HOME);
    }
}
