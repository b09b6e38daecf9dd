use axum::{Extension, Router, routing::get};
use std::{net::SocketAddr, str::FromStr, sync::Arc, time::Duration};
use tokio::sync::Mutex;

use crate::{api, config, error, oauth::OAuthManager, types::PendingAuth};

/// Shared state between the CLI-driven authorization flow and the callback
/// handler: the manager that can finish the code exchange plus the pending
/// flow it belongs to.
#[derive(Clone)]
pub struct AuthState {
    pub manager: Arc<OAuthManager>,
    pub pending: Arc<Mutex<Option<PendingAuth>>>,
}

/// Runs the local callback server until the pending authorization completes.
///
/// The server shuts itself down once the callback has stored a token, so a
/// later authorization flow in the same process can bind the port again.
pub async fn start_api_server(state: AuthState) {
    let pending = Arc::clone(&state.pending);
    let app = Router::new()
        .route("/health", get(api::health))
        .route(
            "/callback/{provider}",
            get(api::callback).layer(Extension(state)),
        );

    let addr = match SocketAddr::from_str(&config::server_addr()) {
        Ok(addr) => addr,
        Err(e) => error!("Failed to parse server address: {}", e),
    };

    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_completion(pending))
        .await
        .unwrap();
}

async fn wait_for_completion(pending: Arc<Mutex<Option<PendingAuth>>>) {
    loop {
        {
            let lock = pending.lock().await;
            if lock.as_ref().is_some_and(|flow| flow.completed) {
                break;
            }
        }
        tokio::time::sleep(Duration::from_millis(500)).await;
    }

    // give the success page time to reach the browser before the socket closes
    tokio::time::sleep(Duration::from_secs(1)).await;
}
