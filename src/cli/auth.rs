use std::{sync::Arc, time::Duration};

use tokio::sync::Mutex;

use crate::{
    error,
    oauth::OAuthManager,
    server::{AuthState, start_api_server},
    success,
    token::FileTokenStore,
    types::{PendingAuth, Provider, TokenIdentity},
    utils, warning,
};

/// Runs the browser authorization flow for one provider and stores the
/// obtained token under the given user id.
pub async fn auth(provider: Provider, user: String) {
    let store = Arc::new(FileTokenStore::new());
    let manager = Arc::new(match provider {
        Provider::Spotify => OAuthManager::spotify(store),
        Provider::YouTube => OAuthManager::youtube(store),
    });

    if auth_flow(manager, TokenIdentity::User(user)).await {
        success!("Authentication with {} successful!", provider);
    } else {
        error!("Authentication with {} failed or timed out.", provider);
    }
}

/// Drives one complete browser authorization flow.
///
/// Starts the local callback server, opens the provider's consent page and
/// waits for the callback to store a token under `identity`. Returns whether
/// the flow completed within the timeout.
pub async fn auth_flow(manager: Arc<OAuthManager>, identity: TokenIdentity) -> bool {
    let state_param = utils::generate_state();
    let pending = Arc::new(Mutex::new(Some(PendingAuth {
        state: state_param.clone(),
        identity,
        completed: false,
    })));

    let server_state = AuthState {
        manager: Arc::clone(&manager),
        pending: Arc::clone(&pending),
    };
    tokio::spawn(async move {
        start_api_server(server_state).await;
    });

    let auth_url = manager.authorization_url(&state_param, None);
    if webbrowser::open(&auth_url).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            auth_url
        )
    }

    let completed = wait_for_completion(pending).await;

    if completed {
        // let the server drain its response and release the port before a
        // possible second flow in this process binds it again
        tokio::time::sleep(Duration::from_secs(2)).await;
    }

    completed
}

async fn wait_for_completion(pending: Arc<Mutex<Option<PendingAuth>>>) -> bool {
    use std::time::Instant;

    let max_wait = Duration::from_secs(120);
    let start = Instant::now();

    while start.elapsed() < max_wait {
        let lock = pending.lock().await;
        if lock.as_ref().is_some_and(|flow| flow.completed) {
            return true;
        }
        drop(lock);
        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    false
}
