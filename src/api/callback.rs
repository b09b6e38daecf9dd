use std::collections::HashMap;

use axum::{
    Extension,
    extract::{Path, Query},
    response::Html,
};

use crate::{server::AuthState, types::Provider, warning};

/// Handles the provider redirect of an authorization-code flow.
///
/// Validates the provider path segment and the `state` parameter against the
/// pending flow, exchanges the code for a token and stores it under the
/// identity that initiated the flow. Marks the flow completed on success so
/// the waiting CLI and the server itself can move on.
pub async fn callback(
    Path(provider): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    Extension(auth): Extension<AuthState>,
) -> Html<&'static str> {
    let Some(provider) = Provider::parse(&provider) else {
        return Html("<h4>Unknown provider.</h4>");
    };
    if provider != auth.manager.provider() {
        return Html("<h4>Callback hit for the wrong provider.</h4>");
    }

    let Some(code) = params.get("code") else {
        return Html("<h4>Missing authorization code.</h4>");
    };

    let mut pending = auth.pending.lock().await;
    let Some(ref mut flow) = pending.as_mut() else {
        return Html("<h4>No authorization flow in progress.</h4>");
    };

    if params.get("state").map(String::as_str) != Some(flow.state.as_str()) {
        return Html("<h4>State mismatch, rejecting callback.</h4>");
    }

    let token = match auth.manager.exchange_code(code, None).await {
        Ok(token) => token,
        Err(e) => {
            warning!("Token exchange failed: {}", e);
            return Html("<h4>Login failed.</h4>");
        }
    };

    match auth.manager.store_token(&flow.identity, token).await {
        Ok(()) => {
            flow.completed = true;
            Html("<h2>Authentication successful.</h2><p>Close browser window.</p>")
        }
        Err(e) => {
            warning!("Failed to store token: {}", e);
            Html("<h4>Login failed.</h4>")
        }
    }
}
