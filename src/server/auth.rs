//! API key authentication for the /textless routes.

use crate::config::AuthConfig;
use crate::server::AppContext;
use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::Response,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    typed_header::TypedHeader,
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};

/// Shorthand token header sent by media-server clients.
pub const X_EMBY_TOKEN: &str = "x-emby-token";

/// Check if authentication is required and valid.
///
/// Token resolution order:
/// 1. `Authorization: MediaBrowser ..., Token="<token>"`
/// 2. `X-Emby-Token: <token>`
/// 3. `Authorization: Bearer <token>`
pub fn check_auth(
    auth_config: &AuthConfig,
    authorization: Option<&str>,
    x_emby_token: Option<&str>,
    bearer_token: Option<&str>,
) -> Result<(), (StatusCode, &'static str)> {
    if !auth_config.enabled {
        return Ok(());
    }

    let Some(api_key) = auth_config.api_key.as_deref().filter(|k| !k.is_empty()) else {
        return Err((StatusCode::UNAUTHORIZED, "Authentication required"));
    };

    let mediabrowser = authorization
        .filter(|v| v.starts_with("MediaBrowser ") || v.starts_with("Emby "))
        .and_then(extract_mediabrowser_token);

    let accepted = mediabrowser.as_deref() == Some(api_key)
        || x_emby_token == Some(api_key)
        || bearer_token == Some(api_key);

    if accepted {
        Ok(())
    } else {
        Err((StatusCode::UNAUTHORIZED, "Authentication required"))
    }
}

/// Middleware for API key authentication
pub async fn api_auth_middleware(
    State(ctx): State<AppContext>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, (StatusCode, &'static str)> {
    let headers = request.headers();
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());
    let x_emby_token = headers.get(X_EMBY_TOKEN).and_then(|v| v.to_str().ok());

    if let Err(rejection) = check_auth(
        &ctx.config.server.auth,
        authorization,
        x_emby_token,
        bearer.as_ref().map(|b| b.token()),
    ) {
        tracing::debug!(path = %request.uri().path(), "Rejected unauthenticated request");
        return Err(rejection);
    }

    Ok(next.run(request).await)
}

/// Extract Token value from MediaBrowser/Emby authorization header.
/// Format: `MediaBrowser Client="...", Device="...", Token="<token>"`
pub fn extract_mediabrowser_token(header: &str) -> Option<String> {
    header
        .split(',')
        .map(|part| {
            let part = part.trim();
            part.strip_prefix("MediaBrowser ")
                .or_else(|| part.strip_prefix("Emby "))
                .unwrap_or(part)
        })
        .find_map(|part| part.strip_prefix("Token="))
        .map(|token| token.trim_matches('"').to_string())
        .filter(|token| !token.is_empty())
}

/// Generate a random API key
pub fn generate_api_key() -> String {
    use rand::Rng;
    let mut rng = rand::thread_rng();
    let bytes: [u8; 32] = rng.gen();
    URL_SAFE_NO_PAD.encode(bytes)
}
