//! Authentication middleware
//!
//! API key authentication for the `/api/v1` routes

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::error::AppError;
use crate::AppState;

/// Caller identity attached to authenticated requests
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Actor {
    /// Caller presented a configured API key
    ApiKey { key_id: String },
    /// Caller sent no credentials and anonymous access is enabled
    Anonymous,
}

impl Actor {
    /// Identifier safe to write to logs
    pub fn label(&self) -> &str {
        match self {
            Actor::ApiKey { key_id } => key_id,
            Actor::Anonymous => "anonymous",
        }
    }
}

/// Short identifier for a key: its first characters, never the full secret
fn key_id(key: &str) -> String {
    let prefix: String = key.chars().take(6).collect();
    format!("key:{}", prefix)
}

/// Authentication middleware that validates bearer API keys
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let actor = match auth_header {
        Some(header) => {
            let Some(key) = header.strip_prefix("Bearer ") else {
                return unauthorized_response("Invalid Authorization header");
            };
            if !state.config.auth.api_keys.iter().any(|k| k == key) {
                tracing::debug!("Rejected request with unknown API key");
                return unauthorized_response("Invalid API key");
            }
            Actor::ApiKey { key_id: key_id(key) }
        }
        None if state.config.auth.allow_anonymous => Actor::Anonymous,
        None => return unauthorized_response("Missing Authorization header"),
    };

    request.extensions_mut().insert(actor);

    next.run(request).await
}

fn unauthorized_response(message: &str) -> Response {
    AppError::Unauthorized(message.to_string()).into_response()
}

/// Extractor for the authenticated actor
/// Use this in handlers to get the caller
#[derive(Clone, Debug)]
pub struct CurrentActor(pub Actor);

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for CurrentActor
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Actor>()
            .cloned()
            .map(CurrentActor)
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_id_hides_secret() {
        assert_eq!(key_id("abcdef123456"), "key:abcdef");
        assert_eq!(key_id("ab"), "key:ab");
    }

    #[test]
    fn test_actor_label() {
        assert_eq!(Actor::Anonymous.label(), "anonymous");
        let actor = Actor::ApiKey { key_id: "key:abc".to_string() };
        assert_eq!(actor.label(), "key:abc");
    }
}
