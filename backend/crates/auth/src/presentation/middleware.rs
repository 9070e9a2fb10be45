//! Auth Middleware
//!
//! Middleware for requiring a valid session token on protected routes.

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::application::session_token::SessionTokenSigner;

/// Middleware state
#[derive(Clone)]
pub struct AuthMiddlewareState {
    pub signer: SessionTokenSigner,
}

/// Identity of the authenticated caller, stored in request extensions
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub email: String,
}

/// Middleware that requires a valid Bearer session token
pub async fn require_auth(
    state: AuthMiddlewareState,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, Response> {
    let token = extract_bearer_token(&req);

    let user = token.and_then(|token| {
        let subject = state.signer.extract_subject(&token).ok()?;
        // validate re-checks the signature and adds the expiry check
        state
            .signer
            .validate(&token, &subject)
            .then_some(AuthenticatedUser { email: subject })
    });

    match user {
        Some(user) => {
            req.extensions_mut().insert(user);
            Ok(next.run(req).await)
        }
        None => Err((StatusCode::UNAUTHORIZED, [("X-Auth-Required", "true")]).into_response()),
    }
}

fn extract_bearer_token(req: &Request<Body>) -> Option<String> {
    let value = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?;
    (!token.is_empty()).then(|| token.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request_with_auth(value: &str) -> Request<Body> {
        Request::builder()
            .header(header::AUTHORIZATION, value)
            .body(Body::empty())
            .unwrap()
    }

    #[test]
    fn test_extract_bearer_token() {
        let req = request_with_auth("Bearer abc.def");
        assert_eq!(extract_bearer_token(&req), Some("abc.def".to_string()));
    }

    #[test]
    fn test_extract_bearer_token_missing_or_malformed() {
        let req = Request::builder().body(Body::empty()).unwrap();
        assert_eq!(extract_bearer_token(&req), None);

        let req = request_with_auth("Basic dXNlcjpwYXNz");
        assert_eq!(extract_bearer_token(&req), None);

        let req = request_with_auth("Bearer ");
        assert_eq!(extract_bearer_token(&req), None);
    }
}
