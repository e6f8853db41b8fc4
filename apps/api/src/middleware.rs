use axum::extract::{Request, State};
use axum::http::{HeaderMap, header};
use axum::middleware::Next;
use axum::response::Response;
use earn_core::AppError;

use crate::error::ApiResult;
use crate::state::AppState;

/// Rejects internal requests that do not carry the shared bearer secret.
pub async fn require_internal_auth(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> ApiResult<Response> {
    if !bearer_token_matches(request.headers(), state.internal_api_secret.as_str()) {
        return Err(AppError::Unauthorized("invalid internal credentials".to_owned()).into());
    }

    Ok(next.run(request).await)
}

fn bearer_token_matches(headers: &HeaderMap, expected_secret: &str) -> bool {
    let Some(token) = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
    else {
        return false;
    };

    !expected_secret.is_empty()
        && token.len() == expected_secret.len()
        && token
            .bytes()
            .zip(expected_secret.bytes())
            .fold(0_u8, |diff, (left, right)| diff | (left ^ right))
            == 0
}

#[cfg(test)]
mod tests {
    use axum::http::{HeaderMap, HeaderValue, header};

    use super::bearer_token_matches;

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    fn headers_with(authorization: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static(authorization));
        headers
    }

    #[test]
    fn accepts_matching_bearer_secret() {
        assert!(bearer_token_matches(
            &headers_with("Bearer 0123456789abcdef0123456789abcdef"),
            SECRET
        ));
    }

    #[test]
    fn rejects_missing_or_wrong_credentials() {
        assert!(!bearer_token_matches(&HeaderMap::new(), SECRET));
        assert!(!bearer_token_matches(&headers_with("Bearer nope"), SECRET));
        assert!(!bearer_token_matches(
            &headers_with("Basic 0123456789abcdef0123456789abcdef"),
            SECRET
        ));
        assert!(!bearer_token_matches(
            &headers_with("Bearer 0123456789abcdef0123456789abcdeX"),
            SECRET
        ));
    }

    #[test]
    fn empty_secret_never_matches() {
        assert!(!bearer_token_matches(&headers_with("Bearer "), ""));
    }
}
