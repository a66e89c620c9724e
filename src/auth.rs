use axum::async_trait;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum::response::{IntoResponse, Redirect, Response};
use urlencoding::encode;

use crate::config::Config;

/// The signed-in user, as established by the identity provider fronting
/// the deployment.
#[derive(Debug, Clone)]
pub struct User {
    pub email: String,
}

/// Extractor for routes that require authentication. Rejection sends
/// the client to the external login page, carrying the original URI so
/// the provider can return the user here afterwards.
#[async_trait]
impl<S> FromRequestParts<S> for User
where
    Config: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = LoginRedirect;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth = Config::from_ref(state).auth;
        match identity(parts, &auth.identity_header) {
            Some(email) => Ok(User { email }),
            None => Err(LoginRedirect {
                location: format!(
                    "{}?next={}",
                    auth.login_url,
                    encode(&parts.uri.to_string())
                ),
            }),
        }
    }
}

/// Like [`User`], but never rejects: unauthenticated requests yield
/// `None`. Used by routes that merely vary their output by viewer.
pub struct MaybeUser(pub Option<User>);

#[async_trait]
impl<S> FromRequestParts<S> for MaybeUser
where
    Config: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth = Config::from_ref(state).auth;
        Ok(MaybeUser(
            identity(parts, &auth.identity_header).map(|email| User { email }),
        ))
    }
}

pub struct LoginRedirect {
    location: String,
}

impl IntoResponse for LoginRedirect {
    fn into_response(self) -> Response {
        Redirect::to(&self.location).into_response()
    }
}

fn identity(parts: &Parts, header: &str) -> Option<String> {
    parts
        .headers
        .get(header)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|email| !email.is_empty())
        .map(str::to_owned)
}
