//! Session resolution from request headers.

use std::sync::Arc;

use axum::http::{
    header::{AUTHORIZATION, COOKIE},
    HeaderMap,
};
use futures_util::future::{self, BoxFuture, FutureExt};

use super::{Session, SessionStore, SessionToken};
use crate::Result;

/// Default name of the cookie carrying the session token.
pub const DEFAULT_COOKIE_NAME: &str = "session_token";

/// Produces the current session for a request.
///
/// `Ok(None)` means "nobody is signed in"; `Err` means the lookup itself
/// failed.
pub trait SessionResolver: Send + Sync {
    fn resolve<'a>(&'a self, headers: &'a HeaderMap) -> BoxFuture<'a, Result<Option<Session>>>;
}

/// Resolver that ignores the request and always yields the same session.
#[derive(Debug, Clone, Default)]
pub struct StaticResolver {
    session: Option<Session>,
}

impl StaticResolver {
    pub fn new(session: Option<Session>) -> Self {
        Self { session }
    }

    /// Resolver that never finds a session.
    pub fn none() -> Self {
        Self { session: None }
    }
}

impl SessionResolver for StaticResolver {
    fn resolve<'a>(&'a self, _headers: &'a HeaderMap) -> BoxFuture<'a, Result<Option<Session>>> {
        future::ready(Ok(self.session.clone())).boxed()
    }
}

/// Resolver backed by a [`SessionStore`].
///
/// The token is read from `Authorization: Bearer <token>` first, then from
/// the session cookie.
pub struct StoreResolver {
    store: Arc<SessionStore>,
    cookie_name: String,
}

impl StoreResolver {
    pub fn new(store: Arc<SessionStore>) -> Self {
        Self {
            store,
            cookie_name: DEFAULT_COOKIE_NAME.to_string(),
        }
    }

    pub fn with_cookie_name(mut self, name: impl Into<String>) -> Self {
        self.cookie_name = name.into();
        self
    }

    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    /// Pull the session token out of the request headers, if any.
    pub fn extract_token(&self, headers: &HeaderMap) -> Option<SessionToken> {
        let bearer = headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(bearer_token_from_header);

        let raw = bearer.or_else(|| {
            headers
                .get_all(COOKIE)
                .iter()
                .filter_map(|v| v.to_str().ok())
                .find_map(|header| token_from_cookie_header(header, &self.cookie_name))
        })?;

        SessionToken::new(raw)
    }
}

impl SessionResolver for StoreResolver {
    fn resolve<'a>(&'a self, headers: &'a HeaderMap) -> BoxFuture<'a, Result<Option<Session>>> {
        let result = match self.extract_token(headers) {
            Some(token) => {
                let found = self.store.get(&token);
                if let Ok(None) = found {
                    tracing::debug!(%token, "session token not recognised");
                }
                found
            }
            None => Ok(None),
        };
        future::ready(result).boxed()
    }
}

fn bearer_token_from_header(header_value: &str) -> Option<&str> {
    let mut parts = header_value.split_whitespace();
    let scheme = parts.next()?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let token = parts.next()?;
    if parts.next().is_some() {
        return None;
    }
    Some(token)
}

fn token_from_cookie_header<'a>(cookie_header: &'a str, cookie_name: &str) -> Option<&'a str> {
    cookie_header.split(';').map(str::trim).find_map(|pair| {
        let (name, value) = pair.split_once('=')?;
        if name.trim() == cookie_name {
            Some(value.trim().trim_matches('"'))
        } else {
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionUser;
    use axum::http::HeaderValue;

    fn store_with(token: &str, session: Session) -> Arc<SessionStore> {
        let store = Arc::new(SessionStore::new());
        store
            .insert_with_token(SessionToken::new(token).unwrap(), session)
            .unwrap();
        store
    }

    fn ana() -> Session {
        Session::for_user(SessionUser::new().with_name("Ana"))
    }

    #[test]
    fn test_bearer_parsing() {
        assert_eq!(bearer_token_from_header("Bearer abc"), Some("abc"));
        assert_eq!(bearer_token_from_header("bearer abc"), Some("abc"));
        assert_eq!(bearer_token_from_header("Basic abc"), None);
        assert_eq!(bearer_token_from_header("Bearer"), None);
        assert_eq!(bearer_token_from_header("Bearer a b"), None);
    }

    #[test]
    fn test_cookie_parsing() {
        let header = "theme=dark; session_token=tok123 ; other=1";
        assert_eq!(
            token_from_cookie_header(header, "session_token"),
            Some("tok123")
        );
        assert_eq!(token_from_cookie_header(header, "missing"), None);
        assert_eq!(
            token_from_cookie_header("session_token=\"quoted\"", "session_token"),
            Some("quoted")
        );
    }

    #[test]
    fn test_static_resolver() {
        let resolver = StaticResolver::new(Some(ana()));
        let headers = HeaderMap::new();
        let session = tokio_test::block_on(resolver.resolve(&headers)).unwrap();
        assert_eq!(session, Some(ana()));

        let none = tokio_test::block_on(StaticResolver::none().resolve(&headers)).unwrap();
        assert!(none.is_none());
    }

    #[tokio::test]
    async fn test_store_resolver_cookie() {
        let resolver = StoreResolver::new(store_with("tok123", ana()));
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("session_token=tok123"));

        assert_eq!(resolver.resolve(&headers).await.unwrap(), Some(ana()));
    }

    #[tokio::test]
    async fn test_store_resolver_bearer_wins() {
        let store = store_with("cookie-tok", Session::anonymous());
        store
            .insert_with_token(SessionToken::new("bearer-tok").unwrap(), ana())
            .unwrap();
        let resolver = StoreResolver::new(store);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer bearer-tok"));
        headers.insert(COOKIE, HeaderValue::from_static("session_token=cookie-tok"));

        assert_eq!(resolver.resolve(&headers).await.unwrap(), Some(ana()));
    }

    #[tokio::test]
    async fn test_store_resolver_custom_cookie() {
        let resolver = StoreResolver::new(store_with("tok123", ana())).with_cookie_name("sid");
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("session_token=tok123"));
        assert!(resolver.resolve(&headers).await.unwrap().is_none());

        headers.insert(COOKIE, HeaderValue::from_static("sid=tok123"));
        assert_eq!(resolver.resolve(&headers).await.unwrap(), Some(ana()));
    }

    #[tokio::test]
    async fn test_store_resolver_unknown_or_missing() {
        let resolver = StoreResolver::new(store_with("tok123", ana()));

        assert!(resolver.resolve(&HeaderMap::new()).await.unwrap().is_none());

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer other"));
        assert!(resolver.resolve(&headers).await.unwrap().is_none());
    }
}
