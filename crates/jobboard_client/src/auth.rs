//! Session state and the auth link.

use crate::client::{Middleware, MiddlewareFuture, Next, Request};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Holds the current access token. Clones share the same token.
#[derive(Debug, Clone, Default)]
pub struct Session {
    token: Arc<RwLock<Option<String>>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a session that is already logged in.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Arc::new(RwLock::new(Some(token.into()))),
        }
    }

    pub async fn access_token(&self) -> Option<String> {
        self.token.read().await.clone()
    }

    pub async fn is_logged_in(&self) -> bool {
        self.token.read().await.is_some()
    }

    pub async fn set_token(&self, token: impl Into<String>) {
        *self.token.write().await = Some(token.into());
    }

    pub async fn clear(&self) {
        *self.token.write().await = None;
    }
}

/// Middleware that sends `Authorization: Bearer <token>` while the session
/// holds a token. Anonymous requests pass through unchanged.
pub fn auth_link(session: Session) -> Middleware {
    Arc::new(move |mut request: Request, next: Next| -> MiddlewareFuture {
        let session = session.clone();
        Box::pin(async move {
            if let Some(token) = session.access_token().await {
                request
                    .headers
                    .insert("Authorization".to_string(), format!("Bearer {}", token));
            }
            next(request).await
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::Response;
    use std::collections::HashMap;
    use std::sync::Mutex;

    fn capture(seen: Arc<Mutex<Option<HashMap<String, String>>>>) -> Next {
        Arc::new(move |request: Request| -> MiddlewareFuture {
            *seen.lock().unwrap() = Some(request.headers);
            Box::pin(async {
                Ok(Response {
                    data: Some(serde_json::json!({})),
                    errors: None,
                })
            })
        })
    }

    fn request() -> Request {
        Request {
            query: "{ greeting }".to_string(),
            variables: None,
            operation_name: None,
            headers: HashMap::new(),
        }
    }

    #[tokio::test]
    async fn test_attaches_bearer_token() {
        let session = Session::with_token("abc");
        let seen = Arc::new(Mutex::new(None));
        let link = auth_link(session);

        link(request(), capture(seen.clone())).await.unwrap();

        let headers = seen.lock().unwrap().take().unwrap();
        assert_eq!(headers.get("Authorization").map(String::as_str), Some("Bearer abc"));
    }

    #[tokio::test]
    async fn test_anonymous_request_has_no_header() {
        let session = Session::new();
        let seen = Arc::new(Mutex::new(None));
        let link = auth_link(session.clone());

        link(request(), capture(seen.clone())).await.unwrap();
        assert!(seen.lock().unwrap().take().unwrap().is_empty());

        // Token changes are picked up by the existing link.
        session.set_token("later").await;
        link(request(), capture(seen.clone())).await.unwrap();
        assert!(seen.lock().unwrap().take().unwrap().contains_key("Authorization"));

        session.clear().await;
        assert!(!session.is_logged_in().await);
    }
}
