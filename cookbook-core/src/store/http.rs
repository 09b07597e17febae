//! Recipe store backed by the recipe API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{info_span, Instrument};

use super::{RecipeStore, StoreError};
use crate::config::StoreConfig;
use crate::types::{Category, Recipe, RecipeCreate, RecipeUpdate};

/// Configuration for HttpStore.
#[derive(Clone)]
pub struct HttpStoreBuilder {
    base_url: String,
    timeout: Duration,
    user_agent: String,
}

impl Default for HttpStoreBuilder {
    fn default() -> Self {
        Self::from_config(&StoreConfig::default())
    }
}

impl HttpStoreBuilder {
    pub fn from_config(config: &StoreConfig) -> Self {
        Self {
            base_url: config.api_url.clone(),
            timeout: config.timeout,
            user_agent: format!("cookbook/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Set the API base URL. Paths are resolved relative to it.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn build(self) -> Result<HttpStore, StoreError> {
        let mut base = self.base_url;
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base).map_err(|e| StoreError::InvalidUrl(format!("{base}: {e}")))?;

        let inner = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(&self.user_agent)
            .build()?;

        Ok(HttpStore { inner, base_url })
    }
}

#[derive(Debug)]
pub struct HttpStore {
    inner: reqwest::Client,
    base_url: Url,
}

impl HttpStore {
    pub fn builder() -> HttpStoreBuilder {
        HttpStoreBuilder::default()
    }

    fn endpoint(&self, path: &str) -> Result<Url, StoreError> {
        self.base_url
            .join(path)
            .map_err(|e| StoreError::InvalidUrl(format!("{path}: {e}")))
    }

    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        not_found: Option<(&'static str, i64)>,
    ) -> Result<Response, StoreError> {
        let url = self.endpoint(path)?;
        let span = info_span!("store.request", method = %method, path);

        async {
            let mut request = self.inner.request(method, url.clone());
            if let Some(body) = body {
                request = request.json(body);
            }

            tracing::debug!(%url, "sending request");
            let response = request.send().await?;
            let status = response.status();

            if status.is_success() {
                tracing::debug!(%url, %status, "request succeeded");
                return Ok(response);
            }

            if status == StatusCode::NOT_FOUND {
                if let Some((resource, id)) = not_found {
                    return Err(StoreError::NotFound { resource, id });
                }
            }

            let body = response.text().await.unwrap_or_default();
            let message = error_detail(&body).unwrap_or_else(|| format!("HTTP {status}"));
            tracing::warn!(%url, %status, %message, "request failed");
            Err(StoreError::Api {
                status: status.as_u16(),
                message,
            })
        }
        .instrument(span)
        .await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        not_found: Option<(&'static str, i64)>,
    ) -> Result<T, StoreError> {
        let response = self.send::<()>(Method::GET, path, None, not_found).await?;
        read_json(response).await
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, StoreError> {
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| StoreError::InvalidResponse(e.to_string()))
}

/// Pull a human-readable message out of an error body.
///
/// Understands `{"detail": "..."}`, `{"error": "..."}` and the list form
/// `{"detail": [{"msg": "..."}, ...]}` used for request validation failures.
fn error_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;

    for key in ["detail", "error"] {
        match value.get(key) {
            Some(serde_json::Value::String(message)) if !message.trim().is_empty() => {
                return Some(message.clone());
            }
            Some(serde_json::Value::Array(items)) => {
                let messages: Vec<&str> = items
                    .iter()
                    .filter_map(|item| item.get("msg").and_then(|m| m.as_str()))
                    .collect();
                if !messages.is_empty() {
                    return Some(messages.join("; "));
                }
            }
            _ => {}
        }
    }

    None
}

#[async_trait]
impl RecipeStore for HttpStore {
    async fn list_recipes(&self) -> Result<Vec<Recipe>, StoreError> {
        self.get_json("recipes/", None).await
    }

    async fn get_recipe(&self, id: i64) -> Result<Recipe, StoreError> {
        self.get_json(&format!("recipes/{id}"), Some(("Recipe", id)))
            .await
    }

    async fn create_recipe(&self, payload: &RecipeCreate) -> Result<Recipe, StoreError> {
        let response = self
            .send(Method::POST, "recipes/", Some(payload), None)
            .await?;
        read_json(response).await
    }

    async fn update_recipe(&self, id: i64, payload: &RecipeUpdate) -> Result<Recipe, StoreError> {
        let response = self
            .send(
                Method::PUT,
                &format!("recipes/{id}"),
                Some(payload),
                Some(("Recipe", id)),
            )
            .await?;
        read_json(response).await
    }

    async fn delete_recipe(&self, id: i64) -> Result<(), StoreError> {
        self.send::<()>(
            Method::DELETE,
            &format!("recipes/{id}"),
            None,
            Some(("Recipe", id)),
        )
        .await?;
        Ok(())
    }

    async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        self.get_json("categories/", None).await
    }

    fn store_name(&self) -> &'static str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::to_payload;
    use crate::types::RecipeDraft;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    /// Serve a single canned response on a local port and return a store
    /// pointed at it.
    async fn store_answering(status: &str, body: &'static str) -> HttpStore {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            read_request(&mut socket).await;
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        });

        HttpStore::builder()
            .base_url(format!("http://{addr}"))
            .build()
            .unwrap()
    }

    /// Read headers and any body so the client sees a complete exchange.
    async fn read_request(socket: &mut TcpStream) {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                return;
            }
            buf.extend_from_slice(&chunk[..n]);
            let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") else {
                continue;
            };
            let head = String::from_utf8_lossy(&buf[..end]).to_ascii_lowercase();
            let length = head
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|value| value.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= end + 4 + length {
                return;
            }
        }
    }

    #[tokio::test]
    async fn test_missing_recipe_is_not_found() {
        let store = store_answering("404 Not Found", r#"{"detail": "Recipe not found"}"#).await;

        let err = store.get_recipe(7).await.unwrap_err();

        assert!(matches!(err, StoreError::NotFound { resource: "Recipe", id: 7 }));
    }

    #[tokio::test]
    async fn test_404_without_resource_is_api_error() {
        let store = store_answering("404 Not Found", r#"{"detail": "Not Found"}"#).await;

        let err = store.list_recipes().await.unwrap_err();

        assert!(matches!(err, StoreError::Api { status: 404, ref message } if message == "Not Found"));
    }

    #[tokio::test]
    async fn test_rejected_create_carries_detail() {
        let store = store_answering(
            "422 Unprocessable Entity",
            r#"{"detail": "Title cannot be empty"}"#,
        )
        .await;

        let err = store
            .create_recipe(&to_payload(&RecipeDraft::default()))
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::Api { status: 422, .. }));
        assert_eq!(err.user_message("Failed to save recipe"), "Title cannot be empty");
    }

    #[tokio::test]
    async fn test_server_error_without_json_uses_status() {
        let store = store_answering("500 Internal Server Error", "<html>oops</html>").await;

        let err = store.delete_recipe(3).await.unwrap_err();

        assert!(matches!(
            err,
            StoreError::Api { status: 500, ref message } if message == "HTTP 500 Internal Server Error"
        ));
    }

    #[tokio::test]
    async fn test_recipe_is_decoded() {
        let store = store_answering(
            "200 OK",
            r#"{"id": 7, "title": "Toast", "instructions": "Toast it", "prep_time": 2,
                "ingredients": [], "created_at": "2024-03-01T08:00:00"}"#,
        )
        .await;

        let recipe = store.get_recipe(7).await.unwrap();

        assert_eq!(recipe.title, "Toast");
        assert_eq!(recipe.prep_time, Some(2));
        assert_eq!(recipe.cook_time, None);
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let store = HttpStore::builder()
            .base_url("http://localhost:8000/api")
            .build()
            .unwrap();

        assert_eq!(
            store.endpoint("recipes/12").unwrap().as_str(),
            "http://localhost:8000/api/recipes/12"
        );
        assert_eq!(
            store.endpoint("categories/").unwrap().as_str(),
            "http://localhost:8000/api/categories/"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let result = HttpStore::builder().base_url("not a url").build();
        assert!(matches!(result, Err(StoreError::InvalidUrl(_))));
    }

    #[test]
    fn test_error_detail_string() {
        assert_eq!(
            error_detail(r#"{"detail": "Recipe not found"}"#).as_deref(),
            Some("Recipe not found")
        );
        assert_eq!(
            error_detail(r#"{"error": "Title cannot be empty"}"#).as_deref(),
            Some("Title cannot be empty")
        );
    }

    #[test]
    fn test_error_detail_validation_list() {
        let body = r#"{"detail": [
            {"loc": ["body", "title"], "msg": "field required"},
            {"loc": ["body", "instructions"], "msg": "field required"}
        ]}"#;
        assert_eq!(
            error_detail(body).as_deref(),
            Some("field required; field required")
        );
    }

    #[test]
    fn test_error_detail_unusable_body() {
        assert_eq!(error_detail("<html>Bad Gateway</html>"), None);
        assert_eq!(error_detail(r#"{"detail": ""}"#), None);
        assert_eq!(error_detail(r#"{"status": 500}"#), None);
    }
}
