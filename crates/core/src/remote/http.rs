use std::time::Duration;

use serde::{de::DeserializeOwned, Deserialize};
use tracing::debug;

use super::{CatalogRemote, RemoteError};
use crate::models::{CreateGameRequest, CreatedGame, Game, GameId};

/// Catalog client speaking JSON over HTTP to a single endpoint.
#[derive(Debug, Clone)]
pub struct HttpCatalog {
    client: reqwest::Client,
    endpoint: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

impl HttpCatalog {
    /// Build a client for `endpoint` with the given request timeout.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, RemoteError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, endpoint))
    }

    /// Reuse an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    /// Endpoint this client talks to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn ensure_success(response: reqwest::Response) -> Result<String, RemoteError> {
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(RemoteError::Status {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }
        Ok(body)
    }

    async fn parse_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, RemoteError> {
        let body = Self::ensure_success(response).await?;
        Ok(serde_json::from_str(&body)?)
    }
}

impl CatalogRemote for HttpCatalog {
    async fn list(&self) -> Result<Vec<Game>, RemoteError> {
        debug!(endpoint = %self.endpoint, "GET catalog");
        let response = self.client.get(&self.endpoint).send().await?;
        Self::parse_response(response).await
    }

    async fn create(&self, request: &CreateGameRequest) -> Result<CreatedGame, RemoteError> {
        debug!(endpoint = %self.endpoint, title = %request.title, "POST catalog");
        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await?;
        Self::parse_response(response).await
    }

    async fn delete(&self, id: GameId) -> Result<(), RemoteError> {
        debug!(endpoint = %self.endpoint, id, "DELETE catalog");
        let response = self
            .client
            .delete(&self.endpoint)
            .query(&[("id", id)])
            .send()
            .await?;
        Self::ensure_success(response).await?;
        Ok(())
    }
}

fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => parsed.error,
        Err(_) if body.trim().is_empty() => "<empty body>".to_string(),
        Err(_) => body.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::TcpListener,
        sync::oneshot,
    };

    /// Serve one canned response and hand back the raw request text.
    async fn serve_once(
        status_line: &'static str,
        body: &'static str,
    ) -> anyhow::Result<(String, oneshot::Receiver<String>)> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let (tx, rx) = oneshot::channel();
        tokio::spawn(async move {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };
            let _ = tx.send(read_request(&mut socket).await);
            let response = format!(
                "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        });
        Ok((format!("http://{addr}/games"), rx))
    }

    /// Read the request head plus a `Content-Length` body.
    async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
        let mut raw = Vec::new();
        let mut buf = [0u8; 4096];
        loop {
            let read = socket.read(&mut buf).await.unwrap_or(0);
            if read == 0 {
                break;
            }
            raw.extend_from_slice(&buf[..read]);
            let text = String::from_utf8_lossy(&raw).to_string();
            let Some(head_end) = text.find("\r\n\r\n") else {
                continue;
            };
            let content_length = text[..head_end]
                .lines()
                .filter_map(|line| line.split_once(':'))
                .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
                .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if raw.len() >= head_end + 4 + content_length {
                break;
            }
        }
        String::from_utf8_lossy(&raw).to_string()
    }

    fn request_body(request: &str) -> anyhow::Result<serde_json::Value> {
        let (_, body) = request
            .split_once("\r\n\r\n")
            .ok_or_else(|| anyhow::anyhow!("request has no body"))?;
        Ok(serde_json::from_str(body)?)
    }

    fn create_request(image_file: Option<&str>) -> CreateGameRequest {
        CreateGameRequest {
            title: "Tile Drop".to_string(),
            genre: "Puzzle".to_string(),
            rating: 7.5,
            image: "https://cdn.example.com/tile.png".to_string(),
            trailer: String::new(),
            description: "Falling blocks".to_string(),
            release_date: "2025".to_string(),
            image_file: image_file.map(str::to_string),
            image_type: image_file.map(|_| "png".to_string()),
        }
    }

    fn client(endpoint: String) -> anyhow::Result<HttpCatalog> {
        Ok(HttpCatalog::new(endpoint, Duration::from_secs(5))?)
    }

    #[test]
    fn error_message_prefers_json_error_field() {
        assert_eq!(error_message(r#"{"error": "Game ID required"}"#), "Game ID required");
        assert_eq!(error_message("gateway down"), "gateway down");
        assert_eq!(error_message("  "), "<empty body>");
    }

    #[tokio::test]
    async fn lists_games() -> anyhow::Result<()> {
        let (endpoint, request) = serve_once(
            "200 OK",
            r#"[{"id":1,"title":"Cyber Nexus 2077","genre":"RPG / Action","rating":9.2,"image":"i","trailer":"","description":"d","releaseDate":"2024"}]"#,
        )
        .await?;

        let games = client(endpoint)?.list().await?;
        assert_eq!(games.len(), 1);
        assert_eq!(games[0].title, "Cyber Nexus 2077");
        assert!(request.await?.starts_with("GET /games"));
        Ok(())
    }

    #[tokio::test]
    async fn create_posts_camel_case_json() -> anyhow::Result<()> {
        let (endpoint, request) =
            serve_once("201 Created", r#"{"id":9,"message":"Game created"}"#).await?;

        let created = client(endpoint)?.create(&create_request(None)).await?;
        assert_eq!(created.id, 9);
        assert_eq!(created.message, "Game created");

        let request = request.await?;
        assert!(request.starts_with("POST /games"));
        let body = request_body(&request)?;
        assert_eq!(body["releaseDate"], "2025");
        assert_eq!(body["title"], "Tile Drop");
        assert!(body.get("release_date").is_none());
        assert!(body.get("imageFile").is_none());
        assert!(body.get("imageType").is_none());
        Ok(())
    }

    #[tokio::test]
    async fn create_sends_inline_image_fields() -> anyhow::Result<()> {
        let (endpoint, request) =
            serve_once("201 Created", r#"{"id":10,"message":"Game created"}"#).await?;

        let data_url = "data:image/png;base64,iVBORw0KGgo=";
        let created = client(endpoint)?
            .create(&create_request(Some(data_url)))
            .await?;
        assert_eq!(created.id, 10);

        let body = request_body(&request.await?)?;
        assert_eq!(body["imageFile"], data_url);
        assert_eq!(body["imageType"], "png");
        Ok(())
    }

    #[tokio::test]
    async fn malformed_body_is_reported() -> anyhow::Result<()> {
        let (endpoint, _request) = serve_once("200 OK", r#"{"games": []}"#).await?;
        let err = client(endpoint)?.list().await.expect_err("shape mismatch");
        assert!(matches!(err, RemoteError::Malformed(_)));
        assert!(!err.is_recoverable());
        Ok(())
    }

    #[tokio::test]
    async fn delete_sends_id_query() -> anyhow::Result<()> {
        let (endpoint, request) = serve_once("200 OK", r#"{"message":"Game deleted"}"#).await?;
        client(endpoint)?.delete(42).await?;
        assert!(request.await?.starts_with("DELETE /games?id=42"));
        Ok(())
    }

    #[tokio::test]
    async fn server_error_is_recoverable() -> anyhow::Result<()> {
        let (endpoint, _request) =
            serve_once("500 Internal Server Error", r#"{"error":"db offline"}"#).await?;
        let err = client(endpoint)?.delete(1).await.expect_err("500 should fail");
        match &err {
            RemoteError::Status { status, message } => {
                assert_eq!(*status, 500);
                assert_eq!(message, "db offline");
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert!(err.is_recoverable());
        Ok(())
    }
}
