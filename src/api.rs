use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response};
use serde::Deserialize;
use url::Url;

use crate::config::AppConfig;
use crate::data::{Client, ClientForm};

const USERS_PATH: [&str; 3] = ["api", "v1", "users"];

#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    InvalidUrl(String),
    Network(String),
    Rejected { status: u16, message: Option<String> },
    Decode(String),
}

impl ApiError {
    /// Message supplied by the server in the error body, if any.
    pub fn user_message(&self) -> Option<&str> {
        match self {
            ApiError::Rejected {
                message: Some(message),
                ..
            } => Some(message),
            _ => None,
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::InvalidUrl(msg) => write!(f, "Invalid URL: {}", msg),
            ApiError::Network(msg) => write!(f, "Network error: {}", msg),
            ApiError::Rejected {
                status,
                message: Some(message),
            } => write!(f, "Request rejected ({}): {}", status, message),
            ApiError::Rejected {
                status,
                message: None,
            } => write!(f, "Request rejected ({})", status),
            ApiError::Decode(msg) => write!(f, "Invalid response: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// The client collection as exposed by the backend.
#[async_trait]
pub trait ClientBackend: Send + Sync {
    async fn list_clients(&self) -> Result<Vec<Client>, ApiError>;
    async fn create_client(&self, form: &ClientForm) -> Result<(), ApiError>;
    async fn update_client(&self, id: &str, form: &ClientForm) -> Result<(), ApiError>;
    async fn delete_client(&self, id: &str) -> Result<(), ApiError>;
}

pub struct HttpClientBackend {
    http: reqwest::Client,
    base_url: Url,
    auth_token: Option<String>,
}

impl HttpClientBackend {
    pub fn new(base_url: &str, auth_token: Option<String>) -> Result<Self, ApiError> {
        let base_url =
            Url::parse(base_url).map_err(|e| ApiError::InvalidUrl(format!("{}: {}", base_url, e)))?;

        if !matches!(base_url.scheme(), "http" | "https") || base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(format!(
                "{} is not an http(s) base URL",
                base_url
            )));
        }

        Ok(Self {
            http: reqwest::Client::new(),
            base_url,
            auth_token: auth_token.filter(|token| !token.is_empty()),
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, ApiError> {
        Self::new(&config.api_base_url, config.auth_token.clone())
    }

    fn users_url(&self, id: Option<&str>) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| ApiError::InvalidUrl(self.base_url.to_string()))?;
            segments.pop_if_empty().extend(USERS_PATH);
            if let Some(id) = id {
                segments.push(id);
            }
        }
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.http.request(method, url);
        match &self.auth_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(builder: RequestBuilder) -> Result<Response, ApiError> {
        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|body| body.message);

        log::warn!("Backend rejected request with status {}", status);
        Err(ApiError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl ClientBackend for HttpClientBackend {
    async fn list_clients(&self) -> Result<Vec<Client>, ApiError> {
        let url = self.users_url(None)?;
        log::info!("Fetching clients from {}", url);

        let response = Self::send(self.request(Method::GET, url)).await?;
        let clients: Vec<Client> = response
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))?;

        log::info!("Fetched {} clients", clients.len());
        Ok(clients)
    }

    async fn create_client(&self, form: &ClientForm) -> Result<(), ApiError> {
        let url = self.users_url(None)?;
        log::info!("Creating client '{}'", form.ap_id);

        Self::send(self.request(Method::POST, url).json(form)).await?;
        Ok(())
    }

    async fn update_client(&self, id: &str, form: &ClientForm) -> Result<(), ApiError> {
        let url = self.users_url(Some(id))?;
        log::info!("Updating client {}", id);

        Self::send(self.request(Method::PUT, url).json(form)).await?;
        Ok(())
    }

    async fn delete_client(&self, id: &str) -> Result<(), ApiError> {
        let url = self.users_url(Some(id))?;
        log::info!("Deleting client {}", id);

        Self::send(self.request(Method::DELETE, url)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn form() -> ClientForm {
        ClientForm {
            ap_id: "C1".to_string(),
            name: "Ann".to_string(),
            surname: "Lee".to_string(),
            gender: "Female".to_string(),
        }
    }

    #[test]
    fn test_rejects_non_http_urls() {
        assert!(matches!(
            HttpClientBackend::new("not a url", None),
            Err(ApiError::InvalidUrl(_))
        ));
        assert!(matches!(
            HttpClientBackend::new("mailto:admin@example.com", None),
            Err(ApiError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_users_url_keeps_base_path() {
        let backend = HttpClientBackend::new("http://localhost:8080/crm/", None).unwrap();
        assert_eq!(
            backend.users_url(None).unwrap().as_str(),
            "http://localhost:8080/crm/api/v1/users"
        );
        assert_eq!(
            backend.users_url(Some("a b")).unwrap().as_str(),
            "http://localhost:8080/crm/api/v1/users/a%20b"
        );
    }

    #[tokio::test]
    async fn test_list_clients() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/users"))
            .and(header("Authorization", "Bearer secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": "1", "apId": "C1", "name": "Ann", "surname": "Lee", "gender": "Female"}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let backend = HttpClientBackend::new(&server.uri(), Some("secret".to_string())).unwrap();
        let clients = backend.list_clients().await.unwrap();

        assert_eq!(clients.len(), 1);
        assert_eq!(clients[0].ap_id, "C1");
    }

    #[tokio::test]
    async fn test_create_posts_form_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/users"))
            .and(body_json(json!({
                "apId": "C1", "name": "Ann", "surname": "Lee", "gender": "Female"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "id": "1", "apId": "C1", "name": "Ann", "surname": "Lee", "gender": "Female"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let backend = HttpClientBackend::new(&server.uri(), None).unwrap();
        assert!(backend.create_client(&form()).await.is_ok());
    }

    #[tokio::test]
    async fn test_update_surfaces_server_message() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/v1/users/42"))
            .respond_with(
                ResponseTemplate::new(400).set_body_json(json!({"message": "Name too long"})),
            )
            .mount(&server)
            .await;

        let backend = HttpClientBackend::new(&server.uri(), None).unwrap();
        let err = backend.update_client("42", &form()).await.unwrap_err();

        assert_eq!(
            err,
            ApiError::Rejected {
                status: 400,
                message: Some("Name too long".to_string())
            }
        );
        assert_eq!(err.user_message(), Some("Name too long"));
    }

    #[tokio::test]
    async fn test_error_without_message_body() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/v1/users/7"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let backend = HttpClientBackend::new(&server.uri(), None).unwrap();
        let err = backend.delete_client("7").await.unwrap_err();

        assert_eq!(
            err,
            ApiError::Rejected {
                status: 500,
                message: None
            }
        );
        assert_eq!(err.user_message(), None);
    }

    #[tokio::test]
    async fn test_delete_accepts_empty_body() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/v1/users/7"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let backend = HttpClientBackend::new(&server.uri(), None).unwrap();
        assert!(backend.delete_client("7").await.is_ok());
    }

    #[tokio::test]
    async fn test_malformed_list_is_a_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/users"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"clients": []})))
            .mount(&server)
            .await;

        let backend = HttpClientBackend::new(&server.uri(), None).unwrap();
        assert!(matches!(
            backend.list_clients().await,
            Err(ApiError::Decode(_))
        ));
    }
}
