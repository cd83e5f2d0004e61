// HTTP client wrapper for the network monitor API

use reqwest::StatusCode;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Not found: {0}")]
    NotFound(String),
}

/// Error body returned by the API
#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// Prefer the API's `error` field; fall back to the raw body
fn error_message(body: String) -> String {
    serde_json::from_str::<ErrorBody>(&body)
        .map(|b| b.error)
        .unwrap_or(body)
}

pub struct Client {
    base_url: String,
    http: reqwest::Client,
}

impl Client {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let response = self.http.get(self.url(path)).send().await?;
        self.handle_response(response).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let response = self.http.post(self.url(path)).json(body).send().await?;
        self.handle_response(response).await
    }

    pub async fn put<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let response = self.http.put(self.url(path)).json(body).send().await?;
        self.handle_response(response).await
    }

    pub async fn delete(&self, path: &str) -> Result<(), ClientError> {
        let response = self.http.delete(self.url(path)).send().await?;

        if response.status() == StatusCode::NO_CONTENT || response.status() == StatusCode::OK {
            return Ok(());
        }
        Err(Self::failure(response).await)
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        if !response.status().is_success() {
            return Err(Self::failure(response).await);
        }

        let body = response.json().await?;
        Ok(body)
    }

    async fn failure(response: reqwest::Response) -> ClientError {
        let status = response.status();
        let message = error_message(response.text().await.unwrap_or_default());

        if status == StatusCode::NOT_FOUND {
            ClientError::NotFound(message)
        } else {
            ClientError::Api {
                status: status.as_u16(),
                message,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_from_api_body() {
        let body = r#"{"error":"Event (eventId: 3) not found."}"#.to_string();
        assert_eq!(error_message(body), "Event (eventId: 3) not found.");
    }

    #[test]
    fn test_error_message_falls_back_to_raw_body() {
        assert_eq!(error_message("bad gateway".to_string()), "bad gateway");
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let client = Client::new("http://localhost:9000/");
        assert_eq!(client.url("/api/events"), "http://localhost:9000/api/events");
    }
}
