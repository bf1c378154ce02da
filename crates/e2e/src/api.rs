//! HTTP client wrapper for the todo REST API

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

use crate::config::ApiConfig;
use crate::error::{E2eError, E2eResult};
use crate::model::{
    AuthRequest, AuthResponse, AuthToken, Credentials, GroupItem, GroupItemParams, NewTaskItem,
    TaskItem, TaskItemUpdate,
};

/// A successful (2xx) response
#[derive(Debug, Clone)]
pub struct ApiResponse<T> {
    pub status: u16,
    pub data: T,
}

/// Client bound to the API base URL.
///
/// Default headers are sent with every request; [`ApiClient::set_auth_token`]
/// adds the bearer credential to them, so every later call is authenticated.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    default_headers: HeaderMap,
}

impl ApiClient {
    /// Build a client for `base_url` with the given default headers.
    pub fn configure(
        base_url: &str,
        default_headers: HeaderMap,
        timeout: Duration,
    ) -> E2eResult<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            default_headers,
        })
    }

    /// JSON client from the suite configuration
    pub fn from_config(config: &ApiConfig) -> E2eResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Self::configure(
            &config.base_url,
            headers,
            Duration::from_millis(config.timeout_ms),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Attach `Authorization: Bearer <token>` to all future requests.
    pub fn set_auth_token(&mut self, token: &AuthToken) -> E2eResult<()> {
        let value = HeaderValue::from_str(&format!("Bearer {}", token.as_str()))
            .map_err(|e| E2eError::Config(format!("auth token is not a valid header: {}", e)))?;
        self.default_headers.insert(AUTHORIZATION, value);
        Ok(())
    }

    pub fn is_authenticated(&self) -> bool {
        self.default_headers.contains_key(AUTHORIZATION)
    }

    /// Copy of this client without the bearer credential.
    pub fn without_auth(&self) -> Self {
        let mut client = self.clone();
        client.default_headers.remove(AUTHORIZATION);
        client
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> E2eResult<ApiResponse<T>> {
        self.send(self.request(Method::GET, path)).await
    }

    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> E2eResult<ApiResponse<T>> {
        self.send(self.request(Method::POST, path).json(body)).await
    }

    pub async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> E2eResult<ApiResponse<T>> {
        self.send(self.request(Method::PUT, path).json(body)).await
    }

    /// DELETE; the body (usually empty on 204) is discarded.
    pub async fn delete(&self, path: &str) -> E2eResult<ApiResponse<()>> {
        let (status, _) = self.execute(self.request(Method::DELETE, path)).await?;
        Ok(ApiResponse { status, data: () })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!("{} {}", method, url);
        self.http
            .request(method, url)
            .headers(self.default_headers.clone())
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> E2eResult<ApiResponse<T>> {
        let (status, bytes) = self.execute(request).await?;
        let data = serde_json::from_slice(&bytes)?;
        Ok(ApiResponse { status, data })
    }

    /// Perform the request; non-2xx statuses become [`E2eError::Api`].
    async fn execute(&self, request: RequestBuilder) -> E2eResult<(u16, Vec<u8>)> {
        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(transport_error)?;
        debug!("-> {} ({} bytes)", status, bytes.len());

        if status.is_success() {
            Ok((status.as_u16(), bytes.to_vec()))
        } else {
            Err(E2eError::Api {
                status: status.as_u16(),
                data: decode_error_body(&bytes),
            })
        }
    }

    // Typed endpoints

    pub async fn authenticate(&self, credentials: &Credentials) -> E2eResult<ApiResponse<AuthResponse>> {
        self.post("/auth_token", &AuthRequest { credentials }).await
    }

    pub async fn list_group_items(&self) -> E2eResult<ApiResponse<Vec<GroupItem>>> {
        self.get("/group_items").await
    }

    pub async fn create_group_item(&self, list_title: &str) -> E2eResult<ApiResponse<GroupItem>> {
        let body = GroupItemParams {
            list_title: list_title.to_string(),
        };
        self.post("/group_items", &body).await
    }

    pub async fn get_group_item(&self, id: i64) -> E2eResult<ApiResponse<GroupItem>> {
        self.get(&format!("/group_items/{}", id)).await
    }

    pub async fn update_group_item(&self, id: i64, list_title: &str) -> E2eResult<ApiResponse<GroupItem>> {
        let body = GroupItemParams {
            list_title: list_title.to_string(),
        };
        self.put(&format!("/group_items/{}", id), &body).await
    }

    pub async fn delete_group_item(&self, id: i64) -> E2eResult<ApiResponse<()>> {
        self.delete(&format!("/group_items/{}", id)).await
    }

    pub async fn list_items(&self, group_id: i64) -> E2eResult<ApiResponse<Vec<TaskItem>>> {
        self.get(&format!("/group_items/{}/items", group_id)).await
    }

    pub async fn create_item(&self, group_id: i64, title: &str) -> E2eResult<ApiResponse<TaskItem>> {
        let body = NewTaskItem {
            title: title.to_string(),
        };
        self.post(&format!("/group_items/{}/items", group_id), &body).await
    }

    pub async fn get_item(&self, group_id: i64, id: i64) -> E2eResult<ApiResponse<TaskItem>> {
        self.get(&format!("/group_items/{}/items/{}", group_id, id)).await
    }

    pub async fn update_item(
        &self,
        group_id: i64,
        id: i64,
        update: &TaskItemUpdate,
    ) -> E2eResult<ApiResponse<TaskItem>> {
        self.put(&format!("/group_items/{}/items/{}", group_id, id), update).await
    }

    pub async fn delete_item(&self, group_id: i64, id: i64) -> E2eResult<ApiResponse<()>> {
        self.delete(&format!("/group_items/{}/items/{}", group_id, id)).await
    }
}

fn transport_error(e: reqwest::Error) -> E2eError {
    if e.is_timeout() {
        let url = e.url().map(|u| u.to_string()).unwrap_or_default();
        E2eError::Timeout(format!("HTTP response from {}", url))
    } else {
        E2eError::Http(e)
    }
}

fn decode_error_body(bytes: &[u8]) -> serde_json::Value {
    if bytes.is_empty() {
        return serde_json::Value::Null;
    }
    serde_json::from_slice(bytes).unwrap_or_else(|_| {
        serde_json::Value::String(String::from_utf8_lossy(bytes).into_owned())
    })
}

/// Turn an expected failure into its payload.
///
/// A success, or a failure with a different status, is an assertion failure;
/// transport errors propagate unchanged.
pub fn expect_api_error<T>(result: E2eResult<ApiResponse<T>>, expected: u16) -> E2eResult<serde_json::Value> {
    match result {
        Ok(response) => Err(E2eError::AssertionFailed(format!(
            "request should have failed with {} but returned {}",
            expected, response.status
        ))),
        Err(E2eError::Api { status, data }) if status == expected => Ok(data),
        Err(E2eError::Api { status, data }) => Err(E2eError::AssertionFailed(format!(
            "expected status {} but got {}: {}",
            expected, status, data
        ))),
        Err(e) => Err(e),
    }
}
