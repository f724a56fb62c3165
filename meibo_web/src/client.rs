//! ページからJSON APIを呼び出すHTTPクライアント

use meibo::domain::customer::{Customer, CustomerDraft, CustomerId};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Record service request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Record service answered {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("Record service response could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),
}

/// 顧客APIのクライアント
///
/// `base_url`はAPIのルート（例: `http://127.0.0.1:8080/api`）。
#[derive(Clone, Debug)]
pub struct RecordClient {
    http: reqwest::Client,
    base_url: String,
}

impl RecordClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Self { http, base_url }
    }

    fn collection_url(&self) -> String {
        format!("{}/customer", self.base_url)
    }

    fn record_url(&self, id: CustomerId) -> String {
        format!("{}/customer/{}", self.base_url, id)
    }

    pub async fn list(&self) -> Result<Vec<Customer>, ClientError> {
        let response = self.http.get(self.collection_url()).send().await?;
        decode(response).await
    }

    pub async fn get(&self, id: CustomerId) -> Result<Option<Customer>, ClientError> {
        let response = self.http.get(self.record_url(id)).send().await?;
        decode_optional(response).await
    }

    pub async fn create(&self, draft: &CustomerDraft) -> Result<Customer, ClientError> {
        let response = self
            .http
            .post(self.collection_url())
            .json(draft)
            .send()
            .await?;
        decode(response).await
    }

    /// 該当する顧客がいなければ`None`
    pub async fn update(&self, customer: &Customer) -> Result<Option<Customer>, ClientError> {
        let response = self
            .http
            .put(self.collection_url())
            .json(customer)
            .send()
            .await?;
        decode_optional(response).await
    }

    /// 該当する顧客がいなければ`None`
    pub async fn delete(&self, id: CustomerId) -> Result<Option<Customer>, ClientError> {
        let response = self.http.delete(self.record_url(id)).send().await?;
        decode_optional(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ClientError::Status { status, body });
    }
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

async fn decode_optional<T: DeserializeOwned>(
    response: Response,
) -> Result<Option<T>, ClientError> {
    match response.status() {
        StatusCode::NOT_FOUND => Ok(None),
        _ => decode(response).await.map(Some),
    }
}
