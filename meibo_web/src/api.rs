//! 顧客レコードのJSON API
//!
//! `/customer`配下のHTTPリクエストをリポジトリ操作1回に変換する。

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use meibo::domain::{
    customer::{Customer, CustomerDraft, CustomerId, CustomerRepository},
    DataAccessError, Entity,
};
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{error, info};

type Repository = Arc<dyn CustomerRepository>;

pub fn router(repository: Repository) -> Router {
    Router::new()
        .route(
            "/customer",
            get(list_customers)
                .post(create_customer)
                .put(update_customer),
        )
        .route("/customer/:id", get(get_customer).delete(delete_customer))
        .with_state(repository)
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{} not found", Customer::ENTITY_NAME)]
    NotFound,
    #[error(transparent)]
    Store(#[from] DataAccessError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound => (StatusCode::NOT_FOUND, Json(Value::Null)).into_response(),
            ApiError::Store(e) => {
                error!("ストアエラー: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": e.to_string() })),
                )
                    .into_response()
            }
        }
    }
}

/// 解析できないIDに一致するレコードは存在しない
fn parse_id(id: &str) -> Result<CustomerId, ApiError> {
    id.parse().map_err(|_| ApiError::NotFound)
}

async fn get_customer(
    State(repository): State<Repository>,
    Path(id): Path<String>,
) -> Result<Json<Customer>, ApiError> {
    let id = parse_id(&id)?;
    repository
        .find_by_id(id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound)
}

async fn delete_customer(
    State(repository): State<Repository>,
    Path(id): Path<String>,
) -> Result<Json<Customer>, ApiError> {
    let id = parse_id(&id)?;
    let deleted = repository
        .delete_by_id(id)
        .await?
        .ok_or(ApiError::NotFound)?;
    info!("顧客を削除しました: {}", deleted.id());
    Ok(Json(deleted))
}

async fn list_customers(
    State(repository): State<Repository>,
) -> Result<Json<Vec<Customer>>, ApiError> {
    Ok(Json(repository.find_all().await?))
}

async fn create_customer(
    State(repository): State<Repository>,
    Json(draft): Json<CustomerDraft>,
) -> Result<(StatusCode, Json<Customer>), ApiError> {
    let created = repository.insert(draft).await?;
    info!("顧客を登録しました: {}", created.id());
    Ok((StatusCode::CREATED, Json(created)))
}

/// 更新リクエスト
///
/// `_id`は必須だが、解析できない値は存在しないレコードとして扱う。
#[derive(Deserialize)]
struct UpdateRequest {
    #[serde(rename = "_id")]
    id: RawId,
    #[serde(flatten)]
    draft: CustomerDraft,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(u64),
    Text(String),
    Other(serde::de::IgnoredAny),
}

impl RawId {
    fn parse(&self) -> Result<CustomerId, ApiError> {
        match self {
            RawId::Number(n) => Ok(CustomerId::from(*n)),
            RawId::Text(text) => parse_id(text),
            RawId::Other(_) => Err(ApiError::NotFound),
        }
    }
}

async fn update_customer(
    State(repository): State<Repository>,
    Json(request): Json<UpdateRequest>,
) -> Result<Json<Customer>, ApiError> {
    let id = request.id.parse()?;
    let updated = repository
        .replace(Customer::new(id, request.draft))
        .await?
        .ok_or(ApiError::NotFound)?;
    info!("顧客を更新しました: {}", id);
    Ok(Json(updated))
}
