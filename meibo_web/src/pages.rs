//! 顧客一覧・詳細のHTML画面
//!
//! 画面はサーバー側に状態を持たず、全てのデータを[`RecordClient`]経由でAPIから取得する。
//! 登録・更新・削除の後は一覧へリダイレクトして再取得させる。

pub mod form;
pub mod view;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use meibo::domain::customer::CustomerId;
use serde::Deserialize;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::client::{ClientError, RecordClient};

use self::form::{CustomerForm, FormErrors, FormState, Submission};
use self::view::DetailView;

static LIST_PATH: &str = "/customer";

pub fn router(client: RecordClient) -> Router {
    Router::new()
        .route("/", get(|| async { Redirect::to(LIST_PATH) }))
        .route("/customer", get(list_page).post(submit_form))
        .route("/customer/:id", get(detail_page))
        .route("/customer/:id/delete", post(delete_customer))
        .with_state(client)
}

#[derive(Error, Debug)]
pub enum PageError {
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        error!("画面表示エラー: {}", self);
        let status = match self {
            PageError::Client(_) => StatusCode::BAD_GATEWAY,
            PageError::Template(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        match view::error(&self.to_string()) {
            Ok(html) => (status, Html(html)).into_response(),
            Err(_) => (status, self.to_string()).into_response(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ListParams {
    edit: Option<String>,
}

async fn list_page(
    State(client): State<RecordClient>,
    Query(params): Query<ListParams>,
) -> Result<Html<String>, PageError> {
    let customers = client.list().await?;
    let state = match params.edit.as_deref() {
        Some(id) => FormState::edit_from_list(id, &customers),
        None => FormState::Adding,
    };
    let html = view::list(&customers, &state, &state.values(), &FormErrors::default())?;
    Ok(Html(html))
}

async fn submit_form(
    State(client): State<RecordClient>,
    Form(form): Form<CustomerForm>,
) -> Result<Response, PageError> {
    if form.is_cancel() {
        let customers = client.list().await?;
        let state = FormState::resume(&form, &customers).cancel();
        info!("編集を取り消しました");
        let html = view::list(&customers, &state, &state.values(), &FormErrors::default())?;
        return Ok(Html(html).into_response());
    }
    match form.submission() {
        Ok(Submission::Create(draft)) => {
            let created = client.create(&draft).await?;
            info!("顧客を登録しました: {}", created.id);
        }
        Ok(Submission::Update(customer)) => match client.update(&customer).await? {
            Some(updated) => info!("顧客を更新しました: {}", updated.id),
            None => warn!("更新対象の顧客が存在しません: {}", customer.id),
        },
        Err(errors) => {
            warn!("入力エラー: {}", errors);
            let customers = client.list().await?;
            let state = FormState::resume(&form, &customers);
            let html = view::list(&customers, &state, &form, &errors)?;
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, Html(html)).into_response());
        }
    }
    Ok(Redirect::to(LIST_PATH).into_response())
}

async fn delete_customer(
    State(client): State<RecordClient>,
    Path(id): Path<String>,
) -> Result<Redirect, PageError> {
    if let Ok(id) = id.parse::<CustomerId>() {
        if let Some(deleted) = client.delete(id).await? {
            info!("顧客を削除しました: {}", deleted.id);
        }
    }
    Ok(Redirect::to(LIST_PATH))
}

async fn detail_page(
    State(client): State<RecordClient>,
    Path(id): Path<String>,
) -> Result<Response, PageError> {
    let view = match id.parse::<CustomerId>() {
        Ok(id) => match client.get(id).await {
            Ok(Some(customer)) => DetailView::Found(customer),
            Ok(None) => DetailView::NotFound,
            Err(e) => {
                error!("顧客の取得に失敗しました: {}", e);
                DetailView::Loading
            }
        },
        Err(_) => DetailView::NotFound,
    };
    let status = match view {
        DetailView::NotFound => StatusCode::NOT_FOUND,
        _ => StatusCode::OK,
    };
    Ok((status, Html(view::detail(&view)?)).into_response())
}
