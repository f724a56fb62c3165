pub mod customer;

use std::sync::{Arc, Mutex};

use meilisearch_sdk::errors::{Error, ErrorCode, MeilisearchError};
use snowflake::SnowflakeIdGenerator;
use tracing::info;

use crate::domain::customer::CustomerRepository;
use crate::domain::{DataAccessError, IdGenerator};
use crate::{Backend, MeiboConfig};

pub use self::customer::*;

impl From<Error> for DataAccessError {
    fn from(value: Error) -> Self {
        let message = value.to_string().into();
        match value {
            Error::Meilisearch(_) => Self::QueryError(message),
            Error::ParseError(_) => Self::ReadError(message),
            Error::Timeout => Self::ConnectionError(message),
            _ => Self::ConnectionError(message),
        }
    }
}

/// Meilisearchが「存在しない」と答えたエラーかどうか
fn is_not_found(error: &Error) -> bool {
    matches!(
        error,
        Error::Meilisearch(MeilisearchError {
            error_code: ErrorCode::DocumentNotFound | ErrorCode::IndexNotFound,
            ..
        })
    )
}

fn next_id<T>(generator: &Mutex<IdGenerator>) -> Result<T, DataAccessError>
where
    T: From<u64>,
{
    let mut generator = generator
        .lock()
        .map_err(|e| DataAccessError::ClientSideError(e.to_string().into()))?;
    Ok(generator.generate())
}

/// 設定に従って顧客リポジトリを生成する
pub fn customer_repository(config: &MeiboConfig) -> Arc<dyn CustomerRepository> {
    let generator = IdGenerator::from(SnowflakeIdGenerator::new(
        config.store.machine_id,
        config.store.node_id,
    ));
    match config.store.backend {
        Backend::Memory => {
            info!("顧客をメモリ上に保存します");
            Arc::new(InMemoryCustomerRepository::new(generator))
        }
        Backend::Meilisearch => {
            info!(
                "顧客をMeilisearchに保存します: {} ({})",
                config.meilisearch.url, config.meilisearch.index
            );
            let client = meilisearch_sdk::Client::new(
                &config.meilisearch.url,
                &config.meilisearch.api_key,
            );
            Arc::new(MeiliCustomerRepository::new(
                client,
                &config.meilisearch.index,
                generator,
            ))
        }
    }
}
