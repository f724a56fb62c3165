//! 結合テスト用にアプリケーションを起動する

#![allow(dead_code)]

use std::{net::TcpListener, sync::Arc};

use meibo::domain::IdGenerator;
use meibo::infrastructure::InMemoryCustomerRepository;
use meibo_web::RecordClient;
use snowflake::SnowflakeIdGenerator;

pub struct TestApp {
    /// `http://127.0.0.1:{port}`
    pub address: String,
}

impl TestApp {
    /// メモリ上のリポジトリでアプリケーションを起動する。画面は自身のAPIを呼び出す。
    pub fn spawn() -> Self {
        Self::spawn_with(None)
    }

    /// 画面の呼び出し先APIを差し替えて起動する
    pub fn spawn_with(api_base_url: Option<&str>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let address = format!("http://{}", listener.local_addr().unwrap());
        let api_base_url = api_base_url
            .map(str::to_owned)
            .unwrap_or_else(|| format!("{}/api", address));

        let generator = IdGenerator::from(SnowflakeIdGenerator::new(1, 1));
        let app = meibo_web::app(
            Arc::new(InMemoryCustomerRepository::new(generator)),
            RecordClient::new(api_base_url),
        );
        let server = axum::Server::from_tcp(listener)
            .unwrap()
            .serve(app.into_make_service());
        tokio::spawn(server);

        Self { address }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub fn api(&self) -> RecordClient {
        RecordClient::new(self.url("/api"))
    }
}
