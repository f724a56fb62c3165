use std::{error::Error, net::SocketAddr};

use axum_server::tls_rustls::RustlsConfig;
use meibo::{infrastructure::customer_repository, MeiboConfig};
use meibo_web::RecordClient;
use tracing::{error, info, Level};

#[tokio::main]
async fn main() {
    let config = match std::env::args().nth(1) {
        Some(path) => MeiboConfig::load_from(path),
        None => MeiboConfig::load(),
    };
    match config {
        Ok(config) => {
            tracing_subscriber::fmt()
                .with_max_level(Level::from(&config.logger.level))
                .init();
            if let Err(error) = serve(&config).await {
                error!("アプリケーションエラー: {}", error);
            }
        }
        Err(error) => {
            tracing_subscriber::fmt::init();
            error!("設定の読み込みに失敗しました: {}", error)
        }
    }
}

async fn serve(config: &MeiboConfig) -> Result<(), Box<dyn Error>> {
    let address = config.server.address.parse::<SocketAddr>()?;
    let app = meibo_web::app(
        customer_repository(config),
        RecordClient::new(&config.server.api_base_url),
    );

    match (&config.server.tls_cert, &config.server.tls_key) {
        (Some(cert), Some(key)) => {
            let tls = RustlsConfig::from_pem_file(cert, key).await?;
            info!("https://{} で待ち受けます", address);
            axum_server::bind_rustls(address, tls)
                .serve(app.into_make_service())
                .await?;
        }
        _ => {
            info!("http://{} で待ち受けます", address);
            axum_server::bind(address)
                .serve(app.into_make_service())
                .await?;
        }
    }
    Ok(())
}
