use std::net::SocketAddr;
use axum::body::Body;
use lambda_http::{run, Error};
use tracing::info;
use book_catalog::catalog::controller::router;
use book_catalog::core::controller::AppState;
use book_catalog::core::domain::Configuration;
use book_catalog::utils::logs::setup_tracing;

// See https://docs.aws.amazon.com/lambda/latest/dg/lambda-rust.html
// https://docs.aws.amazon.com/lambda/latest/dg/rust-http-events.html

#[tokio::main]
async fn main() -> Result<(), Error> {
    // a missing .env file is fine, the environment may already be set
    let _ = dotenvy::dotenv();
    let config = Configuration::from_env()?;
    setup_tracing(&config);

    let listen_addr = config.listen_addr.clone();
    let state = AppState::build(config).await;
    info!(store = ?state.config().store, object_store = ?state.config().object_store,
        bucket = state.config().bucket_name.as_str(), "catalog started");

    match listen_addr {
        Some(addr) => {
            let addr: SocketAddr = addr.parse()?;
            info!(%addr, "listening");
            let app = router::<Body>(state);
            axum::Server::bind(&addr).serve(app.into_make_service()).await?;
            Ok(())
        }
        None => run(router::<lambda_http::Body>(state)).await,
    }
}
