use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use inspecta_client::{ApiConfig, InspectionApi};
use inspecta_worker::{poller, PollerConfig, Store};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "inspecta_worker=debug,inspecta_client=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let api_config = ApiConfig::from_env();
    let poller_config = PollerConfig::from_env();
    let root = std::env::var("INSPECTIONS_ROOT").unwrap_or_else(|_| "Inspections".into());

    tracing::info!(
        base_url = %api_config.base_url,
        root = %root,
        "Loaded worker configuration"
    );

    let api = InspectionApi::new(api_config);
    let store = Store::new(root);

    let cancel = CancellationToken::new();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Received SIGINT (Ctrl-C), stopping poller");
            signal_cancel.cancel();
        }
    });

    poller::run(api, store, poller_config, cancel).await;

    tracing::info!("Worker shut down");
}
