use anyhow::{bail, Context};
use log::{error, info};
use std::net::{IpAddr, TcpListener};
use std::sync::Arc;

use imago_search::config::Config;
use imago_search::photo_search::PhotoSearch;
use imago_search::search_backend::ElasticsearchClient;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = Config::from_env().context("Failed to load configuration")?;
    let host: IpAddr = config
        .host
        .parse()
        .with_context(|| format!("Invalid bind address {:?}", config.host))?;
    let port = config.port;

    info!("Starting imago-search on {}:{}", host, port);
    info!(
        "Search backend: {} (index '{}', verify certs: {})",
        config.elasticsearch.host, config.elasticsearch.index, config.elasticsearch.verify_certs
    );

    if !is_port_available(host, port) {
        error!(
            "Port {} is already in use. Stop the other process or set IMAGO_SEARCH_PORT.",
            port
        );
        bail!("Port {} is already in use", port);
    }

    let client = ElasticsearchClient::new(&config.elasticsearch);
    let photo_search = PhotoSearch::new(Arc::new(client), config.elasticsearch.index.clone());

    let routes = imago_search::build_routes(photo_search);

    info!(
        "Server started successfully, listening on http://{}:{}",
        host, port
    );

    warp::serve(routes).run((host, port)).await;

    Ok(())
}

fn is_port_available(host: IpAddr, port: u16) -> bool {
    TcpListener::bind((host, port)).is_ok()
}
