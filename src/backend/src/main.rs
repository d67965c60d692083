use anyhow::Context;
use backend::{earth_map, router, BackendState, ServerConfig};
use clap::Parser;
use log::info;
use std::{net::SocketAddr, path::PathBuf};
use tower_http::{services::ServeDir, trace::TraceLayer};

#[derive(Parser, Debug)]
#[clap(author, version, about = "Serves dotted globe geometry sampled from a world map")]
struct Args {
    /// JSON config file, every field optional
    #[clap(short, long)]
    config: Option<PathBuf>,

    /// World map texture, overrides the config file
    #[clap(short, long)]
    texture: Option<PathBuf>,

    /// Listen address, overrides the config file
    #[clap(short, long)]
    addr: Option<SocketAddr>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => ServerConfig::load(path)?,
        None => ServerConfig::default(),
    };
    if let Some(texture) = args.texture {
        config.texture = texture;
    }
    if let Some(addr) = args.addr {
        config.addr = addr;
    }

    let buffer = earth_map::load_texture(&config.texture)?;
    let state = BackendState::new(buffer, config.globe.clone());

    let mut router = router(state);
    if let Some(assets) = &config.assets_dir {
        router = router.fallback_service(ServeDir::new(assets));
    }

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("binding {}", config.addr))?;

    info!("Listening on {}:{}", config.addr.ip(), config.addr.port());

    axum::serve(listener, router.layer(TraceLayer::new_for_http())).await?;

    Ok(())
}
