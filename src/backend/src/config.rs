use anyhow::Context;
use globe::GlobeConfig;
use serde::{Deserialize, Serialize};
use std::{
    net::{Ipv4Addr, SocketAddr},
    path::{Path, PathBuf},
};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    pub texture: PathBuf,
    /// Static files served under `/`, if any.
    pub assets_dir: Option<PathBuf>,
    pub globe: GlobeConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from((Ipv4Addr::LOCALHOST, 8000)),
            texture: PathBuf::from("./earth-dark.jpg"),
            assets_dir: None,
            globe: GlobeConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn load<P>(path: P) -> anyhow::Result<Self>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;

        let config: Self = serde_json::from_slice(&bytes)
            .with_context(|| format!("parsing {}", path.display()))?;
        config.globe.validate()?;

        Ok(config)
    }
}
