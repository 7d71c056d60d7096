//! Server configuration from environment variables.

use anyhow::Context;
use std::net::SocketAddr;
use std::path::PathBuf;

const DEFAULT_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_TILES_PATH: &str = "data/tiles.json";
const DEFAULT_CARDS_PATH: &str = "data/cards.json";
const DEFAULT_SOLUTIONS_PATH: &str = "data/best_solutions.json";
const DEFAULT_PERCENTILES_PATH: &str = "data/percentiles.json";

/// Where to listen and where the game data lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    /// Tile catalog, required
    pub tiles_path: PathBuf,
    /// Objective cards, required
    pub cards_path: PathBuf,
    /// Optimal boards per card selection, optional
    pub solutions_path: PathBuf,
    /// Percentile table for card scoring, optional
    pub percentiles_path: PathBuf,
}

impl ServerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable source; unset variables take their defaults
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.to_string());

        let addr_text = var("SERVER_ADDR", DEFAULT_ADDR);
        let addr = addr_text
            .parse()
            .with_context(|| format!("Invalid SERVER_ADDR: {}", addr_text))?;

        Ok(Self {
            addr,
            tiles_path: var("TILES_PATH", DEFAULT_TILES_PATH).into(),
            cards_path: var("CARDS_PATH", DEFAULT_CARDS_PATH).into(),
            solutions_path: var("SOLUTIONS_PATH", DEFAULT_SOLUTIONS_PATH).into(),
            percentiles_path: var("PERCENTILES_PATH", DEFAULT_PERCENTILES_PATH).into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.addr, "0.0.0.0:8080".parse::<SocketAddr>().unwrap());
        assert_eq!(config.tiles_path, PathBuf::from("data/tiles.json"));
        assert_eq!(config.solutions_path, PathBuf::from("data/best_solutions.json"));
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("SERVER_ADDR", "127.0.0.1:9000"),
            ("CARDS_PATH", "/srv/cards.json"),
        ]
        .into_iter()
        .collect();
        let config = ServerConfig::from_lookup(|name| vars.get(name).map(|v| v.to_string())).unwrap();
        assert_eq!(config.addr.port(), 9000);
        assert_eq!(config.cards_path, PathBuf::from("/srv/cards.json"));
        assert_eq!(config.percentiles_path, PathBuf::from("data/percentiles.json"));
    }

    #[test]
    fn test_bad_address() {
        let result = ServerConfig::from_lookup(|name| {
            (name == "SERVER_ADDR").then(|| "not-an-address".to_string())
        });
        assert!(result.is_err());
    }
}
