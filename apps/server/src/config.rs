use std::{net::SocketAddr, path::PathBuf, time::Duration};

use anyhow::Context;

pub struct Config {
    pub listen_addr: SocketAddr,
    pub data_path: PathBuf,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    /// Whether `CASH` positions count towards the asset summary
    pub include_cash: bool,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let listen_addr: SocketAddr = std::env::var("PINSIGHT_LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8080".to_string())
            .parse()
            .context("Invalid PINSIGHT_LISTEN_ADDR")?;
        let data_path = std::env::var("PINSIGHT_DATA_PATH")
            .unwrap_or_else(|_| "./data/portfolio.json".into())
            .into();
        let cors_allow = std::env::var("PINSIGHT_CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|_| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let timeout_ms: u64 = std::env::var("PINSIGHT_REQUEST_TIMEOUT_MS")
            .unwrap_or_else(|_| "30000".into())
            .parse()
            .unwrap_or(30000);
        let include_cash = std::env::var("PINSIGHT_INCLUDE_CASH")
            .map(|v| !matches!(v.trim().to_ascii_lowercase().as_str(), "false" | "0" | "no"))
            .unwrap_or(true);
        Ok(Self {
            listen_addr,
            data_path,
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
            include_cash,
        })
    }
}
