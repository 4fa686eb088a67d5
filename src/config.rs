//! Runtime configuration loaded from environment variables.
//!
//! | Variable                  | Default                                   |
//! |---------------------------|-------------------------------------------|
//! | `INVENTORY_DATA_DIR`      | platform data dir for `smart-inventory`   |
//! | `INVENTORY_DB_PATH`       | `<data_dir>/inventory.db`                 |
//! | `INVENTORY_STATIC_DIR`    | `<data_dir>/static`                       |
//! | `INVENTORY_HOST`          | `127.0.0.1`                               |
//! | `INVENTORY_PORT`          | `3000`                                    |
//! | `INVENTORY_BASE_URL`      | `http://<host>:<port>`                    |
//! | `INVENTORY_CORS_ORIGINS`  | unset (permissive), comma-separated list  |

use std::path::PathBuf;

use anyhow::{anyhow, Result};

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 3000;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_path: PathBuf,
    pub static_dir: PathBuf,
    pub host: String,
    pub port: u16,
    /// Public root URL encoded into QR codes. `None` means derive it from
    /// host and port.
    pub base_url: Option<String>,
    pub cors_origins: Option<Vec<String>>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source.
    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let data_dir = match var("INVENTORY_DATA_DIR") {
            Some(dir) => PathBuf::from(dir),
            None => default_data_dir()?,
        };

        let database_path = var("INVENTORY_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir.join("inventory.db"));

        let static_dir = var("INVENTORY_STATIC_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir.join("static"));

        let host = var("INVENTORY_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = match var("INVENTORY_PORT") {
            Some(p) => p
                .parse()
                .map_err(|_| anyhow!("INVENTORY_PORT is not a valid port: {}", p))?,
            None => DEFAULT_PORT,
        };

        let cors_origins = var("INVENTORY_CORS_ORIGINS").map(|s| {
            s.split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        });

        Ok(Self {
            database_path,
            static_dir,
            host,
            port,
            base_url: var("INVENTORY_BASE_URL"),
            cors_origins,
        })
    }

    pub fn base_url(&self) -> String {
        self.base_url
            .clone()
            .unwrap_or_else(|| format!("http://{}:{}", self.host, self.port))
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn default_data_dir() -> Result<PathBuf> {
    let dirs = directories::ProjectDirs::from("", "", "smart-inventory")
        .ok_or_else(|| anyhow!("Could not determine data directory"))?;
    Ok(dirs.data_dir().to_path_buf())
}
