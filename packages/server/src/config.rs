//! Command line and environment configuration.

use std::{path::PathBuf, sync::Arc};

use clap::Parser;
use rand::{SeedableRng, rngs::StdRng};

use crate::{
    domain::RepositoryError,
    infrastructure::store::{InMemoryStore, JsonFileStore, KeyValueStore},
};

#[derive(Parser, Clone, Debug)]
#[command(name = "hiroba-server", version, about = "Single shared chat room server")]
pub struct ServerArgs {
    /// Address to bind
    #[arg(long, env = "HIROBA_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "HIROBA_PORT", default_value_t = 8787)]
    pub port: u16,

    /// Directory served for every path that is not an API route
    #[arg(long, env = "HIROBA_STATIC_DIR", default_value = "public")]
    pub static_dir: PathBuf,

    /// JSON file holding the durable room state. In-memory when omitted.
    #[arg(long, env = "HIROBA_DATA_FILE")]
    pub data_file: Option<PathBuf>,

    /// Default log level when RUST_LOG is unset
    #[arg(long, env = "HIROBA_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Seed for generated display names
    #[arg(long, env = "HIROBA_NAME_SEED")]
    pub name_seed: Option<u64>,
}

impl ServerArgs {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Open the durable store selected by `--data-file`.
    pub async fn open_store(&self) -> Result<Arc<dyn KeyValueStore>, RepositoryError> {
        match &self.data_file {
            Some(path) => {
                let store = JsonFileStore::open(path.clone()).await?;
                tracing::info!("Room state stored in {}", path.display());
                Ok(Arc::new(store))
            }
            None => {
                tracing::warn!("No data file configured; room state will not survive a restart");
                Ok(Arc::new(InMemoryStore::new()))
            }
        }
    }

    /// Random source for fallback display names
    pub fn name_rng(&self) -> StdRng {
        match self.name_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}
