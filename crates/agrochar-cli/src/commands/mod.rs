pub mod auth;
pub mod data;

use agrochar_client::{ApiClient, MockFallback};
use agrochar_core::{ClientConfig, MemorySessionStore, SessionStore};
use agrochar_infrastructure::{ConfigService, FileSessionStore};
use anyhow::{Context, Result};
use serde_json::Value;
use std::sync::Arc;

/// Flags shared by every subcommand.
pub struct GlobalOptions {
    pub mock: bool,
    pub base_url: Option<String>,
}

/// The wired-up client stack for one invocation.
pub struct App {
    pub api: MockFallback<ApiClient>,
    pub session: Arc<dyn SessionStore>,
}

impl App {
    pub fn build(options: &GlobalOptions) -> Result<Self> {
        let mut config = ConfigService::new()
            .load()
            .context("Failed to load configuration")?;

        if options.mock {
            config.use_mock = true;
        }
        if let Some(base_url) = &options.base_url {
            config.base_url = base_url.clone();
        }

        let session = open_session_store(&config);
        let client = ApiClient::from_config(&config, session.clone());

        tracing::debug!(
            base_url = %config.base_url,
            timeout_ms = config.timeout_ms,
            use_mock = config.use_mock,
            "[CLI] Client ready"
        );

        Ok(Self {
            api: MockFallback::from_config(client, &config),
            session,
        })
    }
}

fn open_session_store(config: &ClientConfig) -> Arc<dyn SessionStore> {
    if let Some(path) = &config.session_file {
        return Arc::new(FileSessionStore::with_path(path));
    }

    match FileSessionStore::new() {
        Ok(store) => Arc::new(store),
        Err(e) => {
            tracing::warn!("[CLI] {}; session will not outlive this command", e);
            Arc::new(MemorySessionStore::new())
        }
    }
}

pub fn print_json(value: &Value) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("Failed to render response")?;
    println!("{}", rendered);
    Ok(())
}
