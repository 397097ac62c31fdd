//! CLI runner - executes commands

use crate::api::AlchemerApi;
use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::TapConfig;
use crate::engine::SyncEngine;
use crate::error::{Error, Result, ResultExt};
use crate::http::RequestParams;
use crate::output::JsonLinesSink;
use crate::schema::Catalog;
use crate::state::StateManager;
use serde_json::{json, Value};
use tracing::info;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match self.cli.command.unwrap_or(Commands::Sync) {
            Commands::Sync => self.sync().await,
            Commands::Discover => self.discover(),
            Commands::Check => self.check().await,
        }
    }

    /// Load configuration; inline JSON takes precedence over the file
    fn load_config(&self) -> Result<TapConfig> {
        if let Some(json_str) = &self.cli.config_json {
            return TapConfig::from_json(json_str);
        }

        match &self.cli.config {
            Some(path) => TapConfig::from_file(path),
            None => Err(Error::config(
                "No configuration given (use --config or --config-json)",
            )),
        }
    }

    /// Load state; inline JSON takes precedence over the file
    fn load_state(&self) -> Result<StateManager> {
        if let Some(state_json) = &self.cli.state_json {
            StateManager::from_json(state_json)
        } else if let Some(path) = &self.cli.state {
            StateManager::from_file(path)
        } else {
            Ok(StateManager::in_memory())
        }
    }

    /// Run both sync phases, writing messages to stdout
    async fn sync(&self) -> Result<()> {
        let config = self.load_config()?;
        let state = self.load_state()?;
        let api = AlchemerApi::from_config(&config)?;

        info!("Starting sync against {}", config.api_root());

        let mut engine = SyncEngine::new(api, JsonLinesSink::stdout(), Catalog::new(), state);
        let stats = engine.run().await?;
        info!(
            "Sync finished: {} records in {} ms",
            stats.total_rows(),
            stats.duration_ms
        );

        if let Some(path) = &self.cli.state_output {
            engine
                .state()
                .save_to_file(path)
                .await
                .with_context(|| format!("Saving state to {}", path.display()))?;
            info!("State written to {}", path.display());
        }

        Ok(())
    }

    /// Print the stream catalog
    fn discover(&self) -> Result<()> {
        let catalog = catalog_message(&Catalog::new())?;
        self.output_message(&catalog);
        Ok(())
    }

    /// One survey-list request without retries
    async fn check(&self) -> Result<()> {
        let mut config = self.load_config()?;
        config.max_attempts = 1;
        let api = AlchemerApi::from_config(&config)?;

        info!("Checking connection to {}", config.api_root());
        let result = api.surveys(&RequestParams::new()).await.map(|_| ());
        self.output_message(&connection_status(&result));

        Ok(())
    }

    /// Output a message
    fn output_message(&self, msg: &Value) {
        match self.cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(msg).unwrap_or_default());
            }
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(msg).unwrap_or_default());
            }
        }
    }
}

/// `CATALOG` message listing every stream
pub fn catalog_message(catalog: &Catalog) -> Result<Value> {
    Ok(json!({
        "type": "CATALOG",
        "catalog": {
            "streams": serde_json::to_value(catalog.streams())?
        }
    }))
}

/// `CONNECTION_STATUS` message for a check result
pub fn connection_status(result: &Result<()>) -> Value {
    match result {
        Ok(()) => json!({
            "type": "CONNECTION_STATUS",
            "connectionStatus": {
                "status": "SUCCEEDED",
                "message": "Connection successful"
            }
        }),
        Err(e) => json!({
            "type": "CONNECTION_STATUS",
            "connectionStatus": {
                "status": "FAILED",
                "message": format!("Connection failed: {e}")
            }
        }),
    }
}
