use anyhow::Result;
use dotenvy::dotenv;
use serde::Deserialize;

/// Configuration for the application
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Identifier of the spreadsheet holding the tracker worksheet
    pub spreadsheet_id: String,
    /// Opaque bearer credential for the spreadsheet API
    pub sheets_token: String,
    /// Worksheet (tab) name inside the spreadsheet
    #[serde(default = "default_worksheet")]
    pub worksheet: String,
    /// API endpoint, overridable for local testing
    #[serde(default = "default_base_url")]
    pub sheets_base_url: String,
}

fn default_worksheet() -> String {
    "Sheet1".to_string()
}

fn default_base_url() -> String {
    "https://sheets.googleapis.com/v4".to_string()
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// This function will:
    /// 1. Load variables from .env file if it exists
    /// 2. Deserialize environment variables into Config struct
    pub fn load() -> Result<Self> {
        // Load .env file if it exists
        dotenv().ok();

        // Parse environment variables into Config struct
        let config = envy::from_env::<Config>()?;

        Ok(config)
    }
}

/// Initialize environment variables and load configuration
pub fn init() -> Result<Config> {
    // Ensure .env file is loaded
    dotenv().ok();

    // Load the configuration
    let config = Config::load()?;

    Ok(config)
}
