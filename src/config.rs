use serde::{Deserialize, Serialize};

use std::{env, fs, path::Path};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub sender: String,
    pub smtp_pass: String,
    pub smtp_username: String,
    pub smtp_relay: String,
    pub smtp_port: u16,
    pub receiver: String,
    pub port: u16,
}

fn load_from_env() -> Result<Config, Box<dyn std::error::Error>> {
    let sender =
        env::var("SENDER_EMAIL").map_err(|_| "SENDER_EMAIL environment variable is required")?;
    let smtp_pass = env::var("SENDER_PASSWORD")
        .map_err(|_| "SENDER_PASSWORD environment variable is required")?;
    let receiver = env::var("RECEIVER_EMAIL")
        .map_err(|_| "RECEIVER_EMAIL environment variable is required")?;

    // The SMTP username is usually the sender address itself
    let smtp_username = env::var("SMTP_USERNAME").unwrap_or_else(|_| sender.clone());
    let smtp_relay = env::var("SMTP_RELAY").unwrap_or_else(|_| "smtp.gmail.com".to_string());

    let smtp_port = match env::var("SMTP_PORT") {
        Ok(value) => value
            .parse::<u16>()
            .map_err(|e| format!("Failed to parse SMTP_PORT: {}", e))?,
        Err(_) => 587,
    };
    let port = match env::var("PORT") {
        Ok(value) => value
            .parse::<u16>()
            .map_err(|e| format!("Failed to parse PORT: {}", e))?,
        Err(_) => 5000,
    };

    Ok(Config {
        sender,
        smtp_pass,
        smtp_username,
        smtp_relay,
        smtp_port,
        receiver,
        port,
    })
}

pub fn load_config() -> Result<Config, Box<dyn std::error::Error>> {
    // Retrieve env variable
    let config_path =
        env::var("PORTFOLIO_BACKEND_CONFIG").unwrap_or_else(|_| "config.yaml".to_string());

    // Try env path
    if Path::new(&config_path).exists() {
        let contents = fs::read_to_string(&config_path)?;
        return serde_yaml::from_str(&contents).map_err(Into::into);
    }

    // Fallback to config.yaml
    if Path::new("config.yaml").exists() {
        tracing::warn!(
            "Config file '{}' not found, falling back to 'config.yaml'",
            config_path
        );
        let contents = fs::read_to_string("config.yaml")?;
        return serde_yaml::from_str(&contents).map_err(Into::into);
    }

    // Fallback to config.example.yaml
    if Path::new("config.example.yaml").exists() {
        tracing::warn!(
            "Config file '{}' and 'config.yaml' not found, falling back to 'config.example.yaml'\
             \n This file should not be used and should be replaced with actual data",
            config_path
        );
        let contents = fs::read_to_string("config.example.yaml")?;
        return serde_yaml::from_str(&contents).map_err(Into::into);
    }

    // Fallback to environment variables
    tracing::info!(
        "No config file found, attempting to load configuration from environment variables"
    );
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Successfully loaded configuration from environment variables");
            Ok(config)
        }
        Err(e) => Err(format!(
            "Config file not found and environment variables are incomplete. \
             Tried: '{}', 'config.yaml', 'config.example.yaml', and environment variables. \
             Error: {}",
            config_path, e
        )
        .into()),
    }
}
