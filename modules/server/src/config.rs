use framework::mailer::MailerConfig;
use rust_decimal::Decimal;
use std::{env, fmt::Display, str::FromStr};
use tracing::{info, warn};

pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub access_token_secret: String,
    pub refresh_token_secret: String,
    pub cors_origins: Vec<String>,
    pub delivery_charge: Decimal,
    pub commission_percentage: Decimal,
    pub mailer: MailerConfig,
    pub gateway_base_url: String,
    pub gateway_key_id: String,
    pub gateway_key_secret: String,
    pub gateway_currency: String,
    pub media_upload_url: String,
    pub media_upload_preset: String,
}

impl Config {
    pub fn load() -> Self {
        Self {
            port: try_load("PORT", "10000"),
            database_url: require("DATABASE_URL"),
            access_token_secret: require("JWT_ACCESS_SECRET"),
            refresh_token_secret: require("JWT_REFRESH_SECRET"),
            cors_origins: try_load::<String>("CORS_ORIGINS", "http://localhost:5173")
                .split(',')
                .map(|origin| origin.trim().to_owned())
                .filter(|origin| !origin.is_empty())
                .collect(),
            delivery_charge: try_load("DELIVERY_CHARGE", "0"),
            commission_percentage: try_load("COMMISSION_PERCENTAGE", "10"),
            mailer: MailerConfig {
                host: try_load("SMTP_HOST", "smtp-relay.example.com"),
                port: try_load("SMTP_PORT", "587"),
                username: optional("SMTP_USER"),
                password: optional("SMTP_PASS"),
                from: try_load("SMTP_FROM", "Bakehouse <orders@bakehouse.example>"),
            },
            gateway_base_url: try_load("GATEWAY_BASE_URL", "https://api.gateway.example/v1"),
            gateway_key_id: try_load("GATEWAY_KEY_ID", ""),
            gateway_key_secret: try_load("GATEWAY_KEY_SECRET", ""),
            gateway_currency: try_load("GATEWAY_CURRENCY", "INR"),
            media_upload_url: try_load("MEDIA_UPLOAD_URL", "https://media.example/upload"),
            media_upload_preset: try_load("MEDIA_UPLOAD_PRESET", ""),
        }
    }
}

fn var(key: &str) -> Result<String, ()> {
    env::var(key).map_err(|_| {
        warn!("Environment variable {key} not found, using default");
    })
}

fn optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.is_empty())
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    var(key)
        .unwrap_or_else(|_| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e| {
            warn!("Invalid {key} value: {e}");
        })
        .expect("Environment misconfigured!")
}

fn require(key: &str) -> String {
    env::var(key)
        .map_err(|_| {
            warn!("Required environment variable {key} is not set");
        })
        .expect("Environment misconfigured!")
}
