use std::env;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    /// Header carrying the caller identity forwarded by the upstream identity provider.
    pub identity_header: String,
}

impl Config {
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:setlog.db?mode=rwc".to_string()),
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .unwrap_or(3000),
            identity_header: env::var("IDENTITY_HEADER")
                .map(|h| h.to_ascii_lowercase())
                .unwrap_or_else(|_| DEFAULT_IDENTITY_HEADER.to_string()),
        })
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

pub const DEFAULT_IDENTITY_HEADER: &str = "x-auth-id";
