use crate::logging::LoggingConfig;

/// Runtime configuration, built once in `main` and passed down explicitly.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub jwt_secret: String,
    pub max_connections: u32,
    pub logging: LoggingConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| "DATABASE_URL is not set".to_string())?;
        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .map_err(|_| "PORT must be a number".to_string())?;
        let jwt_secret = std::env::var("JWT_SECRET")
            .map_err(|_| "JWT_SECRET is not set".to_string())?;
        let max_connections = std::env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .map_err(|_| "DATABASE_MAX_CONNECTIONS must be a number".to_string())?;

        Ok(Self {
            database_url,
            port,
            jwt_secret,
            max_connections,
            logging: LoggingConfig::from_env(),
        })
    }
}
