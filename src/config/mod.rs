use std::env;

const DEV_JWT_SECRET: &str = "tunevault-dev-secret-change-in-production";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub token_expiry_mins: i64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::defaults().with_env_overrides()
    }

    fn defaults() -> Self {
        Self {
            server: ServerConfig { port: 3000 },
            database: DatabaseConfig {
                url: "sqlite:tunevault.db".to_string(),
                max_connections: 5,
            },
            security: SecurityConfig {
                jwt_secret: DEV_JWT_SECRET.to_string(),
                token_expiry_mins: 30,
            },
        }
    }

    fn with_env_overrides(mut self) -> Self {
        // Server overrides; TUNEVAULT_PORT wins over the generic PORT
        if let Some(port) = env::var("TUNEVAULT_PORT")
            .ok()
            .or_else(|| env::var("PORT").ok())
            .and_then(|v| v.parse().ok())
        {
            self.server.port = port;
        }

        // Database overrides
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = v;
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }

        // Security overrides
        match env::var("JWT_SECRET") {
            Ok(v) if !v.is_empty() => self.security.jwt_secret = v,
            _ => tracing::warn!("JWT_SECRET not set; using the built-in development secret"),
        }
        if let Ok(v) = env::var("TOKEN_EXPIRY_MINS") {
            self.security.token_expiry_mins =
                v.parse().unwrap_or(self.security.token_expiry_mins);
        }

        self
    }
}
