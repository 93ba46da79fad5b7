use serde::{Deserialize, Serialize};
use std::env;

/// Process configuration, built once at startup and passed into the
/// handler state. The scoping toggle lives here and nowhere else.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    /// When true, requests are not authenticated and data access is not
    /// filtered by user identity.
    pub allow_all_users: bool,
    pub jwt_secret: String,
    pub port: u16,
    pub database_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = env::var("ALLOW_ALL_USERS") {
            self.allow_all_users = v.parse().unwrap_or(self.allow_all_users);
        }
        if let Ok(v) = env::var("TODO_JWT_SECRET") {
            self.jwt_secret = v;
        }
        if let Ok(v) = env::var("TODO_API_PORT").or_else(|_| env::var("PORT")) {
            self.port = v.parse().unwrap_or(self.port);
        }
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database_url = Some(v);
        }
        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            allow_all_users: false,
            // Dev-only fallback; any real deployment sets TODO_JWT_SECRET
            jwt_secret: "dev-secret-change-me".to_string(),
            port: 3000,
            database_url: None,
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            allow_all_users: false,
            jwt_secret: String::new(),
            port: 3000,
            database_url: None,
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            allow_all_users: false,
            jwt_secret: String::new(),
            port: 3000,
            database_url: None,
        }
    }
}
