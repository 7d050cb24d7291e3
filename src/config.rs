use std::env;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    /// Canonical prefix for the `self` URI written into each record.
    pub base_url: String,
    pub auth: AuthConfig,
}

#[derive(Clone)]
pub struct AuthConfig {
    pub issuer: String,
    pub jwks_uri: String,
    pub token_url: String,
    pub audience: String,
    pub client_id: String,
    pub client_secret: String,
}

impl Config {
    pub fn from_env() -> Result<Self, env::VarError> {
        let issuer =
            env::var("AUTH_ISSUER").unwrap_or_else(|_| "https://gymtrack.example.com/".to_string());

        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:gymtrack.db?mode=rwc".to_string()),
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .unwrap_or(3000),
            base_url: env::var("BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            auth: AuthConfig {
                jwks_uri: env::var("AUTH_JWKS_URI")
                    .unwrap_or_else(|_| format!("{issuer}.well-known/jwks.json")),
                token_url: env::var("AUTH_TOKEN_URL")
                    .unwrap_or_else(|_| format!("{issuer}oauth/token")),
                audience: env::var("AUTH_AUDIENCE").unwrap_or_else(|_| format!("{issuer}api/v2/")),
                client_id: env::var("AUTH_CLIENT_ID").unwrap_or_default(),
                client_secret: env::var("AUTH_CLIENT_SECRET").unwrap_or_default(),
                issuer,
            },
        })
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
