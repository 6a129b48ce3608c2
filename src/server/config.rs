use std::env;

#[derive(Clone)]
pub struct ServerConfig {
    pub database_url: String,
    pub listen_addr: String,
    pub jwt_secret: String,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, String> {
        let jwt_secret = env::var("JWT_SECRET").map_err(|_| "JWT_SECRET must be set".to_string())?;

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://recipebox.db".to_string());

        let listen_addr = env::var("LISTEN_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

        Ok(ServerConfig {
            database_url,
            listen_addr,
            jwt_secret,
        })
    }
}
