use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

pub mod cors;

pub use cors::create_cors_layer;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3001";
const DEFAULT_JWT_EXPIRATION_SECS: i64 = 86_400;
const DEFAULT_PHOTO_UPLOAD_DIR: &str = "uploads/photos";

pub struct Config {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub jwt_secret: String,
    pub jwt_expiration_secs: i64,
    pub photo_upload_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Self {
        let bind_addr = env::var("BIND_ADDR")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(|| {
                DEFAULT_BIND_ADDR
                    .parse()
                    .expect("default bind address is valid")
            });

        let jwt_expiration_secs = env::var("JWT_EXPIRATION_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_JWT_EXPIRATION_SECS);

        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgres://localhost/eventshare".to_string()),
            bind_addr,
            jwt_secret: env::var("JWT_SECRET").unwrap_or_else(|_| {
                tracing::warn!("JWT_SECRET not set, using insecure development secret");
                "insecure-development-secret".to_string()
            }),
            jwt_expiration_secs,
            photo_upload_dir: env::var("PHOTO_UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_PHOTO_UPLOAD_DIR)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bind_addr_parses() {
        let addr: SocketAddr = DEFAULT_BIND_ADDR.parse().unwrap();
        assert_eq!(addr.port(), 3001);
    }
}
