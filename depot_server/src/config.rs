use std::{env, io::Write, path::PathBuf, time::Duration};

use depot_common::{parse_env_flag, Secret};
use log::*;
use rand::{distributions::Alphanumeric, thread_rng, Rng};
use tempfile::NamedTempFile;

use crate::errors::ServerError;

const DEFAULT_DEPOT_HOST: &str = "127.0.0.1";
const DEFAULT_DEPOT_PORT: u16 = 8360;
const DEFAULT_DATABASE_URL: &str = "sqlite://data/depot.db";
const DEFAULT_MAX_CONNECTIONS: u32 = 25;
const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(5);
/// HS256 keys shorter than this are refused.
pub const MIN_JWT_SECRET_LENGTH: usize = 32;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// The maximum number of pooled database connections shared by all workers.
    pub max_connections: u32,
    /// Upper bound on how long a request waits for a pooled connection, or for a contended write lock.
    pub store_timeout: Duration,
    /// If true, the X-Forwarded-For header is logged as the client's address, rather than the peer address.
    pub use_x_forwarded_for: bool,
    pub auth: AuthConfig,
    /// A JSON file of offers to upsert at startup.
    pub seed_offers: Option<PathBuf>,
    /// An admin account to create or promote at startup.
    pub admin: Option<AdminBootstrap>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_DEPOT_HOST.to_string(),
            port: DEFAULT_DEPOT_PORT,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            store_timeout: DEFAULT_STORE_TIMEOUT,
            use_x_forwarded_for: false,
            auth: AuthConfig::default(),
            seed_offers: None,
            admin: None,
        }
    }
}

impl ServerConfig {
    pub fn from_env_or_default() -> Self {
        let host = env::var("DEPOT_HOST").ok().unwrap_or_else(|| DEFAULT_DEPOT_HOST.into());
        let port = env::var("DEPOT_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for DEPOT_PORT. {e} Using the default, {DEFAULT_DEPOT_PORT}, \
                         instead."
                    );
                    DEFAULT_DEPOT_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_DEPOT_PORT);
        let database_url = env::var("DEPOT_DATABASE_URL").ok().unwrap_or_else(|| {
            warn!("🪛️ DEPOT_DATABASE_URL is not set. Using the default, {DEFAULT_DATABASE_URL}.");
            DEFAULT_DATABASE_URL.to_string()
        });
        let max_connections = env::var("DEPOT_MAX_CONNECTIONS")
            .ok()
            .and_then(|s| {
                s.parse::<u32>()
                    .ok()
                    .filter(|n| *n > 0)
                    .or_else(|| {
                        warn!("🪛️ Invalid configuration value for DEPOT_MAX_CONNECTIONS: {s}");
                        None
                    })
            })
            .unwrap_or(DEFAULT_MAX_CONNECTIONS);
        let store_timeout = configure_store_timeout();
        let use_x_forwarded_for = parse_env_flag("DEPOT_USE_X_FORWARDED_FOR", false);
        let auth = AuthConfig::try_from_env().unwrap_or_else(|e| {
            warn!(
                "🪛️ Could not load the authentication configuration from environment variables. {e}. Reverting to the \
                 default configuration."
            );
            AuthConfig::default()
        });
        let seed_offers = env::var("DEPOT_SEED_OFFERS").ok().filter(|s| !s.is_empty()).map(PathBuf::from);
        let admin = AdminBootstrap::from_env();
        Self {
            host,
            port,
            database_url,
            max_connections,
            store_timeout,
            use_x_forwarded_for,
            auth,
            seed_offers,
            admin,
        }
    }
}

fn configure_store_timeout() -> Duration {
    env::var("DEPOT_STORE_TIMEOUT_SECS")
        .map_err(|_| {
            info!(
                "🪛️ DEPOT_STORE_TIMEOUT_SECS is not set. Using the default value of {}s.",
                DEFAULT_STORE_TIMEOUT.as_secs()
            )
        })
        .and_then(|s| {
            s.parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|e| warn!("🪛️ Invalid configuration value for DEPOT_STORE_TIMEOUT_SECS. {e}"))
        })
        .ok()
        .unwrap_or(DEFAULT_STORE_TIMEOUT)
}

//-------------------------------------------------  AuthConfig  -------------------------------------------------------
#[derive(Clone, Debug)]
pub struct AuthConfig {
    /// The shared secret used to sign and verify session tokens (HS256).
    pub jwt_secret: Secret<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        let mut tmpfile = NamedTempFile::new().ok().and_then(|f| f.keep().ok());
        warn!(
            "🚨️🚨️🚨️ The JWT secret has not been set. I'm using a random value for this session. DO NOT operate on \
             production like this since every session will be lost on restart. 🚨️🚨️🚨️"
        );
        let secret = thread_rng().sample_iter(&Alphanumeric).take(48).map(char::from).collect::<String>();
        match &mut tmpfile {
            Some((f, p)) => match writeln!(f, "DEPOT_JWT_SECRET={secret}") {
                Ok(()) => warn!(
                    "🚨️🚨️🚨️ The JWT secret for this session was written to {}. If this is a production instance, \
                     you are doing it wrong! Set the DEPOT_JWT_SECRET environment variable instead. 🚨️🚨️🚨️",
                    p.to_str().unwrap_or("???")
                ),
                Err(e) => warn!("🪛️ Could not write the JWT secret to the temporary file. {e}"),
            },
            None => {
                warn!("🪛️ Could not create a temporary file to store the JWT secret. ");
            },
        }
        Self { jwt_secret: Secret::new(secret) }
    }
}

impl AuthConfig {
    pub fn new(jwt_secret: &str) -> Result<Self, ServerError> {
        if jwt_secret.len() < MIN_JWT_SECRET_LENGTH {
            return Err(ServerError::ConfigurationError(format!(
                "The JWT secret must be at least {MIN_JWT_SECRET_LENGTH} characters long"
            )));
        }
        Ok(Self { jwt_secret: Secret::new(jwt_secret.to_string()) })
    }

    pub fn try_from_env() -> Result<Self, ServerError> {
        let secret = env::var("DEPOT_JWT_SECRET")
            .map_err(|e| ServerError::ConfigurationError(format!("{e} [DEPOT_JWT_SECRET]")))?;
        Self::new(&secret)
    }
}

//-------------------------------------------------  AdminBootstrap  ---------------------------------------------------
/// Credentials for an admin account that is created (or promoted) when the server starts.
#[derive(Clone, Debug)]
pub struct AdminBootstrap {
    pub username: String,
    pub email: String,
    pub password: Secret<String>,
}

impl AdminBootstrap {
    pub fn from_env() -> Option<Self> {
        let username = env::var("DEPOT_ADMIN_USERNAME").ok();
        let email = env::var("DEPOT_ADMIN_EMAIL").ok();
        let password = env::var("DEPOT_ADMIN_PASSWORD").ok();
        match (username, email, password) {
            (Some(username), Some(email), Some(password)) => {
                Some(Self { username, email, password: Secret::new(password) })
            },
            (None, None, None) => {
                info!("🪛️ No admin account is configured for bootstrapping.");
                None
            },
            _ => {
                warn!(
                    "🪛️ DEPOT_ADMIN_USERNAME, DEPOT_ADMIN_EMAIL and DEPOT_ADMIN_PASSWORD must all be set to bootstrap \
                     an admin account. Skipping."
                );
                None
            },
        }
    }
}
