use std::env;
use std::time::Duration;

use corrdesk_application::{GuardConfig, SessionConfig};
use corrdesk_core::{AppError, AppResult};
use tracing_subscriber::EnvFilter;

/// Verification-bypass account used by seeded demo data when none is
/// configured.
const DEFAULT_BYPASS_EMAIL: &str = "test@user.de";

const DEFAULT_ROLE_TIMEOUT_MS: u64 = 5_000;

/// Runtime configuration for the session core, assembled from the
/// environment.
#[derive(Debug, Clone)]
pub struct AuthRuntimeConfig {
    /// Session service configuration.
    pub session: SessionConfig,
    /// Access guard configuration.
    pub guard: GuardConfig,
    /// Account allowed to sign in without a verified email.
    pub verification_bypass_email: Option<String>,
}

impl AuthRuntimeConfig {
    /// Loads the configuration from the environment.
    ///
    /// `AUTH_PROVIDER_API_KEY` is required; it is compared against the
    /// `apiKey` query parameter of password-reset deep links. Everything
    /// else falls back to the application defaults. Setting
    /// `AUTH_VERIFICATION_BYPASS_EMAIL` to an empty value disables the
    /// bypass account entirely.
    pub fn load() -> AppResult<Self> {
        dotenvy::dotenv().ok();

        let provider_api_key = required_env("AUTH_PROVIDER_API_KEY")?;
        let default_path = env::var("AUTH_DEFAULT_PATH").unwrap_or_else(|_| "/".to_owned());
        let login_path =
            env::var("AUTH_LOGIN_PATH").unwrap_or_else(|_| "/login-form".to_owned());

        let resolution_timeout = env::var("AUTH_ROLE_TIMEOUT_MS")
            .ok()
            .and_then(|value| value.parse::<u64>().ok())
            .map_or(
                Duration::from_millis(DEFAULT_ROLE_TIMEOUT_MS),
                Duration::from_millis,
            );

        let verification_bypass_email = match env::var("AUTH_VERIFICATION_BYPASS_EMAIL") {
            Ok(value) if value.trim().is_empty() => None,
            Ok(value) => Some(value),
            Err(_) => Some(DEFAULT_BYPASS_EMAIL.to_owned()),
        };

        Ok(Self {
            session: SessionConfig {
                default_path: default_path.clone(),
                login_path: login_path.clone(),
            },
            guard: GuardConfig {
                default_path,
                login_path,
                provider_api_key,
                resolution_timeout,
                ..GuardConfig::default()
            },
            verification_bypass_email,
        })
    }
}

/// Initializes the tracing subscriber for binaries embedding the core.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn required_env(name: &str) -> AppResult<String> {
    env::var(name).map_err(|_| AppError::Validation(format!("{name} is required")))
}
