//! Application settings loaded via OrthoConfig.
//!
//! Values come from `ORDENS_*` environment variables, an optional
//! configuration file and command-line flags, in increasing precedence.
//! Session cookie settings are read separately by
//! [`crate::inbound::http::session_config`].

use std::net::{AddrParseError, SocketAddr};

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;
use zeroize::Zeroizing;

use crate::domain::BootstrapAdmin;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_ADMIN_NAME: &str = "Administrador";

/// Errors raised while interpreting loaded settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("invalid bind address '{value}': {source}")]
    InvalidBindAddr {
        value: String,
        #[source]
        source: AddrParseError,
    },
    #[error("bootstrap administrator needs both email and password; {missing} is missing")]
    IncompleteBootstrap { missing: &'static str },
}

/// Settings for the HTTP server and first-run seeding.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "ORDENS")]
pub struct AppSettings {
    /// Socket address the server listens on.
    #[ortho_config(default = String::from(DEFAULT_BIND_ADDR))]
    pub bind_addr: String,
    /// Email of the MANAGER account created when no users exist.
    pub bootstrap_admin_email: Option<String>,
    /// Display name of the bootstrap account.
    pub bootstrap_admin_name: Option<String>,
    /// Password of the bootstrap account.
    pub bootstrap_admin_password: Option<String>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_owned(),
            bootstrap_admin_email: None,
            bootstrap_admin_name: None,
            bootstrap_admin_password: None,
        }
    }
}

impl AppSettings {
    /// Parse the configured bind address (`0.0.0.0:8080` unless overridden).
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        self.bind_addr
            .parse()
            .map_err(|source| SettingsError::InvalidBindAddr {
                value: self.bind_addr.clone(),
                source,
            })
    }

    /// Return the bootstrap account, if one is configured.
    ///
    /// Email and password must be given together; the name is optional.
    pub fn bootstrap_admin(&self) -> Result<Option<BootstrapAdmin>, SettingsError> {
        match (&self.bootstrap_admin_email, &self.bootstrap_admin_password) {
            (None, None) => Ok(None),
            (Some(_), None) => Err(SettingsError::IncompleteBootstrap {
                missing: "ORDENS_BOOTSTRAP_ADMIN_PASSWORD",
            }),
            (None, Some(_)) => Err(SettingsError::IncompleteBootstrap {
                missing: "ORDENS_BOOTSTRAP_ADMIN_EMAIL",
            }),
            (Some(email), Some(password)) => Ok(Some(BootstrapAdmin {
                user_name: self
                    .bootstrap_admin_name
                    .clone()
                    .unwrap_or_else(|| DEFAULT_ADMIN_NAME.to_owned()),
                email: email.clone(),
                password: Zeroizing::new(password.clone()),
            })),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for application settings parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 4] = [
        "ORDENS_BIND_ADDR",
        "ORDENS_BOOTSTRAP_ADMIN_EMAIL",
        "ORDENS_BOOTSTRAP_ADMIN_NAME",
        "ORDENS_BOOTSTRAP_ADMIN_PASSWORD",
    ];

    fn load_from_empty_args() -> AppSettings {
        AppSettings::load_from_iter([OsString::from("ordens")]).expect("config should load")
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load_from_empty_args();
        assert_eq!(settings.bind_addr, DEFAULT_BIND_ADDR);
        assert_eq!(
            settings.bind_addr().expect("default address"),
            "0.0.0.0:8080".parse::<SocketAddr>().expect("literal address")
        );
        assert!(settings.bootstrap_admin().expect("no bootstrap").is_none());
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("ORDENS_BIND_ADDR", Some("127.0.0.1:9090".to_owned())),
            (
                "ORDENS_BOOTSTRAP_ADMIN_EMAIL",
                Some("gerente@example.com".to_owned()),
            ),
            ("ORDENS_BOOTSTRAP_ADMIN_NAME", None),
            (
                "ORDENS_BOOTSTRAP_ADMIN_PASSWORD",
                Some("trocar-agora".to_owned()),
            ),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("configured address").port(),
            9090
        );
        let admin = settings
            .bootstrap_admin()
            .expect("complete bootstrap")
            .expect("bootstrap configured");
        assert_eq!(admin.email, "gerente@example.com");
        assert_eq!(admin.user_name, DEFAULT_ADMIN_NAME);
        assert_eq!(admin.password.as_str(), "trocar-agora");
    }

    #[rstest]
    #[case(Some("a@example.com"), None, "ORDENS_BOOTSTRAP_ADMIN_PASSWORD")]
    #[case(None, Some("segredo"), "ORDENS_BOOTSTRAP_ADMIN_EMAIL")]
    fn partial_bootstrap_is_rejected(
        #[case] email: Option<&str>,
        #[case] password: Option<&str>,
        #[case] expected: &str,
    ) {
        let settings = AppSettings {
            bootstrap_admin_email: email.map(str::to_owned),
            bootstrap_admin_password: password.map(str::to_owned),
            ..AppSettings::default()
        };

        let error = settings.bootstrap_admin().expect_err("incomplete bootstrap");
        assert!(matches!(error, SettingsError::IncompleteBootstrap { missing } if missing == expected));
    }

    #[rstest]
    fn malformed_bind_address_is_reported() {
        let settings = AppSettings {
            bind_addr: "localhost".to_owned(),
            ..AppSettings::default()
        };

        let error = settings.bind_addr().expect_err("invalid address");
        assert!(error.to_string().contains("localhost"));
    }
}
