//! Runtime configuration from `MYSTERYBOX_*` environment variables.
//!
//! Every setting has a default; a malformed value is ignored with a
//! warning rather than aborting startup.

use std::path::PathBuf;

use crate::domain::Address;

/// Where log output goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogMode {
    /// File when stdout is a terminal (the TUI owns it), stdout otherwise
    #[default]
    Auto,
    File,
    Stdout,
}

impl LogMode {
    /// Resolve `Auto` against whether stdout is interactive.
    #[must_use]
    pub fn use_file(self, interactive: bool) -> bool {
        match self {
            Self::File => true,
            Self::Stdout => false,
            Self::Auto => interactive,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Local wallet account
    pub account: Address,

    /// Address the devnet deploys the contract at
    pub contract_address: Address,

    /// Base64 Ed25519 seed for the gateway signer; ephemeral when unset
    pub gateway_seed_file: Option<PathBuf>,

    /// Connect the wallet at startup
    pub auto_connect: bool,

    pub log_mode: LogMode,
    pub log_file: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            account: Address::derive("mysterybox-dev-account"),
            contract_address: Address::derive("mysterybox-contract"),
            gateway_seed_file: None,
            auto_connect: false,
            log_mode: LogMode::Auto,
            log_file: PathBuf::from("mysterybox.log"),
        }
    }
}

fn parse_bool(v: &str) -> Option<bool> {
    match v.trim() {
        "1" | "true" | "TRUE" | "yes" | "YES" => Some(true),
        "0" | "false" | "FALSE" | "no" | "NO" => Some(false),
        _ => None,
    }
}

impl AppConfig {
    /// Load config overrides from the process environment.
    ///
    /// Supported:
    /// - MYSTERYBOX_ACCOUNT (0x-prefixed address)
    /// - MYSTERYBOX_CONTRACT_ADDRESS (0x-prefixed address)
    /// - MYSTERYBOX_GATEWAY_SEED_FILE (path)
    /// - MYSTERYBOX_AUTO_CONNECT (true/false)
    /// - MYSTERYBOX_LOG_MODE (auto/file/stdout)
    /// - MYSTERYBOX_LOG_FILE (path)
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as `from_env`, reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut cfg = Self::default();

        let address = |name: &str| -> Option<Address> {
            let raw = lookup(name)?;
            match raw.parse() {
                Ok(addr) => Some(addr),
                Err(e) => {
                    tracing::warn!("Ignoring {}: {}", name, e);
                    None
                }
            }
        };

        if let Some(account) = address("MYSTERYBOX_ACCOUNT") {
            cfg.account = account;
        }
        if let Some(contract) = address("MYSTERYBOX_CONTRACT_ADDRESS") {
            cfg.contract_address = contract;
        }

        if let Some(path) = lookup("MYSTERYBOX_GATEWAY_SEED_FILE") {
            let path = path.trim();
            if !path.is_empty() {
                cfg.gateway_seed_file = Some(PathBuf::from(path));
            }
        }

        if let Some(v) = lookup("MYSTERYBOX_AUTO_CONNECT") {
            match parse_bool(&v) {
                Some(b) => cfg.auto_connect = b,
                None => tracing::warn!("Ignoring MYSTERYBOX_AUTO_CONNECT={}", v),
            }
        }

        if let Some(v) = lookup("MYSTERYBOX_LOG_MODE") {
            cfg.log_mode = match v.trim() {
                "file" => LogMode::File,
                "stdout" => LogMode::Stdout,
                "auto" => LogMode::Auto,
                other => {
                    tracing::warn!("Unknown MYSTERYBOX_LOG_MODE {}, using auto", other);
                    LogMode::Auto
                }
            };
        }

        if let Some(v) = lookup("MYSTERYBOX_LOG_FILE") {
            let v = v.trim();
            if !v.is_empty() {
                cfg.log_file = PathBuf::from(v);
            }
        }

        cfg
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> AppConfig {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        AppConfig::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let cfg = config(&[]);
        assert_eq!(cfg, AppConfig::default());
        assert_eq!(cfg.log_file, PathBuf::from("mysterybox.log"));
        assert!(!cfg.auto_connect);
    }

    #[test]
    fn test_overrides() {
        let cfg = config(&[
            ("MYSTERYBOX_ACCOUNT", "0x00112233445566778899aabbccddeeff00112233"),
            ("MYSTERYBOX_GATEWAY_SEED_FILE", "/run/secrets/gateway_seed"),
            ("MYSTERYBOX_AUTO_CONNECT", "yes"),
            ("MYSTERYBOX_LOG_MODE", "stdout"),
            ("MYSTERYBOX_LOG_FILE", "/tmp/box.log"),
        ]);
        assert_eq!(
            cfg.account.to_string(),
            "0x00112233445566778899aabbccddeeff00112233"
        );
        assert_eq!(cfg.gateway_seed_file, Some(PathBuf::from("/run/secrets/gateway_seed")));
        assert!(cfg.auto_connect);
        assert_eq!(cfg.log_mode, LogMode::Stdout);
        assert_eq!(cfg.log_file, PathBuf::from("/tmp/box.log"));
    }

    #[test]
    fn test_bad_values_fall_back() {
        let cfg = config(&[
            ("MYSTERYBOX_ACCOUNT", "not-an-address"),
            ("MYSTERYBOX_AUTO_CONNECT", "maybe"),
            ("MYSTERYBOX_LOG_MODE", "syslog"),
        ]);
        assert_eq!(cfg.account, AppConfig::default().account);
        assert!(!cfg.auto_connect);
        assert_eq!(cfg.log_mode, LogMode::Auto);
    }

    #[test]
    fn test_log_mode_resolution() {
        assert!(LogMode::Auto.use_file(true));
        assert!(!LogMode::Auto.use_file(false));
        assert!(LogMode::File.use_file(false));
        assert!(!LogMode::Stdout.use_file(true));
    }
}
