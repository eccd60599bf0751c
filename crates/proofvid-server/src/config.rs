//! Server configuration, from flags or `PROOFVID_*` environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::Args;
use proofvid::store::StoreConfig;
use proofvid::RegistryConfig;

/// Settings for `proofvid-server serve`.
#[derive(Debug, Clone, Args)]
pub struct ServeConfig {
    /// Address to listen on
    #[arg(long, env = "PROOFVID_BIND", default_value = "0.0.0.0:5000")]
    pub bind: SocketAddr,

    /// SQLite database file
    #[arg(long, env = "PROOFVID_DATABASE", default_value = "proofvid.db")]
    pub database: PathBuf,

    /// How long a write waits for another writer's lock, in milliseconds
    #[arg(long, env = "PROOFVID_BUSY_TIMEOUT_MS", default_value_t = 5_000)]
    pub busy_timeout_ms: u64,

    /// Identifiers to issue per registration before reporting a collision
    #[arg(long, env = "PROOFVID_MAX_ISSUE_ATTEMPTS", default_value_t = 3)]
    pub max_issue_attempts: u32,
}

impl ServeConfig {
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            busy_timeout: Duration::from_millis(self.busy_timeout_ms),
            ..StoreConfig::default()
        }
    }

    pub fn registry_config(&self) -> RegistryConfig {
        RegistryConfig {
            max_issue_attempts: self.max_issue_attempts,
        }
    }
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], 5000)),
            database: PathBuf::from("proofvid.db"),
            busy_timeout_ms: 5_000,
            max_issue_attempts: 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        serve: ServeConfig,
    }

    #[test]
    fn test_flags_override_defaults() {
        let harness = Harness::parse_from([
            "test",
            "--bind",
            "127.0.0.1:8080",
            "--database",
            "/tmp/certs.db",
            "--busy-timeout-ms",
            "250",
            "--max-issue-attempts",
            "5",
        ]);

        assert_eq!(harness.serve.bind.port(), 8080);
        assert_eq!(harness.serve.database, PathBuf::from("/tmp/certs.db"));
        assert_eq!(
            harness.serve.store_config().busy_timeout,
            Duration::from_millis(250)
        );
        assert_eq!(harness.serve.registry_config().max_issue_attempts, 5);
    }

    #[test]
    fn test_store_config_keeps_wal() {
        assert!(ServeConfig::default().store_config().wal);
    }
}
