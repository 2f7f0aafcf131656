use std::path::Path;

use fog_types::{check_address, Connection};
use serde::{Deserialize, Serialize};

use crate::error::{PageError, PageResult};

/// Settings for one forum instance, usually read from a TOML file.
///
/// ```toml
/// master = true
/// log_filter = "fog_pages=debug"
/// connections = ["10.0.0.1:8080", "[::1]:9000"]
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForumConfig {
    /// Whether this node may create boards.
    pub master: bool,
    /// `tracing` filter directive used by [`crate::telemetry::init_tracing`].
    pub log_filter: String,
    /// Peer addresses as `host:port`.
    pub connections: Vec<String>,
}

impl Default for ForumConfig {
    fn default() -> Self {
        Self {
            master: false,
            log_filter: "info".into(),
            connections: Vec::new(),
        }
    }
}

impl ForumConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(s: &str) -> PageResult<Self> {
        let config: Self =
            toml::from_str(s).map_err(|e| PageError::InvalidInput(format!("config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: &Path) -> PageResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            PageError::InvalidInput(format!("config {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&text)
    }

    /// Check every peer address.
    pub fn validate(&self) -> PageResult<()> {
        for address in &self.connections {
            check_address(address)?;
        }
        Ok(())
    }

    /// A connection per configured peer, none yet attempted.
    pub fn connections(&self) -> PageResult<Vec<Connection>> {
        self.connections
            .iter()
            .map(|a| Connection::new(a).map_err(PageError::from))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fog_types::{ConnectionState, ErrorKind};
    use std::io::Write;

    #[test]
    fn defaults() {
        let c = ForumConfig::default();
        assert!(!c.master);
        assert_eq!(c.log_filter, "info");
        assert!(c.connections.is_empty());
        assert_eq!(ForumConfig::from_toml_str("").unwrap(), c);
    }

    #[test]
    fn parse_full_document() {
        let c = ForumConfig::from_toml_str(
            r#"
            master = true
            log_filter = "fog_pages=debug"
            connections = ["10.0.0.1:8080", "[::1]:9000", "peer.example.org:8998"]
            "#,
        )
        .unwrap();
        assert!(c.master);
        let conns = c.connections().unwrap();
        assert_eq!(conns.len(), 3);
        assert!(conns.iter().all(|c| c.state == ConnectionState::Connecting));
        assert_eq!(conns[1].address, "[::1]:9000");
        assert_eq!(conns[2].address, "peer.example.org:8998");
    }

    #[test]
    fn bad_port_is_invalid_input() {
        let err = ForumConfig::from_toml_str(r#"connections = ["10.0.0.1:70000"]"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn malformed_toml_is_invalid_input() {
        let err = ForumConfig::from_toml_str("master = ").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "master = true").unwrap();
        let c = ForumConfig::load(file.path()).unwrap();
        assert!(c.master);

        let dir = tempfile::tempdir().unwrap();
        let err = ForumConfig::load(&dir.path().join("missing.toml")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }
}
