//! Database selection: local SQLite or managed PostgreSQL.

use serde::{Deserialize, Serialize};

use crate::secrets::{SecretRef, SecretValue};

/// Credentials for a managed PostgreSQL instance fronted by pgbouncer.
///
/// Chart values address the connection pooler, not the database directly;
/// the direct host/port are carried for operator tooling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostgresCredentials {
    pub user: String,
    pub password: SecretValue,
    pub host: String,
    pub port: u16,
    pub pgbouncer_host: String,
    #[serde(default)]
    pub pgbouncer_port: Option<u16>,
    #[serde(default)]
    pub dbname: Option<String>,
    /// Full connection URI through the pooler, stored as a secret.
    /// Required for PostgreSQL deployments.
    #[serde(default)]
    pub pgbouncer_uri: Option<SecretRef>,
}

/// Database backend, tagged by `type`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DatabaseSelection {
    /// Local SQLite database; no external service required.
    Sqlite,
    /// Managed PostgreSQL via pgbouncer.
    Postgres { credentials: PostgresCredentials },
    /// Database types this version does not understand. Rejected by the
    /// resolver rather than at parse time, so `check` reports a
    /// configuration error instead of a deserialization failure.
    #[serde(other)]
    Unknown,
}

impl Default for DatabaseSelection {
    fn default() -> Self {
        Self::Sqlite
    }
}

/// Database configuration wrapper
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub database: DatabaseSelection,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sqlite_tag() {
        let db: DatabaseSelection = serde_yaml::from_str("type: sqlite").unwrap();
        assert_eq!(db, DatabaseSelection::Sqlite);
    }

    #[test]
    fn test_postgres_tag_with_credentials() {
        let db: DatabaseSelection = serde_yaml::from_str(
            r#"
type: postgres
credentials:
  user: testuser
  password:
    key: testpass
  host: postgres.example.com
  port: 5432
  pgbouncer_host: pgbouncer.example.com
  pgbouncer_port: 6432
  dbname: testdb
  pgbouncer_uri:
    key: postgresql://u:p@pgbouncer.example.com:6432/testdb
"#,
        )
        .unwrap();
        match db {
            DatabaseSelection::Postgres { credentials } => {
                assert_eq!(credentials.user, "testuser");
                assert_eq!(credentials.pgbouncer_port, Some(6432));
                assert_eq!(credentials.dbname.as_deref(), Some("testdb"));
            }
            other => panic!("expected postgres, got {other:?}"),
        }
    }

    #[test]
    fn test_unrecognized_tag_falls_back_to_unknown() {
        let db: DatabaseSelection = serde_yaml::from_str("type: mysql").unwrap();
        assert_eq!(db, DatabaseSelection::Unknown);
    }

    #[test]
    fn test_default_is_sqlite() {
        let config: DatabaseConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.database, DatabaseSelection::Sqlite);
    }
}
