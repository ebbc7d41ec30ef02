//! Process-wide cache of database handles, one per connection string.
//!
//! Handles are created on first use and live until the process exits.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, LazyLock, Mutex};

use anyhow::{Result, anyhow, bail};
use tracing::debug;

use crate::Database;

static CONNECTIONS: LazyLock<Mutex<HashMap<String, Arc<Database>>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

/// Where a connection string points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Memory,
    File(PathBuf),
}

/// Accepts `sqlite::memory:`, `sqlite://<path>`, `sqlite:<path>` or a bare
/// file path.
pub fn parse_url(url: &str) -> Result<Target> {
    let url = url.trim();
    if url.is_empty() {
        bail!("connection string is empty");
    }
    if url == "sqlite::memory:" || url == ":memory:" {
        return Ok(Target::Memory);
    }

    let path = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))
        .unwrap_or(url);

    if let Some((scheme, _)) = path.split_once("://") {
        bail!("unsupported database scheme '{}'", scheme);
    }
    if path.is_empty() {
        bail!("connection string '{}' has no path", url);
    }
    Ok(Target::File(PathBuf::from(path)))
}

/// Returns the cached handle for `url`, opening (and migrating) it on first
/// use.
pub fn connect(url: &str) -> Result<Arc<Database>> {
    let mut connections = CONNECTIONS
        .lock()
        .map_err(|e| anyhow!("Connection cache lock poisoned: {}", e))?;

    if let Some(db) = connections.get(url) {
        debug!("Reusing cached database handle");
        return Ok(db.clone());
    }

    let db = match parse_url(url)? {
        Target::Memory => Database::open_in_memory()?,
        Target::File(path) => Database::open(&path)?,
    };
    let db = Arc::new(db);
    connections.insert(url.to_string(), db.clone());
    Ok(db)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_url_forms() {
        assert_eq!(parse_url("sqlite::memory:").unwrap(), Target::Memory);
        assert_eq!(
            parse_url("sqlite://data/arena.db").unwrap(),
            Target::File(PathBuf::from("data/arena.db"))
        );
        assert_eq!(
            parse_url("sqlite:arena.db").unwrap(),
            Target::File(PathBuf::from("arena.db"))
        );
        assert_eq!(
            parse_url("/var/lib/arena.db").unwrap(),
            Target::File(PathBuf::from("/var/lib/arena.db"))
        );
    }

    #[test]
    fn test_parse_url_rejects_other_backends() {
        assert!(parse_url("").is_err());
        assert!(parse_url("postgres://localhost/arena").is_err());
        assert!(parse_url("sqlite://").is_err());
    }

    #[test]
    fn test_connect_caches_per_url() {
        let dir = tempfile::tempdir().unwrap();
        let first_url = format!("sqlite://{}", dir.path().join("a.db").display());
        let second_url = format!("sqlite://{}", dir.path().join("b.db").display());

        let a1 = connect(&first_url).unwrap();
        let a2 = connect(&first_url).unwrap();
        let b = connect(&second_url).unwrap();

        assert!(Arc::ptr_eq(&a1, &a2));
        assert!(!Arc::ptr_eq(&a1, &b));
    }
}
