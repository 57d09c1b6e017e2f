use crate::{Error, Result};
use std::path::PathBuf;

/// Environment variable holding the database location.
pub const DATABASE_ENV: &str = "BIBLIOCAT_DATABASE";

/// What "delete works by author" removes besides the authorship links.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum WorkDeletion {
    /// Delete the author's links first, then works still linked to the author.
    /// Since the links are already gone, the works survive.
    #[default]
    Literal,
    /// Capture the author's works before touching the links, then remove
    /// those works together with their copies, loans and remaining links.
    Capture,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database: PathBuf,
    pub create_if_missing: bool,
    pub work_deletion: WorkDeletion,
}

impl Config {
    pub fn new(database: PathBuf, create_if_missing: bool) -> Result<Self> {
        if !create_if_missing && !database.exists() {
            return Err(Error::Connection {
                path: database,
                message: "database file does not exist (use --create to start a new one)"
                    .to_string(),
            });
        }

        Ok(Self {
            database,
            create_if_missing,
            work_deletion: WorkDeletion::default(),
        })
    }

    pub fn with_work_deletion(mut self, mode: WorkDeletion) -> Self {
        self.work_deletion = mode;
        self
    }

    pub fn default_database() -> PathBuf {
        PathBuf::from("bibliotheque.db")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_database_is_connection_error() {
        let temp = TempDir::new().unwrap();
        let result = Config::new(temp.path().join("missing.db"), false);
        assert!(matches!(result, Err(Error::Connection { .. })));
    }

    #[test]
    fn test_missing_database_allowed_with_create() {
        let temp = TempDir::new().unwrap();
        let config = Config::new(temp.path().join("new.db"), true).unwrap();
        assert!(config.create_if_missing);
        assert_eq!(config.work_deletion, WorkDeletion::Literal);
    }
}
