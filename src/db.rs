use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Records keyed by their string id.
pub type DB<T> = HashMap<String, T>;

#[derive(Debug, Error)]
pub enum DBError {
    #[error("db io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("db serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

const DB_FILE: &str = "db.json";

/// Loads the database from `{location}/db.json`. A missing file is an
/// empty database, not an error.
pub fn load_db<T: DeserializeOwned>(location: &str) -> Result<DB<T>, DBError> {
    let path = Path::new(location).join(DB_FILE);
    if !path.exists() {
        return Ok(HashMap::new());
    }
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

pub fn save_db<T: Serialize>(location: &str, db: &DB<T>) -> Result<(), DBError> {
    fs::create_dir_all(location)?;
    let path = Path::new(location).join(DB_FILE);
    let content = serde_json::to_string_pretty(db)?;
    fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_loads_empty() {
        let location = std::env::temp_dir()
            .join(format!("dayplanner_db_{}", uuid::Uuid::new_v4()))
            .to_string_lossy()
            .to_string();
        let db: DB<String> = load_db(&location).unwrap();
        assert!(db.is_empty());
    }

    #[test]
    fn save_then_load_round_trips() {
        let location = std::env::temp_dir()
            .join(format!("dayplanner_db_{}", uuid::Uuid::new_v4()))
            .to_string_lossy()
            .to_string();
        let mut db: DB<String> = HashMap::new();
        db.insert("a1".to_string(), "morning run".to_string());
        save_db(&location, &db).unwrap();

        let loaded: DB<String> = load_db(&location).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.get("a1").map(String::as_str), Some("morning run"));
    }
}
