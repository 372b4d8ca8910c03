//! Loading and saving request files.
//!
//! Every call reads or writes the whole file; nothing is cached between calls.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::constants::HTTP_EXTENSION;
use crate::httpfile::{parse, serialize};
use crate::models::{RequestCollection, RequestEntry};

/// Errors raised while reading or writing a request file
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("cannot resolve the current directory: {0}")]
    CurrentDir(#[source] io::Error),

    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// Turn a user supplied file name into an absolute `.http` path
pub fn resolve_path(name: impl AsRef<Path>) -> Result<PathBuf> {
    let name = name.as_ref();
    let mut path = name.to_path_buf();
    if !name.to_string_lossy().ends_with(HTTP_EXTENSION) {
        path = PathBuf::from(format!("{}{}", name.display(), HTTP_EXTENSION));
    }
    if path.is_relative() {
        let cwd = std::env::current_dir().map_err(StorageError::CurrentDir)?;
        path = cwd.join(path);
    }
    Ok(path)
}

/// Load a request file. A missing file is an empty collection.
pub fn load(path: &Path) -> Result<RequestCollection> {
    match fs::read_to_string(path) {
        Ok(content) => {
            let collection = parse(&content);
            tracing::info!(
                path = %path.display(),
                requests = collection.requests.len(),
                globals = collection.global_vars.len(),
                "Loaded request file"
            );
            Ok(collection)
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::info!(path = %path.display(), "Request file not found, starting empty");
            Ok(RequestCollection::default())
        }
        Err(source) => Err(StorageError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Overwrite the file with the serialized collection
pub fn save(path: &Path, collection: &RequestCollection) -> Result<()> {
    fs::write(path, serialize(collection)).map_err(|source| StorageError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(
        path = %path.display(),
        requests = collection.requests.len(),
        globals = collection.global_vars.len(),
        "Saved request file"
    );
    Ok(())
}

/// Global variables currently on disk
pub fn load_global_vars(path: &Path) -> Result<BTreeMap<String, String>> {
    Ok(load(path)?.global_vars)
}

/// Replace every request in the file, keeping the globals already on disk
pub fn save_requests(path: &Path, requests: &[RequestEntry]) -> Result<()> {
    let collection = RequestCollection {
        global_vars: load_global_vars(path)?,
        requests: requests.to_vec(),
    };
    save(path, &collection)
}

/// Replace the globals in the file, keeping the requests already on disk
pub fn save_global_vars(path: &Path, vars: &BTreeMap<String, String>) -> Result<()> {
    let collection = RequestCollection {
        global_vars: vars.clone(),
        requests: load(path)?.requests,
    };
    save(path, &collection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::httpfile::headers::encode_headers;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn file_in(dir: &TempDir) -> PathBuf {
        dir.path().join("requests.http")
    }

    fn entry(name: &str, url: &str) -> RequestEntry {
        let mut req = RequestEntry::new(name, "POST", url);
        req.headers = encode_headers(["Content-Type: application/json"]);
        req.body = "{\"id\": 1}".to_string();
        req
    }

    #[test]
    fn test_resolve_path_appends_extension() {
        let path = resolve_path("collection").unwrap();
        assert!(path.is_absolute());
        assert!(path.ends_with("collection.http"));

        let path = resolve_path("/tmp/already.http").unwrap();
        assert_eq!(path, PathBuf::from("/tmp/already.http"));
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let loaded = load(&file_in(&dir)).unwrap();
        assert!(loaded.is_empty());
    }

    #[test]
    fn test_read_error_propagates() {
        let dir = TempDir::new().unwrap();
        // A directory cannot be read as a file
        let err = load(dir.path()).unwrap_err();
        assert!(matches!(err, StorageError::Read { .. }));
    }

    #[test]
    fn test_write_error_propagates() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing-dir").join("x.http");
        let err = save(&path, &RequestCollection::default()).unwrap_err();
        assert!(matches!(err, StorageError::Write { .. }));
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = file_in(&dir);

        let mut collection = RequestCollection::default();
        collection.global_vars.insert("host".to_string(), "api.test".to_string());
        collection.requests.push(entry("One", "{{host}}/one"));
        save(&path, &collection).unwrap();

        let loaded = load(&path).unwrap();
        assert_eq!(loaded, collection);
    }

    #[test]
    fn test_save_requests_keeps_globals() {
        let dir = TempDir::new().unwrap();
        let path = file_in(&dir);

        let mut collection = RequestCollection::default();
        collection.global_vars.insert("host".to_string(), "api.test".to_string());
        collection.requests.push(entry("Old", "/old"));
        save(&path, &collection).unwrap();

        save_requests(&path, &[entry("New", "/new")]).unwrap();

        let loaded = load(&path).unwrap();
        assert_eq!(loaded.global_vars["host"], "api.test");
        assert_eq!(loaded.requests.len(), 1);
        assert_eq!(loaded.requests[0].name, "New");
    }

    #[test]
    fn test_save_global_vars_keeps_requests() {
        let dir = TempDir::new().unwrap();
        let path = file_in(&dir);
        save_requests(&path, &[entry("A", "/a"), entry("B", "/b")]).unwrap();
        let before = fs::read_to_string(&path).unwrap();

        let vars = BTreeMap::from([("token".to_string(), "xyz".to_string())]);
        save_global_vars(&path, &vars).unwrap();
        let after = fs::read_to_string(&path).unwrap();

        let requests_of = |text: &str| text[text.find("### A").unwrap()..].to_string();
        assert_eq!(requests_of(&before), requests_of(&after));
        assert_eq!(load_global_vars(&path).unwrap(), vars);
    }

    #[test]
    fn test_save_global_vars_on_new_file() {
        let dir = TempDir::new().unwrap();
        let path = file_in(&dir);
        let vars = BTreeMap::from([("k".to_string(), "v".to_string())]);
        save_global_vars(&path, &vars).unwrap();

        let loaded = load(&path).unwrap();
        assert_eq!(loaded.global_vars, vars);
        assert!(loaded.requests.is_empty());
    }
}
