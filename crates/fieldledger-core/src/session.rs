//! Session persistence for the three-header auth scheme.
//!
//! Stores the signed-in employee plus the `access-token` / `client` / `uid`
//! header values in `<base>/session.json` with restricted permissions (0600).
//! Tokens are never logged or displayed in full.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::api::ClientError;
use crate::api::types::Employee;
use crate::config::paths;

/// Auth header bundle attached to every authenticated request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthHeaders {
    pub access_token: String,
    pub client: String,
    pub uid: String,
}

/// A persisted login: employee profile plus the three header values.
///
/// The on-disk layout keeps the four keys the mobile build used (`user`,
/// `userToken`, `client`, `uid`) so a session written by either client
/// reads back in the other.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub user: Employee,
    #[serde(rename = "userToken")]
    pub access_token: String,
    pub client: String,
    pub uid: String,
}

impl Session {
    pub fn new(user: Employee, auth: AuthHeaders) -> Self {
        Self {
            user,
            access_token: auth.access_token,
            client: auth.client,
            uid: auth.uid,
        }
    }

    /// The header bundle for authenticated requests.
    pub fn headers(&self) -> AuthHeaders {
        AuthHeaders {
            access_token: self.access_token.clone(),
            client: self.client.clone(),
            uid: self.uid.clone(),
        }
    }

    /// True when all three header values are present. An incomplete session
    /// must be treated as logged out, never sent to the backend.
    pub fn is_complete(&self) -> bool {
        !self.access_token.is_empty() && !self.client.is_empty() && !self.uid.is_empty()
    }
}

/// Returns a masked version of a token for display (first 12 chars + ...).
pub fn mask_token(token: &str) -> String {
    if token.len() <= 16 {
        return "***".to_string();
    }
    format!("{}...", &token[..12])
}

fn require_complete(session: &Session) -> Result<()> {
    if session.is_complete() {
        Ok(())
    } else {
        Err(ClientError::validation(
            "session is missing auth header values; refusing to persist",
        )
        .into())
    }
}

/// Storage for the current session.
///
/// The auth layer only talks to this trait, so tests and embedders can swap
/// the file store for an in-memory one.
pub trait SessionStore {
    /// Loads the stored session, or `None` when nothing is stored.
    ///
    /// # Errors
    /// Returns an error if the operation fails.
    fn load(&self) -> Result<Option<Session>>;

    /// Persists the session. Rejects incomplete sessions.
    ///
    /// # Errors
    /// Returns an error if the operation fails.
    fn save(&self, session: &Session) -> Result<()>;

    /// Removes any stored session. Clearing an empty store is not an error.
    ///
    /// # Errors
    /// Returns an error if the operation fails.
    fn clear(&self) -> Result<()>;
}

/// Session store backed by `session.json` in the app home directory.
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Store at the default location, `<base>/session.json`.
    pub fn open_default() -> Self {
        Self::new(paths::session_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<Session>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read session from {}", self.path.display()))?;

        let session = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse session from {}", self.path.display()))?;

        Ok(Some(session))
    }

    fn save(&self, session: &Session) -> Result<()> {
        require_complete(session)?;

        // Ensure parent directory exists
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let contents =
            serde_json::to_string_pretty(session).context("Failed to serialize session")?;

        // Write with restricted permissions
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .mode(0o600)
                .open(&self.path)
                .with_context(|| {
                    format!("Failed to open {} for writing", self.path.display())
                })?;
            file.write_all(contents.as_bytes())
                .with_context(|| format!("Failed to write to {}", self.path.display()))?;
        }

        #[cfg(not(unix))]
        {
            fs::write(&self.path, contents)
                .with_context(|| format!("Failed to write to {}", self.path.display()))?;
        }

        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err)
                .with_context(|| format!("Failed to remove session at {}", self.path.display())),
        }
    }
}

/// In-memory session store for tests and embedders.
#[derive(Default)]
pub struct MemorySessionStore {
    inner: Mutex<Option<Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<Session>> {
        // A poisoned lock still holds usable data for a plain Option.
        self.inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<Session>> {
        Ok(self.lock().clone())
    }

    fn save(&self, session: &Session) -> Result<()> {
        require_complete(session)?;
        *self.lock() = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.lock() = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    fn sample_session() -> Session {
        Session {
            user: Employee {
                id: 7,
                name: "Jane A.".to_string(),
                email: "jane@example.com".to_string(),
                extra: serde_json::Map::new(),
            },
            access_token: "tok-123".to_string(),
            client: "client-abc".to_string(),
            uid: "jane@example.com".to_string(),
        }
    }

    /// Test: save/load round-trip through the file store.
    #[test]
    fn test_file_store_round_trip() {
        let dir = tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("session.json"));

        assert!(store.load().unwrap().is_none());

        let session = sample_session();
        store.save(&session).unwrap();
        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded, session);
        assert_eq!(loaded.headers().client, "client-abc");
    }

    /// Test: the on-disk layout uses the four legacy keys.
    #[test]
    fn test_file_layout_uses_legacy_keys() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        let store = FileSessionStore::new(path.clone());
        store.save(&sample_session()).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert!(raw.get("user").is_some());
        assert_eq!(raw["userToken"], "tok-123");
        assert_eq!(raw["client"], "client-abc");
        assert_eq!(raw["uid"], "jane@example.com");
    }

    /// Test: the session file is written with 0600 permissions.
    #[cfg(unix)]
    #[test]
    fn test_file_store_restricts_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        FileSessionStore::new(path.clone())
            .save(&sample_session())
            .unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    /// Test: saving an incomplete session is a validation error and writes
    /// nothing.
    #[test]
    fn test_save_rejects_incomplete_session() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        let store = FileSessionStore::new(path.clone());

        let mut session = sample_session();
        session.client = String::new();
        let err = store.save(&session).unwrap_err();
        assert!(err.downcast_ref::<ClientError>().is_some());
        assert!(!path.exists());
    }

    /// Test: clearing is idempotent.
    #[test]
    fn test_clear_is_idempotent() {
        let dir = tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("session.json"));

        store.save(&sample_session()).unwrap();
        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
        store.clear().unwrap();
    }

    /// Test: corrupt JSON is a load error, not a silent empty session.
    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = FileSessionStore::new(path).load().unwrap_err();
        assert!(err.to_string().contains("Failed to parse session"));
    }

    /// Test: the memory store behaves like the file store.
    #[test]
    fn test_memory_store_round_trip() {
        let store = MemorySessionStore::new();
        assert!(store.load().unwrap().is_none());
        store.save(&sample_session()).unwrap();
        assert!(store.load().unwrap().is_some());
        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());

        let mut incomplete = sample_session();
        incomplete.access_token = String::new();
        assert!(store.save(&incomplete).is_err());
        assert!(store.load().unwrap().is_none());
    }

    /// Test: completeness requires all three header values.
    #[test]
    fn test_session_completeness() {
        let session = sample_session();
        assert!(session.is_complete());

        for field in ["token", "client", "uid"] {
            let mut broken = sample_session();
            match field {
                "token" => broken.access_token = String::new(),
                "client" => broken.client = String::new(),
                _ => broken.uid = String::new(),
            }
            assert!(!broken.is_complete(), "{field} should be required");
        }
    }

    /// Test: token masking shows a short prefix only.
    #[test]
    fn test_mask_token() {
        assert_eq!(mask_token("short"), "***");
        assert_eq!(mask_token("0123456789abcdef"), "***");
        assert_eq!(mask_token("0123456789abcdef0123"), "0123456789ab...");
    }
}
