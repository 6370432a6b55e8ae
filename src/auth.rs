//! Logged-in-user context over a key-value persistence slot
//!
//! The store is a collaborator seam: the session only ever sees the
//! trait. There is no password handling or backend here; the identifier
//! is whatever the login screen collected.

use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing::info;

/// Persistence slot for the logged-in user identifier
pub trait UserStore {
    fn load(&self) -> Option<String>;
    fn save(&self, user_id: &str) -> io::Result<()>;
    fn clear(&self) -> io::Result<()>;
}

/// File-backed store, one identifier per file
pub struct FileUserStore {
    path: PathBuf,
}

impl FileUserStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl UserStore for FileUserStore {
    fn load(&self) -> Option<String> {
        let contents = fs::read_to_string(&self.path).ok()?;
        let trimmed = contents.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    fn save(&self, user_id: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, user_id)
    }

    fn clear(&self) -> io::Result<()> {
        match fs::remove_file(&self.path) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}

/// In-memory store for tests and ephemeral sessions
#[derive(Default)]
pub struct MemoryUserStore {
    user: Mutex<Option<String>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl UserStore for MemoryUserStore {
    fn load(&self) -> Option<String> {
        self.user.lock().ok()?.clone()
    }

    fn save(&self, user_id: &str) -> io::Result<()> {
        if let Ok(mut user) = self.user.lock() {
            *user = Some(user_id.to_string());
        }
        Ok(())
    }

    fn clear(&self) -> io::Result<()> {
        if let Ok(mut user) = self.user.lock() {
            *user = None;
        }
        Ok(())
    }
}

/// Explicit user context passed down to screens at construction.
/// Initialization reads the persisted identifier; logout clears it.
#[derive(Debug, Clone, Default)]
pub struct AuthSession {
    user: Option<String>,
}

impl AuthSession {
    pub fn init(store: &dyn UserStore) -> Self {
        let user = store.load();
        if let Some(user_id) = &user {
            info!(user = %user_id, "Restored persisted user session");
        }
        Self { user }
    }

    pub fn login(&mut self, store: &dyn UserStore, user_id: &str) -> io::Result<()> {
        self.user = Some(user_id.to_string());
        store.save(user_id)
    }

    pub fn logout(&mut self, store: &dyn UserStore) -> io::Result<()> {
        self.user = None;
        store.clear()
    }

    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.user.is_some()
    }
}
