//! JSON-file-backed credential store.
//!
//! The whole state (`{"users": [...], "serials": [...]}`) lives in one file
//! that is rewritten in full on every mutation. Writes go to a temp file in
//! the same directory which is then renamed over the target, so the file on
//! disk is always either the old or the new state.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use lockera_accounts::{Serial, SerialCode, User};
use lockera_core::UserId;

use super::collections::Collections;
use super::r#trait::{CredentialStore, StoreError};

#[derive(Debug)]
pub struct JsonFileCredentialStore {
    path: PathBuf,
    inner: RwLock<Collections>,
}

impl JsonFileCredentialStore {
    /// Open (or lazily create) the store at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let state = load(&path)?;
        tracing::info!(
            path = %path.display(),
            users = state.users.len(),
            serials = state.serials.len(),
            "credential store loaded"
        );
        Ok(Self {
            path,
            inner: RwLock::new(state),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read<T>(&self, f: impl FnOnce(&Collections) -> T) -> Result<T, StoreError> {
        let state = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        Ok(f(&state))
    }

    /// Apply `f` to a copy of the state, persist the copy, then publish it.
    ///
    /// If either step fails the in-memory state is left as it was.
    fn commit<T>(
        &self,
        f: impl FnOnce(&mut Collections) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut state = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        let mut next = state.clone();
        let out = f(&mut next)?;
        save(&self.path, &next).inspect_err(|e| {
            tracing::error!(path = %self.path.display(), error = %e, "credential store write failed");
        })?;
        *state = next;
        Ok(out)
    }
}

fn load(path: &Path) -> Result<Collections, StoreError> {
    match fs::read(path) {
        Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Ok(Collections::default()),
        Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| StoreError::Corrupt(e.to_string())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Collections::default()),
        Err(e) => Err(StoreError::Io(e.to_string())),
    }
}

fn save(path: &Path, state: &Collections) -> Result<(), StoreError> {
    let json = serde_json::to_vec_pretty(state).map_err(|e| StoreError::Corrupt(e.to_string()))?;

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|e| StoreError::Io(e.to_string()))?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| StoreError::Io(e.to_string()))?;
    tmp.write_all(&json).map_err(|e| StoreError::Io(e.to_string()))?;
    tmp.as_file().sync_all().map_err(|e| StoreError::Io(e.to_string()))?;
    tmp.persist(path).map_err(|e| StoreError::Io(e.error.to_string()))?;
    Ok(())
}

impl CredentialStore for JsonFileCredentialStore {
    fn find_user(&self, id: UserId) -> Result<Option<User>, StoreError> {
        self.read(|c| c.user(id).cloned())
    }

    fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        self.read(|c| c.user_by_email(email).cloned())
    }

    fn list_by_creator(&self, creator: UserId) -> Result<Vec<User>, StoreError> {
        self.read(|c| c.by_creator(creator))
    }

    fn insert_user(&self, user: User) -> Result<(), StoreError> {
        self.commit(|c| c.insert_user(user))
    }

    fn register_with_serial(&self, user: User) -> Result<(), StoreError> {
        self.commit(|c| c.register_with_serial(user))
    }

    fn delete_subuser(&self, owner: UserId, id: UserId) -> Result<User, StoreError> {
        self.commit(|c| c.delete_subuser(owner, id))
    }

    fn find_serial(&self, code: &SerialCode) -> Result<Option<Serial>, StoreError> {
        self.read(|c| c.serial(code).cloned())
    }

    fn insert_serial(&self, code: SerialCode) -> Result<Serial, StoreError> {
        self.commit(|c| c.insert_serial(code))
    }

    fn backfill_creators(&self) -> Result<usize, StoreError> {
        self.commit(|c| Ok(c.backfill_creators()))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use lockera_accounts::{NewAccount, SubuserName};

    use super::*;

    fn root(email: &str, serial: &str) -> User {
        let account = NewAccount::parse(Some("Ann"), Some(email), Some("pw"), Some(serial)).unwrap();
        User::root(&account, "hash".to_string(), Utc::now())
    }

    #[test]
    fn missing_file_is_an_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileCredentialStore::open(dir.path().join("lockera.json")).unwrap();

        assert!(store.find_user_by_email("a@x.com").unwrap().is_none());
        assert!(!store.path().exists());
    }

    #[test]
    fn reopen_sees_committed_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lockera.json");

        let owner = root("a@x.com", "ABC123");
        let sub_name = SubuserName::parse(Some("Carlos"), Some("Ruiz")).unwrap();
        let sub = User::subuser(&owner, &sub_name, "lockera.com", Utc::now());
        {
            let store = JsonFileCredentialStore::open(&path).unwrap();
            store.insert_serial(SerialCode::parse("ABC123").unwrap()).unwrap();
            store.register_with_serial(owner.clone()).unwrap();
            store.insert_user(sub.clone()).unwrap();
        }

        let reopened = JsonFileCredentialStore::open(&path).unwrap();
        assert_eq!(reopened.find_user(owner.id).unwrap(), Some(owner.clone()));
        assert_eq!(reopened.list_by_creator(owner.id).unwrap(), vec![sub]);
        let serial = reopened.find_serial(&SerialCode::parse("ABC123").unwrap()).unwrap().unwrap();
        assert!(serial.used);
    }

    #[test]
    fn file_layout_has_users_and_serials_collections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lockera.json");
        let store = JsonFileCredentialStore::open(&path).unwrap();
        store.insert_serial(SerialCode::parse("S1").unwrap()).unwrap();

        let raw: serde_json::Value = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
        assert_eq!(raw["users"], serde_json::json!([]));
        assert_eq!(raw["serials"], serde_json::json!([{ "serial": "S1", "used": false }]));
    }

    #[test]
    fn rejected_mutation_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lockera.json");
        let store = JsonFileCredentialStore::open(&path).unwrap();
        store.insert_serial(SerialCode::parse("S1").unwrap()).unwrap();
        let before = fs::read(&path).unwrap();

        let err = store.register_with_serial(root("a@x.com", "NOPE")).unwrap_err();
        assert_eq!(err, StoreError::SerialUnavailable);
        assert_eq!(fs::read(&path).unwrap(), before);
    }

    #[test]
    fn failed_write_keeps_memory_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lockera.json");
        let store = JsonFileCredentialStore::open(&path).unwrap();

        // Occupy the target with a directory so the final rename fails.
        fs::create_dir(&path).unwrap();

        let err = store.insert_serial(SerialCode::parse("S1").unwrap()).unwrap_err();
        assert!(matches!(err, StoreError::Io(_)));
        assert!(store.find_serial(&SerialCode::parse("S1").unwrap()).unwrap().is_none());
    }

    #[test]
    fn unreadable_path_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();

        let store = JsonFileCredentialStore::open(dir.path());
        assert!(matches!(store, Err(StoreError::Io(_))));
    }

    #[test]
    fn corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lockera.json");
        fs::write(&path, b"{ not json").unwrap();

        assert!(matches!(
            JsonFileCredentialStore::open(&path),
            Err(StoreError::Corrupt(_))
        ));
    }

    #[test]
    fn backfill_repairs_hand_edited_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lockera.json");
        let owner_id = UserId::new();
        let orphan_id = UserId::new();
        let raw = serde_json::json!({
            "users": [
                {
                    "id": owner_id.to_string(),
                    "name": "Ann",
                    "email": "a@x.com",
                    "password": "hash",
                    "serial": "ABC123"
                },
                {
                    "id": orphan_id.to_string(),
                    "name": "Carlos Ruiz",
                    "email": "carlos.ruiz@lockera.com",
                    "password": null,
                    "serial": "ABC123"
                }
            ],
            "serials": [{ "serial": "ABC123", "used": true }]
        });
        fs::write(&path, serde_json::to_vec(&raw).unwrap()).unwrap();

        let store = JsonFileCredentialStore::open(&path).unwrap();
        assert!(store.list_by_creator(owner_id).unwrap().is_empty());
        assert_eq!(store.backfill_creators().unwrap(), 1);
        assert_eq!(store.backfill_creators().unwrap(), 0);

        let reopened = JsonFileCredentialStore::open(&path).unwrap();
        let subs = reopened.list_by_creator(owner_id).unwrap();
        assert_eq!(subs.len(), 1);
        assert_eq!(subs[0].id, orphan_id);
        assert_eq!(reopened.find_user(owner_id).unwrap().unwrap().created_by, None);
    }
}
