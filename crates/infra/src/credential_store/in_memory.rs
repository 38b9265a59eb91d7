use std::sync::RwLock;

use lockera_accounts::{Serial, SerialCode, User};
use lockera_core::UserId;

use super::collections::Collections;
use super::r#trait::{CredentialStore, StoreError};

/// In-memory credential store for tests/dev.
///
/// Writers take the write lock for the whole check-and-mutate step.
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    inner: RwLock<Collections>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read<T>(&self, f: impl FnOnce(&Collections) -> T) -> Result<T, StoreError> {
        let state = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        Ok(f(&state))
    }

    fn write<T>(
        &self,
        f: impl FnOnce(&mut Collections) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut state = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        f(&mut state)
    }
}

impl CredentialStore for InMemoryCredentialStore {
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
        self.write(|c| c.insert_user(user))
    }

    fn register_with_serial(&self, user: User) -> Result<(), StoreError> {
        self.write(|c| c.register_with_serial(user))
    }

    fn delete_subuser(&self, owner: UserId, id: UserId) -> Result<User, StoreError> {
        self.write(|c| c.delete_subuser(owner, id))
    }

    fn find_serial(&self, code: &SerialCode) -> Result<Option<Serial>, StoreError> {
        self.read(|c| c.serial(code).cloned())
    }

    fn insert_serial(&self, code: SerialCode) -> Result<Serial, StoreError> {
        self.write(|c| c.insert_serial(code))
    }

    fn backfill_creators(&self) -> Result<usize, StoreError> {
        self.write(|c| Ok(c.backfill_creators()))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;

    use chrono::Utc;
    use proptest::prelude::*;

    use lockera_accounts::{NewAccount, SubuserName};

    use super::*;

    fn root(email: &str, serial: &str) -> User {
        let account = NewAccount::parse(Some("Ann"), Some(email), Some("pw"), Some(serial)).unwrap();
        User::root(&account, "hash".to_string(), Utc::now())
    }

    #[test]
    fn concurrent_registrations_consume_a_serial_once() {
        let store = Arc::new(InMemoryCredentialStore::new());
        store.insert_serial(SerialCode::parse("RACE").unwrap()).unwrap();

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let store = store.clone();
                std::thread::spawn(move || {
                    store.register_with_serial(root(&format!("u{i}@x.com"), "RACE"))
                })
            })
            .collect();

        let successes = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(Result::is_ok)
            .count();

        assert_eq!(successes, 1);
    }

    proptest! {
        #[test]
        fn list_by_creator_returns_exactly_owned_users(owners in proptest::collection::vec(0usize..4, 0..40)) {
            let store = InMemoryCredentialStore::new();
            let roots: Vec<User> = (0..4).map(|i| root(&format!("root{i}@x.com"), "S")).collect();
            for r in &roots {
                store.insert_user(r.clone()).unwrap();
            }

            let mut expected: Vec<Vec<UserId>> = vec![Vec::new(); roots.len()];
            for (n, owner) in owners.iter().enumerate() {
                let name = SubuserName::parse(Some(&format!("Sub{n}")), Some("User")).unwrap();
                let sub = User::subuser(&roots[*owner], &name, "lockera.com", Utc::now());
                expected[*owner].push(sub.id);
                store.insert_user(sub).unwrap();
            }

            for (i, r) in roots.iter().enumerate() {
                let listed: Vec<UserId> = store.list_by_creator(r.id).unwrap().iter().map(|u| u.id).collect();
                // Same members, insertion order preserved.
                prop_assert_eq!(&listed, &expected[i]);
                let unique: HashSet<_> = listed.iter().collect();
                prop_assert_eq!(unique.len(), listed.len());
            }
        }
    }
}
