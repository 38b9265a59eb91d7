//! The two collections every store keeps, and the rules applied to them.
//!
//! Stores wrap this in a lock; nothing here is synchronized.

use serde::{Deserialize, Serialize};

use lockera_accounts::{Serial, SerialCode, User};
use lockera_core::UserId;

use super::StoreError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Collections {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub serials: Vec<Serial>,
}

impl Collections {
    pub fn user(&self, id: UserId) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    pub fn user_by_email(&self, email: &str) -> Option<&User> {
        self.users.iter().find(|u| u.email == email)
    }

    pub fn by_creator(&self, creator: UserId) -> Vec<User> {
        self.users
            .iter()
            .filter(|u| u.is_owned_by(creator))
            .cloned()
            .collect()
    }

    pub fn serial(&self, code: &SerialCode) -> Option<&Serial> {
        self.serials.iter().find(|s| s.matches(code))
    }

    pub fn insert_user(&mut self, user: User) -> Result<(), StoreError> {
        if self.user_by_email(&user.email).is_some() {
            return Err(StoreError::EmailTaken);
        }
        self.users.push(user);
        Ok(())
    }

    pub fn register_with_serial(&mut self, user: User) -> Result<(), StoreError> {
        if self.user_by_email(&user.email).is_some() {
            return Err(StoreError::EmailTaken);
        }

        let serial = self
            .serials
            .iter_mut()
            .find(|s| s.serial == user.serial && s.is_available())
            .ok_or(StoreError::SerialUnavailable)?;
        serial.consume().map_err(|_| StoreError::SerialUnavailable)?;

        self.users.push(user);
        Ok(())
    }

    pub fn delete_subuser(&mut self, owner: UserId, id: UserId) -> Result<User, StoreError> {
        let idx = self
            .users
            .iter()
            .position(|u| u.id == id && u.is_owned_by(owner))
            .ok_or(StoreError::NotFound)?;
        Ok(self.users.remove(idx))
    }

    pub fn insert_serial(&mut self, code: SerialCode) -> Result<Serial, StoreError> {
        if self.serial(&code).is_some() {
            return Err(StoreError::SerialExists);
        }
        let serial = Serial::new(code);
        self.serials.push(serial.clone());
        Ok(serial)
    }

    pub fn backfill_creators(&mut self) -> usize {
        let roots: Vec<(UserId, String)> = self
            .users
            .iter()
            .filter(|u| u.created_by.is_none() && u.password_hash.is_some())
            .map(|u| (u.id, u.serial.clone()))
            .collect();

        let mut updated = 0;
        for user in self
            .users
            .iter_mut()
            .filter(|u| u.created_by.is_none() && u.password_hash.is_none())
        {
            if let Some((root_id, _)) = roots
                .iter()
                .find(|(id, serial)| *id != user.id && *serial == user.serial)
            {
                user.created_by = Some(*root_id);
                updated += 1;
            }
        }
        updated
    }
}
