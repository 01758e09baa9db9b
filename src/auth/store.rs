//! Session persistence

use anyhow::Result;

use crate::models::User;

/// Storage backend for the signed-in user
pub trait SessionStore {
    fn load_user(&self) -> Option<User>;
    fn save_user(&mut self, user: &User) -> Result<()>;
    fn clear_user(&mut self) -> Result<()>;
}

/// Store that lives only as long as the process
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryStore {
    user: Option<User>,
}

#[cfg(test)]
impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
impl SessionStore for MemoryStore {
    fn load_user(&self) -> Option<User> {
        self.user.clone()
    }

    fn save_user(&mut self, user: &User) -> Result<()> {
        self.user = Some(user.clone());
        Ok(())
    }

    fn clear_user(&mut self) -> Result<()> {
        self.user = None;
        Ok(())
    }
}
