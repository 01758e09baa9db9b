//! The signed-in user and the operations that change it

use chrono::Utc;
use thiserror::Error;

use super::accounts;
use super::registration::Registration;
use super::store::SessionStore;
use crate::models::{ProfileUpdate, Role, User};

/// What a screen requires of the current session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Authenticated,
    Driver,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    #[error("Você precisa estar logado para acessar esta página.")]
    NotAuthenticated,
    #[error("Esta área é exclusiva para freteiros cadastrados.")]
    NotDriver,
}

/// At most one authenticated user, mirrored into a [`SessionStore`].
///
/// Operations never fail: persistence problems are logged and the in-memory
/// session stays authoritative for the rest of the process.
pub struct Session<S: SessionStore> {
    store: S,
    user: Option<User>,
}

impl<S: SessionStore> Session<S> {
    /// Start from whatever the store has persisted.
    pub fn restore(store: S) -> Self {
        let user = store.load_user();
        if let Some(ref u) = user {
            tracing::debug!("Restored session for {}", u.email);
        }
        Self { store, user }
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn is_driver(&self) -> bool {
        self.user.as_ref().is_some_and(User::is_driver)
    }

    #[cfg(test)]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Sign in against the seeded accounts. On failure the current session
    /// is left as it was.
    pub fn login(&mut self, email: &str, password: &str) -> bool {
        match accounts::find(email, password) {
            Some(user) => {
                tracing::info!("Login succeeded for {}", user.email);
                self.user = Some(user);
                self.persist();
                true
            }
            None => {
                tracing::info!("Login failed for {}", email);
                false
            }
        }
    }

    /// Create a local account and make it the active session.
    pub fn register(&mut self, registration: Registration) -> User {
        let now = Utc::now();
        let user = User {
            id: now.timestamp_millis().to_string(),
            name: registration.name,
            email: registration.email,
            avatar: None,
            role: registration.role,
            phone: registration.phone,
            whatsapp: registration.whatsapp,
            driver: match registration.role {
                Role::Driver => registration.driver,
                Role::Client => None,
            },
            created_at: now,
            updated_at: now,
        };

        tracing::info!("Registered {} as {}", user.email, user.role.as_str());
        self.user = Some(user.clone());
        self.persist();
        user
    }

    /// Merge `update` into the current user. Returns false when nobody is
    /// signed in.
    pub fn update_profile(&mut self, update: ProfileUpdate) -> bool {
        let Some(user) = self.user.as_mut() else {
            return false;
        };
        user.apply(update);
        tracing::info!("Profile updated for {}", user.email);
        self.persist();
        true
    }

    pub fn logout(&mut self) {
        if let Some(user) = self.user.take() {
            tracing::info!("Logged out {}", user.email);
        }
        if let Err(e) = self.store.clear_user() {
            tracing::warn!("Failed to clear stored session: {:#}", e);
        }
    }

    /// The current user, if they may enter a screen requiring `access`.
    pub fn require(&self, access: Access) -> Result<&User, AccessError> {
        let user = self.user.as_ref().ok_or(AccessError::NotAuthenticated)?;
        if access == Access::Driver && !user.is_driver() {
            return Err(AccessError::NotDriver);
        }
        Ok(user)
    }

    fn persist(&mut self) {
        if let Some(ref user) = self.user {
            if let Err(e) = self.store.save_user(user) {
                tracing::warn!("Failed to persist session: {:#}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::MemoryStore;

    fn session() -> Session<MemoryStore> {
        Session::restore(MemoryStore::new())
    }

    fn registration(role: Role) -> Registration {
        Registration {
            name: "Paula Souza".to_string(),
            email: "paula@teste.com".to_string(),
            password: "segredo".to_string(),
            password_confirmation: "segredo".to_string(),
            role,
            phone: Some("(53) 98888-7777".to_string()),
            whatsapp: None,
            driver: None,
            identity_photo: None,
        }
    }

    /// Store whose writes always fail
    struct BrokenStore;

    impl SessionStore for BrokenStore {
        fn load_user(&self) -> Option<User> {
            None
        }
        fn save_user(&mut self, _user: &User) -> anyhow::Result<()> {
            anyhow::bail!("disk full")
        }
        fn clear_user(&mut self) -> anyhow::Result<()> {
            anyhow::bail!("disk full")
        }
    }

    #[test]
    fn test_login_client() {
        let mut s = session();
        assert!(s.login("joao@teste.com", "123456"));
        assert_eq!(s.user().unwrap().role, Role::Client);
        assert!(!s.is_driver());
        assert_eq!(s.store().load_user().unwrap().email, "joao@teste.com");
    }

    #[test]
    fn test_login_driver() {
        let mut s = session();
        assert!(s.login("freteiro@teste.com", "123456"));
        assert_eq!(s.user().unwrap().role, Role::Driver);
        assert!(s.is_driver());
    }

    #[test]
    fn test_failed_login_leaves_session_unset() {
        let mut s = session();
        assert!(!s.login("x@x.com", "wrong"));
        assert!(s.user().is_none());
        assert!(s.store().load_user().is_none());
    }

    #[test]
    fn test_failed_login_keeps_existing_identity() {
        let mut s = session();
        assert!(s.login("joao@teste.com", "123456"));
        assert!(!s.login("freteiro@teste.com", "errada"));
        assert_eq!(s.user().unwrap().email, "joao@teste.com");
    }

    #[test]
    fn test_login_replaces_identity() {
        let mut s = session();
        s.login("joao@teste.com", "123456");
        s.login("freteiro@teste.com", "123456");
        assert_eq!(s.user().unwrap().email, "freteiro@teste.com");
        assert_eq!(s.store().load_user().unwrap().email, "freteiro@teste.com");
    }

    #[test]
    fn test_register_always_succeeds_and_persists() {
        let mut s = session();
        let user = s.register(registration(Role::Client));

        assert_eq!(user.name, "Paula Souza");
        assert!(user.id.parse::<i64>().is_ok());
        assert_eq!(s.user(), Some(&user));
        assert_eq!(s.store().load_user(), Some(user));
    }

    #[test]
    fn test_client_registration_drops_driver_profile() {
        let mut reg = registration(Role::Client);
        reg.driver = Some(crate::models::DriverProfile {
            max_capacity_kg: 500,
            vehicle_type: "Fiorino".to_string(),
            service_area: "Pelotas, RS".to_string(),
            price_per_km: 200,
            average_rating: 0.0,
            rating_count: 0,
            verified: false,
            available: true,
        });
        let user = session().register(reg);
        assert!(user.driver.is_none());
    }

    #[test]
    fn test_update_profile_requires_session() {
        let mut s = session();
        let update = ProfileUpdate {
            name: Some("Novo Nome".to_string()),
            ..Default::default()
        };
        assert!(!s.update_profile(update.clone()));

        s.login("joao@teste.com", "123456");
        assert!(s.update_profile(update));
        assert_eq!(s.user().unwrap().name, "Novo Nome");
        assert_eq!(s.store().load_user().unwrap().name, "Novo Nome");
    }

    #[test]
    fn test_logout_clears_memory_and_store() {
        let mut s = session();
        s.login("joao@teste.com", "123456");
        s.logout();
        assert!(!s.is_authenticated());
        assert!(s.store().load_user().is_none());
    }

    #[test]
    fn test_restore_picks_up_persisted_user() {
        let mut s = session();
        s.login("freteiro@teste.com", "123456");
        let persisted = s.store().load_user().unwrap();

        let mut store = MemoryStore::new();
        store.save_user(&persisted).unwrap();
        let restored = Session::restore(store);
        assert_eq!(restored.user(), Some(&persisted));
    }

    #[test]
    fn test_require() {
        let mut s = session();
        assert_eq!(
            s.require(Access::Authenticated).unwrap_err(),
            AccessError::NotAuthenticated
        );

        s.login("joao@teste.com", "123456");
        assert!(s.require(Access::Authenticated).is_ok());
        assert_eq!(s.require(Access::Driver).unwrap_err(), AccessError::NotDriver);

        s.login("freteiro@teste.com", "123456");
        assert_eq!(s.require(Access::Driver).unwrap().name, "Carlos Freteiro");
    }

    #[test]
    fn test_store_failures_do_not_fail_operations() {
        let mut s = Session::restore(BrokenStore);
        assert!(s.login("joao@teste.com", "123456"));
        assert!(s.is_authenticated());
        s.logout();
        assert!(!s.is_authenticated());
    }
}
