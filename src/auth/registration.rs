//! Sign-up data and its submit-time checks

use std::path::PathBuf;

use thiserror::Error;

use crate::models::{DriverProfile, Role};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    #[error("As senhas não coincidem.")]
    PasswordMismatch,
    #[error("A foto segurando a identidade é obrigatória.")]
    MissingIdentityPhoto,
    #[error("Campo obrigatório: {0}")]
    MissingField(&'static str),
}

/// Everything a sign-up form collects
#[derive(Debug, Clone)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
    pub role: Role,
    pub phone: Option<String>,
    pub whatsapp: Option<String>,
    /// Driver sign-ups only
    pub driver: Option<DriverProfile>,
    /// Photo of the driver holding their ID document
    pub identity_photo: Option<PathBuf>,
}

impl Registration {
    /// Checks run before the account is created.
    pub fn check(&self) -> Result<(), RegistrationError> {
        if self.name.trim().is_empty() {
            return Err(RegistrationError::MissingField("nome"));
        }
        if self.email.trim().is_empty() {
            return Err(RegistrationError::MissingField("email"));
        }
        if self.password != self.password_confirmation {
            return Err(RegistrationError::PasswordMismatch);
        }
        if self.role == Role::Driver && self.identity_photo.is_none() {
            return Err(RegistrationError::MissingIdentityPhoto);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> Registration {
        Registration {
            name: "Paula Souza".to_string(),
            email: "paula@teste.com".to_string(),
            password: "segredo".to_string(),
            password_confirmation: "segredo".to_string(),
            role: Role::Client,
            phone: None,
            whatsapp: None,
            driver: None,
            identity_photo: None,
        }
    }

    #[test]
    fn test_client_registration_passes() {
        assert_eq!(client().check(), Ok(()));
    }

    #[test]
    fn test_password_mismatch() {
        let mut reg = client();
        reg.password_confirmation = "outra".to_string();
        assert_eq!(reg.check(), Err(RegistrationError::PasswordMismatch));
    }

    #[test]
    fn test_driver_needs_identity_photo() {
        let mut reg = client();
        reg.role = Role::Driver;
        assert_eq!(reg.check(), Err(RegistrationError::MissingIdentityPhoto));

        reg.identity_photo = Some(PathBuf::from("rg.jpg"));
        assert_eq!(reg.check(), Ok(()));
    }

    #[test]
    fn test_blank_name() {
        let mut reg = client();
        reg.name = "  ".to_string();
        assert_eq!(reg.check(), Err(RegistrationError::MissingField("nome")));
    }
}
