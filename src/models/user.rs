//! User-related models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which side of the marketplace an account is on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "cliente")]
    Client,
    #[serde(rename = "freteiro")]
    Driver,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Client => "cliente",
            Role::Driver => "freteiro",
        }
    }
}

/// Driver-only profile attributes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverProfile {
    pub max_capacity_kg: u32,
    pub vehicle_type: String,
    pub service_area: String,
    /// Price per kilometre in cents
    pub price_per_km: u64,
    pub average_rating: f32,
    pub rating_count: u32,
    pub verified: bool,
    pub available: bool,
}

/// User profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub avatar: Option<String>,
    pub role: Role,
    pub phone: Option<String>,
    pub whatsapp: Option<String>,
    pub driver: Option<DriverProfile>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn is_driver(&self) -> bool {
        self.role == Role::Driver
    }

    /// Initials shown in place of a missing avatar ("João Silva" -> "JS").
    pub fn initials(&self) -> String {
        initials(&self.name)
    }

    /// Merge the fields present in `update`, bumping `updated_at`.
    pub fn apply(&mut self, update: ProfileUpdate) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(email) = update.email {
            self.email = email;
        }
        if let Some(avatar) = update.avatar {
            self.avatar = Some(avatar);
        }
        if let Some(phone) = update.phone {
            self.phone = Some(phone);
        }
        if let Some(whatsapp) = update.whatsapp {
            self.whatsapp = Some(whatsapp);
        }
        if let Some(driver) = update.driver {
            self.driver = Some(driver);
        }
        self.updated_at = Utc::now();
    }
}

/// Partial profile edit; `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub avatar: Option<String>,
    pub phone: Option<String>,
    pub whatsapp: Option<String>,
    pub driver: Option<DriverProfile>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.avatar.is_none()
            && self.phone.is_none()
            && self.whatsapp.is_none()
            && self.driver.is_none()
    }
}

pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|part| part.chars().next())
        .collect()
}
