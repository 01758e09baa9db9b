//! Seeded demo accounts

use chrono::Utc;

use crate::models::{DriverProfile, Role, User};

struct SeedAccount {
    id: &'static str,
    name: &'static str,
    email: &'static str,
    password: &'static str,
    avatar: &'static str,
    role: Role,
}

const ACCOUNTS: &[SeedAccount] = &[
    SeedAccount {
        id: "1",
        name: "João Silva",
        email: "joao@teste.com",
        password: "123456",
        avatar: "https://images.unsplash.com/photo-1472099645785-5658abf4ff4e?w=150&h=150&fit=crop&crop=face",
        role: Role::Client,
    },
    SeedAccount {
        id: "2",
        name: "Carlos Freteiro",
        email: "freteiro@teste.com",
        password: "123456",
        avatar: "https://images.unsplash.com/photo-1560250097-0b93528c311a?w=150&h=150&fit=crop&crop=face",
        role: Role::Driver,
    },
];

/// Look up a seeded account by exact email and password.
pub(super) fn find(email: &str, password: &str) -> Option<User> {
    let account = ACCOUNTS
        .iter()
        .find(|a| a.email == email && a.password == password)?;

    let now = Utc::now();
    let driver = (account.role == Role::Driver).then(|| DriverProfile {
        max_capacity_kg: 1500,
        vehicle_type: "Van".to_string(),
        service_area: "São Paulo, SP".to_string(),
        price_per_km: 350,
        average_rating: 9.4,
        rating_count: 127,
        verified: true,
        available: true,
    });

    Some(User {
        id: account.id.to_string(),
        name: account.name.to_string(),
        email: account.email.to_string(),
        avatar: Some(account.avatar.to_string()),
        role: account.role,
        phone: None,
        whatsapp: None,
        driver,
        created_at: now,
        updated_at: now,
    })
}
