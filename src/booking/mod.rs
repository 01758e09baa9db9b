//! Hiring a driver: form gate and confirmation

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{DriverListing, Freight, FreightStatus, PaymentMethod, User};
use crate::validation::{self, FieldKind};

/// Scheduling rules shown with every confirmation
pub const POLICIES: [&str; 2] = [
    "Não será possível reagendar após chegada do motorista",
    "Não será possível troca de horário após confirmação do pedido",
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookingError {
    /// Reached the form without choosing a driver first
    #[error("Freteiro não encontrado.")]
    MissingState,
    #[error("Por favor, preencha o campo {0}.")]
    MissingField(&'static str),
    #[error("Endereço de origem inválido: {0}")]
    InvalidOrigin(&'static str),
    #[error("Endereço de destino inválido: {0}")]
    InvalidDestination(&'static str),
    #[error("Data inválida: {0}")]
    InvalidDate(&'static str),
}

/// Values typed into the hire form, kept verbatim
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HireForm {
    pub origin: String,
    pub destination: String,
    pub date: String,
    pub time: Option<String>,
    pub cargo: String,
    pub weight: Option<String>,
    pub notes: Option<String>,
    pub payment: PaymentMethod,
}

/// A submitted form together with the driver it was submitted for
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookingDraft {
    pub driver: DriverListing,
    pub form: HireForm,
}

/// What the client sees after confirming
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Confirmation {
    pub driver: DriverListing,
    pub form: HireForm,
    pub freight: Freight,
    pub policies: [&'static str; 2],
}

impl Confirmation {
    pub fn headline(&self) -> &'static str {
        "Seu agendamento foi confirmado!"
    }

    pub fn follow_up(&self) -> &'static str {
        "Você receberá uma confirmação por email em breve."
    }
}

/// Gate the hire form. `today` is the reference date for the date check.
pub fn submit(
    driver: Option<&DriverListing>,
    form: HireForm,
    today: NaiveDate,
) -> Result<BookingDraft, BookingError> {
    let driver = driver.ok_or(BookingError::MissingState)?;

    let required = [
        ("origem", &form.origin),
        ("destino", &form.destination),
        ("data", &form.date),
        ("descrição da carga", &form.cargo),
    ];
    for (name, value) in required {
        if value.trim().is_empty() {
            return Err(BookingError::MissingField(name));
        }
    }

    let origin = validation::validate_on(&form.origin, FieldKind::Address, today);
    if !origin.is_valid {
        return Err(BookingError::InvalidOrigin(origin.message));
    }
    let destination = validation::validate_on(&form.destination, FieldKind::Address, today);
    if !destination.is_valid {
        return Err(BookingError::InvalidDestination(destination.message));
    }
    let date = validation::validate_on(&form.date, FieldKind::Date, today);
    if !date.is_valid {
        return Err(BookingError::InvalidDate(date.message));
    }

    tracing::debug!("Hire form accepted for driver {}", driver.id);
    Ok(BookingDraft {
        driver: driver.clone(),
        form,
    })
}

/// Turn a draft into a confirmation for `client`.
pub fn confirm(draft: Option<BookingDraft>, client: &User) -> Result<Confirmation, BookingError> {
    let BookingDraft { driver, form } = draft.ok_or(BookingError::MissingState)?;

    let date = validation::parse_date(&form.date)
        .ok_or(BookingError::InvalidDate("Data inválida"))?;

    let freight = Freight {
        id: 0,
        client_id: client.id.clone(),
        driver_id: driver.id.to_string(),
        client_name: client.name.clone(),
        driver_name: driver.name.clone(),
        contact_phone: driver.phone.clone(),
        origin: form.origin.clone(),
        destination: form.destination.clone(),
        date,
        time: form.time.as_deref().and_then(parse_time),
        description: form.cargo.clone(),
        weight_kg: form.weight.as_deref().and_then(parse_weight),
        price: driver.price,
        payment: form.payment,
        status: FreightStatus::Scheduled,
        notes: form.notes.clone().filter(|n| !n.trim().is_empty()),
        distance: None,
        duration: None,
    };

    tracing::info!("Freight with {} scheduled for {}", driver.name, date);
    Ok(Confirmation {
        driver,
        form,
        freight,
        policies: POLICIES,
    })
}

fn parse_time(value: &str) -> Option<NaiveTime> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .ok()
}

/// "50", "50kg" and "50 kg" all read as 50.
fn parse_weight(value: &str) -> Option<u32> {
    let digits: String = value
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}
