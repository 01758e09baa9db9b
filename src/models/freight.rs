//! Freight (frete) models and status lifecycle

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Freight status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FreightStatus {
    /// Requested by a client, waiting for the driver's answer
    #[serde(rename = "pendente")]
    Pending,
    #[serde(rename = "agendado")]
    Scheduled,
    #[serde(rename = "em_andamento")]
    InProgress,
    #[serde(rename = "concluido")]
    Completed,
    #[serde(rename = "cancelado")]
    Cancelled,
}

impl FreightStatus {
    pub const ALL: [FreightStatus; 5] = [
        FreightStatus::Pending,
        FreightStatus::Scheduled,
        FreightStatus::InProgress,
        FreightStatus::Completed,
        FreightStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FreightStatus::Pending => "pendente",
            FreightStatus::Scheduled => "agendado",
            FreightStatus::InProgress => "em_andamento",
            FreightStatus::Completed => "concluido",
            FreightStatus::Cancelled => "cancelado",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FreightStatus::Pending => "Aguardando Resposta",
            FreightStatus::Scheduled => "Agendado",
            FreightStatus::InProgress => "Em Andamento",
            FreightStatus::Completed => "Concluído",
            FreightStatus::Cancelled => "Cancelado",
        }
    }

    pub fn is_final(&self) -> bool {
        matches!(self, FreightStatus::Completed | FreightStatus::Cancelled)
    }

    /// Apply an action, returning the next status.
    pub fn apply(self, action: FreightAction) -> Result<FreightStatus, TransitionError> {
        use FreightAction::*;
        use FreightStatus::*;

        match (self, action) {
            (Pending, Accept) => Ok(Scheduled),
            (Pending, Decline) => Ok(Cancelled),
            (Scheduled, Start) => Ok(InProgress),
            (Scheduled, Cancel) => Ok(Cancelled),
            (InProgress, Finish) => Ok(Completed),
            (from, action) => Err(TransitionError { from, action }),
        }
    }
}

impl fmt::Display for FreightStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for FreightStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pendente" | "pending" => Ok(FreightStatus::Pending),
            "agendado" | "scheduled" => Ok(FreightStatus::Scheduled),
            "em_andamento" | "in-progress" | "in_progress" => Ok(FreightStatus::InProgress),
            "concluido" | "completed" => Ok(FreightStatus::Completed),
            "cancelado" | "cancelled" => Ok(FreightStatus::Cancelled),
            other => Err(format!("unknown freight status: {}", other)),
        }
    }
}

/// Something a driver or client does to a freight
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FreightAction {
    Accept,
    Decline,
    Start,
    Finish,
    Cancel,
}

impl fmt::Display for FreightAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FreightAction::Accept => "accept",
            FreightAction::Decline => "decline",
            FreightAction::Start => "start",
            FreightAction::Finish => "finish",
            FreightAction::Cancel => "cancel",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot {action} a freight that is {from}")]
pub struct TransitionError {
    pub from: FreightStatus,
    pub action: FreightAction,
}

/// How the client pays the driver
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[default]
    #[serde(rename = "dinheiro")]
    Cash,
    #[serde(rename = "pix")]
    Pix,
    #[serde(rename = "cartao")]
    Card,
}

impl PaymentMethod {
    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Dinheiro",
            PaymentMethod::Pix => "PIX",
            PaymentMethod::Card => "Cartão",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Pagamento em espécie",
            PaymentMethod::Pix => "Instantâneo e seguro",
            PaymentMethod::Card => "Débito ou crédito",
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dinheiro" | "cash" => Ok(PaymentMethod::Cash),
            "pix" => Ok(PaymentMethod::Pix),
            "cartao" | "cartão" | "card" => Ok(PaymentMethod::Card),
            other => Err(format!("unknown payment method: {}", other)),
        }
    }
}

/// Freight record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Freight {
    pub id: u32,
    pub client_id: String,
    pub driver_id: String,
    pub client_name: String,
    pub driver_name: String,
    /// Phone of the counterpart shown on the card
    pub contact_phone: String,
    pub origin: String,
    pub destination: String,
    pub date: NaiveDate,
    pub time: Option<NaiveTime>,
    pub description: String,
    pub weight_kg: Option<u32>,
    /// Price in cents
    pub price: u64,
    pub payment: PaymentMethod,
    pub status: FreightStatus,
    pub notes: Option<String>,
    pub distance: Option<String>,
    pub duration: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path_lifecycle() {
        let status = FreightStatus::Pending
            .apply(FreightAction::Accept)
            .and_then(|s| s.apply(FreightAction::Start))
            .and_then(|s| s.apply(FreightAction::Finish))
            .unwrap();
        assert_eq!(status, FreightStatus::Completed);
        assert!(status.is_final());
    }

    #[test]
    fn test_forbidden_transitions() {
        let err = FreightStatus::Completed
            .apply(FreightAction::Cancel)
            .unwrap_err();
        assert_eq!(err.from, FreightStatus::Completed);
        assert_eq!(err.to_string(), "cannot cancel a freight that is Concluído");

        assert!(FreightStatus::InProgress.apply(FreightAction::Cancel).is_err());
        assert!(FreightStatus::Pending.apply(FreightAction::Finish).is_err());
        assert!(FreightStatus::Cancelled.apply(FreightAction::Accept).is_err());
    }

    #[test]
    fn test_status_parses_both_vocabularies() {
        for status in FreightStatus::ALL {
            assert_eq!(status.as_str().parse::<FreightStatus>().unwrap(), status);
        }
        assert_eq!(
            "in-progress".parse::<FreightStatus>().unwrap(),
            FreightStatus::InProgress
        );
        assert!("entregue".parse::<FreightStatus>().is_err());
    }

    #[test]
    fn test_payment_method_defaults_to_cash() {
        assert_eq!(PaymentMethod::default(), PaymentMethod::Cash);
        assert_eq!("Cartão".parse::<PaymentMethod>().unwrap(), PaymentMethod::Card);
        assert_eq!(
            serde_json::to_string(&PaymentMethod::Pix).unwrap(),
            "\"pix\""
        );
    }
}
