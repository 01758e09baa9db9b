//! Seed data for the in-memory catalog

use chrono::{NaiveDate, NaiveTime};

use crate::models::{
    DriverListing, Freight, FreightStatus, PaymentMethod, Review, VehicleClass,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn time(h: u32, m: u32) -> Option<NaiveTime> {
    NaiveTime::from_hms_opt(h, m, 0)
}

#[allow(clippy::too_many_arguments)]
fn driver(
    id: u32,
    name: &str,
    rating: f32,
    review_count: u32,
    price_reais: u64,
    typical_duration: &str,
    capacity_kg: u32,
    phone: &str,
    verified: bool,
    description: &str,
    carries_furniture: bool,
) -> DriverListing {
    DriverListing {
        id,
        name: name.to_string(),
        rating,
        review_count,
        price: price_reais * 100,
        typical_duration: typical_duration.to_string(),
        capacity_kg,
        phone: phone.to_string(),
        verified,
        description: description.to_string(),
        issues_invoice: true,
        carries_furniture,
        service_area: "São Paulo, SP".to_string(),
    }
}

pub fn drivers() -> Vec<DriverListing> {
    vec![
        driver(
            1,
            "João Silva",
            9.6,
            67,
            150,
            "2-4 horas",
            300,
            "(11) 9999-1234",
            true,
            "Fretes e pequenas mudanças para dentro da cidade",
            false,
        ),
        driver(
            2,
            "Maria Santos",
            9.2,
            45,
            120,
            "3-5 horas",
            450,
            "(11) 9999-5678",
            true,
            "Frete ágil, levamos seus produtos dos menores aos maiores",
            false,
        ),
        driver(
            3,
            "Carlos Oliveira",
            8.0,
            34,
            465,
            "4-6 horas",
            2500,
            "(11) 9999-9012",
            false,
            "Somos uma pequena empresa de entrega especializada de mercadorias",
            false,
        ),
        driver(
            4,
            "Ana Costa",
            6.3,
            62,
            890,
            "1-3 horas",
            4800,
            "(11) 9999-3456",
            true,
            "Para qualquer lugar do Brasil - Especialista em longas distâncias",
            false,
        ),
        driver(
            5,
            "Roberto Lima",
            9.0,
            89,
            180,
            "2-3 horas",
            500,
            "(11) 9999-7890",
            true,
            "Especialista em fretes médios e mudanças residenciais",
            true,
        ),
    ]
}

pub fn reviews() -> Vec<Review> {
    vec![
        Review {
            author: "Carlos Silva".to_string(),
            score: 10,
            comment: Some("Excelente serviço! Pontual e cuidadoso com a carga.".to_string()),
            date: date(2025, 1, 15),
        },
        Review {
            author: "Maria Santos".to_string(),
            score: 10,
            comment: Some("Super recomendo! Muito profissional.".to_string()),
            date: date(2025, 1, 12),
        },
        Review {
            author: "João Oliveira".to_string(),
            score: 8,
            comment: Some("Bom atendimento, chegou no horário combinado.".to_string()),
            date: date(2025, 1, 8),
        },
    ]
}

pub fn vehicle_classes() -> Vec<VehicleClass> {
    let class = |capacity_kg, height: &str, width: &str, depth: &str, price_reais: u64| {
        VehicleClass {
            capacity_kg,
            height: height.to_string(),
            width: width.to_string(),
            depth: depth.to_string(),
            starting_price: price_reais * 100,
        }
    };

    vec![
        class(300, "1,5m", "1,20m", "1,80m", 80),
        class(450, "2,0m", "1,60m", "1,80m", 120),
        class(500, "2,3m", "1,80m", "2,20m", 180),
        class(2500, "2,30m", "2,10m", "4,5m", 350),
        class(4800, "2,60m", "2,40m", "8,5m", 650),
    ]
}

/// Client freights belong to the seeded client (id "1"); dashboard freights
/// to the seeded driver (id "2").
pub fn freights() -> Vec<Freight> {
    vec![
        Freight {
            id: 101,
            client_id: "1".to_string(),
            driver_id: "entregamos".to_string(),
            client_name: "João Silva".to_string(),
            driver_name: "ENTREGAMOS Frete Carga".to_string(),
            contact_phone: "(11) 9999-1234".to_string(),
            origin: "São Paulo, SP".to_string(),
            destination: "Santos, SP".to_string(),
            date: date(2025, 1, 30),
            time: time(14, 0),
            description: "Mudança residencial".to_string(),
            weight_kg: None,
            price: 15_000,
            payment: PaymentMethod::Pix,
            status: FreightStatus::Scheduled,
            notes: None,
            distance: None,
            duration: None,
        },
        Freight {
            id: 102,
            client_id: "1".to_string(),
            driver_id: "alexandre".to_string(),
            client_name: "João Silva".to_string(),
            driver_name: "Alexandre Transportes".to_string(),
            contact_phone: "(11) 9999-5678".to_string(),
            origin: "Guarulhos, SP".to_string(),
            destination: "Campinas, SP".to_string(),
            date: date(2025, 1, 28),
            time: time(9, 0),
            description: "Eletrodomésticos".to_string(),
            weight_kg: None,
            price: 12_000,
            payment: PaymentMethod::Cash,
            status: FreightStatus::InProgress,
            notes: None,
            distance: None,
            duration: None,
        },
        Freight {
            id: 103,
            client_id: "1".to_string(),
            driver_id: "totalfretes".to_string(),
            client_name: "João Silva".to_string(),
            driver_name: "Total Fretes SP".to_string(),
            contact_phone: "(11) 9999-3456".to_string(),
            origin: "São Paulo, SP".to_string(),
            destination: "Rio de Janeiro, RJ".to_string(),
            date: date(2025, 1, 25),
            time: time(8, 0),
            description: "Documentos empresariais".to_string(),
            weight_kg: None,
            price: 45_000,
            payment: PaymentMethod::Card,
            status: FreightStatus::Completed,
            notes: None,
            distance: None,
            duration: None,
        },
        Freight {
            id: 201,
            client_id: "maria".to_string(),
            driver_id: "2".to_string(),
            client_name: "Maria Silva".to_string(),
            driver_name: "Carlos Freteiro".to_string(),
            contact_phone: "(11) 99999-9999".to_string(),
            origin: "Rua das Flores, 123 - São Paulo, SP".to_string(),
            destination: "Av. Paulista, 456 - São Paulo, SP".to_string(),
            date: date(2025, 1, 2),
            time: time(14, 0),
            description: "Mudança completa - móveis de apartamento".to_string(),
            weight_kg: Some(200),
            price: 35_000,
            payment: PaymentMethod::Pix,
            status: FreightStatus::Pending,
            notes: None,
            distance: Some("15 km".to_string()),
            duration: Some("45 min".to_string()),
        },
        Freight {
            id: 202,
            client_id: "joao-santos".to_string(),
            driver_id: "2".to_string(),
            client_name: "João Santos".to_string(),
            driver_name: "Carlos Freteiro".to_string(),
            contact_phone: "(11) 88888-8888".to_string(),
            origin: "Rua Augusta, 789 - São Paulo, SP".to_string(),
            destination: "Rua Oscar Freire, 321 - São Paulo, SP".to_string(),
            date: date(2025, 1, 2),
            time: time(16, 30),
            description: "Transporte de eletrodomésticos".to_string(),
            weight_kg: Some(80),
            price: 18_000,
            payment: PaymentMethod::Cash,
            status: FreightStatus::Pending,
            notes: None,
            distance: Some("8 km".to_string()),
            duration: Some("25 min".to_string()),
        },
        Freight {
            id: 203,
            client_id: "ana".to_string(),
            driver_id: "2".to_string(),
            client_name: "Ana Costa".to_string(),
            driver_name: "Carlos Freteiro".to_string(),
            contact_phone: "(11) 77777-7777".to_string(),
            origin: "Shopping Ibirapuera - São Paulo, SP".to_string(),
            destination: "Rua Vergueiro, 555 - São Paulo, SP".to_string(),
            date: date(2025, 1, 1),
            time: time(9, 0),
            description: "Entrega de móveis novos".to_string(),
            weight_kg: Some(150),
            price: 28_000,
            payment: PaymentMethod::Card,
            status: FreightStatus::InProgress,
            notes: None,
            distance: Some("12 km".to_string()),
            duration: Some("35 min".to_string()),
        },
    ]
}
