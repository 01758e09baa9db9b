//! Data models for marketplace entities

mod driver;
mod freight;
mod message;
mod user;

pub use driver::*;
pub use freight::*;
pub use message::*;
pub use user::*;

/// Format an amount in cents as Brazilian reais (e.g. `R$ 1.250,00`).
pub fn format_brl(cents: u64) -> String {
    let reais = cents / 100;
    let centavos = cents % 100;

    let digits = reais.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    format!("R$ {},{:02}", grouped, centavos)
}
