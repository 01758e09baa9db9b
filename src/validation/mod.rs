//! Field validation heuristics
//!
//! Classifies free-text form fields (city, address, date, amount) as valid or
//! invalid and produces the message shown next to the field. Everything here
//! is pure: the same input always yields the same result.

pub mod forms;

use chrono::{Local, NaiveDate, NaiveDateTime};
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// Smallest accepted amount, in reais
pub const MIN_AMOUNT: f64 = 10.0;

const MSG_VALID: &str = "Válido";
const MSG_REQUIRED: &str = "Campo obrigatório";

/// Known Brazilian cities, lower case
const KNOWN_CITIES: &[&str] = &[
    "são paulo",
    "rio de janeiro",
    "belo horizonte",
    "salvador",
    "brasília",
    "fortaleza",
    "manaus",
    "curitiba",
    "recife",
    "goiânia",
    "belém",
    "porto alegre",
    "guarulhos",
    "campinas",
    "nova iguaçu",
    "maceió",
    "são bernardo do campo",
    "santo andré",
    "osasco",
    "joão pessoa",
    "jaboatão dos guararapes",
    "contagem",
    "são josé dos campos",
    "uberlândia",
    "sorocaba",
    "cuiabá",
    "aracaju",
    "feira de santana",
    "joinville",
    "juiz de fora",
    "londrina",
    "aparecida de goiânia",
    "niterói",
    "ananindeua",
    "porto velho",
    "serra",
    "pelotas",
    "caxias do sul",
    "santos",
    "vitória",
    "florianópolis",
];

/// Words that make a string look like a street address
const STREET_KEYWORDS: &[&str] = &[
    "rua",
    "avenida",
    "av",
    "r.",
    "travessa",
    "alameda",
    "estrada",
    "rodovia",
    "praça",
    "largo",
    "quadra",
    "bloco",
    "numero",
    "nº",
    "n°",
    "centro",
    "vila",
    "jardim",
    "bairro",
    "conjunto",
    "residencial",
];

static CITY_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-ZÀ-ÿ\s,.\-]+$").expect("valid regex"));
static VOWEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[aeiouAEIOUÀ-ÿ]").expect("valid regex"));
static STATE_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",\s*[a-zA-Z]{2}$").expect("valid regex"));
static LETTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[a-zA-ZÀ-ÿ]").expect("valid regex"));
static ASCII_LETTERS_ONLY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z]+$").expect("valid regex"));
static CONSONANT_RUN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[bcdfghjklmnpqrstvwxyzBCDFGHJKLMNPQRSTVWXYZ]{4,}").expect("valid regex")
});

/// Semantic kind of a validated field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    City,
    Address,
    Date,
    Amount,
}

impl FieldKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::City => "cidade",
            FieldKind::Address => "endereco",
            FieldKind::Date => "data",
            FieldKind::Amount => "valor",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cidade" | "city" => Ok(FieldKind::City),
            "endereco" | "endereço" | "address" => Ok(FieldKind::Address),
            "data" | "date" => Ok(FieldKind::Date),
            "valor" | "amount" => Ok(FieldKind::Amount),
            other => Err(format!("unknown field kind: {}", other)),
        }
    }
}

/// Outcome of validating one field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Validation {
    pub is_valid: bool,
    pub message: &'static str,
}

impl Validation {
    fn valid() -> Self {
        Self {
            is_valid: true,
            message: MSG_VALID,
        }
    }

    fn invalid(message: &'static str) -> Self {
        Self {
            is_valid: false,
            message,
        }
    }

    /// Result for a field kind nobody knows how to check.
    pub fn unclassified() -> Self {
        Self::invalid("")
    }
}

/// Validate against today's local date.
pub fn validate(value: &str, kind: FieldKind) -> Validation {
    validate_on(value, kind, Local::now().date_naive())
}

/// Validate using a field kind given by name (`cidade`, `address`, ...).
/// Unknown names yield [`Validation::unclassified`].
pub fn validate_named(value: &str, kind: &str) -> Validation {
    match kind.parse::<FieldKind>() {
        Ok(kind) => validate(value, kind),
        Err(_) => Validation::unclassified(),
    }
}

/// Validate with an explicit reference date for the `Date` kind.
pub fn validate_on(value: &str, kind: FieldKind, today: NaiveDate) -> Validation {
    if value.trim().is_empty() {
        return Validation::invalid(MSG_REQUIRED);
    }

    match kind {
        FieldKind::City => check_city(value),
        FieldKind::Address => check_address(value),
        FieldKind::Date => check_date(value, today),
        FieldKind::Amount => check_amount(value),
    }
}

fn check_city(value: &str) -> Validation {
    if value.chars().count() < 3 {
        return Validation::invalid("Digite pelo menos 3 caracteres");
    }
    if !CITY_CHARS.is_match(value) {
        return Validation::invalid("Formato inválido para cidade");
    }
    if is_single_char_repeated(&strip_whitespace(value), 3) {
        return Validation::invalid("Nome de cidade inválido");
    }
    if !VOWEL.is_match(value) {
        return Validation::invalid("Nome de cidade inválido");
    }

    let lower = value.to_lowercase();
    let known = KNOWN_CITIES
        .iter()
        .any(|city| lower.contains(city) || city.contains(lower.as_str()));
    if !known && !STATE_SUFFIX.is_match(value) {
        return Validation::invalid("Digite uma cidade válida (ex: São Paulo, SP)");
    }

    Validation::valid()
}

fn check_address(value: &str) -> Validation {
    let len = value.chars().count();
    if len < 5 {
        return Validation::invalid("Endereço muito curto");
    }
    if !LETTER.is_match(value) {
        return Validation::invalid("Endereço deve conter letras");
    }

    let stripped = strip_whitespace(value);
    if is_single_char_repeated(&stripped, 5) {
        return Validation::invalid("Endereço inválido");
    }
    if ASCII_LETTERS_ONLY.is_match(&stripped) && len < 10 {
        return Validation::invalid("Digite um endereço válido");
    }

    let lower = value.to_lowercase();
    let has_digit = value.chars().any(|c| c.is_ascii_digit());
    let has_keyword = STREET_KEYWORDS.iter().any(|word| lower.contains(word));
    let has_separator = value.contains(',') || value.contains('.');
    if !has_digit && !has_keyword && !has_separator {
        return Validation::invalid("Digite um endereço completo");
    }

    if has_letter_run(&stripped, 3) || CONSONANT_RUN.is_match(&stripped) {
        return Validation::invalid("Endereço inválido");
    }

    Validation::valid()
}

/// Today or later. Text that does not parse as a date is rejected as
/// "Data inválida"; the web form let it through because its comparison
/// against today was false for an invalid date.
fn check_date(value: &str, today: NaiveDate) -> Validation {
    let Some(date) = parse_date(value) else {
        return Validation::invalid("Data inválida");
    };
    if date < today {
        return Validation::invalid("Data não pode ser no passado");
    }
    Validation::valid()
}

fn check_amount(value: &str) -> Validation {
    match parse_amount(value) {
        Some(amount) if amount > 0.0 => {
            if amount < MIN_AMOUNT {
                Validation::invalid("Valor mínimo R$ 10,00")
            } else {
                Validation::valid()
            }
        }
        _ => Validation::invalid("Valor inválido"),
    }
}

/// Parse a calendar date in `YYYY-MM-DD` (optionally with a time part) or
/// `DD/MM/YYYY` form.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(value, "%d/%m/%Y"))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M")
                .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S"))
                .ok()
                .map(|dt| dt.date())
        })
}

/// Parse a money string such as `R$ 1.500,00`.
///
/// Everything except digits and commas is dropped, the first comma becomes
/// the decimal point, and the longest numeric prefix is read. Thousands
/// separators (`.`) therefore vanish rather than being taken as decimals.
pub fn parse_amount(value: &str) -> Option<f64> {
    let cleaned: String = value
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',')
        .collect();
    let normalized = cleaned.replacen(',', ".", 1);

    let mut end = 0;
    let mut seen_digit = false;
    for (i, c) in normalized.char_indices() {
        if c.is_ascii_digit() {
            seen_digit = true;
            end = i + 1;
        } else if c != '.' {
            break;
        }
    }
    if !seen_digit {
        return None;
    }

    let number = &normalized[..end];
    if number.starts_with('.') {
        format!("0{}", number).parse().ok()
    } else {
        number.parse().ok()
    }
}

fn strip_whitespace(value: &str) -> String {
    value.chars().filter(|c| !c.is_whitespace()).collect()
}

/// True if `s` is a single character repeated at least `min` times.
fn is_single_char_repeated(s: &str, min: usize) -> bool {
    let mut chars = s.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    chars.all(|c| c == first) && s.chars().count() >= min
}

/// True if some ASCII letter appears `min` or more times in a row,
/// ignoring case.
fn has_letter_run(s: &str, min: usize) -> bool {
    let mut run = 0;
    let mut prev: Option<char> = None;
    for c in s.chars() {
        if c.is_ascii_alphabetic() {
            match prev {
                Some(p) if p.eq_ignore_ascii_case(&c) => run += 1,
                _ => run = 1,
            }
            if run >= min {
                return true;
            }
            prev = Some(c);
        } else {
            run = 0;
            prev = None;
        }
    }
    false
}
