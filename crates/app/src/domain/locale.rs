//! Locale resolution from a tenant's IANA timezone.
//!
//! Exactly two locales are supported. Brazilian timezones map to `pt-BR`,
//! every other non-empty value maps to `en-US`, and a missing or blank
//! timezone falls back to `pt-BR`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// IANA identifiers for every timezone observed in Brazil.
pub const BRAZILIAN_TIMEZONES: [&str; 16] = [
    "America/Araguaina",
    "America/Bahia",
    "America/Belem",
    "America/Boa_Vista",
    "America/Campo_Grande",
    "America/Cuiaba",
    "America/Eirunepe",
    "America/Fortaleza",
    "America/Maceio",
    "America/Manaus",
    "America/Noronha",
    "America/Porto_Velho",
    "America/Recife",
    "America/Rio_Branco",
    "America/Santarem",
    "America/Sao_Paulo",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Locale {
    #[default]
    #[serde(rename = "pt-BR")]
    PtBr,

    #[serde(rename = "en-US")]
    EnUs,
}

impl Locale {
    /// Map a timezone to a locale. Total: unknown input degrades to `en-US`.
    #[must_use]
    pub fn resolve(timezone: Option<&str>) -> Self {
        let Some(timezone) = timezone.map(str::trim).filter(|value| !value.is_empty()) else {
            return Self::default();
        };

        if BRAZILIAN_TIMEZONES.contains(&timezone) {
            Self::PtBr
        } else {
            Self::EnUs
        }
    }

    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::PtBr => "pt-BR",
            Self::EnUs => "en-US",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}
