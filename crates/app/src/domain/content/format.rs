//! Display formatting shared by content packages and emails.

use jiff::civil::Date;

use crate::domain::locale::Locale;

const PT_BR_MONTHS: [&str; 12] = [
    "jan.", "fev.", "mar.", "abr.", "mai.", "jun.", "jul.", "ago.", "set.", "out.", "nov.", "dez.",
];

const EN_US_MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Format minor currency units as `$<units>.<cents>`.
///
/// The symbol and separators are fixed regardless of locale.
#[must_use]
pub fn format_currency(minor_units: u64) -> String {
    format!("${}.{:02}", minor_units / 100, minor_units % 100)
}

/// Format a calendar date in the locale's short month form.
#[must_use]
pub fn format_date(date: Date, locale: Locale) -> String {
    match locale {
        Locale::PtBr => format!(
            "{} de {} de {}",
            date.day(),
            month_name(&PT_BR_MONTHS, date),
            date.year()
        ),
        Locale::EnUs => format!(
            "{} {}, {}",
            month_name(&EN_US_MONTHS, date),
            date.day(),
            date.year()
        ),
    }
}

fn month_name(names: &[&'static str; 12], date: Date) -> &'static str {
    usize::try_from(date.month() - 1)
        .ok()
        .and_then(|index| names.get(index))
        .copied()
        .unwrap_or_default()
}
