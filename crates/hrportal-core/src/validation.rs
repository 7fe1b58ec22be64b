//! Form input checks.
//!
//! Login fields are checked before anything reaches the session store. The
//! profile helpers cover the UK-specific employee fields: bank details,
//! National Insurance number, part-time hours and passport expiry.

use chrono::{Months, NaiveDate};
use regex::Regex;
use thiserror::Error;

/// Length of a one-time code.
pub const CODE_LENGTH: usize = 6;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("Email is required")]
    EmailRequired,

    #[error("Invalid email address")]
    InvalidEmail,

    #[error("OTP is required")]
    CodeRequired,

    #[error("OTP must contain only digits")]
    CodeNotNumeric,

    #[error("OTP must be exactly 6 digits")]
    CodeLength,

    #[error("Account number must be 8 digits")]
    AccountNumber,

    #[error("Sort code must be in the format XX-XX-XX")]
    SortCode,

    #[error("Invalid National Insurance Number format (e.g., QQ123456C)")]
    NiNumber,

    #[error("Hours must be between 1 and 40")]
    HoursPerWeek,

    #[error("Passport has expired. Please update with a valid passport.")]
    PassportExpired,

    #[error("Between 1 and 5 passports are allowed")]
    PassportCount,
}

/// Weeks of statutory leave a full-time week of hours buys.
pub const LEAVE_WEEKS_PER_YEAR: f64 = 5.6;

/// Hours-per-week bounds for part-time employees.
pub const MIN_PART_TIME_HOURS: u32 = 1;
pub const MAX_PART_TIME_HOURS: u32 = 40;

pub const MAX_PASSPORTS: usize = 5;

/// Prefix letters exclude D, F, I, Q, U, V; the second letter also excludes O.
const NI_NUMBER_PATTERN: &str = r"^[A-CEGHJ-PR-TW-Z][A-CEGHJ-NPR-TW-Z][0-9]{6}[A-D]$";

/// Accepts `local@domain.tld` shapes: one `@`, no whitespace, and a domain
/// made of at least two non-empty dot-separated labels.
pub fn validate_email(email: &str) -> Result<(), InputError> {
    if email.is_empty() {
        return Err(InputError::EmailRequired);
    }
    if email.chars().any(char::is_whitespace) {
        return Err(InputError::InvalidEmail);
    }

    let Some((local, domain)) = email.split_once('@') else {
        return Err(InputError::InvalidEmail);
    };
    if local.is_empty() || domain.contains('@') {
        return Err(InputError::InvalidEmail);
    }

    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 || labels.iter().any(|l| l.is_empty()) {
        return Err(InputError::InvalidEmail);
    }
    Ok(())
}

pub fn validate_code(code: &str) -> Result<(), InputError> {
    if code.is_empty() {
        return Err(InputError::CodeRequired);
    }
    if !code.chars().all(|c| c.is_ascii_digit()) {
        return Err(InputError::CodeNotNumeric);
    }
    if code.len() != CODE_LENGTH {
        return Err(InputError::CodeLength);
    }
    Ok(())
}

fn is_match(pattern: &str, value: &str) -> bool {
    Regex::new(pattern).is_ok_and(|re| re.is_match(value))
}

/// UK bank account numbers are exactly eight digits.
pub fn validate_account_number(account: &str) -> Result<(), InputError> {
    if is_match(r"^\d{8}$", account) && account.is_ascii() {
        Ok(())
    } else {
        Err(InputError::AccountNumber)
    }
}

pub fn validate_sort_code(sort_code: &str) -> Result<(), InputError> {
    if is_match(r"^\d{2}-\d{2}-\d{2}$", sort_code) && sort_code.is_ascii() {
        Ok(())
    } else {
        Err(InputError::SortCode)
    }
}

/// Reformat partial sort code input as `XX-XX-XX` while it is being typed.
///
/// Non-digits are dropped and anything past six digits is cut off, so
/// `"123456"` becomes `"12-34-56"` and `"123"` becomes `"12-3"`.
pub fn format_sort_code(input: &str) -> String {
    let digits: Vec<char> = input.chars().filter(char::is_ascii_digit).take(6).collect();
    digits
        .chunks(2)
        .map(|pair| pair.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join("-")
}

pub fn validate_ni_number(ni_number: &str) -> Result<(), InputError> {
    if is_match(NI_NUMBER_PATTERN, ni_number) {
        Ok(())
    } else {
        Err(InputError::NiNumber)
    }
}

pub fn validate_part_time_hours(hours: u32) -> Result<(), InputError> {
    if (MIN_PART_TIME_HOURS..=MAX_PART_TIME_HOURS).contains(&hours) {
        Ok(())
    } else {
        Err(InputError::HoursPerWeek)
    }
}

/// Annual leave entitlement in hours for a part-time week.
pub fn pro_rata_leave_hours(hours_per_week: u32) -> f64 {
    f64::from(hours_per_week) * LEAVE_WEEKS_PER_YEAR
}

/// Where a passport stands relative to today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassportStatus {
    Valid,
    /// Expires within the next twelve months.
    ExpiringSoon,
    Expired,
}

/// A passport is expired on its expiry date.
pub fn passport_status(expiry: NaiveDate, today: NaiveDate) -> PassportStatus {
    if expiry <= today {
        return PassportStatus::Expired;
    }
    match today.checked_add_months(Months::new(12)) {
        Some(year_out) if expiry > year_out => PassportStatus::Valid,
        _ => PassportStatus::ExpiringSoon,
    }
}

pub fn validate_passport_expiry(expiry: NaiveDate, today: NaiveDate) -> Result<(), InputError> {
    match passport_status(expiry, today) {
        PassportStatus::Expired => Err(InputError::PassportExpired),
        _ => Ok(()),
    }
}

/// Employees keep between one and `MAX_PASSPORTS` passports on file.
pub fn validate_passport_count(count: usize) -> Result<(), InputError> {
    if (1..=MAX_PASSPORTS).contains(&count) {
        Ok(())
    } else {
        Err(InputError::PassportCount)
    }
}
