//! PII redaction.
//!
//! Emails, phone numbers, Nordic national ID numbers and Luhn-valid payment
//! card numbers are replaced with fixed placeholder tokens, in that order.
//! Redaction is pure and total: non-PII text comes back unchanged.

use regex::{Captures, Regex};
use std::sync::LazyLock;

pub const EMAIL_TOKEN: &str = "[EMAIL]";
pub const PHONE_TOKEN: &str = "[PHONE]";
pub const SSN_TOKEN: &str = "[SSN]";
pub const CARD_TOKEN: &str = "[CARD]";

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"[^<>()\[\]\\.,;:\s@"]+(?:\.[^<>()\[\]\\.,;:\s@"]+)*@(?:[a-zA-Z0-9\-]+\.)+[a-zA-Z]{2,}"#,
    )
    .expect("email pattern is valid")
});

// Candidates must start with an international "+" or a national trunk "0".
static PHONE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\+|\b0)\d[\d \-]{5,14}\d\b").expect("phone pattern is valid")
});

// Separated birth-date IDs: DDMMYY-XXXX, YYMMDD-XXXX or YYYYMMDD-XXXX.
static NATIONAL_ID_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\d{6}|\d{8})[-+]\d{4}$").expect("national id pattern is valid")
});

// YYMMDD / YYYYMMDD birth date, optional separator, four-digit suffix.
static SSN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d{6,8}[-+]?\d{4}\b").expect("ssn pattern is valid"));

static CARD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:\d[ -]*?){13,16}\b").expect("card pattern is valid"));

/// Replace every detected PII span in `text` with its placeholder token.
pub fn anonymize(text: &str) -> String {
    let text = EMAIL.replace_all(text, EMAIL_TOKEN);
    let text = PHONE.replace_all(&text, |caps: &Captures| {
        keep_or_replace(
            &caps[0],
            |m| !is_national_id(m) && is_plausible_phone(m),
            PHONE_TOKEN,
        )
    });
    let text = SSN.replace_all(&text, SSN_TOKEN);
    let text = CARD.replace_all(&text, |caps: &Captures| {
        keep_or_replace(&caps[0], |m| luhn_valid(&digits(m)), CARD_TOKEN)
    });
    text.into_owned()
}

fn keep_or_replace(matched: &str, is_pii: impl Fn(&str) -> bool, token: &str) -> String {
    if is_pii(matched) {
        token.to_string()
    } else {
        matched.to_string()
    }
}

fn digits(text: &str) -> String {
    text.chars().filter(char::is_ascii_digit).collect()
}

/// National ID numbers with a leading zero also fit the phone pattern.
/// These are left for the SSN pass.
fn is_national_id(candidate: &str) -> bool {
    if NATIONAL_ID_SHAPE.is_match(candidate) {
        return true;
    }
    // Norwegian fødselsnummer: DDMMYY followed by five digits
    candidate.len() == 11
        && candidate.bytes().all(|b| b.is_ascii_digit())
        && is_day_month(candidate.as_bytes())
}

/// Whether the first four ASCII digits read as DDMM. Days 41-71 are
/// Norwegian D-numbers.
fn is_day_month(digits: &[u8]) -> bool {
    let pair = |i: usize| u32::from(digits[i] - b'0') * 10 + u32::from(digits[i + 1] - b'0');
    let (day, month) = (pair(0), pair(2));
    ((1..=31).contains(&day) || (41..=71).contains(&day)) && (1..=12).contains(&month)
}

/// Digit-count check on a phone candidate.
///
/// `+CC...` numbers follow E.164 (8-15 digits), `00CC...` is the same with the
/// international prefix, and national numbers with a leading `0` carry 8-11.
fn is_plausible_phone(candidate: &str) -> bool {
    let count = digits(candidate).len();
    if candidate.starts_with('+') {
        (8..=15).contains(&count)
    } else if candidate.starts_with("00") {
        (10..=17).contains(&count)
    } else {
        (8..=11).contains(&count)
    }
}

/// Standard Luhn checksum over an ASCII digit string of 13+ digits.
pub fn luhn_valid(digits: &str) -> bool {
    if digits.len() < 13 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }

    let sum: u32 = digits
        .bytes()
        .rev()
        .enumerate()
        .map(|(i, b)| {
            let d = u32::from(b - b'0');
            if i % 2 == 1 {
                let doubled = d * 2;
                if doubled > 9 {
                    doubled - 9
                } else {
                    doubled
                }
            } else {
                d
            }
        })
        .sum();

    sum % 10 == 0
}
