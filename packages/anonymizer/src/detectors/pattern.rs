//! Regex-based detection of structured PII.
//!
//! Catches emails, phone numbers, SSNs, credit cards (Luhn-checked) and IP
//! addresses without any model. Each kind answers to a label name; a request
//! for `["EMAIL", "person"]` makes this detector report emails under the
//! label `EMAIL` and ignore `person`, which it cannot detect.

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::BoxError;
use crate::traits::detector::EntityModel;
use crate::types::entity::DetectedSpan;

/// Score reported for every pattern match.
pub const PATTERN_SCORE: f32 = 1.0;

/// Kind of structured PII a pattern finds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternKind {
    Email,
    Phone,
    Ssn,
    CreditCard,
    IpAddress,
}

impl PatternKind {
    pub const ALL: [PatternKind; 5] = [
        PatternKind::Email,
        PatternKind::Phone,
        PatternKind::Ssn,
        PatternKind::CreditCard,
        PatternKind::IpAddress,
    ];

    /// Canonical label name.
    pub fn name(&self) -> &'static str {
        match self {
            PatternKind::Email => "email",
            PatternKind::Phone => "phone",
            PatternKind::Ssn => "ssn",
            PatternKind::CreditCard => "credit_card",
            PatternKind::IpAddress => "ip_address",
        }
    }

    /// Resolve a requested label, ignoring case and `-`/space/`_` spelling.
    pub fn from_label(label: &str) -> Option<Self> {
        let key: String = label
            .trim()
            .to_lowercase()
            .chars()
            .map(|c| if c == '-' || c == ' ' { '_' } else { c })
            .collect();

        match key.as_str() {
            "email" | "email_address" => Some(PatternKind::Email),
            "phone" | "phone_number" => Some(PatternKind::Phone),
            "ssn" | "social_security_number" => Some(PatternKind::Ssn),
            "credit_card" | "credit_card_number" => Some(PatternKind::CreditCard),
            "ip_address" | "ip" => Some(PatternKind::IpAddress),
            _ => None,
        }
    }
}

lazy_static! {
    // Email pattern - RFC 5322 simplified
    static ref EMAIL_REGEX: Regex = Regex::new(
        r"(?i)\b[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}\b"
    ).unwrap();

    // Phone patterns - US and international
    static ref PHONE_REGEX: Regex = Regex::new(
        r"(?:\+?1[-.\s]?)?\(?([0-9]{3})\)?[-.\s]?([0-9]{3})[-.\s]?([0-9]{4})"
    ).unwrap();

    // Social Security Number - XXX-XX-XXXX
    static ref SSN_REGEX: Regex = Regex::new(
        r"\b\d{3}-\d{2}-\d{4}\b"
    ).unwrap();

    // Credit card numbers - various formats (Visa, MC, Amex, Discover)
    static ref CREDIT_CARD_REGEX: Regex = Regex::new(
        r"\b(?:\d{4}[-\s]?){3}\d{4}\b|\b\d{4}[-\s]?\d{6}[-\s]?\d{5}\b"
    ).unwrap();

    // IPv4 addresses
    static ref IPV4_REGEX: Regex = Regex::new(
        r"\b(?:(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\.){3}(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\b"
    ).unwrap();

    // IPv6 addresses (simplified)
    static ref IPV6_REGEX: Regex = Regex::new(
        r"\b(?:[0-9a-fA-F]{1,4}:){7}[0-9a-fA-F]{1,4}\b"
    ).unwrap();
}

/// Model-free detector for structured PII.
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternDetector;

impl PatternDetector {
    pub fn new() -> Self {
        Self
    }

    /// Byte ranges of every match of `kind` in `text`.
    pub fn find(&self, text: &str, kind: PatternKind) -> Vec<(usize, usize)> {
        match kind {
            PatternKind::Email => ranges(&EMAIL_REGEX, text, |_| true),
            PatternKind::Phone => ranges(&PHONE_REGEX, text, |_| true),
            PatternKind::Ssn => ranges(&SSN_REGEX, text, |_| true),
            PatternKind::CreditCard => ranges(&CREDIT_CARD_REGEX, text, |card| {
                is_valid_luhn(&card.replace(['-', ' '], ""))
            }),
            PatternKind::IpAddress => {
                let mut found = ranges(&IPV4_REGEX, text, |ip| !is_likely_version_number(ip));
                found.extend(ranges(&IPV6_REGEX, text, |_| true));
                found
            }
        }
    }
}

impl EntityModel for PatternDetector {
    fn predict_entities(
        &self,
        text: &str,
        labels: &[String],
        threshold: f32,
    ) -> Result<Vec<DetectedSpan>, BoxError> {
        if PATTERN_SCORE < threshold {
            return Ok(vec![]);
        }

        let mut spans = Vec::new();
        for label in labels {
            let Some(kind) = PatternKind::from_label(label) else {
                continue;
            };
            spans.extend(
                self.find(text, kind)
                    .into_iter()
                    .map(|(start, end)| DetectedSpan::new(start, end, label.clone(), PATTERN_SCORE)),
            );
        }
        Ok(spans)
    }
}

fn ranges(regex: &Regex, text: &str, keep: impl Fn(&str) -> bool) -> Vec<(usize, usize)> {
    regex
        .find_iter(text)
        .filter(|m| keep(m.as_str()))
        .map(|m| (m.start(), m.end()))
        .collect()
}

/// Luhn algorithm for credit card validation
fn is_valid_luhn(card_number: &str) -> bool {
    let digits: Vec<u32> = card_number.chars().filter_map(|c| c.to_digit(10)).collect();

    if digits.len() < 13 || digits.len() > 19 {
        return false;
    }

    let checksum: u32 = digits
        .iter()
        .rev()
        .enumerate()
        .map(|(idx, &digit)| {
            if idx % 2 == 1 {
                let doubled = digit * 2;
                if doubled > 9 {
                    doubled - 9
                } else {
                    doubled
                }
            } else {
                digit
            }
        })
        .sum();

    checksum % 10 == 0
}

/// Check if an IP-like string is likely a version number
fn is_likely_version_number(ip_str: &str) -> bool {
    let parts: Vec<&str> = ip_str.split('.').collect();
    if parts.len() != 4 {
        return false;
    }

    // Version numbers often have 0 in first or last position, or several zeros
    let has_leading_zero = parts[0] == "0";
    let has_trailing_zero = parts[3] == "0";
    let zero_count = parts.iter().filter(|&&p| p == "0").count();

    has_leading_zero || has_trailing_zero || zero_count >= 2
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_reports_under_requested_label() {
        let text = "Write to john@example.com today";
        let spans = PatternDetector
            .predict_entities(text, &labels(&["EMAIL", "PERSON"]), 0.5)
            .unwrap();

        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].label, "EMAIL");
        assert_eq!(&text[spans[0].start..spans[0].end], "john@example.com");
        assert_eq!(spans[0].score, 1.0);
    }

    #[test]
    fn test_unknown_labels_yield_nothing() {
        let spans = PatternDetector
            .predict_entities("john@example.com", &labels(&["person"]), 0.5)
            .unwrap();
        assert!(spans.is_empty());
    }

    #[test]
    fn test_label_aliases() {
        assert_eq!(PatternKind::from_label("Phone Number"), Some(PatternKind::Phone));
        assert_eq!(PatternKind::from_label("credit-card"), Some(PatternKind::CreditCard));
        assert_eq!(PatternKind::from_label("IP"), Some(PatternKind::IpAddress));
        assert_eq!(PatternKind::from_label("location"), None);
        for kind in PatternKind::ALL {
            assert_eq!(PatternKind::from_label(kind.name()), Some(kind));
        }
    }

    #[test]
    fn test_credit_card_requires_luhn() {
        let valid = PatternDetector.find("card 4111-1111-1111-1111", PatternKind::CreditCard);
        let invalid = PatternDetector.find("card 1234-5678-9012-3456", PatternKind::CreditCard);

        assert_eq!(valid.len(), 1);
        assert!(invalid.is_empty());
    }

    #[test]
    fn test_version_numbers_are_not_ips() {
        assert!(PatternDetector.find("version 1.0.0.0", PatternKind::IpAddress).is_empty());
        assert_eq!(
            PatternDetector.find("from 192.168.1.100", PatternKind::IpAddress),
            vec![(5, 18)]
        );
    }

    #[test]
    fn test_ssn_and_phone() {
        let text = "SSN 123-45-6789, call (555) 123-4567";
        assert_eq!(PatternDetector.find(text, PatternKind::Ssn), vec![(4, 15)]);
        assert_eq!(PatternDetector.find(text, PatternKind::Phone).len(), 1);
    }
}
