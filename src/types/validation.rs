use chrono::{DateTime, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
  #[allow(clippy::expect_used)]
  Regex::new(r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9-]+(?:\.[a-zA-Z0-9-]+)+$")
    .expect("compile email regex")
});

pub const EMAIL_MAX: usize = 254;

pub const PASSWORD_MIN: usize = 8;
pub const PASSWORD_MAX: usize = 128;

pub const NAME_MAX: usize = 150;
pub const RG_MAX: usize = 20;
pub const SERVICE_MAX: usize = 80;
pub const SERVICES_MAX: usize = 20;

/// Email address with a dotted domain name. Host names in IP address
/// form are not accepted.
pub fn is_valid_email(email: &str) -> bool {
  email.len() <= EMAIL_MAX && EMAIL_REGEX.is_match(email)
}

/// At least [`PASSWORD_MIN`] characters with a letter and a digit.
pub fn is_strong_password(password: &str) -> bool {
  let length = password.chars().count();
  (PASSWORD_MIN..=PASSWORD_MAX).contains(&length)
    && password.chars().any(|c| c.is_ascii_alphabetic())
    && password.chars().any(|c| c.is_ascii_digit())
}

/// Parses a calendar date sent by a form, either `YYYY-MM-DD` or a
/// full RFC 3339 timestamp (date part kept).
pub fn parse_date(value: &str) -> Option<NaiveDate> {
  let value = value.trim();
  NaiveDate::parse_from_str(value, "%Y-%m-%d")
    .ok()
    .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.date_naive()))
}

pub fn is_valid_date(value: &str) -> bool {
  parse_date(value).is_some()
}

/// Checks that an uploaded document is a base64 `data:` URL holding
/// a PDF or an image.
pub fn is_valid_document(value: &str) -> bool {
  let Some(rest) = value.strip_prefix("data:") else {
    return false;
  };
  let Some((header, payload)) = rest.split_once(',') else {
    return false;
  };
  let Some(media_type) = header.strip_suffix(";base64") else {
    return false;
  };
  let Ok(media_type) = media_type.parse::<mime::Mime>() else {
    return false;
  };

  let accepted = media_type.type_() == mime::IMAGE
    || (media_type.type_() == mime::APPLICATION && media_type.subtype() == mime::PDF);

  accepted && !payload.is_empty()
}

/// Trims a free-text value, treating blank strings as absent.
pub fn trimmed(value: Option<&str>) -> Option<String> {
  value
    .map(str::trim)
    .filter(|v| !v.is_empty())
    .map(ToString::to_string)
}

pub fn normalize_email(value: &str) -> String {
  value.trim().to_lowercase()
}

/// Trims every service name, drops blank ones and keeps only the
/// first occurrence of each.
pub fn normalize_services(services: &[String]) -> Vec<String> {
  let mut normalized: Vec<String> = Vec::with_capacity(services.len());
  for service in services.iter().map(|s| s.trim()).filter(|s| !s.is_empty()) {
    if !normalized.iter().any(|s| s == service) {
      normalized.push(service.to_string());
    }
  }
  normalized
}
