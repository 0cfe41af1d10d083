use url::Url;

#[must_use]
pub fn validate_url(url: &str) -> bool {
  Url::parse(url).is_ok()
}

#[cfg(test)]
mod tests {
  use super::validate_url;

  #[test]
  fn sqlite_urls() {
    assert!(validate_url("sqlite://obraconecta.db"));
    assert!(validate_url("sqlite::memory:"));
    assert!(!validate_url("obraconecta.db"));
  }
}
