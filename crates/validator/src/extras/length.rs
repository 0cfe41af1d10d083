use crate::HasLength;

#[must_use]
pub fn validate_length<T: HasLength + ?Sized>(
  value: &T,
  min: Option<usize>,
  max: Option<usize>,
) -> bool {
  let length = value.length();
  if min.is_some_and(|min| length < min) {
    return false;
  }
  if max.is_some_and(|max| length > max) {
    return false;
  }
  true
}

#[cfg(test)]
mod tests {
  use super::validate_length;

  #[test]
  fn bounds_are_inclusive() {
    assert!(validate_length("12345678", Some(8), Some(8)));
    assert!(!validate_length("1234567", Some(8), None));
    assert!(!validate_length("123456789", None, Some(8)));
    assert!(validate_length("", None, None));
  }
}
