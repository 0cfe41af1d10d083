use crate::{HasLength, Validate, ValidateError};
use std::borrow::Cow;

impl HasLength for str {
  fn length(&self) -> usize {
    self.chars().count()
  }
}

impl HasLength for String {
  fn length(&self) -> usize {
    self.as_str().length()
  }
}

impl<'a> HasLength for Cow<'a, str> {
  fn length(&self) -> usize {
    self.as_ref().length()
  }
}

impl<'a, T: HasLength + ?Sized> HasLength for &'a T {
  fn length(&self) -> usize {
    T::length(self)
  }
}

impl<T> HasLength for [T] {
  fn length(&self) -> usize {
    self.len()
  }
}

impl<T> HasLength for Vec<T> {
  fn length(&self) -> usize {
    self.len()
  }
}

// ------------------------------------------------ //

impl<T: Validate> Validate for Option<T> {
  fn validate(&self) -> Result<(), ValidateError> {
    match self {
      Some(inner) => inner.validate(),
      None => Ok(()),
    }
  }
}

impl<T: Validate> Validate for Box<T> {
  fn validate(&self) -> Result<(), ValidateError> {
    T::validate(self)
  }
}

impl<'a, T: Validate> Validate for &'a T {
  fn validate(&self) -> Result<(), ValidateError> {
    T::validate(self)
  }
}

#[cfg(test)]
mod tests {
  use crate::HasLength;

  #[test]
  fn strings_are_measured_in_chars() {
    assert_eq!("Construção".length(), 10);
    assert_eq!(String::from("abc").length(), 3);
    assert_eq!(vec![1, 2].length(), 2);
  }
}
