use serde::de::{Error as DeError, Unexpected};
use std::{
  fmt::{Debug, Display},
  hash::Hash,
  marker::PhantomData,
  num::NonZeroU64,
  str::FromStr,
};
use thiserror::Error;

use self::marker::Marker;

pub mod marker;

/// Row identifier assigned by SQLite (`INTEGER PRIMARY KEY`), typed
/// by what it identifies. Serialized as a decimal string.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Id<T: Marker> {
  value: NonZeroU64,
  phantom: PhantomData<T>,
}

impl<T: Marker> Id<T> {
  /// # Panics
  ///
  /// It will panic if the value is 0.
  #[must_use]
  #[track_caller]
  pub const fn new(n: u64) -> Self {
    if let Some(id) = Self::new_checked(n) {
      id
    } else {
      panic!("value is zero")
    }
  }

  #[must_use]
  pub const fn from_nonzero(n: NonZeroU64) -> Self {
    Self {
      value: n,
      phantom: PhantomData,
    }
  }

  #[must_use]
  pub const fn new_checked(n: u64) -> Option<Self> {
    if let Some(n) = NonZeroU64::new(n) {
      Some(Self::from_nonzero(n))
    } else {
      None
    }
  }

  #[must_use]
  pub const fn get(self) -> u64 {
    self.value.get()
  }

  #[must_use]
  pub const fn cast<M: Marker>(self) -> Id<M> {
    Id {
      value: self.value,
      phantom: PhantomData,
    }
  }
}

impl<T: Marker> Debug for Id<T> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "Id::<{}>({})", T::NAME, self.value.get())
  }
}

impl<T: Marker> Display for Id<T> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    Display::fmt(&self.value.get(), f)
  }
}

impl<T: Marker> Hash for Id<T> {
  fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
    state.write_u64(self.value.get());
  }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid id {0:?}")]
pub struct ParseIdError(String);

impl<T: Marker> FromStr for Id<T> {
  type Err = ParseIdError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    s.parse::<u64>()
      .ok()
      .and_then(Self::new_checked)
      .filter(|id| i64::try_from(id.value.get()).is_ok())
      .ok_or_else(|| ParseIdError(s.to_string()))
  }
}

impl<'de, T: Marker> serde::Deserialize<'de> for Id<T> {
  fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
  where
    D: serde::Deserializer<'de>,
  {
    struct Visitor<T: Marker>(PhantomData<T>);

    impl<'de, T: Marker> serde::de::Visitor<'de> for Visitor<T> {
      type Value = Id<T>;

      fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "a {} id", T::NAME)
      }

      fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
      where
        E: DeError,
      {
        let value = u64::try_from(v)
          .map_err(|_| DeError::invalid_value(Unexpected::Signed(v), &"nonzero u64"))?;

        self.visit_u64(value)
      }

      fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
      where
        E: DeError,
      {
        let value = NonZeroU64::new(v)
          .ok_or_else(|| DeError::invalid_value(Unexpected::Unsigned(v), &"nonzero u64"))?;

        Ok(Id::<T>::from_nonzero(value))
      }

      fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
      where
        E: DeError,
      {
        v.parse()
          .map_err(|_| DeError::invalid_value(Unexpected::Str(v), &"nonzero u64 string"))
      }
    }

    deserializer.deserialize_any(Visitor(PhantomData))
  }
}

impl<T: Marker> serde::Serialize for Id<T> {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: serde::Serializer,
  {
    serializer.collect_str(&self.value.get())
  }
}

impl<'q, T: Marker> sqlx::Encode<'q, sqlx::Sqlite> for Id<T> {
  // ids never exceed i64::MAX, `FromStr` and `decode` reject them
  #[allow(clippy::cast_possible_wrap)]
  fn encode_by_ref(
    &self,
    buf: &mut <sqlx::Sqlite as sqlx::Database>::ArgumentBuffer<'q>,
  ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
    <i64 as sqlx::Encode<'q, sqlx::Sqlite>>::encode_by_ref(&(self.value.get() as i64), buf)
  }
}

impl<'r, T: Marker> sqlx::Decode<'r, sqlx::Sqlite> for Id<T> {
  fn decode(
    value: <sqlx::Sqlite as sqlx::Database>::ValueRef<'r>,
  ) -> Result<Self, sqlx::error::BoxDynError> {
    #[derive(Debug, Error)]
    #[error("all IDs must be positive")]
    struct NonPositiveIdError;

    let value = <i64 as sqlx::Decode<'r, sqlx::Sqlite>>::decode(value)?;
    u64::try_from(value)
      .ok()
      .and_then(Self::new_checked)
      .ok_or_else(|| Box::new(NonPositiveIdError) as sqlx::error::BoxDynError)
  }
}

impl<T: Marker> sqlx::Type<sqlx::Sqlite> for Id<T> {
  fn type_info() -> <sqlx::Sqlite as sqlx::Database>::TypeInfo {
    <i64 as sqlx::Type<sqlx::Sqlite>>::type_info()
  }

  fn compatible(ty: &<sqlx::Sqlite as sqlx::Database>::TypeInfo) -> bool {
    <i64 as sqlx::Type<sqlx::Sqlite>>::compatible(ty)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::types::id::marker::{AnyMarker, UserMarker};
  use serde_test::Token;
  use static_assertions::{assert_eq_size, assert_impl_all};

  assert_eq_size!(Id<AnyMarker>, u64);
  assert_impl_all!(Id<AnyMarker>:
    Debug, Display, Clone, Copy, Send, Sync, Hash, sqlx::Decode<'static, sqlx::Sqlite>,
    sqlx::Encode<'static, sqlx::Sqlite>, sqlx::Type<sqlx::Sqlite>
  );

  #[test]
  #[should_panic]
  fn test_new_with_zero() {
    _ = Id::<AnyMarker>::new(0);
  }

  #[test]
  fn test_initializers() {
    assert!(Id::<AnyMarker>::new_checked(0).is_none());
    assert_eq!(Some(1), Id::<AnyMarker>::new_checked(1).map(Id::get));
  }

  #[test]
  fn test_fmt_impls() {
    let id = Id::<UserMarker>::new(1_234_567_890);
    assert_eq!("1234567890", id.to_string());
    assert_eq!("Id::<UserMarker>(1234567890)", format!("{id:?}"));
  }

  #[test]
  fn test_from_str() {
    assert_eq!(Ok(Id::<UserMarker>::new(42)), "42".parse());
    assert!("0".parse::<Id<UserMarker>>().is_err());
    assert!("-1".parse::<Id<UserMarker>>().is_err());
    assert!("abc".parse::<Id<UserMarker>>().is_err());
    assert!(u64::MAX.to_string().parse::<Id<UserMarker>>().is_err());
  }

  #[test]
  fn test_serde_impl() {
    let id = Id::<AnyMarker>::new(1_234_567_890);
    serde_test::assert_de_tokens(&id, &[Token::U64(1_234_567_890)]);
    serde_test::assert_de_tokens(&id, &[Token::Str("1234567890")]);
    serde_test::assert_de_tokens(&id, &[Token::I64(1_234_567_890)]);
    serde_test::assert_ser_tokens(&id, &[Token::Str("1234567890")]);
  }
}
