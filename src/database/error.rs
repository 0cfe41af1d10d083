use error_stack::Report;
use sqlx::error::ErrorKind;
use thiserror::Error;

/// Database related errors
#[derive(Debug, Error)]
pub enum Error {
  /// The configured SQLite connection URL could not be parsed.
  #[error("invalid connection url")]
  InvalidUrl,
  /// An error caused by an [`sqlx`] error.
  #[error("received a pool error: {0}")]
  Internal(sqlx::Error),
  /// The database was opened in read-only mode and should not
  /// perform any writes.
  #[error("database is currently in read mode")]
  Readonly,
  /// The pool has no reliable connection to the database.
  #[error("unhealthy database pool")]
  UnhealthyPool,
  /// A write collided with a unique index. Holds the column name.
  #[error("unique constraint failed on {0:?}")]
  UniqueViolation(String),
}

/// Converts from a generic [sqlx] result into a [database compatible error](Error).
pub trait ErrorExt<T> {
  fn into_db_error(self) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, sqlx::Error> {
  fn into_db_error(self) -> Result<T> {
    self.map_err(classify)
  }
}

fn classify(error: sqlx::Error) -> Report<Error> {
  let context = match &error {
    sqlx::Error::Database(e) if e.message().contains("readonly database") => Error::Readonly,
    sqlx::Error::Database(e) if matches!(e.kind(), ErrorKind::UniqueViolation) => {
      Error::UniqueViolation(violated_column(e.message()).unwrap_or_default().to_string())
    },
    _ => return Report::new(Error::Internal(error)),
  };
  Report::new(error).change_context(context)
}

/// Picks the column out of `UNIQUE constraint failed: users.email`.
fn violated_column(message: &str) -> Option<&str> {
  let (_, columns) = message.split_once("failed: ")?;
  let first = columns.split(',').next()?.trim();
  Some(first.rsplit_once('.').map_or(first, |(_, column)| column))
}

/// Lazily typed [`std::result::Result`] but the error generic
/// is filled up with [a database error](Error).
pub type Result<T> = error_stack::Result<T, Error>;

/// Looks through a report for a specific [`Error`] variant, since it
/// may not be the current context.
pub trait ReportExt {
  fn is_unhealthy(&self) -> bool;
  fn is_readonly(&self) -> bool;
  fn unique_violation(&self) -> Option<&str>;
}

impl<C> ReportExt for Report<C> {
  fn is_unhealthy(&self) -> bool {
    self
      .downcast_ref::<Error>()
      .is_some_and(|v| matches!(v, Error::UnhealthyPool))
  }

  fn is_readonly(&self) -> bool {
    self
      .downcast_ref::<Error>()
      .is_some_and(|v| matches!(v, Error::Readonly))
  }

  fn unique_violation(&self) -> Option<&str> {
    match self.downcast_ref::<Error>() {
      Some(Error::UniqueViolation(column)) => Some(column.as_str()),
      _ => None,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_violated_column() {
    assert_eq!(
      violated_column("UNIQUE constraint failed: users.email"),
      Some("email")
    );
    assert_eq!(
      violated_column("UNIQUE constraint failed: users.cpf, users.cnpj"),
      Some("cpf")
    );
    assert_eq!(violated_column("no such table: users"), None);
  }

  #[test]
  fn report_lookups() {
    let report = Report::new(Error::UniqueViolation("cnpj".into()));
    assert_eq!(report.unique_violation(), Some("cnpj"));
    assert!(!report.is_readonly());

    #[derive(Debug, Error)]
    #[error("outer")]
    struct Outer;

    let report = Report::new(Error::Readonly).change_context(Outer);
    assert!(report.is_readonly());
    assert!(!report.is_unhealthy());
  }
}
