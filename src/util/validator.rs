use error_stack::Report;
use thiserror::Error;
use validator::ValidateError;

#[derive(Debug, Error)]
#[error("Invalid given data occurred")]
pub struct Wrapper;

/// Turns every validation message into a printable attachment so
/// that a rejected configuration explains itself in the logs.
pub trait IntoValidatorReport<T> {
    fn into_validator_report(self) -> error_stack::Result<T, Wrapper>;
}

impl<T> IntoValidatorReport<T> for Result<T, ValidateError> {
    fn into_validator_report(self) -> error_stack::Result<T, Wrapper> {
        self.map_err(|error| {
            let mut report = Report::new(Wrapper);
            for message in error.form_errors() {
                report = report.attach_printable(message.to_string());
            }
            for (field, messages) in error.field_errors() {
                for message in messages {
                    report = report.attach_printable(format!("{field}: {message}"));
                }
            }
            report
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attaches_every_message() {
        let mut error = ValidateError::builder();
        error.field("db.url", "Invalid SQLite connection URL");
        error.form("Configuration is incomplete");

        let report = Err::<(), _>(error.build())
            .into_validator_report()
            .unwrap_err();

        let printed = format!("{report:?}");
        assert!(printed.contains("db.url: Invalid SQLite connection URL"));
        assert!(printed.contains("Configuration is incomplete"));
    }
}
