mod login;
mod profile;
mod register;
mod update;

pub use login::login;
pub use profile::profile;
pub use register::register;
pub use update::update;

use crate::{
  http::Error,
  types::{
    self,
    id::{marker::UserMarker, Id},
  },
};

/// Unparseable ids are reported exactly like ids nobody has.
fn parse_user_id(raw: &str) -> Result<Id<UserMarker>, Error> {
  raw.parse().map_err(|e| Error::from_context(types::Error::NotFound, e))
}

#[derive(Debug, thiserror::Error)]
#[error("User {0} does not exist")]
struct UserNotFound(Id<UserMarker>);

fn user_not_found(id: Id<UserMarker>) -> Error {
  Error::from_context(types::Error::NotFound, UserNotFound(id))
}
