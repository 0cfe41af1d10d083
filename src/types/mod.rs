pub mod error;
pub mod form;
pub mod id;
pub mod requirements;
pub mod services;
pub mod user;
pub mod validation;

pub use error::Error;
pub use id::{marker, Id};
pub use user::{display_name, PersonType, Role};
