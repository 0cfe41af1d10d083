mod br;
mod length;
mod url;

pub use self::br::*;
pub use self::length::validate_length;
pub use self::url::validate_url;
