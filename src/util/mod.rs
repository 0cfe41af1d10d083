pub mod figment;
pub mod password;
pub mod validator;

mod sensitive;
pub use sensitive::Sensitive;
