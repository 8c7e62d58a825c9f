mod validator;

pub use validator::{BlockValidator, Validator};
