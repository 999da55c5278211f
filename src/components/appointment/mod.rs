pub mod models;
pub mod validator;

pub use models::{Language, NormalizedAppointment, RawAppointmentRequest};
pub use validator::{validate, ValidationFailure};
