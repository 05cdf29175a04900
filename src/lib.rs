//! Return Engine library crate.
//!
//! This crate exposes the deposit return calculator as reusable
//! modules: field validation, the two inverse return formulas, result
//! presentation in Arabic or English, and the form's mode controller.
//! External applications may call [`engine::evaluate`] directly or
//! embed the HTTP API via [`api::build_router`].

pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod form;
pub mod locale;
pub mod logging;
pub mod models;
pub mod prefs;
pub mod present;
pub mod tax;
pub mod validation;

pub use engine::{evaluate, CalculationRequest};
pub use error::{CalcError, FieldError};
pub use locale::Locale;
pub use models::{CalculationMode, FieldId, InputSet, RawInputs, ReturnResult};
