//! Core RPS types, code lists, formatting rules and validation.
//!
//! The record types mirror the Tinus RPS layout one-to-one. The element
//! order and the mandatory/optional rules live in a single ordered table
//! that both validation and XML rendering walk.

mod amount;
mod builder;
pub mod codes;
mod error;
#[cfg(feature = "json")]
mod json;
pub(crate) mod schema;
mod types;
mod validation;

pub use amount::{Amount, REGISTRATION_WIDTH, format_amount, format_rate, pad_registration};
pub use builder::*;
pub use codes::{OperationNature, RpsStatus, RpsType, SpecialTaxRegime, YesNo};
pub use error::*;
pub use schema::ISSUE_DATE_FORMAT;
pub use types::*;
pub use validation::*;
