//! Domain definitions.

pub mod application;
pub mod payment;
pub mod user;

pub use self::{application::Application, payment::Ledger, user::User};
