//! Read entities definitions.

pub mod application;
pub mod feature;
pub mod payment;

pub use self::{feature::FeatureCollection, payment::Totals};
