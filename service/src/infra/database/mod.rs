//! [`Database`] abstractions and implementations.

#[cfg(feature = "postgres")]
pub mod postgres;

use derive_more::{Display, Error as StdError, From};

#[cfg(feature = "postgres")]
pub use self::postgres::Postgres;

/// Operation over the data store holding [`Application`]s, [`User`]s and
/// payment-tracking tables.
///
/// [`Application`]: crate::domain::Application
/// [`User`]: crate::domain::User
pub use common::Handler as Database;

/// [`Database`] error.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    #[cfg(feature = "postgres")]
    /// [`Postgres`] error.
    Postgres(postgres::Error),
}
