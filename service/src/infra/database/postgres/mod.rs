//! Postgres [`Database`] implementation.

pub mod client;
pub mod connection;
mod impls;

use deadpool_postgres::Runtime;
use derive_more::{Deref, Display, Error as StdError, From};
use tokio_postgres::NoTls;
use tracerr::Traced;

use crate::infra::database;
#[cfg(doc)]
use crate::infra::Database;

pub use refinery::embed_migrations;

pub use self::{
    client::{NonTx, Tx},
    connection::Connection,
};

pub use deadpool_postgres::{Config, PoolConfig};

/// Postgres [`Database`] client.
///
/// Either pooled ([`NonTx`]) or bound to a single transaction ([`Tx`]).
#[derive(Clone, Copy, Debug, Deref)]
pub struct Postgres<T = NonTx>(T);

impl Postgres {
    /// Creates a new pooled [`Postgres`] client with the provided [`Config`].
    ///
    /// No connection is established until the first query.
    ///
    /// # Errors
    ///
    /// If the provided [`Config`] doesn't describe a valid pool.
    pub fn new(conf: &Config) -> Result<Self, Traced<database::Error>> {
        let pool = conf
            .create_pool(Some(Runtime::Tokio1), NoTls)
            .map_err(tracerr::from_and_wrap!(=> Error))
            .map_err(tracerr::map_from)?;
        Ok(Self(NonTx::from_pool(pool)))
    }
}

/// Postgres database [`Error`].
#[derive(Debug, Display, StdError, From)]
pub enum Error {
    /// Error returned by a [`Connection`].
    #[display("`Connection` error: {_0}")]
    Connection(connection::Error),

    /// [`connection::Pool`] cannot be created out of its configuration.
    #[display("Failed to create a new `connection::Pool`: {_0}")]
    PoolCreationError(connection::PoolCreationError),

    /// [`connection::Pool`] failed to provide a [`Connection`].
    #[display("`connection::Pool` error: {_0}")]
    PoolError(connection::PoolError),
}
