//! [`NonTx`] client definitions.

use tracerr::Traced;

use crate::infra::database::{
    self,
    postgres::{self, connection},
};

/// Pooled Postgres database client running every statement on its own.
///
/// Every statement takes its own connection out of the pool and returns it
/// once done, so clones of a [`NonTx`] client share nothing but the pool.
#[derive(Clone, Debug)]
pub struct NonTx {
    /// [`connection::Pool`] the connections are taken from.
    pub(crate) pool: connection::Pool,
}

impl NonTx {
    /// Creates a new [`NonTx`] client over the provided [`connection::Pool`].
    #[must_use]
    pub(crate) fn from_pool(pool: connection::Pool) -> Self {
        Self { pool }
    }

    /// Takes a fresh connection out of the pool.
    pub(crate) async fn connection(
        &self,
    ) -> Result<connection::NonTx, Traced<database::Error>> {
        self.pool
            .get()
            .await
            .map_err(tracerr::from_and_wrap!(=> postgres::Error))
            .map_err(tracerr::map_from)
    }
}
