//! Postgres database clients acquiring their [`Connection`]s on demand.
//!
//! [`Connection`]: super::Connection

pub mod non_tx;
pub mod tx;

use std::future::Future;

use tokio::sync::{RwLock, RwLockReadGuard};
use tracerr::Traced;

use crate::infra::database;

pub use self::{non_tx::NonTx, tx::Tx};

/// Returns the value stored in the provided `slot`, filling it with the
/// result of `init` first if it's empty.
///
/// # Errors
///
/// If the `slot` is empty and `init` fails.
async fn get_or_init<T, F>(
    slot: &RwLock<Option<T>>,
    init: impl FnOnce() -> F,
) -> Result<RwLockReadGuard<'_, T>, Traced<database::Error>>
where
    F: Future<Output = Result<T, Traced<database::Error>>>,
{
    let read = slot.read().await;
    let guard = if read.is_some() {
        read
    } else {
        drop(read);

        let mut write = slot.write().await;
        if write.is_none() {
            *write = Some(init().await.map_err(tracerr::wrap!())?);
        }
        write.downgrade()
    };

    Ok(RwLockReadGuard::map(guard, |v| {
        v.as_ref().expect("filled while the guard is alive")
    }))
}

/// Implements [`Connection`] for the provided client types by forwarding to
/// the connection they provide.
///
/// [`Connection`]: super::Connection
macro_rules! forward_connection {
    ($($ty:ty),* $(,)?) => {$(
        impl $crate::infra::database::postgres::Connection for $ty {
            async fn query<T>(
                &self,
                stmt: &T,
                params: &[&(dyn ::tokio_postgres::types::ToSql + Sync)],
            ) -> Result<
                Vec<::tokio_postgres::Row>,
                ::tracerr::Traced<$crate::infra::database::Error>,
            >
            where
                T: ::tokio_postgres::ToStatement + ?Sized,
            {
                use $crate::infra::database::postgres::Connection as _;

                self.connection()
                    .await
                    .map_err(tracerr::wrap!())?
                    .query(stmt, params)
                    .await
                    .map_err(tracerr::wrap!())
            }

            async fn query_opt<T>(
                &self,
                stmt: &T,
                params: &[&(dyn ::tokio_postgres::types::ToSql + Sync)],
            ) -> Result<
                Option<::tokio_postgres::Row>,
                ::tracerr::Traced<$crate::infra::database::Error>,
            >
            where
                T: ::tokio_postgres::ToStatement + ?Sized,
            {
                use $crate::infra::database::postgres::Connection as _;

                self.connection()
                    .await
                    .map_err(tracerr::wrap!())?
                    .query_opt(stmt, params)
                    .await
                    .map_err(tracerr::wrap!())
            }

            async fn exec<T>(
                &self,
                stmt: &T,
                params: &[&(dyn ::tokio_postgres::types::ToSql + Sync)],
            ) -> Result<u64, ::tracerr::Traced<$crate::infra::database::Error>>
            where
                T: ::tokio_postgres::ToStatement + ?Sized,
            {
                use $crate::infra::database::postgres::Connection as _;

                self.connection()
                    .await
                    .map_err(tracerr::wrap!())?
                    .exec(stmt, params)
                    .await
                    .map_err(tracerr::wrap!())
            }
        }
    )*};
}

forward_connection!(NonTx, Tx);
