//! [`Database`] implementations.

#![allow(
    clippy::items_after_statements,
    reason = "`const SQL` after statements"
)]

mod application;
mod payment;
mod user;

use async_trait::async_trait;
use common::operations::{Commit, Transact};
use refinery_core::{
    traits::r#async::{AsyncQuery, AsyncTransaction},
    AsyncMigrate, Migration,
};
use tracerr::Traced;

use crate::infra::{database, postgres, Database};

use super::{NonTx, Postgres, Tx};

impl Database<Transact> for Postgres<NonTx> {
    type Ok = Postgres<Tx>;
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Transact) -> Result<Self::Ok, Self::Err> {
        Ok(Postgres(Tx::from_pool(self.pool.clone())))
    }
}

impl Database<Commit> for Postgres<Tx> {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Commit) -> Result<Self::Ok, Self::Err> {
        self.commit().await.map_err(tracerr::wrap!())
    }
}

#[async_trait]
impl AsyncTransaction for Postgres {
    type Error = Traced<database::Error>;

    async fn execute(
        &mut self,
        queries: &[&str],
    ) -> Result<usize, Self::Error> {
        let mut conn =
            self.connection().await.map_err(tracerr::wrap!())?;
        AsyncTransaction::execute(&mut **conn, queries)
            .await
            .map_err(tracerr::from_and_wrap!(=> postgres::Error))
            .map_err(tracerr::map_from)
    }
}

#[async_trait]
impl AsyncQuery<Vec<Migration>> for Postgres {
    async fn query(
        &mut self,
        query: &str,
    ) -> Result<Vec<Migration>, <Self as AsyncTransaction>::Error> {
        let mut conn =
            self.connection().await.map_err(tracerr::wrap!())?;
        AsyncQuery::query(&mut **conn, query)
            .await
            .map_err(tracerr::from_and_wrap!(=> postgres::Error))
            .map_err(tracerr::map_from)
    }
}

impl AsyncMigrate for Postgres {}

#[cfg(test)]
mod spec {
    use crate::domain::{
        application::{PaymentStatus, Status},
        user::Role,
    };

    const INITIAL: &str =
        include_str!("../../../../../../migrations/V1__initial.sql");

    /// Returns the whitespace-normalized definition of the first column
    /// named `name` in the initial migration.
    fn column(name: &str) -> String {
        let mut words = vec![];
        for line in INITIAL
            .lines()
            .skip_while(|l| l.split_whitespace().next() != Some(name))
        {
            words.extend(line.split_whitespace());
            if line.trim_end().ends_with(',') {
                break;
            }
        }
        words.join(" ")
    }

    #[test]
    fn kind_columns_accept_only_known_values() {
        assert!(column("role").contains("CHECK (role BETWEEN 1 AND 3)"));
        assert!(column("status").contains("CHECK (status BETWEEN 1 AND 4)"));
        assert!(column("payment_status")
            .contains("CHECK (payment_status IN (1, 2))"));

        for v in 1..=3 {
            assert!(Role::from_u8(v).is_some(), "{v}");
        }
        assert_eq!(Role::from_u8(4), None);
        for v in 1..=4 {
            assert!(Status::from_u8(v).is_some(), "{v}");
        }
        assert_eq!(Status::from_u8(5), None);
        for v in [1, 2] {
            assert!(PaymentStatus::from_u8(v).is_some(), "{v}");
        }
        assert_eq!(PaymentStatus::from_u8(3), None);
    }

    #[test]
    fn geometry_column_keeps_submitted_text() {
        assert_eq!(column("geometry"), "geometry JSON,");
    }
}
