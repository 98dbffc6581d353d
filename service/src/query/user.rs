//! [`Query`] collection related to a single [`User`].

use common::operations::By;

use crate::domain::{user, User};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a [`User`] by its [`user::Id`].
pub type ById = DatabaseQuery<By<Option<User>, user::Id>>;

#[cfg(test)]
mod spec {
    use crate::{
        domain::user::Role,
        test_support::{service, user, Memory},
        Query as _,
    };

    use super::ById;

    #[tokio::test]
    async fn finds_by_id() {
        let reviewer = user("reviewer", "s3cret", Role::Reviewer);
        let service = service(Memory {
            users: vec![user("admin", "s3cret", Role::Admin), reviewer.clone()],
            ..Memory::default()
        });

        let found = service.execute(ById::by(reviewer.id)).await.unwrap();

        assert_eq!(found.map(|u| u.login), Some(reviewer.login));
    }

    #[tokio::test]
    async fn misses_unknown() {
        let service = service(Memory::default());

        let found = service.execute(ById::by(crate::domain::user::Id::new()));

        assert!(found.await.unwrap().is_none());
    }
}
