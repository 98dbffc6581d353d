//! [`Query`] collection related to a single [`Application`].

use common::operations::By;

use crate::domain::{application, Application};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries an [`Application`] by its [`application::Id`].
pub type ById = DatabaseQuery<By<Option<Application>, application::Id>>;

#[cfg(test)]
mod spec {
    use crate::{
        test_support::{application, service, Memory},
        Query as _,
    };

    use super::ById;

    #[tokio::test]
    async fn finds_by_id() {
        let service = service(Memory::with_applications([
            application(1),
            application(2),
        ]));

        let found = service.execute(ById::by(2.into())).await.unwrap();

        assert_eq!(found.map(|a| a.id), Some(2.into()));
    }

    #[tokio::test]
    async fn missing_is_none() {
        let service = service(Memory::with_applications([application(1)]));

        assert!(service.execute(ById::by(9.into())).await.unwrap().is_none());
    }
}
