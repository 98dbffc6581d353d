//! [`Query`] collection related to multiple [`Application`]s.

use common::operations::By;

use crate::{domain::Application, read};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a list of [`Application`]s matching a
/// [`read::application::list::Filter`], ordered by their IDs.
pub type List =
    DatabaseQuery<By<Vec<Application>, read::application::list::Filter>>;

#[cfg(test)]
mod spec {
    use crate::{
        domain::{application, user},
        read::application::list::Filter,
        test_support::{application, service, Memory},
        Query as _,
    };

    use super::List;

    #[tokio::test]
    async fn filters_by_plan_number() {
        let mut twin = application(3);
        twin.plan_number = application::PlanNumber::new("KW/1");
        let service = service(Memory::with_applications([
            twin,
            application(1),
            application(2),
        ]));

        let found = service
            .execute(List::by(Filter {
                plan_number: application::PlanNumber::new("KW/1"),
                ..Filter::default()
            }))
            .await
            .unwrap();

        assert_eq!(
            found.iter().map(|a| a.id).collect::<Vec<_>>(),
            [application::Id::from(1), 3.into()],
        );
    }

    #[tokio::test]
    async fn filters_by_owner() {
        let owner = user::Id::new();
        let mut owned = application(5);
        owned.user_id = Some(owner);
        let service =
            service(Memory::with_applications([application(4), owned]));

        let found = service
            .execute(List::by(Filter {
                user_id: Some(owner),
                ..Filter::default()
            }))
            .await
            .unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].user_id, Some(owner));
    }

    #[tokio::test]
    async fn unknown_owner_yields_empty_list() {
        let service = service(Memory::with_applications([application(4)]));

        let found = service
            .execute(List::by(Filter {
                user_id: Some(user::Id::new()),
                ..Filter::default()
            }))
            .await
            .unwrap();

        assert!(found.is_empty());
    }
}
