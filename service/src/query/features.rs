//! [`Features`] definition.

use common::operations::{By, Select};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{application, Application},
    infra::{database, Database},
    read::{self, FeatureCollection},
    Query, Service,
};

/// [`Query`] assembling the [`FeatureCollection`] of [`Application`]
/// parcels.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Features {
    /// ID of the only [`Application`] to include.
    ///
    /// All the [`Application`]s are included if [`None`].
    pub id: Option<application::Id>,
}

impl<Db> Query<Features> for Service<Db>
where
    Db: Database<
        Select<By<Vec<Application>, read::application::list::Filter>>,
        Ok = Vec<Application>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = FeatureCollection;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Features { id }: Features,
    ) -> Result<Self::Ok, Self::Err> {
        let filter = read::application::list::Filter {
            id,
            ..read::application::list::Filter::default()
        };
        let applications = self
            .database()
            .execute(Select(By::new(filter)))
            .await
            .map_err(tracerr::wrap!())?;

        log::debug!("assembling {} GeoJSON features", applications.len());
        Ok(applications.into_iter().collect())
    }
}

#[cfg(test)]
mod spec {
    use serde_json::json;

    use crate::{
        test_support::{application, service, Memory},
        Query as _,
    };

    use super::Features;

    #[tokio::test]
    async fn single_feature_by_id() {
        let service = service(Memory::with_applications(
            (40..45).map(application),
        ));

        let collection = service
            .execute(Features {
                id: Some(42.into()),
            })
            .await
            .unwrap();

        assert_eq!(collection.features.len(), 1);
        assert_eq!(
            serde_json::to_value(&collection).unwrap()["features"][0]
                ["properties"]["id"],
            json!(42),
        );
    }

    #[tokio::test]
    async fn all_features_in_id_order() {
        let service = service(Memory::with_applications(
            [3, 1, 2].map(application),
        ));

        let collection =
            service.execute(Features::default()).await.unwrap();

        assert_eq!(
            collection
                .features
                .iter()
                .map(|f| i64::from(f.properties.id))
                .collect::<Vec<_>>(),
            [1, 2, 3],
        );
    }

    #[tokio::test]
    async fn no_applications_yield_empty_collection() {
        let service = service(Memory::default());

        let collection = service
            .execute(Features {
                id: Some(42.into()),
            })
            .await
            .unwrap();

        assert_eq!(
            serde_json::to_value(&collection).unwrap(),
            json!({"type": "FeatureCollection", "features": []}),
        );
    }

    #[tokio::test]
    async fn propagates_database_error() {
        let service = service(Memory::broken());

        assert!(service.execute(Features::default()).await.is_err());
    }
}
