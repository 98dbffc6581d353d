//! [GeoJSON] read definitions of [`Application`] parcels.
//!
//! [GeoJSON]: https://datatracker.ietf.org/doc/html/rfc7946

use std::fmt::Display;

use serde::{Serialize, Serializer};

use crate::domain::{application, Application};

/// [GeoJSON] `FeatureCollection` of [`Application`] parcels.
///
/// [GeoJSON]: https://datatracker.ietf.org/doc/html/rfc7946#section-3.3
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FeatureCollection {
    /// Type tag of this [`FeatureCollection`].
    #[serde(rename = "type")]
    pub kind: CollectionType,

    /// [`Feature`]s of this [`FeatureCollection`], one per [`Application`].
    pub features: Vec<Feature>,
}

impl FromIterator<Application> for FeatureCollection {
    fn from_iter<I: IntoIterator<Item = Application>>(iter: I) -> Self {
        Self {
            kind: CollectionType::FeatureCollection,
            features: iter.into_iter().map(Feature::from).collect(),
        }
    }
}

/// Type tag of a [`FeatureCollection`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub enum CollectionType {
    /// The only possible tag.
    FeatureCollection,
}

/// [GeoJSON] `Feature` representing a single [`Application`] parcel.
///
/// [GeoJSON]: https://datatracker.ietf.org/doc/html/rfc7946#section-3.2
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Feature {
    /// Type tag of this [`Feature`].
    #[serde(rename = "type")]
    pub kind: FeatureType,

    /// [`application::Geometry`] of the parcel, `null` if unknown.
    pub geometry: Option<application::Geometry>,

    /// Descriptive [`Properties`] of the parcel.
    pub properties: Properties,
}

impl From<Application> for Feature {
    fn from(application: Application) -> Self {
        let Application {
            id,
            geometry,
            pillar_type,
            client_name,
            address,
            lga,
            plan_number,
            area,
            surveyor_name,
            status,
            payment_status,
            ..
        } = application;

        Self {
            kind: FeatureType::Feature,
            geometry,
            properties: Properties {
                id,
                pillar_type,
                address,
                lga,
                client_name,
                plan_number,
                area,
                surveyor_name,
                status,
                payment_status,
            },
        }
    }
}

/// Type tag of a [`Feature`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub enum FeatureType {
    /// The only possible tag.
    Feature,
}

/// Descriptive properties of a [`Feature`].
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Properties {
    /// [`application::Id`] of the parcel.
    pub id: application::Id,

    /// [`application::PillarType`] of the parcel.
    pub pillar_type: Option<application::PillarType>,

    /// [`application::Address`] of the parcel owner.
    pub address: Option<application::Address>,

    /// [`application::Lga`] of the parcel.
    pub lga: Option<application::Lga>,

    /// [`application::ClientName`] of the parcel owner.
    pub client_name: Option<application::ClientName>,

    /// [`application::PlanNumber`] of the parcel.
    pub plan_number: Option<application::PlanNumber>,

    /// [`application::Area`] of the parcel.
    pub area: Option<application::Area>,

    /// [`application::SurveyorName`] of the parcel.
    pub surveyor_name: Option<application::SurveyorName>,

    /// [`application::Status`] of the parcel.
    #[serde(serialize_with = "display")]
    pub status: application::Status,

    /// [`application::PaymentStatus`] of the parcel.
    #[serde(serialize_with = "display")]
    pub payment_status: application::PaymentStatus,
}

/// Serializes the provided `value` as its [`Display`] string.
fn display<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    T: Display,
    S: Serializer,
{
    serializer.collect_str(value)
}

#[cfg(test)]
mod spec {
    use common::DateTime;
    use serde_json::json;

    use crate::domain::{application, Application};

    use super::FeatureCollection;

    fn application(id: i64, geometry: Option<&str>) -> Application {
        Application {
            id: id.into(),
            user_id: None,
            geometry: geometry
                .map(|g| application::Geometry::from_json(g).unwrap()),
            pillar_type: Some("Concrete".into()),
            client_name: Some("Adebayo Musa".into()),
            address: Some("12 Unity Road, Ilorin".into()),
            lga: Some("Ilorin West".into()),
            plan_number: application::PlanNumber::new("KW/1021"),
            area: Some("0.45 ha".into()),
            surveyor_name: None,
            status: application::Status::Submitted,
            payment_status: application::PaymentStatus::Pending,
            paid_amount: None,
            pillar_payment_fee: None,
            pillar_count: Some(4),
            misc_fee: None,
            created_at: DateTime::now().coerce(),
            review: None,
        }
    }

    #[test]
    fn one_feature_per_application() {
        let geometries = [
            r#"{"type":"Point","coordinates":[4.5418,8.4966]}"#,
            r#"{"type": "Polygon", "coordinates": [[[4.5,8.4],[4.6,8.4],[4.6,8.5],[4.5,8.4]]]}"#,
        ];

        let collection = geometries
            .iter()
            .enumerate()
            .map(|(i, g)| application(i64::try_from(i).unwrap(), Some(g)))
            .collect::<FeatureCollection>();

        assert_eq!(collection.features.len(), geometries.len());
        for (feature, source) in collection.features.iter().zip(geometries) {
            assert_eq!(feature.geometry.as_ref().unwrap().as_str(), source);
        }

        let rendered = serde_json::to_string(&collection).unwrap();
        for source in geometries {
            assert!(rendered.contains(source), "`{source}` is not verbatim");
        }
    }

    #[test]
    fn renders_properties() {
        let collection = [application(42, None)]
            .into_iter()
            .collect::<FeatureCollection>();

        assert_eq!(
            serde_json::to_value(&collection).unwrap(),
            json!({
                "type": "FeatureCollection",
                "features": [{
                    "type": "Feature",
                    "geometry": null,
                    "properties": {
                        "id": 42,
                        "pillar_type": "Concrete",
                        "address": "12 Unity Road, Ilorin",
                        "lga": "Ilorin West",
                        "client_name": "Adebayo Musa",
                        "plan_number": "KW/1021",
                        "area": "0.45 ha",
                        "surveyor_name": null,
                        "status": "SUBMITTED",
                        "payment_status": "PENDING",
                    },
                }],
            }),
        );
    }

    #[test]
    fn empty_collection() {
        let collection = FeatureCollection::from_iter(vec![]);

        assert_eq!(
            serde_json::to_value(&collection).unwrap(),
            json!({"type": "FeatureCollection", "features": []}),
        );
    }
}
