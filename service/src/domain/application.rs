//! [`Application`] definitions.

use std::fmt;

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, DateTimeOf};
use derive_more::{Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

use crate::domain::user;
#[cfg(doc)]
use crate::domain::User;

/// Land-pillar registration submitted by a surveyor.
#[derive(Clone, Debug, PartialEq)]
pub struct Application {
    /// ID of this [`Application`].
    pub id: Id,

    /// ID of the [`User`] who submitted this [`Application`], if known.
    pub user_id: Option<user::Id>,

    /// [`Geometry`] of the parcel this [`Application`] registers pillars on.
    pub geometry: Option<Geometry>,

    /// [`PillarType`] requested by this [`Application`].
    pub pillar_type: Option<PillarType>,

    /// [`ClientName`] of the parcel owner.
    pub client_name: Option<ClientName>,

    /// [`Address`] of the parcel owner.
    pub address: Option<Address>,

    /// [`Lga`] the parcel is located in.
    pub lga: Option<Lga>,

    /// [`PlanNumber`] of the survey plan.
    pub plan_number: Option<PlanNumber>,

    /// [`Area`] of the parcel.
    pub area: Option<Area>,

    /// [`SurveyorName`] of the surveyor who prepared the plan.
    pub surveyor_name: Option<SurveyorName>,

    /// Review [`Status`] of this [`Application`].
    pub status: Status,

    /// [`PaymentStatus`] of this [`Application`].
    pub payment_status: PaymentStatus,

    /// Amount already paid for this [`Application`].
    pub paid_amount: Option<Decimal>,

    /// Fee charged for the pillars.
    pub pillar_payment_fee: Option<Decimal>,

    /// Number of pillars requested.
    pub pillar_count: Option<i32>,

    /// Miscellaneous fee charged on top of the pillar fee.
    pub misc_fee: Option<Decimal>,

    /// [`DateTime`] when this [`Application`] was created.
    pub created_at: CreationDateTime,

    /// Last [`Review`] of this [`Application`], if it was reviewed.
    pub review: Option<Review>,
}

impl Application {
    /// Applies the [`Review`] made by the provided reviewer, moving this
    /// [`Application`] into the provided [`Status`].
    pub fn review(&mut self, status: Status, reviewer_id: user::Id) {
        self.status = status;
        self.review = Some(Review {
            reviewer_id,
            reviewed_at: ReviewDateTime::now(),
        });
    }
}

/// Review of an [`Application`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Review {
    /// ID of the [`User`] who reviewed the [`Application`].
    pub reviewer_id: user::Id,

    /// [`DateTime`] when the [`Application`] was reviewed.
    pub reviewed_at: ReviewDateTime,
}

/// ID of an [`Application`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
#[serde(transparent)]
pub struct Id(i64);

/// GeoJSON geometry object of a parcel, kept exactly as it is stored.
///
/// The JSON text is never parsed into a tree, so it is rendered back
/// byte-for-byte.
#[derive(Clone, Serialize)]
#[serde(transparent)]
pub struct Geometry(Box<RawValue>);

impl Geometry {
    /// Creates a new [`Geometry`] out of the provided JSON text.
    ///
    /// # Errors
    ///
    /// If the provided `json` is not a valid JSON.
    pub fn from_json(json: impl Into<String>) -> Result<Self, serde_json::Error> {
        RawValue::from_string(json.into()).map(Self)
    }

    /// Returns the JSON text of this [`Geometry`].
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.get()
    }
}

impl fmt::Debug for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Geometry").field(&self.as_str()).finish()
    }
}

impl PartialEq for Geometry {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

#[cfg(feature = "postgres")]
impl<'a> FromSql<'a> for Geometry {
    postgres_types::accepts!(TEXT);

    fn from_sql(
        ty: &postgres_types::Type,
        raw: &'a [u8],
    ) -> Result<Self, Box<dyn std::error::Error + Sync + Send>> {
        let json = <&str as FromSql<'_>>::from_sql(ty, raw)?;
        Ok(Self::from_json(json)?)
    }
}

/// Defines a textual attribute of an [`Application`].
macro_rules! define_text {
    ($(#[doc = $doc:literal] $name:ident),* $(,)?) => {$(
        #[doc = $doc]
        #[derive(
            Clone, Debug, Display, Eq, From, Hash, PartialEq, Serialize,
        )]
        #[cfg_attr(
            feature = "postgres",
            derive(FromSql, ToSql),
            postgres(transparent),
        )]
        #[from(&str, String)]
        #[serde(transparent)]
        pub struct $name(String);

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    )*};
}

define_text! {
    #[doc = "Type of pillars requested by an [`Application`]."]
    PillarType,

    #[doc = "Name of a parcel owner."]
    ClientName,

    #[doc = "Postal address of a parcel owner."]
    Address,

    #[doc = "Local government area a parcel is located in."]
    Lga,

    #[doc = "Area of a parcel, as written on the survey plan."]
    Area,

    #[doc = "Name of a surveyor who prepared a survey plan."]
    SurveyorName,
}

/// Number of a survey plan an [`Application`] is filed under.
#[derive(Clone, Debug, Display, Eq, Hash, PartialEq, Serialize)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[serde(transparent)]
pub struct PlanNumber(String);

impl PlanNumber {
    /// Creates a new [`PlanNumber`] if the given `number` is valid.
    ///
    /// Surrounding whitespace is trimmed.
    #[must_use]
    pub fn new(number: impl AsRef<str>) -> Option<Self> {
        let number = number.as_ref().trim();
        (!number.is_empty() && number.len() <= 128)
            .then(|| Self(number.to_owned()))
    }
}

impl AsRef<str> for PlanNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

define_kind! {
    #[doc = "Review status of an [`Application`]."]
    enum Status {
        #[doc = "Submitted and waiting for a review."]
        Submitted = 1,

        #[doc = "Reviewed, waiting for an approval."]
        Reviewed = 2,

        #[doc = "Approved."]
        Approved = 3,

        #[doc = "Rejected."]
        Rejected = 4,
    }
}

impl Status {
    /// Indicates whether an [`Application`] can be moved into this [`Status`]
    /// by a review.
    #[must_use]
    pub const fn is_review_outcome(self) -> bool {
        matches!(self, Self::Reviewed | Self::Approved | Self::Rejected)
    }
}

define_kind! {
    #[doc = "Payment status of an [`Application`]."]
    enum PaymentStatus {
        #[doc = "Not paid yet."]
        Pending = 1,

        #[doc = "Paid in full."]
        Paid = 2,
    }
}

/// [`DateTime`] when an [`Application`] was created.
pub type CreationDateTime = DateTimeOf<(Application, unit::Creation)>;

/// [`DateTime`] when an [`Application`] was reviewed.
pub type ReviewDateTime = DateTimeOf<(Application, unit::Review)>;
