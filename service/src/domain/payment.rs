//! Payment [`Ledger`] definitions.

#[cfg(doc)]
use crate::domain::Application;

/// Configuration of a payment aggregation over one payment-tracking table.
///
/// Each payment-tracking table is joined to the [`Application`]s it tracks
/// and reduced into the [`Total`]s listed here. Both known ledgers share the
/// very same reduction and differ only in this configuration.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Ledger {
    /// Human-readable name of this [`Ledger`].
    pub name: &'static str,

    /// Name of the payment-tracking table.
    pub table: &'static str,

    /// [`Total`]s reported by this [`Ledger`], in the order of reporting.
    pub totals: &'static [Total],

    /// [`Fallback`] policy for numeric fields missing in a row.
    pub fallback: Fallback,
}

impl Ledger {
    /// Pillar payments tracked for APPSN.
    pub const APPSN: Self = Self {
        name: "APPSN",
        table: "appsn_payments",
        totals: &[
            Total::Applications,
            Total::PaidAmount,
            Total::PillarPaymentFee,
            Total::PillarCount,
        ],
        fallback: Fallback::Zero,
    };

    /// Payments tracked for SURCON (Surveyors Council of Nigeria).
    pub const SURCON: Self = Self {
        name: "SURCON",
        table: "surcon_payments",
        totals: &[
            Total::Applications,
            Total::PaidAmount,
            Total::MiscFee,
            Total::PillarCount,
        ],
        fallback: Fallback::Zero,
    };
}

/// Named total reported by a [`Ledger`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Total {
    /// Number of distinct [`Application`]s.
    Applications,

    /// Sum of the amounts paid.
    PaidAmount,

    /// Sum of the pillar payment fees.
    PillarPaymentFee,

    /// Sum of the miscellaneous fees.
    MiscFee,

    /// Sum of the requested pillars.
    PillarCount,
}

impl Total {
    /// Returns the key this [`Total`] is reported under.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Applications => "total_applications",
            Self::PaidAmount => "total_paid_amount",
            Self::PillarPaymentFee => "total_pillar_payment_fee",
            Self::MiscFee => "total_misc_fee",
            Self::PillarCount => "total_pillar_count",
        }
    }
}

/// Policy of treating a numeric field missing in a row.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Fallback {
    /// Missing value contributes zero.
    Zero,
}

impl Fallback {
    /// Resolves the provided optional value according to this [`Fallback`].
    #[must_use]
    pub fn resolve<T: Default>(self, value: Option<T>) -> T {
        match self {
            Self::Zero => value.unwrap_or_default(),
        }
    }
}
