//! Payment aggregation read definitions.

use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::{ser::SerializeMap as _, Serialize, Serializer};

#[cfg(doc)]
use crate::domain::Application;
use crate::domain::{
    application,
    payment::{Ledger, Total},
};

/// Row of a payment-tracking table joined to its [`Application`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Row {
    /// ID of the joined [`Application`].
    pub application_id: application::Id,

    /// Amount paid for the [`Application`].
    pub paid_amount: Option<Decimal>,

    /// Pillar payment fee of the [`Application`].
    pub pillar_payment_fee: Option<Decimal>,

    /// Number of pillars requested by the [`Application`].
    pub pillar_count: Option<i32>,

    /// Miscellaneous fee of the [`Application`].
    pub misc_fee: Option<Decimal>,
}

/// Value of a single [`Total`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Number of things.
    Count(i64),

    /// Sum of money.
    Amount(#[serde(with = "rust_decimal::serde::float")] Decimal),
}

/// Named totals of a [`Ledger`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Totals {
    /// Values of the [`Ledger::totals`], in the same order.
    values: Vec<(Total, Value)>,
}

impl Totals {
    /// Reduces the provided [`Row`]s into the [`Totals`] of the provided
    /// [`Ledger`].
    ///
    /// Every [`Application`] contributes once, even if it's joined to many
    /// payment rows. Missing values are resolved with the
    /// [`Ledger::fallback`].
    #[must_use]
    pub fn summarize(
        ledger: &Ledger,
        rows: impl IntoIterator<Item = Row>,
    ) -> Self {
        let fallback = ledger.fallback;

        let mut seen = HashSet::new();
        let mut sums = Sums::default();
        for row in rows {
            if !seen.insert(row.application_id) {
                continue;
            }

            sums.applications = sums.applications.saturating_add(1);
            sums.paid_amount = sums
                .paid_amount
                .saturating_add(fallback.resolve(row.paid_amount));
            sums.pillar_payment_fee = sums
                .pillar_payment_fee
                .saturating_add(fallback.resolve(row.pillar_payment_fee));
            sums.misc_fee =
                sums.misc_fee.saturating_add(fallback.resolve(row.misc_fee));
            sums.pillar_count = sums
                .pillar_count
                .saturating_add(i64::from(fallback.resolve(row.pillar_count)));
        }

        Self {
            values: ledger
                .totals
                .iter()
                .map(|&total| (total, sums.value(total)))
                .collect(),
        }
    }

    /// Returns the [`Value`] of the provided [`Total`], if it's reported.
    #[must_use]
    pub fn get(&self, total: Total) -> Option<Value> {
        self.values
            .iter()
            .find_map(|&(t, v)| (t == total).then_some(v))
    }
}

impl Serialize for Totals {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (total, value) in &self.values {
            map.serialize_entry(total.key(), value)?;
        }
        map.end()
    }
}

/// Running sums of every known [`Total`].
#[derive(Clone, Copy, Debug, Default)]
struct Sums {
    applications: i64,
    paid_amount: Decimal,
    pillar_payment_fee: Decimal,
    misc_fee: Decimal,
    pillar_count: i64,
}

impl Sums {
    /// Returns the [`Value`] of the provided [`Total`].
    fn value(&self, total: Total) -> Value {
        match total {
            Total::Applications => Value::Count(self.applications),
            Total::PaidAmount => Value::Amount(self.paid_amount),
            Total::PillarPaymentFee => Value::Amount(self.pillar_payment_fee),
            Total::MiscFee => Value::Amount(self.misc_fee),
            Total::PillarCount => Value::Count(self.pillar_count),
        }
    }
}
