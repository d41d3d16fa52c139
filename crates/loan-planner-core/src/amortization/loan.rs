//! Loan terms and what-if overrides consumed by the schedule generator.
//!
//! Lump sums live in a `BTreeMap` keyed by 1-based period so the generator can
//! look them up by exact period. On the wire they are an ascending list of
//! `{period, amount}` pairs; the conversion between the two rejects duplicate
//! periods and period 0.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::LoanPlannerError;
use crate::types::{Money, Percent};
use crate::LoanPlannerResult;

// ---------------------------------------------------------------------------
// Loan parameters
// ---------------------------------------------------------------------------

/// Fixed-rate installment loan terms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanParameters {
    /// Amount borrowed.
    pub principal: Money,
    /// Nominal annual rate as a percentage (6.5 = 6.5%).
    pub annual_rate_percent: Percent,
    /// Number of scheduled monthly payments.
    pub term_months: u32,
    /// Month of the first payment. Only year and month are significant.
    pub start_date: NaiveDate,
    /// Escrow items (taxes, insurance) paid alongside every installment.
    /// Affects cash paid only, never the amortization.
    #[serde(default)]
    pub fixed_monthly_add_on: Money,
}

// ---------------------------------------------------------------------------
// Scenario override
// ---------------------------------------------------------------------------

/// One-time extra principal payment in a given period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LumpSum {
    /// 1-based payment period.
    pub period: u32,
    pub amount: Money,
}

/// Extra principal applied on top of the level payment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScenarioOverride {
    /// Extra principal paid every period.
    #[serde(default)]
    pub extra_monthly_principal: Money,
    /// Sparse one-time payments, at most one per period.
    #[serde(default, with = "lump_sum_list")]
    lump_sums: BTreeMap<u32, Money>,
}

impl ScenarioOverride {
    /// Override with a recurring extra and no lump sums.
    pub fn recurring(extra_monthly_principal: Money) -> Self {
        Self {
            extra_monthly_principal,
            lump_sums: BTreeMap::new(),
        }
    }

    /// Build an override from a list of lump sums, in any order.
    pub fn from_lump_sums(
        extra_monthly_principal: Money,
        lump_sums: Vec<LumpSum>,
    ) -> LoanPlannerResult<Self> {
        Ok(Self {
            extra_monthly_principal,
            lump_sums: lump_sum_map(lump_sums)?,
        })
    }

    /// Lump sum scheduled for `period`, zero when none.
    pub fn lump_sum_for(&self, period: u32) -> Money {
        self.lump_sums
            .get(&period)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// Lump sums in ascending period order.
    pub fn lump_sums(&self) -> impl Iterator<Item = LumpSum> + '_ {
        self.lump_sums
            .iter()
            .map(|(&period, &amount)| LumpSum { period, amount })
    }

    /// Total extra principal requested for `period` before any clamping.
    pub fn requested_extra(&self, period: u32) -> Money {
        self.extra_monthly_principal + self.lump_sum_for(period)
    }

    /// True when the override asks for no extra principal at all.
    pub fn is_empty(&self) -> bool {
        self.extra_monthly_principal.is_zero() && self.lump_sums.values().all(|a| a.is_zero())
    }
}

fn lump_sum_map(entries: Vec<LumpSum>) -> LoanPlannerResult<BTreeMap<u32, Money>> {
    let mut map = BTreeMap::new();
    for entry in entries {
        if entry.period == 0 {
            return Err(LoanPlannerError::InvalidInput {
                field: "lump_sums.period".into(),
                reason: "Lump-sum periods are 1-based".into(),
            });
        }
        if map.insert(entry.period, entry.amount).is_some() {
            return Err(LoanPlannerError::InvalidInput {
                field: "lump_sums.period".into(),
                reason: format!("Duplicate lump sum for period {}", entry.period),
            });
        }
    }
    Ok(map)
}

/// Serializes the lump-sum map as an ascending `[{period, amount}]` list.
mod lump_sum_list {
    use super::{lump_sum_map, LumpSum, Money};
    use serde::{Deserialize, Deserializer, Serializer};
    use std::collections::BTreeMap;

    pub fn serialize<S: Serializer>(
        map: &BTreeMap<u32, Money>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(
            map.iter()
                .map(|(&period, &amount)| LumpSum { period, amount }),
        )
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<BTreeMap<u32, Money>, D::Error> {
        let entries = Vec::<LumpSum>::deserialize(deserializer)?;
        lump_sum_map(entries).map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
