//! Mortgage-interest tax deduction.
//!
//! Interest is only deductible on the first `principal_cap` of the loan and
//! only the part of itemized deductions above the standard deduction saves
//! any tax.

use crate::amortization::LoanTerms;
use crate::error::Result;
use log::{debug, warn};

pub const STANDARD_DEDUCTION: f64 = 24400.;
pub const PRINCIPAL_CAP: f64 = 750000.;

#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TaxPolicy {
    pub standard_deduction: f64,
    pub principal_cap: f64,
}

impl Default for TaxPolicy {
    fn default() -> Self {
        Self {
            standard_deduction: STANDARD_DEDUCTION,
            principal_cap: PRINCIPAL_CAP,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TaxContext {
    pub marginal_rate: f64,
    pub property_tax_yearly: f64,
    pub policy: TaxPolicy,
}

impl TaxContext {
    pub fn new(marginal_rate: f64, property_tax_yearly: f64, policy: TaxPolicy) -> Self {
        Self {
            marginal_rate,
            property_tax_yearly,
            policy,
        }
    }

    /// Yearly interest as if no more than the cap had been borrowed.
    ///
    /// A loan above the cap is recomputed with the capped amount rather than
    /// having its interest scaled down, so a loan that amortizes below the
    /// cap mid-term is still treated as capped for its whole life.
    pub fn capped_interest(&self, terms: &LoanTerms) -> Result<Vec<f64>> {
        let cap = self.policy.principal_cap;
        if terms.principal > cap {
            warn!(
                "principal {:.0} exceeds the deductible cap, interest deduction computed on {:.0}",
                terms.principal, cap
            );
        }
        terms.with_principal(terms.principal.min(cap))?.yearly_interest()
    }

    pub fn yearly_deduction(&self, terms: &LoanTerms) -> Result<Vec<f64>> {
        let deductions: Vec<f64> = self
            .capped_interest(terms)?
            .into_iter()
            .map(|interest| {
                let itemized = interest + self.property_tax_yearly;
                self.marginal_rate * (itemized - self.policy.standard_deduction).max(0.)
            })
            .collect();
        debug!(
            "{} of {} years above the standard deduction",
            deductions.iter().filter(|d| **d > 0.).count(),
            deductions.len()
        );
        Ok(deductions)
    }
}

pub fn mortgage_interest_deduction(
    principal: f64,
    monthly_rate: f64,
    term_months: u32,
    principal_cap: f64,
) -> Result<Vec<f64>> {
    let terms = LoanTerms::new(principal, monthly_rate, term_months)?;
    let policy = TaxPolicy {
        principal_cap,
        ..TaxPolicy::default()
    };
    TaxContext::new(0., 0., policy).capped_interest(&terms)
}

#[allow(clippy::too_many_arguments)]
pub fn yearly_deduction(
    marginal_rate: f64,
    principal: f64,
    monthly_rate: f64,
    term_months: u32,
    property_tax_yearly: f64,
    standard_deduction: f64,
    principal_cap: f64,
) -> Result<Vec<f64>> {
    let terms = LoanTerms::new(principal, monthly_rate, term_months)?;
    let policy = TaxPolicy {
        standard_deduction,
        principal_cap,
    };
    TaxContext::new(marginal_rate, property_tax_yearly, policy).yearly_deduction(&terms)
}

/// Spreads each yearly amount evenly over its twelve months.
pub fn yearly_to_monthly(yearly: &[f64]) -> Vec<f64> {
    yearly
        .iter()
        .flat_map(|year| std::iter::repeat(year / 12.).take(12))
        .collect()
}
