//! Closed-form amortization of a fixed-rate loan.
//!
//! Every monthly quantity is computed directly from its month index, so no
//! value depends on the one before it and a schedule can be evaluated in any
//! order.

use crate::error::{MortgageError, Result};
use log::{debug, trace};

#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct LoanTerms {
    pub principal: f64,
    pub monthly_rate: f64,
    pub term_months: u32,
}

impl LoanTerms {
    pub fn new(principal: f64, monthly_rate: f64, term_months: u32) -> Result<Self> {
        if term_months == 0 {
            return Err(MortgageError::invalid_input(
                "term_months",
                "loan term must be at least one month",
            ));
        }
        if !principal.is_finite() || principal < 0. {
            return Err(MortgageError::invalid_input(
                "principal",
                format!("expected a finite non-negative amount, got {}", principal),
            ));
        }
        // a rate of -100% or less makes (1 + r)^n meaningless
        if !monthly_rate.is_finite() || monthly_rate <= -1. {
            return Err(MortgageError::invalid_input(
                "monthly_rate",
                format!("rate {} gives a degenerate growth factor", monthly_rate),
            ));
        }
        Ok(Self {
            principal,
            monthly_rate,
            term_months,
        })
    }

    /// Same rate and term, different amount borrowed.
    pub fn with_principal(&self, principal: f64) -> Result<Self> {
        Self::new(principal, self.monthly_rate, self.term_months)
    }

    pub fn term_years(&self) -> Result<usize> {
        if self.term_months % 12 != 0 {
            return Err(MortgageError::invalid_input(
                "term_months",
                format!("{} is not a whole number of years", self.term_months),
            ));
        }
        Ok(self.term_months as usize / 12)
    }

    /// `(1 + r)^months - 1`, without the cancellation of subtracting one
    /// from a growth factor that rounds to one.
    fn growth_m1(&self, months: u32) -> f64 {
        (months as f64 * self.monthly_rate.ln_1p()).exp_m1()
    }

    // rates too small to compound within the term amortize linearly
    fn is_zero_rate(&self) -> bool {
        self.monthly_rate == 0. || self.growth_m1(self.term_months) == 0.
    }

    /// Constant payment that retires the loan in exactly `term_months`.
    pub fn monthly_payment(&self) -> f64 {
        let n = self.term_months;
        if self.is_zero_rate() {
            return self.principal / n as f64;
        }
        let full_m1 = self.growth_m1(n);
        self.principal * self.monthly_rate * (full_m1 + 1.) / full_m1
    }

    /// Balance outstanding at the start of month `k`, before that month's
    /// payment is applied.
    ///
    /// `P (1+r)^k [1 - ((1+r)^n - (1+r)^(n-k)) / ((1+r)^n - 1)]` reduces to
    /// `P [1 - ((1+r)^k - 1) / ((1+r)^n - 1)]`.
    pub fn principal_at(&self, k: u32) -> f64 {
        let n = self.term_months;
        if self.is_zero_rate() {
            return self.principal - k as f64 * (self.principal / n as f64);
        }
        self.principal * (1. - self.growth_m1(k) / self.growth_m1(n))
    }

    /// What is left after the last scheduled payment. Zero up to rounding.
    pub fn final_residual(&self) -> f64 {
        let last = self.principal_at(self.term_months - 1);
        last * (1. + self.monthly_rate) - self.monthly_payment()
    }

    pub fn outstanding_principal(&self) -> Vec<f64> {
        (0..self.term_months)
            .map(|k| {
                let balance = self.principal_at(k);
                trace!("month {}, outstanding principal {}", k, balance);
                balance
            })
            .collect()
    }

    pub fn monthly_interest(&self) -> Vec<f64> {
        (0..self.term_months)
            .map(|k| self.monthly_rate * self.principal_at(k))
            .collect()
    }

    pub fn monthly_principal_paid(&self) -> Vec<f64> {
        let payment = self.monthly_payment();
        self.monthly_interest()
            .into_iter()
            .map(|interest| payment - interest)
            .collect()
    }

    pub fn yearly_interest(&self) -> Result<Vec<f64>> {
        self.term_years()?;
        let yearly = sum_by_year(&self.monthly_interest())?;
        debug!(
            "yearly interest on {:.2} over {} years: first year {:.2}",
            self.principal,
            yearly.len(),
            yearly.first().copied().unwrap_or(0.)
        );
        Ok(yearly)
    }
}

/// Sums consecutive, non-overlapping runs of twelve months.
pub fn sum_by_year(monthly: &[f64]) -> Result<Vec<f64>> {
    if monthly.len() % 12 != 0 {
        return Err(MortgageError::invalid_input(
            "monthly",
            format!("{} months do not split into whole years", monthly.len()),
        ));
    }
    Ok(monthly.chunks(12).map(|year| year.iter().sum()).collect())
}

pub fn monthly_payment(principal: f64, monthly_rate: f64, term_months: u32) -> Result<f64> {
    Ok(LoanTerms::new(principal, monthly_rate, term_months)?.monthly_payment())
}

pub fn outstanding_principal(
    principal: f64,
    monthly_rate: f64,
    term_months: u32,
) -> Result<Vec<f64>> {
    Ok(LoanTerms::new(principal, monthly_rate, term_months)?.outstanding_principal())
}

pub fn monthly_interest(principal: f64, monthly_rate: f64, term_months: u32) -> Result<Vec<f64>> {
    Ok(LoanTerms::new(principal, monthly_rate, term_months)?.monthly_interest())
}

pub fn monthly_principal_paid(
    principal: f64,
    monthly_rate: f64,
    term_months: u32,
) -> Result<Vec<f64>> {
    Ok(LoanTerms::new(principal, monthly_rate, term_months)?.monthly_principal_paid())
}

pub fn yearly_interest(principal: f64, monthly_rate: f64, term_months: u32) -> Result<Vec<f64>> {
    LoanTerms::new(principal, monthly_rate, term_months)?.yearly_interest()
}
