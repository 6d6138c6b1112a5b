use crate::amortization::LoanTerms;
use crate::error::{MortgageError, Result};
use crate::table::{format_summary, format_table};
use crate::tax::{yearly_to_monthly, TaxContext, TaxPolicy};
use log::{debug, info};
use std::fmt;

pub const DEFAULT_PROPERTY_TAX: f64 = 0.013;
pub const DEFAULT_MARGINAL_TAX_RATE: f64 = 0.32;
pub const DEFAULT_INSURANCE: f64 = 120.;

pub const TITLES: [&str; 8] = [
    "Month",
    "Monthly interest payment",
    "Monthly principal payment",
    "Principal evolution",
    "Capital gain",
    "Total wasted per month",
    "Total per month",
    "Tax deduction",
];

#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MortgageInputs {
    pub home_value: f64,
    pub mortgage_rate: f64, // annual, as a decimal (0.035)
    pub downpayment: f64,   // fraction of home value
    pub mortgage_term: u32, // years
    pub property_tax: f64,  // annual rate on home value
    pub marginal_tax_rate: f64,
    pub insurance: f64, // monthly
    pub policy: TaxPolicy,
}

impl MortgageInputs {
    pub fn new(home_value: f64, mortgage_rate: f64, downpayment: f64, mortgage_term: u32) -> Self {
        Self {
            home_value,
            mortgage_rate,
            downpayment,
            mortgage_term,
            property_tax: DEFAULT_PROPERTY_TAX,
            marginal_tax_rate: DEFAULT_MARGINAL_TAX_RATE,
            insurance: DEFAULT_INSURANCE,
            policy: TaxPolicy::default(),
        }
    }

    pub fn downpayment_amount(&self) -> f64 {
        self.downpayment * self.home_value
    }

    pub fn initial_principal(&self) -> f64 {
        (1. - self.downpayment) * self.home_value
    }

    pub fn property_tax_yearly(&self) -> f64 {
        self.home_value * self.property_tax
    }

    pub fn loan_terms(&self) -> Result<LoanTerms> {
        if !(0. ..=1.).contains(&self.downpayment) {
            return Err(MortgageError::invalid_input(
                "downpayment",
                format!("{} is not a fraction between 0 and 1", self.downpayment),
            ));
        }
        let term_months = self.mortgage_term.checked_mul(12).ok_or_else(|| {
            MortgageError::invalid_input(
                "mortgage_term",
                format!("{} years is out of range", self.mortgage_term),
            )
        })?;
        LoanTerms::new(self.initial_principal(), self.mortgage_rate / 12., term_months)
    }

    pub fn tax_context(&self) -> TaxContext {
        TaxContext::new(self.marginal_tax_rate, self.property_tax_yearly(), self.policy)
    }
}

#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Summary {
    pub house_price: f64,
    pub downpayment_amount: f64,
    pub downpayment_fraction: f64,
    pub monthly_payment: f64,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            format_summary(
                self.house_price,
                self.downpayment_amount,
                self.downpayment_fraction,
                self.monthly_payment
            )
        )
    }
}

#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ScheduleRow {
    pub month: usize,
    pub interest: f64,
    pub principal_paid: f64,
    pub principal_evolution: f64,
    pub capital_gain: f64,
    pub total_wasted: f64,
    pub total_per_month: f64,
    pub tax_deduction: f64,
}

impl ScheduleRow {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        month: usize,
        interest: f64,
        principal_paid: f64,
        principal_evolution: f64,
        capital_gain: f64,
        total_wasted: f64,
        total_per_month: f64,
        tax_deduction: f64,
    ) -> Self {
        Self {
            month,
            interest,
            principal_paid,
            principal_evolution,
            capital_gain,
            total_wasted,
            total_per_month,
            tax_deduction,
        }
    }

    fn values(&self) -> [f64; 8] {
        [
            self.month as f64,
            self.interest,
            self.principal_paid,
            self.principal_evolution,
            self.capital_gain,
            self.total_wasted,
            self.total_per_month,
            self.tax_deduction,
        ]
    }
}

impl fmt::Display for ScheduleRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "month {}, interest ${:.2}, principal ${:.2}, balance ${:.2}, equity ${:.2}, wasted ${:.2}, total ${:.2}, deduction ${:.2}",
            self.month,
            self.interest,
            self.principal_paid,
            self.principal_evolution,
            self.capital_gain,
            self.total_wasted,
            self.total_per_month,
            self.tax_deduction
        )
    }
}

/// Which months to show: `[start_year, end_year)` every `frequency_year`.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct DisplayWindow {
    pub start_year: u32,
    pub end_year: u32,
    pub frequency_year: u32,
}

impl Default for DisplayWindow {
    fn default() -> Self {
        Self {
            start_year: 0,
            end_year: 7,
            frequency_year: 1,
        }
    }
}

impl DisplayWindow {
    pub fn new(start_year: u32, end_year: u32, frequency_year: u32) -> Result<Self> {
        if frequency_year == 0 {
            return Err(MortgageError::invalid_input(
                "display_frequency",
                "must be at least one year",
            ));
        }
        Ok(Self {
            start_year,
            end_year,
            frequency_year,
        })
    }

    /// Month indices selected out of a schedule of `len` months.
    pub fn months(&self, len: usize) -> Vec<usize> {
        let start = (self.start_year as usize * 12).min(len);
        let end = (self.end_year as usize * 12).min(len);
        let step = (self.frequency_year as usize * 12).max(1);
        (start..end).step_by(step).collect()
    }
}

#[derive(PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Schedule {
    pub summary: Summary,
    rows: Vec<ScheduleRow>,
}

impl Schedule {
    pub fn build(inputs: &MortgageInputs) -> Result<Self> {
        let terms = inputs.loan_terms()?;
        let payment = terms.monthly_payment();
        debug!(
            "principal {:.2}, monthly rate {}, {} months, payment {:.2}, final residual {:e}",
            terms.principal,
            terms.monthly_rate,
            terms.term_months,
            payment,
            terms.final_residual()
        );

        let tax_deduction = yearly_to_monthly(&inputs.tax_context().yearly_deduction(&terms)?);
        let property_tax_monthly = inputs.property_tax_yearly() / 12.;
        let balances = terms.outstanding_principal();
        let interest = terms.monthly_interest();
        let principal_paid = terms.monthly_principal_paid();

        let capital_gain: Vec<f64> = principal_paid
            .iter()
            .scan(0., |paid, p| {
                *paid += p;
                Some(*paid)
            })
            .collect();

        let rows: Vec<ScheduleRow> = (0..balances.len())
            .map(|m| {
                let wasted =
                    interest[m] + property_tax_monthly + inputs.insurance - tax_deduction[m];
                ScheduleRow::new(
                    m,
                    interest[m],
                    principal_paid[m],
                    balances[m],
                    capital_gain[m],
                    wasted,
                    wasted + principal_paid[m],
                    tax_deduction[m],
                )
            })
            .collect();

        let summary = Summary {
            house_price: inputs.home_value,
            downpayment_amount: inputs.downpayment_amount(),
            downpayment_fraction: inputs.downpayment,
            monthly_payment: payment,
        };
        info!(
            "built {} month schedule, monthly payment {:.2}",
            rows.len(),
            payment
        );
        Ok(Self { summary, rows })
    }

    pub fn rows(&self) -> &[ScheduleRow] {
        &self.rows
    }

    pub fn get_row(&self, month: usize) -> Option<&ScheduleRow> {
        self.rows.get(month)
    }

    pub fn window(&self, window: &DisplayWindow) -> Vec<&ScheduleRow> {
        window
            .months(self.rows.len())
            .into_iter()
            .map(|m| &self.rows[m])
            .collect()
    }

    /// One column per title in [`TITLES`], restricted to `window`.
    pub fn columns(&self, window: &DisplayWindow) -> Vec<Vec<f64>> {
        let rows = self.window(window);
        (0..TITLES.len())
            .map(|c| rows.iter().map(|row| row.values()[c]).collect())
            .collect()
    }

    pub fn render(&self, window: &DisplayWindow) -> String {
        format!(
            "{}\n{}",
            self.summary,
            format_table(&TITLES, &self.columns(window))
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tax::{yearly_deduction, PRINCIPAL_CAP, STANDARD_DEDUCTION};
    use approx::assert_relative_eq;
    use test_log::test;

    fn default_schedule() -> Schedule {
        Schedule::build(&MortgageInputs::new(1_000_000., 0.035, 0.3, 30)).unwrap()
    }

    #[test]
    fn test_inputs_derivations() {
        let inputs = MortgageInputs::new(1_000_000., 0.035, 0.3, 30);
        assert_relative_eq!(inputs.downpayment_amount(), 300_000.);
        assert_relative_eq!(inputs.initial_principal(), 700_000.);
        assert_relative_eq!(inputs.property_tax_yearly(), 13_000.);
        let terms = inputs.loan_terms().unwrap();
        assert_eq!(terms.term_months, 360);
        assert_relative_eq!(terms.monthly_rate, 0.035 / 12.);
    }

    #[test]
    fn test_schedule_summary() {
        let schedule = default_schedule();
        assert_eq!(schedule.rows().len(), 360);
        assert_eq!(schedule.summary.house_price, 1_000_000.);
        assert!((schedule.summary.monthly_payment - 3143.).abs() < 1.);
    }

    #[test]
    fn test_schedule_row_relations() {
        let schedule = default_schedule();
        let payment = schedule.summary.monthly_payment;
        let first = schedule.get_row(0).unwrap();
        assert_relative_eq!(first.principal_evolution, 700_000.);
        assert_relative_eq!(first.capital_gain, first.principal_paid);
        assert_relative_eq!(first.interest + first.principal_paid, payment, max_relative = 1e-12);
        for row in schedule.rows() {
            assert_relative_eq!(
                row.total_per_month,
                row.total_wasted + row.principal_paid,
                max_relative = 1e-12
            );
            assert_relative_eq!(
                row.total_wasted,
                row.interest + 13_000. / 12. + 120. - row.tax_deduction,
                max_relative = 1e-9
            );
        }
        let last = schedule.rows().last().unwrap();
        assert_relative_eq!(last.capital_gain, 700_000., max_relative = 1e-6);
    }

    #[test]
    fn test_schedule_tax_deduction_column() {
        let schedule = default_schedule();
        let yearly = yearly_deduction(
            0.32,
            700_000.,
            0.035 / 12.,
            360,
            13_000.,
            STANDARD_DEDUCTION,
            PRINCIPAL_CAP,
        )
        .unwrap();
        for (m, row) in schedule.rows().iter().enumerate() {
            assert_relative_eq!(row.tax_deduction, yearly[m / 12] / 12., max_relative = 1e-9);
        }
    }

    #[test]
    fn test_display_window_default() {
        let window = DisplayWindow::default();
        assert_eq!(window.months(360), vec![0, 12, 24, 36, 48, 60, 72]);
    }

    #[test]
    fn test_display_window_clipped_and_empty() {
        let window = DisplayWindow::new(25, 40, 2).unwrap();
        assert_eq!(window.months(360), vec![300, 324, 348]);
        assert!(DisplayWindow::new(5, 3, 1).unwrap().months(360).is_empty());
        assert!(DisplayWindow::new(0, 7, 0).is_err());
    }

    #[test]
    fn test_columns_follow_titles() {
        let schedule = default_schedule();
        let columns = schedule.columns(&DisplayWindow::default());
        assert_eq!(columns.len(), TITLES.len());
        assert!(columns.iter().all(|c| c.len() == 7));
        assert_eq!(columns[0], vec![0., 12., 24., 36., 48., 60., 72.]);
        assert_relative_eq!(columns[3][0], 700_000.);
    }

    #[test]
    fn test_render() {
        let rendered = default_schedule().render(&DisplayWindow::default());
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "House price: 1,000,000");
        assert_eq!(lines[1], "Downpayment: 300,000 (30.0%)");
        assert_eq!(lines[2], "Monthly payment: 3,143");
        assert!(lines[3].chars().all(|c| c == '='));
        // three header lines, two rules, seven rows
        assert_eq!(lines.len(), 3 + 3 + 2 + 7);
        assert!(lines[4].starts_with("Month        | Monthly "));
    }

    #[test]
    fn test_invalid_inputs() {
        let mut inputs = MortgageInputs::new(1_000_000., 0.035, 1.5, 30);
        assert!(Schedule::build(&inputs).is_err());
        inputs.downpayment = 0.2;
        inputs.mortgage_term = 0;
        assert!(Schedule::build(&inputs).is_err());
    }

    #[test]
    fn test_full_downpayment_has_no_loan() {
        let schedule = Schedule::build(&MortgageInputs::new(500_000., 0.04, 1., 15)).unwrap();
        assert_eq!(schedule.summary.monthly_payment, 0.);
        assert!(schedule.rows().iter().all(|r| r.interest == 0. && r.principal_paid == 0.));
    }
}
