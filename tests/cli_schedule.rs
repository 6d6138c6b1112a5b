use approx::assert_relative_eq;
use mortgage::amortization::{monthly_interest, outstanding_principal, yearly_interest};
use mortgage::tax::{mortgage_interest_deduction, yearly_to_monthly, PRINCIPAL_CAP};
use mortgage::{DisplayWindow, MortgageError, MortgageInputs, Schedule, TaxPolicy};
use test_log::test;

#[test]
fn test_default_scenario_table() {
    let schedule = Schedule::build(&MortgageInputs::new(1_000_000., 0.035, 0.3, 30)).unwrap();
    let rendered = schedule.render(&DisplayWindow::new(0, 30, 5).unwrap());
    let lines: Vec<&str> = rendered.lines().collect();

    assert_eq!(lines[2], "Monthly payment: 3,143");
    assert_eq!(
        lines[4],
        "Month        | Monthly      | Monthly      | Principal    | Capital gain | Total wasted | Total per    | Tax         "
    );
    assert_eq!(
        lines[5],
        "             | interest     | principal    | evolution    |              | per month    | month        | deduction   "
    );
    // months 0, 60, ..., 300
    let rows = &lines[8..];
    assert_eq!(rows.len(), 6);
    assert!(rows[0].starts_with("           0 |        2,042 |        1,102 |      700,000 |        1,102 |"));
    assert!(rows[5].starts_with("         300 |"));
}

#[test]
fn test_tax_deduction_tracks_capped_interest() {
    let rate = 0.04 / 12.;
    let mut inputs = MortgageInputs::new(1_500_000., 0.04, 0.2, 30);
    inputs.marginal_tax_rate = 0.35;
    let schedule = Schedule::build(&inputs).unwrap();

    let capped = mortgage_interest_deduction(1_200_000., rate, 360, PRINCIPAL_CAP).unwrap();
    assert_eq!(capped, yearly_interest(750_000., rate, 360).unwrap());

    let property_tax = 1_500_000. * 0.013;
    let expected: Vec<f64> = capped
        .iter()
        .map(|i| 0.35 * (i + property_tax - 24_400.).max(0.))
        .collect();
    let expected = yearly_to_monthly(&expected);
    for (row, deduction) in schedule.rows().iter().zip(expected.iter()) {
        assert_relative_eq!(row.tax_deduction, *deduction, max_relative = 1e-9);
    }
}

#[test]
fn test_alternate_policy_year() {
    let mut inputs = MortgageInputs::new(1_000_000., 0.035, 0.2, 30);
    let current = Schedule::build(&inputs).unwrap();
    inputs.policy = TaxPolicy {
        standard_deduction: 12_700.,
        principal_cap: 1_000_000.,
    };
    let older = Schedule::build(&inputs).unwrap();
    let first = |s: &Schedule| s.get_row(0).map(|r| r.tax_deduction).unwrap();
    assert!(first(&older) > first(&current));
}

#[test]
fn test_interest_matches_balance() {
    let rate = 0.05 / 12.;
    let balances = outstanding_principal(250_000., rate, 180).unwrap();
    let interest = monthly_interest(250_000., rate, 180).unwrap();
    assert_relative_eq!(interest[179], balances[179] * rate);
}

#[test]
fn test_partial_year_term_rejected() {
    let err = yearly_interest(700_000., 0.035 / 12., 30).unwrap_err();
    assert!(matches!(err, MortgageError::InvalidInput { .. }));
    assert!(err.to_string().starts_with("Invalid input: term_months"));
}
