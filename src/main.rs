use clap::Parser;
use log::{debug, error};
use mortgage::schedule::{DEFAULT_INSURANCE, DEFAULT_MARGINAL_TAX_RATE, DEFAULT_PROPERTY_TAX};
use mortgage::tax::{PRINCIPAL_CAP, STANDARD_DEDUCTION};
use mortgage::{DisplayWindow, MortgageInputs, Schedule, TaxPolicy};
use simple_logger::SimpleLogger;
use std::process::ExitCode;

/// Monthly amortization table for a fixed-rate mortgage.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    #[arg(short = 'v', long = "home_value")]
    home_value: u64,

    /// Annual mortgage rate. Example: 0.035 for 3.5 percent
    #[arg(short = 'r', long = "mortgage_rate")]
    mortgage_rate: f64,

    /// Downpayment percentage. Example: 0.3 for 30 percent
    #[arg(long = "downpayment")]
    downpayment: f64,

    /// Term of mortgage in years.
    #[arg(long = "mortgage_term")]
    mortgage_term: u32,

    /// Annual property tax rate.
    #[arg(long = "property_tax", default_value_t = DEFAULT_PROPERTY_TAX)]
    property_tax: f64,

    /// Highest tax rate for federal taxes (as opposed to effective tax rate).
    #[arg(long = "marginal_tax_rate", default_value_t = DEFAULT_MARGINAL_TAX_RATE)]
    marginal_tax_rate: f64,

    /// Homeowner insurance, monthly.
    #[arg(long = "insurance", default_value_t = DEFAULT_INSURANCE)]
    insurance: f64,

    /// In years.
    #[arg(long = "display_period_start", default_value_t = 0)]
    display_period_start: u32,

    /// In years.
    #[arg(long = "display_period_end", default_value_t = 7)]
    display_period_end: u32,

    /// In years.
    #[arg(long = "display_frequency", default_value_t = 1)]
    display_frequency: u32,

    #[arg(long = "standard_deduction", default_value_t = STANDARD_DEDUCTION)]
    standard_deduction: f64,

    /// Largest principal whose interest is deductible.
    #[arg(long = "principal_cap", default_value_t = PRINCIPAL_CAP)]
    principal_cap: f64,

    /// Log debug output (RUST_LOG also works).
    #[arg(long)]
    verbose: bool,
}

impl Args {
    fn inputs(&self) -> MortgageInputs {
        MortgageInputs {
            property_tax: self.property_tax,
            marginal_tax_rate: self.marginal_tax_rate,
            insurance: self.insurance,
            policy: TaxPolicy {
                standard_deduction: self.standard_deduction,
                principal_cap: self.principal_cap,
            },
            ..MortgageInputs::new(
                self.home_value as f64,
                self.mortgage_rate,
                self.downpayment,
                self.mortgage_term,
            )
        }
    }
}

fn run(args: &Args) -> mortgage::Result<String> {
    let window = DisplayWindow::new(
        args.display_period_start,
        args.display_period_end,
        args.display_frequency,
    )?;
    let schedule = Schedule::build(&args.inputs())?;
    for row in schedule.window(&window) {
        debug!("{}", row);
    }
    Ok(schedule.render(&window))
}

fn main() -> ExitCode {
    let args = Args::parse();
    let level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    SimpleLogger::new().with_level(level).env().init().unwrap();

    match run(&args) {
        Ok(table) => {
            println!("{}", table);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
