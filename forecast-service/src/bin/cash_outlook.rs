//! Cash Outlook CLI
//!
//! Runs the forecasting operations against the ledger database and prints
//! the JSON envelope the HTTP wrapper would return.
//!
//! Usage:
//!   cargo run --bin cash_outlook -- incoming-cash --week-start 2026-08-24 --week-end 2026-08-28
//!   cargo run --bin cash_outlook -- expected-invoices --week-start 2026-08-24 --week-end 2026-08-28
//!   cargo run --bin cash_outlook -- payroll --start-date 2026-08-01 --end-date 2026-08-31

use clap::{Parser, Subcommand};
use forecast_service::{
    Envelope, ForecastConfig, ForecastService, IncomingCashArgs, InvoicePlanArgs, PayrollArgs,
};
use ledger_store::{LedgerPool, PgLedgerStore};
use serde::Serialize;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "cash_outlook")]
#[command(about = "Cash collection forecasts and payroll allocation from the ledger")]
struct Cli {
    /// Ledger database connection URL
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Blended incoming-cash forecast for one week
    IncomingCash {
        #[arg(long)]
        week_start: String,
        #[arg(long)]
        week_end: String,
        #[arg(long)]
        as_of_date: Option<String>,
        /// Skip the invoice read and forecast from AR aging alone
        #[arg(long)]
        no_invoices: bool,
    },
    /// Exact invoice-driven projection with late-payment cure
    ExpectedInvoices {
        #[arg(long)]
        week_start: String,
        #[arg(long)]
        week_end: String,
        #[arg(long)]
        as_of_date: Option<String>,
        /// Leave overdue aging buckets out of the projection
        #[arg(long)]
        skip_late: bool,
    },
    /// Customer payroll rollup across the three cost ledgers
    Payroll {
        #[arg(long)]
        start_date: String,
        #[arg(long)]
        end_date: String,
        /// Leave contractor cost out of the rollup
        #[arg(long)]
        no_contractors: bool,
    },
}

fn print_envelope<T: Serialize>(envelope: &Envelope<T>) -> anyhow::Result<bool> {
    println!("{}", serde_json::to_string_pretty(envelope)?);
    Ok(envelope.is_ok())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = ForecastConfig::from_env()?;

    let pool = LedgerPool::connect(&cli.database_url).await?;
    info!("Connected to ledger database");

    let store = PgLedgerStore::new(pool.clone(), config.query_timeout());
    let service = ForecastService::new(store, config);

    let ok = match cli.command {
        Command::IncomingCash {
            week_start,
            week_end,
            as_of_date,
            no_invoices,
        } => {
            let args = IncomingCashArgs {
                week_start,
                week_end,
                as_of_date,
                use_invoices: Some(!no_invoices),
            };
            print_envelope(&Envelope::from(service.incoming_cash_this_week(&args).await))?
        }
        Command::ExpectedInvoices {
            week_start,
            week_end,
            as_of_date,
            skip_late,
        } => {
            let args = InvoicePlanArgs {
                week_start,
                week_end,
                include_late: Some(!skip_late),
                as_of_date,
            };
            print_envelope(&Envelope::from(
                service.expected_cash_from_invoicing(&args).await,
            ))?
        }
        Command::Payroll {
            start_date,
            end_date,
            no_contractors,
        } => {
            let args = PayrollArgs {
                start_date,
                end_date,
                include_contractors: Some(!no_contractors),
            };
            print_envelope(&Envelope::from(service.payroll_by_customer(&args).await))?
        }
    };

    pool.close().await;

    if !ok {
        std::process::exit(1);
    }
    Ok(())
}
