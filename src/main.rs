use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

mod analysis;
mod assessment;
mod error;
mod import;
mod markdown;
mod models;
mod report;
mod server;
mod signals;
mod store;

use models::{
    AccountInput, AccountTenure, ClientRiskInput, DeliveryDriftInput, FeedbackTone, OvertimeLevel,
    PaymentBehaviour, ProcessAdherence, ResponseTime, RetainerRealityInput, ScopeCreep,
    SeniorInvolvement, StakeholderAccess,
};
use store::{AnalysisStore, MemoryStore, PgStore};

#[derive(Parser)]
#[command(name = "agency-signals")]
#[command(about = "Weighted-signal diagnostics for agency client accounts", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or upgrade the database schema
    InitDb,
    /// Analyze a built-in sample account and store the result
    Seed,
    /// Run a diagnostic analysis on an account input JSON file
    Analyze {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Import flattened account observations from a CSV file
    Import {
        #[arg(long)]
        csv: PathBuf,
    },
    /// Write a stored report to a markdown file
    Report {
        #[arg(long)]
        id: Uuid,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
    /// List stored analyses
    List,
    /// Delete a stored analysis
    Delete {
        #[arg(long)]
        id: Uuid,
    },
    /// Remove every stored analysis
    Clear,
    /// Serve the HTTP API
    Serve {
        #[arg(long, default_value = "127.0.0.1:8080")]
        bind: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::InitDb => {
            let pool = connect().await?;
            PgStore::new(pool).migrate().await?;
            println!("Schema ready.");
        }
        Commands::Seed => {
            let store = open_store().await?;
            let result = analysis::create_analysis(&sample_account());
            store.save(&result).await?;
            println!(
                "Seeded analysis {} for {} (overall {}).",
                result.id,
                result.account_name,
                result.overall_assessment.level
            );
        }
        Commands::Analyze { input, out } => {
            let raw = std::fs::read_to_string(&input)
                .with_context(|| format!("failed to read {}", input.display()))?;
            let account: AccountInput = serde_json::from_str(&raw)
                .with_context(|| format!("{} is not a valid account input", input.display()))?;
            if let Err(violations) = account.validate() {
                for violation in &violations {
                    eprintln!("- {}: {}", violation.field, violation.message);
                }
                anyhow::bail!("account input failed validation");
            }

            let store = open_store().await?;
            let result = analysis::create_analysis(&account);
            store.save(&result).await?;

            println!("Analysis {} for {}:", result.id, result.account_name);
            for (name, signal) in [
                ("Retainer Reality", &result.retainer_reality_signal),
                ("Delivery Drift", &result.delivery_drift_signal),
                ("Client Risk", &result.client_risk_signal),
            ] {
                println!("- {name}: {} (score {})", signal.level, signal.score);
            }
            println!("- Overall: {}", result.overall_assessment.level);

            if let Some(out) = out {
                std::fs::write(&out, &result.markdown_report)?;
                println!("Report written to {}.", out.display());
            }
        }
        Commands::Import { csv } => {
            let store = open_store().await?;
            let inserted = import::import_csv(store.as_ref(), &csv).await?;
            println!("Analyzed {inserted} accounts from {}.", csv.display());
        }
        Commands::Report { id, out } => {
            let store = open_store().await?;
            let result = store
                .get(id)
                .await?
                .with_context(|| format!("no analysis found for id {id}"))?;
            std::fs::write(&out, &result.markdown_report)?;
            println!("Report written to {}.", out.display());
        }
        Commands::List => {
            let store = open_store().await?;
            let records = store.list().await?;
            if records.is_empty() {
                println!("No stored analyses.");
                return Ok(());
            }
            for record in records {
                println!(
                    "- {} {} ({}) overall {}",
                    record.id,
                    record.account_name,
                    record.analysis_date.format("%Y-%m-%d"),
                    record.overall_assessment.level
                );
            }
        }
        Commands::Delete { id } => {
            let store = open_store().await?;
            if store.delete(id).await? {
                println!("Deleted analysis {id}.");
            } else {
                println!("No analysis found for id {id}.");
            }
        }
        Commands::Clear => {
            let store = open_store().await?;
            store.clear().await?;
            println!("All stored analyses removed.");
        }
        Commands::Serve { bind } => {
            let store = open_store().await?;
            server::serve(store, &bind).await?;
        }
    }

    Ok(())
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .compact()
        .init();
}

async fn connect() -> anyhow::Result<sqlx::PgPool> {
    let database_url = std::env::var("DATABASE_URL")
        .context("DATABASE_URL must be set to a Postgres instance")?;
    PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .context("failed to connect to Postgres")
}

async fn open_store() -> anyhow::Result<Arc<dyn AnalysisStore>> {
    if std::env::var("DATABASE_URL").is_ok() {
        let pool = connect().await?;
        Ok(Arc::new(PgStore::new(pool)))
    } else {
        tracing::warn!("DATABASE_URL not set, analyses will not outlive this process");
        Ok(Arc::new(MemoryStore::new()))
    }
}

fn sample_account() -> AccountInput {
    AccountInput {
        account_name: "Meridian Collective".to_string(),
        client_industry: Some("Consumer goods".to_string()),
        retainer_monthly_value: Some(14_000.0),
        account_tenure: AccountTenure::Established,
        team_size: 5,
        notes: Some("Renewal conversation due next quarter".to_string()),
        retainer_reality: RetainerRealityInput {
            scoped_hours_per_month: 60.0,
            actual_hours_delivered: 78.0,
            senior_involvement_frequency: SeniorInvolvement::Frequently,
            scope_change_requests: 4,
            exception_handling_normalized: true,
        },
        delivery_drift: DeliveryDriftInput {
            planned_vs_reactive_ratio: 55.0,
            last_minute_requests_per_week: 4.0,
            missed_deadlines_last_3_months: 2,
            team_overtime: OvertimeLevel::Regular,
            process_adherence_level: ProcessAdherence::Moderate,
        },
        client_risk: ClientRiskInput {
            stakeholder_accessibility: StakeholderAccess::Limited,
            feedback_tone: FeedbackTone::Mixed,
            response_time_to_requests: ResponseTime::Slow,
            scope_creep_behaviour: ScopeCreep::Frequent,
            payment_behaviour: PaymentBehaviour::OnTime,
            recent_escalations: 1,
        },
    }
}
