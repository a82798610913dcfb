use std::path::PathBuf;

use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;

mod access;
mod chat;
mod db;
mod error;
mod insights;
mod models;
mod query;
mod reminders;
mod report;
mod revenue;

use models::{ChatContext, PaymentMethod, UserRole};

#[derive(Parser)]
#[command(name = "fee-insights")]
#[command(about = "Fee reminder and insight engine for multi-tenant institutes", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or upgrade the database schema
    InitDb,
    /// Load realistic seed data
    Seed,
    /// Import students from a CSV file
    Import {
        #[arg(long)]
        csv: PathBuf,
    },
    /// Show dashboard insights for the current roster
    Insights {
        #[arg(long)]
        tenant: Option<String>,
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Build the reminder schedule for the current roster
    Reminders {
        #[arg(long)]
        tenant: Option<String>,
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Estimate end-of-period collectible revenue
    Predict {
        #[arg(long)]
        tenant: Option<String>,
    },
    /// Answer a free-text report question against the roster
    Query {
        text: String,
        #[arg(long)]
        tenant: Option<String>,
    },
    /// Answer a chat message for a given user
    Chat {
        text: String,
        #[arg(long, value_enum)]
        role: UserRole,
        #[arg(long, default_value = "there")]
        name: String,
    },
    /// Check whether a role may enter a route
    CheckRoute {
        #[arg(long, value_enum)]
        role: UserRole,
        #[arg(long)]
        route: String,
    },
    /// Record a completed payment against a student
    RecordPayment {
        #[arg(long)]
        email: String,
        #[arg(long)]
        amount: i64,
        #[arg(long, value_enum)]
        method: PaymentMethod,
    },
    /// Generate a markdown collection report
    Report {
        #[arg(long)]
        tenant: Option<String>,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    // chat and route checks are pure; no database needed
    match cli.command {
        Commands::Chat { text, role, name } => {
            let reply = chat::resolve_chat(&text, &ChatContext { role, name });
            println!("{reply}");
            return Ok(());
        }
        Commands::CheckRoute { role, route } => {
            if access::can_access_route(role, &route) {
                println!("allow: {role} may enter {route}");
            } else {
                println!("deny: {role} may not enter {route}");
            }
            return Ok(());
        }
        command => {
            let database_url = std::env::var("DATABASE_URL")
                .context("DATABASE_URL must be set to a Postgres instance")?;

            let pool = PgPoolOptions::new()
                .max_connections(5)
                .connect(&database_url)
                .await
                .context("failed to connect to Postgres")?;

            let today = Utc::now().date_naive();

            match command {
                Commands::Chat { .. } | Commands::CheckRoute { .. } => unreachable!(),
                Commands::InitDb => {
                    db::init_db(&pool).await?;
                    println!("Schema ready.");
                }
                Commands::Seed => {
                    db::seed(&pool).await?;
                    println!("Seed data inserted.");
                }
                Commands::Import { csv } => {
                    let inserted = db::import_csv(&pool, &csv).await?;
                    println!("Inserted {inserted} students from {}.", csv.display());
                }
                Commands::Insights { tenant, json } => {
                    let students = db::fetch_students(&pool, tenant.as_deref()).await?;
                    let insights = insights::generate_insights(&students, today);

                    if json {
                        println!("{}", serde_json::to_string_pretty(&insights)?);
                    } else if insights.is_empty() {
                        println!("Nothing needs attention right now.");
                    } else {
                        for insight in insights {
                            println!(
                                "[{:?}/{:?}] {}",
                                insight.kind, insight.priority, insight.message
                            );
                        }
                    }
                }
                Commands::Reminders { tenant, json } => {
                    let students = db::fetch_students(&pool, tenant.as_deref()).await?;
                    let schedule = reminders::build_reminder_schedule(&students, today);

                    if json {
                        println!("{}", serde_json::to_string_pretty(&schedule)?);
                    } else if schedule.is_empty() {
                        println!("No reminders queued for this roster.");
                    } else {
                        for entry in schedule {
                            println!(
                                "- {} via {} on {}: {}",
                                entry.student_name,
                                entry.channel.as_str(),
                                entry.scheduled_on,
                                entry.message
                            );
                        }
                    }
                }
                Commands::Predict { tenant } => {
                    let students = db::fetch_students(&pool, tenant.as_deref()).await?;
                    let predicted = revenue::predict_monthly_revenue(&students);
                    println!(
                        "Predicted collection by period end: {}",
                        models::format_amount(predicted.round() as i64)
                    );
                }
                Commands::Query { text, tenant } => {
                    let students = db::fetch_students(&pool, tenant.as_deref()).await?;
                    println!("{}", query::resolve_query(&text, &students));
                }
                Commands::RecordPayment {
                    email,
                    amount,
                    method,
                } => {
                    let payment = db::record_payment(&pool, &email, amount, method).await?;
                    println!(
                        "Recorded {} from {} via {} (payment {}).",
                        models::format_amount(payment.amount),
                        email,
                        payment.method.as_str(),
                        payment.id
                    );
                }
                Commands::Report { tenant, out } => {
                    let students = db::fetch_students(&pool, tenant.as_deref()).await?;
                    let report = report::build_report(tenant.as_deref(), today, &students);
                    std::fs::write(&out, report)?;
                    println!("Report written to {}.", out.display());
                }
            }
        }
    }

    Ok(())
}
