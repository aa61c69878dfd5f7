//! OrderDesk CLI - front desk for employee credentials and table orders

mod hooks;
mod logging;
mod output;
mod settings;

use anyhow::{anyhow, bail, Context, Result};
use chrono::NaiveDateTime;
use clap::{Parser, Subcommand};
use colored::Colorize;
use orderdesk_core::application::constants::DEFAULT_RECENT_ORDER_LIMIT;
use orderdesk_core::application::{ConnectionManager, FrontDesk};
use orderdesk_core::domain::order::parse_timestamp;
use orderdesk_core::domain::{NewCredential, NewOrder, OrderId, OrderStatus};
use orderdesk_core::port::{CredentialRepository, OrderRepository};
use orderdesk_core::ErrorKind;
use orderdesk_infra_crypto::Argon2PasswordHasher;
use orderdesk_infra_sqlite::{SqliteConnector, SqliteCredentialRepository, SqliteOrderRepository};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use crate::hooks::{ExitProcessHandler, LogNotifier};

#[derive(Parser)]
#[command(name = "orderdesk")]
#[command(about = "OrderDesk restaurant order store", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (TOML)
    #[arg(long, global = true, default_value = settings::DEFAULT_CONFIG_FILE)]
    config: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the credential and order tables
    Init,

    /// Manage employee credentials
    #[command(subcommand)]
    Employee(EmployeeCommand),

    /// Manage table orders
    #[command(subcommand)]
    Order(OrderCommand),
}

#[derive(Subcommand)]
enum EmployeeCommand {
    /// Register a new employee
    Add {
        #[arg(short, long)]
        username: String,

        #[arg(short, long)]
        email: String,

        /// Secret to hash and store
        #[arg(short, long, env = "ORDERDESK_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Check a username/secret pair
    Login {
        #[arg(short, long)]
        username: String,

        #[arg(short, long, env = "ORDERDESK_PASSWORD", hide_env_values = true)]
        password: String,
    },
}

#[derive(Subcommand)]
enum OrderCommand {
    /// Record a new order
    Add {
        /// Table number (positive)
        #[arg(short, long)]
        table: i32,

        /// Initial status (e.g. "in progress")
        #[arg(short, long, default_value = OrderStatus::IN_PROGRESS)]
        status: String,

        /// Placement time, `YYYY-MM-DD HH:MM:SS` (default: now)
        #[arg(long, value_parser = parse_at)]
        at: Option<NaiveDateTime>,
    },

    /// Change the status of an existing order
    Status {
        id: OrderId,
        status: String,
    },

    /// Show the most recent orders, newest first
    Recent {
        #[arg(short = 'n', long, default_value_t = DEFAULT_RECENT_ORDER_LIMIT)]
        limit: u32,
    },

    /// Show every order, oldest first
    List,

    /// Export every order as CSV
    Export {
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn parse_at(raw: &str) -> std::result::Result<NaiveDateTime, String> {
    parse_timestamp(raw).ok_or_else(|| format!("invalid timestamp: {}", raw))
}

/// Reduce a facade failure to an anyhow error for the exit path
fn failed(operation: &str, kind: ErrorKind) -> anyhow::Error {
    anyhow!("{} failed ({})", operation, kind)
}

struct Stores {
    credentials: Arc<SqliteCredentialRepository>,
    orders: Arc<SqliteOrderRepository>,
}

async fn open_stores(cli: &Cli) -> Result<Stores> {
    let store = settings::load(&cli.config)?;
    let policy = store.connection.policy()?;

    info!(database_url = %store.database_url, "Opening store...");

    let connector = SqliteConnector::new(&store.database_url)?;
    let manager = Arc::new(ConnectionManager::new(
        connector,
        policy,
        Arc::new(ExitProcessHandler),
    ));
    manager.ensure_connected().await;

    let hasher = Arc::new(Argon2PasswordHasher::new());
    let credentials = Arc::new(SqliteCredentialRepository::bootstrap(manager.clone(), hasher).await);
    let orders = Arc::new(SqliteOrderRepository::bootstrap(manager).await);

    Ok(Stores {
        credentials,
        orders,
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init()?;

    let cli = Cli::parse();
    let stores = open_stores(&cli).await?;
    let desk = FrontDesk::new(
        stores.credentials.clone(),
        stores.orders.clone(),
        Arc::new(LogNotifier),
    );

    match cli.command {
        Commands::Init => {
            stores
                .credentials
                .initialize_schema()
                .await
                .context("Failed to create credential table")?;
            stores
                .orders
                .initialize_schema()
                .await
                .context("Failed to create order table")?;

            println!("{}", "✓ Store initialized".green().bold());
        }

        Commands::Employee(EmployeeCommand::Add {
            username,
            email,
            password,
        }) => {
            let record = NewCredential::new(username.clone(), password, email);
            let id = desk
                .insert_credential(&record)
                .await
                .map_err(|kind| failed("employee add", kind))?;

            println!(
                "{}",
                format!("✓ Employee {} registered (id {})", username, id)
                    .green()
                    .bold()
            );
        }

        Commands::Employee(EmployeeCommand::Login { username, password }) => {
            let ok = desk
                .authenticate(&username, &password)
                .await
                .map_err(|kind| failed("employee login", kind))?;

            if !ok {
                println!("{}", "✗ Invalid username or password".red().bold());
                bail!("authentication rejected for {}", username);
            }
            println!("{}", format!("✓ Welcome, {}", username).green().bold());
        }

        Commands::Order(OrderCommand::Add { table, status, at }) => {
            let timestamp = at.unwrap_or_else(|| chrono::Local::now().naive_local());
            let order = NewOrder::new(table, OrderStatus::new(status), timestamp);
            let id = desk
                .insert_order(&order)
                .await
                .map_err(|kind| failed("order add", kind))?;

            println!(
                "{} {} {}",
                format!("✓ Order {} recorded for table {}:", id, table)
                    .green()
                    .bold(),
                output::status_badge(&order.status),
                timestamp.format("%Y-%m-%d %H:%M:%S")
            );
        }

        Commands::Order(OrderCommand::Status { id, status }) => {
            let status = OrderStatus::new(status);
            desk.update_order_status(id, &status)
                .await
                .map_err(|kind| failed("order status", kind))?;

            println!(
                "{} {}",
                format!("✓ Order {} is now", id).green().bold(),
                output::status_badge(&status)
            );
        }

        Commands::Order(OrderCommand::Recent { limit }) => {
            let orders = desk
                .fetch_recent_orders(limit)
                .await
                .map_err(|kind| failed("order recent", kind))?;

            if orders.is_empty() {
                println!("{}", "No orders yet".yellow());
            } else {
                println!("{}", output::order_table(&orders));
            }
        }

        Commands::Order(OrderCommand::List) => {
            let orders = desk
                .fetch_all_orders()
                .await
                .map_err(|kind| failed("order list", kind))?;

            if orders.is_empty() {
                println!("{}", "No orders yet".yellow());
            } else {
                println!("{}", output::order_table(&orders));
            }
        }

        Commands::Order(OrderCommand::Export { output }) => {
            let csv = desk
                .export_orders_csv()
                .await
                .map_err(|kind| failed("order export", kind))?;

            match output {
                Some(path) => {
                    std::fs::write(&path, csv)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    println!(
                        "{}",
                        format!("✓ Orders exported to {}", path.display())
                            .green()
                            .bold()
                    );
                }
                None => print!("{}", csv),
            }
        }
    }

    Ok(())
}
