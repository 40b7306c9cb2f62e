//! CLI entry and dispatch.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use fieldledger_core::config::Config;
use tracing_appender::non_blocking::WorkerGuard;

mod commands;

#[derive(Parser)]
#[command(name = "fieldledger")]
#[command(version)]
#[command(about = "Terminal client for the FieldLedger field-agent backend")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log filter, e.g. "debug" or "fieldledger_core=trace" (overrides FIELDLEDGER_LOG)
    #[arg(long, global = true, value_name = "FILTER")]
    log: Option<String>,

    /// Also write logs to this file, rotated daily
    #[arg(long, global = true, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Sign in to the backend and store the session
    Login {
        /// Employee e-mail (prompted for when omitted)
        #[arg(long)]
        email: Option<String>,

        /// Password (prompted for when omitted)
        #[arg(long)]
        password: Option<String>,
    },

    /// Clear the stored session
    Logout,

    /// Show the stored session
    Whoami {
        /// Revalidate the token against the backend
        #[arg(long)]
        verify: bool,
    },

    /// Show the dashboard snapshot
    Dashboard {
        /// Restrict stats to one employee
        #[arg(long, value_name = "ID")]
        employee: Option<u64>,

        /// Show per-day totals instead of the full snapshot
        #[arg(long)]
        daily: bool,

        /// Day for --daily (YYYY-MM-DD, defaults to today)
        #[arg(long, value_name = "DATE")]
        date: Option<String>,
    },

    /// Manage field agents
    Agents {
        #[command(subcommand)]
        command: AgentCommands,
    },

    /// Manage debtors
    Debtors {
        #[command(subcommand)]
        command: DebtorCommands,
    },

    /// Manage daily transactions
    Transactions {
        #[command(subcommand)]
        command: TransactionCommands,
    },

    /// Manage commissions
    Commissions {
        #[command(subcommand)]
        command: CommissionCommands,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum AgentCommands {
    /// List agents with their latest derived balances
    List {
        /// Case-insensitive filter over name, phone and type
        #[arg(long)]
        search: Option<String>,

        /// Restrict to one employee's agents
        #[arg(long, value_name = "ID")]
        employee: Option<u64>,
    },
    /// Register a new agent
    Create {
        /// Agent name
        #[arg(long)]
        name: String,

        /// Phone number
        #[arg(long, default_value = "")]
        phone: String,

        /// Business line label
        #[arg(long = "type", value_name = "TYPE", default_value = "mobile_money")]
        type_of_agent: String,

        /// Opening float balance
        #[arg(long, default_value_t = 0)]
        opening_balance: i64,
    },
    /// Show an agent's latest balance pair derived from its transactions
    Balance {
        /// The agent to inspect
        #[arg(value_name = "AGENT_ID")]
        id: u64,
    },
}

#[derive(clap::Subcommand)]
enum DebtorCommands {
    /// List debtors with severity tiers
    List {
        /// Case-insensitive filter over name, phone and agent
        #[arg(long)]
        search: Option<String>,

        /// Sort order: amount, name, or created (default from config)
        #[arg(long, value_name = "KEY")]
        sort: Option<String>,
    },
    /// Register a new debtor
    Create {
        /// Debtor name
        #[arg(long)]
        name: String,

        /// Phone number
        #[arg(long, default_value = "")]
        phone: String,

        /// Outstanding amount owed
        #[arg(long)]
        balance_due: i64,

        /// Agent the debt is attributed to
        #[arg(long, value_name = "NAME")]
        agent: Option<String>,
    },
    /// Record a repayment against a debtor
    Pay {
        /// The debtor being paid
        #[arg(value_name = "DEBTOR_ID")]
        id: u64,

        /// Repayment amount
        #[arg(long)]
        amount: i64,

        /// Optional note for the payment
        #[arg(long)]
        notes: Option<String>,
    },
}

#[derive(clap::Subcommand)]
enum TransactionCommands {
    /// List transactions
    List {
        /// Restrict to one agent
        #[arg(long, value_name = "ID")]
        agent: Option<u64>,
    },
    /// Record a day's opening/closing balances for an agent
    Create {
        /// The agent the entry belongs to
        #[arg(long, value_name = "ID")]
        agent: u64,

        /// Opening balance for the day
        #[arg(long)]
        opening_balance: i64,

        /// Closing balance for the day
        #[arg(long)]
        closing_balance: i64,

        /// Optional note
        #[arg(long)]
        notes: Option<String>,

        /// Transaction day (YYYY-MM-DD, defaults to today)
        #[arg(long, value_name = "DATE")]
        date: Option<String>,
    },
}

#[derive(clap::Subcommand)]
enum CommissionCommands {
    /// List commissions, optionally for one month
    List {
        /// Month filter (1-12)
        #[arg(long)]
        month: Option<u32>,

        /// Year filter, e.g. 2026
        #[arg(long)]
        year: Option<i32>,
    },
    /// Record a commission for an agent
    Create {
        /// The agent earning the commission
        #[arg(long, value_name = "ID")]
        agent: u64,

        /// Commission amount
        #[arg(long)]
        amount: i64,

        /// What the commission is for
        #[arg(long)]
        description: Option<String>,

        /// Commission day (YYYY-MM-DD, defaults to today)
        #[arg(long, value_name = "DATE")]
        date: Option<String>,
    },
    /// Change a commission's amount or description
    Update {
        /// The commission to update
        #[arg(value_name = "COMMISSION_ID")]
        id: u64,

        /// New amount
        #[arg(long)]
        amount: Option<i64>,

        /// New description
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete a commission
    Delete {
        /// The commission to delete
        #[arg(value_name = "COMMISSION_ID")]
        id: u64,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let _log_guard = setup_logging(cli.log.as_deref(), cli.log_file.as_deref());

    // one tokio runtime for everything
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;

    rt.block_on(async move { dispatch(cli).await })
}

async fn dispatch(cli: Cli) -> Result<()> {
    let config = Config::load().context("load config")?;

    match cli.command {
        Commands::Login { email, password } => {
            commands::auth::login(&config, email.as_deref(), password.as_deref()).await
        }
        Commands::Logout => commands::auth::logout(),
        Commands::Whoami { verify } => commands::auth::whoami(&config, verify).await,

        Commands::Dashboard {
            employee,
            daily,
            date,
        } => {
            if daily {
                commands::dashboard::daily(&config, date.as_deref()).await
            } else {
                commands::dashboard::show(&config, employee).await
            }
        }

        Commands::Agents { command } => match command {
            AgentCommands::List { search, employee } => {
                commands::agents::list(&config, search.as_deref(), employee).await
            }
            AgentCommands::Create {
                name,
                phone,
                type_of_agent,
                opening_balance,
            } => {
                commands::agents::create(&config, &name, &phone, &type_of_agent, opening_balance)
                    .await
            }
            AgentCommands::Balance { id } => commands::agents::balance(&config, id).await,
        },

        Commands::Debtors { command } => match command {
            DebtorCommands::List { search, sort } => {
                commands::debtors::list(&config, search.as_deref(), sort.as_deref()).await
            }
            DebtorCommands::Create {
                name,
                phone,
                balance_due,
                agent,
            } => {
                commands::debtors::create(&config, &name, &phone, balance_due, agent.as_deref())
                    .await
            }
            DebtorCommands::Pay { id, amount, notes } => {
                commands::debtors::pay(&config, id, amount, notes.as_deref()).await
            }
        },

        Commands::Transactions { command } => match command {
            TransactionCommands::List { agent } => {
                commands::transactions::list(&config, agent).await
            }
            TransactionCommands::Create {
                agent,
                opening_balance,
                closing_balance,
                notes,
                date,
            } => {
                commands::transactions::create(
                    &config,
                    agent,
                    opening_balance,
                    closing_balance,
                    notes.as_deref(),
                    date.as_deref(),
                )
                .await
            }
        },

        Commands::Commissions { command } => match command {
            CommissionCommands::List { month, year } => {
                commands::commissions::list(&config, month, year).await
            }
            CommissionCommands::Create {
                agent,
                amount,
                description,
                date,
            } => {
                commands::commissions::create(
                    &config,
                    agent,
                    amount,
                    description.as_deref(),
                    date.as_deref(),
                )
                .await
            }
            CommissionCommands::Update {
                id,
                amount,
                description,
            } => commands::commissions::update(&config, id, amount, description).await,
            CommissionCommands::Delete { id } => commands::commissions::delete(&config, id).await,
        },

        Commands::Config { command } => match command {
            ConfigCommands::Path => commands::config::path(),
            ConfigCommands::Init => commands::config::init(),
        },
    }
}

/// Initializes tracing on stderr, plus an optional daily-rotated log file.
///
/// Filter precedence: --log flag > FIELDLEDGER_LOG env var > "warn".
/// The returned guard must stay alive for the file writer to flush.
fn setup_logging(filter: Option<&str>, log_file: Option<&Path>) -> Option<WorkerGuard> {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match filter {
        Some(directives) => EnvFilter::new(directives),
        None => EnvFilter::try_from_env("FIELDLEDGER_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
    };

    let stderr_layer = fmt::layer().compact().with_writer(std::io::stderr);

    if let Some(path) = log_file {
        let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
        let dir = dir.unwrap_or_else(|| Path::new("."));
        let filename = path
            .file_name()
            .map_or_else(|| std::ffi::OsString::from("fieldledger.log"), std::ffi::OsStr::to_os_string);

        if let Err(err) = std::fs::create_dir_all(dir) {
            eprintln!(
                "warning: could not create log directory {}: {err}; logging to stderr only",
                dir.display()
            );
            tracing_subscriber::registry()
                .with(filter)
                .with(stderr_layer)
                .init();
            return None;
        }

        let appender = tracing_appender::rolling::daily(dir, filename);
        let (non_blocking, guard) = tracing_appender::non_blocking(appender);
        tracing_subscriber::registry()
            .with(filter)
            .with(stderr_layer)
            .with(fmt::layer().with_ansi(false).with_writer(non_blocking))
            .init();
        Some(guard)
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(stderr_layer)
            .init();
        None
    }
}
