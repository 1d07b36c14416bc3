use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use expense_client::{
    Client, Controller, ExpenseFilters, SummaryRange, Tab,
    config::{self, Overrides},
    error::{AppError, Result},
    view,
};

#[derive(Debug, Parser)]
#[command(name = "expense_cli", about = "Command line front end for the expense tracker")]
struct Cli {
    /// Optional config file path (TOML).
    #[arg(long, global = true)]
    config: Option<String>,
    /// Override base URL (e.g. http://127.0.0.1:3001).
    #[arg(long, global = true)]
    base_url: Option<String>,
    /// Override log level.
    #[arg(long, global = true)]
    level: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show one page of expenses.
    List {
        #[arg(long, default_value_t = 1)]
        page: u64,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        from: Option<NaiveDate>,
        #[arg(long)]
        to: Option<NaiveDate>,
    },
    /// Record a new expense.
    Add {
        #[arg(long)]
        amount: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        category: String,
        /// Defaults to today.
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Replace the fields of an expense shown on `page`.
    Edit {
        id: i32,
        #[arg(long, default_value_t = 1)]
        page: u64,
        #[arg(long)]
        amount: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Delete an expense shown on `page`.
    Delete {
        id: i32,
        #[arg(long, default_value_t = 1)]
        page: u64,
    },
    /// Per-category totals, optionally within a date range.
    Summary {
        #[arg(long, requires = "to")]
        from: Option<NaiveDate>,
        #[arg(long, requires = "from")]
        to: Option<NaiveDate>,
    },
    /// List category labels.
    Categories,
    /// Total of every recorded expense.
    Total,
    /// API and database status.
    Health,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = config::load(Overrides {
        config: cli.config,
        base_url: cli.base_url,
        level: cli.level,
    })?;

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(format!("expense_client={}", settings.level))
        .init();

    let client = Client::new(&settings.base_url)?;
    if let Command::Health = cli.command {
        let health = client.health().await?;
        println!("{} (database: {})", health.status, health.database);
        return Ok(());
    }

    let mut controller = Controller::new(client);
    controller.init().await;

    match cli.command {
        Command::List {
            page,
            category,
            from,
            to,
        } => {
            let filters = ExpenseFilters {
                category,
                start_date: from,
                end_date: to,
            };
            if filters.is_active() {
                controller.apply_filters(filters).await;
            }
            if page != 1 && !controller.go_to_page(page).await {
                return Err(AppError::Input(format!("page {page} is out of range")));
            }
            print_list(&controller);
        }
        Command::Add {
            amount,
            description,
            category,
            date,
        } => {
            let mut form = controller.state().form.clone();
            form.amount = amount;
            form.description = description;
            form.category = category;
            if let Some(date) = date {
                form.date = date.format("%Y-%m-%d").to_string();
            }
            controller.set_form(form);
            controller.submit().await.map_err(report)?;
            print_list(&controller);
        }
        Command::Edit {
            id,
            page,
            amount,
            description,
            category,
            date,
        } => {
            open_page(&mut controller, page).await?;
            if !controller.start_edit(id) {
                return Err(AppError::Input(format!("expense {id} is not on page {page}")));
            }
            let mut form = controller.state().form.clone();
            if let Some(amount) = amount {
                form.amount = amount;
            }
            if let Some(description) = description {
                form.description = description;
            }
            if let Some(category) = category {
                form.category = category;
            }
            if let Some(date) = date {
                form.date = date.format("%Y-%m-%d").to_string();
            }
            println!("{}", view::tab_labels(controller.state())[0].label);
            controller.set_form(form);
            controller.submit().await.map_err(report)?;
            print_list(&controller);
        }
        Command::Delete { id, page } => {
            open_page(&mut controller, page).await?;
            if !controller.request_delete(id) {
                return Err(AppError::Input(format!("expense {id} is not on page {page}")));
            }
            if let Some(confirm) = view::delete_confirmation(controller.state()) {
                println!("{}", confirm.title);
                println!(
                    "{}  {} | {} | {}",
                    confirm.description, confirm.category, confirm.date, confirm.amount
                );
                println!("{}", confirm.warning);
            }
            controller.confirm_delete().await.map_err(report)?;
            print_list(&controller);
        }
        Command::Summary { from, to } => {
            controller.select_tab(Tab::Summary);
            if from.is_some() || to.is_some() {
                controller
                    .apply_summary_range(SummaryRange {
                        start_date: from,
                        end_date: to,
                    })
                    .await;
            }
            print_summary(&controller);
        }
        Command::Categories => {
            for category in &controller.state().categories {
                println!("{category}");
            }
        }
        Command::Total => println!("{}", view::header_total(controller.state())),
        Command::Health => {}
    }

    Ok(())
}

async fn open_page(controller: &mut Controller, page: u64) -> Result<()> {
    if page != 1 && !controller.go_to_page(page).await {
        return Err(AppError::Input(format!("page {page} is out of range")));
    }
    Ok(())
}

fn report(err: expense_client::ClientError) -> AppError {
    if let expense_client::ClientError::Validation { details, .. } = &err {
        for detail in details {
            eprintln!("  - {detail}");
        }
    }
    AppError::Api(err)
}

fn print_list(controller: &Controller) {
    let state = controller.state();
    println!("{}", view::header_total(state));
    if let Some(message) = view::empty_list_message(state) {
        println!("{message}");
        return;
    }
    for row in view::expense_rows(state) {
        println!(
            "#{:<5} {:<10} {:<18} {:<30} {}",
            row.id, row.date, row.category, row.description, row.amount
        );
    }
    println!("{}", view::pagination(state).info);
}

fn print_summary(controller: &Controller) {
    let Some(summary) = view::summary(controller.state()) else {
        println!("{}", view::EMPTY_SUMMARY_MESSAGE);
        return;
    };
    println!("{}", summary.heading);
    println!("{}", summary.total);
    for row in summary.rows {
        println!(
            "{:<18} {:>16} {:>16} {:>7}",
            row.category, row.amount, row.count, row.percentage
        );
    }
}
