use std::io::Write;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    style::Print,
    terminal,
    terminal::ClearType,
};
use futures_util::StreamExt;
use uuid::Uuid;

use api_types::{
    expense::{ExpenseListResponse, ExpenseNew},
    settings::{SettingsUpdate, SettingsView},
    summary::SummaryView,
};
use engine::{AmountMinor, Category, Expense, UserSettings};

use crate::{
    client::{Client, Credentials, sse_data},
    error::{AppError, Result},
    session::SessionGate,
};

mod client;
mod config;
mod error;
mod local_state;
mod session;

#[derive(Parser, Debug)]
#[command(name = "khata_cli")]
#[command(about = "Headless client for the Khata expense tracker")]
struct Cli {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override base URL (e.g. http://127.0.0.1:3000).
    #[arg(long)]
    base_url: Option<String>,
    /// Override username (password is never read from argv).
    #[arg(long)]
    username: Option<String>,
    /// Override timezone (IANA name) used to pick "today".
    #[arg(long)]
    timezone: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create an account.
    Signup,
    /// Check credentials; with --remember, keep the username for later runs.
    Login {
        #[arg(long)]
        remember: bool,
    },
    /// Forget the remembered username.
    Logout,
    /// Record an expense.
    Add {
        #[arg(long)]
        title: String,
        /// One of: food_dining, transportation, health_fitness, entertainment,
        /// utilities, shopping, travel, education, other.
        #[arg(long)]
        category: String,
        /// Decimal amount, e.g. "150" or "99.50".
        #[arg(long)]
        amount: String,
        /// Calendar date (YYYY-MM-DD); defaults to today.
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long)]
        notes: Option<String>,
        /// One of: cash, card, upi, other.
        #[arg(long)]
        payment_method: Option<String>,
    },
    /// List all expenses, newest first.
    List,
    /// Delete an expense by id.
    Delete { id: Uuid },
    /// Show the current-month summary.
    Summary,
    /// Set the monthly budget.
    Budget { amount: String },
    /// Set the saving goal.
    Goal { amount: String },
    /// Follow the live feed, reprinting the summary on every change.
    Watch,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    let mut settings = config::load(cli.config.as_deref())?;
    if let Some(base_url) = cli.base_url {
        settings.base_url = base_url;
    }
    if let Some(timezone) = cli.timezone {
        settings.timezone = timezone;
    }

    let state_path = local_state::default_state_path();
    let mut state = local_state::LocalState::load(state_path)?;

    let client = Client::new(&settings.base_url)?;

    // Logout needs no credentials: it only clears local state.
    if let Command::Logout = cli.command {
        state.remembered_username = None;
        state.save(state_path)?;
        println!("Signed out.");
        return Ok(());
    }

    let username = cli
        .username
        .or_else(|| state.remembered_username.clone())
        .or_else(|| (!settings.username.is_empty()).then(|| settings.username.clone()))
        .ok_or_else(|| {
            AppError::Usage("no username: pass --username or log in with --remember".to_string())
        })?;
    let password = prompt_password(&format!("Password for {username}: "))?;
    let creds = Credentials { username, password };

    if let Command::Signup = cli.command {
        client.signup(&creds).await?;
        println!("Account created for {}.", creds.username);
        return Ok(());
    }

    // Every other command runs behind the session gate.
    let gate = SessionGate::Unknown.resolve(client.probe(&creds).await?);
    if !gate.is_present() {
        return Err(AppError::Usage("invalid credentials".to_string()));
    }

    match cli.command {
        Command::Signup | Command::Logout => unreachable!("handled above"),
        Command::Login { remember } => {
            if remember {
                state.remembered_username = Some(creds.username.clone());
                state.save(state_path)?;
            }
            println!("Signed in as {}.", creds.username);
        }
        Command::Add {
            title,
            category,
            amount,
            date,
            notes,
            payment_method,
        } => {
            // Reject a bad category before the request goes out, with the
            // full list in the message; the server enforces it regardless.
            if Category::try_from(category.as_str()).is_err() {
                return Err(AppError::Usage(format!(
                    "unknown category {category}; expected one of: {}",
                    category_keys()
                )));
            }
            let date = match date {
                Some(date) => date,
                None => today(&settings.timezone)?,
            };
            let created = client
                .expense_create(
                    &creds,
                    &ExpenseNew {
                        title,
                        category,
                        amount,
                        date: Some(date),
                        notes,
                        payment_method,
                    },
                )
                .await?;
            println!("Recorded expense {}.", created.id);
        }
        Command::List => {
            let list = client.expenses(&creds).await?;
            if list.expenses.is_empty() {
                println!("No expenses yet.");
            }
            for expense in &list.expenses {
                let date = expense
                    .date
                    .map(|d| d.to_string())
                    .unwrap_or_else(|| expense.created_at.date_naive().to_string());
                let method = expense
                    .payment_method
                    .as_deref()
                    .map(|m| format!(" [{m}]"))
                    .unwrap_or_default();
                let category = category_label(&expense.category);
                println!(
                    "{}  {}  {:<16} {}  {}{}",
                    expense.id,
                    date,
                    category,
                    AmountMinor::new(expense.amount_minor),
                    expense.title,
                    method
                );
            }
        }
        Command::Delete { id } => {
            client.expense_delete(&creds, id).await?;
            println!("Deleted {id}.");
        }
        Command::Summary => {
            let summary = client.summary(&creds, &settings.timezone).await?;
            print_summary(&summary);
        }
        Command::Budget { amount } => {
            let updated = client
                .settings_update(
                    &creds,
                    &SettingsUpdate {
                        monthly_budget: Some(amount),
                        ..SettingsUpdate::default()
                    },
                )
                .await?;
            print_settings(updated.monthly_budget_minor, updated.saving_goal_minor);
        }
        Command::Goal { amount } => {
            let updated = client
                .settings_update(
                    &creds,
                    &SettingsUpdate {
                        saving_goal: Some(amount),
                        ..SettingsUpdate::default()
                    },
                )
                .await?;
            print_settings(updated.monthly_budget_minor, updated.saving_goal_minor);
        }
        Command::Watch => watch(&client, &creds, &settings.timezone).await?,
    }

    Ok(())
}

/// Follows the SSE feed and reprints a locally recomputed summary on every
/// snapshot, so a change made anywhere shows up here without polling.
///
/// Settings are re-read on each snapshot too: the feed only carries list
/// changes, and a budget or goal updated mid-session must still land in the
/// next reprint.
async fn watch(client: &Client, creds: &Credentials, timezone: &str) -> Result<()> {
    let mut stream = client.watch(creds).await?.bytes_stream();
    let mut buffer = String::new();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        for payload in sse_data(&mut buffer, &String::from_utf8_lossy(&chunk)) {
            let list: ExpenseListResponse = serde_json::from_str(&payload)?;
            let settings = settings_from_view(&client.settings(creds).await?);
            let expenses = snapshot_expenses(&list, &creds.username);

            let summary = engine::monthly_summary(&expenses, settings, today(timezone)?);
            println!("-- {} expense(s) --", expenses.len());
            print_monthly(&summary);
        }
    }

    Ok(())
}

fn settings_from_view(view: &SettingsView) -> UserSettings {
    UserSettings {
        monthly_budget: view.monthly_budget_minor.map(AmountMinor::new),
        saving_goal: view.saving_goal_minor.map(AmountMinor::new),
    }
}

/// Rehydrates a wire snapshot into engine records for local summary math.
/// Records with values outside the closed enums are skipped rather than
/// failing the whole snapshot.
fn snapshot_expenses(list: &ExpenseListResponse, owner: &str) -> Vec<Expense> {
    list.expenses
        .iter()
        .filter_map(|view| {
            Some(Expense {
                id: view.id,
                owner_id: owner.to_string(),
                title: view.title.clone(),
                category: view.category.as_str().try_into().ok()?,
                amount: AmountMinor::new(view.amount_minor),
                date: view.date,
                notes: view.notes.clone(),
                payment_method: view
                    .payment_method
                    .as_deref()
                    .and_then(|m| m.try_into().ok()),
                created_at: view.created_at,
            })
        })
        .collect()
}

fn category_keys() -> String {
    Category::ALL.map(Category::as_str).join(", ")
}

/// Human-readable category for list output; unknown keys print as-is.
fn category_label(raw: &str) -> &str {
    Category::try_from(raw).map(Category::label).unwrap_or(raw)
}

fn today(timezone: &str) -> Result<NaiveDate> {
    let tz: chrono_tz::Tz = timezone
        .parse()
        .map_err(|_| AppError::Usage(format!("unknown timezone: {timezone}")))?;
    Ok(chrono::Utc::now().with_timezone(&tz).date_naive())
}

fn print_summary(summary: &SummaryView) {
    println!("Total spent:    {}", AmountMinor::new(summary.total_expenses_minor));
    println!("Adjusted budget: {}", AmountMinor::new(summary.adjusted_budget_minor));
    println!("Remaining:      {}", AmountMinor::new(summary.remaining_budget_minor));
    println!("Budget used:    {:.1}%", summary.budget_usage_percent);
    println!("Daily average:  {}", AmountMinor::new(summary.daily_average_minor));
}

fn print_monthly(summary: &engine::MonthlySummary) {
    println!("Total spent:    {}", summary.total_expenses);
    println!("Adjusted budget: {}", summary.adjusted_budget);
    println!("Remaining:      {}", summary.remaining_budget);
    println!("Budget used:    {:.1}%", summary.budget_usage_percent);
    println!("Daily average:  {}", summary.daily_average);
}

fn print_settings(budget_minor: Option<i64>, goal_minor: Option<i64>) {
    let budget = budget_minor
        .map(|v| AmountMinor::new(v).to_string())
        .unwrap_or_else(|| "unset".to_string());
    let goal = goal_minor
        .map(|v| AmountMinor::new(v).to_string())
        .unwrap_or_else(|| "unset".to_string());
    println!("Monthly budget: {budget}");
    println!("Saving goal:    {goal}");
}

struct RawModeGuard;

impl RawModeGuard {
    fn enter() -> Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

fn prompt_password(prompt: &str) -> Result<String> {
    let _raw = RawModeGuard::enter()?;

    let mut out = std::io::stderr();
    execute!(
        out,
        cursor::MoveToColumn(0),
        terminal::Clear(ClearType::CurrentLine),
        Print(prompt)
    )?;
    out.flush()?;

    let mut buf = String::new();
    loop {
        let Event::Key(KeyEvent {
            code, modifiers, ..
        }) = event::read()?
        else {
            continue;
        };

        match code {
            KeyCode::Enter => {
                execute!(out, Print("\r\n"))?;
                out.flush()?;
                break;
            }
            KeyCode::Backspace => {
                if buf.pop().is_some() {
                    execute!(out, cursor::MoveLeft(1), Print(" "), cursor::MoveLeft(1))?;
                    out.flush()?;
                }
            }
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                execute!(out, Print("\r\n"))?;
                out.flush()?;
                return Err(AppError::Terminal("interrupted".to_string()));
            }
            KeyCode::Char(ch) if !modifiers.contains(KeyModifiers::CONTROL) => {
                buf.push(ch);
                execute!(out, Print("*"))?;
                out.flush()?;
            }
            _ => {}
        }
    }

    Ok(buf)
}

#[cfg(test)]
mod tests {
    use api_types::expense::ExpenseView;
    use chrono::{NaiveDate, Utc};
    use uuid::Uuid;

    use super::*;

    fn view(amount_minor: i64, category: &str, date: &str) -> ExpenseView {
        ExpenseView {
            id: Uuid::new_v4(),
            title: "x".to_string(),
            category: category.to_string(),
            amount_minor,
            date: date.parse::<NaiveDate>().ok(),
            notes: None,
            payment_method: Some("upi".to_string()),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn category_keys_cover_the_whole_form_list() {
        let keys = category_keys();
        assert_eq!(keys.split(", ").count(), Category::ALL.len());
        assert!(keys.starts_with("food_dining"));
        assert!(keys.ends_with("other"));
    }

    #[test]
    fn list_output_uses_form_labels() {
        assert_eq!(category_label("food_dining"), "Food & Dining");
        assert_eq!(category_label("health_fitness"), "Health & Fitness");
        assert_eq!(category_label("mystery"), "mystery");
    }

    #[test]
    fn snapshot_rehydrates_wire_records() {
        let list = ExpenseListResponse {
            expenses: vec![view(45050, "food_dining", "2026-08-15")],
        };
        let expenses = snapshot_expenses(&list, "alice");
        assert_eq!(expenses.len(), 1);
        assert_eq!(expenses[0].owner_id, "alice");
        assert_eq!(expenses[0].category, Category::FoodDining);
        assert_eq!(expenses[0].amount.minor(), 45050);
    }

    #[test]
    fn snapshot_skips_records_outside_the_closed_enums() {
        let list = ExpenseListResponse {
            expenses: vec![
                view(100, "gambling", "2026-08-15"),
                view(200, "other", "2026-08-15"),
            ],
        };
        let expenses = snapshot_expenses(&list, "alice");
        assert_eq!(expenses.len(), 1);
        assert_eq!(expenses[0].amount.minor(), 200);
    }

    #[test]
    fn reprinted_summary_tracks_a_settings_change_between_snapshots() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 15).unwrap();
        let list = ExpenseListResponse {
            expenses: vec![view(450_00, "other", "2026-08-15")],
        };
        let expenses = snapshot_expenses(&list, "alice");

        let before = settings_from_view(&SettingsView {
            monthly_budget_minor: Some(2000_00),
            saving_goal_minor: Some(500_00),
        });
        let after = settings_from_view(&SettingsView {
            monthly_budget_minor: Some(1000_00),
            saving_goal_minor: Some(500_00),
        });

        // Same list, refreshed settings: the recomputed figures must follow.
        let first = engine::monthly_summary(&expenses, before, today);
        let second = engine::monthly_summary(&expenses, after, today);
        assert_eq!(first.remaining_budget.minor(), 1050_00);
        assert_eq!(second.remaining_budget.minor(), 50_00);
        assert_eq!(second.total_expenses, first.total_expenses);
    }
}
