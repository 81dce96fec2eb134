//! Standalone migration driver.
//!
//! Applies the Khata schema to the database named by `DATABASE_URL`
//! (defaulting to a local SQLite file), without going through the `khata`
//! binary. Useful for bootstrapping and for inspecting migration status.

use sea_orm::Database;
use sea_orm_migration::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cmd {
    Up,
    Down,
    Fresh,
    Status,
}

impl Cmd {
    const USAGE: &'static str = "Usage: cargo run -p migration -- [up|down|fresh|status]";

    fn parse(raw: &str) -> Option<Cmd> {
        match raw {
            "up" => Some(Cmd::Up),
            "down" => Some(Cmd::Down),
            "fresh" => Some(Cmd::Fresh),
            "status" => Some(Cmd::Status),
            _ => None,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let raw = std::env::args().nth(1).unwrap_or_else(|| "up".to_string());
    let Some(cmd) = Cmd::parse(&raw) else {
        eprintln!("unknown command: {raw}");
        eprintln!("{}", Cmd::USAGE);
        std::process::exit(2);
    };

    let db_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:./khata.db?mode=rwc".to_string());

    let db = Database::connect(&db_url).await?;

    match cmd {
        Cmd::Up => migration::Migrator::up(&db, None).await?,
        Cmd::Down => migration::Migrator::down(&db, None).await?,
        Cmd::Fresh => migration::Migrator::fresh(&db).await?,
        Cmd::Status => {
            migration::Migrator::status(&db).await?;
        }
    }

    Ok(())
}
