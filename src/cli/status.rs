use anyhow::Result;
use serde::Serialize;

use super::ui::print_json;
use crate::db::Database;

#[derive(Debug, Serialize)]
pub struct Status {
    pub status: &'static str,
    pub database: String,
    pub schema_version: i32,
    pub friends: u32,
    pub birthdays: u32,
    pub active_birthdays: u32,
}

pub fn collect_status(db: &Database) -> Result<Status> {
    let (birthdays, active_birthdays) = db.count_birthdays()?;
    Ok(Status {
        status: "ok",
        database: db
            .path()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| ":memory:".to_string()),
        schema_version: db.schema_version()?,
        friends: db.count_friends()?,
        birthdays,
        active_birthdays,
    })
}

/// Execute the status command
pub fn run_status(db: &Database, json: bool) -> Result<()> {
    let status = collect_status(db)?;

    if json {
        return print_json(&status);
    }
    println!("database   {}", status.database);
    println!("schema     v{}", status.schema_version);
    println!("friends    {}", status.friends);
    println!(
        "birthdays  {} ({} active)",
        status.birthdays, status.active_birthdays
    );
    Ok(())
}
