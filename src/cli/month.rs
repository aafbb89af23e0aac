use anyhow::Result;
use chrono::{Datelike, Local, NaiveDate};

use super::display::{format_month_entry, month_name};
use super::ui::print_json;
use super::MonthArgs;
use crate::db::Database;
use crate::models::BirthdayWithFriend;
use crate::ops;

/// Execute the month command
pub fn run_month(db: &Database, args: MonthArgs, json: bool) -> Result<()> {
    let today = Local::now().date_naive();
    let year = args.year.unwrap_or_else(|| today.year());
    let month = args.month.unwrap_or_else(|| today.month());

    let birthdays = ops::get_birthdays_by_month(db, year, month)?;

    if json {
        return print_json(&birthdays);
    }
    print!("{}", render_month_list(&birthdays, year, month, today));
    Ok(())
}

/// Execute the upcoming command (also the default with no subcommand)
pub fn run_upcoming(db: &Database, json: bool) -> Result<()> {
    let today = Local::now().date_naive();
    let birthdays = ops::upcoming_in_month(db, today)?;

    if json {
        return print_json(&birthdays);
    }
    print!("{}", render_upcoming(&birthdays, today));
    Ok(())
}

pub fn render_month_list(
    birthdays: &[BirthdayWithFriend],
    year: i32,
    month: u32,
    today: NaiveDate,
) -> String {
    let mut out = format!("{} {}\n\n", month_name(month), year);
    if birthdays.is_empty() {
        out.push_str("No birthdays this month\n");
        return out;
    }
    for entry in birthdays {
        out.push_str(&format_month_entry(entry, today));
        out.push('\n');
    }
    out
}

pub fn render_upcoming(birthdays: &[BirthdayWithFriend], today: NaiveDate) -> String {
    let mut out = format!("Upcoming in {}\n\n", month_name(today.month()));
    if birthdays.is_empty() {
        out.push_str("No upcoming birthdays this month\n");
        return out;
    }
    for entry in birthdays {
        out.push_str(&format_month_entry(entry, today));
        out.push('\n');
    }
    out
}
