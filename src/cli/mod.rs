use chrono::{Datelike, NaiveDate};
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::models::birth_date_in_year;

pub mod birthday;
pub mod calendar;
pub mod config;
pub mod display;
pub mod friend;
pub mod month;
pub mod status;
pub mod ui;

pub use birthday::run_birthday;
pub use calendar::run_calendar;
pub use config::run_config;
pub use friend::run_friend;
pub use month::{run_month, run_upcoming};
pub use status::run_status;

#[derive(Parser)]
#[command(name = "birthdaycmd")]
#[command(about = "Birthday tracker for the command line")]
#[command(version)]
pub struct Cli {
    /// Database file (defaults to $BIRTHDAYCMD_DB, then the config directory)
    #[arg(long, global = true, value_name = "PATH")]
    pub db: Option<PathBuf>,
    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,
    /// More log output (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage friends
    #[command(subcommand)]
    Friend(FriendCommand),
    /// Manage birthdays
    #[command(subcommand)]
    Birthday(BirthdayCommand),
    /// Birthdays in a month, ordered by day
    Month(MonthArgs),
    /// Birthdays still ahead this month
    Upcoming,
    /// Month grid with birthday markers, or a whole-year overview
    Calendar(CalendarArgs),
    /// Show or change settings
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Database location, schema version and counts
    Status,
}

#[derive(Subcommand)]
pub enum FriendCommand {
    /// Add a new friend
    Add(FriendAddArgs),
    /// List all friends
    List,
    /// Show a friend and their birthdays
    Show(IdArgs),
    /// Change some of a friend's fields
    Update(FriendUpdateArgs),
    /// Delete a friend and all their birthdays
    Delete(DeleteArgs),
}

#[derive(Subcommand)]
pub enum BirthdayCommand {
    /// Record a birthday for a friend
    Add(BirthdayAddArgs),
    /// List all birthdays, including inactive ones
    List,
    /// Change some of a birthday's fields
    Update(BirthdayUpdateArgs),
    /// Delete a birthday
    Delete(DeleteArgs),
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Print one setting
    Get { key: String },
    /// Change one setting
    Set { key: String, value: String },
    /// Reset one setting to its default
    Unset { key: String },
    /// Print all settings
    List,
}

#[derive(Args)]
pub struct IdArgs {
    pub id: i64,
}

#[derive(Args)]
pub struct DeleteArgs {
    pub id: i64,
    /// Skip confirmation
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args)]
pub struct FriendAddArgs {
    #[arg(short, long)]
    pub name: String,
    #[arg(short, long)]
    pub email: Option<String>,
    #[arg(short, long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(Args)]
pub struct FriendUpdateArgs {
    pub id: i64,
    #[arg(short, long)]
    pub name: Option<String>,
    #[arg(short, long, conflicts_with = "clear_email")]
    pub email: Option<String>,
    #[arg(long)]
    pub clear_email: bool,
    #[arg(short, long, conflicts_with = "clear_phone")]
    pub phone: Option<String>,
    #[arg(long)]
    pub clear_phone: bool,
    #[arg(long, conflicts_with = "clear_notes")]
    pub notes: Option<String>,
    #[arg(long)]
    pub clear_notes: bool,
}

#[derive(Args)]
pub struct BirthdayAddArgs {
    pub friend_id: i64,
    /// YYYY-MM-DD, or MM-DD (combine with --year when it is known)
    #[arg(value_parser = parse_birth_date)]
    pub date: BirthDateInput,
    /// Known birth year; omit for a birthday that recurs without an age
    #[arg(short, long)]
    pub year: Option<i32>,
    /// Days of notice wanted before the birthday (defaults to the
    /// default_reminder_days setting)
    #[arg(short, long)]
    pub reminder_days: Option<u32>,
    /// Store the birthday but keep it off the calendar
    #[arg(long)]
    pub inactive: bool,
}

#[derive(Args)]
pub struct BirthdayUpdateArgs {
    pub id: i64,
    /// Move the birthday to another friend
    #[arg(short, long)]
    pub friend: Option<i64>,
    /// YYYY-MM-DD, or MM-DD to keep the current year
    #[arg(short, long, value_parser = parse_birth_date)]
    pub date: Option<BirthDateInput>,
    #[arg(short, long, conflicts_with = "no_year")]
    pub year: Option<i32>,
    /// Forget the birth year
    #[arg(long)]
    pub no_year: bool,
    #[arg(short, long)]
    pub reminder_days: Option<u32>,
    #[arg(long, conflicts_with = "inactive")]
    pub active: bool,
    #[arg(long)]
    pub inactive: bool,
}

#[derive(Args)]
pub struct MonthArgs {
    /// Defaults to the current year
    #[arg(short, long)]
    pub year: Option<i32>,
    /// 1-12, defaults to the current month
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=12))]
    pub month: Option<u32>,
}

#[derive(Args)]
pub struct CalendarArgs {
    /// Defaults to the current year
    #[arg(short, long)]
    pub year: Option<i32>,
    /// 1-12; without it the whole year is shown
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=12))]
    pub month: Option<u32>,
}

/// Year used for `MM-DD` input. A leap year so Feb 29 is accepted.
pub const PLACEHOLDER_YEAR: i32 = 2000;

/// A birth date as typed on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BirthDateInput {
    /// `YYYY-MM-DD`
    Full(NaiveDate),
    /// `MM-DD`, held in the placeholder year until a real one is known
    MonthDay(NaiveDate),
}

impl BirthDateInput {
    /// The date to store alongside `birth_year`. A full date must already
    /// lie in that year; a month and day are moved into it.
    pub fn resolve(self, birth_year: Option<i32>) -> crate::Result<NaiveDate> {
        match (self, birth_year) {
            (Self::Full(date), Some(year)) if date.year() != year => {
                Err(crate::Error::validation(format!(
                    "Date {} does not fall in birth year {}",
                    date, year
                )))
            }
            (Self::Full(date), _) => Ok(date),
            (Self::MonthDay(date), Some(year)) => birth_date_in_year(date, year),
            (Self::MonthDay(date), None) => Ok(date),
        }
    }
}

/// Parse `YYYY-MM-DD`, or `MM-DD` with a placeholder year.
pub fn parse_birth_date(s: &str) -> Result<BirthDateInput, String> {
    let s = s.trim();
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(BirthDateInput::Full(date));
    }
    NaiveDate::parse_from_str(&format!("{}-{}", PLACEHOLDER_YEAR, s), "%Y-%m-%d")
        .map(BirthDateInput::MonthDay)
        .map_err(|_| format!("invalid date {:?}, expected YYYY-MM-DD or MM-DD", s))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_birth_date() {
        assert_eq!(
            parse_birth_date("1990-03-15").unwrap(),
            BirthDateInput::Full(date(1990, 3, 15))
        );
        assert_eq!(
            parse_birth_date("02-29").unwrap(),
            BirthDateInput::MonthDay(date(PLACEHOLDER_YEAR, 2, 29))
        );
        assert!(parse_birth_date("1990-02-30").is_err());
        assert!(parse_birth_date("tomorrow").is_err());
    }

    #[test]
    fn test_resolve_birth_date_against_year() {
        let month_day = parse_birth_date("03-15").unwrap();
        assert_eq!(month_day.resolve(Some(1985)).unwrap(), date(1985, 3, 15));
        assert_eq!(month_day.resolve(None).unwrap(), date(PLACEHOLDER_YEAR, 3, 15));

        let full = parse_birth_date("1990-03-15").unwrap();
        assert_eq!(full.resolve(Some(1990)).unwrap(), date(1990, 3, 15));
        assert_eq!(full.resolve(None).unwrap(), date(1990, 3, 15));
        assert!(full.resolve(Some(1985)).unwrap_err().is_validation());

        let leap = parse_birth_date("02-29").unwrap();
        assert!(leap.resolve(Some(1985)).is_err());
        assert_eq!(leap.resolve(Some(1988)).unwrap(), date(1988, 2, 29));
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "birthdaycmd",
            "birthday",
            "add",
            "3",
            "07-22",
            "--json",
            "-vv",
        ])
        .unwrap();
        assert!(cli.json);
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Some(Commands::Birthday(BirthdayCommand::Add(args))) => {
                assert_eq!(args.friend_id, 3);
                assert_eq!(args.year, None);
            }
            _ => panic!("expected birthday add"),
        }
    }

    #[test]
    fn test_clear_conflicts_with_value() {
        let result = Cli::try_parse_from([
            "birthdaycmd",
            "friend",
            "update",
            "1",
            "--email",
            "a@b.co",
            "--clear-email",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_month_range_checked() {
        assert!(Cli::try_parse_from(["birthdaycmd", "month", "--month", "13"]).is_err());
    }
}
