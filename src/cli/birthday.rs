use anyhow::{anyhow, Result};
use chrono::Local;

use super::display::{format_birth_date, format_birthday_line};
use super::ui::{confirm, print_json};
use super::{BirthdayAddArgs, BirthdayCommand, BirthdayUpdateArgs};
use crate::config::Config;
use crate::db::Database;
use crate::models::{BirthdayUpdate, NewBirthday, Patch};
use crate::ops;

/// Execute a `birthday` subcommand
pub fn run_birthday(db: &Database, command: BirthdayCommand, json: bool) -> Result<()> {
    match command {
        BirthdayCommand::Add(args) => run_add(db, args, json),
        BirthdayCommand::List => run_list(db, json),
        BirthdayCommand::Update(args) => run_update(db, args, json),
        BirthdayCommand::Delete(args) => run_delete(db, args.id, args.force, json),
    }
}

fn run_add(db: &Database, args: BirthdayAddArgs, json: bool) -> Result<()> {
    let reminder_days = match args.reminder_days {
        Some(days) => days,
        None => Config::load(db)?.default_reminder_days,
    };

    let created = ops::create_birthday(
        db,
        NewBirthday {
            friend_id: args.friend_id,
            birth_date: args.date.resolve(args.year)?,
            birth_year: args.year,
            reminder_days,
            is_active: !args.inactive,
        },
    )?;

    if json {
        return print_json(&created);
    }
    println!(
        "Created: {} for {} (#{})",
        format_birth_date(&created.birthday),
        created.friend.name,
        created.birthday.id
    );
    Ok(())
}

fn run_list(db: &Database, json: bool) -> Result<()> {
    let birthdays = ops::get_birthdays(db)?;

    if json {
        return print_json(&birthdays);
    }
    if birthdays.is_empty() {
        println!("No birthdays yet.");
        return Ok(());
    }
    let today = Local::now().date_naive();
    for entry in &birthdays {
        println!("{}", format_birthday_line(entry, today));
    }
    Ok(())
}

/// Build the partial update from flags. `stored_year` is the birthday's
/// current year, used to place an `MM-DD` date when no year flag is given.
pub fn birthday_update_from_args(
    args: &BirthdayUpdateArgs,
    stored_year: Option<i32>,
) -> crate::Result<BirthdayUpdate> {
    let birth_year = if args.no_year {
        Patch::Set(None)
    } else {
        args.year.map(Some).into()
    };
    let target_year = match &birth_year {
        Patch::Set(year) => *year,
        Patch::Unchanged => stored_year,
    };
    let birth_date = match args.date {
        Some(input) => Patch::Set(input.resolve(target_year)?),
        None => Patch::Unchanged,
    };
    let is_active = if args.active {
        Patch::Set(true)
    } else if args.inactive {
        Patch::Set(false)
    } else {
        Patch::Unchanged
    };

    Ok(BirthdayUpdate {
        friend_id: args.friend.into(),
        birth_date,
        birth_year,
        reminder_days: args.reminder_days.into(),
        is_active,
    })
}

fn run_update(db: &Database, args: BirthdayUpdateArgs, json: bool) -> Result<()> {
    let stored = ops::get_birthday(db, args.id)?;
    let update = birthday_update_from_args(&args, stored.birthday.birth_year)?;
    if update.is_empty() {
        return Err(anyhow!(
            "No updates provided. Use --friend, --date, --year, --no-year, --reminder-days, --active or --inactive."
        ));
    }

    let updated = ops::update_birthday(db, args.id, update)?;

    if json {
        return print_json(&updated);
    }
    println!("Saved.");
    Ok(())
}

fn run_delete(db: &Database, id: i64, force: bool, json: bool) -> Result<()> {
    if !force && !json {
        let entry = ops::get_birthday(db, id)?;
        let prompt = format!(
            "Delete {}'s birthday ({})?",
            entry.friend.name,
            format_birth_date(&entry.birthday)
        );
        if !confirm(&prompt) {
            return Ok(());
        }
    }

    let result = ops::delete_birthday(db, id)?;

    if json {
        return print_json(&result);
    }
    if result.success {
        println!("Deleted.");
    } else {
        println!("No birthday found with ID: {}", id);
    }
    Ok(())
}
