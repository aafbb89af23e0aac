use anyhow::{anyhow, Result};
use chrono::Local;

use super::display::{format_friend_line, print_friend_detail};
use super::ui::{confirm, print_json};
use super::{FriendAddArgs, FriendCommand, FriendUpdateArgs};
use crate::db::Database;
use crate::models::{FriendUpdate, NewFriend, Patch};
use crate::ops;

/// Execute a `friend` subcommand
pub fn run_friend(db: &Database, command: FriendCommand, json: bool) -> Result<()> {
    match command {
        FriendCommand::Add(args) => run_add(db, args, json),
        FriendCommand::List => run_list(db, json),
        FriendCommand::Show(args) => run_show(db, args.id, json),
        FriendCommand::Update(args) => run_update(db, args, json),
        FriendCommand::Delete(args) => run_delete(db, args.id, args.force, json),
    }
}

fn run_add(db: &Database, args: FriendAddArgs, json: bool) -> Result<()> {
    let friend = ops::create_friend(
        db,
        NewFriend {
            name: args.name,
            email: args.email,
            phone: args.phone,
            notes: args.notes,
        },
    )?;

    if json {
        return print_json(&friend);
    }
    println!("Created: {} (#{})", friend.name, friend.id);
    Ok(())
}

fn run_list(db: &Database, json: bool) -> Result<()> {
    let friends = ops::get_friends(db)?;

    if json {
        return print_json(&friends);
    }
    if friends.is_empty() {
        println!("No friends yet. Add one with: birthdaycmd friend add --name <NAME>");
        return Ok(());
    }
    for friend in &friends {
        println!("{}", format_friend_line(friend));
    }
    Ok(())
}

fn run_show(db: &Database, id: i64, json: bool) -> Result<()> {
    let friend = ops::get_friend(db, id)?;
    let birthdays = db.list_birthdays_for_friend(id)?;

    if json {
        return print_json(&serde_json::json!({
            "friend": friend,
            "birthdays": birthdays,
        }));
    }
    print_friend_detail(&friend, &birthdays, Local::now().date_naive());
    Ok(())
}

/// Build the partial update from flags. `--clear-x` sets the field to null,
/// an omitted flag leaves it alone.
pub fn friend_update_from_args(args: &FriendUpdateArgs) -> FriendUpdate {
    FriendUpdate {
        name: args.name.clone().into(),
        email: nullable_patch(args.email.clone(), args.clear_email),
        phone: nullable_patch(args.phone.clone(), args.clear_phone),
        notes: nullable_patch(args.notes.clone(), args.clear_notes),
    }
}

fn nullable_patch(value: Option<String>, clear: bool) -> Patch<Option<String>> {
    if clear {
        Patch::Set(None)
    } else {
        value.map(Some).into()
    }
}

fn run_update(db: &Database, args: FriendUpdateArgs, json: bool) -> Result<()> {
    let update = friend_update_from_args(&args);
    if update.is_empty() {
        return Err(anyhow!(
            "No updates provided. Use --name, --email, --phone, --notes or a --clear-* flag."
        ));
    }

    let friend = ops::update_friend(db, args.id, update)?;

    if json {
        return print_json(&friend);
    }
    println!("Saved.");
    Ok(())
}

fn run_delete(db: &Database, id: i64, force: bool, json: bool) -> Result<()> {
    if !force && !json {
        let friend = ops::get_friend(db, id)?;
        let count = db.list_birthdays_for_friend(id)?.len();
        let prompt = match count {
            0 => format!("Delete {}?", friend.name),
            1 => format!("Delete {} and 1 birthday?", friend.name),
            n => format!("Delete {} and {} birthdays?", friend.name, n),
        };
        if !confirm(&prompt) {
            return Ok(());
        }
    }

    let result = ops::delete_friend(db, id)?;

    if json {
        return print_json(&result);
    }
    if result.success {
        println!("Deleted.");
    } else {
        println!("No friend found with ID: {}", id);
    }
    Ok(())
}
