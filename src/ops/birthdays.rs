use tracing::{debug, info};

use crate::db::Database;
use crate::error::{Error, Result};
use crate::models::{BirthdayUpdate, BirthdayWithFriend, DeleteResult, NewBirthday, Patch};

/// Create a birthday for an existing friend.
///
/// The friend lookup and the insert share one transaction, so the friend
/// cannot disappear in between.
pub fn create_birthday(db: &Database, input: NewBirthday) -> Result<BirthdayWithFriend> {
    input.validate()?;
    db.in_transaction(|db| {
        if !db.friend_exists(input.friend_id)? {
            return Err(Error::friend_not_found(input.friend_id));
        }
        let id = db.insert_birthday(&input)?;
        info!(birthday_id = id, friend_id = input.friend_id, "created birthday");
        db.get_birthday_with_friend(id)?
            .ok_or_else(|| Error::birthday_not_found(id))
    })
}

/// Every birthday, active or not, each joined with its friend.
pub fn get_birthdays(db: &Database) -> Result<Vec<BirthdayWithFriend>> {
    db.list_birthdays_with_friend()
}

pub fn get_birthday(db: &Database, id: i64) -> Result<BirthdayWithFriend> {
    db.get_birthday_with_friend(id)?
        .ok_or_else(|| Error::birthday_not_found(id))
}

/// Merge the supplied fields over the stored birthday and return it joined
/// with its (possibly new) friend. A new `friend_id` must resolve, same as on
/// create.
pub fn update_birthday(
    db: &Database,
    id: i64,
    update: BirthdayUpdate,
) -> Result<BirthdayWithFriend> {
    db.in_transaction(|db| {
        let mut birthday = db
            .get_birthday_by_id(id)?
            .ok_or_else(|| Error::birthday_not_found(id))?;

        if let Patch::Set(friend_id) = update.friend_id {
            if !db.friend_exists(friend_id)? {
                return Err(Error::friend_not_found(friend_id));
            }
        }

        update.apply(&mut birthday)?;
        if !db.update_birthday(&birthday)? {
            return Err(Error::birthday_not_found(id));
        }
        info!(birthday_id = id, "updated birthday");

        get_birthday(db, id)
    })
}

pub fn delete_birthday(db: &Database, id: i64) -> Result<DeleteResult> {
    let success = db.delete_birthday(id)?;
    if success {
        info!(birthday_id = id, "deleted birthday");
    } else {
        debug!(birthday_id = id, "delete skipped, birthday not found");
    }
    Ok(DeleteResult { success })
}
