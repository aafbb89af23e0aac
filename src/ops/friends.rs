use tracing::{debug, info};

use crate::db::Database;
use crate::error::{Error, Result};
use crate::models::{DeleteResult, Friend, FriendUpdate, NewFriend};

pub fn create_friend(db: &Database, mut input: NewFriend) -> Result<Friend> {
    input.validate()?;
    let friend = db.insert_friend(&input)?;
    info!(friend_id = friend.id, "created friend");
    Ok(friend)
}

pub fn get_friends(db: &Database) -> Result<Vec<Friend>> {
    db.list_friends()
}

pub fn get_friend(db: &Database, id: i64) -> Result<Friend> {
    db.get_friend_by_id(id)?
        .ok_or_else(|| Error::friend_not_found(id))
}

/// Merge the supplied fields over the stored friend. `updated_at` always moves
/// forward, even for an empty update.
pub fn update_friend(db: &Database, id: i64, mut update: FriendUpdate) -> Result<Friend> {
    update.validate()?;

    db.in_transaction(|db| {
        let mut friend = get_friend(db, id)?;
        update.apply(&mut friend);
        let friend = db
            .update_friend(&friend)?
            .ok_or_else(|| Error::friend_not_found(id))?;
        info!(friend_id = id, "updated friend");
        Ok(friend)
    })
}

/// Delete a friend and, through the store's cascade, all their birthdays.
pub fn delete_friend(db: &Database, id: i64) -> Result<DeleteResult> {
    let success = db.delete_friend(id)?;
    if success {
        info!(friend_id = id, "deleted friend");
    } else {
        debug!(friend_id = id, "delete skipped, friend not found");
    }
    Ok(DeleteResult { success })
}
