use chrono::Utc;
use rusqlite::{params, OptionalExtension, Row};

use super::{next_timestamp, parse_timestamp, Database};
use crate::error::Result;
use crate::models::*;

impl Database {
    // ==================== FRIEND CREATE ====================

    /// Insert a validated friend and return the stored row.
    pub fn insert_friend(&self, input: &NewFriend) -> Result<Friend> {
        let now = Utc::now();
        self.conn.execute(
            "INSERT INTO friends (name, email, phone, notes, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?)",
            params![
                input.name,
                input.email,
                input.phone,
                input.notes,
                now.to_rfc3339(),
                now.to_rfc3339(),
            ],
        )?;

        Ok(Friend {
            id: self.conn.last_insert_rowid(),
            name: input.name.clone(),
            email: input.email.clone(),
            phone: input.phone.clone(),
            notes: input.notes.clone(),
            created_at: now,
            updated_at: now,
        })
    }

    // ==================== FRIEND READ ====================

    pub fn get_friend_by_id(&self, id: i64) -> Result<Option<Friend>> {
        let friend = self
            .conn
            .query_row("SELECT * FROM friends WHERE id = ?", [id], Self::row_to_friend)
            .optional()?;
        Ok(friend)
    }

    pub fn friend_exists(&self, id: i64) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM friends WHERE id = ?",
            [id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// All friends in creation order.
    pub fn list_friends(&self) -> Result<Vec<Friend>> {
        let mut stmt = self.conn.prepare("SELECT * FROM friends ORDER BY id ASC")?;

        let friends = stmt
            .query_map([], Self::row_to_friend)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(friends)
    }

    pub fn count_friends(&self) -> Result<u32> {
        let count: u32 = self
            .conn
            .query_row("SELECT COUNT(*) FROM friends", [], |row| row.get(0))?;
        Ok(count)
    }

    // ==================== FRIEND UPDATE ====================

    /// Write every column of `friend`. Sets `updated_at` strictly after its
    /// previous value and returns the stored row, or `None` if the id is gone.
    pub fn update_friend(&self, friend: &Friend) -> Result<Option<Friend>> {
        let updated_at = next_timestamp(friend.updated_at);
        let rows = self.conn.execute(
            "UPDATE friends SET name = ?, email = ?, phone = ?, notes = ?, updated_at = ?
             WHERE id = ?",
            params![
                friend.name,
                friend.email,
                friend.phone,
                friend.notes,
                updated_at.to_rfc3339(),
                friend.id,
            ],
        )?;

        if rows == 0 {
            return Ok(None);
        }
        Ok(Some(Friend {
            updated_at,
            ..friend.clone()
        }))
    }

    // ==================== FRIEND DELETE ====================

    /// Hard delete a friend and all their birthdays (via CASCADE).
    pub fn delete_friend(&self, id: i64) -> Result<bool> {
        let rows = self.conn.execute("DELETE FROM friends WHERE id = ?", [id])?;
        Ok(rows > 0)
    }

    // ==================== ROW MAPPERS ====================

    fn row_to_friend(row: &Row) -> rusqlite::Result<Friend> {
        let created_at: String = row.get("created_at")?;
        let updated_at: String = row.get("updated_at")?;

        Ok(Friend {
            id: row.get("id")?,
            name: row.get("name")?,
            email: row.get("email")?,
            phone: row.get("phone")?,
            notes: row.get("notes")?,
            created_at: parse_timestamp(5, &created_at)?,
            updated_at: parse_timestamp(6, &updated_at)?,
        })
    }
}
