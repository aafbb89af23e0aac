use chrono::Utc;
use rusqlite::{params, OptionalExtension, Row};

use super::{format_date, next_timestamp, parse_date, parse_timestamp, Database};
use crate::error::Result;
use crate::models::*;

/// Birthday columns followed by the owning friend's columns, aliased so the
/// two `id`/timestamp sets don't collide.
const BIRTHDAY_WITH_FRIEND_SELECT: &str = r#"SELECT
    b.id, b.friend_id, b.birth_date, b.birth_year, b.reminder_days, b.is_active,
    b.created_at, b.updated_at,
    f.id AS f_id, f.name AS f_name, f.email AS f_email, f.phone AS f_phone,
    f.notes AS f_notes, f.created_at AS f_created_at, f.updated_at AS f_updated_at
FROM birthdays b
INNER JOIN friends f ON f.id = b.friend_id"#;

impl Database {
    // ==================== BIRTHDAY CREATE ====================

    /// Insert a birthday row and return its id. The friend must exist or the
    /// foreign key rejects the insert.
    pub fn insert_birthday(&self, input: &NewBirthday) -> Result<i64> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO birthdays (
                friend_id, birth_date, birth_year, reminder_days, is_active, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?)",
            params![
                input.friend_id,
                format_date(input.birth_date),
                input.birth_year,
                input.reminder_days,
                input.is_active as i32,
                now,
                now,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    // ==================== BIRTHDAY READ ====================

    pub fn get_birthday_by_id(&self, id: i64) -> Result<Option<Birthday>> {
        let birthday = self
            .conn
            .query_row(
                "SELECT id, friend_id, birth_date, birth_year, reminder_days, is_active,
                        created_at, updated_at
                 FROM birthdays WHERE id = ?",
                [id],
                Self::row_to_birthday,
            )
            .optional()?;
        Ok(birthday)
    }

    pub fn get_birthday_with_friend(&self, id: i64) -> Result<Option<BirthdayWithFriend>> {
        let sql = format!("{} WHERE b.id = ?", BIRTHDAY_WITH_FRIEND_SELECT);
        let birthday = self
            .conn
            .query_row(&sql, [id], Self::row_to_birthday_with_friend)
            .optional()?;
        Ok(birthday)
    }

    /// Every birthday, active or not, in store order.
    pub fn list_birthdays_with_friend(&self) -> Result<Vec<BirthdayWithFriend>> {
        let sql = format!("{} ORDER BY b.id ASC", BIRTHDAY_WITH_FRIEND_SELECT);
        self.query_birthdays_with_friend(&sql, [])
    }

    /// Active birthdays only, in store order. Input to the calendar queries.
    pub fn list_active_birthdays_with_friend(&self) -> Result<Vec<BirthdayWithFriend>> {
        let sql = format!(
            "{} WHERE b.is_active = 1 ORDER BY b.id ASC",
            BIRTHDAY_WITH_FRIEND_SELECT
        );
        self.query_birthdays_with_friend(&sql, [])
    }

    pub fn list_birthdays_for_friend(&self, friend_id: i64) -> Result<Vec<BirthdayWithFriend>> {
        let sql = format!(
            "{} WHERE b.friend_id = ? ORDER BY b.id ASC",
            BIRTHDAY_WITH_FRIEND_SELECT
        );
        self.query_birthdays_with_friend(&sql, [friend_id])
    }

    /// Returns (total, active).
    pub fn count_birthdays(&self) -> Result<(u32, u32)> {
        let counts = self.conn.query_row(
            "SELECT COUNT(*), COALESCE(SUM(is_active), 0) FROM birthdays",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;
        Ok(counts)
    }

    fn query_birthdays_with_friend<P: rusqlite::Params>(
        &self,
        sql: &str,
        params: P,
    ) -> Result<Vec<BirthdayWithFriend>> {
        let mut stmt = self.conn.prepare(sql)?;

        let birthdays = stmt
            .query_map(params, Self::row_to_birthday_with_friend)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(birthdays)
    }

    // ==================== BIRTHDAY UPDATE ====================

    /// Write every column of `birthday`. Sets `updated_at` strictly after its
    /// previous value. Returns false if the id is gone.
    pub fn update_birthday(&self, birthday: &Birthday) -> Result<bool> {
        let updated_at = next_timestamp(birthday.updated_at);
        let rows = self.conn.execute(
            r#"UPDATE birthdays SET
                friend_id = ?, birth_date = ?, birth_year = ?, reminder_days = ?,
                is_active = ?, updated_at = ?
               WHERE id = ?"#,
            params![
                birthday.friend_id,
                format_date(birthday.birth_date),
                birthday.birth_year,
                birthday.reminder_days,
                birthday.is_active as i32,
                updated_at.to_rfc3339(),
                birthday.id,
            ],
        )?;
        Ok(rows > 0)
    }

    // ==================== BIRTHDAY DELETE ====================

    pub fn delete_birthday(&self, id: i64) -> Result<bool> {
        let rows = self.conn.execute("DELETE FROM birthdays WHERE id = ?", [id])?;
        Ok(rows > 0)
    }

    // ==================== ROW MAPPERS ====================

    fn row_to_birthday(row: &Row) -> rusqlite::Result<Birthday> {
        let birth_date: String = row.get(2)?;
        let created_at: String = row.get(6)?;
        let updated_at: String = row.get(7)?;

        Ok(Birthday {
            id: row.get(0)?,
            friend_id: row.get(1)?,
            birth_date: parse_date(2, &birth_date)?,
            birth_year: row.get(3)?,
            reminder_days: row.get(4)?,
            is_active: row.get::<_, i32>(5)? == 1,
            created_at: parse_timestamp(6, &created_at)?,
            updated_at: parse_timestamp(7, &updated_at)?,
        })
    }

    fn row_to_birthday_with_friend(row: &Row) -> rusqlite::Result<BirthdayWithFriend> {
        let birthday = Self::row_to_birthday(row)?;
        let created_at: String = row.get("f_created_at")?;
        let updated_at: String = row.get("f_updated_at")?;

        let friend = Friend {
            id: row.get("f_id")?,
            name: row.get("f_name")?,
            email: row.get("f_email")?,
            phone: row.get("f_phone")?,
            notes: row.get("f_notes")?,
            created_at: parse_timestamp(13, &created_at)?,
            updated_at: parse_timestamp(14, &updated_at)?,
        };

        Ok(BirthdayWithFriend { birthday, friend })
    }
}
