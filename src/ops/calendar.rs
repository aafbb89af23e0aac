use chrono::NaiveDate;
use tracing::debug;

use crate::calendar;
use crate::db::Database;
use crate::error::Result;
use crate::models::{BirthdayWithFriend, CalendarDay, CalendarQuery};

/// Active birthdays in `month`, ascending by day.
///
/// `year` is accepted for symmetry with `get_calendar_data` but does not
/// filter: birthdays recur, so the result is the same for every year.
pub fn get_birthdays_by_month(
    db: &Database,
    year: i32,
    month: u32,
) -> Result<Vec<BirthdayWithFriend>> {
    calendar::validate_month(month)?;
    let entries = db.list_active_birthdays_with_friend()?;
    let result = calendar::month_view(entries, month);
    debug!(year, month, count = result.len(), "month query");
    Ok(result)
}

/// Active birthdays matching `query`, grouped by stored date, ascending.
pub fn get_calendar_data(db: &Database, query: CalendarQuery) -> Result<Vec<CalendarDay>> {
    if let Some(month) = query.month {
        calendar::validate_month(month)?;
    }
    let entries = db.list_active_birthdays_with_friend()?;
    let days = calendar::calendar_days(entries, query);
    debug!(
        year = query.year,
        month = ?query.month,
        days = days.len(),
        "calendar query"
    );
    Ok(days)
}

/// Birthdays still ahead in `today`'s month, by day.
pub fn upcoming_in_month(db: &Database, today: NaiveDate) -> Result<Vec<BirthdayWithFriend>> {
    let entries = db.list_active_birthdays_with_friend()?;
    Ok(calendar::upcoming_in_month(entries, today))
}
