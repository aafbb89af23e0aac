//! Calendar bucketing over active birthdays.
//!
//! Everything here is pure: callers hand in birthdays in store order and get
//! back filtered, grouped and ordered views. Inactive entries are dropped by
//! every function in this module.

use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::models::{Birthday, BirthdayWithFriend, CalendarDay, CalendarQuery};

pub fn validate_month(month: u32) -> Result<()> {
    if (1..=12).contains(&month) {
        Ok(())
    } else {
        Err(Error::validation(format!(
            "Month must be between 1 and 12, got {}",
            month
        )))
    }
}

/// Active birthdays falling in `month` of any year, ascending by day of month.
///
/// The sort is stable so same-day entries keep store order.
pub fn month_view(entries: Vec<BirthdayWithFriend>, month: u32) -> Vec<BirthdayWithFriend> {
    let mut selected: Vec<_> = entries
        .into_iter()
        .filter(|e| e.birthday.is_active && e.birthday.occurrence().month() == month)
        .collect();
    selected.sort_by_key(|e| e.birthday.occurrence().day());
    selected
}

/// Group active birthdays matching `query` by their stored date.
///
/// Exact entries match only their own year; recurring entries match every
/// year. The grouping key is the stored date including its year, so entries
/// that share a month and day but not a stored year land in separate days.
pub fn calendar_days(entries: Vec<BirthdayWithFriend>, query: CalendarQuery) -> Vec<CalendarDay> {
    let mut by_date: BTreeMap<NaiveDate, Vec<BirthdayWithFriend>> = BTreeMap::new();

    for entry in entries {
        let occurrence = entry.birthday.occurrence();
        if !entry.birthday.is_active || !occurrence.occurs_in(query.year) {
            continue;
        }
        if query.month.is_some_and(|m| occurrence.month() != m) {
            continue;
        }
        by_date
            .entry(entry.birthday.birth_date)
            .or_default()
            .push(entry);
    }

    by_date
        .into_iter()
        .map(|(date, birthdays)| CalendarDay { date, birthdays })
        .collect()
}

/// Completed years on `today`, when the birth year is known.
pub fn age_on(birthday: &Birthday, today: NaiveDate) -> Option<u32> {
    let birth_year = birthday.birth_year?;
    let mut age = today.year() - birth_year;
    let occurrence = birthday.occurrence();
    if (today.month(), today.day()) < (occurrence.month(), occurrence.day()) {
        age -= 1;
    }
    u32::try_from(age).ok()
}

/// The next celebration on or after `today`.
pub fn next_occurrence(birthday: &Birthday, today: NaiveDate) -> Option<NaiveDate> {
    let occurrence = birthday.occurrence();
    let this_year = occurrence.anniversary_in(today.year())?;
    if this_year >= today {
        Some(this_year)
    } else {
        occurrence.anniversary_in(today.year() + 1)
    }
}

pub fn days_until(birthday: &Birthday, today: NaiveDate) -> Option<i64> {
    next_occurrence(birthday, today).map(|next| (next - today).num_days())
}

/// Birthdays still ahead in `today`'s month (today included), by day.
pub fn upcoming_in_month(
    entries: Vec<BirthdayWithFriend>,
    today: NaiveDate,
) -> Vec<BirthdayWithFriend> {
    month_view(entries, today.month())
        .into_iter()
        .filter(|e| {
            e.birthday
                .occurrence()
                .anniversary_in(today.year())
                .is_some_and(|d| d >= today)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Friend;
    use chrono::Utc;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn entry(id: i64, birth_date: NaiveDate, birth_year: Option<i32>) -> BirthdayWithFriend {
        let now = Utc::now();
        BirthdayWithFriend {
            birthday: Birthday {
                id,
                friend_id: 1,
                birth_date,
                birth_year,
                reminder_days: 7,
                is_active: true,
                created_at: now,
                updated_at: now,
            },
            friend: Friend {
                id: 1,
                name: "Test".to_string(),
                email: None,
                phone: None,
                notes: None,
                created_at: now,
                updated_at: now,
            },
        }
    }

    fn ids(entries: &[BirthdayWithFriend]) -> Vec<i64> {
        entries.iter().map(|e| e.birthday.id).collect()
    }

    #[test]
    fn test_validate_month() {
        assert!(validate_month(1).is_ok());
        assert!(validate_month(12).is_ok());
        assert!(validate_month(0).unwrap_err().is_validation());
        assert!(validate_month(13).is_err());
    }

    #[test]
    fn test_month_view_orders_by_day() {
        let entries = vec![
            entry(1, date(1990, 5, 25), Some(1990)),
            entry(2, date(1985, 5, 5), None),
            entry(3, date(2001, 6, 1), None),
            entry(4, date(1970, 5, 15), Some(1970)),
        ];

        let result = month_view(entries, 5);
        assert_eq!(ids(&result), vec![2, 4, 1]);
    }

    #[test]
    fn test_month_view_same_day_keeps_store_order() {
        let entries = vec![
            entry(1, date(1990, 3, 10), None),
            entry(2, date(1980, 3, 2), None),
            entry(3, date(1970, 3, 10), Some(1970)),
        ];

        assert_eq!(ids(&month_view(entries, 3)), vec![2, 1, 3]);
    }

    #[test]
    fn test_month_view_drops_inactive() {
        let mut inactive = entry(2, date(1990, 3, 1), None);
        inactive.birthday.is_active = false;
        let entries = vec![entry(1, date(1990, 3, 2), None), inactive];

        assert_eq!(ids(&month_view(entries, 3)), vec![1]);
    }

    #[test]
    fn test_calendar_days_recurring_matches_any_year() {
        let entries = || {
            vec![
                entry(1, date(1990, 3, 15), Some(1990)),
                entry(2, date(1990, 7, 22), None),
            ]
        };

        let pinned_year = calendar_days(entries(), CalendarQuery::year(1990));
        assert_eq!(pinned_year.len(), 2);
        assert_eq!(pinned_year[0].date, date(1990, 3, 15));
        assert_eq!(pinned_year[1].date, date(1990, 7, 22));

        let other_year = calendar_days(entries(), CalendarQuery::year(2025));
        assert_eq!(other_year.len(), 1);
        assert_eq!(ids(&other_year[0].birthdays), vec![2]);
    }

    #[test]
    fn test_calendar_days_groups_by_full_stored_date() {
        let entries = vec![
            entry(1, date(2024, 3, 15), Some(2024)),
            entry(2, date(1990, 3, 15), None),
            entry(3, date(2024, 3, 15), None),
        ];

        let days = calendar_days(entries, CalendarQuery::year(2024));
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date, date(1990, 3, 15));
        assert_eq!(ids(&days[0].birthdays), vec![2]);
        assert_eq!(days[1].date, date(2024, 3, 15));
        assert_eq!(ids(&days[1].birthdays), vec![1, 3]);
    }

    #[test]
    fn test_calendar_days_month_filter() {
        let entries = vec![
            entry(1, date(2024, 3, 15), Some(2024)),
            entry(2, date(2000, 4, 1), None),
            entry(3, date(2000, 3, 1), None),
        ];

        let days = calendar_days(entries, CalendarQuery::month(2024, 3));
        let dates: Vec<NaiveDate> = days.iter().map(|d| d.date).collect();
        assert_eq!(dates, vec![date(2000, 3, 1), date(2024, 3, 15)]);
    }

    #[test]
    fn test_calendar_days_empty() {
        assert!(calendar_days(Vec::new(), CalendarQuery::year(2024)).is_empty());
    }

    #[test]
    fn test_age_on() {
        let known = entry(1, date(1990, 3, 15), Some(1990)).birthday;
        assert_eq!(age_on(&known, date(2024, 3, 14)), Some(33));
        assert_eq!(age_on(&known, date(2024, 3, 15)), Some(34));
        assert_eq!(age_on(&known, date(1989, 1, 1)), None);

        let unknown = entry(2, date(1990, 3, 15), None).birthday;
        assert_eq!(age_on(&unknown, date(2024, 3, 15)), None);
    }

    #[test]
    fn test_next_occurrence_wraps_to_next_year() {
        let b = entry(1, date(1990, 1, 10), None).birthday;
        assert_eq!(next_occurrence(&b, date(2024, 1, 10)), Some(date(2024, 1, 10)));
        assert_eq!(next_occurrence(&b, date(2024, 1, 11)), Some(date(2025, 1, 10)));
        assert_eq!(days_until(&b, date(2024, 12, 31)), Some(10));
    }

    #[test]
    fn test_upcoming_in_month() {
        let entries = vec![
            entry(1, date(1990, 5, 2), None),
            entry(2, date(1990, 5, 20), None),
            entry(3, date(1990, 5, 10), Some(1990)),
            entry(4, date(1990, 6, 1), None),
        ];

        let upcoming = upcoming_in_month(entries, date(2024, 5, 10));
        assert_eq!(ids(&upcoming), vec![3, 2]);
    }
}
