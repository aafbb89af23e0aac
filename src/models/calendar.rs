use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::BirthdayWithFriend;

/// All matching birthdays that share one stored date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub birthdays: Vec<BirthdayWithFriend>,
}

/// Scope of a calendar query: a whole year, or one month of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarQuery {
    pub year: i32,
    #[serde(default)]
    pub month: Option<u32>,
}

impl CalendarQuery {
    pub fn year(year: i32) -> Self {
        Self { year, month: None }
    }

    pub fn month(year: i32, month: u32) -> Self {
        Self {
            year,
            month: Some(month),
        }
    }
}
