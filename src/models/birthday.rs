use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{Friend, Patch};
use crate::error::{Error, Result};

pub const DEFAULT_REMINDER_DAYS: u32 = 7;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Birthday {
    pub id: i64,
    pub friend_id: i64,
    pub birth_date: NaiveDate,
    pub birth_year: Option<i32>,
    pub reminder_days: u32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Birthday {
    /// How this birthday behaves on the calendar.
    pub fn occurrence(&self) -> BirthdayDate {
        BirthdayDate::from_stored(self.birth_date, self.birth_year)
    }
}

/// A birthday joined with the current state of its friend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BirthdayWithFriend {
    #[serde(flatten)]
    pub birthday: Birthday,
    pub friend: Friend,
}

/// A stored birth date interpreted for calendar matching.
///
/// Storage always holds a full date. When the birth year is unknown the
/// stored year is a placeholder and only month and day carry meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BirthdayDate {
    /// Pinned to the stored date, year included.
    Exact(NaiveDate),
    /// Recurs on this month and day in every year.
    Recurring { month: u32, day: u32 },
}

impl BirthdayDate {
    pub fn from_stored(birth_date: NaiveDate, birth_year: Option<i32>) -> Self {
        match birth_year {
            Some(_) => Self::Exact(birth_date),
            None => Self::Recurring {
                month: birth_date.month(),
                day: birth_date.day(),
            },
        }
    }

    pub fn month(&self) -> u32 {
        match self {
            Self::Exact(date) => date.month(),
            Self::Recurring { month, .. } => *month,
        }
    }

    pub fn day(&self) -> u32 {
        match self {
            Self::Exact(date) => date.day(),
            Self::Recurring { day, .. } => *day,
        }
    }

    /// Whether this entry shows up on a calendar for `year`.
    pub fn occurs_in(&self, year: i32) -> bool {
        match self {
            Self::Exact(date) => date.year() == year,
            Self::Recurring { .. } => true,
        }
    }

    /// The date the birthday is celebrated in `year`.
    ///
    /// Feb 29 falls back to Feb 28 in non-leap years.
    pub fn anniversary_in(&self, year: i32) -> Option<NaiveDate> {
        let (month, day) = (self.month(), self.day());
        NaiveDate::from_ymd_opt(year, month, day).or_else(|| {
            if month == 2 && day == 29 {
                NaiveDate::from_ymd_opt(year, 2, 28)
            } else {
                None
            }
        })
    }
}

/// Input for creating a birthday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBirthday {
    pub friend_id: i64,
    pub birth_date: NaiveDate,
    #[serde(default)]
    pub birth_year: Option<i32>,
    #[serde(default = "default_reminder_days")]
    pub reminder_days: u32,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_reminder_days() -> u32 {
    DEFAULT_REMINDER_DAYS
}

fn default_active() -> bool {
    true
}

impl NewBirthday {
    pub fn new(friend_id: i64, birth_date: NaiveDate) -> Self {
        Self {
            friend_id,
            birth_date,
            birth_year: None,
            reminder_days: DEFAULT_REMINDER_DAYS,
            is_active: true,
        }
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.birth_year = Some(year);
        self
    }

    pub fn with_reminder_days(mut self, days: u32) -> Self {
        self.reminder_days = days;
        self
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }

    pub fn validate(&self) -> Result<()> {
        check_birth_year(self.birth_date, self.birth_year)
    }
}

/// Partial update for a birthday. Only `Patch::Set` fields are written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BirthdayUpdate {
    pub friend_id: Patch<i64>,
    pub birth_date: Patch<NaiveDate>,
    pub birth_year: Patch<Option<i32>>,
    pub reminder_days: Patch<u32>,
    pub is_active: Patch<bool>,
}

impl BirthdayUpdate {
    pub fn is_empty(&self) -> bool {
        !(self.friend_id.is_set()
            || self.birth_date.is_set()
            || self.birth_year.is_set()
            || self.reminder_days.is_set()
            || self.is_active.is_set())
    }

    /// Merge supplied fields over `birthday`.
    ///
    /// Setting a year without a date moves the stored date into that year.
    /// Otherwise a known year has to match the year of the resulting date.
    pub fn apply(self, birthday: &mut Birthday) -> Result<()> {
        if let (Patch::Unchanged, Patch::Set(Some(year))) = (&self.birth_date, &self.birth_year) {
            birthday.birth_date = birth_date_in_year(birthday.birth_date, *year)?;
        }
        self.friend_id.apply_to(&mut birthday.friend_id);
        self.birth_date.apply_to(&mut birthday.birth_date);
        self.birth_year.apply_to(&mut birthday.birth_year);
        self.reminder_days.apply_to(&mut birthday.reminder_days);
        self.is_active.apply_to(&mut birthday.is_active);
        check_birth_year(birthday.birth_date, birthday.birth_year)
    }
}

/// The same month and day in `year`. Feb 29 only exists in leap years.
pub fn birth_date_in_year(date: NaiveDate, year: i32) -> Result<NaiveDate> {
    date.with_year(year).ok_or_else(|| {
        Error::validation(format!("{} has no {}", year, date.format("%B %-d")))
    })
}

fn check_birth_year(birth_date: NaiveDate, birth_year: Option<i32>) -> Result<()> {
    match birth_year {
        Some(year) if year != birth_date.year() => Err(Error::validation(format!(
            "Birth date {} does not fall in birth year {}",
            birth_date, year
        ))),
        _ => Ok(()),
    }
}

/// Outcome of a delete. Deleting a missing row is not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteResult {
    pub success: bool,
}
