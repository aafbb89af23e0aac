//! The operations the calendar and list views are built on.
//!
//! Each function is one request/response unit against the store. Domain
//! checks (validation, not-found) happen here; everything else is a
//! persistence error from `db`.

mod birthdays;
mod calendar;
mod friends;

pub use birthdays::{create_birthday, delete_birthday, get_birthday, get_birthdays, update_birthday};
pub use calendar::{get_birthdays_by_month, get_calendar_data, upcoming_in_month};
pub use friends::{create_friend, delete_friend, get_friend, get_friends, update_friend};
