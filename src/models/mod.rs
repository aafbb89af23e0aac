mod birthday;
mod calendar;
mod friend;
mod patch;

pub use birthday::*;
pub use calendar::*;
pub use friend::*;
pub use patch::*;
