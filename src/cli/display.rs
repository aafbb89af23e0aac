use chrono::NaiveDate;

use crate::calendar::{age_on, days_until};
use crate::models::{Birthday, BirthdayWithFriend, Friend};

pub const MONTH_NAMES: [&str; 12] = [
    "January", "February", "March", "April", "May", "June", "July", "August", "September",
    "October", "November", "December",
];

pub fn month_name(month: u32) -> &'static str {
    month
        .checked_sub(1)
        .and_then(|i| MONTH_NAMES.get(i as usize))
        .copied()
        .unwrap_or("?")
}

/// `Mar 15, 1990` when the year is known, `Mar 15` otherwise.
pub fn format_birth_date(birthday: &Birthday) -> String {
    let occurrence = birthday.occurrence();
    let name = month_name(occurrence.month());
    let short = name.get(..3).unwrap_or(name);
    match birthday.birth_year {
        Some(year) => format!("{} {}, {}", short, occurrence.day(), year),
        None => format!("{} {}", short, occurrence.day()),
    }
}

/// `(34 years old)` or empty when the year is unknown.
pub fn format_age(birthday: &Birthday, today: NaiveDate) -> String {
    age_on(birthday, today)
        .map(|age| format!("({} years old)", age))
        .unwrap_or_default()
}

pub fn format_countdown(birthday: &Birthday, today: NaiveDate) -> String {
    match days_until(birthday, today) {
        Some(0) => "today".to_string(),
        Some(1) => "tomorrow".to_string(),
        Some(n) => format!("in {} days", n),
        None => String::new(),
    }
}

/// One friend per line: id, name, then whatever contact details exist.
pub fn format_friend_line(friend: &Friend) -> String {
    let mut parts = vec![format!("#{:<4}", friend.id), friend.name.clone()];
    if let Some(ref email) = friend.email {
        parts.push(email.clone());
    }
    if let Some(ref phone) = friend.phone {
        parts.push(phone.clone());
    }
    parts.join("  ")
}

/// One birthday per line for the full listing.
pub fn format_birthday_line(entry: &BirthdayWithFriend, today: NaiveDate) -> String {
    let b = &entry.birthday;
    let mut line = format!(
        "#{:<4}{:<14}{}",
        b.id,
        format_birth_date(b),
        entry.friend.name
    );
    let age = format_age(b, today);
    if !age.is_empty() {
        line.push_str("  ");
        line.push_str(&age);
    }
    if !b.is_active {
        line.push_str("  [inactive]");
    }
    line
}

/// Month and upcoming views: day, name, age, countdown.
pub fn format_month_entry(entry: &BirthdayWithFriend, today: NaiveDate) -> String {
    let b = &entry.birthday;
    let mut line = format!("{:>2}  {}", b.occurrence().day(), entry.friend.name);
    let age = format_age(b, today);
    if !age.is_empty() {
        line.push(' ');
        line.push_str(&age);
    }
    let countdown = format_countdown(b, today);
    if !countdown.is_empty() {
        line.push_str(&format!("  ({})", countdown));
    }
    line
}

/// Print a friend with clean formatting (only non-empty fields)
pub fn print_friend_detail(friend: &Friend, birthdays: &[BirthdayWithFriend], today: NaiveDate) {
    println!("{}\n", friend.name);

    if let Some(ref email) = friend.email {
        println!("  {}", email);
    }
    if let Some(ref phone) = friend.phone {
        println!("  {}", phone);
    }
    if let Some(ref notes) = friend.notes {
        println!("  {}", truncate(notes, 60));
    }

    if !birthdays.is_empty() {
        println!();
        for entry in birthdays {
            println!("  {}", format_birthday_line(entry, today));
        }
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let text: String = s.chars().take(max_chars - 1).collect();
        format!("{}…", text.trim_end())
    } else {
        s.to_string()
    }
}
