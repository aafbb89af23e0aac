use anyhow::Result;
use chrono::{Datelike, Local, NaiveDate};
use crossterm::style::{style, Stylize};
use std::collections::BTreeMap;

use super::display::month_name;
use super::ui::{print_json, use_color};
use super::CalendarArgs;
use crate::config::{Config, WeekStart};
use crate::db::Database;
use crate::models::{CalendarDay, CalendarQuery};
use crate::ops;

const CELL_WIDTH: usize = 4;
const BIRTHDAY_MARKER: char = '*';

/// Execute the calendar command
pub fn run_calendar(db: &Database, args: CalendarArgs, json: bool) -> Result<()> {
    let today = Local::now().date_naive();
    let year = args.year.unwrap_or_else(|| today.year());
    let query = CalendarQuery {
        year,
        month: args.month,
    };

    let days = ops::get_calendar_data(db, query)?;

    if json {
        return print_json(&days);
    }

    match args.month {
        Some(month) => {
            let grid = GridStyle {
                week_start: Config::load(db)?.week_start,
                today: Some(today),
                highlight: use_color(),
            };
            print!("{}", render_month_grid(&days, year, month, &grid));
            print!("{}", render_day_list(&days));
        }
        None => print!("{}", render_year_overview(&days, year)),
    }
    Ok(())
}

pub struct GridStyle {
    pub week_start: WeekStart,
    pub today: Option<NaiveDate>,
    pub highlight: bool,
}

/// A month grid with a marker after every day that has a birthday.
pub fn render_month_grid(days: &[CalendarDay], year: i32, month: u32, grid: &GridStyle) -> String {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return String::new();
    };
    let marked: Vec<u32> = days
        .iter()
        .filter(|d| d.date.month() == month)
        .map(|d| d.date.day())
        .collect();

    let mut out = format!("{} {}\n", month_name(month), year);

    let headers = match grid.week_start {
        WeekStart::Monday => ["Mo", "Tu", "We", "Th", "Fr", "Sa", "Su"],
        WeekStart::Sunday => ["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"],
    };
    for h in headers {
        out.push_str(&format!("{:<width$}", h, width = CELL_WIDTH));
    }
    trim_line_end(&mut out);

    let offset = match grid.week_start {
        WeekStart::Monday => first.weekday().num_days_from_monday(),
        WeekStart::Sunday => first.weekday().num_days_from_sunday(),
    } as usize;
    out.push_str(&" ".repeat(offset * CELL_WIDTH));

    let mut column = offset;
    for day in 1..=days_in_month(year, month) {
        let label = format!("{:>2}", day);
        let is_today = grid
            .today
            .is_some_and(|t| t.year() == year && t.month() == month && t.day() == day);
        let label = if is_today && grid.highlight {
            style(label).reverse().to_string()
        } else {
            label
        };
        let marker = if marked.contains(&day) {
            BIRTHDAY_MARKER
        } else {
            ' '
        };

        out.push_str(&label);
        out.push(marker);
        out.push(' ');

        column += 1;
        if column == 7 {
            trim_line_end(&mut out);
            column = 0;
        }
    }
    if column != 0 {
        trim_line_end(&mut out);
    }
    out
}

/// Names under the grid, one line per marked day.
pub fn render_day_list(days: &[CalendarDay]) -> String {
    let mut out = String::new();
    if days.is_empty() {
        out.push_str("\nNo birthdays this month\n");
        return out;
    }
    out.push('\n');
    for day in days {
        let names: Vec<&str> = day
            .birthdays
            .iter()
            .map(|b| b.friend.name.as_str())
            .collect();
        out.push_str(&format!("{:>2}  {}\n", day.date.day(), names.join(", ")));
    }
    out
}

/// Whole-year view: one block per month that has at least one birthday.
pub fn render_year_overview(days: &[CalendarDay], year: i32) -> String {
    let mut by_month: BTreeMap<u32, Vec<&CalendarDay>> = BTreeMap::new();
    for day in days {
        by_month.entry(day.date.month()).or_default().push(day);
    }

    let mut out = format!("{}\n", year);
    if by_month.is_empty() {
        out.push_str("\nNo birthdays this year\n");
        return out;
    }
    for (month, month_days) in by_month {
        out.push_str(&format!("\n{}\n", month_name(month)));
        // Stored dates from different years can share a day of month
        let mut sorted = month_days;
        sorted.sort_by_key(|d| d.date.day());
        for day in sorted {
            for entry in &day.birthdays {
                out.push_str(&format!("  {:>2}  {}\n", day.date.day(), entry.friend.name));
            }
        }
    }
    out
}

fn trim_line_end(out: &mut String) {
    let trimmed = out.trim_end_matches(' ').len();
    out.truncate(trimmed);
    out.push('\n');
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .unwrap_or(31)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewBirthday, NewFriend};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn plain(week_start: WeekStart) -> GridStyle {
        GridStyle {
            week_start,
            today: None,
            highlight: false,
        }
    }

    fn sample_days() -> Vec<CalendarDay> {
        let db = Database::open_memory().unwrap();
        let ann = ops::create_friend(&db, NewFriend::new("Ann")).unwrap();
        let bob = ops::create_friend(&db, NewFriend::new("Bob")).unwrap();
        ops::create_birthday(&db, NewBirthday::new(ann.id, date(1990, 2, 14))).unwrap();
        ops::create_birthday(&db, NewBirthday::new(bob.id, date(2024, 2, 14)).with_year(2024))
            .unwrap();
        ops::create_birthday(&db, NewBirthday::new(bob.id, date(1985, 7, 4))).unwrap();
        ops::get_calendar_data(&db, CalendarQuery::year(2024)).unwrap()
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2025, 2), 28);
        assert_eq!(days_in_month(2024, 12), 31);
        assert_eq!(days_in_month(2024, 4), 30);
    }

    #[test]
    fn test_month_grid_monday_start() {
        // 2024-02-01 is a Thursday
        let grid = render_month_grid(&sample_days(), 2024, 2, &plain(WeekStart::Monday));
        let lines: Vec<&str> = grid.lines().collect();

        assert_eq!(lines[0], "February 2024");
        assert_eq!(lines[1], "Mo  Tu  We  Th  Fr  Sa  Su");
        assert_eq!(lines[2], "             1   2   3   4");
        assert_eq!(lines[3], " 5   6   7   8   9  10  11");
        assert_eq!(lines[4], "12  13  14* 15  16  17  18");
        assert_eq!(lines[6], "26  27  28  29");
    }

    #[test]
    fn test_month_grid_sunday_start() {
        let grid = render_month_grid(&[], 2024, 2, &plain(WeekStart::Sunday));
        let lines: Vec<&str> = grid.lines().collect();

        assert_eq!(lines[1], "Su  Mo  Tu  We  Th  Fr  Sa");
        assert_eq!(lines[2], "                 1   2   3");
        assert!(!grid.contains('*'));
    }

    #[test]
    fn test_day_list_groups_names() {
        let days = sample_days();
        let feb: Vec<CalendarDay> = days.into_iter().filter(|d| d.date.month() == 2).collect();
        let out = render_day_list(&feb);

        // Recurring and pinned entries keep separate groups
        assert_eq!(out.matches("14  ").count(), 2);
        assert!(out.contains("14  Ann"));
        assert!(out.contains("14  Bob"));
    }

    #[test]
    fn test_year_overview() {
        let out = render_year_overview(&sample_days(), 2024);

        assert!(out.starts_with("2024\n"));
        let feb = out.find("February").unwrap();
        let jul = out.find("July").unwrap();
        assert!(feb < jul);
        assert!(out.contains("   4  Bob"));

        let empty = render_year_overview(&[], 2030);
        assert!(empty.contains("No birthdays this year"));
    }
}
