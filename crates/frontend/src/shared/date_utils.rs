/// Учебный календарь: учебный год начинается в сентябре
use chrono::{Datelike, NaiveDate, Utc};

/// Месяц начала учебного года
pub const ACADEMIC_YEAR_START_MONTH: u32 = 9;

pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Календарный год, в котором начался текущий учебный год
/// Example: 2024-10-07 -> 2024, 2025-03-01 -> 2024
pub fn academic_year_start(date: NaiveDate) -> i32 {
    if date.month() >= ACADEMIC_YEAR_START_MONTH {
        date.year()
    } else {
        date.year() - 1
    }
}

/// Год набора студентов, которые сейчас учатся на курсе `course`
pub fn formation_year(course: u8, date: NaiveDate) -> i32 {
    academic_year_start(date) - (i32::from(course.max(1)) - 1)
}

/// Годы набора, доступные в фильтре: от текущего назад на `count` лет
pub fn recent_formation_years(date: NaiveDate, count: u8) -> Vec<i32> {
    (1..=count).map(|course| formation_year(course, date)).collect()
}

/// `YYYY-MM-DD` для имён файлов отчётов
pub fn iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_academic_year_starts_in_september() {
        assert_eq!(academic_year_start(date(2024, 9, 1)), 2024);
        assert_eq!(academic_year_start(date(2024, 8, 31)), 2023);
        assert_eq!(academic_year_start(date(2025, 3, 1)), 2024);
    }

    #[test]
    fn test_formation_year_by_course() {
        assert_eq!(formation_year(1, date(2024, 10, 7)), 2024);
        assert_eq!(formation_year(3, date(2024, 10, 7)), 2022);
        assert_eq!(formation_year(3, date(2025, 2, 1)), 2022);
        assert_eq!(recent_formation_years(date(2024, 10, 7), 4), vec![2024, 2023, 2022, 2021]);
    }

    #[test]
    fn test_iso_date() {
        assert_eq!(iso_date(date(2024, 3, 5)), "2024-03-05");
    }
}
