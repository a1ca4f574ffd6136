//! Форматирование значений виджетов
//!
//! Пустые значения выводятся нейтральной заглушкой, а не `NaN`.

/// Заглушка для отсутствующего числа
pub const PLACEHOLDER: &str = "—";
/// Заглушка для отсутствующей средней оценки
pub const NOT_AVAILABLE: &str = "N/A";
/// Заглушка для неизвестной позиции в рейтинге
pub const UNKNOWN: &str = "?";

/// Число с фиксированным количеством знаков или заглушка
pub fn format_opt(value: Option<f64>, decimals: usize, placeholder: &str) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{:.prec$}", v, prec = decimals),
        _ => placeholder.to_string(),
    }
}

pub fn format_score(value: Option<f64>) -> String {
    format_opt(value, 2, PLACEHOLDER)
}

pub fn format_mark(value: Option<f64>) -> String {
    format_opt(value, 2, NOT_AVAILABLE)
}

/// Позиция в рейтинге в виде "3 / 20"
///
/// `rank == -1` и отсутствующие значения дают "?".
pub fn format_rank(rank: Option<i64>, total: Option<i64>) -> String {
    let rank = match rank {
        Some(r) if r > 0 => r.to_string(),
        _ => UNKNOWN.to_string(),
    };
    let total = match total {
        Some(t) if t >= 0 => t.to_string(),
        _ => UNKNOWN.to_string(),
    };
    format!("{} / {}", rank, total)
}

/// Целое число с разделителем тысяч (пробел)
pub fn format_thousands(value: f64) -> String {
    if !value.is_finite() {
        return PLACEHOLDER.to_string();
    }
    let n = value.round() as i64;
    let digits = n.unsigned_abs().to_string();
    let mut result = String::new();
    for (i, ch) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(' ');
        }
        result.push(ch);
    }
    if n < 0 {
        result.push('-');
    }
    result.chars().rev().collect()
}

/// `YYYY-MM-DD` -> `DD.MM`, иначе строка как есть
pub fn short_date(iso: &str) -> String {
    match chrono::NaiveDate::parse_from_str(iso, "%Y-%m-%d") {
        Ok(d) => d.format("%d.%m").to_string(),
        Err(_) => iso.to_string(),
    }
}

/// ISO-время создания -> `DD.MM.YYYY`
pub fn short_datetime(iso: &str) -> String {
    let date_part = iso.get(..10).unwrap_or(iso);
    match chrono::NaiveDate::parse_from_str(date_part, "%Y-%m-%d") {
        Ok(d) => d.format("%d.%m.%Y").to_string(),
        Err(_) => iso.to_string(),
    }
}

/// Категория внеучебной активности
pub fn category_label(code: &str) -> &str {
    match code {
        "SCIENCE" => "Наука",
        "SOCIAL" => "Общественная",
        "SPORTS" => "Спорт",
        "CULTURE" => "Культура",
        other => other,
    }
}
