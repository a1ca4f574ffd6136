/// Утилиты для работы со списками (поиск, сортировка)
use std::cmp::Ordering;

/// Trait для типов данных, поддерживающих поиск
pub trait Searchable {
    /// Проверяет, соответствует ли объект поисковому запросу (уже в нижнем регистре)
    fn matches_filter(&self, filter_lower: &str) -> bool;
}

/// Trait для типов данных, поддерживающих сортировку
pub trait Sortable {
    type Field: Copy;

    /// Сравнивает два объекта по указанному полю
    fn compare_by_field(&self, other: &Self, field: Self::Field) -> Ordering;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn flipped(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    pub fn apply(self, cmp: Ordering) -> Ordering {
        match self {
            Self::Asc => cmp,
            Self::Desc => cmp.reverse(),
        }
    }
}

/// Сортирует список по указанному полю
///
/// Сортировка стабильная: равные элементы сохраняют исходный (серверный) порядок
/// в обоих направлениях, поэтому входной срез должен быть в исходном порядке.
pub fn sort_list<T: Sortable>(items: &mut [T], field: T::Field, order: SortOrder) {
    items.sort_by(|a, b| order.apply(a.compare_by_field(b, field)));
}

/// Сравнение опциональных чисел: отсутствующие значения всегда в конце при Asc
pub fn compare_opt_f64(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Фильтрует список по поисковому запросу
pub fn filter_list<'a, T: Searchable>(items: &'a [T], filter: &str) -> Vec<&'a T> {
    let filter = filter.trim().to_lowercase();
    if filter.is_empty() {
        return items.iter().collect();
    }
    items.iter().filter(|item| item.matches_filter(&filter)).collect()
}

/// Получить индикатор сортировки для заголовка
pub fn get_sort_indicator(is_current: bool, order: SortOrder) -> &'static str {
    if is_current {
        match order {
            SortOrder::Asc => " ▲",
            SortOrder::Desc => " ▼",
        }
    } else {
        " ⇅"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        name: &'static str,
        score: Option<f64>,
    }

    impl Sortable for Row {
        type Field = ();
        fn compare_by_field(&self, other: &Self, _: ()) -> Ordering {
            compare_opt_f64(self.score, other.score)
        }
    }

    impl Searchable for Row {
        fn matches_filter(&self, filter_lower: &str) -> bool {
            self.name.to_lowercase().contains(filter_lower)
        }
    }

    fn rows() -> Vec<Row> {
        vec![
            Row { name: "Анна", score: Some(5.0) },
            Row { name: "Борис", score: Some(7.0) },
            Row { name: "Вера", score: Some(5.0) },
            Row { name: "Глеб", score: None },
        ]
    }

    #[test]
    fn test_ties_keep_source_order_both_ways() {
        let mut asc = rows();
        sort_list(&mut asc, (), SortOrder::Asc);
        let names: Vec<_> = asc.iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["Анна", "Вера", "Борис", "Глеб"]);

        let mut desc = rows();
        sort_list(&mut desc, (), SortOrder::Desc);
        let names: Vec<_> = desc.iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["Глеб", "Борис", "Анна", "Вера"]);
    }

    #[test]
    fn test_filter_is_case_insensitive() {
        let data = rows();
        let found = filter_list(&data, "  ВЕР ");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Вера");
        assert_eq!(filter_list(&data, "").len(), 4);
    }

    #[test]
    fn test_sort_indicator() {
        assert_eq!(get_sort_indicator(true, SortOrder::Desc), " ▼");
        assert_eq!(get_sort_indicator(false, SortOrder::Desc), " ⇅");
    }
}
