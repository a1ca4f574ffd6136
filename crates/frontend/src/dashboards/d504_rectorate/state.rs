//! Rectorate dashboard: faculty comparison, education forms, extracurricular
//! activity and the university-wide metrics derived from them.

use contracts::analytics::{
    widget_ids as w, FacultyActivity, FacultyAverage, LabelCount, RectorateFilters, WidgetQueryResponse,
};
use contracts::system::auth::RoleName;

use crate::analytics::{
    distribute, distribute_failure, widgets_for_role, BatchTracker, PendingQuery, RendererMap,
    WidgetDashboard, WidgetSet, WidgetSlot,
};
use crate::shared::chart::{ChartKind, ChartSpec, Dataset};
use crate::shared::format::{category_label, format_mark, format_thousands};

const FACULTY_ACRONYMS: [(&str, &str); 7] = [
    ("Факультет компьютерных систем и сетей", "ФКСиС"),
    ("Факультет информационных технологий и управления", "ФИТУ"),
    ("Инженерно-экономический факультет", "ИЭФ"),
    ("Факультет инфокоммуникаций", "ФИК"),
    ("Факультет радиотехники и электроники", "ФРЭ"),
    ("Военный факультет", "ВФ"),
    ("Факультет инновационного непрерывного образования", "ФИНО"),
];

/// Short faculty name; unknown faculties keep the full one.
pub fn faculty_acronym(name: &str) -> &str {
    FACULTY_ACRONYMS
        .iter()
        .find(|(full, _)| *full == name)
        .map(|(_, short)| *short)
        .unwrap_or(name)
}

pub fn education_form_label(code: &str) -> &'static str {
    if code == "BUDGET" {
        "Бюджет"
    } else {
        "Платно"
    }
}

pub fn performance_class(average: Option<f64>) -> &'static str {
    match average {
        Some(m) if m >= 8.0 => "perf-value perf-value--high",
        Some(m) if m < 5.0 => "perf-value perf-value--low",
        _ => "perf-value",
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FacultyLine {
    pub short_name: String,
    pub full_name: String,
    pub average: String,
    pub class: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RectorateState {
    filters: RectorateFilters,
    widgets: WidgetSet,
    tracker: BatchTracker,
    pub faculties: WidgetSlot<Vec<FacultyAverage>>,
    pub education: WidgetSlot<Vec<LabelCount>>,
    pub activity: WidgetSlot<Vec<FacultyActivity>>,
}

impl RectorateState {
    pub fn new(rectorate_id: i64) -> Self {
        Self {
            filters: RectorateFilters { rectorate_id },
            widgets: widgets_for_role(RoleName::RectorateStaff).unwrap_or_default(),
            tracker: BatchTracker::default(),
            faculties: WidgetSlot::Loading,
            education: WidgetSlot::Loading,
            activity: WidgetSlot::Loading,
        }
    }

    pub fn load_all(&mut self) -> PendingQuery<RectorateFilters> {
        let set = self.widgets.clone();
        self.reload_set(set)
    }

    pub fn reload(&mut self, ids: &[&str]) -> PendingQuery<RectorateFilters> {
        let set = self.widgets.narrow(ids);
        self.reload_set(set)
    }

    fn reload_set(&mut self, set: WidgetSet) -> PendingQuery<RectorateFilters> {
        for id in set.iter() {
            match id.as_str() {
                w::FACULTY_PERFORMANCE_COMPARISON => self.faculties.begin_update(),
                w::EDUCATION_FORM_DISTRIBUTION => self.education.begin_update(),
                w::EXTRACURRICULAR_ACTIVITY_OVERVIEW => self.activity.begin_update(),
                _ => {}
            }
        }
        self.tracker.begin(&self.filters, &set)
    }

    fn renderers(&mut self) -> RendererMap<'_> {
        let Self {
            faculties,
            education,
            activity,
            ..
        } = self;
        let mut map = RendererMap::new();
        map.register(w::FACULTY_PERFORMANCE_COMPARISON, move |input| {
            *faculties = WidgetSlot::from_input(w::FACULTY_PERFORMANCE_COMPARISON, input)
        })
        .register(w::EDUCATION_FORM_DISTRIBUTION, move |input| {
            *education = WidgetSlot::from_input(w::EDUCATION_FORM_DISTRIBUTION, input)
        })
        .register(w::EXTRACURRICULAR_ACTIVITY_OVERVIEW, move |input| {
            *activity = WidgetSlot::from_input(w::EXTRACURRICULAR_ACTIVITY_OVERVIEW, input)
        });
        map
    }

    /// Faculties by average mark, best first.
    pub fn faculty_lines(&self) -> Vec<FacultyLine> {
        let mut items = self.faculties.data().cloned().unwrap_or_default();
        items.sort_by(|a, b| {
            b.average_mark
                .unwrap_or(f64::NEG_INFINITY)
                .total_cmp(&a.average_mark.unwrap_or(f64::NEG_INFINITY))
        });
        items
            .into_iter()
            .map(|f| FacultyLine {
                short_name: faculty_acronym(&f.faculty_name).to_string(),
                average: format_mark(f.average_mark),
                class: performance_class(f.average_mark),
                full_name: f.faculty_name,
            })
            .collect()
    }

    pub fn education_spec(&self) -> Option<ChartSpec> {
        let items = self.education.data()?;
        Some(ChartSpec::radial(
            ChartKind::Pie,
            "Студенты",
            items
                .iter()
                .map(|i| (education_form_label(&i.label).to_string(), i.count as f64))
                .collect(),
        ))
    }

    /// Stacked bars: faculties on the axis, one dataset per category; a
    /// missing pair counts as zero.
    pub fn activity_spec(&self) -> Option<ChartSpec> {
        let items = self.activity.data()?;
        let mut faculties: Vec<&str> = Vec::new();
        let mut categories: Vec<&str> = Vec::new();
        for item in items {
            if !faculties.contains(&item.faculty_name.as_str()) {
                faculties.push(&item.faculty_name);
            }
            if !categories.contains(&item.category.as_str()) {
                categories.push(&item.category);
            }
        }
        let labels = faculties.iter().map(|f| faculty_acronym(f).to_string()).collect();
        let spec = categories
            .iter()
            .enumerate()
            .fold(ChartSpec::new(ChartKind::Bar, labels), |spec, (index, category)| {
                let values = faculties
                    .iter()
                    .map(|faculty| {
                        let points = items
                            .iter()
                            .find(|i| i.faculty_name == *faculty && i.category == *category)
                            .map_or(0.0, |i| i.total_points);
                        Some(points)
                    })
                    .collect();
                spec.with_dataset(Dataset::new(category_label(category), values, index))
            });
        Some(spec.stacked())
    }

    pub fn total_students(&self) -> i64 {
        self.education
            .data()
            .map(|items| items.iter().map(|i| i.count).sum())
            .unwrap_or(0)
    }

    /// Mean of faculty averages; faculties without one count as zero.
    pub fn mean_gpa(&self) -> f64 {
        match self.faculties.data() {
            Some(items) if !items.is_empty() => {
                items.iter().map(|f| f.average_mark.unwrap_or(0.0)).sum::<f64>() / items.len() as f64
            }
            _ => 0.0,
        }
    }

    pub fn total_points(&self) -> f64 {
        self.activity
            .data()
            .map(|items| items.iter().map(|i| i.total_points).sum::<f64>())
            .unwrap_or(0.0)
            .round()
    }

    pub fn metrics(&self) -> [(&'static str, String); 3] {
        [
            ("Всего студентов", format_thousands(self.total_students() as f64)),
            ("Средний балл по университету", format!("{:.2}", self.mean_gpa())),
            ("Баллы за активность", format_thousands(self.total_points())),
        ]
    }
}

impl WidgetDashboard for RectorateState {
    type Filters = RectorateFilters;

    fn apply_response(&mut self, response: &WidgetQueryResponse, batch: &PendingQuery<RectorateFilters>) {
        let accepted = self.tracker.accepted(&batch.widgets, batch.generation);
        distribute(response, &accepted, &mut self.renderers());
    }

    fn apply_failure(&mut self, batch: &PendingQuery<RectorateFilters>, message: &str) {
        let accepted = self.tracker.accepted(&batch.widgets, batch.generation);
        distribute_failure(&accepted, &mut self.renderers(), message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn loaded() -> RectorateState {
        let mut state = RectorateState::new(9);
        let batch = state.load_all();
        let response: WidgetQueryResponse = serde_json::from_value(json!({ "widgets": {
            "facultyPerformanceComparison": { "data": [
                { "facultyName": "Военный факультет", "averageMark": 4.5 },
                { "facultyName": "Факультет компьютерных систем и сетей", "averageMark": 8.25 },
                { "facultyName": "Новый факультет", "averageMark": 6.0 }
            ] },
            "educationFormDistribution": { "data": [
                { "label": "BUDGET", "count": 1200 },
                { "label": "PAID", "count": 800 }
            ] },
            "extracurricularActivityOverview": { "data": [
                { "facultyName": "Военный факультет", "category": "SPORTS", "totalPoints": 10.4 },
                { "facultyName": "Факультет компьютерных систем и сетей", "category": "SCIENCE", "totalPoints": 20.3 }
            ] }
        } }))
        .unwrap();
        state.apply_response(&response, &batch);
        state
    }

    #[test]
    fn test_faculty_lines_sorted_with_acronyms() {
        let lines = loaded().faculty_lines();
        let names: Vec<_> = lines.iter().map(|l| l.short_name.as_str()).collect();
        assert_eq!(names, vec!["ФКСиС", "Новый факультет", "ВФ"]);
        assert_eq!(lines[0].class, "perf-value perf-value--high");
        assert_eq!(lines[1].class, "perf-value");
        assert_eq!(lines[2].class, "perf-value perf-value--low");
        assert_eq!(lines[0].average, "8.25");
    }

    #[test]
    fn test_education_labels() {
        let spec = loaded().education_spec().unwrap();
        assert_eq!(spec.labels, vec!["Бюджет", "Платно"]);
    }

    #[test]
    fn test_activity_fills_missing_pairs_with_zero() {
        let spec = loaded().activity_spec().unwrap();
        assert!(spec.stacked);
        assert_eq!(spec.labels, vec!["ВФ", "ФКСиС"]);
        assert_eq!(spec.datasets[0].label, "Спорт");
        assert_eq!(spec.datasets[0].data, vec![Some(10.4), Some(0.0)]);
        assert_eq!(spec.datasets[1].data, vec![Some(0.0), Some(20.3)]);
    }

    #[test]
    fn test_metrics() {
        let state = loaded();
        assert_eq!(state.total_students(), 2000);
        assert!((state.mean_gpa() - 6.25).abs() < 1e-9);
        assert_eq!(state.total_points(), 31.0);
        assert_eq!(state.metrics()[0].1, "2 000");
    }
}
