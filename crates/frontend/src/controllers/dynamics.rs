//! Student rank dynamics: line picker and peer-comparison overlay.

use contracts::analytics::{dynamics_lines, RankDynamics, SemesterPoint, COMPARE_SUFFIX};
use std::collections::{BTreeMap, BTreeSet};

use crate::analytics::WidgetSlot;
use crate::shared::chart::{ChartKind, ChartSpec, Dataset};
use crate::shared::error::{DashboardError, DashboardResult};

pub const COMPARE_NOT_FOUND: &str = "Студент не найден или нет данных";

pub fn line_label(key: &str) -> &str {
    match key {
        dynamics_lines::CUMULATIVE_TOTAL => "Накопительный итог",
        dynamics_lines::SEMESTER_TOTAL => "Балл за семестр",
        dynamics_lines::ACADEMIC => "Средний балл (учеба)",
        dynamics_lines::ACHIEVEMENTS => "Достижения (накопительно)",
        dynamics_lines::ABSENCES => "Штрафы за пропуски (накопительно)",
        other => other,
    }
}

/// Outcome of applying the line picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinesChange {
    Unchanged,
    /// Every checked line is already held; redraw only.
    LocalOnly,
    /// Some checked line was never fetched; `myRankDynamics` must be re-queried.
    Refetch,
}

/// Outcome of the comparison input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareChange {
    Unchanged,
    /// Overlay removed locally, in-flight comparison data will be dropped.
    Cleared,
    Requested(i64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DynamicsState {
    slot: WidgetSlot<RankDynamics>,
    checked: BTreeSet<String>,
    draft: BTreeSet<String>,
    compare_id: Option<i64>,
    compare_series: RankDynamics,
    compare_error: Option<String>,
}

impl Default for DynamicsState {
    fn default() -> Self {
        let lines = BTreeSet::from([dynamics_lines::CUMULATIVE_TOTAL.to_string()]);
        Self {
            slot: WidgetSlot::Loading,
            checked: lines.clone(),
            draft: lines,
            compare_id: None,
            compare_series: RankDynamics::new(),
            compare_error: None,
        }
    }
}

impl DynamicsState {
    pub fn slot(&self) -> &WidgetSlot<RankDynamics> {
        &self.slot
    }

    /// Lines sent in the `lines` filter.
    pub fn lines(&self) -> &BTreeSet<String> {
        &self.checked
    }

    pub fn draft(&self) -> &BTreeSet<String> {
        &self.draft
    }

    pub fn compare_id(&self) -> Option<i64> {
        self.compare_id
    }

    pub fn compare_error(&self) -> Option<&str> {
        self.compare_error.as_deref()
    }

    pub fn begin_update(&mut self) {
        self.slot.begin_update();
    }

    pub fn toggle_draft(&mut self, line: &str) {
        if !self.draft.remove(line) {
            self.draft.insert(line.to_string());
        }
    }

    /// Series keys present in the data currently held.
    fn held(&self) -> BTreeSet<&str> {
        self.slot
            .data()
            .map(|d| d.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    pub fn apply_lines(&mut self) -> DashboardResult<LinesChange> {
        if self.draft.is_empty() {
            return Err(DashboardError::validation("Выберите хотя бы одну линию"));
        }
        if self.draft == self.checked {
            return Ok(LinesChange::Unchanged);
        }
        self.checked = self.draft.clone();

        let held = self.held();
        if self.checked.iter().all(|l| held.contains(l.as_str())) {
            Ok(LinesChange::LocalOnly)
        } else {
            self.slot.begin_update();
            Ok(LinesChange::Refetch)
        }
    }

    pub fn request_compare(&mut self, input: &str) -> DashboardResult<CompareChange> {
        let input = input.trim();
        if input.is_empty() {
            if self.compare_id.is_none() && self.compare_error.is_none() {
                return Ok(CompareChange::Unchanged);
            }
            self.compare_id = None;
            self.compare_series.clear();
            self.compare_error = None;
            return Ok(CompareChange::Cleared);
        }

        let id = match input.parse::<i64>() {
            Ok(id) if id > 0 => id,
            _ => return Err(DashboardError::validation("Введите корректный ID студента")),
        };
        if self.compare_id == Some(id) && self.compare_error.is_none() {
            return Ok(CompareChange::Unchanged);
        }
        self.compare_id = Some(id);
        self.compare_error = None;
        self.slot.begin_update();
        Ok(CompareChange::Requested(id))
    }

    /// New `myRankDynamics` data. `requested_compare` is the comparison id the
    /// request was sent with; its overlay is applied only if that id is still
    /// the one asked for.
    pub fn apply(&mut self, slot: WidgetSlot<RankDynamics>, requested_compare: Option<i64>) {
        let slot = match slot {
            WidgetSlot::Ready(data) => {
                let (compare, primary): (RankDynamics, RankDynamics) = data
                    .into_iter()
                    .partition(|(k, _)| k.ends_with(COMPARE_SUFFIX));
                self.apply_compare(compare, requested_compare);
                WidgetSlot::Ready(primary)
            }
            WidgetSlot::Empty => {
                self.apply_compare(RankDynamics::new(), requested_compare);
                WidgetSlot::Empty
            }
            other => other,
        };
        self.slot = slot;
    }

    fn apply_compare(&mut self, compare: RankDynamics, requested: Option<i64>) {
        let Some(requested) = requested else {
            return;
        };
        if self.compare_id != Some(requested) {
            log::debug!("dropping comparison data for student {}", requested);
            return;
        }
        if compare.values().all(|points| points.is_empty()) {
            self.compare_series.clear();
            self.compare_error = Some(COMPARE_NOT_FOUND.to_string());
        } else {
            self.compare_series = compare;
            self.compare_error = None;
        }
    }

    /// Chart for the checked lines plus their comparison counterparts.
    pub fn chart_spec(&self) -> Option<ChartSpec> {
        let data = self.slot.data()?;

        let mut shown: Vec<(String, &Vec<SemesterPoint>, bool, usize)> = Vec::new();
        for (index, line) in dynamics_lines::ALL.iter().enumerate() {
            if !self.checked.contains(*line) {
                continue;
            }
            if let Some(points) = data.get(*line) {
                shown.push((line_label(line).to_string(), points, false, index));
            }
            let compare_key = format!("{}{}", line, COMPARE_SUFFIX);
            if let (Some(points), Some(id)) = (self.compare_series.get(&compare_key), self.compare_id) {
                let label = format!("{} (студент {})", line_label(line), id);
                shown.push((label, points, true, index));
            }
        }
        if shown.is_empty() {
            return None;
        }

        let semesters: BTreeSet<u32> = shown
            .iter()
            .flat_map(|(_, points, _, _)| points.iter().map(|p| p.semester))
            .collect();
        let labels = semesters.iter().map(|s| format!("Семестр {}", s)).collect();

        let mut spec = ChartSpec::new(ChartKind::Line, labels);
        for (label, points, dashed, color) in shown {
            let by_semester: BTreeMap<u32, Option<f64>> =
                points.iter().map(|p| (p.semester, p.average_mark)).collect();
            let values = semesters
                .iter()
                .map(|s| by_semester.get(s).copied().flatten())
                .collect();
            let dataset = Dataset::new(label, values, color);
            spec = spec.with_dataset(if dashed { dataset.dashed() } else { dataset });
        }
        Some(spec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn dynamics(value: serde_json::Value) -> WidgetSlot<RankDynamics> {
        WidgetSlot::Ready(serde_json::from_value(value).unwrap())
    }

    fn loaded() -> DynamicsState {
        let mut state = DynamicsState::default();
        state.apply(
            dynamics(json!({
                "cumulativeTotal": [
                    { "semester": 1, "averageMark": 7.0 },
                    { "semester": 2, "averageMark": 7.5 }
                ],
                "academic": [{ "semester": 1, "averageMark": 8.0 }]
            })),
            None,
        );
        state
    }

    #[test]
    fn test_compare_not_found_keeps_primary_series() {
        let mut state = loaded();
        assert_eq!(state.request_compare("9999").unwrap(), CompareChange::Requested(9999));
        state.apply(
            dynamics(json!({
                "cumulativeTotal": [{ "semester": 1, "averageMark": 7.0 }]
            })),
            Some(9999),
        );

        assert_eq!(state.compare_error(), Some(COMPARE_NOT_FOUND));
        let spec = state.chart_spec().unwrap();
        assert_eq!(spec.datasets.len(), 1);
        assert!(!spec.datasets[0].dashed);
    }

    #[test]
    fn test_compare_overlay_is_dashed_and_aligned() {
        let mut state = loaded();
        state.request_compare("17").unwrap();
        state.apply(
            dynamics(json!({
                "cumulativeTotal": [
                    { "semester": 1, "averageMark": 7.0 },
                    { "semester": 2, "averageMark": 7.5 }
                ],
                "cumulativeTotal_compare": [{ "semester": 2, "averageMark": 6.0 }]
            })),
            Some(17),
        );

        let spec = state.chart_spec().unwrap();
        assert_eq!(spec.labels, vec!["Семестр 1", "Семестр 2"]);
        assert_eq!(spec.datasets.len(), 2);
        assert!(spec.datasets[1].dashed);
        assert_eq!(spec.datasets[1].data, vec![None, Some(6.0)]);
        assert_eq!(state.compare_error(), None);
    }

    #[test]
    fn test_cleared_compare_discards_in_flight_response() {
        let mut state = loaded();
        state.request_compare("17").unwrap();
        assert_eq!(state.request_compare("  ").unwrap(), CompareChange::Cleared);

        state.apply(
            dynamics(json!({
                "cumulativeTotal": [{ "semester": 1, "averageMark": 7.0 }],
                "cumulativeTotal_compare": [{ "semester": 1, "averageMark": 6.0 }]
            })),
            Some(17),
        );
        assert_eq!(state.chart_spec().unwrap().datasets.len(), 1);
        assert_eq!(state.compare_id(), None);
    }

    #[test]
    fn test_invalid_compare_input() {
        let mut state = loaded();
        assert!(matches!(
            state.request_compare("abc"),
            Err(DashboardError::Validation(_))
        ));
        assert!(state.request_compare("-5").is_err());
        assert!(!state.slot().is_busy());
    }

    #[test]
    fn test_lines_local_vs_refetch() {
        let mut state = loaded();
        state.toggle_draft(dynamics_lines::ACADEMIC);
        assert_eq!(state.apply_lines().unwrap(), LinesChange::LocalOnly);
        assert_eq!(state.chart_spec().unwrap().datasets.len(), 2);
        assert_eq!(state.apply_lines().unwrap(), LinesChange::Unchanged);

        state.toggle_draft(dynamics_lines::ABSENCES);
        assert_eq!(state.apply_lines().unwrap(), LinesChange::Refetch);
        assert!(state.slot().is_busy());
        assert!(state.lines().contains(dynamics_lines::ABSENCES));
    }

    #[test]
    fn test_empty_line_selection_rejected() {
        let mut state = loaded();
        state.toggle_draft(dynamics_lines::CUMULATIVE_TOTAL);
        assert!(state.apply_lines().is_err());
        assert!(state.lines().contains(dynamics_lines::CUMULATIVE_TOTAL));
    }
}
