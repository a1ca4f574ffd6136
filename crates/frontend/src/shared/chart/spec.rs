//! Описание графика, независимое от библиотеки отрисовки
use serde_json::{json, Value};

const PALETTE: [&str; 8] = [
    "#4e79a7", "#f28e2b", "#e15759", "#76b7b2", "#59a14f", "#edc948", "#b07aa1", "#ff9da7",
];

pub fn palette_color(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Bar,
    Line,
    Pie,
    Doughnut,
}

impl ChartKind {
    fn js_type(self) -> &'static str {
        match self {
            Self::Bar => "bar",
            Self::Line => "line",
            Self::Pie => "pie",
            Self::Doughnut => "doughnut",
        }
    }

    fn is_radial(self) -> bool {
        matches!(self, Self::Pie | Self::Doughnut)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub label: String,
    /// `None` рисуется разрывом линии
    pub data: Vec<Option<f64>>,
    pub dashed: bool,
    pub color_index: usize,
}

impl Dataset {
    pub fn new(label: impl Into<String>, data: Vec<Option<f64>>, color_index: usize) -> Self {
        Self {
            label: label.into(),
            data,
            dashed: false,
            color_index,
        }
    }

    pub fn dashed(mut self) -> Self {
        self.dashed = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
    pub stacked: bool,
    pub y_title: Option<String>,
}

impl ChartSpec {
    pub fn new(kind: ChartKind, labels: Vec<String>) -> Self {
        Self {
            kind,
            labels,
            datasets: Vec::new(),
            stacked: false,
            y_title: None,
        }
    }

    pub fn with_dataset(mut self, dataset: Dataset) -> Self {
        self.datasets.push(dataset);
        self
    }

    pub fn stacked(mut self) -> Self {
        self.stacked = true;
        self
    }

    pub fn y_title(mut self, title: impl Into<String>) -> Self {
        self.y_title = Some(title.into());
        self
    }

    /// Круговая диаграмма из пар (подпись, значение)
    pub fn radial(kind: ChartKind, label: &str, items: Vec<(String, f64)>) -> Self {
        let (labels, values): (Vec<_>, Vec<_>) = items.into_iter().unzip();
        Self::new(kind, labels).with_dataset(Dataset::new(
            label,
            values.into_iter().map(Some).collect(),
            0,
        ))
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty() || self.datasets.iter().all(|d| d.data.is_empty())
    }

    /// Конфигурация Chart.js
    pub fn to_config(&self) -> Value {
        let radial = self.kind.is_radial();
        let datasets: Vec<Value> = self
            .datasets
            .iter()
            .map(|d| {
                let color: Value = if radial {
                    json!((0..d.data.len()).map(palette_color).collect::<Vec<_>>())
                } else {
                    json!(palette_color(d.color_index))
                };
                let mut ds = json!({
                    "label": d.label,
                    "data": d.data,
                    "backgroundColor": color,
                    "borderColor": color,
                    "spanGaps": true,
                    "fill": false,
                });
                if d.dashed {
                    ds["borderDash"] = json!([6, 4]);
                }
                ds
            })
            .collect();

        let mut options = json!({
            "responsive": true,
            "maintainAspectRatio": false,
            "animation": false,
        });
        if !radial {
            options["scales"] = json!({
                "x": { "stacked": self.stacked },
                "y": { "stacked": self.stacked, "beginAtZero": true },
            });
            if let Some(title) = &self.y_title {
                options["scales"]["y"]["title"] = json!({ "display": true, "text": title });
            }
        }

        json!({
            "type": self.kind.js_type(),
            "data": { "labels": self.labels, "datasets": datasets },
            "options": options,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_config_with_dashed_series() {
        let spec = ChartSpec::new(ChartKind::Line, vec!["1".into(), "2".into()])
            .with_dataset(Dataset::new("Я", vec![Some(7.0), None], 0))
            .with_dataset(Dataset::new("Сравнение", vec![Some(6.0), Some(6.5)], 0).dashed());
        let config = spec.to_config();

        assert_eq!(config["type"], "line");
        assert_eq!(config["data"]["datasets"][0]["data"], json!([7.0, null]));
        assert!(config["data"]["datasets"][0].get("borderDash").is_none());
        assert_eq!(config["data"]["datasets"][1]["borderDash"], json!([6, 4]));
        assert_eq!(config["options"]["scales"]["y"]["stacked"], false);
    }

    #[test]
    fn test_radial_config_has_no_scales() {
        let spec = ChartSpec::radial(
            ChartKind::Pie,
            "Баллы",
            vec![("Наука".into(), 3.0), ("Спорт".into(), 2.0)],
        );
        let config = spec.to_config();
        assert!(config["options"].get("scales").is_none());
        assert_eq!(config["data"]["datasets"][0]["backgroundColor"].as_array().map(|a| a.len()), Some(2));
        assert!(!spec.is_empty());
        assert!(ChartSpec::new(ChartKind::Bar, vec![]).is_empty());
    }
}
