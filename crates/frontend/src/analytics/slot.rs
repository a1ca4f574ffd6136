use serde::de::DeserializeOwned;
use serde_json::Value;

use super::distributor::WidgetInput;

/// Render state of one widget.
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetSlot<T> {
    Loading,
    /// A refresh is in flight; previous data stays visible.
    Updating(T),
    Ready(T),
    Empty,
    Failed(String),
}

impl<T> Default for WidgetSlot<T> {
    fn default() -> Self {
        Self::Loading
    }
}

impl<T: DeserializeOwned> WidgetSlot<T> {
    /// Typed slot for a distributor input. An empty collection or a payload
    /// that does not match `T` renders as empty.
    pub fn from_input(id: &str, input: WidgetInput<'_>) -> Self {
        match input {
            WidgetInput::Data(value) if is_blank(value) => Self::Empty,
            WidgetInput::Data(value) => match T::deserialize(value) {
                Ok(data) => Self::Ready(data),
                Err(e) => {
                    log::warn!("widget {}: unexpected payload shape: {}", id, e);
                    Self::Empty
                }
            },
            WidgetInput::Empty => Self::Empty,
            WidgetInput::Failed(message) => Self::Failed(message.to_string()),
        }
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => fields.is_empty(),
        _ => false,
    }
}

impl<T> WidgetSlot<T> {
    /// Enter the refreshing state, keeping data that is already shown.
    pub fn begin_update(&mut self) {
        *self = match std::mem::take(self) {
            Self::Ready(data) | Self::Updating(data) => Self::Updating(data),
            _ => Self::Loading,
        };
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Ready(data) | Self::Updating(data) => Some(data),
            _ => None,
        }
    }

    pub fn data_mut(&mut self) -> Option<&mut T> {
        match self {
            Self::Ready(data) | Self::Updating(data) => Some(data),
            _ => None,
        }
    }

    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Loading | Self::Updating(_))
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// Same state with the data transformed, for view models.
    pub fn map<U>(&self, f: impl FnOnce(&T) -> U) -> WidgetSlot<U> {
        match self {
            Self::Loading => WidgetSlot::Loading,
            Self::Updating(data) => WidgetSlot::Updating(f(data)),
            Self::Ready(data) => WidgetSlot::Ready(f(data)),
            Self::Empty => WidgetSlot::Empty,
            Self::Failed(message) => WidgetSlot::Failed(message.clone()),
        }
    }

    /// Data-free state, used by the widget frame.
    pub fn status(&self) -> SlotStatus {
        match self {
            Self::Loading => SlotStatus::Loading,
            Self::Updating(_) => SlotStatus::Updating,
            Self::Ready(_) => SlotStatus::Ready,
            Self::Empty => SlotStatus::Empty,
            Self::Failed(message) => SlotStatus::Failed(message.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotStatus {
    Loading,
    Updating,
    Ready,
    Empty,
    Failed(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::analytics::{CategoryPoints, MyRank};
    use serde_json::json;

    #[test]
    fn test_from_input() {
        let value = json!({ "rank": 3, "total": 20 });
        let slot = WidgetSlot::<MyRank>::from_input("myRank", WidgetInput::Data(&value));
        assert_eq!(slot.data().and_then(|r| r.rank), Some(3));

        let slot = WidgetSlot::<MyRank>::from_input("myRank", WidgetInput::Failed("boom"));
        assert_eq!(slot.error(), Some("boom"));
    }

    #[test]
    fn test_wrapped_breakdown_renders_empty() {
        let value = json!({ "breakdown": [{ "category": "SPORT", "totalPoints": 1.0 }] });
        let slot = WidgetSlot::<Vec<CategoryPoints>>::from_input(
            "myScoreBreakdown",
            WidgetInput::Data(&value),
        );
        assert_eq!(slot, WidgetSlot::Empty);
    }

    #[test]
    fn test_empty_collection_renders_empty() {
        let value = json!([]);
        let slot = WidgetSlot::<Vec<CategoryPoints>>::from_input("contributionAnalysis", WidgetInput::Data(&value));
        assert_eq!(slot.status(), SlotStatus::Empty);
    }

    #[test]
    fn test_begin_update_keeps_data() {
        let mut slot = WidgetSlot::Ready(5);
        slot.begin_update();
        assert_eq!(slot, WidgetSlot::Updating(5));
        assert!(slot.is_busy());

        let mut failed: WidgetSlot<i32> = WidgetSlot::Failed("x".into());
        failed.begin_update();
        assert_eq!(failed, WidgetSlot::Loading);
    }
}
