use serde::{Deserialize, Serialize};

use super::enums::{InputCategory, SeverityBand};

/// Slider bounds for numeric inputs.
pub const DEFAULT_NUMERIC_MIN: f64 = 0.0;
pub const DEFAULT_NUMERIC_MAX: f64 = 300.0;
pub const DEFAULT_NUMERIC_STEP: f64 = 1.0;

/// Value of a diagnostic input. The variant fixes the form control:
/// `Boolean` is a switch, `Number` a slider, `Category` a choice among `SeverityBand`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum SymptomValue {
    Boolean(bool),
    Number(f64),
    Category(SeverityBand),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    Boolean,
    Number,
    Category,
}

impl SymptomValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Boolean(_) => ValueKind::Boolean,
            Self::Number(_) => ValueKind::Number,
            Self::Category(_) => ValueKind::Category,
        }
    }
}

impl std::fmt::Display for ValueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Boolean => "boolean",
            Self::Number => "number",
            Self::Category => "category",
        })
    }
}

/// Bounds of a numeric slider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NumericRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl Default for NumericRange {
    fn default() -> Self {
        Self {
            min: DEFAULT_NUMERIC_MIN,
            max: DEFAULT_NUMERIC_MAX,
            step: DEFAULT_NUMERIC_STEP,
        }
    }
}

impl NumericRange {
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// One symptom, vital sign or lab value in a model's input template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymptomInput {
    pub id: String,
    pub name: String,
    pub category: InputCategory,
    pub value: SymptomValue,
    /// Present for numeric inputs only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<NumericRange>,
}

impl SymptomInput {
    pub fn flag(id: &str, name: &str, category: InputCategory) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            category,
            value: SymptomValue::Boolean(false),
            range: None,
        }
    }

    pub fn measurement(id: &str, name: &str, category: InputCategory, value: f64) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            category,
            value: SymptomValue::Number(value),
            range: Some(NumericRange::default()),
        }
    }

    pub fn graded(id: &str, name: &str, category: InputCategory) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            category,
            value: SymptomValue::Category(SeverityBand::Normal),
            range: None,
        }
    }

    /// Options offered for this input's control (empty unless categorical).
    pub fn options(&self) -> &'static [SeverityBand] {
        match self.value {
            SymptomValue::Category(_) => &SeverityBand::ALL,
            _ => &[],
        }
    }
}
