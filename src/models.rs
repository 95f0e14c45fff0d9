use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// One day's diary entry. Records are immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Creation timestamp in epoch milliseconds.
    pub id: i64,
    pub date: NaiveDate,
    /// Grams of food.
    #[serde(default, deserialize_with = "lenient_number")]
    pub food: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub treats: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub dried: Option<f64>,
    /// Kilograms.
    #[serde(default, deserialize_with = "lenient_number")]
    pub weight: Option<f64>,
}

impl Record {
    pub fn from_input(id: i64, input: RecordInput) -> Self {
        Self {
            id,
            date: input.date,
            food: input.food,
            treats: input.treats,
            dried: input.dried,
            weight: input.weight,
        }
    }
}

/// Candidate record submitted by the form. Numeric fields accept numbers or
/// the raw strings an `<input type="number">` produces.
#[derive(Debug, Clone, Deserialize)]
pub struct RecordInput {
    pub date: NaiveDate,
    #[serde(default, deserialize_with = "lenient_number")]
    pub food: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub treats: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub dried: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub weight: Option<f64>,
}

impl RecordInput {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            food: None,
            treats: None,
            dried: None,
            weight: None,
        }
    }

    pub fn with_food(mut self, food: f64) -> Self {
        self.food = Some(food);
        self
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    /// Returns the name of the first negative field, if any.
    pub fn negative_field(&self) -> Option<&'static str> {
        [
            ("food", self.food),
            ("treats", self.treats),
            ("dried", self.dried),
            ("weight", self.weight),
        ]
        .into_iter()
        .find(|(_, value)| value.is_some_and(|v| v < 0.0))
        .map(|(name, _)| name)
    }
}

/// A record reshaped for the weight and food charts. Absent values stay
/// `null` so the chart skips them instead of plotting zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub id: i64,
    /// Short display form, `MM/DD`.
    pub date: String,
    pub food: Option<f64>,
    pub weight: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChartResponse {
    pub show_charts: bool,
    pub points: Vec<ChartPoint>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AvatarPayload {
    pub avatar: String,
}

/// Accepts a number, a numeric string, an empty string, `null` or a missing
/// key. Anything that does not parse to a finite number becomes `None`.
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
        Other(serde_json::Value),
    }

    let value = match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Number(value)) => Some(value),
        Some(Raw::Text(text)) => text.trim().parse::<f64>().ok(),
        Some(Raw::Other(_)) | None => None,
    };
    Ok(value.filter(|v| v.is_finite()))
}
