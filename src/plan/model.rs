use serde::de::Deserializer;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const DEFAULT_STRATEGY: &str = "Follow the blueprint strictly.";
pub const DEFAULT_ADAPTATION: &str = "Adjust velocity based on comprehension.";
pub const FLEX_DURATION: &str = "FLEX";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Goal {
    #[default]
    #[serde(rename = "Exam Prep")]
    ExamPrep,
    #[serde(rename = "Deep Learning")]
    DeepLearning,
    #[serde(rename = "Quick Revision")]
    QuickRevision,
    #[serde(rename = "Project Build")]
    ProjectBuild,
}

impl Goal {
    pub const ALL: [Goal; 4] = [
        Goal::ExamPrep,
        Goal::DeepLearning,
        Goal::QuickRevision,
        Goal::ProjectBuild,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Goal::ExamPrep => "Exam Prep",
            Goal::DeepLearning => "Deep Learning",
            Goal::QuickRevision => "Quick Revision",
            Goal::ProjectBuild => "Project Build",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Level {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl Level {
    pub const ALL: [Level; 3] = [Level::Beginner, Level::Intermediate, Level::Advanced];

    pub fn as_str(self) -> &'static str {
        match self {
            Level::Beginner => "Beginner",
            Level::Intermediate => "Intermediate",
            Level::Advanced => "Advanced",
        }
    }
}

/// What the user asked for; also the JSON body sent to the generator.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub topic: String,
    #[serde(default)]
    pub syllabus: String,
    #[serde(default)]
    pub hours: String,
    #[serde(default)]
    pub days: String,
    #[serde(default)]
    pub goal: Goal,
    #[serde(default)]
    pub level: Level,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Intensity {
    High,
    Medium,
    Low,
    Other,
}

impl Intensity {
    /// Case-insensitive substring classification. The lowered text is read
    /// once and checked high, medium, low in turn with the last match kept,
    /// so "Medium-Low" classifies as `Low`.
    pub fn classify(raw: &str) -> Self {
        let lowered = raw.to_lowercase();
        let mut class = Intensity::Other;
        if lowered.contains("high") {
            class = Intensity::High;
        }
        if lowered.contains("medium") {
            class = Intensity::Medium;
        }
        if lowered.contains("low") {
            class = Intensity::Low;
        }
        class
    }
}

/// One scheduled block of the generated plan. Every field is optional on the
/// wire; unknown fields are carried through so saved plans reload intact.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanUnit {
    #[serde(default, deserialize_with = "lenient_text")]
    pub unit_title: String,
    #[serde(
        default,
        deserialize_with = "lenient_opt_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub duration: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub description: String,
    #[serde(
        default,
        deserialize_with = "lenient_opt_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub detailed_guide: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_opt_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub intensity: Option<String>,
    #[serde(default, deserialize_with = "truthy")]
    pub important: bool,
    #[serde(default, deserialize_with = "lenient_list")]
    pub subtopics: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PlanUnit {
    pub fn duration_or_flex(&self) -> &str {
        self.duration
            .as_deref()
            .filter(|d| !d.is_empty())
            .unwrap_or(FLEX_DURATION)
    }

    pub fn intensity_class(&self) -> Intensity {
        self.intensity
            .as_deref()
            .map(Intensity::classify)
            .unwrap_or(Intensity::Other)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanPayload {
    #[serde(
        default,
        deserialize_with = "lenient_opt_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub strategy_notes: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_opt_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub adaptation_rule: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_opt_list",
        skip_serializing_if = "Option::is_none"
    )]
    pub focus_areas: Option<Vec<String>>,
    #[serde(
        default,
        deserialize_with = "lenient_units",
        skip_serializing_if = "Option::is_none"
    )]
    pub plan: Option<Vec<PlanUnit>>,
    #[serde(
        default,
        deserialize_with = "lenient_opt_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub error: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PlanPayload {
    /// The generator's logical failure message, if it reported one.
    pub fn failure(&self) -> Option<&str> {
        self.error.as_deref().filter(|e| !e.is_empty())
    }

    pub fn strategy(&self) -> &str {
        non_empty_or(self.strategy_notes.as_deref(), DEFAULT_STRATEGY)
    }

    pub fn adaptation(&self) -> &str {
        non_empty_or(self.adaptation_rule.as_deref(), DEFAULT_ADAPTATION)
    }

    pub fn focus_areas(&self) -> &[String] {
        self.focus_areas.as_deref().unwrap_or(&[])
    }

    pub fn units(&self) -> &[PlanUnit] {
        self.plan.as_deref().unwrap_or(&[])
    }
}

fn non_empty_or<'a>(value: Option<&'a str>, fallback: &'a str) -> &'a str {
    value.filter(|v| !v.is_empty()).unwrap_or(fallback)
}

fn value_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

fn lenient_text<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(value_text(Value::deserialize(d)?).unwrap_or_default())
}

fn lenient_opt_text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(value_text(Value::deserialize(d)?))
}

fn truthy<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Null => false,
        Value::Bool(b) => b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    })
}

fn lenient_list<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
    Ok(lenient_opt_list(d)?.unwrap_or_default())
}

fn lenient_opt_list<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Vec<String>>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Array(items) => Some(items.into_iter().filter_map(value_text).collect()),
        _ => None,
    })
}

/// Units that are not objects are dropped rather than failing the payload.
fn lenient_units<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Vec<PlanUnit>>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Array(items) => Some(
            items
                .into_iter()
                .filter(Value::is_object)
                .filter_map(|item| serde_json::from_value(item).ok())
                .collect(),
        ),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_session_config_serializes_display_names() {
        let config = SessionConfig {
            topic: "Calculus".to_string(),
            ..Default::default()
        };
        let body = serde_json::to_value(&config).unwrap();
        assert_eq!(body["topic"], "Calculus");
        assert_eq!(body["goal"], "Exam Prep");
        assert_eq!(body["level"], "Beginner");
        assert_eq!(body["syllabus"], "");
    }

    #[test]
    fn test_intensity_last_match_wins() {
        assert_eq!(Intensity::classify("HIGH"), Intensity::High);
        assert_eq!(Intensity::classify("High/Medium"), Intensity::Medium);
        assert_eq!(Intensity::classify("medium-low"), Intensity::Low);
        assert_eq!(Intensity::classify("high and low"), Intensity::Low);
        assert_eq!(Intensity::classify("Intense"), Intensity::Other);
    }

    #[test]
    fn test_unit_tolerates_missing_and_odd_fields() {
        let unit: PlanUnit = serde_json::from_value(json!({
            "unit_title": "Day 1: Limits",
            "subtopics": "not a list",
            "important": 1,
            "duration": 45
        }))
        .unwrap();
        assert_eq!(unit.unit_title, "Day 1: Limits");
        assert!(unit.subtopics.is_empty());
        assert!(unit.important);
        assert_eq!(unit.duration.as_deref(), Some("45"));
        assert_eq!(unit.description, "");
        assert_eq!(unit.intensity_class(), Intensity::Other);
    }

    #[test]
    fn test_missing_duration_shows_flex() {
        let unit: PlanUnit = serde_json::from_value(json!({ "unit_title": "x" })).unwrap();
        assert_eq!(unit.duration_or_flex(), "FLEX");
    }

    #[test]
    fn test_payload_fallbacks() {
        let payload: PlanPayload = serde_json::from_value(json!({})).unwrap();
        assert_eq!(payload.strategy(), DEFAULT_STRATEGY);
        assert_eq!(payload.adaptation(), DEFAULT_ADAPTATION);
        assert!(payload.focus_areas().is_empty());
        assert!(payload.units().is_empty());
        assert!(payload.failure().is_none());
    }

    #[test]
    fn test_empty_error_is_not_a_failure() {
        let payload: PlanPayload = serde_json::from_value(json!({ "error": "" })).unwrap();
        assert!(payload.failure().is_none());
        let payload: PlanPayload =
            serde_json::from_value(json!({ "error": "quota exceeded" })).unwrap();
        assert_eq!(payload.failure(), Some("quota exceeded"));
    }

    #[test]
    fn test_unknown_fields_survive_reserialization() {
        let payload: PlanPayload = serde_json::from_value(json!({
            "plan": [{ "unit_title": "U", "resources": ["book"] }],
            "model": "x"
        }))
        .unwrap();
        let back = serde_json::to_value(&payload).unwrap();
        assert_eq!(back["model"], "x");
        assert_eq!(back["plan"][0]["resources"][0], "book");
    }
}
