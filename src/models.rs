use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[derive(Debug, Default, Deserialize)]
pub struct WorkoutRequest {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub input: Option<String>,
}

/// Which path a request takes. A URL wins when both fields are filled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkoutSource<'a> {
    Url(&'a str),
    Manual(&'a str),
}

impl WorkoutRequest {
    pub fn source(&self) -> Option<WorkoutSource<'_>> {
        fn present(field: &Option<String>) -> Option<&str> {
            field.as_deref().map(str::trim).filter(|s| !s.is_empty())
        }

        present(&self.url)
            .map(WorkoutSource::Url)
            .or_else(|| present(&self.input).map(WorkoutSource::Manual))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedWorkout {
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(default = "not_available", deserialize_with = "lenient_string")]
    pub duration: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub equipment: String,
    #[serde(default, deserialize_with = "lenient_exercises")]
    pub exercises: Vec<Exercise>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub sets: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub reps: String,
    #[serde(
        default,
        deserialize_with = "lenient_notes",
        skip_serializing_if = "Option::is_none"
    )]
    pub notes: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

fn not_available() -> String {
    "N/A".to_string()
}

// ── Lenient field decoding ───────────────────────────────────────────────────
//
// Model output is loosely typed: equipment comes back as a list, sets as a
// bare number, notes as null. Everything is folded into display strings.

fn value_to_string(value: Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s,
        Value::Array(items) => items
            .into_iter()
            .map(value_to_string)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(value_to_string)
}

fn lenient_notes<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let notes = value_to_string(Value::deserialize(deserializer)?);
    let notes = notes.trim();
    Ok((!notes.is_empty()).then(|| notes.to_string()))
}

/// Anything but a list decodes as no exercises. Bare strings in the list
/// become named exercises; other non-object items are dropped.
fn lenient_exercises<'de, D>(deserializer: D) -> Result<Vec<Exercise>, D::Error>
where
    D: Deserializer<'de>,
{
    let Value::Array(items) = Value::deserialize(deserializer)? else {
        return Ok(Vec::new());
    };

    Ok(items
        .into_iter()
        .filter_map(|item| match item {
            Value::Object(_) => serde_json::from_value(item).ok(),
            Value::String(name) if !name.trim().is_empty() => Some(Exercise {
                name: name.trim().to_string(),
                sets: String::new(),
                reps: String::new(),
                notes: None,
            }),
            _ => None,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn url_takes_precedence_over_input() {
        let req = WorkoutRequest {
            url: Some("https://youtu.be/abc".into()),
            input: Some("pushups 3x10".into()),
        };
        assert_eq!(req.source(), Some(WorkoutSource::Url("https://youtu.be/abc")));
    }

    #[test]
    fn blank_fields_count_as_missing() {
        let req = WorkoutRequest {
            url: Some("   ".into()),
            input: Some("squats".into()),
        };
        assert_eq!(req.source(), Some(WorkoutSource::Manual("squats")));
        assert_eq!(WorkoutRequest::default().source(), None);
    }

    #[test]
    fn decodes_loosely_typed_model_output() {
        let workout: ExtractedWorkout = serde_json::from_value(json!({
            "title": "Leg Day",
            "equipment": ["Dumbbells", "Bench"],
            "exercises": [
                { "name": "Goblet Squat", "sets": 4, "reps": "12", "notes": null },
                { "name": "Lunge", "sets": "3", "reps": 10, "notes": "Keep torso upright" }
            ]
        }))
        .unwrap();

        assert_eq!(workout.duration, "N/A");
        assert_eq!(workout.equipment, "Dumbbells, Bench");
        assert_eq!(workout.exercises[0].sets, "4");
        assert_eq!(workout.exercises[0].notes, None);
        assert_eq!(workout.exercises[1].reps, "10");
        assert_eq!(
            workout.exercises[1].notes.as_deref(),
            Some("Keep torso upright")
        );
    }

    #[test]
    fn null_exercises_become_empty() {
        let workout: ExtractedWorkout =
            serde_json::from_value(json!({ "title": "x", "exercises": null })).unwrap();
        assert!(workout.exercises.is_empty());
    }

    #[test]
    fn non_list_exercises_become_empty() {
        let workout: ExtractedWorkout =
            serde_json::from_value(json!({ "exercises": "none found" })).unwrap();
        assert!(workout.exercises.is_empty());

        let workout: ExtractedWorkout =
            serde_json::from_value(json!({ "exercises": { "name": "Squat" } })).unwrap();
        assert!(workout.exercises.is_empty());
    }

    #[test]
    fn string_exercises_become_named_entries() {
        let workout: ExtractedWorkout = serde_json::from_value(json!({
            "exercises": ["Push ups 3x10", "  ", 42, { "name": "Dip", "sets": 3 }]
        }))
        .unwrap();

        assert_eq!(workout.exercises.len(), 2);
        assert_eq!(workout.exercises[0].name, "Push ups 3x10");
        assert_eq!(workout.exercises[0].sets, "");
        assert_eq!(workout.exercises[1].name, "Dip");
        assert_eq!(workout.exercises[1].sets, "3");
    }

    #[test]
    fn absent_notes_are_not_serialized() {
        let exercise = Exercise {
            name: "Plank".into(),
            sets: "3".into(),
            reps: "45 sec".into(),
            notes: None,
        };
        let value = serde_json::to_value(&exercise).unwrap();
        assert!(value.get("notes").is_none());
    }
}
