use crate::models::ExtractedWorkout;

fn is_shown(value: &str) -> bool {
    let value = value.trim();
    !value.is_empty() && value != "N/A"
}

/// Plain-text rendering for pasting into a workout tracking app.
pub fn format_for_tracker(workout: &ExtractedWorkout) -> String {
    let mut text = String::new();
    text.push_str(&format!("{}\n", workout.title));
    text.push_str(&format!("Duration: {}\n", workout.duration));
    text.push_str(&format!("Equipment: {}\n", workout.equipment));
    text.push('\n');

    for (index, exercise) in workout.exercises.iter().enumerate() {
        text.push_str(&format!("{}. {}\n", index + 1, exercise.name));
        if is_shown(&exercise.sets) {
            text.push_str(&format!("   Sets: {}\n", exercise.sets));
        }
        if is_shown(&exercise.reps) {
            text.push_str(&format!("   Reps: {}\n", exercise.reps));
        }
        if let Some(notes) = exercise.notes.as_deref().filter(|n| !n.trim().is_empty()) {
            text.push_str(&format!("   Notes: {}\n", notes));
        }
        text.push('\n');
    }

    text
}
