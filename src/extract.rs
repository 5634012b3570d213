use std::sync::Arc;

use serde_json::Value;

use crate::models::{ExtractedWorkout, WorkoutRequest, WorkoutSource};
use crate::ollama::{Generator, ModelError};
use crate::prompt;
use crate::youtube::{self, TitleSource, TranscriptSource, VideoId, YoutubeError};

// ── Constants ────────────────────────────────────────────────────────────────

pub const MIN_TRANSCRIPT_LEN: usize = 50;
pub const FALLBACK_LANG: &str = "en";
pub const PLACEHOLDER_TITLE: &str = "Workout Video";

const TRANSCRIPT_UNAVAILABLE: &str = "Could not extract transcript from this video. \
This could be because:\n\n\
1. The video has no captions/subtitles\n\
2. Captions are auto-generated and not accessible\n\
3. The video is private or restricted\n\n\
Please:\n\
- Try a different video with manual captions, OR\n\
- Use Manual Input mode and type the exercises you see in the video";

// ── Error type ───────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("Either URL or input is required")]
    MissingInput,
    #[error("Invalid request body: {0}")]
    MalformedRequest(String),
    #[error("Invalid YouTube URL")]
    InvalidUrl,
    #[error("{}", TRANSCRIPT_UNAVAILABLE)]
    TranscriptUnavailable(#[source] YoutubeError),
    #[error("Transcript is too short or empty. Please use Manual Input mode and describe what you see in the video.")]
    TranscriptTooShort,
    #[error("Could not extract exercises from transcript. The transcript might not contain clear workout instructions. Please try Manual Input mode.")]
    NoExercisesInTranscript,
    #[error("Could not parse exercises from input. Please provide clearer exercise descriptions with sets/reps.")]
    UnparseableInput,
    #[error(transparent)]
    Model(#[from] ModelError),
}

// ── Extractor ────────────────────────────────────────────────────────────────

/// Request-scoped extraction pipeline over shared, immutable collaborators.
#[derive(Clone)]
pub struct Extractor {
    transcripts: Arc<dyn TranscriptSource>,
    titles: Arc<dyn TitleSource>,
    generator: Arc<dyn Generator>,
}

impl Extractor {
    pub fn new(
        transcripts: Arc<dyn TranscriptSource>,
        titles: Arc<dyn TitleSource>,
        generator: Arc<dyn Generator>,
    ) -> Self {
        Self {
            transcripts,
            titles,
            generator,
        }
    }

    pub async fn extract(&self, req: &WorkoutRequest) -> Result<ExtractedWorkout, ExtractionError> {
        match req.source() {
            Some(WorkoutSource::Url(url)) => self.extract_from_url(url).await,
            Some(WorkoutSource::Manual(input)) => self.extract_from_text(input).await,
            None => Err(ExtractionError::MissingInput),
        }
    }

    pub async fn extract_from_url(&self, url: &str) -> Result<ExtractedWorkout, ExtractionError> {
        let video_id = youtube::parse_video_id(url).ok_or(ExtractionError::InvalidUrl)?;
        tracing::info!(%video_id, "fetching transcript");

        let title = self.resolve_title(&video_id).await;
        let transcript = self.resolve_transcript(&video_id).await?;

        tracing::info!(
            %video_id,
            chars = transcript.chars().count(),
            preview = %prompt::truncate_chars(&transcript, 200),
            "sending transcript to model"
        );
        let value = self
            .generator
            .generate(&prompt::url_prompt(&title, &transcript))
            .await?;

        let workout = into_workout(value)?;
        if workout.exercises.is_empty() {
            return Err(ExtractionError::NoExercisesInTranscript);
        }

        tracing::info!(%video_id, exercises = workout.exercises.len(), "extracted workout");
        Ok(workout)
    }

    pub async fn extract_from_text(&self, input: &str) -> Result<ExtractedWorkout, ExtractionError> {
        tracing::info!(chars = input.chars().count(), "processing manual input");

        let value = self.generator.generate(&prompt::manual_prompt(input)).await?;
        let workout = into_workout(value)?;
        if workout.exercises.is_empty() {
            return Err(ExtractionError::UnparseableInput);
        }

        tracing::info!(exercises = workout.exercises.len(), "formatted manual input");
        Ok(workout)
    }

    /// Default caption track first, explicit English second, then give up.
    pub async fn resolve_transcript(&self, video_id: &VideoId) -> Result<String, ExtractionError> {
        let fragments = match self.transcripts.fetch_transcript(video_id, None).await {
            Ok(fragments) => {
                tracing::info!(%video_id, method = "auto", "transcript fetched");
                fragments
            }
            Err(auto_err) => {
                tracing::warn!(%video_id, error = %auto_err, "default transcript failed, trying English");
                match self
                    .transcripts
                    .fetch_transcript(video_id, Some(FALLBACK_LANG))
                    .await
                {
                    Ok(fragments) => {
                        tracing::info!(%video_id, method = FALLBACK_LANG, "transcript fetched");
                        fragments
                    }
                    Err(err) => {
                        tracing::error!(%video_id, error = %err, "all transcript methods failed");
                        return Err(ExtractionError::TranscriptUnavailable(err));
                    }
                }
            }
        };

        let transcript = fragments
            .iter()
            .map(|f| f.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");

        if transcript.trim().chars().count() < MIN_TRANSCRIPT_LEN {
            return Err(ExtractionError::TranscriptTooShort);
        }
        Ok(transcript)
    }

    /// Human-readable video title; lookup failures are not fatal.
    pub async fn resolve_title(&self, video_id: &VideoId) -> String {
        match self.titles.fetch_title(video_id).await {
            Ok(title) if !title.trim().is_empty() => {
                tracing::info!(%video_id, %title, "video title resolved");
                title
            }
            Ok(_) => PLACEHOLDER_TITLE.to_string(),
            Err(e) => {
                tracing::warn!(%video_id, error = %e, "could not fetch video title");
                PLACEHOLDER_TITLE.to_string()
            }
        }
    }
}

/// Decode parsed model output. JSON that is not an object carries no
/// exercises and is left to the caller's empty-list check.
fn into_workout(value: Value) -> Result<ExtractedWorkout, ModelError> {
    if !value.is_object() {
        return Ok(ExtractedWorkout {
            title: String::new(),
            duration: "N/A".to_string(),
            equipment: String::new(),
            exercises: Vec::new(),
        });
    }
    serde_json::from_value(value).map_err(|e| ModelError::Parse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn non_object_output_has_no_exercises() {
        let workout = into_workout(json!(["pushups"])).unwrap();
        assert!(workout.exercises.is_empty());
        assert!(into_workout(json!("no workout here")).unwrap().exercises.is_empty());
    }

    #[test]
    fn missing_exercises_decode_as_empty() {
        let workout = into_workout(json!({ "title": "Rest Day" })).unwrap();
        assert!(workout.exercises.is_empty());
    }

    #[test]
    fn unavailable_message_points_to_manual_mode() {
        let err = ExtractionError::TranscriptUnavailable(YoutubeError::RateLimited);
        let message = err.to_string();
        assert!(message.starts_with("Could not extract transcript from this video."));
        assert!(message.contains("Use Manual Input mode"));
    }
}
