/// Transcript characters forwarded to the model.
pub const TRANSCRIPT_PROMPT_LIMIT: usize = 8000;

/// First `limit` characters of `text`, never splitting a code point.
pub fn truncate_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

pub fn url_prompt(title: &str, transcript: &str) -> String {
    let transcript = truncate_chars(transcript, TRANSCRIPT_PROMPT_LIMIT);
    format!(
        r#"You are a fitness expert. Analyze this workout video transcript and extract the ACTUAL exercises mentioned.

Video Title: {title}

Transcript (first {limit} chars):
{transcript}

Extract all exercises, sets, reps, and form cues mentioned in the transcript. Return ONLY a valid JSON object with this exact structure (no extra text):
{{
  "title": "workout name from the video",
  "duration": "X minutes" (extract from transcript if mentioned, otherwise "N/A"),
  "equipment": "equipment mentioned or Bodyweight only",
  "exercises": [
    {{
      "name": "exact exercise name from transcript",
      "sets": "number of sets mentioned or typical default",
      "reps": "reps or time mentioned or typical default",
      "notes": "any form cues or tips mentioned"
    }}
  ]
}}

IMPORTANT:
- Only include exercises that are ACTUALLY mentioned in the transcript
- Extract the actual sets/reps if mentioned
- Include all exercises from start to finish of the workout
- Do not make up exercises that aren't in the transcript"#,
        title = title,
        limit = TRANSCRIPT_PROMPT_LIMIT,
        transcript = transcript,
    )
}

pub fn manual_prompt(input: &str) -> String {
    format!(
        r#"You are a fitness expert. Parse this workout description into a structured format: "{input}"

Return ONLY a valid JSON object with this exact structure (no extra text):
{{
  "title": "descriptive workout name",
  "duration": "X minutes" or "N/A",
  "equipment": "equipment needed or Bodyweight only",
  "exercises": [
    {{
      "name": "exercise name",
      "sets": "number",
      "reps": "number or time",
      "notes": "form cues or tips"
    }}
  ]
}}

Extract all exercises mentioned. If sets/reps aren't clear, use typical defaults for that exercise."#,
        input = input,
    )
}
