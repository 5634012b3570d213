use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use workout_extractor::youtube::{
    CaptionFragment, TitleSource, TranscriptSource, VideoId, YoutubeError,
};

/// Caption tracks keyed by requested language; `None` is the default track.
#[derive(Clone, Default)]
pub struct MockTranscripts {
    pub tracks: HashMap<Option<String>, Vec<String>>,
    pub calls: Arc<Mutex<Vec<(String, Option<String>)>>>,
}

impl MockTranscripts {
    pub fn with_default(lines: &[&str]) -> Self {
        Self::default().track(None, lines)
    }

    pub fn track(mut self, lang: Option<&str>, lines: &[&str]) -> Self {
        self.tracks.insert(
            lang.map(str::to_string),
            lines.iter().map(|l| l.to_string()).collect(),
        );
        self
    }

    pub fn requested_langs(&self) -> Vec<Option<String>> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(_, lang)| lang.clone())
            .collect()
    }
}

#[async_trait]
impl TranscriptSource for MockTranscripts {
    async fn fetch_transcript(
        &self,
        video_id: &VideoId,
        lang: Option<&str>,
    ) -> Result<Vec<CaptionFragment>, YoutubeError> {
        self.calls
            .lock()
            .unwrap()
            .push((video_id.to_string(), lang.map(str::to_string)));

        let lines = self
            .tracks
            .get(&lang.map(str::to_string))
            .ok_or_else(|| YoutubeError::TranscriptsDisabled(video_id.to_string()))?;

        Ok(lines
            .iter()
            .enumerate()
            .map(|(i, text)| CaptionFragment {
                text: text.clone(),
                offset: i as f64 * 2.0,
                duration: 2.0,
            })
            .collect())
    }
}

#[derive(Clone, Default)]
pub struct MockTitles {
    pub title: Option<String>,
}

impl MockTitles {
    pub fn new(title: &str) -> Self {
        Self {
            title: Some(title.to_string()),
        }
    }

    pub fn failing() -> Self {
        Self { title: None }
    }
}

#[async_trait]
impl TitleSource for MockTitles {
    async fn fetch_title(&self, _video_id: &VideoId) -> Result<String, YoutubeError> {
        self.title.clone().ok_or(YoutubeError::Upstream(404))
    }
}
