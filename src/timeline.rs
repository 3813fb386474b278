//! Timeline synthesis: converting an ordered slide list into timed scenes.
//!
//! A scene is one slide plus its narration duration. Durations are estimated
//! from narration word count at a words-per-minute rate, or taken from
//! externally supplied narration durations when the speech collaborator has
//! already produced audio.

use crate::deck::model::Document;
use std::collections::HashMap;

/// Default narration pace used for duration estimation.
pub const DEFAULT_WORDS_PER_MINUTE: u32 = 150;

/// Every scene lasts at least this long, even with no narration text.
pub const MIN_SCENE_SECONDS: u64 = 1;

/// A timed unit of the output timeline corresponding to one slide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimedScene {
    /// 1-based slide index this scene renders
    pub slide_index: usize,
    /// Narration text: title, text blocks, then notes, space-joined
    pub narration: String,
    /// Offset of this scene from the start of the timeline
    pub start_seconds: u64,
    pub duration_seconds: u64,
}

impl TimedScene {
    pub fn word_count(&self) -> usize {
        self.narration.split_whitespace().count()
    }
}

/// The synthesized timeline of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timeline {
    pub scenes: Vec<TimedScene>,
    /// Sum of all scene durations; reported as the estimated output length
    pub total_seconds: u64,
}

impl Timeline {
    /// Synthesize a timeline from a parsed document.
    ///
    /// Scenes are emitted in slide index order. The result is a pure
    /// function of the document and the rate: synthesizing twice yields
    /// identical durations.
    pub fn synthesize(document: &Document, words_per_minute: u32) -> Timeline {
        Self::synthesize_with_durations(document, words_per_minute, &HashMap::new())
    }

    /// Synthesize a timeline, overriding estimates with known narration
    /// durations (keyed by slide index, in seconds).
    pub fn synthesize_with_durations(
        document: &Document,
        words_per_minute: u32,
        narration_durations: &HashMap<usize, f64>,
    ) -> Timeline {
        let mut scenes = Vec::with_capacity(document.slides.len());
        let mut start_seconds = 0u64;
        for slide in &document.slides {
            let narration = slide.narration_text();
            let duration_seconds = match narration_durations.get(&slide.index) {
                Some(&seconds) => whole_seconds(seconds),
                None => estimate_seconds(
                    narration.split_whitespace().count(),
                    words_per_minute,
                ),
            };
            scenes.push(TimedScene {
                slide_index: slide.index,
                narration,
                start_seconds,
                duration_seconds,
            });
            start_seconds += duration_seconds;
        }
        Timeline {
            scenes,
            total_seconds: start_seconds,
        }
    }
}

/// Estimated narration duration: `max(1, ceil(words / wpm * 60))` seconds.
pub fn estimate_seconds(word_count: usize, words_per_minute: u32) -> u64 {
    let words_per_minute = words_per_minute.max(1) as u64;
    let estimated = (word_count as u64 * 60).div_ceil(words_per_minute);
    estimated.max(MIN_SCENE_SECONDS)
}

/// Round a collaborator-reported duration up to whole seconds.
fn whole_seconds(seconds: f64) -> u64 {
    if !seconds.is_finite() || seconds <= 0.0 {
        return MIN_SCENE_SECONDS;
    }
    (seconds.ceil() as u64).max(MIN_SCENE_SECONDS)
}
