//! Render output configuration.

use crate::deck::model::Position;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration of one render job's output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Output width in pixels
    pub width: u32,
    /// Output height in pixels
    pub height: u32,
    pub fps: u32,
    /// Encoder quality (1-100)
    pub quality: u8,
    /// Output container format, e.g. "mp4"
    pub container_format: String,
    /// Video codec, e.g. "h264"
    pub video_codec: String,
    /// Audio codec, e.g. "aac"
    pub audio_codec: String,
    /// Audio bitrate in bits per second
    pub audio_bitrate: u32,
    /// Scene background color as RGB hex
    pub background_color: String,
    /// Optional presenter overlay composited onto every scene
    pub avatar: Option<AvatarOverlay>,
    /// Budget for each speech-synthesis call, in seconds
    pub tts_timeout_seconds: u64,
    /// Budget for each encoder invocation, in seconds
    pub encoder_timeout_seconds: u64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
            fps: 30,
            quality: 80,
            container_format: "mp4".to_string(),
            video_codec: "h264".to_string(),
            audio_codec: "aac".to_string(),
            audio_bitrate: 128_000,
            background_color: "000000".to_string(),
            avatar: None,
            tts_timeout_seconds: 120,
            encoder_timeout_seconds: 600,
        }
    }
}

impl RenderConfig {
    pub fn tts_timeout(&self) -> Duration {
        Duration::from_secs(self.tts_timeout_seconds)
    }

    pub fn encoder_timeout(&self) -> Duration {
        Duration::from_secs(self.encoder_timeout_seconds)
    }
}

/// A presenter (avatar) video overlaid on every scene.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvatarOverlay {
    /// Collaborator-resolvable source of the avatar video
    pub source: String,
    /// Normalized box the overlay is scaled to fit
    pub position: Position,
}

/// Voice parameters handed to the speech collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceParams {
    pub voice: String,
    pub speaking_rate: f32,
}

impl Default for VoiceParams {
    fn default() -> Self {
        Self {
            voice: "default".to_string(),
            speaking_rate: 1.0,
        }
    }
}
