//! Composition plan synthesis.
//!
//! A composition plan is an ordered list of layer-compose instructions
//! describing how to assemble each scene's visual layers. It is a pure data
//! structure handed to the encoder collaborator; no pixel work happens here.

use crate::deck::model::{Document, Position};
use crate::render::config::RenderConfig;
use crate::timeline::Timeline;
use serde::{Deserialize, Serialize};

/// What a layer draws from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LayerSource {
    /// Solid background sized to the target resolution
    Background { color: String },
    /// An image asset extracted from a slide
    SlideImage {
        slide_index: usize,
        image_id: String,
        container_path: String,
    },
    /// The configured presenter overlay video
    AvatarVideo { source: String },
}

/// Pixel-space box a layer is scaled to fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerTransform {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl LayerTransform {
    /// Project a normalized box onto the output resolution.
    fn from_normalized(position: Position, out_width: u32, out_height: u32) -> Self {
        Self {
            x: (position.x * out_width as f32).round() as i32,
            y: (position.y * out_height as f32).round() as i32,
            width: (position.w * out_width as f32).round().max(0.0) as u32,
            height: (position.h * out_height as f32).round().max(0.0) as u32,
        }
    }

    fn full(width: u32, height: u32) -> Self {
        Self {
            x: 0,
            y: 0,
            width,
            height,
        }
    }
}

/// When a layer is visible on the output timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerTiming {
    pub start_seconds: u64,
    pub duration_seconds: u64,
}

/// One layer-compose instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerInstruction {
    pub source: LayerSource,
    pub transform: LayerTransform,
    pub timing: LayerTiming,
}

/// The full, encoder-independent composition description of a render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositionPlan {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    pub layers: Vec<LayerInstruction>,
}

impl CompositionPlan {
    /// Synthesize the plan for a document's timeline.
    ///
    /// For every scene: a background layer sized to the target resolution,
    /// then the scene's image overlays positioned by their slide
    /// coordinates, then the avatar overlay when one is configured. Pure
    /// over its inputs.
    pub fn build(document: &Document, timeline: &Timeline, config: &RenderConfig) -> Self {
        let mut layers = Vec::new();

        for scene in &timeline.scenes {
            let timing = LayerTiming {
                start_seconds: scene.start_seconds,
                duration_seconds: scene.duration_seconds,
            };

            layers.push(LayerInstruction {
                source: LayerSource::Background {
                    color: config.background_color.clone(),
                },
                transform: LayerTransform::full(config.width, config.height),
                timing,
            });

            if let Some(slide) = document.slides.get(scene.slide_index - 1) {
                for image in &slide.images {
                    layers.push(LayerInstruction {
                        source: LayerSource::SlideImage {
                            slide_index: scene.slide_index,
                            image_id: image.id.clone(),
                            container_path: image.container_path.clone(),
                        },
                        transform: LayerTransform::from_normalized(
                            image.position,
                            config.width,
                            config.height,
                        ),
                        timing,
                    });
                }
            }

            if let Some(avatar) = &config.avatar {
                layers.push(LayerInstruction {
                    source: LayerSource::AvatarVideo {
                        source: avatar.source.clone(),
                    },
                    transform: LayerTransform::from_normalized(
                        avatar.position,
                        config.width,
                        config.height,
                    ),
                    timing,
                });
            }
        }

        Self {
            width: config.width,
            height: config.height,
            fps: config.fps,
            layers,
        }
    }
}
