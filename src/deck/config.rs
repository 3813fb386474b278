//! Parser configuration.

/// Default upper bound for accepted container input, in bytes.
pub const DEFAULT_MAX_INPUT_BYTES: u64 = 256 * 1024 * 1024;

/// Configuration for deck parsing.
///
/// Built with [`ParserConfig::builder`]:
///
/// ```
/// use slidereel::deck::ParserConfig;
///
/// let config = ParserConfig::builder()
///     .max_input_bytes(64 * 1024 * 1024)
///     .extract_images(true)
///     .quality(75)
///     .build();
/// assert!(config.extract_images);
/// ```
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Inputs larger than this are rejected before any buffer is allocated.
    pub max_input_bytes: u64,
    /// Whether image payloads are resolved and carried on slides.
    pub extract_images: bool,
    /// Re-encode images whose largest dimension exceeds `max_image_dimension`.
    pub compress_images: bool,
    /// JPEG quality used when re-encoding (1-100).
    pub quality: u8,
    /// Dimension threshold above which re-encoding triggers, in pixels.
    pub max_image_dimension: u32,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
            extract_images: true,
            compress_images: false,
            quality: 80,
            max_image_dimension: 1920,
        }
    }
}

impl ParserConfig {
    pub fn builder() -> ParserConfigBuilder {
        ParserConfigBuilder::default()
    }
}

/// Builder for [`ParserConfig`].
#[derive(Debug, Default)]
pub struct ParserConfigBuilder {
    config: ParserConfig,
}

impl ParserConfigBuilder {
    pub fn max_input_bytes(mut self, max: u64) -> Self {
        self.config.max_input_bytes = max;
        self
    }

    pub fn extract_images(mut self, extract: bool) -> Self {
        self.config.extract_images = extract;
        self
    }

    pub fn compress_images(mut self, compress: bool) -> Self {
        self.config.compress_images = compress;
        self
    }

    pub fn quality(mut self, quality: u8) -> Self {
        self.config.quality = quality.clamp(1, 100);
        self
    }

    pub fn max_image_dimension(mut self, dimension: u32) -> Self {
        self.config.max_image_dimension = dimension;
        self
    }

    pub fn build(self) -> ParserConfig {
        self.config
    }
}
