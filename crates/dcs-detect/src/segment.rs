//! Segment types: the unit of scoring.
//!
//! A segment is a fixed-length slice of decoded frames plus the
//! aligned audio window. Segments are ephemeral: created per
//! detection pass and discarded after scoring.

/// A batch of decoded RGB24 frames.
#[derive(Debug, Clone)]
pub struct FrameBatch {
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// Number of frames in the batch
    pub frame_count: u32,
    /// Frame-major RGB24 pixel data
    pub pixels: Vec<u8>,
}

impl FrameBatch {
    /// Bytes per decoded frame (RGB24).
    pub fn frame_bytes(width: u32, height: u32) -> usize {
        width as usize * height as usize * 3
    }

    /// Whether the pixel buffer matches the declared geometry.
    pub fn is_consistent(&self) -> bool {
        self.pixels.len() == self.frame_count as usize * Self::frame_bytes(self.width, self.height)
    }
}

/// The audio window aligned with a frame batch.
#[derive(Debug, Clone)]
pub struct AudioBatch {
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Mono s16le samples as raw bytes
    pub samples: Vec<u8>,
}

impl AudioBatch {
    /// An empty audio window (stream had no audio track).
    pub fn silent(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            samples: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// One scoring window: contiguous frames plus aligned audio.
#[derive(Debug, Clone)]
pub struct Segment {
    /// Zero-based batch index within the stream
    pub index: usize,
    /// Start offset in seconds from stream start
    pub start_secs: f64,
    /// Decoded frames
    pub frames: FrameBatch,
    /// Aligned audio window
    pub audio: AudioBatch,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_batch_consistency() {
        let batch = FrameBatch {
            width: 4,
            height: 4,
            frame_count: 2,
            pixels: vec![0; 96],
        };
        assert!(batch.is_consistent());

        let short = FrameBatch {
            pixels: vec![0; 95],
            ..batch
        };
        assert!(!short.is_consistent());
    }

    #[test]
    fn test_silent_audio() {
        assert!(AudioBatch::silent(16_000).is_empty());
    }
}
