use std::fs;
use std::path::Path;
use crate::dmd::FRAME_PIXEL_COUNT;
use crate::error::{DecodeError, Result};
use crate::types::Frame;

/// A loop of pre-recorded frames to show while there's no live signal.
pub struct FallbackFrames {
    frames: Vec<Frame>,
    next: usize,
}

impl FallbackFrames {
    /// Load a file of back-to-back raw frames.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = fs::read(path.as_ref())?;
        let fallback = Self::from_bytes(&bytes)?;
        log::info!(
            "Loaded {} fallback frames from {}",
            fallback.len(),
            path.as_ref().display()
        );
        Ok(fallback)
    }

    /// Split a buffer into frames. It must hold a whole, non-zero number of them.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.is_empty() || bytes.len() % FRAME_PIXEL_COUNT != 0 {
            return Err(DecodeError::InvalidFallback { len: bytes.len() });
        }

        let frames = bytes
            .chunks_exact(FRAME_PIXEL_COUNT)
            .map(Frame::from_pixels)
            .collect();

        Ok(Self { frames, next: 0 })
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// The next frame in the loop, wrapping back to the first after the last.
    pub fn next_frame(&mut self) -> Frame {
        let frame = self.frames[self.next].clone();
        self.next = (self.next + 1) % self.frames.len();
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycles_through_frames() {
        let bytes: Vec<u8> = (0..3u8)
            .flat_map(|i| std::iter::repeat(i).take(FRAME_PIXEL_COUNT))
            .collect();
        let mut fallback = FallbackFrames::from_bytes(&bytes).unwrap();
        assert_eq!(fallback.len(), 3);

        let firsts: Vec<u8> = (0..7).map(|_| fallback.next_frame().as_bytes()[0]).collect();
        assert_eq!(firsts, vec![0, 1, 2, 0, 1, 2, 0]);

        // Each frame is one whole chunk, not just its first byte.
        let frame = fallback.next_frame();
        assert_eq!(frame.as_bytes().len(), FRAME_PIXEL_COUNT);
        assert!(frame.as_bytes().iter().all(|&p| p == 1));
    }

    #[test]
    fn rejects_partial_frames() {
        for len in [0, 1, FRAME_PIXEL_COUNT - 1, FRAME_PIXEL_COUNT + 10] {
            assert!(matches!(
                FallbackFrames::from_bytes(&vec![0; len]),
                Err(DecodeError::InvalidFallback { len: l }) if l == len
            ));
        }
    }

    #[test]
    fn missing_file() {
        assert!(matches!(
            FallbackFrames::open("/nonexistent/fallback.bin"),
            Err(DecodeError::Io(_))
        ));
    }
}
