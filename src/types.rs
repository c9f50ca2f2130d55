use crate::dmd::{FRAME_PIXEL_COUNT, PIXELS_PER_ROW};
#[cfg(test)]
use crate::dmd::ROWS_PER_FRAME;

/// One raw capture sample. The low four bits are the display wires, see `dmd::Channel`.
pub type Sample = u8;

/// A count of samples, the unit all timing is measured in.
pub type SampleCount = usize;

/// A signed offset in samples, used for the phase estimate which can over- or undershoot.
pub type SampleOffset = isize;

/// The intensity of a single dot.
pub type Intensity = u8;

/// A decoded 128x32 dot-matrix frame. It always holds exactly `FRAME_PIXEL_COUNT` bytes, row
/// major, so it can be written out as a flat block with no header.
#[derive(Clone, PartialEq, Eq)]
pub struct Frame(Box<[Intensity]>);

impl Frame {
    /// An all-dark frame, which is also what the decoder emits when it has no signal.
    pub fn blank() -> Self {
        Frame(vec![0; FRAME_PIXEL_COUNT].into_boxed_slice())
    }

    /// Wrap exactly one frame's worth of pixels. Callers inside the crate guarantee the length.
    pub(crate) fn from_pixels(pixels: impl Into<Box<[Intensity]>>) -> Self {
        let pixels = pixels.into();
        debug_assert_eq!(pixels.len(), FRAME_PIXEL_COUNT);
        Frame(pixels)
    }

    pub fn pixel(&self, x: usize, y: usize) -> Intensity {
        self.0[y * PIXELS_PER_ROW + x]
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, value: Intensity) {
        self.0[y * PIXELS_PER_ROW + x] = value;
    }

    #[cfg(test)]
    pub fn row(&self, y: usize) -> &[Intensity] {
        debug_assert!(y < ROWS_PER_FRAME);
        &self.0[y * PIXELS_PER_ROW..(y + 1) * PIXELS_PER_ROW]
    }

    pub fn as_bytes(&self) -> &[Intensity] {
        &self.0
    }

    #[cfg(test)]
    pub fn is_blank(&self) -> bool {
        self.0.iter().all(|&p| p == 0)
    }
}

impl std::fmt::Debug for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let lit = self.0.iter().filter(|&&p| p != 0).count();
        f.debug_struct("Frame").field("lit", &lit).finish()
    }
}
