use std::io::Cursor;
use std::num::NonZeroUsize;
use crate::dmd::{
    Channel, SampleSource, MICROSECONDS_PER_ROW, NOMINAL_SAMPLES_PER_FRAME, PIXELS_PER_ROW,
    PIXEL_ON, ROWS_PER_FRAME, SAMPLES_PER_MICROSECOND,
};
use crate::error::Result;
use crate::types::{Frame, Sample, SampleCount};

/// Samples per row at the nominal rate.
const ROW_SAMPLES: SampleCount = MICROSECONDS_PER_ROW * SAMPLES_PER_MICROSECOND;

/// Row-sync ('DBLANK') goes low this long before the end of each row...
const DBLANK_LEAD: SampleCount = 16 * SAMPLES_PER_MICROSECOND;

/// ...and comes back high this long after it. Its rising edge starts the next row.
const DBLANK_TRAIL: SampleCount = 24 * SAMPLES_PER_MICROSECOND;

/// Where in the row the dot-clock burst begins.
const DOT_BURST_START: SampleCount = 96 * SAMPLES_PER_MICROSECOND;

/// One cycle of the 1MHz dot clock.
const DOT_CLOCK_PERIOD: SampleCount = SAMPLES_PER_MICROSECOND;

/// Generates the four-wire display signal for a frame, as the logic analyser would capture it.
/// The frame repeats forever. Useful as a test signal and for exercising the decoder without
/// hardware.
pub struct DmdEncoder {
    frame: Frame,
    samples_per_frame: SampleCount,
    offset: SampleCount,
    noise: bool,
    position: u64,
}

impl DmdEncoder {
    /// Create a new encoder producing `frame` at exactly the nominal sample rate, starting on a
    /// frame-sync rising edge.
    pub fn new(frame: Frame) -> Self {
        Self {
            frame,
            samples_per_frame: NOMINAL_SAMPLES_PER_FRAME,
            offset: 0,
            noise: false,
            position: 0,
        }
    }

    /// Load an image and threshold it down to a frame. Any size works, it's sampled onto the
    /// 128x32 grid.
    pub fn from_image_buf(buf: &[u8]) -> Result<Self> {
        let img = image::io::Reader::new(Cursor::new(buf))
            .with_guessed_format()?
            .decode()?
            .into_luma8();

        let mut frame = Frame::blank();
        for y in 0..ROWS_PER_FRAME {
            for x in 0..PIXELS_PER_ROW {
                let src_x = (x as u32 * img.width() / PIXELS_PER_ROW as u32).min(img.width().saturating_sub(1));
                let src_y = (y as u32 * img.height() / ROWS_PER_FRAME as u32).min(img.height().saturating_sub(1));
                if img.get_pixel(src_x, src_y).0[0] >= 128 {
                    frame.set_pixel(x, y, PIXEL_ON);
                }
            }
        }

        Ok(Self::new(frame))
    }

    /// Stretch or squash each frame to `samples` samples, as if the two clocks disagree.
    pub fn with_samples_per_frame(mut self, samples: NonZeroUsize) -> Self {
        self.samples_per_frame = samples.get();
        self
    }

    /// Start the stream `offset` samples into a frame.
    pub fn with_offset(mut self, offset: SampleCount) -> Self {
        self.offset = offset;
        self
    }

    /// Put random garbage in the four unused bits of every sample.
    pub fn with_noise(mut self, noise: bool) -> Self {
        self.noise = noise;
        self
    }

    #[cfg(test)]
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    /// Generate the next `count` samples.
    #[cfg(test)]
    pub fn render(&mut self, count: SampleCount) -> Vec<Sample> {
        let mut samples = vec![0; count];
        self.render_into(&mut samples);
        samples
    }

    fn render_into(&mut self, dst: &mut [Sample]) {
        for sample in dst.iter_mut() {
            *sample = self.sample_at(self.position);
            self.position += 1;
        }
    }

    /// The sample at a given position in the stream.
    fn sample_at(&self, position: u64) -> Sample {
        let spf = self.samples_per_frame as u64;
        let frame_pos = (position + self.offset as u64) % spf;
        // Map back onto the nominal timeline of the display controller.
        let t = (frame_pos * NOMINAL_SAMPLES_PER_FRAME as u64 / spf) as SampleCount;

        let row = t / ROW_SAMPLES;
        let in_row = t % ROW_SAMPLES;

        let mut sample = 0;

        if t < ROW_SAMPLES {
            sample |= Channel::FrameSync.mask();
        }

        if in_row >= DBLANK_TRAIL && in_row < ROW_SAMPLES - DBLANK_LEAD {
            sample |= Channel::RowSync.mask();
        }

        let burst_end = DOT_BURST_START + PIXELS_PER_ROW * DOT_CLOCK_PERIOD;
        if (DOT_BURST_START..burst_end).contains(&in_row) {
            let col = (in_row - DOT_BURST_START) / DOT_CLOCK_PERIOD;
            let cycle = (in_row - DOT_BURST_START) % DOT_CLOCK_PERIOD;
            if cycle >= DOT_CLOCK_PERIOD / 2 {
                sample |= Channel::PixelClock.mask();
            }
            if self.frame.pixel(col, row) != 0 {
                sample |= Channel::SerialData.mask();
            }
        }

        if self.noise {
            sample |= rand::random::<u8>() & 0xf0;
        }

        sample
    }
}

impl SampleSource for DmdEncoder {
    fn fill(&mut self, dst: &mut [Sample]) -> Result<()> {
        self.render_into(dst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dmd::{falling_edges, rising_edges, Edges};

    #[test]
    fn frame_sync_is_high_for_one_row() {
        let mut encoder = DmdEncoder::new(Frame::blank()).with_offset(100);
        let samples = encoder.render(3 * NOMINAL_SAMPLES_PER_FRAME);

        let edges = Edges::detect(&samples, Channel::FrameSync);
        assert_eq!(edges.rising, vec![32668, 65436, 98204]);
        assert_eq!(edges.falling, vec![924, 33692, 66460]);
    }

    #[test]
    fn one_row_sync_and_burst_per_row() {
        let mut encoder = DmdEncoder::new(Frame::blank());
        let samples = encoder.render(NOMINAL_SAMPLES_PER_FRAME);

        assert_eq!(rising_edges(&samples, Channel::RowSync).len(), ROWS_PER_FRAME);
        assert_eq!(
            rising_edges(&samples, Channel::PixelClock).len(),
            ROWS_PER_FRAME * PIXELS_PER_ROW
        );
        assert!(falling_edges(&samples, Channel::SerialData).is_empty());
    }

    #[test]
    fn drift_stretches_the_frame() {
        let mut encoder = DmdEncoder::new(Frame::blank())
            .with_samples_per_frame(NonZeroUsize::new(33000).unwrap());
        let samples = encoder.render(3 * 33000);
        let rising = rising_edges(&samples, Channel::FrameSync);
        assert_eq!(rising, vec![33000, 66000]);
        assert_eq!(
            rising_edges(&samples[..33000], Channel::PixelClock).len(),
            ROWS_PER_FRAME * PIXELS_PER_ROW
        );
    }

    #[test]
    fn noise_only_touches_unused_bits() {
        let mut clean = DmdEncoder::new(Frame::blank());
        let mut noisy = DmdEncoder::new(Frame::blank()).with_noise(true);
        let a = clean.render(5000);
        let b = noisy.render(5000);
        assert!(a.iter().zip(&b).all(|(x, y)| *x == y & 0x0f));
    }

    #[test]
    fn loads_image() {
        let mut img = image::GrayImage::new(256, 64);
        for (x, y, pixel) in img.enumerate_pixels_mut() {
            pixel.0[0] = if x < 128 && y < 32 { 255 } else { 0 };
        }
        let mut png = Vec::new();
        img.write_to(&mut Cursor::new(&mut png), image::ImageOutputFormat::Png)
            .unwrap();

        let encoder = DmdEncoder::from_image_buf(&png).unwrap();
        assert_eq!(encoder.frame().pixel(0, 0), PIXEL_ON);
        assert_eq!(encoder.frame().pixel(63, 15), PIXEL_ON);
        assert_eq!(encoder.frame().pixel(64, 15), 0);
        assert_eq!(encoder.frame().pixel(0, 16), 0);
    }

    #[test]
    fn rejects_garbage_image() {
        assert!(DmdEncoder::from_image_buf(b"not an image").is_err());
    }
}
