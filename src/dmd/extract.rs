use crate::dmd::{Channel, FRAME_PIXEL_COUNT, PIXELS_PER_ROW, ROWS_PER_FRAME};
use crate::types::{Frame, Intensity, Sample};

/// The intensity written for a lit dot. The dot-pattern renderer downstream scales this by the
/// chosen display colour, so it depends on that renderer rather than on the decoding.
pub const PIXEL_ON: Intensity = 64;

/// Decode one frame's worth of samples into a 128x32 frame.
///
/// Dots are taken from the serial data line at each dot-clock rising edge and each row-sync
/// rising edge starts a new row. Extra dot-clock or row-sync pulses beyond the grid are dropped,
/// and short rows or missing rows are padded with dark dots, so the result is always exactly one
/// frame. When `locked` is false the samples aren't trusted and a blank frame is returned.
pub fn extract_frame(samples: &[Sample], locked: bool) -> Frame {
    if !locked {
        return Frame::blank();
    }

    let mut pixels = Vec::with_capacity(FRAME_PIXEL_COUNT);
    let mut row = 0;
    let mut col = 0;

    let mut prev_clk = samples.first().map_or(false, |&s| Channel::PixelClock.is_high(s));
    let mut prev_hsync = samples.first().map_or(false, |&s| Channel::RowSync.is_high(s));

    for &sample in samples.iter().skip(1) {
        let clk = Channel::PixelClock.is_high(sample);
        let hsync = Channel::RowSync.is_high(sample);

        if clk && !prev_clk && col < PIXELS_PER_ROW && row < ROWS_PER_FRAME {
            let lit = Channel::SerialData.is_high(sample);
            pixels.push(if lit { PIXEL_ON } else { 0 });
            col += 1;
        }

        if hsync && !prev_hsync {
            if row < ROWS_PER_FRAME {
                pixels.resize((row + 1) * PIXELS_PER_ROW, 0);
            }
            col = 0;
            row += 1;
        }

        prev_clk = clk;
        prev_hsync = hsync;
    }

    // The last row might not have been closed by a row-sync edge.
    pixels.resize(FRAME_PIXEL_COUNT, 0);

    Frame::from_pixels(pixels)
}
