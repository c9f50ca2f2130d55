mod buffer;
mod channels;
mod decoder;
mod edges;
mod encoder;
mod extract;
mod fallback;
mod recovery;
mod source;

pub use buffer::*;
pub use channels::*;
pub use decoder::*;
pub use edges::*;
pub use encoder::*;
pub use extract::*;
pub use fallback::*;
pub use recovery::*;
pub use source::*;

use crate::types::SampleCount;

/// The number of dots in each display row.
pub const PIXELS_PER_ROW: usize = 128;

/// The number of rows in a frame.
pub const ROWS_PER_FRAME: usize = 32;

/// The size of a decoded frame in bytes, one byte per dot.
pub const FRAME_PIXEL_COUNT: usize = PIXELS_PER_ROW * ROWS_PER_FRAME;

/// The nominal capture rate of the logic analyser.
pub const SAMPLES_PER_MICROSECOND: SampleCount = 4;

/// Rows are refreshed once every 256us: a burst of 128 cycles of the 1MHz dot clock followed by
/// a stretch with the dot clock held low.
pub const MICROSECONDS_PER_ROW: SampleCount = 256;

/// The length of a full frame in microseconds.
pub const MICROSECONDS_PER_FRAME: SampleCount = ROWS_PER_FRAME * MICROSECONDS_PER_ROW;

/// The length of a frame in samples if both clocks ran at their nominal rate.
pub const NOMINAL_SAMPLES_PER_FRAME: SampleCount =
    MICROSECONDS_PER_FRAME * SAMPLES_PER_MICROSECOND;

/// Phase zero sits this long after the frame-sync rising edge, in the quiet stretch before the
/// first row's dots are clocked out.
pub const MICROSECONDS_PHASE_ZERO_FROM_VSYNC_RISING_EDGE: SampleCount = 64;

/// Space for two and a bit frames, so cold acquisition always sees two frame-sync pulses.
pub const SAMPLE_BUFFER_CAPACITY: SampleCount =
    2 * NOMINAL_SAMPLES_PER_FRAME + NOMINAL_SAMPLES_PER_FRAME / 4;
