mod dmd;
mod error;
mod types;

use std::error::Error;
use std::fs::{self, File};
use std::io::{self, Write};
use std::num::NonZeroUsize;
use std::path::PathBuf;
use clap::Parser;
use crate::dmd::*;

/// Decode the dot-matrix display of a pinball machine from a logic analyser capture of its
/// row-sync, frame-sync, dot-clock and serial-data wires. Frames are written to stdout as raw
/// 128x32 byte blocks.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Capture stream to decode, one sample per byte. Defaults to stdin.
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// File of pre-recorded frames to show while the decoder has no lock.
    #[arg(short, long)]
    fallback: Option<PathBuf>,

    /// Decode a synthetic signal rendered from this image instead of a capture.
    #[arg(long, conflicts_with = "input")]
    test_pattern: Option<PathBuf>,

    /// Samples per frame for the test pattern, to simulate clock drift. Defaults to the nominal
    /// 32768.
    #[arg(long)]
    samples_per_frame: Option<NonZeroUsize>,

    /// Start the test pattern this many samples into a frame.
    #[arg(long, default_value_t = 0)]
    offset: usize,

    /// Scramble the unused bits of the test pattern's samples.
    #[arg(long)]
    noise: bool,

    /// Stop after this many frames.
    #[arg(short = 'n', long)]
    frames: Option<u64>,
}

/// Decoder program.
fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    // Initialize logging.
    env_logger::init();

    let mut fallback = cli.fallback.as_ref().map(FallbackFrames::open).transpose()?;

    match (&cli.test_pattern, &cli.input) {
        (Some(image_path), _) => {
            let mut encoder = DmdEncoder::from_image_buf(&fs::read(image_path)?)?
                .with_offset(cli.offset)
                .with_noise(cli.noise);
            if let Some(samples_per_frame) = cli.samples_per_frame {
                encoder = encoder.with_samples_per_frame(samples_per_frame);
            }
            run(FrameDecoder::new(encoder), fallback.as_mut(), cli.frames)
        }
        (None, Some(input)) => {
            let source = ReaderSource::new(io::BufReader::new(File::open(input)?));
            run(FrameDecoder::new(source), fallback.as_mut(), cli.frames)
        }
        (None, None) => {
            let source = ReaderSource::new(io::stdin().lock());
            run(FrameDecoder::new(source), fallback.as_mut(), cli.frames)
        }
    }
}

/// Decode frames until the source runs dry (an error) or `limit` frames have been written.
fn run<S: SampleSource>(
    mut decoder: FrameDecoder<S>,
    mut fallback: Option<&mut FallbackFrames>,
    limit: Option<u64>,
) -> Result<(), Box<dyn Error>> {
    let mut stdout = io::stdout().lock();

    while limit.map_or(true, |limit| decoder.frames_decoded() < limit) {
        let frame = decoder.next_frame()?;

        let frame = match fallback.as_deref_mut() {
            Some(fallback) if !decoder.is_locked() => fallback.next_frame(),
            _ => frame,
        };

        stdout.write_all(frame.as_bytes())?;
        stdout.flush()?;
    }

    log::info!(
        "Decoded {} frames, finishing in state {:?} (period {:?})",
        decoder.frames_decoded(),
        decoder.state(),
        decoder.period()
    );
    Ok(())
}
