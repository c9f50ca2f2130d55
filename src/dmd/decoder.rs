use crate::dmd::{
    acquire, extract_frame, rising_edges, Channel, Edges, LockState, SampleBuffer, SampleSource,
};
use crate::error::Result;
use crate::types::{Frame, SampleCount};

/// After this many windows in a row without a clean frame-sync pulse the held period is no
/// longer trusted and the decoder starts over with cold acquisition.
pub const REACQUIRE_AFTER_UNLOCKED_FRAMES: u32 = 4;

/// The frame-locking decoder: pulls samples from a source, keeps its reads aligned on frame
/// boundaries as the two clocks drift, and turns each frame's samples into dots.
pub struct FrameDecoder<S: SampleSource> {
    source: S,
    buffer: SampleBuffer,
    state: LockState,
    unlocked_frames: u32,
    frames_decoded: u64,
}

impl<S: SampleSource> FrameDecoder<S> {
    /// Create a new decoder with room for cold acquisition at the nominal frame rate.
    pub fn new(source: S) -> Self {
        Self::with_buffer(source, SampleBuffer::with_nominal_capacity())
    }

    /// Create a new decoder with a custom buffer size. It must hold comfortably more than two
    /// frames or cold acquisition can't see two frame-sync pulses.
    #[cfg(test)]
    pub fn with_capacity(source: S, capacity: SampleCount) -> Self {
        Self::with_buffer(source, SampleBuffer::new(capacity))
    }

    fn with_buffer(source: S, buffer: SampleBuffer) -> Self {
        Self {
            source,
            buffer,
            state: LockState::default(),
            unlocked_frames: 0,
            frames_decoded: 0,
        }
    }

    pub fn state(&self) -> LockState {
        self.state
    }

    pub fn is_locked(&self) -> bool {
        self.state.is_locked()
    }

    /// The current period estimate in samples, if there's been a lock.
    pub fn period(&self) -> Option<SampleCount> {
        self.state.period()
    }

    pub fn frames_decoded(&self) -> u64 {
        self.frames_decoded
    }

    /// Run one decode cycle. Without lock the frame is blank; only a failing source is an error.
    pub fn next_frame(&mut self) -> Result<Frame> {
        let frame = self.decode_cycle()?;
        self.frames_decoded += 1;
        Ok(frame)
    }

    fn decode_cycle(&mut self) -> Result<Frame> {
        if self.state == LockState::Acquiring {
            self.cold_acquire()?;
            if self.state == LockState::Acquiring {
                return Ok(Frame::blank());
            }
        }

        self.track()?;

        let frame = extract_frame(self.buffer.samples(), self.state.is_locked());
        self.check_reacquire();
        Ok(frame)
    }

    /// Fill the whole buffer and estimate period and phase from the last two frame-sync pulses,
    /// then skip ahead so the next read starts on phase zero.
    fn cold_acquire(&mut self) -> Result<()> {
        let capacity = self.buffer.capacity();
        let samples = self.buffer.fill_from(&mut self.source, capacity)?;

        let rising = rising_edges(samples, Channel::FrameSync);
        log::trace!("Acquisition window holds {} frame-sync rising edges", rising.len());

        let Some(estimate) = acquire(&rising, samples.len()) else {
            log::debug!("No frame-sync found, still acquiring");
            return Ok(());
        };

        self.source.discard(estimate.acquisition_discard())?;
        self.state = LockState::from_acquisition(Some(estimate));
        log::info!(
            "Locked: period {} samples, phase {}",
            estimate.period,
            estimate.phase
        );

        Ok(())
    }

    /// Read up to the next phase-zero point and update the estimates from that window.
    fn track(&mut self) -> Result<()> {
        let Some(len) = self.state.next_read_len(self.buffer.capacity()) else {
            return Ok(());
        };

        let window = self.buffer.fill_from(&mut self.source, len)?;
        let edges = Edges::detect(window, Channel::FrameSync);
        let window_len = self.buffer.len();
        log::trace!(
            "Window of {} samples: {} rising, {} falling frame-sync edges",
            window_len,
            edges.rising.len(),
            edges.falling.len()
        );

        let was_locked = self.state.is_locked();
        self.state = self.state.advance(window_len, &edges);

        match self.state {
            LockState::Locked { period, phase } => {
                if !was_locked {
                    log::info!("Regained lock: period {} samples", period);
                }
                log::debug!("Frame {}: period {}, phase {}", self.frames_decoded, period, phase);
            }
            LockState::Unlocked { last_good_period } if was_locked => {
                log::warn!(
                    "Lost lock ({} rising, {} falling frame-sync edges), holding period {}",
                    edges.rising.len(),
                    edges.falling.len(),
                    last_good_period
                );
            }
            _ => {}
        }

        Ok(())
    }

    /// Count windows without lock and give up on the held period after too many of them, e.g.
    /// when a dropout hid a frame-sync pulse during acquisition and the period came out doubled.
    fn check_reacquire(&mut self) {
        if self.state.is_locked() {
            self.unlocked_frames = 0;
            return;
        }

        self.unlocked_frames += 1;
        if self.unlocked_frames >= REACQUIRE_AFTER_UNLOCKED_FRAMES {
            log::warn!(
                "No lock for {} frames with period {:?}, reacquiring",
                self.unlocked_frames,
                self.state.period()
            );
            self.state = LockState::Acquiring;
            self.unlocked_frames = 0;
        }
    }
}
