use crate::dmd::{
    Edges, MICROSECONDS_PER_FRAME, MICROSECONDS_PHASE_ZERO_FROM_VSYNC_RISING_EDGE, ROWS_PER_FRAME,
};
use crate::types::{SampleCount, SampleOffset};

/// Convert a duration in microseconds to samples, scaled by the current period estimate rather
/// than the nominal sample rate so the conversion follows clock drift.
pub fn samples_from_us(us: SampleCount, period: SampleCount) -> SampleCount {
    us * period / MICROSECONDS_PER_FRAME
}

/// Frame-sync is high for one row out of every frame, so the low stretch between its falling
/// and rising edges is 31/32 of the period. Integer division truncates; the error is under one
/// sample and is re-measured every frame, so it never accumulates.
pub fn scale_low_span(low_span: SampleCount) -> SampleCount {
    low_span * ROWS_PER_FRAME / (ROWS_PER_FRAME - 1)
}

/// How far the end of a window lies past the phase-zero point that follows `rising_edge`.
/// Negative when the window stops short of phase zero.
pub fn phase_after_rising_edge(
    window_len: SampleCount,
    rising_edge: usize,
    period: SampleCount,
) -> SampleOffset {
    let phase_zero =
        rising_edge + samples_from_us(MICROSECONDS_PHASE_ZERO_FROM_VSYNC_RISING_EDGE, period);
    window_len as SampleOffset - phase_zero as SampleOffset
}

/// A period and phase pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Estimate {
    pub period: SampleCount,
    pub phase: SampleOffset,
}

impl Estimate {
    /// Samples to drop after a cold acquisition so the next read starts exactly at phase zero.
    pub fn acquisition_discard(&self) -> SampleCount {
        let discard = self.period as SampleOffset - self.phase;
        if discard < 0 {
            log::warn!(
                "Acquisition window ran {} samples past phase zero, not discarding",
                self.phase
            );
        }
        discard.max(0) as SampleCount
    }
}

/// Cold acquisition over a full buffer: one period is the gap between the last two frame-sync
/// rising edges, and the phase is measured from the last one.
pub fn acquire(rising_edges: &[usize], window_len: SampleCount) -> Option<Estimate> {
    let &[.., second_last, last] = rising_edges else {
        return None;
    };

    let period = last - second_last;
    Some(Estimate {
        period,
        phase: phase_after_rising_edge(window_len, last, period),
    })
}

/// The clock recovery state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LockState {
    /// Never locked, so there's no period to read with. Cold acquisition is needed.
    #[default]
    Acquiring,
    /// The last window didn't look like a frame. Keep reading a period at a time until one does.
    Unlocked { last_good_period: SampleCount },
    /// Period and phase are trusted.
    Locked {
        period: SampleCount,
        phase: SampleOffset,
    },
}

impl LockState {
    pub fn from_acquisition(estimate: Option<Estimate>) -> Self {
        match estimate {
            Some(Estimate { period, .. }) if period > 0 => LockState::Locked { period, phase: 0 },
            _ => LockState::Acquiring,
        }
    }

    pub fn is_locked(&self) -> bool {
        matches!(self, LockState::Locked { .. })
    }

    /// The period reads are sized by, if there is one.
    pub fn period(&self) -> Option<SampleCount> {
        match *self {
            LockState::Acquiring => None,
            LockState::Unlocked { last_good_period } => Some(last_good_period),
            LockState::Locked { period, .. } => Some(period),
        }
    }

    pub fn phase(&self) -> SampleOffset {
        match *self {
            LockState::Locked { phase, .. } => phase,
            _ => 0,
        }
    }

    /// How many samples to read to reach the next phase-zero point, kept within `1..=capacity`.
    pub fn next_read_len(&self, capacity: SampleCount) -> Option<SampleCount> {
        let period = self.period()?;
        let wanted = period as SampleOffset - self.phase();
        let len = wanted.clamp(1, capacity as SampleOffset) as SampleCount;
        if len as SampleOffset != wanted {
            log::warn!("Read of {} samples clamped to {}", wanted, len);
        }
        Some(len)
    }

    /// Steady-state update from the frame-sync edges of a freshly read window. Only a window
    /// holding exactly one falling edge followed by one rising edge is trusted; anything else
    /// drops lock and keeps the last good period.
    pub fn advance(self, window_len: SampleCount, frame_sync: &Edges) -> LockState {
        let Some(last_good_period) = self.period() else {
            return self;
        };

        match frame_sync.single_pair() {
            Some((falling, rising)) if falling < rising => {
                let period = scale_low_span(rising - falling);
                LockState::Locked {
                    period,
                    phase: phase_after_rising_edge(window_len, rising, period),
                }
            }
            _ => LockState::Unlocked { last_good_period },
        }
    }
}
