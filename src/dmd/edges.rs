use crate::dmd::Channel;
use crate::types::Sample;

/// Indices `i` where `channel` is low at `i - 1` and high at `i`, in ascending order. Only pairs
/// wholly inside `samples` are considered.
pub fn rising_edges(samples: &[Sample], channel: Channel) -> Vec<usize> {
    transitions(samples, channel, false)
}

/// Indices `i` where `channel` is high at `i - 1` and low at `i`, in ascending order.
pub fn falling_edges(samples: &[Sample], channel: Channel) -> Vec<usize> {
    transitions(samples, channel, true)
}

fn transitions(samples: &[Sample], channel: Channel, from_high: bool) -> Vec<usize> {
    samples
        .windows(2)
        .enumerate()
        .filter(|(_, pair)| {
            channel.is_high(pair[0]) == from_high && channel.is_high(pair[1]) != from_high
        })
        .map(|(i, _)| i + 1)
        .collect()
}

/// Both edge lists for one channel over one window.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Edges {
    pub rising: Vec<usize>,
    pub falling: Vec<usize>,
}

impl Edges {
    pub fn detect(samples: &[Sample], channel: Channel) -> Self {
        Self {
            rising: rising_edges(samples, channel),
            falling: falling_edges(samples, channel),
        }
    }

    /// The single falling and single rising edge of a clean frame-sync pulse, if that's exactly
    /// what the window shows.
    pub fn single_pair(&self) -> Option<(usize, usize)> {
        match (self.falling.as_slice(), self.rising.as_slice()) {
            (&[falling], &[rising]) => Some((falling, rising)),
            _ => None,
        }
    }
}
