use crate::types::Sample;

/// The four wires tapped off the display controller, one bit each in every sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    /// 'DBLANK' in the schematics. Mostly high, low for around 40us around each row boundary.
    /// Its rising edge marks the start of the next row.
    RowSync,
    /// 'ROW_DATA' in the schematics. Mostly low, high for one row's duration once per frame.
    FrameSync,
    /// 'DOT_CLOCK' in the schematics. Rising edge means the data line holds the next dot.
    PixelClock,
    /// 'SERIAL_DATA' in the schematics.
    SerialData,
}

impl Channel {
    pub const fn mask(self) -> Sample {
        match self {
            Channel::RowSync => 0x01,
            Channel::FrameSync => 0x02,
            Channel::PixelClock => 0x04,
            Channel::SerialData => 0x08,
        }
    }

    /// Upper bits are floating on the analyser, so only ever test our own bit.
    #[inline]
    pub const fn is_high(self, sample: Sample) -> bool {
        sample & self.mask() != 0
    }
}
