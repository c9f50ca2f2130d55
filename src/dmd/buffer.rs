use crate::dmd::{SampleSource, SAMPLE_BUFFER_CAPACITY};
use crate::error::{DecodeError, Result};
use crate::types::{Sample, SampleCount};

/// A fixed-capacity sample buffer which remembers how many of its samples are valid.
pub struct SampleBuffer {
    data: Box<[Sample]>,
    len: SampleCount,
}

impl SampleBuffer {
    /// Create an empty buffer holding up to `capacity` samples.
    pub fn new(capacity: SampleCount) -> Self {
        Self {
            data: vec![0; capacity].into_boxed_slice(),
            len: 0,
        }
    }

    /// Create a buffer big enough for cold acquisition at the nominal frame rate.
    pub fn with_nominal_capacity() -> Self {
        Self::new(SAMPLE_BUFFER_CAPACITY)
    }

    /// Replace the buffer contents with the next `count` samples from `source`. The fill length
    /// is only committed once the read has fully succeeded; on failure the buffer is left empty.
    pub fn fill_from<S: SampleSource + ?Sized>(
        &mut self,
        source: &mut S,
        count: SampleCount,
    ) -> Result<&[Sample]> {
        if count > self.data.len() {
            return Err(DecodeError::BufferOverflow {
                requested: count,
                capacity: self.data.len(),
            });
        }

        self.len = 0;
        source.fill(&mut self.data[..count])?;
        self.len = count;

        Ok(self.samples())
    }

    /// The valid samples from the last fill.
    pub fn samples(&self) -> &[Sample] {
        &self.data[..self.len]
    }

    pub fn len(&self) -> SampleCount {
        self.len
    }

    pub fn capacity(&self) -> SampleCount {
        self.data.len()
    }
}
