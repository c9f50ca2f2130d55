use std::io::{ErrorKind, Read};
use crate::error::{DecodeError, Result};
use crate::types::{Sample, SampleCount};

/// How many samples `discard` drops per read.
const DISCARD_CHUNK: usize = 4096;

/// A pull-based provider of raw samples. Implemented by the capture stream reader and the
/// synthetic signal generator so the decoder doesn't care where samples come from.
pub trait SampleSource {
    /// Fill `dst` completely, or fail with `ShortRead`. There's no partial success.
    fn fill(&mut self, dst: &mut [Sample]) -> Result<()>;

    /// Read and throw away `count` samples.
    fn discard(&mut self, count: SampleCount) -> Result<()> {
        let mut scratch = [0; DISCARD_CHUNK];
        let mut remaining = count;
        while remaining > 0 {
            let n = remaining.min(DISCARD_CHUNK);
            self.fill(&mut scratch[..n]).map_err(|err| match err {
                DecodeError::ShortRead { received, .. } => DecodeError::ShortRead {
                    requested: count,
                    received: count - remaining + received,
                },
                other => other,
            })?;
            remaining -= n;
        }
        Ok(())
    }
}

/// Samples from anything implementing `std::io::Read`: stdin, a capture file, a cursor in tests.
pub struct ReaderSource<R: Read> {
    reader: R,
}

impl<R: Read> ReaderSource<R> {
    pub fn new(reader: R) -> Self {
        ReaderSource { reader }
    }
}

impl<R: Read> SampleSource for ReaderSource<R> {
    fn fill(&mut self, dst: &mut [Sample]) -> Result<()> {
        let requested = dst.len();
        let mut received = 0;
        while received < requested {
            match self.reader.read(&mut dst[received..]) {
                Ok(0) => return Err(DecodeError::ShortRead { requested, received }),
                Ok(n) => received += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => {}
                Err(err) => {
                    log::error!("Sample stream failed after {} of {} samples: {}", received, requested, err);
                    return Err(DecodeError::ShortRead { requested, received });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn fills_exactly() {
        let mut source = ReaderSource::new(Cursor::new(vec![1u8, 2, 3, 4, 5]));
        let mut buf = [0; 3];
        source.fill(&mut buf).unwrap();
        assert_eq!(buf, [1, 2, 3]);
        source.fill(&mut buf[..2]).unwrap();
        assert_eq!(&buf[..2], &[4, 5]);
    }

    #[test]
    fn short_stream_fails() {
        let mut source = ReaderSource::new(Cursor::new(vec![0u8; 10]));
        let mut buf = [0; 16];
        match source.fill(&mut buf) {
            Err(DecodeError::ShortRead { requested, received }) => {
                assert_eq!(requested, 16);
                assert_eq!(received, 10);
            }
            other => panic!("Expected a short read, got {:?}", other),
        }
    }

    #[test]
    fn discard_spans_chunks() {
        let bytes: Vec<u8> = (0..10_000u32).map(|i| (i % 251) as u8).collect();
        let mut source = ReaderSource::new(Cursor::new(bytes));
        source.discard(9_000).unwrap();
        let mut buf = [0; 1];
        source.fill(&mut buf).unwrap();
        assert_eq!(buf[0], (9_000 % 251) as u8);

        match source.discard(5_000) {
            Err(DecodeError::ShortRead { requested, received }) => {
                assert_eq!(requested, 5_000);
                assert_eq!(received, 999);
            }
            other => panic!("Expected a short read, got {:?}", other),
        }
    }
}
