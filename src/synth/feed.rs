//! Overwrite ring of finished output samples for the visualizer.
//!
//! The engine writes one sample per frame and advances the cursor; it is
//! the only writer of both. Readers copy the whole ring starting at the
//! cursor, oldest sample first. A reader racing the writer can see a few
//! samples from the next lap; for a scope and a spectrum that is harmless,
//! so there is no lock and no back-pressure on the audio path.

use std::sync::{
    atomic::{AtomicI16, AtomicUsize, Ordering},
    Arc,
};

/// Samples kept for display and spectrum analysis.
pub const FEED_LEN: usize = 128;

struct SampleRing {
    samples: [AtomicI16; FEED_LEN],
    write_index: AtomicUsize,
}

/// Create the writer/reader pair.
pub fn sample_feed() -> (FeedWriter, FeedReader) {
    let ring = Arc::new(SampleRing {
        samples: std::array::from_fn(|_| AtomicI16::new(0)),
        write_index: AtomicUsize::new(0),
    });
    (
        FeedWriter {
            ring: Arc::clone(&ring),
        },
        FeedReader { ring },
    )
}

/// Audio-side handle.
pub struct FeedWriter {
    ring: Arc<SampleRing>,
}

impl FeedWriter {
    #[inline]
    pub fn push(&mut self, sample: i16) {
        let index = self.ring.write_index.load(Ordering::Relaxed);
        self.ring.samples[index].store(sample, Ordering::Relaxed);
        self.ring
            .write_index
            .store((index + 1) % FEED_LEN, Ordering::Release);
    }
}

/// Read-only handle for the visualizer. Cloning gives another reader.
#[derive(Clone)]
pub struct FeedReader {
    ring: Arc<SampleRing>,
}

impl FeedReader {
    /// Copy the ring into `out`, oldest first.
    pub fn snapshot(&self, out: &mut [i16; FEED_LEN]) {
        let start = self.ring.write_index.load(Ordering::Acquire);
        for (i, slot) in out.iter_mut().enumerate() {
            *slot = self.ring.samples[(start + i) % FEED_LEN].load(Ordering::Relaxed);
        }
    }

    pub fn write_index(&self) -> usize {
        self.ring.write_index.load(Ordering::Acquire)
    }
}
