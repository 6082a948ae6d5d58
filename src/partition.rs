use std::iter::FusedIterator;

/// Smallest chunk handed to a worker, to amortize dispatch overhead.
pub const MIN_CHUNK_SIZE: u128 = 10_000;

/// Chunks per worker per length, so a worker that finishes early (or a
/// match found early) leaves the rest of the pool something to pick up.
pub const OVERSUBSCRIPTION: usize = 10;

// ---------------------------------------------------------------------------
// WorkChunk
// ---------------------------------------------------------------------------

/// A contiguous half-open index range `[start, end)` of one search space.
///
/// The alphabet and target are shared by every chunk of a run and live with
/// the worker; a chunk only says which length and which indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkChunk {
    pub length: usize,
    pub start:  u128,
    pub end:    u128,
}

impl WorkChunk {
    /// Number of indices in the chunk.
    pub fn len(&self) -> u128 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

// ---------------------------------------------------------------------------
// ChunkPolicy
// ---------------------------------------------------------------------------

/// Sizing knobs for [`partition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkPolicy {
    pub min_chunk_size:   u128,
    pub oversubscription: usize,
}

impl Default for ChunkPolicy {
    fn default() -> Self {
        Self {
            min_chunk_size:   MIN_CHUNK_SIZE,
            oversubscription: OVERSUBSCRIPTION,
        }
    }
}

impl ChunkPolicy {
    /// `max(min_chunk_size, total / (workers × oversubscription))`, never 0.
    pub fn chunk_size(&self, total: u128, worker_count: usize) -> u128 {
        let slots = (worker_count.max(1) as u128)
            .saturating_mul(self.oversubscription.max(1) as u128);
        (total / slots).max(self.min_chunk_size).max(1)
    }
}

// ---------------------------------------------------------------------------
// partition()
// ---------------------------------------------------------------------------

/// Split `[0, total)` of the length-`length` space into contiguous chunks.
///
/// Chunks come out in ascending order, do not overlap, and cover the range
/// exactly; only the last may be shorter than the chosen chunk size. The
/// iterator is lazy, so a huge space never materializes its chunk list.
pub fn partition(length: usize, total: u128, worker_count: usize, policy: &ChunkPolicy) -> Chunks {
    Chunks {
        length,
        next: 0,
        total,
        size: policy.chunk_size(total, worker_count),
    }
}

/// Iterator returned by [`partition`].
#[derive(Debug, Clone)]
pub struct Chunks {
    length: usize,
    next:   u128,
    total:  u128,
    size:   u128,
}

impl Chunks {
    /// Chunk size chosen for this space.
    pub fn chunk_size(&self) -> u128 {
        self.size
    }

    /// Number of chunks not yet yielded.
    pub fn remaining(&self) -> u128 {
        let left = self.total - self.next;
        left.div_ceil(self.size)
    }
}

impl Iterator for Chunks {
    type Item = WorkChunk;

    fn next(&mut self) -> Option<WorkChunk> {
        if self.next >= self.total {
            return None;
        }
        let start = self.next;
        let end = start.saturating_add(self.size).min(self.total);
        self.next = end;
        Some(WorkChunk {
            length: self.length,
            start,
            end,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match usize::try_from(self.remaining()) {
            Ok(n)  => (n, Some(n)),
            Err(_) => (usize::MAX, None),
        }
    }
}

impl FusedIterator for Chunks {}
