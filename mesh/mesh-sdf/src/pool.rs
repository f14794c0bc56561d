//! Reusable fork-join worker pool.

use std::ops::Range;
use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, error};

use crate::error::{SdfError, SdfResult};

/// A fixed-size pool of worker threads with fork-join partitioned jobs.
///
/// Work is split into at most [`WorkerPool::threads`] contiguous partitions,
/// one task per partition, and every call returns only after all tasks
/// finished. A panic inside a task is caught at the task boundary and
/// reported as [`SdfError::WorkerPanicked`] for the first failed partition.
///
/// # Example
///
/// ```
/// use mesh_sdf::WorkerPool;
///
/// let pool = WorkerPool::new(3).unwrap();
/// let mut data = vec![0u32; 10];
/// pool.for_each_partition(&mut data, 1, |range, chunk| {
///     for (i, v) in range.zip(chunk.iter_mut()) {
///         *v = u32::try_from(i).unwrap_or(0) * 2;
///     }
/// })
/// .unwrap();
/// assert_eq!(data[9], 18);
/// ```
#[derive(Debug)]
pub struct WorkerPool {
    pool: rayon::ThreadPool,
    threads: usize,
}

impl WorkerPool {
    /// Create a pool with `threads` workers (0 = available parallelism).
    ///
    /// # Errors
    ///
    /// Returns [`SdfError::ThreadPool`] if the threads cannot be spawned.
    pub fn new(threads: usize) -> SdfResult<Self> {
        let threads = if threads == 0 {
            std::thread::available_parallelism().map_or(1, std::num::NonZeroUsize::get)
        } else {
            threads
        };
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("sdf-worker-{i}"))
            .build()
            .map_err(|e| SdfError::ThreadPool(e.to_string()))?;
        debug!(threads, "Worker pool started");
        Ok(Self { pool, threads })
    }

    /// Number of worker threads.
    #[must_use]
    pub const fn threads(&self) -> usize {
        self.threads
    }

    /// Split `0..len` into at most `parts` contiguous, non-empty ranges whose
    /// lengths differ by at most one.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_sdf::WorkerPool;
    ///
    /// assert_eq!(WorkerPool::partition(7, 3), vec![0..3, 3..5, 5..7]);
    /// assert_eq!(WorkerPool::partition(2, 4), vec![0..1, 1..2]);
    /// assert!(WorkerPool::partition(0, 4).is_empty());
    /// ```
    #[must_use]
    pub fn partition(len: usize, parts: usize) -> Vec<Range<usize>> {
        let parts = parts.clamp(1, len.max(1));
        if len == 0 {
            return Vec::new();
        }
        let base = len / parts;
        let extra = len % parts;

        let mut start = 0;
        (0..parts)
            .map(|i| {
                let end = start + base + usize::from(i < extra);
                let range = start..end;
                start = end;
                range
            })
            .collect()
    }

    /// Run `f` over disjoint chunks of `data`, one per partition.
    ///
    /// `data` is viewed as `data.len() / unit` units of `unit` elements each.
    /// Units are partitioned across the workers; each call receives its unit
    /// range and the matching mutable chunk. Trailing elements that do not
    /// form a whole unit are left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`SdfError::WorkerPanicked`] if any partition panicked.
    pub fn for_each_partition<T, F>(&self, data: &mut [T], unit: usize, f: F) -> SdfResult<()>
    where
        T: Send,
        F: Fn(Range<usize>, &mut [T]) + Sync,
    {
        let unit = unit.max(1);
        let ranges = Self::partition(data.len() / unit, self.threads);

        let mut chunks = Vec::with_capacity(ranges.len());
        let mut rest = data;
        for range in &ranges {
            let (head, tail) = std::mem::take(&mut rest).split_at_mut(range.len() * unit);
            chunks.push(head);
            rest = tail;
        }

        let mut completed = vec![false; ranges.len()];
        let f = &f;
        self.pool.scope(|scope| {
            for ((range, chunk), done) in ranges.iter().cloned().zip(chunks).zip(completed.iter_mut()) {
                scope.spawn(move |_| {
                    *done = panic::catch_unwind(AssertUnwindSafe(|| f(range, chunk))).is_ok();
                });
            }
        });

        match completed.iter().position(|done| !done) {
            Some(worker) => {
                error!(worker, "Worker panicked");
                Err(SdfError::WorkerPanicked { worker })
            }
            None => Ok(()),
        }
    }

    /// Run `f` over each partition of `0..len` and collect the results in
    /// partition order.
    ///
    /// # Errors
    ///
    /// Returns [`SdfError::WorkerPanicked`] if any partition panicked.
    pub fn map_partitions<R, F>(&self, len: usize, f: F) -> SdfResult<Vec<R>>
    where
        R: Send,
        F: Fn(Range<usize>) -> R + Sync,
    {
        let ranges = Self::partition(len, self.threads);
        let mut slots: Vec<Option<R>> = ranges.iter().map(|_| None).collect();

        let f = &f;
        self.pool.scope(|scope| {
            for (range, slot) in ranges.iter().cloned().zip(slots.iter_mut()) {
                scope.spawn(move |_| {
                    *slot = panic::catch_unwind(AssertUnwindSafe(|| f(range))).ok();
                });
            }
        });

        slots
            .into_iter()
            .enumerate()
            .map(|(worker, slot)| {
                slot.ok_or_else(|| {
                    error!(worker, "Worker panicked");
                    SdfError::WorkerPanicked { worker }
                })
            })
            .collect()
    }
}
