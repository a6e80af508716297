//! Bounded replay queue feeding the integral term
//!
//! Storage is a fixed arena of `capacity` rows with a write cursor. Pushing
//! past capacity overwrites the oldest rows, so the queue never reallocates.

use rand::seq::index;
use rand::Rng;

use crate::{Error, Result};

/// Rows drawn from a [`ReplayQueue`]
#[derive(Debug, Clone, PartialEq)]
pub struct ReplaySample {
    /// `sample_size × sample_dim`, row-major
    pub samples: Vec<f32>,
    /// One label per row, present for paired queues
    pub labels: Option<Vec<usize>>,
}

impl ReplaySample {
    pub fn rows(&self, sample_dim: usize) -> usize {
        self.samples.len() / sample_dim.max(1)
    }
}

/// Fixed-capacity FIFO pool of samples with optional paired labels
#[derive(Debug, Clone)]
pub struct ReplayQueue {
    capacity: usize,
    sample_size: usize,
    sample_dim: usize,
    samples: Vec<f32>,
    labels: Option<Vec<usize>>,
    cursor: usize,
    len: usize,
}

impl ReplayQueue {
    /// Unlabelled queue of `sample_dim`-wide rows
    ///
    /// # Errors
    ///
    /// `ReplayCapacity` if `capacity < sample_size`, `ConfigError` if any
    /// size is zero.
    pub fn new(capacity: usize, sample_size: usize, sample_dim: usize) -> Result<Self> {
        if capacity == 0 || sample_size == 0 || sample_dim == 0 {
            return Err(Error::ConfigError(format!(
                "replay queue sizes must be positive (capacity={capacity}, sample_size={sample_size}, sample_dim={sample_dim})"
            )));
        }
        if capacity < sample_size {
            return Err(Error::ReplayCapacity { capacity, sample_size });
        }
        Ok(Self {
            capacity,
            sample_size,
            sample_dim,
            samples: vec![0.0; capacity * sample_dim],
            labels: None,
            cursor: 0,
            len: 0,
        })
    }

    /// Queue that stores one label alongside every row
    pub fn with_labels(capacity: usize, sample_size: usize, sample_dim: usize) -> Result<Self> {
        let mut queue = Self::new(capacity, sample_size, sample_dim)?;
        queue.labels = Some(vec![0; capacity]);
        Ok(queue)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn sample_size(&self) -> usize {
        self.sample_size
    }

    pub fn sample_dim(&self) -> usize {
        self.sample_dim
    }

    /// Number of rows held, never above `capacity`
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len == self.capacity
    }

    pub fn is_paired(&self) -> bool {
        self.labels.is_some()
    }

    /// Append a batch, evicting the oldest rows once full
    ///
    /// # Errors
    ///
    /// `ShapeMismatch` if `samples` is not whole rows, or if a paired queue
    /// gets no labels or a label count that differs from the row count.
    pub fn set_data(&mut self, samples: &[f32], labels: Option<&[usize]>) -> Result<()> {
        if samples.len() % self.sample_dim != 0 {
            return Err(Error::ShapeMismatch(format!(
                "replay batch of {} values is not a multiple of sample_dim {}",
                samples.len(),
                self.sample_dim
            )));
        }
        let rows = samples.len() / self.sample_dim;
        if self.labels.is_some() {
            match labels {
                Some(l) if l.len() == rows => {}
                Some(l) => {
                    return Err(Error::ShapeMismatch(format!(
                        "replay batch has {rows} rows but {} labels",
                        l.len()
                    )))
                }
                None => {
                    return Err(Error::ShapeMismatch(
                        "paired replay queue needs labels".to_string(),
                    ))
                }
            }
        }

        let d = self.sample_dim;
        for (row, values) in samples.chunks_exact(d).enumerate() {
            let slot = self.cursor;
            self.samples[slot * d..(slot + 1) * d].copy_from_slice(values);
            if let (Some(stored), Some(incoming)) = (self.labels.as_mut(), labels) {
                stored[slot] = incoming[row];
            }
            self.cursor = (self.cursor + 1) % self.capacity;
            self.len = (self.len + 1).min(self.capacity);
        }
        Ok(())
    }

    /// Draw exactly `sample_size` rows without mutating the queue
    ///
    /// Draws with replacement while fewer than `sample_size` rows are held,
    /// without replacement otherwise.
    pub fn get_data<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<ReplaySample> {
        if self.is_empty() {
            return Err(Error::EmptyReplay);
        }
        let slots: Vec<usize> = if self.len < self.sample_size {
            (0..self.sample_size).map(|_| rng.random_range(0..self.len)).collect()
        } else {
            index::sample(rng, self.len, self.sample_size).into_vec()
        };

        let d = self.sample_dim;
        let mut samples = Vec::with_capacity(slots.len() * d);
        for &slot in &slots {
            samples.extend_from_slice(&self.samples[slot * d..(slot + 1) * d]);
        }
        let labels = self.labels.as_ref().map(|stored| slots.iter().map(|&s| stored[s]).collect());
        Ok(ReplaySample { samples, labels })
    }

    /// Forget every row; capacity is kept
    pub fn clear(&mut self) {
        self.cursor = 0;
        self.len = 0;
    }
}
