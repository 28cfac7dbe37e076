//! Parallel-array time series for all bodies.
//!
//! For each body index: ten equal-length arrays (position ×3, velocity ×3,
//! quaternion ×4) plus a tick array mapping each retained sample to its
//! index on the shared time axis. One shared time array covers all bodies.
//!
//! `append` is the single mutation entry point. Every call pushes exactly
//! one value onto the shared time array and one full 10-tuple onto each
//! present body's arrays; absent bodies are skipped without padding. The
//! tick bookkeeping is what keeps capacity reduction alignment-safe when
//! bodies have divergent absence patterns.

use crate::types::{Epoch, Sample};

// ---------------------------------------------------------------------------
// Overflow policy
// ---------------------------------------------------------------------------

/// Bounded-capacity reduction strategy.
///
/// A policy only chooses which time indices survive; the store applies the
/// selection to every per-body array itself, so no policy can break the
/// index-alignment invariant. A policy that retains everything falls back
/// to dropping the single oldest point.
pub trait OverflowPolicy: std::fmt::Debug {
    /// Mask over the current time axis; `true` = keep.
    fn retain_mask(&self, len: usize) -> Vec<bool>;
}

/// Keeps every second time entry, always retaining the first point.
#[derive(Clone, Copy, Debug, Default)]
pub struct DecimateByTwo;

impl OverflowPolicy for DecimateByTwo {
    fn retain_mask(&self, len: usize) -> Vec<bool> {
        (0..len).map(|i| i % 2 == 0).collect()
    }
}

// ---------------------------------------------------------------------------
// Per-body series
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Default)]
struct BodySeries {
    pos_x: Vec<f64>,
    pos_y: Vec<f64>,
    pos_z: Vec<f64>,
    vel_x: Vec<f64>,
    vel_y: Vec<f64>,
    vel_z: Vec<f64>,
    q1: Vec<f64>,
    q2: Vec<f64>,
    q3: Vec<f64>,
    q4: Vec<f64>,
    /// Time-axis index of each sample.
    ticks: Vec<u32>,
}

impl BodySeries {
    fn len(&self) -> usize {
        self.ticks.len()
    }

    fn push(&mut self, sample: &Sample, tick: u32) {
        let s = &sample.state;
        self.pos_x.push(s[0]);
        self.pos_y.push(s[1]);
        self.pos_z.push(s[2]);
        self.vel_x.push(s[3]);
        self.vel_y.push(s[4]);
        self.vel_z.push(s[5]);
        self.q1.push(sample.quat[0]);
        self.q2.push(sample.quat[1]);
        self.q3.push(sample.quat[2]);
        self.q4.push(sample.quat[3]);
        self.ticks.push(tick);
    }

    /// Drop samples whose tick was removed from the time axis and remap the
    /// survivors to the compacted indices.
    fn apply_remap(&mut self, remap: &[Option<u32>]) {
        let keep: Vec<bool> = self
            .ticks
            .iter()
            .map(|t| remap[*t as usize].is_some())
            .collect();
        compact(&mut self.pos_x, &keep);
        compact(&mut self.pos_y, &keep);
        compact(&mut self.pos_z, &keep);
        compact(&mut self.vel_x, &keep);
        compact(&mut self.vel_y, &keep);
        compact(&mut self.vel_z, &keep);
        compact(&mut self.q1, &keep);
        compact(&mut self.q2, &keep);
        compact(&mut self.q3, &keep);
        compact(&mut self.q4, &keep);
        self.ticks = self
            .ticks
            .iter()
            .filter_map(|t| remap[*t as usize])
            .collect();
    }

    fn clear(&mut self) {
        self.pos_x.clear();
        self.pos_y.clear();
        self.pos_z.clear();
        self.vel_x.clear();
        self.vel_y.clear();
        self.vel_z.clear();
        self.q1.clear();
        self.q2.clear();
        self.q3.clear();
        self.q4.clear();
        self.ticks.clear();
    }
}

fn compact(values: &mut Vec<f64>, keep: &[bool]) {
    let mut idx = 0;
    values.retain(|_| {
        let k = keep[idx];
        idx += 1;
        k
    });
}

// ---------------------------------------------------------------------------
// SeriesStore
// ---------------------------------------------------------------------------

/// The bounded time-series buffer for one run. Allocated once at setup
/// (body count fixed), appended to per eligible event, cleared on export.
pub struct SeriesStore {
    series: Vec<BodySeries>,
    time: Vec<Epoch>,
    capacity: usize,
    /// True before the first append and immediately after a clear.
    cleared: bool,
    /// Latched when the overflow policy has engaged at least once.
    truncated: bool,
    policy: Box<dyn OverflowPolicy + Send>,
}

impl SeriesStore {
    pub fn new(body_count: usize, capacity: usize) -> Self {
        Self::with_policy(body_count, capacity, Box::new(DecimateByTwo))
    }

    pub fn with_policy(
        body_count: usize,
        capacity: usize,
        policy: Box<dyn OverflowPolicy + Send>,
    ) -> Self {
        Self {
            series: (0..body_count).map(|_| BodySeries::default()).collect(),
            time: Vec::new(),
            capacity: capacity.max(1),
            cleared: true,
            truncated: false,
            policy,
        }
    }

    /// Append one timestep. `per_body` must cover every roster index in
    /// order; `None` entries are absent this step and their arrays are left
    /// untouched. The shared time value is pushed exactly once per call.
    pub fn append(&mut self, epoch: Epoch, per_body: &[Option<Sample>]) {
        assert_eq!(
            per_body.len(),
            self.series.len(),
            "per-body sample count must match the roster established at setup"
        );

        while self.time.len() >= self.capacity {
            self.reduce();
        }

        let tick = self.time.len() as u32;
        for (series, sample) in self.series.iter_mut().zip(per_body) {
            if let Some(sample) = sample {
                series.push(sample, tick);
            }
        }
        self.time.push(epoch);
        self.cleared = false;
    }

    /// Apply the overflow policy once, falling back to dropping the oldest
    /// point if the policy retained everything.
    fn reduce(&mut self) {
        let len = self.time.len();
        let mut keep = self.policy.retain_mask(len);
        keep.resize(len, true);
        if keep.iter().all(|k| *k) {
            keep[0] = false;
        }

        // Compacted index for each surviving tick.
        let mut remap: Vec<Option<u32>> = Vec::with_capacity(len);
        let mut next = 0u32;
        for k in &keep {
            if *k {
                remap.push(Some(next));
                next += 1;
            } else {
                remap.push(None);
            }
        }

        let mut idx = 0;
        self.time.retain(|_| {
            let k = keep[idx];
            idx += 1;
            k
        });
        for series in &mut self.series {
            series.apply_remap(&remap);
        }
        self.truncated = true;
    }

    /// Length of the shared time axis.
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    pub fn body_count(&self) -> usize {
        self.series.len()
    }

    /// Number of retained samples for one body.
    pub fn body_len(&self, index: usize) -> usize {
        self.series[index].len()
    }

    pub fn time(&self) -> &[Epoch] {
        &self.time
    }

    /// Position+velocity 6-tuples for one body, in sample order.
    pub fn eph(&self, index: usize) -> Vec<[f64; 6]> {
        let s = &self.series[index];
        (0..s.len())
            .map(|j| {
                [
                    s.pos_x[j], s.pos_y[j], s.pos_z[j], s.vel_x[j], s.vel_y[j], s.vel_z[j],
                ]
            })
            .collect()
    }

    /// Quaternion 4-tuples for one body, in sample order.
    pub fn att(&self, index: usize) -> Vec<[f64; 4]> {
        let s = &self.series[index];
        (0..s.len())
            .map(|j| [s.q1[j], s.q2[j], s.q3[j], s.q4[j]])
            .collect()
    }

    /// Time-axis indices covered by one body (diverges from 0..len only
    /// when the body had absent steps).
    pub fn body_ticks(&self, index: usize) -> &[u32] {
        &self.series[index].ticks
    }

    pub fn cleared(&self) -> bool {
        self.cleared
    }

    pub fn truncated(&self) -> bool {
        self.truncated
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Empty all arrays and re-arm the cleared flag. The allocation is kept
    /// for reuse by the next run.
    pub fn clear(&mut self) {
        for series in &mut self.series {
            series.clear();
        }
        self.time.clear();
        self.cleared = true;
        self.truncated = false;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
