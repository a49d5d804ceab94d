//! Streaming internal-rate-of-return solver.
//!
//! Each caller-chosen stream identifier owns a growing (time, value)
//! series. Submitting a sample first truncates any samples at or after
//! the new time, so the host can roll simulation time back and
//! re-evaluate. The rate estimate is narrowed by bisection on the net
//! present value priced at the earliest recorded time.

use crate::error::KernelResult;
use sdx_core::{CoreError, CoreResult, Real};
use std::collections::HashMap;

/// Starting capacity of a stream's sample arrays.
const INITIAL_CAPACITY: usize = 101;
/// Capacity growth step once a stream fills up.
const CAPACITY_GROWTH: usize = 100;
/// Number of net-present-value evaluations in the bisection search.
const MAX_HALVINGS: usize = 20;

/// One stream's recorded series. Samples are kept sorted by
/// non-decreasing time; truncation and growth are plain operations on
/// the record, independent of any allocator mechanics.
#[derive(Debug)]
pub struct IrrStream {
    times: Vec<Real>,
    values: Vec<Real>,
}

impl IrrStream {
    fn new() -> CoreResult<Self> {
        let mut times = Vec::new();
        let mut values = Vec::new();
        times
            .try_reserve_exact(INITIAL_CAPACITY)
            .and_then(|()| values.try_reserve_exact(INITIAL_CAPACITY))
            .map_err(|_| CoreError::AllocationFailure {
                what: "IRR stream samples",
            })?;
        Ok(Self { times, values })
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Forget every recorded sample, keeping capacity.
    pub fn reset(&mut self) {
        self.times.clear();
        self.values.clear();
    }

    /// Drop trailing samples recorded at or after `time`, so a
    /// re-submission at a previously seen time replaces that sample.
    pub fn truncate_at(&mut self, time: Real) {
        while let Some(&last) = self.times.last() {
            if last < time {
                break;
            }
            self.times.pop();
            self.values.pop();
        }
    }

    /// Append a sample, growing capacity in fixed steps when full.
    pub fn push(&mut self, time: Real, value: Real) -> CoreResult<()> {
        if self.times.len() == self.times.capacity() {
            self.times
                .try_reserve_exact(CAPACITY_GROWTH)
                .and_then(|()| self.values.try_reserve_exact(CAPACITY_GROWTH))
                .map_err(|_| CoreError::AllocationFailure {
                    what: "IRR stream growth",
                })?;
        }
        self.times.push(time);
        self.values.push(value);
        Ok(())
    }

    /// Net present value of the series at `rate`, discounted to the
    /// earliest recorded time.
    pub fn net_present_value(&self, rate: Real) -> Real {
        let t0 = self.times[0];
        self.values
            .iter()
            .zip(self.times.iter())
            .map(|(&v, &t)| v * (rate * (t0 - t)).exp())
            .sum()
    }

    /// Bisection-narrow a rate estimate inside `[min_rate, max_rate]`:
    /// start at the midpoint with a quarter-range step, move up on
    /// negative NPV, down on positive, stop on an exact zero.
    pub fn solve_rate(&self, min_rate: Real, max_rate: Real) -> Real {
        let mut rate = (min_rate + max_rate) / 2.0;
        let mut step = (max_rate - min_rate) / 4.0;
        for _ in 1..MAX_HALVINGS {
            let npv = self.net_present_value(rate);
            if npv < 0.0 {
                rate -= step;
            } else if npv > 0.0 {
                rate += step;
            } else {
                break;
            }
            step /= 2.0;
        }
        rate
    }
}

/// Per-identifier stream table. One logical owner per identifier; no
/// locking because the host serializes all calls.
#[derive(Debug, Default)]
pub struct IrrStreams {
    streams: HashMap<i64, IrrStream>,
}

impl IrrStreams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn find_or_create(&mut self, stream_id: i64) -> CoreResult<&mut IrrStream> {
        if !self.streams.contains_key(&stream_id) {
            self.streams.insert(stream_id, IrrStream::new()?);
        }
        Ok(self
            .streams
            .get_mut(&stream_id)
            .expect("inserted just above"))
    }

    /// Destroy every stream. Called at session teardown.
    pub fn clear(&mut self) {
        self.streams.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.streams.is_empty()
    }
}

/// Record one (time, value) sample under `stream_id` and, when
/// `compute_flag` exceeds 1.0, estimate the internal rate of return of
/// the recorded series inside `[min_rate, max_rate]`.
///
/// A negative `compute_flag` resets the stream before recording; a flag
/// of exactly zero records nothing and returns 0.0; record-only calls
/// (flag <= 1.0) return 0.0.
pub fn internal_ror(
    streams: &mut IrrStreams,
    value: Real,
    time: Real,
    min_rate: Real,
    max_rate: Real,
    stream_id: i64,
    compute_flag: Real,
) -> KernelResult<Real> {
    let stream = streams.find_or_create(stream_id)?;

    if compute_flag < 0.0 {
        stream.reset();
    }
    if compute_flag == 0.0 {
        return Ok(0.0);
    }

    stream.truncate_at(time);
    stream.push(time, value)?;

    if compute_flag > 1.0 {
        Ok(stream.solve_rate(min_rate, max_rate))
    } else {
        Ok(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECORD: Real = 1.0;
    const COMPUTE: Real = 2.0;

    fn recorded_times(streams: &mut IrrStreams, id: i64) -> Vec<Real> {
        streams.find_or_create(id).unwrap().times.clone()
    }

    #[test]
    fn resubmission_truncates_before_appending() {
        let mut streams = IrrStreams::new();
        for t in [0.0, 1.0, 2.0] {
            internal_ror(&mut streams, 1.0, t, 0.0, 1.0, 1, RECORD).unwrap();
        }
        for t in [1.0, 5.0] {
            internal_ror(&mut streams, 1.0, t, 0.0, 1.0, 1, RECORD).unwrap();
        }
        assert_eq!(recorded_times(&mut streams, 1), vec![0.0, 1.0, 5.0]);
    }

    #[test]
    fn zero_flag_records_nothing() {
        let mut streams = IrrStreams::new();
        internal_ror(&mut streams, 1.0, 0.0, 0.0, 1.0, 1, 0.0).unwrap();
        assert!(streams.find_or_create(1).unwrap().is_empty());
    }

    #[test]
    fn negative_flag_resets_then_records() {
        let mut streams = IrrStreams::new();
        for t in [0.0, 1.0, 2.0] {
            internal_ror(&mut streams, 1.0, t, 0.0, 1.0, 1, RECORD).unwrap();
        }
        internal_ror(&mut streams, 1.0, 9.0, 0.0, 1.0, 1, -1.0).unwrap();
        assert_eq!(recorded_times(&mut streams, 1), vec![9.0]);
    }

    #[test]
    fn streams_are_independent_per_identifier() {
        let mut streams = IrrStreams::new();
        internal_ror(&mut streams, -100.0, 0.0, 0.0, 1.0, 1, RECORD).unwrap();
        internal_ror(&mut streams, 110.0, 1.0, 0.0, 1.0, 1, RECORD).unwrap();

        // A very different series on stream 2 must not bend stream 1.
        internal_ror(&mut streams, -1.0, 0.0, 0.0, 1.0, 2, RECORD).unwrap();
        let r2 = internal_ror(&mut streams, 1000.0, 1.0, 0.0, 1.0, 2, COMPUTE).unwrap();

        let r1 = internal_ror(&mut streams, 0.0, 2.0, 0.0, 1.0, 1, COMPUTE).unwrap();
        assert!((r1 - 0.1_f64.ln_1p()).abs() < 1e-3);
        assert!(r2 > 0.9);
    }

    #[test]
    fn recovers_known_continuous_rate() {
        // -100 at t=0 and +100*e^0.25 at t=1 price to zero NPV at a
        // continuous rate of exactly 0.25.
        let mut streams = IrrStreams::new();
        internal_ror(&mut streams, -100.0, 0.0, 0.0, 1.0, 7, RECORD).unwrap();
        let rate = internal_ror(
            &mut streams,
            100.0 * 0.25_f64.exp(),
            1.0,
            0.0,
            1.0,
            7,
            COMPUTE,
        )
        .unwrap();
        assert!((rate - 0.25).abs() < 1e-3);
    }

    #[test]
    fn record_only_calls_return_zero() {
        let mut streams = IrrStreams::new();
        let r = internal_ror(&mut streams, -100.0, 0.0, 0.0, 1.0, 3, RECORD).unwrap();
        assert_eq!(r, 0.0);
    }

    #[test]
    fn clear_destroys_all_streams() {
        let mut streams = IrrStreams::new();
        internal_ror(&mut streams, 1.0, 0.0, 0.0, 1.0, 1, RECORD).unwrap();
        streams.clear();
        assert!(streams.is_empty());
    }
}
