//! Recording sinks (spec.md §4.7).
//!
//! A narrow, synchronous trait so a [`crate::sim::Simulator`] never has to
//! know whether its output goes nowhere, into memory, or to disk. Mirrors
//! the teacher's persistence-backend trait: one method, `&mut self`, no
//! async, no buffering contract beyond "don't panic".

use crate::model::ZoneId;
use crate::units::{Celsius, Seconds};
use rustc_hash::FxHashMap;

/// Receives one frame of simulation output per recorded step.
pub trait Sink {
    fn record(&mut self, t_s: Seconds, temperature: &[f64], zone_temps: &FxHashMap<ZoneId, Celsius>);
}

/// Discards everything. Useful when only the final [`crate::bilan::BilanReport`]
/// matters.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl Sink for NullSink {
    fn record(&mut self, _t_s: Seconds, _temperature: &[f64], _zone_temps: &FxHashMap<ZoneId, Celsius>) {}
}

/// One recorded frame.
#[derive(Debug, Clone)]
pub struct Frame {
    pub t_s: Seconds,
    pub temperature: Vec<f64>,
    pub zone_temps: FxHashMap<ZoneId, Celsius>,
}

/// Keeps the last `capacity` frames in memory, oldest dropped first.
/// A reference implementor of [`Sink`] for tests and short runs; a disk
/// sink that serializes each `Frame` can be added the same way.
#[derive(Debug, Clone)]
pub struct VecSink {
    capacity: usize,
    frames: std::collections::VecDeque<Frame>,
}

impl VecSink {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            frames: std::collections::VecDeque::with_capacity(capacity.min(1024)),
        }
    }

    #[must_use]
    pub fn frames(&self) -> &std::collections::VecDeque<Frame> {
        &self.frames
    }

    #[must_use]
    pub fn last(&self) -> Option<&Frame> {
        self.frames.back()
    }
}

impl Sink for VecSink {
    fn record(&mut self, t_s: Seconds, temperature: &[f64], zone_temps: &FxHashMap<ZoneId, Celsius>) {
        if self.frames.len() == self.capacity {
            self.frames.pop_front();
        }
        self.frames.push_back(Frame {
            t_s,
            temperature: temperature.to_vec(),
            zone_temps: zone_temps.clone(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec_sink_drops_oldest_past_capacity() {
        let mut sink = VecSink::new(2);
        let zones = FxHashMap::default();
        sink.record(Seconds::new(0.0), &[1.0], &zones);
        sink.record(Seconds::new(1.0), &[2.0], &zones);
        sink.record(Seconds::new(2.0), &[3.0], &zones);
        assert_eq!(sink.frames().len(), 2);
        assert_eq!(sink.frames().front().unwrap().t_s.value(), 1.0);
    }

    #[test]
    fn null_sink_never_panics() {
        let mut sink = NullSink;
        let zones = FxHashMap::default();
        sink.record(Seconds::new(0.0), &[1.0, 2.0], &zones);
    }
}
