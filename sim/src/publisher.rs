//! Publish-event generation from simulated movers.
//!
//! Events carry the label layout the extractor expects: `All.epoch` first,
//! then `{name}.X .Y .Z .Vx .Vy .Vz` per mover. Absence injection drops a
//! mover's six fields from an event with a configured probability, so the
//! absent-data path gets exercised deterministically under a fixed seed.

use crate::mover::SimBody;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use viz_core::types::{Epoch, PublishEvent};

/// Generates one flat sample vector per timestep for a set of movers.
pub struct EventPublisher {
    movers: Vec<SimBody>,
    rng: ChaCha8Rng,
    /// Probability that a mover's fields are dropped from one event.
    p_absent: f64,
}

impl EventPublisher {
    pub fn new(movers: Vec<SimBody>, seed: u64, p_absent: f64) -> Self {
        Self {
            movers,
            rng: ChaCha8Rng::seed_from_u64(seed),
            p_absent,
        }
    }

    pub fn mover_count(&self) -> usize {
        self.movers.len()
    }

    /// Build the publish event for `epoch`.
    pub fn publish_at(&mut self, epoch: Epoch) -> PublishEvent {
        let mut labels = vec!["All.epoch".to_string()];
        let mut values = vec![epoch];

        for mover in &self.movers {
            if self.rng.gen::<f64>() < self.p_absent {
                continue;
            }
            let state = mover.state(epoch);
            for suffix in ["X", "Y", "Z", "Vx", "Vy", "Vz"] {
                labels.push(format!("{}.{}", mover.name, suffix));
            }
            values.extend([state[0], state[1], state[2], state[3], state[4], state[5]]);
        }

        PublishEvent::new(labels, values)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use viz_core::types::RgbColor;

    fn movers() -> Vec<SimBody> {
        vec![
            SimBody::spacecraft("Sat1", 6778.0, 5554.0, 0.0, 0.0, 11000.0, RgbColor::WHITE),
            SimBody::spacecraft("Sat2", 7178.0, 6052.0, 1.0, 0.4, 850.0, RgbColor::WHITE),
        ]
    }

    #[test]
    fn event_layout_matches_extractor_expectations() {
        let mut publisher = EventPublisher::new(movers(), 42, 0.0);
        let event = publisher.publish_at(120.0);

        assert_eq!(event.labels[0], "All.epoch");
        assert_eq!(event.epoch(), Some(120.0));
        assert_eq!(event.len(), 1 + 2 * 6);
        assert_eq!(event.field_index("Sat1.X"), Some(1));
        assert_eq!(event.field_index("Sat2.Vz"), Some(12));

        // Values line up with the body's closed-form state.
        let s1 = movers()[0].state(120.0);
        assert_eq!(event.field("Sat1.X"), Some(s1[0]));
        assert_eq!(event.field("Sat1.Vz"), Some(s1[5]));
    }

    #[test]
    fn absence_injection_drops_whole_field_groups() {
        // p_absent = 1 drops every mover from every event.
        let mut publisher = EventPublisher::new(movers(), 7, 1.0);
        let event = publisher.publish_at(0.0);
        assert_eq!(event.len(), 1, "only the epoch remains");
        assert_eq!(event.field_index("Sat1.X"), None);
    }

    #[test]
    fn same_seed_reproduces_the_same_stream() {
        let mut a = EventPublisher::new(movers(), 1234, 0.5);
        let mut b = EventPublisher::new(movers(), 1234, 0.5);
        for i in 0..20 {
            let ea = a.publish_at(i as f64);
            let eb = b.publish_at(i as f64);
            assert_eq!(ea.labels, eb.labels, "event {i}");
            assert_eq!(ea.values, eb.values, "event {i}");
        }
    }
}
