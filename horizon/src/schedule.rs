//! Adaptive scan step schedule.
//!
//! Steps are one cell wide near the node and widen with distance,
//! trading sample density far away for search extent.

use crate::C;
use std::iter::FusedIterator;

/// `(last step index of the tier, increment in cells)`, by ascending
/// step index.
const TIERS: [(usize, C); 6] = [
    (10, 1.0),
    (20, 3.0),
    (40, 6.0),
    (50, 12.0),
    (60, 25.0),
    (usize::MAX, 50.0),
];

/// Returns the distance added by the step taken after `step` steps,
/// in cells.
pub fn increment_cells(step: usize) -> C {
    TIERS[TIERS.partition_point(|&(last, _)| last < step)].1
}

/// Cumulative scan distances, in the raster's native unit, which do
/// not exceed `max_distance`.
#[derive(Debug, Clone)]
pub struct StepSchedule {
    cell_size: C,
    max_distance: C,
    step: usize,
    distance: C,
}

impl StepSchedule {
    pub fn new(cell_size: C, max_distance: C) -> Self {
        Self {
            cell_size,
            max_distance,
            step: 0,
            distance: 0.0,
        }
    }
}

impl Iterator for StepSchedule {
    type Item = C;

    fn next(&mut self) -> Option<C> {
        let distance = self.distance + increment_cells(self.step) * self.cell_size;
        // Also ends degenerate (zero, negative or NaN) cell sizes.
        if distance > self.max_distance || !(distance > self.distance) {
            return None;
        }
        self.step += 1;
        self.distance = distance;
        Some(distance)
    }
}

impl FusedIterator for StepSchedule {}

#[cfg(test)]
mod tests {
    use super::{increment_cells, StepSchedule};

    #[test]
    fn test_increment_tiers() {
        let expected = [
            (0, 1.0),
            (10, 1.0),
            (11, 3.0),
            (20, 3.0),
            (21, 6.0),
            (40, 6.0),
            (41, 12.0),
            (50, 12.0),
            (51, 25.0),
            (60, 25.0),
            (61, 50.0),
            (10_000, 50.0),
        ];
        for (step, cells) in expected {
            assert_eq!(increment_cells(step), cells, "step {step}");
        }
    }

    #[test]
    fn test_schedule_distances() {
        let distances: Vec<f64> = StepSchedule::new(10.0, 100_000.0).collect();
        assert_eq!(&distances[..3], &[10.0, 20.0, 30.0]);
        // Distance after step n is at index n - 1.
        assert_eq!(distances[10], 110.0);
        assert_eq!(distances[11], 140.0);
        assert_eq!(distances[20], 410.0);
        assert_eq!(distances[21], 470.0);
        assert_eq!(distances[40], 1610.0);
        assert_eq!(distances[50], 2810.0);
        assert_eq!(distances[60], 5310.0);
        assert_eq!(distances[61], 5810.0);
        assert!(distances.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(*distances.last().unwrap(), 99_810.0);
    }

    #[test]
    fn test_schedule_is_deterministic() {
        let a: Vec<f64> = StepSchedule::new(3.5, 2_500.0).collect();
        let b: Vec<f64> = StepSchedule::new(3.5, 2_500.0).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_max_distance_is_inclusive() {
        let distances: Vec<f64> = StepSchedule::new(10.0, 30.0).collect();
        assert_eq!(distances, [10.0, 20.0, 30.0]);
        assert_eq!(StepSchedule::new(10.0, 9.9).count(), 0);
    }

    #[test]
    fn test_degenerate_cell_size() {
        assert_eq!(StepSchedule::new(0.0, 1_000.0).count(), 0);
        assert_eq!(StepSchedule::new(-1.0, 1_000.0).count(), 0);
        assert_eq!(StepSchedule::new(f64::NAN, 1_000.0).count(), 0);
    }
}
