//! Scan-based dispatch heuristic
//!
//! Each car keeps travelling in its current direction while a stop remains
//! ahead of it, then turns around, like the SCAN disk-scheduling algorithm.
//! When a car is idle, direction memory breaks the tie by preferring the
//! direction it was last travelling in.

use std::collections::BTreeSet;

use rlevator_core::{Direction, Result};

use crate::observation::{ElevatorSlot, Observation, ObservationLayout};
use crate::policy::{Policy, Prediction};

/// Floors a car should visit, split by the sweep that serves them
#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct StopSets {
    down: BTreeSet<usize>,
    up: BTreeSet<usize>,
}

impl StopSets {
    /// Onboard destinations belong to the sweep that reaches them from the
    /// car's floor. Waiting passengers carry no call direction, so a waiting
    /// floor is a stop for both sweeps.
    fn collect(elevator: &ElevatorSlot, waiting: &[i64]) -> Self {
        let mut stops = Self::default();
        for (floor, &count) in elevator.onboard.iter().enumerate() {
            if count > 0 {
                if floor > elevator.floor {
                    stops.up.insert(floor);
                } else {
                    stops.down.insert(floor);
                }
            }
        }
        for (floor, &count) in waiting.iter().enumerate() {
            if count > 0 {
                stops.down.insert(floor);
                stops.up.insert(floor);
            }
        }
        stops
    }
}

/// Candidate stops relative to the car's current floor
#[derive(Debug, Clone, Copy)]
struct Candidates {
    down_below: Option<usize>,
    down_above: Option<usize>,
    up_below: Option<usize>,
    up_above: Option<usize>,
}

impl Candidates {
    fn new(stops: &StopSets, floor: usize) -> Self {
        Self {
            down_below: stops.down.range(..floor).next_back().copied(),
            down_above: stops.down.range(floor + 1..).next_back().copied(),
            up_below: stops.up.range(..floor).next().copied(),
            up_above: stops.up.range(floor + 1..).next().copied(),
        }
    }
}

/// Reference dispatch policy
pub struct DispatchHeuristic {
    layout: ObservationLayout,
    use_direction_memory: bool,
    prev_directions: Vec<Option<Direction>>,
}

impl DispatchHeuristic {
    /// Canonical policy with direction memory enabled
    pub fn new(layout: ObservationLayout) -> Self {
        Self {
            layout,
            use_direction_memory: true,
            prev_directions: vec![None; layout.num_elevators_max()],
        }
    }

    /// Toggle direction memory; without it idle cars scan below first
    pub fn with_direction_memory(mut self, enabled: bool) -> Self {
        self.use_direction_memory = enabled;
        self
    }

    /// Last non-idle direction seen for an elevator slot
    pub fn prev_direction(&self, slot: usize) -> Option<Direction> {
        self.prev_directions.get(slot).copied().flatten()
    }

    fn select(&self, elevator: &ElevatorSlot, waiting: &[i64], prev: Option<Direction>) -> usize {
        let stops = StopSets::collect(elevator, waiting);
        let c = Candidates::new(&stops, elevator.floor);

        let continued = match elevator.direction {
            Direction::MovingDown => c.down_below,
            Direction::MovingUp => c.up_above,
            Direction::Idle => None,
        };

        let chosen = continued.or_else(|| {
            if !self.use_direction_memory {
                return c.down_below.or(c.up_above);
            }
            match prev {
                Some(Direction::MovingDown) => c
                    .down_below
                    .or(c.up_below)
                    .or(c.up_above)
                    .or(c.down_above),
                _ => c
                    .up_above
                    .or(c.down_above)
                    .or(c.down_below)
                    .or(c.up_below),
            }
        });

        chosen.unwrap_or(elevator.floor)
    }
}

impl Policy for DispatchHeuristic {
    fn name(&self) -> &str {
        if self.use_direction_memory {
            "scan"
        } else {
            "scan_no_memory"
        }
    }

    fn predict(&mut self, observation: &Observation, _deterministic: bool) -> Result<Prediction> {
        let view = self.layout.decode(observation)?;
        let mut action = vec![0; self.layout.action_len()];

        for (slot, elevator) in view.elevators.iter().enumerate() {
            if elevator.direction.is_moving() {
                self.prev_directions[slot] = Some(elevator.direction);
            }
            let target = self.select(elevator, &view.waiting, self.prev_directions[slot]);
            debug_assert!(target < view.num_floors);
            action[slot] = target as i64;
        }

        Ok(Prediction::new(action))
    }

    fn on_episode_start(&mut self) {
        self.prev_directions.fill(None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rlevator_core::{Request, SimConfig, TIME_PER_FLOOR};

    use crate::building::Building;

    fn quiet(num_floors: usize) -> Building {
        let mut building =
            Building::new(SimConfig::fixed(1, num_floors).request_prob(0.0)).unwrap();
        building.reset(false);
        building
    }

    fn slot(floor: usize, direction: Direction, onboard: Vec<i64>) -> ElevatorSlot {
        ElevatorSlot {
            floor,
            target_floor: floor,
            time_to_next_floor: 0,
            direction,
            onboard,
        }
    }

    fn target(building: &Building, heuristic: &mut DispatchHeuristic) -> i64 {
        heuristic.predict(&building.observation(), true).unwrap().action[0]
    }

    #[test]
    fn test_stop_sets_split_onboard_by_side() {
        let elevator = slot(2, Direction::Idle, vec![1, 0, 0, 0, 3]);
        let stops = StopSets::collect(&elevator, &[0, 0, 0, 1, 0]);

        assert_eq!(stops.down, BTreeSet::from([0, 3]));
        assert_eq!(stops.up, BTreeSet::from([3, 4]));
    }

    #[test]
    fn test_idle_without_stops_stays() {
        let mut building = quiet(4);
        let mut heuristic = DispatchHeuristic::new(building.layout());
        assert_eq!(target(&building, &mut heuristic), 0);

        building.elevator_mut(0).unwrap().reposition(2, Direction::Idle, 0);
        assert_eq!(target(&building, &mut heuristic), 2);
    }

    #[test]
    fn test_moving_down_continues_below() {
        let mut building = quiet(5);
        building
            .elevator_mut(0)
            .unwrap()
            .reposition(3, Direction::MovingDown, TIME_PER_FLOOR);
        building.elevator_mut(0).unwrap().board(Request::new(0, 1));
        let mut heuristic = DispatchHeuristic::new(building.layout());

        assert_eq!(target(&building, &mut heuristic), 1);
    }

    #[test]
    fn test_moving_down_ignores_nearer_call_above() {
        let mut building = quiet(5);
        building
            .elevator_mut(0)
            .unwrap()
            .reposition(3, Direction::MovingDown, TIME_PER_FLOOR);
        building.elevator_mut(0).unwrap().board(Request::new(0, 1));
        building.enqueue_request(4, Request::new(0, 0)).unwrap();
        let mut heuristic = DispatchHeuristic::new(building.layout());

        assert_eq!(target(&building, &mut heuristic), 1);
    }

    #[test]
    fn test_moving_down_takes_next_stop_in_travel_order() {
        let mut building = quiet(6);
        building
            .elevator_mut(0)
            .unwrap()
            .reposition(5, Direction::MovingDown, TIME_PER_FLOOR);
        building.elevator_mut(0).unwrap().board(Request::new(0, 0));
        building.enqueue_request(2, Request::new(0, 4)).unwrap();
        let mut heuristic = DispatchHeuristic::new(building.layout());

        assert_eq!(target(&building, &mut heuristic), 2);
    }

    #[test]
    fn test_moving_up_takes_nearest_above() {
        let mut building = quiet(6);
        building
            .elevator_mut(0)
            .unwrap()
            .reposition(1, Direction::MovingUp, TIME_PER_FLOOR);
        building.elevator_mut(0).unwrap().board(Request::new(0, 5));
        building.elevator_mut(0).unwrap().board(Request::new(0, 3));
        building.enqueue_request(0, Request::new(0, 2)).unwrap();
        let mut heuristic = DispatchHeuristic::new(building.layout());

        assert_eq!(target(&building, &mut heuristic), 3);
    }

    #[test]
    fn test_direction_memory_prefers_previous_direction() {
        let layout = ObservationLayout::new(1, 5);
        let heuristic = DispatchHeuristic::new(layout);
        let waiting = [1, 0, 0, 0, 1];
        let elevator = slot(2, Direction::Idle, vec![0; 5]);

        assert_eq!(
            heuristic.select(&elevator, &waiting, Some(Direction::MovingDown)),
            0
        );
        assert_eq!(
            heuristic.select(&elevator, &waiting, Some(Direction::MovingUp)),
            4
        );
        // never moved: scan upward first
        assert_eq!(heuristic.select(&elevator, &waiting, None), 4);
    }

    #[test]
    fn test_fallback_order_after_moving_down() {
        let layout = ObservationLayout::new(1, 5);
        let heuristic = DispatchHeuristic::new(layout);
        let idle_at_2 = |onboard: Vec<i64>| slot(2, Direction::Idle, onboard);
        let down = Some(Direction::MovingDown);

        // only stops above: take the nearest one
        let elevator = idle_at_2(vec![0, 0, 0, 1, 1]);
        assert_eq!(heuristic.select(&elevator, &[0; 5], down), 3);

        // waiting floors above count for both sweeps; nearest wins
        assert_eq!(heuristic.select(&idle_at_2(vec![0; 5]), &[0, 0, 0, 0, 1], down), 4);
    }

    #[test]
    fn test_without_memory_scans_below_first() {
        let layout = ObservationLayout::new(1, 5);
        let heuristic = DispatchHeuristic::new(layout).with_direction_memory(false);
        let elevator = slot(2, Direction::Idle, vec![0; 5]);

        assert_eq!(
            heuristic.select(&elevator, &[1, 0, 0, 0, 1], Some(Direction::MovingUp)),
            0
        );
        assert_eq!(heuristic.select(&elevator, &[0, 0, 0, 1, 1], None), 3);
        assert_eq!(heuristic.name(), "scan_no_memory");
    }

    #[test]
    fn test_memory_learned_from_observations() {
        let mut building = quiet(4);
        let mut heuristic = DispatchHeuristic::new(building.layout());
        building
            .elevator_mut(0)
            .unwrap()
            .reposition(2, Direction::MovingUp, TIME_PER_FLOOR);

        heuristic.predict(&building.observation(), true).unwrap();
        assert_eq!(heuristic.prev_direction(0), Some(Direction::MovingUp));

        heuristic.on_episode_start();
        assert_eq!(heuristic.prev_direction(0), None);
    }

    #[test]
    fn test_padding_slots_get_zero() {
        let mut building = Building::new(
            SimConfig::with_curriculum((1, 3), (3, 6)).request_prob(0.0),
        )
        .unwrap();
        building.reset(false);
        let mut heuristic = DispatchHeuristic::new(building.layout());

        let prediction = heuristic.predict(&building.observation(), true).unwrap();
        assert_eq!(prediction.action, vec![0, 0, 0]);
    }
}
