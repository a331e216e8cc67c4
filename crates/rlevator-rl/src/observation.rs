//! Observation and action encoding
//!
//! Observations are flat integer vectors sized for the curriculum-end
//! building, so a policy with a fixed input width works at every stage:
//!
//! ```text
//! [num_elevators, num_floors,
//!  per elevator slot: floor, target_floor, time_to_next_floor, direction,
//!                     onboard count per floor (num_floors_max entries),
//!  waiting count per floor (num_floors_max entries)]
//! ```
//!
//! Inactive elevator slots are zero except for `direction = Idle`.

use serde::{Deserialize, Serialize};

use rlevator_core::{Direction, Elevator, Result, SimError, MAX_PEOPLE, TIME_PER_FLOOR};

/// Per-elevator target floors; only the first `num_elevators` are used
pub type Action = Vec<i64>;

const HEADER_LEN: usize = 2;
const SLOT_FIELDS: usize = 4;

/// Flat observation vector
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation(Vec<i64>);

impl Observation {
    pub fn as_slice(&self) -> &[i64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> Vec<i64> {
        self.0
    }
}

impl From<Vec<i64>> for Observation {
    fn from(values: Vec<i64>) -> Self {
        Self(values)
    }
}

/// Decoded state of one active elevator slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElevatorSlot {
    pub floor: usize,
    pub target_floor: usize,
    pub time_to_next_floor: u32,
    pub direction: Direction,
    /// Onboard count per destination, `num_floors` entries
    pub onboard: Vec<i64>,
}

/// Structured view of an observation at the current stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservationView {
    pub num_elevators: usize,
    pub num_floors: usize,
    pub elevators: Vec<ElevatorSlot>,
    /// Waiting count per origin floor, `num_floors` entries
    pub waiting: Vec<i64>,
}

/// Fixed vector layout for a `(num_elevators_max, num_floors_max)` building
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservationLayout {
    num_elevators_max: usize,
    num_floors_max: usize,
}

impl ObservationLayout {
    pub fn new(num_elevators_max: usize, num_floors_max: usize) -> Self {
        Self {
            num_elevators_max,
            num_floors_max,
        }
    }

    pub fn num_elevators_max(&self) -> usize {
        self.num_elevators_max
    }

    pub fn num_floors_max(&self) -> usize {
        self.num_floors_max
    }

    fn slot_len(&self) -> usize {
        SLOT_FIELDS + self.num_floors_max
    }

    /// Observation vector length
    pub fn len(&self) -> usize {
        HEADER_LEN + self.num_elevators_max * self.slot_len() + self.num_floors_max
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Action vector length
    pub fn action_len(&self) -> usize {
        self.num_elevators_max
    }

    /// Exclusive upper bound of every observation entry
    pub fn observation_space(&self) -> Vec<i64> {
        let floors = self.num_floors_max as i64;
        let mut space = Vec::with_capacity(self.len());
        space.push(self.num_elevators_max as i64 + 1);
        space.push(floors + 1);
        for _ in 0..self.num_elevators_max {
            space.push(floors);
            space.push(floors);
            space.push(i64::from(TIME_PER_FLOOR) + 1);
            space.push(Direction::COUNT);
            space.extend(std::iter::repeat(MAX_PEOPLE).take(self.num_floors_max));
        }
        space.extend(std::iter::repeat(MAX_PEOPLE).take(self.num_floors_max));
        space
    }

    /// Exclusive upper bound of every action entry
    pub fn action_space(&self) -> Vec<i64> {
        vec![self.num_floors_max as i64; self.num_elevators_max]
    }

    /// Whether every entry of `observation` lies inside the space
    pub fn contains(&self, observation: &Observation) -> bool {
        observation.len() == self.len()
            && observation
                .as_slice()
                .iter()
                .zip(self.observation_space())
                .all(|(&value, bound)| (0..bound).contains(&value))
    }

    /// Encode the current building state
    ///
    /// `waiting` holds the waiting count per floor of the current stage.
    pub fn encode(&self, num_floors: usize, elevators: &[Elevator], waiting: &[usize]) -> Observation {
        debug_assert!(elevators.len() <= self.num_elevators_max);
        debug_assert!(num_floors <= self.num_floors_max);

        let mut values = Vec::with_capacity(self.len());
        values.push(elevators.len() as i64);
        values.push(num_floors as i64);

        for elevator in elevators {
            values.push(elevator.floor() as i64);
            values.push(elevator.target_floor() as i64);
            values.push(i64::from(elevator.time_to_next_floor()));
            values.push(elevator.direction().as_obs());
            for floor in 0..self.num_floors_max {
                let count = if floor < num_floors {
                    elevator.onboard_at(floor)
                } else {
                    0
                };
                values.push(saturate(count));
            }
        }

        for _ in elevators.len()..self.num_elevators_max {
            values.extend([0, 0, 0, Direction::Idle.as_obs()]);
            values.extend(std::iter::repeat(0).take(self.num_floors_max));
        }

        for floor in 0..self.num_floors_max {
            let count = if floor < num_floors {
                waiting.get(floor).copied().unwrap_or(0)
            } else {
                0
            };
            values.push(saturate(count));
        }

        debug_assert_eq!(values.len(), self.len());
        Observation(values)
    }

    /// Decode an observation into its active elevators and floors
    pub fn decode(&self, observation: &Observation) -> Result<ObservationView> {
        let values = observation.as_slice();
        if values.len() != self.len() {
            return Err(SimError::Observation(format!(
                "expected {} entries, got {}",
                self.len(),
                values.len()
            )));
        }

        let num_elevators = to_index(values[0], self.num_elevators_max + 1, "num_elevators")?;
        let num_floors = to_index(values[1], self.num_floors_max + 1, "num_floors")?;

        let mut elevators = Vec::with_capacity(num_elevators);
        for slot in 0..num_elevators {
            let base = HEADER_LEN + slot * self.slot_len();
            let direction = Direction::from_obs(values[base + 3]).ok_or_else(|| {
                SimError::Observation(format!(
                    "invalid direction {} in elevator slot {slot}",
                    values[base + 3]
                ))
            })?;
            let onboard_start = base + SLOT_FIELDS;
            elevators.push(ElevatorSlot {
                floor: to_index(values[base], num_floors.max(1), "floor")?,
                target_floor: to_index(values[base + 1], num_floors.max(1), "target_floor")?,
                time_to_next_floor: to_index(
                    values[base + 2],
                    TIME_PER_FLOOR as usize + 1,
                    "time_to_next_floor",
                )? as u32,
                direction,
                onboard: values[onboard_start..onboard_start + num_floors].to_vec(),
            });
        }

        let waiting_start = HEADER_LEN + self.num_elevators_max * self.slot_len();
        Ok(ObservationView {
            num_elevators,
            num_floors,
            elevators,
            waiting: values[waiting_start..waiting_start + num_floors].to_vec(),
        })
    }
}

fn saturate(count: usize) -> i64 {
    (count as i64).min(MAX_PEOPLE - 1)
}

fn to_index(value: i64, bound: usize, field: &str) -> Result<usize> {
    usize::try_from(value)
        .ok()
        .filter(|&index| index < bound)
        .ok_or_else(|| SimError::Observation(format!("{field} {value} outside [0, {bound})")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rlevator_core::Request;

    #[test]
    fn test_layout_len_matches_space() {
        let layout = ObservationLayout::new(3, 10);
        assert_eq!(layout.len(), 2 + 3 * (4 + 10) + 10);
        assert_eq!(layout.observation_space().len(), layout.len());
        assert_eq!(layout.action_space(), vec![10, 10, 10]);
    }

    #[test]
    fn test_encode_pads_inactive_slots() {
        let layout = ObservationLayout::new(2, 5);
        let elevators = vec![Elevator::new(3)];
        let obs = layout.encode(3, &elevators, &[0, 0, 0]);

        assert_eq!(obs.len(), layout.len());
        assert_eq!(&obs.as_slice()[..2], &[1, 3]);
        // second slot starts after the header and one slot of 4 + 5 entries
        let padding = &obs.as_slice()[2 + 9..2 + 18];
        assert_eq!(padding, &[0, 0, 0, 1, 0, 0, 0, 0, 0]);
        assert!(layout.contains(&obs));
    }

    #[test]
    fn test_encode_counts_and_zero_padding() {
        let layout = ObservationLayout::new(1, 5);
        let mut elevator = Elevator::new(3);
        elevator.board(Request::new(0, 2));
        elevator.board(Request::new(1, 2));
        let obs = layout.encode(3, &[elevator], &[1, 0, 4]);

        let values = obs.as_slice();
        assert_eq!(&values[6..11], &[0, 0, 2, 0, 0]);
        assert_eq!(&values[11..16], &[1, 0, 4, 0, 0]);
    }

    #[test]
    fn test_counts_saturate_inside_space() {
        let layout = ObservationLayout::new(1, 2);
        let obs = layout.encode(2, &[Elevator::new(2)], &[500, 0]);
        assert_eq!(obs.as_slice()[layout.len() - 2], MAX_PEOPLE - 1);
        assert!(layout.contains(&obs));
    }

    #[test]
    fn test_decode_reads_active_stage_only() {
        let layout = ObservationLayout::new(2, 5);
        let mut elevator = Elevator::new(3);
        elevator.board(Request::new(0, 1));
        elevator.set_target(2);
        elevator.update();
        let obs = layout.encode(3, &[elevator], &[0, 0, 2]);

        let view = layout.decode(&obs).unwrap();
        assert_eq!(view.num_elevators, 1);
        assert_eq!(view.num_floors, 3);
        assert_eq!(view.elevators.len(), 1);
        let slot = &view.elevators[0];
        assert_eq!(slot.floor, 0);
        assert_eq!(slot.target_floor, 2);
        assert_eq!(slot.time_to_next_floor, TIME_PER_FLOOR);
        assert_eq!(slot.direction, Direction::MovingUp);
        assert_eq!(slot.onboard, vec![0, 1, 0]);
        assert_eq!(view.waiting, vec![0, 0, 2]);
    }

    #[test]
    fn test_decode_rejects_wrong_length() {
        let layout = ObservationLayout::new(1, 3);
        let obs = Observation::from(vec![1, 3, 0]);
        assert!(matches!(layout.decode(&obs), Err(SimError::Observation(_))));
    }

    #[test]
    fn test_decode_rejects_bad_direction() {
        let layout = ObservationLayout::new(1, 3);
        let mut values = layout.encode(3, &[Elevator::new(3)], &[0, 0, 0]).into_inner();
        values[5] = 7;
        assert!(layout.decode(&Observation::from(values)).is_err());
    }
}
