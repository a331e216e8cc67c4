//! Per-car elevator state machine

use serde::Serialize;

use crate::types::{Direction, Request, TIME_PER_FLOOR};

/// A single elevator car
///
/// The car is `Idle` exactly when it rests at its target floor once an
/// [`Elevator::update`] has completed. Onboard requests are grouped by
/// destination floor and kept as plain lists so equal requests never merge.
#[derive(Debug, Clone, Serialize)]
pub struct Elevator {
    floor: usize,
    target_floor: usize,
    time_to_next_floor: u32,
    direction: Direction,
    prev_direction: Option<Direction>,
    onboard: Vec<Vec<Request>>,
    num_floors: usize,
}

impl Elevator {
    /// Idle car resting on the ground floor
    pub fn new(num_floors: usize) -> Self {
        assert!(num_floors > 0, "an elevator needs at least one floor");
        Self {
            floor: 0,
            target_floor: 0,
            time_to_next_floor: 0,
            direction: Direction::Idle,
            prev_direction: None,
            onboard: vec![Vec::new(); num_floors],
            num_floors,
        }
    }

    pub fn floor(&self) -> usize {
        self.floor
    }

    pub fn target_floor(&self) -> usize {
        self.target_floor
    }

    pub fn time_to_next_floor(&self) -> u32 {
        self.time_to_next_floor
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Last non-idle direction, `None` if the car never moved
    pub fn prev_direction(&self) -> Option<Direction> {
        self.prev_direction
    }

    pub fn num_floors(&self) -> usize {
        self.num_floors
    }

    pub fn is_idle(&self) -> bool {
        self.direction == Direction::Idle
    }

    /// Assign a new target floor, clamped to the building
    ///
    /// Returns the floor actually assigned.
    pub fn set_target(&mut self, floor: usize) -> usize {
        self.target_floor = floor.min(self.num_floors - 1);
        self.target_floor
    }

    /// Put the car in an arbitrary mid-episode state
    ///
    /// Used by scripted scenarios; the target floor is left untouched and
    /// will normally be reassigned on the next step.
    pub fn reposition(&mut self, floor: usize, direction: Direction, time_to_next_floor: u32) {
        assert!(floor < self.num_floors, "floor {floor} outside building");
        self.floor = floor;
        self.direction = direction;
        self.time_to_next_floor = time_to_next_floor.min(TIME_PER_FLOOR);
        if direction.is_moving() {
            self.prev_direction = Some(direction);
        }
    }

    /// Advance the state machine by one tick
    pub fn update(&mut self) {
        if self.is_idle() {
            if self.floor != self.target_floor {
                self.direction = Direction::toward(self.floor, self.target_floor);
                self.time_to_next_floor = TIME_PER_FLOOR;
            }
        } else if self.floor == self.target_floor {
            // retargeted to the floor the car has not yet left
            self.stop();
        } else {
            self.direction = Direction::toward(self.floor, self.target_floor);
            self.time_to_next_floor = self.time_to_next_floor.saturating_sub(1);
            if self.time_to_next_floor == 0 {
                self.floor = match self.direction {
                    Direction::MovingUp => (self.floor + 1).min(self.num_floors - 1),
                    Direction::MovingDown => self.floor.saturating_sub(1),
                    Direction::Idle => self.floor,
                };
                if self.floor == self.target_floor {
                    self.stop();
                } else {
                    self.time_to_next_floor = TIME_PER_FLOOR;
                }
            }
        }

        assert!(
            self.floor < self.num_floors,
            "elevator left the building: floor {} of {}",
            self.floor,
            self.num_floors
        );
        debug_assert_eq!(self.is_idle(), self.floor == self.target_floor);
    }

    fn stop(&mut self) {
        if self.direction.is_moving() {
            self.prev_direction = Some(self.direction);
        }
        self.direction = Direction::Idle;
        self.time_to_next_floor = 0;
    }

    /// Take a passenger on board, keyed by its destination
    pub fn board(&mut self, request: Request) {
        let destination = request.target_floor();
        assert!(
            destination < self.num_floors,
            "destination {destination} outside building"
        );
        self.onboard[destination].push(request);
    }

    /// Let off every passenger bound for the current floor
    ///
    /// Returns the number of requests completed.
    pub fn release(&mut self) -> usize {
        let released = self.onboard[self.floor].len();
        self.onboard[self.floor].clear();
        released
    }

    /// Number of passengers bound for `floor`
    pub fn onboard_at(&self, floor: usize) -> usize {
        self.onboard.get(floor).map_or(0, Vec::len)
    }

    /// Total number of passengers in the car
    pub fn onboard_count(&self) -> usize {
        self.onboard.iter().map(Vec::len).sum()
    }
}

impl std::fmt::Display for Elevator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Elevator[floor={}, target={}, direction={}, next_floor_in={}, onboard={}]",
            self.floor,
            self.target_floor,
            self.direction,
            self.time_to_next_floor,
            self.onboard_count()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_elevator_is_idle_at_ground() {
        let elevator = Elevator::new(4);
        assert_eq!(elevator.floor(), 0);
        assert_eq!(elevator.target_floor(), 0);
        assert!(elevator.is_idle());
        assert!(elevator.prev_direction().is_none());
        assert_eq!(elevator.onboard_count(), 0);
    }

    #[test]
    fn test_departure_sets_direction_and_countdown() {
        let mut elevator = Elevator::new(4);
        elevator.set_target(2);
        elevator.update();

        assert_eq!(elevator.direction(), Direction::MovingUp);
        assert_eq!(elevator.time_to_next_floor(), TIME_PER_FLOOR);
        assert_eq!(elevator.floor(), 0);
    }

    #[test]
    fn test_one_floor_per_time_per_floor_ticks() {
        let mut elevator = Elevator::new(4);
        elevator.set_target(3);
        elevator.update();

        for _ in 0..TIME_PER_FLOOR - 1 {
            elevator.update();
            assert_eq!(elevator.floor(), 0);
        }
        elevator.update();
        assert_eq!(elevator.floor(), 1);
        assert_eq!(elevator.time_to_next_floor(), TIME_PER_FLOOR);
        assert_eq!(elevator.direction(), Direction::MovingUp);
    }

    #[test]
    fn test_arrival_goes_idle_and_records_direction() {
        let mut elevator = Elevator::new(3);
        elevator.reposition(2, Direction::Idle, 0);
        elevator.set_target(1);
        elevator.update();
        for _ in 0..TIME_PER_FLOOR {
            elevator.update();
        }

        assert_eq!(elevator.floor(), 1);
        assert!(elevator.is_idle());
        assert_eq!(elevator.prev_direction(), Some(Direction::MovingDown));
    }

    #[test]
    fn test_target_clamped_to_building() {
        let mut elevator = Elevator::new(3);
        assert_eq!(elevator.set_target(9), 2);
        assert_eq!(elevator.target_floor(), 2);
    }

    #[test]
    fn test_retarget_to_current_floor_cancels_motion() {
        let mut elevator = Elevator::new(5);
        elevator.set_target(4);
        elevator.update();
        elevator.update();
        assert_eq!(elevator.direction(), Direction::MovingUp);

        elevator.set_target(0);
        elevator.update();
        assert!(elevator.is_idle());
        assert_eq!(elevator.floor(), 0);
        assert_eq!(elevator.prev_direction(), Some(Direction::MovingUp));
    }

    #[test]
    fn test_retarget_behind_reverses_direction() {
        let mut elevator = Elevator::new(5);
        elevator.reposition(2, Direction::MovingUp, TIME_PER_FLOOR);
        elevator.set_target(0);
        elevator.update();

        assert_eq!(elevator.direction(), Direction::MovingDown);
        assert_eq!(elevator.floor(), 2);
        assert_eq!(elevator.time_to_next_floor(), TIME_PER_FLOOR - 1);
    }

    #[test]
    fn test_equal_requests_are_kept_apart() {
        let mut elevator = Elevator::new(3);
        elevator.board(Request::new(4, 2));
        elevator.board(Request::new(4, 2));
        assert_eq!(elevator.onboard_at(2), 2);
        assert_eq!(elevator.onboard_count(), 2);
    }

    #[test]
    fn test_release_only_current_floor() {
        let mut elevator = Elevator::new(3);
        elevator.board(Request::new(0, 0));
        elevator.board(Request::new(0, 2));

        assert_eq!(elevator.release(), 1);
        assert_eq!(elevator.onboard_at(0), 0);
        assert_eq!(elevator.onboard_at(2), 1);
        assert_eq!(elevator.release(), 0);
    }

    #[test]
    #[should_panic(expected = "destination 3 outside building")]
    fn test_board_rejects_destination_outside_building() {
        let mut elevator = Elevator::new(3);
        elevator.board(Request::new(0, 3));
    }

    #[test]
    fn test_display() {
        let elevator = Elevator::new(3);
        let text = elevator.to_string();
        assert!(text.contains("floor=0"));
        assert!(text.contains("direction=idle"));
    }
}
