use serde::{Deserialize, Serialize};
use std::fmt;

/// Recommended turn shown on a marker badge.
///
/// This is the one canonical representation; the legacy signed form
/// (-1/0/1) only exists at the wire boundary via [`Direction::from_offset`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Left,
    Straight,
    Right,
}

impl Direction {
    /// Overlay icon rule: a gateway recommended to itself reads straight
    /// ahead, lower-numbered gates sit to the left of the concourse.
    pub fn between(assigned: u32, recommended: u32) -> Self {
        if assigned == recommended {
            Direction::Straight
        } else if recommended < assigned {
            Direction::Left
        } else {
            Direction::Right
        }
    }

    /// Shorter way around the gate ring; ties resolve to the right.
    pub fn circular_turn(current: usize, target: usize, num_gates: usize) -> Self {
        if num_gates == 0 {
            return Direction::Straight;
        }
        let current = current % num_gates;
        let target = target % num_gates;
        if current == target {
            return Direction::Straight;
        }
        let right_dist = (target + num_gates - current) % num_gates;
        let left_dist = (current + num_gates - target) % num_gates;
        if right_dist <= left_dist {
            Direction::Right
        } else {
            Direction::Left
        }
    }

    pub fn from_offset(offset: i8) -> Self {
        match offset {
            0 => Direction::Straight,
            o if o < 0 => Direction::Left,
            _ => Direction::Right,
        }
    }

    pub fn offset(self) -> i8 {
        match self {
            Direction::Left => -1,
            Direction::Straight => 0,
            Direction::Right => 1,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Direction::Left => "left",
            Direction::Straight => "straight",
            Direction::Right => "right",
        };
        write!(f, "{label}")
    }
}
