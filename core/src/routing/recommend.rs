use crate::prelude::RoutingConfig;
use crate::routing::direction::Direction;

/// Outcome of routing one gate against the current counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateDecision {
    /// 1-based gate id people at this gate should head for.
    pub recommended_gate: u32,
    pub direction: Direction,
}

/// Ring distance between two gate indices.
pub fn circular_distance(a: usize, b: usize, num_gates: usize) -> usize {
    if num_gates == 0 {
        return 0;
    }
    let diff = a.abs_diff(b) % num_gates;
    diff.min(num_gates - diff)
}

/// Capacity rule behind the corridor signage: a gate below `max_capacity`
/// keeps its own gate; a crowded gate redirects to the gate minimizing
/// `count + distance * penalty_factor` over the ring.
pub fn recommend_gate(gate_index: usize, counts: &[u32], config: &RoutingConfig) -> GateDecision {
    let current = counts.get(gate_index).copied().unwrap_or(0);
    if current < config.max_capacity {
        return GateDecision {
            recommended_gate: gate_index as u32 + 1,
            direction: Direction::Straight,
        };
    }

    let mut best_score = u32::MAX;
    let mut best_index = gate_index;
    for (index, count) in counts.iter().enumerate().take(config.num_gates) {
        let distance = circular_distance(gate_index, index, config.num_gates) as u32;
        let score = count.saturating_add(distance * config.penalty_factor);
        if score < best_score {
            best_score = score;
            best_index = index;
        }
    }

    GateDecision {
        recommended_gate: best_index as u32 + 1,
        direction: Direction::circular_turn(gate_index, best_index, config.num_gates),
    }
}
