//! Effects produced by state transitions

use crate::query::QueryRequest;
use std::time::Duration;

/// Effects to be executed after a state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Deliver `TransitionComplete` after the screen animation
    ScheduleTransition { delay: Duration, epoch: u64 },

    /// Deliver `CloseComplete` after the panel close animation
    ScheduleClose { delay: Duration, generation: u64 },

    /// Ask the answering service (spawns as background task)
    DispatchQuery {
        epoch: u64,
        request_id: String,
        request: QueryRequest,
    },
}
