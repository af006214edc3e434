use thiserror::Error;

/// Failures that stop a planning invocation before a roadmap can be searched. Not finding a path
/// is a normal outcome and is reported through `SearchResult::path` instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlanError {
    #[error("the obstacle snapshot is empty")]
    EmptyObstacleSet,

    #[error("the sample set is empty")]
    EmptySampleSet,

    #[error("free space sampling gave up after {attempts} attempts with {accepted} of {requested} samples accepted")]
    SamplingExhausted {
        requested: usize,
        accepted: usize,
        attempts: usize,
    },

    #[error("the start point is within the clearance radius of an obstacle")]
    StartInCollision,

    #[error("the goal point is within the clearance radius of an obstacle")]
    GoalInCollision,

    #[error("clearance must be positive and finite, got {0}")]
    InvalidClearance(f32),
}

pub type Result<T> = std::result::Result<T, PlanError>;
