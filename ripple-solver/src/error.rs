/// Rejected grid/time parameters. Raised before any buffer is allocated, so a
/// failed construction never leaves a partially initialized solver behind.
#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("{axis} axis has {count} points, but the stencil needs at least 3")]
    GridTooSmall { axis: &'static str, count: usize },

    #[error("step size {name} must be positive, got {value}")]
    NonPositiveStep { name: &'static str, value: f32 },
}

/// Sequencing error. The solver state is not corrupted by these; the caller
/// may retry from a valid state or simply stop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
    #[error("first step already taken")]
    AlreadyStarted,

    #[error("cannot advance before the first step")]
    NotStarted,

    #[error("simulation complete at time level {level}")]
    Complete { level: usize },
}
