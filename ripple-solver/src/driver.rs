use std::slice::ChunksExact;

use nalgebra::Vector2;

use crate::{
    error::StateError,
    initial::InitialCondition,
    lattice::Lattice,
    medium::Medium,
    solver::{
        StepReport,
        WaveSolver,
    },
    source::SourceTerm,
};

/// One time level of the wave field, handed to sinks after each advancing
/// step.
#[derive(Clone, Copy, Debug)]
pub struct Snapshot<'a> {
    pub level: usize,
    pub time: f32,
    /// `(nx, ny)`
    pub dimensions: Vector2<usize>,
    /// dense row-major values, `i` outer, `j` inner
    pub values: &'a [f32],
}

impl<'a> Snapshot<'a> {
    fn from_lattice(lattice: &'a Lattice<f32>, level: usize, time: f32) -> Self {
        Self {
            level,
            time,
            dimensions: lattice.dimensions(),
            values: lattice.as_slice(),
        }
    }

    /// Rows of constant `i`, each `ny` long.
    pub fn rows(&self) -> ChunksExact<'a, f32> {
        self.values.chunks_exact(self.dimensions.y)
    }
}

/// Passive consumer of per-step snapshots.
pub trait SnapshotSink {
    fn record(&mut self, snapshot: &Snapshot<'_>) -> std::io::Result<()>;
}

#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    #[error(transparent)]
    State(#[from] StateError),

    /// A sink failed. The solver state is still a consistent snapshot of the
    /// last completed step.
    #[error("snapshot sink failed")]
    Sink(#[from] std::io::Error),
}

/// Totals of a finished [`SimulationDriver::run`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub steps: usize,
    pub snapshots: usize,
    pub unstable_steps: usize,
}

/// Sequences seeding, the bootstrap step and the advancing steps, exposing
/// the freshly rotated current layer to the registered sinks.
#[derive(derive_more::Debug)]
pub struct SimulationDriver<M, S, N> {
    solver: WaveSolver<M, S, N>,

    #[debug(ignore)]
    sinks: Vec<Box<dyn SnapshotSink>>,

    /// emit every n-th level to the sinks
    stride: usize,
}

impl<M, S, N> SimulationDriver<M, S, N>
where
    M: Medium,
    S: SourceTerm,
    N: InitialCondition,
{
    pub fn new(solver: WaveSolver<M, S, N>) -> Self {
        Self {
            solver,
            sinks: Vec::new(),
            stride: 1,
        }
    }

    /// Emit only every `stride`-th time level. Zero is treated as 1.
    pub fn with_stride(mut self, stride: usize) -> Self {
        self.stride = stride.max(1);
        self
    }

    pub fn add_sink(&mut self, sink: impl SnapshotSink + 'static) {
        self.sinks.push(Box::new(sink));
    }

    pub fn solver(&self) -> &WaveSolver<M, S, N> {
        &self.solver
    }

    /// Advances one time level and feeds the sinks, bootstrapping first if
    /// necessary. Returns `None` once the simulation is complete.
    pub fn step_once(&mut self) -> Result<Option<StepReport>, DriverError> {
        if self.solver.level() == 0 {
            self.solver.first_step()?;
        }
        if self.solver.is_complete() {
            return Ok(None);
        }

        let report = self.solver.step()?;

        if report.level % self.stride == 0 {
            let snapshot =
                Snapshot::from_lattice(self.solver.current(), report.level, report.time);
            for sink in &mut self.sinks {
                sink.record(&snapshot)?;
            }
        }

        Ok(Some(report))
    }

    /// Runs the remaining steps to completion.
    pub fn run(&mut self) -> Result<RunSummary, DriverError> {
        let mut summary = RunSummary::default();

        while let Some(report) = self.step_once()? {
            summary.steps += 1;
            if report.level % self.stride == 0 {
                summary.snapshots += 1;
            }
            if report.unstable {
                summary.unstable_steps += 1;
            }
        }

        tracing::info!(
            steps = summary.steps,
            snapshots = summary.snapshots,
            unstable_steps = summary.unstable_steps,
            "simulation finished"
        );

        Ok(summary)
    }
}
