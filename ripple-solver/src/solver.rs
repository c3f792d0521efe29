use nalgebra::Vector2;

use crate::{
    error::{
        ConfigurationError,
        StateError,
    },
    grid::GridSpec,
    initial::InitialCondition,
    lattice::Lattice,
    medium::Medium,
    source::SourceTerm,
};

/// Amplitudes above this indicate a violated Courant condition.
pub const DEFAULT_INSTABILITY_THRESHOLD: f32 = 1.0e6;

/// Index of one of the three time layers.
///
/// The layer holding time level `n` is `n mod 3`. Advancing a step never
/// copies elements; it only moves the role names (past/current/future) one
/// layer further. A consequence carried over from the reference formulation:
/// the buffer a step writes into still holds the values of time level
/// `n − 3`, so cells the step leaves untouched carry those old values
/// forward.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayerIndex {
    index: usize,
}

impl LayerIndex {
    pub fn from_level(level: usize) -> Self {
        Self { index: level % 3 }
    }

    pub fn previous(&self) -> Self {
        Self {
            index: (self.index + 2) % 3,
        }
    }

    pub fn next(&self) -> Self {
        Self {
            index: (self.index + 1) % 3,
        }
    }
}

/// What a single advancing step produced.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepReport {
    /// time level that was computed
    pub level: usize,
    /// physical time of that level
    pub time: f32,
    /// largest magnitude in the new layer, boundaries included
    pub max_amplitude: f32,
    /// whether [`WaveSolver::instability_threshold`] was exceeded
    pub unstable: bool,
}

/// Explicit leapfrog solver for the 2D scalar wave equation.
///
/// Owns the three time layers exclusively. Constructing the solver validates
/// the grid and seeds the past layer ("Seeded"); [`WaveSolver::first_step`]
/// bootstraps the current layer with the Taylor half-step; every
/// [`WaveSolver::step`] after that advances one time level until
/// [`GridSpec::num_levels`] is reached.
#[derive(derive_more::Debug)]
pub struct WaveSolver<M, S, N> {
    grid: GridSpec,
    #[debug(ignore)]
    medium: M,
    #[debug(ignore)]
    source: S,
    #[debug(ignore)]
    initial: N,

    layers: [Lattice<f32>; 3],
    /// highest computed time level; also selects the current layer
    level: usize,
    started: bool,
    instability_threshold: f32,
}

impl<M, S, N> WaveSolver<M, S, N>
where
    M: Medium,
    S: SourceTerm,
    N: InitialCondition,
{
    /// Validates the grid, allocates the three layers and seeds the past
    /// layer with the initial displacement, evaluated at pulse-centered
    /// offsets.
    pub fn new(
        grid: GridSpec,
        medium: M,
        source: S,
        initial: N,
    ) -> Result<Self, ConfigurationError> {
        grid.validate()?;

        let dimensions = grid.dimensions();
        let pulse = grid.pulse_center();
        let seeded = Lattice::from_fn(dimensions, |point| {
            initial.displacement(grid.x(point.x) - pulse.x, grid.y(point.y) - pulse.y)
        });

        tracing::debug!(
            nx = dimensions.x,
            ny = dimensions.y,
            nt = grid.num_levels(),
            "seeded wave field"
        );

        Ok(Self {
            grid,
            medium,
            source,
            initial,
            layers: [
                seeded,
                Lattice::from_element(dimensions, 0.0),
                Lattice::from_element(dimensions, 0.0),
            ],
            level: 0,
            started: false,
            instability_threshold: DEFAULT_INSTABILITY_THRESHOLD,
        })
    }

    /// Taylor half-step bootstrapping time level 1 from the seeded layer.
    ///
    /// Only interior cells are written; the boundary of the new layer keeps
    /// its zero initialization. The simulation clock starts at zero here
    /// regardless of `t0`, which only sizes the level count.
    pub fn first_step(&mut self) -> Result<(), StateError> {
        if self.started {
            return Err(StateError::AlreadyStarted);
        }

        let grid = self.grid;
        let dimensions = grid.dimensions();
        let ratio = grid.ratio();
        let time = 0.0;

        let medium = &self.medium;
        let source = &self.source;
        let initial = &self.initial;
        let (_recycled, seeded, target) = split_layers(&mut self.layers, self.level);

        for i in 1..dimensions.x - 1 {
            let x = grid.x(i);
            for j in 1..dimensions.y - 1 {
                let y = grid.y(j);
                let cdx = ratio.x * medium.speed(x, y);
                let csx = cdx * cdx;
                let cdy = ratio.y * medium.speed(x, y);
                let csy = cdy * cdy;

                target[(i, j)] = (1.0 - csx - csy) * seeded[(i, j)]
                    + 0.5 * csx * (seeded[(i + 1, j)] + seeded[(i - 1, j)])
                    + 0.5 * csy * (seeded[(i, j + 1)] + seeded[(i, j - 1)])
                    + grid.dt * initial.velocity(x, y)
                    + 0.5 * grid.dt * grid.dt * source.inject(time, x, y);
            }
        }

        self.level = 1;
        self.started = true;
        Ok(())
    }

    /// Advances one time level: interior stencil pass, absorbing boundary
    /// passes, instability scan, then the role rotation.
    pub fn step(&mut self) -> Result<StepReport, StateError> {
        if !self.started {
            return Err(StateError::NotStarted);
        }
        if self.level >= self.grid.num_levels() {
            return Err(StateError::Complete { level: self.level });
        }

        let grid = self.grid;
        let dimensions = grid.dimensions();
        let (nx, ny) = (dimensions.x, dimensions.y);
        let ratio = grid.ratio();
        let time = self.level as f32 * grid.dt;

        let medium = &self.medium;
        let source = &self.source;
        let (past, current, future) = split_layers(&mut self.layers, self.level);

        let update_row = |i: usize, row: &mut [f32]| {
            if i == 0 || i == nx - 1 {
                return;
            }
            let x = grid.x(i);
            for j in 1..ny - 1 {
                let y = grid.y(j);
                let cdx = ratio.x * medium.speed(x, y);
                let csx = cdx * cdx;
                let cdy = ratio.y * medium.speed(x, y);
                let csy = cdy * cdy;

                row[j] = 2.0 * (1.0 - csx - csy) * current[(i, j)]
                    + csx * (current[(i + 1, j)] + current[(i - 1, j)])
                    + csy * (current[(i, j + 1)] + current[(i, j - 1)])
                    - past[(i, j)]
                    + grid.dt * grid.dt * source.inject(time, x, y);
            }
        };

        // the interior pass only writes `future` and only reads
        // `current`/`past`, so rows are independent
        #[cfg(feature = "rayon")]
        {
            use rayon::iter::{
                IndexedParallelIterator as _,
                ParallelIterator as _,
            };

            future
                .par_rows_mut()
                .enumerate()
                .for_each(|(i, row)| update_row(i, row));
        }
        #[cfg(not(feature = "rayon"))]
        {
            future
                .rows_mut()
                .enumerate()
                .for_each(|(i, row)| update_row(i, row));
        }

        // one-way absorbing boundaries, sequenced after the interior pass:
        // left/right columns first, then the top row. The one-way
        // coefficient is sampled at the last interior column, which is the
        // value the reference formulation leaves behind after its in-loop
        // overwrites. The top row deliberately reuses the x ratio, and the
        // bottom row and the corners get no treatment at all; see the
        // design notes before changing any of this.
        let x_sample = grid.x(nx - 2);
        for j in 1..ny - 1 {
            let y = grid.y(j);
            let cdx = ratio.x * medium.speed(x_sample, y);

            future[(0, j)] = current[(0, j)] + current[(1, j)] - past[(1, j)]
                + cdx * (current[(1, j)] - current[(0, j)] - past[(2, j)] + past[(1, j)]);

            future[(nx - 1, j)] = current[(nx - 1, j)] + current[(nx - 2, j)] - past[(nx - 2, j)]
                - cdx
                    * (current[(nx - 1, j)] - current[(nx - 2, j)] - past[(nx - 2, j)]
                        + past[(nx - 3, j)]);
        }
        for i in 1..nx - 1 {
            future[(i, ny - 1)] = current[(i, ny - 1)] + current[(i, ny - 2)] - past[(i, ny - 2)]
                - ratio.x
                    * (current[(i, ny - 1)] - current[(i, ny - 2)] - past[(i, ny - 2)]
                        + past[(i, ny - 3)]);
        }

        let mut max_amplitude = 0.0f32;
        for &value in future.as_slice() {
            let magnitude = value.abs();
            if magnitude > max_amplitude {
                max_amplitude = magnitude;
            }
        }
        let unstable = max_amplitude > self.instability_threshold;

        // rotation: role reassignment only, no elements move
        self.level += 1;

        if unstable {
            tracing::warn!(
                level = self.level,
                max_amplitude,
                threshold = self.instability_threshold,
                "amplitude exceeds the stability threshold, the Courant condition is likely violated"
            );
        }

        Ok(StepReport {
            level: self.level,
            time: self.level as f32 * grid.dt,
            max_amplitude,
            unstable,
        })
    }

    pub fn grid(&self) -> &GridSpec {
        &self.grid
    }

    pub fn dimensions(&self) -> Vector2<usize> {
        self.grid.dimensions()
    }

    /// Highest computed time level.
    pub fn level(&self) -> usize {
        self.level
    }

    pub fn time(&self) -> f32 {
        self.level as f32 * self.grid.dt
    }

    pub fn is_complete(&self) -> bool {
        self.started && self.level >= self.grid.num_levels()
    }

    pub fn current_index(&self) -> LayerIndex {
        LayerIndex::from_level(self.level)
    }

    pub fn layer(&self, index: LayerIndex) -> &Lattice<f32> {
        &self.layers[index.index]
    }

    /// The most recently computed layer.
    pub fn current(&self) -> &Lattice<f32> {
        self.layer(self.current_index())
    }

    /// The layer one level behind [`WaveSolver::current`].
    pub fn past(&self) -> &Lattice<f32> {
        self.layer(self.current_index().previous())
    }

    pub fn instability_threshold(&self) -> f32 {
        self.instability_threshold
    }

    pub fn set_instability_threshold(&mut self, threshold: f32) {
        self.instability_threshold = threshold;
    }
}

/// Splits the layer array into its current roles.
fn split_layers(
    layers: &mut [Lattice<f32>; 3],
    level: usize,
) -> (&Lattice<f32>, &Lattice<f32>, &mut Lattice<f32>) {
    let [l0, l1, l2] = layers;
    // (past, current, future): current is level % 3
    match level % 3 {
        0 => (l2, l0, l1),
        1 => (l0, l1, l2),
        _ => (l1, l2, l0),
    }
}
