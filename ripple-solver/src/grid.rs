use nalgebra::{
    Point2,
    Vector2,
};
use serde::{
    Deserialize,
    Serialize,
};

use crate::error::ConfigurationError;

/// Spatial and temporal discretization of the simulation domain.
///
/// The counts derived from it ([`GridSpec::num_levels`],
/// [`GridSpec::dimensions`]) use truncating float division, matching the
/// reference discretization: `nt = ⌊(t_end − t0)/Δt⌋`,
/// `nx = ⌊(x_end − x0)/Δx⌋ + 1` (and analogous for `ny`).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridSpec {
    pub t0: f32,
    pub t_end: f32,
    pub dt: f32,

    /// lower corner of the domain, `(x0, y0)`
    pub origin: Point2<f32>,
    /// upper corner of the domain, `(x_end, y_end)`
    pub end: Point2<f32>,
    /// cell sizes, `(Δx, Δy)`
    pub spacing: Vector2<f32>,
}

impl GridSpec {
    /// Reference discretization of the modeled medium.
    pub const REFERENCE: Self = Self {
        t0: 0.0,
        t_end: 5.5,
        dt: 0.001,
        origin: Point2::new(0.0, 0.0),
        end: Point2::new(5.0, 5.0),
        spacing: Vector2::new(0.02, 0.02),
    };

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if !(self.dt > 0.0) {
            return Err(ConfigurationError::NonPositiveStep {
                name: "dt",
                value: self.dt,
            });
        }
        if !(self.spacing.x > 0.0) {
            return Err(ConfigurationError::NonPositiveStep {
                name: "dx",
                value: self.spacing.x,
            });
        }
        if !(self.spacing.y > 0.0) {
            return Err(ConfigurationError::NonPositiveStep {
                name: "dy",
                value: self.spacing.y,
            });
        }

        let dimensions = self.dimensions();
        if dimensions.x < 3 {
            return Err(ConfigurationError::GridTooSmall {
                axis: "x",
                count: dimensions.x,
            });
        }
        if dimensions.y < 3 {
            return Err(ConfigurationError::GridTooSmall {
                axis: "y",
                count: dimensions.y,
            });
        }

        Ok(())
    }

    /// Number of time levels to advance through (`nt`).
    pub fn num_levels(&self) -> usize {
        ((self.t_end - self.t0) / self.dt) as usize
    }

    /// Grid points per axis, `(nx, ny)`.
    pub fn dimensions(&self) -> Vector2<usize> {
        Vector2::new(
            ((self.end.x - self.origin.x) / self.spacing.x) as usize + 1,
            ((self.end.y - self.origin.y) / self.spacing.y) as usize + 1,
        )
    }

    pub fn num_cells(&self) -> usize {
        self.dimensions().product()
    }

    pub fn x(&self, i: usize) -> f32 {
        self.origin.x + i as f32 * self.spacing.x
    }

    pub fn y(&self, j: usize) -> f32 {
        self.origin.y + j as f32 * self.spacing.y
    }

    /// Seeding offset for the initial displacement. Computed from the extent
    /// length, not the domain midpoint, so a nonzero origin shifts it.
    pub fn pulse_center(&self) -> Vector2<f32> {
        (self.end - self.origin) / 2.0
    }

    /// `(Δt/Δx, Δt/Δy)`, the ratios the Courant numbers are built from.
    pub fn ratio(&self) -> Vector2<f32> {
        Vector2::new(self.dt / self.spacing.x, self.dt / self.spacing.y)
    }

    /// Bytes needed for the three time layers.
    pub fn memory_usage_estimate(&self) -> usize {
        3 * self.num_cells() * std::mem::size_of::<f32>()
    }
}

#[cfg(test)]
mod tests {
    use nalgebra::{
        Point2,
        Vector2,
    };

    use super::GridSpec;
    use crate::error::ConfigurationError;

    #[test]
    fn it_derives_reference_counts() {
        let grid = GridSpec::REFERENCE;
        let dimensions = grid.dimensions();
        assert_eq!(dimensions.x, 251);
        assert_eq!(dimensions.y, 251);
        // 5.5/0.001 lands just below 5500 in single precision and truncates.
        assert_eq!(grid.num_levels(), 5499);
    }

    #[test]
    fn it_derives_minimal_counts() {
        let grid = GridSpec {
            t0: 0.0,
            t_end: 0.002,
            dt: 0.001,
            origin: Point2::new(0.0, 0.0),
            end: Point2::new(1.0, 1.0),
            spacing: Vector2::new(0.5, 0.5),
        };
        assert_eq!(grid.dimensions(), Vector2::new(3, 3));
        assert_eq!(grid.num_levels(), 2);
        assert!(grid.validate().is_ok());
    }

    #[test]
    fn it_rejects_degenerate_grids() {
        let mut grid = GridSpec::REFERENCE;
        grid.dt = 0.0;
        assert_eq!(
            grid.validate(),
            Err(ConfigurationError::NonPositiveStep {
                name: "dt",
                value: 0.0,
            })
        );

        let mut grid = GridSpec::REFERENCE;
        grid.spacing.y = -0.02;
        assert!(matches!(
            grid.validate(),
            Err(ConfigurationError::NonPositiveStep { name: "dy", .. })
        ));

        let mut grid = GridSpec::REFERENCE;
        grid.end.x = grid.origin.x + grid.spacing.x;
        assert_eq!(
            grid.validate(),
            Err(ConfigurationError::GridTooSmall {
                axis: "x",
                count: 2,
            })
        );
    }

    #[test]
    fn it_offsets_the_pulse_center_by_extent() {
        let mut grid = GridSpec::REFERENCE;
        grid.origin = Point2::new(1.0, 1.0);
        grid.end = Point2::new(5.0, 5.0);
        assert_eq!(grid.pulse_center(), Vector2::new(2.0, 2.0));
    }
}
