use std::path::{
    Path,
    PathBuf,
};

use color_eyre::eyre::{
    Error,
    WrapErr,
};
use nalgebra::{
    Point2,
    Vector2,
};
use ripple_solver::{
    FieldType,
    GridSpec,
    SourceSpec,
    Waveform,
    solver::DEFAULT_INSTABILITY_THRESHOLD,
};
use serde::{
    Deserialize,
    Serialize,
};

/// Flat simulation parameter set. Every field defaults to the reference
/// configuration, so an empty TOML file (or none at all) reproduces the
/// reference run.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub time: TimeConfig,
    pub space: SpaceConfig,
    pub medium: MediumConfig,
    pub source: SourceConfig,
    pub output: OutputConfig,
    pub limits: LimitsConfig,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, Error> {
        let text = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read configuration from {}", path.display()))?;
        toml::from_str(&text)
            .wrap_err_with(|| format!("failed to parse configuration from {}", path.display()))
    }

    pub fn grid(&self) -> GridSpec {
        GridSpec {
            t0: self.time.start,
            t_end: self.time.end,
            dt: self.time.step,
            origin: Point2::new(self.space.x_start, self.space.y_start),
            end: Point2::new(self.space.x_end, self.space.y_end),
            spacing: Vector2::new(self.space.dx, self.space.dy),
        }
    }

    pub fn source_spec(&self) -> SourceSpec {
        SourceSpec {
            position: Point2::new(self.source.x, self.source.y),
            // the reference couples the injection half-width to the cell size
            tolerance: self.source.tolerance.unwrap_or(self.space.dx),
            waveform: self.source.waveform,
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeConfig {
    pub start: f32,
    pub end: f32,
    pub step: f32,
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            start: 0.0,
            end: 5.5,
            step: 0.001,
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SpaceConfig {
    pub x_start: f32,
    pub x_end: f32,
    pub dx: f32,
    pub y_start: f32,
    pub y_end: f32,
    pub dy: f32,
}

impl Default for SpaceConfig {
    fn default() -> Self {
        Self {
            x_start: 0.0,
            x_end: 5.0,
            dx: 0.02,
            y_start: 0.0,
            y_end: 5.0,
            dy: 0.02,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MediumConfig {
    pub field_type: FieldType,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub x: f32,
    pub y: f32,
    /// half-width of the injection box; the x cell size when absent
    pub tolerance: Option<f32>,
    pub waveform: Waveform,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            x: 1.0,
            y: 1.0,
            tolerance: None,
            waveform: Waveform::default(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub directory: PathBuf,
    pub basename: String,
    pub binary: bool,
    pub text: bool,
    /// emit every n-th time level
    pub stride: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            basename: "wave".into(),
            binary: true,
            text: true,
            stride: 1,
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    pub amplitude_threshold: f32,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            amplitude_threshold: DEFAULT_INSTABILITY_THRESHOLD,
        }
    }
}

#[cfg(test)]
mod tests {
    use ripple_solver::{
        FieldType,
        Waveform,
    };

    use super::Config;

    #[test]
    fn it_defaults_to_the_reference_run() {
        let config = Config::default();
        let grid = config.grid();
        assert_eq!(grid, ripple_solver::GridSpec::REFERENCE);
        assert_eq!(config.source_spec(), ripple_solver::SourceSpec::REFERENCE);
        assert_eq!(config.medium.field_type, FieldType::Stratified);
        assert_eq!(config.output.stride, 1);
    }

    #[test]
    fn it_parses_partial_files() {
        let config: Config = toml::from_str(
            r#"
            [time]
            end = 1.0

            [medium]
            field_type = "Uniform"

            [source]
            waveform = "SinusoidalBurst"
            tolerance = 0.1

            [output]
            stride = 10
            "#,
        )
        .unwrap();

        assert_eq!(config.time.end, 1.0);
        assert_eq!(config.time.step, 0.001);
        assert_eq!(config.medium.field_type, FieldType::Uniform);
        assert_eq!(config.source_spec().waveform, Waveform::SinusoidalBurst);
        assert_eq!(config.source_spec().tolerance, 0.1);
        assert_eq!(config.output.stride, 10);
    }

    #[test]
    fn it_couples_the_tolerance_to_the_cell_size() {
        let mut config = Config::default();
        config.space.dx = 0.05;
        assert_eq!(config.source_spec().tolerance, 0.05);
    }
}
