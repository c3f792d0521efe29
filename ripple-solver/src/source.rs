use nalgebra::Point2;
use serde::{
    Deserialize,
    Serialize,
};

/// Scale applied to both waveforms.
const SCALE: f32 = 10_000.0;
/// Sharpness of the Gaussian-derivative pulse.
const PULSE_SHARPNESS: f32 = 8.0;
/// Time the pulse is centered on.
const PULSE_ONSET: f32 = 0.2;
/// Angular frequency of the sinusoidal burst.
const BURST_OMEGA: f32 = 10.0;

/// Time-dependent forcing term injected into the update equation.
///
/// Implemented for [`SourceSpec`] and for plain `Fn(t, x, y)` closures. The
/// `Send + Sync` bound lets the stencil pass fan out over rows.
pub trait SourceTerm: Send + Sync {
    fn inject(&self, time: f32, x: f32, y: f32) -> f32;
}

impl<F> SourceTerm for F
where
    F: Fn(f32, f32, f32) -> f32 + Send + Sync,
{
    fn inject(&self, time: f32, x: f32, y: f32) -> f32 {
        self(time, x, y)
    }
}

/// Temporal shape of the injected source.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
pub enum Waveform {
    /// `10000·sin(10·t)` inside a fixed box at (2.5, 2.5), ignoring the
    /// configured source position
    SinusoidalBurst,
    /// scaled second derivative of a Gaussian (Ricker-like pulse),
    /// sign-symmetric about its onset, centered on the configured source
    /// position
    #[default]
    GaussianDerivative,
}

/// A source localized in space and shaped in time.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SourceSpec {
    /// injection center `(x0, y0)`
    pub position: Point2<f32>,
    /// half-width of the axis-aligned injection box
    pub tolerance: f32,
    pub waveform: Waveform,
}

impl SourceSpec {
    /// Reference source of the modeled medium.
    pub const REFERENCE: Self = Self {
        position: Point2::new(1.0, 1.0),
        tolerance: 0.02,
        waveform: Waveform::GaussianDerivative,
    };
}

impl SourceTerm for SourceSpec {
    fn inject(&self, time: f32, x: f32, y: f32) -> f32 {
        match self.waveform {
            Waveform::GaussianDerivative => {
                let inside = x >= self.position.x - self.tolerance
                    && x <= self.position.x + self.tolerance
                    && y >= self.position.y - self.tolerance
                    && y <= self.position.y + self.tolerance;

                if inside {
                    let b = PULSE_SHARPNESS * (time - PULSE_ONSET);
                    SCALE * (1.0 - b * b) * (-b * b).exp()
                }
                else {
                    0.0
                }
            }
            Waveform::SinusoidalBurst => {
                if x >= 2.5 && x <= 2.55 && y >= 2.5 && y <= 2.55 {
                    SCALE * (BURST_OMEGA * time).sin()
                }
                else {
                    0.0
                }
            }
        }
    }
}
