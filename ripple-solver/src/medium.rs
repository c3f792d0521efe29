use serde::{
    Deserialize,
    Serialize,
};

/// Local propagation speed of the medium, evaluated per grid point.
///
/// Implemented for [`FieldType`] (the piecewise reference media) and for
/// plain closures, which is convenient for synthetic media in tests. The
/// `Send + Sync` bound lets the stencil pass fan out over rows.
pub trait Medium: Send + Sync {
    fn speed(&self, x: f32, y: f32) -> f32;
}

impl<F> Medium for F
where
    F: Fn(f32, f32) -> f32 + Send + Sync,
{
    fn speed(&self, x: f32, y: f32) -> f32 {
        self(x, y)
    }
}

/// Region classification selecting which piecewise speed rule applies.
///
/// The numeric constants are material properties of the modeled medium and
/// must not be altered. Coordinates outside every region simply fall into
/// the final branch of the corresponding rule.
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
pub enum FieldType {
    /// 0.9 background, slowed to 0.6 in the upper-right quadrant
    Sinusoidal,
    /// horizontal layers of 1.4, 1.2 and 0.8
    #[default]
    Stratified,
    /// 1.6 inside the unit box at (2, 2), 0.8 outside
    Gaussian,
    /// constant 0.9
    Uniform,
}

impl Medium for FieldType {
    fn speed(&self, x: f32, y: f32) -> f32 {
        match self {
            FieldType::Sinusoidal => {
                if x >= 2.0 && y >= 2.0 {
                    0.6
                }
                else {
                    0.9
                }
            }
            FieldType::Stratified => {
                if y >= 2.0 && y <= 3.0 {
                    1.4
                }
                else if y <= 4.0 {
                    1.2
                }
                else {
                    0.8
                }
            }
            FieldType::Gaussian => {
                if x >= 2.0 && x <= 3.0 && y >= 2.0 && y <= 3.0 {
                    1.6
                }
                else {
                    0.8
                }
            }
            FieldType::Uniform => 0.9,
        }
    }
}
