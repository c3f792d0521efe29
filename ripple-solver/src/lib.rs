//! Explicit FDTD solver for the 2D scalar wave equation on a regular grid.
//!
//! The wave field lives in three time layers (past, current, future) that
//! rotate by role reassignment after every step. Propagation speed, source
//! injection and initial conditions are pluggable through the [`Medium`],
//! [`SourceTerm`] and [`InitialCondition`] seams; the piecewise reference
//! models ship as [`FieldType`], [`SourceSpec`] and [`SineArchSeed`].
//!
//! All field arithmetic is single precision. The reference scale constants
//! are tuned to it; widening to `f64` changes both magnitudes and stability
//! behavior.

pub mod driver;
pub mod error;
pub mod grid;
pub mod initial;
pub mod lattice;
pub mod medium;
pub mod solver;
pub mod source;

pub use crate::{
    driver::{
        DriverError,
        RunSummary,
        SimulationDriver,
        Snapshot,
        SnapshotSink,
    },
    error::{
        ConfigurationError,
        StateError,
    },
    grid::GridSpec,
    initial::{
        InitialCondition,
        Quiescent,
        SineArchSeed,
    },
    lattice::Lattice,
    medium::{
        FieldType,
        Medium,
    },
    solver::{
        LayerIndex,
        StepReport,
        WaveSolver,
    },
    source::{
        SourceSpec,
        SourceTerm,
        Waveform,
    },
};
