//! Error types.
//!
//! Two classes of errors exist. A [`ConfigurationError`] is fatal and surfaces from constructors,
//! usually wrapped in an [`eyre::Report`]. A [`RecoverableFailure`] is raised during evaluation
//! and asks the host to cut back the current time increment; it never corrupts committed state.
use std::error::Error;
use std::fmt;
use std::fmt::{Display, Formatter};

/// A numerical failure the host can recover from by retrying with a smaller time increment.
#[derive(Debug, Clone, PartialEq)]
pub enum RecoverableFailure {
    /// The deformation gradient is singular or has a non-positive determinant.
    SingularDeformationGradient { determinant: f64 },
    /// The constitutive law requested a smaller time increment.
    TimestepReduction { material: String, factor: f64 },
}

impl Display for RecoverableFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::SingularDeformationGradient { determinant } => {
                write!(
                    f,
                    "deformation gradient is not invertible with positive determinant (det F = {determinant:e})"
                )
            }
            Self::TimestepReduction { material, factor } => {
                write!(f, "material {material} requests timestep reduction by factor {factor}")
            }
        }
    }
}

impl Error for RecoverableFailure {}

/// A fatal error in the configuration of materials, kernels or boundary conditions.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum ConfigurationError {
    /// A vector component outside `{0, 1, 2}`.
    InvalidComponent { component: usize },
    UnknownMaterial { name: String },
    MaterialInstantiation { name: String, reason: String },
    /// The object only supports evaluation on the undisplaced mesh.
    DisplacedMesh { object: String },
    DimensionMismatch { context: String, expected: usize, actual: usize },
    /// A Jacobian was requested for a variable that is not known to the object.
    UnknownVariable { variable: usize },
    InvalidParameter { name: String, reason: String },
}

impl Display for ConfigurationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidComponent { component } => {
                write!(f, "component {component} is out of range, expected 0, 1 or 2")
            }
            Self::UnknownMaterial { name } => write!(f, "no material named '{name}' is registered"),
            Self::MaterialInstantiation { name, reason } => {
                write!(f, "failed to instantiate material '{name}': {reason}")
            }
            Self::DisplacedMesh { object } => write!(f, "{object}: use_displaced_mesh must be set to false"),
            Self::DimensionMismatch {
                context,
                expected,
                actual,
            } => write!(f, "{context}: expected {expected}, got {actual}"),
            Self::UnknownVariable { variable } => {
                write!(f, "variable {variable} is not coupled to this object")
            }
            Self::InvalidParameter { name, reason } => write!(f, "invalid parameter '{name}': {reason}"),
        }
    }
}

impl Error for ConfigurationError {}
