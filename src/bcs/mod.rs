//! Boundary conditions.
use gemicro_tensor::Tensor1;
use std::sync::Arc;

pub mod dirichlet;
pub mod pressure;

pub use dirichlet::FunctionDirichletIncrementalBc;
pub use pressure::{FiniteStrainPressure, FiniteStrainPressureParameters, PressureQuadraturePoint};

/// A scalar function `f(t, x)` of time and reference position.
pub type SpaceTimeFunction = Arc<dyn Fn(f64, &Tensor1<f64>) -> f64 + Send + Sync>;
