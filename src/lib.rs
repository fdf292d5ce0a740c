//! Element-level physics for a gradient-enhanced micropolar continuum.
//!
//! The crate supplies everything a host finite element framework evaluates per quadrature point:
//! boundary kinematics, the Piola-transformed response of opaque micropolar constitutive laws
//! together with its consistent derivatives, and the residual/Jacobian kernels that contract these
//! tensors with shape function values and gradients. Mesh traversal, quadrature loops and global
//! assembly are left to the host.
//!
//! All tensors are the dense fixed-rank tensors of [`gemicro_tensor`], re-exported as [`tensor`].
pub mod bcs;
pub mod constitutive;
pub mod constraints;
pub mod error;
pub mod field;
pub mod kernels;
pub mod kinematics;
pub mod material;
#[cfg(feature = "proptest-support")]
pub mod proptest;
pub mod setup;
pub mod state;
pub mod voigt;

pub use error::{ConfigurationError, RecoverableFailure};
pub use gemicro_tensor as tensor;
pub use gemicro_tensor::nalgebra;
