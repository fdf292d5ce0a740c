//! Dense fixed-rank tensors over three dimensions.
//!
//! Every tensor of rank `R` stores its `3^R` entries in a flat, row-major array, so that
//! `t[[i, j, k]]` lives at offset `9 i + 3 j + k`. Contractions between tensors are expressed with
//! [`einsum!`], whose index pattern is parsed and validated at compile time.
use nalgebra::RealField;

pub use nalgebra;

mod einsum;
mod identities;
mod tensor;

pub use einsum::*;
pub use identities::*;
pub use tensor::*;

#[cfg(feature = "proptest-support")]
pub mod proptest;

pub trait Real: RealField + Copy {}

impl<T: RealField + Copy> Real for T {}
