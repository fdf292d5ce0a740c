//! Strategies for property-based testing with `proptest`.
use crate::{Tensor1, Tensor2};
use nalgebra::{Rotation3, Vector3};
use proptest::prelude::*;

/// Deformation gradients `F = I + H` with entries of `H` in `[-0.3, 0.3]`.
///
/// Such matrices are strictly diagonally dominant with positive diagonal, hence `det F > 0` and
/// `F` is well conditioned.
pub fn deformation_gradient() -> impl Strategy<Value = Tensor2<f64>> {
    proptest::array::uniform9(-0.3..0.3).prop_map(|h| Tensor2::identity() + Tensor2::from_row_major_slice(&h))
}

/// Rigid rotations with rotation angle in `[0, π)`.
pub fn rotation() -> impl Strategy<Value = Tensor2<f64>> {
    (unit_vector(), 0.0..std::f64::consts::PI).prop_map(|(axis, angle)| {
        let rotation = Rotation3::from_scaled_axis(axis.to_vector() * angle);
        Tensor2::from(rotation.into_inner())
    })
}

pub fn unit_vector() -> impl Strategy<Value = Tensor1<f64>> {
    proptest::array::uniform3(-1.0..1.0)
        .prop_map(|x| Vector3::from(x))
        .prop_filter("Vector must not be close to zero", |v| v.norm() > 1e-2)
        .prop_map(|v| Tensor1::from(v.normalize()))
}
