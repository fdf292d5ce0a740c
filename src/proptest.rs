//! Strategies for property-based testing of material evaluations.
use crate::material::DeformationIncrement;
use ::proptest::prelude::*;
use gemicro_tensor::proptest::deformation_gradient;
use gemicro_tensor::{Tensor1, Tensor2};

/// Microrotations with components in `[-0.2, 0.2]`.
pub fn micro_rotation() -> impl Strategy<Value = Tensor1<f64>> {
    ::proptest::array::uniform3(-0.2..0.2).prop_map(Tensor1::from)
}

/// Microrotation gradients with entries in `[-0.5, 0.5]`.
pub fn micro_rotation_gradient() -> impl Strategy<Value = Tensor2<f64>> {
    ::proptest::array::uniform9(-0.5..0.5).prop_map(|entries| Tensor2::from_row_major_slice(&entries))
}

/// Increments starting from the undeformed state with `det F > 0` and a nonlocal damage value
/// in `[0.05, 0.4]`.
pub fn deformation_increment() -> impl Strategy<Value = DeformationIncrement> {
    (
        deformation_gradient(),
        micro_rotation(),
        micro_rotation_gradient(),
        0.05..0.4,
    )
        .prop_map(|(f, w, grad_w, nonlocal)| DeformationIncrement::from_undeformed(f, w, grad_w, nonlocal))
}
