use crate::{einsum, Real, Tensor2, Tensor3, Tensor4};
use numeric_literals::replace_float_literals;

/// The alternating (Levi-Civita) tensor `ε_ijk`.
#[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
pub fn levi_civita<T: Real>() -> Tensor3<T> {
    Tensor3::from_fn(|index| match index {
        [0, 1, 2] | [1, 2, 0] | [2, 0, 1] => 1.0,
        [0, 2, 1] | [2, 1, 0] | [1, 0, 2] => -1.0,
        _ => 0.0,
    })
}

/// Derivative of the inverse `F⁻¹` with respect to `F`, given `F⁻¹`.
///
/// The result has index order `(I, i, k, K)`, i.e. entry `[I, i, k, K]` holds
/// `∂(F⁻¹)_Ii / ∂F_kK = -F⁻¹_Ik F⁻¹_Ki`.
pub fn inverse_derivative<T: Real>(inverse: &Tensor2<T>) -> Tensor4<T> {
    let product: Tensor4<T> = einsum!("Ik,Ki->IikK", inverse, inverse);
    -product
}
