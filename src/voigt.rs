//! Conversion between symmetric tensors and Voigt notation.
//!
//! The Voigt ordering is `[11, 22, 33, 12, 13, 23]`.
use gemicro_tensor::{Tensor2, Tensor4};
use nalgebra::Vector6;
use serde::{Deserialize, Serialize};

/// Pairs `(i, j)` in Voigt order.
pub const VOIGT_INDICES: [(usize, usize); 6] = [(0, 0), (1, 1), (2, 2), (0, 1), (0, 2), (1, 2)];

/// Position of the symmetric index pair `(i, j)` in a Voigt vector.
pub fn voigt_index(i: usize, j: usize) -> usize {
    match (i.min(j), i.max(j)) {
        (0, 0) => 0,
        (1, 1) => 1,
        (2, 2) => 2,
        (0, 1) => 3,
        (0, 2) => 4,
        (1, 2) => 5,
        _ => panic!("Voigt index ({}, {}) out of bounds", i, j),
    }
}

/// Whether shear entries of a Voigt vector carry a factor 2 (engineering strains).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShearScaling {
    None,
    Engineering,
}

/// Storage order of a flat 6 × 6 Voigt matrix.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum VoigtLayout {
    RowMajor,
    ColumnMajor,
}

/// Entry scaling applied when expanding a Voigt matrix to a rank-4 tensor.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tensor4FromVoigtOptions {
    /// Multiply entries with `i ≠ j` by `0.5`.
    #[serde(default)]
    pub halve_off_diagonal_ij: bool,
    /// Multiply entries with `k ≠ l` by `2.0`.
    #[serde(default)]
    pub double_off_diagonal_kl: bool,
}

/// Flattens the symmetric part of `t` into a Voigt vector.
pub fn tensor2_to_voigt(t: &Tensor2<f64>, shear_scaling: ShearScaling) -> Vector6<f64> {
    let shear_factor = match shear_scaling {
        ShearScaling::None => 1.0,
        ShearScaling::Engineering => 2.0,
    };
    Vector6::from_fn(|a, _| {
        let (i, j) = VOIGT_INDICES[a];
        let value = 0.5 * (t[[i, j]] + t[[j, i]]);
        if i == j {
            value
        } else {
            shear_factor * value
        }
    })
}

/// Expands a Voigt vector into a symmetric tensor.
pub fn tensor2_from_voigt(v: &Vector6<f64>, shear_scaling: ShearScaling) -> Tensor2<f64> {
    let shear_factor = match shear_scaling {
        ShearScaling::None => 1.0,
        ShearScaling::Engineering => 0.5,
    };
    Tensor2::from_fn(|[i, j]| {
        let value = v[voigt_index(i, j)];
        if i == j {
            value
        } else {
            shear_factor * value
        }
    })
}

/// Expands the derivative of a scalar with respect to a Voigt strain with engineering shear into
/// the derivative with respect to the symmetric strain tensor entries.
pub fn tensor2_from_voigt_derivative(v: &Vector6<f64>) -> Tensor2<f64> {
    tensor2_from_voigt(v, ShearScaling::None)
}

/// Expands a flat 6 × 6 Voigt matrix into the rank-4 tensor `C_ijkl = V[v(ij), v(kl)]`.
///
/// # Panics
///
/// Panics if `v` does not hold 36 entries.
pub fn tensor4_from_voigt(v: &[f64], layout: VoigtLayout, options: Tensor4FromVoigtOptions) -> Tensor4<f64> {
    assert_eq!(v.len(), 36, "A Voigt matrix has 36 entries");
    Tensor4::from_fn(|[i, j, k, l]| {
        let (row, col) = (voigt_index(i, j), voigt_index(k, l));
        let mut value = match layout {
            VoigtLayout::RowMajor => v[6 * row + col],
            VoigtLayout::ColumnMajor => v[row + 6 * col],
        };
        if options.halve_off_diagonal_ij && i != j {
            value *= 0.5;
        }
        if options.double_off_diagonal_kl && k != l {
            value *= 2.0;
        }
        value
    })
}
