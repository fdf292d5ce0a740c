//! Finite-strain boundary kinematics.
use crate::{ConfigurationError, RecoverableFailure};
use gemicro_tensor::{einsum, inverse_derivative, Tensor1, Tensor2, Tensor3};
use log::warn;

/// Returns `F = I + ∇u`, where `grad_u[[i, J]] = ∂u_i/∂X_J`.
pub fn deformation_gradient(grad_u: &Tensor2<f64>) -> Tensor2<f64> {
    Tensor2::identity() + *grad_u
}

/// Inverts a deformation gradient, returning `(F⁻¹, det F)`.
///
/// Fails if `F` is singular or `det F ≤ 0`.
pub fn invert_deformation_gradient(f: &Tensor2<f64>) -> Result<(Tensor2<f64>, f64), RecoverableFailure> {
    let determinant = f.determinant();
    let failure = RecoverableFailure::SingularDeformationGradient { determinant };
    // Also rejects NaN determinants
    if !(determinant > 0.0) {
        return Err(failure);
    }
    let inverse = f.try_inverse().ok_or(failure)?;
    Ok((inverse, determinant))
}

/// The deformed (area-weighted) boundary normal and its derivative with respect to `F`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BoundaryNormal {
    /// `n_i = J F⁻¹_Ii N_I`.
    pub n: Tensor1<f64>,
    /// `dn_df[[i, k, K]] = ∂n_i/∂F_kK`.
    pub dn_df: Tensor3<f64>,
}

/// Maps a reference unit normal to the current configuration with Nanson's formula
/// `n = J F⁻ᵀ N`, and computes the derivative `∂n/∂F`.
pub fn compute_deformed_boundary_normal(
    reference_normal: &Tensor1<f64>,
    f: &Tensor2<f64>,
) -> Result<BoundaryNormal, RecoverableFailure> {
    let (f_inv, j) = invert_deformation_gradient(f)?;

    let f_inv_t_normal: Tensor1<f64> = einsum!("Ii,I->i", &f_inv, reference_normal);
    // ∂J/∂F_kK = J F⁻¹_Kk
    let dj_df = f_inv.transpose() * j;
    let df_inv_df = inverse_derivative(&f_inv);

    let volumetric: Tensor3<f64> = einsum!("i,kK->ikK", &f_inv_t_normal, &dj_df);
    let rotational: Tensor3<f64> = einsum!("IikK,I->ikK", &df_inv_df, reference_normal);

    Ok(BoundaryNormal {
        n: f_inv_t_normal * j,
        dn_df: volumetric + rotational * j,
    })
}

/// Computes deformed boundary normals on the undisplaced mesh.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct DeformedBoundaryNormal {
    _private: (),
}

impl DeformedBoundaryNormal {
    /// Fails unless `use_displaced_mesh` is `false`, since the displacement gradient must be taken
    /// with respect to the reference configuration.
    pub fn new(use_displaced_mesh: bool) -> eyre::Result<Self> {
        if use_displaced_mesh {
            return Err(ConfigurationError::DisplacedMesh {
                object: "DeformedBoundaryNormal".to_string(),
            }
            .into());
        }
        Ok(Self { _private: () })
    }

    pub fn compute(
        &self,
        reference_normal: &Tensor1<f64>,
        grad_u: &Tensor2<f64>,
    ) -> Result<BoundaryNormal, RecoverableFailure> {
        compute_deformed_boundary_normal(reference_normal, &deformation_gradient(grad_u)).map_err(|failure| {
            warn!("Deformed boundary normal: {}", failure);
            failure
        })
    }
}
