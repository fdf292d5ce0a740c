use crate::constitutive::MicropolarTangent;
use crate::field::Field;
use crate::kernels::{MicropolarQuadraturePoint, QuadraturePointKernel, ShapeFunction};

/// Helmholtz-type regularization `r² ∇N·∇test + (N - L) test` of the nonlocal damage field `N`,
/// driven by the local quantity `L` of a micropolar material.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct MicropolarDamage;

impl QuadraturePointKernel for MicropolarDamage {
    type Input = MicropolarQuadraturePoint;
    type Tangent = MicropolarTangent;

    fn variable(&self) -> Field {
        Field::NonlocalDamage
    }

    fn residual(&self, input: &Self::Input, test: &ShapeFunction) -> f64 {
        let r = input.response.nonlocal_radius;
        let nonlocal = &input.nonlocal_damage;
        r * r * test.gradient.dot(&nonlocal.gradient) + test.value * (nonlocal.value - input.response.local_damage)
    }

    fn jacobian(
        &self,
        input: &Self::Input,
        tangent: &Self::Tangent,
        test: &ShapeFunction,
        trial: &ShapeFunction,
        trial_field: Field,
    ) -> f64 {
        let d = &tangent.local_damage;
        let grad_phi = &trial.gradient;
        match trial_field {
            Field::NonlocalDamage => {
                let r = input.response.nonlocal_radius;
                r * r * test.gradient.dot(grad_phi) + test.value * trial.value - test.value * d.d_dn * trial.value
            }
            Field::Displacement(j) => {
                let dl: f64 = (0..3).map(|big_k| d.d_df[[j.index(), big_k]] * grad_phi[[big_k]]).sum();
                -test.value * dl
            }
            Field::MicroRotation(j) => {
                let j = j.index();
                let dl = d.d_dw[[j]] * trial.value
                    + (0..3)
                        .map(|big_k| d.d_dgrad_w[[j, big_k]] * grad_phi[[big_k]])
                        .sum::<f64>();
                -test.value * dl
            }
            Field::LoadParameter => 0.0,
        }
    }
}
