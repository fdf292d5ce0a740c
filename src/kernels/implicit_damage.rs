use crate::field::Field;
use crate::kernels::{QuadraturePointKernel, ShapeFunction, SmallStrainQuadraturePoint, SmallStrainTangent};

/// Implicit gradient-enhanced damage for small strains:
/// `r² ∇N·∇test + (N - L) test`, with `L` computed by a hypoelastic law.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct ImplicitGradientEnhancedDamage;

impl QuadraturePointKernel for ImplicitGradientEnhancedDamage {
    type Input = SmallStrainQuadraturePoint;
    type Tangent = SmallStrainTangent;

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
        match trial_field {
            Field::NonlocalDamage => {
                let r = input.response.nonlocal_radius;
                r * r * test.gradient.dot(&trial.gradient) + test.value * trial.value
            }
            Field::Displacement(i) => {
                // ∂ε_kl/∂(∇u)_iK is the symmetrizer, so only sym(∂L/∂ε) contributes
                let dl_dstrain = tangent.dl_dstrain.symmetric_part();
                let i = i.index();
                let dl: f64 = (0..3)
                    .map(|big_k| dl_dstrain[[i, big_k]] * trial.gradient[[big_k]])
                    .sum();
                -test.value * dl
            }
            Field::MicroRotation(_) | Field::LoadParameter => 0.0,
        }
    }
}
