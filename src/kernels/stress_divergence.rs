use crate::field::{Component, Field};
use crate::kernels::{QuadraturePointKernel, ShapeFunction, SmallStrainQuadraturePoint, SmallStrainTangent};
use crate::ConfigurationError;

/// Small-strain stress divergence `∇test · σ[c, :]` for component `c`, coupled to a nonlocal
/// damage field through `∂σ/∂N`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct StressDivergence {
    component: Component,
}

impl StressDivergence {
    pub fn new(component: usize) -> Result<Self, ConfigurationError> {
        Ok(Self {
            component: Component::new(component)?,
        })
    }
}

impl QuadraturePointKernel for StressDivergence {
    type Input = SmallStrainQuadraturePoint;
    type Tangent = SmallStrainTangent;

    fn variable(&self) -> Field {
        Field::Displacement(self.component)
    }

    fn residual(&self, input: &Self::Input, test: &ShapeFunction) -> f64 {
        let c = self.component.index();
        (0..3)
            .map(|big_k| test.gradient[[big_k]] * input.response.stress[[c, big_k]])
            .sum()
    }

    fn jacobian(
        &self,
        _input: &Self::Input,
        tangent: &Self::Tangent,
        test: &ShapeFunction,
        trial: &ShapeFunction,
        trial_field: Field,
    ) -> f64 {
        let c = self.component.index();
        match trial_field {
            Field::Displacement(j) => {
                let j = j.index();
                let mut result = 0.0;
                for big_k in 0..3 {
                    for big_l in 0..3 {
                        result += test.gradient[[big_k]]
                            * tangent.dstress_dstrain[[c, big_k, j, big_l]]
                            * trial.gradient[[big_l]];
                    }
                }
                result
            }
            Field::NonlocalDamage => (0..3)
                .map(|big_k| test.gradient[[big_k]] * tangent.dstress_dnonlocal[[c, big_k]] * trial.value)
                .sum(),
            Field::MicroRotation(_) | Field::LoadParameter => 0.0,
        }
    }
}
