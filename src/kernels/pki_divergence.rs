use crate::constitutive::{MicropolarTangent, PkiDerivatives};
use crate::field::{Component, Field};
use crate::kernels::{MicropolarQuadraturePoint, QuadraturePointKernel, ShapeFunction};
use crate::ConfigurationError;
use gemicro_tensor::Tensor2;
use serde::{Deserialize, Serialize};

/// The first Piola-Kirchhoff tensor whose divergence is taken.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PkiTensor {
    /// Balance of linear momentum, acting on a displacement component.
    Stress,
    /// Balance of angular momentum, acting on a microrotation component.
    CoupleStress,
}

/// Weak divergence `∇test · P[:, c]` of a PKI stress or couple stress for component `c`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PkiDivergence {
    component: Component,
    tensor: PkiTensor,
}

impl PkiDivergence {
    pub fn new(component: usize, tensor: PkiTensor) -> Result<Self, ConfigurationError> {
        Ok(Self {
            component: Component::new(component)?,
            tensor,
        })
    }

    pub fn component(&self) -> Component {
        self.component
    }

    pub fn tensor(&self) -> PkiTensor {
        self.tensor
    }

    fn select<'a>(&self, input: &'a MicropolarQuadraturePoint) -> &'a Tensor2<f64> {
        match self.tensor {
            PkiTensor::Stress => &input.response.pk_i_stress,
            PkiTensor::CoupleStress => &input.response.pk_i_couple_stress,
        }
    }

    fn select_derivatives<'a>(&self, tangent: &'a MicropolarTangent) -> &'a PkiDerivatives {
        match self.tensor {
            PkiTensor::Stress => &tangent.pk_i_stress,
            PkiTensor::CoupleStress => &tangent.pk_i_couple_stress,
        }
    }
}

impl QuadraturePointKernel for PkiDivergence {
    type Input = MicropolarQuadraturePoint;
    type Tangent = MicropolarTangent;

    fn variable(&self) -> Field {
        match self.tensor {
            PkiTensor::Stress => Field::Displacement(self.component),
            PkiTensor::CoupleStress => Field::MicroRotation(self.component),
        }
    }

    fn residual(&self, input: &Self::Input, test: &ShapeFunction) -> f64 {
        let p = self.select(input);
        let c = self.component.index();
        (0..3).map(|big_k| test.gradient[[big_k]] * p[[big_k, c]]).sum()
    }

    fn jacobian(
        &self,
        _input: &Self::Input,
        tangent: &Self::Tangent,
        test: &ShapeFunction,
        trial: &ShapeFunction,
        trial_field: Field,
    ) -> f64 {
        let d = self.select_derivatives(tangent);
        let c = self.component.index();
        let grad_test = &test.gradient;
        let grad_phi = &trial.gradient;
        match trial_field {
            Field::Displacement(j) => {
                let j = j.index();
                let mut result = 0.0;
                for big_k in 0..3 {
                    for big_j in 0..3 {
                        result += grad_test[[big_k]] * d.d_df[[big_k, c, j, big_j]] * grad_phi[[big_j]];
                    }
                }
                result
            }
            Field::MicroRotation(j) => {
                let j = j.index();
                let mut result = 0.0;
                for big_k in 0..3 {
                    let mut dp = d.d_dw[[big_k, c, j]] * trial.value;
                    for big_j in 0..3 {
                        dp += d.d_dgrad_w[[big_k, c, j, big_j]] * grad_phi[[big_j]];
                    }
                    result += grad_test[[big_k]] * dp;
                }
                result
            }
            Field::NonlocalDamage => (0..3)
                .map(|big_k| grad_test[[big_k]] * d.d_dn[[big_k, c]] * trial.value)
                .sum(),
            Field::LoadParameter => 0.0,
        }
    }
}
