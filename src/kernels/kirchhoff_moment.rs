use crate::constitutive::MicropolarTangent;
use crate::field::{Component, Field};
use crate::kernels::{MicropolarQuadraturePoint, QuadraturePointKernel, ShapeFunction};
use crate::ConfigurationError;

/// Kirchhoff moment source `-test m_c` in the balance of angular momentum for component `c`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct KirchhoffMoment {
    component: Component,
}

impl KirchhoffMoment {
    pub fn new(component: usize) -> Result<Self, ConfigurationError> {
        Ok(Self {
            component: Component::new(component)?,
        })
    }

    pub fn component(&self) -> Component {
        self.component
    }
}

impl QuadraturePointKernel for KirchhoffMoment {
    type Input = MicropolarQuadraturePoint;
    type Tangent = MicropolarTangent;

    fn variable(&self) -> Field {
        Field::MicroRotation(self.component)
    }

    fn residual(&self, input: &Self::Input, test: &ShapeFunction) -> f64 {
        -test.value * input.response.kirchhoff_moment[[self.component.index()]]
    }

    fn jacobian(
        &self,
        _input: &Self::Input,
        tangent: &Self::Tangent,
        test: &ShapeFunction,
        trial: &ShapeFunction,
        trial_field: Field,
    ) -> f64 {
        let d = &tangent.kirchhoff_moment;
        let c = self.component.index();
        let grad_phi = &trial.gradient;
        let dm: f64 = match trial_field {
            Field::Displacement(j) => (0..3).map(|big_m| d.d_df[[c, j.index(), big_m]] * grad_phi[[big_m]]).sum(),
            Field::MicroRotation(j) => {
                let j = j.index();
                d.d_dw[[c, j]] * trial.value
                    + (0..3)
                        .map(|big_m| d.d_dgrad_w[[c, j, big_m]] * grad_phi[[big_m]])
                        .sum::<f64>()
            }
            Field::NonlocalDamage => d.d_dn[[c]] * trial.value,
            Field::LoadParameter => 0.0,
        };
        -test.value * dm
    }
}
