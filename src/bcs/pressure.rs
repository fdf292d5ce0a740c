use crate::bcs::SpaceTimeFunction;
use crate::field::{Component, Field};
use crate::kernels::{QuadraturePointKernel, ShapeFunction};
use crate::kinematics::BoundaryNormal;
use crate::ConfigurationError;
use gemicro_tensor::Tensor1;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::{Debug, Formatter};

fn default_factor() -> f64 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FiniteStrainPressureParameters {
    pub component: usize,
    #[serde(default = "default_factor")]
    pub factor: f64,
    /// The pressure function is evaluated at `t + hht_alpha · dt`.
    #[serde(default)]
    pub hht_alpha: f64,
    #[serde(default)]
    pub use_displaced_mesh: bool,
}

impl FiniteStrainPressureParameters {
    pub fn new(component: usize) -> Self {
        Self {
            component,
            factor: 1.0,
            hht_alpha: 0.0,
            use_displaced_mesh: false,
        }
    }
}

/// Follower pressure on the deformed boundary for displacement component `c`.
///
/// The traction is `p n`, with `n = J F⁻ᵀ N` the area-weighted deformed normal, so that the
/// weak form lives on the reference boundary. The pressure is optionally amplified by a scalar
/// load parameter `λ`.
#[derive(Clone)]
pub struct FiniteStrainPressure {
    component: Component,
    factor: f64,
    hht_alpha: f64,
    function: Option<SpaceTimeFunction>,
}

impl Debug for FiniteStrainPressure {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("FiniteStrainPressure")
            .field("component", &self.component)
            .field("factor", &self.factor)
            .field("hht_alpha", &self.hht_alpha)
            .field("has_function", &self.function.is_some())
            .finish()
    }
}

/// Input of [`FiniteStrainPressure`] at a boundary quadrature point.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PressureQuadraturePoint {
    pub normal: BoundaryNormal,
    /// Pressure value as returned by [`FiniteStrainPressure::pressure`].
    pub pressure: f64,
    /// Value of the coupled load parameter, if any.
    pub load_parameter: Option<f64>,
}

impl FiniteStrainPressure {
    pub fn new(params: &FiniteStrainPressureParameters) -> eyre::Result<Self> {
        if params.use_displaced_mesh {
            return Err(ConfigurationError::DisplacedMesh {
                object: "FiniteStrainPressure".to_string(),
            }
            .into());
        }
        Ok(Self {
            component: Component::new(params.component)?,
            factor: params.factor,
            hht_alpha: params.hht_alpha,
            function: None,
        })
    }

    pub fn with_function(mut self, function: SpaceTimeFunction) -> Self {
        self.function = Some(function);
        self
    }

    pub fn component(&self) -> Component {
        self.component
    }

    /// The pressure `factor · f(t + α dt, x) · postprocessor`, where absent factors count as one.
    pub fn pressure(&self, time: f64, dt: f64, position: &Tensor1<f64>, postprocessor: Option<f64>) -> f64 {
        let function_value = self
            .function
            .as_ref()
            .map_or(1.0, |f| f(time + self.hht_alpha * dt, position));
        self.factor * function_value * postprocessor.unwrap_or(1.0)
    }
}

impl QuadraturePointKernel for FiniteStrainPressure {
    type Input = PressureQuadraturePoint;
    /// The normal derivative is part of the input.
    type Tangent = ();

    fn variable(&self) -> Field {
        Field::Displacement(self.component)
    }

    fn residual(&self, input: &Self::Input, test: &ShapeFunction) -> f64 {
        let amplification = input.load_parameter.unwrap_or(1.0);
        amplification * input.pressure * input.normal.n[[self.component.index()]] * test.value
    }

    /// The load parameter is a scalar unknown without shape function; its block ignores `trial`.
    fn jacobian(
        &self,
        input: &Self::Input,
        _tangent: &Self::Tangent,
        test: &ShapeFunction,
        trial: &ShapeFunction,
        trial_field: Field,
    ) -> f64 {
        let c = self.component.index();
        match trial_field {
            Field::Displacement(j) => {
                let amplification = input.load_parameter.unwrap_or(1.0);
                let dn: f64 = (0..3)
                    .map(|big_k| input.normal.dn_df[[c, j.index(), big_k]] * trial.gradient[[big_k]])
                    .sum();
                amplification * input.pressure * dn * test.value
            }
            Field::LoadParameter if input.load_parameter.is_some() => {
                input.pressure * input.normal.n[[c]] * test.value
            }
            _ => 0.0,
        }
    }
}
