//! Residual and Jacobian contributions per quadrature point.
//!
//! A kernel contributes to the residual of one [`Field`] (its [`variable`]) and provides the
//! Jacobian entries with respect to every trial field. The host loops over quadrature points and
//! test/trial function pairs, multiplies with `JxW` and assembles.
//!
//! [`variable`]: QuadraturePointKernel::variable
use crate::constitutive::{MicropolarResponse, MicropolarTangent};
use crate::field::{Field, FieldMap};
use crate::ConfigurationError;
use gemicro_tensor::{Tensor1, Tensor2, Tensor4};

pub mod implicit_damage;
pub mod kirchhoff_moment;
pub mod micropolar_damage;
pub mod pki_divergence;
pub mod stress_divergence;

pub use implicit_damage::ImplicitGradientEnhancedDamage;
pub use kirchhoff_moment::KirchhoffMoment;
pub use micropolar_damage::MicropolarDamage;
pub use pki_divergence::{PkiDivergence, PkiTensor};
pub use stress_divergence::StressDivergence;

/// Value and reference gradient of a test or trial function at a quadrature point.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct ShapeFunction {
    pub value: f64,
    pub gradient: Tensor1<f64>,
}

impl ShapeFunction {
    pub fn new(value: f64, gradient: Tensor1<f64>) -> Self {
        Self { value, gradient }
    }
}

/// Value and reference gradient of a scalar field at a quadrature point.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct ScalarFieldValue {
    pub value: f64,
    pub gradient: Tensor1<f64>,
}

/// Input of the finite-strain micropolar kernels.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct MicropolarQuadraturePoint {
    pub response: MicropolarResponse,
    pub nonlocal_damage: ScalarFieldValue,
}

/// Small-strain response, produced by the hypoelastic adapters.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct SmallStrainResponse {
    /// Cauchy stress.
    pub stress: Tensor2<f64>,
    pub local_damage: f64,
    pub nonlocal_radius: f64,
}

#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct SmallStrainTangent {
    /// `∂σ_ij/∂ε_kl`.
    pub dstress_dstrain: Tensor4<f64>,
    /// `∂σ_ij/∂N`.
    pub dstress_dnonlocal: Tensor2<f64>,
    /// `∂L/∂ε_kl`.
    pub dl_dstrain: Tensor2<f64>,
}

/// Input of the small-strain kernels.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct SmallStrainQuadraturePoint {
    pub response: SmallStrainResponse,
    pub nonlocal_damage: ScalarFieldValue,
}

/// A weak-form contribution evaluated at a single quadrature point.
pub trait QuadraturePointKernel {
    type Input;
    type Tangent;

    /// The field whose residual this kernel contributes to.
    fn variable(&self) -> Field;

    fn residual(&self, input: &Self::Input, test: &ShapeFunction) -> f64;

    /// Derivative of the residual with respect to the coefficient of `trial` in `trial_field`.
    ///
    /// Fields the kernel does not couple to yield zero.
    fn jacobian(
        &self,
        input: &Self::Input,
        tangent: &Self::Tangent,
        test: &ShapeFunction,
        trial: &ShapeFunction,
        trial_field: Field,
    ) -> f64;

    /// The diagonal block, i.e. the Jacobian with respect to [`variable`](Self::variable).
    fn diagonal_jacobian(
        &self,
        input: &Self::Input,
        tangent: &Self::Tangent,
        test: &ShapeFunction,
        trial: &ShapeFunction,
    ) -> f64 {
        self.jacobian(input, tangent, test, trial, self.variable())
    }

    /// The Jacobian with respect to a host variable number, resolved through `fields`.
    fn jacobian_for_variable(
        &self,
        input: &Self::Input,
        tangent: &Self::Tangent,
        test: &ShapeFunction,
        trial: &ShapeFunction,
        variable: usize,
        fields: &FieldMap,
    ) -> Result<f64, ConfigurationError> {
        let field = fields.field(variable)?;
        Ok(self.jacobian(input, tangent, test, trial, field))
    }
}
