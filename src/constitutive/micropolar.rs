//! Evaluation of finite-strain gradient-enhanced micropolar laws.
//!
//! Laws respond with Kirchhoff-type stresses `S` and `M`. The adapter pulls them back to the
//! reference configuration, `P_Ij = F⁻¹_Ii S_ij`, computes the Kirchhoff moment
//! `m_l = ε_ijl S_ij` and transforms all derivatives consistently.
use crate::kinematics::invert_deformation_gradient;
use crate::material::{
    AlgorithmicModuli, ConstitutiveResponse, DeformationIncrement, GradientEnhancedMicropolarLaw, MaterialRegistry,
    MaterialSpec, TangentMode, TimeIncrement,
};
use crate::state::{ElementStates, MaterialPointStates};
use crate::{ConfigurationError, RecoverableFailure};
use gemicro_tensor::{einsum, inverse_derivative, levi_civita, Tensor1, Tensor2, Tensor3, Tensor4};
use log::warn;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MicropolarMaterialParameters {
    pub material: MaterialSpec,
    #[serde(default)]
    pub use_displaced_mesh: bool,
}

/// Reference-configuration response at a quadrature point.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct MicropolarResponse {
    pub pk_i_stress: Tensor2<f64>,
    pub pk_i_couple_stress: Tensor2<f64>,
    pub kirchhoff_moment: Tensor1<f64>,
    pub local_damage: f64,
    pub nonlocal_radius: f64,
}

/// Derivatives of a quantity with respect to `F`, `W`, `∇W` and the nonlocal field `N`, in that
/// order of fields and with the differentiation indices appended last.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Derivatives<DF, DW, DGW, DN> {
    pub d_df: DF,
    pub d_dw: DW,
    pub d_dgrad_w: DGW,
    pub d_dn: DN,
}

pub type PkiDerivatives = Derivatives<Tensor4<f64>, Tensor3<f64>, Tensor4<f64>, Tensor2<f64>>;
pub type MomentDerivatives = Derivatives<Tensor3<f64>, Tensor2<f64>, Tensor3<f64>, Tensor1<f64>>;
pub type LocalDamageDerivatives = Derivatives<Tensor2<f64>, Tensor1<f64>, Tensor2<f64>, f64>;

/// Consistent tangent of a [`MicropolarResponse`].
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct MicropolarTangent {
    pub pk_i_stress: PkiDerivatives,
    pub pk_i_couple_stress: PkiDerivatives,
    pub kirchhoff_moment: MomentDerivatives,
    pub local_damage: LocalDamageDerivatives,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MicropolarEvaluation {
    pub response: MicropolarResponse,
    /// Present if evaluated with [`TangentMode::Jacobian`].
    pub tangent: Option<MicropolarTangent>,
}

/// A gradient-enhanced micropolar material backed by an exclusively owned law instance.
pub struct GradientEnhancedMicropolarMaterial {
    name: String,
    law: Box<dyn GradientEnhancedMicropolarLaw>,
}

impl std::fmt::Debug for GradientEnhancedMicropolarMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GradientEnhancedMicropolarMaterial")
            .field("name", &self.name)
            .field("number_of_state_variables", &self.law.number_of_state_variables())
            .finish()
    }
}

impl GradientEnhancedMicropolarMaterial {
    pub fn new(registry: &MaterialRegistry, params: &MicropolarMaterialParameters) -> eyre::Result<Self> {
        if params.use_displaced_mesh {
            return Err(ConfigurationError::DisplacedMesh {
                object: "GradientEnhancedMicropolarMaterial".to_string(),
            }
            .into());
        }
        let law = registry.create_micropolar_law(&params.material)?;
        Ok(Self {
            name: params.material.name.clone(),
            law,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn number_of_state_variables(&self) -> usize {
        self.law.number_of_state_variables()
    }

    /// Creates empty state storage sized for this material.
    pub fn create_state_storage(&self) -> MaterialPointStates {
        MaterialPointStates::new(self.number_of_state_variables())
    }

    /// Zeroes `state` and lets the law initialize it.
    pub fn initialize_state(&self, state: &mut [f64]) {
        state.fill(0.0);
        self.law.initialize_state(state);
    }

    /// Evaluates the material at one quadrature point.
    ///
    /// `state_current` is overwritten with the state at the end of the increment. On failure,
    /// `state_current` is left equal to `state_old`, or untouched if the deformation gradient is
    /// rejected before the law is called.
    pub fn compute(
        &self,
        state_old: &[f64],
        state_current: &mut [f64],
        increment: &DeformationIncrement,
        time: &TimeIncrement,
        mode: TangentMode,
    ) -> Result<MicropolarEvaluation, RecoverableFailure> {
        let num_states = self.number_of_state_variables();
        assert_eq!(state_old.len(), num_states, "Old state has wrong length");
        assert_eq!(state_current.len(), num_states, "Current state has wrong length");

        let (f_inv, _) = invert_deformation_gradient(&increment.f_new).map_err(|failure| {
            warn!("Material {}: {}", self.name, failure);
            failure
        })?;

        state_current.copy_from_slice(state_old);
        let output = self.law.compute_response(state_current, increment, time, mode);

        if output.suggested_timestep_factor < 1.0 {
            state_current.copy_from_slice(state_old);
            let failure = RecoverableFailure::TimestepReduction {
                material: self.name.clone(),
                factor: output.suggested_timestep_factor,
            };
            warn!("{}", failure);
            return Err(failure);
        }

        let tangent = match mode {
            TangentMode::Residual => None,
            TangentMode::Jacobian => {
                let moduli = output.moduli.as_ref().unwrap_or_else(|| {
                    panic!("Material {} did not provide moduli in Jacobian mode", self.name)
                });
                Some(pull_back_tangent(&f_inv, &output.response, moduli))
            }
        };

        Ok(MicropolarEvaluation {
            response: pull_back_response(&f_inv, &output.response),
            tangent,
        })
    }

    /// Evaluates all quadrature points of an element, stopping at the first failure.
    pub fn compute_element(
        &self,
        states: &mut ElementStates,
        increments: &[DeformationIncrement],
        time: &TimeIncrement,
        mode: TangentMode,
    ) -> Result<Vec<MicropolarEvaluation>, RecoverableFailure> {
        assert_eq!(
            increments.len(),
            states.num_points(),
            "Number of increments must match number of quadrature points"
        );
        increments
            .iter()
            .enumerate()
            .map(|(qp, increment)| {
                let (old, current) = states.point_mut(qp);
                self.compute(old, current, increment, time, mode)
            })
            .collect()
    }

    /// Evaluates all elements in parallel.
    ///
    /// `increments[e]` holds the increments of the quadrature points of element `e`; elements
    /// without quadrature points are skipped. States are created at first touch. Returns the
    /// evaluations ordered by element.
    pub fn compute_all(
        &self,
        states: &mut MaterialPointStates,
        increments: &[Vec<DeformationIncrement>],
        time: &TimeIncrement,
        mode: TangentMode,
    ) -> Result<Vec<(usize, Vec<MicropolarEvaluation>)>, RecoverableFailure> {
        for (element, element_increments) in increments.iter().enumerate() {
            if !element_increments.is_empty() {
                states.element_mut(element, element_increments.len(), |state| self.initialize_state(state));
            }
        }

        states
            .par_elements_mut()
            .filter(|(element, _)| increments.get(*element).map_or(false, |inc| !inc.is_empty()))
            .map(|(element, element_states)| {
                self.compute_element(element_states, &increments[element], time, mode)
                    .map(|evaluations| (element, evaluations))
            })
            .collect()
    }
}

fn pull_back_response(f_inv: &Tensor2<f64>, response: &ConstitutiveResponse) -> MicropolarResponse {
    let eps = levi_civita::<f64>();
    MicropolarResponse {
        pk_i_stress: einsum!("Ii,ij->Ij", f_inv, &response.stress),
        pk_i_couple_stress: einsum!("Ii,ij->Ij", f_inv, &response.couple_stress),
        kirchhoff_moment: einsum!("ijl,ij->l", &eps, &response.stress),
        local_damage: response.local_damage,
        nonlocal_radius: response.nonlocal_radius,
    }
}

/// Derivatives of `F⁻¹ X` for a Kirchhoff-type tensor `X` with the given derivatives.
fn pull_back_derivatives(
    f_inv: &Tensor2<f64>,
    df_inv_df: &Tensor4<f64>,
    x: &Tensor2<f64>,
    dx_df: &Tensor4<f64>,
    dx_dw: &Tensor3<f64>,
    dx_dgrad_w: &Tensor4<f64>,
    dx_dn: &Tensor2<f64>,
) -> PkiDerivatives {
    let material: Tensor4<f64> = einsum!("Ii,ijkK->IjkK", f_inv, dx_df);
    let geometric: Tensor4<f64> = einsum!("IikK,ij->IjkK", df_inv_df, x);
    Derivatives {
        d_df: material + geometric,
        d_dw: einsum!("Ii,ijk->Ijk", f_inv, dx_dw),
        d_dgrad_w: einsum!("Ii,ijkK->IjkK", f_inv, dx_dgrad_w),
        d_dn: einsum!("Ii,ij->Ij", f_inv, dx_dn),
    }
}

fn pull_back_tangent(
    f_inv: &Tensor2<f64>,
    response: &ConstitutiveResponse,
    moduli: &AlgorithmicModuli,
) -> MicropolarTangent {
    let df_inv_df = inverse_derivative(f_inv);
    let eps = levi_civita::<f64>();
    MicropolarTangent {
        pk_i_stress: pull_back_derivatives(
            f_inv,
            &df_inv_df,
            &response.stress,
            &moduli.ds_df,
            &moduli.ds_dw,
            &moduli.ds_dgrad_w,
            &moduli.ds_dn,
        ),
        pk_i_couple_stress: pull_back_derivatives(
            f_inv,
            &df_inv_df,
            &response.couple_stress,
            &moduli.dm_df,
            &moduli.dm_dw,
            &moduli.dm_dgrad_w,
            &moduli.dm_dn,
        ),
        kirchhoff_moment: Derivatives {
            d_df: einsum!("ijl,ijkK->lkK", &eps, &moduli.ds_df),
            d_dw: einsum!("ijl,ijk->lk", &eps, &moduli.ds_dw),
            d_dgrad_w: einsum!("ijl,ijkK->lkK", &eps, &moduli.ds_dgrad_w),
            d_dn: einsum!("ijl,ij->l", &eps, &moduli.ds_dn),
        },
        local_damage: Derivatives {
            d_df: moduli.dl_df,
            d_dw: moduli.dl_dw,
            d_dgrad_w: moduli.dl_dgrad_w,
            d_dn: moduli.dl_dn,
        },
    }
}
