//! Small-strain adapters for hypoelastic laws.
//!
//! The Voigt stress is stored in the first six entries of the state vector of each quadrature
//! point, followed by the state variables of the law.
use crate::kernels::{ScalarFieldValue, SmallStrainQuadraturePoint, SmallStrainResponse, SmallStrainTangent};
use crate::material::{
    GradientEnhancedHypoElasticIncrement, GradientEnhancedHypoElasticLaw, HypoElasticIncrement, HypoElasticLaw,
    MaterialRegistry, MaterialSpec, TimeIncrement,
};
use crate::voigt::{
    tensor2_from_voigt, tensor2_from_voigt_derivative, tensor2_to_voigt, tensor4_from_voigt, ShearScaling,
    Tensor4FromVoigtOptions, VoigtLayout,
};
use crate::RecoverableFailure;
use gemicro_tensor::{Tensor2, Tensor4};
use log::warn;
use nalgebra::Vector6;

/// Number of state entries occupied by the Voigt stress.
pub const STRESS_STATE_LEN: usize = 6;

/// Small-strain response and tangent at a quadrature point.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SmallStrainEvaluation {
    pub response: SmallStrainResponse,
    pub tangent: SmallStrainTangent,
}

impl SmallStrainEvaluation {
    /// Kernel input for this evaluation, given the nonlocal damage field at the quadrature point.
    pub fn to_small_strain_point(&self, nonlocal_damage: ScalarFieldValue) -> SmallStrainQuadraturePoint {
        SmallStrainQuadraturePoint {
            response: self.response,
            nonlocal_damage,
        }
    }
}

fn split_state(state: &mut [f64]) -> (Vector6<f64>, &mut [f64]) {
    let (stress, law_state) = state.split_at_mut(STRESS_STATE_LEN);
    (Vector6::from_column_slice(stress), law_state)
}

fn tangent_from_voigt(tangent: &[f64; 36]) -> Tensor4<f64> {
    tensor4_from_voigt(tangent, VoigtLayout::RowMajor, Tensor4FromVoigtOptions::default())
}

/// Adapter for a [`HypoElasticLaw`].
pub struct HypoElasticMaterial {
    name: String,
    law: Box<dyn HypoElasticLaw>,
}

impl HypoElasticMaterial {
    pub fn new(registry: &MaterialRegistry, spec: &MaterialSpec) -> eyre::Result<Self> {
        Ok(Self {
            name: spec.name.clone(),
            law: registry.create_hypoelastic_law(spec)?,
        })
    }

    /// Length of the state vector including the stored stress.
    pub fn state_len(&self) -> usize {
        STRESS_STATE_LEN + self.law.number_of_state_variables()
    }

    pub fn initialize_state(&self, state: &mut [f64]) {
        state.fill(0.0);
        self.law.initialize_state(&mut state[STRESS_STATE_LEN..]);
    }

    /// Advances the stress by the symmetric part of `strain_increment`.
    pub fn compute(
        &self,
        state_old: &[f64],
        state_current: &mut [f64],
        strain_increment: &Tensor2<f64>,
        characteristic_length: f64,
        time: &TimeIncrement,
    ) -> Result<SmallStrainEvaluation, RecoverableFailure> {
        assert_eq!(state_old.len(), self.state_len(), "Old state has wrong length");
        state_current.copy_from_slice(state_old);

        let increment = HypoElasticIncrement {
            strain_increment: tensor2_to_voigt(strain_increment, ShearScaling::Engineering),
            characteristic_length,
            time: *time,
        };
        let (mut stress, law_state) = split_state(state_current);
        let output = self.law.compute_stress(&mut stress, law_state, &increment);

        if output.suggested_timestep_factor < 1.0 {
            state_current.copy_from_slice(state_old);
            warn!(
                "Material {} requests timestep reduction for strain increment {:?}",
                self.name,
                increment.strain_increment.as_slice()
            );
            return Err(RecoverableFailure::TimestepReduction {
                material: self.name.clone(),
                factor: output.suggested_timestep_factor,
            });
        }
        state_current[..STRESS_STATE_LEN].copy_from_slice(stress.as_slice());

        Ok(SmallStrainEvaluation {
            response: SmallStrainResponse {
                stress: tensor2_from_voigt(&stress, ShearScaling::None),
                local_damage: 0.0,
                nonlocal_radius: 0.0,
            },
            tangent: SmallStrainTangent {
                dstress_dstrain: tangent_from_voigt(&output.tangent),
                dstress_dnonlocal: Tensor2::zeros(),
                dl_dstrain: Tensor2::zeros(),
            },
        })
    }
}

/// Adapter for a [`GradientEnhancedHypoElasticLaw`].
pub struct GradientEnhancedHypoElasticMaterial {
    name: String,
    law: Box<dyn GradientEnhancedHypoElasticLaw>,
}

/// Nonlocal damage field at the start of the increment and its increment.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct NonlocalIncrement {
    pub old: f64,
    pub increment: f64,
}

impl GradientEnhancedHypoElasticMaterial {
    pub fn new(registry: &MaterialRegistry, spec: &MaterialSpec) -> eyre::Result<Self> {
        Ok(Self {
            name: spec.name.clone(),
            law: registry.create_gradient_enhanced_hypoelastic_law(spec)?,
        })
    }

    pub fn state_len(&self) -> usize {
        STRESS_STATE_LEN + self.law.number_of_state_variables()
    }

    pub fn initialize_state(&self, state: &mut [f64]) {
        state.fill(0.0);
        self.law.initialize_state(&mut state[STRESS_STATE_LEN..]);
    }

    pub fn compute(
        &self,
        state_old: &[f64],
        state_current: &mut [f64],
        strain_increment: &Tensor2<f64>,
        nonlocal: NonlocalIncrement,
        characteristic_length: f64,
        time: &TimeIncrement,
    ) -> Result<SmallStrainEvaluation, RecoverableFailure> {
        assert_eq!(state_old.len(), self.state_len(), "Old state has wrong length");
        state_current.copy_from_slice(state_old);

        let increment = GradientEnhancedHypoElasticIncrement {
            strain_increment: tensor2_to_voigt(strain_increment, ShearScaling::Engineering),
            nonlocal_old: nonlocal.old,
            nonlocal_increment: nonlocal.increment,
            characteristic_length,
            time: *time,
        };
        let (mut stress, law_state) = split_state(state_current);
        let output = self.law.compute_stress(&mut stress, law_state, &increment);

        if output.suggested_timestep_factor < 1.0 {
            state_current.copy_from_slice(state_old);
            warn!(
                "Material {} requests timestep reduction for strain increment {:?}",
                self.name,
                increment.strain_increment.as_slice()
            );
            return Err(RecoverableFailure::TimestepReduction {
                material: self.name.clone(),
                factor: output.suggested_timestep_factor,
            });
        }
        state_current[..STRESS_STATE_LEN].copy_from_slice(stress.as_slice());

        Ok(SmallStrainEvaluation {
            response: SmallStrainResponse {
                stress: tensor2_from_voigt(&stress, ShearScaling::None),
                local_damage: output.local_damage,
                nonlocal_radius: output.nonlocal_radius,
            },
            tangent: SmallStrainTangent {
                dstress_dstrain: tangent_from_voigt(&output.tangent),
                dstress_dnonlocal: tensor2_from_voigt(&output.dstress_dnonlocal, ShearScaling::None),
                dl_dstrain: tensor2_from_voigt_derivative(&output.dl_dstrain),
            },
        })
    }
}
