//! The narrow interface to constitutive laws.
//!
//! Laws are opaque objects holding immutable parameters. They receive their state vector as a
//! mutable buffer for the duration of a single call and never own it, which keeps a single law
//! instance shareable across threads.
use gemicro_tensor::{Tensor1, Tensor2, Tensor3, Tensor4};
use nalgebra::Vector6;
use serde::{Deserialize, Serialize};

pub mod laws;
pub mod registry;

pub use registry::MaterialRegistry;

/// Identifies a constitutive law by its registered name and holds its parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialSpec {
    pub name: String,
    #[serde(default)]
    pub parameters: Vec<f64>,
}

impl MaterialSpec {
    pub fn new(name: impl Into<String>, parameters: impl Into<Vec<f64>>) -> Self {
        Self {
            name: name.into(),
            parameters: parameters.into(),
        }
    }
}

/// Whether the consistent tangent is required in addition to the response.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TangentMode {
    Residual,
    Jacobian,
}

/// Time at the start of an increment together with the increment size.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeIncrement {
    /// Step time and total time at the start of the increment.
    pub time_old: [f64; 2],
    pub dt: f64,
}

impl TimeIncrement {
    /// An increment starting at `time` for both step and total time.
    pub fn new(time: f64, dt: f64) -> Self {
        Self {
            time_old: [time, time],
            dt,
        }
    }

    /// Total time at the end of the increment.
    pub fn total_time_new(&self) -> f64 {
        self.time_old[1] + self.dt
    }
}

/// Kinematic quantities of a quadrature point at the start and end of an increment.
///
/// `grad_w[[i, J]] = ∂W_i/∂X_J` is the microrotation gradient with respect to the reference
/// configuration.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DeformationIncrement {
    pub f_old: Tensor2<f64>,
    pub f_new: Tensor2<f64>,
    pub w_old: Tensor1<f64>,
    pub w_new: Tensor1<f64>,
    pub grad_w_old: Tensor2<f64>,
    pub grad_w_new: Tensor2<f64>,
    pub nonlocal_new: f64,
}

impl DeformationIncrement {
    /// An increment starting from the undeformed state.
    pub fn from_undeformed(f_new: Tensor2<f64>, w_new: Tensor1<f64>, grad_w_new: Tensor2<f64>, nonlocal_new: f64) -> Self {
        Self {
            f_old: Tensor2::identity(),
            f_new,
            w_old: Tensor1::zeros(),
            w_new,
            grad_w_old: Tensor2::zeros(),
            grad_w_new,
            nonlocal_new,
        }
    }
}

/// Kirchhoff-type response of a micropolar law in the current configuration.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct ConstitutiveResponse {
    pub stress: Tensor2<f64>,
    pub couple_stress: Tensor2<f64>,
    /// The local quantity driving the nonlocal damage field.
    pub local_damage: f64,
    pub nonlocal_radius: f64,
}

/// First derivatives of stress `S`, couple stress `M` and local damage driver `L` with respect to
/// `F`, `W`, `∇W` and the nonlocal field `N`.
///
/// The index order follows the defining partial derivative, e.g.
/// `ds_df[[i, j, k, L]] = ∂S_ij/∂F_kL` and `dm_dw[[i, j, k]] = ∂M_ij/∂W_k`.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct AlgorithmicModuli {
    pub ds_df: Tensor4<f64>,
    pub ds_dw: Tensor3<f64>,
    pub ds_dgrad_w: Tensor4<f64>,
    pub ds_dn: Tensor2<f64>,
    pub dm_df: Tensor4<f64>,
    pub dm_dw: Tensor3<f64>,
    pub dm_dgrad_w: Tensor4<f64>,
    pub dm_dn: Tensor2<f64>,
    pub dl_df: Tensor2<f64>,
    pub dl_dw: Tensor1<f64>,
    pub dl_dgrad_w: Tensor2<f64>,
    pub dl_dn: f64,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MicropolarLawOutput {
    pub response: ConstitutiveResponse,
    /// Present if and only if the law was called with [`TangentMode::Jacobian`].
    pub moduli: Option<AlgorithmicModuli>,
    /// A factor below `1.0` requests a smaller time increment.
    pub suggested_timestep_factor: f64,
}

/// A finite-strain gradient-enhanced micropolar constitutive law.
pub trait GradientEnhancedMicropolarLaw: Send + Sync {
    fn number_of_state_variables(&self) -> usize;

    /// Initializes a zeroed state buffer.
    fn initialize_state(&self, state: &mut [f64]) {
        let _ = state;
    }

    /// Integrates the law over the increment, updating `state` in place.
    ///
    /// On entry `state` holds the state at the start of the increment.
    fn compute_response(
        &self,
        state: &mut [f64],
        increment: &DeformationIncrement,
        time: &TimeIncrement,
        mode: TangentMode,
    ) -> MicropolarLawOutput;
}

/// Small-strain increment handed to hypoelastic laws.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct HypoElasticIncrement {
    /// Voigt strain increment with engineering shear components.
    pub strain_increment: Vector6<f64>,
    pub characteristic_length: f64,
    pub time: TimeIncrement,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct HypoElasticLawOutput {
    /// Row-major Voigt tangent `∂σ/∂ε`.
    pub tangent: [f64; 36],
    pub suggested_timestep_factor: f64,
}

/// A small-strain law advancing a Voigt stress by a strain increment.
pub trait HypoElasticLaw: Send + Sync {
    fn number_of_state_variables(&self) -> usize;

    fn initialize_state(&self, state: &mut [f64]) {
        let _ = state;
    }

    /// Advances `stress` (Voigt) in place.
    fn compute_stress(
        &self,
        stress: &mut Vector6<f64>,
        state: &mut [f64],
        increment: &HypoElasticIncrement,
    ) -> HypoElasticLawOutput;
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GradientEnhancedHypoElasticIncrement {
    pub strain_increment: Vector6<f64>,
    pub nonlocal_old: f64,
    pub nonlocal_increment: f64,
    pub characteristic_length: f64,
    pub time: TimeIncrement,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GradientEnhancedHypoElasticLawOutput {
    /// Row-major Voigt tangent `∂σ/∂ε`.
    pub tangent: [f64; 36],
    pub local_damage: f64,
    pub nonlocal_radius: f64,
    /// `∂L/∂ε` with respect to the Voigt strain.
    pub dl_dstrain: Vector6<f64>,
    /// `∂σ/∂N` in Voigt notation.
    pub dstress_dnonlocal: Vector6<f64>,
    pub suggested_timestep_factor: f64,
}

/// A small-strain law coupled to a nonlocal damage field.
pub trait GradientEnhancedHypoElasticLaw: Send + Sync {
    fn number_of_state_variables(&self) -> usize;

    fn initialize_state(&self, state: &mut [f64]) {
        let _ = state;
    }

    fn compute_stress(
        &self,
        stress: &mut Vector6<f64>,
        state: &mut [f64],
        increment: &GradientEnhancedHypoElasticIncrement,
    ) -> GradientEnhancedHypoElasticLawOutput;
}
