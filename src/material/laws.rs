//! Constitutive laws shipped with the crate.
use crate::material::{
    AlgorithmicModuli, ConstitutiveResponse, DeformationIncrement, GradientEnhancedHypoElasticIncrement,
    GradientEnhancedHypoElasticLaw, GradientEnhancedHypoElasticLawOutput, GradientEnhancedMicropolarLaw,
    HypoElasticIncrement, HypoElasticLaw, HypoElasticLawOutput, MicropolarLawOutput, TangentMode, TimeIncrement,
};
use crate::ConfigurationError;
use gemicro_tensor::{einsum, levi_civita, Tensor1, Tensor2, Tensor3, Tensor4};
use nalgebra::{Matrix6, Vector6};
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LameParameters {
    pub mu: f64,
    pub lambda: f64,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct YoungPoisson {
    pub young: f64,
    pub poisson: f64,
}

impl YoungPoisson {
    fn validate(&self) -> Result<(), ConfigurationError> {
        require("young", self.young > 0.0, "must be positive")?;
        require("poisson", self.poisson > -1.0 && self.poisson < 0.5, "must lie in (-1, 0.5)")
    }
}

impl From<YoungPoisson> for LameParameters {
    fn from(params: YoungPoisson) -> Self {
        let YoungPoisson { young, poisson } = params;
        let mu = 0.5 * young / (1.0 + poisson);
        let lambda = 2.0 * mu * poisson / (1.0 - 2.0 * poisson);
        Self { mu, lambda }
    }
}

/// Exponential softening `ω(κ) = 1 - exp(-(κ - κ₀)/κ_f)` for `κ > κ₀`, zero otherwise.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExponentialDamage {
    pub kappa_0: f64,
    pub kappa_f: f64,
}

impl ExponentialDamage {
    fn validate(&self) -> Result<(), ConfigurationError> {
        require("kappa_0", self.kappa_0 >= 0.0, "must be non-negative")?;
        require("kappa_f", self.kappa_f > 0.0, "must be positive")
    }

    /// Returns `(ω, dω/dκ)`.
    pub fn evaluate(&self, kappa: f64) -> (f64, f64) {
        if kappa <= self.kappa_0 {
            (0.0, 0.0)
        } else {
            let remaining = (-(kappa - self.kappa_0) / self.kappa_f).exp();
            (1.0 - remaining, remaining / self.kappa_f)
        }
    }

    /// Updates the history variable `κ = max(κ_old, N)` and returns `(κ, ω, dω/dN)`.
    fn update(&self, kappa_old: f64, nonlocal: f64) -> (f64, f64, f64) {
        if nonlocal > kappa_old {
            let (omega, domega_dkappa) = self.evaluate(nonlocal);
            (nonlocal, omega, domega_dkappa)
        } else {
            let (omega, _) = self.evaluate(kappa_old);
            (kappa_old, omega, 0.0)
        }
    }
}

fn require(name: &str, condition: bool, reason: &str) -> Result<(), ConfigurationError> {
    if condition {
        Ok(())
    } else {
        Err(ConfigurationError::InvalidParameter {
            name: name.to_string(),
            reason: reason.to_string(),
        })
    }
}

fn check_parameter_count(law: &str, parameters: &[f64], expected: usize) -> Result<(), ConfigurationError> {
    if parameters.len() == expected {
        Ok(())
    } else {
        Err(ConfigurationError::DimensionMismatch {
            context: format!("number of parameters of {law}"),
            expected,
            actual: parameters.len(),
        })
    }
}

/// Isotropic stiffness in Voigt notation, for strains with engineering shear.
pub fn isotropic_voigt_stiffness(lame: &LameParameters) -> Matrix6<f64> {
    let &LameParameters { mu, lambda } = lame;
    let mut c = Matrix6::zeros();
    for i in 0..3 {
        for j in 0..3 {
            c[(i, j)] = lambda;
        }
        c[(i, i)] += 2.0 * mu;
        c[(i + 3, i + 3)] = mu;
    }
    c
}

fn row_major(matrix: &Matrix6<f64>) -> [f64; 36] {
    let mut entries = [0.0; 36];
    for i in 0..6 {
        for j in 0..6 {
            entries[6 * i + j] = matrix[(i, j)];
        }
    }
    entries
}

/// Linear elastic Cosserat continuum with isotropic exponential damage.
///
/// Parameters, in order: `[E, ν, μ_c, ℓ, r, κ₀, κ_f]`, where `μ_c` is the Cosserat coupling
/// modulus, `ℓ` the bending length and `r` the nonlocal radius.
///
/// With the Cosserat strain `ε = (F - I) + ε·W` (the alternating tensor contracted with `W`), the
/// effective stresses are
/// `S_eff = λ tr(ε) I + (μ + μ_c) ε + (μ - μ_c) εᵀ` and `M_eff = 2 μ ℓ² (∇W)ᵀ`, so that the
/// first index of `M` is the face index.
/// The nonlocal field `N` drives the history `κ = max(κ_old, N)`, and the nominal stresses are
/// `(1 - ω(κ))` times the effective ones. The local damage driver is `L = sym(ε) : sym(ε)`.
///
/// State: `[κ]`.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LinearElasticMicropolarDamage {
    pub lame: LameParameters,
    pub mu_c: f64,
    pub bending_length: f64,
    pub nonlocal_radius: f64,
    pub damage: ExponentialDamage,
}

impl LinearElasticMicropolarDamage {
    pub const NUM_PARAMETERS: usize = 7;

    pub fn from_parameters(parameters: &[f64]) -> Result<Self, ConfigurationError> {
        check_parameter_count("LinearElasticMicropolarDamage", parameters, Self::NUM_PARAMETERS)?;
        let young_poisson = YoungPoisson {
            young: parameters[0],
            poisson: parameters[1],
        };
        young_poisson.validate()?;
        let damage = ExponentialDamage {
            kappa_0: parameters[5],
            kappa_f: parameters[6],
        };
        damage.validate()?;
        let law = Self {
            lame: young_poisson.into(),
            mu_c: parameters[2],
            bending_length: parameters[3],
            nonlocal_radius: parameters[4],
            damage,
        };
        require("mu_c", law.mu_c >= 0.0, "must be non-negative")?;
        require("bending_length", law.bending_length >= 0.0, "must be non-negative")?;
        require("nonlocal_radius", law.nonlocal_radius >= 0.0, "must be non-negative")?;
        Ok(law)
    }

    /// `C_ijkl = ∂S_eff_ij/∂ε_kl`.
    pub fn elasticity_tensor(&self) -> Tensor4<f64> {
        let LameParameters { mu, lambda } = self.lame;
        let delta = |a: usize, b: usize| if a == b { 1.0 } else { 0.0 };
        Tensor4::from_fn(|[i, j, k, l]| {
            lambda * delta(i, j) * delta(k, l)
                + (mu + self.mu_c) * delta(i, k) * delta(j, l)
                + (mu - self.mu_c) * delta(j, k) * delta(i, l)
        })
    }

    fn bending_modulus(&self) -> f64 {
        2.0 * self.lame.mu * self.bending_length.powi(2)
    }
}

impl GradientEnhancedMicropolarLaw for LinearElasticMicropolarDamage {
    fn number_of_state_variables(&self) -> usize {
        1
    }

    fn initialize_state(&self, state: &mut [f64]) {
        state[0] = self.damage.kappa_0;
    }

    #[allow(non_snake_case)]
    fn compute_response(
        &self,
        state: &mut [f64],
        increment: &DeformationIncrement,
        _time: &TimeIncrement,
        mode: TangentMode,
    ) -> MicropolarLawOutput {
        if !(increment.f_new.determinant() > 0.0) {
            return MicropolarLawOutput {
                response: ConstitutiveResponse::default(),
                moduli: None,
                suggested_timestep_factor: 0.5,
            };
        }

        let LameParameters { mu, lambda } = self.lame;
        let I = Tensor2::<f64>::identity();
        let eps = levi_civita::<f64>();
        let eps_W: Tensor2<f64> = einsum!("ijk,k->ij", &eps, &increment.w_new);
        let strain = increment.f_new - I + eps_W;
        let S_eff = I * (lambda * strain.trace()) + strain * (mu + self.mu_c) + strain.transpose() * (mu - self.mu_c);
        let M_eff = increment.grad_w_new.transpose() * self.bending_modulus();

        let (kappa, omega, domega_dn) = self.damage.update(state[0], increment.nonlocal_new);
        state[0] = kappa;
        let integrity = 1.0 - omega;

        let strain_sym = strain.symmetric_part();
        let response = ConstitutiveResponse {
            stress: S_eff * integrity,
            couple_stress: M_eff * integrity,
            local_damage: strain_sym.contract_all(&strain_sym),
            nonlocal_radius: self.nonlocal_radius,
        };

        let moduli = match mode {
            TangentMode::Residual => None,
            TangentMode::Jacobian => {
                let C = self.elasticity_tensor();
                let C_eps: Tensor3<f64> = einsum!("ijmn,mnk->ijk", &C, &eps);
                let bending = self.bending_modulus() * integrity;
                Some(AlgorithmicModuli {
                    ds_df: C * integrity,
                    ds_dw: C_eps * integrity,
                    ds_dgrad_w: Tensor4::zeros(),
                    ds_dn: S_eff * -domega_dn,
                    dm_df: Tensor4::zeros(),
                    dm_dw: Tensor3::zeros(),
                    dm_dgrad_w: Tensor4::from_fn(|[i, j, k, l]| if j == k && i == l { bending } else { 0.0 }),
                    dm_dn: M_eff * -domega_dn,
                    // sym(ε·W) vanishes, hence L depends on F only
                    dl_df: strain_sym * 2.0,
                    dl_dw: Tensor1::zeros(),
                    dl_dgrad_w: Tensor2::zeros(),
                    dl_dn: 0.0,
                })
            }
        };

        MicropolarLawOutput {
            response,
            moduli,
            suggested_timestep_factor: 1.0,
        }
    }
}

/// Small-strain isotropic linear elasticity, parameters `[E, ν]`.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LinearElastic {
    pub lame: LameParameters,
}

impl LinearElastic {
    pub const NUM_PARAMETERS: usize = 2;

    pub fn from_parameters(parameters: &[f64]) -> Result<Self, ConfigurationError> {
        check_parameter_count("LinearElastic", parameters, Self::NUM_PARAMETERS)?;
        let young_poisson = YoungPoisson {
            young: parameters[0],
            poisson: parameters[1],
        };
        young_poisson.validate()?;
        Ok(Self {
            lame: young_poisson.into(),
        })
    }
}

impl HypoElasticLaw for LinearElastic {
    fn number_of_state_variables(&self) -> usize {
        0
    }

    fn compute_stress(
        &self,
        stress: &mut Vector6<f64>,
        _state: &mut [f64],
        increment: &HypoElasticIncrement,
    ) -> HypoElasticLawOutput {
        let c = isotropic_voigt_stiffness(&self.lame);
        *stress += c * increment.strain_increment;
        HypoElasticLawOutput {
            tangent: row_major(&c),
            suggested_timestep_factor: 1.0,
        }
    }
}

/// Small-strain linear elasticity with exponential damage driven by a nonlocal field.
///
/// Parameters, in order: `[E, ν, r, κ₀, κ_f]`. The local damage driver is the normalized
/// effective stress norm `L = σ_eff : σ_eff / E²`.
///
/// State: `[κ, σ_eff (Voigt, 6 entries)]`.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GradientEnhancedLinearElasticDamage {
    pub young_poisson: YoungPoisson,
    pub nonlocal_radius: f64,
    pub damage: ExponentialDamage,
}

impl GradientEnhancedLinearElasticDamage {
    pub const NUM_PARAMETERS: usize = 5;

    pub fn from_parameters(parameters: &[f64]) -> Result<Self, ConfigurationError> {
        check_parameter_count("GradientEnhancedLinearElasticDamage", parameters, Self::NUM_PARAMETERS)?;
        let young_poisson = YoungPoisson {
            young: parameters[0],
            poisson: parameters[1],
        };
        young_poisson.validate()?;
        let damage = ExponentialDamage {
            kappa_0: parameters[3],
            kappa_f: parameters[4],
        };
        damage.validate()?;
        require("nonlocal_radius", parameters[2] >= 0.0, "must be non-negative")?;
        Ok(Self {
            young_poisson,
            nonlocal_radius: parameters[2],
            damage,
        })
    }
}

impl GradientEnhancedHypoElasticLaw for GradientEnhancedLinearElasticDamage {
    fn number_of_state_variables(&self) -> usize {
        7
    }

    fn initialize_state(&self, state: &mut [f64]) {
        state[0] = self.damage.kappa_0;
    }

    fn compute_stress(
        &self,
        stress: &mut Vector6<f64>,
        state: &mut [f64],
        increment: &GradientEnhancedHypoElasticIncrement,
    ) -> GradientEnhancedHypoElasticLawOutput {
        let c = isotropic_voigt_stiffness(&self.young_poisson.into());
        let mut effective_stress = Vector6::from_column_slice(&state[1..7]);
        effective_stress += c * increment.strain_increment;
        state[1..7].copy_from_slice(effective_stress.as_slice());

        let nonlocal = increment.nonlocal_old + increment.nonlocal_increment;
        let (kappa, omega, domega_dn) = self.damage.update(state[0], nonlocal);
        state[0] = kappa;
        *stress = effective_stress * (1.0 - omega);

        // Shear entries appear twice in the tensor contraction σ : σ
        let weights = Vector6::new(1.0, 1.0, 1.0, 2.0, 2.0, 2.0);
        let young_squared = self.young_poisson.young.powi(2);
        let dl_dstress = effective_stress.component_mul(&weights) * (2.0 / young_squared);

        GradientEnhancedHypoElasticLawOutput {
            tangent: row_major(&(c * (1.0 - omega))),
            local_damage: effective_stress.dot(&effective_stress.component_mul(&weights)) / young_squared,
            nonlocal_radius: self.nonlocal_radius,
            dl_dstrain: c.transpose() * dl_dstress,
            dstress_dnonlocal: effective_stress * -domega_dn,
            suggested_timestep_factor: 1.0,
        }
    }
}
