//! Instantiation of complete kernel sets from serializable descriptions.
//!
//! The host numbers its variables; a setup resolves variable names through that numbering, checks
//! the configuration and hands back named kernels together with the [`FieldMap`] they need for
//! off-diagonal Jacobians.
use crate::bcs::{FiniteStrainPressure, FiniteStrainPressureParameters, SpaceTimeFunction};
use crate::constitutive::{GradientEnhancedMicropolarMaterial, MicropolarMaterialParameters};
use crate::field::{Component, Field, FieldMap};
use crate::kernels::{KirchhoffMoment, MicropolarDamage, PkiDivergence, PkiTensor};
use crate::kinematics::DeformedBoundaryNormal;
use crate::material::{MaterialRegistry, MaterialSpec};
use crate::ConfigurationError;
use itertools::izip;
use log::info;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Host variable numbering, keyed by variable name.
pub type VariableNumbering = FxHashMap<String, usize>;

fn lookup(variables: &VariableNumbering, name: &str) -> Result<usize, ConfigurationError> {
    variables
        .get(name)
        .copied()
        .ok_or_else(|| ConfigurationError::InvalidParameter {
            name: name.to_string(),
            reason: "variable is not defined".to_string(),
        })
}

fn default_factor() -> f64 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MicropolarContinuumSetup {
    pub name: String,
    pub displacements: Vec<String>,
    pub micro_rotations: Vec<String>,
    pub nonlocal_damage: String,
    pub material: MaterialSpec,
    #[serde(default)]
    pub use_displaced_mesh: bool,
    #[serde(default)]
    pub block: Vec<String>,
}

/// A kernel together with the name it is registered under.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedKernel<K> {
    pub name: String,
    pub kernel: K,
}

impl<K> NamedKernel<K> {
    fn new(name: String, kernel: K) -> Self {
        Self { name, kernel }
    }
}

#[derive(Debug)]
pub struct MicropolarContinuum {
    pub material_name: String,
    pub material: GradientEnhancedMicropolarMaterial,
    pub pk_i_stress_divergence: Vec<NamedKernel<PkiDivergence>>,
    pub pk_i_couple_stress_divergence: Vec<NamedKernel<PkiDivergence>>,
    pub kirchhoff_moment: Vec<NamedKernel<KirchhoffMoment>>,
    pub nonlocal_damage: NamedKernel<MicropolarDamage>,
    pub fields: FieldMap,
    pub block: Vec<String>,
}

impl MicropolarContinuum {
    /// Names of all kernels in creation order.
    pub fn kernel_names(&self) -> Vec<&str> {
        self.pk_i_stress_divergence
            .iter()
            .map(|k| k.name.as_str())
            .chain(self.pk_i_couple_stress_divergence.iter().map(|k| k.name.as_str()))
            .chain(self.kirchhoff_moment.iter().map(|k| k.name.as_str()))
            .chain(std::iter::once(self.nonlocal_damage.name.as_str()))
            .collect()
    }
}

impl MicropolarContinuumSetup {
    pub fn build(&self, registry: &MaterialRegistry, variables: &VariableNumbering) -> eyre::Result<MicropolarContinuum> {
        for (context, names) in [("displacements", &self.displacements), ("micro_rotations", &self.micro_rotations)] {
            if names.len() != 3 {
                return Err(ConfigurationError::DimensionMismatch {
                    context: format!(
                        "{}: gradient-enhanced micropolar kernels are implemented only for 3D",
                        context
                    ),
                    expected: 3,
                    actual: names.len(),
                }
                .into());
            }
        }
        if self.use_displaced_mesh {
            return Err(ConfigurationError::DisplacedMesh {
                object: format!("micropolar continuum {}", self.name),
            }
            .into());
        }

        let mut fields = FieldMap::new();
        for (component, u, w) in izip!(Component::all(), &self.displacements, &self.micro_rotations) {
            fields.insert(lookup(variables, u)?, Field::Displacement(component));
            fields.insert(lookup(variables, w)?, Field::MicroRotation(component));
        }
        fields.insert(lookup(variables, &self.nonlocal_damage)?, Field::NonlocalDamage);

        let material_name = format!("{}_material", self.name);
        let material = GradientEnhancedMicropolarMaterial::new(
            registry,
            &MicropolarMaterialParameters {
                material: self.material.clone(),
                use_displaced_mesh: false,
            },
        )?;

        let mut pk_i_stress_divergence = Vec::with_capacity(3);
        let mut pk_i_couple_stress_divergence = Vec::with_capacity(3);
        let mut kirchhoff_moment = Vec::with_capacity(3);
        for i in 0..3 {
            pk_i_stress_divergence.push(NamedKernel::new(
                format!("{}_div_pki_stress_{}", self.name, i),
                PkiDivergence::new(i, PkiTensor::Stress)?,
            ));
            pk_i_couple_stress_divergence.push(NamedKernel::new(
                format!("{}_div_pki_couple_stress_{}", self.name, i),
                PkiDivergence::new(i, PkiTensor::CoupleStress)?,
            ));
            kirchhoff_moment.push(NamedKernel::new(
                format!("{}_kirchhoff_moment_{}", self.name, i),
                KirchhoffMoment::new(i)?,
            ));
        }
        let nonlocal_damage = NamedKernel::new(format!("{}_nonlocal_damage", self.name), MicropolarDamage);

        info!(
            "Set up micropolar continuum {} with material {} ({})",
            self.name, material_name, self.material.name
        );

        Ok(MicropolarContinuum {
            material_name,
            material,
            pk_i_stress_divergence,
            pk_i_couple_stress_divergence,
            kirchhoff_moment,
            nonlocal_damage,
            fields,
            block: self.block.clone(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FiniteStrainPressureSetup {
    pub name: String,
    pub boundary: Vec<String>,
    pub displacements: Vec<String>,
    #[serde(default = "default_factor")]
    pub factor: f64,
    #[serde(default)]
    pub hht_alpha: f64,
    #[serde(default)]
    pub use_displaced_mesh: bool,
    /// Scalar variable amplifying the pressure, if any.
    #[serde(default)]
    pub load_parameter: Option<String>,
}

#[derive(Debug, Clone)]
pub struct FiniteStrainPressureBoundary {
    pub normal: DeformedBoundaryNormal,
    pub pressures: Vec<NamedKernel<FiniteStrainPressure>>,
    pub fields: FieldMap,
    pub boundary: Vec<String>,
}

impl FiniteStrainPressureSetup {
    /// Builds one pressure condition per displacement component, all sharing `function`.
    pub fn build(
        &self,
        variables: &VariableNumbering,
        function: Option<SpaceTimeFunction>,
    ) -> eyre::Result<FiniteStrainPressureBoundary> {
        if self.displacements.is_empty() || self.displacements.len() > 3 {
            return Err(ConfigurationError::DimensionMismatch {
                context: format!("displacements of pressure {}", self.name),
                expected: 3,
                actual: self.displacements.len(),
            }
            .into());
        }
        let normal = DeformedBoundaryNormal::new(self.use_displaced_mesh)?;

        let mut fields = FieldMap::new();
        let mut pressures = Vec::with_capacity(self.displacements.len());
        for (i, displacement) in self.displacements.iter().enumerate() {
            let component = Component::new(i)?;
            fields.insert(lookup(variables, displacement)?, Field::Displacement(component));

            let params = FiniteStrainPressureParameters {
                component: i,
                factor: self.factor,
                hht_alpha: self.hht_alpha,
                use_displaced_mesh: self.use_displaced_mesh,
            };
            let mut pressure = FiniteStrainPressure::new(&params)?;
            if let Some(function) = &function {
                pressure = pressure.with_function(function.clone());
            }
            pressures.push(NamedKernel::new(format!("FiniteStrainPressure_{}_{}", self.name, i), pressure));
        }
        if let Some(load_parameter) = &self.load_parameter {
            fields.insert(lookup(variables, load_parameter)?, Field::LoadParameter);
        }

        Ok(FiniteStrainPressureBoundary {
            normal,
            pressures,
            fields,
            boundary: self.boundary.clone(),
        })
    }
}
