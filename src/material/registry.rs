//! Name-based construction of constitutive laws.
use crate::material::laws::{GradientEnhancedLinearElasticDamage, LinearElastic, LinearElasticMicropolarDamage};
use crate::material::{GradientEnhancedHypoElasticLaw, GradientEnhancedMicropolarLaw, HypoElasticLaw, MaterialSpec};
use crate::ConfigurationError;
use log::debug;
use rustc_hash::FxHashMap;
use std::fmt;
use std::fmt::{Debug, Formatter};

type Constructor<L> = Box<dyn Fn(&[f64]) -> Result<Box<L>, ConfigurationError> + Send + Sync>;

/// Constructors of one family of laws, keyed by name.
struct LawFamily<L: ?Sized> {
    family: &'static str,
    constructors: FxHashMap<String, Constructor<L>>,
}

impl<L: ?Sized> LawFamily<L> {
    fn new(family: &'static str) -> Self {
        Self {
            family,
            constructors: FxHashMap::default(),
        }
    }

    fn register(&mut self, name: String, constructor: Constructor<L>) {
        debug!("Registering {} law '{}'", self.family, name);
        self.constructors.insert(name, constructor);
    }

    fn create(&self, spec: &MaterialSpec) -> eyre::Result<Box<L>> {
        let constructor = self
            .constructors
            .get(&spec.name)
            .ok_or_else(|| ConfigurationError::UnknownMaterial {
                name: spec.name.clone(),
            })?;
        debug!(
            "Instantiating {} law '{}' with {} parameters",
            self.family,
            spec.name,
            spec.parameters.len()
        );
        let law = constructor(&spec.parameters).map_err(|err| ConfigurationError::MaterialInstantiation {
            name: spec.name.clone(),
            reason: err.to_string(),
        })?;
        Ok(law)
    }

    fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.constructors.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// Maps law names to constructors, one map per law family.
///
/// The registry is an ordinary value: create one (typically with
/// [`with_builtin_laws`](Self::with_builtin_laws)) and pass it by reference to whatever needs to
/// instantiate materials.
pub struct MaterialRegistry {
    micropolar: LawFamily<dyn GradientEnhancedMicropolarLaw>,
    hypoelastic: LawFamily<dyn HypoElasticLaw>,
    gradient_enhanced_hypoelastic: LawFamily<dyn GradientEnhancedHypoElasticLaw>,
}

impl Default for MaterialRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for MaterialRegistry {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("MaterialRegistry")
            .field("micropolar", &self.micropolar.names())
            .field("hypoelastic", &self.hypoelastic.names())
            .field("gradient_enhanced_hypoelastic", &self.gradient_enhanced_hypoelastic.names())
            .finish()
    }
}

impl MaterialRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            micropolar: LawFamily::new("micropolar"),
            hypoelastic: LawFamily::new("hypoelastic"),
            gradient_enhanced_hypoelastic: LawFamily::new("gradient-enhanced hypoelastic"),
        }
    }

    /// A registry containing the laws shipped with this crate.
    pub fn with_builtin_laws() -> Self {
        let mut registry = Self::new();
        registry
            .register_micropolar_law("LinearElasticMicropolarDamage", |parameters| {
                Ok(Box::new(LinearElasticMicropolarDamage::from_parameters(parameters)?))
            })
            .register_hypoelastic_law("LinearElastic", |parameters| {
                Ok(Box::new(LinearElastic::from_parameters(parameters)?))
            })
            .register_gradient_enhanced_hypoelastic_law("GradientEnhancedLinearElasticDamage", |parameters| {
                Ok(Box::new(GradientEnhancedLinearElasticDamage::from_parameters(parameters)?))
            });
        registry
    }

    pub fn register_micropolar_law<F>(&mut self, name: impl Into<String>, constructor: F) -> &mut Self
    where
        F: Fn(&[f64]) -> Result<Box<dyn GradientEnhancedMicropolarLaw>, ConfigurationError> + Send + Sync + 'static,
    {
        self.micropolar.register(name.into(), Box::new(constructor));
        self
    }

    pub fn register_hypoelastic_law<F>(&mut self, name: impl Into<String>, constructor: F) -> &mut Self
    where
        F: Fn(&[f64]) -> Result<Box<dyn HypoElasticLaw>, ConfigurationError> + Send + Sync + 'static,
    {
        self.hypoelastic.register(name.into(), Box::new(constructor));
        self
    }

    pub fn register_gradient_enhanced_hypoelastic_law<F>(&mut self, name: impl Into<String>, constructor: F) -> &mut Self
    where
        F: Fn(&[f64]) -> Result<Box<dyn GradientEnhancedHypoElasticLaw>, ConfigurationError>
            + Send
            + Sync
            + 'static,
    {
        self.gradient_enhanced_hypoelastic
            .register(name.into(), Box::new(constructor));
        self
    }

    pub fn create_micropolar_law(&self, spec: &MaterialSpec) -> eyre::Result<Box<dyn GradientEnhancedMicropolarLaw>> {
        self.micropolar.create(spec)
    }

    pub fn create_hypoelastic_law(&self, spec: &MaterialSpec) -> eyre::Result<Box<dyn HypoElasticLaw>> {
        self.hypoelastic.create(spec)
    }

    pub fn create_gradient_enhanced_hypoelastic_law(
        &self,
        spec: &MaterialSpec,
    ) -> eyre::Result<Box<dyn GradientEnhancedHypoElasticLaw>> {
        self.gradient_enhanced_hypoelastic.create(spec)
    }

    /// Sorted names of the registered micropolar laws.
    pub fn micropolar_law_names(&self) -> Vec<&str> {
        self.micropolar.names()
    }

    pub fn hypoelastic_law_names(&self) -> Vec<&str> {
        self.hypoelastic.names()
    }

    pub fn gradient_enhanced_hypoelastic_law_names(&self) -> Vec<&str> {
        self.gradient_enhanced_hypoelastic.names()
    }
}
