//! Field tags used to dispatch Jacobian blocks.
use crate::ConfigurationError;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::{Display, Formatter};

/// A spatial component in three dimensions, validated to `{0, 1, 2}`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct Component(usize);

impl Component {
    pub const X: Self = Self(0);
    pub const Y: Self = Self(1);
    pub const Z: Self = Self(2);

    pub fn new(index: usize) -> Result<Self, ConfigurationError> {
        if index < 3 {
            Ok(Self(index))
        } else {
            Err(ConfigurationError::InvalidComponent { component: index })
        }
    }

    pub fn index(self) -> usize {
        self.0
    }

    pub fn all() -> [Self; 3] {
        [Self::X, Self::Y, Self::Z]
    }
}

impl TryFrom<usize> for Component {
    type Error = ConfigurationError;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        Self::new(index)
    }
}

impl From<Component> for usize {
    fn from(component: Component) -> Self {
        component.0
    }
}

impl Display for Component {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The primary fields of the gradient-enhanced micropolar formulation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Field {
    Displacement(Component),
    MicroRotation(Component),
    NonlocalDamage,
    /// A scalar load amplification parameter, e.g. the unknown of indirect displacement control.
    LoadParameter,
}

/// Maps host variable numbers to fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldMap {
    fields: FxHashMap<usize, Field>,
}

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns `field` to the host variable `variable`, returning the previous assignment.
    pub fn insert(&mut self, variable: usize, field: Field) -> Option<Field> {
        self.fields.insert(variable, field)
    }

    pub fn with_field(mut self, variable: usize, field: Field) -> Self {
        self.insert(variable, field);
        self
    }

    /// Returns the field associated with a host variable number.
    ///
    /// An unmapped variable is a configuration error.
    pub fn field(&self, variable: usize) -> Result<Field, ConfigurationError> {
        self.fields
            .get(&variable)
            .copied()
            .ok_or(ConfigurationError::UnknownVariable { variable })
    }

    /// Reverse lookup: the host variable number of a field, if mapped.
    pub fn variable(&self, field: Field) -> Option<usize> {
        self.fields
            .iter()
            .find_map(|(&variable, &f)| (f == field).then_some(variable))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
