//! Indirect displacement control.
//!
//! The simulation is driven by a load parameter `l` and the constraint `Σ c_i u_i = l · step`,
//! where the `u_i` are displacement degrees of freedom and `step` is the current time or a
//! function of it.
use crate::bcs::SpaceTimeFunction;
use crate::ConfigurationError;
use gemicro_tensor::Tensor1;
use serde::{Deserialize, Serialize};

fn evaluate_step(function: &Option<SpaceTimeFunction>, time: f64) -> f64 {
    function
        .as_ref()
        .map_or(time, |f| f(time, &Tensor1::zeros()))
}

fn default_normalize_load() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PenaltyIndirectDisplacementControlParameters {
    pub primary_node_set: Option<String>,
    pub secondary_node_set: Option<String>,
    pub penalty: f64,
    /// Divide the penalty by the number of primary nodes.
    #[serde(default = "default_normalize_load")]
    pub normalize_load: bool,
    /// One coefficient per secondary node.
    pub c_vector: Vec<f64>,
    pub l: f64,
}

/// Side of a nodal constraint a residual contribution belongs to.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ConstraintSide {
    Primary,
    Secondary,
}

/// Blocks of a nodal constraint Jacobian, named `<residual side><variable side>`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ConstraintJacobianBlock {
    PrimaryPrimary,
    PrimarySecondary,
    SecondarySecondary,
    SecondaryPrimary,
}

/// Penalty enforcement of indirect displacement control as a nodal constraint between secondary
/// (constrained) nodes and primary nodes.
#[derive(Clone)]
pub struct PenaltyIndirectDisplacementControl {
    load_factor: f64,
    c_vector: Vec<f64>,
    l: f64,
    share_per_secondary_node: f64,
    function: Option<SpaceTimeFunction>,
}

impl std::fmt::Debug for PenaltyIndirectDisplacementControl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PenaltyIndirectDisplacementControl")
            .field("load_factor", &self.load_factor)
            .field("c_vector", &self.c_vector)
            .field("l", &self.l)
            .field("share_per_secondary_node", &self.share_per_secondary_node)
            .finish()
    }
}

impl PenaltyIndirectDisplacementControl {
    pub fn new(
        params: &PenaltyIndirectDisplacementControlParameters,
        num_primary_nodes: usize,
        num_secondary_nodes: usize,
    ) -> eyre::Result<Self> {
        for (name, node_set) in [
            ("primary_node_set", &params.primary_node_set),
            ("secondary_node_set", &params.secondary_node_set),
        ] {
            if node_set.is_none() {
                return Err(ConfigurationError::InvalidParameter {
                    name: name.to_string(),
                    reason: "must be specified".to_string(),
                }
                .into());
            }
        }
        if params.c_vector.len() != num_secondary_nodes {
            return Err(ConfigurationError::DimensionMismatch {
                context: "c_vector length of PenaltyIndirectDisplacementControl".to_string(),
                expected: num_secondary_nodes,
                actual: params.c_vector.len(),
            }
            .into());
        }
        if num_primary_nodes == 0 || num_secondary_nodes == 0 {
            return Err(ConfigurationError::InvalidParameter {
                name: "node sets".to_string(),
                reason: "primary and secondary node sets must not be empty".to_string(),
            }
            .into());
        }

        let mut load_factor = params.penalty;
        if params.normalize_load {
            load_factor /= num_primary_nodes as f64;
        }

        Ok(Self {
            load_factor,
            c_vector: params.c_vector.clone(),
            l: params.l,
            share_per_secondary_node: 1.0 / num_secondary_nodes as f64,
            function: None,
        })
    }

    pub fn with_function(mut self, function: SpaceTimeFunction) -> Self {
        self.function = Some(function);
        self
    }

    pub fn load_factor(&self) -> f64 {
        self.load_factor
    }

    /// `f(t)` if a function is given, `t` otherwise.
    pub fn step(&self, time: f64) -> f64 {
        evaluate_step(&self.function, time)
    }

    /// Residual for the secondary node with the given index.
    pub fn residual(&self, side: ConstraintSide, secondary_node: usize, u_secondary: f64, time: f64) -> f64 {
        match side {
            ConstraintSide::Primary => {
                self.load_factor
                    * (self.c_vector[secondary_node] * u_secondary
                        - self.step(time) * self.l * self.share_per_secondary_node)
            }
            ConstraintSide::Secondary => 0.0,
        }
    }

    pub fn jacobian(&self, block: ConstraintJacobianBlock, secondary_node: usize) -> f64 {
        match block {
            ConstraintJacobianBlock::PrimarySecondary => self.load_factor * self.c_vector[secondary_node],
            _ => 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndirectDisplacementControlParameters {
    /// Coefficients ordered node-major: `c[node · n_variables + variable]`.
    pub c_vector: Vec<f64>,
    pub l: f64,
}

/// Scalar equation `Σ_node Σ_var c[node · n_var + var] u_var(node) - l · step = 0` for the load
/// parameter.
#[derive(Clone)]
pub struct IndirectDisplacementControlScalarKernel {
    constrained_variables: Vec<usize>,
    num_constrained_nodes: usize,
    c_vector: Vec<f64>,
    l: f64,
    function: Option<SpaceTimeFunction>,
}

impl std::fmt::Debug for IndirectDisplacementControlScalarKernel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndirectDisplacementControlScalarKernel")
            .field("constrained_variables", &self.constrained_variables)
            .field("num_constrained_nodes", &self.num_constrained_nodes)
            .field("c_vector", &self.c_vector)
            .field("l", &self.l)
            .finish()
    }
}

impl IndirectDisplacementControlScalarKernel {
    pub fn new(
        params: &IndirectDisplacementControlParameters,
        constrained_variables: Vec<usize>,
        num_constrained_nodes: usize,
    ) -> eyre::Result<Self> {
        let expected = num_constrained_nodes * constrained_variables.len();
        if params.c_vector.len() != expected {
            return Err(ConfigurationError::DimensionMismatch {
                context: "c vector does not match total number of constrained dofs".to_string(),
                expected,
                actual: params.c_vector.len(),
            }
            .into());
        }
        Ok(Self {
            constrained_variables,
            num_constrained_nodes,
            c_vector: params.c_vector.clone(),
            l: params.l,
            function: None,
        })
    }

    pub fn with_function(mut self, function: SpaceTimeFunction) -> Self {
        self.function = Some(function);
        self
    }

    pub fn step(&self, time: f64) -> f64 {
        evaluate_step(&self.function, time)
    }

    /// Residual of the scalar equation.
    ///
    /// `values[var][node]` holds the value of the `var`-th constrained variable at a constrained
    /// node.
    pub fn residual(&self, time: f64, values: &[&[f64]]) -> f64 {
        let n_vars = self.constrained_variables.len();
        assert_eq!(values.len(), n_vars, "One value slice per constrained variable required");
        for var_values in values {
            assert_eq!(
                var_values.len(),
                self.num_constrained_nodes,
                "One value per constrained node required"
            );
        }
        let mut residual = -self.l * self.step(time);
        for node in 0..self.num_constrained_nodes {
            for (var, var_values) in values.iter().enumerate() {
                residual += self.c_vector[node * n_vars + var] * var_values[node];
            }
        }
        residual
    }

    /// Derivative with respect to the load parameter itself.
    pub fn diagonal_jacobian(&self) -> f64 {
        0.0
    }

    /// Derivatives with respect to the values of a constrained variable at all constrained nodes.
    pub fn off_diagonal_jacobian(&self, variable: usize) -> Result<Vec<f64>, ConfigurationError> {
        let var = self
            .constrained_variables
            .iter()
            .position(|&v| v == variable)
            .ok_or(ConfigurationError::UnknownVariable { variable })?;
        let n_vars = self.constrained_variables.len();
        Ok((0..self.num_constrained_nodes)
            .map(|node| self.c_vector[node * n_vars + var])
            .collect())
    }
}
