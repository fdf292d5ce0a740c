use crate::bcs::SpaceTimeFunction;
use gemicro_tensor::Tensor1;
use log::info;
use std::fmt;
use std::fmt::{Debug, Formatter};

/// Dirichlet condition `u = offset + f(t, x)`, where the per-node offset can be reset to the
/// current boundary value at discrete points in time.
pub struct FunctionDirichletIncrementalBc {
    function: SpaceTimeFunction,
    /// Remaining reset times, in ascending order.
    reset_times: Vec<f64>,
    offsets: Vec<f64>,
}

impl Debug for FunctionDirichletIncrementalBc {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionDirichletIncrementalBc")
            .field("reset_times", &self.reset_times)
            .field("offsets", &self.offsets)
            .finish()
    }
}

impl FunctionDirichletIncrementalBc {
    pub fn new(function: SpaceTimeFunction, mut reset_times: Vec<f64>) -> Self {
        reset_times.sort_by(f64::total_cmp);
        Self {
            function,
            reset_times,
            offsets: Vec::new(),
        }
    }

    pub fn reset_times(&self) -> &[f64] {
        &self.reset_times
    }

    pub fn offsets(&self) -> &[f64] {
        &self.offsets
    }

    /// Sets the offsets to the current boundary values.
    pub fn initial_setup(&mut self, current_values: &[f64]) {
        self.offsets = current_values.to_vec();
    }

    /// Consumes all reset times `≤ time` and, if there were any, resets the offsets to the current
    /// boundary values.
    pub fn residual_setup(&mut self, time: f64, current_values: &[f64]) {
        let num_passed = self.reset_times.partition_point(|&t| t <= time);
        if num_passed > 0 {
            self.reset_times.drain(..num_passed);
            self.offsets = current_values.to_vec();
            info!("Setting offset for incremental Dirichlet condition to current boundary value at t = {time}");
        }
    }

    /// Prescribed value at a boundary node.
    ///
    /// # Panics
    ///
    /// Panics if `node` has no offset, i.e. is out of bounds of the values passed to the setup
    /// methods.
    pub fn value(&self, node: usize, time: f64, position: &Tensor1<f64>) -> f64 {
        self.offsets[node] + (self.function)(time, position)
    }

    /// Nodal residual `u - value`.
    pub fn residual(&self, node: usize, time: f64, position: &Tensor1<f64>, u: f64) -> f64 {
        u - self.value(node, time, position)
    }
}
