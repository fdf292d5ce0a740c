//! Storage of constitutive state vectors per (element, quadrature point).
//!
//! Every quadrature point owns two buffers of the same fixed length: the *old* state, committed
//! at the end of the last accepted increment, and the *current* trial state written during the
//! ongoing increment. Elements are created at first touch.
use rayon::prelude::*;

/// Old and current state buffers of all quadrature points of one element.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementStates {
    state_len: usize,
    num_points: usize,
    old: Vec<f64>,
    current: Vec<f64>,
}

impl ElementStates {
    fn new(num_points: usize, state_len: usize, init: impl Fn(&mut [f64])) -> Self {
        let mut old = vec![0.0; num_points * state_len];
        for qp in 0..num_points {
            init(&mut old[qp * state_len..(qp + 1) * state_len]);
        }
        Self {
            state_len,
            num_points,
            current: old.clone(),
            old,
        }
    }

    pub fn num_points(&self) -> usize {
        self.num_points
    }

    pub fn state_len(&self) -> usize {
        self.state_len
    }

    /// Returns the old (read-only) and current (writable) state of a quadrature point.
    ///
    /// # Panics
    ///
    /// Panics if `qp` is out of bounds.
    pub fn point_mut(&mut self, qp: usize) -> (&[f64], &mut [f64]) {
        assert!(qp < self.num_points, "Quadrature point index out of bounds");
        let range = qp * self.state_len..(qp + 1) * self.state_len;
        (&self.old[range.clone()], &mut self.current[range])
    }

    /// Returns the old and current state of a quadrature point.
    pub fn point(&self, qp: usize) -> (&[f64], &[f64]) {
        assert!(qp < self.num_points, "Quadrature point index out of bounds");
        let range = qp * self.state_len..(qp + 1) * self.state_len;
        (&self.old[range.clone()], &self.current[range])
    }

    /// Accepts the current state as the new old state.
    pub fn commit(&mut self) {
        self.old.copy_from_slice(&self.current);
    }

    /// Discards the current state.
    pub fn reject(&mut self) {
        self.current.copy_from_slice(&self.old);
    }
}

/// State storage for all elements of a block, indexed by element number.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialPointStates {
    state_len: usize,
    elements: Vec<Option<ElementStates>>,
}

impl MaterialPointStates {
    pub fn new(state_len: usize) -> Self {
        Self {
            state_len,
            elements: Vec::new(),
        }
    }

    pub fn state_len(&self) -> usize {
        self.state_len
    }

    /// Returns the states of the given element, creating them at first touch.
    ///
    /// Newly created buffers are zeroed and passed to `init` once per quadrature point; the old and
    /// the current state both start out with the initialized values.
    ///
    /// # Panics
    ///
    /// Panics if the element already exists with a different number of quadrature points.
    pub fn element_mut(
        &mut self,
        element: usize,
        num_points: usize,
        init: impl Fn(&mut [f64]),
    ) -> &mut ElementStates {
        if element >= self.elements.len() {
            self.elements.resize_with(element + 1, || None);
        }
        let state_len = self.state_len;
        let states = self.elements[element].get_or_insert_with(|| ElementStates::new(num_points, state_len, init));
        assert_eq!(
            states.num_points(),
            num_points,
            "Number of quadrature points of element {} must not change",
            element
        );
        states
    }

    pub fn element(&self, element: usize) -> Option<&ElementStates> {
        self.elements.get(element).and_then(Option::as_ref)
    }

    pub fn contains_element(&self, element: usize) -> bool {
        self.element(element).is_some()
    }

    /// Destroys the states of an element, returning them if they existed.
    pub fn remove_element(&mut self, element: usize) -> Option<ElementStates> {
        self.elements.get_mut(element).and_then(Option::take)
    }

    /// Number of elements with allocated states.
    pub fn num_elements(&self) -> usize {
        self.elements.iter().flatten().count()
    }

    pub fn commit(&mut self) {
        self.par_elements_mut().for_each(|(_, states)| states.commit());
    }

    pub fn reject(&mut self) {
        self.par_elements_mut().for_each(|(_, states)| states.reject());
    }

    /// Iterates over `(element, states)` for all allocated elements.
    pub fn elements(&self) -> impl Iterator<Item = (usize, &ElementStates)> {
        self.elements
            .iter()
            .enumerate()
            .filter_map(|(element, states)| states.as_ref().map(|states| (element, states)))
    }

    /// Parallel iterator over `(element, states)` for all allocated elements.
    pub fn par_elements_mut(&mut self) -> impl ParallelIterator<Item = (usize, &mut ElementStates)> {
        self.elements
            .par_iter_mut()
            .enumerate()
            .filter_map(|(element, states)| states.as_mut().map(|states| (element, states)))
    }
}
