//! Tensor with a shared gradient cell

use super::BackwardOp;
use ndarray::Array1;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Shared gradient storage; clones of a tensor point at the same cell.
pub type GradCell = Rc<RefCell<Option<Array1<f32>>>>;

/// Flat `f32` tensor participating in reverse-mode differentiation.
///
/// Batches are stored row-major; operations that care about shape
/// (matmul, row sums, broadcasts) take their dimensions explicitly.
#[derive(Clone)]
pub struct Tensor {
    data: Array1<f32>,
    grad: GradCell,
    requires_grad: bool,
    backward_op: Option<Rc<dyn BackwardOp>>,
}

impl Tensor {
    /// Create a tensor from an array
    pub fn new(data: Array1<f32>, requires_grad: bool) -> Self {
        Self { data, grad: Rc::new(RefCell::new(None)), requires_grad, backward_op: None }
    }

    /// Create a tensor from a vector
    pub fn from_vec(data: Vec<f32>, requires_grad: bool) -> Self {
        Self::new(Array1::from(data), requires_grad)
    }

    /// Tensor of zeros
    pub fn zeros(len: usize, requires_grad: bool) -> Self {
        Self::new(Array1::zeros(len), requires_grad)
    }

    /// Tensor of ones
    pub fn ones(len: usize, requires_grad: bool) -> Self {
        Self::new(Array1::ones(len), requires_grad)
    }

    /// Tensor filled with a constant
    pub fn full(len: usize, value: f32, requires_grad: bool) -> Self {
        Self::new(Array1::from_elem(len, value), requires_grad)
    }

    pub fn data(&self) -> &Array1<f32> {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut Array1<f32> {
        &mut self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// First element; the value of a scalar loss
    pub fn item(&self) -> f32 {
        self.data.first().copied().unwrap_or(0.0)
    }

    pub fn requires_grad(&self) -> bool {
        self.requires_grad
    }

    /// Toggle gradient tracking for this tensor instance
    pub fn set_requires_grad(&mut self, requires_grad: bool) {
        self.requires_grad = requires_grad;
    }

    /// Current gradient, if any has been accumulated
    pub fn grad(&self) -> Option<Array1<f32>> {
        self.grad.borrow().clone()
    }

    pub fn set_grad(&self, grad: Array1<f32>) {
        *self.grad.borrow_mut() = Some(grad);
    }

    /// Drop the accumulated gradient
    pub fn zero_grad(&self) {
        *self.grad.borrow_mut() = None;
    }

    /// Add into the gradient cell
    pub fn accumulate_grad(&self, grad: Array1<f32>) {
        let mut cell = self.grad.borrow_mut();
        match cell.as_mut() {
            Some(existing) => *existing += &grad,
            None => *cell = Some(grad),
        }
    }

    pub fn grad_cell(&self) -> GradCell {
        Rc::clone(&self.grad)
    }

    pub fn backward_op(&self) -> Option<Rc<dyn BackwardOp>> {
        self.backward_op.clone()
    }

    pub fn set_backward_op(&mut self, op: Rc<dyn BackwardOp>) {
        self.backward_op = Some(op);
    }

    /// Copy of the data cut off from the graph
    pub fn detach(&self) -> Self {
        Self::new(self.data.clone(), false)
    }

    /// Independent leaf with the same data and tracking flag and its own gradient cell
    pub fn copy_leaf(&self) -> Self {
        Self::new(self.data.clone(), self.requires_grad)
    }

    /// Identity of the gradient cell, shared by all clones of this node
    pub(crate) fn node_id(&self) -> usize {
        Rc::as_ptr(&self.grad) as *const () as usize
    }
}

impl fmt::Debug for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tensor")
            .field("data", &self.data)
            .field("requires_grad", &self.requires_grad)
            .field("has_grad", &self.grad.borrow().is_some())
            .field("has_backward_op", &self.backward_op.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr1;

    #[test]
    fn test_clones_share_gradient() {
        let a = Tensor::from_vec(vec![1.0, 2.0], true);
        let b = a.clone();
        b.set_grad(arr1(&[0.5, 0.5]));
        assert_eq!(a.grad(), Some(arr1(&[0.5, 0.5])));
        assert_eq!(a.node_id(), b.node_id());
    }

    #[test]
    fn test_accumulate_grad_adds() {
        let a = Tensor::zeros(2, true);
        a.accumulate_grad(arr1(&[1.0, 2.0]));
        a.accumulate_grad(arr1(&[1.0, 2.0]));
        assert_eq!(a.grad(), Some(arr1(&[2.0, 4.0])));
        a.zero_grad();
        assert!(a.grad().is_none());
    }

    #[test]
    fn test_detach_breaks_sharing() {
        let a = Tensor::from_vec(vec![3.0], true);
        let d = a.detach();
        assert!(!d.requires_grad());
        assert_ne!(a.node_id(), d.node_id());
        assert_eq!(d.item(), 3.0);
    }

    #[test]
    fn test_copy_leaf_keeps_flag_not_cell() {
        let a = Tensor::from_vec(vec![1.0], true);
        let b = a.copy_leaf();
        assert!(b.requires_grad());
        b.set_grad(arr1(&[3.0]));
        assert!(a.grad().is_none());
    }

    #[test]
    fn test_toggle_requires_grad() {
        let mut a = Tensor::ones(3, true);
        a.set_requires_grad(false);
        assert!(!a.requires_grad());
        assert_eq!(Tensor::full(2, 7.0, false).data(), &arr1(&[7.0, 7.0]));
    }
}
