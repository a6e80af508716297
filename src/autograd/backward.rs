//! Reverse pass over the recorded graph

use super::Tensor;
use ndarray::Array1;
use std::collections::HashSet;

/// A recorded operation that knows how to push its output gradient to its inputs.
///
/// `backward` must only touch the direct inputs; traversal order is handled by
/// [`backward`](fn@backward).
pub trait BackwardOp {
    /// Propagate the output gradient into the inputs' gradient cells
    fn backward(&self);

    /// Inputs recorded by this operation
    fn inputs(&self) -> Vec<Tensor>;
}

/// Perform the backward pass from `tensor`.
///
/// The seed defaults to ones (a scalar loss gets gradient 1). Gradient cells of
/// intermediate nodes are cleared first, so calling `backward` several times on
/// graphs that share parameters accumulates only into the leaves.
pub fn backward(tensor: &Tensor, grad_output: Option<Array1<f32>>) {
    let seed = grad_output.unwrap_or_else(|| Array1::ones(tensor.len()));

    if tensor.backward_op().is_none() {
        if tensor.requires_grad() {
            tensor.accumulate_grad(seed);
        }
        return;
    }

    let order = topological_order(tensor);
    for node in &order {
        node.zero_grad();
    }
    tensor.set_grad(seed);

    for node in &order {
        if let Some(op) = node.backward_op() {
            op.backward();
        }
    }
}

/// Non-leaf nodes reachable from `root`, outputs before their inputs.
fn topological_order(root: &Tensor) -> Vec<Tensor> {
    let mut visited = HashSet::new();
    let mut post_order = Vec::new();
    // (node, inputs_expanded)
    let mut stack = vec![(root.clone(), false)];

    while let Some((node, expanded)) = stack.pop() {
        if expanded {
            post_order.push(node);
            continue;
        }
        if !visited.insert(node.node_id()) {
            continue;
        }
        let Some(op) = node.backward_op() else {
            continue;
        };
        stack.push((node, true));
        for input in op.inputs() {
            if input.backward_op().is_some() && !visited.contains(&input.node_id()) {
                stack.push((input, false));
            }
        }
    }

    post_order.reverse();
    post_order
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::autograd::{add, mul, sum};
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_shared_subexpression_counted_once() {
        // y = sum(h * h) with h = x + x  =>  dy/dx = 8x
        let x = Tensor::from_vec(vec![1.0, 2.0], true);
        let h = add(&x, &x);
        let y = sum(&mul(&h, &h));
        backward(&y, None);

        let grad = x.grad().unwrap();
        assert_abs_diff_eq!(grad[0], 8.0, epsilon = 1e-6);
        assert_abs_diff_eq!(grad[1], 16.0, epsilon = 1e-6);
    }

    #[test]
    fn test_leaves_accumulate_across_calls() {
        let x = Tensor::from_vec(vec![3.0], true);
        let y1 = sum(&mul(&x, &x));
        let y2 = sum(&x);
        backward(&y1, None);
        backward(&y2, None);
        assert_abs_diff_eq!(x.grad().unwrap()[0], 7.0, epsilon = 1e-6);
    }

    #[test]
    fn test_repeated_backward_on_same_graph() {
        let x = Tensor::from_vec(vec![2.0], true);
        let y = sum(&mul(&x, &x));
        backward(&y, None);
        backward(&y, None);
        // Intermediate cells are reset, leaves accumulate: 4 + 4
        assert_abs_diff_eq!(x.grad().unwrap()[0], 8.0, epsilon = 1e-6);
    }

    #[test]
    fn test_leaf_backward_seeds_itself() {
        let x = Tensor::from_vec(vec![1.0, 1.0], true);
        backward(&x, None);
        assert_eq!(x.grad().unwrap().to_vec(), vec![1.0, 1.0]);
    }
}
