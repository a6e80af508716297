//! Matrix multiplication and transpose autograd operations
//!
//! Matrices are row-major and flattened; callers pass the dimensions.

use super::{record, tracks_grad};
use crate::autograd::{BackwardOp, GradCell, Tensor};
use crate::trace::{TraceStep, TRACER};
use ndarray::Array1;

/// Transpose a row-major matrix (rows x cols) to (cols x rows)
/// Uses cache-efficient blocked transpose for large matrices
#[inline]
pub fn transpose(data: &[f32], rows: usize, cols: usize) -> Vec<f32> {
    let mut transposed = vec![0.0f32; rows * cols];

    const BLOCK_SIZE: usize = 32;
    if rows >= BLOCK_SIZE && cols >= BLOCK_SIZE {
        for r_block in (0..rows).step_by(BLOCK_SIZE) {
            for c_block in (0..cols).step_by(BLOCK_SIZE) {
                let r_end = (r_block + BLOCK_SIZE).min(rows);
                let c_end = (c_block + BLOCK_SIZE).min(cols);
                for r in r_block..r_end {
                    for c in c_block..c_end {
                        transposed[c * rows + r] = data[r * cols + c];
                    }
                }
            }
        }
    } else {
        for r in 0..rows {
            for c in 0..cols {
                transposed[c * rows + r] = data[r * cols + c];
            }
        }
    }

    transposed
}

/// C = A @ B on raw slices, A is m×k and B is k×n
pub fn matmul_compute(a: &[f32], b: &[f32], m: usize, k: usize, n: usize) -> Vec<f32> {
    TRACER.span(TraceStep::Matmul, format!("{m}x{k}x{n}"), || {
        let mut c = vec![0.0f32; m * n];
        for i in 0..m {
            let row = &a[i * k..(i + 1) * k];
            let out = &mut c[i * n..(i + 1) * n];
            for (p, &a_ip) in row.iter().enumerate() {
                if a_ip == 0.0 {
                    continue;
                }
                let b_row = &b[p * n..(p + 1) * n];
                for (o, &b_pj) in out.iter_mut().zip(b_row) {
                    *o += a_ip * b_pj;
                }
            }
        }
        c
    })
}

fn contiguous(t: &Tensor) -> Vec<f32> {
    t.data().iter().copied().collect()
}

/// Matrix multiplication
///
/// Computes C = A @ B where:
/// - A is m×k (flattened to length m*k)
/// - B is k×n (flattened to length k*n)
/// - C is m×n (flattened to length m*n)
pub fn matmul(a: &Tensor, b: &Tensor, m: usize, k: usize, n: usize) -> Tensor {
    assert_eq!(a.len(), m * k, "Matrix A size mismatch");
    assert_eq!(b.len(), k * n, "Matrix B size mismatch");

    let data = matmul_compute(&contiguous(a), &contiguous(b), m, k, n);
    let mut result = Tensor::new(Array1::from(data), tracks_grad(&[a, b]));
    if result.requires_grad() {
        let op = MatmulBackward { a: a.clone(), b: b.clone(), m, k, n, result_grad: result.grad_cell() };
        record(&mut result, op);
    }
    result
}

struct MatmulBackward {
    a: Tensor,
    b: Tensor,
    m: usize,
    k: usize,
    n: usize,
    result_grad: GradCell,
}

impl BackwardOp for MatmulBackward {
    fn backward(&self) {
        if let Some(grad_output) = self.result_grad.borrow().as_ref() {
            let grad_c: Vec<f32> = grad_output.iter().copied().collect();

            if self.a.requires_grad() {
                // ∂L/∂A = ∂L/∂C @ B^T  (m×n) @ (n×k)
                let b_t = transpose(&contiguous(&self.b), self.k, self.n);
                let grad_a = matmul_compute(&grad_c, &b_t, self.m, self.n, self.k);
                self.a.accumulate_grad(Array1::from(grad_a));
            }

            if self.b.requires_grad() {
                // ∂L/∂B = A^T @ ∂L/∂C  (k×m) @ (m×n)
                let a_t = transpose(&contiguous(&self.a), self.m, self.k);
                let grad_b = matmul_compute(&a_t, &grad_c, self.k, self.m, self.n);
                self.b.accumulate_grad(Array1::from(grad_b));
            }
        }
    }

    fn inputs(&self) -> Vec<Tensor> {
        vec![self.a.clone(), self.b.clone()]
    }
}

/// Differentiable transpose of a rows×cols matrix
pub fn transpose_tensor(a: &Tensor, rows: usize, cols: usize) -> Tensor {
    assert_eq!(a.len(), rows * cols, "transpose: size mismatch");
    let data = transpose(&contiguous(a), rows, cols);
    let mut result = Tensor::new(Array1::from(data), tracks_grad(&[a]));
    if result.requires_grad() {
        let op = TransposeBackward { a: a.clone(), rows, cols, result_grad: result.grad_cell() };
        record(&mut result, op);
    }
    result
}

struct TransposeBackward {
    a: Tensor,
    rows: usize,
    cols: usize,
    result_grad: GradCell,
}

impl BackwardOp for TransposeBackward {
    fn backward(&self) {
        if let Some(grad) = self.result_grad.borrow().as_ref() {
            if self.a.requires_grad() {
                let grad: Vec<f32> = grad.iter().copied().collect();
                // The output is cols×rows; transpose back
                self.a.accumulate_grad(Array1::from(transpose(&grad, self.cols, self.rows)));
            }
        }
    }

    fn inputs(&self) -> Vec<Tensor> {
        vec![self.a.clone()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::autograd::{backward, sum};

    #[test]
    fn test_transpose_2x3() {
        // [1, 2, 3]
        // [4, 5, 6]
        let data = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        assert_eq!(transpose(&data, 2, 3), vec![1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);
    }

    #[test]
    fn test_transpose_blocked_roundtrip() {
        let data: Vec<f32> = (0..40 * 33).map(|i| i as f32).collect();
        let back = transpose(&transpose(&data, 40, 33), 33, 40);
        assert_eq!(back, data);
    }

    #[test]
    fn test_matmul_compute_2x3_3x2() {
        let a = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let b = vec![7.0, 8.0, 9.0, 10.0, 11.0, 12.0];
        assert_eq!(matmul_compute(&a, &b, 2, 3, 2), vec![58.0, 64.0, 139.0, 154.0]);
    }

    #[test]
    fn test_matmul_backward() {
        // A = [[1, 2]], B = [[3], [4]]; sum(A@B) = 11
        let a = Tensor::from_vec(vec![1.0, 2.0], true);
        let b = Tensor::from_vec(vec![3.0, 4.0], true);
        let c = sum(&matmul(&a, &b, 1, 2, 1));
        assert_eq!(c.item(), 11.0);
        backward(&c, None);
        assert_eq!(a.grad().unwrap().to_vec(), vec![3.0, 4.0]);
        assert_eq!(b.grad().unwrap().to_vec(), vec![1.0, 2.0]);
    }

    #[test]
    fn test_transpose_tensor_backward() {
        let a = Tensor::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], true);
        let t = transpose_tensor(&a, 2, 3);
        let weights = Tensor::from_vec(vec![1.0, 0.0, 0.0, 0.0, 0.0, 2.0], false);
        let y = sum(&crate::autograd::mul(&t, &weights));
        // t = [1,4,2,5,3,6]; y = 1 + 12
        assert_eq!(y.item(), 13.0);
        backward(&y, None);
        assert_eq!(a.grad().unwrap().to_vec(), vec![1.0, 0.0, 0.0, 0.0, 0.0, 2.0]);
    }
}
