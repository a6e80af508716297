//! Row-wise operations over flattened batches: broadcast, row sums, gathers

use super::{record, tracks_grad};
use crate::autograd::{BackwardOp, GradCell, Tensor};
use ndarray::Array1;

/// Repeat a length-`cols` vector `rows` times (bias broadcast)
pub fn broadcast_rows(a: &Tensor, rows: usize) -> Tensor {
    let cols = a.len();
    let mut data = Vec::with_capacity(rows * cols);
    for _ in 0..rows {
        data.extend(a.data().iter().copied());
    }
    let mut result = Tensor::from_vec(data, tracks_grad(&[a]));
    if result.requires_grad() {
        let op = BroadcastRowsBackward { a: a.clone(), rows, result_grad: result.grad_cell() };
        record(&mut result, op);
    }
    result
}

struct BroadcastRowsBackward {
    a: Tensor,
    rows: usize,
    result_grad: GradCell,
}

impl BackwardOp for BroadcastRowsBackward {
    fn backward(&self) {
        if let Some(grad) = self.result_grad.borrow().as_ref() {
            if self.a.requires_grad() {
                let cols = self.a.len();
                let mut grad_a = Array1::zeros(cols);
                for r in 0..self.rows {
                    for c in 0..cols {
                        grad_a[c] += grad[r * cols + c];
                    }
                }
                self.a.accumulate_grad(grad_a);
            }
        }
    }

    fn inputs(&self) -> Vec<Tensor> {
        vec![self.a.clone()]
    }
}

/// Sum each row of a rows×cols matrix, giving `rows` values
pub fn row_sum(a: &Tensor, rows: usize, cols: usize) -> Tensor {
    assert_eq!(a.len(), rows * cols, "row_sum: size mismatch");
    let data: Vec<f32> =
        (0..rows).map(|r| a.data().iter().skip(r * cols).take(cols).sum()).collect();
    let mut result = Tensor::from_vec(data, tracks_grad(&[a]));
    if result.requires_grad() {
        let op = RowSumBackward { a: a.clone(), cols, result_grad: result.grad_cell() };
        record(&mut result, op);
    }
    result
}

struct RowSumBackward {
    a: Tensor,
    cols: usize,
    result_grad: GradCell,
}

impl BackwardOp for RowSumBackward {
    fn backward(&self) {
        if let Some(grad) = self.result_grad.borrow().as_ref() {
            if self.a.requires_grad() {
                let grad_a =
                    Array1::from_shape_fn(self.a.len(), |i| grad[i / self.cols]);
                self.a.accumulate_grad(grad_a);
            }
        }
    }

    fn inputs(&self) -> Vec<Tensor> {
        vec![self.a.clone()]
    }
}

/// Select rows of a table by index (embedding lookup)
///
/// `table` is `n_rows × cols`; the result is `indices.len() × cols`.
pub fn gather_rows(table: &Tensor, indices: &[usize], cols: usize) -> Tensor {
    assert!(cols > 0 && table.len() % cols == 0, "gather_rows: table is not a matrix");
    let n_rows = table.len() / cols;
    let mut data = Vec::with_capacity(indices.len() * cols);
    for &idx in indices {
        assert!(idx < n_rows, "gather_rows: index {idx} out of range for {n_rows} rows");
        data.extend(table.data().iter().skip(idx * cols).take(cols).copied());
    }
    let mut result = Tensor::from_vec(data, tracks_grad(&[table]));
    if result.requires_grad() {
        let op = GatherRowsBackward {
            table: table.clone(),
            indices: indices.to_vec(),
            cols,
            result_grad: result.grad_cell(),
        };
        record(&mut result, op);
    }
    result
}

struct GatherRowsBackward {
    table: Tensor,
    indices: Vec<usize>,
    cols: usize,
    result_grad: GradCell,
}

impl BackwardOp for GatherRowsBackward {
    fn backward(&self) {
        if let Some(grad) = self.result_grad.borrow().as_ref() {
            if self.table.requires_grad() {
                let mut grad_table = Array1::zeros(self.table.len());
                for (row, &idx) in self.indices.iter().enumerate() {
                    for c in 0..self.cols {
                        grad_table[idx * self.cols + c] += grad[row * self.cols + c];
                    }
                }
                self.table.accumulate_grad(grad_table);
            }
        }
    }

    fn inputs(&self) -> Vec<Tensor> {
        vec![self.table.clone()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::autograd::{backward, mul, sum};

    #[test]
    fn test_broadcast_rows_sums_gradient() {
        let bias = Tensor::from_vec(vec![1.0, 2.0], true);
        let b = broadcast_rows(&bias, 3);
        assert_eq!(b.data().to_vec(), vec![1.0, 2.0, 1.0, 2.0, 1.0, 2.0]);
        backward(&sum(&b), None);
        assert_eq!(bias.grad().unwrap().to_vec(), vec![3.0, 3.0]);
    }

    #[test]
    fn test_row_sum() {
        let a = Tensor::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], true);
        let r = row_sum(&a, 2, 3);
        assert_eq!(r.data().to_vec(), vec![6.0, 15.0]);
        let w = Tensor::from_vec(vec![1.0, 10.0], false);
        backward(&sum(&mul(&r, &w)), None);
        assert_eq!(a.grad().unwrap().to_vec(), vec![1.0, 1.0, 1.0, 10.0, 10.0, 10.0]);
    }

    #[test]
    fn test_gather_rows_scatters_back() {
        let table = Tensor::from_vec(vec![0.0, 1.0, 10.0, 11.0, 20.0, 21.0], true);
        let g = gather_rows(&table, &[2, 0, 2], 2);
        assert_eq!(g.data().to_vec(), vec![20.0, 21.0, 0.0, 1.0, 20.0, 21.0]);
        backward(&sum(&g), None);
        assert_eq!(table.grad().unwrap().to_vec(), vec![1.0, 1.0, 0.0, 0.0, 2.0, 2.0]);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_gather_rows_bad_index() {
        let table = Tensor::zeros(4, false);
        let _ = gather_rows(&table, &[2], 2);
    }
}
