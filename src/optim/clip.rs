//! Gradient clipping utilities

use crate::Tensor;

fn global_norm<'a>(grads: impl Iterator<Item = &'a Tensor>) -> f32 {
    grads
        .filter_map(Tensor::grad)
        .map(|g| g.iter().map(|&x| x * x).sum::<f32>())
        .sum::<f32>()
        .sqrt()
}

/// Clip gradients by global norm
///
/// Computes the global norm of all gradients and scales them down if the norm
/// exceeds `max_norm`, preserving relative magnitudes across parameters.
///
/// Returns the global norm before clipping.
pub fn clip_grad_norm(params: &mut [Tensor], max_norm: f32) -> f32 {
    let mut refs: Vec<&mut Tensor> = params.iter_mut().collect();
    clip_grad_norm_refs(&mut refs, max_norm)
}

/// Clip gradients by global norm on borrowed parameter references.
///
/// Identical to [`clip_grad_norm`] but accepts `&mut [&mut Tensor]`, the form
/// networks hand out their parameters in.
pub fn clip_grad_norm_refs(params: &mut [&mut Tensor], max_norm: f32) -> f32 {
    let norm = global_norm(params.iter().map(|p| &**p));

    if norm > max_norm {
        let clip_coef = max_norm / norm;
        for param in params.iter_mut() {
            if let Some(grad) = param.grad() {
                param.set_grad(grad * clip_coef);
            }
        }
    }

    norm
}

/// Clamp every gradient element into `[-clip_value, clip_value]`
///
/// Returns the number of elements that were clamped.
pub fn clip_grad_value_refs(params: &mut [&mut Tensor], clip_value: f32) -> usize {
    let limit = clip_value.abs();
    let mut clamped = 0;
    for param in params.iter_mut() {
        if let Some(grad) = param.grad() {
            clamped += grad.iter().filter(|g| g.abs() > limit).count();
            param.set_grad(grad.mapv(|g| g.clamp(-limit, limit)));
        }
    }
    clamped
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::arr1;

    #[test]
    fn test_clip_grad_norm_no_clipping() {
        let mut params =
            vec![Tensor::from_vec(vec![1.0, 2.0], true), Tensor::from_vec(vec![3.0], true)];
        params[0].set_grad(arr1(&[0.1, 0.2]));
        params[1].set_grad(arr1(&[0.1]));

        // sqrt(0.06) ≈ 0.245
        let norm = clip_grad_norm(&mut params, 1.0);
        assert_abs_diff_eq!(norm, 0.245, epsilon = 1e-3);
        assert_abs_diff_eq!(params[0].grad().unwrap()[1], 0.2, epsilon = 1e-6);
    }

    #[test]
    fn test_clip_grad_norm_with_clipping() {
        let mut params =
            vec![Tensor::from_vec(vec![1.0, 2.0], true), Tensor::from_vec(vec![3.0], true)];
        params[0].set_grad(arr1(&[3.0, 4.0]));
        params[1].set_grad(arr1(&[0.0]));

        let norm = clip_grad_norm(&mut params, 1.0);
        assert_abs_diff_eq!(norm, 5.0, epsilon = 1e-6);
        assert_abs_diff_eq!(params[0].grad().unwrap()[0], 0.6, epsilon = 1e-6);
        assert_abs_diff_eq!(params[0].grad().unwrap()[1], 0.8, epsilon = 1e-6);
    }

    #[test]
    fn test_clip_grad_norm_ignores_missing_grads() {
        let mut params = vec![Tensor::from_vec(vec![1.0], false)];
        assert_eq!(clip_grad_norm(&mut params, 1.0), 0.0);
        assert!(params[0].grad().is_none());
    }

    #[test]
    fn test_clip_grad_value() {
        let mut a = Tensor::from_vec(vec![0.0; 3], true);
        let mut b = Tensor::from_vec(vec![0.0], true);
        a.set_grad(arr1(&[-2.0, 0.5, 3.0]));
        let clamped = clip_grad_value_refs(&mut [&mut a, &mut b], 1.0);
        assert_eq!(clamped, 2);
        assert_eq!(a.grad().unwrap().to_vec(), vec![-1.0, 0.5, 1.0]);
        assert!(b.grad().is_none());
    }
}
