//! Test utilities for gradient checking

/// Central-difference numerical gradient of a scalar function
pub fn finite_difference<F>(f: F, x: &[f32], epsilon: f32) -> Vec<f32>
where
    F: Fn(&[f32]) -> f32,
{
    let mut probe = x.to_vec();
    (0..x.len())
        .map(|i| {
            probe[i] = x[i] + epsilon;
            let f_plus = f(&probe);
            probe[i] = x[i] - epsilon;
            let f_minus = f(&probe);
            probe[i] = x[i];
            (f_plus - f_minus) / (2.0 * epsilon)
        })
        .collect()
}

/// Largest absolute difference between two gradients
pub fn max_abs_diff(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| (x - y).abs()).fold(0.0, f32::max)
}
