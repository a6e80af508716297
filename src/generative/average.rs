//! Exponential moving average of network parameters

use super::network::Network;
use crate::{Error, Result};

/// `p_target ← β·p_target + (1 − β)·p_source` for every parameter pair
///
/// Parameters are matched by position; both networks must share an
/// architecture. Gradients are neither read nor written.
pub fn update_average<T, S>(target: &mut T, source: &S, beta: f32) -> Result<()>
where
    T: Network + ?Sized,
    S: Network + ?Sized,
{
    if !(0.0..=1.0).contains(&beta) {
        return Err(Error::ConfigError(format!("averaging beta must be in [0, 1], got {beta}")));
    }
    let sources = source.parameters();
    let mut targets = target.parameters_mut();
    if sources.len() != targets.len() {
        return Err(Error::ShapeMismatch(format!(
            "averaging {} parameters into {}",
            sources.len(),
            targets.len()
        )));
    }
    for (tgt, src) in targets.iter_mut().zip(&sources) {
        if tgt.len() != src.len() {
            return Err(Error::ShapeMismatch(format!(
                "parameter of {} values averaged into {}",
                src.len(),
                tgt.len()
            )));
        }
        tgt.data_mut().zip_mut_with(src.data(), |t, &s| *t = beta * *t + (1.0 - beta) * s);
    }
    Ok(())
}
