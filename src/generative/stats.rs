//! Rolling training statistics

use std::collections::VecDeque;

use super::trainer::DiscriminatorLosses;

/// Default number of steps kept in each history
pub const DEFAULT_WINDOW: usize = 100;

/// Bounded history of step losses
#[derive(Debug, Clone)]
pub struct TrainingStats {
    /// Total training steps
    pub steps: usize,
    /// Generator losses (recent history)
    pub gen_losses: VecDeque<f32>,
    /// Proportional discriminator losses (recent history)
    pub disc_losses: VecDeque<f32>,
    pub derivative_losses: VecDeque<f32>,
    pub integral_losses: VecDeque<f32>,
    pub penalties: VecDeque<f32>,
    window: usize,
}

impl Default for TrainingStats {
    fn default() -> Self {
        Self::with_window(DEFAULT_WINDOW)
    }
}

fn push_bounded(history: &mut VecDeque<f32>, value: f32, window: usize) {
    if history.len() >= window {
        history.pop_front();
    }
    history.push_back(value);
}

fn average(history: &VecDeque<f32>) -> f32 {
    if history.is_empty() {
        return 0.0;
    }
    history.iter().sum::<f32>() / history.len() as f32
}

impl TrainingStats {
    pub fn with_window(window: usize) -> Self {
        let window = window.max(1);
        Self {
            steps: 0,
            gen_losses: VecDeque::with_capacity(window),
            disc_losses: VecDeque::with_capacity(window),
            derivative_losses: VecDeque::with_capacity(window),
            integral_losses: VecDeque::with_capacity(window),
            penalties: VecDeque::with_capacity(window),
            window,
        }
    }

    /// Record one iteration (a generator step and a discriminator step)
    pub fn record_step(&mut self, gen_loss: f32, disc: &DiscriminatorLosses) {
        self.steps += 1;
        let w = self.window;
        push_bounded(&mut self.gen_losses, gen_loss, w);
        push_bounded(&mut self.disc_losses, disc.proportional, w);
        push_bounded(&mut self.derivative_losses, disc.derivative, w);
        push_bounded(&mut self.integral_losses, disc.integral, w);
        push_bounded(&mut self.penalties, disc.penalty, w);
    }

    pub fn avg_gen_loss(&self) -> f32 {
        average(&self.gen_losses)
    }

    pub fn avg_disc_loss(&self) -> f32 {
        average(&self.disc_losses)
    }

    pub fn avg_derivative_loss(&self) -> f32 {
        average(&self.derivative_losses)
    }

    pub fn avg_integral_loss(&self) -> f32 {
        average(&self.integral_losses)
    }

    pub fn avg_penalty(&self) -> f32 {
        average(&self.penalties)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_stats_default() {
        let stats = TrainingStats::default();
        assert_eq!(stats.steps, 0);
        assert!(stats.gen_losses.is_empty());
        assert_eq!(stats.avg_disc_loss(), 0.0);
    }

    #[test]
    fn test_history_is_bounded() {
        let mut stats = TrainingStats::with_window(3);
        for i in 0..5 {
            let losses = DiscriminatorLosses {
                proportional: i as f32,
                derivative: 0.0,
                integral: 1.0,
                penalty: 0.0,
            };
            stats.record_step(-(i as f32), &losses);
        }
        assert_eq!(stats.steps, 5);
        assert_eq!(stats.disc_losses.len(), 3);
        assert_abs_diff_eq!(stats.avg_disc_loss(), 3.0);
        assert_abs_diff_eq!(stats.avg_gen_loss(), -3.0);
        assert_abs_diff_eq!(stats.avg_integral_loss(), 1.0);
        assert_eq!(stats.avg_penalty(), 0.0);
        assert_eq!(stats.avg_derivative_loss(), 0.0);
    }
}
