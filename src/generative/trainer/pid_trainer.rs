//! The PID training controller

use rand::rngs::StdRng;
use rand::SeedableRng;

use super::config::PidTrainerConfig;
use super::state::{Phase, PreviousBatch, TrainingState};
use super::DiscriminatorLosses;
use crate::autograd::{add, backward, no_grad, scale, sub};
use crate::generative::loss::{GanLoss, Role};
use crate::generative::network::{Discriminator, Generator};
use crate::generative::penalty::{discriminator_regularizer, output_regularizer};
use crate::generative::pid::DerivativeMode;
use crate::generative::replay::{ReplayQueue, ReplaySample};
use crate::optim::{clip_grad_value_refs, Optimizer};
use crate::trace::{TraceStep, TRACER};
use crate::{Error, Result, Tensor};

/// Alternates generator and discriminator updates, shaping the discriminator
/// loss with proportional, integral and derivative terms.
///
/// The caller owns the loop: it supplies batches and the iteration counter
/// and decides the call order.
pub struct PidTrainer<G, D> {
    generator: G,
    discriminator: D,
    g_optimizer: Box<dyn Optimizer>,
    d_optimizer: Box<dyn Optimizer>,
    config: PidTrainerConfig,
    loss: GanLoss,
    state: TrainingState,
    rng: StdRng,
}

impl<G: Generator, D: Discriminator> PidTrainer<G, D> {
    /// # Errors
    ///
    /// Fails on an invalid config, on networks that disagree on the sample
    /// width, or when the replay capacity is below the batch size.
    pub fn new(
        generator: G,
        discriminator: D,
        g_optimizer: Box<dyn Optimizer>,
        d_optimizer: Box<dyn Optimizer>,
        config: PidTrainerConfig,
    ) -> Result<Self> {
        Self::build(generator, discriminator, g_optimizer, d_optimizer, config, StdRng::from_os_rng())
    }

    /// Like [`PidTrainer::new`] with a seeded sampler for replay draws and interpolation
    pub fn with_seed(
        generator: G,
        discriminator: D,
        g_optimizer: Box<dyn Optimizer>,
        d_optimizer: Box<dyn Optimizer>,
        config: PidTrainerConfig,
        seed: u64,
    ) -> Result<Self> {
        let rng = StdRng::seed_from_u64(seed);
        Self::build(generator, discriminator, g_optimizer, d_optimizer, config, rng)
    }

    fn build(
        mut generator: G,
        mut discriminator: D,
        g_optimizer: Box<dyn Optimizer>,
        d_optimizer: Box<dyn Optimizer>,
        config: PidTrainerConfig,
        rng: StdRng,
    ) -> Result<Self> {
        config.validate()?;
        let sample_dim = Generator::sample_dim(&generator);
        if sample_dim != Discriminator::sample_dim(&discriminator) {
            return Err(Error::ShapeMismatch(format!(
                "generator emits {sample_dim}-wide samples, discriminator expects {}",
                Discriminator::sample_dim(&discriminator)
            )));
        }

        let capacity = config.replay_capacity();
        let replay_real = ReplayQueue::with_labels(capacity, config.batch_size, sample_dim)?;
        let replay_fake = ReplayQueue::with_labels(capacity, config.batch_size, sample_dim)?;

        generator.set_requires_grad(false);
        discriminator.set_requires_grad(false);

        Ok(Self {
            generator,
            discriminator,
            g_optimizer,
            d_optimizer,
            loss: config.loss(),
            config,
            state: TrainingState::new(replay_real, replay_fake),
            rng,
        })
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    pub fn generator_mut(&mut self) -> &mut G {
        &mut self.generator
    }

    pub fn discriminator(&self) -> &D {
        &self.discriminator
    }

    pub fn discriminator_mut(&mut self) -> &mut D {
        &mut self.discriminator
    }

    pub fn config(&self) -> &PidTrainerConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn state(&self) -> &TrainingState {
        &self.state
    }

    /// True once a batch is cached for the derivative term
    pub fn has_previous_batch(&self) -> bool {
        self.state.previous.is_some()
    }

    pub fn into_networks(self) -> (G, D) {
        (self.generator, self.discriminator)
    }

    fn enter(&mut self, phase: Phase) {
        let (gen, disc) = phase.trainable();
        self.generator.set_requires_grad(gen);
        self.discriminator.set_requires_grad(disc);
        self.state.phase = phase;
    }

    /// Rows in `noise`, checked against the label count
    fn check_batch(&self, labels: &[usize], noise: &Tensor) -> Result<usize> {
        let latent_dim = self.generator.latent_dim();
        if latent_dim == 0 || noise.len() % latent_dim != 0 {
            return Err(Error::ShapeMismatch(format!(
                "noise of {} values is not a multiple of latent_dim {latent_dim}",
                noise.len()
            )));
        }
        let rows = noise.len() / latent_dim;
        if rows != labels.len() {
            return Err(Error::ShapeMismatch(format!(
                "{} labels for a noise batch of {rows}",
                labels.len()
            )));
        }
        if rows == 0 {
            return Err(Error::ShapeMismatch("empty batch".to_string()));
        }
        if self.config.conditioning.is_conditional() {
            self.check_labels(labels)?;
        }
        Ok(rows)
    }

    /// Every label must index the class table of each network that embeds labels
    fn check_labels(&self, labels: &[usize]) -> Result<()> {
        let tables = [
            ("generator", self.generator.num_classes()),
            ("discriminator", self.discriminator.num_classes()),
        ];
        for (network, classes) in tables {
            if classes == 0 {
                continue;
            }
            if let Some(&label) = labels.iter().find(|&&label| label >= classes) {
                return Err(Error::ShapeMismatch(format!(
                    "label {label} is out of range for the {network}'s {classes} classes"
                )));
            }
        }
        Ok(())
    }

    /// One generator update; returns the generator loss
    ///
    /// # Errors
    ///
    /// `ShapeMismatch` if the label count differs from the noise batch size,
    /// or, on a conditional run, a label is outside a network's class table.
    pub fn generator_trainstep(&mut self, labels: &[usize], noise: &Tensor) -> Result<f32> {
        self.check_batch(labels, noise)?;
        TRACER.span_with(TraceStep::GeneratorStep, || format!("n={}", labels.len()), || {
            self.enter(Phase::GeneratorActive);
            self.generator.train();
            self.discriminator.train();
            self.g_optimizer.zero_grad_refs(&mut self.generator.parameters_mut());

            let y = self.config.conditioning.labels(labels);
            let fake = self.generator.generate(noise, y);
            let score = self.discriminator.score(&fake, y);
            let gloss = self.loss.compute(&score, 1.0, Role::Generator);
            backward(&gloss, None);

            self.g_optimizer.step_refs(&mut self.generator.parameters_mut());
            Ok(gloss.item())
        })
    }

    /// One discriminator update at `iteration`
    ///
    /// # Errors
    ///
    /// `ShapeMismatch` if `real`, `labels` and `noise` disagree on batch size,
    /// or, on a conditional run, a label is outside a network's class table.
    pub fn discriminator_trainstep(
        &mut self,
        real: &Tensor,
        labels: &[usize],
        noise: &Tensor,
        iteration: usize,
    ) -> Result<DiscriminatorLosses> {
        let rows = self.check_batch(labels, noise)?;
        let sample_dim = Discriminator::sample_dim(&self.discriminator);
        if real.len() != rows * sample_dim {
            return Err(Error::ShapeMismatch(format!(
                "real batch has {} values, expected {rows} × {sample_dim}",
                real.len()
            )));
        }

        TRACER.span_with(TraceStep::DiscriminatorStep, || format!("it={iteration}"), || {
            self.enter(Phase::DiscriminatorActive);
            self.generator.train();
            self.discriminator.train();
            self.d_optimizer.zero_grad_refs(&mut self.discriminator.parameters_mut());

            let (proportional, fake) = TRACER.span(TraceStep::Proportional, "", || {
                self.proportional_term(real, labels, noise)
            });
            let penalty =
                TRACER.span(TraceStep::Penalty, "", || self.penalty_term(real, &fake, labels))?;
            let integral =
                TRACER.span(TraceStep::Integral, "", || self.integral_term(real, &fake, labels))?;
            let derivative = TRACER.span(TraceStep::Derivative, "", || {
                self.derivative_term(real, &fake, labels, noise, iteration)
            });

            if let Some(clip) = self.config.clip_d {
                clip_grad_value_refs(&mut self.discriminator.parameters_mut(), clip);
            }
            self.d_optimizer.step_refs(&mut self.discriminator.parameters_mut());
            self.enter(Phase::Idle);

            Ok(DiscriminatorLosses { proportional, derivative, integral, penalty })
        })
    }

    /// Current-batch loss; returns its value and the fake batch it generated
    fn proportional_term(
        &mut self,
        real: &Tensor,
        labels: &[usize],
        noise: &Tensor,
    ) -> (f32, Tensor) {
        let y = self.config.conditioning.labels(labels);
        let pv = self.config.gains.pv;
        let reg_d = self.config.regularize_output_d;

        let real_score = self.discriminator.score(real, y);
        let mut loss_real = scale(&self.loss.compute(&real_score, 1.0, Role::Discriminator), pv);
        if reg_d > 0.0 {
            loss_real = add(&loss_real, &output_regularizer(&real_score, reg_d));
        }
        backward(&loss_real, None);

        let fake = no_grad(|| self.generator.generate(noise, y));
        let fake_score = self.discriminator.score(&fake, y);
        let mut loss_fake = scale(&self.loss.compute(&fake_score, 0.0, Role::Discriminator), pv);
        if reg_d > 0.0 {
            loss_fake = add(&loss_fake, &output_regularizer(&fake_score, reg_d));
        }
        backward(&loss_fake, None);

        (loss_real.item() + loss_fake.item(), fake)
    }

    fn penalty_term(&mut self, real: &Tensor, fake: &Tensor, labels: &[usize]) -> Result<f32> {
        let y = self.config.conditioning.labels(labels);
        let reg = discriminator_regularizer(
            self.config.reg_type,
            self.config.reg_param,
            &self.discriminator,
            real,
            fake,
            y,
            &mut self.rng,
        )?;
        Ok(reg.map_or(0.0, |penalty| {
            backward(&penalty, None);
            penalty.item()
        }))
    }

    fn integral_term(&mut self, real: &Tensor, fake: &Tensor, labels: &[usize]) -> Result<f32> {
        if !self.config.gains.integral_enabled() {
            return Ok(0.0);
        }
        let sample_dim = self.state.replay_real.sample_dim();
        let rows = self.config.replay_push_limit.map_or(labels.len(), |l| l.min(labels.len()));
        let values = rows * sample_dim;
        let real_data = real.data().to_vec();
        let fake_data = fake.data().to_vec();
        self.state.replay_real.set_data(&real_data[..values], Some(&labels[..rows]))?;
        self.state.replay_fake.set_data(&fake_data[..values], Some(&labels[..rows]))?;

        let drawn_real = self.state.replay_real.get_data(&mut self.rng)?;
        let drawn_fake = self.state.replay_fake.get_data(&mut self.rng)?;
        let real_score = self.score_replayed(drawn_real);
        let fake_score = self.score_replayed(drawn_fake);

        let i_loss = scale(
            &self.config.pid_type.integral_loss(&self.loss, &real_score, &fake_score),
            self.config.gains.iv,
        );
        backward(&i_loss, None);
        Ok(i_loss.item())
    }

    fn score_replayed(&self, drawn: ReplaySample) -> Tensor {
        let samples = Tensor::from_vec(drawn.samples, false);
        let labels = drawn.labels.unwrap_or_default();
        self.discriminator.score(&samples, self.config.conditioning.labels(&labels))
    }

    fn derivative_term(
        &mut self,
        real: &Tensor,
        fake: &Tensor,
        labels: &[usize],
        noise: &Tensor,
        iteration: usize,
    ) -> f32 {
        if !self.config.gains.derivative_enabled() || iteration == 0 {
            return 0.0;
        }
        let current = PreviousBatch::capture(real, fake, labels, noise);
        let Some(previous) = self.state.previous.replace(current) else {
            return 0.0;
        };

        let cond = self.config.conditioning;
        let d_loss = match self.config.derivative_mode {
            DerivativeMode::Difference => {
                let y = cond.labels(labels);
                let prev_y = cond.labels(&previous.labels);
                let current_loss = self.real_fake_loss(real, fake, y);
                let previous_loss = self.real_fake_loss(&previous.real, &previous.fake, prev_y);
                sub(&current_loss, &previous_loss)
            }
            DerivativeMode::Accumulate => {
                let prev_y = cond.labels(&previous.labels);
                let regenerated = no_grad(|| self.generator.generate(&previous.noise, prev_y));
                let current_score = self.discriminator.score(&regenerated, prev_y);
                let previous_score = self.discriminator.score(&previous.fake, prev_y);
                add(
                    &self.loss.compute(&current_score, 0.0, Role::Discriminator),
                    &self.loss.compute(&previous_score, 1.0, Role::Discriminator),
                )
            }
        };
        let d_loss = scale(&d_loss, self.config.gains.dv);
        backward(&d_loss, None);
        d_loss.item()
    }

    /// `L(D(real), 1) + L(D(fake), 0)` scored with the current discriminator
    fn real_fake_loss(&self, real: &Tensor, fake: &Tensor, labels: Option<&[usize]>) -> Tensor {
        let real_score = self.discriminator.score(real, labels);
        let fake_score = self.discriminator.score(fake, labels);
        add(
            &self.loss.compute(&real_score, 1.0, Role::Discriminator),
            &self.loss.compute(&fake_score, 0.0, Role::Discriminator),
        )
    }
}
