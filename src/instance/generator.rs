use super::{TaskSpec, TrpInstance};
use crate::error::{PenaltyError, PtResult};
use fastrand::Rng;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use tracing::warn;

/// Gaussian redraws per coordinate before clamping into range.
const MAX_REDRAWS: usize = 1000;

/// How task locations are spread over the square `[min, max]^2`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LocationMix {
    Uniform,
    /// Two Gaussians given as `(mean, std_dev)`; a task comes from the first
    /// one with probability `mix`. Draws outside the square are redrawn.
    BimodalGaussian { modes: [(f64, f64); 2], mix: f64 },
}

impl LocationMix {
    /// Modes on the quarter points of `[min, max]`, each with a standard
    /// deviation of an eighth of the range.
    pub fn bimodal(min: f64, max: f64, mix: f64) -> Self {
        let span = max - min;
        LocationMix::BimodalGaussian {
            modes: [
                (min + 0.75 * span, span / 8.0),
                (min + 0.25 * span, span / 8.0),
            ],
            mix,
        }
    }
}

/// Seeded task generator over the square `[min, max]^2`.
pub struct TaskGenerator {
    pub min: f64,
    pub max: f64,
    layout: LocationMix,
    modes: Option<[Normal<f64>; 2]>,
    rng: Rng,
    gauss: StdRng,
}

impl TaskGenerator {
    pub fn new(min: f64, max: f64, seed: Option<u64>) -> PtResult<Self> {
        Self::with_mix(min, max, LocationMix::Uniform, seed)
    }

    pub fn with_mix(min: f64, max: f64, layout: LocationMix, seed: Option<u64>) -> PtResult<Self> {
        if !(min.is_finite() && max.is_finite()) || min > max {
            return Err(PenaltyError::Config(format!(
                "Generator bounds [{}, {}] are not a valid range",
                min, max
            )));
        }

        let modes = match layout {
            LocationMix::Uniform => None,
            LocationMix::BimodalGaussian { modes, mix } => {
                if !(0.0..=1.0).contains(&mix) {
                    return Err(PenaltyError::Config(format!(
                        "Mix must lie in [0, 1], got {}",
                        mix
                    )));
                }
                let normal = |(mean, sd): (f64, f64)| {
                    Normal::new(mean, sd).map_err(|e| {
                        PenaltyError::Config(format!("Mode ({}, {}): {}", mean, sd, e))
                    })
                };
                Some([normal(modes[0])?, normal(modes[1])?])
            }
        };

        let mut rng = if let Some(s) = seed {
            Rng::with_seed(s)
        } else {
            Rng::new()
        };
        let gauss = StdRng::seed_from_u64(rng.u64(..));
        Ok(Self {
            min,
            max,
            layout,
            modes,
            rng,
            gauss,
        })
    }

    pub fn layout(&self) -> LocationMix {
        self.layout
    }

    #[inline]
    fn uniform(&mut self) -> f64 {
        self.min + self.rng.f64() * (self.max - self.min)
    }

    fn truncated(&mut self, mode: usize) -> f64 {
        let Some(modes) = &self.modes else {
            return self.uniform();
        };
        let normal = modes[mode];
        for _ in 0..MAX_REDRAWS {
            let v = normal.sample(&mut self.gauss);
            if (self.min..=self.max).contains(&v) {
                return v;
            }
        }
        warn!(
            "Mode {} rarely lands in [{}, {}]; clamping",
            mode, self.min, self.max
        );
        normal.sample(&mut self.gauss).clamp(self.min, self.max)
    }

    pub fn draw(&mut self) -> [f64; 2] {
        match self.layout {
            LocationMix::Uniform => [self.uniform(), self.uniform()],
            LocationMix::BimodalGaussian { mix, .. } => {
                // both coordinates come from the same mode
                let mode = if self.rng.f64() < mix { 0 } else { 1 };
                [self.truncated(mode), self.truncated(mode)]
            }
        }
    }

    /// `count` tasks released in increasing time order over `[0, horizon]`.
    pub fn draw_tasks(&mut self, count: usize, horizon: f64) -> Vec<TaskSpec> {
        let mut times: Vec<f64> = (0..count).map(|_| self.rng.f64() * horizon).collect();
        times.sort_by(f64::total_cmp);

        times
            .into_iter()
            .map(|time| TaskSpec {
                location: self.draw(),
                time,
                initial_wait: 0.0,
            })
            .collect()
    }

    /// A complete instance: depot at the centre of the square, every task on
    /// one route in release order.
    pub fn instance(
        &mut self,
        name: &str,
        count: usize,
        horizon: f64,
        mean_service_time: f64,
    ) -> TrpInstance {
        let centre = (self.min + self.max) / 2.0;
        TrpInstance {
            name: name.to_string(),
            scale: None,
            cost_exponent: None,
            route_cap: None,
            depot: [centre, centre],
            simulation_time: horizon,
            mean_service_time,
            tasks: self.draw_tasks(count, horizon),
            distances: None,
            routes: None,
        }
    }
}
