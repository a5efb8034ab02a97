use rand::Rng;

/// Number of particles added where the hero background is clicked.
pub const BURST_SIZE: usize = 5;

/// Furthest a particle drifts from its anchor, in px, along each axis.
const MAX_DRIFT: f64 = 50.0;

#[derive(Clone, Debug, PartialEq)]
pub struct SparkleConfig {
    pub min_size: f64,
    pub max_size: f64,
    pub min_opacity: f64,
    pub max_opacity: f64,
    pub color: &'static str,
    pub quantity: usize,
    pub speed: f64,
}

impl Default for SparkleConfig {
    fn default() -> Self {
        Self {
            min_size: 1.0,
            max_size: 3.0,
            min_opacity: 0.1,
            max_opacity: 1.0,
            color: "#FFFFFF",
            quantity: 100,
            speed: 0.5,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Anchor {
    /// Share of the container, 0..=100 on both axes.
    Percent { x: f64, y: f64 },
    /// Offset from the container's top-left corner.
    Pixels { x: f64, y: f64 },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub anchor: Anchor,
    pub size: f64,
    pub opacity: f64,
    pub twinkle_secs: f64,
    pub drift_x: f64,
    pub drift_y: f64,
    pub drift_secs: f64,
}

impl Particle {
    pub fn style(&self, color: &str) -> String {
        let (left, top) = match self.anchor {
            Anchor::Percent { x, y } => (format!("{:.2}%", x), format!("{:.2}%", y)),
            Anchor::Pixels { x, y } => (format!("{:.1}px", x), format!("{:.1}px", y)),
        };
        format!(
            "left: {}; top: {}; width: {:.2}px; height: {:.2}px; background-color: {}; opacity: {:.2}; \
             --drift-x: {:.1}px; --drift-y: {:.1}px; \
             animation: sparkle-drift {:.2}s ease-in-out infinite alternate, sparkle-twinkle {:.2}s ease-in-out infinite;",
            left,
            top,
            self.size,
            self.size,
            color,
            self.opacity,
            self.drift_x,
            self.drift_y,
            self.drift_secs,
            self.twinkle_secs,
        )
    }
}

/// One particle, anchored at `at` when given and anywhere otherwise.
pub fn spawn<R: Rng + ?Sized>(config: &SparkleConfig, rng: &mut R, at: Option<(f64, f64)>) -> Particle {
    let anchor = match at {
        Some((x, y)) => Anchor::Pixels { x, y },
        None => Anchor::Percent {
            x: rng.gen_range(0.0..=100.0),
            y: rng.gen_range(0.0..=100.0),
        },
    };
    Particle {
        anchor,
        size: rng.gen_range(config.min_size..=config.max_size),
        opacity: rng.gen_range(config.min_opacity..=config.max_opacity),
        twinkle_secs: rng.gen_range(10.0..=30.0) / config.speed,
        drift_x: rng.gen_range(-MAX_DRIFT..=MAX_DRIFT),
        drift_y: rng.gen_range(-MAX_DRIFT..=MAX_DRIFT),
        drift_secs: rng.gen_range(5.0..=10.0),
    }
}

pub fn field<R: Rng + ?Sized>(config: &SparkleConfig, rng: &mut R) -> Vec<Particle> {
    (0..config.quantity).map(|_| spawn(config, rng, None)).collect()
}

pub fn burst<R: Rng + ?Sized>(config: &SparkleConfig, rng: &mut R, x: f64, y: f64) -> Vec<Particle> {
    (0..BURST_SIZE).map(|_| spawn(config, rng, Some((x, y)))).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn field_respects_config_bounds() {
        let config = SparkleConfig::default();
        let particles = field(&config, &mut StdRng::seed_from_u64(7));
        assert_eq!(particles.len(), config.quantity);
        for p in &particles {
            assert!((config.min_size..=config.max_size).contains(&p.size));
            assert!((config.min_opacity..=config.max_opacity).contains(&p.opacity));
            assert!((20.0..=60.0).contains(&p.twinkle_secs));
            assert!((5.0..=10.0).contains(&p.drift_secs));
            assert!(p.drift_x.abs() <= MAX_DRIFT && p.drift_y.abs() <= MAX_DRIFT);
            match p.anchor {
                Anchor::Percent { x, y } => {
                    assert!((0.0..=100.0).contains(&x) && (0.0..=100.0).contains(&y));
                }
                Anchor::Pixels { .. } => panic!("field particles are anchored by percent"),
            }
        }
    }

    #[test]
    fn burst_is_anchored_at_the_click() {
        let config = SparkleConfig::default();
        let particles = burst(&config, &mut StdRng::seed_from_u64(1), 120.0, 45.5);
        assert_eq!(particles.len(), BURST_SIZE);
        assert!(particles
            .iter()
            .all(|p| p.anchor == Anchor::Pixels { x: 120.0, y: 45.5 }));
    }

    #[test]
    fn same_seed_restarts_the_same_field() {
        let config = SparkleConfig {
            quantity: 12,
            ..SparkleConfig::default()
        };
        let first = field(&config, &mut StdRng::seed_from_u64(99));
        let again = field(&config, &mut StdRng::seed_from_u64(99));
        assert_eq!(first, again);
    }

    #[test]
    fn degenerate_ranges_do_not_panic() {
        let config = SparkleConfig {
            min_size: 2.0,
            max_size: 2.0,
            min_opacity: 0.5,
            max_opacity: 0.5,
            ..SparkleConfig::default()
        };
        let p = spawn(&config, &mut StdRng::seed_from_u64(3), None);
        assert_eq!(p.size, 2.0);
        assert_eq!(p.opacity, 0.5);
    }

    #[test]
    fn style_carries_color_and_animation() {
        let p = spawn(&SparkleConfig::default(), &mut StdRng::seed_from_u64(5), Some((10.0, 20.0)));
        let style = p.style("#FFFFFF");
        assert!(style.starts_with("left: 10.0px; top: 20.0px;"));
        assert!(style.contains("background-color: #FFFFFF"));
        assert!(style.contains("sparkle-drift"));
    }
}
