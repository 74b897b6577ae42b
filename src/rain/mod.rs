//! Digital rain spawner.
//!
//! A `RainField` owns the live drops and an RNG. It is driven by a fixed
//! 25 ms tick: every tick spawns one random-symbol drop and, with
//! probability `title_probability`, one article-title drop. Drops carry a
//! randomized horizontal position and lifetime and are pruned once the
//! lifetime elapses. The title pool is owned elsewhere and passed in by
//! reference on each tick.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Symbol alphabet for random drops (ASCII only, indexed bytewise).
pub const SYMBOL_ALPHABET: &str =
    "!@#$%^&*()ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789abcdefghijklmnopqrstuvwxyz";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropKind {
    Symbol,
    Title,
}

/// A transient falling element. Owned solely by the field that spawned it.
#[derive(Debug, Clone)]
pub struct Raindrop {
    pub id: u64,
    pub kind: DropKind,
    pub content: String,
    /// Horizontal position in [0, width)
    pub x: f32,
    /// Spawn time on the field's clock, seconds
    pub spawned_at: f64,
    /// Seconds until removal
    pub lifetime: f64,
}

impl Raindrop {
    pub fn expired(&self, now: f64) -> bool {
        now - self.spawned_at >= self.lifetime
    }

    /// Fall progress in [0, 1] at time `now`.
    pub fn progress(&self, now: f64) -> f32 {
        ((now - self.spawned_at) / self.lifetime).clamp(0.0, 1.0) as f32
    }
}

#[derive(Debug, Clone)]
pub struct RainConfig {
    /// Seconds between ticks (driven externally; stored here so the app
    /// and the field agree on one number).
    pub tick_period: f64,
    /// Chance that a tick also spawns a title drop.
    pub title_probability: f64,
    /// Lifetime range in seconds, half-open, for symbol drops.
    pub symbol_lifetime: (f64, f64),
    /// Lifetime range in seconds, half-open, for title drops.
    pub title_lifetime: (f64, f64),
    /// Upper bound on live drops; at the cap, ticks prune but do not spawn.
    pub max_drops: usize,
}

impl Default for RainConfig {
    fn default() -> Self {
        Self {
            tick_period: 0.025,
            title_probability: 0.1,
            symbol_lifetime: (2.0, 3.0),
            title_lifetime: (4.0, 8.0),
            max_drops: 512,
        }
    }
}

pub struct RainField {
    config: RainConfig,
    drops: Vec<Raindrop>,
    next_id: u64,
    rng: StdRng,
}

impl RainField {
    pub fn new(config: RainConfig) -> Self {
        Self::with_rng(config, StdRng::from_os_rng())
    }

    /// Deterministic field for tests.
    pub fn with_seed(config: RainConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: RainConfig, rng: StdRng) -> Self {
        Self {
            config,
            drops: Vec::new(),
            next_id: 0,
            rng,
        }
    }

    pub fn config(&self) -> &RainConfig {
        &self.config
    }

    pub fn drops(&self) -> &[Raindrop] {
        &self.drops
    }

    /// Advance one tick at time `now`.
    ///
    /// Prunes expired drops, then spawns one symbol drop plus a
    /// probabilistic title drop. A non-positive `width` means the surface
    /// is absent: prune only, spawn nothing. An empty `titles` pool
    /// silently skips the title drop.
    pub fn tick(&mut self, now: f64, width: f32, titles: &[String]) {
        self.prune(now);

        if width <= 0.0 {
            return;
        }

        self.spawn(DropKind::Symbol, now, width, titles);

        if self.rng.random::<f64>() < self.config.title_probability && !titles.is_empty() {
            self.spawn(DropKind::Title, now, width, titles);
        }
    }

    /// Remove expired drops. Safe to call at any time.
    pub fn prune(&mut self, now: f64) {
        self.drops.retain(|d| !d.expired(now));
    }

    /// Remove a drop by id. Idempotent: a missing id is a no-op.
    pub fn remove(&mut self, id: u64) -> bool {
        match self.drops.iter().position(|d| d.id == id) {
            Some(i) => {
                self.drops.remove(i);
                true
            }
            None => false,
        }
    }

    fn spawn(&mut self, kind: DropKind, now: f64, width: f32, titles: &[String]) {
        if self.drops.len() >= self.config.max_drops {
            return;
        }

        let content = match kind {
            DropKind::Symbol => {
                let bytes = SYMBOL_ALPHABET.as_bytes();
                (bytes[self.rng.random_range(0..bytes.len())] as char).to_string()
            }
            DropKind::Title => {
                if titles.is_empty() {
                    return;
                }
                titles[self.rng.random_range(0..titles.len())].clone()
            }
        };

        let (lo, hi) = match kind {
            DropKind::Symbol => self.config.symbol_lifetime,
            DropKind::Title => self.config.title_lifetime,
        };

        let id = self.next_id;
        self.next_id += 1;

        self.drops.push(Raindrop {
            id,
            kind,
            content,
            x: self.rng.random_range(0.0..width),
            spawned_at: now,
            lifetime: self.rng.random_range(lo..hi),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unbounded(config: RainConfig) -> RainConfig {
        RainConfig {
            max_drops: usize::MAX,
            ..config
        }
    }

    #[test]
    fn every_tick_spawns_exactly_one_symbol_drop() {
        let config = RainConfig {
            title_probability: 0.0,
            ..RainConfig::default()
        };
        let mut field = RainField::with_seed(config, 7);

        field.tick(0.0, 100.0, &[]);
        assert_eq!(field.drops().len(), 1);
        assert_eq!(field.drops()[0].kind, DropKind::Symbol);
        assert_eq!(field.drops()[0].content.chars().count(), 1);

        field.tick(0.025, 100.0, &[]);
        assert_eq!(field.drops().len(), 2);
    }

    #[test]
    fn no_title_drop_from_empty_pool() {
        let config = unbounded(RainConfig {
            title_probability: 1.0,
            ..RainConfig::default()
        });
        let mut field = RainField::with_seed(config, 7);

        for _ in 0..500 {
            field.tick(0.0, 100.0, &[]);
        }
        assert!(field.drops().iter().all(|d| d.kind == DropKind::Symbol));
        assert_eq!(field.drops().len(), 500);
    }

    #[test]
    fn title_drop_fraction_converges_to_probability() {
        let config = unbounded(RainConfig {
            title_probability: 0.3,
            ..RainConfig::default()
        });
        let mut field = RainField::with_seed(config, 42);
        let titles = vec!["Alpha".to_string(), "Beta".to_string()];

        let ticks = 10_000;
        for _ in 0..ticks {
            field.tick(0.0, 100.0, &titles);
        }

        let title_drops = field
            .drops()
            .iter()
            .filter(|d| d.kind == DropKind::Title)
            .count();
        let fraction = title_drops as f64 / ticks as f64;
        assert!(
            (fraction - 0.3).abs() < 0.03,
            "fraction {} too far from 0.3",
            fraction
        );
        assert!(field
            .drops()
            .iter()
            .filter(|d| d.kind == DropKind::Title)
            .all(|d| titles.contains(&d.content)));
    }

    #[test]
    fn positions_and_lifetimes_stay_in_range() {
        let config = unbounded(RainConfig {
            title_probability: 0.5,
            ..RainConfig::default()
        });
        let mut field = RainField::with_seed(config, 3);
        let titles = vec!["Alpha".to_string()];
        let width = 640.0;

        for _ in 0..2_000 {
            field.tick(0.0, width, &titles);
        }

        for drop in field.drops() {
            assert!(drop.x >= 0.0 && drop.x < width, "x = {}", drop.x);
            let (lo, hi) = match drop.kind {
                DropKind::Symbol => (2.0, 3.0),
                DropKind::Title => (4.0, 8.0),
            };
            assert!(
                drop.lifetime >= lo && drop.lifetime < hi,
                "lifetime {} outside [{}, {})",
                drop.lifetime,
                lo,
                hi
            );
        }
    }

    #[test]
    fn drops_expire_after_their_lifetime() {
        let mut field = RainField::with_seed(RainConfig::default(), 11);
        field.tick(0.0, 100.0, &[]);
        assert_eq!(field.drops().len(), 1);

        // Longest possible symbol lifetime is under 3 s
        field.prune(3.0);
        assert!(field.drops().is_empty());
    }

    #[test]
    fn tick_prunes_before_spawning() {
        let mut field = RainField::with_seed(RainConfig::default(), 11);
        field.tick(0.0, 100.0, &[]);

        field.tick(10.0, 100.0, &[]);
        assert_eq!(field.drops().len(), 1);
        assert_eq!(field.drops()[0].spawned_at, 10.0);
    }

    #[test]
    fn removal_is_idempotent() {
        let mut field = RainField::with_seed(RainConfig::default(), 5);
        field.tick(0.0, 100.0, &[]);
        let id = field.drops()[0].id;

        assert!(field.remove(id));
        assert!(!field.remove(id));
        assert!(field.drops().is_empty());
    }

    #[test]
    fn zero_width_surface_is_a_silent_no_op() {
        let mut field = RainField::with_seed(RainConfig::default(), 5);
        field.tick(0.0, 0.0, &[]);
        assert!(field.drops().is_empty());

        // Pruning still runs when the surface is absent
        field.tick(0.0, 100.0, &[]);
        field.tick(10.0, 0.0, &[]);
        assert!(field.drops().is_empty());
    }

    #[test]
    fn population_is_bounded_by_max_drops() {
        let config = RainConfig {
            max_drops: 4,
            title_probability: 1.0,
            ..RainConfig::default()
        };
        let mut field = RainField::with_seed(config, 9);
        let titles = vec!["Alpha".to_string()];

        for _ in 0..100 {
            field.tick(0.0, 100.0, &titles);
        }
        assert_eq!(field.drops().len(), 4);
    }

    #[test]
    fn progress_is_clamped() {
        let drop = Raindrop {
            id: 0,
            kind: DropKind::Symbol,
            content: "x".to_string(),
            x: 0.0,
            spawned_at: 1.0,
            lifetime: 2.0,
        };
        assert_eq!(drop.progress(0.0), 0.0);
        assert_eq!(drop.progress(2.0), 0.5);
        assert_eq!(drop.progress(100.0), 1.0);
        assert!(!drop.expired(2.9));
        assert!(drop.expired(3.0));
    }
}
