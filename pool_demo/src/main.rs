//! Pool demo application
//!
//! Runs a fixed-step loop that fires bullets and sparks from pooled
//! instances, despawning them after their lifetime, then prints the usage
//! report. Pass a `.toml` or `.ron` registry config as the first argument to
//! override the built-in pool presets.

use auto_pool::foundation::logging;
use auto_pool::prelude::*;
use std::sync::Arc;
use thiserror::Error;

/// Simulated frames to run
const FRAME_COUNT: u32 = 600;

/// Fixed simulation step (60 Hz)
const FRAME_STEP: f32 = 1.0 / 60.0;

#[derive(Error, Debug)]
enum DemoError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Pool error: {0}")]
    Pool(#[from] PoolError),
}

/// A short-lived visual effect or projectile
struct Effect {
    name: &'static str,
    lifetime: f32,
    speed: f32,
}

#[derive(Debug, Default)]
struct EffectState {
    visible: bool,
    position: Vec3,
    velocity: Vec3,
}

impl PoolTemplate for Effect {
    type Instance = EffectState;

    fn name(&self) -> &str {
        self.name
    }

    fn instantiate(&self) -> EffectState {
        EffectState::default()
    }
}

impl Poolable for EffectState {
    fn on_spawn(&mut self, placement: &Placement) {
        self.visible = true;
        self.position = placement.position.unwrap_or_else(Vec3::zeros);
        self.velocity = placement
            .rotation
            .map_or_else(Vec3::x, |rotation| rotation * Vec3::x());
    }

    fn on_despawn(&mut self) {
        self.visible = false;
        self.velocity = Vec3::zeros();
    }
}

fn default_config() -> RegistryConfig {
    RegistryConfig {
        report_on_teardown: true,
        ..RegistryConfig::default()
    }
    .with_pool(
        "bullet",
        PoolConfig::new(16, 32).with_behaviors(EmptyBehavior::Grow, MaxEmptyBehavior::ReuseOldest),
    )
    .with_pool(
        "spark",
        PoolConfig::new(8, 8).with_behaviors(EmptyBehavior::Fail, MaxEmptyBehavior::Fail),
    )
}

fn run() -> Result<(), DemoError> {
    let config = match std::env::args().nth(1) {
        Some(path) => {
            log::info!("Loading pool config from {}", path);
            RegistryConfig::load_from_file(path)?
        }
        None => default_config(),
    };

    let bullet = Arc::new(Effect { name: "bullet", lifetime: 0.75, speed: 40.0 });
    let spark = Arc::new(Effect { name: "spark", lifetime: 0.2, speed: 5.0 });

    let mut registry = PoolRegistry::init(config);
    registry.create_pool_preset(Arc::clone(&bullet))?;
    registry.create_pool_preset(Arc::clone(&spark))?;

    let mut timer = Timer::new();
    for frame in 0..FRAME_COUNT {
        timer.update();

        // Fire a bullet every third frame, with a spark at the muzzle.
        if frame % 3 == 0 {
            #[allow(clippy::cast_precision_loss)]
            let angle = frame as f32 * 0.05;
            let rotation = Quat::from_euler_angles(0.0, 0.0, angle);
            let placement = Placement::at(Vec3::zeros(), rotation);

            if let Some(handle) = registry.spawn(bullet.name, &placement) {
                registry.despawn_after(handle, bullet.lifetime);
            }
            if let Some(handle) = registry.spawn(spark.name, &placement.clone().with_variant(1)) {
                registry.despawn_after(handle, spark.lifetime);
            }
        }

        for effect in [&bullet, &spark] {
            if let Some(pool) = registry.pool_mut(effect.name) {
                let handles: Vec<InstanceHandle> = pool.iter_active().map(|(handle, _)| handle).collect();
                for handle in handles {
                    if let Some(state) = pool.get_mut(handle).filter(|state| state.visible) {
                        state.position += state.velocity * effect.speed * FRAME_STEP;
                    }
                }
            }
        }

        let released = registry.update(FRAME_STEP);
        if frame % 120 == 0 {
            log::debug!(
                "frame {}: {} bullets, {} sparks active, {} released",
                frame,
                registry.active_count(bullet.name),
                registry.active_count(spark.name),
                released
            );
        }
    }

    log::info!("Ran {} frames in {:.3}s", timer.frame_count(), timer.total_time());
    for report in registry.teardown() {
        println!("{report}");
    }
    Ok(())
}

fn main() {
    logging::init();

    if let Err(err) = run() {
        log::error!("Pool demo failed: {}", err);
        std::process::exit(1);
    }
}
