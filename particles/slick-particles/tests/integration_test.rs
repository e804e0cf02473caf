//! Whole-system behaviour of emitters, pools and the update loop

use pretty_assertions::assert_eq;
use slick_particles::{
    Color, ConfigurableEmitter, EmitterContext, EmitterId, Particle, ParticleEmitter,
    ParticleKey, ParticleSystem, Range, SystemConfig, Value,
};
use std::any::Any;
use test_case::test_case;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn system_with(max_particles: usize) -> ParticleSystem {
    init_logging();
    ParticleSystem::new(SystemConfig {
        max_particles_per_emitter: max_particles,
        remove_completed_emitters: false,
        ..SystemConfig::default()
    })
}

fn configurable(system: &ParticleSystem, id: EmitterId) -> &ConfigurableEmitter {
    system
        .emitter_as::<ConfigurableEmitter>(id)
        .expect("emitter is configurable")
}

/// Requests a fixed number of particles per update and remembers their keys
struct KeyRecorder {
    batch: usize,
    keys: Vec<ParticleKey>,
}

impl ParticleEmitter for KeyRecorder {
    fn update(&mut self, ctx: &mut EmitterContext<'_>, _delta: f32) {
        for _ in 0..self.batch {
            self.keys.push(ctx.new_particle(500.0).key());
        }
    }

    fn update_particle(&mut self, _particle: &mut Particle, _delta: f32) {}

    fn is_enabled(&self) -> bool {
        true
    }

    fn set_enabled(&mut self, _enabled: bool) {}

    fn completed(&self) -> bool {
        false
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[test]
fn test_ten_frames_of_default_spawning() {
    let mut system = system_with(100);
    let id = system.add_emitter(Box::new(ConfigurableEmitter::with_seed("default", 1)));

    for frame in 1..=10 {
        system.update(100.0);
        assert_eq!(system.live_particles(id), Some(frame * 5));
    }

    let pool = system.pool(id).unwrap();
    assert_eq!(pool.iter().count(), 50);
    // The first batch has aged through all ten frames and sits at exactly zero.
    let oldest = pool.iter().map(|p| p.life()).fold(f32::MAX, f32::min);
    assert_eq!(oldest, 0.0);
    assert!(pool.iter().all(|p| p.is_in_use()));
    assert_eq!(system.particle_count(), 50);
}

#[test]
fn test_pool_bound_and_conservation() {
    let mut system = system_with(10);
    let mut emitter = ConfigurableEmitter::with_seed("flood", 2);
    emitter.spawn_count = Range::new(20.0, 40.0);
    emitter.spawn_interval = Range::new(1.0, 30.0);
    emitter.initial_life = Range::new(10.0, 200.0);
    let id = system.add_emitter(Box::new(emitter));

    for _ in 0..200 {
        system.update(7.0);
        let stats = system.pool_stats(id).unwrap();
        assert!(stats.in_use <= 10);
        assert_eq!(stats.in_use + stats.available, stats.capacity);
        assert_eq!(system.pool(id).unwrap().iter().count(), stats.in_use);
    }
}

#[test]
fn test_exhausted_pool_hands_out_sentinel() {
    let mut system = system_with(3);
    let id = system.add_emitter(Box::new(KeyRecorder {
        batch: 5,
        keys: Vec::new(),
    }));

    system.update(10.0);
    assert_eq!(system.live_particles(id), Some(3));

    let keys = system.emitter_as::<KeyRecorder>(id).unwrap().keys.clone();
    let real: Vec<Option<u32>> = keys.iter().map(|k| k.slot).collect();
    assert_eq!(real, vec![Some(0), Some(1), Some(2), None, None]);

    // Releasing the sentinel leaves every pool untouched.
    assert!(!system.release(keys[3]));
    let stats = system.pool_stats(id).unwrap();
    assert_eq!(stats.available, 0);
    assert_eq!(stats.in_use, 3);
}

#[test_case(10.0 ; "small steps")]
#[test_case(33.0 ; "uneven steps")]
#[test_case(250.0 ; "large steps")]
fn test_life_decreases_by_delta(delta: f32) {
    let mut system = system_with(4);
    let mut emitter = ConfigurableEmitter::with_seed("single", 3);
    emitter.emit_count = Range::fixed(1.0);
    emitter.initial_life = Range::fixed(1000.0);
    emitter.replay();
    let id = system.add_emitter(Box::new(emitter));

    system.update(delta);
    let mut life = system.pool(id).unwrap().get(0).unwrap().life();
    assert_eq!(life, 1000.0 - delta);

    loop {
        system.update(delta);
        let expected = life - delta;
        if expected >= 0.0 {
            life = system.pool(id).unwrap().get(0).unwrap().life();
            assert!((life - expected).abs() < 1e-3);
        } else {
            assert_eq!(system.live_particles(id), Some(0));
            assert_eq!(system.pool_stats(id).unwrap().available, 4);
            break;
        }
    }
}

#[test_case(100.0, 100.0, 250.0 ; "interval matches delta")]
#[test_case(30.0, 100.0, 80.0 ; "several spawns per tick window")]
#[test_case(500.0, 40.0, 1000.0 ; "long lived particles")]
fn test_duration_mode_completion(interval: f32, delta: f32, life: f32) {
    let mut system = system_with(200);
    let mut emitter = ConfigurableEmitter::with_seed("timed", 4);
    emitter.spawn_interval = Range::fixed(interval);
    emitter.spawn_count = Range::fixed(2.0);
    emitter.initial_life = Range::fixed(life);
    emitter.length = Range::fixed(500.0);
    emitter.replay();
    let id = system.add_emitter(Box::new(emitter));

    let mut transitions = 0;
    let mut was_completed = false;
    for _ in 0..200 {
        system.update(delta);
        let emitter = configurable(&system, id);
        let live = system.live_particles(id).unwrap();
        let expected = emitter.timeout() <= 0.0 && live == 0;

        assert_eq!(emitter.completed(), expected);
        if emitter.completed() && !was_completed {
            transitions += 1;
        }
        was_completed = emitter.completed();
    }
    assert_eq!(transitions, 1);
    assert!(was_completed);
}

#[test_case(1, 5 ; "single particle")]
#[test_case(23, 5 ; "truncated last batch")]
#[test_case(40, 8 ; "exact batches")]
fn test_count_mode_emits_exactly(total: u32, batch: u32) {
    let mut system = system_with(100);
    let mut emitter = ConfigurableEmitter::with_seed("burst", 5);
    emitter.spawn_count = Range::fixed(batch as f32);
    emitter.spawn_interval = Range::fixed(50.0);
    emitter.emit_count = Range::fixed(total as f32);
    emitter.initial_life = Range::fixed(100_000.0);
    emitter.replay();
    let id = system.add_emitter(Box::new(emitter));

    for _ in 0..100 {
        system.update(50.0);
    }
    assert_eq!(system.live_particles(id), Some(total as usize));
    assert_eq!(configurable(&system, id).left_to_emit(), 0);
    assert!(!configurable(&system, id).completed());
}

#[test]
fn test_count_mode_completes_after_expiry() {
    let mut system = system_with(100);
    let mut emitter = ConfigurableEmitter::with_seed("burst", 6);
    emitter.spawn_count = Range::fixed(4.0);
    emitter.spawn_interval = Range::fixed(10.0);
    emitter.emit_count = Range::fixed(10.0);
    emitter.initial_life = Range::fixed(100.0);
    emitter.replay();
    let id = system.add_emitter(Box::new(emitter));

    let mut frames = 0;
    while !configurable(&system, id).completed() {
        system.update(10.0);
        frames += 1;
        assert!(frames < 100, "emitter never completed");
    }
    assert_eq!(system.live_particles(id), Some(0));
}

#[test]
fn test_completed_emitter_removed_by_default() {
    init_logging();
    let mut system = ParticleSystem::default();
    let mut emitter = ConfigurableEmitter::with_seed("flash", 7);
    emitter.emit_count = Range::fixed(3.0);
    emitter.initial_life = Range::fixed(30.0);
    emitter.replay();
    let id = system.add_emitter(Box::new(emitter));

    for _ in 0..10 {
        system.update(10.0);
    }
    assert!(system.emitter(id).is_none());
    assert_eq!(system.emitter_count(), 0);
    assert_eq!(system.particle_count(), 0);
}

#[test]
fn test_color_interpolation_boundaries() {
    let mut system = system_with(4);
    let mut emitter = ConfigurableEmitter::with_seed("fade", 8);
    emitter.emit_count = Range::fixed(1.0);
    emitter.initial_life = Range::fixed(1000.0);
    emitter.replay();
    let id = system.add_emitter(Box::new(emitter));

    system.update(1.0);
    let young = system.pool(id).unwrap().get(0).unwrap().color();
    assert!((young.r - Color::WHITE.r).abs() < 1e-3);
    assert!(young.g > 0.99 && young.b > 0.99 && young.a > 0.99);

    for _ in 0..99 {
        system.update(10.0);
    }
    system.update(8.0);
    let p = system.pool(id).unwrap().get(0).unwrap();
    assert_eq!(p.life(), 1.0);
    let dying = p.color();
    assert!((dying.r - 1.0).abs() < 0.01);
    assert!(dying.g < 0.01 && dying.b < 0.01);
    assert!(dying.a < 0.01);
}

#[test]
fn test_replay_resumes_completed_duration_emitter() {
    let mut system = system_with(50);
    let mut emitter = ConfigurableEmitter::with_seed("timed", 9);
    emitter.length = Range::fixed(200.0);
    emitter.spawn_count = Range::fixed(1.0);
    emitter.initial_life = Range::fixed(100.0);
    emitter.replay();
    let id = system.add_emitter(Box::new(emitter));

    for _ in 0..20 {
        system.update(100.0);
    }
    assert!(configurable(&system, id).completed());
    assert_eq!(system.live_particles(id), Some(0));

    system.replay_emitter(id).unwrap();
    let replayed = configurable(&system, id);
    assert_eq!(replayed.timeout(), 200.0);
    assert_eq!(replayed.next_spawn(), 0.0);
    assert!(!replayed.completed());

    system.update(100.0);
    assert_eq!(system.live_particles(id), Some(1));
}

#[test]
fn test_wind_and_gravity_accumulate_per_tick() {
    // Forces are added once per tick, unscaled by delta: the same number of
    // ticks yields the same velocity whatever the frame time.
    let mut velocities = Vec::new();
    for delta in [5.0, 50.0] {
        let mut system = system_with(4);
        let mut emitter = ConfigurableEmitter::with_seed("drift", 10);
        emitter.emit_count = Range::fixed(1.0);
        emitter.initial_life = Range::fixed(10_000.0);
        emitter.speed = Range::fixed(0.0);
        emitter.wind_factor = Value::new(1.0);
        emitter.gravity_factor = Value::new(3.0);
        emitter.replay();
        let id = system.add_emitter(Box::new(emitter));

        for _ in 0..10 {
            system.update(delta);
        }
        velocities.push(system.pool(id).unwrap().get(0).unwrap().velocity());
    }

    assert_eq!(velocities[0], velocities[1]);
    let (vx, vy) = velocities[0];
    assert!((vx - 0.001).abs() < 1e-6);
    assert!((vy - 0.003).abs() < 1e-6);
}

#[test]
fn test_disabled_emitter_drains() {
    let mut system = system_with(20);
    let mut emitter = ConfigurableEmitter::with_seed("tap", 11);
    emitter.initial_life = Range::fixed(300.0);
    let id = system.add_emitter(Box::new(emitter));

    system.update(100.0);
    assert_eq!(system.live_particles(id), Some(5));

    system.emitter_mut(id).unwrap().set_enabled(false);
    for _ in 0..5 {
        system.update(100.0);
    }
    assert_eq!(system.live_particles(id), Some(0));
    assert!(!configurable(&system, id).completed());
}

#[test]
fn test_wrap_up_completes_endless_emitter() {
    let mut system = system_with(20);
    let mut emitter = ConfigurableEmitter::with_seed("endless", 12);
    emitter.initial_life = Range::fixed(150.0);
    let id = system.add_emitter(Box::new(emitter));

    for _ in 0..5 {
        system.update(100.0);
    }
    assert!(!configurable(&system, id).completed());

    system.emitter_mut(id).unwrap().wrap_up();
    for _ in 0..3 {
        system.update(100.0);
    }
    assert!(configurable(&system, id).completed());
}

#[test]
fn test_seeded_emitters_are_reproducible() {
    let run = || {
        let mut system = system_with(100);
        let mut emitter = ConfigurableEmitter::with_seed("noise", 99);
        emitter.speed = Range::new(10.0, 200.0);
        emitter.initial_life = Range::new(100.0, 900.0);
        emitter.x_offset = Range::new(-20.0, 20.0);
        let id = system.add_emitter(Box::new(emitter));
        for _ in 0..15 {
            system.update(33.0);
        }
        system
            .pool(id)
            .unwrap()
            .iter()
            .map(|p| (p.x(), p.y(), p.life()))
            .collect::<Vec<_>>()
    };

    assert_eq!(run(), run());
}
