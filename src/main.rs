//! Blockstorm entry point
//!
//! Headless harness: loads a level file (or generates the demo level),
//! runs it at a fixed 60 Hz against a scripted player, and reports what
//! happened. Rendering is a counting stub; wiring a real renderer means
//! implementing [`RenderSink`] over your sprite pool.

use std::error::Error;

use glam::{Vec3, Vec4};

use blockstorm::consts::FRAME_RATE;
use blockstorm::demo;
use blockstorm::{DamageSink, EffectsConfig, LevelData, RenderSink, Runtime, TickInput};

const ASPECT_RATIO: f32 = 16.0 / 9.0;
const DEMO_SEED: u64 = 7;
const RUN_SECS: f32 = 60.0;

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        log::error!("{err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let level = match std::env::args().nth(1) {
        Some(path) => {
            log::info!("loading level from {path}");
            let text = std::fs::read_to_string(&path)?;
            serde_json::from_str::<LevelData>(&text)?
        }
        None => demo::generate(DEMO_SEED),
    };

    let mut rt = Runtime::launch(level, EffectsConfig::default(), ASPECT_RATIO)?;
    let mut render = CountingRender::default();
    let mut player = ScriptedPlayer::new(rt.effects());

    let dt = 1.0 / FRAME_RATE;
    let total_frames = (RUN_SECS * FRAME_RATE) as u32;
    for frame in 1..=total_frames {
        let t = frame as f32 * dt;
        player.advance_clock(dt, t);
        let input = TickInput {
            player_pos: player.pos,
        };
        rt.advance(dt, &input, &mut render, &mut player);

        if frame % 60 == 0 {
            let stats = rt.last_stats();
            log::info!(
                "t={:>4.1}s active={} parents={} waves={} hits={} hp={}",
                rt.timer(),
                stats.active,
                stats.parents,
                stats.waves,
                stats.hits,
                player.hp
            );
        }
    }

    println!(
        "\n{} frames evaluated, {} blocks placed, {} sprites painted, {} hits taken, {} absorbed while flashing",
        render.frames, render.placed, render.painted, player.hits_taken, player.hits_absorbed
    );
    println!("✓ run finished with {} hp", player.hp);
    Ok(())
}

/// Tallies publications instead of drawing them.
#[derive(Default)]
struct CountingRender {
    frames: usize,
    placed: usize,
    painted: usize,
}

impl RenderSink for CountingRender {
    fn clear(&mut self, _count: usize) {
        self.frames += 1;
    }

    fn place(&mut self, _slot: usize, _pos: Vec3, _rot: Vec3, _sca: Vec3) {
        self.placed += 1;
    }

    fn paint(&mut self, _slot: usize, _sprite: usize, _color: Vec4, _layer: i32) {
        self.painted += 1;
    }
}

/// Follows a fixed weaving path and soaks up damage with the usual
/// hit feedback: a mercy window, a flash, and a screen shake that decays.
struct ScriptedPlayer {
    effects: EffectsConfig,
    pos: Vec3,
    hp: i32,
    invuln_left: f32,
    flash_left: f32,
    shake: f32,
    hits_taken: u32,
    hits_absorbed: u32,
}

impl ScriptedPlayer {
    fn new(effects: EffectsConfig) -> Self {
        Self {
            effects,
            pos: Vec3::ZERO,
            hp: 10,
            invuln_left: 0.0,
            flash_left: 0.0,
            shake: 0.0,
            hits_taken: 0,
            hits_absorbed: 0,
        }
    }

    fn advance_clock(&mut self, dt: f32, t: f32) {
        self.pos = Vec3::new((t * 0.4).sin() * 6.0, (t * 0.9).sin() * 3.0, 0.0);
        self.invuln_left = (self.invuln_left - dt).max(0.0);
        self.flash_left = (self.flash_left - dt).max(0.0);
        self.shake *= 0.9;
    }
}

impl DamageSink for ScriptedPlayer {
    fn damage(&mut self) {
        if self.invuln_left > 0.0 {
            self.hits_absorbed += 1;
            return;
        }
        self.hp -= 1;
        self.hits_taken += 1;
        self.invuln_left = self.effects.invuln_secs;
        self.flash_left = self.effects.flash_secs;
        self.shake = self.effects.shake_strength;
        log::info!("hit! {} hp left", self.hp);
    }
}
