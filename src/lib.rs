//! Kokaton Barrage - a single-screen terminal shoot-'em-up.
//!
//! Core modules:
//! - `geometry`: viewport bounds and direction helpers
//! - `arena`: generational storage owning every entity collection
//! - `entities`: plain data for the avatar, enemies, bombs, beams, shields, explosions
//! - `compute`: all game rules, including the per-frame `tick`
//! - `input`: terminal key tracking turned into per-frame input
//! - `display`: crossterm rendering

pub mod arena;
pub mod compute;
pub mod config;
pub mod display;
pub mod entities;
pub mod error;
pub mod geometry;
pub mod input;

/// Game configuration constants
pub mod consts {
    /// Logical viewport size. Origin top-left, Y grows downward.
    pub const WIDTH: f32 = 1600.0;
    pub const HEIGHT: f32 = 900.0;

    /// Frame rate cap (frames per second)
    pub const FPS: u32 = 50;

    // Avatar
    pub const AVATAR_START: (f32, f32) = (900.0, 400.0);
    pub const AVATAR_SIZE: (f32, f32) = (90.0, 90.0);
    pub const AVATAR_SPEED: f32 = 10.0;
    pub const AVATAR_BOOST_SPEED: f32 = 20.0;

    // Abilities
    pub const HYPER_COST: u32 = 100;
    pub const HYPER_FRAMES: i32 = 500;
    pub const SHIELD_COST: u32 = 50;
    pub const SHIELD_LIFE: i32 = 400;
    pub const SHIELD_THICKNESS: f32 = 20.0;
    pub const AREA_EFFECT_COST: u32 = 20;
    pub const SPREAD_COUNT: usize = 5;
    /// Half-width of the spread-fire arc in degrees
    pub const SPREAD_HALF_ARC: f32 = 50.0;

    // Enemy
    pub const ENEMY_SIZE: (f32, f32) = (72.0, 60.0);
    pub const ENEMY_SPEED: f32 = 6.0;
    pub const ENEMY_SPAWN_EVERY: u64 = 200;
    pub const ENEMY_BOUND_MIN: i32 = 50;
    pub const ENEMY_BOUND_MAX: i32 = 450; // HEIGHT / 2
    pub const ENEMY_INTERVAL_MIN: u32 = 50;
    pub const ENEMY_INTERVAL_MAX: u32 = 300;
    pub const ENEMY_VARIANTS: u8 = 3;

    // Bomb
    pub const BOMB_SPEED: f32 = 6.0;
    pub const BOMB_RADIUS_MIN: u32 = 10;
    pub const BOMB_RADIUS_MAX: u32 = 50;

    // Beam
    pub const BEAM_SPEED: f32 = 10.0;
    pub const BEAM_SIZE: (f32, f32) = (80.0, 30.0);

    // Explosion
    pub const EXPLOSION_SIZE: (f32, f32) = (100.0, 90.0);
    pub const ENEMY_EXPLOSION_LIFE: i32 = 100;
    pub const BOMB_EXPLOSION_LIFE: i32 = 50;
    pub const EXPLOSION_FLIP_EVERY: i32 = 10;

    // Scoring
    pub const ENEMY_POINTS: u32 = 10;
    pub const BOMB_POINTS: u32 = 1;

    // Cutscenes (frames)
    pub const AREA_EFFECT_PAUSE: u32 = 3;
    pub const DEFEAT_PAUSE: u32 = 100;
}
