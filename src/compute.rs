/// Game rules.
///
/// Constructors build entities from the current state; `tick` advances the
/// whole game by one frame and reports what happened.  All randomness comes
/// through an injected RNG so tests can seed it.

use std::collections::BTreeSet;

use glam::Vec2;
use log::{debug, info};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::arena::{Arena, Handle};
use crate::consts::*;
use crate::entities::{
    Avatar, AvatarState, Beam, Body, Bomb, BombColor, BombState, Cutscene, DropInterval, Enemy,
    EnemyState, EntityKind, Explosion, Expression, Facing, GameEvent, GameState, Lifecycle,
    Phase, Score, Shield,
};
use crate::geometry::{direction_to, fully_inside, rotated_size, Rect};

// ── Input ─────────────────────────────────────────────────────────────────────

/// Keys held down during this frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HeldKeys {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// Doubles movement speed.
    pub boost: bool,
    /// Hyper activation; acted on only at the press edge.
    pub hyper: bool,
}

/// One-shot actions from discrete key-down events.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Fire,
    SpreadFire,
    Shield,
    AreaEffect,
    Quit,
}

/// Everything the loop read from the keyboard for one frame.
#[derive(Clone, Debug, Default)]
pub struct TickInput {
    pub held: HeldKeys,
    pub commands: Vec<Command>,
}

// ── Constructors ─────────────────────────────────────────────────────────────

pub fn new_avatar() -> Avatar {
    let (x, y) = AVATAR_START;
    let (w, h) = AVATAR_SIZE;
    Avatar {
        rect: Rect::new(Vec2::new(x, y), Vec2::new(w, h)),
        facing: Facing::East,
        speed: AVATAR_SPEED,
        state: AvatarState::Normal,
        hyper_life: 0,
        hyper_key_last_frame: false,
        expression: Expression::Neutral,
    }
}

/// Build the initial game state.
pub fn init_state() -> GameState {
    GameState {
        avatar: new_avatar(),
        shields: Arena::new(),
        beams: Arena::new(),
        enemies: Arena::new(),
        bombs: Arena::new(),
        explosions: Arena::new(),
        score: Score::default(),
        phase: Phase::Playing,
        frame: 0,
    }
}

/// A new enemy at the top edge with randomised column, stop altitude,
/// drop interval and sprite.
pub fn spawn_enemy(rng: &mut impl Rng) -> Enemy {
    let x = rng.gen_range(0..=WIDTH as i32) as f32;
    let (w, h) = ENEMY_SIZE;
    Enemy {
        rect: Rect::new(Vec2::new(x, 0.0), Vec2::new(w, h)),
        vy: ENEMY_SPEED,
        bound: rng.gen_range(ENEMY_BOUND_MIN..=ENEMY_BOUND_MAX) as f32,
        state: EnemyState::Descending,
        drop: DropInterval::Every(rng.gen_range(ENEMY_INTERVAL_MIN..=ENEMY_INTERVAL_MAX)),
        variant: rng.gen_range(0..ENEMY_VARIANTS),
        distorted: false,
    }
}

/// A bomb released just below `enemy`, aimed at where the avatar is now.
pub fn drop_bomb(enemy: &Enemy, avatar: &Avatar, rng: &mut impl Rng) -> Bomb {
    let radius = rng.gen_range(BOMB_RADIUS_MIN..=BOMB_RADIUS_MAX);
    let color = *BombColor::ALL.choose(rng).unwrap_or(&BombColor::Red);
    let center = Vec2::new(
        enemy.rect.center.x,
        enemy.rect.center.y + enemy.rect.height() / 2.0,
    );
    Bomb {
        rect: Rect::new(center, Vec2::splat(2.0 * radius as f32)),
        dir: direction_to(&enemy.rect, &avatar.rect),
        speed: BOMB_SPEED,
        state: BombState::Active,
        radius,
        color,
    }
}

/// A beam leaving the avatar along its facing, turned by `offset` degrees.
pub fn beam_from(avatar: &Avatar, offset: f32) -> Beam {
    let angle = avatar.facing.degrees() + offset;
    let (sin, cos) = angle.to_radians().sin_cos();
    let dir = Vec2::new(cos, -sin);
    let center = avatar.rect.center
        + Vec2::new(avatar.rect.width() * dir.x, avatar.rect.height() * dir.y);
    let (w, h) = BEAM_SIZE;
    Beam {
        rect: Rect::new(center, rotated_size(Vec2::new(w, h), angle)),
        dir,
        speed: BEAM_SPEED,
        angle,
    }
}

/// Angular offsets for `count` beams spread evenly over the fixed arc.
pub fn spread_offsets(count: usize) -> Vec<f32> {
    if count < 2 {
        return vec![0.0];
    }
    let step = 2.0 * SPREAD_HALF_ARC / (count - 1) as f32;
    (0..count)
        .map(|i| -SPREAD_HALF_ARC + step * i as f32)
        .collect()
}

pub fn spread_beams(avatar: &Avatar, count: usize) -> Vec<Beam> {
    spread_offsets(count)
        .into_iter()
        .map(|offset| beam_from(avatar, offset))
        .collect()
}

/// Shield geometry for the avatar's current facing.
fn shield_rect(avatar: &Avatar) -> (Rect, f32) {
    let (kx, ky) = avatar.facing.step();
    let angle = avatar.facing.degrees();
    let base = Vec2::new(SHIELD_THICKNESS, avatar.rect.height() * 2.0);
    let center = avatar.rect.center
        + Vec2::new(
            avatar.rect.width() * kx as f32,
            avatar.rect.height() * ky as f32,
        );
    (Rect::new(center, rotated_size(base, angle)), angle)
}

pub fn new_shield(avatar: &Avatar, life: i32) -> Shield {
    let (rect, angle) = shield_rect(avatar);
    Shield { rect, angle, life }
}

pub fn explosion_at(rect: &Rect, life: i32) -> Explosion {
    let (w, h) = EXPLOSION_SIZE;
    Explosion {
        rect: Rect::new(rect.center, Vec2::new(w, h)),
        life,
    }
}

// ── Abilities ─────────────────────────────────────────────────────────────────

pub fn fire(state: &mut GameState) {
    let beam = beam_from(&state.avatar, 0.0);
    state.beams.insert(beam);
}

pub fn spread_fire(state: &mut GameState, count: usize) {
    for beam in spread_beams(&state.avatar, count) {
        state.beams.insert(beam);
    }
}

/// Raise a shield if none exists and the score covers the cost.
pub fn raise_shield(state: &mut GameState) -> bool {
    if !state.shields.is_empty() || !state.score.try_spend(SHIELD_COST) {
        return false;
    }
    let shield = new_shield(&state.avatar, SHIELD_LIFE);
    state.shields.insert(shield);
    info!("shield raised, score now {}", state.score.value);
    true
}

/// Silence every live enemy and slow every live bomb.  Returns `None`
/// without touching anything if the score can't cover the cost.
pub fn trigger_area_effect(state: &mut GameState) -> Option<GameEvent> {
    if !state.score.try_spend(AREA_EFFECT_COST) {
        return None;
    }
    for enemy in state.enemies.values_mut() {
        enemy.drop = DropInterval::Disabled;
        enemy.distorted = true;
    }
    for bomb in state.bombs.values_mut() {
        bomb.speed *= 0.5;
        bomb.state = BombState::Inactive;
    }
    let enemies = state.enemies.len();
    let bombs = state.bombs.len();
    info!("area effect: {enemies} enemies silenced, {bombs} bombs slowed");
    Some(GameEvent::AreaEffect { enemies, bombs })
}

// ── Per-entity advance ───────────────────────────────────────────────────────

/// Move the avatar for the held keys, then run the hyper countdown and the
/// hyper key's press-edge check.
pub fn update_avatar(avatar: &mut Avatar, score: &mut Score, held: &HeldKeys) -> Option<GameEvent> {
    avatar.speed = if held.boost {
        AVATAR_BOOST_SPEED
    } else {
        AVATAR_SPEED
    };

    let mut sum = (0, 0);
    for (pressed, (dx, dy)) in [
        (held.up, (0, -1)),
        (held.down, (0, 1)),
        (held.left, (-1, 0)),
        (held.right, (1, 0)),
    ] {
        if pressed {
            sum.0 += dx;
            sum.1 += dy;
        }
    }
    let displacement = Vec2::new(sum.0 as f32, sum.1 as f32) * avatar.speed;
    avatar.rect.translate(displacement);
    if !fully_inside(&avatar.rect) {
        // Full rollback instead of clamping.
        avatar.rect.translate(-displacement);
    }
    if let Some(facing) = Facing::from_step(sum.0, sum.1) {
        avatar.facing = facing;
        avatar.expression = Expression::Neutral;
    }

    let mut event = None;
    if avatar.state == AvatarState::Hyper {
        avatar.hyper_life -= 1;
        if avatar.hyper_life <= 0 {
            avatar.state = AvatarState::Normal;
            event = Some(GameEvent::HyperEnded);
        }
    }

    let pressed_now = held.hyper;
    if pressed_now && !avatar.hyper_key_last_frame && score.try_spend(HYPER_COST) {
        avatar.state = AvatarState::Hyper;
        avatar.hyper_life += HYPER_FRAMES;
        info!("hyper for {} frames", avatar.hyper_life);
        event = Some(GameEvent::HyperActivated {
            hyper_life: avatar.hyper_life,
        });
    }
    avatar.hyper_key_last_frame = pressed_now;
    event
}

/// Descend until the stop altitude is passed, then stay put for good.
pub fn advance_enemy(enemy: &mut Enemy) -> Lifecycle {
    if enemy.state == EnemyState::Descending {
        enemy.rect.center.y += enemy.vy;
        if enemy.rect.center.y > enemy.bound {
            enemy.vy = 0.0;
            enemy.state = EnemyState::Stopped;
        }
    }
    Lifecycle::Alive
}

pub fn advance_bomb(bomb: &mut Bomb) -> Lifecycle {
    bomb.rect.translate(bomb.dir * bomb.speed);
    if fully_inside(&bomb.rect) {
        Lifecycle::Alive
    } else {
        Lifecycle::Expired
    }
}

pub fn advance_beam(beam: &mut Beam) -> Lifecycle {
    beam.rect.translate(beam.dir * beam.speed);
    if fully_inside(&beam.rect) {
        Lifecycle::Alive
    } else {
        Lifecycle::Expired
    }
}

/// Count down and re-seat the shield against the avatar's current facing.
pub fn advance_shield(shield: &mut Shield, avatar: &Avatar) -> Lifecycle {
    shield.life -= 1;
    let (rect, angle) = shield_rect(avatar);
    shield.rect = rect;
    shield.angle = angle;
    if shield.life < 0 {
        Lifecycle::Expired
    } else {
        Lifecycle::Alive
    }
}

pub fn advance_explosion(explosion: &mut Explosion) -> Lifecycle {
    explosion.life -= 1;
    if explosion.life < 0 {
        Lifecycle::Expired
    } else {
        Lifecycle::Alive
    }
}

/// Advance one collection.  Each entity is visited once and removed at most
/// once, as soon as it reports `Expired`.
fn advance_kind(
    state: &mut GameState,
    kind: EntityKind,
    held: &HeldKeys,
    events: &mut Vec<GameEvent>,
) {
    let alive = |l: Lifecycle| l == Lifecycle::Alive;
    match kind {
        EntityKind::Avatar => {
            if let Some(ev) = update_avatar(&mut state.avatar, &mut state.score, held) {
                events.push(ev);
            }
        }
        EntityKind::Shield => {
            let avatar = &state.avatar;
            state.shields.retain_mut(|s| alive(advance_shield(s, avatar)));
        }
        EntityKind::Beam => {
            state.beams.retain_mut(|b| alive(advance_beam(b)));
        }
        EntityKind::Enemy => {
            state.enemies.retain_mut(|e| alive(advance_enemy(e)));
        }
        EntityKind::Bomb => {
            state.bombs.retain_mut(|b| alive(advance_bomb(b)));
        }
        EntityKind::Explosion => {
            state.explosions.retain_mut(|x| alive(advance_explosion(x)));
        }
    }
}

// ── Collision ────────────────────────────────────────────────────────────────

/// Removal sets produced by a read-only sweep of two collections.
#[derive(Debug, Default)]
pub struct Collisions {
    /// Members of the first collection that touched anything, in slot order.
    pub first: Vec<Handle>,
    /// Members of the second collection that touched anything.
    pub second: BTreeSet<Handle>,
}

/// Every pair of overlapping bodies across the two collections.
pub fn group_collide<A: Body, B: Body>(a: &Arena<A>, b: &Arena<B>) -> Collisions {
    let mut hits = Collisions::default();
    for (ha, body_a) in a.iter() {
        let mut touched = false;
        for (hb, body_b) in b.iter() {
            if body_a.rect().overlaps(body_b.rect()) {
                touched = true;
                hits.second.insert(hb);
            }
        }
        if touched {
            hits.first.push(ha);
        }
    }
    hits
}

/// Bombs overlapping the avatar.
pub fn bombs_hitting(avatar: &Avatar, bombs: &Arena<Bomb>) -> Vec<Handle> {
    bombs
        .iter()
        .filter(|(_, bomb)| avatar.rect.overlaps(&bomb.rect))
        .map(|(h, _)| h)
        .collect()
}

/// Remove a bomb, leaving an explosion and a point behind.
fn destroy_bomb(state: &mut GameState, handle: Handle, by: EntityKind, events: &mut Vec<GameEvent>) {
    if let Some(bomb) = state.bombs.remove(handle) {
        state
            .explosions
            .insert(explosion_at(&bomb.rect, BOMB_EXPLOSION_LIFE));
        state.score.add(BOMB_POINTS);
        debug!("bomb destroyed by {:?} at {:?}", by, bomb.rect.center);
        events.push(GameEvent::BombDestroyed {
            at: bomb.rect.center,
            by,
        });
    }
}

pub fn resolve_enemy_beam(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let hits = group_collide(&state.enemies, &state.beams);
    for handle in hits.first {
        if let Some(enemy) = state.enemies.remove(handle) {
            state
                .explosions
                .insert(explosion_at(&enemy.rect, ENEMY_EXPLOSION_LIFE));
            state.score.add(ENEMY_POINTS);
            state.avatar.expression = Expression::Joy;
            debug!("enemy destroyed at {:?}", enemy.rect.center);
            events.push(GameEvent::EnemyDestroyed {
                at: enemy.rect.center,
            });
        }
    }
    for handle in hits.second {
        state.beams.remove(handle);
    }
}

pub fn resolve_bomb_beam(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let hits = group_collide(&state.bombs, &state.beams);
    for handle in hits.first {
        destroy_bomb(state, handle, EntityKind::Beam, events);
    }
    for handle in hits.second {
        state.beams.remove(handle);
    }
}

/// Shields absorb bombs and survive.
pub fn resolve_bomb_shield(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let hits = group_collide(&state.bombs, &state.shields);
    for handle in hits.first {
        destroy_bomb(state, handle, EntityKind::Shield, events);
    }
}

/// Returns true when the avatar took a fatal hit.
pub fn resolve_bomb_avatar(state: &mut GameState, events: &mut Vec<GameEvent>) -> bool {
    let hits = bombs_hitting(&state.avatar, &state.bombs);
    if hits.is_empty() {
        return false;
    }
    if state.avatar.state == AvatarState::Hyper {
        for handle in hits {
            destroy_bomb(state, handle, EntityKind::Avatar, events);
        }
        return false;
    }
    state.avatar.expression = Expression::Sorrow;
    info!("avatar hit, final score {}", state.score.value);
    events.push(GameEvent::AvatarHit);
    true
}

// ── Per-frame tick ───────────────────────────────────────────────────────────

/// Advance the game by one frame.
///
/// During a cutscene only the cutscene counter moves; quit is honoured in
/// every phase.
pub fn tick(state: &mut GameState, input: &TickInput, rng: &mut impl Rng) -> Vec<GameEvent> {
    let mut events = Vec::new();

    if input.commands.contains(&Command::Quit) {
        state.phase = Phase::GameOver;
        events.push(GameEvent::Quit);
        return events;
    }

    match state.phase {
        Phase::GameOver => return events,
        Phase::Cutscene { kind, frames_left } => {
            state.phase = if frames_left > 1 {
                Phase::Cutscene {
                    kind,
                    frames_left: frames_left - 1,
                }
            } else {
                match kind {
                    Cutscene::AreaEffect => Phase::Playing,
                    Cutscene::Defeat => Phase::GameOver,
                }
            };
            return events;
        }
        Phase::Playing => {}
    }

    // ── 1. Discrete commands ─────────────────────────────────────────────────
    let mut flash = false;
    for command in &input.commands {
        match command {
            Command::Fire => fire(state),
            Command::SpreadFire => spread_fire(state, SPREAD_COUNT),
            Command::Shield => {
                if raise_shield(state) {
                    events.push(GameEvent::ShieldRaised);
                }
            }
            Command::AreaEffect => {
                if let Some(ev) = trigger_area_effect(state) {
                    events.push(ev);
                    flash = true;
                }
            }
            Command::Quit => {}
        }
    }

    // ── 2. Spawn enemies ─────────────────────────────────────────────────────
    if state.frame % ENEMY_SPAWN_EVERY == 0 {
        let enemy = spawn_enemy(rng);
        debug!("enemy spawned at x={} bound={}", enemy.rect.center.x, enemy.bound);
        events.push(GameEvent::EnemySpawned {
            x: enemy.rect.center.x,
        });
        state.enemies.insert(enemy);
    }

    // ── 3. Stopped enemies drop bombs ────────────────────────────────────────
    let frame = state.frame;
    let mut dropped = Vec::new();
    for enemy in state.enemies.values() {
        if let (EnemyState::Stopped, DropInterval::Every(interval)) = (enemy.state, enemy.drop) {
            if interval > 0 && frame % interval as u64 == 0 {
                dropped.push(drop_bomb(enemy, &state.avatar, rng));
            }
        }
    }
    for bomb in dropped {
        events.push(GameEvent::BombDropped {
            at: bomb.rect.center,
        });
        state.bombs.insert(bomb);
    }

    // ── 4. Collisions ────────────────────────────────────────────────────────
    resolve_enemy_beam(state, &mut events);
    resolve_bomb_beam(state, &mut events);
    resolve_bomb_shield(state, &mut events);
    if resolve_bomb_avatar(state, &mut events) {
        state.phase = Phase::Cutscene {
            kind: Cutscene::Defeat,
            frames_left: DEFEAT_PAUSE,
        };
        return events;
    }

    // ── 5. Advance everything in draw order ──────────────────────────────────
    for kind in EntityKind::FRAME_ORDER {
        advance_kind(state, kind, &input.held, &mut events);
    }

    state.frame += 1;
    if flash {
        state.phase = Phase::Cutscene {
            kind: Cutscene::AreaEffect,
            frames_left: AREA_EFFECT_PAUSE,
        };
    }
    events
}
