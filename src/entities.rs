/// All game entity types — pure data, no game rules.
///
/// The rules that move, spawn and destroy these live in `compute`.

use glam::Vec2;

use crate::arena::Arena;
use crate::geometry::Rect;

// ── Tags ──────────────────────────────────────────────────────────────────────

/// Closed set of entity variants.  The per-frame update in `compute` is
/// dispatched on this tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Avatar,
    Shield,
    Beam,
    Enemy,
    Bomb,
    Explosion,
}

impl EntityKind {
    /// Update and draw order; later entries occlude earlier ones.
    pub const FRAME_ORDER: [EntityKind; 6] = [
        EntityKind::Avatar,
        EntityKind::Shield,
        EntityKind::Beam,
        EntityKind::Enemy,
        EntityKind::Bomb,
        EntityKind::Explosion,
    ];
}

/// Result of advancing an entity by one frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lifecycle {
    Alive,
    Expired,
}

/// Anything with a bounding box that can take part in collision checks.
pub trait Body {
    fn rect(&self) -> &Rect;
}

// ── Avatar ────────────────────────────────────────────────────────────────────

/// One of the eight compass directions the avatar can face.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Facing {
    East,
    NorthEast,
    North,
    NorthWest,
    West,
    SouthWest,
    South,
    SouthEast,
}

impl Facing {
    /// Map an accumulated key vector (components in -1..=1, screen Y down)
    /// onto a facing.  The zero vector has no facing.
    pub fn from_step(dx: i32, dy: i32) -> Option<Self> {
        match (dx.signum(), dy.signum()) {
            (1, 0) => Some(Facing::East),
            (1, -1) => Some(Facing::NorthEast),
            (0, -1) => Some(Facing::North),
            (-1, -1) => Some(Facing::NorthWest),
            (-1, 0) => Some(Facing::West),
            (-1, 1) => Some(Facing::SouthWest),
            (0, 1) => Some(Facing::South),
            (1, 1) => Some(Facing::SouthEast),
            _ => None,
        }
    }

    /// Integer direction vector, screen Y down.
    pub fn step(&self) -> (i32, i32) {
        match self {
            Facing::East => (1, 0),
            Facing::NorthEast => (1, -1),
            Facing::North => (0, -1),
            Facing::NorthWest => (-1, -1),
            Facing::West => (-1, 0),
            Facing::SouthWest => (-1, 1),
            Facing::South => (0, 1),
            Facing::SouthEast => (1, 1),
        }
    }

    /// Counter-clockwise angle from east, in degrees.
    pub fn degrees(&self) -> f32 {
        let (dx, dy) = self.step();
        (-(dy as f32)).atan2(dx as f32).to_degrees()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AvatarState {
    Normal,
    /// Invulnerable: bombs that touch the avatar are destroyed instead.
    Hyper,
}

/// Face shown instead of the directional sprite.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Expression {
    Neutral,
    /// After destroying an enemy; cleared by the next move.
    Joy,
    /// On the fatal hit.
    Sorrow,
}

#[derive(Clone, Debug)]
pub struct Avatar {
    pub rect: Rect,
    pub facing: Facing,
    pub speed: f32,
    pub state: AvatarState,
    /// Frames of hyper left; only counts down in `AvatarState::Hyper`.
    pub hyper_life: i32,
    /// Whether the hyper key was held during the previous frame.
    pub hyper_key_last_frame: bool,
    pub expression: Expression,
}

// ── Enemy ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnemyState {
    Descending,
    /// Terminal: the enemy never moves vertically again.
    Stopped,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DropInterval {
    /// Drop a bomb on every frame divisible by this many.
    Every(u32),
    /// Permanently silenced by the area effect.
    Disabled,
}

#[derive(Clone, Debug)]
pub struct Enemy {
    pub rect: Rect,
    /// Vertical speed; zero once stopped.
    pub vy: f32,
    /// Altitude (centre Y) past which the enemy stops.
    pub bound: f32,
    pub state: EnemyState,
    pub drop: DropInterval,
    /// Sprite variant, `0..ENEMY_VARIANTS`.
    pub variant: u8,
    /// Rendered with the area-effect distortion.
    pub distorted: bool,
}

// ── Projectiles ───────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BombState {
    Active,
    /// Slowed by the area effect.  Still collides like an active bomb.
    Inactive,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BombColor {
    Red,
    Green,
    Blue,
    Yellow,
    Magenta,
    Cyan,
}

impl BombColor {
    pub const ALL: [BombColor; 6] = [
        BombColor::Red,
        BombColor::Green,
        BombColor::Blue,
        BombColor::Yellow,
        BombColor::Magenta,
        BombColor::Cyan,
    ];
}

/// Projectile dropped by a stopped enemy.  Aimed once at creation.
#[derive(Clone, Debug)]
pub struct Bomb {
    pub rect: Rect,
    /// Unit direction fixed at creation.
    pub dir: Vec2,
    pub speed: f32,
    pub state: BombState,
    pub radius: u32,
    pub color: BombColor,
}

/// Player shot travelling in a straight line.
#[derive(Clone, Debug)]
pub struct Beam {
    pub rect: Rect,
    pub dir: Vec2,
    pub speed: f32,
    /// Firing angle in degrees, counter-clockwise from east.
    pub angle: f32,
}

// ── Shield & effects ──────────────────────────────────────────────────────────

/// Bar held just beyond the avatar in its facing direction.
#[derive(Clone, Debug)]
pub struct Shield {
    pub rect: Rect,
    pub angle: f32,
    /// Frames left; the shield is removed once this goes negative.
    pub life: i32,
}

#[derive(Clone, Debug)]
pub struct Explosion {
    pub rect: Rect,
    pub life: i32,
}

impl Explosion {
    /// Which of the two alternating images to show.
    pub fn frame(&self) -> usize {
        use crate::consts::EXPLOSION_FLIP_EVERY;
        self.life.div_euclid(EXPLOSION_FLIP_EVERY).rem_euclid(2) as usize
    }
}

impl Body for Avatar {
    fn rect(&self) -> &Rect {
        &self.rect
    }
}

impl Body for Enemy {
    fn rect(&self) -> &Rect {
        &self.rect
    }
}

impl Body for Bomb {
    fn rect(&self) -> &Rect {
        &self.rect
    }
}

impl Body for Beam {
    fn rect(&self) -> &Rect {
        &self.rect
    }
}

impl Body for Shield {
    fn rect(&self) -> &Rect {
        &self.rect
    }
}

impl Body for Explosion {
    fn rect(&self) -> &Rect {
        &self.rect
    }
}

// ── Score ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Score {
    pub value: u32,
}

impl Score {
    pub fn add(&mut self, points: u32) {
        self.value = self.value.saturating_add(points);
    }

    /// Deduct `cost` if affordable.  Returns whether the deduction happened.
    pub fn try_spend(&mut self, cost: u32) -> bool {
        if self.value < cost {
            return false;
        }
        self.value -= cost;
        true
    }

    pub fn text(&self) -> String {
        format!("Score: {}", self.value)
    }
}

// ── Loop phase & events ───────────────────────────────────────────────────────

/// Bounded pause during which the simulation clock is frozen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cutscene {
    /// Full-screen flash after the area effect.
    AreaEffect,
    /// Sorrow face and final score before the game ends.
    Defeat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Playing,
    Cutscene { kind: Cutscene, frames_left: u32 },
    GameOver,
}

/// Something that happened during one tick.
#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    EnemySpawned { x: f32 },
    BombDropped { at: Vec2 },
    EnemyDestroyed { at: Vec2 },
    BombDestroyed { at: Vec2, by: EntityKind },
    HyperActivated { hyper_life: i32 },
    HyperEnded,
    ShieldRaised,
    AreaEffect { enemies: usize, bombs: usize },
    AvatarHit,
    Quit,
}

// ── Master game state ─────────────────────────────────────────────────────────

/// The entire game state.  Every collection exclusively owns its members.
#[derive(Clone, Debug)]
pub struct GameState {
    pub avatar: Avatar,
    pub shields: Arena<Shield>,
    pub beams: Arena<Beam>,
    pub enemies: Arena<Enemy>,
    pub bombs: Arena<Bomb>,
    pub explosions: Arena<Explosion>,
    pub score: Score,
    pub phase: Phase,
    /// Frames simulated so far; frozen during cutscenes.
    pub frame: u64,
}
