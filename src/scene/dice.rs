//! The dice battle: two ships trade fistfuls of dice until one hull
//! gives out.
//!
//! Dice are plain position/velocity entities: thrown with a burst of
//! speed toward a target, damped exponentially, settled once slow.
//! Settled faces sum into hull damage against the opposing ship, with
//! camera shake scaled by the hit.

use glam::Vec2;
use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::consts::{HEIGHT, MAX_FRAME_DT, WIDTH};
use crate::engine::draw::DrawSurface;
use crate::engine::game::{Key, Scene, SceneContext};
use crate::engine::mouse::Mouse;
use crate::engine::random::random;
use crate::normalize_angle;
use crate::settings::Settings;

/// Dice thrown per roll
const DICE_PER_ROLL: usize = 3;
/// Die edge length in simulation pixels
const DIE_SIZE: f32 = 40.0;
/// Starting hull integrity for both ships
const HULL_MAX: i32 = 30;
/// Exponential damping applied to tumbling dice (per second)
const DAMPING: f32 = 2.5;
/// Below this speed a die counts as settled (pixels/sec)
const SETTLE_SPEED: f32 = 30.0;
/// While faster than this a die still tumbles through faces
const TUMBLE_SPEED: f32 = 90.0;
/// Beat between dice settling and damage landing (seconds)
const RESOLVE_DELAY: f32 = 0.8;
/// Enemy wind-up before rolling back (seconds)
const ENEMY_ROLL_DELAY: f32 = 1.2;

/// Table region the dice tumble across
const TABLE_LEFT: f32 = 80.0;
const TABLE_RIGHT: f32 = WIDTH - 80.0;
const TABLE_TOP: f32 = 330.0;
const TABLE_BOTTOM: f32 = HEIGHT - 80.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Turn {
    Player,
    Enemy,
}

impl Turn {
    fn opponent(self) -> Turn {
        match self {
            Turn::Player => Turn::Enemy,
            Turn::Enemy => Turn::Player,
        }
    }
}

/// Current phase of the battle
#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    /// Waiting for the player to throw
    PlayerTurn,
    /// Dice are tumbling
    Rolling(Turn),
    /// Dice settled; damage lands after a short beat
    Resolving { turn: Turn, timer: f32 },
    /// Enemy winds up before rolling back
    EnemyWindup { timer: f32 },
    Victory,
    Defeat,
}

#[derive(Debug, Clone, Copy)]
struct Ship {
    hull: i32,
    x: f32,
}

#[derive(Debug, Clone, Copy)]
struct Die {
    pos: Vec2,
    vel: Vec2,
    angle: f32,
    spin: f32,
    value: u8,
}

impl Die {
    fn settled(&self) -> bool {
        self.vel.length() < SETTLE_SPEED
    }
}

pub struct DiceScene {
    settings: Settings,
    phase: Phase,
    player: Ship,
    enemy: Ship,
    dice: Vec<Die>,
    rng: Pcg32,
    last_time: Option<f64>,
}

impl DiceScene {
    pub fn new(settings: Settings, seed: u64) -> Self {
        Self {
            settings,
            phase: Phase::PlayerTurn,
            player: Ship {
                hull: HULL_MAX,
                x: 150.0,
            },
            enemy: Ship {
                hull: HULL_MAX,
                x: WIDTH - 150.0,
            },
            dice: Vec::with_capacity(DICE_PER_ROLL),
            rng: Pcg32::seed_from_u64(seed),
            last_time: None,
        }
    }

    fn restart(&mut self) {
        self.player.hull = HULL_MAX;
        self.enemy.hull = HULL_MAX;
        self.dice.clear();
        self.phase = Phase::PlayerTurn;
        log::info!("battle restarted");
    }

    fn deck_center(turn: Turn) -> Vec2 {
        match turn {
            Turn::Player => Vec2::new(TABLE_LEFT + 60.0, (TABLE_TOP + TABLE_BOTTOM) / 2.0),
            Turn::Enemy => Vec2::new(TABLE_RIGHT - 60.0, (TABLE_TOP + TABLE_BOTTOM) / 2.0),
        }
    }

    /// Throw a fistful of dice from `turn`'s deck edge toward `target`.
    fn roll(&mut self, turn: Turn, target: Vec2) {
        let origin = Self::deck_center(turn);
        let aim = (target - origin).normalize_or(Vec2::X * if turn == Turn::Player { 1.0 } else { -1.0 });

        self.dice.clear();
        for i in 0..DICE_PER_ROLL {
            let spread = random(&mut self.rng, -0.5, 0.5);
            let dir = Vec2::from_angle(aim.to_angle() + spread);
            let speed = random(&mut self.rng, 260.0, 420.0);
            self.dice.push(Die {
                pos: origin + Vec2::new(0.0, (i as f32 - 1.0) * (DIE_SIZE + 6.0)),
                vel: dir * speed,
                angle: 0.0,
                spin: random(&mut self.rng, -8.0, 8.0),
                value: self.rng.random_range(1..=6),
            });
        }
        self.phase = Phase::Rolling(turn);
        log::debug!("{turn:?} rolls");
    }

    fn integrate_dice(&mut self, dt: f32) {
        let damp = (-DAMPING * dt).exp();
        for die in &mut self.dice {
            die.pos += die.vel * dt;
            die.angle = normalize_angle(die.angle + die.spin * dt);
            die.vel *= damp;
            die.spin *= damp;

            // Keep dice on the table: reflect off the edges
            if die.pos.x < TABLE_LEFT {
                die.pos.x = TABLE_LEFT;
                die.vel.x = die.vel.x.abs();
            } else if die.pos.x > TABLE_RIGHT {
                die.pos.x = TABLE_RIGHT;
                die.vel.x = -die.vel.x.abs();
            }
            if die.pos.y < TABLE_TOP {
                die.pos.y = TABLE_TOP;
                die.vel.y = die.vel.y.abs();
            } else if die.pos.y > TABLE_BOTTOM {
                die.pos.y = TABLE_BOTTOM;
                die.vel.y = -die.vel.y.abs();
            }

            // A fast die is still tumbling through faces
            if die.vel.length() > TUMBLE_SPEED {
                die.value = self.rng.random_range(1..=6);
            }
        }
    }

    /// Sum of settled faces
    fn rolled_total(&self) -> i32 {
        self.dice.iter().map(|d| i32::from(d.value)).sum()
    }

    fn apply_damage(&mut self, turn: Turn, ctx: &mut SceneContext<'_>) {
        let total = self.rolled_total();
        let target = match turn.opponent() {
            Turn::Player => &mut self.player,
            Turn::Enemy => &mut self.enemy,
        };
        target.hull = (target.hull - total).max(0);
        log::info!("{turn:?} hits for {total}");

        if self.settings.effective_screen_shake() {
            ctx.camera
                .shake(4.0 + total as f32 * 0.5, 0.3, total as f32 * 0.4);
        }
        self.dice.clear();

        self.phase = if self.enemy.hull == 0 {
            log::info!("enemy ship sunk");
            Phase::Victory
        } else if self.player.hull == 0 {
            log::info!("player ship sunk");
            Phase::Defeat
        } else {
            match turn {
                Turn::Player => Phase::EnemyWindup {
                    timer: ENEMY_ROLL_DELAY,
                },
                Turn::Enemy => Phase::PlayerTurn,
            }
        };
    }

    /// Roll on player input, or restart after the battle ended.
    fn player_action(&mut self, target: Vec2) {
        match self.phase {
            Phase::PlayerTurn => self.roll(Turn::Player, target),
            Phase::Victory | Phase::Defeat => self.restart(),
            _ => {}
        }
    }

    fn banner(&self) -> &'static str {
        match self.phase {
            Phase::PlayerTurn => "Your roll - click to throw",
            Phase::Rolling(_) => "",
            Phase::Resolving { .. } => "",
            Phase::EnemyWindup { .. } => "Enemy winds up...",
            Phase::Victory => "Victory! Click to sail again",
            Phase::Defeat => "Sunk... Click to sail again",
        }
    }

    fn draw_ship(&self, surface: &dyn DrawSurface, ship: &Ship, facing_right: bool) {
        let x = f64::from(ship.x);
        let deck_y = f64::from(TABLE_TOP) - 40.0;

        // Hull
        surface.set_fill("#5b3a1e");
        surface.fill_rect(x - 60.0, deck_y, 120.0, 34.0);
        // Mast and sail
        surface.set_stroke("#2f1f10");
        surface.set_line_width(4.0);
        surface.line(x, deck_y, x, deck_y - 90.0);
        surface.set_fill("#e8e1cf");
        let sail_dir = if facing_right { 1.0 } else { -1.0 };
        surface.fill_rect(x.min(x + sail_dir * 44.0), deck_y - 86.0, 44.0, 56.0);

        // Hull integrity bar
        let frac = f64::from(ship.hull) / f64::from(HULL_MAX);
        surface.set_fill("#1b1b24");
        surface.fill_rect(x - 50.0, deck_y - 110.0, 100.0, 10.0);
        surface.set_fill(if frac > 0.35 { "#4caf6e" } else { "#c94f4f" });
        surface.fill_rect(x - 50.0, deck_y - 110.0, 100.0 * frac, 10.0);
    }

    fn draw_die(&self, surface: &dyn DrawSurface, die: &Die) {
        let half = f64::from(DIE_SIZE) / 2.0;
        surface.save();
        surface.translate(f64::from(die.pos.x), f64::from(die.pos.y));
        surface.rotate(f64::from(die.angle));
        surface.set_fill("#f4ecd8");
        surface.fill_rect(-half, -half, f64::from(DIE_SIZE), f64::from(DIE_SIZE));
        surface.set_stroke("#1b1b24");
        surface.set_line_width(2.0);
        surface.stroke_rect(-half, -half, f64::from(DIE_SIZE), f64::from(DIE_SIZE));

        surface.set_fill("#1b1b24");
        let q = half * 0.5;
        for &(px, py) in pip_offsets(die.value) {
            surface.fill_circle(px * q, py * q, 3.5);
        }
        surface.restore();
    }
}

/// Pip layout per face, in quarter-die units
fn pip_offsets(value: u8) -> &'static [(f64, f64)] {
    match value {
        1 => &[(0.0, 0.0)],
        2 => &[(-1.0, -1.0), (1.0, 1.0)],
        3 => &[(-1.0, -1.0), (0.0, 0.0), (1.0, 1.0)],
        4 => &[(-1.0, -1.0), (1.0, -1.0), (-1.0, 1.0), (1.0, 1.0)],
        5 => &[
            (-1.0, -1.0),
            (1.0, -1.0),
            (0.0, 0.0),
            (-1.0, 1.0),
            (1.0, 1.0),
        ],
        _ => &[
            (-1.0, -1.0),
            (-1.0, 0.0),
            (-1.0, 1.0),
            (1.0, -1.0),
            (1.0, 0.0),
            (1.0, 1.0),
        ],
    }
}

impl Scene for DiceScene {
    fn update(&mut self, time: f64, _mouse: &Mouse, ctx: &mut SceneContext<'_>) {
        let dt = match self.last_time {
            Some(prev) => (((time - prev) / 1000.0) as f32).clamp(0.0, MAX_FRAME_DT),
            None => 0.0,
        };
        self.last_time = Some(time);

        self.integrate_dice(dt);

        match self.phase {
            Phase::Rolling(turn) => {
                if !self.dice.is_empty() && self.dice.iter().all(Die::settled) {
                    self.phase = Phase::Resolving {
                        turn,
                        timer: RESOLVE_DELAY,
                    };
                }
            }
            Phase::Resolving { turn, timer } => {
                let timer = timer - dt;
                if timer <= 0.0 {
                    self.apply_damage(turn, ctx);
                } else {
                    self.phase = Phase::Resolving { turn, timer };
                }
            }
            Phase::EnemyWindup { timer } => {
                let timer = timer - dt;
                if timer <= 0.0 {
                    self.roll(Turn::Enemy, Self::deck_center(Turn::Player));
                } else {
                    self.phase = Phase::EnemyWindup { timer };
                }
            }
            _ => {}
        }
    }

    fn draw(&self, surface: &dyn DrawSurface) {
        // Sky and sea
        surface.set_fill("#101628");
        surface.fill_rect(0.0, 0.0, f64::from(WIDTH), f64::from(HEIGHT));
        surface.set_fill("#16324a");
        surface.fill_rect(
            0.0,
            f64::from(TABLE_TOP) - 10.0,
            f64::from(WIDTH),
            f64::from(HEIGHT - TABLE_TOP) + 10.0,
        );

        self.draw_ship(surface, &self.player, true);
        self.draw_ship(surface, &self.enemy, false);

        for die in &self.dice {
            self.draw_die(surface, die);
        }

        let banner = self.banner();
        if !banner.is_empty() {
            surface.set_fill("#e8e1cf");
            surface.set_font("20px monospace");
            surface.set_text_align("center");
            surface.fill_text(banner, f64::from(WIDTH) / 2.0, 60.0);
        }
    }

    fn pressed(&mut self, key: &Key, ctx: &mut SceneContext<'_>) {
        match key.0.as_str() {
            " " | "Enter" => self.player_action(Self::deck_center(Turn::Enemy)),
            "r" | "R" => self.restart(),
            "m" | "M" => ctx.audio.set_muted(!ctx.audio.muted()),
            _ => {}
        }
    }

    fn click(&mut self, mouse: &Mouse, _ctx: &mut SceneContext<'_>) {
        // Throws are aimed at the click position
        self.player_action(mouse.pos());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::AudioManager;
    use crate::engine::camera::Camera;

    fn harness() -> (Camera, AudioManager) {
        (Camera::new(0), AudioManager::new(false))
    }

    /// Step the scene at ~60fps until `done`, up to `max_frames`.
    fn drive(
        scene: &mut DiceScene,
        camera: &mut Camera,
        audio: &AudioManager,
        max_frames: u32,
        mut done: impl FnMut(&DiceScene) -> bool,
    ) {
        let start = scene.last_time.unwrap_or(0.0);
        for i in 0..max_frames {
            let mut ctx = SceneContext {
                camera: &mut *camera,
                audio,
            };
            scene.update(start + f64::from(i + 1) * 16.0, &Mouse::default(), &mut ctx);
            if done(scene) {
                return;
            }
        }
        panic!("scene never reached expected state");
    }

    #[test]
    fn click_throws_a_full_fistful() {
        let (mut camera, audio) = harness();
        let mut scene = DiceScene::new(Settings::default(), 1);
        let mouse = Mouse {
            x: 600.0,
            y: 400.0,
            pressing: true,
        };
        scene.click(&mouse, &mut SceneContext {
            camera: &mut camera,
            audio: &audio,
        });

        assert_eq!(scene.phase, Phase::Rolling(Turn::Player));
        assert_eq!(scene.dice.len(), DICE_PER_ROLL);
        assert!(scene.dice.iter().all(|d| (1..=6).contains(&d.value)));
        assert!(scene.dice.iter().all(|d| d.vel.length() > SETTLE_SPEED));
    }

    #[test]
    fn settled_roll_damages_the_enemy() {
        let (mut camera, audio) = harness();
        let mut scene = DiceScene::new(Settings::default(), 2);
        scene.pressed(&Key(" ".into()), &mut SceneContext {
            camera: &mut camera,
            audio: &audio,
        });

        drive(&mut scene, &mut camera, &audio, 2000, |s| {
            s.enemy.hull < HULL_MAX
        });
        // Three faces land between 3 and 18 points of damage
        let dealt = HULL_MAX - scene.enemy.hull;
        assert!((3..=18).contains(&dealt), "dealt {dealt}");
        assert!(scene.dice.is_empty());
        assert!(matches!(scene.phase, Phase::EnemyWindup { .. }));
    }

    #[test]
    fn enemy_rolls_back_and_play_returns() {
        let (mut camera, audio) = harness();
        let mut scene = DiceScene::new(Settings::default(), 3);
        scene.pressed(&Key(" ".into()), &mut SceneContext {
            camera: &mut camera,
            audio: &audio,
        });

        drive(&mut scene, &mut camera, &audio, 4000, |s| {
            s.player.hull < HULL_MAX
        });
        assert_eq!(scene.phase, Phase::PlayerTurn);
    }

    #[test]
    fn sinking_the_enemy_wins() {
        let (mut camera, audio) = harness();
        let mut scene = DiceScene::new(Settings::default(), 4);
        scene.enemy.hull = 1;
        scene.pressed(&Key(" ".into()), &mut SceneContext {
            camera: &mut camera,
            audio: &audio,
        });

        drive(&mut scene, &mut camera, &audio, 2000, |s| {
            s.phase == Phase::Victory
        });
        assert_eq!(scene.enemy.hull, 0);

        // Any action from the end screen starts over
        scene.player_action(Vec2::ZERO);
        assert_eq!(scene.phase, Phase::PlayerTurn);
        assert_eq!(scene.enemy.hull, HULL_MAX);
        assert_eq!(scene.player.hull, HULL_MAX);
    }

    #[test]
    fn reduced_motion_skips_the_shake() {
        let (mut camera, audio) = harness();
        let settings = Settings {
            reduced_motion: true,
            ..Settings::default()
        };
        let mut scene = DiceScene::new(settings, 5);
        scene.pressed(&Key(" ".into()), &mut SceneContext {
            camera: &mut camera,
            audio: &audio,
        });
        drive(&mut scene, &mut camera, &audio, 2000, |s| {
            s.enemy.hull < HULL_MAX
        });

        camera.update();
        assert_eq!(camera.offset, Vec2::ZERO);
        assert_eq!(camera.rotation, 0.0);
    }

    #[test]
    fn damage_shakes_the_camera() {
        let (mut camera, audio) = harness();
        let mut scene = DiceScene::new(Settings::default(), 6);
        scene.pressed(&Key(" ".into()), &mut SceneContext {
            camera: &mut camera,
            audio: &audio,
        });
        drive(&mut scene, &mut camera, &audio, 2000, |s| {
            s.enemy.hull < HULL_MAX
        });

        // Amplitude is armed; some draw within the next few frames must move
        let mut moved = false;
        for _ in 0..32 {
            camera.update();
            moved |= camera.offset != Vec2::ZERO;
        }
        assert!(moved);
    }

    #[test]
    fn mute_key_toggles_audio() {
        let (mut camera, audio) = harness();
        let mut scene = DiceScene::new(Settings::default(), 7);
        scene.pressed(&Key("m".into()), &mut SceneContext {
            camera: &mut camera,
            audio: &audio,
        });
        assert!(audio.muted());
        scene.pressed(&Key("M".into()), &mut SceneContext {
            camera: &mut camera,
            audio: &audio,
        });
        assert!(!audio.muted());
    }

    #[test]
    fn same_seed_same_battle() {
        let (mut cam_a, audio_a) = harness();
        let (mut cam_b, audio_b) = harness();
        let mut a = DiceScene::new(Settings::default(), 11);
        let mut b = DiceScene::new(Settings::default(), 11);

        a.pressed(&Key(" ".into()), &mut SceneContext {
            camera: &mut cam_a,
            audio: &audio_a,
        });
        b.pressed(&Key(" ".into()), &mut SceneContext {
            camera: &mut cam_b,
            audio: &audio_b,
        });

        for i in 0..600 {
            let t = f64::from(i) * 16.0;
            a.update(t, &Mouse::default(), &mut SceneContext {
                camera: &mut cam_a,
                audio: &audio_a,
            });
            b.update(t, &Mouse::default(), &mut SceneContext {
                camera: &mut cam_b,
                audio: &audio_b,
            });
        }
        assert_eq!(a.enemy.hull, b.enemy.hull);
        assert_eq!(a.player.hull, b.player.hull);
    }
}
