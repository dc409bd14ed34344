//! Target game driven by hand gestures.
//!
//! One target is live at a time. A hand scores when it closes into the trigger
//! gesture while its bounding box covers the target; the target is then
//! replaced at a new random position. Events are queued and drained by the
//! host once per frame.

pub mod gesture;
pub mod hit;
pub mod target;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::config::GameConfig;
use crate::landmarks::LandmarkSet;

use self::gesture::{Gesture, GestureDebouncer, HandId};
use self::hit::BoundingBox;
use self::target::{spawn_position, Target};

/// Output frame size in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }
}

/// One tracked hand in one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct HandObservation {
    pub hand: HandId,
    pub landmarks: LandmarkSet,
    pub gesture: Gesture,
    pub confidence: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    ScoreChanged(u32),
    TargetRemoved(Target),
    TargetSpawned(Target),
}

/// Per-hand result of one frame, for optional visualization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandReport {
    pub hand: HandId,
    pub bbox: Option<BoundingBox>,
    /// Whether this frame was a rising edge into the trigger gesture.
    pub hit_tested: bool,
    pub hit: bool,
}

#[derive(Debug)]
pub struct TargetGame {
    score: u32,
    target: Target,
    next_id: u64,
    rng: StdRng,
    debouncer: GestureDebouncer,
    events: Vec<GameEvent>,
}

impl TargetGame {
    /// Starts a game with its first target already placed; the spawn is
    /// queued as an event.
    pub fn new(config: &GameConfig, viewport: Viewport) -> Self {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let target = Target {
            id: 0,
            position: spawn_position(&mut rng, viewport, config.target_radius, config.spawn_margin),
            radius: config.target_radius,
        };

        Self {
            score: 0,
            target,
            next_id: 1,
            rng,
            debouncer: GestureDebouncer::new(),
            events: vec![GameEvent::TargetSpawned(target)],
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn debouncer(&self) -> &GestureDebouncer {
        &self.debouncer
    }

    /// Runs edge detection and hit testing for every hand in this frame.
    pub fn update(
        &mut self,
        config: &GameConfig,
        hands: &[HandObservation],
        viewport: Viewport,
    ) -> Vec<HandReport> {
        let mut reports = Vec::with_capacity(hands.len());

        for observation in hands {
            let gesture = if observation.confidence >= config.min_confidence {
                observation.gesture.clone()
            } else {
                Gesture::None
            };

            let bbox = BoundingBox::from_landmarks(&observation.landmarks, viewport);
            let hit_tested = self.debouncer.observe(observation.hand, &gesture, &config.trigger);

            let hit = hit_tested && bbox.map_or(false, |b| b.contains(self.target.position));

            if hit_tested {
                debug!(hand = observation.hand, hit, "trigger gesture edge");
            }
            if hit {
                self.score_hit(config, viewport);
            }

            reports.push(HandReport {
                hand: observation.hand,
                bbox,
                hit_tested,
                hit,
            });
        }

        let present: Vec<HandId> = hands.iter().map(|h| h.hand).collect();
        self.debouncer.retain_hands(&present);

        reports
    }

    fn score_hit(&mut self, config: &GameConfig, viewport: Viewport) {
        self.score += 1;
        info!(score = self.score, target = self.target.id, "target hit");

        let removed = self.target;
        self.target = Target {
            id: self.next_id,
            position: spawn_position(
                &mut self.rng,
                viewport,
                config.target_radius,
                config.spawn_margin,
            ),
            radius: config.target_radius,
        };
        self.next_id += 1;

        self.events.push(GameEvent::ScoreChanged(self.score));
        self.events.push(GameEvent::TargetRemoved(removed));
        self.events.push(GameEvent::TargetSpawned(self.target));
    }

    /// Takes all events queued since the last call.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use nalgebra::Point2;

    use super::gesture::TriggerState;
    use super::*;
    use crate::landmarks::Landmark;

    const VIEWPORT: Viewport = Viewport::new(640.0, 480.0);

    fn config() -> GameConfig {
        GameConfig {
            seed: Some(11),
            ..GameConfig::default()
        }
    }

    // hand whose box spans the whole frame, so any target is covered
    fn covering_hand(gesture: Gesture) -> HandObservation {
        HandObservation {
            hand: 0,
            landmarks: vec![Landmark::new(0.0, 0.0, 0.0), Landmark::new(1.0, 1.0, 0.0)].into(),
            gesture,
            confidence: 0.9,
        }
    }

    // power-of-two frame so pixel -> normalized -> pixel is exact
    const EXACT_VIEWPORT: Viewport = Viewport::new(1024.0, 512.0);

    fn hand_at_target(game: &TargetGame, gesture: Gesture) -> HandObservation {
        // box with its top-left corner exactly on the target center
        let p = game.target().position;
        let x = p.x / EXACT_VIEWPORT.width;
        let y = p.y / EXACT_VIEWPORT.height;
        HandObservation {
            hand: 0,
            landmarks: vec![Landmark::new(x, y, 0.0), Landmark::new(x + 0.1, y + 0.1, 0.0)].into(),
            gesture,
            confidence: 0.9,
        }
    }

    #[test]
    fn first_target_is_announced() {
        let mut game = TargetGame::new(&config(), VIEWPORT);
        let events = game.drain_events();
        assert_eq!(events, vec![GameEvent::TargetSpawned(*game.target())]);
        assert!(game.drain_events().is_empty());
    }

    #[test]
    fn fist_over_target_scores_and_respawns() {
        let config = config();
        let mut game = TargetGame::new(&config, VIEWPORT);
        game.drain_events();
        let old = *game.target();

        let reports = game.update(&config, &[covering_hand(Gesture::ClosedFist)], VIEWPORT);
        assert!(reports[0].hit);
        assert_eq!(game.score(), 1);

        let new = *game.target();
        assert_ne!(new.id, old.id);
        assert_eq!(
            game.drain_events(),
            vec![
                GameEvent::ScoreChanged(1),
                GameEvent::TargetRemoved(old),
                GameEvent::TargetSpawned(new),
            ]
        );
    }

    #[test]
    fn held_fist_scores_once() {
        let config = config();
        let mut game = TargetGame::new(&config, VIEWPORT);

        for _ in 0..5 {
            game.update(&config, &[covering_hand(Gesture::ClosedFist)], VIEWPORT);
        }
        assert_eq!(game.score(), 1);
    }

    #[test]
    fn debounce_sequence_runs_two_hit_tests() {
        let config = config();
        let mut game = TargetGame::new(&config, VIEWPORT);
        let sequence = [
            Gesture::None,
            Gesture::None,
            Gesture::ClosedFist,
            Gesture::ClosedFist,
            Gesture::ClosedFist,
            Gesture::None,
            Gesture::ClosedFist,
        ];

        let mut hit_tests = 0;
        for g in sequence {
            let reports = game.update(&config, &[covering_hand(g)], VIEWPORT);
            hit_tests += reports.iter().filter(|r| r.hit_tested).count();
        }
        assert_eq!(hit_tests, 2);
        assert_eq!(game.score(), 2);
    }

    #[test]
    fn target_on_box_corner_is_hit() {
        let config = config();
        let mut game = TargetGame::new(&config, EXACT_VIEWPORT);
        let target = game.target().position;

        let hand = hand_at_target(&game, Gesture::ClosedFist);
        let reports = game.update(&config, &[hand], EXACT_VIEWPORT);
        let bbox = reports[0].bbox.unwrap();
        assert_eq!(Point2::new(bbox.origin_x, bbox.origin_y), target);
        assert!(reports[0].hit);
    }

    #[test]
    fn low_confidence_fist_is_ignored() {
        let config = config();
        let mut game = TargetGame::new(&config, VIEWPORT);
        let mut hand = covering_hand(Gesture::ClosedFist);
        hand.confidence = 0.1;

        let reports = game.update(&config, &[hand], VIEWPORT);
        assert!(!reports[0].hit_tested);
        assert_eq!(game.score(), 0);
    }

    #[test]
    fn fist_away_from_target_misses() {
        let config = config();
        let mut game = TargetGame::new(&config, VIEWPORT);
        let target = game.target().position;

        // a tiny box in whichever corner is farthest from the target
        let x = if target.x < VIEWPORT.width / 2.0 { 0.95 } else { 0.0 };
        let y = if target.y < VIEWPORT.height / 2.0 { 0.95 } else { 0.0 };
        let hand = HandObservation {
            hand: 0,
            landmarks: vec![
                Landmark::new(x, y, 0.0),
                Landmark::new(x + 0.05, y + 0.05, 0.0),
            ]
            .into(),
            gesture: Gesture::ClosedFist,
            confidence: 1.0,
        };

        let reports = game.update(&config, &[hand], VIEWPORT);
        assert!(reports[0].hit_tested);
        assert!(!reports[0].hit);
        assert_eq!(game.score(), 0);
    }

    #[test]
    fn hand_leaving_frame_resets_its_state() {
        let config = config();
        let mut game = TargetGame::new(&config, VIEWPORT);

        game.update(&config, &[covering_hand(Gesture::ClosedFist)], VIEWPORT);
        assert_eq!(game.debouncer().state(0, &config.trigger), TriggerState::TriggerActive);

        game.update(&config, &[], VIEWPORT);
        assert_eq!(game.debouncer().last_gesture(0), &Gesture::None);

        game.update(&config, &[covering_hand(Gesture::ClosedFist)], VIEWPORT);
        assert_eq!(game.score(), 2);
    }

    #[test]
    fn respawns_stay_inside_frame() {
        let config = config();
        let mut game = TargetGame::new(&config, VIEWPORT);
        let lo = config.target_radius + config.spawn_margin;

        for _ in 0..200 {
            game.update(&config, &[covering_hand(Gesture::ClosedFist)], VIEWPORT);
            game.update(&config, &[covering_hand(Gesture::OpenPalm)], VIEWPORT);

            let p = game.target().position;
            assert!(p.x >= lo && p.x <= VIEWPORT.width - lo);
            assert!(p.y >= lo && p.y <= VIEWPORT.height - lo);
        }
        assert_eq!(game.score(), 200);
    }
}
