//! Rotation state machine for the product viewer.
//!
//! Three inputs compete for the model's yaw: page scroll, pointer drag, and
//! an idle oscillation. Drag wins while held. Any scroll event takes control
//! back and re-arms the oscillation, which starts again once scrolling has
//! been quiet for [`SCROLL_QUIET_PERIOD`].
//!
//! Time is passed in by the caller as the elapsed time since the viewer
//! started, so the controller has no clock of its own.

use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_4, TAU};
use std::time::Duration;
use tracing::trace;

/// Yaw at scroll progress 0.
pub const DEFAULT_INITIAL_YAW: f64 = -FRAC_PI_4;
/// Yaw swept from scroll progress 0 to 1.
pub const DEFAULT_ROTATION_RANGE: f64 = TAU;

/// Yaw radians per horizontal pixel of drag.
pub const DRAG_YAW_PER_PIXEL: f64 = 0.01;
/// Pitch radians per vertical pixel of drag.
pub const DRAG_PITCH_PER_PIXEL: f64 = 0.005;
/// Pitch stays within `±PITCH_LIMIT`.
pub const PITCH_LIMIT: f64 = 0.5;
/// Pitch multiplier applied on each scroll event.
pub const SCROLL_PITCH_DECAY: f64 = 0.95;

/// Yaw change per frame while oscillating.
pub const AUTO_ROTATE_SPEED: f64 = 0.003;
/// Oscillation reverses at `±AUTO_ROTATE_BOUND`.
pub const AUTO_ROTATE_BOUND: f64 = FRAC_PI_4;
/// Scrolling counts as active for this long after the last scroll event.
pub const SCROLL_QUIET_PERIOD: Duration = Duration::from_millis(150);

/// Fraction of the remaining distance covered per frame.
pub const EASING: f64 = 0.1;

/// Viewer options.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub initial_yaw: f64,
    pub rotation_range: f64,
    /// When false, pointer input is ignored.
    pub enable_interaction: bool,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            initial_yaw: DEFAULT_INITIAL_YAW,
            rotation_range: DEFAULT_ROTATION_RANGE,
            enable_interaction: true,
        }
    }
}

/// Model orientation in radians.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rotation {
    /// Rotation about the horizontal axis.
    pub pitch: f64,
    /// Rotation about the vertical axis.
    pub yaw: f64,
}

/// Which input currently owns the target angle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActiveInput {
    /// A pointer is held down.
    Drag,
    /// A scroll event arrived within the quiet period.
    Scroll,
    /// Idle oscillation.
    Auto,
    /// The user dragged and let go; the angle stays put until the next scroll.
    Held,
}

/// A mouse or touch sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pointer {
    pub x: f64,
    pub y: f64,
    /// Active touch points; 1 for a mouse.
    pub touches: u8,
}

impl Pointer {
    pub fn mouse(x: f64, y: f64) -> Self {
        Self { x, y, touches: 1 }
    }

    pub fn touch(x: f64, y: f64, touches: u8) -> Self {
        Self { x, y, touches }
    }

    fn is_single(&self) -> bool {
        self.touches == 1
    }
}

/// Input arbitration and easing for the viewer's rotation.
#[derive(Debug, Clone)]
pub struct RotationController {
    config: ViewerConfig,
    target: Rotation,
    current: Rotation,
    dragging: bool,
    last_pointer: (f64, f64),
    user_interacted: bool,
    auto_direction: f64,
    last_scroll: Option<Duration>,
}

impl Default for RotationController {
    fn default() -> Self {
        Self::new(ViewerConfig::default())
    }
}

impl RotationController {
    pub fn new(config: ViewerConfig) -> Self {
        let start = Rotation {
            pitch: 0.0,
            yaw: config.initial_yaw,
        };
        Self {
            config,
            target: start,
            current: start,
            dragging: false,
            last_pointer: (0.0, 0.0),
            user_interacted: false,
            auto_direction: 1.0,
            last_scroll: None,
        }
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    /// Rotation shown on the last frame.
    pub fn current(&self) -> Rotation {
        self.current
    }

    /// Rotation the viewer is easing toward.
    pub fn target(&self) -> Rotation {
        self.target
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Yaw for a scroll progress, clamped to `[0, 1]`.
    pub fn scroll_yaw(&self, progress: f64) -> f64 {
        self.config.initial_yaw + progress.clamp(0.0, 1.0) * self.config.rotation_range
    }

    /// Page scroll moved to `progress` at time `now`.
    pub fn on_scroll(&mut self, progress: f64, now: Duration) {
        self.last_scroll = Some(now);
        self.user_interacted = false;
        if !self.dragging {
            self.target.yaw = self.scroll_yaw(progress);
            self.target.pitch *= SCROLL_PITCH_DECAY;
        }
        trace!(progress, yaw = self.target.yaw, "Scroll");
    }

    /// Start a drag. Returns whether the pointer was accepted.
    pub fn pointer_down(&mut self, pointer: Pointer) -> bool {
        if !self.config.enable_interaction || !pointer.is_single() {
            return false;
        }
        self.dragging = true;
        self.user_interacted = true;
        self.last_pointer = (pointer.x, pointer.y);
        true
    }

    pub fn pointer_move(&mut self, pointer: Pointer) {
        if !self.dragging || !self.config.enable_interaction || !pointer.is_single() {
            return;
        }
        let dx = pointer.x - self.last_pointer.0;
        let dy = pointer.y - self.last_pointer.1;
        self.target.yaw += dx * DRAG_YAW_PER_PIXEL;
        self.target.pitch =
            (self.target.pitch + dy * DRAG_PITCH_PER_PIXEL).clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.last_pointer = (pointer.x, pointer.y);
    }

    /// End a drag. The angle stays where the user left it.
    pub fn pointer_up(&mut self) {
        self.dragging = false;
    }

    fn is_scrolling(&self, now: Duration) -> bool {
        self.last_scroll
            .is_some_and(|at| now.saturating_sub(at) < SCROLL_QUIET_PERIOD)
    }

    pub fn active_input(&self, now: Duration) -> ActiveInput {
        if self.dragging {
            ActiveInput::Drag
        } else if self.is_scrolling(now) {
            ActiveInput::Scroll
        } else if self.user_interacted {
            ActiveInput::Held
        } else {
            ActiveInput::Auto
        }
    }

    /// Advance one frame and return the rotation to render.
    pub fn frame(&mut self, now: Duration) -> Rotation {
        if self.active_input(now) == ActiveInput::Auto {
            self.target.yaw += AUTO_ROTATE_SPEED * self.auto_direction;
            if self.target.yaw >= AUTO_ROTATE_BOUND {
                self.target.yaw = AUTO_ROTATE_BOUND;
                self.auto_direction = -1.0;
            } else if self.target.yaw <= -AUTO_ROTATE_BOUND {
                self.target.yaw = -AUTO_ROTATE_BOUND;
                self.auto_direction = 1.0;
            }
        }

        self.current.pitch += (self.target.pitch - self.current.pitch) * EASING;
        self.current.yaw += (self.target.yaw - self.current.yaw) * EASING;
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const EPS: f64 = 1e-9;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_scroll_maps_progress_to_yaw() {
        let mut rc = RotationController::default();
        rc.on_scroll(0.5, ms(0));
        assert!((rc.target().yaw - (-FRAC_PI_4 + std::f64::consts::PI)).abs() < EPS);

        rc.on_scroll(2.0, ms(10));
        assert!((rc.target().yaw - (-FRAC_PI_4 + TAU)).abs() < EPS);
        assert_eq!(rc.active_input(ms(20)), ActiveInput::Scroll);
    }

    #[test]
    fn test_drag_wins_over_scroll() {
        let mut rc = RotationController::default();
        assert!(rc.pointer_down(Pointer::mouse(100.0, 100.0)));
        rc.pointer_move(Pointer::mouse(150.0, 100.0));
        let dragged = rc.target().yaw;
        assert!((dragged - (DEFAULT_INITIAL_YAW + 0.5)).abs() < EPS);

        rc.on_scroll(1.0, ms(0));
        assert_eq!(rc.target().yaw, dragged);
        assert_eq!(rc.active_input(ms(1)), ActiveInput::Drag);
    }

    #[test]
    fn test_pitch_is_clamped() {
        let mut rc = RotationController::default();
        rc.pointer_down(Pointer::mouse(0.0, 0.0));
        rc.pointer_move(Pointer::mouse(0.0, 1000.0));
        assert_eq!(rc.target().pitch, PITCH_LIMIT);
        rc.pointer_move(Pointer::mouse(0.0, -1000.0));
        assert_eq!(rc.target().pitch, -PITCH_LIMIT);
    }

    #[test]
    fn test_release_holds_angle_until_scroll() {
        let mut rc = RotationController::default();
        rc.pointer_down(Pointer::mouse(0.0, 0.0));
        rc.pointer_move(Pointer::mouse(20.0, 0.0));
        rc.pointer_up();

        let held = rc.target().yaw;
        for frame in 0..10 {
            rc.frame(ms(1000 + frame * 16));
        }
        assert_eq!(rc.active_input(ms(2000)), ActiveInput::Held);
        assert_eq!(rc.target().yaw, held);

        rc.on_scroll(0.0, ms(3000));
        assert_eq!(rc.active_input(ms(3000 + 149)), ActiveInput::Scroll);
        assert_eq!(rc.active_input(ms(3000 + 150)), ActiveInput::Auto);
    }

    #[test]
    fn test_scroll_decays_pitch() {
        let mut rc = RotationController::default();
        rc.pointer_down(Pointer::mouse(0.0, 0.0));
        rc.pointer_move(Pointer::mouse(0.0, 40.0));
        rc.pointer_up();
        assert!((rc.target().pitch - 0.2).abs() < EPS);

        rc.on_scroll(0.0, ms(0));
        assert!((rc.target().pitch - 0.19).abs() < EPS);
    }

    #[test]
    fn test_auto_oscillation_reverses_at_bounds() {
        let mut rc = RotationController::default();
        assert_eq!(rc.active_input(ms(0)), ActiveInput::Auto);

        // Starts at the lower bound and moves up.
        rc.frame(ms(0));
        assert!((rc.target().yaw - (-FRAC_PI_4 + AUTO_ROTATE_SPEED)).abs() < EPS);

        let mut reached_top = false;
        for frame in 1..1000 {
            rc.frame(ms(frame * 16));
            if rc.target().yaw == AUTO_ROTATE_BOUND {
                reached_top = true;
                break;
            }
        }
        assert!(reached_top);
        let top = rc.target().yaw;
        rc.frame(ms(20_000));
        assert!(rc.target().yaw < top);
    }

    #[test]
    fn test_no_oscillation_while_scrolling() {
        let mut rc = RotationController::default();
        rc.on_scroll(0.25, ms(1000));
        let yaw = rc.target().yaw;
        rc.frame(ms(1100));
        assert_eq!(rc.target().yaw, yaw);
    }

    #[test]
    fn test_frame_eases_toward_target() {
        let mut rc = RotationController::default();
        rc.on_scroll(1.0, ms(0));
        let start = rc.current().yaw;
        let target = rc.target().yaw;

        let after = rc.frame(ms(16)).yaw;
        assert!((after - (start + (target - start) * EASING)).abs() < EPS);
    }

    #[test]
    fn test_disabled_interaction_ignores_pointer() {
        let mut rc = RotationController::new(ViewerConfig {
            enable_interaction: false,
            ..ViewerConfig::default()
        });
        assert!(!rc.pointer_down(Pointer::mouse(0.0, 0.0)));
        rc.pointer_move(Pointer::mouse(100.0, 100.0));
        assert!(!rc.is_dragging());
        assert_eq!(rc.target().yaw, DEFAULT_INITIAL_YAW);
    }

    #[test]
    fn test_multi_touch_is_ignored() {
        let mut rc = RotationController::default();
        assert!(!rc.pointer_down(Pointer::touch(0.0, 0.0, 2)));

        assert!(rc.pointer_down(Pointer::touch(0.0, 0.0, 1)));
        rc.pointer_move(Pointer::touch(100.0, 0.0, 2));
        assert_eq!(rc.target().yaw, DEFAULT_INITIAL_YAW);
    }

    #[test]
    fn test_config_deserializes_with_defaults() {
        let config: ViewerConfig =
            serde_json::from_str(r#"{ "enable_interaction": false }"#).unwrap();
        assert_eq!(config.initial_yaw, DEFAULT_INITIAL_YAW);
        assert!(!config.enable_interaction);
    }

    proptest! {
        #[test]
        fn test_pitch_stays_in_limits_for_any_drag(moves in proptest::collection::vec((-500.0f64..500.0, -500.0f64..500.0), 1..50)) {
            let mut rc = RotationController::default();
            rc.pointer_down(Pointer::mouse(0.0, 0.0));
            for (x, y) in moves {
                rc.pointer_move(Pointer::mouse(x, y));
                prop_assert!(rc.target().pitch.abs() <= PITCH_LIMIT);
            }
        }
    }
}
