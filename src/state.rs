//! Dial position state and the angle/weight mapping.
//!
//! The dial stores a single rotation angle and derives the displayed weight
//! from it. Every mutation clamps on write, so the state can never leave its
//! declared domain.

/// Lower bound of the stored rotation angle, in degrees.
pub const ANGLE_MIN: f32 = -150.0;
/// Upper bound of the stored rotation angle, in degrees.
pub const ANGLE_MAX: f32 = 0.0;
/// Largest selectable weight.
pub const WEIGHT_MAX: f32 = 160.0;
/// Degrees of rotation per pixel of horizontal drag (about 12 px per degree).
pub const DRAG_SENSITIVITY: f32 = 0.2 / 2.4;
/// Weight increment applied by the step buttons.
pub const WEIGHT_STEP: f32 = 5.0;
/// Angle shown before any input; displays a weight of 20.
pub const INITIAL_ANGLE: f32 = -19.0;

// 150/160 = 0.9375 is exact in binary, so weight -> angle -> weight round
// trips do not accumulate error.
const DEGREES_PER_WEIGHT: f32 = -ANGLE_MIN / WEIGHT_MAX;

/// Rotation state of the dial.
///
/// The stored angle is always within [`ANGLE_MIN`, `ANGLE_MAX`]; the derived
/// weight is always within `[0, WEIGHT_MAX]`. All operations are total:
/// out-of-range inputs are clamped, never rejected.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DialState {
    rotation_angle: f32,
}

impl Default for DialState {
    fn default() -> Self {
        Self {
            rotation_angle: INITIAL_ANGLE,
        }
    }
}

impl DialState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start at a given weight instead of the default angle.
    pub fn from_weight(weight: f32) -> Self {
        let mut state = Self::new();
        state.set_weight(weight);
        state
    }

    /// Current rotation angle in degrees, within [`ANGLE_MIN`, `ANGLE_MAX`].
    pub fn rotation_angle(&self) -> f32 {
        self.rotation_angle
    }

    /// Selected weight derived from the stored angle.
    pub fn weight(&self) -> f32 {
        (-self.rotation_angle / DEGREES_PER_WEIGHT).clamp(0.0, WEIGHT_MAX)
    }

    /// Weight shown on the readout badge.
    pub fn display_weight(&self) -> i32 {
        self.weight().round() as i32
    }

    /// Apply a horizontal drag delta in pixels at the default sensitivity.
    /// Returns whether the angle moved.
    pub fn drag_by(&mut self, pixel_delta: f32) -> bool {
        self.rotate_by(pixel_delta * DRAG_SENSITIVITY)
    }

    /// Rotate by a signed number of degrees, clamped to the angle domain.
    /// Returns whether the angle moved.
    pub fn rotate_by(&mut self, degrees: f32) -> bool {
        let next = (self.rotation_angle + degrees).clamp(ANGLE_MIN, ANGLE_MAX);
        let moved = next != self.rotation_angle;
        self.rotation_angle = next;
        moved
    }

    /// Step the weight up by [`WEIGHT_STEP`], snapping to a multiple of it.
    /// A no-op at the upper boundary.
    pub fn step_up(&mut self) -> bool {
        self.step(WEIGHT_STEP)
    }

    /// Step the weight down by [`WEIGHT_STEP`], snapping to a multiple of it.
    /// A no-op at the lower boundary.
    pub fn step_down(&mut self) -> bool {
        self.step(-WEIGHT_STEP)
    }

    // Steps go through the rounded display weight: the angle conversion factor
    // is not an integer ratio, and snapping the integer readout keeps repeated
    // steps on exact multiples of the step size.
    fn step(&mut self, amount: f32) -> bool {
        let snapped =
            ((self.display_weight() as f32 + amount) / WEIGHT_STEP).round() * WEIGHT_STEP;
        let before = self.rotation_angle;
        self.set_weight(snapped);
        self.rotation_angle != before
    }

    /// Jump to a weight, clamped to `[0, WEIGHT_MAX]`.
    pub fn set_weight(&mut self, weight: f32) {
        let clamped = weight.clamp(0.0, WEIGHT_MAX);
        self.rotation_angle = (-clamped * DEGREES_PER_WEIGHT).clamp(ANGLE_MIN, ANGLE_MAX);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_angle_displays_twenty() {
        let state = DialState::new();
        assert_eq!(state.rotation_angle(), INITIAL_ANGLE);
        assert_eq!(state.display_weight(), 20);
    }

    #[test]
    fn drag_clamps_at_the_floor() {
        let mut state = DialState::from_weight(0.0);
        state.drag_by(-6000.0);
        assert_eq!(state.rotation_angle(), ANGLE_MIN);
        assert_eq!(state.display_weight(), 160);

        // Further drags in the same direction are no-ops.
        assert!(!state.drag_by(-100.0));
        assert_eq!(state.rotation_angle(), ANGLE_MIN);
    }

    #[test]
    fn drag_clamps_at_the_ceiling() {
        let mut state = DialState::from_weight(80.0);
        state.drag_by(6000.0);
        assert_eq!(state.rotation_angle(), ANGLE_MAX);
        assert_eq!(state.display_weight(), 0);
    }

    #[test]
    fn drag_round_trip_returns_to_start() {
        let mut state = DialState::from_weight(80.0);
        let start = state.rotation_angle();
        state.drag_by(300.0);
        state.drag_by(-300.0);
        assert!((state.rotation_angle() - start).abs() < 1e-3);
    }

    #[test]
    fn leftward_drag_never_decreases_weight() {
        let mut state = DialState::new();
        let mut last = state.display_weight();
        for _ in 0..2000 {
            state.drag_by(-1.5);
            let weight = state.display_weight();
            assert!(weight >= last);
            assert!((0..=160).contains(&weight));
            last = weight;
        }
    }

    #[test]
    fn five_steps_from_zero_reach_twenty_five() {
        let mut state = DialState::from_weight(0.0);
        for expected in [5, 10, 15, 20, 25] {
            assert!(state.step_up());
            assert_eq!(state.display_weight(), expected);
        }
    }

    #[test]
    fn stepping_snaps_to_multiples_of_five() {
        let mut state = DialState::new();
        // Drag to an arbitrary in-between weight first.
        state.drag_by(-37.0);
        state.step_up();
        assert_eq!(state.display_weight() % 5, 0);
        state.step_down();
        assert_eq!(state.display_weight() % 5, 0);
    }

    #[test]
    fn step_up_is_idempotent_at_the_top() {
        let mut state = DialState::from_weight(WEIGHT_MAX);
        assert_eq!(state.rotation_angle(), ANGLE_MIN);
        assert!(!state.step_up());
        assert_eq!(state.rotation_angle(), ANGLE_MIN);
        assert_eq!(state.display_weight(), 160);
    }

    #[test]
    fn step_down_is_idempotent_at_the_bottom() {
        let mut state = DialState::from_weight(0.0);
        assert!(!state.step_down());
        assert_eq!(state.rotation_angle(), ANGLE_MAX);
        assert_eq!(state.display_weight(), 0);
    }

    #[test]
    fn set_weight_clamps_out_of_range_values() {
        let mut state = DialState::new();
        state.set_weight(500.0);
        assert_eq!(state.display_weight(), 160);
        state.set_weight(-10.0);
        assert_eq!(state.display_weight(), 0);
    }
}
