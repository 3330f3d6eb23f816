//! Direction classification for joystick and button input.
//!
//! A joystick gesture arrives as a 2D vector with x in [-1, 1] (right
//! positive) and y in [-1, 1] (up positive). The vector is classified into one
//! of five discrete motion commands by its angle. The interval boundaries are
//! half-open and right-inclusive: 45 degrees classifies as `Right`, not
//! `Forward`. The rover firmware expects this exact convention, so it must not
//! be "fixed" to a symmetric one.

/// One of the five discrete motion commands understood by the rover.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Stop,
    Forward,
    Backward,
    Left,
    Right,
}

impl Direction {
    /// Classify a joystick vector by its angle.
    ///
    /// Uses `atan2(y, x)` in degrees, so the full range is [-180, 180].
    pub fn from_vector(x: f64, y: f64) -> Direction {
        Direction::from_angle(y.atan2(x).to_degrees())
    }

    /// Classify an angle in degrees into a direction.
    ///
    /// Intervals are half-open with the upper bound inclusive:
    /// - (-45, 45] => Right
    /// - (45, 135] => Forward
    /// - (135, 180] and (-180, -135] => Left
    /// - (-135, -45] => Backward
    ///
    /// The final `Stop` arm is unreachable for angles produced by `atan2` but
    /// keeps the classification total over all inputs.
    pub fn from_angle(angle: f64) -> Direction {
        if angle > -45.0 && angle <= 45.0 {
            Direction::Right
        } else if angle > 45.0 && angle <= 135.0 {
            Direction::Forward
        } else if angle > 135.0 || angle <= -135.0 {
            Direction::Left
        } else if angle > -135.0 && angle <= -45.0 {
            Direction::Backward
        } else {
            Direction::Stop
        }
    }

    /// Classify a pointer vector whose components may be missing.
    ///
    /// A component is `None` while no gesture is in progress; such events are
    /// dropped silently rather than treated as errors.
    pub fn from_pointer(x: Option<f64>, y: Option<f64>) -> Option<Direction> {
        match (x, y) {
            (Some(x), Some(y)) => Some(Direction::from_vector(x, y)),
            _ => None,
        }
    }

    /// Numeric command code for the legacy `/control?command=` endpoint.
    pub fn command_code(self) -> u8 {
        match self {
            Direction::Stop => 0,
            Direction::Forward => 1,
            Direction::Backward => 2,
            Direction::Left => 3,
            Direction::Right => 4,
        }
    }

    /// Wire name for the JSON `/rover/control` endpoint.
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Stop => "stop",
            Direction::Forward => "forward",
            Direction::Backward => "backward",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cardinal_vectors() {
        assert_eq!(Direction::from_vector(1.0, 0.0), Direction::Right);
        assert_eq!(Direction::from_vector(-1.0, 0.0), Direction::Left);
        assert_eq!(Direction::from_vector(0.0, 1.0), Direction::Forward);
        assert_eq!(Direction::from_vector(0.0, -1.0), Direction::Backward);
    }

    #[test]
    fn boundaries_are_right_inclusive() {
        assert_eq!(Direction::from_angle(45.0), Direction::Right);
        assert_eq!(Direction::from_angle(45.0001), Direction::Forward);
        assert_eq!(Direction::from_angle(135.0), Direction::Forward);
        assert_eq!(Direction::from_angle(135.0001), Direction::Left);
        assert_eq!(Direction::from_angle(-135.0), Direction::Left);
        assert_eq!(Direction::from_angle(-134.9999), Direction::Backward);
        assert_eq!(Direction::from_angle(-45.0), Direction::Backward);
        assert_eq!(Direction::from_angle(-44.9999), Direction::Right);
    }

    #[test]
    fn both_half_turns_classify_left() {
        assert_eq!(Direction::from_angle(180.0), Direction::Left);
        assert_eq!(Direction::from_angle(-180.0), Direction::Left);
    }

    #[test]
    fn classification_is_total_over_atan2_range() {
        // Sweep in 0.1 degree steps; every angle must land in exactly one of
        // the four motion quadrants, never the Stop fallback.
        for tenth in -1800..=1800 {
            let angle = tenth as f64 / 10.0;
            assert_ne!(Direction::from_angle(angle), Direction::Stop, "angle {}", angle);
        }
    }

    #[test]
    fn null_pointer_components_are_dropped() {
        assert_eq!(Direction::from_pointer(None, Some(1.0)), None);
        assert_eq!(Direction::from_pointer(Some(1.0), None), None);
        assert_eq!(Direction::from_pointer(None, None), None);
        assert_eq!(Direction::from_pointer(Some(1.0), Some(0.0)), Some(Direction::Right));
    }

    #[test]
    fn command_codes_match_the_legacy_endpoint() {
        assert_eq!(Direction::Stop.command_code(), 0);
        assert_eq!(Direction::Forward.command_code(), 1);
        assert_eq!(Direction::Backward.command_code(), 2);
        assert_eq!(Direction::Left.command_code(), 3);
        assert_eq!(Direction::Right.command_code(), 4);
    }

    #[test]
    fn wire_names() {
        assert_eq!(Direction::Right.as_str(), "right");
        assert_eq!(format!("{}", Direction::Forward), "forward");
    }
}
