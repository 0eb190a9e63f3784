use crate::layout::position::{Percent, PercentPoint};

/// Pointer-to-marker offset captured on pointer-down.
///
/// The offset between the pointer and the marker's pixel position is taken
/// once when the drag starts; every subsequent pointer move maps back to
/// percentage coordinates clamped to `[0, 95]`. No inertia, no snapping.
#[derive(Debug, Clone, Copy)]
pub struct DragTracker {
    offset_x: f32,
    offset_y: f32,
}

impl DragTracker {
    /// Capture the offset against the marker's current position on a
    /// surface of `width` x `height` pixels.
    pub fn grab(
        pointer_x: f32,
        pointer_y: f32,
        position: PercentPoint,
        width: f32,
        height: f32,
    ) -> Self {
        Self {
            offset_x: pointer_x - position.left.to_pixels(width),
            offset_y: pointer_y - position.top.to_pixels(height),
        }
    }

    /// Map the current pointer position back to clamped percentage
    /// coordinates on the same surface.
    pub fn track(&self, pointer_x: f32, pointer_y: f32, width: f32, height: f32) -> PercentPoint {
        PercentPoint {
            left: Percent::from_pixels(pointer_x - self.offset_x, width),
            top: Percent::from_pixels(pointer_y - self.offset_y, height),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grab_then_track_preserves_position() {
        let position = PercentPoint::new(45.0, 20.0);
        let tracker = DragTracker::grab(300.0, 500.0, position, 1000.0, 800.0);
        let tracked = tracker.track(300.0, 500.0, 1000.0, 800.0);
        assert!((tracked.top.value() - 45.0).abs() < 1e-4);
        assert!((tracked.left.value() - 20.0).abs() < 1e-4);
    }

    #[test]
    fn tracked_positions_stay_clamped() {
        let position = PercentPoint::new(50.0, 50.0);
        let tracker = DragTracker::grab(500.0, 400.0, position, 1000.0, 800.0);
        for (x, y) in [
            (-5000.0, -5000.0),
            (5000.0, 5000.0),
            (0.0, 0.0),
            (1000.0, 800.0),
            (999999.0, -1.0),
        ] {
            let tracked = tracker.track(x, y, 1000.0, 800.0);
            assert!((0.0..=95.0).contains(&tracked.top.value()));
            assert!((0.0..=95.0).contains(&tracked.left.value()));
        }
    }

    #[test]
    fn degenerate_surface_pins_to_origin() {
        let tracker = DragTracker::grab(10.0, 10.0, PercentPoint::new(10.0, 10.0), 0.0, 0.0);
        let tracked = tracker.track(250.0, 250.0, 0.0, 0.0);
        assert_eq!(tracked.top.value(), 0.0);
        assert_eq!(tracked.left.value(), 0.0);
    }
}
