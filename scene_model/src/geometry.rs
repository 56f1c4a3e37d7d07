//! Distances and bearings on the horizontal plane.
//!
//! The world uses +X as east and +Z as north; height (Y) is ignored for
//! bearings but included in distances.

pub use glam::Vec3;

const COMPASS_POINTS: [&str; 8] = [
    "north",
    "northeast",
    "east",
    "southeast",
    "south",
    "southwest",
    "west",
    "northwest",
];

/// Straight-line distance between two points.
pub fn distance(from: Vec3, to: Vec3) -> f32 {
    from.distance(to)
}

/// Clockwise angle in degrees, in `[0, 360)`, from north to the direction of `to`
/// as seen from `from`.
///
/// A target directly on top of the observer has bearing 0.
pub fn clockwise_bearing(from: Vec3, to: Vec3) -> f32 {
    let dx = to.x - from.x;
    let dz = to.z - from.z;
    if dx == 0.0 && dz == 0.0 {
        return 0.0;
    }
    let degrees = dx.atan2(dz).to_degrees();
    let normalized = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative angles
    if normalized >= 360.0 {
        0.0
    } else {
        normalized
    }
}

/// Eight-point compass name for a bearing, e.g. `"northeast"`.
pub fn compass_point(bearing: f32) -> &'static str {
    let sector = ((bearing.rem_euclid(360.0) + 22.5) / 45.0).floor() as usize % 8;
    COMPASS_POINTS[sector]
}

/// Compass name of the direction from `from` to `to`.
pub fn cardinal_direction(from: Vec3, to: Vec3) -> &'static str {
    compass_point(clockwise_bearing(from, to))
}
