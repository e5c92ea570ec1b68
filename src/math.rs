/// Small geometry helpers shared by the shooter and the collision pass.
///
/// Angles follow the screen convention used everywhere in the game:
/// `0` points straight up, positive angles lean to the right.

use std::f32::consts::PI;

/// Euclidean distance between two points.
pub fn distance(x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    ((x2 - x1).powi(2) + (y2 - y1).powi(2)).sqrt()
}

pub fn deg_to_rad(degrees: f32) -> f32 {
    degrees * (PI / 180.0)
}

/// Angle from `(from_x, from_y)` to `(to_x, to_y)`, measured from straight up.
/// A target directly above yields `0`, a target to the right yields a
/// positive angle.
pub fn aim_angle(from_x: f32, from_y: f32, to_x: f32, to_y: f32) -> f32 {
    (to_x - from_x).atan2(from_y - to_y)
}

/// Velocity components for a projectile travelling at `speed` along `angle`
/// (same convention as [`aim_angle`]): `(sin θ · speed, −cos θ · speed)`.
pub fn velocity_from_angle(angle: f32, speed: f32) -> (f32, f32) {
    (angle.sin() * speed, -angle.cos() * speed)
}
