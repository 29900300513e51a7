//! Smoothing helpers for dynamic markers.
//!
//! Markers chase their latest frame target with frame-rate independent
//! exponential interpolation:
//!
//!   `value += (target - value) * (1 - exp(-speed * dt))`
//!
//! Rotations blend along the shortest arc, so a marker turning from just
//! below +π to just above -π rotates a few degrees rather than a full turn.

use std::f32::consts::{PI, TAU};

use bevy::math::Vec3;

/// Exponential interpolation factor for a given speed and delta time, in `[0, 1]`.
#[inline]
pub fn exp_lerp_factor(speed: f32, dt: f32) -> f32 {
    (1.0 - (-speed * dt).exp()).clamp(0.0, 1.0)
}

/// Wrap an angle into `[-π, π)`.
#[inline]
pub fn normalize_angle(angle: f32) -> f32 {
    (angle + PI).rem_euclid(TAU) - PI
}

/// Signed shortest rotation from `from` to `to`, in `[-π, π)`.
#[inline]
pub fn angle_difference(from: f32, to: f32) -> f32 {
    normalize_angle(to - from)
}

/// Blend `from` toward `to` by `t` along the shortest arc. Result is normalized.
#[inline]
pub fn lerp_angle(from: f32, to: f32, t: f32) -> f32 {
    normalize_angle(from + angle_difference(from, to) * t)
}

/// Move `current` a fraction `t` of the way to `target`, snapping once within `epsilon`.
pub fn step_toward(current: Vec3, target: Vec3, t: f32, epsilon: f32) -> Vec3 {
    let delta = target - current;
    if delta.length_squared() <= epsilon * epsilon {
        target
    } else {
        current + delta * t
    }
}

/// Angular counterpart of [`step_toward`].
pub fn step_yaw(current: f32, target: f32, t: f32, epsilon: f32) -> f32 {
    let delta = angle_difference(current, target);
    if delta.abs() <= epsilon {
        normalize_angle(target)
    } else {
        normalize_angle(current + delta * t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    const EPS: f32 = 1e-5;

    #[test]
    fn factor_is_bounded() {
        assert_eq!(exp_lerp_factor(8.0, 0.0), 0.0);
        let f = exp_lerp_factor(8.0, 1.0 / 60.0);
        assert!(f > 0.12 && f < 0.13, "got {f}");
        assert!((exp_lerp_factor(1000.0, 1.0) - 1.0).abs() < EPS);
        assert_eq!(exp_lerp_factor(8.0, -1.0), 0.0);
    }

    #[test]
    fn normalize_wraps_into_half_open_range() {
        assert!((normalize_angle(0.0)).abs() < EPS);
        assert!((normalize_angle(3.0 * FRAC_PI_2) + FRAC_PI_2).abs() < EPS);
        assert!((normalize_angle(-3.0 * FRAC_PI_2) - FRAC_PI_2).abs() < EPS);
        assert!((normalize_angle(TAU + 0.5) - 0.5).abs() < EPS);
        for a in [-10.0_f32, -PI, -1.0, 0.0, 1.0, PI, 10.0] {
            let n = normalize_angle(a);
            assert!((-PI..PI).contains(&n), "{a} -> {n}");
        }
    }

    #[test]
    fn difference_takes_short_way_round() {
        let from = PI - 0.1;
        let to = -PI + 0.1;
        assert!((angle_difference(from, to) - 0.2).abs() < EPS);
        assert!((angle_difference(to, from) + 0.2).abs() < EPS);
    }

    #[test]
    fn lerp_angle_crosses_the_seam() {
        let mid = lerp_angle(PI - 0.1, -PI + 0.1, 0.5);
        // Halfway across the ±π seam is ±π itself.
        assert!((mid.abs() - PI).abs() < 1e-4, "got {mid}");
        assert!((lerp_angle(0.0, FRAC_PI_2, 1.0) - FRAC_PI_2).abs() < EPS);
    }

    #[test]
    fn step_toward_converges_without_overshoot() {
        let target = Vec3::new(3.0, 0.45, 1.0);
        let mut pos = Vec3::new(1.0, 0.45, 1.0);
        let mut last_gap = (target - pos).length();
        for _ in 0..200 {
            pos = step_toward(pos, target, 0.2, 0.001);
            let gap = (target - pos).length();
            assert!(gap <= last_gap);
            assert!(pos.x <= target.x);
            last_gap = gap;
        }
        assert_eq!(pos, target);
    }

    #[test]
    fn step_toward_snaps_inside_epsilon() {
        let target = Vec3::ONE;
        let near = Vec3::ONE - Vec3::splat(0.0001);
        assert_eq!(step_toward(near, target, 0.1, 0.001), target);
    }

    #[test]
    fn step_yaw_never_turns_more_than_half() {
        let mut yaw = 0.0_f32;
        let target = -FRAC_PI_2;
        for _ in 0..500 {
            let next = step_yaw(yaw, target, 0.3, 0.001);
            assert!(angle_difference(yaw, next).abs() <= PI);
            // Always turning clockwise toward -π/2, never the long way round.
            assert!(next <= yaw + EPS);
            yaw = next;
        }
        assert!((yaw - target).abs() < EPS);
    }
}
