// Math utilities for blending and clip timing

/// Clamp a value between min and max
pub fn clamp<T: PartialOrd>(value: T, min: T, max: T) -> T {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

/// Linear interpolation
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Weight of a linear fade from `from` to `to` after `elapsed` of `duration` seconds.
///
/// A zero-length fade is already complete.
pub fn fade_weight(from: f32, to: f32, elapsed: f32, duration: f32) -> f32 {
    if duration <= 0.0 {
        return to;
    }
    lerp(from, to, clamp(elapsed / duration, 0.0, 1.0))
}

/// Wrap a playback time into `[0, duration)`, returning the wrapped time and
/// how many whole cycles were crossed.
pub fn wrap_time(time: f32, duration: f32) -> (f32, u32) {
    if duration <= 0.0 || time < duration {
        return (time.max(0.0), 0);
    }
    let cycles = (time / duration).floor();
    (time - cycles * duration, cycles as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(5.0, 0.0, 10.0), 5.0);
        assert_eq!(clamp(-5.0, 0.0, 10.0), 0.0);
        assert_eq!(clamp(15.0, 0.0, 10.0), 10.0);
    }

    #[test]
    fn test_lerp() {
        assert_eq!(lerp(0.0, 10.0, 0.0), 0.0);
        assert_eq!(lerp(0.0, 10.0, 1.0), 10.0);
        assert_eq!(lerp(0.0, 10.0, 0.5), 5.0);
    }

    #[test]
    fn test_fade_weight_progress() {
        assert_eq!(fade_weight(0.0, 1.0, 0.0, 0.25), 0.0);
        assert_eq!(fade_weight(0.0, 1.0, 0.125, 0.25), 0.5);
        assert_eq!(fade_weight(1.0, 0.0, 1.0, 0.25), 0.0);
    }

    #[test]
    fn test_fade_weight_zero_duration() {
        assert_eq!(fade_weight(0.0, 1.0, 0.0, 0.0), 1.0);
    }

    #[test]
    fn test_wrap_time() {
        assert_eq!(wrap_time(0.5, 1.0), (0.5, 0));
        assert_eq!(wrap_time(2.5, 1.0), (0.5, 2));
        assert_eq!(wrap_time(1.0, 1.0), (0.0, 1));
    }
}
