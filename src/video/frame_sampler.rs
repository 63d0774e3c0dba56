use crate::error::{AppError, AppResult};

/// Decides which decoded frames are labeled.
///
/// With a frame rate `fps` and one sample every `seconds_per_sample` seconds, the
/// interval is `trunc(fps) * seconds_per_sample` frames and frame `n` (1-indexed) is
/// sampled iff `n % interval == 0`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameSampler {
    interval: u64,
}

impl FrameSampler {
    /// Fails when the interval would be zero, e.g. for a stream that reports no frame
    /// rate, or too large to count.
    pub fn new(frame_rate: f64, seconds_per_sample: u32) -> AppResult<Self> {
        let invalid = AppError::InvalidSamplingInterval { frame_rate, seconds_per_sample };
        if !frame_rate.is_finite() || frame_rate < 1.0 {
            return Err(invalid);
        }
        // `as` saturates, so an absurd rate overflows the product instead of wrapping.
        let whole_fps = frame_rate.trunc() as u64;
        match whole_fps.checked_mul(seconds_per_sample as u64) {
            Some(interval) if interval > 0 => Ok(FrameSampler { interval }),
            _ => Err(invalid),
        }
    }

    pub fn interval(&self) -> u64 {
        self.interval
    }

    pub fn is_sampled(&self, frame_count: u64) -> bool {
        frame_count != 0 && frame_count % self.interval == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn samples_every_interval_frame() {
        let sampler = FrameSampler::new(30.0, 2).unwrap();
        let sampled: Vec<u64> = (1..=300).filter(|&n| sampler.is_sampled(n)).collect();
        assert_eq!(sampled, vec![60, 120, 180, 240, 300]);
    }

    #[test]
    fn fractional_frame_rate_is_truncated() {
        let sampler = FrameSampler::new(29.97, 1).unwrap();
        assert_eq!(sampler.interval(), 29);
    }

    #[test]
    fn zero_frame_rate_fails_fast() {
        assert!(matches!(
            FrameSampler::new(0.0, 1),
            Err(AppError::InvalidSamplingInterval { .. })
        ));
        assert!(FrameSampler::new(0.5, 1).is_err());
        assert!(FrameSampler::new(f64::NAN, 1).is_err());
    }

    #[test]
    fn zero_seconds_per_sample_fails_fast() {
        assert!(FrameSampler::new(30.0, 0).is_err());
    }

    #[test]
    fn overflowing_interval_is_rejected() {
        assert!(matches!(
            FrameSampler::new(1e300, 2),
            Err(AppError::InvalidSamplingInterval { .. })
        ));
        assert!(FrameSampler::new(u32::MAX as f64, u32::MAX).is_ok());
    }
}
