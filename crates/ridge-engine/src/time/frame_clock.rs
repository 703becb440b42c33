use std::time::Instant;

/// Timing for one frame.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Unclamped milliseconds since the clock started. Drives animation.
    pub elapsed_ms: f64,

    /// Starts at 0 and wraps.
    pub frame_index: u64,
}

/// Per-window frame clock.
///
/// `elapsed_ms` is the frame time handed to the transform pipeline and shader
/// time; it is measured from the clock origin and is never clamped, so the
/// animation stays tied to wall time across stalls.
#[derive(Debug, Clone)]
pub struct FrameClock {
    origin: Instant,
    frame_index: u64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            frame_index: 0,
        }
    }

    pub fn tick(&mut self) -> FrameTime {
        let ft = FrameTime {
            elapsed_ms: self.origin.elapsed().as_secs_f64() * 1000.0,
            frame_index: self.frame_index,
        };
        self.frame_index = self.frame_index.wrapping_add(1);
        ft
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_index_counts_ticks() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.tick().frame_index, 0);
        assert_eq!(clock.tick().frame_index, 1);
        assert_eq!(clock.tick().frame_index, 2);
    }

    #[test]
    fn elapsed_is_monotonic() {
        let mut clock = FrameClock::new();
        let a = clock.tick().elapsed_ms;
        std::thread::sleep(std::time::Duration::from_millis(2));
        let b = clock.tick().elapsed_ms;
        assert!(a >= 0.0);
        assert!(b >= a + 1.0);
    }
}
