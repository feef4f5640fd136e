/// Frame-rate counter reporting once per window.
#[derive(Clone, Debug)]
pub struct FrameStats {
    window_sec: f32,
    elapsed: f32,
    frames: u32,
}

impl Default for FrameStats {
    fn default() -> Self {
        Self::new(0.5)
    }
}

impl FrameStats {
    pub fn new(window_sec: f32) -> Self {
        Self {
            window_sec: window_sec.max(1e-3),
            elapsed: 0.0,
            frames: 0,
        }
    }

    /// Count one frame of `dt_sec`; returns the mean fps when a window closes.
    pub fn record(&mut self, dt_sec: f32) -> Option<f32> {
        self.elapsed += dt_sec.max(0.0);
        self.frames += 1;
        if self.elapsed < self.window_sec {
            return None;
        }
        let fps = self.frames as f32 / self.elapsed;
        self.elapsed = 0.0;
        self.frames = 0;
        Some(fps)
    }
}
