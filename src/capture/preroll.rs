use image::RgbaImage;

/// Bounded buffer of low-res frames sampled during one slot's countdown.
///
/// Only the animated export path reads these: they animate the final seconds
/// of motion before each still.
#[derive(Clone, Debug, Default)]
pub struct PrerollGroup {
    frames: Vec<RgbaImage>,
}

impl PrerollGroup {
    /// An empty group (upload flow, or a slot cancelled mid-countdown).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a group from raw samples, retaining at most `cap` frames by
    /// fixed-stride subsampling (every Nth raw sample, order preserved).
    pub fn from_raw(raw: Vec<RgbaImage>, cap: usize) -> Self {
        if cap == 0 || raw.is_empty() {
            return Self::empty();
        }
        let stride = raw.len().div_ceil(cap).max(1);
        let frames = raw.into_iter().step_by(stride).take(cap).collect();
        Self { frames }
    }

    /// Number of retained frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether the group holds no frames.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// The retained frames in capture order.
    pub fn frames(&self) -> &[RgbaImage] {
        &self.frames
    }

    /// Select exactly `target` frames for the animated segment.
    ///
    /// Longer groups keep the **last** `target` frames (trim from the front);
    /// shorter groups pad to exact length by cyclic repetition (index modulo
    /// length), preserving order within each cycle. An empty group yields an
    /// empty selection, which signals the still-image fallback.
    pub fn select_window(&self, target: usize) -> Vec<&RgbaImage> {
        if self.frames.is_empty() || target == 0 {
            return Vec::new();
        }
        if self.frames.len() >= target {
            let start = self.frames.len() - target;
            return self.frames[start..].iter().collect();
        }
        (0..target)
            .map(|i| &self.frames[i % self.frames.len()])
            .collect()
    }
}
