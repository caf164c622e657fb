use std::time::Duration;

use image::RgbaImage;

use crate::capture::session::Session;
use crate::compose::spec::CompositionSpec;
use crate::compose::sticker::PreparedStickers;
use crate::compose::strip::draw_frame;
use crate::compose::text::FooterFonts;
use crate::export::sink::{FrameSink, SinkConfig};
use crate::foundation::error::{BoothError, BoothResult};
use crate::foundation::geom::StripGeometry;

/// Render-loop pacing for the animated export.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Pacing {
    /// Yield for one frame interval after every pushed frame. Required for
    /// sinks that sample the canvas on their own clock; the render loop must
    /// not outrun them.
    #[default]
    Realtime,
    /// No inter-frame delay; for offline sinks (tests, batch encoding).
    Immediate,
}

/// Animated export parameters.
///
/// Total duration is `repetitions x segment_seconds` and is configurable, not
/// contractual; the defaults give a ~6 second loop.
#[derive(Clone, Copy, Debug)]
pub struct AnimateOptions {
    /// Output frames per second.
    pub fps: u32,
    /// Length of the pre-roll segment each slot contributes, in seconds.
    pub segment_seconds: f64,
    /// How many times the segment loops in the output.
    pub repetitions: u32,
    /// Render-loop pacing.
    pub pacing: Pacing,
}

impl Default for AnimateOptions {
    fn default() -> Self {
        Self {
            fps: 12,
            segment_seconds: 3.0,
            repetitions: 2,
            pacing: Pacing::Realtime,
        }
    }
}

impl AnimateOptions {
    /// Frames per segment: `max(1, round(segment_seconds x fps))`.
    pub fn segment_frames(&self) -> usize {
        ((self.segment_seconds * f64::from(self.fps)).round() as usize).max(1)
    }

    /// Validate fps, duration, and repetition count.
    pub fn validate(&self) -> BoothResult<()> {
        if self.fps == 0 {
            return Err(BoothError::validation("animate fps must be non-zero"));
        }
        if !(self.segment_seconds.is_finite() && self.segment_seconds > 0.0) {
            return Err(BoothError::validation(
                "animate segment length must be positive",
            ));
        }
        if self.repetitions == 0 {
            return Err(BoothError::validation(
                "animate repetitions must be non-zero",
            ));
        }
        Ok(())
    }
}

/// Counters from one animated render.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AnimateStats {
    /// Frames pushed to the sink.
    pub frames_pushed: u64,
    /// Frames per loop segment.
    pub segment_frames: usize,
}

/// Render the looping animated strip into `sink`.
///
/// Each slot contributes its last `segment_frames` pre-roll frames (shorter
/// groups pad by cyclic repetition); a slot with no pre-roll falls back to its
/// still, drawn unchanged for the full duration. Every output frame is
/// composed exactly like the static path. The sink is always finalized, even
/// when the render loop fails partway.
#[tracing::instrument(skip_all, fields(fps = opts.fps, repetitions = opts.repetitions))]
pub async fn render_animation(
    session: &Session,
    spec: &CompositionSpec,
    stickers: &PreparedStickers,
    fonts: &FooterFonts,
    opts: &AnimateOptions,
    sink: &mut dyn FrameSink,
) -> BoothResult<AnimateStats> {
    // Policy gate first: no work at all for non-live sessions.
    if !session.is_live() {
        return Err(BoothError::policy_rejected(
            "animated export is only available for live capture sessions",
        ));
    }
    if session.shots().is_empty() {
        return Err(BoothError::NoPhotos);
    }
    spec.validate()?;
    opts.validate()?;

    let geo = StripGeometry::DEFAULT;
    sink.begin(SinkConfig {
        width: geo.canvas_width(),
        height: geo.canvas_height(),
        fps: opts.fps,
    })?;

    let result = drive(session, spec, stickers, fonts, opts, sink, geo).await;
    match result {
        Ok(stats) => {
            sink.end()?;
            Ok(stats)
        }
        Err(e) => {
            // Flush whatever the sink buffered; the render error wins.
            if let Err(end_err) = sink.end() {
                tracing::warn!("sink finalize after failed render also failed: {end_err}");
            }
            Err(e)
        }
    }
}

async fn drive(
    session: &Session,
    spec: &CompositionSpec,
    stickers: &PreparedStickers,
    fonts: &FooterFonts,
    opts: &AnimateOptions,
    sink: &mut dyn FrameSink,
    geo: StripGeometry,
) -> BoothResult<AnimateStats> {
    let segment_frames = opts.segment_frames();

    // Per slot: the padded pre-roll window, or the still fallback.
    let windows: Vec<Vec<&RgbaImage>> = (0..geo.slots as usize)
        .map(|slot| {
            session
                .preroll_groups()
                .get(slot)
                .map(|g| g.select_window(segment_frames))
                .unwrap_or_default()
        })
        .collect();

    let total = u64::from(opts.repetitions) * segment_frames as u64;
    let frame_interval = Duration::from_millis(1000 / u64::from(opts.fps));
    let mut stats = AnimateStats {
        frames_pushed: 0,
        segment_frames,
    };

    for idx in 0..total {
        let rel = (idx % segment_frames as u64) as usize;
        let slots: Vec<Option<&RgbaImage>> = (0..geo.slots as usize)
            .map(|slot| {
                windows[slot]
                    .get(rel)
                    .copied()
                    .or_else(|| session.shots().get(slot))
            })
            .collect();
        let frame = draw_frame(&slots, spec, stickers, fonts)?;
        sink.push_frame(idx, &frame)?;
        stats.frames_pushed += 1;

        // The recording sink samples on its own clock; yield one frame
        // interval so the render loop cannot outrun it.
        if opts.pacing == Pacing::Realtime {
            tokio::time::sleep(frame_interval).await;
        }
    }

    Ok(stats)
}

#[cfg(test)]
#[path = "../../tests/unit/compose/animate.rs"]
mod tests;
