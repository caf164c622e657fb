use std::sync::Mutex;
use std::time::Duration;

use image::RgbaImage;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use crate::capture::preroll::PrerollGroup;
use crate::capture::sampler::{FrameSampler, SampleProfile};
use crate::capture::source::FrameSource;
use crate::compose::filter::FilterPreset;
use crate::foundation::error::{BoothError, BoothResult};

/// Shots per photostrip session.
pub const SHOTS_PER_SESSION: usize = 4;
/// Pre-roll sampling rate during each countdown.
pub const PREROLL_FPS: u32 = 8;
/// Maximum pre-roll frames retained per slot after stride subsampling.
pub const PREROLL_MAX_KEPT: usize = 16;
/// Pre-roll sampling never runs longer than this, whatever the countdown.
const PREROLL_MAX_SECONDS: u32 = 8;
/// Per-subscriber event buffer. A full 10 s session emits 45 events.
const EVENT_CAPACITY: usize = 64;

/// Allowed countdown lengths, fixed for a whole session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum Countdown {
    /// 3 seconds per shot.
    Three,
    /// 5 seconds per shot.
    Five,
    /// 10 seconds per shot.
    Ten,
}

impl Countdown {
    /// The countdown length in seconds.
    pub fn seconds(self) -> u32 {
        match self {
            Countdown::Three => 3,
            Countdown::Five => 5,
            Countdown::Ten => 10,
        }
    }
}

impl TryFrom<u32> for Countdown {
    type Error = BoothError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            3 => Ok(Countdown::Three),
            5 => Ok(Countdown::Five),
            10 => Ok(Countdown::Ten),
            other => Err(BoothError::validation(format!(
                "countdown must be 3, 5, or 10 seconds, got {other}"
            ))),
        }
    }
}

impl From<Countdown> for u32 {
    fn from(value: Countdown) -> Self {
        value.seconds()
    }
}

/// One photobooth run: the capture parameters plus everything captured so far.
///
/// Created by the caller, mutated only by [`CaptureEngine::run_session`],
/// consumed read-only by the compositor. The engine never assumes persistence:
/// a session is complete and usable from its in-memory fields alone.
#[derive(Debug)]
pub struct Session {
    countdown: Countdown,
    filter: FilterPreset,
    shots: Vec<RgbaImage>,
    preroll_groups: Vec<PrerollGroup>,
    cancelled: bool,
    live: bool,
}

impl Session {
    /// A fresh live-capture session.
    pub fn live(countdown: Countdown, filter: FilterPreset) -> Self {
        Self {
            countdown,
            filter,
            shots: Vec::new(),
            preroll_groups: Vec::new(),
            cancelled: false,
            live: false,
        }
        .with_live(true)
    }

    /// A session built from up to 4 uploaded images. Not live: the animated
    /// export path refuses it.
    pub fn from_uploads(images: Vec<RgbaImage>) -> BoothResult<Self> {
        if images.is_empty() || images.len() > SHOTS_PER_SESSION {
            return Err(BoothError::validation(format!(
                "upload sessions take 1-{SHOTS_PER_SESSION} images, got {}",
                images.len()
            )));
        }
        let groups = images.iter().map(|_| PrerollGroup::empty()).collect();
        Ok(Self {
            countdown: Countdown::Three,
            filter: FilterPreset::None,
            shots: images,
            preroll_groups: groups,
            cancelled: false,
            live: false,
        })
    }

    /// Rebuild a session from persisted parts (the CLI's session directory).
    pub fn reassemble(
        countdown: Countdown,
        filter: FilterPreset,
        live: bool,
        shots: Vec<RgbaImage>,
        preroll_groups: Vec<PrerollGroup>,
    ) -> BoothResult<Self> {
        if shots.len() > SHOTS_PER_SESSION || preroll_groups.len() != shots.len() {
            return Err(BoothError::validation(
                "session shots and pre-roll groups must be index-aligned, at most 4",
            ));
        }
        Ok(Self {
            countdown,
            filter,
            shots,
            preroll_groups,
            cancelled: false,
            live,
        })
    }

    fn with_live(mut self, live: bool) -> Self {
        self.live = live;
        self
    }

    /// The session's countdown length.
    pub fn countdown(&self) -> Countdown {
        self.countdown
    }

    /// The capture filter preset.
    pub fn filter(&self) -> FilterPreset {
        self.filter
    }

    /// Captured stills in slot order.
    pub fn shots(&self) -> &[RgbaImage] {
        &self.shots
    }

    /// Pre-roll groups, index-aligned with [`shots`](Self::shots).
    pub fn preroll_groups(&self) -> &[PrerollGroup] {
        &self.preroll_groups
    }

    /// Whether the run was cancelled. Set once, never reset.
    pub fn cancelled(&self) -> bool {
        self.cancelled
    }

    /// Whether the shots came from a live capture run. Gates animated export.
    pub fn is_live(&self) -> bool {
        self.live
    }

    /// Complete means all 4 shots captured, or cancelled.
    pub fn is_complete(&self) -> bool {
        self.cancelled || self.shots.len() == SHOTS_PER_SESSION
    }

    /// Build the serializable manifest for a persisted session directory.
    pub fn manifest(&self, shot_files: Vec<String>) -> SessionManifest {
        SessionManifest {
            countdown_seconds: self.countdown.seconds(),
            filter: self.filter,
            live: self.live,
            cancelled: self.cancelled,
            shots: shot_files,
            preroll_frames: self.preroll_groups.iter().map(PrerollGroup::len).collect(),
        }
    }
}

/// On-disk summary of a persisted session (`session.json` in the CLI's
/// capture output directory).
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SessionManifest {
    /// Countdown seconds used for the run.
    pub countdown_seconds: u32,
    /// Capture filter preset.
    pub filter: FilterPreset,
    /// Whether this was a live capture run.
    pub live: bool,
    /// Whether the run was cancelled.
    pub cancelled: bool,
    /// Shot file names relative to the session directory, slot order.
    pub shots: Vec<String>,
    /// Retained pre-roll frame count per slot.
    pub preroll_frames: Vec<usize>,
}

/// Engine progress surfaced to subscribers on a broadcast channel.
///
/// Delivery is edge-triggered: every event reaches every subscriber in order,
/// so UI cues tied to a single event (the shutter flash in particular) are
/// never coalesced away by a fast-following state change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    /// No countdown in progress.
    Idle,
    /// A countdown tick; `seconds_remaining` counts down to 1.
    CountingDown {
        /// Slot being counted down, 0-based.
        shot: usize,
        /// Seconds left before the shutter.
        seconds_remaining: u32,
    },
    /// One still was captured; fire the shutter sound and flash cue now.
    Shutter {
        /// Slot that was just captured.
        shot: usize,
    },
    /// The session finished all 4 slots.
    Complete {
        /// Final shot count (always 4).
        shots: usize,
    },
    /// The session stopped early.
    Cancelled {
        /// Shots captured before cancellation.
        shots: usize,
    },
}

/// Sampler configuration for a capture engine.
#[derive(Clone, Copy, Debug)]
pub struct CaptureOptions {
    /// Capture filter baked into stills and pre-roll alike.
    pub filter: FilterPreset,
    /// Mirror convention; on by default to match the mirrored live preview.
    pub mirror: bool,
    /// Vertical crop bias for narrow viewports, in [-1, 1].
    pub vertical_bias: f64,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            filter: FilterPreset::None,
            mirror: true,
            vertical_bias: 0.0,
        }
    }
}

/// The countdown/capture state machine.
///
/// Per slot, an 8 fps pre-roll sampling loop and a per-second countdown run as
/// two interleaved suspension sequences over the same wall-clock interval;
/// both observe one shared cancellation token at every iteration, so
/// cancellation latency is bounded by the sampling sleep. Cancellation never
/// aborts a capture already in flight.
pub struct CaptureEngine {
    sampler: FrameSampler,
    cancel: Mutex<CancellationToken>,
    events: broadcast::Sender<SessionEvent>,
}

impl CaptureEngine {
    /// Create an engine with the given sampler options.
    pub fn new(opts: CaptureOptions) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            sampler: FrameSampler {
                filter: opts.filter,
                mirror: opts.mirror,
                vertical_bias: opts.vertical_bias,
            },
            cancel: Mutex::new(CancellationToken::new()),
            events,
        }
    }

    /// Subscribe to countdown/shutter/completion events.
    ///
    /// Only events emitted after subscribing are delivered; subscribe before
    /// calling [`run_session`](Self::run_session).
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Request cancellation of the in-flight session.
    ///
    /// Safe to call from anywhere, including an event-handler loop: it only
    /// trips the cancellation token. The running session itself emits `Idle`
    /// and then `Cancelled` once it observes the token, and outside a run this
    /// is a complete no-op, so a finished session's terminal event stands.
    pub fn cancel(&self) {
        self.current_token().cancel();
    }

    fn current_token(&self) -> CancellationToken {
        self.cancel
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn install_fresh_token(&self) -> CancellationToken {
        let mut guard = self
            .cancel
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = CancellationToken::new();
        guard.clone()
    }

    /// Run the 4-shot capture loop against `source`, filling `session`.
    ///
    /// Slots run strictly in order; slot `i`'s pre-roll sampling starts with
    /// its countdown and always finishes before its still is captured. On
    /// cancellation the in-progress slot is discarded: `session.shots()` holds
    /// exactly the completed slots, index-aligned with the pre-roll groups.
    #[tracing::instrument(skip_all, fields(countdown = session.countdown().seconds()))]
    pub async fn run_session(
        &self,
        source: &mut dyn FrameSource,
        session: &mut Session,
    ) -> BoothResult<()> {
        if !session.live {
            return Err(BoothError::validation(
                "upload sessions cannot run a capture",
            ));
        }
        if !session.shots.is_empty() || session.cancelled {
            return Err(BoothError::validation("session has already run"));
        }

        let token = self.install_fresh_token();
        let secs = session.countdown.seconds();

        for shot in 0..SHOTS_PER_SESSION {
            let raw = match self.countdown_slot(source, secs, shot, &token).await? {
                Some(raw) => raw,
                None => break,
            };
            // Cancellation is re-checked before the capture; a cancel that
            // lands after this point lets the slot complete.
            if token.is_cancelled() {
                break;
            }
            session
                .preroll_groups
                .push(PrerollGroup::from_raw(raw, PREROLL_MAX_KEPT));
            let still = self.sampler.sample(source, SampleProfile::Still).await?;
            session.shots.push(still);
            let _ = self.events.send(SessionEvent::Shutter { shot });
            tracing::debug!(shot, "captured still");
        }

        if token.is_cancelled() {
            session.cancelled = true;
            let _ = self.events.send(SessionEvent::Cancelled {
                shots: session.shots.len(),
            });
        } else {
            let _ = self.events.send(SessionEvent::Complete {
                shots: session.shots.len(),
            });
        }
        Ok(())
    }

    /// One slot's countdown with concurrent pre-roll sampling.
    ///
    /// Returns the raw samples once the countdown has reached zero and the
    /// in-flight sampling has drained, or `None` on cancellation.
    async fn countdown_slot(
        &self,
        source: &mut dyn FrameSource,
        secs: u32,
        shot: usize,
        token: &CancellationToken,
    ) -> BoothResult<Option<Vec<RgbaImage>>> {
        let preroll_secs = secs.min(PREROLL_MAX_SECONDS);
        let samples_total = (preroll_secs * PREROLL_FPS).max(1) as usize;
        let mut raw: Vec<RgbaImage> = Vec::with_capacity(samples_total);
        let mut ticks_done: u32 = 0;

        let mut tick = tokio::time::interval(Duration::from_secs(1));
        let mut sample =
            tokio::time::interval(Duration::from_millis(1000 / u64::from(PREROLL_FPS)));

        // The countdown needs secs + 1 ticks (display secs..1, then zero);
        // sampling needs samples_total ticks. Both interval streams fire
        // their first tick immediately.
        loop {
            tokio::select! {
                _ = token.cancelled() => {
                    let _ = self.events.send(SessionEvent::Idle);
                    return Ok(None);
                }
                _ = tick.tick(), if ticks_done <= secs => {
                    let seconds_remaining = secs - ticks_done;
                    if seconds_remaining > 0 {
                        let _ = self.events.send(SessionEvent::CountingDown {
                            shot,
                            seconds_remaining,
                        });
                    }
                    ticks_done += 1;
                }
                _ = sample.tick(), if raw.len() < samples_total => {
                    let frame = self.sampler.sample(source, SampleProfile::Preroll).await?;
                    raw.push(frame);
                }
            }
            if ticks_done > secs && raw.len() >= samples_total {
                return Ok(Some(raw));
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/capture/session.rs"]
mod tests;
