use super::*;
use crate::capture::preroll::PrerollGroup;
use crate::capture::session::Countdown;
use crate::compose::filter::FilterPreset;
use crate::compose::spec::Footer;
use crate::export::sink::InMemorySink;

fn spec() -> CompositionSpec {
    CompositionSpec::new(Footer {
        title: "LumaBooth".into(),
        date: "2026-08-30".into(),
    })
}

fn still(shade: u8) -> RgbaImage {
    RgbaImage::from_pixel(40, 30, image::Rgba([shade, 0, 0, 255]))
}

fn preroll(shades: &[u8]) -> PrerollGroup {
    PrerollGroup::from_raw(shades.iter().map(|s| still(*s)).collect(), 16)
}

fn live_session(groups: Vec<PrerollGroup>) -> Session {
    let shots = (0..groups.len()).map(|i| still(200 - 10 * i as u8)).collect();
    Session::reassemble(Countdown::Three, FilterPreset::None, true, shots, groups).unwrap()
}

fn fast_opts(fps: u32, seconds: f64, repetitions: u32) -> AnimateOptions {
    AnimateOptions {
        fps,
        segment_seconds: seconds,
        repetitions,
        pacing: Pacing::Immediate,
    }
}

#[tokio::test]
async fn upload_sessions_are_policy_rejected_before_any_work() {
    let session = Session::from_uploads(vec![still(10); 4]).unwrap();
    let mut sink = InMemorySink::new();
    let err = render_animation(
        &session,
        &spec(),
        &PreparedStickers::empty(),
        &FooterFonts::none(),
        &fast_opts(12, 1.0, 1),
        &mut sink,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, BoothError::PolicyRejected(_)));
    // The gate fires before the sink is even started.
    assert!(sink.config().is_none());
}

#[tokio::test]
async fn renders_repetitions_times_segment_frames() {
    let session = live_session(vec![
        preroll(&[1, 2, 3, 4, 5]),
        preroll(&[6, 7]),
        preroll(&[8]),
        PrerollGroup::empty(),
    ]);
    let mut sink = InMemorySink::new();
    let stats = render_animation(
        &session,
        &spec(),
        &PreparedStickers::empty(),
        &FooterFonts::none(),
        &fast_opts(12, 2.0, 2),
        &mut sink,
    )
    .await
    .unwrap();

    assert_eq!(stats.segment_frames, 24);
    assert_eq!(stats.frames_pushed, 48);
    assert_eq!(sink.frames().len(), 48);
    assert!(sink.is_ended());
    let cfg = sink.config().unwrap();
    assert_eq!((cfg.width, cfg.height, cfg.fps), (660, 2040, 12));
}

#[tokio::test]
async fn loop_relative_frames_repeat_across_repetitions() {
    // Slot 0 animates, everything else falls back to stills; repetition 2
    // must replay repetition 1 exactly.
    let session = live_session(vec![
        preroll(&[10, 120, 240]),
        PrerollGroup::empty(),
        PrerollGroup::empty(),
        PrerollGroup::empty(),
    ]);
    let mut sink = InMemorySink::new();
    let stats = render_animation(
        &session,
        &spec(),
        &PreparedStickers::empty(),
        &FooterFonts::none(),
        &fast_opts(6, 1.0, 2),
        &mut sink,
    )
    .await
    .unwrap();
    assert_eq!(stats.segment_frames, 6);

    let frames = sink.frames();
    for rel in 0..6 {
        assert_eq!(
            frames[rel].1.as_raw(),
            frames[rel + 6].1.as_raw(),
            "frame {rel} differs between repetitions"
        );
    }
    // The animated slot actually changes within a segment.
    assert_ne!(frames[0].1.as_raw(), frames[1].1.as_raw());
}

#[tokio::test]
async fn slots_without_preroll_fall_back_to_their_still() {
    let session = live_session(vec![
        PrerollGroup::empty(),
        PrerollGroup::empty(),
        PrerollGroup::empty(),
        PrerollGroup::empty(),
    ]);
    let mut sink = InMemorySink::new();
    render_animation(
        &session,
        &spec(),
        &PreparedStickers::empty(),
        &FooterFonts::none(),
        &fast_opts(4, 1.0, 1),
        &mut sink,
    )
    .await
    .unwrap();

    let frames = sink.frames();
    assert_eq!(frames.len(), 4);
    // Stills do not move: every output frame is identical.
    for (_, frame) in &frames[1..] {
        assert_eq!(frame.as_raw(), frames[0].1.as_raw());
    }
}

#[tokio::test(start_paused = true)]
async fn realtime_pacing_yields_one_frame_interval_per_frame() {
    let session = live_session(vec![
        preroll(&[1, 2]),
        PrerollGroup::empty(),
        PrerollGroup::empty(),
        PrerollGroup::empty(),
    ]);
    let mut sink = InMemorySink::new();
    let opts = AnimateOptions {
        fps: 10,
        segment_seconds: 1.0,
        repetitions: 1,
        pacing: Pacing::Realtime,
    };
    let started = tokio::time::Instant::now();
    render_animation(
        &session,
        &spec(),
        &PreparedStickers::empty(),
        &FooterFonts::none(),
        &opts,
        &mut sink,
    )
    .await
    .unwrap();
    // 10 frames x 100 ms.
    assert_eq!(started.elapsed(), Duration::from_secs(1));
}

struct ExplodingSink {
    inner: InMemorySink,
    fail_at: u64,
    ended: bool,
}

impl FrameSink for ExplodingSink {
    fn begin(&mut self, cfg: SinkConfig) -> BoothResult<()> {
        self.inner.begin(cfg)
    }

    fn push_frame(&mut self, idx: u64, frame: &RgbaImage) -> BoothResult<()> {
        if idx == self.fail_at {
            return Err(BoothError::encode("sink write failed"));
        }
        self.inner.push_frame(idx, frame)
    }

    fn end(&mut self) -> BoothResult<()> {
        self.ended = true;
        self.inner.end()
    }
}

#[tokio::test]
async fn sink_is_finalized_even_when_the_render_fails() {
    let session = live_session(vec![
        preroll(&[1]),
        PrerollGroup::empty(),
        PrerollGroup::empty(),
        PrerollGroup::empty(),
    ]);
    let mut sink = ExplodingSink {
        inner: InMemorySink::new(),
        fail_at: 2,
        ended: false,
    };
    let err = render_animation(
        &session,
        &spec(),
        &PreparedStickers::empty(),
        &FooterFonts::none(),
        &fast_opts(4, 1.0, 1),
        &mut sink,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, BoothError::Encode(_)));
    assert!(sink.ended, "sink must be flushed after a failed render");
}

#[tokio::test]
async fn invalid_options_are_rejected() {
    let session = live_session(vec![PrerollGroup::empty(); 4]);
    let mut sink = InMemorySink::new();
    let bad = AnimateOptions {
        fps: 0,
        ..AnimateOptions::default()
    };
    assert!(render_animation(
        &session,
        &spec(),
        &PreparedStickers::empty(),
        &FooterFonts::none(),
        &bad,
        &mut sink,
    )
    .await
    .is_err());
}
