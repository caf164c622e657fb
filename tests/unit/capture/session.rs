use std::sync::Arc;

use super::*;
use crate::capture::source::SyntheticSource;

fn engine() -> CaptureEngine {
    CaptureEngine::new(CaptureOptions::default())
}

fn drain(rx: &mut broadcast::Receiver<SessionEvent>) -> Vec<SessionEvent> {
    let mut events = Vec::new();
    while let Ok(ev) = rx.try_recv() {
        events.push(ev);
    }
    events
}

#[test]
fn countdown_accepts_only_3_5_10() {
    assert_eq!(Countdown::try_from(3).unwrap().seconds(), 3);
    assert_eq!(Countdown::try_from(5).unwrap().seconds(), 5);
    assert_eq!(Countdown::try_from(10).unwrap().seconds(), 10);
    assert!(Countdown::try_from(4).is_err());
    assert!(Countdown::try_from(0).is_err());
}

#[test]
fn upload_session_is_not_live_and_has_empty_preroll() {
    let imgs = vec![RgbaImage::new(4, 3); 4];
    let session = Session::from_uploads(imgs).unwrap();
    assert!(!session.is_live());
    assert!(session.is_complete());
    assert_eq!(session.preroll_groups().len(), 4);
    assert!(session.preroll_groups().iter().all(PrerollGroup::is_empty));
    assert!(Session::from_uploads(vec![]).is_err());
    assert!(Session::from_uploads(vec![RgbaImage::new(1, 1); 5]).is_err());
}

#[tokio::test(start_paused = true)]
async fn full_session_captures_4_shots_in_about_12_seconds() {
    let engine = engine();
    let mut rx = engine.subscribe();
    let mut source = SyntheticSource::new(640, 480).unwrap();
    let mut session = Session::live(Countdown::Three, FilterPreset::None);

    let started = tokio::time::Instant::now();
    engine.run_session(&mut source, &mut session).await.unwrap();
    let elapsed = started.elapsed();

    assert!(session.is_complete());
    assert!(!session.cancelled());
    assert_eq!(session.shots().len(), SHOTS_PER_SESSION);
    assert_eq!(session.preroll_groups().len(), SHOTS_PER_SESSION);
    for group in session.preroll_groups() {
        assert!(!group.is_empty());
        assert!(group.len() <= PREROLL_MAX_KEPT);
    }
    // 4 slots x 3 s countdown; captures themselves take no virtual time.
    assert!(
        elapsed >= Duration::from_secs(12) && elapsed < Duration::from_secs(13),
        "elapsed {elapsed:?}"
    );
    assert_eq!(
        drain(&mut rx).last(),
        Some(&SessionEvent::Complete { shots: 4 })
    );
}

#[tokio::test(start_paused = true)]
async fn every_shot_fires_exactly_one_shutter_event() {
    let engine = engine();
    let mut rx = engine.subscribe();

    let mut source = SyntheticSource::new(640, 480).unwrap();
    let mut session = Session::live(Countdown::Three, FilterPreset::None);
    engine.run_session(&mut source, &mut session).await.unwrap();

    let shutters: Vec<usize> = drain(&mut rx)
        .into_iter()
        .filter_map(|ev| match ev {
            SessionEvent::Shutter { shot } => Some(shot),
            _ => None,
        })
        .collect();
    assert_eq!(shutters, vec![0, 1, 2, 3]);
}

#[tokio::test(start_paused = true)]
async fn cancel_during_slot_2_keeps_exactly_2_shots() {
    let engine = Arc::new(engine());
    let canceller = {
        let engine = engine.clone();
        let mut rx = engine.subscribe();
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(SessionEvent::CountingDown { shot: 2, .. }) => {
                        engine.cancel();
                        break;
                    }
                    Ok(_) => {}
                    Err(_) => break,
                }
            }
        })
    };

    let mut source = SyntheticSource::new(640, 480).unwrap();
    let mut session = Session::live(Countdown::Three, FilterPreset::None);
    engine.run_session(&mut source, &mut session).await.unwrap();
    canceller.await.unwrap();

    assert!(session.cancelled());
    assert!(session.is_complete());
    // The in-progress slot never completes; groups stay index-aligned.
    assert_eq!(session.shots().len(), 2);
    assert_eq!(session.preroll_groups().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn cancel_before_a_session_is_a_noop() {
    let engine = engine();
    engine.cancel();

    let mut source = SyntheticSource::new(640, 480).unwrap();
    let mut session = Session::live(Countdown::Three, FilterPreset::None);
    engine.run_session(&mut source, &mut session).await.unwrap();
    assert_eq!(session.shots().len(), 4);
    assert!(!session.cancelled());
}

#[tokio::test(start_paused = true)]
async fn cancel_after_completion_emits_nothing() {
    let engine = engine();
    let mut source = SyntheticSource::new(640, 480).unwrap();
    let mut session = Session::live(Countdown::Three, FilterPreset::None);
    engine.run_session(&mut source, &mut session).await.unwrap();

    // A late cancel must not displace the terminal Complete event.
    let mut rx = engine.subscribe();
    engine.cancel();
    assert!(rx.try_recv().is_err());
    assert!(!session.cancelled());
}

#[tokio::test(start_paused = true)]
async fn preroll_sampling_is_capped_for_long_countdowns() {
    let engine = engine();
    let mut source = SyntheticSource::new(640, 480).unwrap();
    let mut session = Session::live(Countdown::Ten, FilterPreset::None);
    engine.run_session(&mut source, &mut session).await.unwrap();

    // 10 s countdown samples for at most 8 s: 64 raw frames strided to <=16.
    for group in session.preroll_groups() {
        assert!(group.len() <= PREROLL_MAX_KEPT);
    }
    assert_eq!(session.shots().len(), 4);
}

#[tokio::test]
async fn run_session_rejects_upload_and_spent_sessions() {
    let engine = engine();
    let mut source = SyntheticSource::new(64, 48).unwrap();

    let mut uploaded = Session::from_uploads(vec![RgbaImage::new(4, 3)]).unwrap();
    assert!(engine.run_session(&mut source, &mut uploaded).await.is_err());
}
