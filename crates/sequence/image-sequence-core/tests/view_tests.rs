use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use image_sequence_core::{
    ChannelLoopSink, FrameSource, ImageSequenceView, Looped, PlaybackConfig, SequenceError,
    SequenceProps,
};
use image_sequence_test_fixtures::sequences;

type Shown = Rc<RefCell<Vec<(usize, String)>>>;

fn mk_view(config: PlaybackConfig) -> (ImageSequenceView<String>, Shown) {
    let shown: Shown = Rc::default();
    let sink = shown.clone();
    let view = ImageSequenceView::new(config, move |i: usize, f: &String| {
        sink.borrow_mut().push((i, f.clone()))
    });
    (view, shown)
}

fn config_ms(ms: u32, looping: bool) -> PlaybackConfig {
    PlaybackConfig {
        frame_duration_ms: Some(ms),
        looping,
        ..PlaybackConfig::default()
    }
}

/// Complete every request by echoing the source location back as the frame.
fn load_all(view: &mut ImageSequenceView<String>, uris: &[&str]) {
    let reqs = view.set_images(uris);
    for req in reqs {
        view.complete_load(req.generation, req.index, Ok(req.source.location().to_string()));
    }
}

#[test]
fn attach_before_load_starts_once_frames_arrive() {
    let (mut view, shown) = mk_view(config_ms(100, true));
    view.attach();
    assert!(!view.engine().is_playing());
    load_all(&mut view, &["a", "b", "c"]);
    assert!(view.engine().is_playing());
    assert_eq!(shown.borrow()[0], (0, "a".to_string()));
    view.tick(Duration::from_millis(100));
    assert_eq!(shown.borrow().last(), Some(&(1, "b".to_string())));
}

#[test]
fn loaded_but_detached_view_waits_for_attach() {
    let (mut view, _shown) = mk_view(config_ms(100, true));
    load_all(&mut view, &["a", "b"]);
    assert!(!view.engine().is_playing());
    view.tick(Duration::from_millis(500));
    assert_eq!(view.engine().current_index(), Some(0));
    view.attach();
    assert!(view.engine().is_playing());
}

#[test]
fn on_looped_fires_once_per_tick_with_loop() {
    let (mut view, _shown) = mk_view(config_ms(100, true));
    let count = Rc::new(RefCell::new(0));
    let c = count.clone();
    view.set_on_looped(move || *c.borrow_mut() += 1);
    load_all(&mut view, &["a", "b"]);
    view.attach();

    view.tick(Duration::from_millis(200));
    assert_eq!(*count.borrow(), 1);
    view.tick(Duration::from_secs(10));
    assert_eq!(*count.borrow(), 2);

    view.clear_on_looped();
    view.tick(Duration::from_millis(200));
    assert_eq!(*count.borrow(), 2);
}

#[test]
fn on_looped_through_channel() {
    let (tx, rx) = crossbeam_channel::unbounded();
    let (mut view, _shown) = mk_view(config_ms(50, true));
    view.set_on_looped(ChannelLoopSink::new(tx));
    view.set_frames(vec!["x".to_string()]);
    view.attach();
    for _ in 0..3 {
        view.tick(Duration::from_millis(50));
    }
    assert_eq!(rx.try_iter().collect::<Vec<_>>(), vec![Looped; 3]);
}

#[test]
fn first_frame_shows_before_the_rest() {
    let (mut view, shown) = mk_view(config_ms(100, true));
    let reqs = view.set_images(&["a", "b", "c"]);
    assert!(view.is_loading());
    let g = reqs[0].generation;
    view.complete_load(g, 0, Ok("a".into()));
    assert_eq!(*shown.borrow(), vec![(0, "a".to_string())]);
    assert_eq!(view.engine().len(), 0, "frames install only when all arrive");
    view.complete_load(g, 2, Ok("c".into()));
    view.complete_load(g, 1, Ok("b".into()));
    assert_eq!(view.engine().frames(), ["a", "b", "c"]);
    assert!(!view.is_loading());
}

#[test]
fn replacing_images_mid_load_drops_stale_results() {
    let (mut view, _shown) = mk_view(config_ms(100, true));
    let old = view.set_images(&["old_0", "old_1"]);
    let new = view.set_images(&["new_0"]);
    assert_ne!(old[0].generation, new[0].generation);

    for req in &old {
        view.complete_load(req.generation, req.index, Ok("stale".into()));
    }
    assert!(view.engine().is_empty());
    view.complete_load(new[0].generation, 0, Ok("new_0".into()));
    assert_eq!(view.engine().frames(), ["new_0"]);
}

#[test]
fn new_batch_replaces_old_frames_once_its_first_frame_lands() {
    let (mut view, shown) = mk_view(config_ms(100, true));
    view.set_frames(vec!["old_0".into(), "old_1".into(), "old_2".into()]);
    view.attach();

    let reqs = view.set_images(&["new_0", "new_1"]);
    let g = reqs[0].generation;
    // Until the new batch delivers anything, the old frames keep playing.
    view.tick(Duration::from_millis(100));
    assert_eq!(shown.borrow().last(), Some(&(1, "old_1".to_string())));

    view.complete_load(g, 0, Ok("new_0".into()));
    let first_new = shown.borrow().len();
    assert_eq!(shown.borrow()[first_new - 1], (0, "new_0".to_string()));
    for _ in 0..5 {
        view.tick(Duration::from_millis(100));
    }
    assert_eq!(shown.borrow().len(), first_new, "old batch must not render again");

    view.complete_load(g, 1, Ok("new_1".into()));
    assert!(view.engine().is_playing());
    view.tick(Duration::from_millis(100));
    let shown = shown.borrow();
    assert_eq!(shown.last(), Some(&(1, "new_1".to_string())));
    assert!(shown[first_new..].iter().all(|(_, f)| f.starts_with("new_")));
}

#[test]
fn failed_frame_makes_sequence_inert() {
    let (mut view, _shown) = mk_view(config_ms(100, true));
    view.attach();
    let reqs = view.set_images(&["a", "b"]);
    let g = reqs[0].generation;
    view.complete_load(g, 0, Ok("a".into()));
    view.complete_load(g, 1, Err(SequenceError::frame_load(1, "decode failed")));
    assert!(view.engine().is_empty());
    assert!(view.tick(Duration::from_secs(1)).is_idle());
}

#[test]
fn malformed_source_makes_sequence_inert() {
    let (mut view, _shown) = mk_view(config_ms(100, true));
    view.set_frames(vec!["keep".into()]);
    let reqs = view.set_images(&["a", " "]);
    assert!(reqs.is_empty());
    assert!(view.engine().is_empty());
}

#[test]
fn requests_carry_parsed_sources() {
    let (mut view, _shown) = mk_view(PlaybackConfig::default());
    let reqs = view.set_images(&["https://x/0.png", "file:///tmp/1.png", "two"]);
    let sources: Vec<_> = reqs.into_iter().map(|r| r.source).collect();
    assert_eq!(
        sources,
        vec![
            FrameSource::Remote("https://x/0.png".into()),
            FrameSource::File("/tmp/1.png".into()),
            FrameSource::Resource("two".into()),
        ]
    );
}

#[test]
fn detach_stops_and_releases() {
    let (mut view, _shown) = mk_view(config_ms(100, true));
    load_all(&mut view, &["a", "b"]);
    view.attach();
    view.tick(Duration::from_millis(100));
    view.detach();
    assert!(!view.is_attached());
    assert!(!view.engine().is_playing());
    assert!(view.engine().is_empty());
    assert!(view.images().is_empty());
}

#[test]
fn fps_change_keeps_position() {
    let (mut view, _shown) = mk_view(PlaybackConfig::default());
    view.set_frames(vec!["a".into(), "b".into(), "c".into()]);
    view.attach();
    view.tick(Duration::from_secs(1) / 24);
    assert_eq!(view.engine().current_index(), Some(1));
    view.set_frames_per_second(2);
    assert_eq!(view.engine().current_index(), Some(1));
    assert_eq!(view.engine().frame_duration(), Duration::from_millis(500));
    view.tick(Duration::from_millis(500));
    assert_eq!(view.engine().current_index(), Some(2));
}

#[test]
fn one_shot_view_stops_on_last_frame() {
    let (mut view, shown) = mk_view(config_ms(100, false));
    let count = Rc::new(RefCell::new(0));
    let c = count.clone();
    view.set_on_looped(move || *c.borrow_mut() += 1);
    load_all(&mut view, &["a", "b", "c"]);
    view.attach();
    view.tick(Duration::from_secs(5));
    assert_eq!(*count.borrow(), 1);
    assert!(!view.engine().is_playing());
    assert_eq!(shown.borrow().last(), Some(&(2, "c".to_string())));

    view.set_loop(true);
    view.start();
    assert_eq!(view.engine().current_index(), Some(0));
    assert!(view.engine().looping());
}

#[test]
fn props_fixture_drives_view() {
    let props: SequenceProps = sequences::load("walk-cycle").unwrap();
    let (mut view, _shown) = mk_view(PlaybackConfig::default());
    let reqs = view.apply_props(&props);
    assert_eq!(reqs.len(), 8);
    assert_eq!(view.config().frames_per_second, 12);
    for req in reqs {
        view.complete_load(req.generation, req.index, Ok(req.source.location().to_string()));
    }
    view.attach();
    view.tick(Duration::from_secs(1) / 12 * 9);
    assert_eq!(view.engine().current_index(), Some(1));
    assert_eq!(view.engine().loops_completed(), 1);

    // Same images again: nothing to reload.
    assert!(view.apply_props(&props).is_empty());
}

#[test]
fn explicit_duration_fixture() {
    let props = SequenceProps::from_json(&sequences::json("explicit-duration").unwrap()).unwrap();
    assert_eq!(props.playback.frame_duration(), Duration::from_millis(125));
    let (mut view, _shown) = mk_view(PlaybackConfig::default());
    view.apply_props(&props);
    assert_eq!(view.engine().frame_duration(), Duration::from_millis(125));
}

#[test]
fn broken_source_fixture_is_inert() {
    let props: SequenceProps = sequences::load("broken-source").unwrap();
    let (mut view, _shown) = mk_view(PlaybackConfig::default());
    assert!(view.apply_props(&props).is_empty());
    view.attach();
    assert!(!view.engine().is_playing());
}

#[test]
fn every_fixture_parses() {
    for key in sequences::keys() {
        let props: SequenceProps = sequences::load(&key).unwrap();
        assert!(!props.images.is_empty(), "{key} has images");
    }
    let one_shot: SequenceProps = sequences::load("one-shot").unwrap();
    assert!(!one_shot.playback.looping);
    let mixed: SequenceProps = sequences::load("mixed-sources").unwrap();
    assert_eq!(mixed.playback, PlaybackConfig::default());
}

#[test]
fn tick_seconds_matches_duration_ticks() {
    let (mut view, shown) = mk_view(config_ms(700, true));
    view.set_frames(vec!["a".into(), "b".into()]);
    view.attach();
    let out = view.tick_seconds(0.7);
    assert_eq!(out.frame, Some(1));
    assert_eq!(view.engine().elapsed_in_frame(), Duration::ZERO);
    assert_eq!(shown.borrow().last(), Some(&(1, "b".to_string())));

    assert!(view.tick_seconds(-3.0).is_idle());
    assert!(view.tick_seconds(f64::NAN).is_idle());
    let out = view.tick_seconds(0.7);
    assert!(out.looped);
    assert_eq!(view.engine().current_index(), Some(0));
}

#[test]
fn zero_fps_props_still_apply_images() {
    let props = SequenceProps::from_json(r#"{"images":["a","b"],"framesPerSecond":0}"#).unwrap();
    assert!(props.playback.validate().is_err());
    let (mut view, _shown) = mk_view(PlaybackConfig::default());
    let reqs = view.apply_props(&props);
    assert_eq!(reqs.len(), 2);
    for req in reqs {
        view.complete_load(req.generation, req.index, Ok(req.source.location().to_string()));
    }
    view.attach();
    assert_eq!(view.engine().frame_duration(), Duration::ZERO);
    assert!(view.engine().is_inert());
    assert!(view.tick(Duration::from_secs(1)).is_idle());
}
