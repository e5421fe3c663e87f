//! Tests for the scene asset cache

use super::*;

fn request(bg: &str, left: &str, right: &str, audio: &str, looped: bool) -> SceneRequest {
    SceneRequest {
        background: bg.to_string(),
        left: left.to_string(),
        right: right.to_string(),
        audio: AudioCue::new(audio, looped),
    }
}

#[test]
fn apply_loads_each_requested_slot() {
    let mut cache = SceneAssetCache::new(HeadlessBackend::new());

    let result = cache.apply(&request("bg.png", "l.png", "r.png", "theme.ogg", true));

    assert_eq!(result.background, LoadStatus::Loaded);
    assert_eq!(result.left, LoadStatus::Loaded);
    assert_eq!(result.right, LoadStatus::Loaded);
    assert_eq!(result.audio, LoadStatus::Loaded);
    assert!(result.diagnostics.is_empty());

    assert_eq!(cache.bound_background(), Some("bg.png"));
    assert_eq!(cache.bound_left(), Some("l.png"));
    assert_eq!(cache.bound_right(), Some("r.png"));
    assert_eq!(cache.bound_audio(), Some(&AudioCue::new("theme.ogg", true)));
    assert_eq!(cache.backend().playing(), Some("theme.ogg"));
}

#[test]
fn apply_same_request_twice_loads_once() {
    let mut cache = SceneAssetCache::new(HeadlessBackend::new());
    let scene = request("bg.png", "l.png", "", "theme.ogg", false);

    cache.apply(&scene);
    let calls_after_first = cache.backend().calls().len();
    let second = cache.apply(&scene);

    assert_eq!(second.background, LoadStatus::Unchanged);
    assert_eq!(second.left, LoadStatus::Unchanged);
    assert_eq!(second.right, LoadStatus::Unchanged);
    assert_eq!(second.audio, LoadStatus::Unchanged);
    assert_eq!(cache.backend().calls().len(), calls_after_first);
    assert_eq!(cache.backend().load_attempts("bg.png"), 1);
    assert_eq!(cache.backend().load_attempts("theme.ogg"), 1);
    assert_eq!(cache.bound_background(), Some("bg.png"));
}

#[test]
fn apply_same_looping_silence_twice_is_a_no_op() {
    let mut cache = SceneAssetCache::new(HeadlessBackend::new());
    cache.apply(&request("", "", "", "theme.ogg", true));
    let silence = request("", "", "", "", true);

    let first = cache.apply(&silence);
    cache.backend_mut().clear_calls();
    let second = cache.apply(&silence);

    assert_eq!(first.audio, LoadStatus::Cleared);
    assert_eq!(second.audio, LoadStatus::Unchanged);
    assert!(cache.backend().calls().is_empty());
    assert_eq!(cache.bound_audio(), None);
}

#[test]
fn looping_silence_on_fresh_cache_does_nothing() {
    let mut cache = SceneAssetCache::new(HeadlessBackend::new());

    let result = cache.apply(&request("", "", "", "", true));

    assert_eq!(result.audio, LoadStatus::Unchanged);
    assert!(cache.backend().calls().is_empty());
}

#[test]
fn empty_audio_request_silences_playback() {
    let mut cache = SceneAssetCache::new(HeadlessBackend::new());
    cache.apply(&request("keep", "", "", "theme.ogg", true));
    cache.backend_mut().clear_calls();

    let result = cache.apply(&request("keep", "", "", "", false));

    assert_eq!(result.background, LoadStatus::Unchanged);
    assert_eq!(result.audio, LoadStatus::Cleared);
    assert!(result.diagnostics.is_empty());
    assert_eq!(cache.bound_audio(), None);
    assert_eq!(cache.backend().playing(), None);
    assert_eq!(cache.backend().calls(), &[MediaCall::StopMusic]);
}

#[test]
fn loop_flag_change_restarts_same_track() {
    let mut cache = SceneAssetCache::new(HeadlessBackend::new());
    cache.apply(&request("", "", "", "theme.ogg", false));
    cache.backend_mut().clear_calls();

    let result = cache.apply(&request("", "", "", "theme.ogg", true));

    assert_eq!(result.audio, LoadStatus::Loaded);
    assert_eq!(
        cache.backend().calls(),
        &[
            MediaCall::StopMusic,
            MediaCall::PlayMusic {
                path: "theme.ogg".to_string(),
                looped: true
            }
        ]
    );
    assert_eq!(cache.bound_audio(), Some(&AudioCue::new("theme.ogg", true)));
}

#[test]
fn failed_background_does_not_block_other_slots() {
    let backend = HeadlessBackend::new().with_missing("broken.png");
    let mut cache = SceneAssetCache::new(backend);

    let result = cache.apply(&request("broken.png", "l.png", "r.png", "theme.ogg", false));

    assert_eq!(result.background, LoadStatus::Failed);
    assert_eq!(result.left, LoadStatus::Loaded);
    assert_eq!(result.right, LoadStatus::Loaded);
    assert_eq!(result.audio, LoadStatus::Loaded);

    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.diagnostics[0].slot, AssetSlot::Background);
    assert_eq!(result.diagnostics[0].path, "broken.png");

    assert_eq!(cache.bound_background(), None);
    assert_eq!(cache.bound_left(), Some("l.png"));
    assert_eq!(cache.bound_right(), Some("r.png"));
    assert_eq!(cache.bound_audio().map(|a| a.path.as_str()), Some("theme.ogg"));
}

#[test]
fn failed_load_replaces_previous_binding() {
    let mut cache = SceneAssetCache::new(HeadlessBackend::new().with_missing("gone.png"));
    cache.apply(&request("", "aoi.png", "", "", false));

    let result = cache.apply(&request("", "gone.png", "", "", false));

    assert_eq!(result.left, LoadStatus::Failed);
    assert_eq!(cache.bound_left(), None);
}

#[test]
fn failed_load_is_retried_on_next_request() {
    let mut cache = SceneAssetCache::new(HeadlessBackend::new().with_missing("late.png"));
    let scene = request("late.png", "", "", "", false);

    assert_eq!(cache.apply(&scene).background, LoadStatus::Failed);

    cache.backend_mut().mark_present("late.png");
    assert_eq!(cache.apply(&scene).background, LoadStatus::Loaded);

    assert_eq!(cache.backend().load_attempts("late.png"), 2);
    assert_eq!(cache.bound_background(), Some("late.png"));
}

#[test]
fn failed_audio_leaves_silence() {
    let mut cache = SceneAssetCache::new(HeadlessBackend::new().with_missing("bad.ogg"));
    cache.apply(&request("", "", "", "theme.ogg", true));

    let result = cache.apply(&request("", "", "", "bad.ogg", true));

    assert_eq!(result.audio, LoadStatus::Failed);
    assert_eq!(result.diagnostics[0].slot, AssetSlot::Audio);
    assert_eq!(cache.bound_audio(), None);
    assert_eq!(cache.backend().playing(), None);
}

#[test]
fn empty_image_request_clears_without_loading() {
    let mut cache = SceneAssetCache::new(HeadlessBackend::new());
    cache.apply(&request("bg.png", "", "", "", false));
    cache.backend_mut().clear_calls();

    let result = cache.apply(&request("", "", "", "", false));

    assert_eq!(result.background, LoadStatus::Cleared);
    assert_eq!(cache.bound_background(), None);
    assert_eq!(
        cache.backend().calls(),
        &[MediaCall::ReleaseTexture {
            slot: ImageSlot::Background
        }]
    );
}

#[test]
fn silence_is_safe_when_nothing_plays() {
    let mut cache = SceneAssetCache::new(HeadlessBackend::new());
    cache.silence();
    cache.silence();
    assert_eq!(cache.bound_audio(), None);
}
