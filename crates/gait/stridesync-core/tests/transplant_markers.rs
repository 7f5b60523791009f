use stridesync_core::{
    ClipId, Config, GaitError, GaitSession, NotifyEditor, SampledClip, SyncMarker,
};
use stridesync_test_fixtures::{clips, configs};

fn approx(a: f32, b: f32, eps: f32) {
    assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
}

fn load(name: &str) -> SampledClip {
    SampledClip::from_json(&clips::json(name).expect("fixture json")).expect("fixture clip")
}

struct Group {
    session: GaitSession,
    walk: ClipId,
    run: ClipId,
    fast: ClipId,
    limp: ClipId,
}

fn group_with(cfg: Config) -> Group {
    let mut session = GaitSession::new(cfg);
    let walk = session.load_clip(load("walk_f"));
    let run = session.load_clip(load("run_f"));
    let fast = session.load_clip(load("walk_fast_f"));
    let limp = session.load_clip(load("limp_f"));
    let report = session.build_all("foot_l", "foot_r");
    assert_eq!(report.built, vec![walk, run, fast]);
    assert_eq!(report.failed.len(), 1);
    Group {
        session,
        walk,
        run,
        fast,
        limp,
    }
}

fn group() -> Group {
    group_with(Config::default())
}

fn markers_on<'a>(clip: &'a SampledClip, track: &str) -> Vec<&'a SyncMarker> {
    let idx = clip.track_index(track).expect("track exists");
    clip.sync_markers()
        .iter()
        .filter(|m| m.track_index == idx)
        .collect()
}

fn times(markers: &[&SyncMarker]) -> Vec<f32> {
    let mut t: Vec<f32> = markers.iter().map(|m| m.time).collect();
    t.sort_by(f32::total_cmp);
    t
}

#[test]
fn transplant_preserves_phase_across_group() {
    let mut g = group();
    let report = g.session.transplant(g.walk, "Sync").unwrap();
    assert_eq!(report.clips.len(), 3);
    assert_eq!(report.markers_added(), 8);
    assert_eq!(report.events_added(), 4);

    // The two-cycle run gets every marker twice.
    let run = g.session.clip(g.run).unwrap();
    let t = times(&markers_on(run, "Sync"));
    assert_eq!(t.len(), 4);
    for (got, want) in t.iter().zip([0.2, 0.7, 1.0, 1.5]) {
        approx(*got, want, 1e-4);
    }
    let left: Vec<&SyncMarker> = markers_on(run, "Sync")
        .into_iter()
        .filter(|m| m.name == "left_down")
        .collect();
    assert_eq!(left.len(), 2);

    let idx = run.track_index("Sync").unwrap();
    let mut events: Vec<f32> = run
        .notify_events()
        .iter()
        .filter(|e| e.track_index == idx && e.class == "Footstep")
        .map(|e| e.time)
        .collect();
    events.sort_by(f32::total_cmp);
    assert_eq!(events.len(), 2);
    approx(events[0], 0.3, 1e-4);
    approx(events[1], 1.1, 1e-4);

    // Half-length clip: same phases, half the times.
    let fast = g.session.clip(g.fast).unwrap();
    let t = times(&markers_on(fast, "Sync"));
    assert_eq!(t.len(), 2);
    approx(t[0], 0.15, 1e-4);
    approx(t[1], 0.65, 1e-4);
}

#[test]
fn source_keeps_its_own_markers_and_other_tracks() {
    let mut g = group();
    g.session.transplant(g.walk, "Sync").unwrap();
    let walk = g.session.clip(g.walk).unwrap();
    let t = times(&markers_on(walk, "Sync"));
    assert_eq!(t.len(), 2);
    approx(t[0], 0.3, 1e-4);
    approx(t[1], 1.3, 1e-4);

    let feet = markers_on(walk, "Feet");
    assert_eq!(feet.len(), 1);
    assert_eq!(feet[0].name, "other");
}

#[test]
fn transplant_is_idempotent() {
    let mut g = group();
    let first = g.session.transplant(g.walk, "Sync").unwrap();
    let second = g.session.transplant(g.walk, "Sync").unwrap();
    assert_eq!(first, second);
    let run = g.session.clip(g.run).unwrap();
    assert_eq!(markers_on(run, "Sync").len(), 4);
    assert_eq!(run.notify_tracks().len(), 1);
}

#[test]
fn near_duplicates_are_suppressed() {
    let mut g = group();
    {
        let walk = g.session.clip_mut(g.walk).unwrap();
        let idx = walk.track_index("Sync").unwrap();
        assert!(walk.add_sync_marker("left_down_echo", 0.302, idx));
        walk.refresh_derived_caches();
    }
    let report = g.session.transplant(g.walk, "Sync").unwrap();
    assert_eq!(report.markers_added(), 8);
    assert_eq!(report.for_clip(g.walk).unwrap().duplicates_skipped, 1);
    assert_eq!(report.for_clip(g.run).unwrap().duplicates_skipped, 2);
    assert_eq!(report.for_clip(g.fast).unwrap().duplicates_skipped, 1);
    let run = g.session.clip(g.run).unwrap();
    assert!(markers_on(run, "Sync")
        .iter()
        .all(|m| m.name != "left_down_echo"));
}

#[test]
fn source_without_reference_is_rejected() {
    let mut g = group();
    let err = g.session.transplant(g.limp, "Sync").unwrap_err();
    assert_eq!(
        err,
        GaitError::ReferenceMissing {
            clip: "Limp_F".into()
        }
    );
    assert!(g.session.clip(g.run).unwrap().track_index("Sync").is_none());
}

#[test]
fn missing_track_is_rejected_without_edits() {
    let mut g = group();
    let err = g.session.transplant(g.walk, "Nope").unwrap_err();
    assert!(matches!(err, GaitError::TrackNotFound { ref track, .. } if track == "Nope"));
    assert!(g.session.clip(g.run).unwrap().notify_tracks().is_empty());
    assert_eq!(g.session.clip(g.walk).unwrap().sync_markers().len(), 3);
}

#[test]
fn invalid_clips_receive_nothing() {
    let mut g = group();
    let report = g.session.transplant(g.walk, "Sync").unwrap();
    assert!(report.for_clip(g.limp).is_none());
    assert!(g.session.clip(g.limp).unwrap().notify_tracks().is_empty());
}

#[test]
fn removing_a_track_keeps_indices_consistent() {
    let mut g = group();
    g.session.transplant(g.walk, "Sync").unwrap();
    let walk = g.session.clip_mut(g.walk).unwrap();
    assert!(walk.remove_notify_track("Feet"));
    walk.refresh_derived_caches();
    assert_eq!(walk.track_index("Sync"), Some(0));
    assert!(walk.sync_markers().iter().all(|m| m.track_index == 0));
    assert!(walk.notify_events().iter().all(|e| e.track_index == 0));
    assert_eq!(walk.sync_markers().len(), 2);
}

#[test]
fn default_markers_follow_contacts() {
    let mut g = group();
    let placed = g.session.add_default_markers();
    assert_eq!(placed, 2 + 4 + 2);

    let walk = g.session.clip(g.walk).unwrap();
    let defaults = markers_on(walk, "Default Track");
    assert_eq!(defaults.len(), 2);
    let l = defaults.iter().find(|m| m.name == "Marker_l").unwrap();
    let r = defaults.iter().find(|m| m.name == "Marker_r").unwrap();
    approx(l.time, 0.1, 1e-5);
    approx(r.time, 0.9, 1e-5);

    // Running again replaces rather than appends.
    assert_eq!(g.session.add_default_markers(), 8);
    let walk = g.session.clip(g.walk).unwrap();
    assert_eq!(markers_on(walk, "Default Track").len(), 2);
}

#[test]
fn configured_track_name_is_used() {
    let cfg = Config::from_json(&configs::json("strict").unwrap()).unwrap();
    let mut g = group_with(cfg);
    g.session.add_default_markers();
    let run = g.session.clip(g.run).unwrap();
    assert!(run.track_index("Contacts").is_some());
    assert!(run.track_index("Default Track").is_none());
}

#[test]
fn diagnostics_describe_each_clip() {
    let mut g = group();
    let report = g.session.transplant(g.walk, "Sync").unwrap();
    let lines = report.diagnostics();
    assert_eq!(lines.len(), 3);
    assert!(lines[1].starts_with("Run_F: track 'Sync' +4 markers, +2 events"));
}
