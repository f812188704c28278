use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use super::*;
use crate::catalog::Track;
use crate::playback::PlaybackResource;
use crate::playback::testing::FakeBackend;

fn t(name: &str) -> Track {
    Track {
        id: Some(name.to_string()),
        title: name.to_string(),
        path: format!("/music/{name}.mp3"),
        ..Track::default()
    }
}

fn names(q: &QueueManager) -> Vec<String> {
    q.tracks().iter().map(|t| t.title.clone()).collect()
}

fn now_playing(q: &QueueManager) -> Option<String> {
    q.playback().current_track().map(|t| t.title.clone())
}

fn manager() -> (QueueManager, FakeBackend) {
    let (resource, fake) = FakeBackend::resource();
    (QueueManager::new(resource), fake)
}

fn abc_at_0() -> (QueueManager, FakeBackend) {
    let (mut q, fake) = manager();
    q.add_multiple([t("A"), t("B"), t("C")]);
    q.play_from_queue(0);
    (q, fake)
}

#[test]
fn new_queue_is_empty_with_no_current() {
    let (q, _) = manager();
    assert!(q.is_empty());
    assert_eq!(q.current_index(), None);
    assert!(q.current_track().is_none());
}

#[test]
fn add_appends_without_touching_current() {
    let (mut q, fake) = manager();
    q.add_to_queue(t("A"));
    q.add_multiple(vec![t("B"), t("C")]);

    assert_eq!(names(&q), ["A", "B", "C"]);
    assert_eq!(q.current_index(), None);
    assert_eq!(fake.load_count(), 0);
}

#[test]
fn duplicates_are_kept() {
    let (mut q, _) = manager();
    q.add_to_queue(t("A"));
    q.add_to_queue(t("A"));
    assert_eq!(q.len(), 2);
}

#[test]
fn remove_before_current_shifts_index_down() {
    let (mut q, _) = manager();
    q.add_multiple([t("A"), t("B"), t("C")]);
    q.play_from_queue(2);

    q.remove_from_queue(0);
    assert_eq!(names(&q), ["B", "C"]);
    assert_eq!(q.current_index(), Some(1));
    assert_eq!(q.current_track().map(|t| t.title.as_str()), Some("C"));
}

#[test]
fn remove_after_current_keeps_index() {
    let (mut q, _) = abc_at_0();
    q.remove_from_queue(2);
    assert_eq!(q.current_index(), Some(0));
    assert_eq!(names(&q), ["A", "B"]);
}

#[test]
fn remove_current_clamps_into_bounds() {
    let (mut q, _) = manager();
    q.add_multiple([t("A"), t("B"), t("C")]);
    q.play_from_queue(2);

    q.remove_from_queue(2);
    assert_eq!(q.current_index(), Some(1));

    q.play_from_queue(0);
    q.remove_from_queue(0);
    assert_eq!(q.current_index(), Some(0));
    assert_eq!(names(&q), ["B"]);

    q.remove_from_queue(0);
    assert!(q.is_empty());
    assert_eq!(q.current_index(), None);
}

#[test]
fn remove_current_leaves_playback_running() {
    let (mut q, fake) = abc_at_0();
    q.remove_from_queue(0);
    assert_eq!(now_playing(&q).as_deref(), Some("A"));
    assert_eq!(fake.load_count(), 1);
}

#[test]
fn remove_out_of_range_is_ignored() {
    let (mut q, _) = abc_at_0();
    q.remove_from_queue(3);
    q.remove_from_queue(usize::MAX);
    assert_eq!(q.len(), 3);
    assert_eq!(q.current_index(), Some(0));
}

#[test]
fn clear_resets_current() {
    let (mut q, _) = abc_at_0();
    q.clear_queue();
    assert!(q.is_empty());
    assert_eq!(q.current_index(), None);
}

#[test]
fn play_from_queue_plays_and_ignores_out_of_range() {
    let (mut q, fake) = manager();
    q.add_multiple([t("A"), t("B")]);

    q.play_from_queue(5);
    assert_eq!(q.current_index(), None);
    assert_eq!(fake.load_count(), 0);

    q.play_from_queue(1);
    assert_eq!(q.current_index(), Some(1));
    assert_eq!(now_playing(&q).as_deref(), Some("B"));
    assert_eq!(
        fake.last_load().as_deref(),
        Some("http://backend/api/stream/%2Fmusic%2FB.mp3")
    );
}

#[test]
fn play_next_advances_and_stops_at_the_end() {
    let (mut q, fake) = abc_at_0();
    q.play_next();
    assert_eq!(q.current_index(), Some(1));
    q.play_next();
    assert_eq!(q.current_index(), Some(2));
    assert_eq!(fake.load_count(), 3);

    q.play_next();
    assert_eq!(q.current_index(), Some(2));
    assert_eq!(now_playing(&q).as_deref(), Some("C"));
    assert_eq!(fake.load_count(), 3);
}

#[test]
fn play_next_with_nothing_current_starts_at_the_top() {
    let (mut q, _) = manager();
    q.play_next();
    assert_eq!(q.current_index(), None);

    q.add_multiple([t("A"), t("B")]);
    q.play_next();
    assert_eq!(q.current_index(), Some(0));
    assert_eq!(now_playing(&q).as_deref(), Some("A"));
}

#[test]
fn play_previous_never_goes_below_zero() {
    let (mut q, fake) = manager();
    q.play_previous();
    assert_eq!(q.current_index(), None);
    assert_eq!(fake.load_count(), 0);

    q.add_multiple([t("A"), t("B"), t("C")]);
    q.play_from_queue(2);
    q.play_previous();
    assert_eq!(q.current_index(), Some(1));
    q.play_previous();
    assert_eq!(q.current_index(), Some(0));
    q.play_previous();
    assert_eq!(q.current_index(), Some(0));
    assert_eq!(now_playing(&q).as_deref(), Some("A"));
}

#[test]
fn play_song_with_queue_seeds_an_empty_queue_from_context() {
    let (mut q, _) = manager();
    q.play_song_with_queue(t("A"), &[t("A"), t("B"), t("C")]);

    assert_eq!(names(&q), ["A", "B", "C"]);
    assert_eq!(q.current_index(), Some(0));
    assert_eq!(now_playing(&q).as_deref(), Some("A"));
}

#[test]
fn play_song_with_queue_seeds_at_the_picked_position() {
    let (mut q, _) = manager();
    q.play_song_with_queue(t("C"), &[t("A"), t("B"), t("C")]);
    assert_eq!(q.current_index(), Some(2));
    assert_eq!(now_playing(&q).as_deref(), Some("C"));
}

#[test]
fn play_song_with_queue_puts_an_unlisted_track_in_front_of_the_context() {
    let (mut q, fake) = manager();
    q.play_song_with_queue(t("Z"), &[t("A"), t("B")]);
    assert_eq!(names(&q), ["Z", "A", "B"]);
    assert_eq!(q.current_index(), Some(0));
    assert_eq!(now_playing(&q).as_deref(), Some("Z"));
    assert_eq!(q.current_track(), q.playback().current_track());
    assert_eq!(fake.load_count(), 1);
}

#[test]
fn play_song_with_queue_jumps_to_an_already_queued_track() {
    let (mut q, _) = abc_at_0();
    q.play_song_with_queue(t("B"), &[]);

    assert_eq!(names(&q), ["A", "B", "C"]);
    assert_eq!(q.current_index(), Some(1));
    assert_eq!(now_playing(&q).as_deref(), Some("B"));
}

#[test]
fn play_song_with_queue_inserts_after_current() {
    let (mut q, _) = abc_at_0();
    q.play_song_with_queue(t("D"), &[]);

    assert_eq!(names(&q), ["A", "D", "B", "C"]);
    assert_eq!(q.current_index(), Some(1));
    assert_eq!(now_playing(&q).as_deref(), Some("D"));
}

#[test]
fn play_song_with_queue_does_not_merge_context_into_a_busy_queue() {
    let (mut q, _) = abc_at_0();
    q.play_song_with_queue(t("D"), &[t("D"), t("E"), t("F")]);
    assert_eq!(names(&q), ["A", "D", "B", "C"]);
}

#[test]
fn play_song_with_queue_inserts_at_top_when_nothing_current() {
    let (mut q, _) = manager();
    q.add_multiple([t("A"), t("B")]);
    q.play_song_with_queue(t("D"), &[]);
    assert_eq!(names(&q), ["D", "A", "B"]);
    assert_eq!(q.current_index(), Some(0));

    let (mut empty, _) = manager();
    empty.play_song_with_queue(t("D"), &[]);
    assert_eq!(names(&empty), ["D"]);
    assert_eq!(empty.current_index(), Some(0));
}

#[test]
fn identity_falls_back_to_path_when_id_is_missing() {
    let (mut q, _) = manager();
    let mut a = t("A");
    a.id = None;
    let mut b = t("B");
    b.id = None;
    q.add_multiple([a.clone(), b.clone()]);
    q.play_from_queue(0);

    q.play_song_with_queue(b, &[]);
    assert_eq!(q.len(), 2);
    assert_eq!(q.current_index(), Some(1));
}

#[test]
fn natural_end_advances_exactly_once() {
    let (mut q, fake) = manager();
    q.add_multiple([t("A"), t("B")]);
    q.play_from_queue(0);
    q.tick();

    fake.finish();
    q.tick();
    q.tick();
    assert_eq!(q.current_index(), Some(1));
    assert_eq!(now_playing(&q).as_deref(), Some("B"));
    assert_eq!(fake.load_count(), 2);

    fake.finish();
    q.tick();
    q.tick();
    assert_eq!(q.current_index(), Some(1));
    assert_eq!(now_playing(&q).as_deref(), Some("B"));
    assert_eq!(fake.load_count(), 2);
    assert!(!q.playback().is_playing());
}

#[test]
fn pause_and_seek_never_auto_advance() {
    let (mut q, fake) = abc_at_0();
    q.tick();
    q.toggle_play_pause();
    q.tick();
    q.seek(Duration::from_secs(10));
    q.tick();
    q.toggle_play_pause();
    q.tick();

    assert_eq!(q.current_index(), Some(0));
    assert_eq!(fake.load_count(), 1);
    assert!(q.playback().is_playing());
}

#[test]
fn seek_clamps_to_known_duration() {
    let (mut q, fake) = abc_at_0();
    fake.advance(Duration::from_secs(1), Some(Duration::from_secs(60)));
    q.tick();

    q.seek(Duration::from_secs(500));
    assert_eq!(fake.output.borrow().seeks.last(), Some(&Duration::from_secs(60)));

    q.seek_by(-1_000);
    assert_eq!(fake.output.borrow().seeks.last(), Some(&Duration::ZERO));

    q.seek_by(15);
    assert_eq!(fake.output.borrow().seeks.last(), Some(&Duration::from_secs(15)));
}

#[test]
fn volume_is_clamped() {
    let (mut q, fake) = manager();
    q.set_volume(3.0);
    assert_eq!(fake.output.borrow().volume, Some(1.0));
    q.set_volume(-1.0);
    assert_eq!(fake.output.borrow().volume, Some(0.0));
    q.set_volume(0.4);
    assert_eq!(fake.output.borrow().volume, Some(0.4));
}

#[test]
fn subscribers_get_a_snapshot_per_mutation() {
    let (mut q, _) = manager();
    let seen: Rc<RefCell<Vec<QueueSnapshot>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    q.subscribe(move |event: &QueueEvent| {
        let QueueEvent::Changed(snapshot) = event;
        sink.borrow_mut().push(snapshot.clone());
    });

    q.add_to_queue(t("A"));
    q.play_from_queue(0);
    q.clear_queue();

    let seen = seen.borrow();
    assert_eq!(seen.len(), 3);
    assert_eq!(seen[0].current, None);
    assert_eq!(seen[1].current, Some(0));
    assert_eq!(seen[2], QueueSnapshot::default());
}

#[test]
fn queue_works_without_an_audio_output() {
    let mut q = QueueManager::new(PlaybackResource::unavailable());
    q.play_song_with_queue(t("A"), &[t("A"), t("B")]);
    q.play_next();
    q.toggle_play_pause();
    q.tick();

    assert_eq!(q.current_index(), Some(1));
    assert!(q.playback().current_track().is_none());
}

#[test]
fn independent_sessions_do_not_share_state() {
    let (mut first, _) = manager();
    let (second, _) = manager();
    first.add_to_queue(t("A"));
    first.play_from_queue(0);

    assert!(second.is_empty());
    assert!(second.playback().current_track().is_none());
}

#[derive(Debug, Clone, Copy)]
enum Op {
    Add,
    Remove(usize),
    Clear,
    Play(usize),
    Next,
    Prev,
    Seeded,
    Insert,
}

const OPS: [Op; 10] = [
    Op::Add,
    Op::Remove(0),
    Op::Remove(1),
    Op::Clear,
    Op::Play(0),
    Op::Play(2),
    Op::Next,
    Op::Prev,
    Op::Seeded,
    Op::Insert,
];

fn apply(q: &mut QueueManager, op: Op, step: usize) {
    match op {
        Op::Add => q.add_to_queue(t(&format!("add{step}"))),
        Op::Remove(i) => q.remove_from_queue(i),
        Op::Clear => q.clear_queue(),
        Op::Play(i) => q.play_from_queue(i),
        Op::Next => q.play_next(),
        Op::Prev => q.play_previous(),
        Op::Seeded => q.play_song_with_queue(t("B"), &[t("A"), t("B"), t("C")]),
        Op::Insert => q.play_song_with_queue(t(&format!("ins{step}")), &[]),
    }
}

#[test]
fn index_stays_in_bounds_for_every_short_operation_sequence() {
    for a in OPS {
        for b in OPS {
            for c in OPS {
                for d in OPS {
                    let (mut q, _) = manager();
                    for (step, op) in [a, b, c, d].into_iter().enumerate() {
                        apply(&mut q, op, step);
                        if let Some(i) = q.current_index() {
                            assert!(
                                i < q.len(),
                                "index {i} out of bounds (len {}) after {:?}",
                                q.len(),
                                [a, b, c, d]
                            );
                        }
                        if q.is_empty() {
                            assert_eq!(q.current_index(), None, "after {:?}", [a, b, c, d]);
                        }
                    }
                }
            }
        }
    }
}
