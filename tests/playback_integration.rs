use std::time::Duration;

use ed_trace::config::{CODE_LANGUAGE_KEY, PLAYBACK_SPEED_KEY};
use ed_trace::keys::{InputFocus, Key};
use ed_trace::preferences::Language;
use ed_trace::scheduler::{ManualScheduler, TimerId};
use ed_trace::settings::{JsonFileSettings, MemorySettings, SettingValue};
use ed_trace::utils::expected_step_count;
use ed_trace::{
    generate, Direction, PlaybackBuilder, PlaybackController, Scheduler, Session, SettingsError,
    SettingsStore, TickOutcome,
};

/// Store whose reads and writes always fail.
struct BrokenStore;

impl SettingsStore for BrokenStore {
    fn get(&self, _key: &str, _default: SettingValue) -> Result<SettingValue, SettingsError> {
        Err(SettingsError::Unavailable("disk on fire".into()))
    }

    fn set(&mut self, _key: &str, _value: SettingValue) -> Result<(), SettingsError> {
        Err(SettingsError::Unavailable("disk on fire".into()))
    }
}

fn fire<S: SettingsStore>(c: &mut PlaybackController<ManualScheduler, S>) -> Option<TickOutcome> {
    let id = c.scheduler_mut().fire_next()?;
    Some(c.tick(id))
}

#[test]
fn go_to_clamps_both_ends() {
    let trace = generate("horse", "ros");
    let total = trace.len();
    let mut c = PlaybackBuilder::new(trace, ManualScheduler::new(), MemorySettings::new()).build();
    c.go_to(-5);
    assert_eq!(c.index(), 0);
    c.go_to(total as i64 + 5);
    assert_eq!(c.index(), total - 1);
    c.step(Direction::Forward);
    assert_eq!(c.index(), total - 1);
}

#[test]
fn autoplay_near_the_end_stops_after_one_tick() {
    let trace = generate("abc", "abd");
    let total = trace.len();
    let mut c = PlaybackBuilder::new(trace, ManualScheduler::new(), MemorySettings::new()).build();
    c.go_to(total as i64 - 2);
    c.toggle_play();
    assert_eq!(fire(&mut c), Some(TickOutcome::Finished { index: total - 1 }));
    assert!(!c.is_playing());
    assert_eq!(c.scheduler().pending(), 0);
    assert_eq!(
        c.current_step().narrative.summary,
        "Done: the edit distance from \"abc\" to \"abd\" is 1"
    );
}

#[test]
fn full_autoplay_visits_every_step_once() {
    let trace = generate("ab", "ba");
    let total = trace.len();
    let mut c = PlaybackBuilder::new(trace, ManualScheduler::new(), MemorySettings::new()).build();
    c.toggle_play();
    let mut seen = vec![0];
    while let Some(outcome) = fire(&mut c) {
        match outcome {
            TickOutcome::Advanced { index } | TickOutcome::Finished { index } => seen.push(index),
            TickOutcome::Stale => panic!("manual scheduler fired a canceled timer"),
        }
    }
    assert_eq!(seen, (0..total).collect::<Vec<_>>());
    assert_eq!(c.scheduler().history().len(), total - 1);
}

#[test]
fn loading_a_trace_cancels_the_armed_timer() {
    let mut c = PlaybackBuilder::new(
        generate("horse", "ros"),
        ManualScheduler::new(),
        MemorySettings::new(),
    )
    .build();
    c.toggle_play();
    let old = c.armed_timer().unwrap();
    c.load_trace(generate("a", "b"));
    assert_eq!(c.scheduler().pending(), 0);
    assert_eq!(c.tick(old), TickOutcome::Stale);
    assert_eq!(c.index(), 0);
    assert_eq!(c.total(), expected_step_count(1, 1));
}

#[test]
fn dropping_the_controller_cancels_its_timer() {
    let mut scheduler = ManualScheduler::new();
    {
        let mut c =
            PlaybackBuilder::new(generate("ab", "cd"), &mut scheduler, MemorySettings::new())
                .build();
        c.toggle_play();
        assert!(c.armed_timer().is_some());
    }
    assert_eq!(scheduler.pending(), 0);
    assert_eq!(scheduler.history().len(), 1);
}

#[test]
fn failing_store_never_disturbs_playback() {
    let mut c = PlaybackBuilder::new(generate("ab", "cd"), ManualScheduler::new(), BrokenStore).build();
    assert_eq!(c.speed(), 1.0);
    assert_eq!(c.preferences().language, Language::Java);
    assert_eq!(c.set_speed(2.0), 2.0);
    c.set_language(Language::Python);
    assert_eq!(c.preferences().language, Language::Python);
    c.toggle_play();
    assert_eq!(c.scheduler().next_delay(), Some(Duration::from_millis(500)));
    assert!(matches!(fire(&mut c), Some(TickOutcome::Advanced { index: 1 })));
}

#[test]
fn speed_bounds_and_rejections() {
    let mut c =
        PlaybackBuilder::new(generate("a", "b"), ManualScheduler::new(), MemorySettings::new()).build();
    assert_eq!(c.set_speed(10.0), 3.0);
    assert_eq!(c.set_speed(0.1), 0.5);
    assert_eq!(c.set_speed(f64::NAN), 0.5);
    assert_eq!(c.set_speed(-1.0), 0.5);
    assert_eq!(
        c.store().get(PLAYBACK_SPEED_KEY, 1.0.into()).unwrap(),
        SettingValue::Number(0.5)
    );
}

#[test]
fn preferences_survive_a_restart_through_the_json_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");

    {
        let mut c = PlaybackBuilder::new(
            generate("a", "b"),
            ManualScheduler::new(),
            JsonFileSettings::new(&path),
        )
        .build();
        c.set_speed(2.5);
        c.set_language(Language::Golang);
    }

    let store = JsonFileSettings::new(&path);
    assert_eq!(
        store.get(CODE_LANGUAGE_KEY, "java".into()).unwrap(),
        SettingValue::Text("golang".into())
    );
    let c = PlaybackBuilder::new(generate("a", "b"), ManualScheduler::new(), store).build();
    assert_eq!(c.speed(), 2.5);
    assert_eq!(c.preferences().language, Language::Golang);
}

#[test]
fn corrupted_settings_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(&path, "{ not json").unwrap();
    let mut c = PlaybackBuilder::new(
        generate("a", "b"),
        ManualScheduler::new(),
        JsonFileSettings::new(&path),
    )
    .build();
    assert_eq!(c.speed(), 1.0);
    assert_eq!(c.preferences().language, Language::Java);

    // The next save rewrites the file, so the following start restores it.
    c.set_speed(2.0);
    drop(c);
    let c = PlaybackBuilder::new(
        generate("a", "b"),
        ManualScheduler::new(),
        JsonFileSettings::new(&path),
    )
    .build();
    assert_eq!(c.speed(), 2.0);
}

#[test]
fn keyboard_is_ignored_while_typing() {
    let mut session = Session::new(ManualScheduler::new(), MemorySettings::new());
    let c = session.playback_mut();
    assert_eq!(c.handle_key(Key::Space, InputFocus::TextInput), None);
    assert!(!c.is_playing());
    c.handle_key(Key::Right, InputFocus::Canvas);
    c.handle_key(Key::Right, InputFocus::Canvas);
    assert_eq!(session.frame().index, 2);
    session.playback_mut().handle_key(Key::Left, InputFocus::Canvas);
    assert_eq!(session.frame().index, 1);
}

#[test]
fn custom_scheduler_sees_one_timer_at_a_time() {
    #[derive(Default)]
    struct Counting {
        next: u64,
        live: Vec<TimerId>,
        max_live: usize,
    }

    impl Scheduler for Counting {
        fn schedule(&mut self, _delay: Duration) -> TimerId {
            self.next += 1;
            self.live.push(TimerId(self.next));
            self.max_live = self.max_live.max(self.live.len());
            TimerId(self.next)
        }

        fn cancel(&mut self, id: TimerId) {
            self.live.retain(|&t| t != id);
        }
    }

    let mut c =
        PlaybackBuilder::new(generate("abc", "xyz"), Counting::default(), MemorySettings::new())
            .build();
    for _ in 0..5 {
        if c.is_playing() {
            c.toggle_play();
        }
        c.toggle_play();
        c.toggle_play();
        c.toggle_play();
        let id = *c.scheduler().live.last().unwrap();
        c.scheduler_mut().live.retain(|&t| t != id);
        c.tick(id);
    }
    assert_eq!(c.scheduler().max_live, 1);
}
