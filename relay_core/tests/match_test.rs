use proptest::prelude::*;
use relay_core::input::events::{InputEvent, Key};
use relay_core::{GameConfig, GameEvent, Match, Mode, Role, TurnPrompt};
use relay_schema::{Lane, Millis, PlayerId};

// Travel time 1000ms; notes are missed once more than 180ms late.
fn instant_config() -> GameConfig {
    GameConfig {
        note_speed: 0.5,
        hit_line_y: 500.0,
        miss_margin_px: 90.0,
        view_height: 700.0,
        preroll_ms: 0,
        handoff_delay_ms: 0,
        ..GameConfig::versus()
    }
}

fn versus_config() -> GameConfig {
    GameConfig {
        preroll_ms: 2000,
        handoff_delay_ms: 2000,
        ..instant_config()
    }
}

fn lane(i: usize) -> Lane {
    Lane::new(i).unwrap()
}

/// Records one note, sends it, and lets the other player miss it. Returns the
/// time after the cycle and who recorded / played.
fn run_cycle(m: &mut Match, t0: Millis) -> (Millis, PlayerId, PlayerId) {
    let recorder = m.current_turn();
    assert!(m.start_recording(t0));
    assert!(m.key_down(lane(0), t0 + 1200));
    assert!(m.stop_recording());
    assert!(m.send_notes());

    let player = m.current_turn();
    assert_eq!(m.role(), Role::Play);
    assert!(m.start_playback(t0 + 2000));
    m.advance(t0 + 2000 + 1381);
    assert!(m.shared_take().is_none(), "hand-off clears the take");
    (t0 + 5000, recorder, player)
}

#[test]
fn initial_state_prompts_player1_to_record() {
    let m = Match::new(versus_config());
    assert_eq!(m.current_turn(), PlayerId::Player1);
    assert_eq!(m.round(), 1);
    assert_eq!(m.role(), Role::Record);
    assert_eq!(m.prompt().to_string(), "Round 1 - Player 1's turn to record!");
}

#[test]
fn invalid_calls_are_no_ops() {
    let mut m = Match::new(versus_config());
    assert!(!m.stop_recording());
    assert!(!m.send_notes(), "nothing recorded");
    assert!(!m.start_playback(0), "nothing to play");
    assert!(!m.key_down(lane(0), 0));

    m.start_recording(0);
    m.key_down(lane(0), 500);
    m.stop_recording();
    assert!(!m.send_notes(), "only grace-period presses");
    assert_eq!(m.current_turn(), PlayerId::Player1);
}

#[test]
fn cannot_send_while_recording() {
    let mut m = Match::new(versus_config());
    m.start_recording(0);
    m.key_down(lane(1), 1500);
    assert!(!m.send_notes());
    assert_eq!(m.current_session().mode(), Mode::Recording);
}

#[test]
fn old_take_cannot_be_sent_again() {
    let mut m = Match::new(instant_config());
    let (t, _, _) = run_cycle(&mut m, 0);
    let (_, _, _) = run_cycle(&mut m, t);

    // Player 1 has the Record role back and still shows last round's take.
    assert_eq!(m.current_turn(), PlayerId::Player1);
    assert_eq!(m.role(), Role::Record);
    assert_eq!(m.session(PlayerId::Player1).recorded().len(), 1);
    assert!(!m.session(PlayerId::Player1).has_unsent_take());

    assert!(!m.send_notes());
    assert!(m.shared_take().is_none());
    assert_eq!(m.current_turn(), PlayerId::Player1);
}

#[test]
fn take_is_sent_only_once() {
    let mut m = Match::new(versus_config());
    m.start_recording(0);
    m.key_down(lane(0), 1200);
    m.stop_recording();
    assert!(m.session(PlayerId::Player1).has_unsent_take());
    assert!(m.send_notes());
    assert!(!m.session(PlayerId::Player1).has_unsent_take());
    assert!(!m.send_notes(), "player 2 must play first");
}

#[test]
fn huge_time_limit_does_not_overflow() {
    let mut m = Match::new(GameConfig {
        recording_time_limit_s: Some(u64::MAX / 100),
        ..instant_config()
    });
    assert!(m.start_recording(0));
    assert_eq!(m.recording_time_remaining(0), Some(u64::MAX));
    m.advance(1_000_000);
    assert_eq!(m.current_session().mode(), Mode::Recording);
}

#[test]
fn huge_preroll_keeps_counting_down() {
    let mut m = Match::new(GameConfig {
        preroll_ms: u64::MAX,
        ..instant_config()
    });
    m.start_recording(0);
    m.key_down(lane(0), 1200);
    m.stop_recording();
    m.send_notes();
    m.drain_events();

    assert!(m.start_playback(5_000));
    assert_eq!(
        m.drain_events(),
        vec![GameEvent::CountdownStarted {
            player: PlayerId::Player2,
            until_ms: u64::MAX
        }]
    );
    m.advance(1_000_000);
    assert!(m.current_session().is_counting_down());
}

#[test]
fn huge_handoff_delay_stays_pending() {
    let mut m = Match::new(GameConfig {
        handoff_delay_ms: u64::MAX,
        ..instant_config()
    });
    m.start_recording(0);
    m.key_down(lane(0), 1200);
    m.stop_recording();
    m.send_notes();
    m.start_playback(2000);
    m.advance(3381);
    assert!(m.is_handoff_pending());
    m.advance(1_000_000);
    assert!(m.is_handoff_pending());
    assert_eq!(m.current_turn(), PlayerId::Player2);
}

#[test]
fn send_hands_take_to_other_player() {
    let mut m = Match::new(versus_config());
    m.start_recording(0);
    m.key_down(lane(1), 1500);
    m.key_down(lane(3), 1800);
    m.stop_recording();
    m.drain_events();

    assert!(m.send_notes());
    let take = m.shared_take().expect("published");
    assert_eq!(take.recorded_by, PlayerId::Player1);
    assert_eq!(take.notes.len(), 2);

    assert_eq!(m.current_turn(), PlayerId::Player2);
    assert_eq!(m.round(), 1);
    assert_eq!(m.prompt().to_string(), "Round 1 - Player 2's turn to play!");
    assert_eq!(m.session(PlayerId::Player2).playback_notes().len(), 2);
    assert_eq!(m.session(PlayerId::Player2).tracker().total_notes(), 2);
    assert!(!m.start_recording(0), "player 2 must play first");

    assert_eq!(
        m.drain_events(),
        vec![
            GameEvent::NotesSent {
                from: PlayerId::Player1,
                notes: 2
            },
            GameEvent::TurnChanged {
                turn: PlayerId::Player2,
                round: 1
            },
        ]
    );
}

#[test]
fn full_round_with_countdown_and_handoff() {
    let mut m = Match::new(versus_config());
    m.start_recording(0);
    m.key_down(lane(2), 1200);
    m.key_down(lane(2), 1700);
    m.stop_recording();
    m.send_notes();
    m.drain_events();

    // Player 2 asks to play at 10s; the chart starts at 12s.
    assert!(m.start_playback(10_000));
    assert_eq!(m.current_session().mode(), Mode::Idle);
    assert!(m.current_session().is_counting_down());
    assert_eq!(m.prompt(), TurnPrompt::Busy);
    assert!(!m.start_playback(10_500), "already counting down");

    // Presses during the countdown are not judged.
    assert!(!m.key_down(lane(2), 11_000));

    m.advance(12_000);
    assert_eq!(m.current_session().mode(), Mode::Playback);

    assert!(m.key_down(lane(2), 13_230));
    m.advance(13_300);
    m.advance(13_881);

    let p2 = m.session(PlayerId::Player2);
    assert_eq!(p2.mode(), Mode::Idle);
    assert_eq!(p2.tracker().hits(), 1);
    assert_eq!(p2.tracker().misses(), 1);
    assert_eq!(p2.tracker().health(), 50.0);
    assert_eq!(
        p2.summary().to_string(),
        "Score: 110 | Accuracy: 50.0% | Max Combo: 1 | Health: 50%"
    );

    // Hand-off is pending for two seconds.
    assert!(m.is_handoff_pending());
    assert_eq!(m.prompt(), TurnPrompt::Busy);
    assert!(!m.start_recording(14_000));
    assert!(!m.start_playback(14_000));
    m.advance(15_880);
    assert!(m.is_handoff_pending());
    m.advance(15_881);
    assert!(!m.is_handoff_pending());

    assert_eq!(m.current_turn(), PlayerId::Player2);
    assert_eq!(m.role(), Role::Record);
    assert_eq!(m.round(), 1);
    assert_eq!(m.prompt().to_string(), "Round 1 - Player 2's turn to record!");

    let events = m.drain_events();
    assert_eq!(
        events.first(),
        Some(&GameEvent::CountdownStarted {
            player: PlayerId::Player2,
            until_ms: 12_000
        })
    );
    assert!(events.contains(&GameEvent::PlaybackStarted {
        player: PlayerId::Player2,
        notes: 2
    }));
    assert_eq!(
        events.last(),
        Some(&GameEvent::TurnChanged {
            turn: PlayerId::Player2,
            round: 1
        })
    );
}

#[test]
fn round_advances_when_player1_gets_the_turn_back() {
    let mut m = Match::new(instant_config());
    let (t, r1, p1) = run_cycle(&mut m, 0);
    assert_eq!((r1, p1), (PlayerId::Player1, PlayerId::Player2));
    assert_eq!(m.round(), 1);

    let (_, r2, p2) = run_cycle(&mut m, t);
    assert_eq!((r2, p2), (PlayerId::Player2, PlayerId::Player1));
    assert_eq!(m.current_turn(), PlayerId::Player1);
    assert_eq!(m.round(), 2);
}

#[test]
fn reset_during_countdown_discards_pending_start() {
    let mut m = Match::new(versus_config());
    m.start_recording(0);
    m.key_down(lane(0), 1200);
    m.stop_recording();
    m.send_notes();
    m.start_playback(10_000);

    m.reset();
    assert_eq!(m.drain_events(), vec![GameEvent::MatchReset]);

    m.advance(12_500);
    assert_eq!(m.current_session().mode(), Mode::Idle);
    assert!(!m.current_session().is_counting_down());
    assert!(m.drain_events().is_empty());

    // A fresh recording right after the reset is unaffected.
    assert!(m.start_recording(12_600));
    m.advance(13_000);
    assert_eq!(m.current_session().mode(), Mode::Recording);
    assert_eq!(m.current_turn(), PlayerId::Player1);
    assert_eq!(m.round(), 1);
}

#[test]
fn reset_during_handoff_cancels_turn_switch() {
    let mut m = Match::new(GameConfig {
        handoff_delay_ms: 2000,
        ..instant_config()
    });
    m.start_recording(0);
    m.key_down(lane(0), 1200);
    m.stop_recording();
    m.send_notes();
    m.start_playback(2000);
    m.advance(3381);
    assert!(m.is_handoff_pending());

    m.reset();
    m.advance(6000);
    assert_eq!(m.current_turn(), PlayerId::Player1);
    assert_eq!(m.round(), 1);
    assert!(m.shared_take().is_none());
}

#[test]
fn recording_stops_at_time_limit() {
    let mut m = Match::new(versus_config());
    m.start_recording(1_000);
    assert_eq!(m.recording_time_remaining(1_000), Some(10_000));
    assert!(!m.timer_warning(7_999));
    assert!(m.timer_warning(8_000));

    m.advance(10_999);
    assert_eq!(m.current_session().mode(), Mode::Recording);
    m.advance(11_000);
    assert_eq!(m.current_session().mode(), Mode::Idle);
    assert_eq!(m.recording_time_remaining(11_000), None);

    let events = m.drain_events();
    assert!(events.contains(&GameEvent::RecordingStopped {
        player: PlayerId::Player1,
        notes: 0,
        timed_out: true
    }));
}

#[test]
fn keyboard_drives_a_whole_turn() {
    let mut m = Match::new(instant_config());
    assert!(m.handle_input(&InputEvent::down(Key::Space, 0)));
    assert_eq!(m.current_session().mode(), Mode::Recording);

    assert!(m.handle_input(&InputEvent::down(Key::D, 1200)));
    assert!(m.is_lane_held(lane(2)));
    assert!(!m.handle_input(&InputEvent::up(Key::D, 1250)));
    assert!(!m.is_lane_held(lane(2)));

    assert!(m.handle_input(&InputEvent::down(Key::Space, 1500)));
    assert_eq!(m.current_session().mode(), Mode::Idle);

    assert!(m.handle_input(&InputEvent::down(Key::Enter, 1600)));
    assert_eq!(m.current_turn(), PlayerId::Player2);

    assert!(m.handle_input(&InputEvent::down(Key::Space, 2000)));
    assert_eq!(m.current_session().mode(), Mode::Playback);
    assert!(!m.handle_input(&InputEvent::down(Key::Space, 2100)), "space ignored during playback");
    assert!(!m.handle_input(&InputEvent::down(Key::Escape, 2100)));

    assert!(m.handle_input(&InputEvent::down(Key::D, 3200)));
    m.advance(3201);
    assert_eq!(m.current_turn(), PlayerId::Player2);
    assert_eq!(m.role(), Role::Record);
}

#[test]
fn positions_follow_current_player() {
    let mut m = Match::new(instant_config());
    m.start_recording(0);
    m.key_down(lane(1), 1200);
    m.stop_recording();
    m.send_notes();
    m.start_playback(5_000);

    let frame = m.positions(6_000);
    assert_eq!(frame.len(), 1);
    assert_eq!(frame[0].lane, lane(1));
    assert_eq!(frame[0].y, 400.0);
}

proptest! {
    #[test]
    fn turn_and_round_follow_cycle_count(n in 0usize..8) {
        let mut m = Match::new(instant_config());
        let mut t = 0;
        let mut prev_player = None;
        for _ in 0..n {
            let (next, recorder, player) = run_cycle(&mut m, t);
            prop_assert_ne!(recorder, player);
            if let Some(prev) = prev_player {
                prop_assert_eq!(recorder, prev);
            }
            prev_player = Some(player);
            t = next;
        }
        let expected_turn = if n % 2 == 0 { PlayerId::Player1 } else { PlayerId::Player2 };
        prop_assert_eq!(m.current_turn(), expected_turn);
        prop_assert_eq!(m.round() as usize, 1 + n / 2);
    }

    #[test]
    fn accuracy_stays_in_bounds(
        presses in proptest::collection::vec((0usize..4, 900u64..3000), 0..12),
    ) {
        let mut m = Match::new(instant_config());
        m.start_recording(0);
        for lane_idx in 0..4 {
            m.key_down(lane(lane_idx), 1000 + 400 * lane_idx as u64);
        }
        m.stop_recording();
        m.send_notes();
        m.start_playback(10_000);

        let mut max_seen = 0;
        let mut sorted = presses.clone();
        sorted.sort_by_key(|&(_, at)| at);
        for (l, at) in sorted {
            m.advance(10_000 + at);
            m.key_down(lane(l), 10_000 + at);
            let tracker = m.session(PlayerId::Player2).tracker();
            let acc = tracker.accuracy();
            prop_assert!((0.0..=100.0).contains(&acc));
            prop_assert!(tracker.max_combo() >= max_seen);
            max_seen = tracker.max_combo();
        }
        m.advance(20_000);
        let tracker = m.session(PlayerId::Player2).tracker();
        prop_assert_eq!(tracker.hits() + tracker.misses(), 4);
        prop_assert!((0.0..=100.0).contains(&tracker.accuracy()));
    }
}
