//! Example: autoplay a trace on a real clock.
//!
//! Run with:
//! `RUST_LOG=ed_trace=debug cargo run --example playback -- intention execution 3.0`

use std::thread;
use std::time::Instant;

use ed_trace::scheduler::DeadlineScheduler;
use ed_trace::settings::MemorySettings;
use ed_trace::{Session, TickOutcome};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let word1 = args.next().unwrap_or_else(|| "horse".to_string());
    let word2 = args.next().unwrap_or_else(|| "ros".to_string());
    let speed: f64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(3.0);

    let mut session = Session::new(DeadlineScheduler::new(), MemorySettings::new());
    if let Err(err) = session.apply_input(&word1, &word2) {
        eprintln!("invalid input: {err}");
        std::process::exit(2);
    }

    let playback = session.playback_mut();
    playback.set_speed(speed);
    playback.toggle_play();

    let started = Instant::now();
    loop {
        let Some(deadline) = session.playback_mut().scheduler_mut().next_deadline() else {
            break;
        };
        let now = Instant::now();
        if deadline > now {
            thread::sleep(deadline - now);
        }
        let due = session
            .playback_mut()
            .scheduler_mut()
            .drain_due(Instant::now());
        for id in due {
            let outcome = session.playback_mut().tick(id);
            let frame = session.frame();
            println!(
                "[{:>6.2}s] {:>3}/{} {}",
                started.elapsed().as_secs_f64(),
                frame.index + 1,
                frame.total,
                frame.step.narrative.summary
            );
            if matches!(outcome, TickOutcome::Finished { .. }) {
                println!("done: distance {}", session.playback().trace().distance());
            }
        }
    }
}
