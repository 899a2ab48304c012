use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use ed_trace::{generate, scheduler::ManualScheduler, settings::MemorySettings, PlaybackBuilder};
use rand::{rngs::StdRng, Rng, SeedableRng};
use sysinfo::{get_current_pid, ProcessRefreshKind, System};

fn random_word(rng: &mut StdRng, len: usize) -> String {
    const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
    (0..len)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}

fn rss_kib() -> u64 {
    let mut sys = System::new();
    sys.refresh_processes_specifics(ProcessRefreshKind::new());
    get_current_pid()
        .ok()
        .and_then(|pid| sys.process(pid))
        .map(|p| p.memory() / 1024)
        .unwrap_or(0)
}

fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("trace_generate");
    for &len in &[8usize, 16, 32] {
        group.bench_function(format!("square_{len}"), |b| {
            b.iter_batched(
                || {
                    let mut rng = StdRng::seed_from_u64(42);
                    (random_word(&mut rng, len), random_word(&mut rng, len))
                },
                |(s, t)| {
                    let before = rss_kib();
                    let trace = generate(&s, &t);
                    let after = rss_kib();
                    black_box(trace.distance());
                    // stderr keeps criterion's report clean
                    eprintln!(
                        "RSS KiB delta (trace {len}x{len}, {} steps): {}",
                        trace.len(),
                        after.saturating_sub(before)
                    );
                },
                BatchSize::PerIteration,
            )
        });
    }
    group.finish();
}

fn bench_scrub(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(7);
    let trace = generate(&random_word(&mut rng, 24), &random_word(&mut rng, 24));
    let total = trace.len() as i64;
    let mut playback =
        PlaybackBuilder::new(trace, ManualScheduler::new(), MemorySettings::new()).build();

    c.bench_function("scrub_full_trace", |b| {
        b.iter(|| {
            for i in 0..total {
                playback.go_to(i);
                black_box(playback.current_step().id);
            }
        })
    });
}

criterion_group!(benches, bench_generate, bench_scrub);
criterion_main!(benches);
