use std::env;
use std::time::Instant;

use ed_trace::utils::expected_step_count;
use ed_trace::{generate, Trace};
use serde::Serialize;
use sysinfo::{get_current_pid, ProcessRefreshKind, System};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let options = match Options::parse(env::args().skip(1)) {
        Ok(opts) => opts,
        Err(err) => {
            eprintln!("trace_probe: {err}");
            Options::print_help();
            std::process::exit(2);
        }
    };

    eprintln!("\n{}", "=".repeat(72));
    eprintln!("Edit-distance trace probe");
    eprintln!("{}", "=".repeat(72));
    eprintln!("Every step stores a full table snapshot, so memory grows with");
    eprintln!("steps x cells. Sizes run up to {} characters per word.", options.max_len);
    eprintln!();

    let mut sys = System::new();
    let mut measurements = Vec::new();

    let sizes: Vec<usize> = SIZES
        .iter()
        .copied()
        .filter(|&n| n <= options.max_len)
        .collect();
    let total = sizes.len() * 2;

    eprintln!("[1/2] Square inputs (shifted alphabet)...");
    for (idx, &len) in sizes.iter().enumerate() {
        eprint!("      [{}/{}] n1={len} n2={len}... ", idx + 1, total);
        let a = deterministic_word(len, 0);
        let b = deterministic_word(len, 1);
        let m = measure("square", &a, &b, &options, &mut sys);
        report(&m);
        measurements.push(m);
    }

    eprintln!("[2/2] Skewed inputs (n2 = n1 / 4)...");
    for (idx, &len) in sizes.iter().enumerate() {
        eprint!("      [{}/{}] n1={len} n2={}... ", sizes.len() + idx + 1, total, len / 4);
        let a = deterministic_word(len, 0);
        let b = deterministic_word(len / 4, 3);
        let m = measure("skewed", &a, &b, &options, &mut sys);
        report(&m);
        measurements.push(m);
    }

    let failed = measurements
        .iter()
        .filter(|m| m.status == Status::Failed)
        .count();
    eprintln!();
    if failed == 0 {
        eprintln!("All verified traces match the full-table baseline.");
    } else {
        eprintln!("{failed} trace(s) disagree with the baseline.");
    }
    eprintln!();

    if let Err(err) = options.format.write(&measurements) {
        eprintln!("trace_probe output error: {err}");
        std::process::exit(1);
    }
    if failed > 0 {
        std::process::exit(1);
    }
}

const SIZES: &[usize] = &[4, 8, 16, 24, 32, 48, 64];

struct Options {
    format: OutputFormat,
    verify_limit: usize,
    max_len: usize,
}

impl Options {
    fn parse<I, T>(mut args: I) -> Result<Self, String>
    where
        I: Iterator<Item = T>,
        T: Into<String>,
    {
        let mut format = OutputFormat::Csv;
        let mut verify_limit = 32usize;
        let mut max_len = 48usize;

        while let Some(arg) = args.next() {
            let arg = arg.into();
            let (flag, inline) = match arg.split_once('=') {
                Some((flag, value)) => (flag.to_string(), Some(value.to_string())),
                None => (arg, None),
            };
            let mut value = |name: &str| -> Result<String, String> {
                match inline.clone() {
                    Some(v) => Ok(v),
                    None => args
                        .next()
                        .map(Into::into)
                        .ok_or_else(|| format!("missing value after {name}")),
                }
            };
            match flag.as_str() {
                "-h" | "--help" => {
                    Options::print_help();
                    std::process::exit(0);
                }
                "--format" => format = OutputFormat::from_str(&value("--format")?)?,
                "--verify-limit" => {
                    verify_limit = value("--verify-limit")?
                        .parse()
                        .map_err(|_| "verify limit must be a non-negative integer".to_string())?;
                }
                "--max-len" => {
                    max_len = value("--max-len")?
                        .parse()
                        .map_err(|_| "max length must be a non-negative integer".to_string())?;
                }
                other => return Err(format!("unrecognized argument '{other}'")),
            }
        }

        Ok(Self {
            format,
            verify_limit,
            max_len,
        })
    }

    fn print_help() {
        println!(
            "\
Usage: cargo run --features probe --bin trace_probe [-- <options>]

Options:
  --format <csv|table|json>     Output format (default: csv)
  --verify-limit <N>            Longest word checked against the baseline DP (default: 32)
  --max-len <N>                 Longest word generated (default: 48)
  -h, --help                    Print this help message
"
        );
    }
}

#[derive(Copy, Clone)]
enum OutputFormat {
    Csv,
    Table,
    Json,
}

impl OutputFormat {
    fn from_str(value: &str) -> Result<Self, String> {
        match value {
            "csv" => Ok(Self::Csv),
            "table" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown format '{other}'")),
        }
    }

    fn write(self, measurements: &[Measurement]) -> Result<(), String> {
        match self {
            OutputFormat::Csv => {
                write_csv(measurements);
                Ok(())
            }
            OutputFormat::Table => {
                write_table(measurements);
                Ok(())
            }
            OutputFormat::Json => serde_json::to_string_pretty(measurements)
                .map(|json| println!("{json}"))
                .map_err(|err| err.to_string()),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum Status {
    NotChecked,
    Passed,
    Failed,
}

impl Status {
    fn label(self) -> &'static str {
        match self {
            Status::NotChecked => "not_checked",
            Status::Passed => "passed",
            Status::Failed => "failed",
        }
    }

    fn icon(self) -> &'static str {
        match self {
            Status::Passed => "✓",
            Status::Failed => "✗",
            Status::NotChecked => "○",
        }
    }
}

#[derive(Clone, Serialize)]
struct Measurement {
    scenario: &'static str,
    n1: usize,
    n2: usize,
    steps: usize,
    distance: u32,
    wall_s: f64,
    rss_delta_kib: u64,
    status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
}

fn measure(
    scenario: &'static str,
    a: &str,
    b: &str,
    options: &Options,
    sys: &mut System,
) -> Measurement {
    let before = rss_kib(sys);
    let start = Instant::now();
    let trace = generate(a, b);
    let wall_s = start.elapsed().as_secs_f64();
    let after = rss_kib(sys);

    let (status, detail) = verify(&trace, a, b, options.verify_limit);
    Measurement {
        scenario,
        n1: a.len(),
        n2: b.len(),
        steps: trace.len(),
        distance: trace.distance(),
        wall_s,
        rss_delta_kib: after.saturating_sub(before),
        status,
        detail,
    }
}

fn verify(trace: &Trace, a: &str, b: &str, limit: usize) -> (Status, Option<String>) {
    let expected_steps = expected_step_count(a.len(), b.len());
    if trace.len() != expected_steps {
        return (
            Status::Failed,
            Some(format!("expected {expected_steps} steps, got {}", trace.len())),
        );
    }
    if a.len().max(b.len()) > limit {
        return (Status::NotChecked, None);
    }
    let baseline = full_edit_distance(a.as_bytes(), b.as_bytes());
    if baseline == trace.distance() {
        (Status::Passed, None)
    } else {
        (
            Status::Failed,
            Some(format!("expected {baseline}, got {}", trace.distance())),
        )
    }
}

fn report(m: &Measurement) {
    eprintln!(
        "{} steps={}, distance={}, time={:.3}s, rss_delta={} KiB, status={}",
        m.status.icon(),
        m.steps,
        m.distance,
        m.wall_s,
        m.rss_delta_kib,
        m.status.label()
    );
}

fn write_csv(measurements: &[Measurement]) {
    println!("scenario,n1,n2,steps,distance,wall_s,rss_delta_kib,status,detail");
    for m in measurements {
        let detail = m
            .detail
            .as_ref()
            .map(|s| s.replace('"', "'"))
            .unwrap_or_default();
        println!(
            "{},{},{},{},{},{:.3},{},{},\"{}\"",
            m.scenario,
            m.n1,
            m.n2,
            m.steps,
            m.distance,
            m.wall_s,
            m.rss_delta_kib,
            m.status.label(),
            detail
        );
    }
}

fn write_table(measurements: &[Measurement]) {
    println!(
        "{:<8}  {:>4}  {:>4}  {:>8}  {:>8}  {:>10}  {:>14}  {:>12}",
        "scenario", "n1", "n2", "steps", "distance", "wall_s", "rss_delta_kib", "status"
    );
    println!("{}", "-".repeat(84));
    for m in measurements {
        println!(
            "{:<8}  {:>4}  {:>4}  {:>8}  {:>8}  {:>10.3}  {:>14}  {:>12}",
            m.scenario,
            m.n1,
            m.n2,
            m.steps,
            m.distance,
            m.wall_s,
            m.rss_delta_kib,
            m.status.label()
        );
    }
}

fn rss_kib(sys: &mut System) -> u64 {
    sys.refresh_processes_specifics(ProcessRefreshKind::new());
    get_current_pid()
        .ok()
        .and_then(|pid| sys.process(pid))
        .map(|process| process.memory() / 1024)
        .unwrap_or(0)
}

fn deterministic_word(len: usize, offset: usize) -> String {
    const ALPHABET: &[u8] = b"abcdefgh";
    (0..len)
        .map(|i| ALPHABET[(i * 3 + offset) % ALPHABET.len()] as char)
        .collect()
}

fn full_edit_distance(s: &[u8], t: &[u8]) -> u32 {
    let (n, m) = (s.len(), t.len());
    let mut dp = vec![vec![0u32; m + 1]; n + 1];
    for (i, row) in dp.iter_mut().enumerate() {
        row[0] = i as u32;
    }
    for j in 0..=m {
        dp[0][j] = j as u32;
    }
    for i in 1..=n {
        for j in 1..=m {
            dp[i][j] = if s[i - 1] == t[j - 1] {
                dp[i - 1][j - 1]
            } else {
                1 + dp[i - 1][j - 1].min(dp[i - 1][j]).min(dp[i][j - 1])
            };
        }
    }
    dp[n][m]
}
