//! Example: print every step of one trace, then the edit script.
//!
//! Run with:
//! `cargo run --example trace -- horse ros`

use ed_trace::step::Operation;
use ed_trace::{generate, CellRef, Step};

fn main() {
    let mut args = std::env::args().skip(1);
    let word1 = args.next().unwrap_or_else(|| "horse".to_string());
    let word2 = args.next().unwrap_or_else(|| "ros".to_string());

    let trace = generate(&word1, &word2);
    for step in &trace {
        println!(
            "#{:<4} ({:>2},{:>2}) {:<8} {}",
            step.id,
            step.row(),
            step.col(),
            step.operation.map(Operation::label).unwrap_or("-"),
            step.narrative.summary
        );
    }

    if let Some(last) = trace.final_step() {
        println!();
        print_table(last, &word1, &word2);
    }

    println!();
    println!("Edit distance: {}", trace.distance());
    for link in trace.edit_path() {
        if link.operation == Operation::Match {
            continue;
        }
        println!(
            "  {:<8} at ({}, {}): {} -> {}",
            link.operation.label(),
            link.cell.row,
            link.cell.col,
            link.left.map(String::from).unwrap_or_else(|| "_".into()),
            link.right.map(String::from).unwrap_or_else(|| "_".into()),
        );
    }
}

fn print_table(step: &Step, word1: &str, word2: &str) {
    print!("      ε");
    for c in word2.chars() {
        print!("  {c}");
    }
    println!();
    let left: Vec<char> = std::iter::once('ε').chain(word1.chars()).collect();
    for (row, label) in left.iter().enumerate() {
        print!("  {label} ");
        for col in 0..=word2.chars().count() {
            match step.value(CellRef::new(row, col)) {
                Some(v) => print!("{v:>3}"),
                None => print!("  ·"),
            }
        }
        println!();
    }
}
