use ed_trace::step::{CellState, HighlightRole, Operation};
use ed_trace::{generate, CellRef};

fn path_ops(word1: &str, word2: &str) -> Vec<(Operation, Option<char>, Option<char>)> {
    generate(word1, word2)
        .edit_path()
        .into_iter()
        .filter(|p| p.operation != Operation::Match)
        .map(|p| (p.operation, p.left, p.right))
        .collect()
}

#[test]
fn horse_to_ros() {
    let trace = generate("horse", "ros");
    assert_eq!(trace.len(), 39);
    assert_eq!(trace.distance(), 3);

    let last = trace.final_step().unwrap();
    let expected = [
        [0, 1, 2, 3],
        [1, 1, 2, 3],
        [2, 2, 1, 2],
        [3, 2, 2, 2],
        [4, 3, 3, 2],
        [5, 4, 4, 3],
    ];
    for (i, row) in expected.iter().enumerate() {
        for (j, &v) in row.iter().enumerate() {
            assert_eq!(last.value(CellRef::new(i, j)), Some(v), "dp[{i}][{j}]");
        }
    }
    assert_eq!(
        path_ops("horse", "ros"),
        vec![
            (Operation::Replace, Some('h'), Some('r')),
            (Operation::Delete, Some('r'), None),
            (Operation::Delete, Some('e'), None),
        ]
    );
}

#[test]
fn intention_to_execution() {
    let trace = generate("intention", "execution");
    assert_eq!(trace.len(), 1 + 9 + 9 + 2 * 81);
    assert_eq!(trace.distance(), 5);
}

#[test]
fn empty_to_abc_is_three_inserts() {
    let trace = generate("", "abc");
    assert_eq!(trace.len(), 4);
    assert_eq!(trace.distance(), 3);
    for (j, step) in trace.iter().skip(1).enumerate() {
        assert_eq!(step.operation, Some(Operation::Insert));
        assert_eq!(step.cell, Some(CellRef::new(0, j + 1)));
    }
    let last = trace.final_step().unwrap();
    assert_eq!(last.cell_states.get(CellRef::new(0, 3)), Some(&CellState::Final));
    assert!(last.narrative.summary.contains("is 3"));
}

#[test]
fn identical_words_match_along_the_diagonal() {
    let trace = generate("same", "same");
    assert_eq!(trace.distance(), 0);
    let diagonal: Vec<_> = trace
        .iter()
        .filter(|s| matches!(s.cell, Some(c) if c.row == c.col && c.row > 0))
        .filter_map(|s| s.operation)
        .collect();
    assert_eq!(diagonal, vec![Operation::Match; 4]);
    assert!(path_ops("same", "same").is_empty());
}

#[test]
fn abc_to_adc_is_one_replace() {
    assert_eq!(
        path_ops("abc", "adc"),
        vec![(Operation::Replace, Some('b'), Some('d'))]
    );
}

#[test]
fn compare_step_highlights_three_sources() {
    let trace = generate("ab", "cd");
    // bootstrap, two row fills, two column fills, then compare at (1,1)
    let compare = trace.get(5).unwrap();
    assert_eq!(compare.cell, Some(CellRef::new(1, 1)));
    assert_eq!(compare.highlight(CellRef::new(1, 1)), Some(HighlightRole::Current));
    for source in [(0, 0), (0, 1), (1, 0)] {
        let cell = CellRef::from(source);
        assert_eq!(compare.highlight(cell), Some(HighlightRole::Compare));
        assert_eq!(compare.display_state(cell), CellState::Comparing);
        assert_eq!(compare.cell_states.get(cell), Some(&CellState::Result));
    }
    assert_eq!(
        compare.cell_states.get(CellRef::new(1, 1)),
        Some(&CellState::Computing)
    );
    assert_eq!(compare.value(CellRef::new(1, 1)), None);
}

#[test]
fn steps_serialize_with_lowercase_tags() {
    let trace = generate("a", "b");
    let json = serde_json::to_value(trace.final_step().unwrap()).unwrap();
    assert_eq!(json["operation"], "replace");
    assert_eq!(json["choice"]["selected"], "replace");
    let states = json["cell_states"]["cells"].as_array().unwrap();
    assert!(states.iter().any(|s| s == "final"));
}
