use ed_trace::step::{CellState, EditOp, Operation};
use ed_trace::utils::expected_step_count;
use ed_trace::{generate, CellRef};
use proptest::prelude::*;

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

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn step_count_matches_formula(a in "[a-z]{0,8}", b in "[a-z]{0,8}") {
        let trace = generate(&a, &b);
        prop_assert_eq!(trace.len(), expected_step_count(a.len(), b.len()));
        for (idx, step) in trace.iter().enumerate() {
            prop_assert_eq!(step.id, idx);
        }
    }

    #[test]
    fn distance_matches_full_table(a in "[a-e]{0,8}", b in "[a-e]{0,8}") {
        let trace = generate(&a, &b);
        prop_assert_eq!(trace.distance(), full_edit_distance(a.as_bytes(), b.as_bytes()));
        // Every non-match link on the path costs exactly one edit.
        let edits = trace
            .edit_path()
            .iter()
            .filter(|p| p.operation != Operation::Match)
            .count();
        prop_assert_eq!(edits as u32, trace.distance());
    }

    #[test]
    fn generation_is_deterministic(a in "[a-z]{0,6}", b in "[a-z]{0,6}") {
        prop_assert_eq!(generate(&a, &b), generate(&a, &b));
    }

    #[test]
    fn mutating_one_snapshot_leaves_the_others_alone(
        a in "[a-d]{1,6}",
        b in "[a-d]{1,6}",
        pick in any::<prop::sample::Index>(),
    ) {
        let trace = generate(&a, &b);
        let pristine = generate(&a, &b);
        let mut steps = trace.steps().to_vec();
        let k = pick.index(steps.len());

        let cells: Vec<CellRef> = steps[k].table.iter().map(|(cell, _)| cell).collect();
        for cell in cells {
            prop_assert!(steps[k].table.set(cell, Some(999)));
            prop_assert!(steps[k].cell_states.set(cell, CellState::Final));
        }

        for (idx, step) in steps.iter().enumerate() {
            if idx != k {
                prop_assert_eq!(step, &pristine.steps()[idx]);
            }
        }
        // The shared trace is untouched as well.
        prop_assert_eq!(&trace, &pristine);
    }

    #[test]
    fn snapshots_are_prefix_consistent(a in "[a-d]{0,6}", b in "[a-d]{0,6}") {
        let trace = generate(&a, &b);
        let last = trace.final_step().unwrap();
        for pair in trace.steps().windows(2) {
            let (prev, next) = (&pair[0], &pair[1]);
            for (cell, value) in prev.table.iter() {
                if let Some(v) = value {
                    // Written cells never change afterwards.
                    prop_assert_eq!(next.value(cell), Some(*v));
                    prop_assert_eq!(last.value(cell), Some(*v));
                }
            }
        }
    }

    #[test]
    fn lifecycle_states_only_advance(a in "[a-d]{0,6}", b in "[a-d]{0,6}") {
        let trace = generate(&a, &b);
        let answer = trace.answer_cell();
        let last_id = trace.len() - 1;
        for pair in trace.steps().windows(2) {
            for (cell, state) in pair[0].cell_states.iter() {
                let after = pair[1].cell_states.get(cell).copied().unwrap();
                prop_assert!(after.rank() >= state.rank(), "{:?}: {:?} -> {:?}", cell, state, after);
            }
        }
        for step in trace.iter() {
            for (cell, state) in step.cell_states.iter() {
                if *state == CellState::Final {
                    prop_assert_eq!(cell, answer);
                    prop_assert_eq!(step.id, last_id);
                }
                prop_assert!(!matches!(state, CellState::Comparing | CellState::Selected));
            }
        }
    }

    #[test]
    fn choices_follow_tie_break(a in "[ab]{1,6}", b in "[ab]{1,6}") {
        let trace = generate(&a, &b);
        for step in trace.iter() {
            let Some(choice) = step.choice else { continue };
            let min = choice.insert.min(choice.delete).min(choice.replace);
            let expected = EditOp::PRIORITY
                .into_iter()
                .find(|&op| choice.cost(op) == min)
                .unwrap();
            prop_assert_eq!(choice.selected, expected);
            prop_assert_eq!(step.operation, Some(Operation::from(expected)));
            let arrow = step.arrow.as_ref().unwrap();
            prop_assert_eq!(arrow.from, expected.source(arrow.to));
        }
    }
}

#[test]
fn interior_cells_get_a_compare_then_resolve_pair() {
    let trace = generate("kitten", "sitting");
    let interior: Vec<_> = trace
        .iter()
        .filter(|s| matches!(s.cell, Some(CellRef { row, col }) if row > 0 && col > 0))
        .collect();
    assert_eq!(interior.len(), 2 * 6 * 7);
    for pair in interior.chunks(2) {
        assert_eq!(pair[0].cell, pair[1].cell);
        assert!(pair[0].operation.is_none());
        assert!(pair[0].comparison.is_some());
        assert!(pair[1].operation.is_some());
        assert_eq!(pair[0].comparison, pair[1].comparison);
    }
    assert_eq!(trace.distance(), 3);
}
