//! Instrumented edit-distance DP.
//!
//! [`TraceGenerator`] fills the classic `(n1+1) x (n2+1)` edit-distance table
//! and records one [`Step`] per micro-decision:
//! 1. a bootstrap step describing the table,
//! 2. one step per row-0 cell (insertions),
//! 3. one step per column-0 cell (deletions),
//! 4. a compare step and a resolve step per interior cell, row-major.
//!
//! Completion is folded into the last of those steps: it marks the answer
//! cell `final` and its narrative states the distance. A trace therefore has
//! exactly [`expected_step_count`] steps.
//!
//! The working table lives only inside the generator. Every emitted step owns
//! its own deep copy, so later steps can never alter an earlier snapshot.

use std::collections::HashMap;
use std::sync::Arc;

use crate::step::{
    Arrow, CellRef, CellState, Comparison, CostTable, EditOp, Grid, Highlight, HighlightRole,
    Narrative, Operation, OperationChoice, Step, Variable,
};
use crate::utils::expected_step_count;

/// Builds the trace for one pair of words.
///
/// Typical usage:
/// ```
/// use ed_trace::TraceGenerator;
///
/// let trace = TraceGenerator::new("horse", "ros").run();
/// assert_eq!(trace.distance(), 3);
/// assert_eq!(trace.len(), 1 + 3 + 5 + 2 * 5 * 3);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct TraceGenerator<'a> {
    word1: &'a str,
    word2: &'a str,
}

impl<'a> TraceGenerator<'a> {
    pub fn new(word1: &'a str, word2: &'a str) -> Self {
        Self { word1, word2 }
    }

    /// Run the DP and return the full, immutable trace.
    ///
    /// Deterministic and free of shared state: identical inputs yield equal
    /// traces, and concurrent calls do not interact.
    pub fn run(&self) -> Trace {
        let a: Vec<char> = self.word1.chars().collect();
        let b: Vec<char> = self.word2.chars().collect();
        let (n1, n2) = (a.len(), b.len());

        #[cfg(feature = "tracing")]
        let span = tracing::trace_span!("generate_trace", n1, n2);
        #[cfg(feature = "tracing")]
        let _enter = span.enter();

        let mut rec = Recorder::new(&a, &b);
        rec.bootstrap(self.word1, self.word2);
        for j in 1..=n2 {
            rec.fill_first_row(j);
        }
        for i in 1..=n1 {
            rec.fill_first_col(i);
        }
        // Row-major order: (i-1,j-1), (i-1,j) and (i,j-1) are settled before (i,j).
        for i in 1..=n1 {
            for j in 1..=n2 {
                rec.compare(i, j);
                rec.resolve(i, j);
            }
        }
        rec.finish(self.word1, self.word2);

        debug_assert_eq!(rec.steps.len(), expected_step_count(n1, n2));

        #[cfg(feature = "tracing")]
        tracing::debug!(steps = rec.steps.len(), "trace generated");

        Trace {
            word1: self.word1.to_owned(),
            word2: self.word2.to_owned(),
            steps: rec.steps.into(),
        }
    }
}

/// Generate the trace for `word1 → word2`.
///
/// Convenience wrapper over [`TraceGenerator`]. Callers are expected to have
/// validated the words (see [`crate::validate::validate`]); any characters
/// work, but nothing here bounds the size of the result.
pub fn generate(word1: &str, word2: &str) -> Trace {
    TraceGenerator::new(word1, word2).run()
}

/// Everything a step carries besides the snapshots, which [`Recorder::emit`]
/// takes itself.
#[derive(Default)]
struct StepDraft {
    cell: Option<CellRef>,
    highlights: Vec<Highlight>,
    operation: Option<Operation>,
    arrow: Option<Arrow>,
    narrative: Narrative,
    choice: Option<OperationChoice>,
    comparison: Option<Comparison>,
    variables: Vec<Variable>,
}

/// Working state of one generation run.
struct Recorder<'w> {
    a: &'w [char],
    b: &'w [char],
    table: CostTable,
    states: Grid<CellState>,
    steps: Vec<Step>,
}

impl<'w> Recorder<'w> {
    fn new(a: &'w [char], b: &'w [char]) -> Self {
        let (rows, cols) = (a.len() + 1, b.len() + 1);
        let mut table = Grid::new(rows, cols, None);
        let mut states = Grid::new(rows, cols, CellState::Uninitialized);
        // Base case: transforming "" into "" costs nothing.
        table.set(CellRef::new(0, 0), Some(0));
        states.set(CellRef::new(0, 0), CellState::Result);
        Self {
            a,
            b,
            table,
            states,
            steps: Vec::with_capacity(expected_step_count(a.len(), b.len())),
        }
    }

    fn emit(&mut self, draft: StepDraft) {
        let step = Step {
            id: self.steps.len(),
            cell: draft.cell,
            table: self.table.clone(),
            cell_states: self.states.clone(),
            highlights: draft.highlights,
            operation: draft.operation,
            arrow: draft.arrow,
            narrative: draft.narrative,
            choice: draft.choice,
            comparison: draft.comparison,
            variables: draft.variables,
        };
        self.steps.push(step);
    }

    fn cost(&self, cell: CellRef) -> u32 {
        // Reads only ever target settled cells; see the traversal order in `run`.
        self.table.get(cell).copied().flatten().unwrap_or(0)
    }

    fn write(&mut self, cell: CellRef, value: u32, state: CellState) {
        self.table.set(cell, Some(value));
        self.states.set(cell, state);
    }

    fn bootstrap(&mut self, word1: &str, word2: &str) {
        let (rows, cols) = (self.a.len() + 1, self.b.len() + 1);
        self.emit(StepDraft {
            operation: Some(Operation::Init),
            narrative: Narrative::new(format!("Initialize a {rows} x {cols} DP table")).with_detail(
                format!(
                    "dp[i][j] holds the fewest edits turning the first i characters of \"{word1}\" \
                     into the first j characters of \"{word2}\"."
                ),
            ),
            variables: vec![
                Variable::new("n1", self.a.len()),
                Variable::new("n2", self.b.len()),
            ],
            ..StepDraft::default()
        });
    }

    fn fill_first_row(&mut self, j: usize) {
        let cell = CellRef::new(0, j);
        let from = CellRef::new(0, j - 1);
        let value = self.cost(from) + 1;
        self.write(cell, value, CellState::Result);
        let prefix: String = self.b[..j].iter().collect();
        self.emit(StepDraft {
            cell: Some(cell),
            highlights: vec![Highlight::new(cell, HighlightRole::Current)],
            operation: Some(Operation::Insert),
            arrow: Some(Arrow {
                from,
                to: cell,
                label: "+1 insert".to_owned(),
            }),
            narrative: Narrative::new(format!(
                "First row: dp[0][{j}] = {value}, turning \"\" into \"{prefix}\" takes {j} insertion{}",
                plural(j)
            )),
            variables: vec![
                Variable::new("j", j),
                Variable::new("dp[0][j]", value),
            ],
            ..StepDraft::default()
        });
    }

    fn fill_first_col(&mut self, i: usize) {
        let cell = CellRef::new(i, 0);
        let from = CellRef::new(i - 1, 0);
        let value = self.cost(from) + 1;
        self.write(cell, value, CellState::Result);
        let prefix: String = self.a[..i].iter().collect();
        self.emit(StepDraft {
            cell: Some(cell),
            highlights: vec![Highlight::new(cell, HighlightRole::Current)],
            operation: Some(Operation::Delete),
            arrow: Some(Arrow {
                from,
                to: cell,
                label: "+1 delete".to_owned(),
            }),
            narrative: Narrative::new(format!(
                "First column: dp[{i}][0] = {value}, turning \"{prefix}\" into \"\" takes {i} deletion{}",
                plural(i)
            )),
            variables: vec![
                Variable::new("i", i),
                Variable::new("dp[i][0]", value),
            ],
            ..StepDraft::default()
        });
    }

    fn comparison(&self, i: usize, j: usize) -> Comparison {
        let (left, right) = (self.a[i - 1], self.b[j - 1]);
        Comparison {
            left,
            right,
            is_match: left == right,
        }
    }

    fn compare(&mut self, i: usize, j: usize) {
        let cell = CellRef::new(i, j);
        let cmp = self.comparison(i, j);
        self.states.set(cell, CellState::Computing);
        let mut highlights = vec![Highlight::new(cell, HighlightRole::Current)];
        highlights.extend(
            EditOp::PRIORITY
                .iter()
                .map(|op| Highlight::new(op.source(cell), HighlightRole::Compare)),
        );
        let verdict = if cmp.is_match { "equal" } else { "different" };
        self.emit(StepDraft {
            cell: Some(cell),
            highlights,
            narrative: Narrative::new(format!(
                "Compare word1[{}]='{}' with word2[{}]='{}'",
                i - 1,
                cmp.left,
                j - 1,
                cmp.right
            ))
            .with_detail(format!("The characters are {verdict}.")),
            comparison: Some(cmp),
            variables: vec![
                Variable::new("i", i),
                Variable::new("j", j),
                Variable::new(format!("word1[{}]", i - 1), cmp.left),
                Variable::new(format!("word2[{}]", j - 1), cmp.right),
            ],
            ..StepDraft::default()
        });
    }

    fn resolve(&mut self, i: usize, j: usize) {
        let cell = CellRef::new(i, j);
        let cmp = self.comparison(i, j);
        if cmp.is_match {
            self.inherit(cell, cmp);
        } else {
            self.pick_cheapest(cell, cmp);
        }
    }

    fn inherit(&mut self, cell: CellRef, cmp: Comparison) {
        let diag = EditOp::Replace.source(cell);
        let value = self.cost(diag);
        self.write(cell, value, CellState::Result);
        self.emit(StepDraft {
            cell: Some(cell),
            highlights: vec![
                Highlight::new(cell, HighlightRole::Result),
                Highlight::new(diag, HighlightRole::Selected),
            ],
            operation: Some(Operation::Match),
            arrow: Some(Arrow {
                from: diag,
                to: cell,
                label: "inherit".to_owned(),
            }),
            narrative: Narrative::new(format!(
                "'{}' == '{}', so dp[{}][{}] = dp[{}][{}] = {value}",
                cmp.left,
                cmp.right,
                cell.row,
                cell.col,
                diag.row,
                diag.col
            )),
            comparison: Some(cmp),
            variables: vec![Variable::new("dp[i][j]", value)],
            ..StepDraft::default()
        });
    }

    fn pick_cheapest(&mut self, cell: CellRef, cmp: Comparison) {
        let insert = self.cost(EditOp::Insert.source(cell)) + 1;
        let delete = self.cost(EditOp::Delete.source(cell)) + 1;
        let replace = self.cost(EditOp::Replace.source(cell)) + 1;
        let choice = OperationChoice::resolve(insert, delete, replace);
        let value = choice.min_cost();
        let winner = choice.selected;
        let from = winner.source(cell);
        self.write(cell, value, CellState::Result);

        let mut highlights = vec![Highlight::new(cell, HighlightRole::Result)];
        highlights.extend(EditOp::PRIORITY.iter().map(|&op| {
            let role = if op == winner {
                HighlightRole::Selected
            } else {
                HighlightRole::Compare
            };
            Highlight::new(op.source(cell), role)
        }));

        let action = match winner {
            EditOp::Replace => format!("replace '{}' with '{}'", cmp.left, cmp.right),
            EditOp::Delete => format!("delete '{}'", cmp.left),
            EditOp::Insert => format!("insert '{}'", cmp.right),
        };
        let op = Operation::from(winner);
        self.emit(StepDraft {
            cell: Some(cell),
            highlights,
            operation: Some(op),
            arrow: Some(Arrow {
                from,
                to: cell,
                label: format!("+1 {}", op.label()),
            }),
            narrative: Narrative::new(format!(
                "Characters differ, cheapest is to {action}: dp[{}][{}] = min({insert}, {delete}, {replace}) = {value}",
                cell.row, cell.col
            ))
            .with_detail(format!(
                "insert: dp[{r}][{cl}] + 1 = {insert}\ndelete: dp[{ru}][{c}] + 1 = {delete}\nreplace: dp[{ru}][{cl}] + 1 = {replace}",
                r = cell.row,
                c = cell.col,
                ru = cell.row - 1,
                cl = cell.col - 1,
            )),
            choice: Some(choice),
            comparison: Some(cmp),
            variables: vec![
                Variable::new("insert cost", insert),
                Variable::new("delete cost", delete),
                Variable::new("replace cost", replace),
                Variable::new("dp[i][j]", value),
            ],
            ..StepDraft::default()
        });
    }

    /// Close the trace on the step emitted last.
    ///
    /// Runs before the trace is handed out, so no reader has observed the
    /// step yet.
    fn finish(&mut self, word1: &str, word2: &str) {
        let cell = CellRef::new(self.a.len(), self.b.len());
        let distance = self.cost(cell);
        self.states.set(cell, CellState::Final);
        let Some(last) = self.steps.last_mut() else {
            return;
        };
        last.cell_states.set(cell, CellState::Final);
        if last.highlight(cell).is_none() {
            last.highlights.push(Highlight::new(cell, HighlightRole::Result));
        }
        let previous = std::mem::take(&mut last.narrative);
        let detail = match previous.detail {
            Some(d) => format!("{}\n{d}", previous.summary),
            None => previous.summary,
        };
        last.narrative = Narrative::new(format!(
            "Done: the edit distance from \"{word1}\" to \"{word2}\" is {distance}"
        ))
        .with_detail(detail);
        last.variables.push(Variable::new("distance", distance));
    }
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

/// One link of the provenance chain recovered from a trace's arrows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PathStep {
    /// Cell whose value this link produced.
    pub cell: CellRef,
    pub operation: Operation,
    /// Character of word1 consumed, if any.
    pub left: Option<char>,
    /// Character of word2 consumed, if any.
    pub right: Option<char>,
}

/// The immutable result of one generation run.
///
/// Cloning is cheap and clones share the same steps, so a trace can be handed
/// to any number of readers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Trace {
    word1: String,
    word2: String,
    steps: Arc<[Step]>,
}

impl Trace {
    pub fn word1(&self) -> &str {
        &self.word1
    }

    pub fn word2(&self) -> &str {
        &self.word2
    }

    /// Number of steps; at least one (the bootstrap) for every input.
    #[inline]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Step> {
        self.steps.iter()
    }

    /// The last step, the only one on which the answer cell is `final`.
    pub fn final_step(&self) -> Option<&Step> {
        self.steps.last()
    }

    /// Answer cell `(n1, n2)`.
    pub fn answer_cell(&self) -> CellRef {
        CellRef::new(self.word1.chars().count(), self.word2.chars().count())
    }

    /// Edit distance recorded in the final snapshot.
    pub fn distance(&self) -> u32 {
        let cell = self.answer_cell();
        self.final_step()
            .and_then(|s| s.value(cell))
            .unwrap_or(0)
    }

    /// Follow the recorded arrows backward from the answer cell and return
    /// the provenance chain in forward order.
    ///
    /// Includes `match` links; filter on [`PathStep::operation`] for the edit
    /// script proper.
    pub fn edit_path(&self) -> Vec<PathStep> {
        let writes: HashMap<CellRef, (Operation, CellRef)> = self
            .steps
            .iter()
            .filter_map(|s| match (s.operation, &s.arrow) {
                (Some(op), Some(arrow)) if op != Operation::Init => Some((arrow.to, (op, arrow.from))),
                _ => None,
            })
            .collect();

        let a: Vec<char> = self.word1.chars().collect();
        let b: Vec<char> = self.word2.chars().collect();
        let mut path = Vec::with_capacity(a.len() + b.len());
        let mut cursor = self.answer_cell();
        while let Some(&(operation, from)) = writes.get(&cursor) {
            let left = (cursor.row > from.row).then(|| a[cursor.row - 1]);
            let right = (cursor.col > from.col).then(|| b[cursor.col - 1]);
            path.push(PathStep {
                cell: cursor,
                operation,
                left,
                right,
            });
            cursor = from;
        }
        path.reverse();
        path
    }
}

impl<'t> IntoIterator for &'t Trace {
    type Item = &'t Step;
    type IntoIter = std::slice::Iter<'t, Step>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}
