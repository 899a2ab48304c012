//! Immutable records describing one point in the edit-distance computation.
//!
//! A [`Step`] is pure data: every field is fixed when the generator builds it
//! and nothing is back-patched once later steps exist. That is what makes any
//! past step a valid scrub target.

use serde::{Deserialize, Serialize};

/// A DP table coordinate `(row, col)`.
///
/// Semantics:
/// - `row` in `[0..=word1.len()]`
/// - `col` in `[0..=word2.len()]`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellRef {
    pub row: usize,
    pub col: usize,
}

impl CellRef {
    #[inline]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl From<(usize, usize)> for CellRef {
    fn from((row, col): (usize, usize)) -> Self {
        Self { row, col }
    }
}

/// Dense row-major matrix with value semantics.
///
/// Cloning a `Grid` deep-copies its cells, so snapshots handed to different
/// steps never share backing storage.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid<T> {
    rows: usize,
    cols: usize,
    cells: Vec<T>,
}

impl<T: Clone> Grid<T> {
    /// Allocate a `rows x cols` grid with every cell set to `fill`.
    pub fn new(rows: usize, cols: usize, fill: T) -> Self {
        Self {
            rows,
            cols,
            cells: vec![fill; rows * cols],
        }
    }
}

impl<T> Grid<T> {
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    fn offset(&self, cell: CellRef) -> Option<usize> {
        (cell.row < self.rows && cell.col < self.cols).then(|| cell.row * self.cols + cell.col)
    }

    /// Borrow the value at `cell`, or `None` when out of bounds.
    pub fn get(&self, cell: CellRef) -> Option<&T> {
        self.offset(cell).map(|idx| &self.cells[idx])
    }

    /// Overwrite the value at `cell`. Out-of-bounds writes are ignored and
    /// reported by returning `false`.
    pub fn set(&mut self, cell: CellRef, value: T) -> bool {
        match self.offset(cell) {
            Some(idx) => {
                self.cells[idx] = value;
                true
            }
            None => false,
        }
    }

    /// Iterate one row as a slice.
    pub fn row(&self, row: usize) -> Option<&[T]> {
        (row < self.rows).then(|| &self.cells[row * self.cols..(row + 1) * self.cols])
    }

    /// Iterate all cells with their coordinates, row-major.
    pub fn iter(&self) -> impl Iterator<Item = (CellRef, &T)> + '_ {
        let cols = self.cols.max(1);
        self.cells
            .iter()
            .enumerate()
            .map(move |(idx, v)| (CellRef::new(idx / cols, idx % cols), v))
    }
}

/// DP cost table. `None` marks a cell that has not been written yet.
pub type CostTable = Grid<Option<u32>>;

/// Per-cell visualization lifecycle.
///
/// The lifecycle stored in [`Step::cell_states`] only ever moves forward
/// (see [`CellState::rank`]). `Comparing` and `Selected` describe transient
/// roles of source cells and are produced by [`Step::display_state`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellState {
    Uninitialized,
    Computing,
    Comparing,
    Selected,
    Result,
    Final,
}

impl CellState {
    /// Position in the progression `uninitialized → (computing | comparing)
    /// → (selected | result) → final`.
    pub fn rank(self) -> u8 {
        match self {
            CellState::Uninitialized => 0,
            CellState::Computing | CellState::Comparing => 1,
            CellState::Selected | CellState::Result => 2,
            CellState::Final => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CellState::Uninitialized => "uninitialized",
            CellState::Computing => "computing",
            CellState::Comparing => "comparing",
            CellState::Selected => "selected",
            CellState::Result => "result",
            CellState::Final => "final",
        }
    }
}

/// Why a cell is highlighted on a given step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HighlightRole {
    Current,
    Compare,
    Result,
    Selected,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Highlight {
    pub cell: CellRef,
    pub role: HighlightRole,
}

impl Highlight {
    pub const fn new(cell: CellRef, role: HighlightRole) -> Self {
        Self { cell, role }
    }
}

/// DP action attributed to a step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Init,
    Insert,
    Delete,
    Replace,
    Match,
}

impl Operation {
    pub fn label(self) -> &'static str {
        match self {
            Operation::Init => "init",
            Operation::Insert => "insert",
            Operation::Delete => "delete",
            Operation::Replace => "replace",
            Operation::Match => "match",
        }
    }
}

/// The three costed candidates of a non-match fill.
///
/// Declaration order is the tie-break priority: earlier variants win ties.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditOp {
    Replace,
    Delete,
    Insert,
}

impl EditOp {
    /// Candidates in tie-break priority order.
    pub const PRIORITY: [EditOp; 3] = [EditOp::Replace, EditOp::Delete, EditOp::Insert];

    /// The cell this candidate reads from when filling `target`.
    ///
    /// `target` must be an interior cell (`row >= 1 && col >= 1`).
    pub fn source(self, target: CellRef) -> CellRef {
        match self {
            EditOp::Replace => CellRef::new(target.row - 1, target.col - 1),
            EditOp::Delete => CellRef::new(target.row - 1, target.col),
            EditOp::Insert => CellRef::new(target.row, target.col - 1),
        }
    }
}

impl From<EditOp> for Operation {
    fn from(op: EditOp) -> Self {
        match op {
            EditOp::Replace => Operation::Replace,
            EditOp::Delete => Operation::Delete,
            EditOp::Insert => Operation::Insert,
        }
    }
}

/// Provenance annotation: the value written at `to` was derived from `from`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Arrow {
    pub from: CellRef,
    pub to: CellRef,
    pub label: String,
}

/// Human-readable explanation of a step.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Narrative {
    pub summary: String,
    pub detail: Option<String>,
}

impl Narrative {
    pub fn new(summary: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

/// Candidate costs of a non-match fill and the winner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationChoice {
    pub insert: u32,
    pub delete: u32,
    pub replace: u32,
    pub selected: EditOp,
}

impl OperationChoice {
    /// Cost recorded for `op`.
    pub fn cost(&self, op: EditOp) -> u32 {
        match op {
            EditOp::Replace => self.replace,
            EditOp::Delete => self.delete,
            EditOp::Insert => self.insert,
        }
    }

    /// Build a choice from the three costs, picking the cheapest candidate.
    /// Ties resolve replace, then delete, then insert.
    pub fn resolve(insert: u32, delete: u32, replace: u32) -> Self {
        let mut choice = Self {
            insert,
            delete,
            replace,
            selected: EditOp::Replace,
        };
        let min = insert.min(delete).min(replace);
        for op in EditOp::PRIORITY {
            if choice.cost(op) == min {
                choice.selected = op;
                break;
            }
        }
        choice
    }

    #[inline]
    pub fn min_cost(&self) -> u32 {
        self.cost(self.selected)
    }
}

/// The pair of characters examined at an interior cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comparison {
    pub left: char,
    pub right: char,
    pub is_match: bool,
}

/// A named value shown in the variable watch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
    pub value: String,
}

impl Variable {
    pub fn new(name: impl Into<String>, value: impl ToString) -> Self {
        Self {
            name: name.into(),
            value: value.to_string(),
        }
    }
}

/// One immutable snapshot of the algorithm's progress.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    /// Position in the trace, starting at 0.
    pub id: usize,
    /// Cell this step concerns; `None` for the bootstrap step.
    pub cell: Option<CellRef>,
    /// Table after this step's effect.
    pub table: CostTable,
    /// Lifecycle of every cell after this step.
    pub cell_states: Grid<CellState>,
    pub highlights: Vec<Highlight>,
    pub operation: Option<Operation>,
    pub arrow: Option<Arrow>,
    pub narrative: Narrative,
    /// Present only on a non-match fill.
    pub choice: Option<OperationChoice>,
    pub comparison: Option<Comparison>,
    pub variables: Vec<Variable>,
}

impl Step {
    /// Row index, `-1` when the step concerns no cell.
    pub fn row(&self) -> isize {
        self.cell.map_or(-1, |c| c.row as isize)
    }

    /// Column index, `-1` when the step concerns no cell.
    pub fn col(&self) -> isize {
        self.cell.map_or(-1, |c| c.col as isize)
    }

    /// Value of `cell` in this step's table snapshot.
    pub fn value(&self, cell: CellRef) -> Option<u32> {
        self.table.get(cell).copied().flatten()
    }

    /// Role of `cell` on this step, if highlighted.
    pub fn highlight(&self, cell: CellRef) -> Option<HighlightRole> {
        self.highlights
            .iter()
            .find(|h| h.cell == cell)
            .map(|h| h.role)
    }

    /// State a renderer should paint for `cell`.
    ///
    /// Source cells highlighted as `compare`/`selected` report
    /// [`CellState::Comparing`]/[`CellState::Selected`]; every other cell
    /// reports its lifecycle state.
    pub fn display_state(&self, cell: CellRef) -> CellState {
        let lifecycle = self
            .cell_states
            .get(cell)
            .copied()
            .unwrap_or(CellState::Uninitialized);
        match self.highlight(cell) {
            Some(HighlightRole::Compare) => CellState::Comparing,
            Some(HighlightRole::Selected) => CellState::Selected,
            _ => lifecycle,
        }
    }
}
