//! Backtracking search over slot domains
//!
//! Depth-first search with an explicit stack of frames, each owning a cloned
//! state. Slots are chosen by minimum remaining values, looking first at
//! slots that can meet an open connector so the network grows from what is
//! already placed. Every branch is propagated to a fixpoint before
//! descending. The search is deterministic:
//! the same puzzle and options always produce the same solutions in the same
//! order.

use std::time::{Duration, Instant};

use crate::algorithm::cache::SupportCache;
use crate::algorithm::propagation::{frontier, propagate, prune_boundary};
use crate::algorithm::puzzle::PuzzleSpec;
use crate::algorithm::state::{Contradiction, PuzzleContext, SearchState};
use crate::algorithm::validation::validate_solution;
use crate::analysis::variants::VariantKey;
use crate::io::configuration::{DEFAULT_MAX_SOLUTIONS, DEFAULT_TIMEOUT_MS};
use crate::io::error::Result;
use crate::spatial::grid::Placement;

/// What the caller wants from a search
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SolveMode {
    /// Stop at the first solution
    First,
    /// Count solutions without keeping them
    Count,
    /// Collect every solution up to the cap
    All,
}

/// Search limits and mode
#[derive(Clone, Copy, Debug)]
pub struct SolveOptions {
    /// What to collect
    pub mode: SolveMode,
    /// Stop once this many solutions are found in counting modes
    pub max_solutions: usize,
    /// Wall-clock budget, `None` for unlimited
    pub timeout: Option<Duration>,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            mode: SolveMode::First,
            max_solutions: DEFAULT_MAX_SOLUTIONS,
            timeout: Some(Duration::from_millis(DEFAULT_TIMEOUT_MS)),
        }
    }
}

impl SolveOptions {
    /// Stop at the first solution
    pub fn first() -> Self {
        Self::default()
    }

    /// Count up to `limit` solutions
    pub fn count(limit: usize) -> Self {
        Self {
            mode: SolveMode::Count,
            max_solutions: limit,
            ..Self::default()
        }
    }

    /// Collect up to `limit` solutions
    pub fn all(limit: usize) -> Self {
        Self {
            mode: SolveMode::All,
            max_solutions: limit,
            ..Self::default()
        }
    }

    /// Replace the time budget
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    fn solution_limit(&self) -> usize {
        match self.mode {
            SolveMode::First => 1,
            SolveMode::Count | SolveMode::All => self.max_solutions.max(1),
        }
    }
}

/// Counters collected during one search
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Branches explored
    pub nodes: usize,
    /// Branches pruned by propagation
    pub contradictions: usize,
    /// Frames abandoned after trying every candidate
    pub backtracks: usize,
    /// Complete assignments rejected by the final check
    pub rejected: usize,
    /// Deepest stack reached
    pub max_depth: usize,
    /// Support cache hits
    pub cache_hits: usize,
    /// Support cache misses
    pub cache_misses: usize,
}

/// Result of a search
#[derive(Clone, Debug, Default)]
pub struct SolveOutcome {
    /// Solutions found, empty in counting mode
    pub solutions: Vec<Vec<Placement>>,
    /// Number of solutions found
    pub solution_count: usize,
    /// Whether the time budget ran out first
    pub timed_out: bool,
    /// Search counters
    pub stats: SearchStats,
    /// Wall-clock time spent
    pub elapsed: Duration,
}

impl SolveOutcome {
    /// Whether at least one solution was found
    pub const fn is_solvable(&self) -> bool {
        self.solution_count > 0
    }

    /// Whether exactly one solution exists, as far as the search could tell
    pub const fn is_unique(&self) -> bool {
        self.solution_count == 1 && !self.timed_out
    }
}

struct Frame {
    state: SearchState,
    slot: usize,
    candidates: Vec<VariantKey>,
    next: usize,
}

/// Constraint solver for one puzzle
pub struct Solver {
    context: PuzzleContext,
    cache: SupportCache,
}

impl Solver {
    /// Prepare a solver
    ///
    /// # Errors
    ///
    /// Returns an error if the puzzle description is invalid.
    pub fn new(spec: &PuzzleSpec) -> Result<Self> {
        Ok(Self {
            context: PuzzleContext::new(spec)?,
            cache: SupportCache::new(),
        })
    }

    /// Search context derived from the puzzle
    pub const fn context(&self) -> &PuzzleContext {
        &self.context
    }

    /// Fixed placements applied, boundary pruned and propagated
    ///
    /// # Errors
    ///
    /// Returns a contradiction if the puzzle is unsatisfiable before search.
    pub fn initial_state(&mut self) -> std::result::Result<SearchState, Contradiction> {
        let mut state = SearchState::new(&self.context);
        for &(linear, key) in self.context.fixed() {
            state.apply_placement(&self.context, linear, key, true)?;
        }
        prune_boundary(&self.context, &mut state)?;
        propagate(
            &self.context,
            &mut state,
            &mut self.cache,
            0..self.context.slot_count(),
        )?;
        Ok(state)
    }

    /// Run the search
    pub fn search(&mut self, options: &SolveOptions) -> SolveOutcome {
        let started = Instant::now();
        let deadline = options.timeout.map(|timeout| started + timeout);
        let limit = options.solution_limit();
        let mut outcome = SolveOutcome::default();

        let root = match self.initial_state() {
            Ok(state) => state,
            Err(contradiction) => {
                log::debug!("Puzzle unsatisfiable at slot {}", contradiction.slot);
                outcome.stats.contradictions += 1;
                return self.finish(outcome, started);
            }
        };

        let mut stack = Vec::new();
        if root.is_complete() {
            self.record(&root, options, &mut outcome);
        } else if let Some(frame) = self.branch(root) {
            stack.push(frame);
        }

        while let Some(frame) = stack.last_mut() {
            if outcome.solution_count >= limit {
                break;
            }
            if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
                outcome.timed_out = true;
                break;
            }

            let Some(&key) = frame.candidates.get(frame.next) else {
                stack.pop();
                outcome.stats.backtracks += 1;
                continue;
            };
            frame.next += 1;
            let slot = frame.slot;
            let mut child = frame.state.clone();
            outcome.stats.nodes += 1;

            let propagated = child
                .apply_placement(&self.context, slot, key, false)
                .and_then(|()| propagate(&self.context, &mut child, &mut self.cache, [slot]));
            if propagated.is_err() {
                outcome.stats.contradictions += 1;
                continue;
            }

            if child.is_complete() {
                self.record(&child, options, &mut outcome);
                continue;
            }

            if let Some(frame) = self.branch(child) {
                stack.push(frame);
                outcome.stats.max_depth = outcome.stats.max_depth.max(stack.len());
            }
        }

        self.finish(outcome, started)
    }

    fn finish(&self, mut outcome: SolveOutcome, started: Instant) -> SolveOutcome {
        outcome.stats.cache_hits = self.cache.stats.hits;
        outcome.stats.cache_misses = self.cache.stats.misses;
        outcome.elapsed = started.elapsed();
        log::debug!(
            "Search finished: {} solutions, {} nodes, {} contradictions, {} backtracks, cache {}/{} in {:.2?}{}",
            outcome.solution_count,
            outcome.stats.nodes,
            outcome.stats.contradictions,
            outcome.stats.backtracks,
            outcome.stats.cache_hits,
            outcome.stats.cache_hits + outcome.stats.cache_misses,
            outcome.elapsed,
            if outcome.timed_out { " (timed out)" } else { "" }
        );
        outcome
    }

    /// Build the next frame on the undecided slot with the fewest candidates
    ///
    /// Slots next to an open connector are preferred; ties go to the lowest
    /// slot index.
    fn branch(&self, state: SearchState) -> Option<Frame> {
        let choosable = |linear: usize| {
            if state.is_decided(linear) {
                return None;
            }
            let size = state.domain(linear)?.count();
            (size >= 2).then_some((size, linear))
        };
        let slot = frontier(&self.context, &state)
            .into_iter()
            .filter_map(choosable)
            .min()
            .or_else(|| (0..self.context.slot_count()).filter_map(choosable).min())
            .map(|(_, linear)| linear)?;

        let candidates = self.order_candidates(&state, slot);
        Some(Frame {
            state,
            slot,
            candidates,
            next: 0,
        })
    }

    /// Tiles whose shapes have the most copies left come first; empty last
    fn order_candidates(&self, state: &SearchState, slot: usize) -> Vec<VariantKey> {
        let Some(domain) = state.domain(slot) else {
            return Vec::new();
        };
        let mut tiles: Vec<(u32, VariantKey)> = domain
            .iter()
            .filter(|key| !key.is_empty())
            .map(|key| {
                let remaining = self
                    .context
                    .table
                    .get(key)
                    .map_or(0, |variant| state.inventory().remaining(variant.shape));
                (remaining, key)
            })
            .collect();
        tiles.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));

        let mut candidates: Vec<VariantKey> = tiles.into_iter().map(|(_, key)| key).collect();
        if domain.contains(VariantKey::EMPTY) {
            candidates.push(VariantKey::EMPTY);
        }
        candidates
    }

    /// Accept a complete assignment if it passes the final checks
    fn record(&self, state: &SearchState, options: &SolveOptions, outcome: &mut SolveOutcome) {
        if !state.inventory().is_empty() || state.component_count() != 1 {
            outcome.stats.rejected += 1;
            return;
        }
        let placements = state.placements(&self.context);
        if !validate_solution(&placements) {
            outcome.stats.rejected += 1;
            return;
        }

        outcome.solution_count += 1;
        if options.mode != SolveMode::Count {
            outcome.solutions.push(placements);
        }
    }
}

/// Solve a puzzle
///
/// Contradictions during search are handled internally; an unsatisfiable
/// puzzle yields an outcome with no solutions.
///
/// # Errors
///
/// Returns an error if the puzzle description is invalid.
pub fn solve(spec: &PuzzleSpec, options: &SolveOptions) -> Result<SolveOutcome> {
    let mut solver = Solver::new(spec)?;
    Ok(solver.search(options))
}
