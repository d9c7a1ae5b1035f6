use crate::{
    algorithm::bitset::VariantSet,
    algorithm::cache::{SupportCache, SupportKey},
    algorithm::state::{Contradiction, PuzzleContext, SearchState},
    analysis::variants::VariantKey,
    spatial::geometry::{Direction, QuantizedPoint},
    spatial::grid::Slot,
};
use bitvec::prelude::*;
use std::collections::VecDeque;

type Propagation<T> = std::result::Result<T, Contradiction>;

/// Deduplicating worklist of slot indices
struct Worklist {
    queue: VecDeque<usize>,
    queued: BitVec,
}

impl Worklist {
    fn new(len: usize) -> Self {
        Self {
            queue: VecDeque::new(),
            queued: bitvec![0; len],
        }
    }

    fn push(&mut self, linear: usize) {
        if self.queued.get(linear).as_deref() == Some(&false) {
            self.queued.set(linear, true);
            self.queue.push_back(linear);
        }
    }

    fn pop(&mut self) -> Option<usize> {
        let linear = self.queue.pop_front()?;
        self.queued.set(linear, false);
        Some(linear)
    }
}

/// Remove variants that would point a connector out of the region
///
/// On an exclusive face every variant with a connector towards it goes. A
/// connector on a shared crease may still be met by a tile of another
/// orientation, so there each variant is kept only if some other slot can
/// put a connector on the same point.
///
/// # Errors
///
/// Returns a contradiction if a slot, typically a fixed one, loses every
/// candidate.
pub fn prune_boundary(context: &PuzzleContext, state: &mut SearchState) -> Propagation<()> {
    for linear in 0..context.slot_count() {
        let Some(slot) = context.slot(linear) else {
            continue;
        };
        for direction in slot.orientation.relevant_directions() {
            if context.neighbor(linear, direction).is_some() {
                continue;
            }
            if context.is_exclusive(linear, direction) {
                let Some(mask) = context.index.facing_mask(direction) else {
                    continue;
                };
                let domain = state
                    .domain_mut(linear)
                    .ok_or(Contradiction { slot: linear })?;
                domain.subtract(mask);
            } else {
                prune_unmet_crease(context, state, linear, slot, direction)?;
            }
            if state.domain(linear).is_none_or(VariantSet::is_empty) {
                return Err(Contradiction { slot: linear });
            }
        }
    }
    Ok(())
}

/// Drop variants whose connectors on a shared boundary crease nothing can meet
fn prune_unmet_crease(
    context: &PuzzleContext,
    state: &mut SearchState,
    linear: usize,
    slot: Slot,
    direction: Direction,
) -> Propagation<()> {
    let Some(domain) = state.domain(linear) else {
        return Err(Contradiction { slot: linear });
    };
    let unmet: Vec<VariantKey> = domain
        .iter()
        .filter(|&key| {
            context.table.get(key).is_some_and(|variant| {
                variant.facing(direction).any(|connector| {
                    let point = connector.world_position(slot.cell);
                    let met_by_committed = state
                        .anchored_at(point)
                        .iter()
                        .any(|&other| other != linear);
                    !met_by_committed && !can_reach(context, state, point, linear)
                })
            })
        })
        .collect();

    let domain = state
        .domain_mut(linear)
        .ok_or(Contradiction { slot: linear })?;
    for key in unmet {
        domain.remove(key);
    }
    Ok(())
}

/// Undecided slots touching `point`, each with the variants of its
/// orientation that have a connector there
fn slots_touching<'a>(
    context: &'a PuzzleContext,
    state: &'a SearchState,
    point: QuantizedPoint,
) -> impl Iterator<Item = (usize, &'a [(VariantKey, usize)])> + 'a {
    point.touching_cells().into_iter().flat_map(move |cell| {
        let relative = point.sub(QuantizedPoint::from_cell(cell));
        context
            .region
            .orientations
            .iter()
            .filter_map(move |&orientation| {
                let linear = context.region.linear_index(&Slot::new(cell, orientation))?;
                if state.is_decided(linear) {
                    return None;
                }
                Some((linear, context.index.variants_at(orientation, relative)))
            })
    })
}

/// Whether an undecided slot other than `exclude` can still put a connector on `point`
fn can_reach(
    context: &PuzzleContext,
    state: &SearchState,
    point: QuantizedPoint,
    exclude: usize,
) -> bool {
    slots_touching(context, state, point).any(|(linear, keys)| {
        linear != exclude
            && state
                .domain(linear)
                .is_some_and(|domain| keys.iter().any(|&(key, _)| domain.contains(key)))
    })
}

/// Domain members of each undecided slot that would put a connector on `point`
///
/// Slots with no such member are left out.
fn reaching_variants(
    context: &PuzzleContext,
    state: &SearchState,
    point: QuantizedPoint,
) -> Vec<(usize, VariantSet)> {
    slots_touching(context, state, point)
        .filter_map(|(linear, keys)| {
            let domain = state.domain(linear)?;
            let reaching = VariantSet::from_keys(
                domain.universe(),
                keys.iter()
                    .map(|&(key, _)| key)
                    .filter(|&key| domain.contains(key)),
            );
            (!reaching.is_empty()).then_some((linear, reaching))
        })
        .collect()
}

/// Run every pruning rule to a fixpoint
///
/// Each round runs arc consistency from the seeded slots, then support,
/// inventory and forced-commit passes; slots those passes change seed the
/// next round.
///
/// # Errors
///
/// Returns a contradiction when any slot's domain becomes empty or a forced
/// commit cannot be honored.
pub fn propagate(
    context: &PuzzleContext,
    state: &mut SearchState,
    cache: &mut SupportCache,
    seeds: impl IntoIterator<Item = usize>,
) -> Propagation<()> {
    let mut worklist = Worklist::new(context.slot_count());
    for linear in seeds {
        worklist.push(linear);
    }

    loop {
        arc_consistency(context, state, cache, &mut worklist)?;

        let mut changed = enforce_support(context, state)?;
        changed.extend(enforce_connector_points(context, state)?);
        changed.extend(prune_inventory(context, state)?);
        check_capacity(context, state)?;
        changed.extend(commit_forced(context, state)?);

        if changed.is_empty() {
            return Ok(());
        }
        for linear in changed {
            worklist.push(linear);
        }
    }
}

/// AC-3 over exclusive faces
fn arc_consistency(
    context: &PuzzleContext,
    state: &mut SearchState,
    cache: &mut SupportCache,
    worklist: &mut Worklist,
) -> Propagation<()> {
    while let Some(linear) = worklist.pop() {
        let Some(slot) = context.slot(linear) else {
            continue;
        };
        let Some(domain) = state.domain(linear).cloned() else {
            continue;
        };

        for direction in slot.orientation.relevant_directions() {
            if !context.is_exclusive(linear, direction) {
                continue;
            }
            let Some(neighbor) = context.neighbor(linear, direction) else {
                continue;
            };

            let supported = cache.get_or_compute(SupportKey::new(&domain, direction), || {
                context.index.support_of(&domain, direction)
            });
            let neighbor_domain = state
                .domain_mut(neighbor)
                .ok_or(Contradiction { slot: neighbor })?;
            let before = neighbor_domain.count();
            neighbor_domain.intersect_with(supported);
            let after = neighbor_domain.count();

            if after == 0 {
                return Err(Contradiction { slot: neighbor });
            }
            if after != before {
                worklist.push(neighbor);
            }
        }
    }
    Ok(())
}

/// Keep walls above ground only where a floor tile can sit beneath them
///
/// A wall with no possible floor under it is narrowed to the empty marker,
/// and a committed wall rules the empty marker out of its floor slot.
/// Returns the slots whose domains changed.
///
/// # Errors
///
/// Returns a contradiction if a committed wall has no floor or a floor slot
/// under a committed wall has nothing but the empty marker.
pub fn enforce_support(context: &PuzzleContext, state: &mut SearchState) -> Propagation<Vec<usize>> {
    let mut changed = Vec::new();

    for linear in 0..context.slot_count() {
        let Some(slot) = context.slot(linear) else {
            continue;
        };
        if !slot.orientation.is_edge_mounted() || !context.needs_support(linear) {
            continue;
        }

        let floor = context.floor_below(linear);
        let floor_possible = floor
            .and_then(|below| state.domain(below))
            .is_some_and(VariantSet::has_tile);

        if !floor_possible {
            let domain = state
                .domain_mut(linear)
                .ok_or(Contradiction { slot: linear })?;
            if domain.has_tile() {
                if !domain.contains(VariantKey::EMPTY) {
                    return Err(Contradiction { slot: linear });
                }
                *domain = VariantSet::from_keys(domain.universe(), [VariantKey::EMPTY]);
                changed.push(linear);
            }
            continue;
        }

        let wall_placed = state.assigned(linear).is_some_and(|key| !key.is_empty());
        if let (true, Some(below)) = (wall_placed, floor) {
            let domain = state
                .domain_mut(below)
                .ok_or(Contradiction { slot: below })?;
            if domain.remove(VariantKey::EMPTY) {
                if domain.is_empty() {
                    return Err(Contradiction { slot: below });
                }
                changed.push(below);
            }
        }
    }

    Ok(changed)
}

/// Keep every committed connector closable
///
/// A point already joining two tiles is struck from every undecided slot
/// touching it. A point held by a single tile needs an undecided slot that
/// can still meet it; when only one slot can, that slot is narrowed to the
/// variants that do. Open points beyond what the remaining tiles' connectors
/// could close, or a group sealed off from the rest, end the branch.
/// Returns the slots whose domains changed.
///
/// # Errors
///
/// Returns a contradiction when an open point can no longer be met or a
/// domain empties.
pub fn enforce_connector_points(
    context: &PuzzleContext,
    state: &mut SearchState,
) -> Propagation<Vec<usize>> {
    let mut changed = Vec::new();

    for point in state.joined_points() {
        for (linear, reaching) in reaching_variants(context, state, point) {
            let domain = state
                .domain_mut(linear)
                .ok_or(Contradiction { slot: linear })?;
            domain.subtract(&reaching);
            if domain.is_empty() {
                return Err(Contradiction { slot: linear });
            }
            changed.push(linear);
        }
    }

    let open = state.open_points();
    if open.len() as u64 > connector_budget(context, state) {
        let owner = open.first().map_or(0, |&(_, slot)| slot);
        return Err(Contradiction { slot: owner });
    }

    for (point, owner) in open {
        let mut reaching = reaching_variants(context, state, point);
        if reaching.len() > 1 {
            continue;
        }
        let Some((linear, keys)) = reaching.pop() else {
            return Err(Contradiction { slot: owner });
        };
        let domain = state
            .domain_mut(linear)
            .ok_or(Contradiction { slot: linear })?;
        if domain.count() != keys.count() {
            *domain = keys;
            changed.push(linear);
        }
    }

    if let Some(slot) = state.sealed_group() {
        return Err(Contradiction { slot });
    }

    Ok(changed)
}

/// Undecided slots that could meet an open connector, in slot order
pub fn frontier(context: &PuzzleContext, state: &SearchState) -> Vec<usize> {
    let mut slots: Vec<usize> = state
        .open_points()
        .into_iter()
        .flat_map(|(point, _)| reaching_variants(context, state, point))
        .map(|(linear, _)| linear)
        .collect();
    slots.sort_unstable();
    slots.dedup();
    slots
}

/// Connectors the remaining inventory would bring
fn connector_budget(context: &PuzzleContext, state: &SearchState) -> u64 {
    state
        .inventory()
        .iter()
        .map(|(shape, count)| {
            let connectors = context
                .table
                .variants_of(shape)
                .first()
                .and_then(|&key| context.table.get(key))
                .map_or(0, |variant| variant.connectors.len());
            u64::from(count) * connectors as u64
        })
        .sum()
}

/// Strip shapes with no copies left from every undecided slot
fn prune_inventory(context: &PuzzleContext, state: &mut SearchState) -> Propagation<Vec<usize>> {
    let mut changed = Vec::new();

    for (&shape, mask) in context.shape_masks() {
        if state.inventory().remaining(shape) > 0 || !state.mark_exhausted(shape) {
            continue;
        }
        for linear in 0..context.slot_count() {
            if state.is_decided(linear) {
                continue;
            }
            let domain = state
                .domain_mut(linear)
                .ok_or(Contradiction { slot: linear })?;
            if domain.intersects(mask) {
                domain.subtract(mask);
                if domain.is_empty() {
                    return Err(Contradiction { slot: linear });
                }
                changed.push(linear);
            }
        }
    }

    Ok(changed)
}

/// Fail early when fewer open slots can take a tile than tiles remain
fn check_capacity(context: &PuzzleContext, state: &SearchState) -> Propagation<()> {
    let open = (0..context.slot_count())
        .filter(|&linear| !state.is_decided(linear))
        .filter(|&linear| state.domain(linear).is_some_and(VariantSet::has_tile))
        .count();
    if (open as u64) < state.inventory().total() {
        return Err(Contradiction { slot: 0 });
    }
    Ok(())
}

/// Commit every undecided slot whose domain has a single candidate
fn commit_forced(context: &PuzzleContext, state: &mut SearchState) -> Propagation<Vec<usize>> {
    let mut changed = Vec::new();

    for linear in 0..context.slot_count() {
        if state.is_decided(linear) {
            continue;
        }
        let Some(key) = state.domain(linear).and_then(VariantSet::single) else {
            continue;
        };
        state.apply_placement(context, linear, key, false)?;
        changed.push(linear);
    }

    Ok(changed)
}
