//! Plain-text rendering of catalogs, networks and puzzles

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write;

use crate::algorithm::puzzle::{PuzzleMode, PuzzleSpec};
use crate::analysis::variants::variant_table;
use crate::spatial::geometry::{Direction, Orientation};
use crate::spatial::grid::Placement;
use crate::spatial::tiles::tile_catalog;

/// Box-drawing glyph for a floor tile with connectors towards `+Z`, `+X`, `-Z`, `-X`
pub const fn floor_glyph(north: bool, east: bool, south: bool, west: bool) -> char {
    match (north, east, south, west) {
        (false, false, false, false) => '·',
        (true, false, false, false) => '╵',
        (false, true, false, false) => '╶',
        (false, false, true, false) => '╷',
        (false, false, false, true) => '╴',
        (true, false, true, false) => '│',
        (false, true, false, true) => '─',
        (true, true, false, false) => '└',
        (false, true, true, false) => '┌',
        (false, false, true, true) => '┐',
        (true, false, false, true) => '┘',
        (true, true, true, false) => '├',
        (true, false, true, true) => '┤',
        (false, true, true, true) => '┬',
        (true, true, false, true) => '┴',
        (true, true, true, true) => '┼',
    }
}

fn connector_directions(placement: &Placement) -> BTreeSet<Direction> {
    let table = variant_table();
    table
        .key_of(placement)
        .and_then(|key| table.get(key))
        .map(|variant| variant.connectors.iter().map(|c| c.facing).collect())
        .unwrap_or_default()
}

/// Top-down map of floor tiles, one block per level, `+Z` pointing up the page
pub fn render_floor_map(placements: &[Placement]) -> String {
    let floors: BTreeMap<[i32; 3], &Placement> = placements
        .iter()
        .filter(|placement| placement.orientation() == Orientation::Flat)
        .map(|placement| (placement.cell(), placement))
        .collect();
    if placements.is_empty() {
        return String::new();
    }

    let cells = placements.iter().map(Placement::cell);
    let min_x = cells.clone().map(|cell| cell[0]).min().unwrap_or(0);
    let max_x = cells.clone().map(|cell| cell[0]).max().unwrap_or(0);
    let min_z = cells.clone().map(|cell| cell[2]).min().unwrap_or(0);
    let max_z = cells.clone().map(|cell| cell[2]).max().unwrap_or(0);
    let levels: BTreeSet<i32> = cells.map(|cell| cell[1]).collect();

    let mut out = String::new();
    for y in levels {
        let _ = writeln!(out, "level {y}:");
        for z in (min_z..=max_z).rev() {
            let row: String = (min_x..=max_x)
                .map(|x| match floors.get(&[x, y, z]) {
                    Some(placement) => {
                        let facing = connector_directions(placement);
                        floor_glyph(
                            facing.contains(&Direction::PosZ),
                            facing.contains(&Direction::PosX),
                            facing.contains(&Direction::NegZ),
                            facing.contains(&Direction::NegX),
                        )
                    }
                    None => ' ',
                })
                .collect();
            let _ = writeln!(out, "  {}", row.trim_end());
        }
    }
    out
}

/// One line per placement
pub fn render_listing(placements: &[Placement]) -> String {
    let catalog = tile_catalog();
    let mut out = String::new();
    for placement in placements {
        let notation = catalog
            .get(placement.shape)
            .map_or_else(|| "????".to_string(), ToString::to_string);
        let facing: Vec<&str> = connector_directions(placement)
            .into_iter()
            .map(Direction::label)
            .collect();
        let _ = writeln!(
            out,
            "  {:?} {:<6} {} {} rot {:>3}{} -> {}",
            placement.cell(),
            placement.orientation().label(),
            placement.shape,
            notation,
            placement.rotation.degrees(),
            if placement.mirrored { " mirrored" } else { "" },
            facing.join(" ")
        );
    }
    out
}

/// Map followed by the placement listing
pub fn render_solution(placements: &[Placement]) -> String {
    format!(
        "{}{} tiles:\n{}",
        render_floor_map(placements),
        placements.len(),
        render_listing(placements)
    )
}

/// Region, mode, inventory and fixed tiles of a puzzle
pub fn render_puzzle(spec: &PuzzleSpec) -> String {
    let catalog = tile_catalog();
    let mut out = String::new();
    let mode = match spec.mode {
        PuzzleMode::Arrange => "arrange",
        PuzzleMode::Complete => "complete",
    };
    let orientations: Vec<&str> = spec
        .region
        .orientations
        .iter()
        .map(|orientation| orientation.label())
        .collect();
    let _ = writeln!(
        out,
        "mode: {mode}\nregion: {:?}..={:?} [{}]",
        spec.region.min,
        spec.region.max,
        orientations.join(", ")
    );

    let _ = writeln!(out, "inventory ({} tiles):", spec.inventory.total());
    for (shape, count) in spec.inventory.iter().filter(|&(_, count)| count > 0) {
        let notation = catalog
            .get(shape)
            .map_or_else(|| "????".to_string(), ToString::to_string);
        let _ = writeln!(out, "  {shape} {notation} x{count}");
    }

    if !spec.fixed.is_empty() {
        let _ = writeln!(out, "fixed ({} tiles):", spec.fixed.len());
        out.push_str(&render_listing(&spec.fixed));
        out.push_str(&render_floor_map(&spec.fixed));
    }
    out
}

/// Every catalog shape with its symmetry information
pub fn render_catalog() -> String {
    let catalog = tile_catalog();
    let table = variant_table();
    let mut out = format!(
        "{} shapes, {} variants\n",
        catalog.len(),
        table.len()
    );
    for (id, shape) in catalog.iter() {
        let _ = writeln!(
            out,
            "  {:>4} {shape} connectors {} variants {:>2} symmetry {}",
            id.to_string(),
            shape.connector_count(),
            table.variants_of(id).len(),
            table.symmetry_order(id)
        );
    }
    out
}
