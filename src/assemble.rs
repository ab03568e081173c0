//! Closes each site's clipped edges into a counter-clockwise polygon.
//!
//! The natural edges of a cell either already chain into a loop, or form
//! open chains whose ends lie on the bounding box. Open chains are joined by
//! walking the box counter-clockwise from the end of one chain to the start
//! of the next, turning at the corners met on the way.

use rayon::prelude::*;
use tracing::debug;

use crate::bounds::BoundingBox;
use crate::cell::Cell2D;
use crate::edge::{Edge, EdgeKind};
use crate::error::{Result, VoronoiError};
use crate::geometry::{Point, polygon_centroid, signed_area};

// Chain ends are joined, and matched to the boundary, within this multiple of the tolerance.
const JOIN_FACTOR: f64 = 1e3;

// Cells whose area is below this fraction of the box are reported empty.
const MIN_AREA_FRACTION: f64 = 1e-12;

/// One directed side of a polygon under construction. `edge` is `None` for
/// border walls, which only get an index once all cells are assembled.
#[derive(Clone, Copy, Debug)]
struct Piece {
    start: Point,
    end: Point,
    neighbor: i32,
    edge: Option<usize>,
}

/// A finished cell whose border edges are not yet numbered.
struct Assembled {
    cell: Cell2D,
    edges: Vec<Option<usize>>,
    borders: Vec<Edge>,
}

impl Assembled {
    fn empty(id: usize, site: Point) -> Self {
        Self { cell: Cell2D::empty(id, site.into()), edges: Vec::new(), borders: Vec::new() }
    }
}

/// Lists, for every site, the indices of the edges it lies next to.
pub(crate) fn incident_edges(edges: &[Edge], count: usize) -> Vec<Vec<usize>> {
    let mut incident = vec![Vec::new(); count];
    for (index, edge) in edges.iter().enumerate() {
        incident[edge.left].push(index);
        if let Some(right) = edge.right() {
            incident[right].push(index);
        }
    }
    incident
}

/// Builds the closed cell of every site from the clipped natural `edges`,
/// appending the border walls it synthesizes to `edges`.
pub(crate) fn assemble_cells(
    sites: &[Point],
    edges: &mut Vec<Edge>,
    bounds: &BoundingBox,
    eps: f64,
) -> Result<Vec<Cell2D>> {
    let incident = incident_edges(edges, sites.len());
    // Without any edge crossing the box, all of it belongs to the site nearest its center.
    let full_box = if edges.is_empty() { nearest_to_center(sites, bounds) } else { None };

    let natural = edges.as_slice();
    let assembled = (0..sites.len())
        .into_par_iter()
        .map(|id| {
            if full_box == Some(id) {
                return Ok(full_cell(id, sites[id], bounds));
            }
            let pieces = directed_pieces(id, &incident[id], natural);
            assemble_site(id, sites[id], pieces, bounds, eps)
        })
        .collect::<Result<Vec<_>>>()?;

    let natural_count = edges.len();
    let mut cells = Vec::with_capacity(assembled.len());
    for Assembled { mut cell, edges: refs, borders } in assembled {
        let offset = edges.len();
        let mut next_border = offset;
        cell.edges = refs
            .into_iter()
            .map(|r| {
                r.unwrap_or_else(|| {
                    next_border += 1;
                    next_border - 1
                })
            })
            .collect();
        edges.extend(borders);
        cells.push(cell);
    }

    debug!(
        cells = cells.len(),
        empty = cells.iter().filter(|c| c.is_empty()).count(),
        natural_edges = natural_count,
        border_edges = edges.len() - natural_count,
        "cells assembled"
    );
    Ok(cells)
}

fn nearest_to_center(sites: &[Point], bounds: &BoundingBox) -> Option<usize> {
    let center = Point::from(bounds.center());
    let mut best: Option<(usize, f64)> = None;
    for (id, site) in sites.iter().enumerate() {
        let d = site.distance_sq(center);
        if best.is_none_or(|(_, best_d)| d < best_d) {
            best = Some((id, d));
        }
    }
    best.map(|(id, _)| id)
}

fn full_cell(id: usize, site: Point, bounds: &BoundingBox) -> Assembled {
    let cell = Cell2D::new(id, site.into(), *bounds);
    let corners = bounds.corners();
    let borders = cell
        .edge_neighbors
        .iter()
        .enumerate()
        .map(|(k, &side)| Edge::border(id, side, corners[k], corners[(k + 1) % 4]))
        .collect();
    Assembled { cell, edges: vec![None; 4], borders }
}

/// Orients every edge of the site so that the site lies on its left.
fn directed_pieces(id: usize, incident: &[usize], edges: &[Edge]) -> Vec<Piece> {
    incident
        .iter()
        .map(|&index| {
            let edge = &edges[index];
            let (va, vb) = (Point::from(edge.va), Point::from(edge.vb));
            let other = match edge.kind {
                EdgeKind::Natural { right } if edge.left == id => right as i32,
                EdgeKind::Natural { .. } => edge.left as i32,
                EdgeKind::Border { side } => side,
            };
            if edge.left == id {
                Piece { start: va, end: vb, neighbor: other, edge: Some(index) }
            } else {
                Piece { start: vb, end: va, neighbor: other, edge: Some(index) }
            }
        })
        .collect()
}

/// How the natural edges of one cell connect.
enum Outline {
    /// The edges close on their own; piece indices in polygon order.
    Closed(Vec<usize>),
    /// Chains of piece indices, each starting and ending on the box.
    Open(Vec<Vec<usize>>),
}

/// Links every piece to the piece starting where it ends.
fn chain_pieces(id: usize, pieces: &[Piece], join: f64) -> Result<Outline> {
    let n = pieces.len();

    // Each piece picks the nearest start; a start claimed twice goes to the nearer end.
    let mut pred: Vec<Option<(usize, f64)>> = vec![None; n];
    for (j, piece) in pieces.iter().enumerate() {
        let nearest = (0..n)
            .filter(|&k| k != j)
            .map(|k| (k, piece.end.distance(pieces[k].start)))
            .filter(|&(_, d)| d <= join)
            .min_by(|a, b| a.1.total_cmp(&b.1));
        if let Some((k, d)) = nearest {
            if pred[k].is_none_or(|(_, best)| d < best) {
                pred[k] = Some((j, d));
            }
        }
    }
    let mut succ = vec![None; n];
    for (k, p) in pred.iter().enumerate() {
        if let Some((j, _)) = *p {
            succ[j] = Some(k);
        }
    }

    let walk = |start: usize| {
        let mut chain = vec![start];
        let mut current = start;
        while let Some(next) = succ[current] {
            if next == start || chain.len() > n {
                break;
            }
            chain.push(next);
            current = next;
        }
        chain
    };

    let starts: Vec<usize> = (0..n).filter(|&k| pred[k].is_none()).collect();
    if starts.is_empty() {
        let chain = walk(0);
        if chain.len() != n {
            return Err(VoronoiError::Internal(format!("edges of cell {} form several loops", id)));
        }
        return Ok(Outline::Closed(chain));
    }

    let chains: Vec<Vec<usize>> = starts.into_iter().map(walk).collect();
    let covered: usize = chains.iter().map(Vec::len).sum();
    if covered != n {
        return Err(VoronoiError::Internal(format!(
            "cell {} mixes a closed loop with open chains ({} of {} edges chained)",
            id, covered, n
        )));
    }
    Ok(Outline::Open(chains))
}

/// Counter-clockwise distance along the perimeter from `from` to `to`.
fn ccw_distance(from: f64, to: f64, perimeter: f64, tol: f64) -> f64 {
    let d = (to - from).rem_euclid(perimeter);
    if d > perimeter - tol { 0.0 } else { d }
}

/// Walls from `from` to `to` running counter-clockwise along the box.
fn border_walk(from: (Point, f64), to: Point, length: f64, bounds: &BoundingBox, tol: f64, eps: f64) -> Vec<Piece> {
    let (start, s) = from;
    let perimeter = bounds.perimeter();
    let corners = bounds.corners();

    let mut stops: Vec<(f64, Point)> = bounds
        .corner_positions()
        .iter()
        .zip(corners)
        .map(|(&c, corner)| ((c - s).rem_euclid(perimeter), corner))
        .filter(|&(offset, _)| offset > tol && offset < length - tol)
        .collect();
    stops.sort_by(|a, b| a.0.total_cmp(&b.0));
    stops.insert(0, (0.0, start));
    stops.push((length, to));

    stops
        .windows(2)
        .filter(|w| w[0].1.distance(w[1].1) > eps)
        .map(|w| Piece {
            start: w[0].1,
            end: w[1].1,
            neighbor: bounds.side_at(s + 0.5 * (w[0].0 + w[1].0)),
            edge: None,
        })
        .collect()
}

fn assemble_site(id: usize, site: Point, pieces: Vec<Piece>, bounds: &BoundingBox, eps: f64) -> Result<Assembled> {
    if pieces.is_empty() {
        return Ok(Assembled::empty(id, site));
    }
    let tol = eps * JOIN_FACTOR;

    let ordered = match chain_pieces(id, &pieces, tol)? {
        Outline::Closed(order) => order.into_iter().map(|k| pieces[k]).collect(),
        Outline::Open(chains) => {
            let perimeter = bounds.perimeter();
            let on_boundary = |p: Point| {
                bounds.perimeter_position(p, tol).ok_or_else(|| {
                    VoronoiError::Internal(format!(
                        "cell {} has an open end at ({}, {}) inside the box",
                        id, p.x, p.y
                    ))
                })
            };

            // (chain, start position, end position) sorted along the perimeter.
            let mut ends = Vec::with_capacity(chains.len());
            for chain in &chains {
                let first = pieces[chain[0]].start;
                let last = pieces[chain[chain.len() - 1]].end;
                ends.push((chain, on_boundary(first)?, on_boundary(last)?));
            }
            ends.sort_by(|a, b| a.1.total_cmp(&b.1));

            let mut visited = vec![false; ends.len()];
            let mut ordered = Vec::with_capacity(pieces.len() + 4);
            let mut current = 0;
            visited[0] = true;
            loop {
                let (chain, _, s_end) = ends[current];
                ordered.extend(chain.iter().map(|&k| pieces[k]));

                let next = (0..ends.len())
                    .filter(|&c| !visited[c])
                    .min_by(|&a, &b| {
                        ccw_distance(s_end, ends[a].1, perimeter, tol)
                            .total_cmp(&ccw_distance(s_end, ends[b].1, perimeter, tol))
                    })
                    .unwrap_or(0);
                let from = pieces[chain[chain.len() - 1]].end;
                let to = pieces[ends[next].0[0]].start;
                let length = ccw_distance(s_end, ends[next].1, perimeter, tol);
                ordered.extend(border_walk((from, s_end), to, length, bounds, tol, eps));

                if next == 0 {
                    break;
                }
                visited[next] = true;
                current = next;
            }
            ordered
        }
    };

    finish(id, site, ordered, bounds, eps)
}

/// Cleans the ordered pieces up and turns them into a cell.
fn finish(id: usize, site: Point, mut pieces: Vec<Piece>, bounds: &BoundingBox, eps: f64) -> Result<Assembled> {
    let mut k = 0;
    while pieces.len() > 2 && k < pieces.len() {
        let next = (k + 1) % pieces.len();
        if pieces[k].start.approx_eq(pieces[next].start, eps) {
            pieces.remove(k);
        } else {
            k += 1;
        }
    }

    // Start at the lowest vertex, leftmost on ties.
    if let Some(first) = (0..pieces.len()).min_by(|&a, &b| {
        let (pa, pb) = (pieces[a].start, pieces[b].start);
        pa.y.total_cmp(&pb.y).then(pa.x.total_cmp(&pb.x))
    }) {
        pieces.rotate_left(first);
    }

    let vertices: Vec<f64> = pieces.iter().flat_map(|p| [p.start.x, p.start.y]).collect();
    let area = signed_area(&vertices);
    let min_area = MIN_AREA_FRACTION * bounds.area();
    if pieces.len() < 3 || area.abs() <= min_area {
        return Ok(Assembled::empty(id, site));
    }
    if area < 0.0 {
        return Err(VoronoiError::Internal(format!("cell {} winds clockwise (area {})", id, area)));
    }
    let Ok(centroid) = polygon_centroid(&vertices) else {
        return Ok(Assembled::empty(id, site));
    };

    let borders = pieces
        .iter()
        .filter(|p| p.edge.is_none())
        .map(|p| Edge::border(id, p.neighbor, p.start, p.end))
        .collect();
    let cell = Cell2D {
        id,
        site: site.into(),
        vertices,
        edge_neighbors: pieces.iter().map(|p| p.neighbor).collect(),
        edges: Vec::new(),
        centroid: Some(centroid),
    };
    Ok(Assembled { cell, edges: pieces.iter().map(|p| p.edge).collect(), borders })
}
