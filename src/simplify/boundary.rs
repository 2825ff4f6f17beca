// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Outline extraction for a set of coplanar 2D triangles
//!
//! Every triangle covers an arc of directions around each of its corners.
//! A vertex whose merged arcs cover the full circle sits inside the patch;
//! any other vertex lies on the outline, and the outline leaves it along the
//! edges that border the uncovered directions.

use crate::geometry::vector::{angle_between, midpoint2};
use crate::geometry::{Line, PointKey2, Shape, Triangle2, Vec2};
use crate::utils::math::{angular_distance, normalize_angle, ANGLE_EPSILON};
use ahash::{AHashMap, AHashSet};
use std::f64::consts::TAU;
use tracing::trace;

/// Outline of a patch
#[derive(Debug, Clone, Default)]
pub struct Boundary {
    /// One walk per connected run of outline edges
    pub shapes: Vec<Shape>,
    /// Vertices with uncovered directions, in first-seen order
    pub boundary_vertices: Vec<Vec2>,
    /// Vertices surrounded on every side
    pub interior_vertices: Vec<Vec2>,
}

impl Boundary {
    /// True when there is at least one loop and every loop is closed
    pub fn is_closed(&self) -> bool {
        !self.shapes.is_empty() && self.shapes.iter().all(Shape::is_closed)
    }

    pub fn edges(&self) -> impl Iterator<Item = &Line> {
        self.shapes.iter().flat_map(|shape| shape.lines().iter())
    }

    pub fn edge_count(&self) -> usize {
        self.shapes.iter().map(Shape::len).sum()
    }
}

/// Per-vertex directional bookkeeping
#[derive(Debug, Default)]
struct Coverage {
    arcs: Vec<(f64, f64)>,
    neighbours: Vec<(f64, usize)>,
}

impl Coverage {
    /// Record the wedge a triangle occupies at this vertex
    fn add_wedge(&mut self, origin: &Vec2, first: (usize, &Vec2), second: (usize, &Vec2)) {
        let first_angle = angle_between(origin, first.1);
        let second_angle = angle_between(origin, second.1);
        let middle = angle_between(origin, &midpoint2(first.1, second.1));

        let low = first_angle.min(second_angle);
        let high = first_angle.max(second_angle);

        if low < middle && middle < high {
            self.arcs.push((low, high));
        } else {
            // the wedge contains direction zero
            self.arcs.push((0.0, low));
            self.arcs.push((high, TAU));
        }

        self.neighbours.push((first_angle, first.0));
        self.neighbours.push((second_angle, second.0));
    }

    /// Sort the arcs and fuse the ones that overlap or touch
    fn merged_arcs(&self) -> Vec<(f64, f64)> {
        let mut arcs = self.arcs.clone();
        arcs.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.total_cmp(&b.1)));

        let mut merged: Vec<(f64, f64)> = Vec::with_capacity(arcs.len());
        for arc in arcs {
            match merged.last_mut() {
                Some(last) if arc.0 <= last.1 + ANGLE_EPSILON => last.1 = last.1.max(arc.1),
                _ => merged.push(arc),
            }
        }
        merged
    }
}

/// Directions in which the merged coverage has a gap, empty for full coverage
fn gap_directions(merged: &[(f64, f64)]) -> Vec<f64> {
    let (Some(first), Some(last)) = (merged.first(), merged.last()) else {
        return Vec::new();
    };

    let mut directions = Vec::new();
    for pair in merged.windows(2) {
        directions.push(pair[0].1);
        directions.push(pair[1].0);
    }

    // gap through direction zero
    if last.1 < first.0 + TAU - ANGLE_EPSILON {
        directions.push(last.1);
        directions.push(first.0);
    }

    directions.into_iter().map(normalize_angle).collect()
}

/// Exact-key vertex interning
#[derive(Debug, Default)]
struct VertexTable {
    points: Vec<Vec2>,
    index: AHashMap<PointKey2, usize>,
}

impl VertexTable {
    fn intern(&mut self, point: &Vec2) -> usize {
        let points = &mut self.points;
        *self.index.entry(PointKey2::new(point)).or_insert_with(|| {
            points.push(*point);
            points.len() - 1
        })
    }
}

/// Extract the outline loops of the union of `triangles`
pub fn extract_boundary(triangles: &[Triangle2]) -> Boundary {
    let mut table = VertexTable::default();
    let mut coverage: Vec<Coverage> = Vec::new();

    for triangle in triangles {
        let ids = triangle.points.map(|point| table.intern(&point));
        if ids[0] == ids[1] || ids[1] == ids[2] || ids[0] == ids[2] {
            continue;
        }
        coverage.resize_with(table.points.len(), Coverage::default);

        for corner in 0..3 {
            let vertex = ids[corner];
            let first = ids[(corner + 1) % 3];
            let second = ids[(corner + 2) % 3];
            coverage[vertex].add_wedge(
                &table.points[vertex],
                (first, &table.points[first]),
                (second, &table.points[second]),
            );
        }
    }
    coverage.resize_with(table.points.len(), Coverage::default);

    let mut boundary = Boundary::default();
    let mut directions: Vec<Vec<f64>> = Vec::with_capacity(coverage.len());
    let mut on_boundary = vec![false; coverage.len()];

    for (vertex, cover) in coverage.iter().enumerate() {
        let gaps = gap_directions(&cover.merged_arcs());
        if gaps.is_empty() && !cover.arcs.is_empty() {
            boundary.interior_vertices.push(table.points[vertex]);
        } else if !cover.arcs.is_empty() {
            on_boundary[vertex] = true;
            boundary.boundary_vertices.push(table.points[vertex]);
        }
        directions.push(gaps);
    }

    let mut seen: AHashSet<(usize, usize)> = AHashSet::new();
    let mut lines = Vec::new();
    for (vertex, cover) in coverage.iter().enumerate() {
        if !on_boundary[vertex] {
            continue;
        }
        for direction in &directions[vertex] {
            for (angle, neighbour) in &cover.neighbours {
                if !on_boundary[*neighbour] || angular_distance(*angle, *direction) >= ANGLE_EPSILON {
                    continue;
                }
                let key = (vertex.min(*neighbour), vertex.max(*neighbour));
                if seen.insert(key) {
                    lines.push(Line::new(table.points[vertex], table.points[*neighbour]));
                }
            }
        }
    }

    lines.retain(|line| !line.is_zero_length());
    merge_collinear(&mut lines);
    boundary.shapes = walk_loops(&lines);

    trace!(
        vertices = table.points.len(),
        interior = boundary.interior_vertices.len(),
        loops = boundary.shapes.len(),
        "extracted boundary"
    );
    boundary
}

/// Endpoint shared by two lines
fn shared_point(a: &Line, b: &Line) -> Option<Vec2> {
    if b.has_endpoint(&a.start) {
        Some(a.start)
    } else if b.has_endpoint(&a.end) {
        Some(a.end)
    } else {
        None
    }
}

/// Replace straight continuations through degree-two vertices by one line
pub fn merge_collinear(lines: &mut Vec<Line>) {
    loop {
        let mut degree: AHashMap<PointKey2, usize> = AHashMap::new();
        for line in lines.iter() {
            *degree.entry(PointKey2::new(&line.start)).or_insert(0) += 1;
            *degree.entry(PointKey2::new(&line.end)).or_insert(0) += 1;
        }

        let mut fused = None;
        'search: for i in 0..lines.len() {
            for j in (i + 1)..lines.len() {
                if !lines[i].can_merge(&lines[j]) {
                    continue;
                }
                let Some(pivot) = shared_point(&lines[i], &lines[j]) else {
                    continue;
                };
                if degree.get(&PointKey2::new(&pivot)) != Some(&2) {
                    continue;
                }
                let (Some(ahead), Some(behind)) =
                    (lines[i].other_endpoint(&pivot), lines[j].other_endpoint(&pivot))
                else {
                    continue;
                };
                // lines folding back over each other are not a continuation
                if (ahead - pivot).dot(&(behind - pivot)) < 0.0 {
                    fused = Some((i, j));
                    break 'search;
                }
            }
        }

        match fused {
            Some((i, j)) => {
                lines[i] = lines[i].merged_with(&lines[j]);
                lines.remove(j);
            }
            None => break,
        }
    }
}

/// Chain undirected lines into oriented walks, consuming each line once
pub fn walk_loops(lines: &[Line]) -> Vec<Shape> {
    let mut used = vec![false; lines.len()];
    let mut shapes = Vec::new();

    while let Some(first) = used.iter().position(|taken| !taken) {
        used[first] = true;
        let start = lines[first].start;
        let mut tail = lines[first].end;
        let mut walk = vec![lines[first]];

        while tail != start {
            let next = (0..lines.len()).find(|&k| !used[k] && lines[k].has_endpoint(&tail));
            let Some(k) = next else {
                break;
            };
            used[k] = true;
            let oriented = if lines[k].start == tail {
                lines[k]
            } else {
                lines[k].reversed()
            };
            tail = oriented.end;
            walk.push(oriented);
        }

        shapes.push(Shape::new(walk));
    }

    shapes
}
