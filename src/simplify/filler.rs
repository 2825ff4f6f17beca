// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Re-triangulation of the region enclosed by outline loops

use crate::geometry::{point_in_polygon, Line, PointKey2, Shape, Triangle2, Vec2};
use ahash::{AHashMap, AHashSet};
use tracing::trace;

/// Edge graph over the distinct outline vertices
struct EdgeGraph {
    points: Vec<Vec2>,
    edges: Vec<(usize, usize)>,
    adjacency: AHashSet<(usize, usize)>,
}

impl EdgeGraph {
    fn from_shapes(shapes: &[Shape]) -> Self {
        let mut graph = Self {
            points: Vec::new(),
            edges: Vec::new(),
            adjacency: AHashSet::new(),
        };
        let mut index: AHashMap<PointKey2, usize> = AHashMap::new();

        for line in shapes.iter().flat_map(|shape| shape.lines()) {
            let mut intern = |point: &Vec2| {
                *index.entry(PointKey2::new(point)).or_insert_with(|| {
                    graph.points.push(*point);
                    graph.points.len() - 1
                })
            };
            let a = intern(&line.start);
            let b = intern(&line.end);
            if a != b {
                graph.connect(a, b);
            }
        }
        graph
    }

    fn connected(&self, a: usize, b: usize) -> bool {
        self.adjacency.contains(&(a.min(b), a.max(b)))
    }

    fn connect(&mut self, a: usize, b: usize) {
        if self.adjacency.insert((a.min(b), a.max(b))) {
            self.edges.push((a, b));
        }
    }

    fn line(&self, edge: (usize, usize)) -> Line {
        Line::new(self.points[edge.0], self.points[edge.1])
    }

    /// Whether segment `a-b` crosses or touches an edge not incident to it
    fn blocked(&self, a: usize, b: usize) -> bool {
        let candidate = self.line((a, b));
        self.edges
            .iter()
            .filter(|(p, q)| *p != a && *p != b && *q != a && *q != b)
            .any(|&edge| candidate.intersection_point(&self.line(edge)).is_some())
    }
}

/// Triangulate the area enclosed by `shapes`.
///
/// Vertex pairs are tried in order; a pair becomes an interior edge when its
/// midpoint lies inside the outline and it crosses no existing edge. Every
/// 3-cycle of the resulting graph that lies inside the outline and encloses
/// no other vertex is a triangle.
pub fn fill(shapes: &[Shape]) -> Vec<Triangle2> {
    let mut graph = EdgeGraph::from_shapes(shapes);
    let outline: Vec<Line> = graph.edges.iter().map(|&edge| graph.line(edge)).collect();
    let count = graph.points.len();

    for i in 0..count {
        for j in (i + 1)..count {
            if graph.connected(i, j) {
                continue;
            }
            let midpoint = graph.line((i, j)).midpoint();
            if point_in_polygon(&outline, &midpoint) && !graph.blocked(i, j) {
                graph.connect(i, j);
            }
        }
    }

    let mut neighbours: Vec<Vec<usize>> = vec![Vec::new(); count];
    for &(a, b) in &graph.edges {
        neighbours[a].push(b);
        neighbours[b].push(a);
    }
    for list in &mut neighbours {
        list.sort_unstable();
    }

    let mut triangles = Vec::new();
    for a in 0..count {
        for &b in neighbours[a].iter().filter(|&&b| b > a) {
            for &c in neighbours[b].iter().filter(|&&c| c > b) {
                if !graph.connected(a, c) {
                    continue;
                }
                let triangle = Triangle2::new(graph.points[a], graph.points[b], graph.points[c]);
                // a hole bounded by three edges is a 3-cycle too
                if triangle.is_degenerate() || !point_in_polygon(&outline, &triangle.centroid()) {
                    continue;
                }
                let encloses_vertex = graph
                    .points
                    .iter()
                    .enumerate()
                    .any(|(k, point)| k != a && k != b && k != c && triangle.strictly_contains(point));
                if !encloses_vertex {
                    triangles.push(triangle);
                }
            }
        }
    }

    trace!(
        vertices = count,
        edges = graph.edges.len(),
        triangles = triangles.len(),
        "filled outline"
    );
    triangles
}
