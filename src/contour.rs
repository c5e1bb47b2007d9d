//! Isolines of a gridded scalar field using the marching squares algorithm.
//!
//! Contours are found in grid index space. A point on an isoline has fractional indices, `i` along
//! a row and `j` across rows, and it is up to the caller to map those back to physical
//! coordinates. Cells with a missing corner value are skipped, so isolines stop at holes in the
//! data.
use optional::Optioned;
use std::collections::HashMap;

/// A regular 2D grid of values stored row by row.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarGrid {
    nx: usize,
    ny: usize,
    values: Vec<Optioned<f64>>,
}

impl ScalarGrid {
    /// Create a grid with `nx` values per row and `ny` rows. Returns `None` if the number of values
    /// doesn't match.
    pub fn new(nx: usize, ny: usize, values: Vec<Optioned<f64>>) -> Option<Self> {
        if nx.checked_mul(ny)? != values.len() {
            return None;
        }
        Some(ScalarGrid { nx, ny, values })
    }

    /// Number of values per row.
    #[inline]
    pub fn nx(&self) -> usize {
        self.nx
    }

    /// Number of rows.
    #[inline]
    pub fn ny(&self) -> usize {
        self.ny
    }

    /// Value at column `i` of row `j`.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        if i < self.nx && j < self.ny {
            self.values[j * self.nx + i].into_option()
        } else {
            None
        }
    }
}

/// A position in grid index space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridPoint {
    /// Fractional column index.
    pub i: f64,
    /// Fractional row index.
    pub j: f64,
}

/// A connected piece of an isoline.
#[derive(Debug, Clone, PartialEq)]
pub struct Isoline {
    /// The contoured value.
    pub level: f64,
    /// Points along the line in order.
    pub points: Vec<GridPoint>,
    /// The line is a loop, the first and last points are the same.
    pub closed: bool,
}

// Horizontal(i, j) joins nodes (i, j) and (i + 1, j), Vertical(i, j) joins (i, j) and (i, j + 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Edge {
    Horizontal(usize, usize),
    Vertical(usize, usize),
}

type Segment = (Edge, Edge);

/// Find all the isolines of `level` in the grid.
pub fn isolines(grid: &ScalarGrid, level: f64) -> Vec<Isoline> {
    let (segments, crossings) = march_squares(grid, level);
    connect_segments(&segments)
        .into_iter()
        .map(|(edges, closed)| Isoline {
            level,
            points: edges
                .iter()
                .filter_map(|edge| crossings.get(edge).copied())
                .collect(),
            closed,
        })
        .filter(|line| line.points.len() >= 2)
        .collect()
}

fn march_squares(grid: &ScalarGrid, level: f64) -> (Vec<Segment>, HashMap<Edge, GridPoint>) {
    let mut segments = Vec::new();
    let mut crossings = HashMap::new();

    if grid.nx < 2 || grid.ny < 2 {
        return (segments, crossings);
    }

    for j in 0..(grid.ny - 1) {
        for i in 0..(grid.nx - 1) {
            // Corners counter clockwise from (i, j)
            let corners = match (
                grid.get(i, j),
                grid.get(i + 1, j),
                grid.get(i + 1, j + 1),
                grid.get(i, j + 1),
            ) {
                (Some(a), Some(b), Some(c), Some(d)) => [a, b, c, d],
                _ => continue,
            };

            let mut case = 0u8;
            for (bit, &val) in corners.iter().enumerate() {
                if val >= level {
                    case |= 1 << bit;
                }
            }
            if case == 0 || case == 15 {
                continue;
            }

            let [a, b, c, d] = corners;
            let bottom = Edge::Horizontal(i, j);
            let right = Edge::Vertical(i + 1, j);
            let top = Edge::Horizontal(i, j + 1);
            let left = Edge::Vertical(i, j);

            let edges = [
                (bottom, a, b, (i, j), (i + 1, j)),
                (right, b, c, (i + 1, j), (i + 1, j + 1)),
                (top, d, c, (i, j + 1), (i + 1, j + 1)),
                (left, a, d, (i, j), (i, j + 1)),
            ];

            let mut crossed: Vec<Edge> = Vec::with_capacity(4);
            for &(edge, v0, v1, n0, n1) in edges.iter() {
                if (v0 >= level) != (v1 >= level) {
                    crossings
                        .entry(edge)
                        .or_insert_with(|| interpolate_edge(n0, n1, v0, v1, level));
                    crossed.push(edge);
                }
            }

            match case {
                // Saddles, resolve with the cell center.
                5 | 10 => {
                    let center_high = (a + b + c + d) / 4.0 >= level;
                    let a_high = case == 5;
                    if center_high == a_high {
                        // The high diagonal is connected, cut off the b and d corners.
                        segments.push((bottom, right));
                        segments.push((left, top));
                    } else {
                        // Cut off the a and c corners.
                        segments.push((left, bottom));
                        segments.push((right, top));
                    }
                }
                _ => {
                    debug_assert_eq!(crossed.len(), 2);
                    if let [e0, e1] = crossed.as_slice() {
                        segments.push((*e0, *e1));
                    }
                }
            }
        }
    }

    (segments, crossings)
}

fn interpolate_edge(
    n0: (usize, usize),
    n1: (usize, usize),
    v0: f64,
    v1: f64,
    level: f64,
) -> GridPoint {
    let t = ((level - v0) / (v1 - v0)).max(0.0).min(1.0);
    GridPoint {
        i: n0.0 as f64 + t * (n1.0 as f64 - n0.0 as f64),
        j: n0.1 as f64 + t * (n1.1 as f64 - n0.1 as f64),
    }
}

// Chain segments that share an edge into polylines. Open lines are traced from their loose ends
// first so they come out whole, whatever is left after that are loops.
fn connect_segments(segments: &[Segment]) -> Vec<(Vec<Edge>, bool)> {
    let mut by_edge: HashMap<Edge, Vec<usize>> = HashMap::with_capacity(segments.len() * 2);
    for (idx, &(e0, e1)) in segments.iter().enumerate() {
        by_edge.entry(e0).or_default().push(idx);
        by_edge.entry(e1).or_default().push(idx);
    }

    let mut used = vec![false; segments.len()];
    let mut lines = Vec::new();

    let is_loose_end = |edge: &Edge| by_edge.get(edge).map(|s| s.len() == 1).unwrap_or(false);

    for (idx, &(e0, e1)) in segments.iter().enumerate() {
        if used[idx] {
            continue;
        }
        let start = if is_loose_end(&e0) {
            e0
        } else if is_loose_end(&e1) {
            e1
        } else {
            continue;
        };
        lines.push((trace(segments, &by_edge, &mut used, idx, start), false));
    }

    for idx in 0..segments.len() {
        if used[idx] {
            continue;
        }
        let edges = trace(segments, &by_edge, &mut used, idx, segments[idx].0);
        let closed = edges.len() > 2 && edges.first() == edges.last();
        lines.push((edges, closed));
    }

    lines
}

fn trace(
    segments: &[Segment],
    by_edge: &HashMap<Edge, Vec<usize>>,
    used: &mut [bool],
    first: usize,
    start: Edge,
) -> Vec<Edge> {
    let mut edges = vec![start];
    let mut current_edge = start;
    let mut current = first;

    loop {
        used[current] = true;
        let (e0, e1) = segments[current];
        let next_edge = if e0 == current_edge { e1 } else { e0 };
        edges.push(next_edge);

        let next = by_edge
            .get(&next_edge)
            .and_then(|segs| segs.iter().copied().find(|&s| !used[s]));

        match next {
            Some(seg) => {
                current = seg;
                current_edge = next_edge;
            }
            None => break,
        }
    }

    edges
}
