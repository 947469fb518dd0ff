//! Arena-backed quadtree for Barnes–Hut force approximation.
//!
//! Points are node slot indices with coordinates looked up from the caller's
//! SoA buffers. Coincident points share a leaf. After [`QuadTree::accumulate`]
//! every cell carries the total charge of its points and their
//! charge-weighted centroid, so a distant cell can stand in for all of its
//! points at once.

/// Depth at which distinct-but-very-close points stop splitting and share
/// a leaf instead.
const MAX_DEPTH: usize = 48;

/// Axis-aligned square region of the plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl Extent {
    #[inline]
    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    /// Quadrant index (0 = top-left, 1 = top-right, 2 = bottom-left,
    /// 3 = bottom-right) containing a point, and that quadrant's extent.
    fn child(&self, x: f64, y: f64) -> (usize, Extent) {
        let xm = (self.x0 + self.x1) / 2.0;
        let ym = (self.y0 + self.y1) / 2.0;
        let right = x >= xm;
        let bottom = y >= ym;
        let extent = Extent {
            x0: if right { xm } else { self.x0 },
            y0: if bottom { ym } else { self.y0 },
            x1: if right { self.x1 } else { xm },
            y1: if bottom { self.y1 } else { ym },
        };
        (usize::from(right) | (usize::from(bottom) << 1), extent)
    }

    /// Extent of quadrant `k`.
    pub fn quadrant(&self, k: usize) -> Extent {
        let xm = (self.x0 + self.x1) / 2.0;
        let ym = (self.y0 + self.y1) / 2.0;
        let right = k & 1 != 0;
        let bottom = k & 2 != 0;
        Extent {
            x0: if right { xm } else { self.x0 },
            y0: if bottom { ym } else { self.y0 },
            x1: if right { self.x1 } else { xm },
            y1: if bottom { self.y1 } else { ym },
        }
    }
}

/// Contents of one cell.
#[derive(Debug, Clone)]
pub enum Cell {
    Empty,
    /// One or more coincident points.
    Leaf(Vec<usize>),
    /// Up to four child cells, indexed by quadrant.
    Branch([Option<usize>; 4]),
}

/// One quadtree cell plus its aggregated charge.
#[derive(Debug, Clone)]
pub struct Quad {
    pub cell: Cell,
    /// Sum of point charges below this cell.
    pub value: f64,
    /// Charge-weighted centroid (leaf: the shared point position).
    pub x: f64,
    pub y: f64,
}

impl Quad {
    fn new(cell: Cell) -> Self {
        Self {
            cell,
            value: 0.0,
            x: 0.0,
            y: 0.0,
        }
    }
}

pub struct QuadTree {
    quads: Vec<Quad>,
    extent: Extent,
}

impl QuadTree {
    /// Build a tree over every point in `xs`/`ys`.
    pub fn build(xs: &[f64], ys: &[f64]) -> Self {
        let extent = Self::cover(xs, ys);
        let mut tree = Self {
            quads: vec![Quad::new(Cell::Empty)],
            extent,
        };
        for i in 0..xs.len().min(ys.len()) {
            tree.insert(0, extent, i, 0, xs, ys);
        }
        tree
    }

    /// Smallest square (side at least 1) enclosing every point.
    fn cover(xs: &[f64], ys: &[f64]) -> Extent {
        let mut x0 = f64::INFINITY;
        let mut y0 = f64::INFINITY;
        let mut x1 = f64::NEG_INFINITY;
        let mut y1 = f64::NEG_INFINITY;
        for (&x, &y) in xs.iter().zip(ys) {
            x0 = x0.min(x);
            y0 = y0.min(y);
            x1 = x1.max(x);
            y1 = y1.max(y);
        }
        if !x0.is_finite() || !y0.is_finite() || !x1.is_finite() || !y1.is_finite() {
            return Extent {
                x0: 0.0,
                y0: 0.0,
                x1: 1.0,
                y1: 1.0,
            };
        }
        // Pad the far edge so the max point falls strictly inside.
        let side = (x1 - x0).max(y1 - y0).max(1.0) * (1.0 + 1e-9);
        Extent {
            x0,
            y0,
            x1: x0 + side,
            y1: y0 + side,
        }
    }

    fn insert(&mut self, q: usize, extent: Extent, i: usize, depth: usize, xs: &[f64], ys: &[f64]) {
        let (x, y) = (xs[i], ys[i]);
        let next = self.quads.len();
        match &mut self.quads[q].cell {
            Cell::Empty => {
                self.quads[q].cell = Cell::Leaf(vec![i]);
            }
            Cell::Branch(children) => {
                let (k, sub) = extent.child(x, y);
                match children[k] {
                    Some(child) => self.insert(child, sub, i, depth + 1, xs, ys),
                    None => {
                        children[k] = Some(next);
                        self.quads.push(Quad::new(Cell::Leaf(vec![i])));
                    }
                }
            }
            Cell::Leaf(points) => {
                let first = points[0];
                if (xs[first] == x && ys[first] == y) || depth >= MAX_DEPTH {
                    points.push(i);
                    return;
                }
                let existing = std::mem::take(points);
                self.quads[q].cell = Cell::Branch([None; 4]);
                for p in existing {
                    self.insert(q, extent, p, depth, xs, ys);
                }
                self.insert(q, extent, i, depth, xs, ys);
            }
        }
    }

    /// Compute every cell's total charge and weighted centroid, bottom-up.
    pub fn accumulate(&mut self, charges: &[f64], xs: &[f64], ys: &[f64]) {
        if !self.quads.is_empty() {
            self.accumulate_at(0, charges, xs, ys);
        }
    }

    fn accumulate_at(&mut self, q: usize, charges: &[f64], xs: &[f64], ys: &[f64]) {
        match &self.quads[q].cell {
            Cell::Empty => {}
            Cell::Leaf(points) => {
                let first = points[0];
                let value: f64 = points.iter().map(|&p| charges[p]).sum();
                let quad = &mut self.quads[q];
                quad.value = value;
                quad.x = xs[first];
                quad.y = ys[first];
            }
            Cell::Branch(children) => {
                let children = *children;
                let (mut value, mut weight, mut x, mut y) = (0.0, 0.0, 0.0, 0.0);
                for child in children.into_iter().flatten() {
                    self.accumulate_at(child, charges, xs, ys);
                    let c = &self.quads[child];
                    let w = c.value.abs();
                    if w > 0.0 {
                        value += c.value;
                        weight += w;
                        x += w * c.x;
                        y += w * c.y;
                    }
                }
                let quad = &mut self.quads[q];
                quad.value = value;
                if weight > 0.0 {
                    quad.x = x / weight;
                    quad.y = y / weight;
                }
            }
        }
    }

    /// Extent of the root cell.
    pub fn extent(&self) -> Extent {
        self.extent
    }

    /// Index of the root cell.
    pub fn root(&self) -> usize {
        0
    }

    pub fn quad(&self, q: usize) -> &Quad {
        &self.quads[q]
    }

    /// Number of cells, including empty ones.
    pub fn len(&self) -> usize {
        self.quads.len()
    }

    pub fn is_empty(&self) -> bool {
        matches!(self.quads[0].cell, Cell::Empty)
    }
}
