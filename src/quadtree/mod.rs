use crate::Point;
use arrayvec::ArrayVec;
use std::fmt;


/// One of the four directional partitions of the plane around a reference
/// point. The discriminants are the child slot indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quadrant {
    TopLeft = 0,
    TopRight = 1,
    BottomRight = 2,
    BottomLeft = 3,
}

impl Quadrant {
    pub const ALL: [Quadrant; 4] = [
        Quadrant::TopLeft,
        Quadrant::TopRight,
        Quadrant::BottomRight,
        Quadrant::BottomLeft,
    ];

    /// Quadrant of `p` relative to `reference`.
    /// Ties resolve toward the top and the right.
    pub fn of(p: &Point, reference: &Point) -> Self {
        if p[1] >= reference[1] {
            if p[0] >= reference[0] {
                Quadrant::TopRight
            } else {
                Quadrant::TopLeft
            }
        } else if p[0] >= reference[0] {
            Quadrant::BottomRight
        } else {
            Quadrant::BottomLeft
        }
    }

    /// The diagonally opposite quadrant.
    pub fn conjugate(self) -> Self {
        Quadrant::ALL[(self.index() + 2) % 4]
    }

    /// The two quadrants sharing an axis with `self`, clockwise first.
    pub fn adjacent(self) -> [Quadrant; 2] {
        [
            Quadrant::ALL[(self.index() + 1) % 4],
            Quadrant::ALL[(self.index() + 3) % 4],
        ]
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Point quadtree node; a tree is its root node.
///
/// Each node owns up to four children, one per quadrant relative to its own
/// point. Insertion order determines the shape; the tree is not rebalanced.
#[derive(Debug, Clone, Default)]
pub struct Quadtree {
    point: Option<Point>,
    children: [Option<Box<Quadtree>>; 4],
}

impl Quadtree {
    pub fn new() -> Self {
        Self {
            point: None,
            children: Default::default(),
        }
    }

    pub fn with_point(point: Point) -> Self {
        Self {
            point: Some(point),
            children: Default::default(),
        }
    }

    /// A node without a point is empty; an empty node never has children.
    pub fn is_empty(&self) -> bool {
        self.point.is_none()
    }

    pub fn point(&self) -> Option<&Point> {
        self.point.as_ref()
    }

    /// Insert a point. Inserting a point already in the tree is a no-op.
    pub fn insert(&mut self, point: Point) {
        self.insert_subtree(Quadtree::with_point(point));
    }

    /// Attach a whole prebuilt subtree. An empty node adopts it wholesale; a
    /// collision with an occupied slot merges recursively. Restructuring moves
    /// subtrees through here so they are never flattened on the way.
    pub fn insert_subtree(&mut self, subtree: Quadtree) {
        let anchor = match self.point {
            Some(anchor) => anchor,
            None => {
                *self = subtree;
                return;
            }
        };
        let point = match subtree.point {
            Some(point) => point,
            None => return,
        };
        if point == anchor {
            return;
        }
        let slot = &mut self.children[Quadrant::of(&point, &anchor).index()];
        match slot {
            Some(child) => child.insert_subtree(subtree),
            None => *slot = Some(Box::new(subtree)),
        }
    }

    /// Find the node holding `point`, descending one quadrant per level.
    pub fn search(&self, point: &Point) -> Option<&Quadtree> {
        let anchor = self.point.as_ref()?;
        if anchor == point {
            return Some(self);
        }
        self.child(Quadrant::of(point, anchor))?.search(point)
    }

    /// Points of all descendant nodes: direct children in quadrant order
    /// TL, TR, BR, BL, then each child's own listing in the same order.
    /// Reinserting in this exact order reproduces the rebuilt shape, so the
    /// order is part of the contract.
    pub fn collect_points(&self) -> Vec<Point> {
        let mut points = Vec::new();
        self.collect_into(&mut points);
        points
    }

    fn collect_into(&self, out: &mut Vec<Point>) {
        for child in self.children.iter().flatten() {
            if let Some(point) = child.point {
                out.push(point);
            }
        }
        for child in self.children.iter().flatten() {
            child.collect_into(out);
        }
    }

    /// Remove `point` by flattening the subtree rooted at its node and
    /// rebuilding it through sequential reinsertion. No-op when absent.
    pub fn delete_full(&mut self, point: &Point) {
        let anchor = match self.point {
            Some(anchor) => anchor,
            None => return,
        };
        if anchor == *point {
            let points = self.collect_points();
            *self = Quadtree::new();
            for point in points {
                self.insert(point);
            }
        } else {
            let slot = Quadrant::of(point, &anchor).index();
            let mut emptied = false;
            if let Some(child) = &mut self.children[slot] {
                child.delete_full(point);
                emptied = child.is_empty();
            }
            if emptied {
                self.children[slot] = None;
            }
        }
    }

    /// Remove `point`, relocating only the subtrees that fall in the
    /// crosshatch region between the removed point and its replacement.
    /// No-op when absent.
    pub fn delete_partial(&mut self, point: &Point) {
        let anchor = match self.point {
            Some(anchor) => anchor,
            None => return,
        };
        if anchor == *point {
            if !self.has_children() {
                *self = Quadtree::new();
                return;
            }
            let (selected, candidate) = match self.select_replacement(point) {
                Some(selection) => selection,
                None => return,
            };
            // crosshatched subtrees under the flanking quadrants come out first
            let mut displaced = Vec::new();
            for adj in selected.adjacent().iter() {
                detach_crosshatched(
                    &mut self.children[adj.index()],
                    point,
                    &candidate,
                    &mut displaced,
                );
            }
            // promote along the candidate's chain, rewiring what it displaces
            // into this node's matching slots
            if let Some(mut chain) = self.children[selected.index()].take() {
                chain.promote_into(selected, &mut self.children, point, &candidate);
                self.children[selected.index()] = Some(chain);
            }
            // hoist the candidate out of its pruned subtree and take its place
            self.delete_full(&candidate);
            self.point = Some(candidate);
            for subtree in displaced {
                self.insert_subtree(subtree);
            }
        } else {
            let slot = Quadrant::of(point, &anchor).index();
            let mut emptied = false;
            if let Some(child) = &mut self.children[slot] {
                child.delete_partial(point);
                emptied = child.is_empty();
            }
            if emptied {
                self.children[slot] = None;
            }
        }
    }

    fn child(&self, q: Quadrant) -> Option<&Quadtree> {
        self.children[q.index()].as_deref()
    }

    fn has_children(&self) -> bool {
        self.children.iter().any(|child| child.is_some())
    }

    /// Terminal node of the chain that starts at `self` and repeatedly
    /// descends into the conjugate of `q`. Its point is the replacement
    /// candidate contributed by quadrant `q`.
    fn find_candidate(&self, q: Quadrant) -> &Quadtree {
        match self.child(q.conjugate()) {
            Some(child) => child.find_candidate(q),
            None => self,
        }
    }

    /// Candidate point per quadrant. A quadrant without a child contributes
    /// no candidate; `None` here loses every later comparison, so it can
    /// never be selected while a real candidate exists.
    fn candidates(&self) -> [Option<Point>; 4] {
        let mut candidates = [None; 4];
        for (i, q) in Quadrant::ALL.iter().enumerate() {
            if let Some(child) = self.child(*q) {
                candidates[i] = child.find_candidate(*q).point;
            }
        }
        candidates
    }

    /// Pick the quadrant whose candidate replaces the removed point: the
    /// single qualified candidate if there is exactly one, otherwise the
    /// qualified candidate closest to `deleted` in L1 distance, otherwise the
    /// closest candidate overall. Ties go to the first quadrant in
    /// TL, TR, BR, BL order.
    fn select_replacement(&self, deleted: &Point) -> Option<(Quadrant, Point)> {
        let candidates = self.candidates();
        let qualified = qualified_candidates(&candidates);
        let count = qualified.iter().filter(|q| **q).count();
        if count == 1 {
            for (i, q) in Quadrant::ALL.iter().enumerate() {
                if qualified[i] {
                    return candidates[i].map(|candidate| (*q, candidate));
                }
            }
        }
        let mut best: Option<(Quadrant, Point, f64)> = None;
        for (i, q) in Quadrant::ALL.iter().enumerate() {
            if count > 1 && !qualified[i] {
                continue;
            }
            let candidate = match candidates[i] {
                Some(candidate) => candidate,
                None => continue,
            };
            let dist = candidate.l1_dist(deleted);
            if best.map_or(true, |(_, _, d)| dist < d) {
                best = Some((*q, candidate, dist));
            }
        }
        best.map(|(q, candidate, _)| (q, candidate))
    }

    /// Walk the conjugate chain below the selected child. At every chain node
    /// the two quadrants flanking the chain are swept for crosshatched
    /// subtrees, and each detached subtree is re-attached into `dest` (the
    /// removed node's children) at the same quadrant, merging when the slot is
    /// already occupied.
    fn promote_into(
        &mut self,
        selected: Quadrant,
        dest: &mut [Option<Box<Quadtree>>; 4],
        deleted: &Point,
        candidate: &Point,
    ) {
        for adj in selected.adjacent().iter() {
            let mut displaced = Vec::new();
            detach_crosshatched(
                &mut self.children[adj.index()],
                deleted,
                candidate,
                &mut displaced,
            );
            for subtree in displaced {
                match &mut dest[adj.index()] {
                    Some(existing) => existing.insert_subtree(subtree),
                    slot => *slot = Some(Box::new(subtree)),
                }
            }
        }
        if let Some(next) = self.children[selected.conjugate().index()].as_deref_mut() {
            next.promote_into(selected, dest, deleted, candidate);
        }
    }
}

/// Whether `point` lies in the crosshatch region between the removed point
/// and its replacement: the open horizontal band between their y coordinates
/// joined with the open vertical band between their x coordinates. Bounds are
/// exclusive, so neither endpoint is ever in its own region.
fn in_crosshatch(point: &Point, deleted: &Point, candidate: &Point) -> bool {
    let top = deleted[1].max(candidate[1]);
    let bottom = deleted[1].min(candidate[1]);
    let right = deleted[0].max(candidate[0]);
    let left = deleted[0].min(candidate[0]);
    (bottom < point[1] && point[1] < top) || (left < point[0] && point[0] < right)
}

/// Detach every subtree under `slot` whose root point falls in the crosshatch
/// region, collecting them whole. A subtree whose root is in the region comes
/// out as one unit; otherwise only the quadrants that can still reach the
/// region are inspected.
fn detach_crosshatched(
    slot: &mut Option<Box<Quadtree>>,
    deleted: &Point,
    candidate: &Point,
    out: &mut Vec<Quadtree>,
) {
    let node = match slot {
        Some(node) => node,
        None => return,
    };
    let point = match node.point {
        Some(point) => point,
        None => return,
    };
    if in_crosshatch(&point, deleted, candidate) {
        if let Some(subtree) = slot.take() {
            out.push(*subtree);
        }
    } else {
        for q in susceptible_quadrants(&point, deleted, candidate) {
            detach_crosshatched(&mut node.children[q.index()], deleted, candidate, out);
        }
    }
}

/// Child quadrants of a node outside the region that may still hold
/// crosshatched points: everything except the direction from the removed
/// point toward the replacement and the direction from the removed point
/// toward the node itself.
fn susceptible_quadrants(
    node_point: &Point,
    deleted: &Point,
    candidate: &Point,
) -> ArrayVec<[Quadrant; 4]> {
    let toward_candidate = Quadrant::of(candidate, deleted);
    let toward_node = Quadrant::of(node_point, deleted);
    Quadrant::ALL
        .iter()
        .copied()
        .filter(|q| *q != toward_candidate && *q != toward_node)
        .collect()
}

/// A candidate qualifies when it wins both ordering comparisons against its
/// axis neighbours; such a candidate can take the removed point's place
/// without restructuring its own quadrant.
fn qualified_candidates(candidates: &[Option<Point>; 4]) -> [bool; 4] {
    let lt = |a: f64, b: f64| a < b;
    let gt = |a: f64, b: f64| a > b;
    let tl = &candidates[Quadrant::TopLeft.index()];
    let tr = &candidates[Quadrant::TopRight.index()];
    let br = &candidates[Quadrant::BottomRight.index()];
    let bl = &candidates[Quadrant::BottomLeft.index()];
    [
        outranks(tl, tr, 1, lt) && outranks(tl, bl, 0, gt),
        outranks(tr, tl, 1, lt) && outranks(tr, br, 0, lt),
        outranks(br, bl, 1, gt) && outranks(br, tr, 0, lt),
        outranks(bl, br, 1, gt) && outranks(bl, tl, 0, gt),
    ]
}

// a present candidate beats a missing neighbour; a missing candidate loses
fn outranks(
    candidate: &Option<Point>,
    neighbour: &Option<Point>,
    axis: usize,
    cmp: fn(f64, f64) -> bool,
) -> bool {
    match (candidate, neighbour) {
        (Some(c), Some(n)) => cmp(c[axis], n[axis]),
        (Some(_), None) => true,
        (None, _) => false,
    }
}

impl fmt::Display for Quadtree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let point = match &self.point {
            Some(point) => point,
            None => return write!(f, "None"),
        };
        write!(f, "{}: (", point)?;
        for (i, child) in self.children.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            match child {
                Some(child) => write!(f, "{}", child)?,
                None => write!(f, "None")?,
            }
        }
        write!(f, ")")
    }
}
