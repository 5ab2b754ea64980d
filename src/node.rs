//! The scene-graph node model and its composition operators.
//!
//! A footprint is a tree of [`Node`]s. Each node carries a local affine
//! transform, optional local-space geometry (points plus index paths), a
//! [`Kind`] describing its role, and exclusively-owned `child` / `next`
//! links. Trees are combined with two operators:
//!
//! - [`nest`] (`&`): the right operand becomes the deepest descendant of the
//!   left one, inheriting every transform on the way down.
//! - [`chain`] (`|`): the right operand becomes the last sibling of the left
//!   one, sharing its parent's frame but not its local transform.
//!
//! Both operators have value semantics: they never mutate their operands and
//! their result shares no node with either input, so trees are always
//! acyclic.

use std::cell::Cell;
use std::collections::HashSet;
use std::fmt;
use std::ops::{BitAnd, BitOr};
use std::rc::Rc;

use glam::{DMat3, DVec2, dvec2};

use crate::render::{Hole, Mark, Pad, Pin, Renderer, Silk, Text};
use crate::transform;

/// How a pad or pin scope produces designators.
#[derive(Clone)]
pub enum Name {
    /// A fixed label, returned verbatim every time it is asked for.
    Label(String),
    /// A counter advanced once per request. Clones share the underlying
    /// counter, so copies of a subtree keep numbering where the original
    /// left off (this is what lets [`crate::dsl::row`] number a whole row).
    Counter(Rc<Cell<u64>>),
}

impl Name {
    /// A counter name starting at `start`.
    pub fn counter(start: u64) -> Name {
        Name::Counter(Rc::new(Cell::new(start)))
    }

    /// Produce the next designator from this name.
    pub(crate) fn advance(&self) -> String {
        match self {
            Name::Label(s) => s.clone(),
            Name::Counter(c) => {
                let n = c.get();
                c.set(n + 1);
                n.to_string()
            }
        }
    }
}

impl From<&str> for Name {
    fn from(s: &str) -> Name {
        Name::Label(s.to_string())
    }
}

impl From<String> for Name {
    fn from(s: String) -> Name {
        Name::Label(s)
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Name::Label(s) => write!(f, "Label({s:?})"),
            Name::Counter(c) => write!(f, "Counter(next = {})", c.get()),
        }
    }
}

/// Predicate deciding whether a resolved pad/pin name is suppressed.
#[derive(Clone, Default)]
pub enum Skip {
    /// Nothing is skipped.
    #[default]
    None,
    /// Skip names contained in the set.
    Set(HashSet<String>),
    /// Skip names the closure accepts.
    Func(Rc<dyn Fn(&str) -> bool>),
}

impl Skip {
    /// Skip every name in `names`.
    pub fn set<I, S>(names: I) -> Skip
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Skip::Set(names.into_iter().map(Into::into).collect())
    }

    /// Skip names accepted by `f`.
    pub fn func(f: impl Fn(&str) -> bool + 'static) -> Skip {
        Skip::Func(Rc::new(f))
    }

    pub(crate) fn matches(&self, name: &str) -> bool {
        match self {
            Skip::None => false,
            Skip::Set(names) => names.contains(name),
            Skip::Func(f) => f(name),
        }
    }
}

impl fmt::Debug for Skip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Skip::None => write!(f, "None"),
            Skip::Set(names) => write!(f, "Set({names:?})"),
            Skip::Func(_) => write!(f, "Func(..)"),
        }
    }
}

/// Naming-context payload shared by groups, pads and pins.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    pub name: Option<Name>,
    pub skip: Skip,
}

/// A concrete piece of local-space geometry. The coordinates themselves live
/// in the node's `points`/`paths`; the variant only records what they mean.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// Arbitrary point/path set.
    Polygon,
    /// Axis-aligned rectangle (four corners, one closed path). `rounded`
    /// only matters to pad rendering.
    Square { rounded: bool },
    /// A single point, used as a mark or text anchor.
    Point,
    /// Two points joined by one open path.
    Line,
    /// Center plus x/y radius reference points, plus a sweep reference when
    /// `full` is false.
    Circle { full: bool },
}

/// What a node is, as a closed tagged union: renderers branch on this
/// exhaustively instead of downcasting.
#[derive(Debug, Clone)]
pub enum Kind {
    /// No geometry, no effect; a neutral chain root.
    Empty,
    /// A pure transform node (the matrix lives on the node itself).
    Transform,
    /// A naming-context participant.
    Group(Scope),
    /// Shape geometry, consumed by whichever renderer is active.
    Shape(Shape),
    /// Toggles the mirrored-side flag for its subtree.
    Back,
    /// Overrides the paste context for its subtree.
    Paste(bool),
    /// A renderer component; becomes the active render callback for its
    /// subtree and later siblings.
    Render(Renderer),
}

/// The tree entity of the DSL.
#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) m: DMat3,
    pub(crate) points: Vec<DVec2>,
    pub(crate) paths: Vec<Vec<usize>>,
    pub(crate) kind: Kind,
    pub(crate) child: Option<Box<Node>>,
    pub(crate) next: Option<Box<Node>>,
}

impl Node {
    fn new(kind: Kind) -> Node {
        Node {
            m: DMat3::IDENTITY,
            points: Vec::new(),
            paths: Vec::new(),
            kind,
            child: None,
            next: None,
        }
    }

    fn with_matrix(m: DMat3) -> Node {
        Node {
            m,
            ..Node::new(Kind::Transform)
        }
    }

    /// Install a skip predicate on a group, pad or pin node. No effect on
    /// other kinds.
    pub fn skip_if(mut self, skip: Skip) -> Node {
        match &mut self.kind {
            Kind::Group(scope) => scope.skip = skip,
            Kind::Render(Renderer::Pad(pad)) => pad.scope.skip = skip,
            Kind::Render(Renderer::Pin(pin)) => pin.scope.skip = skip,
            _ => debug_assert!(false, "skip_if on a node without a naming scope"),
        }
        self
    }
}

// ============================================================================
// Composition
// ============================================================================

fn tail_child_mut(node: &mut Node) -> &mut Node {
    match node.child {
        Some(ref mut child) => tail_child_mut(child),
        None => node,
    }
}

fn tail_next_mut(node: &mut Node) -> &mut Node {
    match node.next {
        Some(ref mut next) => tail_next_mut(next),
        None => node,
    }
}

/// Attach a copy of `b` below the deepest descendant of a copy of `a`.
pub fn nest(a: &Node, b: &Node) -> Node {
    let mut root = a.clone();
    tail_child_mut(&mut root).child = Some(Box::new(b.clone()));
    root
}

/// Attach a copy of `b` after the last sibling of a copy of `a`.
pub fn chain(a: &Node, b: &Node) -> Node {
    let mut root = a.clone();
    tail_next_mut(&mut root).next = Some(Box::new(b.clone()));
    root
}

impl BitAnd for Node {
    type Output = Node;

    fn bitand(mut self, rhs: Node) -> Node {
        tail_child_mut(&mut self).child = Some(Box::new(rhs));
        self
    }
}

impl BitAnd<&Node> for Node {
    type Output = Node;

    fn bitand(self, rhs: &Node) -> Node {
        self & rhs.clone()
    }
}

impl BitAnd for &Node {
    type Output = Node;

    fn bitand(self, rhs: &Node) -> Node {
        nest(self, rhs)
    }
}

impl BitOr for Node {
    type Output = Node;

    fn bitor(mut self, rhs: Node) -> Node {
        tail_next_mut(&mut self).next = Some(Box::new(rhs));
        self
    }
}

impl BitOr<&Node> for Node {
    type Output = Node;

    fn bitor(self, rhs: &Node) -> Node {
        self | rhs.clone()
    }
}

impl BitOr for &Node {
    type Output = Node;

    fn bitor(self, rhs: &Node) -> Node {
        chain(self, rhs)
    }
}

// ============================================================================
// Constructors: structure and transforms
// ============================================================================

/// A node with no geometry and no effect.
pub fn empty() -> Node {
    Node::new(Kind::Empty)
}

/// A naming-context group. Pass `None` for an anonymous group, which makes
/// every pad in its subtree share one designator drawn from the enclosing
/// named scope.
pub fn group(name: Option<Name>) -> Node {
    Node::new(Kind::Group(Scope { name, skip: Skip::None }))
}

/// Translate the subtree by `v`.
pub fn translate(v: DVec2) -> Node {
    Node::with_matrix(transform::translation(v))
}

/// Rotate the subtree by `degrees`; a 90 degree rotation maps `(1, 0)`
/// to `(0, -1)`.
pub fn rotate(degrees: f64) -> Node {
    Node::with_matrix(transform::rotation(degrees))
}

/// Scale the subtree per axis.
pub fn scale(v: DVec2) -> Node {
    Node::with_matrix(transform::scaling(v))
}

/// Mirror the subtree along `axis` (the normal of the mirror line).
pub fn mirror(axis: DVec2) -> Node {
    Node::with_matrix(transform::mirroring(axis))
}

/// Flip the subtree onto the solder side: pads below pick up `onsolder`.
pub fn back() -> Node {
    Node::new(Kind::Back)
}

/// Override the paste context for the subtree.
pub fn paste(has: bool) -> Node {
    Node::new(Kind::Paste(has))
}

/// Suppress solder paste for the subtree; pads below pick up `nopaste`.
pub fn nopaste() -> Node {
    paste(false)
}

// ============================================================================
// Constructors: shapes
// ============================================================================

/// A polygon over `points` with explicit paths (each a sequence of point
/// indices; repeat the first index to close).
pub fn polygon_paths(points: Vec<DVec2>, paths: Vec<Vec<usize>>) -> Node {
    Node {
        points,
        paths,
        ..Node::new(Kind::Shape(Shape::Polygon))
    }
}

/// A closed polygon over `points`, in order.
pub fn polygon(points: Vec<DVec2>) -> Node {
    let path = (0..points.len()).chain([0]).collect();
    polygon_paths(points, vec![path])
}

/// A rectangle of `size`. Centered on the origin when `center` is true,
/// otherwise spanning from the origin into the positive quadrant. `rounded`
/// marks the rectangle as fully rounded for pad rendering (silk ignores it).
pub fn square(size: DVec2, center: bool, rounded: bool) -> Node {
    let o = if center { DVec2::ZERO } else { size / 2.0 };
    let h = size / 2.0;
    Node {
        points: vec![
            dvec2(o.x - h.x, o.y - h.y),
            dvec2(o.x - h.x, o.y + h.y),
            dvec2(o.x + h.x, o.y + h.y),
            dvec2(o.x + h.x, o.y - h.y),
        ],
        paths: vec![vec![0, 1, 2, 3, 0]],
        ..Node::new(Kind::Shape(Shape::Square { rounded }))
    }
}

/// A single point at the origin.
pub fn point() -> Node {
    Node {
        points: vec![DVec2::ZERO],
        ..Node::new(Kind::Shape(Shape::Point))
    }
}

/// A line segment spanning `size`. Centered on the origin when `center` is
/// true, otherwise starting there.
pub fn line(size: DVec2, center: bool) -> Node {
    let o = if center { DVec2::ZERO } else { size / 2.0 };
    let h = size / 2.0;
    Node {
        points: vec![o - h, o + h],
        paths: vec![vec![0, 1]],
        ..Node::new(Kind::Shape(Shape::Line))
    }
}

fn circle_node(r: f64, sweep: Option<f64>) -> Node {
    let mut points = vec![DVec2::ZERO, dvec2(r, 0.0), dvec2(0.0, r)];
    if let Some(sweep) = sweep {
        let rad = sweep.to_radians();
        points.push(dvec2(rad.cos() * r, rad.sin() * r));
    }
    Node {
        points,
        ..Node::new(Kind::Shape(Shape::Circle { full: sweep.is_none() }))
    }
}

/// A full circle of radius `r`.
pub fn circle(r: f64) -> Node {
    circle_node(r, None)
}

/// A circular arc of radius `r` sweeping `sweep` degrees from the x axis.
///
/// # Panics
///
/// Panics unless `0 < sweep < 360`; use [`circle`] for a full circle.
pub fn circle_arc(r: f64, sweep: f64) -> Node {
    assert!(
        sweep > 0.0 && sweep < 360.0,
        "arc sweep must lie strictly between 0 and 360 degrees"
    );
    circle_node(r, Some(sweep))
}

// ============================================================================
// Constructors: renderers
// ============================================================================

/// Render the subtree's shapes as silkscreen strokes of width `w`.
pub fn silk(w: f64) -> Node {
    Node::new(Kind::Render(Renderer::Silk(Silk { width: w })))
}

/// Render circles and rectangles in the subtree as copper pads.
pub fn pad(name: Option<Name>, clearance: f64, mask: f64) -> Node {
    Node::new(Kind::Render(Renderer::Pad(Pad {
        scope: Scope { name, skip: Skip::None },
        clearance,
        mask,
    })))
}

/// Render circles in the subtree as plated through-hole pins with an annular
/// ring of width `annulus`. With `square`, matching square rings are added on
/// both board sides.
pub fn pin(name: Option<Name>, annulus: f64, clearance: f64, mask: f64, square: bool) -> Node {
    Node::new(Kind::Render(Renderer::Pin(Pin {
        scope: Scope { name, skip: Skip::None },
        annulus,
        clearance,
        mask,
        square,
    })))
}

/// Render circles in the subtree as unplated mounting holes.
pub fn hole(clearance: f64, mask: f64) -> Node {
    Node::new(Kind::Render(Renderer::Hole(Hole { clearance, mask })))
}

/// Capture the subtree's single point as the element origin mark.
pub fn mark() -> Node {
    Node::new(Kind::Render(Renderer::Mark(Mark)))
}

/// Capture the subtree's single point as the reference-text anchor, with
/// direction and scale derived from the accumulated transform.
pub fn text(size: f64) -> Node {
    Node::new(Kind::Render(Renderer::Text(Text { size })))
}
