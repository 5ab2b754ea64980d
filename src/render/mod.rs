//! The traversal and render engine.
//!
//! This module is organized into submodules:
//! - `silk`: silkscreen outline rendering (lines and arcs)
//! - `pads`: copper pad, pin and mounting-hole rendering
//! - `annotate`: mark and text metadata capture
//!
//! A render pass is a single depth-first preorder walk. At each node the
//! engine applies the node's context effect, invokes the active renderer
//! (the nearest renderer node at or above it, which also propagates to later
//! siblings), recurses into the child under `m * local`, restores the
//! context, and finally recurses into the sibling under the *unchanged*
//! parent transform. Records therefore appear in strict traversal order,
//! which is what makes sequential pad naming deterministic.

pub mod annotate;
pub mod pads;
pub mod silk;

pub use annotate::{Mark, Text};
pub use pads::{Hole, Pad, Pin};
pub use silk::Silk;

use enum_dispatch::enum_dispatch;
use glam::DMat3;

use crate::context::{Meta, Session};
use crate::errors::RenderError;
use crate::log::debug;
use crate::node::{Kind, Node};
use crate::records::Record;

/// A renderer component: interprets one node's geometry under the
/// accumulated transform and session context.
#[enum_dispatch]
pub trait Render {
    /// Produce the records for `node`. Geometry the component does not
    /// handle yields an empty vector, not an error.
    fn render(
        &self,
        node: &Node,
        m: DMat3,
        session: &mut Session,
    ) -> Result<Vec<Record>, RenderError>;
}

/// The closed set of renderer components.
#[enum_dispatch(Render)]
#[derive(Debug, Clone)]
pub enum Renderer {
    Silk(Silk),
    Pad(Pad),
    Pin(Pin),
    Hole(Hole),
    Mark(Mark),
    Text(Text),
}

/// Render a tree into its flat record sequence and accumulated metadata.
pub fn render(root: &Node) -> Result<(Vec<Record>, Meta), RenderError> {
    let mut session = Session::new();
    let mut records = Vec::new();
    walk(root, DMat3::IDENTITY, None, &mut session, &mut records)?;
    debug!(records = records.len(), "render pass complete");
    Ok((records, session.into_meta()))
}

fn walk(
    node: &Node,
    m: DMat3,
    inherited: Option<&Renderer>,
    session: &mut Session,
    out: &mut Vec<Record>,
) -> Result<(), RenderError> {
    let token = session.enter(&node.kind);
    let active = match &node.kind {
        Kind::Render(renderer) => Some(renderer),
        _ => inherited,
    };
    let result = visit(node, m, active, session, out);
    // Context is restored before the error propagates and before siblings.
    session.exit(token);
    result?;

    if let Some(next) = &node.next {
        walk(next, m, active, session, out)?;
    }
    Ok(())
}

fn visit(
    node: &Node,
    m: DMat3,
    active: Option<&Renderer>,
    session: &mut Session,
    out: &mut Vec<Record>,
) -> Result<(), RenderError> {
    if let Some(renderer) = active {
        let records = renderer.render(node, m, session)?;
        if !records.is_empty() {
            debug!(count = records.len(), "renderer emitted records");
        }
        out.extend(records);
    }
    if let Some(child) = &node.child {
        walk(child, m * node.m, active, session, out)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{back, circle, group, pad, silk, square, translate};
    use glam::{DVec2, dvec2};

    #[test]
    fn records_follow_traversal_order() {
        // Self, then subtree, then siblings.
        let tree = silk(0.2)
            & (line_at(0.0) | (translate(dvec2(1.0, 0.0)) & line_at(10.0)) | line_at(20.0));
        let (records, _) = render(&tree).unwrap();
        let xs: Vec<f64> = records
            .iter()
            .map(|r| match r {
                Record::Line { from, .. } => from.x,
                other => panic!("unexpected record {other}"),
            })
            .collect();
        assert_eq!(xs, vec![0.0, 11.0, 20.0]);
    }

    fn line_at(x: f64) -> crate::node::Node {
        translate(dvec2(x, 0.0)) & crate::node::line(dvec2(1.0, 0.0), false)
    }

    #[test]
    fn siblings_ignore_local_transforms() {
        let tree = silk(0.2) & (translate(dvec2(5.0, 0.0)) & line_at(0.0) | line_at(0.0));
        let (records, _) = render(&tree).unwrap();
        let Record::Line { from, .. } = &records[0] else {
            panic!("expected a line");
        };
        assert_eq!(from.x, 5.0);
        let Record::Line { from, .. } = &records[1] else {
            panic!("expected a line");
        };
        // The sibling renders in the parent frame, not the translated one.
        assert_eq!(from.x, 0.0);
    }

    #[test]
    fn renderer_propagates_to_subtree_and_siblings() {
        let tree = silk(0.2) | line_at(0.0);
        let (records, _) = render(&tree).unwrap();
        assert_eq!(records.len(), 1, "sibling inherits the silk renderer");
    }

    #[test]
    fn no_renderer_means_no_records() {
        let tree = translate(dvec2(1.0, 0.0)) & circle(1.0);
        let (records, _) = render(&tree).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn back_scope_closes_with_its_subtree() {
        // Two pads: the first under back, the second outside it.
        let tree = group(Some("A".into()))
            & ((back() & pad(None, 0.1, 0.1) & circle(1.0))
                | (pad(None, 0.1, 0.1) & circle(1.0)));
        let (records, _) = render(&tree).unwrap();
        let onsolder: Vec<bool> = records
            .iter()
            .map(|r| match r {
                Record::Pad { flags, .. } => flags.onsolder,
                other => panic!("unexpected record {other}"),
            })
            .collect();
        assert_eq!(onsolder, vec![true, false]);
    }

    #[test]
    fn deep_nesting_accumulates_transforms() {
        let tree = silk(0.2)
            & translate(dvec2(1.0, 0.0))
            & translate(dvec2(0.0, 2.0))
            & crate::node::line(DVec2::ZERO, false)
            & square(dvec2(2.0, 2.0), true, false);
        let (records, _) = render(&tree).unwrap();
        // One degenerate line plus four square edges, all offset by (1, 2).
        assert_eq!(records.len(), 5);
        let Record::Line { from, .. } = &records[1] else {
            panic!("expected a line");
        };
        assert_eq!(*from, dvec2(0.0, 1.0));
    }
}
