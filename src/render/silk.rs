//! Silkscreen outline rendering.

use glam::{DMat3, DVec2, dvec2};

use crate::context::Session;
use crate::errors::RenderError;
use crate::node::{Kind, Node, Shape};
use crate::records::Record;
use crate::transform::apply_all;

use super::Render;

/// Renders subtree shapes as silkscreen strokes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Silk {
    /// Stroke width.
    pub width: f64,
}

impl Render for Silk {
    fn render(
        &self,
        node: &Node,
        m: DMat3,
        _session: &mut Session,
    ) -> Result<Vec<Record>, RenderError> {
        let points = apply_all(&m, &node.points);
        match node.kind {
            Kind::Shape(Shape::Circle { full }) => Ok(vec![self.arc(&points, full)]),
            _ => Ok(self.segments(node, &points)),
        }
    }
}

impl Silk {
    /// One line record per consecutive index pair, per path.
    fn segments(&self, node: &Node, points: &[DVec2]) -> Vec<Record> {
        let mut records = Vec::new();
        for path in &node.paths {
            for pair in path.windows(2) {
                records.push(Record::Line {
                    from: points[pair[0]],
                    to: points[pair[1]],
                    width: self.width,
                });
            }
        }
        records
    }

    /// An arc record from the transformed circle reference points: center,
    /// x-radius ref, y-radius ref, and (for partial arcs) the sweep ref.
    fn arc(&self, points: &[DVec2], full: bool) -> Record {
        let c = points[0];
        let offsets: Vec<DVec2> = points[1..].iter().map(|p| *p - c).collect();
        let radius = dvec2(offsets[0].length(), offsets[1].length());
        if full {
            return Record::Arc {
                center: c,
                radius,
                span: None,
                width: self.width,
            };
        }

        // Angles in the output convention: positive counterclockwise on
        // screen, so the board's y axis is negated.
        let a: Vec<f64> = offsets
            .iter()
            .map(|d| (-d.y).atan2(d.x).to_degrees())
            .collect();

        // An unmirrored transform puts the y reference 90 degrees clockwise
        // of the x reference; a mirrored one flips that ordering. The record
        // always describes the arc as a clockwise sweep, so a mirrored arc
        // starts from its other endpoint.
        let mirrored = (a[1] - a[0]).rem_euclid(360.0) < 180.0;
        let (start, sweep) = if mirrored {
            (a[2], a[2] - a[0])
        } else {
            (a[0], a[0] - a[2])
        };
        Record::Arc {
            center: c,
            radius,
            span: Some((start.rem_euclid(360.0), sweep.rem_euclid(360.0))),
            width: self.width,
        }
    }
}
