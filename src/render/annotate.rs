//! Mark and text metadata capture.
//!
//! These renderers emit no records; they fill the element-level metadata
//! slots instead. Both demand a single-point shape and fail the render if a
//! slot is written twice.

use glam::{DMat3, dvec2};

use crate::context::{Session, TextMeta};
use crate::errors::RenderError;
use crate::node::Node;
use crate::records::Record;
use crate::transform::apply;

use super::Render;

/// Captures the element origin mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mark;

impl Render for Mark {
    fn render(
        &self,
        node: &Node,
        m: DMat3,
        session: &mut Session,
    ) -> Result<Vec<Record>, RenderError> {
        if node.points.is_empty() {
            return Ok(Vec::new());
        }
        if node.points.len() > 1 {
            return Err(RenderError::MultiplePoints {
                kind: "mark",
                count: node.points.len(),
            });
        }
        session.meta.set_mark(apply(&m, node.points[0]))?;
        Ok(Vec::new())
    }
}

/// Captures the reference-text anchor, direction quadrant and scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Text {
    /// Base size; the captured scale is this times the local magnification.
    pub size: f64,
}

impl Render for Text {
    fn render(
        &self,
        node: &Node,
        m: DMat3,
        session: &mut Session,
    ) -> Result<Vec<Record>, RenderError> {
        if node.points.is_empty() {
            return Ok(Vec::new());
        }
        if node.points.len() > 1 {
            return Err(RenderError::MultiplePoints {
                kind: "text",
                count: node.points.len(),
            });
        }
        let anchor = apply(&m, node.points[0]);
        // A unit probe along local x measures the accumulated rotation and
        // magnification at the anchor.
        let probe = apply(&m, node.points[0] + dvec2(1.0, 0.0)) - anchor;
        let angle = ((-probe.y).atan2(probe.x).to_degrees() + 45.0).rem_euclid(360.0);
        session.meta.set_text(TextMeta {
            anchor,
            direction: (angle / 90.0).floor() as u8,
            scale: probe.length() * self.size,
        })?;
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{line, mark, point, rotate, scale, text, translate};
    use crate::render::render;
    use glam::DVec2;

    #[test]
    fn mark_captures_the_world_space_point() {
        let tree = translate(dvec2(1.5, -2.0)) & mark() & point();
        let (_, meta) = render(&tree).unwrap();
        assert_eq!(meta.mark, Some(dvec2(1.5, -2.0)));
    }

    #[test]
    fn two_marks_are_fatal() {
        let tree = mark() & (point() | point());
        assert_eq!(
            render(&tree),
            Err(RenderError::DuplicateMetadata { kind: "mark" })
        );
    }

    #[test]
    fn multi_point_mark_is_fatal() {
        let tree = mark() & line(dvec2(1.0, 0.0), false);
        assert_eq!(
            render(&tree),
            Err(RenderError::MultiplePoints {
                kind: "mark",
                count: 2
            })
        );
    }

    #[test]
    fn text_defaults_to_quadrant_zero_at_base_scale() {
        let tree = text(100.0) & point();
        let (_, meta) = render(&tree).unwrap();
        let text = meta.text.unwrap();
        assert_eq!(text.anchor, DVec2::ZERO);
        assert_eq!(text.direction, 0);
        assert!((text.scale - 100.0).abs() < 1e-9);
    }

    #[test]
    fn text_direction_follows_rotation() {
        for (degrees, quadrant) in [(0.0, 0), (90.0, 1), (180.0, 2), (270.0, 3)] {
            let tree = rotate(degrees) & text(100.0) & point();
            let (_, meta) = render(&tree).unwrap();
            assert_eq!(meta.text.unwrap().direction, quadrant, "at {degrees} degrees");
        }
    }

    #[test]
    fn text_scale_follows_magnification() {
        let tree = scale(DVec2::splat(2.0)) & text(100.0) & point();
        let (_, meta) = render(&tree).unwrap();
        assert!((meta.text.unwrap().scale - 200.0).abs() < 1e-9);
    }
}
