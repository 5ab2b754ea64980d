//! Copper rendering: pads, through-hole pins and mounting holes.
//!
//! The only nontrivial geometry in the crate lives here: a transformed
//! rectangle is decomposed into the slot records the output format can
//! express. The decomposition works on the rectangle's edge midpoints, so it
//! is exact under rotation and mirroring and never inspects the transform
//! itself.

use glam::{DMat3, DVec2, dvec2};

use crate::context::Session;
use crate::errors::RenderError;
use crate::log::warn;
use crate::node::{Kind, Node, Scope, Shape, Skip, square};
use crate::records::{PadFlags, Record};
use crate::transform::apply_all;

use super::Render;

/// Two lengths are the same "diameter" when they agree at output precision.
fn same_extent(a: f64, b: f64) -> bool {
    (a * 1e6).round() == (b * 1e6).round()
}

/// Renders circles and rectangles as SMD pads.
#[derive(Debug, Clone)]
pub struct Pad {
    pub(crate) scope: Scope,
    /// Copper clearance (the record carries twice this).
    pub clearance: f64,
    /// Solder mask margin beyond the copper.
    pub mask: f64,
}

impl Render for Pad {
    fn render(
        &self,
        node: &Node,
        m: DMat3,
        session: &mut Session,
    ) -> Result<Vec<Record>, RenderError> {
        match node.kind {
            Kind::Shape(Shape::Circle { .. }) => {
                let name = session.resolve_name()?;
                if self.scope.skip.matches(&name) {
                    return Ok(Vec::new());
                }
                let points = apply_all(&m, &node.points);
                let r = (points[1] - points[0]).length();
                Ok(vec![self.circ_pad(&name, points[0], r, session)])
            }
            Kind::Shape(Shape::Square { rounded }) => {
                let name = session.resolve_name()?;
                if self.scope.skip.matches(&name) {
                    return Ok(Vec::new());
                }
                let points = apply_all(&m, &node.points);
                let path = &node.paths[0];
                let corners = [
                    points[path[0]],
                    points[path[1]],
                    points[path[2]],
                    points[path[3]],
                ];
                Ok(self.rect_pad(&name, corners, rounded, session))
            }
            // Anything else is not pad geometry; contribute nothing.
            _ => Ok(Vec::new()),
        }
    }
}

impl Pad {
    /// Decompose a transformed rectangle into pad records.
    ///
    /// The two "diameters" are the separations of opposite edge midpoints.
    /// Equal diameters mean a true square: rounded squares collapse to one
    /// round pad, plain squares bisect into two half-rectangles (a half of a
    /// true square is never square, so recursion stops one level down).
    /// Unequal diameters yield a single slot along the longer midpoint
    /// segment.
    fn rect_pad(
        &self,
        name: &str,
        p: [DVec2; 4],
        rounded: bool,
        session: &Session,
    ) -> Vec<Record> {
        let mid = [
            (p[0] + p[1]) / 2.0,
            (p[1] + p[2]) / 2.0,
            (p[2] + p[3]) / 2.0,
            (p[3] + p[0]) / 2.0,
        ];
        let dim0 = (mid[2] - mid[0]).length();
        let dim1 = (mid[3] - mid[1]).length();
        let c = (mid[0] + mid[2]) / 2.0;

        if same_extent(dim0, dim1) {
            if rounded {
                return vec![self.circ_pad(name, c, dim0 / 2.0, session)];
            }
            let mut records = self.rect_pad(name, [p[0], p[1], mid[1], mid[3]], false, session);
            records.extend(self.rect_pad(name, [mid[3], mid[1], p[2], p[3]], false, session));
            return records;
        }

        let angle = if dim0 > dim1 {
            (mid[2].y - mid[0].y).atan2(mid[2].x - mid[0].x)
        } else {
            (mid[3].y - mid[1].y).atan2(mid[3].x - mid[1].x)
        };

        let half = dim0.min(dim1) / 2.0;
        let length = dim0.max(dim1) - half * 2.0;
        let dir = dvec2(angle.cos(), angle.sin());
        vec![Record::Pad {
            start: c + dir * (length / 2.0),
            end: c - dir * (length / 2.0),
            thickness: half * 2.0,
            clearance: self.clearance * 2.0,
            mask: (self.mask + half) * 2.0,
            name: name.to_string(),
            flags: PadFlags {
                square: !rounded,
                onsolder: session.back(),
                nopaste: !session.has_paste(),
            },
        }]
    }

    fn circ_pad(&self, name: &str, c: DVec2, r: f64, session: &Session) -> Record {
        if r == 0.0 {
            warn!(name, "zero-radius pad");
        }
        Record::Pad {
            start: c,
            end: c,
            thickness: r * 2.0,
            clearance: self.clearance * 2.0,
            mask: (self.mask + r) * 2.0,
            name: name.to_string(),
            flags: PadFlags {
                square: false,
                onsolder: session.back(),
                nopaste: !session.has_paste(),
            },
        }
    }
}

/// Renders circles as plated through-hole pins.
#[derive(Debug, Clone)]
pub struct Pin {
    pub(crate) scope: Scope,
    /// Annular ring width around the drill.
    pub annulus: f64,
    pub clearance: f64,
    pub mask: f64,
    /// Add matching square rings on both board sides.
    pub square: bool,
}

impl Render for Pin {
    fn render(
        &self,
        node: &Node,
        m: DMat3,
        session: &mut Session,
    ) -> Result<Vec<Record>, RenderError> {
        let Kind::Shape(Shape::Circle { .. }) = node.kind else {
            return Ok(Vec::new());
        };
        let name = session.resolve_name()?;
        if self.scope.skip.matches(&name) {
            return Ok(Vec::new());
        }
        let points = apply_all(&m, &node.points);
        let r = (points[1] - points[0]).length();
        let mut records = vec![Record::Pin {
            center: points[0],
            thickness: (self.annulus + r) * 2.0,
            clearance: self.clearance * 2.0,
            mask: (self.annulus + self.mask + r) * 2.0,
            drill: r * 2.0,
            name: Some(name.clone()),
        }];

        if self.square {
            // Synthesize a square ring over the annulus and run it through
            // the pad decomposition twice, once per board side, under a
            // paste-suppressed scope that reuses the pin's designator.
            let ring = square(DVec2::splat((r + self.annulus) * 2.0), true, false);
            let helper = Pad {
                scope: Scope {
                    name: None,
                    skip: Skip::None,
                },
                clearance: self.clearance,
                mask: self.mask,
            };
            session.push_label_scope(name);
            session.push_paste(false);
            let front = helper.render(&ring, m, session);
            session.toggle_back();
            let other = helper.render(&ring, m, session);
            session.toggle_back();
            session.pop_paste();
            session.pop_name_scope();
            records.extend(front?);
            records.extend(other?);
        }
        Ok(records)
    }
}

/// Renders circles as unplated mounting holes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hole {
    pub clearance: f64,
    pub mask: f64,
}

impl Render for Hole {
    fn render(
        &self,
        node: &Node,
        m: DMat3,
        _session: &mut Session,
    ) -> Result<Vec<Record>, RenderError> {
        let Kind::Shape(Shape::Circle { .. }) = node.kind else {
            return Ok(Vec::new());
        };
        let points = apply_all(&m, &node.points);
        let r = (points[1] - points[0]).length();
        Ok(vec![Record::Pin {
            center: points[0],
            thickness: r * 2.0,
            clearance: self.clearance * 2.0,
            mask: (self.mask + r) * 2.0,
            drill: r * 2.0,
            name: None,
        }])
    }
}
