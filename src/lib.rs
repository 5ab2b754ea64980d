//! padru: a declarative footprint geometry DSL that renders legacy gEDA PCB
//! element files.
//!
//! A footprint is a tree of [`Node`]s built from shape, transform, context
//! and renderer constructors, combined with two operators:
//!
//! - `a & b` nests `b` under the deepest descendant of `a`, so `b` inherits
//!   every transform above it;
//! - `a | b` chains `b` as a sibling of `a`, sharing the parent frame.
//!
//! Both copy their operands, so subtrees are reusable values. [`element`]
//! walks the finished tree once, depth first, accumulating the affine
//! transform and threading the naming / side / paste context, and serializes
//! the resulting records into one element block.
//!
//! ```
//! use glam::dvec2;
//! use padru::{Name, element, pad, row, silk, square};
//!
//! // A two-pad chip resistor: pads numbered 1 and 2, a silk outline.
//! let pads = pad(Some(Name::counter(1)), 0.2, 0.1) & square(dvec2(1.0, 1.3), true, false);
//! let fp = row(&pads, 1.9, 2, true) | silk(0.2) & square(dvec2(3.4, 1.8), true, false);
//! let out = element(&fp, "RES0805").unwrap();
//! assert!(out.starts_with("Element [0x00 \"RES0805\""));
//! ```

pub mod errors;
pub mod log;

mod context;
mod dsl;
mod node;
mod records;
mod render;
mod transform;

pub use context::{Meta, TextMeta};
pub use dsl::{down, left, right, rounded_square, row, up};
pub use errors::RenderError;
pub use node::{
    Kind, Name, Node, Scope, Shape, Skip, back, chain, circle, circle_arc, empty, group, hole,
    line, mark, mirror, nest, nopaste, pad, paste, pin, point, polygon, polygon_paths, rotate,
    scale, silk, square, text, translate,
};
pub use records::{PadFlags, Record};
pub use render::{Render, Renderer, render};
pub use transform::{apply, mirroring, rotation, scaling, translation};

use glam::DVec2;
use records::{Mm, quantize};

/// Render a footprint tree and assemble the complete element block.
///
/// The header carries the description, the origin mark and the reference
/// text placement (defaulting to the origin, direction 0, scale 100 when the
/// tree captured none), followed by the parenthesized record lines in
/// traversal order.
pub fn element(root: &Node, description: &str) -> Result<String, RenderError> {
    let (records, meta) = render(root)?;
    let mark = meta.mark.unwrap_or(DVec2::ZERO);
    let text = meta.text.unwrap_or(TextMeta {
        anchor: DVec2::ZERO,
        direction: 0,
        scale: 100.0,
    });

    let mut out = format!(
        "Element [0x00 \"{description}\" \"\" \"\" {} {} {} {} {} {} 0x00]\n(\n",
        Mm(mark.x),
        Mm(mark.y),
        Mm(text.anchor.x),
        Mm(text.anchor.y),
        text.direction,
        quantize(text.scale),
    );
    for record in &records {
        out.push('\t');
        out.push_str(&record.to_string());
        out.push('\n');
    }
    out.push_str(")\n");
    Ok(out)
}
