//! Output records for the legacy gEDA PCB element format.
//!
//! Every renderer produces a flat sequence of [`Record`]s; `Display` turns
//! each one into exactly one line of the element body. All numeric fields are
//! quantized here, at the output boundary: lengths to 1e-6 mm, angles to
//! 0.01 degrees.

use std::fmt;

use glam::DVec2;

/// Quantize a length to 1e-6, normalizing negative zero so that tiny
/// floating-point residue never prints as `-0.000000`.
pub(crate) fn quantize(v: f64) -> f64 {
    let q = (v * 1e6).round() / 1e6;
    if q == 0.0 { 0.0 } else { q }
}

/// A length field: quantized and suffixed with the output unit.
pub(crate) struct Mm(pub f64);

impl fmt::Display for Mm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}mm", quantize(self.0))
    }
}

/// An angle field: quantized to 0.01 degrees and wrapped into [0, 360).
pub(crate) struct Deg(pub f64);

impl fmt::Display for Deg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // rem_euclid preserves the sign of -0.0, so normalize it like
        // quantize does for lengths.
        let q = ((self.0 * 100.0).round() / 100.0).rem_euclid(360.0);
        let q = if q == 0.0 { 0.0 } else { q };
        write!(f, "{q:.2}")
    }
}

/// Flags carried by a `Pad` record, printed comma-joined in a fixed order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PadFlags {
    /// Square (unrounded) pad ends.
    pub square: bool,
    /// Pad sits on the solder side of the board.
    pub onsolder: bool,
    /// Solder paste application is suppressed.
    pub nopaste: bool,
}

impl fmt::Display for PadFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut sep = "";
        for (set, label) in [
            (self.square, "square"),
            (self.onsolder, "onsolder"),
            (self.nopaste, "nopaste"),
        ] {
            if set {
                write!(f, "{sep}{label}")?;
                sep = ",";
            }
        }
        Ok(())
    }
}

/// One primitive of the output element, in traversal order.
///
/// Clearance and mask fields hold the final doubled values the format
/// expects; the renderers apply that convention when they build the record.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    /// An SMD pad: a stroke from `start` to `end` of width `thickness`.
    /// Round pads collapse `start == end`.
    Pad {
        start: DVec2,
        end: DVec2,
        thickness: f64,
        clearance: f64,
        mask: f64,
        name: String,
        flags: PadFlags,
    },
    /// A plated through-hole pin, or an unplated mounting hole when `name`
    /// is absent (the format marks those with empty name fields and a
    /// `hole` flag).
    Pin {
        center: DVec2,
        thickness: f64,
        clearance: f64,
        mask: f64,
        drill: f64,
        name: Option<String>,
    },
    /// A silkscreen line segment.
    Line { from: DVec2, to: DVec2, width: f64 },
    /// A silkscreen arc; `span` is `(start, sweep)` in degrees, or `None`
    /// for a full circle (rendered as the fixed `0 360`).
    Arc {
        center: DVec2,
        radius: DVec2,
        span: Option<(f64, f64)>,
        width: f64,
    },
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Record::Pad {
                start,
                end,
                thickness,
                clearance,
                mask,
                name,
                flags,
            } => write!(
                f,
                "Pad [ {} {} {} {} {} {} {} \"{name}\" \"{name}\" \"{flags}\" ]",
                Mm(start.x),
                Mm(start.y),
                Mm(end.x),
                Mm(end.y),
                Mm(*thickness),
                Mm(*clearance),
                Mm(*mask),
            ),
            Record::Pin {
                center,
                thickness,
                clearance,
                mask,
                drill,
                name,
            } => {
                let (name, flag) = match name {
                    Some(n) => (n.as_str(), ""),
                    None => ("", "hole"),
                };
                write!(
                    f,
                    "Pin [ {} {} {} {} {} {} \"{name}\" \"{name}\" \"{flag}\" ]",
                    Mm(center.x),
                    Mm(center.y),
                    Mm(*thickness),
                    Mm(*clearance),
                    Mm(*mask),
                    Mm(*drill),
                )
            }
            Record::Line { from, to, width } => write!(
                f,
                "ElementLine [ {} {} {} {} {} ]",
                Mm(from.x),
                Mm(from.y),
                Mm(to.x),
                Mm(to.y),
                Mm(*width),
            ),
            Record::Arc {
                center,
                radius,
                span,
                width,
            } => match span {
                None => write!(
                    f,
                    "ElementArc [ {} {} {} {} 0 360 {} ]",
                    Mm(center.x),
                    Mm(center.y),
                    Mm(radius.x),
                    Mm(radius.y),
                    Mm(*width),
                ),
                Some((start, sweep)) => write!(
                    f,
                    "ElementArc [ {} {} {} {} {} {} {} ]",
                    Mm(center.x),
                    Mm(center.y),
                    Mm(radius.x),
                    Mm(radius.y),
                    Deg(*start),
                    Deg(*sweep),
                    Mm(*width),
                ),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::dvec2;

    #[test]
    fn lengths_are_quantized_to_micrometers() {
        assert_eq!(Mm(1.0).to_string(), "1.000000mm");
        assert_eq!(Mm(0.1234567).to_string(), "0.123457mm");
        assert_eq!(Mm(-2.5).to_string(), "-2.500000mm");
    }

    #[test]
    fn negative_zero_never_leaks() {
        // Rotation residue like -6.1e-17 must print as plain zero.
        assert_eq!(Mm(-6.1e-17).to_string(), "0.000000mm");
    }

    #[test]
    fn angles_wrap_into_a_revolution() {
        assert_eq!(Deg(90.0).to_string(), "90.00");
        assert_eq!(Deg(-90.0).to_string(), "270.00");
        assert_eq!(Deg(359.999).to_string(), "0.00");
    }

    #[test]
    fn negative_zero_angle_never_leaks() {
        // atan2(-0.0, x) produces -0.0, which rem_euclid passes through.
        assert_eq!(Deg(-0.0).to_string(), "0.00");
        assert_eq!(Deg(-1e-9).to_string(), "0.00");
    }

    #[test]
    fn pad_flags_join_in_order() {
        let flags = PadFlags {
            square: true,
            onsolder: true,
            nopaste: true,
        };
        assert_eq!(flags.to_string(), "square,onsolder,nopaste");
        assert_eq!(PadFlags::default().to_string(), "");
    }

    #[test]
    fn pad_record_layout() {
        let rec = Record::Pad {
            start: dvec2(-0.25, 0.0),
            end: dvec2(0.25, 0.0),
            thickness: 0.5,
            clearance: 0.4,
            mask: 0.7,
            name: "3".into(),
            flags: PadFlags {
                square: true,
                ..Default::default()
            },
        };
        insta::assert_snapshot!(
            rec.to_string(),
            @r#"Pad [ -0.250000mm 0.000000mm 0.250000mm 0.000000mm 0.500000mm 0.400000mm 0.700000mm "3" "3" "square" ]"#
        );
    }

    #[test]
    fn hole_record_uses_empty_names() {
        let rec = Record::Pin {
            center: dvec2(0.0, 0.0),
            thickness: 2.0,
            clearance: 0.4,
            mask: 2.2,
            drill: 2.0,
            name: None,
        };
        insta::assert_snapshot!(
            rec.to_string(),
            @r#"Pin [ 0.000000mm 0.000000mm 2.000000mm 0.400000mm 2.200000mm 2.000000mm "" "" "hole" ]"#
        );
    }

    #[test]
    fn full_circle_arc_is_fixed_span() {
        let rec = Record::Arc {
            center: dvec2(0.0, 0.0),
            radius: dvec2(5.0, 5.0),
            span: None,
            width: 0.2,
        };
        insta::assert_snapshot!(
            rec.to_string(),
            @"ElementArc [ 0.000000mm 0.000000mm 5.000000mm 5.000000mm 0 360 0.200000mm ]"
        );
    }
}
