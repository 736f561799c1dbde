//! Geometry scaler: per-axis scaling of surface vertex coordinates.
//!
//! Vertices are recognised line by line inside detailed surface objects: a
//! line holding exactly three numeric fields (and at most a trailing comment)
//! is one `X,Y,Z` vertex. Vertices split over several lines are left alone.

use std::collections::BTreeMap;

use tracing::debug;

use crate::document::Document;
use crate::error::Result;
use crate::parser::{Field, Terminator};
use crate::patch::format_coordinate;

/// Object keywords whose vertex lists are scaled.
pub const GEOMETRY_KEYWORDS: &[&str] = &[
    "BuildingSurface:Detailed",
    "FenestrationSurface:Detailed",
    "Shading:Site:Detailed",
    "Shading:Building:Detailed",
    "Shading:Zone:Detailed",
];

/// Scale factors closer than this to 1.0 count as identity.
pub const IDENTITY_EPSILON: f64 = 1e-3;

/// Whether `keyword` names a detailed geometric surface.
pub fn is_geometry_keyword(keyword: &str) -> bool {
    GEOMETRY_KEYWORDS
        .iter()
        .any(|k| k.eq_ignore_ascii_case(keyword))
}

/// Independent scale factors for the X, Y and Z axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleFactors {
    /// X scale.
    pub x: f64,
    /// Y scale.
    pub y: f64,
    /// Z scale.
    pub z: f64,
}

impl ScaleFactors {
    /// No scaling.
    pub const IDENTITY: ScaleFactors = ScaleFactors {
        x: 1.0,
        y: 1.0,
        z: 1.0,
    };

    /// Create scale factors.
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Factors `requested / default` per axis.
    ///
    /// Returns `None` when any dimension is non-finite or not positive.
    pub fn from_dimensions(requested: [f64; 3], defaults: [f64; 3]) -> Option<Self> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if !requested.iter().chain(&defaults).all(|&v| valid(v)) {
            return None;
        }
        Some(Self::new(
            requested[0] / defaults[0],
            requested[1] / defaults[1],
            requested[2] / defaults[2],
        ))
    }

    /// True when every factor is within [`IDENTITY_EPSILON`] of 1.0.
    pub fn is_identity(&self) -> bool {
        [self.x, self.y, self.z]
            .iter()
            .all(|f| (f - 1.0).abs() <= IDENTITY_EPSILON)
    }

    fn apply(&self, [x, y, z]: [f64; 3]) -> [f64; 3] {
        [x * self.x, y * self.y, z * self.z]
    }
}

/// Output of [`scale_geometry`].
#[derive(Debug, Clone)]
pub struct Scaled {
    /// The scaled document.
    pub document: Document,
    /// Number of vertex lines rewritten.
    pub vertices_scaled: usize,
}

/// Scale every surface vertex in `doc` by `factors`.
///
/// Identity factors return the document unchanged without touching any line.
pub fn scale_geometry(doc: &Document, factors: ScaleFactors) -> Result<Scaled> {
    if factors.is_identity() {
        return Ok(Scaled {
            document: doc.clone(),
            vertices_scaled: 0,
        });
    }

    let text = doc.text();
    let line_starts: Vec<usize> = std::iter::once(0)
        .chain(text.match_indices('\n').map(|(i, _)| i + 1))
        .collect();

    let mut rewrites = BTreeMap::new();
    for object in doc.objects().iter().filter(|o| is_geometry_keyword(&o.keyword)) {
        for group in object.fields.chunk_by(|a, b| a.span.line == b.span.line) {
            if let Some(vertex) = VertexLine::detect(text, &line_starts, group) {
                rewrites.insert(vertex.line, vertex.render(text, factors));
            }
        }
    }

    if rewrites.is_empty() {
        debug!("no vertex lines found");
        return Ok(Scaled {
            document: doc.clone(),
            vertices_scaled: 0,
        });
    }

    let mut out = String::with_capacity(text.len() + rewrites.len() * 16);
    for (idx, line) in text.split_inclusive('\n').enumerate() {
        match rewrites.get(&(idx + 1)) {
            Some(rewritten) => {
                out.push_str(rewritten);
                let body = line.trim_end_matches(['\n', '\r']);
                out.push_str(&line[body.len()..]);
            }
            None => out.push_str(line),
        }
    }

    debug!(vertices = rewrites.len(), ?factors, "scaled geometry");
    Ok(Scaled {
        document: Document::parse(out)?,
        vertices_scaled: rewrites.len(),
    })
}

/// One physical line holding a complete `X,Y,Z` vertex.
struct VertexLine {
    line: usize,
    line_start: usize,
    value_start: usize,
    coords: [f64; 3],
    terminator: Terminator,
    comment: Option<(usize, usize)>,
}

impl VertexLine {
    fn detect(text: &str, line_starts: &[usize], group: &[Field]) -> Option<Self> {
        let [x, y, z] = group else {
            return None;
        };
        let coords = [x.as_f64()?, y.as_f64()?, z.as_f64()?];

        let line = x.span.line;
        let line_start = *line_starts.get(line - 1)?;
        let line_end = line_starts
            .get(line)
            .map_or(text.len(), |next| next - 1);

        // Nothing but indentation before X, nothing but the comment after Z.
        if !text[line_start..x.span.start].trim().is_empty() {
            return None;
        }
        let tail_start = z
            .comment
            .as_ref()
            .map_or(z.terminator_at + 1, |c| c.span.end);
        if tail_start > line_end || !text[tail_start..line_end].trim().is_empty() {
            return None;
        }

        Some(Self {
            line,
            line_start,
            value_start: x.span.start,
            coords,
            terminator: z.terminator,
            comment: z.comment.as_ref().map(|c| (c.span.start, c.span.end)),
        })
    }

    fn render(&self, text: &str, factors: ScaleFactors) -> String {
        let [x, y, z] = factors.apply(self.coords);
        let mut out = format!(
            "{}{},{},{}{}",
            &text[self.line_start..self.value_start],
            format_coordinate(x),
            format_coordinate(y),
            format_coordinate(z),
            self.terminator.as_char(),
        );
        if let Some((start, end)) = self.comment {
            out.push_str("  ");
            out.push_str(&text[start..end]);
        }
        out
    }
}
