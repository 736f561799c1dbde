//! Geometry step: rescales surface vertices and sets the building orientation.

use idfgen_catalog::Template;
use idfgen_format::{format_scalar, scale_geometry, Anchor, Document, FieldSelector, ScaleFactors};
use tracing::{debug, warn};

use super::{patch_field, ChangeLog};
use crate::spec::Geometry;

/// Template dimensions assumed when its metadata declares none (50 ft x 50 ft x 15 ft).
pub(crate) const DEFAULT_DIMENSIONS: [f64; 3] = [15.24, 15.24, 4.572];

const DIMENSION_KEYS: [&str; 3] = ["length_m", "width_m", "height_m"];

pub(super) fn apply(
    doc: Document,
    geometry: &Geometry,
    template: &Template,
    log: &mut ChangeLog,
) -> Document {
    let mut doc = doc;

    let requested = [geometry.length_m, geometry.width_m, geometry.height_m];
    if requested.iter().any(Option::is_some) {
        let defaults: [f64; 3] = std::array::from_fn(|i| {
            template
                .default_f64("geometry", DIMENSION_KEYS[i])
                .unwrap_or(DEFAULT_DIMENSIONS[i])
        });
        let requested: [f64; 3] = std::array::from_fn(|i| requested[i].unwrap_or(defaults[i]));
        doc = rescale(doc, requested, defaults, log);
    }

    if let Some(orientation) = geometry.orientation_deg {
        let anchor = Anchor::new("Building", FieldSelector::Index(1));
        if let Some(next) = patch_field(&doc, &anchor, &format_scalar(orientation), log) {
            log.applied(format!("Set building orientation to {orientation} degrees"));
            doc = next;
        }
    }

    doc
}

fn rescale(
    doc: Document,
    requested: [f64; 3],
    defaults: [f64; 3],
    log: &mut ChangeLog,
) -> Document {
    let Some(factors) = ScaleFactors::from_dimensions(requested, defaults) else {
        log.skip(format!(
            "skipped: geometry {requested:?} cannot be scaled from template dimensions {defaults:?}"
        ));
        return doc;
    };
    if factors.is_identity() {
        debug!(?factors, "geometry matches template, not scaling");
        return doc;
    }

    match scale_geometry(&doc, factors) {
        Ok(scaled) if scaled.vertices_scaled > 0 => {
            debug!(vertices = scaled.vertices_scaled, ?factors, "geometry scaled");
            let [l, w, h] = requested;
            log.applied(format!("Scaled geometry to {l}m x {w}m x {h}m"));
            scaled.document
        }
        Ok(_) => {
            log.skip("skipped: geometry has no surface vertices to scale");
            doc
        }
        Err(e) => {
            warn!(error = %e, "geometry scaling failed");
            log.skip(format!("skipped: geometry scaling: {e}"));
            doc
        }
    }
}
