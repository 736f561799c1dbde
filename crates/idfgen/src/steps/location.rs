//! Site location step: replaces the `Site:Location` object.

use idfgen_format::{format_scalar, Document};

use super::{attempt, field_line, field_text, ChangeLog};
use crate::spec::Location;

const SITE_LOCATION: &str = "Site:Location";

/// Standard time zone offset in hours: longitude / 15, rounded half to even.
pub fn timezone_offset(longitude: f64) -> i32 {
    (longitude / 15.0).round_ties_even() as i32
}

pub(super) fn apply(doc: Document, location: &Location, log: &mut ChangeLog) -> Document {
    let (Some(lat), Some(lon)) = (location.latitude, location.longitude) else {
        log.skip("skipped: location needs both latitude and longitude");
        return doc;
    };
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
        log.skip(format!("skipped: location ({lat}, {lon}) out of range"));
        return doc;
    }

    let site_name = location
        .site_name
        .as_deref()
        .map(field_text)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| format!("Site_{lat:.2}_{lon:.2}"));
    let block = location_block(
        &site_name,
        lat,
        lon,
        timezone_offset(lon),
        location.elevation_m.unwrap_or(0.0),
    );

    let next = attempt(&doc, &SITE_LOCATION, log, |d| match d.find_object(SITE_LOCATION) {
        Some(index) => d.replace_object(index, &block).map(Some),
        None => Ok(None),
    });
    match next {
        Some(next) => {
            log.applied(format!("Updated Site:Location to {site_name} ({lat}, {lon})"));
            next
        }
        None => doc,
    }
}

/// The replacement object, without trailing newline.
fn location_block(name: &str, lat: f64, lon: f64, tz: i32, elevation: f64) -> String {
    let mut block = format!("{SITE_LOCATION},\n");
    block.push_str(&field_line(name, ',', "Name"));
    block.push_str(&field_line(&format_scalar(lat), ',', "Latitude {deg}"));
    block.push_str(&field_line(&format_scalar(lon), ',', "Longitude {deg}"));
    block.push_str(&field_line(&tz.to_string(), ',', "Time Zone {hr}"));
    block.push_str(&field_line(&format_scalar(elevation), ';', "Elevation {m}"));
    block.truncate(block.trim_end().len());
    block
}
