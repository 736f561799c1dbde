//! Building-type step: IT equipment for data centers, process load for manufacturing.

use idfgen_catalog::Template;
use idfgen_format::{Anchor, Document, FieldLocation, FieldSelector};

use super::{attempt, field_line, field_text, ChangeLog};
use crate::spec::{DataCenterParams, ManufacturingParams, TypeParams};

const ITE_AIR_COOLED: &str = "ElectricEquipment:ITE:AirCooled";
const WATTS_PER_UNIT: &str = "Watts/Unit";

const DEFAULT_PROCESS_ZONE: &str = "BulkStorage";
const DEFAULT_EQUIPMENT_SCHEDULE: &str = "BLDG_EQUIP_SCH";
const DEFAULT_HEAT_FRACTION: f64 = 0.5;

pub(super) fn apply(
    doc: Document,
    params: TypeParams<'_>,
    template: &Template,
    log: &mut ChangeLog,
) -> Document {
    match params {
        TypeParams::DataCenter(p) => data_center(doc, p, log),
        TypeParams::Manufacturing(p) => manufacturing(doc, p, template, log),
    }
}

/// Per-rack power in whole W (fraction dropped), derived from total IT load when both are known.
fn watts_per_rack(params: &DataCenterParams, racks: u32) -> Option<f64> {
    match params.it_load_kw {
        Some(kw) => Some(kw * 1000.0 / f64::from(racks)),
        None => params.watts_per_rack,
    }
}

fn data_center(doc: Document, params: &DataCenterParams, log: &mut ChangeLog) -> Document {
    let Some(racks) = params.rack_count else {
        if params.it_load_kw.is_some() || params.watts_per_rack.is_some() {
            log.skip("skipped: IT load given without rack_count");
        }
        return doc;
    };
    if racks == 0 {
        log.skip("skipped: rack_count must be positive");
        return doc;
    }
    let watts = watts_per_rack(params, racks).map(f64::trunc);
    if watts.is_some_and(|w| !w.is_finite() || w < 0.0) {
        log.skip("skipped: IT load per rack is not a valid power");
        return doc;
    }

    let anchor = Anchor::new(ITE_AIR_COOLED, FieldSelector::After(WATTS_PER_UNIT.into()));
    let next = attempt(&doc, &anchor, log, |d| {
        let Some(per_unit) = d.locate(&anchor) else {
            return Ok(None);
        };
        let units = FieldLocation {
            field: per_unit.field + 1,
            ..per_unit
        };
        let d = match watts {
            Some(w) => d.patch_at(per_unit, &format!("{w:.0}"))?.document,
            None => d.clone(),
        };
        Ok(Some(d.patch_at(units, &racks.to_string())?.document))
    });

    match next {
        Some(next) => {
            log.applied(match watts {
                Some(w) => format!("Set IT equipment: {racks} units at {w:.0}W each"),
                None => format!("Set IT equipment: {racks} units"),
            });
            next
        }
        None => doc,
    }
}

fn manufacturing(
    doc: Document,
    params: &ManufacturingParams,
    template: &Template,
    log: &mut ChangeLog,
) -> Document {
    let mut doc = doc;

    if let Some(kw) = params.process_load_kw.filter(|kw| *kw > 0.0) {
        let fraction = params.process_heat_fraction.unwrap_or(DEFAULT_HEAT_FRACTION);
        if (0.0..=1.0).contains(&fraction) {
            let zone = template
                .default_str("manufacturing", "process_zone")
                .unwrap_or(DEFAULT_PROCESS_ZONE);
            let schedule = template
                .default_str("manufacturing", "equipment_schedule")
                .unwrap_or(DEFAULT_EQUIPMENT_SCHEDULE);
            let block = process_equipment_block(zone, schedule, kw * 1000.0, fraction);

            let next = attempt(&doc, &"Exterior:Lights or Output:*", log, |d| {
                match insertion_point(d) {
                    Some(index) => d.insert_before_object(index, &block).map(Some),
                    None => Ok(None),
                }
            });
            if let Some(next) = next {
                log.applied(format!(
                    "Added process equipment load: {kw:.1} kW ({:.0}% radiant heat)",
                    fraction * 100.0
                ));
                doc = next;
            }
        } else {
            log.skip(format!(
                "skipped: process_heat_fraction {fraction} is outside 0..=1"
            ));
        }
    }

    if let Some(count) = params.occupancy_count {
        log.skip(format!(
            "skipped: occupancy_count {count} has no template anchor"
        ));
    }

    doc
}

/// First `Exterior:Lights` object, else the first `Output:*` object.
fn insertion_point(doc: &Document) -> Option<usize> {
    doc.find_object("Exterior:Lights").or_else(|| {
        doc.objects().iter().position(|o| {
            o.keyword
                .get(..7)
                .is_some_and(|prefix| prefix.eq_ignore_ascii_case("Output:"))
        })
    })
}

fn process_equipment_block(zone: &str, schedule: &str, watts: f64, fraction: f64) -> String {
    let zone = field_text(zone);
    let schedule = field_text(schedule);
    let mut block = String::from("  ElectricEquipment,\n");
    block.push_str(&field_line(&format!("{zone}_ProcessLoad"), ',', "Name"));
    block.push_str(&field_line(&zone, ',', "Zone or ZoneList or Space or SpaceList Name"));
    block.push_str(&field_line(&schedule, ',', "Schedule Name"));
    block.push_str(&field_line("EquipmentLevel", ',', "Design Level Calculation Method"));
    block.push_str(&field_line(&format!("{watts:.1}"), ',', "Design Level {W}"));
    block.push_str(&field_line("", ',', "Watts per Zone Floor Area {W/m2}"));
    block.push_str(&field_line("", ',', "Watts per Person {W/person}"));
    block.push_str(&field_line("0", ',', "Fraction Latent"));
    block.push_str(&field_line(&format!("{fraction:.2}"), ',', "Fraction Radiant"));
    block.push_str(&field_line("0", ',', "Fraction Lost"));
    block.push_str(&field_line(
        "Manufacturing Process Equipment",
        ';',
        "End-Use Subcategory",
    ));
    block.push('\n');
    block
}
