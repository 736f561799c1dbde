//! Specification Mapper steps.
//!
//! Each step takes the current document and returns the next one, recording
//! what it changed in a [`ChangeLog`]. A step whose section is absent leaves
//! the document untouched and records nothing. A step whose anchor is
//! missing records a skipped entry and keeps the document it was given.

mod equipment;
mod geometry;
mod location;
mod setpoints;
mod simulation;

use std::fmt;

use idfgen_catalog::Template;
use idfgen_format::{patch_scalar_field, Anchor, Document, Result as FormatResult};
use serde::Serialize;
use tracing::{debug, warn};

use crate::spec::BuildingSpecification;

pub use location::timezone_offset;

/// Ordered record of applied and skipped edits.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChangeLog {
    /// Human-readable descriptions of applied changes.
    pub modifications: Vec<String>,
    /// Edits that were requested but not applied.
    pub skipped: Vec<String>,
}

impl ChangeLog {
    /// True when nothing was applied or skipped.
    pub fn is_empty(&self) -> bool {
        self.modifications.is_empty() && self.skipped.is_empty()
    }

    fn applied(&mut self, message: impl Into<String>) {
        self.modifications.push(message.into());
    }

    fn skip(&mut self, message: impl Into<String>) {
        let message = message.into();
        debug!(%message, "edit skipped");
        self.skipped.push(message);
    }
}

/// Apply every section of `spec` to `document`, in fixed order.
pub fn customize(
    document: Document,
    spec: &BuildingSpecification,
    template: &Template,
) -> (Document, ChangeLog) {
    let mut log = ChangeLog::default();
    let mut doc = document;

    if let Some(section) = &spec.location {
        doc = location::apply(doc, section, &mut log);
    }
    if let Some(section) = &spec.geometry {
        doc = geometry::apply(doc, section, template, &mut log);
    }
    if let Some(params) = spec.type_params() {
        doc = equipment::apply(doc, params, template, &mut log);
    }
    if let Some(section) = &spec.setpoints {
        doc = setpoints::apply(doc, section, &mut log);
    }
    if let Some(section) = &spec.simulation_options {
        doc = simulation::apply(doc, section, &mut log);
    }

    (doc, log)
}

/// Run one edit against `doc`.
///
/// `edit` returns `Ok(None)` when its anchor is absent. Both that and an
/// edit error leave a skipped entry and yield `None`.
fn attempt(
    doc: &Document,
    target: &dyn fmt::Display,
    log: &mut ChangeLog,
    edit: impl FnOnce(&Document) -> FormatResult<Option<Document>>,
) -> Option<Document> {
    match edit(doc) {
        Ok(Some(next)) => Some(next),
        Ok(None) => {
            log.skip(format!("skipped: {target} anchor not found"));
            None
        }
        Err(e) => {
            warn!(%target, error = %e, "edit failed");
            log.skip(format!("skipped: {target}: {e}"));
            None
        }
    }
}

/// Patch a single field, see [`attempt`].
fn patch_field(
    doc: &Document,
    anchor: &Anchor,
    value: &str,
    log: &mut ChangeLog,
) -> Option<Document> {
    attempt(doc, anchor, log, |d| {
        let patched = patch_scalar_field(d, anchor, value)?;
        if let Some(change) = &patched.change {
            debug!(%change, "field patched");
        }
        Ok(patched.change.is_some().then_some(patched.document))
    })
}

/// One field line of a generated object, aligned like hand-edited IDF.
fn field_line(value: &str, terminator: char, name: &str) -> String {
    let cell = format!("{value}{terminator}");
    format!("    {cell:<24} !- {name}\n")
}

/// Caller text made safe to use as a field value.
fn field_text(value: &str) -> String {
    let cleaned: String = value
        .chars()
        .map(|c| match c {
            ',' | ';' | '!' | '\r' | '\n' => '_',
            c => c,
        })
        .collect();
    cleaned.trim().to_string()
}

#[cfg(test)]
pub(crate) mod fixtures {
    use idfgen_catalog::Template;
    use serde_json::{json, Map};
    use std::path::PathBuf;

    /// Small model with one of every anchor the steps use.
    pub const MODEL: &str = "\
  Version,24.1;

  SimulationControl,
    Yes,                     !- Do Zone Sizing Calculation
    Yes,                     !- Do System Sizing Calculation
    No,                      !- Do Plant Sizing Calculation
    Yes,                     !- Run Simulation for Sizing Periods
    No;                      !- Run Simulation for Weather File Run Periods

  Building,
    DataCenter,              !- Name
    0,                       !- North Axis {deg}
    City,                    !- Terrain
    0.04,                    !- Loads Convergence Tolerance Value {W}
    0.4,                     !- Temperature Convergence Tolerance Value {deltaC}
    FullExterior,            !- Solar Distribution
    25;                      !- Maximum Number of Warmup Days

  Site:Location,
    Chicago Ohare Intl Ap,   !- Name
    41.98,                   !- Latitude {deg}
    -87.92,                  !- Longitude {deg}
    -6,                      !- Time Zone {hr}
    201;                     !- Elevation {m}

  Schedule:Compact,
    Cooling Return Air Setpoint Schedule,  !- Name
    Temperature,             !- Schedule Type Limits Name
    Through: 12/31,          !- Field 1
    For: AllDays,            !- Field 2
    Until: 24:00,            !- Field 3
    29.3;                    !- Field 4

  Schedule:Compact,
    Heating Setpoint Schedule,  !- Name
    Temperature,             !- Schedule Type Limits Name
    Through: 12/31,          !- Field 1
    For: AllDays,            !- Field 2
    Until: 24:00,            !- Field 3
    15.0;                    !- Field 4

  BuildingSurface:Detailed,
    Zn001:Wall001,           !- Name
    Wall,                    !- Surface Type
    EXTWALL,                 !- Construction Name
    Main Zone,               !- Zone Name
    ,                        !- Space Name
    Outdoors,                !- Outside Boundary Condition
    ,                        !- Outside Boundary Condition Object
    SunExposed,              !- Sun Exposure
    WindExposed,             !- Wind Exposure
    0.5,                     !- View Factor to Ground
    4,                       !- Number of Vertices
    0,0,4.572,  !- X,Y,Z ==> Vertex 1 {m}
    0,0,0,  !- X,Y,Z ==> Vertex 2 {m}
    15.24,0,0,  !- X,Y,Z ==> Vertex 3 {m}
    15.24,0,4.572;  !- X,Y,Z ==> Vertex 4 {m}

  ElectricEquipment:ITE:AirCooled,
    Data Center Servers,     !- Name
    Main Zone,               !- Zone or Space Name
    FlowFromSystem,          !- Air Flow Calculation Method
    Watts/Unit,              !- Design Power Input Calculation Method
    500,                     !- Watts per Unit {W}
    100,                     !- Number of Units
    ,                        !- Watts per Zone Floor Area {W/m2}
    Data Center Operation Schedule;  !- Design Power Input Schedule Name

  Exterior:Lights,
    Exterior Facade Lighting,  !- Name
    ALWAYS_ON,               !- Schedule Name
    1000;                    !- Design Level {W}

  Output:Variable,*,Site Outdoor Air Drybulb Temperature,Hourly;
";

    pub fn template() -> Template {
        let defaults = json!({
            "geometry": {"length_m": 15.24, "width_m": 15.24, "height_m": 4.572},
            "manufacturing": {"process_zone": "Main Zone", "equipment_schedule": "PROCESS_SCH"}
        });
        let defaults: Map<String, serde_json::Value> = match defaults {
            serde_json::Value::Object(map) => map,
            _ => Map::new(),
        };
        Template {
            id: "DataCenter_SingleZone".into(),
            name: "Data Center".into(),
            description: String::new(),
            building_type: "data_center".into(),
            hvac_system: "crac".into(),
            document_path: PathBuf::from("model.idf"),
            metadata_path: PathBuf::from("model.json"),
            defaults,
        }
    }
}
