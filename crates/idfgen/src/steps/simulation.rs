//! Simulation control step.

use idfgen_format::{Document, IdfObject};

use super::{attempt, ChangeLog};
use crate::spec::SimulationOptions;

const SIMULATION_CONTROL: &str = "SimulationControl";

/// Field names with their standard positions, used when comments are absent.
const ZONE_SIZING: (&str, usize) = ("Do Zone Sizing Calculation", 0);
const SYSTEM_SIZING: (&str, usize) = ("Do System Sizing Calculation", 1);
const SIZING_PERIODS: (&str, usize) = ("Run Simulation for Sizing Periods", 3);
const WEATHER_RUN_PERIODS: (&str, usize) = ("Run Simulation for Weather File Run Periods", 4);

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}

/// Index of a Yes/No flag, by comment name or standard position.
fn flag_field(object: &IdfObject, (name, position): (&str, usize)) -> Option<usize> {
    let index = object.field_named(name).or_else(|| {
        let unnamed = object.fields.iter().all(|f| f.name().is_none());
        unnamed.then_some(position)
    })?;
    let field = object.fields.get(index)?;
    (field.value_is("Yes") || field.value_is("No")).then_some(index)
}

/// Rewrite `flags` together, or not at all.
fn set_flags(
    doc: &Document,
    flags: &[((&str, usize), bool)],
    log: &mut ChangeLog,
) -> Option<Document> {
    attempt(doc, &SIMULATION_CONTROL, log, |d| {
        let Some(index) = d.find_object(SIMULATION_CONTROL) else {
            return Ok(None);
        };
        let object = d.object(index)?;
        let Some(fields) = flags
            .iter()
            .map(|(flag, value)| flag_field(object, *flag).map(|f| (f, *value)))
            .collect::<Option<Vec<_>>>()
        else {
            return Ok(None);
        };

        let mut next = d.clone();
        for (field, value) in fields {
            next = next.replace_field(index, field, yes_no(value))?;
        }
        Ok(Some(next))
    })
}

pub(super) fn apply(doc: Document, options: &SimulationOptions, log: &mut ChangeLog) -> Document {
    let mut doc = doc;

    let run_flags = [
        (SIZING_PERIODS, options.run_design_days),
        (WEATHER_RUN_PERIODS, options.run_annual),
    ];
    if let Some(next) = set_flags(&doc, &run_flags, log) {
        log.applied(format!(
            "Simulation: design_days={}, annual={}",
            options.run_design_days, options.run_annual
        ));
        doc = next;
    }

    if let Some(sizing) = options.sizing_run {
        let sizing_flags = [(ZONE_SIZING, sizing), (SYSTEM_SIZING, sizing)];
        if let Some(next) = set_flags(&doc, &sizing_flags, log) {
            log.applied(format!("Sizing calculations: zone={sizing}, system={sizing}"));
            doc = next;
        }
    }

    doc
}
