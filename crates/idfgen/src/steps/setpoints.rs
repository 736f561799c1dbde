//! Thermostat setpoint step.

use idfgen_format::{format_scalar, Anchor, Document, FieldSelector};

use super::{patch_field, ChangeLog};
use crate::spec::Setpoints;

const COOLING_SCHEDULE: &str = "Cooling Return Air Setpoint Schedule";
const HEATING_SCHEDULE: &str = "Heating Setpoint Schedule";
const END_OF_DAY: &str = "Until: 24:00";

pub(super) fn apply(doc: Document, setpoints: &Setpoints, log: &mut ChangeLog) -> Document {
    let targets = [
        ("cooling", COOLING_SCHEDULE, setpoints.cooling_setpoint_c),
        ("heating", HEATING_SCHEDULE, setpoints.heating_setpoint_c),
    ];

    let mut doc = doc;
    for (label, schedule, value) in targets {
        let Some(value) = value else { continue };
        let anchor = Anchor::new("Schedule:Compact", FieldSelector::LastAfter(END_OF_DAY.into()))
            .named(schedule);
        if let Some(next) = patch_field(&doc, &anchor, &format_scalar(value), log) {
            log.applied(format!("Set {label} setpoint to {value}°C"));
            doc = next;
        }
    }
    doc
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::steps::fixtures::MODEL;

    fn final_value(doc: &Document, schedule: &str) -> String {
        doc.objects_of_type("Schedule:Compact")
            .map(|(_, o)| o)
            .find(|o| o.name() == Some(schedule))
            .and_then(|o| o.fields.last())
            .map(|f| f.value.clone())
            .unwrap()
    }

    #[test]
    fn test_sets_both_setpoints() {
        let doc = Document::parse(MODEL).unwrap();
        let mut log = ChangeLog::default();
        let setpoints = Setpoints {
            cooling_setpoint_c: Some(27.0),
            heating_setpoint_c: Some(18.5),
        };
        let out = apply(doc, &setpoints, &mut log);

        assert_eq!(final_value(&out, COOLING_SCHEDULE), "27");
        assert_eq!(final_value(&out, HEATING_SCHEDULE), "18.5");
        assert!(out.text().contains("    27;                    !- Field 4\n"));
        assert_eq!(
            log.modifications,
            ["Set cooling setpoint to 27°C", "Set heating setpoint to 18.5°C"]
        );
    }

    #[test]
    fn test_only_requested_setpoint_changes() {
        let doc = Document::parse(MODEL).unwrap();
        let mut log = ChangeLog::default();
        let setpoints = Setpoints {
            cooling_setpoint_c: None,
            heating_setpoint_c: Some(20.0),
        };
        let out = apply(doc, &setpoints, &mut log);
        assert_eq!(final_value(&out, COOLING_SCHEDULE), "29.3");
        assert_eq!(final_value(&out, HEATING_SCHEDULE), "20");
    }

    #[test]
    fn test_schedule_without_end_of_day_skipped() {
        let text = "\
  Schedule:Compact,
    Cooling Return Air Setpoint Schedule,
    Temperature,
    Through: 12/31,
    For: AllDays,
    Until: 12:00, 25,
    Until: 18:00,
    26;
";
        let doc = Document::parse(text).unwrap();
        let mut log = ChangeLog::default();
        let setpoints = Setpoints {
            cooling_setpoint_c: Some(27.0),
            heating_setpoint_c: None,
        };
        let out = apply(doc, &setpoints, &mut log);
        assert_eq!(out.text(), text);
        assert_eq!(log.skipped.len(), 1);
    }
}
