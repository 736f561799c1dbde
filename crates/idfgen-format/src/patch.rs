//! Field patcher: locate one field by structural anchor and rewrite it.

use std::fmt;

use tracing::debug;

use crate::document::Document;
use crate::error::{FormatError, Result};
use crate::parser::IdfObject;

/// How to pick a field inside an object.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldSelector {
    /// Zero-based field position after the keyword.
    Index(usize),
    /// Field whose `!-` comment names it (case-insensitive, units ignored).
    Named(String),
    /// The field right after the first field whose value equals the marker.
    After(String),
    /// The object's last field, provided the field before it equals the marker.
    LastAfter(String),
}

impl FieldSelector {
    fn resolve(&self, object: &IdfObject) -> Option<usize> {
        let fields = &object.fields;
        match self {
            FieldSelector::Index(idx) => (*idx < fields.len()).then_some(*idx),
            FieldSelector::Named(name) => object.field_named(name),
            FieldSelector::After(marker) => fields
                .iter()
                .position(|f| f.value_is(marker))
                .map(|i| i + 1)
                .filter(|&i| i < fields.len()),
            FieldSelector::LastAfter(marker) => {
                let last = fields.len().checked_sub(1)?;
                let before = last.checked_sub(1)?;
                fields[before].value_is(marker).then_some(last)
            }
        }
    }
}

impl fmt::Display for FieldSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldSelector::Index(idx) => write!(f, "field #{idx}"),
            FieldSelector::Named(name) => write!(f, "'{name}'"),
            FieldSelector::After(marker) => write!(f, "value after '{marker}'"),
            FieldSelector::LastAfter(marker) => write!(f, "final value after '{marker}'"),
        }
    }
}

/// Structural pattern that addresses one field of one object.
#[derive(Debug, Clone, PartialEq)]
pub struct Anchor {
    /// Object keyword (case-insensitive).
    pub keyword: String,
    /// Restrict matches to objects whose first field equals this name.
    pub object_name: Option<String>,
    /// Field within the object.
    pub selector: FieldSelector,
}

impl Anchor {
    /// Anchor on the first object of `keyword` where `selector` resolves.
    pub fn new(keyword: impl Into<String>, selector: FieldSelector) -> Self {
        Self {
            keyword: keyword.into(),
            object_name: None,
            selector,
        }
    }

    /// Only match objects with the given name.
    pub fn named(mut self, object_name: impl Into<String>) -> Self {
        self.object_name = Some(object_name.into());
        self
    }

    fn matches_object(&self, object: &IdfObject) -> bool {
        object.is(&self.keyword)
            && self
                .object_name
                .as_deref()
                .map_or(true, |name| object.name().is_some_and(|n| n.eq_ignore_ascii_case(name)))
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.keyword)?;
        if let Some(name) = &self.object_name {
            write!(f, " '{name}'")?;
        }
        write!(f, " / {}", self.selector)
    }
}

/// Position of a field in a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldLocation {
    /// Object index.
    pub object: usize,
    /// Field index within the object.
    pub field: usize,
}

/// Record of one rewritten field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldChange {
    /// Keyword of the edited object.
    pub keyword: String,
    /// Field label: its comment name, or its position.
    pub field: String,
    /// Value before the edit.
    pub old: String,
    /// Value after the edit.
    pub new: String,
}

impl fmt::Display for FieldChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {} -> {}", self.keyword, self.field, self.old, self.new)
    }
}

/// Result of a patch: the new document and, when an anchor matched, what changed.
#[derive(Debug, Clone)]
pub struct Patched {
    /// The patched document (the input unchanged when nothing matched).
    pub document: Document,
    /// `None` when the anchor matched nothing.
    pub change: Option<FieldChange>,
}

impl Document {
    /// Locate the first field matching `anchor`.
    pub fn locate(&self, anchor: &Anchor) -> Option<FieldLocation> {
        self.objects()
            .iter()
            .enumerate()
            .filter(|(_, o)| anchor.matches_object(o))
            .find_map(|(object, o)| {
                anchor
                    .selector
                    .resolve(o)
                    .map(|field| FieldLocation { object, field })
            })
    }

    /// Rewrite the field at `loc`, returning the new document and change record.
    pub fn patch_at(&self, loc: FieldLocation, value: &str) -> Result<Patched> {
        let object = self.object(loc.object)?;
        let field = object.fields.get(loc.field).ok_or(FormatError::OutOfRange {
            what: "field",
            index: loc.field,
        })?;
        let change = FieldChange {
            keyword: object.keyword.clone(),
            field: field
                .name()
                .map(str::to_string)
                .unwrap_or_else(|| format!("field #{}", loc.field)),
            old: field.value.clone(),
            new: value.to_string(),
        };
        let document = self.replace_field(loc.object, loc.field, value)?;
        Ok(Patched {
            document,
            change: Some(change),
        })
    }
}

/// Rewrite the first field matching `anchor` with `value`.
///
/// A missing anchor is not an error: the document comes back unchanged and
/// `change` is `None`.
pub fn patch_scalar_field(doc: &Document, anchor: &Anchor, value: &str) -> Result<Patched> {
    match doc.locate(anchor) {
        Some(loc) => doc.patch_at(loc, value),
        None => {
            debug!(%anchor, "anchor not matched");
            Ok(Patched {
                document: doc.clone(),
                change: None,
            })
        }
    }
}

/// Format a vertex coordinate with fixed precision.
pub fn format_coordinate(value: f64) -> String {
    format!("{value:.6}")
}

/// Format a scalar field value (shortest round-trip representation).
pub fn format_scalar(value: f64) -> String {
    format!("{value}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const SCHEDULES: &str = "\
  Schedule:Compact,
    Heating Setpoint Schedule,  !- Name
    Temperature,             !- Schedule Type Limits Name
    Through: 12/31,          !- Field 1
    For: AllDays,            !- Field 2
    Until: 24:00,15.6;       !- Field 3

  Schedule:Compact,
    Cooling Return Air Setpoint Schedule,  !- Name
    Temperature,             !- Schedule Type Limits Name
    Through: 12/31,          !- Field 1
    For: WeekDays,           !- Field 2
    Until: 24:00,25.0,       !- Field 3
    For: AllOtherDays,       !- Field 4
    Until: 24:00,29.0;       !- Field 5

  ElectricEquipment:ITE:AirCooled,
    Data Center Servers,     !- Name
    DataCenter,              !- Zone or Space Name
    FlowFromSystem,          !- Air Flow Calculation Method
    Watts/Unit,              !- Design Power Input Calculation Method
    500,                     !- Watts per Unit {W}
    100,                     !- Number of Units
    ;                        !- Watts per Zone Floor Area {W/m2}
";

    fn doc() -> Document {
        Document::parse(SCHEDULES).unwrap()
    }

    #[test]
    fn test_named_object_last_after() {
        let anchor = Anchor::new("Schedule:Compact", FieldSelector::LastAfter("Until: 24:00".into()))
            .named("Cooling Return Air Setpoint Schedule");
        let patched = patch_scalar_field(&doc(), &anchor, "27.5").unwrap();

        let change = patched.change.unwrap();
        assert_eq!(change.old, "29.0");
        assert!(patched.document.text().contains("Until: 24:00,27.5;       !- Field 5"));
        // The weekday value is not the terminating field.
        assert!(patched.document.text().contains("Until: 24:00,25.0,"));
        // Heating schedule is untouched.
        assert!(patched.document.text().contains("Until: 24:00,15.6;"));
    }

    #[test]
    fn test_after_marker_and_neighbour() {
        let d = doc();
        let anchor = Anchor::new(
            "ElectricEquipment:ITE:AirCooled",
            FieldSelector::After("watts/unit".into()),
        );
        let loc = d.locate(&anchor).unwrap();
        assert_eq!(loc.field, 4);

        let watts = d.patch_at(loc, "5000").unwrap();
        let units = watts
            .document
            .patch_at(FieldLocation { field: loc.field + 1, ..loc }, "10")
            .unwrap();
        let text = units.document.text();
        assert!(text.contains("    5000,                     !- Watts per Unit {W}"));
        assert!(text.contains("    10,                     !- Number of Units"));
        assert_eq!(units.change.unwrap().field, "Number of Units");
    }

    #[test]
    fn test_named_field_selector() {
        let anchor = Anchor::new("ElectricEquipment:ITE:AirCooled", FieldSelector::Named("Number of Units".into()));
        let loc = doc().locate(&anchor).unwrap();
        assert_eq!(loc, FieldLocation { object: 2, field: 5 });
    }

    #[test]
    fn test_missing_anchor_is_noop() {
        let d = doc();
        let anchor = Anchor::new("Site:Location", FieldSelector::Index(1));
        let patched = patch_scalar_field(&d, &anchor, "1.0").unwrap();
        assert!(patched.change.is_none());
        assert_eq!(patched.document.text(), d.text());

        let anchor = Anchor::new("Schedule:Compact", FieldSelector::Index(0)).named("Nope");
        assert!(d.locate(&anchor).is_none());
    }

    #[test]
    fn test_first_match_only() {
        let d = doc();
        let anchor = Anchor::new("Schedule:Compact", FieldSelector::Index(1));
        let patched = patch_scalar_field(&d, &anchor, "Any Number").unwrap();
        let text = patched.document.text();
        assert_eq!(text.matches("Any Number").count(), 1);
        assert_eq!(text.matches("    Temperature,").count(), 1);
    }

    #[test]
    fn test_change_display() {
        let anchor = Anchor::new("Schedule:Compact", FieldSelector::Index(1));
        let change = patch_scalar_field(&doc(), &anchor, "Fraction").unwrap().change.unwrap();
        assert_eq!(
            change.to_string(),
            "Schedule:Compact Schedule Type Limits Name: Temperature -> Fraction"
        );
        assert_eq!(
            Anchor::new("Building", FieldSelector::Index(1)).named("HQ").to_string(),
            "Building 'HQ' / field #1"
        );
    }

    #[test]
    fn test_formatting() {
        assert_eq!(format_coordinate(15.24), "15.240000");
        assert_eq!(format_coordinate(-0.5), "-0.500000");
        assert_eq!(format_scalar(37.5), "37.5");
        assert_eq!(format_scalar(-122.3), "-122.3");
        assert_eq!(format_scalar(24.0), "24");
    }

    proptest! {
        #[test]
        fn property_disjoint_patches_commute(heat in 10.0f64..25.0, cool in 15.0f64..35.0) {
            let d = doc();
            let heating = Anchor::new("Schedule:Compact", FieldSelector::LastAfter("Until: 24:00".into()))
                .named("Heating Setpoint Schedule");
            let cooling = Anchor::new("Schedule:Compact", FieldSelector::LastAfter("Until: 24:00".into()))
                .named("Cooling Return Air Setpoint Schedule");
            let (h, c) = (format_scalar(heat), format_scalar(cool));

            let hc = patch_scalar_field(&d, &heating, &h).unwrap().document;
            let hc = patch_scalar_field(&hc, &cooling, &c).unwrap().document;
            let ch = patch_scalar_field(&d, &cooling, &c).unwrap().document;
            let ch = patch_scalar_field(&ch, &heating, &h).unwrap().document;

            prop_assert_eq!(hc.text(), ch.text());
            prop_assert_eq!(hc.objects().len(), d.objects().len());
        }
    }
}
