//! An IDF document: source text plus its parsed objects.

use std::ops::Range;

use crate::error::{FormatError, Result};
use crate::parser::{IdfObject, Parser};

/// A parsed IDF document.
///
/// Documents are immutable values. Every edit splices the source text and
/// returns a new, re-parsed document; bytes outside the splice are kept as
/// they were.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    text: String,
    objects: Vec<IdfObject>,
}

impl Document {
    /// Parse a document from IDF text.
    pub fn parse(text: impl Into<String>) -> Result<Self> {
        let text = text.into();
        let objects = Parser::parse(&text)?;
        Ok(Self { text, objects })
    }

    /// The document text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Consume the document, returning its text.
    pub fn into_text(self) -> String {
        self.text
    }

    /// All objects in document order.
    pub fn objects(&self) -> &[IdfObject] {
        &self.objects
    }

    /// Objects with the given keyword (case-insensitive), with their indices.
    pub fn objects_of_type<'a>(
        &'a self,
        keyword: &'a str,
    ) -> impl Iterator<Item = (usize, &'a IdfObject)> + 'a {
        self.objects
            .iter()
            .enumerate()
            .filter(move |(_, o)| o.is(keyword))
    }

    /// Index of the first object with the given keyword.
    pub fn find_object(&self, keyword: &str) -> Option<usize> {
        self.objects_of_type(keyword).next().map(|(i, _)| i)
    }

    /// Object at `index`.
    pub fn object(&self, index: usize) -> Result<&IdfObject> {
        self.objects.get(index).ok_or(FormatError::OutOfRange {
            what: "object",
            index,
        })
    }

    /// Replace the value of one field, keeping its separator and comment.
    pub fn replace_field(&self, object: usize, field: usize, value: &str) -> Result<Document> {
        check_value(value)?;
        let span = self
            .object(object)?
            .fields
            .get(field)
            .ok_or(FormatError::OutOfRange {
                what: "field",
                index: field,
            })?
            .span;
        self.splice(span.start..span.end, value)
    }

    /// Replace a whole object, from its keyword through its trailing comment.
    ///
    /// Indentation before the keyword is kept; `text` supplies everything
    /// else and must itself parse as exactly one object.
    pub fn replace_object(&self, index: usize, text: &str) -> Result<Document> {
        let range = self.object(index)?.range();
        check_single_object(text)?;
        self.splice(range, text)
    }

    /// Insert `text` immediately before object `index`.
    ///
    /// When the object opens its line, `text` goes at the start of that line.
    /// Otherwise it goes right before the keyword, on a new line.
    pub fn insert_before_object(&self, index: usize, text: &str) -> Result<Document> {
        let start = self.object(index)?.keyword_span.start;
        let line_start = self.text[..start]
            .rfind('\n')
            .map_or_else(|| self.body_start(), |i| i + 1);
        if self.text[line_start..start].trim().is_empty() {
            return self.splice(line_start..line_start, text);
        }
        let mut block = String::with_capacity(text.len() + 1);
        block.push('\n');
        block.push_str(text);
        self.splice(start..start, &block)
    }

    /// The document text without a leading byte-order mark.
    pub fn body(&self) -> &str {
        &self.text[self.body_start()..]
    }

    fn body_start(&self) -> usize {
        if self.text.starts_with('\u{feff}') {
            '\u{feff}'.len_utf8()
        } else {
            0
        }
    }

    fn splice(&self, range: Range<usize>, replacement: &str) -> Result<Document> {
        let mut text =
            String::with_capacity(self.text.len() - (range.end - range.start) + replacement.len());
        text.push_str(&self.text[..range.start]);
        text.push_str(replacement);
        text.push_str(&self.text[range.end..]);
        Document::parse(text)
    }
}

/// Reject values that would add or remove separators.
fn check_value(value: &str) -> Result<()> {
    let reason = if value.contains([',', ';']) {
        "contains a field separator"
    } else if value.contains('!') {
        "contains a comment marker"
    } else if value.contains(['\n', '\r']) {
        "contains a line break"
    } else if value.trim() != value {
        "has surrounding whitespace"
    } else {
        return Ok(());
    };
    Err(FormatError::InvalidValue {
        value: value.to_string(),
        reason,
    })
}

fn check_single_object(text: &str) -> Result<()> {
    let objects = Parser::parse(text)?;
    if objects.len() != 1 {
        return Err(FormatError::InvalidValue {
            value: text.to_string(),
            reason: "replacement must contain exactly one object",
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const BUILDING: &str = "\
! model
  Building,
    HQ,                      !- Name
    0.0,                     !- North Axis {deg}
    City;                    !- Terrain

  Output:Variable,*,Site Outdoor Air Drybulb Temperature,Hourly;
";

    #[test]
    fn test_replace_field_keeps_comment() {
        let doc = Document::parse(BUILDING).unwrap();
        let out = doc.replace_field(0, 1, "45").unwrap();
        assert!(out
            .text()
            .contains("    45,                     !- North Axis {deg}\n"));
        assert_eq!(out.objects().len(), doc.objects().len());
        assert_eq!(out.objects()[0].fields.len(), 3);
        // Source document is untouched.
        assert!(doc.text().contains("0.0,"));
    }

    #[test]
    fn test_replace_field_rejects_separators() {
        let doc = Document::parse(BUILDING).unwrap();
        assert!(matches!(
            doc.replace_field(0, 0, "a,b"),
            Err(FormatError::InvalidValue { .. })
        ));
        assert!(matches!(
            doc.replace_field(0, 0, "a ! b"),
            Err(FormatError::InvalidValue { .. })
        ));
        assert!(matches!(
            doc.replace_field(0, 9, "x"),
            Err(FormatError::OutOfRange { what: "field", .. })
        ));
    }

    #[test]
    fn test_replace_empty_field() {
        let doc = Document::parse("A,\n  ,  !- Blank\n  1;\n").unwrap();
        let out = doc.replace_field(0, 0, "filled").unwrap();
        assert_eq!(out.text(), "A,\n  filled,  !- Blank\n  1;\n");
    }

    #[test]
    fn test_replace_object() {
        let doc = Document::parse(BUILDING).unwrap();
        let out = doc.replace_object(0, "Building,\n    New,\n    10;").unwrap();
        assert!(out.text().starts_with("! model\n  Building,\n    New,\n    10;\n\n"));
        assert_eq!(out.objects().len(), 2);
        assert!(doc.replace_object(0, "A;B;").is_err());
    }

    #[test]
    fn test_insert_before_object() {
        let doc = Document::parse(BUILDING).unwrap();
        let out = doc
            .insert_before_object(1, "  Version,25.2;\n\n")
            .unwrap();
        assert_eq!(out.objects().len(), 3);
        assert!(out.objects()[1].is("Version"));
        assert!(out
            .text()
            .contains("  Version,25.2;\n\n  Output:Variable,"));
    }

    #[test]
    fn test_insert_before_object_sharing_a_line() {
        let doc = Document::parse("  Version,24.1;  Exterior:Lights,L,ALWAYS_ON,10;\n").unwrap();
        let out = doc.insert_before_object(1, "  X,1;\n").unwrap();

        let keywords: Vec<&str> = out.objects().iter().map(|o| o.keyword.as_str()).collect();
        assert_eq!(keywords, ["Version", "X", "Exterior:Lights"]);
        assert!(out.text().starts_with("  Version,24.1;  \n  X,1;\nExterior:Lights,"));
    }

    #[test]
    fn test_insert_after_multiline_tail() {
        let doc = Document::parse("  Building,\n    HQ,\n    0; Output:Variable,*,T,Hourly;\n").unwrap();
        let out = doc.insert_before_object(1, "  X,1;\n").unwrap();

        assert_eq!(out.objects().len(), 3);
        assert_eq!(out.objects()[0].fields.len(), 2);
        assert!(out.objects()[1].is("X"));
        assert!(out.objects()[2].is("Output:Variable"));
    }

    #[test]
    fn test_bom_document() {
        let doc = Document::parse("\u{feff}  Version,24.1;\n").unwrap();
        assert!(doc.objects()[0].is("Version"));
        assert_eq!(doc.body(), "  Version,24.1;\n");

        let out = doc.insert_before_object(0, "  X,1;\n").unwrap();
        assert_eq!(out.text(), "\u{feff}  X,1;\n  Version,24.1;\n");
        assert!(out.objects()[0].is("X"));
    }

    #[test]
    fn test_find_object_case_insensitive() {
        let doc = Document::parse(BUILDING).unwrap();
        assert_eq!(doc.find_object("OUTPUT:VARIABLE"), Some(1));
        assert_eq!(doc.find_object("Site:Location"), None);
        assert_eq!(doc.objects_of_type("building").count(), 1);
    }
}
