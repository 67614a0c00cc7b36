//! Splitting a content file into its YAML front matter and body.
//!
//! Front matter is the `---` delimited block at the very top of a `.md` or
//! `.mdx` file. Only scalar values are kept: strings, numbers, booleans and
//! dates. Nested mappings and lists (image objects, tag lists) are dropped,
//! since nothing that decides routes reads them.

use blog_kit_core::{ContentDocument, FieldValue, Frontmatter};
use log::debug;
use pulldown_cmark::{Event, MetadataBlockKind, Options, Parser, Tag, TagEnd};
use serde_yaml_ng::Value;

/// Split `source` into `(front matter YAML, body)`.
///
/// Returns `None` for the YAML when the file does not open with a metadata
/// block; the whole source is then the body.
pub fn split_frontmatter(source: &str) -> (Option<String>, &str) {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_YAML_STYLE_METADATA_BLOCKS);

    let mut yaml = String::new();
    let mut in_frontmatter = false;

    for (event, range) in Parser::new_ext(source, options).into_offset_iter() {
        match event {
            Event::Start(Tag::MetadataBlock(MetadataBlockKind::YamlStyle)) => {
                in_frontmatter = true;
            }
            Event::End(TagEnd::MetadataBlock(MetadataBlockKind::YamlStyle)) => {
                let body = source[range.end..].trim_start_matches(['\r', '\n']);
                return (Some(yaml), body);
            }
            Event::Text(ref text) if in_frontmatter => yaml.push_str(text),
            // Metadata blocks are only recognized as the first block.
            _ if !in_frontmatter => break,
            _ => {}
        }
    }

    (None, source)
}

/// Parse a front matter YAML mapping into scalar fields.
pub fn parse_frontmatter(yaml: &str) -> Result<Frontmatter, String> {
    let value: Value = serde_yaml_ng::from_str(yaml).map_err(|e| e.to_string())?;

    let mapping = match value {
        Value::Null => return Ok(Frontmatter::new()),
        Value::Mapping(mapping) => mapping,
        _ => return Err("front matter must be a mapping of keys to values".to_string()),
    };

    let mut frontmatter = Frontmatter::new();
    for (key, value) in mapping {
        let Some(key) = key.as_str() else {
            debug!("Skipping non-string front matter key {:?}", key);
            continue;
        };
        let field = if key == "slug" {
            slug_field_value(value)
        } else {
            to_field_value(value)
        };
        match field {
            Some(field) => frontmatter.insert(key, field),
            None => debug!("Skipping non-scalar front matter field '{}'", key),
        }
    }

    Ok(frontmatter)
}

fn to_field_value(value: Value) -> Option<FieldValue> {
    match value {
        Value::Bool(b) => Some(FieldValue::Bool(b)),
        Value::Number(n) => n
            .as_i64()
            .map(FieldValue::Integer)
            .or_else(|| n.as_f64().map(FieldValue::Float)),
        Value::String(s) => Some(FieldValue::from_text(&s)),
        Value::Tagged(tagged) => to_field_value(tagged.value),
        Value::Null | Value::Sequence(_) | Value::Mapping(_) => None,
    }
}

/// A slug is kept as written: `"2021-03-14"` is not promoted to a date and
/// `404` is the text `404`.
fn slug_field_value(value: Value) -> Option<FieldValue> {
    match value {
        Value::String(s) => Some(FieldValue::String(s)),
        Value::Number(n) => Some(FieldValue::String(n.to_string())),
        Value::Bool(b) => Some(FieldValue::String(b.to_string())),
        Value::Tagged(tagged) => slug_field_value(tagged.value),
        Value::Null | Value::Sequence(_) | Value::Mapping(_) => None,
    }
}

/// Build a document from a file's content-relative path and its source.
pub fn parse_document(file_path: &str, source: &str) -> Result<ContentDocument, String> {
    let (yaml, body) = split_frontmatter(source);
    let frontmatter = match yaml {
        Some(yaml) => parse_frontmatter(&yaml)?,
        None => Frontmatter::new(),
    };
    Ok(ContentDocument::new(file_path, frontmatter, body.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const POST: &str = "---\n\
title: Building a line-following robot\n\
slug: /line-follower\n\
date: 2021-03-14\n\
excerpt: \"Part one: motors\"\n\
featuredImage: ./cover.png\n\
tags:\n  - robots\n  - embedded\n\
---\n\
\n\
# Motors\n\
\n\
Some text.\n";

    #[test]
    fn test_split_frontmatter() {
        let (yaml, body) = split_frontmatter(POST);
        let yaml = yaml.unwrap();
        assert!(yaml.contains("slug: /line-follower"));
        assert!(!yaml.contains("---"));
        assert!(body.starts_with("# Motors"));
    }

    #[test]
    fn test_split_without_frontmatter() {
        let source = "# Just a heading\n\nbody\n";
        let (yaml, body) = split_frontmatter(source);
        assert!(yaml.is_none());
        assert_eq!(body, source);
    }

    #[test]
    fn test_parse_scalar_fields() {
        let doc = parse_document("blog/line-follower.mdx", POST).unwrap();
        let fm = &doc.frontmatter;
        assert_eq!(fm.slug().as_deref(), Some("/line-follower"));
        assert_eq!(fm.title(), Some("Building a line-following robot"));
        assert_eq!(fm.date(), NaiveDate::from_ymd_opt(2021, 3, 14));
        assert_eq!(
            fm.get("excerpt"),
            Some(&FieldValue::String("Part one: motors".to_string()))
        );
        // Lists are not scalar
        assert!(fm.get("tags").is_none());
    }

    #[test]
    fn test_parse_numbers_and_bools() {
        let fm = parse_frontmatter("ongoing: true\npart: 3\nrating: 4.5\nempty:\n").unwrap();
        assert_eq!(fm.get("ongoing"), Some(&FieldValue::Bool(true)));
        assert_eq!(fm.get("part"), Some(&FieldValue::Integer(3)));
        assert_eq!(fm.get("rating"), Some(&FieldValue::Float(4.5)));
        assert!(fm.get("empty").is_none());
    }

    #[test]
    fn test_slug_keeps_written_form() {
        let doc = parse_document(
            "projects/p/about.mdx",
            "---\ntitle: P\nslug: \"2021-03-14\"\nstartDate: 2021-03-14\n---\n",
        )
        .unwrap();
        assert_eq!(
            doc.frontmatter.get("slug"),
            Some(&FieldValue::String("2021-03-14".to_string()))
        );
        // Other date-shaped fields are still dates
        assert_eq!(
            doc.frontmatter.get("startDate"),
            Some(&FieldValue::Date(NaiveDate::from_ymd_opt(2021, 3, 14).unwrap()))
        );

        let fm = parse_frontmatter("slug: 404\n").unwrap();
        assert_eq!(fm.slug().as_deref(), Some("404"));

        let fm = parse_frontmatter("slug:\n").unwrap();
        assert_eq!(fm.slug(), None);
    }

    #[test]
    fn test_parse_rejects_non_mapping() {
        let err = parse_frontmatter("- a\n- b\n").unwrap_err();
        assert!(err.contains("mapping"));
    }

    #[test]
    fn test_parse_reports_yaml_errors() {
        assert!(parse_frontmatter("title: [unclosed\n").is_err());
    }
}
