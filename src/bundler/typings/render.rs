//! Typings rendering.
//!
//! Maps a [`WidgetDescriptor`] to a TypeScript declaration file. The output
//! depends only on the descriptor and widget name.

use super::descriptor::{PropertyDef, PropertyType, WidgetDescriptor};
use crate::bundler::error::{Error, Result};
use handlebars::Handlebars;
use serde::Serialize;
use std::path::Path;

const TYPINGS_TEMPLATE: &str = "/**
 * This file was generated from {{source_file}}
 * WARNING: All changes made to this file will be overwritten
 */
{{#each interfaces}}

export interface {{name}} {
{{#each fields}}
{{#if caption}}
    /** {{caption}} */
{{/if}}
    {{key}}{{#if optional}}?{{/if}}: {{ts_type}};
{{/each}}
}
{{/each}}
";

#[derive(Serialize)]
struct TypingsData {
    source_file: String,
    interfaces: Vec<InterfaceData>,
}

#[derive(Serialize)]
struct InterfaceData {
    name: String,
    fields: Vec<FieldData>,
}

#[derive(Serialize)]
struct FieldData {
    key: String,
    optional: bool,
    ts_type: String,
    caption: Option<String>,
}

/// Renders the declaration file for `widget_name`.
///
/// Object properties produce their own interfaces, emitted before the
/// interface that uses them; the widget's `{widget_name}Props` interface
/// comes last. A nested object's interface name is prefixed with the names
/// of the objects enclosing it (`ColumnsActionsType`), and two objects that
/// would still share a name are rejected.
pub fn render_typings(descriptor: &WidgetDescriptor, widget_name: &str) -> Result<String> {
    let source_file = format!("{widget_name}.xml");
    let mut interfaces = Vec::new();
    let fields = collect_fields(&descriptor.properties, "", &mut interfaces)
        .map_err(|message| Error::descriptor(Path::new(&source_file), message))?;
    interfaces.push(InterfaceData {
        name: format!("{widget_name}Props"),
        fields,
    });

    let data = TypingsData {
        source_file,
        interfaces,
    };

    let mut handlebars = Handlebars::new();
    handlebars.register_escape_fn(handlebars::no_escape);
    handlebars
        .register_template_string("typings.d.ts", TYPINGS_TEMPLATE)
        .map_err(|e| Error::Template(format!("failed to register typings template: {}", e)))?;

    handlebars
        .render("typings.d.ts", &data)
        .map_err(|e| Error::Template(format!("failed to render typings: {}", e)))
}

fn collect_fields(
    properties: &[PropertyDef],
    prefix: &str,
    interfaces: &mut Vec<InterfaceData>,
) -> std::result::Result<Vec<FieldData>, String> {
    properties
        .iter()
        .map(|property| {
            Ok(FieldData {
                key: property_name(&property.key),
                optional: !property.required,
                ts_type: ts_type(property, prefix, interfaces)?,
                caption: property.caption.as_deref().map(doc_comment_text),
            })
        })
        .collect()
}

fn ts_type(
    property: &PropertyDef,
    prefix: &str,
    interfaces: &mut Vec<InterfaceData>,
) -> std::result::Result<String, String> {
    let ts_type = match &property.kind {
        PropertyType::String => "string".to_string(),
        PropertyType::Boolean => "boolean".to_string(),
        PropertyType::Number => "number".to_string(),
        PropertyType::Enumeration(values) => values
            .iter()
            .map(|v| string_literal(v))
            .collect::<Vec<_>>()
            .join(" | "),
        PropertyType::Object(children) => {
            let path = format!("{prefix}{}", pascal_case(&property.key));
            let name = format!("{path}Type");
            let fields = collect_fields(children, &path, interfaces)?;
            if interfaces.iter().any(|existing| existing.name == name) {
                return Err(format!(
                    "object property '{}' maps to interface {} more than once",
                    property.key, name
                ));
            }
            interfaces.push(InterfaceData {
                name: name.clone(),
                fields,
            });
            if property.is_list {
                format!("{name}[]")
            } else {
                name
            }
        }
        PropertyType::Unknown(kind) => {
            log::warn!(
                "Property '{}' has unsupported type '{}', typed as unknown",
                property.key,
                kind
            );
            "unknown".to_string()
        }
    };
    Ok(ts_type)
}

/// Field name, quoted when it is not a plain identifier.
fn property_name(key: &str) -> String {
    let mut chars = key.chars();
    let is_identifier = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');
    if is_identifier {
        key.to_string()
    } else {
        string_literal(key)
    }
}

fn string_literal(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}

fn pascal_case(key: &str) -> String {
    key.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

fn doc_comment_text(caption: &str) -> String {
    caption.replace("*/", "*\\/")
}
