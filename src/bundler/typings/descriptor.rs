//! Widget descriptor parsing.
//!
//! Reads the XML document describing a widget's configurable properties.
//! Properties may sit directly under `<properties>` or inside any depth of
//! `<propertyGroup>` elements; `object` properties nest their own
//! `<properties>` block.

use crate::bundler::error::{Error, Result};
use roxmltree::{Document, Node};
use std::path::Path;

/// Declared property type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyType {
    /// Free text and anything referenced by name (attributes, actions, ...)
    String,
    /// `boolean`
    Boolean,
    /// `integer` or `decimal`
    Number,
    /// `enumeration` with its value keys
    Enumeration(Vec<String>),
    /// `object` with nested properties
    Object(Vec<PropertyDef>),
    /// A type this generator does not know
    Unknown(String),
}

impl PropertyType {
    fn from_attr(kind: &str) -> Self {
        match kind {
            "boolean" => PropertyType::Boolean,
            "integer" | "decimal" => PropertyType::Number,
            "string" | "translatableString" | "textTemplate" | "expression" | "attribute"
            | "association" | "entity" | "entityConstraint" | "microflow" | "nanoflow"
            | "form" | "image" | "file" | "icon" | "action" | "datasource" | "selection" => {
                PropertyType::String
            }
            other => PropertyType::Unknown(other.to_string()),
        }
    }
}

/// One configurable property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDef {
    /// Property key, used as the field name
    pub key: String,
    /// Declared type
    pub kind: PropertyType,
    /// Caption shown in the modeler
    pub caption: Option<String>,
    /// Longer description
    pub description: Option<String>,
    /// `required` attribute, true unless `"false"`
    pub required: bool,
    /// `isList` attribute on object properties
    pub is_list: bool,
}

/// Parsed widget descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetDescriptor {
    /// `<name>` element, if present
    pub name: Option<String>,
    /// Top-level properties in document order
    pub properties: Vec<PropertyDef>,
}

/// Parses descriptor text. `path` is only used for error messages.
pub fn parse_descriptor(xml: &str, path: &Path) -> Result<WidgetDescriptor> {
    let doc = Document::parse(xml).map_err(|e| Error::descriptor(path, e.to_string()))?;
    let root = doc.root_element();

    let name = child_element(root, "name").and_then(element_text);

    // Accept both <widget><properties>...</properties></widget> and a bare
    // <properties> root.
    let container = child_element(root, "properties").unwrap_or(root);
    let properties = collect_properties(&doc, container, path)?;

    Ok(WidgetDescriptor { name, properties })
}

fn collect_properties(doc: &Document, container: Node, path: &Path) -> Result<Vec<PropertyDef>> {
    let mut properties = Vec::new();
    for node in container.children().filter(Node::is_element) {
        match node.tag_name().name() {
            "property" => properties.push(parse_property(doc, node, path)?),
            "propertyGroup" => properties.extend(collect_properties(doc, node, path)?),
            _ => {}
        }
    }
    Ok(properties)
}

fn parse_property(doc: &Document, node: Node, path: &Path) -> Result<PropertyDef> {
    let line = doc.text_pos_at(node.range().start).row;

    let key = node
        .attribute("key")
        .or_else(|| node.attribute("name"))
        .filter(|k| !k.trim().is_empty())
        .ok_or_else(|| {
            Error::descriptor(
                path,
                format!("line {line}: property is missing required attribute 'key'"),
            )
        })?
        .to_string();

    let type_attr = node.attribute("type").ok_or_else(|| {
        Error::descriptor(
            path,
            format!("line {line}: property '{key}' is missing required attribute 'type'"),
        )
    })?;

    let kind = match type_attr {
        "enumeration" => {
            let values: Vec<String> = child_element(node, "enumerationValues")
                .map(|values| {
                    values
                        .children()
                        .filter(|n| n.has_tag_name("enumerationValue"))
                        .filter_map(|n| n.attribute("key").map(String::from))
                        .collect()
                })
                .unwrap_or_default();
            if values.is_empty() {
                return Err(Error::descriptor(
                    path,
                    format!("line {line}: enumeration '{key}' declares no values"),
                ));
            }
            PropertyType::Enumeration(values)
        }
        "object" => {
            let children = match child_element(node, "properties") {
                Some(nested) => collect_properties(doc, nested, path)?,
                None => Vec::new(),
            };
            PropertyType::Object(children)
        }
        other => PropertyType::from_attr(other),
    };

    Ok(PropertyDef {
        caption: attribute_or_child(node, "caption"),
        description: attribute_or_child(node, "description"),
        required: node.attribute("required") != Some("false"),
        is_list: node.attribute("isList") == Some("true"),
        key,
        kind,
    })
}

fn child_element<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|n| n.has_tag_name(name))
}

fn attribute_or_child(node: Node, name: &str) -> Option<String> {
    node.attribute(name)
        .map(str::to_string)
        .or_else(|| child_element(node, name).and_then(element_text))
        .map(|text| text.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|text| !text.is_empty())
}

fn element_text(node: Node) -> Option<String> {
    let text: String = node
        .descendants()
        .filter(Node::is_text)
        .filter_map(|n| n.text())
        .collect();
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}
