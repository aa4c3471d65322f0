//! Type declarations generated from the widget descriptor.
//!
//! - [`descriptor`] - XML descriptor parsing
//! - [`render`] - Descriptor to `.d.ts` transformation

mod descriptor;
mod render;

pub use descriptor::{PropertyDef, PropertyType, WidgetDescriptor, parse_descriptor};
pub use render::render_typings;
