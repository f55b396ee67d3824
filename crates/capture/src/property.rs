//! The property record shared by workflow definitions and process instances.
//!
//! A [`Property`] is a value object. Workflows declare the default set; a new
//! process receives its own deep copy of that set at synthesis time, so edits
//! on one never reach the other.
//!
//! Two slots are reserved and addressed through [`ReservedProperty`]. Matching
//! requires **both** the id and the name, because the remote engine keys these
//! slots on the pair.

use serde::{Deserialize, Serialize};

use crate::wire::null_as_default;

/// Position of a captured value on a document page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BoundingBox {
    /// Left edge, in page pixels.
    #[serde(default)]
    pub left: i32,
    /// Top edge, in page pixels.
    #[serde(default)]
    pub top: i32,
    /// Right edge, in page pixels.
    #[serde(default)]
    pub right: i32,
    /// Bottom edge, in page pixels.
    #[serde(default)]
    pub bottom: i32,
    /// Page the value was captured from.
    #[serde(default)]
    pub page: i32,
}

/// A single named, typed attribute of a workflow or process.
///
/// Mirrors the remote engine's full property schema so a process posted from
/// a workflow carries every member the workflow declared.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Property {
    /// Unique within the owning property set. Reserved slots use 0 and -1.
    #[serde(rename = "ID")]
    pub id: i32,

    /// Property name; reserved slots also match on it.
    #[serde(rename = "Name", default, deserialize_with = "null_as_default")]
    pub name: String,

    /// Engine-defined data type code.
    #[serde(rename = "Type", default)]
    pub property_type: i32,

    /// Set for properties the engine itself maintains.
    #[serde(rename = "SystemProperty", default)]
    pub is_system: bool,

    /// Current value, as text.
    #[serde(rename = "Value", default, deserialize_with = "null_as_default")]
    pub value: String,

    /// Structured companion to `value` (e.g. multi-value fields). Opaque here.
    #[serde(rename = "MValue", default)]
    pub meta_value: serde_json::Value,

    /// Recognition confidence reported by the engine.
    #[serde(rename = "Confidence", default)]
    pub confidence: i32,

    /// Engine-defined code for where the value came from.
    #[serde(rename = "SourceType", default)]
    pub source_type: i32,

    /// Container (portal) the property's field is bound to.
    #[serde(rename = "PortalID", default)]
    pub container_id: i32,

    /// Field source (database) the property's field is bound to.
    #[serde(rename = "DBID", default)]
    pub field_source_id: i32,

    /// Field within the field source.
    #[serde(rename = "FieldID", default)]
    pub field_id: i32,

    /// Table-field payload. Opaque here.
    #[serde(rename = "TableFields", default)]
    pub table_fields: serde_json::Value,

    /// Where the value sits on the document; flattened on the wire.
    #[serde(flatten)]
    pub bounding_box: BoundingBox,

    /// Set when the property comes from a capture template.
    #[serde(rename = "TemplateProperty", default)]
    pub is_template_property: bool,
}

impl Property {
    /// Creates a property with the given id and name; every other member takes
    /// its default.
    pub fn new(id: i32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            ..Self::default()
        }
    }

    /// Returns `true` if this property occupies the given reserved slot.
    pub fn is_reserved(&self, slot: ReservedProperty) -> bool {
        self.id == slot.id() && self.name == slot.name()
    }
}

// ---------------------------------------------------------------------------
// Reserved slots
// ---------------------------------------------------------------------------

/// Property slots every workflow's default set must declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReservedProperty {
    /// Receives a freshly generated batch identifier for each new process.
    BatchId,
    /// Receives the server-side path of the process's uploaded document.
    FilePath,
}

impl ReservedProperty {
    /// The slot's well-known property id.
    pub const fn id(self) -> i32 {
        match self {
            ReservedProperty::BatchId => 0,
            ReservedProperty::FilePath => -1,
        }
    }

    /// The slot's well-known property name.
    pub const fn name(self) -> &'static str {
        match self {
            ReservedProperty::BatchId => "BatchID",
            ReservedProperty::FilePath => "FilePath",
        }
    }

    /// Finds the first property occupying this slot.
    pub fn find(self, properties: &[Property]) -> Option<&Property> {
        properties.iter().find(|p| p.is_reserved(self))
    }

    /// Finds the first property occupying this slot, mutably.
    pub fn find_mut(self, properties: &mut [Property]) -> Option<&mut Property> {
        properties.iter_mut().find(|p| p.is_reserved(self))
    }
}

impl std::fmt::Display for ReservedProperty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (id {})", self.name(), self.id())
    }
}
