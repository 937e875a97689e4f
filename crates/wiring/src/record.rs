use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::DEFAULT_SCOPE;

/// One declared component and its injected dependencies, as extracted from a
/// wiring descriptor. Immutable once extraction has produced it.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct WiringRecord {
    /// Declaration id, unique within one descriptor file
    pub id: String,

    /// Fully qualified implementing type; may be empty
    pub type_name: String,

    /// Lifecycle scope; defaults to `"singleton"`
    pub scope: String,

    /// Lazy initialization requested
    pub lazy: bool,

    /// Preferred candidate among same-typed components
    pub primary: bool,

    /// Lifecycle callback names, when declared
    pub init_method: Option<String>,
    pub destroy_method: Option<String>,

    /// Setter-injected bindings, in declaration order
    pub properties: Vec<PropertyBinding>,

    /// Constructor bindings, in declaration order
    pub constructor_args: Vec<ConstructorBinding>,

    /// Every attribute on the declaring element, unknown ones included
    pub raw_attributes: BTreeMap<String, String>,

    /// Descriptor file this record came from
    pub source_file: PathBuf,

    /// 1-based line of the declaring element
    pub line_number: u32,
}

impl WiringRecord {
    pub fn new(id: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            type_name: type_name.into(),
            scope: DEFAULT_SCOPE.to_string(),
            lazy: false,
            primary: false,
            init_method: None,
            destroy_method: None,
            properties: Vec::new(),
            constructor_args: Vec::new(),
            raw_attributes: BTreeMap::new(),
            source_file: PathBuf::new(),
            line_number: 0,
        }
    }

    /// Type name with the namespace path stripped (`com.acme.UserDao` → `UserDao`)
    pub fn unqualified_name(&self) -> &str {
        match self.type_name.rsplit_once('.') {
            Some((_, tail)) => tail,
            None => &self.type_name,
        }
    }
}

/// A single setter-injected binding: exactly one of a literal value, a
/// reference to another record, or a composite form.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct PropertyBinding {
    pub name: String,
    pub value: Option<String>,
    pub ref_id: Option<String>,
    pub type_hint: Option<String>,
    pub is_list: bool,
    pub is_map: bool,
    pub is_set: bool,
}

impl PropertyBinding {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_value(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: Some(value.into()),
            ..Self::default()
        }
    }

    /// Binding points at another record by id
    pub fn is_reference(&self) -> bool {
        self.ref_id.as_deref().is_some_and(|r| !r.is_empty())
    }

    /// Binding carries a literal value
    pub fn is_value(&self) -> bool {
        self.value.as_deref().is_some_and(|v| !v.is_empty())
    }

    /// Neither a reference nor a value: the binding came from a nested
    /// construct the extractor recognizes but does not expand (map/set), or
    /// from markup with no usable payload. Must surface as a follow-up.
    pub fn is_unsupported(&self) -> bool {
        !self.is_reference() && !self.is_value()
    }
}

/// A constructor binding, ordered by explicit `index` or by position.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct ConstructorBinding {
    pub name: Option<String>,
    pub index: Option<u32>,
    pub value: Option<String>,
    pub ref_id: Option<String>,
    pub type_hint: Option<String>,
}

impl ConstructorBinding {
    pub fn is_reference(&self) -> bool {
        self.ref_id.as_deref().is_some_and(|r| !r.is_empty())
    }

    pub fn is_value(&self) -> bool {
        self.value.as_deref().is_some_and(|v| !v.is_empty())
    }
}
