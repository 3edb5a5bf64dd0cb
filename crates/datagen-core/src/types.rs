//! Resolved type graph
//!
//! Every declared type lives in the [`TypeRegistry`](crate::TypeRegistry) arena
//! and is referred to by [`TypeId`]. Parents, children, property owners and
//! user-type references are all ids, so the graph never holds ownership cycles.

/// Handle to a declaration stored in a [`TypeRegistry`](crate::TypeRegistry)
///
/// Ids are only minted by the registry that stores the declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(usize);

impl TypeId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    /// Position of the declaration in registration order
    pub fn index(self) -> usize {
        self.0
    }
}

/// Kind of a registered declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// Builtin scalar (`int`, `string`, ...)
    Primitive,

    /// Builtin binary payload
    Blob,

    /// User-declared record type
    UserData,

    /// User-declared enumeration
    UserEnum,
}

impl std::fmt::Display for TypeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Primitive => write!(f, "primitive"),
            Self::Blob => write!(f, "blob"),
            Self::UserData => write!(f, "data"),
            Self::UserEnum => write!(f, "enum"),
        }
    }
}

/// A resolved property type
///
/// Container variants own their element types; user types are shared
/// references into the registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    /// Builtin scalar, by name
    Primitive(String),

    /// Binary payload
    Blob,

    /// Ordered collection
    List(Box<Type>),

    /// Unordered collection of unique elements
    Set(Box<Type>),

    /// Key/value mapping
    Map(Box<Type>, Box<Type>),

    /// Reference to a declared enumeration
    UserEnum(TypeId),

    /// Reference to a declared record type
    UserData(TypeId),
}

impl Type {
    pub fn primitive(name: impl Into<String>) -> Self {
        Self::Primitive(name.into())
    }

    pub fn list(element: Type) -> Self {
        Self::List(Box::new(element))
    }

    pub fn set(element: Type) -> Self {
        Self::Set(Box::new(element))
    }

    pub fn map(key: Type, value: Type) -> Self {
        Self::Map(Box::new(key), Box::new(value))
    }

    /// Whether this is a list, set or map
    pub fn is_container(&self) -> bool {
        matches!(self, Self::List(_) | Self::Set(_) | Self::Map(..))
    }
}

/// Builtin scalar declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimitiveType {
    pub name: String,
}

/// Builtin blob declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobType {
    pub name: String,
}

/// A record type (`data` declaration)
#[derive(Debug, Clone, PartialEq)]
pub struct UserDataType {
    /// Fully-qualified dotted name
    pub name: String,

    /// Enclosing record, if nested
    pub parent: Option<TypeId>,

    /// Descriptive comment
    pub comment: Option<String>,

    properties: Vec<Property>,

    /// Index into `properties`
    identity: Option<usize>,

    children: Vec<TypeId>,
}

impl UserDataType {
    /// Create an empty shell under its fully-qualified name
    pub fn new(name: impl Into<String>, parent: Option<TypeId>) -> Self {
        Self {
            name: name.into(),
            parent,
            comment: None,
            properties: Vec::new(),
            identity: None,
            children: Vec::new(),
        }
    }

    /// Last segment of the qualified name
    pub fn local_name(&self) -> &str {
        local_name(&self.name)
    }

    /// Properties in declaration order
    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    /// Find a property by declared name
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Append a property, returning its index
    pub fn add_property(&mut self, property: Property) -> usize {
        self.properties.push(property);
        self.properties.len() - 1
    }

    /// Designate the property at `index` as the identity property
    ///
    /// Returns false (and leaves the designation untouched) if there is no
    /// property at that index.
    pub fn set_identity(&mut self, index: usize) -> bool {
        if index < self.properties.len() {
            self.identity = Some(index);
            true
        } else {
            false
        }
    }

    pub fn identity_property(&self) -> Option<&Property> {
        self.identity.and_then(|i| self.properties.get(i))
    }

    /// Nested record and enum declarations, in declaration order
    pub fn children(&self) -> &[TypeId] {
        &self.children
    }

    pub(crate) fn add_child(&mut self, child: TypeId) {
        self.children.push(child);
    }
}

/// An enumeration (`enum` declaration)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserEnumType {
    /// Fully-qualified dotted name
    pub name: String,

    /// Enclosing record, if nested
    pub parent: Option<TypeId>,

    /// Descriptive comment
    pub comment: Option<String>,

    /// Value names in declaration order (duplicates are kept)
    pub values: Vec<String>,
}

impl UserEnumType {
    pub fn new(name: impl Into<String>, parent: Option<TypeId>) -> Self {
        Self {
            name: name.into(),
            parent,
            comment: None,
            values: Vec::new(),
        }
    }

    pub fn local_name(&self) -> &str {
        local_name(&self.name)
    }

    pub fn add_value(&mut self, value: impl Into<String>) {
        self.values.push(value.into());
    }

    pub fn has_value(&self, value: &str) -> bool {
        self.values.iter().any(|v| v == value)
    }
}

/// A registered declaration
#[derive(Debug, Clone, PartialEq)]
pub enum Declaration {
    Primitive(PrimitiveType),
    Blob(BlobType),
    Data(UserDataType),
    Enum(UserEnumType),
}

impl Declaration {
    /// Fully-qualified name the declaration is registered under
    pub fn name(&self) -> &str {
        match self {
            Self::Primitive(p) => &p.name,
            Self::Blob(b) => &b.name,
            Self::Data(d) => &d.name,
            Self::Enum(e) => &e.name,
        }
    }

    pub fn kind(&self) -> TypeKind {
        match self {
            Self::Primitive(_) => TypeKind::Primitive,
            Self::Blob(_) => TypeKind::Blob,
            Self::Data(_) => TypeKind::UserData,
            Self::Enum(_) => TypeKind::UserEnum,
        }
    }

    /// Enclosing record, if any
    pub fn parent(&self) -> Option<TypeId> {
        match self {
            Self::Data(d) => d.parent,
            Self::Enum(e) => e.parent,
            Self::Primitive(_) | Self::Blob(_) => None,
        }
    }

    pub fn as_data(&self) -> Option<&UserDataType> {
        match self {
            Self::Data(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<&UserEnumType> {
        match self {
            Self::Enum(e) => Some(e),
            _ => None,
        }
    }
}

/// Kind-specific property representation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyKind {
    Primitive,
    Blob,

    /// Enum-typed property; carries the target enum's declared name
    UserEnum { enum_type: String },

    /// Nested-record property
    UserData,

    List,
    Set,
    Map,
}

/// A property of a record type
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    /// Record the property belongs to
    pub owner: TypeId,

    /// Declared name
    pub name: String,

    /// Resolved type
    pub ty: Type,

    /// Representation selected from `ty`
    pub kind: PropertyKind,

    pub comment: Option<String>,

    /// Store keys in lowerCamelCase
    pub camel_case_keys: bool,
}

impl Property {
    pub fn new(owner: TypeId, name: impl Into<String>, ty: Type, kind: PropertyKind) -> Self {
        Self {
            owner,
            name: name.into(),
            ty,
            kind,
            comment: None,
            camel_case_keys: false,
        }
    }

    pub fn with_comment(mut self, comment: Option<String>) -> Self {
        self.comment = comment;
        self
    }

    pub fn with_camel_case_keys(mut self, camel_case_keys: bool) -> Self {
        self.camel_case_keys = camel_case_keys;
        self
    }

    /// Storage key for this property
    ///
    /// The declared name, or its lowerCamelCase form when camel-case keys are on.
    pub fn key(&self) -> String {
        if self.camel_case_keys {
            lower_camel_case(&self.name)
        } else {
            self.name.clone()
        }
    }
}

fn local_name(qualified: &str) -> &str {
    qualified.rsplit('.').next().unwrap_or(qualified)
}

fn lower_camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for (i, segment) in name.split('_').filter(|s| !s.is_empty()).enumerate() {
        let mut chars = segment.chars();
        if let Some(first) = chars.next() {
            if i == 0 {
                out.extend(first.to_lowercase());
            } else {
                out.extend(first.to_uppercase());
            }
            out.push_str(chars.as_str());
        }
    }
    out
}
