//! Type registry
//!
//! Symbol table keyed by fully-qualified dotted name. The registry owns every
//! declaration; the rest of the graph refers to them by [`TypeId`].

use std::collections::HashMap;
use crate::types::{BlobType, Declaration, PrimitiveType, Type, TypeId, TypeKind, UserDataType, UserEnumType};

/// Registry of declared types, in registration order
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    declarations: Vec<Declaration>,
    by_name: HashMap<String, TypeId>,
}

impl TypeRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with builtin primitive and blob names pre-registered
    pub fn with_builtins<I, S>(primitives: I, blob: impl Into<String>) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut registry = Self::new();
        for name in primitives {
            registry.register(Declaration::Primitive(PrimitiveType { name: name.into() }))?;
        }
        registry.register(Declaration::Blob(BlobType { name: blob.into() }))?;
        Ok(registry)
    }

    /// Qualified name for `local` declared inside `parent`
    pub fn qualify(&self, parent: Option<TypeId>, local: &str) -> String {
        match parent {
            Some(id) => format!("{}.{}", self.get(id).name(), local),
            None => local.to_string(),
        }
    }

    /// Register a declaration under its qualified name
    ///
    /// Nested user types are appended to their parent's children.
    pub fn register(&mut self, declaration: Declaration) -> Result<TypeId, RegistryError> {
        let name = declaration.name().to_string();
        if self.by_name.contains_key(&name) {
            return Err(RegistryError::DuplicateType(name));
        }

        let parent = declaration.parent();
        if let Some(parent_id) = parent {
            if self.data(parent_id).is_none() {
                return Err(RegistryError::InvalidScope(name));
            }
        }

        let id = TypeId::new(self.declarations.len());
        self.declarations.push(declaration);
        self.by_name.insert(name, id);

        if let Some(Declaration::Data(parent)) = parent.map(|p| &mut self.declarations[p.index()]) {
            parent.add_child(id);
        }

        Ok(id)
    }

    /// Register an empty record shell named `local` inside `parent`
    pub fn register_data(&mut self, parent: Option<TypeId>, local: &str) -> Result<TypeId, RegistryError> {
        let name = self.qualify(parent, local);
        self.register(Declaration::Data(UserDataType::new(name, parent)))
    }

    /// Register an empty enum shell named `local` inside `parent`
    pub fn register_enum(&mut self, parent: Option<TypeId>, local: &str) -> Result<TypeId, RegistryError> {
        let name = self.qualify(parent, local);
        self.register(Declaration::Enum(UserEnumType::new(name, parent)))
    }

    /// Look up a declaration by its exact qualified name
    pub fn lookup_exact(&self, qualified_name: &str) -> Result<TypeId, RegistryError> {
        self.by_name
            .get(qualified_name)
            .copied()
            .ok_or_else(|| RegistryError::TypeNotFound {
                name: qualified_name.to_string(),
                scope: None,
            })
    }

    /// Resolve `name` as referenced from inside `scope`
    ///
    /// Tries `scope.name`, then the same concatenation for each enclosing
    /// scope outward, and finally `name` alone.
    pub fn lookup_scoped(&self, scope: Option<TypeId>, name: &str) -> Result<TypeId, RegistryError> {
        let mut current = scope;
        while let Some(id) = current {
            let declaration = self.get(id);
            let candidate = format!("{}.{}", declaration.name(), name);
            if let Some(found) = self.by_name.get(&candidate) {
                return Ok(*found);
            }
            current = declaration.parent();
        }

        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| RegistryError::TypeNotFound {
                name: name.to_string(),
                scope: scope.map(|id| self.get(id).name().to_string()),
            })
    }

    /// Get a declaration by id
    pub fn get(&self, id: TypeId) -> &Declaration {
        &self.declarations[id.index()]
    }

    pub fn data(&self, id: TypeId) -> Option<&UserDataType> {
        self.get(id).as_data()
    }

    pub fn data_mut(&mut self, id: TypeId) -> Option<&mut UserDataType> {
        match self.declarations.get_mut(id.index()) {
            Some(Declaration::Data(d)) => Some(d),
            _ => None,
        }
    }

    pub fn enumeration(&self, id: TypeId) -> Option<&UserEnumType> {
        self.get(id).as_enum()
    }

    pub fn enumeration_mut(&mut self, id: TypeId) -> Option<&mut UserEnumType> {
        match self.declarations.get_mut(id.index()) {
            Some(Declaration::Enum(e)) => Some(e),
            _ => None,
        }
    }

    /// The resolved type a reference to this declaration denotes
    pub fn type_of(&self, id: TypeId) -> Type {
        match self.get(id) {
            Declaration::Primitive(p) => Type::Primitive(p.name.clone()),
            Declaration::Blob(_) => Type::Blob,
            Declaration::Data(_) => Type::UserData(id),
            Declaration::Enum(_) => Type::UserEnum(id),
        }
    }

    /// All declarations of `kind`, in registration order
    pub fn types_of(&self, kind: TypeKind) -> impl Iterator<Item = (TypeId, &Declaration)> + '_ {
        self.iter().filter(move |(_, d)| d.kind() == kind)
    }

    /// All user-declared record and enum types, in registration order
    pub fn user_types(&self) -> impl Iterator<Item = (TypeId, &Declaration)> + '_ {
        self.iter()
            .filter(|(_, d)| matches!(d.kind(), TypeKind::UserData | TypeKind::UserEnum))
    }

    /// All declarations, in registration order
    pub fn iter(&self) -> impl Iterator<Item = (TypeId, &Declaration)> + '_ {
        self.declarations
            .iter()
            .enumerate()
            .map(|(i, d)| (TypeId::new(i), d))
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// Render a resolved type in schema syntax (`map<string, list<Order.Item>>`)
    pub fn describe(&self, ty: &Type) -> String {
        match ty {
            Type::Primitive(name) => name.clone(),
            Type::Blob => self
                .types_of(TypeKind::Blob)
                .next()
                .map(|(_, d)| d.name().to_string())
                .unwrap_or_else(|| "blob".to_string()),
            Type::List(element) => format!("list<{}>", self.describe(element)),
            Type::Set(element) => format!("set<{}>", self.describe(element)),
            Type::Map(key, value) => format!("map<{}, {}>", self.describe(key), self.describe(value)),
            Type::UserEnum(id) | Type::UserData(id) => self.get(*id).name().to_string(),
        }
    }
}

/// Registry errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("Duplicate type: {0}")]
    DuplicateType(String),

    #[error("Type not found: {name}{}", referenced_from(.scope))]
    TypeNotFound {
        name: String,
        scope: Option<String>,
    },

    #[error("Type {0} is not declared inside a record")]
    InvalidScope(String),
}

fn referenced_from(scope: &Option<String>) -> String {
    scope
        .as_ref()
        .map(|s| format!(" (referenced from {})", s))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn registry() -> TypeRegistry {
        TypeRegistry::with_builtins(["int", "string"], "blob").unwrap()
    }

    #[test]
    fn register_and_lookup_exact() {
        let mut registry = registry();
        let order = registry.register_data(None, "Order").unwrap();
        let item = registry.register_data(Some(order), "Item").unwrap();

        assert_eq!(registry.lookup_exact("Order").unwrap(), order);
        assert_eq!(registry.lookup_exact("Order.Item").unwrap(), item);
        assert_eq!(registry.data(item).unwrap().parent, Some(order));
        assert_eq!(registry.data(order).unwrap().children(), &[item]);

        assert!(matches!(
            registry.lookup_exact("Item"),
            Err(RegistryError::TypeNotFound { .. })
        ));
    }

    #[test]
    fn duplicate_registration_fails() {
        let mut registry = registry();
        let order = registry.register_data(None, "Order").unwrap();
        registry.register_enum(Some(order), "Status").unwrap();

        let err = registry.register_data(Some(order), "Status").unwrap_err();
        assert_eq!(err, RegistryError::DuplicateType("Order.Status".to_string()));
        assert_eq!(registry.data(order).unwrap().children().len(), 1);
    }

    #[test]
    fn builtins_collide_with_user_types() {
        let mut registry = registry();
        assert!(matches!(
            registry.register_data(None, "int"),
            Err(RegistryError::DuplicateType(_))
        ));
    }

    #[test]
    fn scoped_lookup_walks_outward() {
        let mut registry = registry();
        let outer = registry.register_data(None, "Outer").unwrap();
        let middle = registry.register_data(Some(outer), "Middle").unwrap();
        let inner = registry.register_data(Some(middle), "Inner").unwrap();
        let outer_status = registry.register_enum(Some(outer), "Status").unwrap();
        let root_status = registry.register_enum(None, "Status").unwrap();

        // Nearest enclosing declaration shadows outer ones
        assert_eq!(registry.lookup_scoped(Some(inner), "Status").unwrap(), outer_status);
        assert_eq!(registry.lookup_scoped(Some(middle), "Status").unwrap(), outer_status);
        assert_eq!(registry.lookup_scoped(None, "Status").unwrap(), root_status);

        // Partially-qualified references
        assert_eq!(registry.lookup_scoped(Some(inner), "Middle.Inner").unwrap(), inner);
        assert_eq!(registry.lookup_scoped(Some(inner), "Outer.Middle").unwrap(), middle);

        // Builtins resolve at the root
        let int = registry.lookup_scoped(Some(inner), "int").unwrap();
        assert_eq!(registry.type_of(int), Type::primitive("int"));
    }

    #[test]
    fn scoped_lookup_does_not_search_siblings() {
        let mut registry = registry();
        let a = registry.register_data(None, "A").unwrap();
        let b = registry.register_data(None, "B").unwrap();
        registry.register_data(Some(a), "Only").unwrap();

        let err = registry.lookup_scoped(Some(b), "Only").unwrap_err();
        assert_eq!(
            err,
            RegistryError::TypeNotFound {
                name: "Only".to_string(),
                scope: Some("B".to_string()),
            }
        );
    }

    #[test]
    fn types_of_kind_in_registration_order() {
        let mut registry = registry();
        let a = registry.register_data(None, "A").unwrap();
        registry.register_enum(None, "E").unwrap();
        let b = registry.register_data(Some(a), "B").unwrap();

        let data: Vec<TypeId> = registry.types_of(TypeKind::UserData).map(|(id, _)| id).collect();
        assert_eq!(data, vec![a, b]);

        let primitives: Vec<&str> = registry.types_of(TypeKind::Primitive).map(|(_, d)| d.name()).collect();
        assert_eq!(primitives, vec!["int", "string"]);

        assert_eq!(registry.user_types().count(), 3);
    }

    #[test]
    fn describe_nested_types() {
        let mut registry = registry();
        let order = registry.register_data(None, "Order").unwrap();
        let ty = Type::map(Type::primitive("string"), Type::list(Type::UserData(order)));
        assert_eq!(registry.describe(&ty), "map<string, list<Order>>");
        assert_eq!(registry.describe(&Type::set(Type::Blob)), "set<blob>");
    }
}
