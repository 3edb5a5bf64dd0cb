//! Property construction

use datagen_core::{Property, PropertyKind, Type, TypeId, TypeRegistry};

/// Builds properties, selecting the representation from the resolved type
pub struct PropertyFactory<'r> {
    registry: &'r TypeRegistry,
    camel_case_keys: bool,
}

impl<'r> PropertyFactory<'r> {
    pub fn new(registry: &'r TypeRegistry, camel_case_keys: bool) -> Self {
        Self {
            registry,
            camel_case_keys,
        }
    }

    /// Representation for a property of type `ty`
    pub fn kind_for(&self, ty: &Type) -> PropertyKind {
        match ty {
            Type::Primitive(_) => PropertyKind::Primitive,
            Type::Blob => PropertyKind::Blob,
            Type::UserEnum(id) => PropertyKind::UserEnum {
                enum_type: self.registry.get(*id).name().to_string(),
            },
            Type::UserData(_) => PropertyKind::UserData,
            Type::List(_) => PropertyKind::List,
            Type::Set(_) => PropertyKind::Set,
            Type::Map(..) => PropertyKind::Map,
        }
    }

    pub fn build(&self, owner: TypeId, name: &str, ty: Type, comment: Option<String>) -> Property {
        let kind = self.kind_for(&ty);
        Property::new(owner, name, ty, kind)
            .with_comment(comment)
            .with_camel_case_keys(self.camel_case_keys)
    }
}
