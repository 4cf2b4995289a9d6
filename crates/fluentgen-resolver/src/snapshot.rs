//! In-memory host: a serializable snapshot of a checker's type graph.
//!
//! Hosts that cannot be linked in-process can export their declarations as
//! JSON and hand the snapshot to the resolver. The builder methods also make
//! it the fixture of choice for tests.
//!
//! Handles are indices into [`TypeSnapshot::types`].

use crate::introspection::{
    ConditionalParts, DeclarationMember, IndexSignatureDecl, IntrospectionError, PropertySymbol,
    SignatureDecl, TemplateParts, TypeClass, TypeFlags, TypeHandle, TypeIntrospection,
};
use crate::types::{IndexKeyKind, LiteralValue, PrimitiveKind, SourceLocation};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotType {
    pub text: String,
    pub class: TypeClass,
    #[serde(default)]
    pub flags: u32,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub properties: Vec<PropertySymbol>,
    #[serde(default)]
    pub members: Vec<TypeHandle>,
    #[serde(default)]
    pub element: Option<TypeHandle>,
    #[serde(default)]
    pub type_arguments: Vec<TypeHandle>,
    #[serde(default)]
    pub type_parameters: Vec<TypeHandle>,
    #[serde(default)]
    pub constraint: Option<TypeHandle>,
    #[serde(default)]
    pub default: Option<TypeHandle>,
    #[serde(default)]
    pub locations: Vec<SourceLocation>,
    #[serde(default)]
    pub declaration_members: Vec<DeclarationMember>,
    #[serde(default)]
    pub index_signatures: Vec<IndexSignatureDecl>,
    #[serde(default)]
    pub readonly: Option<bool>,
    #[serde(default)]
    pub aliased: Option<TypeHandle>,
    #[serde(default)]
    pub signatures: Vec<SignatureDecl>,
    #[serde(default)]
    pub template: Option<TemplateParts>,
    #[serde(default)]
    pub conditional: Option<ConditionalParts>,
    #[serde(default)]
    pub operand: Option<TypeHandle>,
    #[serde(default)]
    pub indexed_access: Option<(TypeHandle, TypeHandle)>,
    #[serde(default)]
    pub intrinsic_name: Option<String>,
}

impl SnapshotType {
    pub fn new(text: impl Into<String>, class: TypeClass) -> Self {
        Self {
            text: text.into(),
            class,
            flags: 0,
            symbol: None,
            properties: Vec::new(),
            members: Vec::new(),
            element: None,
            type_arguments: Vec::new(),
            type_parameters: Vec::new(),
            constraint: None,
            default: None,
            locations: Vec::new(),
            declaration_members: Vec::new(),
            index_signatures: Vec::new(),
            readonly: None,
            aliased: None,
            signatures: Vec::new(),
            template: None,
            conditional: None,
            operand: None,
            indexed_access: None,
            intrinsic_name: None,
        }
    }

    pub fn symbol(&mut self, name: impl Into<String>) -> &mut Self {
        self.symbol = Some(name.into());
        self
    }

    pub fn flag(&mut self, flag: TypeFlags) -> &mut Self {
        self.flags |= flag.bits();
        self
    }

    pub fn property(&mut self, name: impl Into<String>, ty: TypeHandle) -> &mut Self {
        self.properties.push(PropertySymbol::new(name, ty));
        self
    }

    pub fn optional_property(&mut self, name: impl Into<String>, ty: TypeHandle) -> &mut Self {
        let mut prop = PropertySymbol::new(name, ty);
        prop.optional = true;
        self.properties.push(prop);
        self
    }

    pub fn readonly_property(&mut self, name: impl Into<String>, ty: TypeHandle) -> &mut Self {
        let mut prop = PropertySymbol::new(name, ty);
        prop.readonly = true;
        self.properties.push(prop);
        self
    }

    pub fn type_arguments(&mut self, args: &[TypeHandle]) -> &mut Self {
        self.type_arguments = args.to_vec();
        self
    }

    pub fn type_parameters(&mut self, params: &[TypeHandle]) -> &mut Self {
        self.type_parameters = params.to_vec();
        self
    }

    pub fn location(&mut self, file: impl Into<String>, line: u32, column: u32) -> &mut Self {
        self.locations.push(SourceLocation {
            file: file.into(),
            line,
            column,
        });
        self
    }

    pub fn index_signature(
        &mut self,
        key: IndexKeyKind,
        value: TypeHandle,
        readonly: bool,
    ) -> &mut Self {
        self.index_signatures.push(IndexSignatureDecl { key, value });
        self.declaration_members
            .push(DeclarationMember::IndexSignature { key, readonly });
        self
    }

    pub fn readonly(&mut self, readonly: bool) -> &mut Self {
        self.readonly = Some(readonly);
        self
    }

    pub fn aliased(&mut self, target: TypeHandle) -> &mut Self {
        self.aliased = Some(target);
        self.flags |= TypeFlags::ALIAS.bits();
        self
    }

    pub fn signature(&mut self, signature: SignatureDecl) -> &mut Self {
        self.signatures.push(signature);
        self
    }

    pub fn intrinsic_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.intrinsic_name = Some(name.into());
        self
    }
}

/// A complete, self-contained type graph.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "SnapshotTypes")]
pub struct TypeSnapshot {
    pub types: Vec<SnapshotType>,
    /// First handle carrying each display text.
    #[serde(skip)]
    by_text: FxHashMap<String, TypeHandle>,
}

#[derive(Deserialize)]
struct SnapshotTypes {
    types: Vec<SnapshotType>,
}

impl PartialEq for TypeSnapshot {
    fn eq(&self, other: &Self) -> bool {
        self.types == other.types
    }
}

impl From<SnapshotTypes> for TypeSnapshot {
    fn from(raw: SnapshotTypes) -> Self {
        let mut snapshot = TypeSnapshot::new();
        for entry in raw.types {
            snapshot.add(entry);
        }
        snapshot
    }
}

impl TypeSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(source: &str) -> serde_json::Result<Self> {
        serde_json::from_str(source)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn add(&mut self, entry: SnapshotType) -> TypeHandle {
        let handle = TypeHandle(self.types.len() as u32);
        if self.find_text(&entry.text).is_none() {
            self.by_text.insert(entry.text.clone(), handle);
        }
        self.types.push(entry);
        handle
    }

    /// Mutable access for wiring entries after creation (e.g. recursive shapes).
    ///
    /// # Panics
    ///
    /// Panics if `handle` was not produced by this snapshot.
    pub fn entry(&mut self, handle: TypeHandle) -> &mut SnapshotType {
        &mut self.types[handle.0 as usize]
    }

    fn find_text(&self, text: &str) -> Option<TypeHandle> {
        // Entries can be rewritten through `entry`; a stale slot is a miss.
        self.by_text
            .get(text)
            .copied()
            .filter(|handle| {
                self.types
                    .get(handle.0 as usize)
                    .is_some_and(|entry| entry.text == text)
            })
    }

    fn add_interned(&mut self, entry: SnapshotType) -> TypeHandle {
        match self.find_text(&entry.text) {
            Some(existing) if self.types[existing.0 as usize].class == entry.class => existing,
            _ => self.add(entry),
        }
    }

    pub fn primitive(&mut self, kind: PrimitiveKind) -> TypeHandle {
        self.add_interned(SnapshotType::new(kind.as_str(), TypeClass::Primitive(kind)))
    }

    pub fn literal(&mut self, value: LiteralValue) -> TypeHandle {
        let text = value.to_string();
        self.add_interned(SnapshotType::new(text, TypeClass::Literal(Some(value))))
    }

    pub fn string_literal(&mut self, value: &str) -> TypeHandle {
        self.literal(LiteralValue::String(value.to_string()))
    }

    pub fn number_literal(&mut self, value: f64) -> TypeHandle {
        self.literal(LiteralValue::Number(value))
    }

    pub fn union(&mut self, members: &[TypeHandle]) -> TypeHandle {
        let text = self.join_texts(members, " | ");
        let mut entry = SnapshotType::new(text, TypeClass::Union);
        entry.members = members.to_vec();
        self.add(entry)
    }

    pub fn intersection(&mut self, members: &[TypeHandle]) -> TypeHandle {
        let text = self.join_texts(members, " & ");
        let mut entry = SnapshotType::new(text, TypeClass::Intersection);
        entry.members = members.to_vec();
        self.add(entry)
    }

    pub fn array(&mut self, element: TypeHandle) -> TypeHandle {
        let text = format!("{}[]", self.text(element));
        let mut entry = SnapshotType::new(text, TypeClass::Array);
        entry.element = Some(element);
        self.add(entry)
    }

    pub fn tuple(&mut self, elements: &[TypeHandle]) -> TypeHandle {
        let text = format!("[{}]", self.join_texts(elements, ", "));
        let mut entry = SnapshotType::new(text, TypeClass::Tuple);
        entry.members = elements.to_vec();
        self.add(entry)
    }

    /// Named object shape with the given properties, in declaration order.
    pub fn object(&mut self, name: &str, properties: &[(&str, TypeHandle)]) -> TypeHandle {
        let mut entry = SnapshotType::new(name, TypeClass::Object);
        entry.symbol(name);
        for (prop, ty) in properties {
            entry.property(*prop, *ty);
        }
        self.add(entry)
    }

    pub fn type_param(&mut self, name: &str) -> TypeHandle {
        let mut entry = SnapshotType::new(name, TypeClass::GenericParameter);
        entry.symbol(name);
        self.add(entry)
    }

    pub fn enumeration(&mut self, name: &str) -> TypeHandle {
        let mut entry = SnapshotType::new(name, TypeClass::Enum);
        entry.symbol(name);
        self.add(entry)
    }

    /// Unexpanded reference such as `Pick<User, "a">`: a named object with
    /// type arguments and no members.
    pub fn application(&mut self, name: &str, args: &[TypeHandle]) -> TypeHandle {
        let text = format!("{}<{}>", name, self.join_texts(args, ", "));
        let mut entry = SnapshotType::new(text, TypeClass::Object);
        entry.symbol(name).type_arguments(args);
        self.add(entry)
    }

    /// Unevaluated template literal. `texts` must have one more entry than `types`.
    pub fn template_literal(&mut self, texts: &[&str], types: &[TypeHandle]) -> TypeHandle {
        let mut text = String::from("`");
        for (i, segment) in texts.iter().enumerate() {
            text.push_str(segment);
            if let Some(ty) = types.get(i) {
                text.push_str("${");
                text.push_str(self.text(*ty));
                text.push('}');
            }
        }
        text.push('`');
        let mut entry = SnapshotType::new(text, TypeClass::Object);
        entry.flag(TypeFlags::TEMPLATE_LITERAL);
        entry.template = Some(TemplateParts {
            texts: texts.iter().map(|s| s.to_string()).collect(),
            types: types.to_vec(),
        });
        self.add(entry)
    }

    /// Unresolved conditional type.
    pub fn conditional(&mut self, parts: ConditionalParts) -> TypeHandle {
        let text = format!(
            "{} extends {} ? {} : {}",
            self.text(parts.check),
            self.text(parts.extends),
            self.text(parts.true_type),
            self.text(parts.false_type)
        );
        let mut entry = SnapshotType::new(text, TypeClass::Object);
        entry.flag(TypeFlags::CONDITIONAL);
        entry.conditional = Some(parts);
        self.add(entry)
    }

    pub fn keyof(&mut self, operand: TypeHandle) -> TypeHandle {
        let text = format!("keyof {}", self.text(operand));
        let mut entry = SnapshotType::new(text, TypeClass::Object);
        entry.flag(TypeFlags::KEYOF);
        entry.operand = Some(operand);
        self.add(entry)
    }

    pub fn indexed_access(&mut self, object: TypeHandle, index: TypeHandle) -> TypeHandle {
        let text = format!("{}[{}]", self.text(object), self.text(index));
        let mut entry = SnapshotType::new(text, TypeClass::Object);
        entry.flag(TypeFlags::INDEXED_ACCESS);
        entry.indexed_access = Some((object, index));
        self.add(entry)
    }

    pub fn text(&self, handle: TypeHandle) -> &str {
        self.types
            .get(handle.0 as usize)
            .map(|entry| entry.text.as_str())
            .unwrap_or("?")
    }

    fn join_texts(&self, handles: &[TypeHandle], sep: &str) -> String {
        handles
            .iter()
            .map(|h| self.text(*h))
            .collect::<Vec<_>>()
            .join(sep)
    }

    fn get(&self, handle: TypeHandle) -> Result<&SnapshotType, IntrospectionError> {
        self.types
            .get(handle.0 as usize)
            .ok_or(IntrospectionError::UnknownHandle(handle))
    }

    fn get_opt(&self, handle: TypeHandle) -> Option<&SnapshotType> {
        self.types.get(handle.0 as usize)
    }
}

impl TypeIntrospection for TypeSnapshot {
    fn classify(&self, ty: TypeHandle) -> Result<TypeClass, IntrospectionError> {
        Ok(self.get(ty)?.class.clone())
    }

    fn type_to_string(&self, ty: TypeHandle) -> String {
        self.get_opt(ty)
            .map(|entry| entry.text.clone())
            .unwrap_or_else(|| ty.to_string())
    }

    fn flags(&self, ty: TypeHandle) -> TypeFlags {
        self.get_opt(ty)
            .map(|entry| TypeFlags::from_bits_truncate(entry.flags))
            .unwrap_or_default()
    }

    fn get_properties(&self, ty: TypeHandle) -> Result<Vec<PropertySymbol>, IntrospectionError> {
        Ok(self.get(ty)?.properties.clone())
    }

    fn get_union_members(&self, ty: TypeHandle) -> Result<Vec<TypeHandle>, IntrospectionError> {
        let entry = self.get(ty)?;
        match entry.class {
            TypeClass::Union => Ok(entry.members.clone()),
            _ => Err(IntrospectionError::MissingShape {
                handle: ty,
                expected: "union members",
            }),
        }
    }

    fn get_intersection_members(
        &self,
        ty: TypeHandle,
    ) -> Result<Vec<TypeHandle>, IntrospectionError> {
        let entry = self.get(ty)?;
        match entry.class {
            TypeClass::Intersection => Ok(entry.members.clone()),
            _ => Err(IntrospectionError::MissingShape {
                handle: ty,
                expected: "intersection members",
            }),
        }
    }

    fn get_array_element_type(&self, ty: TypeHandle) -> Result<TypeHandle, IntrospectionError> {
        self.get(ty)?
            .element
            .ok_or(IntrospectionError::MissingShape {
                handle: ty,
                expected: "array element type",
            })
    }

    fn get_tuple_elements(&self, ty: TypeHandle) -> Result<Vec<TypeHandle>, IntrospectionError> {
        Ok(self.get(ty)?.members.clone())
    }

    fn get_type_arguments(&self, ty: TypeHandle) -> Vec<TypeHandle> {
        self.get_opt(ty)
            .map(|entry| entry.type_arguments.clone())
            .unwrap_or_default()
    }

    fn get_symbol_name(&self, ty: TypeHandle) -> Option<String> {
        self.get_opt(ty).and_then(|entry| entry.symbol.clone())
    }

    fn get_constraint(&self, ty: TypeHandle) -> Option<TypeHandle> {
        self.get_opt(ty).and_then(|entry| entry.constraint)
    }

    fn get_default(&self, ty: TypeHandle) -> Option<TypeHandle> {
        self.get_opt(ty).and_then(|entry| entry.default)
    }

    fn get_declaration_locations(&self, ty: TypeHandle) -> Vec<SourceLocation> {
        self.get_opt(ty)
            .map(|entry| entry.locations.clone())
            .unwrap_or_default()
    }

    fn get_declaration_members(&self, ty: TypeHandle) -> Vec<DeclarationMember> {
        self.get_opt(ty)
            .map(|entry| entry.declaration_members.clone())
            .unwrap_or_default()
    }

    fn get_index_signatures(&self, ty: TypeHandle) -> Vec<IndexSignatureDecl> {
        self.get_opt(ty)
            .map(|entry| entry.index_signatures.clone())
            .unwrap_or_default()
    }

    fn is_readonly(&self, ty: TypeHandle) -> Option<bool> {
        self.get_opt(ty).and_then(|entry| entry.readonly)
    }

    fn get_aliased_type(&self, ty: TypeHandle) -> Option<TypeHandle> {
        self.get_opt(ty).and_then(|entry| entry.aliased)
    }

    fn get_type_parameters(&self, ty: TypeHandle) -> Vec<TypeHandle> {
        self.get_opt(ty)
            .map(|entry| entry.type_parameters.clone())
            .unwrap_or_default()
    }

    fn get_call_signatures(&self, ty: TypeHandle) -> Vec<SignatureDecl> {
        self.get_opt(ty)
            .map(|entry| entry.signatures.clone())
            .unwrap_or_default()
    }

    fn get_template_parts(&self, ty: TypeHandle) -> Option<TemplateParts> {
        self.get_opt(ty).and_then(|entry| entry.template.clone())
    }

    fn get_conditional_parts(&self, ty: TypeHandle) -> Option<ConditionalParts> {
        self.get_opt(ty).and_then(|entry| entry.conditional)
    }

    fn get_operator_operand(&self, ty: TypeHandle) -> Option<TypeHandle> {
        self.get_opt(ty).and_then(|entry| entry.operand)
    }

    fn get_indexed_access_parts(&self, ty: TypeHandle) -> Option<(TypeHandle, TypeHandle)> {
        self.get_opt(ty).and_then(|entry| entry.indexed_access)
    }

    fn get_intrinsic_name(&self, ty: TypeHandle) -> Option<String> {
        let entry = self.get_opt(ty)?;
        entry.intrinsic_name.clone().or_else(|| match &entry.class {
            TypeClass::Primitive(kind) => Some(kind.as_str().to_string()),
            TypeClass::Literal(Some(LiteralValue::Boolean(b))) => Some(b.to_string()),
            _ => None,
        })
    }

    fn lookup_type(&self, name: &str) -> Option<TypeHandle> {
        self.types
            .iter()
            .position(|entry| entry.symbol.as_deref() == Some(name))
            .or_else(|| self.types.iter().position(|entry| entry.text == name))
            .map(|index| TypeHandle(index as u32))
    }
}

#[cfg(test)]
#[path = "../tests/snapshot_tests.rs"]
mod tests;
