//! EIP-712 typed structured data hashing: `domain_separator`, the
//! per-struct `encodeData`/`hashStruct` recursion, and the final signing
//! digest `keccak256(0x19 0x01 ‖ domain_separator ‖ struct_hash)`.
//!
//! `encodeData` differs from plain Solidity ABI encoding in one respect
//! that this module exists to get right: `bytes`, `string`, array, and
//! nested-struct fields are never laid out in a head/tail tail region —
//! each instead contributes the Keccak-256 hash of its own encoding to the
//! parent's 32-byte word sequence before that sequence is itself hashed.

use crate::address::Address;
use crate::bigint::{I256, U256};
use crate::error::{Error, Result};
use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

/// A type reference inside a struct's field list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Eip712Type {
    Bool,
    Uint(u16),
    Int(u16),
    Address,
    Bytes,
    String,
    FixedBytes(u8),
    Array(alloc::boxed::Box<Eip712Type>),
    FixedArray(alloc::boxed::Box<Eip712Type>, usize),
    /// A reference to another struct definition by name.
    Struct(String),
}

impl Eip712Type {
    pub fn canonical(&self) -> String {
        match self {
            Eip712Type::Bool => "bool".to_string(),
            Eip712Type::Uint(bits) => format!("uint{bits}"),
            Eip712Type::Int(bits) => format!("int{bits}"),
            Eip712Type::Address => "address".to_string(),
            Eip712Type::Bytes => "bytes".to_string(),
            Eip712Type::String => "string".to_string(),
            Eip712Type::FixedBytes(len) => format!("bytes{len}"),
            Eip712Type::Array(elem) => format!("{}[]", elem.canonical()),
            Eip712Type::FixedArray(elem, n) => format!("{}[{n}]", elem.canonical()),
            Eip712Type::Struct(name) => name.clone(),
        }
    }

    /// The struct name this type (or an array of it) ultimately refers to,
    /// if any — used to walk the dependency graph for `encodeType`.
    fn struct_dependency(&self) -> Option<&str> {
        match self {
            Eip712Type::Struct(name) => Some(name),
            Eip712Type::Array(elem) | Eip712Type::FixedArray(elem, _) => elem.struct_dependency(),
            _ => None,
        }
    }
}

/// One named struct definition, e.g. `Person(string name, address wallet)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StructDef {
    pub name: String,
    pub fields: Vec<(String, Eip712Type)>,
}

/// A value being hashed, shaped to mirror some [`StructDef`] in a
/// [`TypedData::types`] table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Eip712Value {
    Bool(bool),
    Uint(U256),
    Int(I256),
    Address(Address),
    Bytes(Vec<u8>),
    String(String),
    FixedBytes([u8; 32]),
    Array(Vec<Eip712Value>),
    /// Field name/value pairs, in the same order as the matching
    /// [`StructDef::fields`].
    Struct(Vec<(String, Eip712Value)>),
}

/// `EIP712Domain`. Only the fields present are hashed, matching the
/// reference implementation's treatment of the domain as a struct whose
/// type string is built from whichever of these five fields are `Some`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Eip712Domain {
    pub name: Option<String>,
    pub version: Option<String>,
    pub chain_id: Option<u64>,
    pub verifying_contract: Option<Address>,
    pub salt: Option<[u8; 32]>,
}

impl Eip712Domain {
    fn struct_def(&self) -> StructDef {
        let mut fields = Vec::new();
        if self.name.is_some() {
            fields.push(("name".to_string(), Eip712Type::String));
        }
        if self.version.is_some() {
            fields.push(("version".to_string(), Eip712Type::String));
        }
        if self.chain_id.is_some() {
            fields.push(("chainId".to_string(), Eip712Type::Uint(256)));
        }
        if self.verifying_contract.is_some() {
            fields.push(("verifyingContract".to_string(), Eip712Type::Address));
        }
        if self.salt.is_some() {
            fields.push(("salt".to_string(), Eip712Type::FixedBytes(32)));
        }
        StructDef { name: "EIP712Domain".to_string(), fields }
    }

    fn value(&self) -> Eip712Value {
        let mut fields = Vec::new();
        if let Some(v) = &self.name {
            fields.push(("name".to_string(), Eip712Value::String(v.clone())));
        }
        if let Some(v) = &self.version {
            fields.push(("version".to_string(), Eip712Value::String(v.clone())));
        }
        if let Some(v) = self.chain_id {
            fields.push(("chainId".to_string(), Eip712Value::Uint(U256::from_u64(v))));
        }
        if let Some(v) = self.verifying_contract {
            fields.push(("verifyingContract".to_string(), Eip712Value::Address(v)));
        }
        if let Some(v) = self.salt {
            fields.push(("salt".to_string(), Eip712Value::FixedBytes(v)));
        }
        Eip712Value::Struct(fields)
    }

    /// `Keccak256(encodeType(EIP712Domain) ‖ encodeData(domain))`, hashed
    /// against a one-struct type table built from only the present fields.
    pub fn separator(&self) -> [u8; 32] {
        let def = self.struct_def();
        let types = [def.clone()];
        struct_hash(&def.name, &types, &self.value())
            .expect("domain struct_def/value are built in lockstep")
    }
}

fn find_struct<'a>(types: &'a [StructDef], name: &str) -> Result<&'a StructDef> {
    types.iter().find(|s| s.name == name).ok_or(Error::InvalidAbi)
}

/// Recursively collects the names of every struct type reachable from
/// `name`'s fields (not including `name` itself), for `encodeType`'s
/// alphabetically-sorted referenced-types suffix.
fn collect_dependencies(name: &str, types: &[StructDef], seen: &mut Vec<String>) -> Result<()> {
    let def = find_struct(types, name)?;
    for (_, ty) in &def.fields {
        if let Some(dep) = ty.struct_dependency() {
            if !seen.iter().any(|s| s == dep) {
                seen.push(dep.to_string());
                collect_dependencies(dep, types, seen)?;
            }
        }
    }
    Ok(())
}

/// `encodeType(name)`: the primary struct's field list, followed by every
/// struct type it (transitively) references, each sorted alphabetically by
/// name, per EIP-712.
pub fn encode_type(name: &str, types: &[StructDef]) -> Result<String> {
    let def = find_struct(types, name)?;
    let own = format!(
        "{name}({})",
        def.fields
            .iter()
            .map(|(fname, ty)| format!("{} {fname}", ty.canonical()))
            .collect::<Vec<_>>()
            .join(",")
    );

    let mut deps = Vec::new();
    collect_dependencies(name, types, &mut deps)?;
    deps.sort();

    let mut out = own;
    for dep in deps {
        let dep_def = find_struct(types, &dep)?;
        out.push_str(&format!(
            "{dep}({})",
            dep_def
                .fields
                .iter()
                .map(|(fname, ty)| format!("{} {fname}", ty.canonical()))
                .collect::<Vec<_>>()
                .join(",")
        ));
    }
    Ok(out)
}

/// `typeHash(name) = Keccak256(encodeType(name))`.
pub fn type_hash(name: &str, types: &[StructDef]) -> Result<[u8; 32]> {
    Ok(crate::keccak::hash(encode_type(name, types)?.as_bytes()))
}

/// Hashes one field's value according to its declared type: atomic types
/// contribute their 32-byte ABI word, `bytes`/`string` contribute
/// `Keccak256` of their content, arrays contribute `Keccak256` of their
/// concatenated per-element encodings, and nested structs contribute their
/// own struct hash.
fn hash_field(ty: &Eip712Type, value: &Eip712Value, types: &[StructDef]) -> Result<[u8; 32]> {
    match (ty, value) {
        (Eip712Type::Bool, Eip712Value::Bool(b)) => {
            let mut w = [0u8; 32];
            w[31] = *b as u8;
            Ok(w)
        }
        (Eip712Type::Uint(bits), Eip712Value::Uint(v)) => {
            if *bits < 256 && v.bits() > *bits as u32 {
                return Err(Error::InvalidAbi);
            }
            Ok(v.to_be_bytes())
        }
        (Eip712Type::Int(_), Eip712Value::Int(v)) => Ok(v.to_be_bytes()),
        (Eip712Type::Address, Eip712Value::Address(addr)) => {
            let mut w = [0u8; 32];
            w[12..].copy_from_slice(&addr.0);
            Ok(w)
        }
        (Eip712Type::FixedBytes(len), Eip712Value::FixedBytes(bytes)) => {
            let mut w = [0u8; 32];
            w[..*len as usize].copy_from_slice(&bytes[..*len as usize]);
            Ok(w)
        }
        (Eip712Type::Bytes, Eip712Value::Bytes(data)) => Ok(crate::keccak::hash(data)),
        (Eip712Type::String, Eip712Value::String(s)) => Ok(crate::keccak::hash(s.as_bytes())),
        (Eip712Type::FixedArray(elem, n), Eip712Value::Array(items)) => {
            if items.len() != *n {
                return Err(Error::InvalidAbi);
            }
            hash_array(elem, items, types)
        }
        (Eip712Type::Array(elem), Eip712Value::Array(items)) => hash_array(elem, items, types),
        (Eip712Type::Struct(name), Eip712Value::Struct(_)) => struct_hash(name, types, value),
        _ => Err(Error::InvalidAbi),
    }
}

fn hash_array(elem: &Eip712Type, items: &[Eip712Value], types: &[StructDef]) -> Result<[u8; 32]> {
    let mut buf = Vec::with_capacity(items.len() * 32);
    for item in items {
        buf.extend_from_slice(&hash_field(elem, item, types)?);
    }
    Ok(crate::keccak::hash(&buf))
}

/// `hashStruct(name, value) = Keccak256(typeHash(name) ‖ encodeData(value))`.
pub fn struct_hash(name: &str, types: &[StructDef], value: &Eip712Value) -> Result<[u8; 32]> {
    let def = find_struct(types, name)?;
    let fields = match value {
        Eip712Value::Struct(fields) => fields,
        _ => return Err(Error::InvalidAbi),
    };
    if def.fields.len() != fields.len() {
        return Err(Error::InvalidAbi);
    }

    let mut buf = Vec::with_capacity(32 * (1 + def.fields.len()));
    buf.extend_from_slice(&type_hash(name, types)?);
    for ((def_name, def_ty), (value_name, value_value)) in def.fields.iter().zip(fields.iter()) {
        if def_name != value_name {
            return Err(Error::InvalidAbi);
        }
        buf.extend_from_slice(&hash_field(def_ty, value_value, types)?);
    }
    Ok(crate::keccak::hash(&buf))
}

/// The full typed-data payload: a domain, a type table, and a message
/// conforming to one of the table's structs.
pub struct TypedData<'a> {
    pub domain: &'a Eip712Domain,
    pub primary_type: &'a str,
    pub types: &'a [StructDef],
    pub message: &'a Eip712Value,
}

impl<'a> TypedData<'a> {
    /// The final signing digest: `Keccak256(0x19 0x01 ‖ domain_separator ‖
    /// hashStruct(primaryType, message))`.
    pub fn digest(&self) -> Result<[u8; 32]> {
        let domain_separator = self.domain.separator();
        let message_hash = struct_hash(self.primary_type, self.types, self.message)?;

        let mut buf = [0u8; 66];
        buf[0] = 0x19;
        buf[1] = 0x01;
        buf[2..34].copy_from_slice(&domain_separator);
        buf[34..66].copy_from_slice(&message_hash);
        Ok(crate::keccak::hash(&buf))
    }
}
