//! # Localization
//!
//! Key → string lookup plus a typed convention for enums:
//!
//! ```text
//!   {namespace}.{EnumType}.{Member}
//!   waypoint.demo.Status.Pending
//! ```
//!
//! The namespace is the Rust module path of the enum with `::` replaced by
//! `.`; the member is the serde variant name, so `#[serde(rename = ...)]`
//! is honored. Only unit variants have a key.

use std::any::type_name;
use std::collections::HashMap;
use std::fmt::Display;

use serde::Serialize;
use serde::ser::{self, Impossible};

use crate::core::UsageError;

pub trait Localize: Send + Sync {
    fn get(&self, key: &str) -> String;
}

/// Map-backed localizer. Missing keys resolve to the key itself.
#[derive(Debug, Clone, Default)]
pub struct MapLocalizer {
    strings: HashMap<String, String>,
}

impl MapLocalizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.strings.insert(key.into(), value.into());
        self
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapLocalizer {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            strings: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

impl Localize for MapLocalizer {
    fn get(&self, key: &str) -> String {
        self.strings
            .get(key)
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }
}

/// Build the lookup key for a unit enum variant.
pub fn enum_key<T: Serialize + ?Sized>(value: &T) -> Result<String, UsageError> {
    let member = value.serialize(VariantName)?;
    let full = type_name::<T>();
    let path = full.split('<').next().unwrap_or(full);
    let (namespace, type_ident) = path.rsplit_once("::").unwrap_or(("", path));
    let namespace = namespace.replace("::", ".");
    if namespace.is_empty() {
        Ok(format!("{type_ident}.{member}"))
    } else {
        Ok(format!("{namespace}.{type_ident}.{member}"))
    }
}

pub trait LocalizeExt: Localize {
    fn get_enum<T: Serialize + ?Sized>(&self, value: &T) -> Result<String, UsageError> {
        Ok(self.get(&enum_key(value)?))
    }
}

impl<L: Localize + ?Sized> LocalizeExt for L {}

impl ser::Error for UsageError {
    fn custom<T: Display>(msg: T) -> Self {
        UsageError::NotAnEnum(msg.to_string())
    }
}

/// Serializer that accepts exactly one shape: a unit enum variant.
struct VariantName;

fn not_an_enum<T>(kind: &str) -> Result<T, UsageError> {
    Err(UsageError::NotAnEnum(kind.to_string()))
}

impl ser::Serializer for VariantName {
    type Ok = &'static str;
    type Error = UsageError;
    type SerializeSeq = Impossible<Self::Ok, Self::Error>;
    type SerializeTuple = Impossible<Self::Ok, Self::Error>;
    type SerializeTupleStruct = Impossible<Self::Ok, Self::Error>;
    type SerializeTupleVariant = Impossible<Self::Ok, Self::Error>;
    type SerializeMap = Impossible<Self::Ok, Self::Error>;
    type SerializeStruct = Impossible<Self::Ok, Self::Error>;
    type SerializeStructVariant = Impossible<Self::Ok, Self::Error>;

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Self::Ok, Self::Error> {
        Ok(variant)
    }

    fn serialize_bool(self, _v: bool) -> Result<Self::Ok, Self::Error> {
        not_an_enum("bool")
    }

    fn serialize_i8(self, _v: i8) -> Result<Self::Ok, Self::Error> {
        not_an_enum("i8")
    }

    fn serialize_i16(self, _v: i16) -> Result<Self::Ok, Self::Error> {
        not_an_enum("i16")
    }

    fn serialize_i32(self, _v: i32) -> Result<Self::Ok, Self::Error> {
        not_an_enum("i32")
    }

    fn serialize_i64(self, _v: i64) -> Result<Self::Ok, Self::Error> {
        not_an_enum("i64")
    }

    fn serialize_u8(self, _v: u8) -> Result<Self::Ok, Self::Error> {
        not_an_enum("u8")
    }

    fn serialize_u16(self, _v: u16) -> Result<Self::Ok, Self::Error> {
        not_an_enum("u16")
    }

    fn serialize_u32(self, _v: u32) -> Result<Self::Ok, Self::Error> {
        not_an_enum("u32")
    }

    fn serialize_u64(self, _v: u64) -> Result<Self::Ok, Self::Error> {
        not_an_enum("u64")
    }

    fn serialize_f32(self, _v: f32) -> Result<Self::Ok, Self::Error> {
        not_an_enum("f32")
    }

    fn serialize_f64(self, _v: f64) -> Result<Self::Ok, Self::Error> {
        not_an_enum("f64")
    }

    fn serialize_char(self, _v: char) -> Result<Self::Ok, Self::Error> {
        not_an_enum("char")
    }

    fn serialize_str(self, _v: &str) -> Result<Self::Ok, Self::Error> {
        not_an_enum("string")
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<Self::Ok, Self::Error> {
        not_an_enum("bytes")
    }

    fn serialize_none(self) -> Result<Self::Ok, Self::Error> {
        not_an_enum("option")
    }

    fn serialize_some<T: Serialize + ?Sized>(self, _value: &T) -> Result<Self::Ok, Self::Error> {
        not_an_enum("option")
    }

    fn serialize_unit(self) -> Result<Self::Ok, Self::Error> {
        not_an_enum("unit")
    }

    fn serialize_unit_struct(self, name: &'static str) -> Result<Self::Ok, Self::Error> {
        not_an_enum(name)
    }

    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        name: &'static str,
        _value: &T,
    ) -> Result<Self::Ok, Self::Error> {
        not_an_enum(name)
    }

    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _value: &T,
    ) -> Result<Self::Ok, Self::Error> {
        not_an_enum(&format!("{name}::{variant} carries data"))
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq, Self::Error> {
        not_an_enum("sequence")
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple, Self::Error> {
        not_an_enum("tuple")
    }

    fn serialize_tuple_struct(
        self,
        name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct, Self::Error> {
        not_an_enum(name)
    }

    fn serialize_tuple_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant, Self::Error> {
        not_an_enum(&format!("{name}::{variant} carries data"))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap, Self::Error> {
        not_an_enum("map")
    }

    fn serialize_struct(
        self,
        name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStruct, Self::Error> {
        not_an_enum(name)
    }

    fn serialize_struct_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant, Self::Error> {
        not_an_enum(&format!("{name}::{variant} carries data"))
    }
}
