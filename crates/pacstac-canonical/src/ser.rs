//! Conversion of any `Serialize` value into the JSON document model.
//!
//! `serde_json::to_value` turns both `None` and NaN into `null`, which would
//! hide absent members and non-finite numbers. This serializer keeps them
//! apart: absence comes back as `None` and the enclosing container decides
//! whether to drop it or reject it.

use serde::ser::{self, Serialize};
use serde_json::{Map, Number, Value};

use crate::canonicalizer::{CanonicalizationError, Path};

/// `None` marks an absent value.
pub(crate) type Converted = Option<Value>;

pub(crate) fn to_document<T>(value: &T, path: &Path) -> Result<Converted, CanonicalizationError>
where
    T: Serialize + ?Sized,
{
    value.serialize(DocumentSerializer { path: path.clone() })
}

fn required<T>(value: &T, path: Path) -> Result<Value, CanonicalizationError>
where
    T: Serialize + ?Sized,
{
    to_document(value, &path)?.ok_or_else(|| {
        CanonicalizationError::UnsupportedType(format!("absent value at {}", path))
    })
}

fn key_text<T>(key: &T, path: &Path) -> Result<String, CanonicalizationError>
where
    T: Serialize + ?Sized,
{
    match to_document(key, path)? {
        Some(Value::String(text)) => Ok(text),
        Some(Value::Number(n)) if n.is_i64() || n.is_u64() => Ok(n.to_string()),
        _ => Err(CanonicalizationError::UnsupportedType(format!(
            "non-string map key at {}",
            path
        ))),
    }
}

fn single_entry(name: &str, value: Value) -> Value {
    let mut members = Map::new();
    members.insert(name.to_owned(), value);
    Value::Object(members)
}

pub(crate) struct DocumentSerializer {
    path: Path,
}

impl DocumentSerializer {
    fn number(self, value: f64) -> Result<Converted, CanonicalizationError> {
        Number::from_f64(value)
            .map(|n| Some(Value::Number(n)))
            .ok_or_else(|| CanonicalizationError::NonFiniteNumber(self.path.to_string()))
    }
}

impl ser::Serializer for DocumentSerializer {
    type Ok = Converted;
    type Error = CanonicalizationError;
    type SerializeSeq = ArrayBuilder;
    type SerializeTuple = ArrayBuilder;
    type SerializeTupleStruct = ArrayBuilder;
    type SerializeTupleVariant = Variant<ArrayBuilder>;
    type SerializeMap = ObjectBuilder;
    type SerializeStruct = ObjectBuilder;
    type SerializeStructVariant = Variant<ObjectBuilder>;

    fn serialize_bool(self, v: bool) -> Result<Converted, Self::Error> {
        Ok(Some(Value::Bool(v)))
    }

    fn serialize_i8(self, v: i8) -> Result<Converted, Self::Error> {
        self.serialize_i64(v.into())
    }

    fn serialize_i16(self, v: i16) -> Result<Converted, Self::Error> {
        self.serialize_i64(v.into())
    }

    fn serialize_i32(self, v: i32) -> Result<Converted, Self::Error> {
        self.serialize_i64(v.into())
    }

    fn serialize_i64(self, v: i64) -> Result<Converted, Self::Error> {
        Ok(Some(v.into()))
    }

    fn serialize_i128(self, v: i128) -> Result<Converted, Self::Error> {
        self.number(v as f64)
    }

    fn serialize_u8(self, v: u8) -> Result<Converted, Self::Error> {
        self.serialize_u64(v.into())
    }

    fn serialize_u16(self, v: u16) -> Result<Converted, Self::Error> {
        self.serialize_u64(v.into())
    }

    fn serialize_u32(self, v: u32) -> Result<Converted, Self::Error> {
        self.serialize_u64(v.into())
    }

    fn serialize_u64(self, v: u64) -> Result<Converted, Self::Error> {
        Ok(Some(v.into()))
    }

    fn serialize_u128(self, v: u128) -> Result<Converted, Self::Error> {
        self.number(v as f64)
    }

    fn serialize_f32(self, v: f32) -> Result<Converted, Self::Error> {
        self.number(v.into())
    }

    fn serialize_f64(self, v: f64) -> Result<Converted, Self::Error> {
        self.number(v)
    }

    fn serialize_char(self, v: char) -> Result<Converted, Self::Error> {
        Ok(Some(Value::String(v.to_string())))
    }

    fn serialize_str(self, v: &str) -> Result<Converted, Self::Error> {
        Ok(Some(Value::String(v.to_owned())))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Converted, Self::Error> {
        Ok(Some(Value::Array(v.iter().map(|&b| Value::from(b)).collect())))
    }

    fn serialize_none(self) -> Result<Converted, Self::Error> {
        Ok(None)
    }

    fn serialize_some<T>(self, value: &T) -> Result<Converted, Self::Error>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Converted, Self::Error> {
        Ok(Some(Value::Null))
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Converted, Self::Error> {
        self.serialize_unit()
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _index: u32,
        variant: &'static str,
    ) -> Result<Converted, Self::Error> {
        self.serialize_str(variant)
    }

    fn serialize_newtype_struct<T>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<Converted, Self::Error>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Converted, Self::Error>
    where
        T: ?Sized + Serialize,
    {
        let inner = required(value, self.path.child(variant))?;
        Ok(Some(single_entry(variant, inner)))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<ArrayBuilder, Self::Error> {
        Ok(ArrayBuilder {
            path: self.path,
            items: Vec::with_capacity(len.unwrap_or(0)),
        })
    }

    fn serialize_tuple(self, len: usize) -> Result<ArrayBuilder, Self::Error> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<ArrayBuilder, Self::Error> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<Variant<ArrayBuilder>, Self::Error> {
        Ok(Variant {
            name: variant,
            inner: ArrayBuilder {
                path: self.path.child(variant),
                items: Vec::with_capacity(len),
            },
        })
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<ObjectBuilder, Self::Error> {
        Ok(ObjectBuilder::new(self.path))
    }

    fn serialize_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<ObjectBuilder, Self::Error> {
        Ok(ObjectBuilder::new(self.path))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Variant<ObjectBuilder>, Self::Error> {
        Ok(Variant {
            name: variant,
            inner: ObjectBuilder::new(self.path.child(variant)),
        })
    }
}

/// Elements of an array; absent elements are rejected.
pub(crate) struct ArrayBuilder {
    path: Path,
    items: Vec<Value>,
}

impl ArrayBuilder {
    fn push<T>(&mut self, value: &T) -> Result<(), CanonicalizationError>
    where
        T: ?Sized + Serialize,
    {
        let item = required(value, self.path.index(self.items.len()))?;
        self.items.push(item);
        Ok(())
    }

    fn finish(self) -> Value {
        Value::Array(self.items)
    }
}

impl ser::SerializeSeq for ArrayBuilder {
    type Ok = Converted;
    type Error = CanonicalizationError;

    fn serialize_element<T>(&mut self, value: &T) -> Result<(), Self::Error>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Converted, Self::Error> {
        Ok(Some(self.finish()))
    }
}

impl ser::SerializeTuple for ArrayBuilder {
    type Ok = Converted;
    type Error = CanonicalizationError;

    fn serialize_element<T>(&mut self, value: &T) -> Result<(), Self::Error>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Converted, Self::Error> {
        Ok(Some(self.finish()))
    }
}

impl ser::SerializeTupleStruct for ArrayBuilder {
    type Ok = Converted;
    type Error = CanonicalizationError;

    fn serialize_field<T>(&mut self, value: &T) -> Result<(), Self::Error>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Converted, Self::Error> {
        Ok(Some(self.finish()))
    }
}

/// Members of an object; absent members are dropped.
pub(crate) struct ObjectBuilder {
    path: Path,
    members: Map<String, Value>,
    pending_key: Option<String>,
}

impl ObjectBuilder {
    fn new(path: Path) -> Self {
        Self {
            path,
            members: Map::new(),
            pending_key: None,
        }
    }

    fn insert<T>(&mut self, key: String, value: &T) -> Result<(), CanonicalizationError>
    where
        T: ?Sized + Serialize,
    {
        let path = self.path.child(&key);
        let Some(value) = to_document(value, &path)? else {
            return Ok(());
        };
        if self.members.contains_key(&key) {
            return Err(CanonicalizationError::DuplicateKey(path.to_string()));
        }
        self.members.insert(key, value);
        Ok(())
    }

    fn finish(self) -> Value {
        Value::Object(self.members)
    }
}

impl ser::SerializeMap for ObjectBuilder {
    type Ok = Converted;
    type Error = CanonicalizationError;

    fn serialize_key<T>(&mut self, key: &T) -> Result<(), Self::Error>
    where
        T: ?Sized + Serialize,
    {
        self.pending_key = Some(key_text(key, &self.path)?);
        Ok(())
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<(), Self::Error>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .pending_key
            .take()
            .ok_or_else(|| CanonicalizationError::Other("map value without a key".into()))?;
        self.insert(key, value)
    }

    fn end(self) -> Result<Converted, Self::Error> {
        Ok(Some(self.finish()))
    }
}

impl ser::SerializeStruct for ObjectBuilder {
    type Ok = Converted;
    type Error = CanonicalizationError;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<(), Self::Error>
    where
        T: ?Sized + Serialize,
    {
        self.insert(key.to_owned(), value)
    }

    fn end(self) -> Result<Converted, Self::Error> {
        Ok(Some(self.finish()))
    }
}

/// Externally tagged enum variant: `{"Name": <inner>}`.
pub(crate) struct Variant<B> {
    name: &'static str,
    inner: B,
}

impl ser::SerializeTupleVariant for Variant<ArrayBuilder> {
    type Ok = Converted;
    type Error = CanonicalizationError;

    fn serialize_field<T>(&mut self, value: &T) -> Result<(), Self::Error>
    where
        T: ?Sized + Serialize,
    {
        self.inner.push(value)
    }

    fn end(self) -> Result<Converted, Self::Error> {
        Ok(Some(single_entry(self.name, self.inner.finish())))
    }
}

impl ser::SerializeStructVariant for Variant<ObjectBuilder> {
    type Ok = Converted;
    type Error = CanonicalizationError;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<(), Self::Error>
    where
        T: ?Sized + Serialize,
    {
        self.inner.insert(key.to_owned(), value)
    }

    fn end(self) -> Result<Converted, Self::Error> {
        Ok(Some(single_entry(self.name, self.inner.finish())))
    }
}
