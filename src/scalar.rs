//! Capture a key's default as a [`Value`] without coercion.
//!
//! Only strings, `bool`, `f32`/`f64` and integers that always fit in an
//! `i64` (`i8` to `i64`, `u8` to `u32`) are accepted. Everything else is
//! refused, including shapes serde would otherwise flatten into a scalar:
//! `char`, `Option`, unit enum variants and newtype structs.

use std::fmt;

use serde::ser::{self, Impossible, Serialize};

use crate::types::Value;

#[derive(Debug)]
pub struct NotScalar(String);

impl fmt::Display for NotScalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for NotScalar {}

impl ser::Error for NotScalar {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        NotScalar(msg.to_string())
    }
}

pub fn to_value<V: Serialize + ?Sized>(value: &V) -> Result<Value, NotScalar> {
    value.serialize(ScalarSerializer)
}

fn refuse<T>(shape: &str) -> Result<T, NotScalar> {
    Err(NotScalar(format!("{shape} is not a string, int, bool or float64")))
}

struct ScalarSerializer;

impl ser::Serializer for ScalarSerializer {
    type Ok = Value;
    type Error = NotScalar;
    type SerializeSeq = Impossible<Value, NotScalar>;
    type SerializeTuple = Impossible<Value, NotScalar>;
    type SerializeTupleStruct = Impossible<Value, NotScalar>;
    type SerializeTupleVariant = Impossible<Value, NotScalar>;
    type SerializeMap = Impossible<Value, NotScalar>;
    type SerializeStruct = Impossible<Value, NotScalar>;
    type SerializeStructVariant = Impossible<Value, NotScalar>;

    fn serialize_bool(self, v: bool) -> Result<Value, NotScalar> {
        Ok(Value::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Value, NotScalar> {
        Ok(Value::Int(v.into()))
    }

    fn serialize_i16(self, v: i16) -> Result<Value, NotScalar> {
        Ok(Value::Int(v.into()))
    }

    fn serialize_i32(self, v: i32) -> Result<Value, NotScalar> {
        Ok(Value::Int(v.into()))
    }

    fn serialize_i64(self, v: i64) -> Result<Value, NotScalar> {
        Ok(Value::Int(v))
    }

    fn serialize_i128(self, _: i128) -> Result<Value, NotScalar> {
        refuse("i128")
    }

    fn serialize_u8(self, v: u8) -> Result<Value, NotScalar> {
        Ok(Value::Int(v.into()))
    }

    fn serialize_u16(self, v: u16) -> Result<Value, NotScalar> {
        Ok(Value::Int(v.into()))
    }

    fn serialize_u32(self, v: u32) -> Result<Value, NotScalar> {
        Ok(Value::Int(v.into()))
    }

    fn serialize_u64(self, _: u64) -> Result<Value, NotScalar> {
        refuse("u64")
    }

    fn serialize_u128(self, _: u128) -> Result<Value, NotScalar> {
        refuse("u128")
    }

    fn serialize_f32(self, v: f32) -> Result<Value, NotScalar> {
        Ok(Value::Float(v.into()))
    }

    fn serialize_f64(self, v: f64) -> Result<Value, NotScalar> {
        Ok(Value::Float(v))
    }

    fn serialize_char(self, _: char) -> Result<Value, NotScalar> {
        refuse("char")
    }

    fn serialize_str(self, v: &str) -> Result<Value, NotScalar> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_bytes(self, _: &[u8]) -> Result<Value, NotScalar> {
        refuse("a byte array")
    }

    fn serialize_none(self) -> Result<Value, NotScalar> {
        refuse("an Option")
    }

    fn serialize_some<T: ?Sized + Serialize>(self, _: &T) -> Result<Value, NotScalar> {
        refuse("an Option")
    }

    fn serialize_unit(self) -> Result<Value, NotScalar> {
        refuse("()")
    }

    fn serialize_unit_struct(self, name: &'static str) -> Result<Value, NotScalar> {
        refuse(name)
    }

    fn serialize_unit_variant(
        self,
        name: &'static str,
        _: u32,
        _: &'static str,
    ) -> Result<Value, NotScalar> {
        refuse(name)
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        name: &'static str,
        _: &T,
    ) -> Result<Value, NotScalar> {
        refuse(name)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        name: &'static str,
        _: u32,
        _: &'static str,
        _: &T,
    ) -> Result<Value, NotScalar> {
        refuse(name)
    }

    fn serialize_seq(self, _: Option<usize>) -> Result<Self::SerializeSeq, NotScalar> {
        refuse("a sequence")
    }

    fn serialize_tuple(self, _: usize) -> Result<Self::SerializeTuple, NotScalar> {
        refuse("a tuple")
    }

    fn serialize_tuple_struct(
        self,
        name: &'static str,
        _: usize,
    ) -> Result<Self::SerializeTupleStruct, NotScalar> {
        refuse(name)
    }

    fn serialize_tuple_variant(
        self,
        name: &'static str,
        _: u32,
        _: &'static str,
        _: usize,
    ) -> Result<Self::SerializeTupleVariant, NotScalar> {
        refuse(name)
    }

    fn serialize_map(self, _: Option<usize>) -> Result<Self::SerializeMap, NotScalar> {
        refuse("a map")
    }

    fn serialize_struct(
        self,
        name: &'static str,
        _: usize,
    ) -> Result<Self::SerializeStruct, NotScalar> {
        refuse(name)
    }

    fn serialize_struct_variant(
        self,
        name: &'static str,
        _: u32,
        _: &'static str,
        _: usize,
    ) -> Result<Self::SerializeStructVariant, NotScalar> {
        refuse(name)
    }
}
