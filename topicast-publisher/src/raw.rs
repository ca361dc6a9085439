//! Plain-text rendering of arbitrary `Serialize` values.
//!
//! The `raw` encoding does not produce a structured format. It renders a
//! value the way a generic value formatter would, with a fixed set of rules
//! so the output does not drift between releases:
//!
//! | value                         | output            |
//! |-------------------------------|-------------------|
//! | `true`, `42`, `1.5`           | `true`, `42`, `1.5` |
//! | `"text"`, `'c'`               | `text`, `c`       |
//! | `None`, `()`                  | `<nil>`           |
//! | `Some(v)`, newtype struct     | `v`               |
//! | unit struct                   | `{}`              |
//! | bytes                         | `[1 2 3]`         |
//! | sequence, tuple               | `[a b c]`         |
//! | struct, tuple struct          | `{a b}`           |
//! | map                           | `map[k:v k:v]`    |
//! | enum variants                 | `Unit`, `New(v)`, `Tuple(a b)`, `Struct{a b}` |
//!
//! Strings are never quoted, including when nested. Struct output lists field
//! values in declaration order without names. Maps keep their own iteration
//! order, which is sorted for `BTreeMap` and `serde_json::Value`.

use serde::ser::{self, Serialize};
use std::fmt::Display;
use thiserror::Error;

/// Error raised by a value's own `Serialize` implementation while rendering.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct RawError(String);

impl ser::Error for RawError {
    fn custom<T: Display>(msg: T) -> Self {
        Self(msg.to_string())
    }
}

/// Render `value` as raw text.
///
/// # Errors
/// Only fails when the value's `Serialize` impl itself reports an error.
pub fn to_raw_string<T>(value: &T) -> Result<String, RawError>
where
    T: Serialize + ?Sized,
{
    let mut formatter = RawFormatter { out: String::new() };
    value.serialize(&mut formatter)?;
    Ok(formatter.out)
}

struct RawFormatter {
    out: String,
}

impl RawFormatter {
    fn push_display(&mut self, value: impl Display) {
        self.out.push_str(&value.to_string());
    }

    fn open(&mut self, prefix: &str, close: &'static str) -> Compound<'_> {
        self.out.push_str(prefix);
        Compound { formatter: self, first: true, close }
    }
}

struct Compound<'a> {
    formatter: &'a mut RawFormatter,
    first: bool,
    close: &'static str,
}

impl Compound<'_> {
    fn separate(&mut self) {
        if !self.first {
            self.formatter.out.push(' ');
        }
        self.first = false;
    }

    fn element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), RawError> {
        self.separate();
        value.serialize(&mut *self.formatter)
    }

    fn finish(self) -> Result<(), RawError> {
        self.formatter.out.push_str(self.close);
        Ok(())
    }
}

impl<'a> ser::Serializer for &'a mut RawFormatter {
    type Ok = ();
    type Error = RawError;

    type SerializeSeq = Compound<'a>;
    type SerializeTuple = Compound<'a>;
    type SerializeTupleStruct = Compound<'a>;
    type SerializeTupleVariant = Compound<'a>;
    type SerializeMap = Compound<'a>;
    type SerializeStruct = Compound<'a>;
    type SerializeStructVariant = Compound<'a>;

    fn serialize_bool(self, v: bool) -> Result<(), RawError> {
        self.out.push_str(if v { "true" } else { "false" });
        Ok(())
    }

    fn serialize_i8(self, v: i8) -> Result<(), RawError> {
        self.push_display(v);
        Ok(())
    }

    fn serialize_i16(self, v: i16) -> Result<(), RawError> {
        self.push_display(v);
        Ok(())
    }

    fn serialize_i32(self, v: i32) -> Result<(), RawError> {
        self.push_display(v);
        Ok(())
    }

    fn serialize_i64(self, v: i64) -> Result<(), RawError> {
        self.push_display(v);
        Ok(())
    }

    fn serialize_i128(self, v: i128) -> Result<(), RawError> {
        self.push_display(v);
        Ok(())
    }

    fn serialize_u8(self, v: u8) -> Result<(), RawError> {
        self.push_display(v);
        Ok(())
    }

    fn serialize_u16(self, v: u16) -> Result<(), RawError> {
        self.push_display(v);
        Ok(())
    }

    fn serialize_u32(self, v: u32) -> Result<(), RawError> {
        self.push_display(v);
        Ok(())
    }

    fn serialize_u64(self, v: u64) -> Result<(), RawError> {
        self.push_display(v);
        Ok(())
    }

    fn serialize_u128(self, v: u128) -> Result<(), RawError> {
        self.push_display(v);
        Ok(())
    }

    fn serialize_f32(self, v: f32) -> Result<(), RawError> {
        self.push_display(v);
        Ok(())
    }

    fn serialize_f64(self, v: f64) -> Result<(), RawError> {
        self.push_display(v);
        Ok(())
    }

    fn serialize_char(self, v: char) -> Result<(), RawError> {
        self.out.push(v);
        Ok(())
    }

    fn serialize_str(self, v: &str) -> Result<(), RawError> {
        self.out.push_str(v);
        Ok(())
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<(), RawError> {
        let mut seq = self.open("[", "]");
        for byte in v {
            seq.element(byte)?;
        }
        seq.finish()
    }

    fn serialize_none(self) -> Result<(), RawError> {
        self.out.push_str("<nil>");
        Ok(())
    }

    fn serialize_some<T: Serialize + ?Sized>(self, value: &T) -> Result<(), RawError> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<(), RawError> {
        self.serialize_none()
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<(), RawError> {
        self.out.push_str("{}");
        Ok(())
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<(), RawError> {
        self.out.push_str(variant);
        Ok(())
    }

    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<(), RawError> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<(), RawError> {
        self.out.push_str(variant);
        self.out.push('(');
        value.serialize(&mut *self)?;
        self.out.push(')');
        Ok(())
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Compound<'a>, RawError> {
        Ok(self.open("[", "]"))
    }

    fn serialize_tuple(self, _len: usize) -> Result<Compound<'a>, RawError> {
        Ok(self.open("[", "]"))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Compound<'a>, RawError> {
        Ok(self.open("{", "}"))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Compound<'a>, RawError> {
        self.out.push_str(variant);
        Ok(self.open("(", ")"))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Compound<'a>, RawError> {
        Ok(self.open("map[", "]"))
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Compound<'a>, RawError> {
        Ok(self.open("{", "}"))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Compound<'a>, RawError> {
        self.out.push_str(variant);
        Ok(self.open("{", "}"))
    }
}

impl ser::SerializeSeq for Compound<'_> {
    type Ok = ();
    type Error = RawError;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), RawError> {
        self.element(value)
    }

    fn end(self) -> Result<(), RawError> {
        self.finish()
    }
}

impl ser::SerializeTuple for Compound<'_> {
    type Ok = ();
    type Error = RawError;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), RawError> {
        self.element(value)
    }

    fn end(self) -> Result<(), RawError> {
        self.finish()
    }
}

impl ser::SerializeTupleStruct for Compound<'_> {
    type Ok = ();
    type Error = RawError;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), RawError> {
        self.element(value)
    }

    fn end(self) -> Result<(), RawError> {
        self.finish()
    }
}

impl ser::SerializeTupleVariant for Compound<'_> {
    type Ok = ();
    type Error = RawError;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), RawError> {
        self.element(value)
    }

    fn end(self) -> Result<(), RawError> {
        self.finish()
    }
}

impl ser::SerializeMap for Compound<'_> {
    type Ok = ();
    type Error = RawError;

    fn serialize_key<T: Serialize + ?Sized>(&mut self, key: &T) -> Result<(), RawError> {
        self.element(key)?;
        self.formatter.out.push(':');
        Ok(())
    }

    fn serialize_value<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), RawError> {
        value.serialize(&mut *self.formatter)
    }

    fn end(self) -> Result<(), RawError> {
        self.finish()
    }
}

impl ser::SerializeStruct for Compound<'_> {
    type Ok = ();
    type Error = RawError;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        _key: &'static str,
        value: &T,
    ) -> Result<(), RawError> {
        self.element(value)
    }

    fn end(self) -> Result<(), RawError> {
        self.finish()
    }
}

impl ser::SerializeStructVariant for Compound<'_> {
    type Ok = ();
    type Error = RawError;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        _key: &'static str,
        value: &T,
    ) -> Result<(), RawError> {
        self.element(value)
    }

    fn end(self) -> Result<(), RawError> {
        self.finish()
    }
}
