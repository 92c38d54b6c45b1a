//! Typed field descriptors.
//!
//! A `Field<K>` names a key in an entity's hydrated data and decodes it with
//! the rule of its kind `K`. Descriptors are `const` values shared by every
//! instance of a type and hold no per-instance state.

use std::marker::PhantomData;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::Value;

use super::{json_type, Entity, EntityCore};
use crate::error::{Error, Result};

/// One row of an entity type's field table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
  /// Accessor name on the Rust type
  pub name: &'static str,
  /// Key in the remote JSON object
  pub key: &'static str,
  /// Decode kind, see `FieldKind::NAME`
  pub kind: &'static str,
}

/// Decode rule for a field.
pub trait FieldKind {
  type Output;
  const NAME: &'static str;

  fn decode(owner: &EntityCore, key: &str, value: &Value) -> Result<Self::Output>;
}

/// A declared field on an entity type.
pub struct Field<K> {
  key: &'static str,
  _kind: PhantomData<fn() -> K>,
}

impl<K: FieldKind> Field<K> {
  pub const fn new(key: &'static str) -> Self {
    Self {
      key,
      _kind: PhantomData,
    }
  }

  pub const fn key(&self) -> &'static str {
    self.key
  }

  /// Read and decode this field, hydrating `owner` first if needed.
  pub fn get<E: Entity>(&self, owner: &E) -> Result<K::Output> {
    let core = owner.core();
    let value = core
      .data()?
      .get(self.key)
      .ok_or_else(|| Error::decode(core.kind(), self.key, "missing from entity data"))?;
    K::decode(core, self.key, value)
  }
}

/// Untouched JSON value.
pub struct Raw;

impl FieldKind for Raw {
  type Output = Value;
  const NAME: &'static str = "raw";

  fn decode(_owner: &EntityCore, _key: &str, value: &Value) -> Result<Value> {
    Ok(value.clone())
  }
}

/// JSON string. `null` decodes to `None`.
pub struct Text;

impl FieldKind for Text {
  type Output = Option<String>;
  const NAME: &'static str = "text";

  fn decode(owner: &EntityCore, key: &str, value: &Value) -> Result<Option<String>> {
    match value {
      Value::Null => Ok(None),
      Value::String(s) => Ok(Some(s.clone())),
      other => Err(Error::decode(
        owner.kind(),
        key,
        format!("expected a string, got {}", json_type(other)),
      )),
    }
  }
}

/// 2^63, the first float past `i64::MAX`.
const I64_LIMIT: f64 = 9_223_372_036_854_775_808.0;

/// Integer, from a JSON number or a numeric string. Fractions truncate toward zero.
pub struct Int;

impl FieldKind for Int {
  type Output = i64;
  const NAME: &'static str = "int";

  fn decode(owner: &EntityCore, key: &str, value: &Value) -> Result<i64> {
    let parsed = match value {
      Value::Number(n) => n.as_i64().or_else(|| {
        n.as_f64()
          .map(f64::trunc)
          .filter(|f| (-I64_LIMIT..I64_LIMIT).contains(f))
          .map(|f| f as i64)
      }),
      Value::String(s) => s.trim().parse::<i64>().ok(),
      Value::Bool(b) => Some(i64::from(*b)),
      _ => None,
    };
    parsed.ok_or_else(|| Error::decode(owner.kind(), key, format!("not an integer: {}", value)))
  }
}

/// Truthiness: null, false, zero and empty strings/arrays/objects are false.
pub struct Bool;

impl FieldKind for Bool {
  type Output = bool;
  const NAME: &'static str = "bool";

  fn decode(_owner: &EntityCore, _key: &str, value: &Value) -> Result<bool> {
    Ok(match value {
      Value::Null => false,
      Value::Bool(b) => *b,
      Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
      Value::String(s) => !s.is_empty(),
      Value::Array(items) => !items.is_empty(),
      Value::Object(map) => !map.is_empty(),
    })
  }
}

/// Offset-carrying ISO-8601 layouts tried after RFC 3339.
const OFFSET_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f%z", "%Y%m%dT%H%M%S%.f%z"];

/// Layouts without an offset, read as UTC. A trailing `Z` is stripped first.
const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y%m%dT%H%M%S%.f"];

fn parse_iso8601(raw: &str) -> Option<DateTime<Utc>> {
  if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
    return Some(dt.with_timezone(&Utc));
  }
  if let Some(dt) = OFFSET_FORMATS
    .iter()
    .find_map(|fmt| DateTime::parse_from_str(raw, fmt).ok())
  {
    return Some(dt.with_timezone(&Utc));
  }

  let naive = raw.strip_suffix('Z').unwrap_or(raw);
  NAIVE_FORMATS
    .iter()
    .find_map(|fmt| NaiveDateTime::parse_from_str(naive, fmt).ok())
    .map(|dt| dt.and_utc())
}

/// ISO-8601 timestamp, normalised to UTC. Values without an offset are UTC.
pub struct Date;

impl FieldKind for Date {
  type Output = DateTime<Utc>;
  const NAME: &'static str = "date";

  fn decode(owner: &EntityCore, key: &str, value: &Value) -> Result<DateTime<Utc>> {
    let raw = value
      .as_str()
      .ok_or_else(|| Error::decode(owner.kind(), key, format!("expected a date string, got {}", json_type(value))))?;
    parse_iso8601(raw)
      .ok_or_else(|| Error::decode(owner.kind(), key, format!("invalid ISO-8601 date '{}'", raw)))
  }
}

/// Id of another entity, decoded into an unhydrated `T` on the owner's connection.
pub struct Related<T>(PhantomData<fn() -> T>);

impl<T: Entity> FieldKind for Related<T> {
  type Output = T;
  const NAME: &'static str = "related";

  fn decode(owner: &EntityCore, key: &str, value: &Value) -> Result<T> {
    let id = value
      .as_str()
      .ok_or_else(|| Error::decode(owner.kind(), key, format!("expected an id, got {}", json_type(value))))?;
    Ok(T::lazy(owner.connection().clone(), id))
  }
}

/// Array of ids, decoded into unhydrated entities in source order.
pub struct RelatedList<T>(PhantomData<fn() -> T>);

impl<T: Entity> FieldKind for RelatedList<T> {
  type Output = Vec<T>;
  const NAME: &'static str = "related-list";

  fn decode(owner: &EntityCore, key: &str, value: &Value) -> Result<Vec<T>> {
    let ids = value
      .as_array()
      .ok_or_else(|| Error::decode(owner.kind(), key, format!("expected an array of ids, got {}", json_type(value))))?;

    ids
      .iter()
      .map(|id| Related::<T>::decode(owner, key, id))
      .collect()
  }
}
