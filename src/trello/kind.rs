//! Lookup of entity types by name, for callers that only know a type at runtime.

use std::fmt;

use serde_json::Value;

use super::types::*;
use crate::connection::Connection;
use crate::entity::{Entity, FieldSpec};
use crate::error::Result;

/// Declared fields of one entity with their undecoded values.
#[derive(Debug, Clone)]
pub struct Snapshot {
  pub label: String,
  pub fields: Vec<(FieldSpec, Value)>,
}

impl Snapshot {
  /// Hydrate `entity` if needed and read every declared field.
  pub fn of<T: Entity + fmt::Display>(entity: &T) -> Result<Self> {
    let data = entity.ensure_hydrated()?;
    let fields = T::FIELDS
      .iter()
      .map(|spec| (*spec, data.get(spec.key).cloned().unwrap_or(Value::Null)))
      .collect();

    Ok(Self {
      label: entity.to_string(),
      fields,
    })
  }
}

macro_rules! entity_kinds {
  ($($variant:ident),* $(,)?) => {
    /// Every entity type this crate declares.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum EntityKind {
      $($variant),*
    }

    impl EntityKind {
      pub const ALL: &'static [EntityKind] = &[$(Self::$variant),*];

      pub fn name(self) -> &'static str {
        match self {
          $(Self::$variant => <$variant as Entity>::KIND),*
        }
      }

      pub fn prefix(self) -> &'static str {
        match self {
          $(Self::$variant => <$variant as Entity>::PREFIX),*
        }
      }

      pub fn fields(self) -> &'static [FieldSpec] {
        match self {
          $(Self::$variant => <$variant as Entity>::FIELDS),*
        }
      }

      /// Fetch entity `id` of this kind and read all of its declared fields.
      pub fn snapshot(self, conn: &Connection, id: &str) -> Result<Snapshot> {
        match self {
          $(Self::$variant => Snapshot::of(&conn.entity::<$variant>(id))),*
        }
      }
    }
  };
}

entity_kinds!(
  Action,
  Attachment,
  Board,
  Card,
  CheckItem,
  Checklist,
  CustomSticker,
  List,
  Member,
  Notification,
  Organization,
  Sticker,
  Token,
  WebHook,
);

impl EntityKind {
  /// Case-insensitive lookup by type name ("card", "checkItem") or by path
  /// segment ("cards", "checkItems").
  pub fn from_name(name: &str) -> Option<Self> {
    Self::ALL.iter().copied().find(|kind| {
      kind.name().eq_ignore_ascii_case(name) || kind.prefix().trim_matches('/').eq_ignore_ascii_case(name)
    })
  }
}

impl fmt::Display for EntityKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}
