//! Lazily-hydrated entities.
//!
//! An entity starts as a shell holding only its id, its path and a
//! connection. The first read of any declared field fetches `GET <prefix><id>`
//! once and keeps the whole JSON object for the lifetime of the instance.
//! Sub-collections (a board's cards, a member's boards...) are fetched on
//! first access and cached on the owning instance, independently of the
//! owner's own data.
//!
//! Instances are never interned: two accessors returning "the same" remote
//! object give two entities with separate caches.

mod capability;
mod collection;
mod field;
mod macros;

pub use capability::{Closable, Deletable, LabelColor, Labelable, WebHookable};
pub use collection::SubCollection;
pub use field::{Bool, Date, Field, FieldKind, FieldSpec, Int, Raw, Related, RelatedList, Text};

use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use once_cell::unsync::OnceCell;
use serde_json::{Map, Value};
use tracing::debug;

use crate::connection::Connection;
use crate::error::{Error, Result};

/// Raw JSON object backing a hydrated entity.
pub type EntityData = Map<String, Value>;

static NEXT_INSTANCE: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of one entity instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InstanceId(u64);

impl InstanceId {
  fn next() -> Self {
    Self(NEXT_INSTANCE.fetch_add(1, Ordering::Relaxed))
  }
}

impl fmt::Display for InstanceId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "#{}", self.0)
  }
}

/// State shared by every entity type: identity, connection and caches.
pub struct EntityCore {
  kind: &'static str,
  id: String,
  path: String,
  conn: Connection,
  instance: InstanceId,
  data: OnceCell<EntityData>,
  collections: RefCell<HashMap<TypeId, Rc<dyn Any>>>,
}

impl EntityCore {
  pub fn new(
    kind: &'static str,
    prefix: &str,
    conn: Connection,
    id: &str,
    data: Option<EntityData>,
  ) -> Self {
    let cell = OnceCell::new();
    if let Some(data) = data {
      let _ = cell.set(data);
    }

    Self {
      kind,
      id: id.to_string(),
      path: format!("{}{}", prefix, id),
      conn,
      instance: InstanceId::next(),
      data: cell,
      collections: RefCell::new(HashMap::new()),
    }
  }

  pub fn kind(&self) -> &'static str {
    self.kind
  }

  pub fn id(&self) -> &str {
    &self.id
  }

  pub fn path(&self) -> &str {
    &self.path
  }

  pub fn connection(&self) -> &Connection {
    &self.conn
  }

  pub fn instance(&self) -> InstanceId {
    self.instance
  }

  pub fn is_hydrated(&self) -> bool {
    self.data.get().is_some()
  }

  /// Hydrated data, fetching it first if needed.
  ///
  /// A failed fetch leaves the entity unhydrated so the next access retries.
  pub fn data(&self) -> Result<&EntityData> {
    self.data.get_or_try_init(|| {
      debug!(kind = self.kind, id = %self.id, instance = %self.instance, "Hydrating entity");
      match self.conn.get_json(&self.path)? {
        Value::Object(map) => Ok(map),
        other => Err(Error::decode(
          self.kind,
          &self.path,
          format!("expected a JSON object, got {}", json_type(&other)),
        )),
      }
    })
  }

  pub(crate) fn cached_collection<T: 'static>(&self) -> Option<Rc<Vec<T>>> {
    let cached = self.collections.borrow().get(&TypeId::of::<T>()).cloned()?;
    cached.downcast::<Vec<T>>().ok()
  }

  pub(crate) fn store_collection<T: 'static>(&self, items: Rc<Vec<T>>) {
    self
      .collections
      .borrow_mut()
      .insert(TypeId::of::<T>(), items);
  }

  /// `<Kind: name>` when hydrated data has a name, `<Kind: id>` otherwise.
  pub fn fmt_label(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = self
      .data
      .get()
      .and_then(|data| data.get("name"))
      .and_then(Value::as_str);
    write!(f, "<{}: {}>", self.kind, name.unwrap_or(&self.id))
  }
}

impl fmt::Debug for EntityCore {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct(self.kind)
      .field("id", &self.id)
      .field("instance", &self.instance)
      .field("hydrated", &self.is_hydrated())
      .finish()
  }
}

/// A remote resource type with a fixed path prefix and a declared field table.
///
/// Implemented by `lazy_entity!`; the provided methods are the uniform
/// fetch/cache protocol every type shares.
pub trait Entity: Sized + 'static {
  /// Type name, used in errors, logs and `Display`.
  const KIND: &'static str;
  /// Path prefix including both slashes, e.g. `/cards/`.
  const PREFIX: &'static str;
  /// Declared fields: attribute name, data key and decode kind.
  const FIELDS: &'static [FieldSpec];

  fn from_core(core: EntityCore) -> Self;
  fn core(&self) -> &EntityCore;

  /// Unhydrated shell. Performs no I/O.
  fn lazy(conn: Connection, id: &str) -> Self {
    Self::from_core(EntityCore::new(Self::KIND, Self::PREFIX, conn, id, None))
  }

  /// Entity that starts hydrated with `data` and never fetches itself.
  fn hydrated(conn: Connection, id: &str, data: EntityData) -> Self {
    Self::from_core(EntityCore::new(
      Self::KIND,
      Self::PREFIX,
      conn,
      id,
      Some(data),
    ))
  }

  /// Hydrated entity from a JSON object carrying its own `id`.
  fn from_json(conn: Connection, value: Value) -> Result<Self> {
    let data = match value {
      Value::Object(data) => data,
      other => {
        return Err(Error::decode(
          Self::KIND,
          "id",
          format!("expected a JSON object, got {}", json_type(&other)),
        ))
      }
    };
    let id = data
      .get("id")
      .and_then(Value::as_str)
      .ok_or_else(|| Error::decode(Self::KIND, "id", "missing or not a string"))?
      .to_string();
    Ok(Self::hydrated(conn, &id, data))
  }

  fn id(&self) -> &str {
    self.core().id()
  }

  fn path(&self) -> &str {
    self.core().path()
  }

  fn connection(&self) -> &Connection {
    self.core().connection()
  }

  fn is_hydrated(&self) -> bool {
    self.core().is_hydrated()
  }

  fn instance(&self) -> InstanceId {
    self.core().instance()
  }

  /// True if both handles are the very same instance, not merely the same remote id.
  fn same_instance(&self, other: &Self) -> bool {
    self.instance() == other.instance()
  }

  /// Hydrate if needed and return the whole data object.
  fn ensure_hydrated(&self) -> Result<&EntityData> {
    self.core().data()
  }

  /// Undecoded value of any key; `Null` when the key is absent.
  fn raw(&self, key: &str) -> Result<Value> {
    Ok(self.ensure_hydrated()?.get(key).cloned().unwrap_or(Value::Null))
  }
}

pub(crate) fn json_type(value: &Value) -> &'static str {
  match value {
    Value::Null => "null",
    Value::Bool(_) => "a boolean",
    Value::Number(_) => "a number",
    Value::String(_) => "a string",
    Value::Array(_) => "an array",
    Value::Object(_) => "an object",
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::Credentials;
  use crate::transport::mock::MockTransport;
  use crate::transport::HttpMethod;
  use crate::trello::{Board, Card};
  use serde_json::json;

  fn connection() -> (Connection, MockTransport) {
    let mock = MockTransport::new();
    let conn = Connection::with_base_url(Credentials::new("k", "t"), mock.clone(), "http://mock.test");
    (conn, mock)
  }

  fn object(value: Value) -> EntityData {
    match value {
      Value::Object(map) => map,
      _ => unreachable!(),
    }
  }

  #[test]
  fn test_first_field_read_fetches_once() {
    let (conn, mock) = connection();
    mock.respond(
      HttpMethod::Get,
      "/cards/abc123",
      200,
      r#"{"id":"abc123","name":"Demo","desc":"text","idBoard":"b1"}"#,
    );

    let card = conn.card("abc123");
    assert!(!card.is_hydrated());

    assert_eq!(card.name().unwrap().as_deref(), Some("Demo"));
    assert!(card.is_hydrated());
    assert_eq!(card.desc().unwrap().as_deref(), Some("text"));
    assert_eq!(mock.count(HttpMethod::Get, "/cards/abc123"), 1);
  }

  #[test]
  fn test_related_object_is_lazy() {
    let (conn, mock) = connection();
    mock.respond(
      HttpMethod::Get,
      "/cards/abc123",
      200,
      r#"{"id":"abc123","name":"Demo","idBoard":"b1"}"#,
    );

    let card = conn.card("abc123");
    assert_eq!(card.name().unwrap().as_deref(), Some("Demo"));

    let board = card.board().unwrap();
    assert_eq!(board.id(), "b1");
    assert_eq!(board.path(), "/boards/b1");
    assert!(!board.is_hydrated());
    assert_eq!(mock.call_count(), 1);
  }

  #[test]
  fn test_related_objects_are_not_interned() {
    let (conn, _) = connection();
    let card = Card::hydrated(conn, "c1", object(json!({"id": "c1", "idBoard": "b1"})));

    let first = card.board().unwrap();
    let second = card.board().unwrap();
    assert_eq!(first.id(), second.id());
    assert!(!first.same_instance(&second));
    assert!(!first.is_hydrated());
    assert!(!second.is_hydrated());
  }

  #[test]
  fn test_failed_hydration_is_retried() {
    let (conn, mock) = connection();
    mock
      .respond(HttpMethod::Get, "/boards/b1", 404, "not found")
      .respond(HttpMethod::Get, "/boards/b1", 200, r#"{"id":"b1","name":"Roadmap"}"#);

    let board = conn.board("b1");
    let err = board.name().unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert!(!board.is_hydrated());

    assert_eq!(board.name().unwrap().as_deref(), Some("Roadmap"));
    assert_eq!(mock.count(HttpMethod::Get, "/boards/b1"), 2);
  }

  #[test]
  fn test_non_object_payload_is_decode_error() {
    let (conn, mock) = connection();
    mock.respond(HttpMethod::Get, "/boards/b1", 200, "[1, 2]");

    let err = conn.board("b1").name().unwrap_err();
    assert!(matches!(err, Error::Decode { kind: "Board", .. }));
  }

  #[test]
  fn test_prehydrated_entity_never_fetches() {
    let (conn, mock) = connection();
    let board = Board::hydrated(conn, "b1", object(json!({"id": "b1", "name": "Ops"})));

    assert_eq!(board.name().unwrap().as_deref(), Some("Ops"));
    assert_eq!(board.raw("missing").unwrap(), Value::Null);
    assert_eq!(mock.call_count(), 0);
  }

  #[test]
  fn test_from_json_requires_id() {
    let (conn, _) = connection();
    let err = Card::from_json(conn.clone(), json!({"name": "no id"})).unwrap_err();
    assert!(matches!(err, Error::Decode { .. }));

    let err = Card::from_json(conn, json!("c1")).unwrap_err();
    assert!(matches!(err, Error::Decode { .. }));
  }

  #[test]
  fn test_display_prefers_name_without_fetching() {
    let (conn, mock) = connection();
    let lazy = conn.board("b1");
    let named = Board::hydrated(conn, "b2", object(json!({"id": "b2", "name": "Ops"})));

    assert_eq!(lazy.to_string(), "<Board: b1>");
    assert_eq!(named.to_string(), "<Board: Ops>");
    assert_eq!(mock.call_count(), 0);
  }

  #[test]
  fn test_instances_are_unique() {
    let (conn, _) = connection();
    let a = conn.card("c1");
    let b = conn.card("c1");
    assert_ne!(a.instance(), b.instance());
    assert!(a.same_instance(&a));
  }
}
