//! Walks the resource graph through the public API with a scripted transport,
//! counting the requests each step costs.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use lazytrello::{
  Connection, Credentials, Entity, Error, HttpMethod, HttpRequest, HttpResponse, Labelable,
  Transport,
};

/// Serves fixed bodies by path and records every request.
#[derive(Clone, Default)]
struct Scripted {
  routes: Arc<Mutex<HashMap<String, (u16, String)>>>,
  log: Arc<Mutex<Vec<(HttpMethod, String)>>>,
}

impl Scripted {
  fn route(&self, path: &str, status: u16, body: &str) {
    self
      .routes
      .lock()
      .unwrap()
      .insert(path.to_string(), (status, body.to_string()));
  }

  fn requests(&self) -> Vec<(HttpMethod, String)> {
    self.log.lock().unwrap().clone()
  }
}

impl Transport for Scripted {
  fn send(&self, request: HttpRequest) -> lazytrello::Result<HttpResponse> {
    let path = request
      .url
      .path()
      .strip_prefix("/1")
      .unwrap_or(request.url.path())
      .to_string();
    self.log.lock().unwrap().push((request.method, path.clone()));

    let (status, body) = self
      .routes
      .lock()
      .unwrap()
      .get(&path)
      .cloned()
      .unwrap_or((404, "not found".to_string()));
    Ok(HttpResponse {
      status,
      body: body.into_bytes(),
    })
  }
}

fn connect() -> (Connection, Scripted) {
  let transport = Scripted::default();
  let conn = Connection::with_base_url(
    Credentials::new("app-key", "user-token"),
    transport.clone(),
    "https://trello.test/1",
  );
  (conn, transport)
}

#[test]
fn card_to_board_walk() {
  let (conn, transport) = connect();
  transport.route(
    "/cards/abc123",
    200,
    r#"{"id":"abc123","name":"Demo","idBoard":"b1"}"#,
  );
  transport.route("/boards/b1", 200, r#"{"id":"b1","name":"Roadmap","closed":false}"#);

  let card = conn.card("abc123");
  assert!(transport.requests().is_empty());

  assert_eq!(card.name().unwrap().as_deref(), Some("Demo"));
  assert_eq!(
    transport.requests(),
    vec![(HttpMethod::Get, "/cards/abc123".to_string())]
  );

  let board = card.board().unwrap();
  assert_eq!(board.id(), "b1");
  assert!(!board.is_hydrated());
  assert_eq!(transport.requests().len(), 1);

  assert_eq!(board.name().unwrap().as_deref(), Some("Roadmap"));
  assert!(!board.closed().unwrap());
  assert_eq!(transport.requests().len(), 2);
  assert_eq!(board.to_string(), "<Board: Roadmap>");
}

#[test]
fn board_listing_hydrates_children() {
  let (conn, transport) = connect();
  transport.route(
    "/boards/b1/lists/",
    200,
    r#"[{"id":"l1","name":"Todo","idBoard":"b1"},{"id":"l2","name":"Done","idBoard":"b1"}]"#,
  );

  let board = conn.board("b1");
  let names: Vec<String> = board
    .lists()
    .unwrap()
    .iter()
    .map(|list| list.name().unwrap().unwrap_or_default())
    .collect();
  assert_eq!(names, ["Todo", "Done"]);

  board.lists().unwrap();
  assert_eq!(transport.requests().len(), 1);
}

#[test]
fn remote_failure_leaves_entity_retryable() {
  let (conn, transport) = connect();
  let member = conn.me();

  let err = member.username().unwrap_err();
  assert!(matches!(err, Error::Remote { status: 404, .. }));
  assert!(!member.is_hydrated());

  transport.route("/members/me", 200, r#"{"id":"m1","username":"ada"}"#);
  assert_eq!(member.username().unwrap().as_deref(), Some("ada"));
  assert_eq!(transport.requests().len(), 2);
}

#[test]
fn invalid_label_never_reaches_transport() {
  let (conn, transport) = connect();
  let card = conn.card("c1");

  assert!(matches!(card.set_label("teal"), Err(Error::InvalidArgument(_))));
  assert!(transport.requests().is_empty());

  transport.route("/cards/c1/labels", 200, "[]");
  card.set_label("Blue").unwrap();
  assert_eq!(
    transport.requests(),
    vec![(HttpMethod::Post, "/cards/c1/labels".to_string())]
  );
}
