//! Lazily-fetching client object model for the Trello REST API.
//!
//! Ask a [`Connection`] for an entity and you get a shell with no data. The
//! first field read fetches the object once and caches it; related-object
//! fields hand back further shells, and sub-collections are fetched and
//! cached per owning instance.
//!
//! ```no_run
//! use lazytrello::{Connection, Credentials, Entity};
//!
//! # fn main() -> lazytrello::Result<()> {
//! let conn = Connection::new(Credentials::new("api-key", "oauth-token"));
//! let card = conn.card("abc123");
//! println!("{}", card.name()?.unwrap_or_default()); // GET /cards/abc123
//! let board = card.board()?; // no request
//! for list in board.lists()?.iter() {
//!   println!("{}", list.name()?.unwrap_or_default());
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod connection;
pub mod entity;
pub mod error;
pub mod transport;
pub mod trello;

pub use config::{Config, Credentials};
pub use connection::Connection;
pub use entity::{Closable, Deletable, Entity, LabelColor, Labelable, WebHookable};
pub use error::{Error, Result};
pub use transport::{HttpMethod, HttpRequest, HttpResponse, RequestBody, ReqwestTransport, Transport};
pub use trello::*;
