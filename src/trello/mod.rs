//! The Trello resource graph: entity declarations and type-specific operations.

mod card;
mod kind;
mod list;
mod types;

pub use kind::{EntityKind, Snapshot};
pub use types::{
  Action, Attachment, Board, Card, CheckItem, Checklist, CustomSticker, List, Member,
  Notification, Organization, Sticker, Token, WebHook,
};
