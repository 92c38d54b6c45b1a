//! Optional remote operations shared by several entity types.
//!
//! Each capability is written once against `Entity` and opted into per type
//! with an empty `impl`.

use std::fmt;
use std::str::FromStr;

use super::Entity;
use crate::error::{Error, Result};
use crate::trello::WebHook;

/// Types that can be archived with `PUT <path>/closed`.
pub trait Closable: Entity {
  /// Close (archive) the remote object. Local state is untouched.
  fn close(&self) -> Result<()> {
    let path = format!("{}/closed", self.path());
    self.connection().put(&path, &[("value", "true")])?;
    Ok(())
  }
}

/// Types that can be deleted with `DELETE <path>`.
pub trait Deletable: Entity {
  fn delete(&self) -> Result<()> {
    self.connection().delete(self.path(), &[])?;
    Ok(())
  }
}

/// Types that webhooks can watch.
pub trait WebHookable: Entity {
  /// Register a webhook that calls `callback_url` on events for this object.
  fn add_webhook(&self, callback_url: &str) -> Result<WebHook> {
    let data = self.connection().post_json(
      WebHook::PREFIX,
      &[("idModel", self.id()), ("callbackURL", callback_url)],
      None,
    )?;
    WebHook::from_json(self.connection().clone(), data)
  }
}

/// Label colours accepted by `Labelable`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LabelColor {
  Green,
  Yellow,
  Orange,
  Red,
  Purple,
  Blue,
}

impl LabelColor {
  pub const ALL: [LabelColor; 6] = [
    Self::Green,
    Self::Yellow,
    Self::Orange,
    Self::Red,
    Self::Purple,
    Self::Blue,
  ];

  pub fn as_str(self) -> &'static str {
    match self {
      Self::Green => "green",
      Self::Yellow => "yellow",
      Self::Orange => "orange",
      Self::Red => "red",
      Self::Purple => "purple",
      Self::Blue => "blue",
    }
  }
}

impl FromStr for LabelColor {
  type Err = Error;

  /// Case-insensitive.
  fn from_str(s: &str) -> Result<Self> {
    let lower = s.to_lowercase();
    Self::ALL
      .into_iter()
      .find(|c| c.as_str() == lower)
      .ok_or_else(|| Error::InvalidArgument(format!("invalid label color '{}'", s)))
  }
}

impl fmt::Display for LabelColor {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Types carrying coloured labels.
pub trait Labelable: Entity {
  fn set_label(&self, color: &str) -> Result<()> {
    let color: LabelColor = color.parse()?;
    let path = format!("{}/labels", self.path());
    self.connection().post(&path, &[("value", color.as_str())], None)?;
    Ok(())
  }

  fn clear_label(&self, color: &str) -> Result<()> {
    let color: LabelColor = color.parse()?;
    let path = format!("{}/labels/{}", self.path(), color);
    self.connection().delete(&path, &[])?;
    Ok(())
  }
}
