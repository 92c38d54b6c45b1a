use serde_json::Value;
use tracing::debug;

use super::types::{Attachment, Card, Sticker};
use crate::entity::Entity;
use crate::error::Result;
use crate::transport::RequestBody;

impl Card {
  pub fn update_description(&self, text: &str) -> Result<()> {
    self.connection().put(self.path(), &[("desc", text)])?;
    Ok(())
  }

  /// Upload `bytes` as a new attachment called `name`.
  pub fn attach(&self, name: &str, bytes: Vec<u8>) -> Result<Attachment> {
    let path = format!("{}/attachments", self.path());
    debug!(card = self.id(), name, size = bytes.len(), "Uploading attachment");

    let body = RequestBody::File {
      filename: name.to_string(),
      bytes,
    };
    let data = self
      .connection()
      .post_json(&path, &[("name", name)], Some(body))?;
    Attachment::from_json(self.connection().clone(), data)
  }

  pub fn detach(&self, attachment: &Attachment) -> Result<()> {
    let path = format!("{}{}", self.path(), attachment.path());
    self.connection().delete(&path, &[])?;
    Ok(())
  }

  /// Use `attachment` as the card cover, or remove the cover with `None`.
  pub fn set_cover(&self, attachment: Option<&Attachment>) -> Result<()> {
    let path = format!("{}/idAttachmentCover", self.path());
    let value = attachment.map(|a| a.id()).unwrap_or("");
    self.connection().put(&path, &[("value", value)])?;
    Ok(())
  }

  /// Paste the sticker image `name` at `(left, top, z_index)`.
  pub fn paste_sticker(
    &self,
    name: &str,
    position: (f64, f64, i64),
    rotate: Option<f64>,
  ) -> Result<()> {
    let (x, y, z) = position;
    let (top, left, z_index) = (y.to_string(), x.to_string(), z.to_string());
    let rotate = rotate.map(|r| r.to_string());

    let mut params = vec![
      ("image", name),
      ("top", top.as_str()),
      ("left", left.as_str()),
      ("zIndex", z_index.as_str()),
    ];
    if let Some(rotate) = &rotate {
      params.push(("rotate", rotate.as_str()));
    }

    let path = format!("{}/stickers", self.path());
    self.connection().post(&path, &params, None)?;
    Ok(())
  }

  pub fn remove_sticker(&self, sticker: &Sticker) -> Result<()> {
    let path = format!("{}/stickers/{}", self.path(), sticker.id());
    self.connection().delete(&path, &[])?;
    Ok(())
  }

  /// Post a comment; returns the created comment action as sent by Trello.
  pub fn add_comment(&self, text: &str) -> Result<Value> {
    let path = format!("{}/actions/comments", self.path());
    self.connection().post_json(&path, &[("text", text)], None)
  }
}
