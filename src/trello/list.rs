use tracing::debug;

use super::types::{Card, List};
use crate::entity::Entity;
use crate::error::Result;

impl List {
  /// Create a card at the bottom of this list. The returned card is hydrated
  /// from the creation response.
  pub fn add_card(&self, name: &str, desc: Option<&str>) -> Result<Card> {
    let path = format!("{}/cards", self.path());
    let mut params = vec![("name", name), ("idList", self.id())];
    if let Some(desc) = desc {
      params.push(("desc", desc));
    }

    debug!(list = self.id(), name, "Creating card");
    let data = self.connection().post_json(&path, &params, None)?;
    Card::from_json(self.connection().clone(), data)
  }
}
