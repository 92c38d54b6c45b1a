//! Entities listed under an owner's sub-path, e.g. `/boards/<id>/cards/`.

use std::marker::PhantomData;
use std::rc::Rc;

use serde_json::Value;
use tracing::debug;

use super::{json_type, Entity};
use crate::error::{Error, Result};

/// Sub-collection of `T` reachable from an owner entity.
///
/// The fetched sequence is cached on the owner instance, keyed by target type,
/// so another instance for the same remote id fetches its own copy. Elements
/// are built from the listing itself and start hydrated.
pub struct SubCollection<T> {
  _target: PhantomData<fn() -> T>,
}

impl<T: Entity> SubCollection<T> {
  pub const fn new() -> Self {
    Self {
      _target: PhantomData,
    }
  }

  pub fn path<O: Entity>(&self, owner: &O) -> String {
    format!("{}{}", owner.path(), T::PREFIX)
  }

  pub fn get<O: Entity>(&self, owner: &O) -> Result<Rc<Vec<T>>> {
    let core = owner.core();
    if let Some(cached) = core.cached_collection::<T>() {
      return Ok(cached);
    }

    let path = self.path(owner);
    debug!(
      owner = O::KIND,
      id = owner.id(),
      instance = %owner.instance(),
      target = T::KIND,
      "Fetching sub-collection"
    );

    let items = match core.connection().get_json(&path)? {
      Value::Array(items) => items,
      other => {
        return Err(Error::decode(
          O::KIND,
          &path,
          format!("expected an array, got {}", json_type(&other)),
        ))
      }
    };

    let entities = items
      .into_iter()
      .map(|item| T::from_json(core.connection().clone(), item))
      .collect::<Result<Vec<T>>>()?;

    let entities = Rc::new(entities);
    core.store_collection(Rc::clone(&entities));
    Ok(entities)
  }
}

impl<T: Entity> Default for SubCollection<T> {
  fn default() -> Self {
    Self::new()
  }
}
