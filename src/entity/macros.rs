/// Declare an entity type: its path prefix, its field table and its
/// sub-collections.
///
/// Each field becomes an accessor returning the decoded value; the data key
/// defaults to the accessor name and can be given explicitly with `= "key"`.
/// Each sub-collection becomes an accessor returning the cached listing.
///
/// ```ignore
/// lazy_entity! {
///   /// A Trello list.
///   List => "/lists/" {
///     name: Text,
///     board: Related<Board> = "idBoard",
///   }
///   collections {
///     cards: Card,
///   }
/// }
/// ```
#[macro_export]
macro_rules! lazy_entity {
  (
    $(#[$meta:meta])*
    $name:ident => $prefix:literal {
      $(
        $(#[$fmeta:meta])*
        $field:ident : $kind:ty $(= $key:literal)?
      ),* $(,)?
    }
    $(
      collections {
        $(
          $(#[$cmeta:meta])*
          $coll:ident : $target:ty
        ),* $(,)?
      }
    )?
  ) => {
    $(#[$meta])*
    pub struct $name {
      core: $crate::entity::EntityCore,
    }

    impl $crate::entity::Entity for $name {
      const KIND: &'static str = stringify!($name);
      const PREFIX: &'static str = $prefix;
      const FIELDS: &'static [$crate::entity::FieldSpec] = &[
        $(
          $crate::entity::FieldSpec {
            name: stringify!($field),
            key: $crate::__field_key!($field $(, $key)?),
            kind: <$kind as $crate::entity::FieldKind>::NAME,
          },
        )*
      ];

      fn from_core(core: $crate::entity::EntityCore) -> Self {
        Self { core }
      }

      fn core(&self) -> &$crate::entity::EntityCore {
        &self.core
      }
    }

    impl $name {
      $(
        $(#[$fmeta])*
        pub fn $field(&self) -> $crate::Result<<$kind as $crate::entity::FieldKind>::Output> {
          const FIELD: $crate::entity::Field<$kind> =
            $crate::entity::Field::new($crate::__field_key!($field $(, $key)?));
          FIELD.get(self)
        }
      )*

      $($(
        $(#[$cmeta])*
        pub fn $coll(&self) -> $crate::Result<::std::rc::Rc<::std::vec::Vec<$target>>> {
          const COLLECTION: $crate::entity::SubCollection<$target> =
            $crate::entity::SubCollection::new();
          COLLECTION.get(self)
        }
      )*)?
    }

    impl ::std::fmt::Display for $name {
      fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
        self.core.fmt_label(f)
      }
    }

    impl ::std::fmt::Debug for $name {
      fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
        ::std::fmt::Debug::fmt(&self.core, f)
      }
    }
  };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __field_key {
  ($field:ident) => {
    stringify!($field)
  };
  ($field:ident, $key:literal) => {
    $key
  };
}
