//! Trello object types and the capabilities each one supports.

use crate::entity::{
  Bool, Closable, Date, Deletable, Int, Labelable, Raw, Related, RelatedList, Text, WebHookable,
};
use crate::lazy_entity;

lazy_entity! {
  /// Something that happened: a comment, a card move, a rename...
  Action => "/actions/" {
    data: Raw,
    action_type: Text = "type",
    date: Date,
    creator: Related<Member> = "idMemberCreator",
  }
}

lazy_entity! {
  Board => "/boards/" {
    url: Text,
    name: Text,
    pinned: Bool,
    prefs: Raw,
    desc: Text,
    closed: Bool,
    organization: Related<Organization> = "idOrganization",
  }
  collections {
    actions: Action,
    cards: Card,
    checklists: Checklist,
    lists: List,
    members: Member,
  }
}

impl Closable for Board {}
impl WebHookable for Board {}

lazy_entity! {
  Card => "/cards/" {
    url: Text,
    closed: Bool,
    name: Text,
    badges: Raw,
    check_item_states: Raw = "checkItemStates",
    desc: Text,
    labels: Raw,
    board: Related<Board> = "idBoard",
    list: Related<List> = "idList",
    checklists: RelatedList<Checklist> = "idChecklists",
    members: RelatedList<Member> = "idMembers",
  }
  collections {
    stickers: Sticker,
    attachments: Attachment,
  }
}

impl Closable for Card {}
impl Deletable for Card {}
impl Labelable for Card {}

lazy_entity! {
  Checklist => "/checklists/" {
    name: Text,
    board: Related<Board> = "idBoard",
  }
  collections {
    check_items: CheckItem,
    cards: Card,
  }
}

lazy_entity! {
  /// One entry of a checklist.
  CheckItem => "/checkItems/" {
    name: Text,
    pos: Raw,
    item_type: Text = "type",
  }
}

lazy_entity! {
  /// A column on a board.
  List => "/lists/" {
    closed: Bool,
    name: Text,
    url: Text,
    board: Related<Board> = "idBoard",
  }
  collections {
    cards: Card,
  }
}

impl Closable for List {}

lazy_entity! {
  Sticker => "/stickers/" {
    image: Text,
    image_url: Text = "imageUrl",
  }
}

lazy_entity! {
  CustomSticker => "/customStickers/" {
    url: Text,
  }
}

lazy_entity! {
  WebHook => "/webhooks/" {
    active: Bool,
    callback_url: Text = "callbackURL",
    description: Text,
    id_model: Text = "idModel",
  }
}

impl Deletable for WebHook {}

lazy_entity! {
  /// A file attached to a card. Removed through `Card::detach`.
  Attachment => "/attachments/" {
    bytes: Int,
    date: Date,
    mime_type: Text = "mimeType",
    name: Text,
    url: Text,
    is_upload: Bool = "isUpload",
  }
}

lazy_entity! {
  Member => "/members/" {
    url: Text,
    full_name: Text = "fullName",
    username: Text,
  }
  collections {
    actions: Action,
    boards: Board,
    cards: Card,
    notifications: Notification,
    organizations: Organization,
    custom_stickers: CustomSticker,
  }
}

lazy_entity! {
  /// An API token; its id is the token string itself.
  Token => "/tokens/" {}
  collections {
    webhooks: WebHook,
  }
}

lazy_entity! {
  Notification => "/notifications/" {
    data: Raw,
    date: Date,
    notification_type: Text = "type",
    unread: Bool,
    creator: Related<Member> = "idMemberCreator",
  }
}

lazy_entity! {
  Organization => "/organizations/" {
    url: Text,
    desc: Text,
    display_name: Text = "displayName",
    name: Text,
  }
  collections {
    actions: Action,
    boards: Board,
    members: Member,
  }
}
