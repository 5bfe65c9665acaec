//! Resolved action identities.
//!
//! An [`ActionId`] starts out as raw ids from the simulation result and is
//! turned into a displayable identity with [`ActionId::fill`], which asks an
//! [`IdentityResolver`] for the name and icon.

mod error;
pub mod names;
mod registry;

use std::fmt;

use raidsim_types::{ActionIdProto, OtherAction};

pub use error::ResolveError;
pub use registry::{CachedResolver, IconData, IconRegistry, IdentityResolver};

use names::{PET_SPELLS, other_display, pet_icon, tagged_name};

/// Hashable grouping key for an [`ActionId`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActionKey {
    pub item_id: i32,
    pub spell_id: i32,
    pub other_id: OtherAction,
    pub random_suffix_id: i32,
    pub tag: i32,
}

#[derive(Debug, Clone, Default)]
pub struct ActionId {
    pub item_id: i32,
    pub spell_id: i32,
    pub other_id: OtherAction,
    pub tag: i32,
    pub rank: i32,
    pub random_suffix_id: i32,
    /// Name without any tag decoration.
    pub base_name: String,
    pub name: String,
    pub icon_url: String,
}

impl PartialEq for ActionId {
    fn eq(&self, other: &Self) -> bool {
        self.equals_ignoring_tag(other) && self.tag == other.tag
    }
}

impl Eq for ActionId {}

impl ActionId {
    #[allow(clippy::too_many_arguments)]
    fn new(
        item_id: i32,
        spell_id: i32,
        other_id: OtherAction,
        tag: i32,
        base_name: String,
        name: String,
        icon_url: String,
        rank: i32,
    ) -> Self {
        let mut id = Self {
            item_id,
            spell_id,
            other_id,
            tag,
            rank,
            random_suffix_id: 0,
            base_name,
            name,
            icon_url,
        };

        if !other_id.is_none() {
            let display = other_display(other_id, tag);
            if let Some(base) = display.base_name {
                id.base_name = base.to_string();
            }
            if let Some(name) = display.name {
                id.name = name;
            }
            if let Some(icon) = display.icon_url {
                id.icon_url = icon;
            }
        }

        if id.name.is_empty() {
            id.name = id.base_name.clone();
        }
        if !id.name.is_empty() && id.rank != 0 {
            id.name.push_str(&format!(" (Rank {})", id.rank));
        }
        id
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_spell_id(spell_id: i32, rank: i32, tag: i32) -> Self {
        Self::new(
            0,
            spell_id,
            OtherAction::None,
            tag,
            String::new(),
            String::new(),
            String::new(),
            rank,
        )
    }

    pub fn from_item_id(item_id: i32, tag: i32, random_suffix_id: i32) -> Self {
        let mut id = Self::new(
            item_id,
            0,
            OtherAction::None,
            tag,
            String::new(),
            String::new(),
            String::new(),
            0,
        );
        id.random_suffix_id = random_suffix_id;
        id
    }

    pub fn from_other_id(other_id: OtherAction, tag: i32) -> Self {
        Self::new(
            0,
            0,
            other_id,
            tag,
            String::new(),
            String::new(),
            String::new(),
            0,
        )
    }

    /// Identity shown for a pet: a summoning spell when one is known,
    /// otherwise a pet action named after the pet.
    pub fn from_pet_name(pet_name: &str) -> Self {
        if let Some(&spell_id) = PET_SPELLS.get(pet_name) {
            return Self::from_spell_id(spell_id, 0, 0);
        }
        Self::new(
            0,
            0,
            OtherAction::Pet,
            0,
            pet_name.to_string(),
            pet_name.to_string(),
            pet_icon(pet_name).unwrap_or_default(),
            0,
        )
    }

    pub fn from_proto(proto: &ActionIdProto) -> Self {
        if proto.spell_id != 0 {
            Self::from_spell_id(proto.spell_id, proto.rank, proto.tag)
        } else if proto.item_id != 0 {
            Self::from_item_id(proto.item_id, proto.tag, proto.random_suffix_id)
        } else if !proto.other_id.is_none() {
            Self::from_other_id(proto.other_id, proto.tag)
        } else {
            Self::empty()
        }
    }

    pub fn to_proto(&self) -> ActionIdProto {
        let mut proto = ActionIdProto {
            tag: self.tag,
            ..Default::default()
        };
        if self.item_id != 0 {
            proto.item_id = self.item_id;
            proto.random_suffix_id = self.random_suffix_id;
        } else if self.spell_id != 0 {
            proto.spell_id = self.spell_id;
            proto.rank = self.rank;
        } else {
            proto.other_id = self.other_id;
        }
        proto
    }

    /// Parses the first `{SpellID: n}`, `{ItemID: n}` or `{OtherID: n}` token
    /// in log text. An optional `, Tag: t` follows the id.
    pub fn from_log_string(text: &str) -> Self {
        match find_log_token(text) {
            Some((id, _)) => id,
            None => {
                tracing::trace!(text, "No action id token in log text");
                Self::empty()
            }
        }
    }

    /// Replaces every id token in `text` with the resolved display name.
    pub async fn replace_all_in_string(
        text: &str,
        resolver: &dyn IdentityResolver,
    ) -> Result<String, ResolveError> {
        let mut out = String::with_capacity(text.len());
        let mut rest = text;
        while let Some((id, range)) = find_log_token(rest) {
            out.push_str(&rest[..range.start]);
            let filled = id.fill(resolver, None).await?;
            out.push_str(&filled.name);
            rest = &rest[range.end..];
        }
        out.push_str(rest);
        Ok(out)
    }

    pub fn is_empty(&self) -> bool {
        self.item_id == 0 && self.spell_id == 0 && self.other_id.is_none()
    }

    pub fn any_id(&self) -> i32 {
        if self.item_id != 0 {
            self.item_id
        } else if self.spell_id != 0 {
            self.spell_id
        } else {
            self.other_id.as_raw()
        }
    }

    pub fn equals_ignoring_tag(&self, other: &Self) -> bool {
        self.item_id == other.item_id
            && self.random_suffix_id == other.random_suffix_id
            && self.spell_id == other.spell_id
            && self.other_id == other.other_id
    }

    pub fn key(&self) -> ActionKey {
        ActionKey {
            item_id: self.item_id,
            spell_id: self.spell_id,
            other_id: self.other_id,
            random_suffix_id: self.random_suffix_id,
            tag: self.tag,
        }
    }

    pub fn key_ignoring_tag(&self) -> ActionKey {
        ActionKey {
            tag: 0,
            ..self.key()
        }
    }

    pub fn without_tag(&self) -> Self {
        let mut name = self.base_name.clone();
        if !name.is_empty() && self.rank != 0 {
            name.push_str(&format!(" (Rank {})", self.rank));
        }
        Self {
            tag: 0,
            name,
            ..self.clone()
        }
    }

    /// Resolves name and icon through `resolver`.
    ///
    /// Identities that already carry a name or icon (including every
    /// other-action) are returned unchanged. `player_index` is the raid index
    /// of the owning unit, used to label self-cast buffs.
    pub async fn fill(
        &self,
        resolver: &dyn IdentityResolver,
        player_index: Option<i32>,
    ) -> Result<Self, ResolveError> {
        if !self.name.is_empty() || !self.icon_url.is_empty() || !self.other_id.is_none() {
            return Ok(self.clone());
        }

        let data = if self.item_id != 0 {
            resolver.item_data(self.item_id).await?
        } else if self.spell_id != 0 {
            resolver.spell_data(self.spell_id).await?
        } else {
            return Err(ResolveError::EmptyActionId);
        };

        let name = tagged_name(&data.name, self.spell_id, self.tag, player_index);
        let icon_url = if data.icon.is_empty() {
            String::new()
        } else {
            format!("{}{}.jpg", resolver.icon_base_url(), data.icon)
        };
        let rank = if self.rank != 0 { self.rank } else { data.rank };

        let mut filled = Self::new(
            self.item_id,
            self.spell_id,
            self.other_id,
            self.tag,
            data.name,
            name,
            icon_url,
            rank,
        );
        filled.random_suffix_id = self.random_suffix_id;
        Ok(filled)
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.item_id != 0 {
            write!(f, "item-{}", self.item_id)?;
        } else if self.spell_id != 0 {
            write!(f, "spell-{}", self.spell_id)?;
        } else if !self.other_id.is_none() {
            write!(f, "other-{}", self.other_id.as_raw())?;
        } else {
            write!(f, "empty")?;
        }
        if self.tag != 0 {
            write!(f, "-{}", self.tag)?;
        }
        Ok(())
    }
}

/// Finds the first id token and the byte range it occupies.
fn find_log_token(text: &str) -> Option<(ActionId, std::ops::Range<usize>)> {
    let mut search_from = 0;
    while let Some(offset) = text[search_from..].find('{') {
        let start = search_from + offset;
        if let Some((id, len)) = parse_token_at(&text[start..]) {
            return Some((id, start..start + len));
        }
        search_from = start + 1;
    }
    None
}

/// Parses `{Kind: n[, Tag: t]}` at the start of `text`, returning the id and
/// the token length.
fn parse_token_at(text: &str) -> Option<(ActionId, usize)> {
    let end = text.find('}')?;
    let body = &text[1..end];
    let (kind, rest) = body.split_once(": ")?;
    let (raw_id, tag) = match rest.split_once(", Tag: ") {
        Some((id, tag)) => (id, tag.parse::<i32>().ok()?),
        None => (rest, 0),
    };
    if raw_id.is_empty() || !raw_id.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let id: i32 = raw_id.parse().ok()?;

    let action = match kind {
        "SpellID" => ActionId::from_spell_id(id, 0, tag),
        "ItemID" => ActionId::from_item_id(id, tag, 0),
        "OtherID" => ActionId::from_other_id(OtherAction::from_raw(id), tag),
        _ => return None,
    };
    Some((action, end + 1))
}
