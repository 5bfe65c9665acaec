use crate::action_id::ActionId;
use raidsim_types::ResourceType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EntityKind {
    #[default]
    Player,
    Pet,
    Target,
}

/// A unit referenced by a log line.
///
/// `index` is the raid index for players and pets (a pet carries its
/// owner's index) and the encounter index for targets.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Entity {
    pub name: String,
    pub owner_name: Option<String>,
    pub index: i32,
    pub kind: EntityKind,
}

impl Entity {
    pub fn is_target(&self) -> bool {
        self.kind == EntityKind::Target
    }

    pub fn is_pet(&self) -> bool {
        self.kind == EntityKind::Pet
    }

    /// Parses `Target <n>`, `<Name> (#<n>)` or `<Owner> (#<n>) - <Pet>`.
    /// Players whose name starts with "Target " still parse as players.
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        let target_number = label
            .strip_prefix("Target ")
            .filter(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()));
        if let Some(n) = target_number {
            let n: i32 = n.parse().ok()?;
            return Some(Self {
                name: label.to_string(),
                owner_name: None,
                index: n - 1,
                kind: EntityKind::Target,
            });
        }

        let open = label.find(" (#")?;
        let close = open + label[open..].find(')')?;
        let n: i32 = label[open + 3..close].parse().ok()?;
        let name = &label[..open];
        let after = label[close + 1..].trim_start();

        match after.strip_prefix("- ") {
            Some(pet_name) => Some(Self {
                name: pet_name.trim().to_string(),
                owner_name: Some(name.to_string()),
                index: n - 1,
                kind: EntityKind::Pet,
            }),
            None if after.is_empty() => Some(Self {
                name: name.to_string(),
                owner_name: None,
                index: n - 1,
                kind: EntityKind::Player,
            }),
            None => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    Hit,
    Crit,
    Miss,
    Dodge,
    Parry,
    Block,
    BlockedCrit,
    Glance,
    Crush,
}

impl HitOutcome {
    pub fn from_word(word: &str) -> Option<Self> {
        Some(match word {
            "Hit" => Self::Hit,
            "Crit" => Self::Crit,
            "Miss" => Self::Miss,
            "Dodge" => Self::Dodge,
            "Parry" => Self::Parry,
            "Block" => Self::Block,
            "BlockedCrit" => Self::BlockedCrit,
            "Glance" => Self::Glance,
            "Crush" => Self::Crush,
            _ => return None,
        })
    }

    pub fn is_crit(&self) -> bool {
        matches!(self, Self::Crit | Self::BlockedCrit)
    }

    pub fn landed(&self) -> bool {
        !matches!(self, Self::Miss | Self::Dodge | Self::Parry)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LogKind {
    CastBegan {
        action_id: ActionId,
        cost: f64,
        cast_time: f64,
        effective_time: f64,
    },
    CastCompleted {
        action_id: ActionId,
    },
    DamageDealt {
        action_id: ActionId,
        outcome: HitOutcome,
        is_tick: bool,
        amount: f64,
        threat: f64,
    },
    AuraGained {
        action_id: ActionId,
    },
    AuraFaded {
        action_id: ActionId,
    },
    ResourceChanged {
        action_id: ActionId,
        resource_type: ResourceType,
        is_spend: bool,
        amount: f64,
        value_before: f64,
        value_after: f64,
    },
    MajorCooldownUsed {
        action_id: ActionId,
    },
    Other,
}

/// One parsed line of the first-iteration event log.
#[derive(Debug, Clone, PartialEq)]
pub struct SimLog {
    pub line_number: u64,
    /// Seconds since the start of the iteration.
    pub timestamp: f64,
    pub source: Option<Entity>,
    pub target: Option<Entity>,
    pub kind: LogKind,
    pub raw: String,
}

impl SimLog {
    pub fn action_id(&self) -> Option<&ActionId> {
        match &self.kind {
            LogKind::CastBegan { action_id, .. }
            | LogKind::CastCompleted { action_id }
            | LogKind::DamageDealt { action_id, .. }
            | LogKind::AuraGained { action_id }
            | LogKind::AuraFaded { action_id }
            | LogKind::ResourceChanged { action_id, .. }
            | LogKind::MajorCooldownUsed { action_id } => Some(action_id),
            LogKind::Other => None,
        }
    }

    pub fn is_damage_dealt(&self) -> bool {
        matches!(self.kind, LogKind::DamageDealt { .. })
    }

    pub fn is_major_cooldown_used(&self) -> bool {
        matches!(self.kind, LogKind::MajorCooldownUsed { .. })
    }

    pub fn is_resource_changed(&self) -> bool {
        matches!(self.kind, LogKind::ResourceChanged { .. })
    }

    /// Damage dealt by this line, zero for non-damage lines.
    pub fn damage(&self) -> f64 {
        match self.kind {
            LogKind::DamageDealt { amount, .. } => amount,
            _ => 0.0,
        }
    }

    /// Threat generated by this line, zero for non-damage lines.
    pub fn threat(&self) -> f64 {
        match self.kind {
            LogKind::DamageDealt { threat, .. } => threat,
            _ => 0.0,
        }
    }

    /// Whether this line was emitted by the given player (or one of its pets
    /// when `pet_name` is set).
    pub fn is_from_player(&self, raid_index: i32, pet_name: Option<&str>) -> bool {
        let Some(source) = &self.source else {
            return false;
        };
        if source.is_target() {
            return false;
        }
        match pet_name {
            Some(name) => source.is_pet() && source.index == raid_index && source.name == name,
            None => !source.is_pet() && source.index == raid_index,
        }
    }

    pub fn is_from_pet_of(&self, raid_index: i32) -> bool {
        self.source
            .as_ref()
            .is_some_and(|s| s.is_pet() && s.index == raid_index)
    }

    pub fn is_from_target(&self, index: i32) -> bool {
        self.source
            .as_ref()
            .is_some_and(|s| s.is_target() && s.index == index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_parse_by_kind() {
        let target = Entity::from_label("Target 2").unwrap();
        assert_eq!(target.kind, EntityKind::Target);
        assert_eq!(target.index, 1);

        let player = Entity::from_label("Alice (#3)").unwrap();
        assert_eq!(player.kind, EntityKind::Player);
        assert_eq!(player.name, "Alice");
        assert_eq!(player.index, 2);

        let pet = Entity::from_label("Alice (#3) - Cat").unwrap();
        assert_eq!(pet.kind, EntityKind::Pet);
        assert_eq!(pet.name, "Cat");
        assert_eq!(pet.owner_name.as_deref(), Some("Alice"));
        assert_eq!(pet.index, 2);

        assert!(Entity::from_label("Nobody").is_none());
        assert!(Entity::from_label("Target x").is_none());
    }

    #[test]
    fn players_named_like_targets_stay_players() {
        let player = Entity::from_label("Target Dummy (#1)").unwrap();
        assert_eq!(player.kind, EntityKind::Player);
        assert_eq!(player.name, "Target Dummy");
        assert_eq!(player.index, 0);

        let pet = Entity::from_label("Target 2 (#4) - Wolf").unwrap();
        assert_eq!(pet.kind, EntityKind::Pet);
        assert_eq!(pet.owner_name.as_deref(), Some("Target 2"));
        assert_eq!(pet.index, 3);

        assert!(Entity::from_label("Target -1").is_none());
    }
}
