//! Static naming tables for action identities.
//!
//! The simulation reports tagged ids (e.g. a main-hand vs off-hand strike of
//! the same spell). Tags carry no name of their own, so display names are
//! decorated here based on the resolved base name.

use phf::phf_map;
use raidsim_types::{OtherAction, ResourceType};

const ICON_HOST: &str = "https://wow.zamimg.com/images/wow/icons";

/// How a tag decorates the base name of a spell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagRule {
    /// Tags are meaningful but shown without a suffix.
    Silent,
    /// 1 = Main-Hand, 2 = Off-Hand
    MainOffHand,
    /// 1 = Main-Hand, 2 = Off-Hand, 3 = Queue
    MainOffHandQueue,
    /// 1 = DoT
    DotOnOne,
    /// 0 = DoT, 1 = Explosion
    DotThenExplosion,
    /// n = n Tick
    ChannelTicks,
    /// 1 = No Stacks, 2 = 1 Stack, n = n-1 Stacks
    Stacks,
    /// n = n CP
    ComboPoints,
    /// 1 = Shiv, 2 = Deadly Brew, 100 = Tick
    Poison,
    /// 100 = Tick
    TickOnHundred,
    /// 11 = OL, n = n MSW
    Overload,
    /// 1 = Proc
    Proc,
    /// 1 = Queue
    Queue,
    /// 1 = Snapshot
    Snapshot,
    /// 1 = Application, 2 = DoT
    ApplicationThenDot,
    /// 1 = Tick, 2 = Splash
    TickThenSplash,
    /// Tag is the raid index of the caster, -1 for raid-wide
    TargetedBuff,
    /// Tag equal to the viewing player marks a self-cast
    SelfOnPlayer,
    /// 1 = Heal
    Heal,
    /// 2 = Debuff
    Debuff,
    /// 1 = Melee, 2 = Spell
    MeleeOrSpell,
    /// 1 = Main, 2 = Bounce
    MainOrBounce,
    /// 1 = Weaving
    Weaving,
    /// 1 = External
    External,
    /// 1 = 1H, 2 = 2H
    OneOrTwoHand,
    /// n = n*5%
    Percent,
}

pub static TAG_RULES: phf::Map<&'static str, TagRule> = phf_map! {
    "Arcane Blast" => TagRule::Stacks,
    "Arcane Missiles" => TagRule::Silent,
    "Balefire Bolt" => TagRule::Silent,
    "Berserking" => TagRule::Percent,
    "Explosive Trap" => TagRule::Weaving,
    "Living Bomb" => TagRule::DotThenExplosion,
    "Seed of Corruption" => TagRule::DotThenExplosion,
    "Fireball" => TagRule::DotOnOne,
    "Frostfire Bolt" => TagRule::DotOnOne,
    "Pyroblast" => TagRule::DotOnOne,
    "Flame Shock" => TagRule::DotOnOne,
    "Evocation" => TagRule::ChannelTicks,
    "Mind Flay" => TagRule::ChannelTicks,
    "Mind Sear" => TagRule::ChannelTicks,
    "Shattering Throw" => TagRule::SelfOnPlayer,
    "Envenom" => TagRule::ComboPoints,
    "Eviscerate" => TagRule::ComboPoints,
    "Expose Armor" => TagRule::ComboPoints,
    "Rupture" => TagRule::ComboPoints,
    "Slice and Dice" => TagRule::ComboPoints,
    "Deadly Poison" => TagRule::Poison,
    "Deadly Poison II" => TagRule::Poison,
    "Deadly Poison III" => TagRule::Poison,
    "Deadly Poison IV" => TagRule::Poison,
    "Deadly Poison V" => TagRule::Poison,
    "Instant Poison" => TagRule::Poison,
    "Instant Poison II" => TagRule::Poison,
    "Instant Poison III" => TagRule::Poison,
    "Instant Poison IV" => TagRule::Poison,
    "Instant Poison V" => TagRule::Poison,
    "Instant Poison VI" => TagRule::Poison,
    "Wound Poison" => TagRule::Poison,
    "Occult Poison II" => TagRule::Poison,
    "Saber Slash" => TagRule::TickOnHundred,
    "Mutilate" => TagRule::MainOffHand,
    "Stormstrike" => TagRule::MainOffHand,
    "Carve" => TagRule::MainOffHand,
    "Whirlwind" => TagRule::MainOffHand,
    "Slam" => TagRule::MainOffHand,
    "Windfury Weapon" => TagRule::MainOffHand,
    "Holy Strength" => TagRule::MainOffHand,
    "Raptor Strike" => TagRule::MainOffHandQueue,
    "Lightning Bolt" => TagRule::Overload,
    "Chain Lightning" => TagRule::Overload,
    "Lava Burst" => TagRule::Overload,
    "Healing Wave" => TagRule::Overload,
    "Lesser Healing Wave" => TagRule::Overload,
    "Chain Heal" => TagRule::Overload,
    "Holy Shield" => TagRule::Proc,
    "Righteous Vengeance" => TagRule::ApplicationThenDot,
    "Holy Vengeance" => TagRule::ApplicationThenDot,
    "Bloodlust" => TagRule::TargetedBuff,
    "Ferocious Inspiration" => TagRule::TargetedBuff,
    "Innervate" => TagRule::TargetedBuff,
    "Focus Magic" => TagRule::TargetedBuff,
    "Mana Tide Totem" => TagRule::TargetedBuff,
    "Power Infusion" => TagRule::TargetedBuff,
    "Darkmoon Card: Crusade" => TagRule::MeleeOrSpell,
    "Battle Shout" => TagRule::Snapshot,
    "Heroic Strike" => TagRule::Queue,
    "Cleave" => TagRule::Queue,
    "Maul" => TagRule::Queue,
    "Thunderfury" => TagRule::MainOrBounce,
    "Starfall" => TagRule::TickThenSplash,
    "Vampiric Touch" => TagRule::External,
    "Totem of Raging Fire" => TagRule::OneOrTwoHand,
    "Drain Life" => TagRule::Heal,
    "Death Coil" => TagRule::Heal,
    "Blood Plague" => TagRule::Debuff,
    "Frost Fever" => TagRule::Debuff,
};

/// Names that differ by spell id rather than by tag.
static SPELL_VARIANTS: phf::Map<i32, &'static str> = phf_map! {
    13048i32 => "Talent",
    14201i32 => "Fresh Meat",
    425415i32 => "Consumed by Rage",
    427066i32 => "Wrecking Crew",
    414689i32 => "Cat",
    409828i32 => "Cat",
    411128i32 => "Cat",
};

/// Decorates a resolved base name with its tag.
///
/// `player_index` is the raid index of the unit the id belongs to, used for
/// buffs whose tag names the caster.
pub fn tagged_name(base_name: &str, spell_id: i32, tag: i32, player_index: Option<i32>) -> String {
    let mut name = base_name.to_string();

    match base_name {
        "Enrage" | "Sunfire" => {
            if let Some(variant) = SPELL_VARIANTS.get(&spell_id) {
                name.push_str(&format!(" ({variant})"));
            }
            return name;
        }
        "Mangle" | "Swipe" => {
            let form = SPELL_VARIANTS.get(&spell_id).copied().unwrap_or("Bear");
            name.push_str(&format!(" ({form})"));
            return name;
        }
        "Hot Streak" => {
            if tag != 0 {
                return "Heating Up".to_string();
            }
            return name;
        }
        "Mind Spike" => {
            if tag == 1 {
                name.push_str(" (2pT2.5)");
            }
            return name;
        }
        "Kill Shot" => {
            if tag == 1 {
                name.push_str(" (Rapid Fire)");
            }
            return name;
        }
        _ => {}
    }

    let Some(rule) = TAG_RULES.get(base_name) else {
        if tag != 0 {
            name.push_str(" (??)");
        }
        return name;
    };

    let suffix = match (rule, tag) {
        (TagRule::Silent, _) => None,
        (TagRule::MainOffHand | TagRule::MainOffHandQueue, 1) => Some("Main-Hand".to_string()),
        (TagRule::MainOffHand | TagRule::MainOffHandQueue, 2) => Some("Off-Hand".to_string()),
        (TagRule::MainOffHandQueue, 3) | (TagRule::Queue, 1) => Some("Queue".to_string()),
        (TagRule::DotOnOne, 1) => Some("DoT".to_string()),
        (TagRule::DotThenExplosion, 0) => Some("DoT".to_string()),
        (TagRule::DotThenExplosion, 1) => Some("Explosion".to_string()),
        (TagRule::ChannelTicks, t) if t > 0 => Some(format!("{t} Tick")),
        (TagRule::Stacks, 1) => Some("No Stacks".to_string()),
        (TagRule::Stacks, 2) => Some("1 Stack".to_string()),
        (TagRule::Stacks, t) if t > 2 => Some(format!("{} Stacks", t - 1)),
        (TagRule::ComboPoints, t) if t != 0 => Some(format!("{t} CP")),
        (TagRule::Poison, 1) => Some("Shiv".to_string()),
        (TagRule::Poison, 2) => Some("Deadly Brew".to_string()),
        (TagRule::Poison | TagRule::TickOnHundred, 100) => Some("Tick".to_string()),
        (TagRule::Overload, 11) => return format!("{name} OL"),
        (TagRule::Overload, t) if t != 0 => Some(format!("{t} MSW")),
        (TagRule::Proc, 1) => Some("Proc".to_string()),
        (TagRule::Snapshot, 1) => Some("Snapshot".to_string()),
        (TagRule::ApplicationThenDot, 1) => Some("Application".to_string()),
        (TagRule::ApplicationThenDot, 2) => Some("DoT".to_string()),
        (TagRule::TickThenSplash, 1) => Some("Tick".to_string()),
        (TagRule::TickThenSplash, 2) => Some("Splash".to_string()),
        (TagRule::TargetedBuff, -1) => Some("raid".to_string()),
        (TagRule::TargetedBuff, t) => {
            if player_index.is_none() || player_index == Some(t) {
                Some("self".to_string())
            } else {
                Some(format!("from #{}", t + 1))
            }
        }
        (TagRule::SelfOnPlayer, t) if player_index == Some(t) => Some("self".to_string()),
        (TagRule::Heal, 1) => Some("Heal".to_string()),
        (TagRule::Debuff, 2) => Some("Debuff".to_string()),
        (TagRule::MeleeOrSpell, 1) => Some("Melee".to_string()),
        (TagRule::MeleeOrSpell, 2) => Some("Spell".to_string()),
        (TagRule::MainOrBounce, 1) => Some("Main".to_string()),
        (TagRule::MainOrBounce, 2) => Some("Bounce".to_string()),
        (TagRule::Weaving, 1) => Some("Weaving".to_string()),
        (TagRule::External, 1) => Some("External".to_string()),
        (TagRule::OneOrTwoHand, 1) => Some("1H".to_string()),
        (TagRule::OneOrTwoHand, 2) => Some("2H".to_string()),
        (TagRule::Percent, t) if t != 0 => Some(format!("{}%", t * 5)),
        _ => None,
    };

    if let Some(suffix) = suffix {
        name.push_str(&format!(" ({suffix})"));
    }
    name
}

/// Fixed presentation for non-spell identities.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OtherDisplay {
    pub base_name: Option<&'static str>,
    /// Full tag-decorated name, when it differs from the base name.
    pub name: Option<String>,
    pub icon_url: Option<String>,
}

pub fn large_icon(label: &str) -> String {
    format!("{ICON_HOST}/large/{label}.jpg")
}

fn medium_icon(label: &str) -> String {
    format!("{ICON_HOST}/medium/{label}.jpg")
}

pub fn resource_icon(resource: ResourceType) -> String {
    match resource {
        ResourceType::None => String::new(),
        ResourceType::Health => medium_icon("inv_elemental_mote_life01"),
        ResourceType::Mana => medium_icon("inv_elemental_mote_mana"),
        ResourceType::Energy => medium_icon("spell_shadow_shadowworddominate"),
        ResourceType::Rage => medium_icon("spell_misc_emotionangry"),
        ResourceType::ComboPoints => medium_icon("inv_mace_2h_pvp410_c_01"),
        ResourceType::Focus => medium_icon("ability_hunter_focusfire"),
    }
}

pub fn other_display(other: OtherAction, tag: i32) -> OtherDisplay {
    let base = |name: &'static str, icon: String| OtherDisplay {
        base_name: Some(name),
        name: None,
        icon_url: Some(icon),
    };
    let named = |base_name: &'static str, name: String, icon: String| OtherDisplay {
        base_name: Some(base_name),
        name: Some(name),
        icon_url: Some(icon),
    };

    match other {
        OtherAction::None | OtherAction::Pet => OtherDisplay::default(),
        OtherAction::Wait => base("Wait", large_icon("inv_misc_pocketwatch_01")),
        OtherAction::ManaRegen => {
            let suffix = match tag {
                1 => " (Casting)",
                2 => " (Not Casting)",
                _ => "",
            };
            named(
                "Mana Tick",
                format!("Mana Tick{suffix}"),
                resource_icon(ResourceType::Mana),
            )
        }
        OtherAction::EnergyRegen => base("Energy Tick", resource_icon(ResourceType::Energy)),
        OtherAction::ComboPoints => base(
            "Combo Point Gain",
            resource_icon(ResourceType::ComboPoints),
        ),
        OtherAction::FocusRegen => base("Focus Tick", resource_icon(ResourceType::Focus)),
        OtherAction::ManaGain => base("Mana Gain", resource_icon(ResourceType::Mana)),
        OtherAction::RageGain => base("Rage Gain", resource_icon(ResourceType::Rage)),
        OtherAction::Attack => {
            let suffix = match tag {
                1 => " (Main-Hand)",
                2 => " (Off-Hand)",
                3 => " (Extra Attack)",
                _ => "",
            };
            named("Melee", format!("Melee{suffix}"), large_icon("inv_sword_04"))
        }
        OtherAction::Shoot => {
            let suffix = if tag == 3 { " (Extra Attack)" } else { "" };
            named(
                "Shoot",
                format!("Shoot{suffix}"),
                large_icon("ability_marksmanship"),
            )
        }
        OtherAction::Move => named("Move", "Move".to_string(), large_icon("inv_boots_02")),
        OtherAction::Refund => base("Refund", large_icon("inv_misc_coin_01")),
        OtherAction::DamageTaken => base("Damage Taken", large_icon("inv_sword_04")),
        OtherAction::HealingModel => base("Incoming HPS", large_icon("spell_holy_renew")),
        OtherAction::Potion => base("Potion", large_icon("inv_alchemy_elixir_04")),
        OtherAction::Explosives => base("Explosive", large_icon("Inv_misc_bomb_06")),
        OtherAction::OffensiveEquip => base(
            "Offensive Equipment",
            large_icon("inv_trinket_naxxramas03"),
        ),
        OtherAction::DefensiveEquip => base(
            "Defensive Equipment",
            large_icon("inv_trinket_naxxramas05"),
        ),
    }
}

/// Pets whose display identity is a summoning spell.
pub static PET_SPELLS: phf::Map<&'static str, i32> = phf_map! {
    "Eye of the Void" => 402789,
    "Frozen Orb 1" => 440802,
    "Frozen Orb 2" => 440802,
    "Homunculi" => 402799,
    "Shadowfiend" => 401977,
};

/// Pet family icons, keyed by pet name.
pub static PET_ICONS: phf::Map<&'static str, &'static str> = phf_map! {
    "Bat" => "medium/ability_hunter_pet_bat",
    "Bear" => "medium/ability_hunter_pet_bear",
    "Boar" => "medium/ability_hunter_pet_boar",
    "Carrion Bird" => "medium/ability_hunter_pet_vulture",
    "Cat" => "medium/ability_hunter_pet_cat",
    "Core Hound" => "medium/ability_hunter_pet_corehound",
    "Crab" => "medium/ability_hunter_pet_crab",
    "Crocolisk" => "medium/ability_hunter_pet_crocolisk",
    "Felguard" => "large/spell_shadow_summonfelguard",
    "Felhunter" => "large/spell_shadow_summonfelhunter",
    "Gorilla" => "medium/ability_hunter_pet_gorilla",
    "Hyena" => "medium/ability_hunter_pet_hyena",
    "Imp" => "large/spell_shadow_summonimp",
    "Infernal" => "large/spell_shadow_summoninfernal",
    "Mirror Image" => "large/spell_magic_lesserinvisibilty",
    "Owl" => "medium/ability_hunter_pet_owl",
    "Raptor" => "medium/ability_hunter_pet_raptor",
    "Scorpid" => "medium/ability_hunter_pet_scorpid",
    "Spider" => "medium/ability_hunter_pet_spider",
    "Spirit Wolves" => "large/spell_shaman_feralspirit",
    "Succubus" => "large/spell_shadow_summonsuccubus",
    "Tallstrider" => "medium/ability_hunter_pet_tallstrider",
    "Treants" => "medium/ability_druid_forceofnature",
    "Turtle" => "medium/ability_hunter_pet_turtle",
    "Voidwalker" => "large/spell_shadow_summonvoidwalker",
    "Wind Serpent" => "medium/ability_hunter_pet_windserpent",
    "Wolf" => "medium/ability_hunter_pet_wolf",
};

pub fn pet_icon(pet_name: &str) -> Option<String> {
    PET_ICONS
        .get(pet_name)
        .map(|path| format!("{ICON_HOST}/{path}.jpg"))
}

pub const DEFAULT_TARGET_ICON: &str =
    "https://wow.zamimg.com/images/wow/icons/large/spell_shadow_metamorphosis.jpg";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn main_and_off_hand_tags() {
        assert_eq!(tagged_name("Mutilate", 1, 1, None), "Mutilate (Main-Hand)");
        assert_eq!(tagged_name("Mutilate", 1, 2, None), "Mutilate (Off-Hand)");
        assert_eq!(tagged_name("Mutilate", 1, 0, None), "Mutilate");
        assert_eq!(tagged_name("Raptor Strike", 1, 3, None), "Raptor Strike (Queue)");
    }

    #[test]
    fn stacks_and_ticks() {
        assert_eq!(tagged_name("Arcane Blast", 1, 1, None), "Arcane Blast (No Stacks)");
        assert_eq!(tagged_name("Arcane Blast", 1, 2, None), "Arcane Blast (1 Stack)");
        assert_eq!(tagged_name("Arcane Blast", 1, 4, None), "Arcane Blast (3 Stacks)");
        assert_eq!(tagged_name("Mind Flay", 1, 2, None), "Mind Flay (2 Tick)");
        assert_eq!(tagged_name("Living Bomb", 1, 0, None), "Living Bomb (DoT)");
        assert_eq!(tagged_name("Living Bomb", 1, 1, None), "Living Bomb (Explosion)");
    }

    #[test]
    fn targeted_buffs_name_the_caster() {
        assert_eq!(tagged_name("Innervate", 1, -1, Some(0)), "Innervate (raid)");
        assert_eq!(tagged_name("Innervate", 1, 2, Some(2)), "Innervate (self)");
        assert_eq!(tagged_name("Innervate", 1, 2, Some(0)), "Innervate (from #3)");
        assert_eq!(tagged_name("Innervate", 1, 2, None), "Innervate (self)");
    }

    #[test]
    fn overload_and_unknown_tags() {
        assert_eq!(tagged_name("Lightning Bolt", 1, 11, None), "Lightning Bolt OL");
        assert_eq!(tagged_name("Lightning Bolt", 1, 5, None), "Lightning Bolt (5 MSW)");
        assert_eq!(tagged_name("Frostbolt", 1, 3, None), "Frostbolt (??)");
        assert_eq!(tagged_name("Frostbolt", 1, 0, None), "Frostbolt");
    }

    #[test]
    fn spell_id_variants() {
        assert_eq!(tagged_name("Mangle", 409828, 0, None), "Mangle (Cat)");
        assert_eq!(tagged_name("Mangle", 1, 0, None), "Mangle (Bear)");
        assert_eq!(tagged_name("Enrage", 14201, 0, None), "Enrage (Fresh Meat)");
        assert_eq!(tagged_name("Hot Streak", 1, 1, None), "Heating Up");
    }

    #[test]
    fn other_actions_have_fixed_names() {
        let melee = other_display(OtherAction::Attack, 2);
        assert_eq!(melee.name.as_deref(), Some("Melee (Off-Hand)"));
        let regen = other_display(OtherAction::EnergyRegen, 0);
        assert_eq!(regen.base_name, Some("Energy Tick"));
        assert_eq!(other_display(OtherAction::Pet, 0), OtherDisplay::default());
    }
}
