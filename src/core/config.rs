//! Encounter configuration.
//!
//! Hosts supply everything the core needs at encounter start:
//! - `EncounterConfig`: Rule tuning (hand size, tag cap, adjacency, ...)
//! - `PlayerTemplate` / `EnemyTemplate`: Starting stats and positions
//! - `EncounterSetup`: All of the above plus board size, deck list and seed
//!
//! The core derives serde traits for these but defines no file format;
//! catalogs and rosters are authored elsewhere.

use serde::{Deserialize, Serialize};

use crate::board::{OffsetTable, Position};
use crate::cards::CardId;

/// Rule tuning shared by every subsystem.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncounterConfig {
    /// Cards drawn at the start of each player turn.
    pub starting_hand_size: usize,

    /// Cards drawn beyond this go straight to the discard pile.
    pub max_hand_size: usize,

    /// Maximum element tags a target (or tile) holds at once. When a new tag
    /// would exceed the cap, the oldest tag is evicted.
    pub max_element_tags: usize,

    /// What "adjacent" means on this board.
    pub adjacency: OffsetTable,

    /// Damage dealt per burning tick.
    pub burn_damage: i64,

    /// Burning turns applied by a plain fire hit.
    pub burn_turns: u32,

    /// Burning turns applied by an ignite reaction.
    pub ignite_burn_turns: u32,

    /// Manhattan radius for nearby-enemy reaction effects.
    pub reaction_radius: u32,

    /// Enraging enemies turn berserk at or below this share of max HP.
    pub berserk_threshold_percent: i64,

    /// Extra attack damage while berserk, as a percentage of base attack.
    pub berserk_bonus_percent: i64,

    /// Outgoing damage while weakened, as a percentage.
    pub weakened_percent: i64,
}

impl Default for EncounterConfig {
    fn default() -> Self {
        Self {
            starting_hand_size: 5,
            max_hand_size: 10,
            max_element_tags: 2,
            adjacency: OffsetTable::four_neighbor(),
            burn_damage: 2,
            burn_turns: 2,
            ignite_burn_turns: 3,
            reaction_radius: 1,
            berserk_threshold_percent: 50,
            berserk_bonus_percent: 50,
            weakened_percent: 75,
        }
    }
}

impl EncounterConfig {
    #[must_use]
    pub fn with_hand_size(mut self, size: usize) -> Self {
        self.starting_hand_size = size;
        self
    }

    #[must_use]
    pub fn with_element_cap(mut self, cap: usize) -> Self {
        self.max_element_tags = cap;
        self
    }

    #[must_use]
    pub fn with_adjacency(mut self, adjacency: OffsetTable) -> Self {
        self.adjacency = adjacency;
        self
    }
}

/// Starting player stats.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerTemplate {
    pub max_hp: i64,
    /// Starting HP; `None` starts at full health.
    #[serde(default)]
    pub hp: Option<i64>,
    pub max_energy: u32,
    #[serde(default)]
    pub gold: u32,
    pub position: Position,
}

impl PlayerTemplate {
    #[must_use]
    pub fn new(max_hp: i64, max_energy: u32, position: Position) -> Self {
        Self {
            max_hp,
            hp: None,
            max_energy,
            gold: 0,
            position,
        }
    }

    #[must_use]
    pub fn with_hp(mut self, hp: i64) -> Self {
        self.hp = Some(hp);
        self
    }
}

/// Enemy stat template.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemyTemplate {
    pub name: String,
    pub max_hp: i64,
    pub base_attack: i64,
    /// Offsets from the enemy's tile at which the player can be hit.
    pub attack_range: OffsetTable,
    pub position: Position,
    #[serde(default)]
    pub block: i64,
    #[serde(default)]
    pub boss: bool,
    /// Turns berserk when HP drops to the configured threshold.
    #[serde(default)]
    pub enrages: bool,
}

impl EnemyTemplate {
    /// Melee enemy that hits orthogonally adjacent tiles.
    pub fn new(name: impl Into<String>, max_hp: i64, base_attack: i64, position: Position) -> Self {
        Self {
            name: name.into(),
            max_hp,
            base_attack,
            attack_range: OffsetTable::four_neighbor(),
            position,
            block: 0,
            boss: false,
            enrages: false,
        }
    }

    #[must_use]
    pub fn with_range(mut self, range: OffsetTable) -> Self {
        self.attack_range = range;
        self
    }

    #[must_use]
    pub fn with_block(mut self, block: i64) -> Self {
        self.block = block;
        self
    }

    #[must_use]
    pub fn boss(mut self) -> Self {
        self.boss = true;
        self.enrages = true;
        self
    }

    #[must_use]
    pub fn enraging(mut self) -> Self {
        self.enrages = true;
        self
    }
}

/// Everything needed to start an encounter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EncounterSetup {
    #[serde(default)]
    pub config: EncounterConfig,
    pub board_width: u32,
    pub board_height: u32,
    pub player: PlayerTemplate,
    /// Enemies in registration order; this is also their turn order.
    pub enemies: Vec<EnemyTemplate>,
    /// Card definitions to instantiate into the starting deck.
    pub deck: Vec<CardId>,
    #[serde(default)]
    pub seed: u64,
}

impl EncounterSetup {
    #[must_use]
    pub fn new(board_width: u32, board_height: u32, player: PlayerTemplate) -> Self {
        Self {
            config: EncounterConfig::default(),
            board_width,
            board_height,
            player,
            enemies: Vec::new(),
            deck: Vec::new(),
            seed: 0,
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: EncounterConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn with_enemy(mut self, enemy: EnemyTemplate) -> Self {
        self.enemies.push(enemy);
        self
    }

    #[must_use]
    pub fn with_deck(mut self, deck: impl IntoIterator<Item = CardId>) -> Self {
        self.deck = deck.into_iter().collect();
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EncounterConfig::default();
        assert_eq!(config.starting_hand_size, 5);
        assert_eq!(config.max_element_tags, 2);
        assert_eq!(config.adjacency, OffsetTable::four_neighbor());
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: EncounterConfig =
            serde_json::from_str(r#"{ "starting_hand_size": 3, "max_element_tags": 4 }"#).unwrap();

        assert_eq!(config.starting_hand_size, 3);
        assert_eq!(config.max_element_tags, 4);
        assert_eq!(config.burn_damage, 2);
        assert_eq!(config.max_hand_size, 10);
    }

    #[test]
    fn test_setup_builder() {
        let setup = EncounterSetup::new(6, 6, PlayerTemplate::new(40, 3, Position::new(0, 0)))
            .with_enemy(EnemyTemplate::new("Slime", 20, 4, Position::new(3, 3)))
            .with_enemy(EnemyTemplate::new("Golem", 60, 9, Position::new(5, 5)).boss())
            .with_deck([CardId::new(1), CardId::new(1)])
            .with_seed(9);

        assert_eq!(setup.enemies.len(), 2);
        assert!(setup.enemies[1].boss);
        assert!(setup.enemies[1].enrages);
        assert_eq!(setup.deck.len(), 2);
        assert_eq!(setup.seed, 9);
    }

    #[test]
    fn test_setup_deserializes() {
        let json = r#"{
            "board_width": 5,
            "board_height": 4,
            "player": { "max_hp": 30, "max_energy": 3, "position": { "x": 0, "y": 0 } },
            "enemies": [],
            "deck": [1, 2]
        }"#;
        let setup: EncounterSetup = serde_json::from_str(json).unwrap();

        assert_eq!(setup.player.hp, None);
        assert_eq!(setup.deck, vec![CardId::new(1), CardId::new(2)]);
        assert_eq!(setup.config, EncounterConfig::default());
    }
}
