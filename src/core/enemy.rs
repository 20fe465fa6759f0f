//! Enemy combatants.

use serde::{Deserialize, Serialize};

use super::combatant::Combatant;
use super::config::EnemyTemplate;
use super::entity::EntityId;
use crate::board::{OffsetTable, Position};

/// AI status counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiStatus {
    /// Turns left frozen; each one forfeits an action.
    pub frozen_turns: u32,
    /// Turns left stunned; each one forfeits an action.
    pub stunned_turns: u32,
    /// Boosts base attack while set.
    pub berserk: bool,
}

impl AiStatus {
    /// Consume one disabled turn if any remain. Returns true when the
    /// action is forfeited. Frozen turns are spent before stunned turns.
    pub fn spend_disabled_turn(&mut self) -> bool {
        if self.frozen_turns > 0 {
            self.frozen_turns -= 1;
            true
        } else if self.stunned_turns > 0 {
            self.stunned_turns -= 1;
            true
        } else {
            false
        }
    }
}

#[derive(Clone, Debug)]
pub struct Enemy {
    pub combatant: Combatant,
    pub name: String,
    pub boss: bool,
    pub enrages: bool,
    pub base_attack: i64,
    pub attack_range: OffsetTable,
    pub ai: AiStatus,
}

impl Enemy {
    #[must_use]
    pub fn from_template(id: EntityId, template: &EnemyTemplate) -> Self {
        let mut combatant = Combatant::new(id, template.max_hp, template.position);
        combatant.set_block(template.block);
        Self {
            combatant,
            name: template.name.clone(),
            boss: template.boss,
            enrages: template.enrages,
            base_attack: template.base_attack,
            attack_range: template.attack_range.clone(),
            ai: AiStatus::default(),
        }
    }

    #[must_use]
    pub fn id(&self) -> EntityId {
        self.combatant.id
    }

    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.combatant.is_alive()
    }

    /// Can this enemy hit `target` from where it stands?
    #[must_use]
    pub fn in_range(&self, target: Position) -> bool {
        self.attack_range
            .contains(self.combatant.position.delta_to(target))
    }
}
