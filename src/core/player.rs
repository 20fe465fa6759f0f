//! The player combatant.

use super::combatant::Combatant;
use super::config::PlayerTemplate;
use super::entity::EntityId;
use crate::zones::CardPiles;

/// Player: combatant fields plus energy, gold and card piles.
#[derive(Clone, Debug)]
pub struct Player {
    pub combatant: Combatant,
    energy: u32,
    max_energy: u32,
    pub gold: u32,
    pub piles: CardPiles,
}

impl Player {
    #[must_use]
    pub fn from_template(template: &PlayerTemplate) -> Self {
        let mut combatant = Combatant::new(EntityId::PLAYER, template.max_hp, template.position);
        if let Some(hp) = template.hp {
            combatant.set_hp(hp);
        }
        Self {
            combatant,
            energy: 0,
            max_energy: template.max_energy,
            gold: template.gold,
            piles: CardPiles::new(),
        }
    }

    #[must_use]
    pub fn energy(&self) -> u32 {
        self.energy
    }

    #[must_use]
    pub fn max_energy(&self) -> u32 {
        self.max_energy
    }

    pub fn refill_energy(&mut self) {
        self.energy = self.max_energy;
    }

    pub fn gain_energy(&mut self, amount: u32) {
        self.energy = self.energy.saturating_add(amount);
    }

    /// Spend energy if affordable. Returns false and spends nothing otherwise.
    pub fn spend_energy(&mut self, amount: u32) -> bool {
        match self.energy.checked_sub(amount) {
            Some(remaining) => {
                self.energy = remaining;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Position;

    #[test]
    fn test_from_template() {
        let template = PlayerTemplate::new(40, 3, Position::new(1, 2)).with_hp(25);
        let player = Player::from_template(&template);

        assert_eq!(player.combatant.id, EntityId::PLAYER);
        assert_eq!(player.combatant.hp(), 25);
        assert_eq!(player.combatant.max_hp(), 40);
        assert_eq!(player.energy(), 0);
        assert_eq!(player.max_energy(), 3);
    }

    #[test]
    fn test_energy() {
        let mut player = Player::from_template(&PlayerTemplate::new(10, 3, Position::new(0, 0)));
        player.refill_energy();

        assert!(player.spend_energy(2));
        assert!(!player.spend_energy(2));
        assert_eq!(player.energy(), 1);

        player.gain_energy(2);
        assert_eq!(player.energy(), 3);
    }
}
