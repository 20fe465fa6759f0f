//! Elemental reaction engine.
//!
//! One stateless strategy per element. A strategy knows which existing tags
//! its element reacts with and what each reaction does; every piece of
//! mutable state it touches (tags, counters, residue, AI status) lives on the
//! target or the board.
//!
//! ## Combo Rule
//!
//! When an attack of element E lands, the strategy looks for a compatible
//! partner, first among the target's tags and then in the residue of the
//! tile the target stands on. A found partner is consumed and the reaction
//! replaces the plain hit. Otherwise E is added to the target's tags.
//!
//! | incoming | partner | reaction | damage |
//! |---|---|---|---|
//! | Water | Fire | Extinguish | x3/2 |
//! | Fire | Wood | Ignite | x3/2 |
//! | Fire | Ice | Melt | x2 |
//! | Ice | Water | Freeze | x1 |
//! | Thunder | Ice | Superconduct | x2 |
//! | Thunder | Water | Conduct | x3/2 |
//! | Wood | Water | Bloom | x3/2 |

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::element::{Element, ElementSet};
use crate::core::{CombatState, EntityId};
use crate::events::CombatEvent;
use crate::status::BuffKey;

/// A resolved pairwise combo.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Reaction {
    Extinguish,
    Ignite,
    Melt,
    Freeze,
    Superconduct,
    Conduct,
    Bloom,
}

impl Reaction {
    /// Damage multiplier as `(numerator, denominator)`.
    #[must_use]
    pub const fn multiplier(self) -> (i64, i64) {
        match self {
            Reaction::Extinguish | Reaction::Ignite | Reaction::Conduct | Reaction::Bloom => (3, 2),
            Reaction::Melt | Reaction::Superconduct => (2, 1),
            Reaction::Freeze => (1, 1),
        }
    }

    /// Scale damage, rounding down.
    #[must_use]
    pub const fn scale(self, damage: i64) -> i64 {
        let (num, den) = self.multiplier();
        damage.saturating_mul(num) / den
    }
}

/// Where a consumed partner came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PartnerSource {
    Tag,
    Residue,
}

/// Adjusted damage plus what happened.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReactionOutcome {
    pub damage: i64,
    pub reaction: Option<Reaction>,
    pub partner: Option<PartnerSource>,
    /// Tag pushed out by the element cap on a plain hit.
    pub evicted: Option<Element>,
}

impl ReactionOutcome {
    #[must_use]
    pub const fn unchanged(damage: i64) -> Self {
        Self {
            damage,
            reaction: None,
            partner: None,
            evicted: None,
        }
    }
}

/// Per-element behavior.
pub trait ElementStrategy: Sync {
    fn element(&self) -> Element;

    /// Partner tags this element reacts with, in priority order.
    fn combos(&self) -> &'static [(Element, Reaction)] {
        &[]
    }

    /// Apply a reaction's side effects and return the adjusted damage. The
    /// partner has already been consumed.
    fn react(&self, state: &mut CombatState, target: EntityId, reaction: Reaction, damage: i64) -> i64 {
        let _ = (state, target);
        reaction.scale(damage)
    }

    /// Side effects of a hit with no partner. The tag is already added.
    fn on_plain_hit(&self, _state: &mut CombatState, _target: EntityId) {}

    /// Persistent effects at the start of the target's turn. Returns damage
    /// the target should take.
    fn on_start_of_turn(&self, _state: &mut CombatState, _target: EntityId) -> i64 {
        0
    }

    /// Adjust `damage` for an attack of this element landing on `target`.
    fn calculate_damage(
        &self,
        state: &mut CombatState,
        attacker: Option<EntityId>,
        target: EntityId,
        damage: i64,
    ) -> ReactionOutcome {
        let Some(position) = state.combatant(target).map(|c| c.position) else {
            return ReactionOutcome::unchanged(damage);
        };

        // Every tag the target carries outranks any residue under it.
        let tags = state.combatant(target).map(|c| &c.elements);
        let residue = state.board.tile_at(position).map(|t| &t.residue);
        let find = |held: Option<&ElementSet>, source: PartnerSource| {
            let held = held?;
            self.combos()
                .iter()
                .find(|(partner, _)| held.contains(*partner))
                .map(|&(partner, reaction)| (partner, reaction, source))
        };
        let partner = find(tags, PartnerSource::Tag).or_else(|| find(residue, PartnerSource::Residue));

        match partner {
            Some((partner, reaction, source)) => {
                match source {
                    PartnerSource::Tag => {
                        if let Some(c) = state.combatant_mut(target) {
                            c.elements.remove(partner);
                        }
                    }
                    PartnerSource::Residue => {
                        state.board.take_residue(position, partner);
                    }
                }
                let adjusted = self.react(state, target, reaction, damage);
                debug!(
                    attacker = ?attacker,
                    %target,
                    ?reaction,
                    ?source,
                    damage,
                    adjusted,
                    "reaction"
                );
                state.emit(CombatEvent::ReactionTriggered {
                    target,
                    reaction,
                    position,
                });
                ReactionOutcome {
                    damage: adjusted,
                    reaction: Some(reaction),
                    partner: Some(source),
                    evicted: None,
                }
            }
            None => {
                let evicted = add_tag(state, target, self.element());
                self.on_plain_hit(state, target);
                ReactionOutcome {
                    evicted,
                    ..ReactionOutcome::unchanged(damage)
                }
            }
        }
    }
}

/// Tag a combatant, respecting the configured cap.
fn add_tag(state: &mut CombatState, target: EntityId, element: Element) -> Option<Element> {
    let cap = state.config.max_element_tags;
    let evicted = state
        .combatant_mut(target)
        .and_then(|c| c.elements.insert(element, cap));
    if let Some(old) = evicted {
        debug!(%target, %element, evicted = %old, "element cap reached");
    }
    evicted
}

/// Tag living enemies within the reaction radius of `target`.
fn tag_nearby(state: &mut CombatState, target: EntityId, element: Element) {
    let Some(origin) = state.combatant(target).map(|c| c.position) else {
        return;
    };
    let radius = state.config.reaction_radius;
    for id in state.enemies_near(origin, radius) {
        if id != target {
            add_tag(state, id, element);
            state.emit_status(id);
        }
    }
}

/// Leave residue on the target's tile, and optionally its adjacent tiles.
fn spread_residue(state: &mut CombatState, target: EntityId, element: Element, adjacent: bool) {
    let Some(origin) = state.combatant(target).map(|c| c.position) else {
        return;
    };
    let cap = state.config.max_element_tags;
    state.board.add_residue(origin, element, cap);
    if adjacent {
        for pos in state.board.adjacent_positions(origin) {
            state.board.add_residue(pos, element, cap);
        }
    }
}

fn raise_burning(state: &mut CombatState, target: EntityId, turns: u32) {
    if let Some(c) = state.combatant_mut(target) {
        let current = c.buffs.counter(BuffKey::Burning);
        c.buffs.set_counter(BuffKey::Burning, current.max(turns));
    }
}

pub struct FireStrategy;

impl ElementStrategy for FireStrategy {
    fn element(&self) -> Element {
        Element::Fire
    }

    fn combos(&self) -> &'static [(Element, Reaction)] {
        &[(Element::Wood, Reaction::Ignite), (Element::Ice, Reaction::Melt)]
    }

    fn react(&self, state: &mut CombatState, target: EntityId, reaction: Reaction, damage: i64) -> i64 {
        if reaction == Reaction::Ignite {
            let turns = state.config.ignite_burn_turns;
            add_tag(state, target, Element::Fire);
            raise_burning(state, target, turns);
        }
        reaction.scale(damage)
    }

    fn on_plain_hit(&self, state: &mut CombatState, target: EntityId) {
        let turns = state.config.burn_turns;
        raise_burning(state, target, turns);
    }

    /// Burning deals damage each turn; the fire tag goes out with the last
    /// tick.
    fn on_start_of_turn(&self, state: &mut CombatState, target: EntityId) -> i64 {
        let burn = state.config.burn_damage;
        let Some(c) = state.combatant_mut(target) else {
            return 0;
        };
        match c.buffs.counter(BuffKey::Burning) {
            0 => 0,
            1 => {
                c.elements.remove(Element::Fire);
                burn
            }
            _ => burn,
        }
    }
}

pub struct WaterStrategy;

impl ElementStrategy for WaterStrategy {
    fn element(&self) -> Element {
        Element::Water
    }

    fn combos(&self) -> &'static [(Element, Reaction)] {
        &[(Element::Fire, Reaction::Extinguish)]
    }

    fn react(&self, state: &mut CombatState, target: EntityId, reaction: Reaction, damage: i64) -> i64 {
        if let Some(c) = state.combatant_mut(target) {
            c.buffs.remove(BuffKey::Burning);
            c.elements.remove(Element::Fire);
        }
        add_tag(state, target, Element::Water);
        spread_residue(state, target, Element::Water, true);
        reaction.scale(damage)
    }

    fn on_plain_hit(&self, state: &mut CombatState, target: EntityId) {
        spread_residue(state, target, Element::Water, false);
    }
}

pub struct IceStrategy;

impl ElementStrategy for IceStrategy {
    fn element(&self) -> Element {
        Element::Ice
    }

    fn combos(&self) -> &'static [(Element, Reaction)] {
        &[(Element::Water, Reaction::Freeze)]
    }

    fn react(&self, state: &mut CombatState, target: EntityId, reaction: Reaction, damage: i64) -> i64 {
        if let Some(enemy) = state.enemy_mut(target) {
            enemy.ai.frozen_turns += 1;
        }
        tag_nearby(state, target, Element::Ice);
        reaction.scale(damage)
    }
}

pub struct ThunderStrategy;

impl ElementStrategy for ThunderStrategy {
    fn element(&self) -> Element {
        Element::Thunder
    }

    fn combos(&self) -> &'static [(Element, Reaction)] {
        &[
            (Element::Ice, Reaction::Superconduct),
            (Element::Water, Reaction::Conduct),
        ]
    }

    fn react(&self, state: &mut CombatState, target: EntityId, reaction: Reaction, damage: i64) -> i64 {
        match reaction {
            Reaction::Superconduct => {
                if let Some(enemy) = state.enemy_mut(target) {
                    enemy.ai.stunned_turns += 1;
                }
            }
            Reaction::Conduct => tag_nearby(state, target, Element::Thunder),
            _ => {}
        }
        reaction.scale(damage)
    }
}

pub struct WoodStrategy;

impl ElementStrategy for WoodStrategy {
    fn element(&self) -> Element {
        Element::Wood
    }

    fn combos(&self) -> &'static [(Element, Reaction)] {
        &[(Element::Water, Reaction::Bloom)]
    }

    fn react(&self, state: &mut CombatState, target: EntityId, reaction: Reaction, damage: i64) -> i64 {
        add_tag(state, target, Element::Wood);
        spread_residue(state, target, Element::Wood, false);
        reaction.scale(damage)
    }

    fn on_plain_hit(&self, state: &mut CombatState, target: EntityId) {
        spread_residue(state, target, Element::Wood, false);
    }
}

/// The strategy for an element.
#[must_use]
pub fn strategy(element: Element) -> &'static dyn ElementStrategy {
    match element {
        Element::Fire => &FireStrategy,
        Element::Water => &WaterStrategy,
        Element::Ice => &IceStrategy,
        Element::Thunder => &ThunderStrategy,
        Element::Wood => &WoodStrategy,
    }
}

/// Run every element's start-of-turn hook on `target`, returning the total
/// damage it should take.
pub fn start_of_turn(state: &mut CombatState, target: EntityId) -> i64 {
    Element::ALL
        .iter()
        .map(|&element| strategy(element).on_start_of_turn(state, target))
        .sum()
}
