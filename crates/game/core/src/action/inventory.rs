use crate::action::{ActionError, ActionTransition, live_actor};
use crate::env::{GameEnv, ItemKind};
use crate::state::{EntityId, GameState};

/// Picks up the item lying under the actor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PickupAction {
    pub actor: EntityId,
}

impl PickupAction {
    pub fn new(actor: EntityId) -> Self {
        Self { actor }
    }
}

impl ActionTransition for PickupAction {
    type Error = ActionError;
    type Result = ItemKind;

    fn actor(&self) -> EntityId {
        self.actor
    }

    fn pre_validate(&self, state: &GameState, _env: &GameEnv<'_>) -> Result<(), Self::Error> {
        let actor = live_actor(state, self.actor)?;
        if actor.inventory.is_none() {
            return Err(ActionError::NoInventory(self.actor));
        }
        if state.entities.item_at(actor.position).is_none() {
            return Err(ActionError::NothingToPickUp {
                position: actor.position,
            });
        }
        Ok(())
    }

    fn apply(&self, state: &mut GameState, _env: &GameEnv<'_>) -> Result<ItemKind, Self::Error> {
        let position = live_actor(state, self.actor)?.position;
        let item_id = state
            .entities
            .item_at(position)
            .map(|item| item.id)
            .ok_or(ActionError::NothingToPickUp { position })?;
        let item = state
            .entities
            .remove_item(item_id)
            .ok_or(ActionError::NothingToPickUp { position })?;

        let inventory = state
            .entities
            .actor_mut(self.actor)
            .and_then(|actor| actor.inventory.as_mut())
            .ok_or(ActionError::NoInventory(self.actor))?;
        match item.kind {
            ItemKind::HealthPotion => inventory.potions += 1,
        }

        state
            .messages
            .push_text(format!("You picked up the {}!", item.name()));
        Ok(item.kind)
    }
}

/// Drinks one health potion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UseItemAction {
    pub actor: EntityId,
}

impl UseItemAction {
    pub fn new(actor: EntityId) -> Self {
        Self { actor }
    }
}

impl ActionTransition for UseItemAction {
    type Error = ActionError;
    /// HP actually restored.
    type Result = u32;

    fn actor(&self) -> EntityId {
        self.actor
    }

    fn pre_validate(&self, state: &GameState, _env: &GameEnv<'_>) -> Result<(), Self::Error> {
        let actor = live_actor(state, self.actor)?;
        let inventory = actor
            .inventory
            .ok_or(ActionError::NoInventory(self.actor))?;
        if inventory.potions == 0 {
            return Err(ActionError::EmptyInventory);
        }
        Ok(())
    }

    fn apply(&self, state: &mut GameState, env: &GameEnv<'_>) -> Result<u32, Self::Error> {
        let heal = env.config().potion_heal;
        let actor = state
            .entities
            .actor_mut(self.actor)
            .ok_or(ActionError::ActorNotFound(self.actor))?;
        let inventory = actor
            .inventory
            .as_mut()
            .ok_or(ActionError::NoInventory(self.actor))?;
        inventory.potions = inventory
            .potions
            .checked_sub(1)
            .ok_or(ActionError::EmptyInventory)?;
        let restored = actor.fighter.heal(heal);

        state.messages.push_text(format!(
            "You consume the {}, and recover {restored} HP!",
            ItemKind::HealthPotion.name()
        ));
        Ok(restored)
    }
}
