use super::{EntityId, Position};
use crate::env::ItemKind;

/// Item lying on the map. Removed from the registry when picked up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemState {
    pub id: EntityId,
    pub position: Position,
    pub kind: ItemKind,
}

impl ItemState {
    pub fn new(id: EntityId, position: Position, kind: ItemKind) -> Self {
        Self { id, position, kind }
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }
}
