/// Turn bookkeeping for the active session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnState {
    /// 1-based depth of the current level.
    pub dungeon_level: u32,

    /// Turns completed on the current level. Reset to 0 on every level
    /// transition.
    pub turn: u32,

    /// Turns completed over the whole session. Never reset; lets observers
    /// tell two snapshots apart across level transitions.
    pub nonce: u64,
}

impl TurnState {
    pub fn new() -> Self {
        Self {
            dungeon_level: 1,
            turn: 0,
            nonce: 0,
        }
    }
}

impl Default for TurnState {
    fn default() -> Self {
        Self::new()
    }
}
