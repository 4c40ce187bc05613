pub mod actor;
pub mod common;
pub mod entities;
pub mod item;
pub mod map;
pub mod turn;

pub use actor::{ActorState, AiBehavior, Fighter, Inventory, LevelStats};
pub use common::{EntityId, Position};
pub use entities::EntitiesState;
pub use item::ItemState;
pub use map::{GameMap, TileFlags};
pub use turn::TurnState;
