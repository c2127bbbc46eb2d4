//! Use cases: one module per component of the game backend.

pub mod auth;
pub mod characters;
pub mod game;
pub mod locks;
pub mod npcs;
pub mod shop;
pub mod shop_catalog;

pub use auth::AuthService;
pub use characters::CharacterService;
pub use game::GameService;
pub use locks::{CharacterLocks, SessionLocks};
pub use npcs::NpcService;
pub use shop::ShopService;
