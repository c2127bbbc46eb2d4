//! HTTP entry points.

mod auth_routes;
mod character_routes;
mod dto;
mod game_routes;
mod http;
mod shop_routes;

pub use http::{routes, ApiError, AuthUser};
