use crate::state::AppState;
use axum::Router;

pub mod dto;
pub mod extract;
pub mod handlers;
pub mod pipeline;
mod prompts;
pub mod strategy;

pub use pipeline::ProfileEnricher;

pub fn router() -> Router<AppState> {
    handlers::profile_routes()
}
