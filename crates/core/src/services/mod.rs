pub mod animation_service;
pub mod fetch_service;
pub mod render_service;
