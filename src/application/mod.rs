pub mod blog_articles;
pub mod edit_gate;
pub mod error;
pub mod messages;
pub mod opinions;
pub mod profile;
pub mod render;
pub mod repos;
pub mod save_events;
pub mod stats;

#[cfg(test)]
mod testing;
