pub mod context;
pub mod messages;
