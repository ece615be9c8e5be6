pub mod commands;
pub mod notifications;
pub mod timers;

pub use notifications::{Client, Handle, Input, Service, service};
pub use timers::TokioScheduler;
