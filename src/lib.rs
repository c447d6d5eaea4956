pub mod chat;
pub mod ci;
pub mod config;
pub mod error;
pub mod scheduler;
pub mod scm;
pub mod shutdown;
pub mod state;
pub mod store;
pub mod watch;
