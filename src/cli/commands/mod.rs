pub mod paths;
pub mod server;
pub mod trigger;
