pub mod assistant;
pub mod http;
pub mod terminal;
pub mod tickets;
