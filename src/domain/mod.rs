pub mod response;
pub mod state;
pub mod ticket;
