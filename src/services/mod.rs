pub mod assistant;
pub mod ticket_store;
pub mod view;

pub use assistant::AssistantService;
pub use ticket_store::TicketStoreService;
pub use view::{DraftSurface, ErrorScope, ViewRenderer};
