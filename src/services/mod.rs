pub mod classifier;
pub mod ticket_service;

pub use classifier::ClassificationService;
pub use ticket_service::TicketService;
