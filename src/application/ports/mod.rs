pub mod checkin_gateway;
pub mod connectivity;
pub mod outbox_store;

pub use checkin_gateway::{CheckinGateway, DeliveryError};
pub use connectivity::Connectivity;
pub use outbox_store::OutboxStore;
