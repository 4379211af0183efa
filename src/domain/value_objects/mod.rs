pub mod barcode;
pub mod checkin_id;

pub use barcode::Barcode;
pub use checkin_id::CheckinId;
