pub mod collector;
pub mod key_event;

pub use collector::ScanCollector;
pub use key_event::{Key, KeyInput};
