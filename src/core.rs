pub mod capacity;
pub mod differ;
pub mod event;
pub mod reading;
pub mod replay;
pub mod snapshot;
pub mod state;
