#[macro_use]
pub mod macros;

pub mod percent;
pub mod volume;
