pub mod date_range;
pub mod entities;
pub mod enums;
pub mod repositories;

pub use date_range::DateRange;
pub use entities::*;
pub use enums::*;
