pub mod backup;
pub mod core;
pub mod reminder;
pub mod screen;
pub mod stats;
pub mod students;
