pub mod jobs;
pub mod printers;
