pub mod fs;
pub mod output;
