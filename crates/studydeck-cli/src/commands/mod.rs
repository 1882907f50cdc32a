pub mod category;
pub mod config;
pub mod serve;
pub mod set;
pub mod status;
pub mod subtopic;
