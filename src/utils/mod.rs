pub mod dates;
pub mod logger;
pub mod token;
