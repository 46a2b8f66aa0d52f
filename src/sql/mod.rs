pub mod cursor;
pub mod error;
pub mod keywords;
pub mod scanner;
pub mod stream;
pub mod token;
