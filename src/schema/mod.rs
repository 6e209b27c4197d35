pub mod character;
pub mod options;
pub mod path;
