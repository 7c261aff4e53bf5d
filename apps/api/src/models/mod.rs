pub mod document;
pub mod sections;
pub mod user;
