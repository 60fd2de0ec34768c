pub mod message;
pub mod rating;
