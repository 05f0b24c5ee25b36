pub mod documents;
pub mod login;
pub mod search;
pub mod upload;
