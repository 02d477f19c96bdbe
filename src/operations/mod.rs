pub mod classify;
pub mod edit;
pub mod select;
