pub mod marker;
pub mod compose;
