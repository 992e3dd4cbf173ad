pub mod filters;
pub mod selection;
