pub mod page;
pub mod wizard;
