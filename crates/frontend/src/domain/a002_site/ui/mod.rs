mod list;

pub use list::SiteList;
