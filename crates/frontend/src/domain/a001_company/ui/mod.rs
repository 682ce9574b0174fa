mod list;
mod settings;

pub use list::CompanyList;
pub use settings::CompanySettings;
