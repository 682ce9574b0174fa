pub mod a001_company;
pub mod a002_site;
pub mod a003_onboarding_profile;
pub mod a004_esg_report;
