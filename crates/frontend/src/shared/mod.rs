pub mod api_utils;
pub mod draft_store;
pub mod http;
pub mod icons;
pub mod nav_guard;
pub mod storage;
pub mod toast;
