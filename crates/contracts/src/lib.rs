//! Wire contracts shared between the ESG portal client and the REST backend.

pub mod domain;
pub mod shared;
pub mod system;
