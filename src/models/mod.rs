//! Data transfer objects shared by the API, the services and the client view.
//!
//! - `commit`: CommitRecord and its nested author/account types
//! - `page`: PageParams, CommitPage, RefreshResult

pub mod commit;
pub mod page;

pub use commit::*;
pub use page::*;
