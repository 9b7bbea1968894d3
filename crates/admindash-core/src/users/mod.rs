//! The users listing: API models plus the filtered, paginated view.

pub mod listing;
pub mod model;

pub use listing::{UserListing, ITEMS_PER_PAGE};
pub use model::{Address, Company, Geo, ListedUser, UserFilters};
