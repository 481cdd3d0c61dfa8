//! Dashboard side of the API: typed requests, the refresh state machine,
//! and the table and carousel helpers the views are built on.

pub mod api;
pub mod carousel;
pub mod state;
pub mod table;

pub use api::DashboardClient;
pub use carousel::Carousel;
pub use state::{DashboardState, Panel, Status};
pub use table::{SortConfig, SortDirection, SortKey};
