//! UI components for the import page.
//!
//! # Layout Components
//! - [`Header`] - Navigation bar with session status
//! - [`Hero`] - Title and short help text
//! - [`Footer`] - Page footer
//!
//! # Import Components
//! - [`ImportModal`] - Dialog hosting the whole import
//! - [`UploadSection`] - CSV file picker
//! - [`PreviewSection`] - Toolbar, grid and submit bar
//! - [`PreviewGrid`] - Editable rows with inline errors
//! - [`SearchBar`] - Debounced filter input
//! - [`Pagination`] - Page navigation for the grid

mod header;
mod hero;
mod footer;
mod modal;
mod upload;
mod preview;
mod grid;
mod search;
mod pagination;

pub use header::*;
pub use hero::*;
pub use footer::*;
pub use modal::*;
pub use upload::*;
pub use preview::*;
pub use grid::*;
pub use search::*;
pub use pagination::*;
