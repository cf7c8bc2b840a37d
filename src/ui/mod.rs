//! UI rendering module for the Met collection browser
//!
//! This module contains all the rendering logic for the terminal user
//! interface, using the ratatui library for TUI components.

pub mod artwork_detail;
pub mod artwork_list;
pub mod cache_stats;
pub mod department_list;
pub mod help_overlay;

pub use artwork_detail::render as render_artwork_detail;
pub use artwork_list::render as render_artwork_list;
pub use cache_stats::render as render_cache_stats;
pub use department_list::render as render_department_list;
pub use help_overlay::render as render_help_overlay;
