//! Page-number pagination primitives for the users dashboard.
//!
//! The dashboard paginates a fully loaded collection on the client. This crate
//! owns the arithmetic (page counts, clamping, slicing) and the codec for the
//! externally addressable `page` query parameter so that every consumer
//! derives identical page state from the same inputs.
//!
//! # Example
//!
//! ```
//! use pagination::{PageSize, paginate};
//!
//! let records: Vec<u32> = (1..=12).collect();
//! let size = PageSize::new(5).expect("non-zero page size");
//!
//! let view = paginate(&records, size, 5);
//! assert_eq!(view.total_pages(), 3);
//! assert_eq!(view.current_page(), 3);
//! assert_eq!(view.items(), &[11, 12]);
//! assert!(view.was_clamped());
//! ```

mod error;
mod page;
mod query;

pub use error::PaginationError;
pub use page::{DEFAULT_PAGE_SIZE, PageMeta, PageSize, PageView, clamp_page, paginate, total_pages};
pub use query::{PAGE_PARAM, PageParam, read_page_param, with_page_param};
