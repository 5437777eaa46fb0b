pub mod element_source;
pub mod traits;

pub use element_source::{ElementTableSource, QueryContext, SOURCE_NAME};
pub use traits::{DataSource, Page};
