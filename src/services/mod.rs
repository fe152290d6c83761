pub mod geometry;
pub mod pipeline;
pub mod scheduler;
pub mod session;
pub mod svg_document;

pub use geometry::{centroid_in_raster, map_region, LayoutNotReady, LayoutProbe};
pub use pipeline::{PassContext, PassState, RecolorPipeline, RecolorReport, RecolorSnapshot};
pub use scheduler::{Clock, Debouncer, ManualClock, MonotonicClock};
pub use session::{RecolorTrigger, Session, DOCUMENT_PALETTE};
pub use svg_document::{SvgDocument, BASE_FILL, EXPORT_FILE_NAME};
