pub mod block;
pub mod config;
pub mod constants;
pub mod error;
pub mod geometry;
pub mod merge;
pub mod polygon;
pub mod selection;

pub use block::{Block, CellCoords, GridSize};
pub use config::{Config, GeometryConfig, SelectionConfig};
pub use error::{Error, Result};
pub use geometry::{GridGeometry, Point, Rect};
pub use merge::Mergeable;
pub use polygon::{compute_poly_polygon, PolyPolygon};
pub use selection::{
    KeyboardState, Notify, RangeEventKind, SelectionEvent, SelectionListener, SelectionManager,
    SelectionMode,
};
