//! `pk-spatial` — tile grid, lane graph, and the two breadth-first searches.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                     |
//! |-------------|--------------------------------------------------------------|
//! | [`grid`]    | `Grid<B>`, `Tile<B>` — bounded 2-D tile store                |
//! | [`network`] | `LaneGraph`, `LaneNode` — directed node arena over road tiles|
//! | [`search`]  | `find_tile`, `find_tile_list`, `search_graph`, `GraphPath`   |
//! | [`error`]   | `SpatialError`, `SpatialResult<T>`                           |
//!
//! The grid is generic over what a tile holds, so this crate does not know
//! about buildings; `pk-sim` instantiates it as `Grid<Building>`.

pub mod error;
pub mod grid;
pub mod network;
pub mod search;


pub use error::{SpatialError, SpatialResult};
pub use grid::{Grid, Tile};
pub use network::{LaneGraph, LaneNode};
pub use search::{GraphPath, find_tile, find_tile_list, search_graph, search_graph_where};
