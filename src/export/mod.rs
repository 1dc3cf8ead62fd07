pub mod reader;
pub mod writer;

pub use reader::{parse_map, read_map, TileLayerData, TileMapDocument, TilesetInfo};
pub use writer::{csv_tile_ids, MapExporter, TMX_VERSION};
