use crate::engines::generation::genome::Genome;
use crate::error::{Result, TilemapError};
use crate::types::GridSize;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub const TMX_VERSION: &str = "1.0";

/// Writes evolved layers as a Tiled map (TMX) with CSV-encoded layer data.
///
/// Tile ids are taken from the evolved genomes: asset `k` is written as `k + 1`
/// (0 is reserved for "no tile" in TMX).
#[derive(Debug, Clone, Default)]
pub struct MapExporter {
    tileset: Vec<PathBuf>,
}

impl MapExporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit an image-collection tileset referencing these sprite files,
    /// one per asset id, so the map opens directly in Tiled.
    pub fn with_tileset(mut self, sources: Vec<PathBuf>) -> Self {
        self.tileset = sources;
        self
    }

    pub fn export<P: AsRef<Path>>(
        &self,
        layers: &[Genome],
        grid: GridSize,
        tile_size: u32,
        output_path: P,
    ) -> Result<()> {
        let output_path = output_path.as_ref();
        let file = File::create(output_path)?;
        let base_dir = output_path.parent().unwrap_or_else(|| Path::new(""));

        self.write_document(BufWriter::new(file), layers, grid, tile_size, base_dir)?;
        log::info!("Exported {} layers to {}", layers.len(), output_path.display());
        Ok(())
    }

    /// Same document as [`export`](Self::export), written to any sink.
    /// Tileset sources are written as given.
    pub fn write_to<W: Write>(
        &self,
        out: W,
        layers: &[Genome],
        grid: GridSize,
        tile_size: u32,
    ) -> Result<()> {
        self.write_document(out, layers, grid, tile_size, Path::new(""))
    }

    fn write_document<W: Write>(
        &self,
        out: W,
        layers: &[Genome],
        grid: GridSize,
        tile_size: u32,
        base_dir: &Path,
    ) -> Result<()> {
        grid.validate()?;
        for genome in layers {
            if genome.len() != grid.cell_count() {
                return Err(TilemapError::DimensionMismatch {
                    expected: grid.cell_count(),
                    actual: genome.len(),
                });
            }
        }

        let mut writer = Writer::new_with_indent(out, b' ', 1);
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

        let mut map = BytesStart::new("map");
        push(&mut map, "version", TMX_VERSION);
        push(&mut map, "orientation", "orthogonal");
        push(&mut map, "renderorder", "right-down");
        push(&mut map, "width", grid.width);
        push(&mut map, "height", grid.height);
        push(&mut map, "tilewidth", tile_size);
        push(&mut map, "tileheight", tile_size);
        push(&mut map, "infinite", 0);
        push(&mut map, "nextlayerid", layers.len() + 1);
        writer.write_event(Event::Start(map))?;

        if !self.tileset.is_empty() {
            self.write_tileset(&mut writer, tile_size, base_dir)?;
        }

        for (i, genome) in layers.iter().enumerate() {
            let mut layer = BytesStart::new("layer");
            push(&mut layer, "id", i + 1);
            push(&mut layer, "name", format!("Layer {}", i + 1));
            push(&mut layer, "width", grid.width);
            push(&mut layer, "height", grid.height);
            writer.write_event(Event::Start(layer))?;

            let mut data = BytesStart::new("data");
            push(&mut data, "encoding", "csv");
            writer.write_event(Event::Start(data))?;
            let csv = csv_tile_ids(genome);
            writer.write_event(Event::Text(BytesText::new(&csv)))?;
            writer.write_event(Event::End(BytesEnd::new("data")))?;

            writer.write_event(Event::End(BytesEnd::new("layer")))?;
        }

        writer.write_event(Event::End(BytesEnd::new("map")))?;
        writer.into_inner().flush()?;
        Ok(())
    }

    fn write_tileset<W: Write>(
        &self,
        writer: &mut Writer<W>,
        tile_size: u32,
        base_dir: &Path,
    ) -> Result<()> {
        let mut tileset = BytesStart::new("tileset");
        push(&mut tileset, "firstgid", 1);
        push(&mut tileset, "name", "tiles");
        push(&mut tileset, "tilewidth", tile_size);
        push(&mut tileset, "tileheight", tile_size);
        push(&mut tileset, "tilecount", self.tileset.len());
        push(&mut tileset, "columns", 0);
        writer.write_event(Event::Start(tileset))?;

        for (id, source) in self.tileset.iter().enumerate() {
            let mut tile = BytesStart::new("tile");
            push(&mut tile, "id", id);
            writer.write_event(Event::Start(tile))?;

            let relative = source.strip_prefix(base_dir).unwrap_or(source);
            let mut image = BytesStart::new("image");
            push(&mut image, "width", tile_size);
            push(&mut image, "height", tile_size);
            push(&mut image, "source", relative.to_string_lossy());
            writer.write_event(Event::Empty(image))?;

            writer.write_event(Event::End(BytesEnd::new("tile")))?;
        }

        writer.write_event(Event::End(BytesEnd::new("tileset")))?;
        Ok(())
    }
}

fn push(element: &mut BytesStart<'_>, key: &str, value: impl ToString) {
    let value = value.to_string();
    element.push_attribute((key, value.as_str()));
}

/// Row-major, 1-based tile ids joined by commas.
pub fn csv_tile_ids(genome: &[u32]) -> String {
    genome
        .iter()
        .map(|&id| (id + 1).to_string())
        .collect::<Vec<_>>()
        .join(",")
}
