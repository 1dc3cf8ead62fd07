use crate::error::{Result, TilemapError};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

/// Parsed tile-map document.
#[derive(Debug, Clone, PartialEq)]
pub struct TileMapDocument {
    pub version: String,
    pub orientation: String,
    pub width: usize,
    pub height: usize,
    pub tile_width: u32,
    pub tile_height: u32,
    pub tilesets: Vec<TilesetInfo>,
    pub layers: Vec<TileLayerData>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TilesetInfo {
    pub first_gid: u32,
    pub name: String,
    pub image_sources: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TileLayerData {
    pub name: String,
    pub width: usize,
    pub height: usize,
    /// Row-major global tile ids as written (1-based, 0 = empty).
    pub data: Vec<u32>,
}

pub fn read_map<P: AsRef<Path>>(path: P) -> Result<TileMapDocument> {
    let text = std::fs::read_to_string(path)?;
    parse_map(&text)
}

/// Parse a TMX document with CSV-encoded layers.
pub fn parse_map(text: &str) -> Result<TileMapDocument> {
    let mut reader = Reader::from_str(text);
    let mut document: Option<TileMapDocument> = None;
    let mut tileset: Option<TilesetInfo> = None;
    let mut layer: Option<TileLayerData> = None;
    let mut csv: Option<String> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.name().as_ref() {
                b"map" => document = Some(map_header(&e)?),
                b"tileset" => tileset = Some(tileset_header(&e)?),
                b"image" => push_image(&mut tileset, &e)?,
                b"layer" => layer = Some(layer_header(&e)?),
                b"data" => {
                    let attrs = attributes(&e)?;
                    match attrs.get("encoding").map(String::as_str) {
                        Some("csv") => csv = Some(String::new()),
                        other => {
                            return Err(TilemapError::MapFormat(format!(
                                "unsupported layer encoding {:?}",
                                other
                            )))
                        }
                    }
                }
                _ => {}
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"image" => push_image(&mut tileset, &e)?,
                b"tileset" => push_tileset(&mut document, tileset_header(&e)?)?,
                b"layer" => push_layer(&mut document, layer_header(&e)?)?,
                _ => {}
            },
            Event::Text(t) => {
                if let Some(buffer) = csv.as_mut() {
                    buffer.push_str(&t.unescape()?);
                }
            }
            Event::End(e) => match e.name().as_ref() {
                b"data" => {
                    if let (Some(buffer), Some(current)) = (csv.take(), layer.as_mut()) {
                        current.data = parse_csv(&buffer)?;
                    }
                }
                b"layer" => {
                    if let Some(current) = layer.take() {
                        push_layer(&mut document, current)?;
                    }
                }
                b"tileset" => {
                    if let Some(current) = tileset.take() {
                        push_tileset(&mut document, current)?;
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    document.ok_or_else(|| TilemapError::MapFormat("missing <map> element".to_string()))
}

fn map_header(e: &BytesStart<'_>) -> Result<TileMapDocument> {
    let attrs = attributes(e)?;
    Ok(TileMapDocument {
        version: required(&attrs, "version", "map")?,
        orientation: required(&attrs, "orientation", "map")?,
        width: required(&attrs, "width", "map")?,
        height: required(&attrs, "height", "map")?,
        tile_width: required(&attrs, "tilewidth", "map")?,
        tile_height: required(&attrs, "tileheight", "map")?,
        tilesets: Vec::new(),
        layers: Vec::new(),
    })
}

fn tileset_header(e: &BytesStart<'_>) -> Result<TilesetInfo> {
    let attrs = attributes(e)?;
    Ok(TilesetInfo {
        first_gid: required(&attrs, "firstgid", "tileset")?,
        name: attrs.get("name").cloned().unwrap_or_default(),
        image_sources: Vec::new(),
    })
}

fn layer_header(e: &BytesStart<'_>) -> Result<TileLayerData> {
    let attrs = attributes(e)?;
    Ok(TileLayerData {
        name: attrs.get("name").cloned().unwrap_or_default(),
        width: required(&attrs, "width", "layer")?,
        height: required(&attrs, "height", "layer")?,
        data: Vec::new(),
    })
}

fn push_image(tileset: &mut Option<TilesetInfo>, e: &BytesStart<'_>) -> Result<()> {
    if let Some(current) = tileset.as_mut() {
        let attrs = attributes(e)?;
        current.image_sources.push(required(&attrs, "source", "image")?);
    }
    Ok(())
}

fn push_layer(document: &mut Option<TileMapDocument>, layer: TileLayerData) -> Result<()> {
    document
        .as_mut()
        .ok_or_else(|| TilemapError::MapFormat("<layer> outside <map>".to_string()))?
        .layers
        .push(layer);
    Ok(())
}

fn push_tileset(document: &mut Option<TileMapDocument>, tileset: TilesetInfo) -> Result<()> {
    document
        .as_mut()
        .ok_or_else(|| TilemapError::MapFormat("<tileset> outside <map>".to_string()))?
        .tilesets
        .push(tileset);
    Ok(())
}

fn attributes(e: &BytesStart<'_>) -> Result<HashMap<String, String>> {
    let mut map = HashMap::new();
    for attr in e.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        map.insert(key, attr.unescape_value()?.into_owned());
    }
    Ok(map)
}

fn required<T: FromStr>(attrs: &HashMap<String, String>, key: &str, element: &str) -> Result<T> {
    let raw = attrs.get(key).ok_or_else(|| {
        TilemapError::MapFormat(format!("<{}> is missing the {} attribute", element, key))
    })?;
    raw.parse().map_err(|_| {
        TilemapError::MapFormat(format!("<{}> has an invalid {} value {:?}", element, key, raw))
    })
}

fn parse_csv(text: &str) -> Result<Vec<u32>> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse()
                .map_err(|_| TilemapError::MapFormat(format!("invalid tile id {:?}", s)))
        })
        .collect()
}
