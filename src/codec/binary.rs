//! Legacy binary layout blobs.
//!
//! Layout: `version:u16 id:u16 type:u8` header, then a type-specific body.
//! All multi-byte integers are big-endian.
//!
//! - canvas: `ref_width:u16 ref_height:u16 count:u8` then `count` groups of
//!   `x:u16 y:u16 width:u16 height:u16`
//! - grid: `rows:u8 columns:u8`, `rows` row percents (`u16`), `columns`
//!   column percents (`u16`), then `rows * columns` cell bytes, row-major

use crate::geometry::{Rect, Size};
use crate::layout::{CanvasLayout, GridLayout, LayoutId};

use super::CodecError;

pub const HEADER_LEN: usize = 5;
pub const LATEST_VERSION: u16 = 0;
pub const TYPE_GRID: u8 = 0;
pub const TYPE_CANVAS: u8 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlobHeader {
    pub version: u16,
    pub id: LayoutId,
    pub type_byte: u8,
}

struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn require(&self, total: usize) -> Result<(), CodecError> {
        if self.data.len() < total {
            return Err(CodecError::Truncated {
                needed: total,
                available: self.data.len(),
            });
        }
        Ok(())
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], CodecError> {
        self.require(self.pos + len)?;
        let slice = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    fn u8(&mut self) -> Result<u8, CodecError> {
        Ok(self.take(1)?[0])
    }

    fn u16(&mut self) -> Result<u16, CodecError> {
        let bytes = self.take(2)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    fn i32_from_u16(&mut self) -> Result<i32, CodecError> {
        self.u16().map(i32::from)
    }
}

pub fn read_header(data: &[u8]) -> Result<BlobHeader, CodecError> {
    let mut reader = Reader::new(data);
    Ok(BlobHeader {
        version: reader.u16()?,
        id: reader.u16()?,
        type_byte: reader.u8()?,
    })
}

pub fn decode_canvas(data: &[u8]) -> Result<CanvasLayout, CodecError> {
    let mut reader = Reader::new(data);
    reader.require(HEADER_LEN + 5)?;
    reader.pos = HEADER_LEN;

    let width = reader.i32_from_u16()?;
    let height = reader.i32_from_u16()?;
    let count = reader.u8()? as usize;
    reader.require(HEADER_LEN + 5 + count * 8)?;

    let mut zones = Vec::with_capacity(count);
    for _ in 0..count {
        zones.push(Rect::new(
            reader.i32_from_u16()?,
            reader.i32_from_u16()?,
            reader.i32_from_u16()?,
            reader.i32_from_u16()?,
        ));
    }
    Ok(CanvasLayout::with_zones(Size::new(width, height), zones))
}

pub fn decode_grid(data: &[u8]) -> Result<GridLayout, CodecError> {
    let mut reader = Reader::new(data);
    reader.require(HEADER_LEN + 2)?;
    reader.pos = HEADER_LEN;

    let rows = reader.u8()? as usize;
    let columns = reader.u8()? as usize;
    reader.require(HEADER_LEN + 2 + 2 * rows + 2 * columns + rows * columns)?;

    let row_percents = (0..rows)
        .map(|_| reader.i32_from_u16())
        .collect::<Result<Vec<_>, _>>()?;
    let column_percents = (0..columns)
        .map(|_| reader.i32_from_u16())
        .collect::<Result<Vec<_>, _>>()?;
    let mut cell_child_map = Vec::with_capacity(rows);
    for _ in 0..rows {
        let cells = reader.take(columns)?;
        cell_child_map.push(cells.iter().map(|b| i32::from(*b)).collect());
    }

    Ok(GridLayout::new(
        rows as i32,
        columns as i32,
        row_percents,
        column_percents,
        cell_child_map,
    )?)
}

fn push_header(out: &mut Vec<u8>, id: LayoutId, type_byte: u8) {
    out.extend_from_slice(&LATEST_VERSION.to_be_bytes());
    out.extend_from_slice(&id.to_be_bytes());
    out.push(type_byte);
}

fn to_u8(field: &'static str, value: i32) -> Result<u8, CodecError> {
    u8::try_from(value).map_err(|_| CodecError::ValueOutOfRange {
        field,
        value: i64::from(value),
    })
}

fn to_u16(field: &'static str, value: i32) -> Result<[u8; 2], CodecError> {
    u16::try_from(value)
        .map(u16::to_be_bytes)
        .map_err(|_| CodecError::ValueOutOfRange {
            field,
            value: i64::from(value),
        })
}

pub fn encode_canvas(canvas: &CanvasLayout, id: LayoutId) -> Result<Vec<u8>, CodecError> {
    let count = u8::try_from(canvas.zones().len()).map_err(|_| CodecError::ValueOutOfRange {
        field: "zones",
        value: canvas.zones().len() as i64,
    })?;
    let mut out = Vec::with_capacity(HEADER_LEN + 5 + usize::from(count) * 8);
    push_header(&mut out, id, TYPE_CANVAS);
    out.extend_from_slice(&to_u16("ref-width", canvas.reference_width())?);
    out.extend_from_slice(&to_u16("ref-height", canvas.reference_height())?);
    out.push(count);
    for zone in canvas.zones() {
        out.extend_from_slice(&to_u16("X", zone.x)?);
        out.extend_from_slice(&to_u16("Y", zone.y)?);
        out.extend_from_slice(&to_u16("width", zone.width)?);
        out.extend_from_slice(&to_u16("height", zone.height)?);
    }
    Ok(out)
}

pub fn encode_grid(grid: &GridLayout, id: LayoutId) -> Result<Vec<u8>, CodecError> {
    let mut out = Vec::new();
    push_header(&mut out, id, TYPE_GRID);
    out.push(to_u8("rows", grid.rows())?);
    out.push(to_u8("columns", grid.columns())?);
    for percent in grid.row_percents() {
        out.extend_from_slice(&to_u16("rows-percentage", *percent)?);
    }
    for percent in grid.column_percents() {
        out.extend_from_slice(&to_u16("columns-percentage", *percent)?);
    }
    for cell in grid.compacted_cell_child_map().iter().flatten() {
        out.push(to_u8("cell-child-map", *cell)?);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::PRIORITY_GRID_BLOBS;

    #[test]
    fn decodes_two_column_grid() {
        let blob = [0, 0, 0, 0, 0, 1, 2, 39, 16, 26, 11, 13, 5, 0, 1];
        let grid = decode_grid(&blob).unwrap();
        assert_eq!(grid.rows(), 1);
        assert_eq!(grid.columns(), 2);
        assert_eq!(grid.row_percents(), &[10000]);
        assert_eq!(grid.column_percents(), &[6667, 3333]);
        assert_eq!(grid.cell_child_map(), &[vec![0, 1]]);
    }

    #[test]
    fn truncated_grid_reports_required_length() {
        let blob = [0, 0, 0, 0, 0, 2, 2, 19, 136, 19, 136, 19, 136];
        match decode_grid(&blob).unwrap_err() {
            CodecError::Truncated { needed, available } => {
                assert_eq!(needed, 5 + 2 + 4 + 4 + 4);
                assert_eq!(available, blob.len());
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(matches!(
            decode_grid(&[0, 0, 0]),
            Err(CodecError::Truncated { needed: 7, .. })
        ));
    }

    #[test]
    fn zero_rows_is_rejected() {
        let blob = [0, 0, 0, 0, 0, 0, 1, 39, 16];
        assert!(matches!(decode_grid(&blob), Err(CodecError::Grid(_))));
    }

    #[test]
    fn canvas_blob_matches_encoder() {
        let canvas = CanvasLayout::with_zones(
            Size::new(1920, 1080),
            vec![Rect::new(0, 0, 960, 1080), Rect::new(960, 0, 960, 540)],
        );
        let blob = encode_canvas(&canvas, 7).unwrap();
        assert_eq!(
            read_header(&blob).unwrap(),
            BlobHeader {
                version: LATEST_VERSION,
                id: 7,
                type_byte: TYPE_CANVAS,
            }
        );
        assert_eq!(&blob[5..10], &[7, 128, 4, 56, 2]);
        assert_eq!(decode_canvas(&blob).unwrap(), canvas);
        assert!(matches!(
            decode_canvas(&blob[..blob.len() - 1]),
            Err(CodecError::Truncated { .. })
        ));
    }

    #[test]
    fn priority_blobs_re_encode_byte_for_byte() {
        for (i, blob) in PRIORITY_GRID_BLOBS.iter().enumerate() {
            let grid = decode_grid(blob).unwrap();
            assert_eq!(encode_grid(&grid, 0).unwrap(), blob.to_vec(), "blob {}", i + 1);
        }
    }

    #[test]
    fn grid_encoder_writes_compacted_map() {
        let mut grid = GridLayout::new(
            1,
            3,
            vec![10000],
            vec![3334, 3333, 3333],
            vec![vec![0, 1, 2]],
        )
        .unwrap();
        grid.merge_cells(0, 1);
        let blob = encode_grid(&grid, 9).unwrap();
        assert_eq!(read_header(&blob).unwrap().type_byte, TYPE_GRID);
        assert_eq!(&blob[blob.len() - 3..], &[0, 0, 1]);
        assert_eq!(decode_grid(&blob).unwrap().cell_child_map(), &[vec![0, 0, 1]]);
    }

    #[test]
    fn grid_encoder_rejects_values_outside_legacy_range() {
        let wide_index = GridLayout::new(1, 1, vec![10000], vec![10000], vec![vec![256]]).unwrap();
        assert!(matches!(
            encode_grid(&wide_index, 1),
            Err(CodecError::ValueOutOfRange { field: "cell-child-map", value: 256 })
        ));

        let tall = GridLayout::new(256, 1, vec![1; 256], vec![10000], vec![vec![0]; 256]).unwrap();
        assert!(matches!(
            encode_grid(&tall, 1),
            Err(CodecError::ValueOutOfRange { field: "rows", value: 256 })
        ));

        let negative = GridLayout::new(1, 1, vec![-1], vec![10000], vec![vec![0]]).unwrap();
        assert!(matches!(
            encode_grid(&negative, 1),
            Err(CodecError::ValueOutOfRange { field: "rows-percentage", value: -1 })
        ));
    }

    #[test]
    fn encoder_rejects_values_outside_legacy_range() {
        let canvas = CanvasLayout::with_zones(Size::new(100, 100), vec![Rect::new(-1, 0, 1, 1)]);
        assert!(matches!(
            encode_canvas(&canvas, 1),
            Err(CodecError::ValueOutOfRange { field: "X", value: -1 })
        ));
    }
}
