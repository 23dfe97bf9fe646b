//! ESRI grid header (`.asc` preamble and `.hdr` sidecar).

use crate::{DemError, C};
use log::debug;
use std::{iter::Peekable, str::SplitWhitespace};

/// Byte order of binary float grid samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Endian {
    #[default]
    Lsb,
    Msb,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Header {
    /// Number of columns (west to east).
    pub ncols: usize,

    /// Number of rows (north to south).
    pub nrows: usize,

    /// X of the lower-left corner of the lower-left cell.
    ///
    /// Note: this is always the cell _corner_, `xllcenter` headers
    /// are shifted by half a cell while parsing.
    pub xll: C,

    /// Y of the lower-left corner of the lower-left cell.
    pub yll: C,

    /// Cell width and height in the grid's native linear unit.
    pub cell_size: C,

    /// Sentinel for cells without elevation.
    pub nodata: C,

    /// Only meaningful for binary float grids.
    pub endian: Endian,
}

impl Header {
    /// Default `NODATA_value` when a header doesn't declare one.
    pub const DEFAULT_NODATA: C = -9999.0;

    /// Returns the number of samples described by this header.
    pub fn len(&self) -> usize {
        self.ncols * self.nrows
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Y of the upper edge of the top row.
    pub fn y_top(&self) -> C {
        #[allow(clippy::cast_precision_loss)]
        let height = self.nrows as C * self.cell_size;
        self.yll + height
    }

    /// Parses a complete `.hdr` sidecar.
    pub fn parse(text: &str) -> Result<Self, DemError> {
        let mut tokens = text.split_whitespace().peekable();
        let header = Self::parse_tokens(&mut tokens)?;
        if let Some(extra) = tokens.next() {
            return Err(DemError::Header(format!("unexpected token {extra:?}")));
        }
        Ok(header)
    }

    /// Consumes `key value` pairs until the next token is not a key.
    ///
    /// ASCII grids have no header terminator, the first numeric token
    /// is the first sample.
    pub(crate) fn parse_tokens(tokens: &mut Peekable<SplitWhitespace<'_>>) -> Result<Self, DemError> {
        let mut ncols = None;
        let mut nrows = None;
        let mut x = None;
        let mut y = None;
        let mut cell_size = None;
        let mut nodata = Self::DEFAULT_NODATA;
        let mut endian = Endian::default();

        // Samples may be written as `nan` or `inf`, which start with a
        // letter but parse as numbers.
        while let Some(key) = tokens.next_if(|t| t.parse::<f64>().is_err()) {
            let value = tokens
                .next()
                .ok_or_else(|| DemError::Header(format!("missing value for {key}")))?;
            match key.to_ascii_lowercase().as_str() {
                "ncols" => ncols = Some(parse_count(key, value)?),
                "nrows" => nrows = Some(parse_count(key, value)?),
                "xllcorner" => x = Some(Anchor::Corner(parse_num(key, value)?)),
                "xllcenter" => x = Some(Anchor::Center(parse_num(key, value)?)),
                "yllcorner" => y = Some(Anchor::Corner(parse_num(key, value)?)),
                "yllcenter" => y = Some(Anchor::Center(parse_num(key, value)?)),
                "cellsize" => cell_size = Some(parse_num(key, value)?),
                "nodata_value" | "nodata" => nodata = parse_num(key, value)?,
                "byteorder" => {
                    endian = match value.to_ascii_uppercase().as_str() {
                        "LSBFIRST" | "I" => Endian::Lsb,
                        "MSBFIRST" | "M" => Endian::Msb,
                        _ => return Err(DemError::Header(format!("invalid byteorder {value}"))),
                    }
                }
                _ => debug!("ignoring grid header key {key}"),
            }
        }

        let missing = |key: &str| DemError::Header(format!("missing {key}"));
        let ncols = ncols.ok_or_else(|| missing("ncols"))?;
        let nrows = nrows.ok_or_else(|| missing("nrows"))?;
        let cell_size = cell_size.ok_or_else(|| missing("cellsize"))?;
        if cell_size <= 0.0 || !cell_size.is_finite() {
            return Err(DemError::Header(format!("invalid cellsize {cell_size}")));
        }
        let xll = x.ok_or_else(|| missing("xllcorner"))?.corner(cell_size);
        let yll = y.ok_or_else(|| missing("yllcorner"))?.corner(cell_size);

        Ok(Self {
            ncols,
            nrows,
            xll,
            yll,
            cell_size,
            nodata,
            endian,
        })
    }
}

enum Anchor {
    Corner(C),
    Center(C),
}

impl Anchor {
    fn corner(self, cell_size: C) -> C {
        match self {
            Self::Corner(v) => v,
            Self::Center(v) => v - cell_size / 2.0,
        }
    }
}

fn parse_num(key: &str, value: &str) -> Result<C, DemError> {
    value
        .parse::<C>()
        .map_err(|_| DemError::Header(format!("invalid {key} {value}")))
}

fn parse_count(key: &str, value: &str) -> Result<usize, DemError> {
    value
        .parse::<usize>()
        .map_err(|_| DemError::Header(format!("invalid {key} {value}")))
}
