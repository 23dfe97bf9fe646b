//! ESRI grid elevation rasters.
//!
//! Supports ASCII grids (`.asc`) and binary float grids (`.flt` with
//! a sibling `.hdr`). Samples are looked up by nearest cell in the
//! grid's own projected coordinates.
//!
//! # References
//!
//! 1. [ESRI ASCII raster format](https://desktop.arcgis.com/en/arcmap/latest/manage-data/raster-and-images/esri-ascii-raster-format.htm)
//! 1. [ESRI float grid](https://desktop.arcgis.com/en/arcmap/latest/tools/conversion-toolbox/raster-to-float.htm)

mod error;
mod header;

pub use crate::{
    error::DemError,
    header::{Endian, Header},
};
use byteorder::{BigEndian as BE, ByteOrder, LittleEndian as LE, ReadBytesExt};
use geo::geometry::Coord;
use log::debug;
use memmap2::Mmap;
use std::{
    ffi::OsStr,
    fs::File,
    io::BufReader,
    mem::size_of,
    path::{Path, PathBuf},
};

/// Base floating point type used for all coordinates and calculations.
///
/// Samples are stored as `f32`, as in the on-disk float grid format.
pub type C = f64;

/// How to handle grid samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GridMode {
    /// Parse samples and load into memory.
    #[default]
    InMem,

    /// Memory map file contents.
    ///
    /// Only binary float grids can be mapped, ASCII grids are always
    /// parsed into memory.
    MemMap,
}

pub struct Grid {
    header: Header,
    samples: SampleStore,
}

enum SampleStore {
    InMem(Box<[f32]>),
    MemMap(Mmap, Endian),
}

impl SampleStore {
    fn get_unchecked(&self, index: usize) -> f32 {
        match self {
            Self::InMem(samples) => samples[index],
            Self::MemMap(raw, endian) => {
                let start = index * size_of::<f32>();
                let end = start + size_of::<f32>();
                let bytes = &raw.as_ref()[start..end];
                match endian {
                    Endian::Lsb => LE::read_f32(bytes),
                    Endian::Msb => BE::read_f32(bytes),
                }
            }
        }
    }
}

impl Grid {
    /// Opens the grid at `path`, picking the format from its
    /// extension.
    pub fn open<P: AsRef<Path>>(path: P, mode: GridMode) -> Result<Self, DemError> {
        let path = path.as_ref();
        match path
            .extension()
            .and_then(OsStr::to_str)
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("asc") => {
                if mode == GridMode::MemMap {
                    debug!("{path:?} is an ASCII grid, loading into memory");
                }
                Self::load_ascii(path)
            }
            Some("flt") => match mode {
                GridMode::InMem => Self::load_float(path),
                GridMode::MemMap => Self::memmap_float(path),
            },
            _ => Err(DemError::Format(path.to_owned())),
        }
    }

    /// Returns a Grid built from an in-memory header and samples.
    ///
    /// `samples` are row-major, north row first.
    pub fn from_samples(header: Header, samples: Vec<f32>) -> Result<Self, DemError> {
        if samples.len() != header.len() {
            return Err(DemError::Header(format!(
                "{} samples for a {}x{} grid",
                samples.len(),
                header.ncols,
                header.nrows
            )));
        }
        Ok(Self {
            header,
            samples: SampleStore::InMem(samples.into_boxed_slice()),
        })
    }

    /// Returns a Grid read into memory from the ASCII grid at `path`.
    pub fn load_ascii<P: AsRef<Path>>(path: P) -> Result<Self, DemError> {
        let text = std::fs::read_to_string(path)?;
        Self::parse_ascii(&text)
    }

    /// Parses ASCII grid text.
    pub fn parse_ascii(text: &str) -> Result<Self, DemError> {
        let mut tokens = text.split_whitespace().peekable();
        let header = Header::parse_tokens(&mut tokens)?;
        let samples = tokens
            .map(|token| {
                token
                    .parse::<f32>()
                    .map_err(|_| DemError::Sample(token.to_owned()))
            })
            .collect::<Result<Vec<f32>, DemError>>()?;
        Self::from_samples(header, samples)
    }

    /// Returns a Grid read into memory from the float grid at `path`.
    pub fn load_float<P: AsRef<Path>>(path: P) -> Result<Self, DemError> {
        let path = path.as_ref();
        let header = read_hdr(path)?;
        check_len(path, &header)?;
        let mut file = BufReader::new(File::open(path)?);
        let samples = {
            let mut sample_store = vec![0.0_f32; header.len()];
            match header.endian {
                Endian::Lsb => file.read_f32_into::<LE>(&mut sample_store)?,
                Endian::Msb => file.read_f32_into::<BE>(&mut sample_store)?,
            }
            sample_store
        };
        Self::from_samples(header, samples)
    }

    /// Returns a Grid using the memory-mapped float grid as storage.
    pub fn memmap_float<P: AsRef<Path>>(path: P) -> Result<Self, DemError> {
        let path = path.as_ref();
        let header = read_hdr(path)?;
        check_len(path, &header)?;
        let samples = {
            let file = File::open(path)?;
            let mmap = unsafe { Mmap::map(&file)? };
            SampleStore::MemMap(mmap, header.endian)
        };
        Ok(Self { header, samples })
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Returns the cell size in the grid's native linear unit.
    pub fn cell_size(&self) -> C {
        self.header.cell_size
    }

    /// Returns the number of samples in this grid.
    pub fn len(&self) -> usize {
        self.header.len()
    }

    pub fn is_empty(&self) -> bool {
        self.header.is_empty()
    }

    /// Returns the sample of the cell containing `coord`.
    ///
    /// `None` when `coord` is outside the grid or the cell holds no
    /// data.
    pub fn get(&self, coord: Coord<C>) -> Option<f32> {
        let (col, row) = self.coord_to_col_row(coord)?;
        let sample = self
            .samples
            .get_unchecked(row * self.header.ncols + col);
        #[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
        let is_nodata = sample.is_nan() || sample == self.header.nodata as f32;
        (!is_nodata).then_some(sample)
    }
}

/// Private API
impl Grid {
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss,
        clippy::cast_sign_loss
    )]
    fn coord_to_col_row(&self, Coord { x, y }: Coord<C>) -> Option<(usize, usize)> {
        let Header {
            ncols,
            nrows,
            xll,
            cell_size,
            ..
        } = self.header;
        let col = ((x - xll) / cell_size).floor();
        let row = ((self.header.y_top() - y) / cell_size).floor();
        if col.is_finite()
            && row.is_finite()
            && 0.0 <= col
            && col < ncols as C
            && 0.0 <= row
            && row < nrows as C
        {
            Some((col as usize, row as usize))
        } else {
            None
        }
    }
}

fn hdr_path(path: &Path) -> PathBuf {
    path.with_extension("hdr")
}

fn read_hdr(path: &Path) -> Result<Header, DemError> {
    let hdr = hdr_path(path);
    debug!("reading grid header {hdr:?}");
    Header::parse(&std::fs::read_to_string(hdr)?)
}

fn check_len(path: &Path, header: &Header) -> Result<(), DemError> {
    let expected = (header.len() * size_of::<f32>()) as u64;
    match path.metadata().map(|m| m.len())? {
        actual if actual == expected => Ok(()),
        actual => Err(DemError::Len {
            actual,
            expected,
            path: path.to_owned(),
        }),
    }
}
