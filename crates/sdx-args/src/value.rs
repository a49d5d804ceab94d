//! The closed set of argument variants crossing the host boundary.
//!
//! The host marshals one `ArgValue` per equation argument; the runtime
//! reads them, and mutates vectors in place only for functions whose
//! descriptor says so. The scalar result of a call is written back into
//! slot 0 when slot 0 holds a scalar.

use crate::error::{ArgError, ArgResult};
use crate::lookup::LookupTable;
use crate::shape::ShapeInfo;
use sdx_core::Real;

/// Identity tag for constant-definition payloads.
pub const CONSTANT_MATRIX_KEY: u32 = 0xF722_438E;
/// Identity tag for data-definition payloads.
pub const DATA_MATRIX_KEY: u32 = 0x33F2_7413;

/// A vector/matrix argument: the legal storage window, the offset of
/// this argument's first element inside it, and the dimension metadata.
#[derive(Clone, Debug, PartialEq)]
pub struct VectorArg {
    values: Vec<Real>,
    offset: usize,
    shape: ShapeInfo,
    name: Option<String>,
}

impl VectorArg {
    /// Wrap a full storage window. `values` must cover exactly the
    /// shape's total volume and `offset` must lie inside it.
    pub fn new(values: Vec<Real>, offset: usize, shape: ShapeInfo) -> ArgResult<Self> {
        if values.len() != shape.total_volume() {
            return Err(ArgError::InvalidShape {
                what: "storage window does not match shape volume",
            });
        }
        if offset >= values.len() {
            return Err(ArgError::InvalidShape {
                what: "argument offset outside storage window",
            });
        }
        Ok(Self {
            values,
            offset,
            shape,
            name: None,
        })
    }

    /// A one-dimensional vector argument addressed from element 0.
    pub fn from_values(values: Vec<Real>) -> ArgResult<Self> {
        let shape = ShapeInfo::vector(values.len())?;
        Self::new(values, 0, shape)
    }

    /// A square matrix argument in row-major order.
    pub fn square_matrix(values: Vec<Real>, n: usize) -> ArgResult<Self> {
        Self::new(values, 0, ShapeInfo::square(n)?)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn shape(&self) -> &ShapeInfo {
        &self.shape
    }

    /// Check that elements `[first, last)` relative to this argument lie
    /// inside the legal storage window. The pair is normalized so the
    /// order of the bounds does not matter.
    pub fn validate_range(&self, first: i64, last: i64) -> ArgResult<()> {
        let (first, last) = if first > last {
            (last, first)
        } else {
            (first, last)
        };
        let volume = self.shape.total_volume() as i64;
        let offset = self.offset as i64;
        if offset + first < 0 || offset + last > volume {
            return Err(ArgError::OutOfBounds {
                first,
                last,
                volume: self.shape.total_volume(),
            });
        }
        Ok(())
    }

    /// The first `len` elements of this argument.
    pub fn span(&self, len: usize) -> ArgResult<&[Real]> {
        self.validate_range(0, len as i64)?;
        Ok(&self.values[self.offset..self.offset + len])
    }

    pub fn span_mut(&mut self, len: usize) -> ArgResult<&mut [Real]> {
        self.validate_range(0, len as i64)?;
        Ok(&mut self.values[self.offset..self.offset + len])
    }

    /// The whole storage window, for callers that computed offsets from
    /// the shape themselves.
    pub fn window(&self) -> &[Real] {
        &self.values
    }

    pub fn window_mut(&mut self) -> &mut [Real] {
        &mut self.values
    }

    /// Value of this argument's first element.
    pub fn first_value(&self) -> Real {
        self.values[self.offset]
    }
}

/// Payload of a constant-definition function: host-managed `rows x cols`
/// storage, filled by the extension at declaration time.
#[derive(Clone, Debug, PartialEq)]
pub struct ConstantMatrix {
    pub key: u32,
    pub name: Option<String>,
    pub rows: usize,
    pub cols: usize,
    /// Row-major storage; empty until the host allocates it.
    pub values: Vec<Real>,
}

impl ConstantMatrix {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            key: CONSTANT_MATRIX_KEY,
            name: None,
            rows,
            cols,
            values: Vec::new(),
        }
    }

    pub fn at(&self, row: usize, col: usize) -> Real {
        self.values[row * self.cols + col]
    }
}

/// Payload of a data-definition function: one value row per variable
/// over a host-sized time axis.
#[derive(Clone, Debug, PartialEq)]
pub struct DataMatrix {
    pub key: u32,
    pub name: Option<String>,
    pub nvar: usize,
    /// Number of time points; sized by the extension from the host's
    /// time axis at declaration time.
    pub ntime: usize,
    pub time_values: Vec<Real>,
    pub values: Vec<Vec<Real>>,
}

impl DataMatrix {
    pub fn new(nvar: usize) -> Self {
        Self {
            key: DATA_MATRIX_KEY,
            name: None,
            nvar,
            ntime: 0,
            time_values: Vec::new(),
            values: Vec::new(),
        }
    }
}

/// One marshalled argument.
#[derive(Clone, Debug, PartialEq)]
pub enum ArgValue {
    Scalar(Real),
    Vector(VectorArg),
    Lookup(LookupTable),
    Literal(String),
    ConstantDef(ConstantMatrix),
    DataDef(DataMatrix),
}

impl ArgValue {
    pub fn kind(&self) -> &'static str {
        match self {
            ArgValue::Scalar(_) => "scalar",
            ArgValue::Vector(_) => "vector",
            ArgValue::Lookup(_) => "lookup",
            ArgValue::Literal(_) => "literal",
            ArgValue::ConstantDef(_) => "constant definition",
            ArgValue::DataDef(_) => "data definition",
        }
    }
}
