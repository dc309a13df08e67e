//! Pixel data descriptors used when reading from framebuffers.
//!
//! The format/type pair is the only "protocol" shared with the asset side of
//! the engine: an `Image2D` is an opaque blob of bytes plus the enumerants that
//! tell how to interpret it.

use crate::errors::*;
use crate::math::prelude::Vector2;

/// Components stored in each pixel.
#[repr(u8)]
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum PixelFormat {
    Red,
    RG,
    RGB,
    RGBA,
    RedInteger,
    RGInteger,
    RGBInteger,
    RGBAInteger,
    DepthComponent,
    StencilIndex,
    DepthStencil,
}

impl PixelFormat {
    /// Returns the number of components of this format.
    pub fn components(self) -> usize {
        match self {
            PixelFormat::Red
            | PixelFormat::RedInteger
            | PixelFormat::DepthComponent
            | PixelFormat::StencilIndex => 1,
            PixelFormat::RG | PixelFormat::RGInteger | PixelFormat::DepthStencil => 2,
            PixelFormat::RGB | PixelFormat::RGBInteger => 3,
            PixelFormat::RGBA | PixelFormat::RGBAInteger => 4,
        }
    }
}

/// Data type of each component, or of the whole pixel for packed types.
#[repr(u8)]
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum PixelType {
    UnsignedByte,
    Byte,
    UnsignedShort,
    Short,
    UnsignedInt,
    Int,
    HalfFloat,
    Float,
    UnsignedShort565,
    UnsignedShort4444,
    UnsignedShort5551,
    UnsignedInt2101010Rev,
    UnsignedInt248,
    Float32UnsignedInt248Rev,
}

impl PixelType {
    /// Returns the size in bytes of one component, or of the whole pixel if the
    /// type is packed.
    pub fn size(self) -> usize {
        match self {
            PixelType::UnsignedByte | PixelType::Byte => 1,
            PixelType::UnsignedShort
            | PixelType::Short
            | PixelType::HalfFloat
            | PixelType::UnsignedShort565
            | PixelType::UnsignedShort4444
            | PixelType::UnsignedShort5551 => 2,
            PixelType::UnsignedInt
            | PixelType::Int
            | PixelType::Float
            | PixelType::UnsignedInt2101010Rev
            | PixelType::UnsignedInt248 => 4,
            PixelType::Float32UnsignedInt248Rev => 8,
        }
    }

    /// Packed types store all components of a pixel in one value.
    pub fn is_packed(self) -> bool {
        match self {
            PixelType::UnsignedShort565
            | PixelType::UnsignedShort4444
            | PixelType::UnsignedShort5551
            | PixelType::UnsignedInt2101010Rev
            | PixelType::UnsignedInt248
            | PixelType::Float32UnsignedInt248Rev => true,
            _ => false,
        }
    }
}

/// Returns the size in bytes of one pixel with the given format and type.
///
/// Assumes a pack alignment of 1, which the context sets up on creation.
pub fn pixel_size(format: PixelFormat, ty: PixelType) -> usize {
    if ty.is_packed() {
        ty.size()
    } else {
        format.components() * ty.size()
    }
}

/// Returns the number of bytes needed to hold `size` pixels.
pub fn data_size(format: PixelFormat, ty: PixelType, size: Vector2<i32>) -> usize {
    if size.x <= 0 || size.y <= 0 {
        return 0;
    }

    size.x as usize * size.y as usize * pixel_size(format, ty)
}

/// A two-dimensional image living in client memory.
#[derive(Debug, Clone, PartialEq)]
pub struct Image2D {
    format: PixelFormat,
    ty: PixelType,
    size: Vector2<i32>,
    data: Vec<u8>,
}

impl Image2D {
    /// Creates an image from existing bytes. The buffer must be large enough to
    /// hold `size` pixels.
    pub fn new(format: PixelFormat, ty: PixelType, size: Vector2<i32>, data: Vec<u8>) -> Result<Self> {
        let required = data_size(format, ty, size);
        if data.len() < required {
            return Err(Error::BufferOverflow {
                required,
                actual: data.len(),
            });
        }

        Ok(Image2D {
            format,
            ty,
            size,
            data,
        })
    }

    /// Creates an image placeholder without data, to be filled by a read.
    pub fn empty(format: PixelFormat, ty: PixelType) -> Self {
        Image2D {
            format,
            ty,
            size: Vector2::new(0, 0),
            data: Vec::new(),
        }
    }

    #[inline]
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    #[inline]
    pub fn pixel_type(&self) -> PixelType {
        self.ty
    }

    #[inline]
    pub fn size(&self) -> Vector2<i32> {
        self.size
    }

    #[inline]
    pub fn pixel_size(&self) -> usize {
        pixel_size(self.format, self.ty)
    }

    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Takes the pixel data out of the image.
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    pub(crate) fn set_data(&mut self, size: Vector2<i32>, data: Vec<u8>) {
        debug_assert!(data.len() >= data_size(self.format, self.ty, size));
        self.size = size;
        self.data = data;
    }
}
