use bitflags::bitflags;

use crate::backends::ObjectId;

/// Binding points of framebuffers. Read and draw are independent, so one
/// framebuffer may occupy both at the same time.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum FramebufferTarget {
    Read,
    Draw,
}

bitflags! {
    /// Buffers affected by `clear`.
    #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
    pub struct ClearMask: u32 {
        const COLOR   = 0b001;
        const DEPTH   = 0b010;
        const STENCIL = 0b100;
    }
}

bitflags! {
    /// Buffers copied by `blit`.
    #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
    pub struct BlitMask: u32 {
        const COLOR   = 0b001;
        const DEPTH   = 0b010;
        const STENCIL = 0b100;
    }
}

/// Filtering applied when the source and destination rectangles of a blit
/// differ in size.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum BlitFilter {
    Nearest,
    Linear,
}

/// Attachment points of a framebuffer.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum BufferAttachment {
    Color(u32),
    Depth,
    Stencil,
    DepthStencil,
}

/// Color buffers that fragment outputs or reads may be routed to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum DrawAttachment {
    None,
    Color(u32),
}

/// Attachments whose contents may be discarded by `invalidate`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum InvalidationAttachment {
    Color(u32),
    Depth,
    Stencil,
}

/// Faces of a cube map texture.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum CubeMapFace {
    PositiveX,
    NegativeX,
    PositiveY,
    NegativeY,
    PositiveZ,
    NegativeZ,
}

/// Texture images which can be attached to a framebuffer.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TextureTarget {
    Texture2D,
    Rectangle,
    Multisample2D,
    CubeMap(CubeMapFace),
    /// A single layer of an array or 3D texture.
    Layer(i32),
}

/// The object an attachment point refers to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum AttachmentSource {
    Renderbuffer(ObjectId),
    Texture {
        target: TextureTarget,
        id: ObjectId,
        level: i32,
    },
}

/// Completeness status of a framebuffer.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum FramebufferStatus {
    Complete,
    IncompleteAttachment,
    IncompleteMissingAttachment,
    IncompleteDrawBuffer,
    IncompleteReadBuffer,
    Unsupported,
    IncompleteMultisample,
    IncompleteLayerTargets,
    Undefined,
}

impl From<ClearMask> for BlitMask {
    fn from(mask: ClearMask) -> Self {
        BlitMask::from_bits_truncate(mask.bits())
    }
}
