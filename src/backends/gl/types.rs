use gl::types::*;

use super::super::{IntegerName, ObjectKind, StringName};
use crate::buffer::BufferUsage;
use crate::errors::DriverError;
use crate::framebuffer::{
    BlitFilter, BlitMask, BufferAttachment, ClearMask, CubeMapFace, DrawAttachment,
    FramebufferStatus, FramebufferTarget, InvalidationAttachment, TextureTarget,
};
use crate::image::{PixelFormat, PixelType};
use crate::renderbuffer::RenderbufferFormat;
use crate::transform_feedback::PrimitiveMode;

impl From<StringName> for GLenum {
    fn from(name: StringName) -> Self {
        match name {
            StringName::Vendor => gl::VENDOR,
            StringName::Renderer => gl::RENDERER,
            StringName::Version => gl::VERSION,
            StringName::ShadingLanguageVersion => gl::SHADING_LANGUAGE_VERSION,
            StringName::Extensions => gl::EXTENSIONS,
        }
    }
}

impl From<IntegerName> for GLenum {
    fn from(name: IntegerName) -> Self {
        match name {
            IntegerName::NumExtensions => gl::NUM_EXTENSIONS,
            IntegerName::ContextFlags => gl::CONTEXT_FLAGS,
            IntegerName::ContextProfileMask => gl::CONTEXT_PROFILE_MASK,
            IntegerName::MaxViewportDims => gl::MAX_VIEWPORT_DIMS,
            IntegerName::MaxColorAttachments => gl::MAX_COLOR_ATTACHMENTS,
            IntegerName::MaxDrawBuffers => gl::MAX_DRAW_BUFFERS,
            IntegerName::MaxRenderbufferSize => gl::MAX_RENDERBUFFER_SIZE,
            IntegerName::MaxSamples => gl::MAX_SAMPLES,
            IntegerName::MaxTransformFeedbackSeparateAttribs => {
                gl::MAX_TRANSFORM_FEEDBACK_SEPARATE_ATTRIBS
            }
            IntegerName::MaxTransformFeedbackInterleavedComponents => {
                gl::MAX_TRANSFORM_FEEDBACK_INTERLEAVED_COMPONENTS
            }
            IntegerName::MaxTransformFeedbackBuffers => gl::MAX_TRANSFORM_FEEDBACK_BUFFERS,
        }
    }
}

impl From<ObjectKind> for GLenum {
    fn from(kind: ObjectKind) -> Self {
        match kind {
            ObjectKind::Framebuffer => gl::FRAMEBUFFER,
            ObjectKind::Renderbuffer => gl::RENDERBUFFER,
            ObjectKind::TransformFeedback => gl::TRANSFORM_FEEDBACK,
            ObjectKind::Buffer => gl::BUFFER,
        }
    }
}

impl From<FramebufferTarget> for GLenum {
    fn from(target: FramebufferTarget) -> Self {
        match target {
            FramebufferTarget::Read => gl::READ_FRAMEBUFFER,
            FramebufferTarget::Draw => gl::DRAW_FRAMEBUFFER,
        }
    }
}

impl From<ClearMask> for GLbitfield {
    fn from(mask: ClearMask) -> Self {
        let mut bits = 0;
        if mask.contains(ClearMask::COLOR) {
            bits |= gl::COLOR_BUFFER_BIT;
        }

        if mask.contains(ClearMask::DEPTH) {
            bits |= gl::DEPTH_BUFFER_BIT;
        }

        if mask.contains(ClearMask::STENCIL) {
            bits |= gl::STENCIL_BUFFER_BIT;
        }

        bits
    }
}

impl From<BlitMask> for GLbitfield {
    fn from(mask: BlitMask) -> Self {
        ClearMask::from_bits_truncate(mask.bits()).into()
    }
}

impl From<BlitFilter> for GLenum {
    fn from(filter: BlitFilter) -> Self {
        match filter {
            BlitFilter::Nearest => gl::NEAREST,
            BlitFilter::Linear => gl::LINEAR,
        }
    }
}

impl From<BufferAttachment> for GLenum {
    fn from(attachment: BufferAttachment) -> Self {
        match attachment {
            BufferAttachment::Color(i) => gl::COLOR_ATTACHMENT0 + i,
            BufferAttachment::Depth => gl::DEPTH_ATTACHMENT,
            BufferAttachment::Stencil => gl::STENCIL_ATTACHMENT,
            BufferAttachment::DepthStencil => gl::DEPTH_STENCIL_ATTACHMENT,
        }
    }
}

impl From<DrawAttachment> for GLenum {
    fn from(attachment: DrawAttachment) -> Self {
        match attachment {
            DrawAttachment::None => gl::NONE,
            DrawAttachment::Color(i) => gl::COLOR_ATTACHMENT0 + i,
        }
    }
}

/// The default framebuffer names its buffers differently than framebuffer
/// objects do.
pub fn invalidation_attachment(attachment: InvalidationAttachment, default: bool) -> GLenum {
    match (attachment, default) {
        (InvalidationAttachment::Color(_), true) => gl::COLOR,
        (InvalidationAttachment::Depth, true) => gl::DEPTH,
        (InvalidationAttachment::Stencil, true) => gl::STENCIL,
        (InvalidationAttachment::Color(i), false) => gl::COLOR_ATTACHMENT0 + i,
        (InvalidationAttachment::Depth, false) => gl::DEPTH_ATTACHMENT,
        (InvalidationAttachment::Stencil, false) => gl::STENCIL_ATTACHMENT,
    }
}

impl From<CubeMapFace> for GLenum {
    fn from(face: CubeMapFace) -> Self {
        match face {
            CubeMapFace::PositiveX => gl::TEXTURE_CUBE_MAP_POSITIVE_X,
            CubeMapFace::NegativeX => gl::TEXTURE_CUBE_MAP_NEGATIVE_X,
            CubeMapFace::PositiveY => gl::TEXTURE_CUBE_MAP_POSITIVE_Y,
            CubeMapFace::NegativeY => gl::TEXTURE_CUBE_MAP_NEGATIVE_Y,
            CubeMapFace::PositiveZ => gl::TEXTURE_CUBE_MAP_POSITIVE_Z,
            CubeMapFace::NegativeZ => gl::TEXTURE_CUBE_MAP_NEGATIVE_Z,
        }
    }
}

/// Returns the texture target of an attachment. Layers are attached through
/// a separate entry point which takes no target.
pub fn texture_target(texture: TextureTarget) -> GLenum {
    match texture {
        TextureTarget::Texture2D => gl::TEXTURE_2D,
        TextureTarget::Rectangle => gl::TEXTURE_RECTANGLE,
        TextureTarget::Multisample2D => gl::TEXTURE_2D_MULTISAMPLE,
        TextureTarget::CubeMap(face) => face.into(),
        TextureTarget::Layer(_) => gl::TEXTURE_2D_ARRAY,
    }
}

/// Returns the layer index used by the direct state access form, cube map
/// faces are layers there.
pub fn texture_layer(texture: TextureTarget) -> Option<GLint> {
    match texture {
        TextureTarget::Layer(layer) => Some(layer),
        TextureTarget::CubeMap(face) => Some(face as GLint),
        _ => None,
    }
}

impl From<PixelFormat> for GLenum {
    fn from(format: PixelFormat) -> Self {
        match format {
            PixelFormat::Red => gl::RED,
            PixelFormat::RG => gl::RG,
            PixelFormat::RGB => gl::RGB,
            PixelFormat::RGBA => gl::RGBA,
            PixelFormat::RedInteger => gl::RED_INTEGER,
            PixelFormat::RGInteger => gl::RG_INTEGER,
            PixelFormat::RGBInteger => gl::RGB_INTEGER,
            PixelFormat::RGBAInteger => gl::RGBA_INTEGER,
            PixelFormat::DepthComponent => gl::DEPTH_COMPONENT,
            PixelFormat::StencilIndex => gl::STENCIL_INDEX,
            PixelFormat::DepthStencil => gl::DEPTH_STENCIL,
        }
    }
}

impl From<PixelType> for GLenum {
    fn from(ty: PixelType) -> Self {
        match ty {
            PixelType::UnsignedByte => gl::UNSIGNED_BYTE,
            PixelType::Byte => gl::BYTE,
            PixelType::UnsignedShort => gl::UNSIGNED_SHORT,
            PixelType::Short => gl::SHORT,
            PixelType::UnsignedInt => gl::UNSIGNED_INT,
            PixelType::Int => gl::INT,
            PixelType::HalfFloat => gl::HALF_FLOAT,
            PixelType::Float => gl::FLOAT,
            PixelType::UnsignedShort565 => gl::UNSIGNED_SHORT_5_6_5,
            PixelType::UnsignedShort4444 => gl::UNSIGNED_SHORT_4_4_4_4,
            PixelType::UnsignedShort5551 => gl::UNSIGNED_SHORT_5_5_5_1,
            PixelType::UnsignedInt2101010Rev => gl::UNSIGNED_INT_2_10_10_10_REV,
            PixelType::UnsignedInt248 => gl::UNSIGNED_INT_24_8,
            PixelType::Float32UnsignedInt248Rev => gl::FLOAT_32_UNSIGNED_INT_24_8_REV,
        }
    }
}

impl From<RenderbufferFormat> for GLenum {
    fn from(format: RenderbufferFormat) -> Self {
        match format {
            RenderbufferFormat::R8 => gl::R8,
            RenderbufferFormat::RG8 => gl::RG8,
            RenderbufferFormat::RGB8 => gl::RGB8,
            RenderbufferFormat::RGBA8 => gl::RGBA8,
            RenderbufferFormat::SRGB8Alpha8 => gl::SRGB8_ALPHA8,
            RenderbufferFormat::RGBA16F => gl::RGBA16F,
            RenderbufferFormat::RGBA32F => gl::RGBA32F,
            RenderbufferFormat::Depth16 => gl::DEPTH_COMPONENT16,
            RenderbufferFormat::Depth24 => gl::DEPTH_COMPONENT24,
            RenderbufferFormat::Depth32F => gl::DEPTH_COMPONENT32F,
            RenderbufferFormat::Stencil8 => gl::STENCIL_INDEX8,
            RenderbufferFormat::Depth24Stencil8 => gl::DEPTH24_STENCIL8,
            RenderbufferFormat::Depth32FStencil8 => gl::DEPTH32F_STENCIL8,
        }
    }
}

impl From<BufferUsage> for GLenum {
    fn from(usage: BufferUsage) -> Self {
        match usage {
            BufferUsage::StreamDraw => gl::STREAM_DRAW,
            BufferUsage::StreamRead => gl::STREAM_READ,
            BufferUsage::StreamCopy => gl::STREAM_COPY,
            BufferUsage::StaticDraw => gl::STATIC_DRAW,
            BufferUsage::StaticRead => gl::STATIC_READ,
            BufferUsage::StaticCopy => gl::STATIC_COPY,
            BufferUsage::DynamicDraw => gl::DYNAMIC_DRAW,
            BufferUsage::DynamicRead => gl::DYNAMIC_READ,
            BufferUsage::DynamicCopy => gl::DYNAMIC_COPY,
        }
    }
}

impl From<PrimitiveMode> for GLenum {
    fn from(mode: PrimitiveMode) -> Self {
        match mode {
            PrimitiveMode::Points => gl::POINTS,
            PrimitiveMode::Lines => gl::LINES,
            PrimitiveMode::Triangles => gl::TRIANGLES,
        }
    }
}

pub fn framebuffer_status(status: GLenum) -> FramebufferStatus {
    match status {
        gl::FRAMEBUFFER_COMPLETE => FramebufferStatus::Complete,
        gl::FRAMEBUFFER_INCOMPLETE_ATTACHMENT => FramebufferStatus::IncompleteAttachment,
        gl::FRAMEBUFFER_INCOMPLETE_MISSING_ATTACHMENT => {
            FramebufferStatus::IncompleteMissingAttachment
        }
        gl::FRAMEBUFFER_INCOMPLETE_DRAW_BUFFER => FramebufferStatus::IncompleteDrawBuffer,
        gl::FRAMEBUFFER_INCOMPLETE_READ_BUFFER => FramebufferStatus::IncompleteReadBuffer,
        gl::FRAMEBUFFER_UNSUPPORTED => FramebufferStatus::Unsupported,
        gl::FRAMEBUFFER_INCOMPLETE_MULTISAMPLE => FramebufferStatus::IncompleteMultisample,
        gl::FRAMEBUFFER_INCOMPLETE_LAYER_TARGETS => FramebufferStatus::IncompleteLayerTargets,
        _ => FramebufferStatus::Undefined,
    }
}

pub fn driver_error(err: GLenum) -> Option<DriverError> {
    match err {
        gl::NO_ERROR => None,
        gl::INVALID_ENUM => Some(DriverError::InvalidEnum),
        gl::INVALID_VALUE => Some(DriverError::InvalidValue),
        gl::INVALID_OPERATION => Some(DriverError::InvalidOperation),
        gl::INVALID_FRAMEBUFFER_OPERATION => Some(DriverError::InvalidFramebufferOperation),
        gl::OUT_OF_MEMORY => Some(DriverError::OutOfMemory),
        _ => Some(DriverError::Unknown(err)),
    }
}
