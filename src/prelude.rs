pub use crate::backends::{Driver, ObjectId};
pub use crate::buffer::{Buffer, BufferUsage};
pub use crate::context::{Capabilities, Context, ContextParams, Feature, OperationKind, Variant, Version};
pub use crate::errors::{DriverError, Error, Result};
pub use crate::framebuffer::{
    blit, AbstractFramebuffer, AttachmentSource, BlitFilter, BlitMask, BufferAttachment,
    ClearMask, CubeMapFace, DefaultFramebuffer, DrawAttachment, Framebuffer, FramebufferStatus,
    FramebufferTarget, InvalidationAttachment, TextureTarget,
};
pub use crate::image::{Image2D, PixelFormat, PixelType};
pub use crate::math::prelude::*;
pub use crate::object::ObjectFlags;
pub use crate::renderbuffer::{Renderbuffer, RenderbufferFormat};
pub use crate::transform_feedback::{PrimitiveMode, TransformFeedback};
