//! The backend of the context, which should be responsible for only one thing:
//! issuing the native calls. It never caches and never validates, all of that
//! happens one level up in the `Context` and the resource handles.

pub mod headless;

use crate::buffer::BufferUsage;
use crate::errors::DriverError;
use crate::framebuffer::{
    BlitFilter, BlitMask, BufferAttachment, ClearMask, DrawAttachment, FramebufferStatus,
    FramebufferTarget, InvalidationAttachment, TextureTarget,
};
use crate::image::{PixelFormat, PixelType};
use crate::math::prelude::{Rect, Vector2};
use crate::renderbuffer::RenderbufferFormat;
use crate::transform_feedback::PrimitiveMode;

/// A native object name. Zero never names an allocated object, it stands for
/// the default (window-system provided) object of a binding point.
pub type ObjectId = u32;

/// Strings that can be queried from the native context.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StringName {
    Vendor,
    Renderer,
    Version,
    ShadingLanguageVersion,
    Extensions,
}

/// Integer states and implementation limits that can be queried from the
/// native context.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum IntegerName {
    NumExtensions,
    ContextFlags,
    ContextProfileMask,
    /// Two values, width and height.
    MaxViewportDims,
    MaxColorAttachments,
    MaxDrawBuffers,
    MaxRenderbufferSize,
    MaxSamples,
    MaxTransformFeedbackSeparateAttribs,
    MaxTransformFeedbackInterleavedComponents,
    MaxTransformFeedbackBuffers,
}

/// Object namespaces, used for debug labels.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Framebuffer,
    Renderbuffer,
    TransformFeedback,
    Buffer,
}

/// The native graphics API as seen by the state-tracking layer.
///
/// Every method maps to exactly one native entry point. Methods prefixed with
/// `named_` are the direct state access forms, which take the object name
/// instead of operating on whatever is bound to a target.
///
/// A driver belongs to exactly one native context and must only be used on
/// the thread where that context is current.
pub trait Driver {
    fn get_string(&self, name: StringName) -> Option<String>;

    fn get_string_indexed(&self, name: StringName, index: u32) -> Option<String>;

    fn get_integer_v(&self, name: IntegerName, values: &mut [i32]);

    fn get_integer(&self, name: IntegerName) -> i32 {
        let mut v = [0];
        self.get_integer_v(name, &mut v);
        v[0]
    }

    /// Returns and clears the oldest latched error.
    fn get_error(&mut self) -> Option<DriverError>;

    fn pack_alignment(&mut self, alignment: i32);

    fn clear_color(&mut self, color: [f32; 4]);

    fn object_label(&mut self, kind: ObjectKind, id: ObjectId, label: &str);

    fn get_object_label(&self, kind: ObjectKind, id: ObjectId) -> String;

    // Framebuffers.

    /// Reserves a name. The object itself comes into existence on first bind.
    fn gen_framebuffer(&mut self) -> ObjectId;

    /// Creates the object right away.
    fn create_framebuffer(&mut self) -> ObjectId;

    fn delete_framebuffer(&mut self, id: ObjectId);

    fn bind_framebuffer(&mut self, target: FramebufferTarget, id: ObjectId);

    fn viewport(&mut self, rect: Rect);

    fn clear(&mut self, mask: ClearMask);

    fn check_framebuffer_status(&mut self, target: FramebufferTarget) -> FramebufferStatus;

    fn check_named_framebuffer_status(
        &mut self,
        id: ObjectId,
        target: FramebufferTarget,
    ) -> FramebufferStatus;

    fn draw_buffers(&mut self, buffers: &[DrawAttachment]);

    fn named_framebuffer_draw_buffers(&mut self, id: ObjectId, buffers: &[DrawAttachment]);

    fn read_buffer(&mut self, attachment: DrawAttachment);

    fn named_framebuffer_read_buffer(&mut self, id: ObjectId, attachment: DrawAttachment);

    /// `id` is the framebuffer bound to `target`, which selects between the
    /// default and the object attachment names.
    fn invalidate_framebuffer(
        &mut self,
        target: FramebufferTarget,
        id: ObjectId,
        attachments: &[InvalidationAttachment],
        rect: Option<Rect>,
    );

    fn invalidate_named_framebuffer(
        &mut self,
        id: ObjectId,
        attachments: &[InvalidationAttachment],
        rect: Option<Rect>,
    );

    fn framebuffer_renderbuffer(
        &mut self,
        target: FramebufferTarget,
        attachment: BufferAttachment,
        renderbuffer: ObjectId,
    );

    fn named_framebuffer_renderbuffer(
        &mut self,
        id: ObjectId,
        attachment: BufferAttachment,
        renderbuffer: ObjectId,
    );

    fn framebuffer_texture(
        &mut self,
        target: FramebufferTarget,
        attachment: BufferAttachment,
        texture: TextureTarget,
        id: ObjectId,
        level: i32,
    );

    fn named_framebuffer_texture(
        &mut self,
        id: ObjectId,
        attachment: BufferAttachment,
        texture: TextureTarget,
        texture_id: ObjectId,
        level: i32,
    );

    /// Reads pixels from the framebuffer bound for reading. The output slice
    /// must hold the whole rectangle.
    fn read_pixels(&mut self, rect: Rect, format: PixelFormat, ty: PixelType, data: &mut [u8]);

    /// Robust form of `read_pixels`, the driver never writes past `data.len()`.
    fn read_n_pixels(&mut self, rect: Rect, format: PixelFormat, ty: PixelType, data: &mut [u8]);

    fn blit_framebuffer(&mut self, src: Rect, dst: Rect, mask: BlitMask, filter: BlitFilter);

    #[allow(clippy::too_many_arguments)]
    fn blit_named_framebuffer(
        &mut self,
        read: ObjectId,
        draw: ObjectId,
        src: Rect,
        dst: Rect,
        mask: BlitMask,
        filter: BlitFilter,
    );

    // Renderbuffers.

    fn gen_renderbuffer(&mut self) -> ObjectId;

    fn create_renderbuffer(&mut self) -> ObjectId;

    fn delete_renderbuffer(&mut self, id: ObjectId);

    fn bind_renderbuffer(&mut self, id: ObjectId);

    fn renderbuffer_storage(&mut self, samples: i32, format: RenderbufferFormat, size: Vector2<i32>);

    fn named_renderbuffer_storage(
        &mut self,
        id: ObjectId,
        samples: i32,
        format: RenderbufferFormat,
        size: Vector2<i32>,
    );

    // Buffers.

    fn gen_buffer(&mut self) -> ObjectId;

    fn create_buffer(&mut self) -> ObjectId;

    fn delete_buffer(&mut self, id: ObjectId);

    /// Binds to the generic array target, which is not tracked by the cache.
    fn bind_array_buffer(&mut self, id: ObjectId);

    fn buffer_data(&mut self, data: &[u8], usage: BufferUsage);

    fn named_buffer_data(&mut self, id: ObjectId, data: &[u8], usage: BufferUsage);

    // Transform feedback.

    fn gen_transform_feedback(&mut self) -> ObjectId;

    fn create_transform_feedback(&mut self) -> ObjectId;

    fn delete_transform_feedback(&mut self, id: ObjectId);

    fn bind_transform_feedback(&mut self, id: ObjectId);

    /// Binds `buffer` to an indexed transform feedback binding point of the
    /// currently bound transform feedback object. `range` is `(offset, size)`.
    fn bind_transform_feedback_buffer(&mut self, index: u32, buffer: ObjectId, range: Option<(isize, isize)>);

    fn transform_feedback_buffer(
        &mut self,
        id: ObjectId,
        index: u32,
        buffer: ObjectId,
        range: Option<(isize, isize)>,
    );

    fn begin_transform_feedback(&mut self, mode: PrimitiveMode);

    fn pause_transform_feedback(&mut self);

    fn resume_transform_feedback(&mut self);

    fn end_transform_feedback(&mut self);
}

#[cfg(not(target_arch = "wasm32"))]
pub mod gl;

pub fn new_headless() -> Box<dyn Driver> {
    Box::new(self::headless::HeadlessDriver::new())
}
