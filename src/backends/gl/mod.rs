//! The driver of desktop OpenGL and OpenGL ES contexts.

pub mod types;

use std::ffi::CStr;
use std::marker::PhantomData;
use std::os::raw::{c_char, c_void};
use std::ptr;

use gl::types::*;
use smallvec::SmallVec;

use super::{Driver, IntegerName, ObjectId, ObjectKind, StringName};
use crate::buffer::BufferUsage;
use crate::errors::DriverError;
use crate::framebuffer::{
    BlitFilter, BlitMask, BufferAttachment, ClearMask, DrawAttachment, FramebufferStatus,
    FramebufferTarget, InvalidationAttachment, TextureTarget,
};
use crate::image::{self, PixelFormat, PixelType};
use crate::math::prelude::{Rect, Vector2};
use crate::renderbuffer::RenderbufferFormat;
use crate::transform_feedback::PrimitiveMode;

/// Issues native calls through the `gl` function pointers.
///
/// The pointers are process wide while contexts are not, so all methods
/// assume the context the pointers were loaded for is current on the calling
/// thread.
pub struct GLDriver {
    _marker: PhantomData<*const ()>,
}

impl GLDriver {
    /// # Safety
    ///
    /// The function pointers must have been loaded, and the context they were
    /// loaded for must be current on this thread for the whole lifetime of
    /// the driver.
    pub unsafe fn new() -> Self {
        GLDriver {
            _marker: PhantomData,
        }
    }

    /// Loads the function pointers with `loader`, e.g. the
    /// `get_proc_address` of a window.
    ///
    /// # Safety
    ///
    /// See `GLDriver::new`.
    pub unsafe fn load_with<F>(loader: F) -> Self
    where
        F: FnMut(&'static str) -> *const c_void,
    {
        gl::load_with(loader);
        GLDriver::new()
    }
}

unsafe fn string(ptr: *const GLubyte) -> Option<String> {
    if ptr.is_null() {
        None
    } else {
        Some(
            CStr::from_ptr(ptr as *const c_char)
                .to_string_lossy()
                .into_owned(),
        )
    }
}

unsafe fn gen(f: unsafe fn(GLsizei, *mut GLuint)) -> ObjectId {
    let mut id = 0;
    f(1, &mut id);
    id
}

fn invalidation_attachments(
    attachments: &[InvalidationAttachment],
    default: bool,
) -> SmallVec<[GLenum; 8]> {
    attachments
        .iter()
        .map(|&v| types::invalidation_attachment(v, default))
        .collect()
}

fn draw_attachments(buffers: &[DrawAttachment]) -> SmallVec<[GLenum; 8]> {
    buffers.iter().map(|&v| GLenum::from(v)).collect()
}

impl Driver for GLDriver {
    fn get_string(&self, name: StringName) -> Option<String> {
        unsafe { string(gl::GetString(name.into())) }
    }

    fn get_string_indexed(&self, name: StringName, index: u32) -> Option<String> {
        unsafe { string(gl::GetStringi(name.into(), index)) }
    }

    fn get_integer_v(&self, name: IntegerName, values: &mut [i32]) {
        let mut buf = [0; 2];
        unsafe { gl::GetIntegerv(name.into(), buf.as_mut_ptr()) };

        for (dst, v) in values.iter_mut().zip(buf.iter()) {
            *dst = *v;
        }
    }

    fn get_error(&mut self) -> Option<DriverError> {
        unsafe { types::driver_error(gl::GetError()) }
    }

    fn pack_alignment(&mut self, alignment: i32) {
        unsafe { gl::PixelStorei(gl::PACK_ALIGNMENT, alignment) }
    }

    fn clear_color(&mut self, color: [f32; 4]) {
        unsafe { gl::ClearColor(color[0], color[1], color[2], color[3]) }
    }

    fn object_label(&mut self, kind: ObjectKind, id: ObjectId, label: &str) {
        unsafe {
            gl::ObjectLabel(
                kind.into(),
                id,
                label.len() as GLsizei,
                label.as_ptr() as *const GLchar,
            )
        }
    }

    fn get_object_label(&self, kind: ObjectKind, id: ObjectId) -> String {
        unsafe {
            let mut len = 0;
            gl::GetObjectLabel(kind.into(), id, 0, &mut len, ptr::null_mut());
            if len <= 0 {
                return String::new();
            }

            let mut buf = vec![0u8; len as usize + 1];
            gl::GetObjectLabel(
                kind.into(),
                id,
                buf.len() as GLsizei,
                &mut len,
                buf.as_mut_ptr() as *mut GLchar,
            );

            buf.truncate(len.max(0) as usize);
            String::from_utf8_lossy(&buf).into_owned()
        }
    }

    fn gen_framebuffer(&mut self) -> ObjectId {
        unsafe { gen(gl::GenFramebuffers) }
    }

    fn create_framebuffer(&mut self) -> ObjectId {
        unsafe { gen(gl::CreateFramebuffers) }
    }

    fn delete_framebuffer(&mut self, id: ObjectId) {
        unsafe { gl::DeleteFramebuffers(1, &id) }
    }

    fn bind_framebuffer(&mut self, target: FramebufferTarget, id: ObjectId) {
        unsafe { gl::BindFramebuffer(target.into(), id) }
    }

    fn viewport(&mut self, rect: Rect) {
        let size = rect.size();
        unsafe { gl::Viewport(rect.min.x, rect.min.y, size.x, size.y) }
    }

    fn clear(&mut self, mask: ClearMask) {
        unsafe { gl::Clear(mask.into()) }
    }

    fn check_framebuffer_status(&mut self, target: FramebufferTarget) -> FramebufferStatus {
        unsafe { types::framebuffer_status(gl::CheckFramebufferStatus(target.into())) }
    }

    fn check_named_framebuffer_status(
        &mut self,
        id: ObjectId,
        target: FramebufferTarget,
    ) -> FramebufferStatus {
        unsafe { types::framebuffer_status(gl::CheckNamedFramebufferStatus(id, target.into())) }
    }

    fn draw_buffers(&mut self, buffers: &[DrawAttachment]) {
        let buffers = draw_attachments(buffers);
        unsafe { gl::DrawBuffers(buffers.len() as GLsizei, buffers.as_ptr()) }
    }

    fn named_framebuffer_draw_buffers(&mut self, id: ObjectId, buffers: &[DrawAttachment]) {
        let buffers = draw_attachments(buffers);
        unsafe { gl::NamedFramebufferDrawBuffers(id, buffers.len() as GLsizei, buffers.as_ptr()) }
    }

    fn read_buffer(&mut self, attachment: DrawAttachment) {
        unsafe { gl::ReadBuffer(attachment.into()) }
    }

    fn named_framebuffer_read_buffer(&mut self, id: ObjectId, attachment: DrawAttachment) {
        unsafe { gl::NamedFramebufferReadBuffer(id, attachment.into()) }
    }

    fn invalidate_framebuffer(
        &mut self,
        target: FramebufferTarget,
        id: ObjectId,
        attachments: &[InvalidationAttachment],
        rect: Option<Rect>,
    ) {
        let attachments = invalidation_attachments(attachments, id == 0);
        let n = attachments.len() as GLsizei;
        unsafe {
            match rect {
                Some(rect) => {
                    let size = rect.size();
                    gl::InvalidateSubFramebuffer(
                        target.into(),
                        n,
                        attachments.as_ptr(),
                        rect.min.x,
                        rect.min.y,
                        size.x,
                        size.y,
                    );
                }
                None => gl::InvalidateFramebuffer(target.into(), n, attachments.as_ptr()),
            }
        }
    }

    fn invalidate_named_framebuffer(
        &mut self,
        id: ObjectId,
        attachments: &[InvalidationAttachment],
        rect: Option<Rect>,
    ) {
        let attachments = invalidation_attachments(attachments, id == 0);
        let n = attachments.len() as GLsizei;
        unsafe {
            match rect {
                Some(rect) => {
                    let size = rect.size();
                    gl::InvalidateNamedFramebufferSubData(
                        id,
                        n,
                        attachments.as_ptr(),
                        rect.min.x,
                        rect.min.y,
                        size.x,
                        size.y,
                    );
                }
                None => gl::InvalidateNamedFramebufferData(id, n, attachments.as_ptr()),
            }
        }
    }

    fn framebuffer_renderbuffer(
        &mut self,
        target: FramebufferTarget,
        attachment: BufferAttachment,
        renderbuffer: ObjectId,
    ) {
        unsafe {
            gl::FramebufferRenderbuffer(
                target.into(),
                attachment.into(),
                gl::RENDERBUFFER,
                renderbuffer,
            )
        }
    }

    fn named_framebuffer_renderbuffer(
        &mut self,
        id: ObjectId,
        attachment: BufferAttachment,
        renderbuffer: ObjectId,
    ) {
        unsafe {
            gl::NamedFramebufferRenderbuffer(id, attachment.into(), gl::RENDERBUFFER, renderbuffer)
        }
    }

    fn framebuffer_texture(
        &mut self,
        target: FramebufferTarget,
        attachment: BufferAttachment,
        texture: TextureTarget,
        id: ObjectId,
        level: i32,
    ) {
        unsafe {
            match texture {
                TextureTarget::Layer(layer) => {
                    gl::FramebufferTextureLayer(target.into(), attachment.into(), id, level, layer)
                }
                _ => gl::FramebufferTexture2D(
                    target.into(),
                    attachment.into(),
                    types::texture_target(texture),
                    id,
                    level,
                ),
            }
        }
    }

    fn named_framebuffer_texture(
        &mut self,
        id: ObjectId,
        attachment: BufferAttachment,
        texture: TextureTarget,
        texture_id: ObjectId,
        level: i32,
    ) {
        unsafe {
            match types::texture_layer(texture) {
                Some(layer) => gl::NamedFramebufferTextureLayer(
                    id,
                    attachment.into(),
                    texture_id,
                    level,
                    layer,
                ),
                None => gl::NamedFramebufferTexture(id, attachment.into(), texture_id, level),
            }
        }
    }

    fn read_pixels(&mut self, rect: Rect, format: PixelFormat, ty: PixelType, data: &mut [u8]) {
        let size = rect.size();
        assert!(
            data.len() >= image::data_size(format, ty, size),
            "Output buffer is too small for {:?}.",
            rect
        );

        unsafe {
            gl::ReadPixels(
                rect.min.x,
                rect.min.y,
                size.x,
                size.y,
                format.into(),
                ty.into(),
                data.as_mut_ptr() as *mut c_void,
            )
        }
    }

    fn read_n_pixels(&mut self, rect: Rect, format: PixelFormat, ty: PixelType, data: &mut [u8]) {
        // Robustness from ARB_robustness or EXT_robustness only exposes the
        // suffixed entry points, the core one is not loaded before GL 4.5.
        if !gl::ReadnPixels::is_loaded() {
            self.read_pixels(rect, format, ty, data);
            return;
        }

        let size = rect.size();
        unsafe {
            gl::ReadnPixels(
                rect.min.x,
                rect.min.y,
                size.x,
                size.y,
                format.into(),
                ty.into(),
                data.len() as GLsizei,
                data.as_mut_ptr() as *mut c_void,
            )
        }
    }

    fn blit_framebuffer(&mut self, src: Rect, dst: Rect, mask: BlitMask, filter: BlitFilter) {
        unsafe {
            gl::BlitFramebuffer(
                src.min.x,
                src.min.y,
                src.max.x,
                src.max.y,
                dst.min.x,
                dst.min.y,
                dst.max.x,
                dst.max.y,
                mask.into(),
                filter.into(),
            )
        }
    }

    fn blit_named_framebuffer(
        &mut self,
        read: ObjectId,
        draw: ObjectId,
        src: Rect,
        dst: Rect,
        mask: BlitMask,
        filter: BlitFilter,
    ) {
        unsafe {
            gl::BlitNamedFramebuffer(
                read,
                draw,
                src.min.x,
                src.min.y,
                src.max.x,
                src.max.y,
                dst.min.x,
                dst.min.y,
                dst.max.x,
                dst.max.y,
                mask.into(),
                filter.into(),
            )
        }
    }

    fn gen_renderbuffer(&mut self) -> ObjectId {
        unsafe { gen(gl::GenRenderbuffers) }
    }

    fn create_renderbuffer(&mut self) -> ObjectId {
        unsafe { gen(gl::CreateRenderbuffers) }
    }

    fn delete_renderbuffer(&mut self, id: ObjectId) {
        unsafe { gl::DeleteRenderbuffers(1, &id) }
    }

    fn bind_renderbuffer(&mut self, id: ObjectId) {
        unsafe { gl::BindRenderbuffer(gl::RENDERBUFFER, id) }
    }

    fn renderbuffer_storage(&mut self, samples: i32, format: RenderbufferFormat, size: Vector2<i32>) {
        unsafe {
            gl::RenderbufferStorageMultisample(
                gl::RENDERBUFFER,
                samples,
                format.into(),
                size.x,
                size.y,
            )
        }
    }

    fn named_renderbuffer_storage(
        &mut self,
        id: ObjectId,
        samples: i32,
        format: RenderbufferFormat,
        size: Vector2<i32>,
    ) {
        unsafe { gl::NamedRenderbufferStorageMultisample(id, samples, format.into(), size.x, size.y) }
    }

    fn gen_buffer(&mut self) -> ObjectId {
        unsafe { gen(gl::GenBuffers) }
    }

    fn create_buffer(&mut self) -> ObjectId {
        unsafe { gen(gl::CreateBuffers) }
    }

    fn delete_buffer(&mut self, id: ObjectId) {
        unsafe { gl::DeleteBuffers(1, &id) }
    }

    fn bind_array_buffer(&mut self, id: ObjectId) {
        unsafe { gl::BindBuffer(gl::ARRAY_BUFFER, id) }
    }

    fn buffer_data(&mut self, data: &[u8], usage: BufferUsage) {
        unsafe {
            gl::BufferData(
                gl::ARRAY_BUFFER,
                data.len() as GLsizeiptr,
                data.as_ptr() as *const c_void,
                usage.into(),
            )
        }
    }

    fn named_buffer_data(&mut self, id: ObjectId, data: &[u8], usage: BufferUsage) {
        unsafe {
            gl::NamedBufferData(
                id,
                data.len() as GLsizeiptr,
                data.as_ptr() as *const c_void,
                usage.into(),
            )
        }
    }

    fn gen_transform_feedback(&mut self) -> ObjectId {
        unsafe { gen(gl::GenTransformFeedbacks) }
    }

    fn create_transform_feedback(&mut self) -> ObjectId {
        unsafe { gen(gl::CreateTransformFeedbacks) }
    }

    fn delete_transform_feedback(&mut self, id: ObjectId) {
        unsafe { gl::DeleteTransformFeedbacks(1, &id) }
    }

    fn bind_transform_feedback(&mut self, id: ObjectId) {
        unsafe { gl::BindTransformFeedback(gl::TRANSFORM_FEEDBACK, id) }
    }

    fn bind_transform_feedback_buffer(
        &mut self,
        index: u32,
        buffer: ObjectId,
        range: Option<(isize, isize)>,
    ) {
        unsafe {
            match range {
                Some((offset, size)) => gl::BindBufferRange(
                    gl::TRANSFORM_FEEDBACK_BUFFER,
                    index,
                    buffer,
                    offset as GLintptr,
                    size as GLsizeiptr,
                ),
                None => gl::BindBufferBase(gl::TRANSFORM_FEEDBACK_BUFFER, index, buffer),
            }
        }
    }

    fn transform_feedback_buffer(
        &mut self,
        id: ObjectId,
        index: u32,
        buffer: ObjectId,
        range: Option<(isize, isize)>,
    ) {
        unsafe {
            match range {
                Some((offset, size)) => gl::TransformFeedbackBufferRange(
                    id,
                    index,
                    buffer,
                    offset as GLintptr,
                    size as GLsizeiptr,
                ),
                None => gl::TransformFeedbackBufferBase(id, index, buffer),
            }
        }
    }

    fn begin_transform_feedback(&mut self, mode: PrimitiveMode) {
        unsafe { gl::BeginTransformFeedback(mode.into()) }
    }

    fn pause_transform_feedback(&mut self) {
        unsafe { gl::PauseTransformFeedback() }
    }

    fn resume_transform_feedback(&mut self) {
        unsafe { gl::ResumeTransformFeedback() }
    }

    fn end_transform_feedback(&mut self) {
        unsafe { gl::EndTransformFeedback() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[should_panic(expected = "Output buffer is too small")]
    fn robust_read_without_entry_point() {
        // Nothing was loaded, so the bounds-checked plain read is used.
        let mut driver = unsafe { GLDriver::new() };
        let mut data = [0u8; 4];
        driver.read_n_pixels(
            Rect::with_size((4, 4)),
            PixelFormat::RGBA,
            PixelType::UnsignedByte,
            &mut data,
        );
    }
}
