//! Framebuffers, the window-system provided one and user-created ones.
//!
//! Every operation which has to act on a framebuffer goes through the binding
//! state cache of its context: binds are only issued when the cache does not
//! already record the framebuffer at the requested target, and the viewport
//! is only updated when it differs from the cached one.
//!
//! Operations which edit a framebuffer (attachments, draw and read buffer
//! mapping, status checks, invalidation) dispatch through the implementation
//! table. With direct state access they name the object and leave every
//! binding point alone. Otherwise the framebuffer is bound first; if it is
//! already bound to either target that binding is reused, else it is bound
//! for reading.

pub mod blit;
mod types;

pub use self::blit::blit;
pub use self::types::*;

use smallvec::SmallVec;

use crate::backends::{ObjectId, ObjectKind};
use crate::context::{BindingTarget, Capabilities, Context, OperationKind, Variant};
use crate::errors::*;
use crate::image::{self, Image2D, PixelFormat, PixelType};
use crate::math::prelude::Rect;
use crate::object::{ObjectFlags, RawObject};
use crate::renderbuffer::Renderbuffer;

/// State shared by all framebuffer kinds.
pub struct FramebufferBase {
    raw: RawObject,
    viewport: Rect,
}

impl FramebufferBase {
    #[inline]
    pub(crate) fn ctx(&self) -> &Context {
        self.raw.ctx()
    }

    #[inline]
    pub(crate) fn id(&self) -> ObjectId {
        self.raw.id()
    }

    /// Checks whether the object could be materialized, without touching the
    /// native context.
    pub(crate) fn validate(&self) -> Result<()> {
        if self.raw.is_created() {
            return Ok(());
        }

        validate_viewport(self.ctx().capabilities(), self.viewport)
    }

    /// Binds to `target` through the cache, materializing the object on the
    /// first bind. Fails without any native call if it can not be
    /// materialized.
    pub(crate) fn bind_internal(&self, target: FramebufferTarget) -> Result<()> {
        self.validate()?;
        self.ctx().bind(target.into(), self.id());
        self.raw.mark_created();
        Ok(())
    }

    /// Returns the target the framebuffer is bound to, binding it for
    /// reading if it is bound nowhere.
    pub(crate) fn bind_internal_any(&self) -> Result<FramebufferTarget> {
        if self.ctx().is_bound(BindingTarget::ReadFramebuffer, self.id()) {
            return Ok(FramebufferTarget::Read);
        }

        if self.ctx().is_bound(BindingTarget::DrawFramebuffer, self.id()) {
            return Ok(FramebufferTarget::Draw);
        }

        self.bind_internal(FramebufferTarget::Read)?;
        Ok(FramebufferTarget::Read)
    }

    pub(crate) fn create_if_not_already(&self) -> Result<()> {
        if self.raw.is_created() {
            return Ok(());
        }

        self.bind_internal_any().map(|_| ())
    }

    fn is_bound_any(&self) -> bool {
        let ctx = self.ctx();
        ctx.is_bound(BindingTarget::ReadFramebuffer, self.id())
            || ctx.is_bound(BindingTarget::DrawFramebuffer, self.id())
    }

    /// Invalidates through a target-based entry point. If the framebuffer is
    /// bound nowhere, it is bound for drawing just for this call and the
    /// previous binding is restored, so the cache stays valid.
    fn invalidate_fallback(&self, attachments: &[InvalidationAttachment], rect: Option<Rect>) {
        let state = self.ctx().state();
        let id = self.id();

        for &target in &[FramebufferTarget::Draw, FramebufferTarget::Read] {
            if state.is_bound(target.into(), id) {
                self.ctx().driver().invalidate_framebuffer(target, id, attachments, rect);
                return;
            }
        }

        let mut driver = self.ctx().driver();
        driver.bind_framebuffer(FramebufferTarget::Draw, id);
        driver.invalidate_framebuffer(FramebufferTarget::Draw, id, attachments, rect);
        if let Some(previous) = state.bound(BindingTarget::DrawFramebuffer) {
            driver.bind_framebuffer(FramebufferTarget::Draw, previous);
        }
    }
}

fn validate_viewport(caps: &Capabilities, viewport: Rect) -> Result<()> {
    let size = viewport.size();
    let (w, h) = caps.max_viewport_dims;
    if size.x < 0 || size.y < 0 || size.x > w || size.y > h {
        let reason = format!("viewport {:?} exceeds the maximum size {}x{}", viewport, w, h);
        return Err(Error::creation(ObjectKind::Framebuffer.name(), reason));
    }

    Ok(())
}

/// Operations common to the default framebuffer and framebuffer objects.
pub trait AbstractFramebuffer {
    #[doc(hidden)]
    fn base(&self) -> &FramebufferBase;

    #[doc(hidden)]
    fn base_mut(&mut self) -> &mut FramebufferBase;

    /// The native name, zero for the default framebuffer.
    #[inline]
    fn id(&self) -> ObjectId {
        self.base().id()
    }

    #[inline]
    fn context(&self) -> &Context {
        self.base().ctx()
    }

    #[inline]
    fn viewport(&self) -> Rect {
        self.base().viewport
    }

    /// Checks if the binding state cache records this framebuffer at `target`.
    fn is_bound(&self, target: FramebufferTarget) -> bool {
        self.context().is_bound(target.into(), self.id())
    }

    /// Binds the framebuffer to `target` and applies its viewport. Both
    /// native calls are skipped if the cache says they are redundant.
    ///
    /// The binding is sticky, nothing restores the previous one.
    fn bind(&self, target: FramebufferTarget) -> Result<()> {
        let base = self.base();
        base.bind_internal(target)?;
        base.ctx().apply_viewport(base.viewport);
        Ok(())
    }

    /// Sets the viewport. It is applied right away only if the framebuffer
    /// is currently bound, otherwise on the next `bind`.
    fn set_viewport(&mut self, viewport: Rect) {
        self.base_mut().viewport = viewport;

        let base = self.base();
        if base.is_bound_any() {
            base.ctx().apply_viewport(viewport);
        }
    }

    /// Clears the buffers in `mask`. The framebuffer stays bound for drawing.
    fn clear(&self, mask: ClearMask) -> Result<()> {
        if mask.is_empty() {
            return Ok(());
        }

        let base = self.base();
        base.bind_internal(FramebufferTarget::Draw)?;
        base.ctx().driver().clear(mask);
        Ok(())
    }

    /// Checks the completeness of the framebuffer as seen from `target`.
    fn check_status(&self, target: FramebufferTarget) -> Result<FramebufferStatus> {
        let base = self.base();
        let status = match base.raw.edit_variant(OperationKind::CheckStatus) {
            Variant::DirectAccess => {
                base.create_if_not_already()?;
                base.ctx().driver().check_named_framebuffer_status(base.id(), target)
            }
            _ => {
                base.bind_internal(target)?;
                base.ctx().driver().check_framebuffer_status(target)
            }
        };

        Ok(status)
    }

    /// Hints the driver that the contents of `attachments` are no longer
    /// needed. Never fails and never changes the binding state cache.
    fn invalidate(&self, attachments: &[InvalidationAttachment]) {
        self.invalidate_rect(attachments, None);
    }

    /// Like `invalidate`, restricted to `rect` if given.
    fn invalidate_rect(&self, attachments: &[InvalidationAttachment], rect: Option<Rect>) {
        let base = self.base();
        if attachments.is_empty() || !base.raw.is_created() {
            return;
        }

        match base.raw.edit_variant(OperationKind::Invalidate) {
            Variant::DirectAccess => {
                base.ctx()
                    .driver()
                    .invalidate_named_framebuffer(base.id(), attachments, rect);
            }
            Variant::Fallback => base.invalidate_fallback(attachments, rect),
            _ => {}
        }
    }

    /// Reads `rect` into `image`, replacing its data. The format and type of
    /// `image` select the conversion.
    fn read(&self, rect: Rect, image: &mut Image2D) -> Result<()> {
        let size = image::data_size(image.format(), image.pixel_type(), rect.size());
        let mut data = vec![0u8; size];
        self.read_into(rect, image.format(), image.pixel_type(), &mut data)?;
        image.set_data(rect.size(), data);
        Ok(())
    }

    /// Reads `rect` into `data`. The framebuffer stays bound for reading.
    ///
    /// With a robust read implementation an undersized `data` is reported as
    /// `Error::BufferOverflow` before any native call. Otherwise the caller
    /// must provide at least `image::data_size(format, ty, rect.size())`
    /// bytes.
    fn read_into(&self, rect: Rect, format: PixelFormat, ty: PixelType, data: &mut [u8]) -> Result<()> {
        let base = self.base();
        let variant = base.raw.variant(OperationKind::ReadPixels);

        if variant == Variant::Robust {
            let required = image::data_size(format, ty, rect.size());
            if data.len() < required {
                return Err(Error::BufferOverflow {
                    required,
                    actual: data.len(),
                });
            }
        }

        base.bind_internal(FramebufferTarget::Read)?;

        let mut driver = base.ctx().driver();
        match variant {
            Variant::Robust => driver.read_n_pixels(rect, format, ty, data),
            _ => driver.read_pixels(rect, format, ty, data),
        }

        Ok(())
    }
}

/// The framebuffer provided by the window system. It always exists and is
/// never deleted.
pub struct DefaultFramebuffer {
    base: FramebufferBase,
}

impl DefaultFramebuffer {
    pub fn new(ctx: &Context, viewport: Rect) -> Self {
        let raw = RawObject::wrap(ctx, ObjectKind::Framebuffer, 0, ObjectFlags::CREATED);
        DefaultFramebuffer {
            base: FramebufferBase { raw, viewport },
        }
    }
}

impl AbstractFramebuffer for DefaultFramebuffer {
    #[inline]
    fn base(&self) -> &FramebufferBase {
        &self.base
    }

    #[inline]
    fn base_mut(&mut self) -> &mut FramebufferBase {
        &mut self.base
    }
}

type Attachments = SmallVec<[(BufferAttachment, Option<AttachmentSource>); 4]>;

/// A framebuffer object.
///
/// Depending on the context, the object is created on construction or only
/// its name is reserved and the object comes into existence on the first
/// bind. The object is deleted on drop unless the handle was released.
pub struct Framebuffer {
    base: FramebufferBase,
    attachments: Attachments,
}

impl Framebuffer {
    /// Creates a framebuffer whose viewport is `viewport`.
    ///
    /// Fails with `Error::ResourceCreation` if the driver returns no name, or
    /// if the object is created right away and the viewport exceeds the
    /// maximum viewport dimensions. With deferred creation the latter is
    /// reported by the first operation that binds the framebuffer.
    pub fn new(ctx: &Context, viewport: Rect) -> Result<Self> {
        if ctx.implementations().creates_eagerly() {
            validate_viewport(ctx.capabilities(), viewport)?;
        }

        let raw = RawObject::new(ctx, ObjectKind::Framebuffer)?;
        Ok(Framebuffer {
            base: FramebufferBase { raw, viewport },
            attachments: Attachments::new(),
        })
    }

    /// Takes ownership of a framebuffer that was allocated elsewhere.
    pub fn wrap(ctx: &Context, id: ObjectId, viewport: Rect, flags: ObjectFlags) -> Self {
        debug_assert!(id != 0, "The default framebuffer can not be wrapped.");
        let raw = RawObject::wrap(ctx, ObjectKind::Framebuffer, id, flags);
        Framebuffer {
            base: FramebufferBase { raw, viewport },
            attachments: Attachments::new(),
        }
    }

    /// Gives up ownership and returns the name. The object is not deleted.
    pub fn release(mut self) -> ObjectId {
        self.base.raw.release()
    }

    #[inline]
    pub fn flags(&self) -> ObjectFlags {
        self.base.raw.flags()
    }

    /// Checks if the native object exists, as opposed to a reserved name.
    #[inline]
    pub fn is_created(&self) -> bool {
        self.base.raw.is_created()
    }

    /// Returns what was attached to `attachment` through this handle.
    pub fn attachment(&self, attachment: BufferAttachment) -> Option<AttachmentSource> {
        self.attachments
            .iter()
            .find(|v| v.0 == attachment)
            .and_then(|v| v.1)
    }

    /// Attaches a renderbuffer. The renderbuffer is materialized if needed.
    pub fn attach_renderbuffer(
        &mut self,
        attachment: BufferAttachment,
        renderbuffer: &Renderbuffer,
    ) -> Result<()> {
        assert!(
            renderbuffer.context().ptr_eq(self.context()),
            "Renderbuffer belongs to another context."
        );

        renderbuffer.create_if_not_already();
        self.attach(attachment, Some(AttachmentSource::Renderbuffer(renderbuffer.id())))
    }

    /// Attaches level `level` of a texture.
    pub fn attach_texture(
        &mut self,
        attachment: BufferAttachment,
        target: TextureTarget,
        texture: ObjectId,
        level: i32,
    ) -> Result<()> {
        let source = AttachmentSource::Texture {
            target,
            id: texture,
            level,
        };

        self.attach(attachment, Some(source))
    }

    /// Detaches whatever is attached to `attachment`.
    pub fn detach(&mut self, attachment: BufferAttachment) -> Result<()> {
        self.attach(attachment, None)
    }

    /// Attaches `source` to `attachment`, or detaches if `None`. Attaching the
    /// same source again is a no-op.
    pub fn attach(&mut self, attachment: BufferAttachment, source: Option<AttachmentSource>) -> Result<()> {
        if let BufferAttachment::Color(index) = attachment {
            self.validate_color_attachment(index)?;
        }

        if let Some(AttachmentSource::Texture {
            target: TextureTarget::Multisample2D,
            ..
        }) = source
        {
            if !self.context().capabilities().extensions.gl_arb_texture_multisample {
                return Err(Error::Requirement("multisample textures".into()));
            }
        }

        let known = self.attachments.iter().position(|v| v.0 == attachment);
        if let Some(index) = known {
            if self.attachments[index].1 == source {
                return Ok(());
            }
        }

        match source {
            Some(AttachmentSource::Texture { target, id, level }) => {
                self.attach_texture_internal(attachment, target, id, level)?
            }
            Some(AttachmentSource::Renderbuffer(id)) => {
                self.attach_renderbuffer_internal(attachment, id)?
            }
            None => self.attach_renderbuffer_internal(attachment, 0)?,
        }

        match known {
            Some(index) => self.attachments[index].1 = source,
            None => self.attachments.push((attachment, source)),
        }

        Ok(())
    }

    /// Routes fragment outputs to color attachments. `outputs` holds
    /// `(location, attachment)` pairs, locations without an entry are
    /// discarded.
    pub fn map_for_draw(&self, outputs: &[(u32, DrawAttachment)]) -> Result<()> {
        let caps = self.context().capabilities();
        let count = outputs.iter().map(|v| v.0 as usize + 1).max().unwrap_or(0);
        if count > caps.max_draw_buffers.max(0) as usize {
            return Err(Error::Requirement(format!(
                "{} draw buffers (maximum is {})",
                count, caps.max_draw_buffers
            )));
        }

        let mut buffers: SmallVec<[DrawAttachment; 8]> = SmallVec::from_elem(DrawAttachment::None, count);
        for &(location, attachment) in outputs {
            if let DrawAttachment::Color(index) = attachment {
                self.validate_color_attachment(index)?;
            }

            buffers[location as usize] = attachment;
        }

        let base = &self.base;
        match base.raw.edit_variant(OperationKind::DrawBuffersSet) {
            Variant::DirectAccess => {
                base.create_if_not_already()?;
                base.ctx()
                    .driver()
                    .named_framebuffer_draw_buffers(base.id(), &buffers);
            }
            _ => {
                base.bind_internal_any()?;
                base.ctx().driver().draw_buffers(&buffers);
            }
        }

        Ok(())
    }

    /// Routes the single fragment output to `attachment`.
    pub fn map_for_draw_single(&self, attachment: DrawAttachment) -> Result<()> {
        self.map_for_draw(&[(0, attachment)])
    }

    /// Selects the color attachment which reads and blits take data from.
    pub fn map_for_read(&self, attachment: DrawAttachment) -> Result<()> {
        if let DrawAttachment::Color(index) = attachment {
            self.validate_color_attachment(index)?;
        }

        let base = &self.base;
        match base.raw.edit_variant(OperationKind::ReadBufferSet) {
            Variant::DirectAccess => {
                base.create_if_not_already()?;
                base.ctx()
                    .driver()
                    .named_framebuffer_read_buffer(base.id(), attachment);
            }
            _ => {
                base.bind_internal_any()?;
                base.ctx().driver().read_buffer(attachment);
            }
        }

        Ok(())
    }

    /// Sets a debug label. Ignored if the context does not support labels.
    pub fn set_label(&self, label: &str) -> Result<()> {
        if self.base.raw.variant(OperationKind::Label) == Variant::NoOp {
            return Ok(());
        }

        self.base.create_if_not_already()?;
        self.base.raw.set_label(label);
        Ok(())
    }

    pub fn label(&self) -> String {
        self.base.raw.label()
    }

    fn validate_color_attachment(&self, index: u32) -> Result<()> {
        let max = self.context().capabilities().max_color_attachments;
        if index as i64 >= i64::from(max) {
            return Err(Error::Requirement(format!(
                "color attachment {} (maximum is {})",
                index, max
            )));
        }

        Ok(())
    }

    fn attach_renderbuffer_internal(&self, attachment: BufferAttachment, renderbuffer: ObjectId) -> Result<()> {
        let base = &self.base;
        match base.raw.edit_variant(OperationKind::AttachRenderbuffer) {
            Variant::DirectAccess => {
                base.create_if_not_already()?;
                base.ctx()
                    .driver()
                    .named_framebuffer_renderbuffer(base.id(), attachment, renderbuffer);
            }
            _ => {
                let target = base.bind_internal_any()?;
                base.ctx()
                    .driver()
                    .framebuffer_renderbuffer(target, attachment, renderbuffer);
            }
        }

        Ok(())
    }

    fn attach_texture_internal(
        &self,
        attachment: BufferAttachment,
        texture: TextureTarget,
        id: ObjectId,
        level: i32,
    ) -> Result<()> {
        let base = &self.base;
        match base.raw.edit_variant(OperationKind::AttachTexture) {
            Variant::DirectAccess => {
                base.create_if_not_already()?;
                base.ctx()
                    .driver()
                    .named_framebuffer_texture(base.id(), attachment, texture, id, level);
            }
            _ => {
                let target = base.bind_internal_any()?;
                base.ctx()
                    .driver()
                    .framebuffer_texture(target, attachment, texture, id, level);
            }
        }

        Ok(())
    }
}

impl AbstractFramebuffer for Framebuffer {
    #[inline]
    fn base(&self) -> &FramebufferBase {
        &self.base
    }

    #[inline]
    fn base_mut(&mut self) -> &mut FramebufferBase {
        &mut self.base
    }
}
