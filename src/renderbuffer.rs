//! Renderbuffers, images which can only be attached to framebuffers.

use crate::backends::{ObjectId, ObjectKind};
use crate::context::{BindingTarget, Context, OperationKind, Variant};
use crate::errors::*;
use crate::math::prelude::Vector2;
use crate::object::{ObjectFlags, RawObject};

/// Internal format of a renderbuffer.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum RenderbufferFormat {
    R8,
    RG8,
    RGB8,
    RGBA8,
    SRGB8Alpha8,
    RGBA16F,
    RGBA32F,
    Depth16,
    Depth24,
    Depth32F,
    Stencil8,
    Depth24Stencil8,
    Depth32FStencil8,
}

impl RenderbufferFormat {
    pub fn is_color(self) -> bool {
        match self {
            RenderbufferFormat::Depth16
            | RenderbufferFormat::Depth24
            | RenderbufferFormat::Depth32F
            | RenderbufferFormat::Stencil8
            | RenderbufferFormat::Depth24Stencil8
            | RenderbufferFormat::Depth32FStencil8 => false,
            _ => true,
        }
    }
}

pub struct Renderbuffer {
    raw: RawObject,
}

impl Renderbuffer {
    pub fn new(ctx: &Context) -> Result<Self> {
        Ok(Renderbuffer {
            raw: RawObject::new(ctx, ObjectKind::Renderbuffer)?,
        })
    }

    /// Takes ownership of a renderbuffer that was allocated elsewhere.
    pub fn wrap(ctx: &Context, id: ObjectId, flags: ObjectFlags) -> Self {
        Renderbuffer {
            raw: RawObject::wrap(ctx, ObjectKind::Renderbuffer, id, flags),
        }
    }

    /// Gives up ownership and returns the name. The object is not deleted.
    pub fn release(mut self) -> ObjectId {
        self.raw.release()
    }

    #[inline]
    pub fn id(&self) -> ObjectId {
        self.raw.id()
    }

    #[inline]
    pub fn context(&self) -> &Context {
        self.raw.ctx()
    }

    #[inline]
    pub fn flags(&self) -> ObjectFlags {
        self.raw.flags()
    }

    #[inline]
    pub fn is_created(&self) -> bool {
        self.raw.is_created()
    }

    /// Allocates storage for a single-sampled image.
    pub fn set_storage(&self, format: RenderbufferFormat, size: Vector2<i32>) -> Result<()> {
        self.set_storage_multisample(0, format, size)
    }

    /// Allocates storage for an image with `samples` samples per pixel.
    ///
    /// Fails with `Error::ResourceCreation` before any native call if `size`
    /// or `samples` exceed the limits of the context.
    pub fn set_storage_multisample(
        &self,
        samples: i32,
        format: RenderbufferFormat,
        size: Vector2<i32>,
    ) -> Result<()> {
        let caps = self.context().capabilities();
        let max = caps.max_renderbuffer_size;
        if size.x < 0 || size.y < 0 || size.x > max || size.y > max {
            let reason = format!("size {:?} exceeds the maximum of {}", size, max);
            return Err(Error::creation(ObjectKind::Renderbuffer.name(), reason));
        }

        if samples < 0 || samples > caps.max_samples {
            let reason = format!("{} samples exceed the maximum of {}", samples, caps.max_samples);
            return Err(Error::creation(ObjectKind::Renderbuffer.name(), reason));
        }

        match self.raw.edit_variant(OperationKind::RenderbufferStorage) {
            Variant::DirectAccess => {
                self.create_if_not_already();
                self.context()
                    .driver()
                    .named_renderbuffer_storage(self.id(), samples, format, size);
            }
            _ => {
                self.bind_internal();
                self.context().driver().renderbuffer_storage(samples, format, size);
            }
        }

        Ok(())
    }

    /// Sets a debug label. Ignored if the context does not support labels.
    pub fn set_label(&self, label: &str) {
        if self.raw.variant(OperationKind::Label) != Variant::NoOp {
            self.create_if_not_already();
            self.raw.set_label(label);
        }
    }

    pub fn label(&self) -> String {
        self.raw.label()
    }

    pub(crate) fn create_if_not_already(&self) {
        if !self.raw.is_created() {
            self.bind_internal();
        }
    }

    fn bind_internal(&self) {
        self.context().bind(BindingTarget::Renderbuffer, self.id());
        self.raw.mark_created();
    }
}
