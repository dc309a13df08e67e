//! Ownership of native object names, shared by every resource handle.

use std::cell::Cell;

use bitflags::bitflags;

use crate::backends::{ObjectId, ObjectKind};
use crate::context::{BindingTarget, Context, OperationKind, Variant};
use crate::errors::*;

bitflags! {
    /// Flags of a native object owned by a handle.
    #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
    pub struct ObjectFlags: u8 {
        /// The object exists, as opposed to a name that was only reserved.
        const CREATED        = 0b01;
        /// The object is deleted when the handle is dropped.
        const DELETE_ON_DROP = 0b10;
    }
}

impl ObjectKind {
    pub fn name(self) -> &'static str {
        match self {
            ObjectKind::Framebuffer => "framebuffer",
            ObjectKind::Renderbuffer => "renderbuffer",
            ObjectKind::TransformFeedback => "transform feedback",
            ObjectKind::Buffer => "buffer",
        }
    }

    /// Binding points of the cache which may refer to objects of this kind.
    pub(crate) fn binding_targets(self) -> &'static [BindingTarget] {
        match self {
            ObjectKind::Framebuffer => &[BindingTarget::ReadFramebuffer, BindingTarget::DrawFramebuffer],
            ObjectKind::Renderbuffer => &[BindingTarget::Renderbuffer],
            ObjectKind::TransformFeedback => &[BindingTarget::TransformFeedback],
            ObjectKind::Buffer => &[],
        }
    }
}

/// A native name together with the context it belongs to. Deletes the
/// object on drop if it owns it.
pub(crate) struct RawObject {
    ctx: Context,
    id: ObjectId,
    kind: ObjectKind,
    flags: Cell<ObjectFlags>,
}

impl RawObject {
    /// Allocates a name. Whether the object comes into existence right away
    /// depends on the creation strategy of the context.
    pub fn new(ctx: &Context, kind: ObjectKind) -> Result<Self> {
        let eager = ctx.implementations().creates_eagerly();

        let id = {
            let mut driver = ctx.driver();
            match (kind, eager) {
                (ObjectKind::Framebuffer, true) => driver.create_framebuffer(),
                (ObjectKind::Framebuffer, false) => driver.gen_framebuffer(),
                (ObjectKind::Renderbuffer, true) => driver.create_renderbuffer(),
                (ObjectKind::Renderbuffer, false) => driver.gen_renderbuffer(),
                (ObjectKind::TransformFeedback, true) => driver.create_transform_feedback(),
                (ObjectKind::TransformFeedback, false) => driver.gen_transform_feedback(),
                (ObjectKind::Buffer, true) => driver.create_buffer(),
                (ObjectKind::Buffer, false) => driver.gen_buffer(),
            }
        };

        if id == 0 {
            return Err(Error::creation(kind.name(), "the driver returned no name"));
        }

        debug!(
            "[GL] Allocated {} {} ({}).",
            kind.name(),
            id,
            if eager { "created" } else { "deferred" }
        );

        let mut flags = ObjectFlags::DELETE_ON_DROP;
        if eager {
            flags |= ObjectFlags::CREATED;
        }

        Ok(RawObject::wrap(ctx, kind, id, flags))
    }

    /// Takes a name which was allocated elsewhere.
    pub fn wrap(ctx: &Context, kind: ObjectKind, id: ObjectId, flags: ObjectFlags) -> Self {
        RawObject {
            ctx: ctx.clone(),
            id,
            kind,
            flags: Cell::new(flags),
        }
    }

    #[inline]
    pub fn ctx(&self) -> &Context {
        &self.ctx
    }

    #[inline]
    pub fn id(&self) -> ObjectId {
        self.id
    }

    #[inline]
    pub fn flags(&self) -> ObjectFlags {
        self.flags.get()
    }

    #[inline]
    pub fn is_created(&self) -> bool {
        self.flags.get().contains(ObjectFlags::CREATED)
    }

    #[inline]
    pub fn mark_created(&self) {
        self.flags.set(self.flags.get() | ObjectFlags::CREATED);
    }

    #[inline]
    pub fn variant(&self, op: OperationKind) -> Variant {
        self.ctx.implementation(op)
    }

    /// The variant of an edit of this object, see `ImplementationTable::edit`.
    #[inline]
    pub fn edit_variant(&self, op: OperationKind) -> Variant {
        self.ctx.implementations().edit(op)
    }

    /// Gives up ownership, the object outlives the handle.
    pub fn release(&mut self) -> ObjectId {
        self.flags.set(self.flags.get() - ObjectFlags::DELETE_ON_DROP);
        self.id
    }

    /// Labels an existing object. Ignored without debug label support.
    pub fn set_label(&self, label: &str) {
        if self.variant(OperationKind::Label) == Variant::NoOp {
            return;
        }

        debug_assert!(self.is_created());
        self.ctx.driver().object_label(self.kind, self.id, label);
    }

    /// Returns the label, always empty without debug label support or if
    /// the object does not exist yet.
    pub fn label(&self) -> String {
        if self.variant(OperationKind::Label) == Variant::NoOp || !self.is_created() {
            return String::new();
        }

        self.ctx.driver().get_object_label(self.kind, self.id)
    }
}

impl Drop for RawObject {
    fn drop(&mut self) {
        if !self.flags.get().contains(ObjectFlags::DELETE_ON_DROP) {
            return;
        }

        {
            let mut driver = self.ctx.driver();
            match self.kind {
                ObjectKind::Framebuffer => driver.delete_framebuffer(self.id),
                ObjectKind::Renderbuffer => driver.delete_renderbuffer(self.id),
                ObjectKind::TransformFeedback => driver.delete_transform_feedback(self.id),
                ObjectKind::Buffer => driver.delete_buffer(self.id),
            }
        }

        self.ctx.forget(self.kind.binding_targets(), self.id);
        debug!("[GL] Deleted {} {}.", self.kind.name(), self.id);
    }
}
