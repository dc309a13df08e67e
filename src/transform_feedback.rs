//! Transform feedback objects, which capture vertex shader outputs into
//! buffers.
//!
//! Only one transform feedback object can be bound at a time. While capture is
//! active and not paused, binding another one is a driver error.

use crate::backends::{ObjectId, ObjectKind};
use crate::buffer::Buffer;
use crate::context::{BindingTarget, Context, Feature, OperationKind, Variant};
use crate::errors::*;
use crate::object::{ObjectFlags, RawObject};

/// Primitives captured by transform feedback.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum PrimitiveMode {
    Points,
    Lines,
    Triangles,
}

pub struct TransformFeedback {
    raw: RawObject,
}

impl TransformFeedback {
    /// Fails with `Error::Requirement` if the context has no transform
    /// feedback objects.
    pub fn new(ctx: &Context) -> Result<Self> {
        if !ctx.capabilities().supports(Feature::TransformFeedback) {
            return Err(Error::Requirement("transform feedback objects".into()));
        }

        Ok(TransformFeedback {
            raw: RawObject::new(ctx, ObjectKind::TransformFeedback)?,
        })
    }

    /// Takes ownership of a transform feedback object that was allocated
    /// elsewhere.
    pub fn wrap(ctx: &Context, id: ObjectId, flags: ObjectFlags) -> Self {
        TransformFeedback {
            raw: RawObject::wrap(ctx, ObjectKind::TransformFeedback, id, flags),
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

    /// Checks if the binding state cache records this object as bound.
    pub fn is_bound(&self) -> bool {
        self.context().is_bound(BindingTarget::TransformFeedback, self.id())
    }

    /// Binds through the cache, materializing the object on the first bind.
    pub fn bind(&self) {
        self.context().bind(BindingTarget::TransformFeedback, self.id());
        self.raw.mark_created();
    }

    /// Attaches the whole of `buffer` to binding point `index`.
    pub fn attach_buffer(&self, index: u32, buffer: &Buffer) -> Result<()> {
        self.attach_internal(index, buffer, None)
    }

    /// Attaches `size` bytes of `buffer` starting at `offset` to binding point
    /// `index`.
    pub fn attach_buffer_range(&self, index: u32, buffer: &Buffer, offset: isize, size: isize) -> Result<()> {
        self.attach_internal(index, buffer, Some((offset, size)))
    }

    /// Attaches whole buffers to consecutive binding points starting at
    /// `first`.
    pub fn attach_buffers(&self, first: u32, buffers: &[&Buffer]) -> Result<()> {
        if buffers.is_empty() {
            return Ok(());
        }

        let last = first.checked_add(buffers.len() as u32 - 1).ok_or_else(|| {
            Error::Requirement(format!("transform feedback buffer binding {} and up", first))
        })?;
        self.validate_index(last)?;

        for (i, buffer) in buffers.iter().enumerate() {
            self.attach_internal(first + i as u32, buffer, None)?;
        }

        Ok(())
    }

    /// Binds the object and starts capturing primitives of `mode`.
    pub fn begin(&self, mode: PrimitiveMode) {
        self.bind();
        self.context().driver().begin_transform_feedback(mode);
    }

    pub fn pause(&self) {
        debug_assert!(self.is_bound());
        self.context().driver().pause_transform_feedback();
    }

    pub fn resume(&self) {
        debug_assert!(self.is_bound());
        self.context().driver().resume_transform_feedback();
    }

    pub fn end(&self) {
        debug_assert!(self.is_bound());
        self.context().driver().end_transform_feedback();
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

    /// Materializes a reserved name by binding it once.
    fn create_if_not_already(&self) {
        if !self.raw.is_created() {
            self.bind();
        }
    }

    fn validate_index(&self, index: u32) -> Result<()> {
        let max = self.context().capabilities().max_transform_feedback_buffers;
        if index as i64 >= i64::from(max) {
            return Err(Error::Requirement(format!(
                "transform feedback buffer binding {} (maximum is {})",
                index, max
            )));
        }

        Ok(())
    }

    fn attach_internal(&self, index: u32, buffer: &Buffer, range: Option<(isize, isize)>) -> Result<()> {
        assert!(
            buffer.context().ptr_eq(self.context()),
            "Buffer belongs to another context."
        );

        self.validate_index(index)?;

        match self.raw.edit_variant(OperationKind::TransformFeedbackAttach) {
            Variant::DirectAccess => {
                self.create_if_not_already();
                self.context()
                    .driver()
                    .transform_feedback_buffer(self.id(), index, buffer.id(), range);
            }
            _ => {
                self.bind();
                self.context()
                    .driver()
                    .bind_transform_feedback_buffer(index, buffer.id(), range);
            }
        }

        Ok(())
    }
}
