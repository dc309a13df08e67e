//! Buffer objects, as far as transform feedback needs them.

use crate::backends::{ObjectId, ObjectKind};
use crate::context::Context;
use crate::errors::*;
use crate::object::{ObjectFlags, RawObject};

/// Hint of how the data store of a buffer will be accessed.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum BufferUsage {
    StreamDraw,
    StreamRead,
    StreamCopy,
    StaticDraw,
    StaticRead,
    StaticCopy,
    DynamicDraw,
    DynamicRead,
    DynamicCopy,
}

pub struct Buffer {
    raw: RawObject,
    size: usize,
}

impl Buffer {
    pub fn new(ctx: &Context) -> Result<Self> {
        Ok(Buffer {
            raw: RawObject::new(ctx, ObjectKind::Buffer)?,
            size: 0,
        })
    }

    /// Takes ownership of a buffer that was allocated elsewhere.
    pub fn wrap(ctx: &Context, id: ObjectId, flags: ObjectFlags) -> Self {
        Buffer {
            raw: RawObject::wrap(ctx, ObjectKind::Buffer, id, flags),
            size: 0,
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
    pub fn is_created(&self) -> bool {
        self.raw.is_created()
    }

    /// The size in bytes of the data store set through this handle.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// (Re)allocates the data store and fills it with `data`.
    ///
    /// The generic array buffer target is not tracked by the binding state
    /// cache. Without direct state access, whatever was bound there is
    /// replaced.
    pub fn set_data(&mut self, data: &[u8], usage: BufferUsage) {
        let ctx = self.raw.ctx();
        if ctx.implementations().creates_eagerly() {
            self.create_if_not_already();
            ctx.driver().named_buffer_data(self.raw.id(), data, usage);
        } else {
            let mut driver = ctx.driver();
            driver.bind_array_buffer(self.raw.id());
            driver.buffer_data(data, usage);
            self.raw.mark_created();
        }

        self.size = data.len();
    }

    /// Materializes a reserved name by binding it once.
    fn create_if_not_already(&self) {
        if !self.raw.is_created() {
            self.raw.ctx().driver().bind_array_buffer(self.raw.id());
            self.raw.mark_created();
        }
    }
}
