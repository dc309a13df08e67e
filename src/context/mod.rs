//! The owner of everything that is shared by the handles of one native
//! context: the driver, the capabilities, the selected implementations and
//! the binding state cache.
//!
//! A `Context` is cheap to clone, every handle keeps one. It is neither `Send`
//! nor `Sync`, all handles of a context live on the thread that made the
//! native context current. Independent contexts share nothing.

pub mod capabilities;
pub mod implementations;
pub mod settings;
pub mod state;

pub use self::capabilities::{check_capabilities, Capabilities, Extensions, Feature, Profile, Version};
pub use self::implementations::{ImplementationTable, OperationKind, Variant};
pub use self::settings::ContextParams;
pub use self::state::{BindingTarget, State, DISENGAGED_VIEWPORT};

use std::cell::{RefCell, RefMut};
use std::rc::Rc;

use crate::backends::{Driver, ObjectId};
use crate::errors::*;
use crate::framebuffer::FramebufferTarget;
use crate::math::prelude::Rect;

struct ContextInner {
    driver: RefCell<Box<dyn Driver>>,
    capabilities: Capabilities,
    implementations: ImplementationTable,
    state: RefCell<State>,
    params: ContextParams,
}

#[derive(Clone)]
pub struct Context {
    inner: Rc<ContextInner>,
}

impl Context {
    /// Probes the capabilities of the native context behind `driver`, and
    /// selects the implementation of every capability-sensitive operation.
    ///
    /// This is the only place where probing and selection happen. A context
    /// that was lost must be recreated from scratch.
    pub fn new(mut driver: Box<dyn Driver>, params: ContextParams) -> Result<Self> {
        let capabilities = Capabilities::query(&*driver, params.disabled_extensions.as_slice())?;
        if params.verbose {
            info!("[GL] {:#?}", capabilities);
        } else {
            debug!("[GL] {:#?}", capabilities);
        }

        check_capabilities(&capabilities)?;

        let implementations = ImplementationTable::select(&capabilities);
        if params.verbose {
            info!("[GL] Implementations {:#?}", implementations);
        } else {
            debug!("[GL] Implementations {:#?}", implementations);
        }

        // Pixel reads are tightly packed, `image::data_size` relies on it.
        driver.pack_alignment(1);

        Ok(Context {
            inner: Rc::new(ContextInner {
                driver: RefCell::new(driver),
                capabilities,
                implementations,
                state: RefCell::new(State::default()),
                params,
            }),
        })
    }

    #[inline]
    pub fn capabilities(&self) -> &Capabilities {
        &self.inner.capabilities
    }

    #[inline]
    pub fn implementations(&self) -> &ImplementationTable {
        &self.inner.implementations
    }

    /// Shortcut of `implementations().get(op)`.
    #[inline]
    pub fn implementation(&self, op: OperationKind) -> Variant {
        self.inner.implementations.get(op)
    }

    #[inline]
    pub fn params(&self) -> &ContextParams {
        &self.inner.params
    }

    /// Returns a snapshot of the binding state cache.
    #[inline]
    pub fn state(&self) -> State {
        *self.inner.state.borrow()
    }

    /// Marks every binding point and the viewport as unknown. Call this after
    /// foreign code had a chance to change bindings of the native context.
    pub fn reset_state(&self) {
        self.inner.state.borrow_mut().reset();
    }

    /// Pulls the oldest latched driver error, if any. Errors are never polled
    /// implicitly.
    pub fn error(&self) -> Option<DriverError> {
        self.driver().get_error()
    }

    /// Fails with the oldest latched driver error.
    pub fn check(&self) -> Result<()> {
        match self.error() {
            Some(err) => Err(err.into()),
            None => Ok(()),
        }
    }

    /// Sets the color used by subsequent color clears.
    pub fn set_clear_color(&self, color: [f32; 4]) {
        self.driver().clear_color(color);
    }

    /// Checks if two contexts are the same.
    #[inline]
    pub fn ptr_eq(&self, other: &Context) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Borrows the driver. The borrow must not outlive a single native call
    /// sequence, nested borrows panic.
    #[inline]
    pub(crate) fn driver(&self) -> RefMut<Box<dyn Driver>> {
        self.inner.driver.borrow_mut()
    }

    #[inline]
    pub(crate) fn is_bound(&self, target: BindingTarget, id: ObjectId) -> bool {
        self.inner.state.borrow().is_bound(target, id)
    }

    /// Binds `id` to `target` unless the cache says it is already there.
    /// Returns true if a native call was issued.
    pub(crate) fn bind(&self, target: BindingTarget, id: ObjectId) -> bool {
        let mut state = self.inner.state.borrow_mut();
        if state.is_bound(target, id) {
            return false;
        }

        {
            let mut driver = self.driver();
            match target {
                BindingTarget::ReadFramebuffer => driver.bind_framebuffer(FramebufferTarget::Read, id),
                BindingTarget::DrawFramebuffer => driver.bind_framebuffer(FramebufferTarget::Draw, id),
                BindingTarget::Renderbuffer => driver.bind_renderbuffer(id),
                BindingTarget::TransformFeedback => driver.bind_transform_feedback(id),
            }
        }

        state.set_bound(target, id);
        true
    }

    /// Updates the native viewport unless the cache says it is already set.
    pub(crate) fn apply_viewport(&self, rect: Rect) -> bool {
        let mut state = self.inner.state.borrow_mut();
        if state.viewport() == rect {
            return false;
        }

        match self.implementation(OperationKind::ViewportSet) {
            Variant::NoOp => return false,
            _ => self.driver().viewport(rect),
        }

        state.set_viewport(rect);
        true
    }

    /// Drops the cached bindings of a deleted object.
    pub(crate) fn forget(&self, targets: &[BindingTarget], id: ObjectId) {
        self.inner.state.borrow_mut().forget(targets, id);
    }
}

impl From<FramebufferTarget> for BindingTarget {
    fn from(target: FramebufferTarget) -> Self {
        match target {
            FramebufferTarget::Read => BindingTarget::ReadFramebuffer,
            FramebufferTarget::Draw => BindingTarget::DrawFramebuffer,
        }
    }
}
