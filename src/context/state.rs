//! The binding state cache of a context.
//!
//! The cache is write-through: every native bind issued through this crate is
//! recorded right after it is issued. Bindings made behind the back of this
//! crate (foreign code using the same native context) make the cache stale;
//! call `Context::reset_state` after handing control to such code.

use crate::backends::ObjectId;
use crate::math::prelude::{Point2, Rect};

/// Binding points tracked by the cache.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum BindingTarget {
    ReadFramebuffer,
    DrawFramebuffer,
    Renderbuffer,
    TransformFeedback,
}

impl BindingTarget {
    pub const ALL: [BindingTarget; 4] = [
        BindingTarget::ReadFramebuffer,
        BindingTarget::DrawFramebuffer,
        BindingTarget::Renderbuffer,
        BindingTarget::TransformFeedback,
    ];

    #[inline]
    fn index(self) -> usize {
        self as usize
    }
}

/// The sentinel viewport of a freshly reset cache. It is inverted, so it
/// compares unequal to every rectangle a handle can hold, zero-sized ones
/// included.
pub const DISENGAGED_VIEWPORT: Rect = Rect {
    min: Point2 { x: 0, y: 0 },
    max: Point2 { x: -1, y: -1 },
};

/// What is currently bound to each binding point, plus the last viewport.
///
/// A slot holding `None` is unknown. It never matches a requested binding, so
/// the next bind to that point is always issued, including a bind of the
/// default object `0`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct State {
    bindings: [Option<ObjectId>; 4],
    viewport: Rect,
}

impl Default for State {
    fn default() -> Self {
        State {
            bindings: [None; 4],
            viewport: DISENGAGED_VIEWPORT,
        }
    }
}

impl State {
    /// Returns the object bound to `target`, or `None` if unknown.
    #[inline]
    pub fn bound(&self, target: BindingTarget) -> Option<ObjectId> {
        self.bindings[target.index()]
    }

    /// Records that `id` was just bound to `target`.
    #[inline]
    pub fn set_bound(&mut self, target: BindingTarget, id: ObjectId) {
        self.bindings[target.index()] = Some(id);
    }

    /// Checks if `id` is known to be bound to `target`.
    #[inline]
    pub fn is_bound(&self, target: BindingTarget, id: ObjectId) -> bool {
        self.bound(target) == Some(id)
    }

    #[inline]
    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    #[inline]
    pub fn set_viewport(&mut self, rect: Rect) {
        self.viewport = rect;
    }

    /// Forgets everything, the next bind or viewport update is always issued.
    pub fn reset(&mut self) {
        *self = State::default();
    }

    /// Drops every slot that refers to `id` in one of `targets`. Used when the
    /// object is deleted, since the native API silently rebinds the default
    /// object in that case.
    pub(crate) fn forget(&mut self, targets: &[BindingTarget], id: ObjectId) {
        for &target in targets {
            if self.is_bound(target, id) {
                self.bindings[target.index()] = Some(0);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_is_unknown() {
        let mut state = State::default();
        state.set_bound(BindingTarget::DrawFramebuffer, 0);
        assert!(state.is_bound(BindingTarget::DrawFramebuffer, 0));

        state.reset();
        for &target in BindingTarget::ALL.iter() {
            assert_eq!(state.bound(target), None);
            assert!(!state.is_bound(target, 0));
        }

        assert_eq!(state.viewport(), DISENGAGED_VIEWPORT);
        assert!(state.viewport() != Rect::zero());
    }

    #[test]
    fn forget() {
        let mut state = State::default();
        state.set_bound(BindingTarget::ReadFramebuffer, 3);
        state.set_bound(BindingTarget::DrawFramebuffer, 4);

        state.forget(&[BindingTarget::ReadFramebuffer, BindingTarget::DrawFramebuffer], 3);
        assert_eq!(state.bound(BindingTarget::ReadFramebuffer), Some(0));
        assert_eq!(state.bound(BindingTarget::DrawFramebuffer), Some(4));
    }
}
