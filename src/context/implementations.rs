//! Selection of the code path used by every capability-sensitive operation.
//!
//! The choice is made once, right after the capabilities of a context were
//! probed, and never changes for the lifetime of that context. Every operation
//! kind has a fixed list of variants in descending preference. The first
//! variant the capabilities allow wins; the last entry of each list needs
//! nothing beyond what `check_capabilities` already demands, so selection
//! never fails.
//!
//! Preference order puts the variant with the least state mutation first
//! (direct access never touches binding points), then the newer extension.

use std::fmt;

use super::capabilities::{Capabilities, Feature};

/// Operations whose native entry points depend on the context capabilities.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum OperationKind {
    /// How objects come into existence: eagerly, or on first bind.
    Create,
    /// How objects are made current before they are edited.
    Bind,
    ViewportSet,
    DrawBuffersSet,
    ReadBufferSet,
    Invalidate,
    AttachTexture,
    AttachRenderbuffer,
    CheckStatus,
    ReadPixels,
    Blit,
    RenderbufferStorage,
    TransformFeedbackAttach,
    Label,
}

impl OperationKind {
    pub const ALL: [OperationKind; 14] = [
        OperationKind::Create,
        OperationKind::Bind,
        OperationKind::ViewportSet,
        OperationKind::DrawBuffersSet,
        OperationKind::ReadBufferSet,
        OperationKind::Invalidate,
        OperationKind::AttachTexture,
        OperationKind::AttachRenderbuffer,
        OperationKind::CheckStatus,
        OperationKind::ReadPixels,
        OperationKind::Blit,
        OperationKind::RenderbufferStorage,
        OperationKind::TransformFeedbackAttach,
        OperationKind::Label,
    ];

    /// Candidate variants, most preferred first.
    pub fn preferences(self) -> &'static [Variant] {
        match self {
            OperationKind::ViewportSet => &[Variant::Default],
            OperationKind::ReadPixels => &[Variant::Robust, Variant::Default],
            OperationKind::Invalidate => &[Variant::DirectAccess, Variant::Fallback, Variant::NoOp],
            OperationKind::Label => &[Variant::Default, Variant::NoOp],
            _ => &[Variant::DirectAccess, Variant::Fallback],
        }
    }

    #[inline]
    fn index(self) -> usize {
        self as usize
    }
}

/// A concrete code path.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Variant {
    /// The plain entry point, available everywhere.
    Default,
    /// Operates on the object name, leaving every binding point untouched.
    DirectAccess,
    /// Bounds-checked against the size of the client memory.
    Robust,
    /// Binds the object through the state cache, then uses the target-based
    /// entry point.
    Fallback,
    /// The operation is advisory and the context can not do it, so skip it.
    NoOp,
}

impl Variant {
    /// Checks if `caps` allows this variant for `op`.
    pub fn is_available(self, op: OperationKind, caps: &Capabilities) -> bool {
        match self {
            Variant::DirectAccess => {
                caps.supports(Feature::DirectStateAccess)
                    && match op {
                        OperationKind::Invalidate => caps.supports(Feature::Invalidate),
                        OperationKind::TransformFeedbackAttach => {
                            caps.supports(Feature::TransformFeedback)
                        }
                        _ => true,
                    }
            }
            Variant::Robust => caps.supports(Feature::Robustness),
            Variant::Fallback => match op {
                OperationKind::Invalidate => caps.supports(Feature::Invalidate),
                _ => true,
            },
            Variant::Default => match op {
                OperationKind::Label => caps.supports(Feature::DebugLabel),
                _ => true,
            },
            Variant::NoOp => true,
        }
    }
}

/// The variants chosen for one context.
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct ImplementationTable {
    variants: [Variant; 14],
}

impl ImplementationTable {
    /// Picks the most preferred available variant of every operation kind.
    pub fn select(caps: &Capabilities) -> Self {
        let mut variants = [Variant::Default; 14];

        for &op in OperationKind::ALL.iter() {
            let prefs = op.preferences();
            variants[op.index()] = prefs
                .iter()
                .cloned()
                .find(|v| v.is_available(op, caps))
                .unwrap_or(prefs[prefs.len() - 1]);
        }

        ImplementationTable { variants }
    }

    #[inline]
    pub fn get(&self, op: OperationKind) -> Variant {
        self.variants[op.index()]
    }

    /// Checks if objects are created on construction instead of on first bind.
    #[inline]
    pub fn creates_eagerly(&self) -> bool {
        self.get(OperationKind::Create) == Variant::DirectAccess
    }

    /// Returns the variant an edit dispatched through `op` runs with.
    ///
    /// Naming the object directly is only done if `Bind` is direct access as
    /// well. Otherwise the object is bound through the cache first and the
    /// target-based entry point is used.
    pub fn edit(&self, op: OperationKind) -> Variant {
        match self.get(op) {
            Variant::DirectAccess if self.get(OperationKind::Bind) != Variant::DirectAccess => {
                Variant::Fallback
            }
            v => v,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (OperationKind, Variant)> + '_ {
        OperationKind::ALL.iter().map(move |&op| (op, self.get(op)))
    }
}

impl fmt::Debug for ImplementationTable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(bind: Variant, op: OperationKind, variant: Variant) -> ImplementationTable {
        let mut variants = [Variant::Default; 14];
        variants[OperationKind::Bind.index()] = bind;
        variants[op.index()] = variant;
        ImplementationTable { variants }
    }

    #[test]
    fn edits_follow_bind() {
        let t = table(Variant::DirectAccess, OperationKind::AttachTexture, Variant::DirectAccess);
        assert_eq!(t.edit(OperationKind::AttachTexture), Variant::DirectAccess);

        let t = table(Variant::Fallback, OperationKind::AttachTexture, Variant::DirectAccess);
        assert_eq!(t.edit(OperationKind::AttachTexture), Variant::Fallback);
        assert_eq!(t.get(OperationKind::AttachTexture), Variant::DirectAccess);

        let t = table(Variant::Fallback, OperationKind::Invalidate, Variant::NoOp);
        assert_eq!(t.edit(OperationKind::Invalidate), Variant::NoOp);
    }
}
