//! Copies between framebuffers.

use super::{AbstractFramebuffer, BlitFilter, BlitMask, FramebufferTarget};
use crate::context::{OperationKind, Variant};
use crate::errors::*;
use crate::math::prelude::Rect;

/// Copies `source_rect` of `source` to `destination_rect` of `destination`.
///
/// `filter` is required if the rectangles differ in size, and only color can
/// be scaled. If they have the same size, `None` means nearest filtering.
/// Invalid geometry is reported as `Error::InvalidBlitGeometry` before any
/// native call.
///
/// Without direct state access, `source` ends up bound for reading and
/// `destination` for drawing. The previous bindings are not restored.
pub fn blit<S, D>(
    source: &S,
    destination: &D,
    source_rect: Rect,
    destination_rect: Rect,
    mask: BlitMask,
    filter: Option<BlitFilter>,
) -> Result<()>
where
    S: AbstractFramebuffer + ?Sized,
    D: AbstractFramebuffer + ?Sized,
{
    assert!(
        source.context().ptr_eq(destination.context()),
        "Can not blit between framebuffers of different contexts."
    );

    let filter = validate(source_rect, destination_rect, mask, filter)?;

    let src = source.base();
    let dst = destination.base();
    src.validate()?;
    dst.validate()?;

    let ctx = src.ctx();
    match ctx.implementation(OperationKind::Blit) {
        Variant::DirectAccess => {
            src.create_if_not_already()?;
            dst.create_if_not_already()?;
            ctx.driver().blit_named_framebuffer(
                src.id(),
                dst.id(),
                source_rect,
                destination_rect,
                mask,
                filter,
            );
        }
        _ => {
            src.bind_internal(FramebufferTarget::Read)?;
            dst.bind_internal(FramebufferTarget::Draw)?;
            ctx.driver()
                .blit_framebuffer(source_rect, destination_rect, mask, filter);
        }
    }

    Ok(())
}

/// Checks the blit parameters and resolves the filter.
pub fn validate(
    source_rect: Rect,
    destination_rect: Rect,
    mask: BlitMask,
    filter: Option<BlitFilter>,
) -> Result<BlitFilter> {
    if mask.is_empty() {
        return Err(Error::InvalidBlitGeometry("the mask is empty".into()));
    }

    let scaled = source_rect.size() != destination_rect.size();
    let depth_stencil = mask.intersects(BlitMask::DEPTH | BlitMask::STENCIL);

    match filter {
        None if scaled => Err(Error::InvalidBlitGeometry(format!(
            "{:?} and {:?} differ in size but no filter was given",
            source_rect, destination_rect
        ))),
        _ if scaled && depth_stencil => Err(Error::InvalidBlitGeometry(
            "depth and stencil can not be scaled".into(),
        )),
        Some(BlitFilter::Linear) if depth_stencil => Err(Error::InvalidBlitGeometry(
            "depth and stencil can only be blitted with nearest filtering".into(),
        )),
        Some(filter) => Ok(filter),
        None => Ok(BlitFilter::Nearest),
    }
}
