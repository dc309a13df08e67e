//! # What is This?
//!
//! State-tracked OpenGL framebuffers, renderbuffers and transform feedback
//! objects.
//!
//! A `Context` probes the capabilities of the native context once, picks the
//! code path of every capability-sensitive operation from those capabilities,
//! and keeps a cache of what is bound to each binding point. The resource
//! handles route every native call through that cache, so redundant binds and
//! viewport updates never reach the driver.
//!
//! ```rust
//! use crayon_gl::prelude::*;
//!
//! let ctx = Context::new(crayon_gl::backends::new_headless(), ContextParams::default()).unwrap();
//! let fb = Framebuffer::new(&ctx, Rect::with_size((128, 128))).unwrap();
//! fb.bind(FramebufferTarget::Draw).unwrap();
//! fb.clear(ClearMask::COLOR | ClearMask::DEPTH).unwrap();
//! ```
//!
//! All handles of a context must stay on the thread the native context is
//! current on; `Context` is neither `Send` nor `Sync`.

#[macro_use]
extern crate log;

pub mod backends;
pub mod buffer;
pub mod context;
pub mod errors;
pub mod framebuffer;
pub mod image;
pub mod math;
pub mod object;
pub mod renderbuffer;
pub mod transform_feedback;

pub mod prelude;
