//! This module contains the math utils, which mainly come from `cgmath`.

pub use cgmath::*;

pub mod rect;
pub use self::rect::Rect;

pub mod prelude {
    pub use super::rect::Rect;
    pub use cgmath::{Point2, Vector2};
}
