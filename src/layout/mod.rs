//! Layout module: Rectangle primitive shared by surfaces and renderers.

mod rect;

pub use rect::Rect;
