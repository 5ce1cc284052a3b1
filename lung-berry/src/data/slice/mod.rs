//! 扫描/掩码的二维水平切片视图与渲染.
//!
//! 切片永远是对 3D 数据的轻量级借用, 自身不持有数据.

mod core;
mod overlay;
mod save;

pub use core::{MaskSlice, ScanSlice};
pub use overlay::ContourOverlay;
pub use save::ImgWriteVis;
