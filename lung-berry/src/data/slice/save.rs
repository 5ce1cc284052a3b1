//! 图像的持久化存储.

use super::{ContourOverlay, MaskSlice, ScanSlice};
use crate::consts::gray;
use image::ImageResult;
use std::path::Path;

/// 表明一个可以通过 **可视化友好** 模式持久化存储的图像对象.
///
/// `ImgWriteVis` trait 的意图是, 图像将以 "可视化友好"
/// 的方式保存, 而不是 "as is" 的方式. 这意味着, 对于 `MaskSlice`
/// 这类布尔图像, 在保存时会映射为黑白两色; 对于 `ScanSlice`
/// 这类以 CT HU 值存储的扫描, 在保存时会用常见的肺部可视化窗口规范化.
pub trait ImgWriteVis {
    /// 按照一定的可视化规则将图片保存到 `path` 路径.
    fn save<P: AsRef<Path>>(&self, path: P) -> ImageResult<()>;
}

/// 窗位 -600, 窗宽 1500.
///
/// # Panic
///
/// 切片中出现非有穷 HU 值时 panic.
impl ImgWriteVis for ScanSlice<'_> {
    fn save<P: AsRef<Path>>(&self, path: P) -> ImageResult<()> {
        let (height, width) = self.shape();
        let mut buf = image::GrayImage::new(width as u32, height as u32);
        const WINDOW: crate::CtWindow = crate::CtWindow::from_lung_visual();
        for ((h, w), &hu) in self.indexed_iter() {
            let gray = WINDOW.eval(hu).unwrap();
            buf.put_pixel(w as u32, h as u32, image::Luma([gray]));
        }
        buf.save(path)
    }
}

/// 前景映射为白色, 背景映射为黑色.
impl ImgWriteVis for MaskSlice<'_> {
    fn save<P: AsRef<Path>>(&self, path: P) -> ImageResult<()> {
        let (height, width) = self.shape();
        let mut buf = image::GrayImage::new(width as u32, height as u32);
        for ((h, w), &fg) in self.indexed_iter() {
            let pix = if fg { gray::WHITE } else { gray::BLACK };
            buf.put_pixel(w as u32, h as u32, image::Luma([pix]));
        }
        buf.save(path)
    }
}

/// 见 [`ContourOverlay::render`].
impl ImgWriteVis for ContourOverlay<'_> {
    fn save<P: AsRef<Path>>(&self, path: P) -> ImageResult<()> {
        self.render().save(path)
    }
}
