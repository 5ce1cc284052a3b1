//! 掩码轮廓在原扫描切片上的叠加渲染.

use super::{MaskSlice, ScanSlice};
use crate::consts::rgb;
use crate::CtWindow;
use image::{Rgb, RgbImage};

/// 轮廓叠加图: 原扫描切片的灰度渲染 + 掩码边缘的红色轮廓.
///
/// 两个切片均为借用视图, 该结构自身不持有像素数据.
pub struct ContourOverlay<'a> {
    scan: ScanSlice<'a>,
    mask: MaskSlice<'a>,
    window: CtWindow,
}

impl<'a> ContourOverlay<'a> {
    /// 以默认的肺窗创建叠加图.
    ///
    /// 若 `scan` 与 `mask` 形状不一致, 则程序 panic.
    pub fn new(scan: ScanSlice<'a>, mask: MaskSlice<'a>) -> Self {
        assert_eq!(scan.shape(), mask.shape(), "扫描切片和掩码切片形状不一致");
        Self {
            scan,
            mask,
            window: CtWindow::from_lung_visual(),
        }
    }

    /// 替换灰度渲染所用的 CT 窗.
    #[inline]
    pub fn with_window(mut self, window: CtWindow) -> Self {
        self.window = window;
        self
    }

    /// 渲染叠加图.
    ///
    /// 扫描 HU 值经 CT 窗映射为灰度; 掩码边缘像素 (0.5 等值线经过的前景像素,
    /// 见 [`MaskSlice::is_boundary`]) 覆盖为红色.
    ///
    /// # Panic
    ///
    /// 扫描切片中出现非有穷 HU 值时 panic.
    pub fn render(&self) -> RgbImage {
        let (height, width) = self.scan.shape();
        let mut buf = RgbImage::new(width as u32, height as u32);
        for ((h, w), &hu) in self.scan.indexed_iter() {
            let pix = if self.mask.is_boundary((h, w)) {
                rgb::CONTOUR
            } else {
                let gray = self.window.eval(hu).unwrap();
                [gray, gray, gray]
            };
            buf.put_pixel(w as u32, h as u32, Rgb(pix));
        }
        buf
    }
}
