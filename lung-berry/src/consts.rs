//! 通用常量.

/// 单通道颜色.
pub mod gray {
    /// 单通道黑色.
    pub const BLACK: u8 = 0b_0000_0000;

    /// 单通道暗灰色.
    pub const DARK_GRAY: u8 = 0b_0100_0000;

    /// 单通道灰色.
    pub const GRAY: u8 = 0b_1000_0000;

    /// 单通道亮灰色.
    pub const LIGHT_GRAY: u8 = 0b_1100_0000;

    /// 单通道白色.
    pub const WHITE: u8 = 0b_1111_1111;
}

/// 三通道颜色.
pub mod rgb {
    /// 轮廓叠加色 (红色). 与原扫描的灰度渲染对比鲜明.
    pub const CONTOUR: [u8; 3] = [0xff, 0x00, 0x00];
}

/// Otsu 全局阈值计算所用的直方图桶数.
pub const OTSU_BINS: usize = 256;

/// 压缩 nifti 文件的后缀.
pub const NII_GZ_SUFFIX: &str = ".nii.gz";

/// 输出轮廓图文件名的固定前缀.
pub const OUTPUT_PREFIX: &str = "lung_contours_";
