#![warn(missing_docs)]

//! 核心库. 提供 3D 肺部 CT nii 文件的结构化信息和无监督分割算法.
//!
//! 分割流水线对每个扫描独立工作, 各阶段严格单向传递数据:
//!
//! 1. 载入 nii 格式 3D 扫描 ([`CtVolume::open`]);
//! 2. 全局 Otsu 阈值 ([`segment::otsu_threshold`]);
//! 3. 二值化 ([`segment::foreground_mask`], 严格大于, 等于阈值的体素算背景);
//! 4. 钻石 (6-邻域) 连通域标记 ([`segment::LabelMap::from_mask`]);
//! 5. 最大连通域选取 ([`segment::LabelMap::largest_region`], 面积相同取较小 label);
//! 6. 重建仅含该连通域的掩码 ([`segment::LabelMap::mask_of`]);
//! 7. 在原扫描切片上叠加掩码轮廓并保存 ([`ContourOverlay`]).
//!
//! 2-6 步由 [`segment::segment_lungs`] 一次性完成.
//!
//! # 注意
//!
//! 1. 各阶段均生成新值, 不原地修改上一阶段的产物. 因此多个扫描可以安全地并发处理
//!   (扫描之间没有任何共享可变状态).
//! 2. 扫描内容为有穷实数由加载端校验: [`CtVolume::open`] 对含 inf/NaN
//!   的文件返回 [`VolumeLoadError::NonFiniteIntensity`], 不会把它们交给
//!   分割流水线. 其余非期望情况下程序会直接 panic, 而不会导致内存错误.
//!   As what Rust promises.
//! 3. 该库不区分肺实质与气管/支气管: 前景里最大的亮连通结构即被当作肺.
//!   对肺不是最大亮结构的扫描, 分割结果没有语义保证.

/// 二维索引, 同时也可一定程度上用作非负整数向量.
pub type Idx2d = (usize, usize);

/// 三维索引, 同时也可一定程度上用作非负整数向量.
pub type Idx3d = (usize, usize, usize);

/// 3D CT nii 文件基础数据结构.
mod data;

pub use data::{
    ContourOverlay, CtVolume, CtWindow, ImgWriteVis, MaskSlice, NiftiHeaderAttr, ScanSlice,
    VolumeLoadError,
};

pub mod consts;

pub mod segment;

pub mod dataset;
pub mod prelude;
