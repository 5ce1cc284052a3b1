use crate::Idx2d;
use ndarray::iter::{IndexedIter, Iter};
use ndarray::{ArrayView2, Ix2};
use std::ops::Index;

/// 不可变、借用的二维水平 CT 扫描切片.
pub struct ScanSlice<'a> {
    /// 底层数据的轻量级视图, 借用于 [`crate::CtVolume`].
    ///
    /// 这里有意把代码写死为 `ArrayView` 降低灵活性, 但使结构的意图更加明确.
    data: ArrayView2<'a, f32>,
}

impl Index<Idx2d> for ScanSlice<'_> {
    type Output = f32;

    #[inline]
    fn index(&self, index: Idx2d) -> &Self::Output {
        &self.data[index]
    }
}

impl<'a> ScanSlice<'a> {
    /// 直接初始化.
    #[inline]
    pub(crate) fn new(data: ArrayView2<'a, f32>) -> Self {
        Self { data }
    }

    /// 获得 **底层** 数据的一份不可变 shallow copy.
    #[inline]
    pub fn array_view(&self) -> ArrayView2<f32> {
        self.data.view()
    }

    /// 获取切片形状, 格式为 (高, 宽).
    #[inline]
    pub fn shape(&self) -> Idx2d {
        self.data.dim()
    }

    /// 获取给定位置 (高, 宽) 的 HU 值. 越界时返回 `None`.
    #[inline]
    pub fn get(&self, pos: Idx2d) -> Option<&f32> {
        self.data.get(pos)
    }

    /// 获取可以迭代切片像素的迭代器.
    #[inline]
    pub fn iter(&self) -> Iter<'_, f32, Ix2> {
        self.data.iter()
    }

    /// 获取可以按 ((高, 宽), HU 值) 迭代切片像素的迭代器.
    #[inline]
    pub fn indexed_iter(&self) -> IndexedIter<'_, f32, Ix2> {
        self.data.indexed_iter()
    }
}

/// 不可变、借用的二维水平分割掩码切片. `true` 代表前景.
pub struct MaskSlice<'a> {
    /// 底层数据的轻量级视图, 借用于一个 `Array3<bool>` 掩码.
    data: ArrayView2<'a, bool>,
}

impl Index<Idx2d> for MaskSlice<'_> {
    type Output = bool;

    #[inline]
    fn index(&self, index: Idx2d) -> &Self::Output {
        &self.data[index]
    }
}

/// 获得 `(h, w)` 的 4-邻居索引. 不检查越界.
#[inline]
fn neighbour4((h, w): Idx2d) -> [Idx2d; 4] {
    [
        (h.wrapping_sub(1), w),
        (h.saturating_add(1), w),
        (h, w.wrapping_sub(1)),
        (h, w.saturating_add(1)),
    ]
}

impl<'a> MaskSlice<'a> {
    /// 直接初始化.
    #[inline]
    pub(crate) fn new(data: ArrayView2<'a, bool>) -> Self {
        Self { data }
    }

    /// 获得 **底层** 数据的一份不可变 shallow copy.
    #[inline]
    pub fn array_view(&self) -> ArrayView2<bool> {
        self.data.view()
    }

    /// 获取切片形状, 格式为 (高, 宽).
    #[inline]
    pub fn shape(&self) -> Idx2d {
        self.data.dim()
    }

    /// 获取给定位置 (高, 宽) 的掩码值. 越界时返回 `None`.
    #[inline]
    pub fn get(&self, pos: Idx2d) -> Option<&bool> {
        self.data.get(pos)
    }

    /// 获取可以按 ((高, 宽), 掩码值) 迭代切片像素的迭代器.
    #[inline]
    pub fn indexed_iter(&self) -> IndexedIter<'_, bool, Ix2> {
        self.data.indexed_iter()
    }

    /// 获取切片中前景像素的个数.
    #[inline]
    pub fn count(&self) -> usize {
        self.data.iter().filter(|p| **p).count()
    }

    /// 判断 `pos` 是否位于掩码边缘.
    ///
    /// 一个前景像素, 当且仅当它的 4-邻域中存在背景像素或图像外区域时,
    /// 位于掩码边缘. 这组像素就是把掩码视作 0/1 连续场时 0.5
    /// 等值线经过的像素. 背景像素与越界索引一律不算边缘.
    pub fn is_boundary(&self, pos: Idx2d) -> bool {
        if !self.get(pos).copied().unwrap_or(false) {
            return false;
        }
        neighbour4(pos)
            .into_iter()
            .any(|p| !self.get(p).copied().unwrap_or(false))
    }

    /// 收集掩码边缘像素的索引, 结果按行优先存储.
    pub fn boundary_positions(&self) -> Vec<Idx2d> {
        self.data
            .indexed_iter()
            .filter_map(|(pos, _)| self.is_boundary(pos).then_some(pos))
            .collect()
    }
}
