//! 钻石 (6-邻域) 连通域标记.

use crate::Idx3d;
use ndarray::{Array3, ArrayView, ArrayView3, Ix3};
use std::collections::VecDeque;

/// 获取 `pos` 前后上下左右六个点的坐标. 不检查越界.
///
/// 两个前景体素直接相连, 当且仅当它们恰好沿一个轴相差一个单位
/// (不含对角线). 该连通规则决定连通域的边界, 不可更改.
#[inline]
fn diamond_neighbours((z, h, w): Idx3d) -> [Idx3d; 6] {
    [
        (z.wrapping_sub(1), h, w),
        (z.saturating_add(1), h, w),
        (z, h.wrapping_sub(1), w),
        (z, h.saturating_add(1), w),
        (z, h, w.wrapping_sub(1)),
        (z, h, w.saturating_add(1)),
    ]
}

/// 一个连通域的元信息.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct RegionRecord {
    /// 连通域标号, 恒为正.
    pub label: u32,

    /// 连通域的体素个数.
    pub area: usize,
}

/// 前景掩码的连通域标记图.
///
/// 0 代表背景; 正整数代表互不相交的极大连通域, 标号按行优先扫描中
/// 首次遇到的顺序从 1 起单调递增.
#[derive(Debug, Clone)]
pub struct LabelMap {
    data: Array3<u32>,
    regions: Vec<RegionRecord>,
}

impl LabelMap {
    /// 对前景掩码运行连通域标记.
    ///
    /// 以行优先顺序遍历掩码, 遇到未标记的前景体素时, 从该体素出发
    /// 按 6-邻域规则 flood fill 整个连通域 (跨越全部切片, 不按切片分治).
    /// 全背景掩码产生空的标记图, 不报错.
    pub fn from_mask(mask: ArrayView3<bool>) -> Self {
        let mut data = Array3::<u32>::zeros(mask.dim());
        let mut regions = Vec::new();
        let mut queue = VecDeque::new();

        for (pos, &fg) in mask.indexed_iter() {
            if !fg || data[pos] != 0 {
                continue;
            }

            // 新连通域.
            let label = regions.len() as u32 + 1;
            let mut area = 0usize;
            data[pos] = label;
            queue.push_back(pos);

            while let Some(cur) = queue.pop_front() {
                area += 1;
                for next in diamond_neighbours(cur) {
                    // 越界索引被 `get` 过滤, 不会触碰 `data`.
                    if mask.get(next).copied().unwrap_or(false) && data[next] == 0 {
                        data[next] = label;
                        queue.push_back(next);
                    }
                }
            }
            regions.push(RegionRecord { label, area });
        }

        Self { data, regions }
    }

    /// 获得标记图数据的一份不可变 shallow copy.
    #[inline]
    pub fn data(&self) -> ArrayView<'_, u32, Ix3> {
        self.data.view()
    }

    /// 获取连通域的个数.
    #[inline]
    pub fn num_labels(&self) -> u32 {
        self.regions.len() as u32
    }

    /// 获取全部连通域的元信息, 按发现 (即标号) 顺序排列.
    #[inline]
    pub fn region_records(&self) -> &[RegionRecord] {
        &self.regions
    }

    /// 选取体素个数最大的连通域.
    ///
    /// 实现为对有序元信息序列的从左到右 fold, 比较使用严格大于,
    /// 因此面积相同时保留较早发现 (标号较小) 的连通域. 没有任何
    /// 连通域时返回 `None`, 不存在隐式的 "无获胜者" 初值.
    pub fn largest_region(&self) -> Option<RegionRecord> {
        self.regions
            .iter()
            .copied()
            .fold(None, |best, r| match best {
                Some(b) if r.area > b.area => Some(r),
                None => Some(r),
                keep => keep,
            })
    }

    /// 重建仅含标号 `label` 的前景掩码.
    ///
    /// 返回新分配的布尔体, `true` 恰好出现在携带该标号的体素处.
    /// `label` 必须为正, 否则程序 panic.
    pub fn mask_of(&self, label: u32) -> Array3<bool> {
        assert_ne!(label, 0, "0 是背景, 不是连通域标号");
        self.data.mapv(|l| l == label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mask_from(positions: &[Idx3d], dim: Idx3d) -> Array3<bool> {
        let mut m = Array3::from_elem(dim, false);
        for &pos in positions {
            m[pos] = true;
        }
        m
    }

    #[test]
    fn test_empty_mask_has_no_regions() {
        let m = Array3::from_elem((2, 3, 4), false);
        let map = LabelMap::from_mask(m.view());

        assert_eq!(map.num_labels(), 0);
        assert!(map.region_records().is_empty());
        assert_eq!(map.largest_region(), None);
        assert!(map.data().iter().all(|&l| l == 0));
    }

    #[test]
    fn test_single_cube_single_label() {
        let mut positions = vec![];
        for z in 1..3 {
            for h in 1..3 {
                for w in 1..3 {
                    positions.push((z, h, w));
                }
            }
        }
        let m = mask_from(&positions, (4, 4, 4));
        let map = LabelMap::from_mask(m.view());

        assert_eq!(map.num_labels(), 1);
        assert_eq!(map.largest_region(), Some(RegionRecord { label: 1, area: 8 }));
        for &pos in positions.iter() {
            assert_eq!(map.data()[pos], 1);
        }
    }

    #[test]
    fn test_labels_follow_scan_order() {
        // 行优先扫描: (0,0,3) 先于 (0,2,0) 被发现.
        let m = mask_from(&[(0, 0, 3), (0, 2, 0), (1, 2, 2)], (2, 3, 4));
        let map = LabelMap::from_mask(m.view());

        assert_eq!(map.num_labels(), 3);
        assert_eq!(map.data()[(0, 0, 3)], 1);
        assert_eq!(map.data()[(0, 2, 0)], 2);
        assert_eq!(map.data()[(1, 2, 2)], 3);
    }

    #[test]
    fn test_diagonal_voxels_are_disconnected() {
        // 三种对角关系都不算相邻.
        let m = mask_from(&[(0, 0, 0), (0, 1, 1), (1, 1, 0), (1, 0, 1)], (2, 2, 2));
        let map = LabelMap::from_mask(m.view());
        assert_eq!(map.num_labels(), 4);
    }

    #[test]
    fn test_component_merges_across_slices() {
        // U 形: 两条竖柱仅经 z=2 的横梁相连, 必须合并为单一连通域.
        let m = mask_from(
            &[
                (0, 0, 0),
                (1, 0, 0),
                (2, 0, 0),
                (2, 0, 1),
                (2, 0, 2),
                (1, 0, 2),
                (0, 0, 2),
            ],
            (3, 1, 3),
        );
        let map = LabelMap::from_mask(m.view());

        assert_eq!(map.num_labels(), 1);
        assert_eq!(map.largest_region(), Some(RegionRecord { label: 1, area: 7 }));
    }

    #[test]
    fn test_component_maximality() {
        // 两个连通域; 任何与已标记体素相邻的前景体素不得遗留为 0.
        let m = mask_from(&[(0, 0, 0), (0, 0, 1), (0, 2, 2), (1, 2, 2)], (2, 3, 3));
        let map = LabelMap::from_mask(m.view());

        assert_eq!(map.num_labels(), 2);
        for (pos, &fg) in m.indexed_iter() {
            assert_eq!(fg, map.data()[pos] > 0, "位置 {pos:?}");
        }
        assert_eq!(map.data()[(0, 0, 0)], map.data()[(0, 0, 1)]);
        assert_eq!(map.data()[(0, 2, 2)], map.data()[(1, 2, 2)]);
    }

    #[test]
    fn test_tie_break_keeps_smaller_label() {
        // 沿 w 轴的孤立块, 面积依次为 1, 1, 2, 1, 2:
        // 最大面积 2 同时出现在标号 3 和 5, 必须选 3.
        let m = mask_from(
            &[
                (0, 0, 0),
                (0, 0, 2),
                (0, 0, 4),
                (0, 0, 5),
                (0, 0, 7),
                (0, 0, 9),
                (0, 0, 10),
            ],
            (1, 1, 12),
        );
        let map = LabelMap::from_mask(m.view());

        assert_eq!(map.num_labels(), 5);
        assert_eq!(map.largest_region(), Some(RegionRecord { label: 3, area: 2 }));
    }

    #[test]
    fn test_mask_of_rebuilds_exactly_one_region() {
        let m = mask_from(&[(0, 0, 0), (0, 0, 1), (0, 2, 2)], (1, 3, 3));
        let map = LabelMap::from_mask(m.view());
        let rebuilt = map.mask_of(1);

        assert!(rebuilt[(0, 0, 0)]);
        assert!(rebuilt[(0, 0, 1)]);
        assert!(!rebuilt[(0, 2, 2)]);
        // 重建掩码 ⊆ 原掩码.
        for (pos, &fg) in rebuilt.indexed_iter() {
            if fg {
                assert!(m[pos]);
            }
        }
    }

    #[test]
    #[should_panic(expected = "背景")]
    fn test_mask_of_rejects_background_label() {
        let m = Array3::from_elem((1, 1, 1), false);
        let map = LabelMap::from_mask(m.view());
        let _ = map.mask_of(0);
    }
}
