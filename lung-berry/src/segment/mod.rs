//! 肺部分割核心算法.
//!
//! 流水线: 全局 Otsu 阈值 -> 二值化 -> 钻石连通域标记 -> 最大连通域选取
//! -> 掩码重建. 每一步均为输入的纯函数, 产出新值, 不修改任何先前阶段的产物.
//! [`segment_lungs`] 将 2-6 步组合为单次调用.

use crate::data::slice::MaskSlice;
use crate::{CtVolume, NiftiHeaderAttr};
use ndarray::{Array3, ArrayView, ArrayView3, Axis, Ix3};

mod label;
mod threshold;

pub use label::{LabelMap, RegionRecord};
pub use threshold::otsu_threshold;

cfg_if::cfg_if! {
    if #[cfg(feature = "rayon")] {
        use ndarray::Zip;
    }
}

/// 分割的运行时错误.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SegmentError {
    /// 扫描强度分布退化 (全部体素同值或为空), 无法计算前景/背景分界.
    ///
    /// 该情况被定义为错误而非退化阈值, 上层应跳过该文件.
    InsufficientVariation,

    /// 二值化后不存在任何前景连通域, 没有可渲染的对象.
    NoForegroundRegion,
}

/// 对扫描应用阈值, 返回前景掩码.
///
/// 体素为前景当且仅当其强度 **严格大于** `threshold`;
/// 强度恰好等于阈值的体素算背景. 纯函数, 对体素个数线性.
pub fn foreground_mask(data: ArrayView3<f32>, threshold: f32) -> Array3<bool> {
    #[cfg(feature = "rayon")]
    {
        let mut mask = Array3::from_elem(data.dim(), false);
        Zip::from(&mut mask)
            .and(data)
            .par_for_each(|m, &v| *m = v > threshold);
        mask
    }
    #[cfg(not(feature = "rayon"))]
    {
        data.mapv(|v| v > threshold)
    }
}

/// 一次扫描的分割结果: 阈值, 获胜连通域的元信息, 以及只含该连通域的掩码.
#[derive(Debug, Clone)]
pub struct LungSegmentation {
    threshold: f32,
    region: RegionRecord,
    mask: Array3<bool>,
}

impl LungSegmentation {
    /// 本次分割使用的全局 Otsu 阈值.
    #[inline]
    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// 获胜 (最大) 连通域的元信息.
    #[inline]
    pub fn region(&self) -> RegionRecord {
        self.region
    }

    /// 最终掩码中前景体素的个数. 等于 `self.region().area`.
    #[inline]
    pub fn voxel_count(&self) -> usize {
        self.region.area
    }

    /// 获得最终掩码的一份不可变 shallow copy.
    #[inline]
    pub fn mask(&self) -> ArrayView<'_, bool, Ix3> {
        self.mask.view()
    }

    /// 获取掩码 z 空间的第 `z_index` 层切片视图.
    ///
    /// 当 `z_index` 越界时 panic.
    #[inline]
    pub fn slice_at(&self, z_index: usize) -> MaskSlice<'_> {
        MaskSlice::new(self.mask.index_axis(Axis(0), z_index))
    }

    /// 获取能按升序迭代掩码水平切片的迭代器.
    #[inline]
    pub fn slice_iter(&self) -> impl ExactSizeIterator<Item = MaskSlice> {
        self.mask.axis_iter(Axis(0)).map(MaskSlice::new)
    }

    /// 选出切片内前景面积最大的水平切片索引. 面积相同取较小索引.
    ///
    /// 渲染端是 2D 的, 而掩码是 3D 的, 由调用方显式选定切片;
    /// 该函数给出一个确定性的默认选择.
    pub fn best_slice(&self) -> usize {
        let mut best_z = 0usize;
        let mut best_area = 0usize;
        for (z, sli) in self.slice_iter().enumerate() {
            let area = sli.count();
            if area > best_area {
                best_area = area;
                best_z = z;
            }
        }
        best_z
    }
}

/// 对一个 3D 扫描运行完整分割流水线.
///
/// 依次执行: Otsu 阈值 -> 二值化 (严格大于) -> 6-邻域连通域标记 ->
/// 最大连通域选取 (面积相同取较小 label) -> 掩码重建.
/// 对固定输入, 重复运行的结果逐位相同.
///
/// # 错误
///
/// 1. 强度分布退化时返回 [`SegmentError::InsufficientVariation`];
/// 2. 不存在前景连通域时返回 [`SegmentError::NoForegroundRegion`].
pub fn segment_lungs(volume: &CtVolume) -> Result<LungSegmentation, SegmentError> {
    debug_assert_ne!(volume.size(), 0);

    let threshold = otsu_threshold(volume.data())?;
    let mask = foreground_mask(volume.data(), threshold);
    let labels = LabelMap::from_mask(mask.view());
    let region = labels
        .largest_region()
        .ok_or(SegmentError::NoForegroundRegion)?;
    let mask = labels.mask_of(region.label);

    Ok(LungSegmentation {
        threshold,
        region,
        mask,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    /// 4x4x4 背景 0, 内嵌 2x2x2 强度 100 立方体.
    fn cube_volume() -> CtVolume {
        let mut data = Array3::<f32>::zeros((4, 4, 4));
        for z in 1..3 {
            for h in 1..3 {
                for w in 1..3 {
                    data[(z, h, w)] = 100.0;
                }
            }
        }
        CtVolume::fake(data, [1.0, 1.0, 1.0])
    }

    #[test]
    fn test_cube_end_to_end() {
        let vol = cube_volume();
        let seg = segment_lungs(&vol).unwrap();

        // 阈值必须严格落在两个强度之间.
        assert!(seg.threshold() > 0.0);
        assert!(seg.threshold() < 100.0);

        // 唯一连通域, 标号 1, 恰好 8 个体素.
        assert_eq!(seg.region(), RegionRecord { label: 1, area: 8 });
        assert_eq!(seg.voxel_count(), 8);

        // 最终掩码与立方体逐体素一致.
        for (pos, &fg) in seg.mask().indexed_iter() {
            let (z, h, w) = pos;
            let inside = (1..3).contains(&z) && (1..3).contains(&h) && (1..3).contains(&w);
            assert_eq!(fg, inside, "位置 {pos:?}");
        }

        // 掩码包含性: 最终掩码 ⊆ 二值化掩码.
        let binary = foreground_mask(vol.data(), seg.threshold());
        for (pos, &fg) in seg.mask().indexed_iter() {
            if fg {
                assert!(binary[pos]);
            }
        }

        // 最佳渲染切片是立方体经过的切片之一.
        assert_eq!(seg.best_slice(), 1);
        assert_eq!(seg.slice_at(1).count(), 4);
    }

    #[test]
    fn test_uniform_volume_is_insufficient_variation() {
        let vol = CtVolume::fake(Array3::from_elem((3, 3, 3), 42.0), [1.0, 1.0, 1.0]);
        assert_eq!(
            segment_lungs(&vol).unwrap_err(),
            SegmentError::InsufficientVariation
        );
    }

    #[test]
    fn test_threshold_boundary_is_background() {
        let mut data = Array3::<f32>::zeros((1, 1, 3));
        data[(0, 0, 0)] = 50.0;
        data[(0, 0, 1)] = 100.0;
        let mask = foreground_mask(data.view(), 50.0);

        // 恰好等于阈值 -> 背景.
        assert!(!mask[(0, 0, 0)]);
        assert!(mask[(0, 0, 1)]);
        assert!(!mask[(0, 0, 2)]);
    }

    #[test]
    fn test_determinism_repeated_runs() {
        let vol = cube_volume();
        let first = segment_lungs(&vol).unwrap();
        for _ in 0..3 {
            let again = segment_lungs(&vol).unwrap();
            assert_eq!(again.threshold(), first.threshold());
            assert_eq!(again.region(), first.region());
            assert_eq!(again.mask(), first.mask());
        }
    }

    #[test]
    fn test_determinism_across_threads() {
        // 扫描之间没有共享可变状态, 并发处理不得影响结果.
        use std::sync::mpsc;

        let vol = cube_volume();
        let expect = segment_lungs(&vol).unwrap();

        let pool = threadpool::ThreadPool::new(num_cpus::get().max(2));
        let (tx, rx) = mpsc::channel();
        for _ in 0..8 {
            let vol = vol.clone();
            let tx = tx.clone();
            pool.execute(move || {
                tx.send(segment_lungs(&vol).unwrap()).unwrap();
            });
        }
        drop(tx);

        for seg in rx {
            assert_eq!(seg.threshold(), expect.threshold());
            assert_eq!(seg.region(), expect.region());
            assert_eq!(seg.mask(), expect.mask());
        }
    }

    #[test]
    fn test_largest_region_wins() {
        // 两个分离亮块: 3 体素条 vs 1 体素点.
        let mut data = Array3::<f32>::zeros((1, 3, 5));
        for w in 0..3 {
            data[(0, 0, w)] = 200.0;
        }
        data[(0, 2, 4)] = 200.0;
        let vol = CtVolume::fake(data, [1.0, 1.0, 1.0]);

        let seg = segment_lungs(&vol).unwrap();
        assert_eq!(seg.voxel_count(), 3);
        assert!(seg.mask()[(0, 0, 0)]);
        assert!(!seg.mask()[(0, 2, 4)]);
    }
}
