//! 全局 Otsu 阈值.

use super::SegmentError;
use crate::consts::OTSU_BINS;
use itertools::{Itertools, MinMaxResult};
use ndarray::ArrayView3;
use ordered_float::OrderedFloat;

/// 计算 `v` 在 `[min, min + range]` 区间上的直方图桶索引.
#[inline]
fn bin_of(v: f32, min: f32, range: f32) -> usize {
    // 恰好等于最大值的体素落入最后一个桶.
    ((((v - min) / range) * OTSU_BINS as f32) as usize).min(OTSU_BINS - 1)
}

/// 对整个 3D 扫描计算全局 Otsu 阈值.
///
/// 在观测强度范围上建立 [`OTSU_BINS`] 桶直方图, 对每个候选分割点计算加权
/// 类间方差, 返回 **第一个** 使类间方差最大的桶的中心对应的强度值.
/// 方差打平时选最早的桶, 因此结果是确定性的.
///
/// 纯函数, 不考察切片结构, 直方图覆盖全体体素.
///
/// # 错误
///
/// 扫描为空或所有体素强度相同时, 前景/背景分界无定义,
/// 返回 [`SegmentError::InsufficientVariation`].
pub fn otsu_threshold(data: ArrayView3<f32>) -> Result<f32, SegmentError> {
    let (min, max) = match data.iter().copied().map(OrderedFloat).minmax() {
        MinMaxResult::MinMax(lo, hi) if lo < hi => (lo.0, hi.0),
        _ => return Err(SegmentError::InsufficientVariation),
    };
    let range = max - min;
    debug_assert!(range > 0.0 && range.is_finite());

    let mut hist = [0usize; OTSU_BINS];
    for &v in data.iter() {
        hist[bin_of(v, min, range)] += 1;
    }

    let total = data.len() as f64;
    let sum: f64 = hist
        .iter()
        .enumerate()
        .map(|(i, &c)| i as f64 * c as f64)
        .sum();

    let mut weight_bg = 0.0f64;
    let mut sum_bg = 0.0f64;
    let mut best_variance = OrderedFloat(f64::NEG_INFINITY);
    let mut best_bin = 0usize;

    for (i, &count) in hist.iter().enumerate() {
        weight_bg += count as f64;
        if weight_bg == 0.0 {
            continue;
        }
        let weight_fg = total - weight_bg;
        if weight_fg == 0.0 {
            break;
        }
        sum_bg += i as f64 * count as f64;

        let mean_bg = sum_bg / weight_bg;
        let mean_fg = (sum - sum_bg) / weight_fg;
        let variance = OrderedFloat(weight_bg * weight_fg * (mean_bg - mean_fg).powi(2));

        // 严格大于: 方差相同的分割点保留最早者.
        if variance > best_variance {
            best_variance = variance;
            best_bin = i;
        }
    }

    Ok(min + (best_bin as f32 + 0.5) * (range / OTSU_BINS as f32))
}
