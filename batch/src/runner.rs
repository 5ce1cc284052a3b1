//! 程序运行函数.
//!
//! 每个文件是一个独立任务: 载入 -> 分割 -> 选切片 -> 叠加渲染 -> 保存.
//! 任务之间没有共享可变状态, 由固定大小的线程池并发执行;
//! 单个文件失败只记录并跳过, 不影响其余文件.

use crate::config::Config;
use log::{error, info, warn};
use lung_berry::prelude::*;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use threadpool::ThreadPool;

/// 单文件失败分类.
#[derive(Debug)]
pub enum FileFailure {
    /// 扫描不可读, 内容损坏或含非有穷强度值.
    Load(VolumeLoadError),

    /// 分割无法给出结果.
    Segment(SegmentError),

    /// 轮廓图写入失败.
    Sink(String),
}

impl FileFailure {
    /// 失败类别的简短标识, 用于日志.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Load(_) => "load",
            Self::Segment(_) => "segment",
            Self::Sink(_) => "sink",
        }
    }
}

impl fmt::Display for FileFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Load(VolumeLoadError::Nifti(e)) => write!(f, "扫描载入失败: {e}"),
            Self::Load(VolumeLoadError::NonFiniteIntensity) => {
                write!(f, "扫描包含非有穷强度值")
            }
            Self::Segment(SegmentError::InsufficientVariation) => {
                write!(f, "强度分布退化, 无法阈值化")
            }
            Self::Segment(SegmentError::NoForegroundRegion) => {
                write!(f, "不存在前景连通域")
            }
            Self::Sink(e) => write!(f, "轮廓图写入失败: {e}"),
        }
    }
}

/// 批处理总结.
#[derive(Debug, Default)]
pub struct BatchSummary {
    /// 成功渲染的文件个数.
    pub rendered: usize,

    /// 因失败而跳过的文件个数.
    pub skipped: usize,
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "共渲染 {} 个轮廓图, 跳过 {} 个文件",
            self.rendered, self.skipped,
        )
    }
}

/// 实际运行.
///
/// 空批 (目录下没有 nii.gz 文件) 是无操作, 不是错误.
pub fn run(cfg: &Config) -> BatchSummary {
    let files = match dataset::nii_gz_files(&cfg.input_dir) {
        Ok(files) => files,
        Err(e) => {
            error!("输入目录 {} 不可读: {e}", cfg.input_dir.display());
            return BatchSummary::default();
        }
    };
    if files.is_empty() {
        info!(
            "输入目录 {} 下没有 nii.gz 文件, 无事可做",
            cfg.input_dir.display(),
        );
        return BatchSummary::default();
    }
    if let Err(e) = fs::create_dir_all(&cfg.output_dir) {
        error!("无法创建输出目录 {}: {e}", cfg.output_dir.display());
        return BatchSummary::default();
    }

    let pool = ThreadPool::new(cfg.jobs.max(1));
    let (tx, rx) = mpsc::channel();
    for path in files {
        let tx = tx.clone();
        let out_dir = cfg.output_dir.clone();
        pool.execute(move || {
            let result = process_one(&path, &out_dir);
            // 接收端活得比线程池长, send 不会失败.
            tx.send((path, result)).unwrap();
        });
    }
    drop(tx);

    let mut summary = BatchSummary::default();
    for (path, result) in rx {
        match result {
            Ok(out) => {
                summary.rendered += 1;
                info!("{} -> {}", path.display(), out.display());
            }
            Err(e) => {
                summary.skipped += 1;
                warn!("跳过 {} ({}): {e}", path.display(), e.kind());
            }
        }
    }
    summary
}

/// 对单个扫描运行完整流水线, 返回输出文件路径.
fn process_one(path: &Path, out_dir: &Path) -> Result<PathBuf, FileFailure> {
    let volume = CtVolume::open(path).map_err(FileFailure::Load)?;
    let seg = segment_lungs(&volume).map_err(FileFailure::Segment)?;

    let z = seg.best_slice();
    info!(
        "{}: 阈值 {:.2}, 最大连通域 {} 体素, 渲染切片 {z}",
        path.display(),
        seg.threshold(),
        seg.voxel_count(),
    );

    let overlay = ContourOverlay::new(volume.slice_at(z), seg.slice_at(z));
    let out = out_dir.join(output_name(path));
    if let Err(e) = overlay.save(&out) {
        // 不给失败的文件留下部分写入的输出.
        let _ = fs::remove_file(&out);
        return Err(FileFailure::Sink(e.to_string()));
    }
    Ok(out)
}
