//! 数据集操作.
//!
//! 提供目录枚举和确定性的输出文件命名. 扫描的实际载入由调用方按文件
//! 逐个进行, 以便与逐文件的失败隔离策略配合.

use crate::consts::{NII_GZ_SUFFIX, OUTPUT_PREFIX};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::{fs, io};

/// 获取 `{用户主目录}/dataset` 目录.
pub fn home_dataset_dir() -> Option<PathBuf> {
    let mut ans = dirs::home_dir()?;
    ans.push("dataset");
    Some(ans)
}

/// 获取 `{用户主目录}/dataset` 目录下给定后继项组成的全路径.
pub fn home_dataset_dir_with<P: AsRef<Path>, I: IntoIterator<Item = P>>(it: I) -> Option<PathBuf> {
    let mut ans = home_dataset_dir()?;
    ans.extend(it);
    Some(ans)
}

/// 判断 `path` 是否以压缩 nifti 后缀结尾.
#[inline]
pub fn is_nii_gz<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref()
        .file_name()
        .and_then(OsStr::to_str)
        .is_some_and(|name| name.ends_with(NII_GZ_SUFFIX))
}

/// 枚举 `dir` 下的全部压缩 nifti 文件, 按文件名升序排列
/// (保证批处理顺序可复现).
///
/// `dir` 不可读时返回 `Err`. 目录为空时返回空 `Vec`, 不是错误.
pub fn nii_gz_files<P: AsRef<Path>>(dir: P) -> io::Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| is_nii_gz(path))
        .collect();
    files.sort();
    Ok(files)
}

/// 由输入文件身份确定性地导出输出轮廓图文件名:
/// 去掉 `.nii.gz` 后缀, 加 [`OUTPUT_PREFIX`] 前缀和 `.png` 后缀.
pub fn output_name<P: AsRef<Path>>(input: P) -> String {
    let name = input
        .as_ref()
        .file_name()
        .and_then(OsStr::to_str)
        .unwrap_or_default();
    let stem = name.strip_suffix(NII_GZ_SUFFIX).unwrap_or(name);
    format!("{OUTPUT_PREFIX}{stem}.png")
}
