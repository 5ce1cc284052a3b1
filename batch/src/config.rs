//! 批处理配置.

use lung_berry::dataset;
use std::env;
use std::path::PathBuf;

/// 批处理配置. 在启动时构建一次并传入 [`crate::runner::run`],
/// 之后只读, 没有其他全局状态.
#[derive(Debug, Clone)]
pub struct Config {
    /// 待分割扫描所在目录.
    pub input_dir: PathBuf,

    /// 轮廓图输出目录. 不存在时由 runner 创建.
    pub output_dir: PathBuf,

    /// 工作线程数.
    pub jobs: usize,
}

impl Config {
    /// 从环境变量或用户主目录构建配置.
    ///
    /// 1. 若环境变量 `$LUNG_SCAN_DIR` 非空, 输入目录取其值;
    ///    否则取 `$HOME/dataset/lungs`.
    /// 2. 若环境变量 `$LUNG_CONTOUR_DIR` 非空, 输出目录取其值;
    ///    否则取 `$HOME/dataset/lung-contours`.
    /// 3. 工作线程数取逻辑核个数.
    pub fn from_env_or_home() -> Self {
        Self {
            input_dir: env_dir_or("LUNG_SCAN_DIR", "lungs"),
            output_dir: env_dir_or("LUNG_CONTOUR_DIR", "lung-contours"),
            jobs: num_cpus::get(),
        }
    }
}

/// 读取环境变量 `var` 指定的目录. 变量缺失或为空时退回
/// `{用户主目录}/dataset/{home_tail}`.
fn env_dir_or(var: &str, home_tail: &str) -> PathBuf {
    match env::var(var) {
        Ok(d) if !d.is_empty() => PathBuf::from(d),
        _ => dataset::home_dataset_dir_with([home_tail]).unwrap(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_dir_fallback() {
        let fallback = dataset::home_dataset_dir_with(["lungs"]).unwrap();

        env::remove_var("TEST_LUNG_DIR_UNSET");
        assert_eq!(env_dir_or("TEST_LUNG_DIR_UNSET", "lungs"), fallback);

        // 空值视同未设置.
        env::set_var("TEST_LUNG_DIR_EMPTY", "");
        assert_eq!(env_dir_or("TEST_LUNG_DIR_EMPTY", "lungs"), fallback);

        env::set_var("TEST_LUNG_DIR_SET", "/data/lungs");
        assert_eq!(
            env_dir_or("TEST_LUNG_DIR_SET", "lungs"),
            PathBuf::from("/data/lungs")
        );
    }
}
