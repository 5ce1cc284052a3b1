//! 批处理入口: 对输入目录下的每个 3D 肺部 CT 扫描运行无监督分割,
//! 并为每个扫描输出一张轮廓叠加图.

mod config;
mod runner;

use log::info;

fn main() {
    simple_logger::init_with_level(log::Level::Info).unwrap();

    let cfg = config::Config::from_env_or_home();
    info!(
        "输入目录: {}, 输出目录: {}, 工作线程: {}",
        cfg.input_dir.display(),
        cfg.output_dir.display(),
        cfg.jobs,
    );

    let summary = runner::run(&cfg);
    info!("{summary}");
}
