//! 🫐欢迎光临🫁
//!
//! 涵盖了本 crate 一系列常用的功能.

pub use crate::{Idx2d, Idx3d};

pub use crate::data::slice::{ContourOverlay, ImgWriteVis, MaskSlice, ScanSlice};
pub use crate::data::window::CtWindow;
pub use crate::data::{CtVolume, NiftiHeaderAttr, VolumeLoadError};

pub use crate::consts::{NII_GZ_SUFFIX, OTSU_BINS, OUTPUT_PREFIX};

pub use crate::dataset::{self, home_dataset_dir_with, output_name};

pub use crate::segment::{
    foreground_mask, otsu_threshold, segment_lungs, LabelMap, LungSegmentation, RegionRecord,
    SegmentError,
};
