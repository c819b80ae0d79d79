pub mod bin_utils;
pub mod builder;
pub mod cli;
pub mod elf;
pub mod error;
pub mod image;
pub mod loader;
pub mod multiboot;

pub use builder::{BuildConfig, BuildReport, ImageBuilder};
pub use elf::{ElfClass, ElfInfo};
pub use error::{BuildError, FormatError, SizeError};
pub use image::DiskImage;
pub use multiboot::MultibootHeader;
