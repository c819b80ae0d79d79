// src/builder.rs
//! The image build pipeline.
//!
//! `ImageBuilder` drives one build as a single linear pass: load both
//! binaries, inspect the service ELF, validate its multiboot header when the
//! service is 32-bit, assemble the image, write it out. Every buffer is
//! owned by the pass and dropped on exit, success or not.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::bin_utils;
use crate::elf::{self, ElfClass};
use crate::error::BuildError;
use crate::image::{DiskImage, SECTOR_SIZE};
use crate::loader;
use crate::multiboot::MultibootHeader;

#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Boot sector binary to embed.
    pub bootloader: PathBuf,
    /// Print per-stage progress lines.
    pub verbose: bool,
    /// Overwrite the service area with the deterministic test pattern.
    pub test_mode: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            bootloader: bin_utils::default_bootloader(),
            verbose: false,
            test_mode: false,
        }
    }
}

/// Summary of a completed build.
#[derive(Debug, Serialize)]
pub struct BuildReport {
    pub image_path: PathBuf,
    pub class: ElfClass,
    pub entry_point: u64,
    pub service_size: u64,
    pub service_sectors: u32,
    pub total_sectors: u32,
    pub bytes_written: u64,
}

pub struct ImageBuilder {
    config: BuildConfig,
}

impl ImageBuilder {
    pub fn new(config: BuildConfig) -> Self {
        Self { config }
    }

    /// Default image name: the service binary's file name with `.img`
    /// appended, in the working directory.
    pub fn default_output(service: &Path) -> PathBuf {
        let name = service
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "service".to_string());
        PathBuf::from(format!("{}.img", name))
    }

    /// Run one build. All validation completes before the output file is
    /// created, so a failing build leaves nothing on disk.
    pub fn build(&self, service_path: &Path, output: &Path) -> Result<BuildReport, BuildError> {
        let boot_sector = loader::read_binary(&self.config.bootloader)?;
        if self.config.verbose {
            println!(
                "[vmforge] boot sector: {} ({} bytes)",
                self.config.bootloader.display(),
                boot_sector.len()
            );
        }

        let service = loader::read_binary(service_path)?;
        if self.config.verbose {
            println!(
                "[vmforge] service: {} ({} bytes)",
                service_path.display(),
                service.len()
            );
        }

        let info = elf::inspect(&service)?;
        if self.config.verbose {
            println!("[vmforge] found {} with entry {:#x}", info.class, info.entry);
        }

        if let Some(section) = &info.multiboot_section {
            let header = MultibootHeader::decode(section)?;
            header.validate()?;
            if self.config.verbose {
                println!(
                    "[vmforge] multiboot header ok: flags={:#010x} checksum={:#010x}",
                    header.flags, header.checksum
                );
                println!(
                    "[vmforge] load: {:#010x}..{:#010x} bss end: {:#010x}",
                    header.load_addr, header.load_end_addr, header.bss_end_addr
                );
            }
        }

        // The boot sector has a single 32-bit slot for the entry point;
        // anything at or above 4 GiB loses its high bits there.
        if info.entry > u32::MAX as u64 {
            eprintln!(
                "warning: entry point {:#x} exceeds 32 bits and is truncated in the boot sector",
                info.entry
            );
        }

        let mut image = DiskImage::assemble(&boot_sector, &service, info.entry)?;
        if self.config.verbose {
            println!(
                "[vmforge] assembled {} sectors ({} bytes)",
                image.total_sectors(),
                image.as_bytes().len()
            );
        }

        if self.config.test_mode {
            if self.config.verbose {
                println!("[vmforge] test mode: overwriting service area with test pattern");
            }
            image.fill_test_pattern();
        }

        let bytes_written = write_image(&image, output)?;
        if self.config.verbose {
            println!(
                "[vmforge] wrote {} bytes => {} sectors to '{}'",
                bytes_written,
                bytes_written / SECTOR_SIZE as u64,
                output.display()
            );
        }

        Ok(BuildReport {
            image_path: output.to_path_buf(),
            class: info.class,
            entry_point: info.entry,
            service_size: service.len() as u64,
            service_sectors: image.service_sectors(),
            total_sectors: image.total_sectors(),
            bytes_written,
        })
    }
}

/// Write the assembled image in one operation and report the byte count.
///
/// `write_all` turns any short write into an error, so a truncated image is
/// never reported as success.
fn write_image(image: &DiskImage, path: &Path) -> Result<u64, BuildError> {
    let mut file = File::create(path).map_err(|e| BuildError::io(path, e))?;
    file.write_all(image.as_bytes())
        .map_err(|e| BuildError::io(path, e))?;
    Ok(image.as_bytes().len() as u64)
}
