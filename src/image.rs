// src/image.rs
//! Sector-aligned disk image assembly.

use crate::error::SizeError;

/// Disk sector size. Every image length is a multiple of this.
pub const SECTOR_SIZE: usize = 512;

/// Boot-sector offset of the service sector count (little-endian u32).
pub const SECTOR_COUNT_OFFSET: usize = 4;

/// Boot-sector offset of the service entry point (little-endian u32).
pub const ENTRY_POINT_OFFSET: usize = 8;

/// A fully assembled bootable disk image: one boot sector followed by the
/// service binary, zero-padded up to the next sector boundary.
///
/// Assembly is all-or-nothing. An instance always holds a complete image
/// with both boot-sector fields patched; partial buffers are never exposed.
#[derive(Debug)]
pub struct DiskImage {
    data: Vec<u8>,
    service_sectors: u32,
}

impl DiskImage {
    /// Lay out the image and patch the boot sector.
    ///
    /// The boot sector must be exactly one sector long. The entry point is
    /// written as its low 32 bits; the caller decides whether truncation
    /// deserves a warning.
    pub fn assemble(
        boot_sector: &[u8],
        service: &[u8],
        entry_point: u64,
    ) -> Result<Self, SizeError> {
        if boot_sector.len() != SECTOR_SIZE {
            return Err(SizeError::BootSector {
                found: boot_sector.len() as u64,
            });
        }

        let service_sectors = service.len().div_ceil(SECTOR_SIZE);
        let mut data = vec![0u8; (1 + service_sectors) * SECTOR_SIZE];

        data[..SECTOR_SIZE].copy_from_slice(boot_sector);
        data[SECTOR_SIZE..SECTOR_SIZE + service.len()].copy_from_slice(service);

        let service_sectors = service_sectors as u32;
        data[SECTOR_COUNT_OFFSET..SECTOR_COUNT_OFFSET + 4]
            .copy_from_slice(&service_sectors.to_le_bytes());
        data[ENTRY_POINT_OFFSET..ENTRY_POINT_OFFSET + 4]
            .copy_from_slice(&(entry_point as u32).to_le_bytes());

        Ok(Self {
            data,
            service_sectors,
        })
    }

    /// Overwrite the whole service area with `offset % 256` filler, leaving
    /// the boot sector untouched. Used to validate image geometry
    /// independent of real service content.
    pub fn fill_test_pattern(&mut self) {
        for (i, byte) in self.data[SECTOR_SIZE..].iter_mut().enumerate() {
            *byte = (i % 256) as u8;
        }
    }

    /// Sectors occupied by the service, padding included.
    pub fn service_sectors(&self) -> u32 {
        self.service_sectors
    }

    /// Total image size in sectors, boot sector included.
    pub fn total_sectors(&self) -> u32 {
        self.service_sectors + 1
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patched_u32(image: &DiskImage, offset: usize) -> u32 {
        let bytes = &image.as_bytes()[offset..offset + 4];
        u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
    }

    #[test]
    fn test_single_sector_service() {
        let boot = [0u8; SECTOR_SIZE];
        let service = vec![0xAB; 100];

        let image = DiskImage::assemble(&boot, &service, 0x0010_0000).unwrap();

        assert_eq!(image.as_bytes().len(), 1024);
        assert_eq!(image.total_sectors(), 2);
        assert_eq!(patched_u32(&image, SECTOR_COUNT_OFFSET), 1);
        assert_eq!(patched_u32(&image, ENTRY_POINT_OFFSET), 0x0010_0000);

        // Service bytes land right after the boot sector, padding stays zero.
        assert_eq!(&image.as_bytes()[512..612], &service[..]);
        assert!(image.as_bytes()[612..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_service_just_over_two_sectors() {
        let boot = [0u8; SECTOR_SIZE];
        let service = vec![1u8; 1025];

        let image = DiskImage::assemble(&boot, &service, 0).unwrap();

        assert_eq!(image.as_bytes().len(), 2048);
        assert_eq!(patched_u32(&image, SECTOR_COUNT_OFFSET), 3);
    }

    #[test]
    fn test_exact_sector_multiple_gets_no_padding_sector() {
        let boot = [0u8; SECTOR_SIZE];
        let service = vec![1u8; 1024];

        let image = DiskImage::assemble(&boot, &service, 0).unwrap();

        assert_eq!(image.as_bytes().len(), 512 + 1024);
        assert_eq!(image.service_sectors(), 2);
    }

    #[test]
    fn test_boot_sector_bytes_are_preserved_outside_patches() {
        let mut boot = [0u8; SECTOR_SIZE];
        for (i, byte) in boot.iter_mut().enumerate() {
            *byte = (i % 251) as u8;
        }

        let image = DiskImage::assemble(&boot, &[0x90; 32], 0x8000).unwrap();

        assert_eq!(&image.as_bytes()[..4], &boot[..4]);
        assert_eq!(&image.as_bytes()[12..512], &boot[12..512]);
    }

    #[test]
    fn test_entry_point_is_truncated_to_low_32_bits() {
        let boot = [0u8; SECTOR_SIZE];

        let image = DiskImage::assemble(&boot, &[0u8; 16], 0x1_0010_0000).unwrap();

        assert_eq!(patched_u32(&image, ENTRY_POINT_OFFSET), 0x0010_0000);
    }

    #[test]
    fn test_short_boot_sector_is_rejected() {
        let err = DiskImage::assemble(&[0u8; 511], &[0u8; 16], 0).unwrap_err();
        assert_eq!(err, SizeError::BootSector { found: 511 });

        let err = DiskImage::assemble(&[0u8; 513], &[0u8; 16], 0).unwrap_err();
        assert_eq!(err, SizeError::BootSector { found: 513 });
    }

    #[test]
    fn test_fill_test_pattern() {
        let boot = [0xEE; SECTOR_SIZE];
        let mut image = DiskImage::assemble(&boot, &[0u8; 700], 0).unwrap();

        image.fill_test_pattern();

        let bytes = image.as_bytes();
        assert!(bytes[..4].iter().all(|&b| b == 0xEE));
        for (i, &byte) in bytes[512..].iter().enumerate() {
            assert_eq!(byte, (i % 256) as u8);
        }
    }

    #[test]
    fn test_empty_service_is_just_the_boot_sector() {
        let image = DiskImage::assemble(&[0u8; SECTOR_SIZE], &[], 0).unwrap();

        assert_eq!(image.as_bytes().len(), SECTOR_SIZE);
        assert_eq!(image.service_sectors(), 0);
    }
}
