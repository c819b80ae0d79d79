// src/multiboot.rs
//! Multiboot header decoding and validation.
//!
//! A boot-capable 32-bit service embeds this 32-byte header in its
//! `.multiboot` section. The bootloader recognizes the service by the magic
//! value and the checksum invariant; both are verified here before any image
//! is assembled.

use serde::Serialize;

use crate::error::FormatError;

/// Magic value a multiboot-capable binary carries in its header.
pub const MULTIBOOT_MAGIC: u32 = 0x1BAD_B002;

/// On-disk size of the header inside the `.multiboot` section.
pub const MULTIBOOT_HEADER_LEN: usize = 32;

/// The eight-field multiboot header as plain values, decoded from its
/// on-disk layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MultibootHeader {
    pub magic: u32,
    pub flags: u32,
    pub checksum: u32,
    pub header_addr: u32,
    pub load_addr: u32,
    pub load_end_addr: u32,
    pub bss_end_addr: u32,
    pub entry_addr: u32,
}

impl MultibootHeader {
    /// Decode the header from the start of a `.multiboot` section.
    ///
    /// Fields are little-endian u32 values at offsets 0, 4, ..., 28.
    pub fn decode(section: &[u8]) -> Result<Self, FormatError> {
        if section.len() < MULTIBOOT_HEADER_LEN {
            return Err(FormatError::Truncated("multiboot header"));
        }

        let field = |index: usize| {
            let off = index * 4;
            u32::from_le_bytes([
                section[off],
                section[off + 1],
                section[off + 2],
                section[off + 3],
            ])
        };

        Ok(Self {
            magic: field(0),
            flags: field(1),
            checksum: field(2),
            header_addr: field(3),
            load_addr: field(4),
            load_end_addr: field(5),
            bss_end_addr: field(6),
            entry_addr: field(7),
        })
    }

    /// Check the two header invariants: the magic value, and that magic,
    /// flags and checksum sum to zero modulo 2^32.
    pub fn validate(&self) -> Result<(), FormatError> {
        if self.magic != MULTIBOOT_MAGIC || self.checksum_sum() != 0 {
            return Err(FormatError::BadMultibootHeader {
                magic: self.magic,
                flags: self.flags,
                checksum: self.checksum,
            });
        }
        Ok(())
    }

    /// `magic + flags + checksum` modulo 2^32; zero for a valid header.
    pub fn checksum_sum(&self) -> u32 {
        self.magic.wrapping_add(self.flags).wrapping_add(self.checksum)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elf::fixtures::multiboot_payload;

    #[test]
    fn test_decode_valid_header() {
        let header = MultibootHeader::decode(&multiboot_payload(0x3)).unwrap();

        assert_eq!(header.magic, MULTIBOOT_MAGIC);
        assert_eq!(header.flags, 0x3);
        assert_eq!(header.checksum_sum(), 0);
        assert!(header.validate().is_ok());
    }

    #[test]
    fn test_decode_reads_all_address_fields() {
        let header = MultibootHeader::decode(&multiboot_payload(0)).unwrap();

        assert_eq!(header.header_addr, 0x0010_0000);
        assert_eq!(header.load_addr, 0x0010_0000);
        assert_eq!(header.load_end_addr, 0);
        assert_eq!(header.bss_end_addr, 0);
        assert_eq!(header.entry_addr, 0x0010_0000);
    }

    #[test]
    fn test_rejects_bad_magic() {
        let mut payload = multiboot_payload(0);
        payload[0] = 0xFF;

        let header = MultibootHeader::decode(&payload).unwrap();
        let err = header.validate().unwrap_err();
        assert!(matches!(err, FormatError::BadMultibootHeader { .. }));
    }

    #[test]
    fn test_rejects_bad_checksum() {
        let mut payload = multiboot_payload(0);
        // Corrupt the checksum field so the sum no longer cancels.
        payload[8..12].copy_from_slice(&0u32.to_le_bytes());

        let header = MultibootHeader::decode(&payload).unwrap();
        assert_eq!(
            header.validate().unwrap_err(),
            FormatError::BadMultibootHeader {
                magic: MULTIBOOT_MAGIC,
                flags: 0,
                checksum: 0,
            }
        );
    }

    #[test]
    fn test_rejects_short_section() {
        let err = MultibootHeader::decode(&[0u8; 16]).unwrap_err();
        assert_eq!(err, FormatError::Truncated("multiboot header"));
    }
}
