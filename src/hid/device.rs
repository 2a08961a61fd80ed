// Licensed under the Open Software License version 3.0
use super::scanner::{find_hidraw_node, DEVICE_NODE_PATH, HIDRAW_CLASS_PATH};
use std::{
    fs::{File, OpenOptions},
    io,
    os::unix::{fs::OpenOptionsExt, io::AsRawFd},
    path::{Path, PathBuf},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("no hidraw device found for {vendor_id:04x}:{product_id:04x}")]
    NotFound { vendor_id: u16, product_id: u16 },

    #[error("failed to open {path}: {source}")]
    Open { path: PathBuf, source: io::Error },

    #[error("feature report read failed: {0}")]
    Io(#[from] io::Error),

    #[error("device returned an empty feature report")]
    EmptyReport,
}

// _IOC layout from asm-generic/ioctl.h
#[cfg(not(any(
    target_arch = "powerpc",
    target_arch = "powerpc64",
    target_arch = "mips",
    target_arch = "mips32r6",
    target_arch = "mips64",
    target_arch = "mips64r6",
    target_arch = "sparc",
    target_arch = "sparc64"
)))]
mod ioc {
    pub const READ_WRITE: u64 = 1 | 2;
    pub const DIR_SHIFT: u32 = 30;
    pub const SIZE_MASK: u64 = (1 << 14) - 1;
}

// These use 3 direction bits and a 13 bit size field, with _IOC_READ = 2 and _IOC_WRITE = 4
#[cfg(any(
    target_arch = "powerpc",
    target_arch = "powerpc64",
    target_arch = "mips",
    target_arch = "mips32r6",
    target_arch = "mips64",
    target_arch = "mips64r6",
    target_arch = "sparc",
    target_arch = "sparc64"
))]
mod ioc {
    pub const READ_WRITE: u64 = 2 | 4;
    pub const DIR_SHIFT: u32 = 29;
    pub const SIZE_MASK: u64 = (1 << 13) - 1;
}

// _IOC(_IOC_READ | _IOC_WRITE, 'H', 0x07, len) from linux/hidraw.h
fn hid_get_feature_request(length: usize) -> u64 {
    (ioc::READ_WRITE << ioc::DIR_SHIFT)
        | ((length as u64 & ioc::SIZE_MASK) << 16)
        | ((b'H' as u64) << 8)
        | 0x07
}

/// UPS connected through the Linux hidraw interface
///
/// The file descriptor is closed when the value is dropped
pub struct HidrawDevice {
    file: File,
    path: PathBuf,
}

#[cfg_attr(test, mockall::automock)]
impl HidrawDevice {
    pub fn open(vendor_id: u16, product_id: u16) -> Result<Self, DeviceError> {
        let path = find_hidraw_node(
            Path::new(HIDRAW_CLASS_PATH),
            Path::new(DEVICE_NODE_PATH),
            vendor_id,
            product_id,
        )
        .ok_or(DeviceError::NotFound {
            vendor_id,
            product_id,
        })?;
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .custom_flags(libc::O_NONBLOCK)
            .open(&path)
            .map_err(|source| DeviceError::Open {
                path: path.clone(),
                source,
            })?;
        tracing::info!(
            "Connected to UPS {:04x}:{:04x} at {}",
            vendor_id,
            product_id,
            path.display()
        );
        Ok(Self { file, path })
    }

    /// Read a feature report, the returned buffer starts with the report id
    pub fn get_feature_report(
        &mut self,
        report_id: u8,
        length: usize,
    ) -> Result<Vec<u8>, DeviceError> {
        if length == 0 {
            return Err(DeviceError::EmptyReport);
        }
        let mut buffer = vec![0u8; length];
        buffer[0] = report_id;
        let request = hid_get_feature_request(length);
        // SAFETY: buffer is valid for `length` bytes, which is the size encoded in the request
        let read = unsafe { libc::ioctl(self.file.as_raw_fd(), request as _, buffer.as_mut_ptr()) };
        if read < 0 {
            return Err(DeviceError::Io(io::Error::last_os_error()));
        }
        buffer.truncate(read as usize);
        if buffer.is_empty() {
            return Err(DeviceError::EmptyReport);
        }
        Ok(buffer)
    }
}

impl Drop for HidrawDevice {
    fn drop(&mut self) {
        tracing::info!("Disconnected from UPS at {}", self.path.display());
    }
}
