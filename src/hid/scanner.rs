// Licensed under the Open Software License version 3.0
use regex::Regex;
use std::{
    fs,
    path::{Path, PathBuf},
    sync::LazyLock,
};

pub const HIDRAW_CLASS_PATH: &str = "/sys/class/hidraw";
pub const DEVICE_NODE_PATH: &str = "/dev";

// HID_ID=<bus>:<vendor>:<product>, all hexadecimal
static HID_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^HID_ID=([0-9A-Fa-f]+):([0-9A-Fa-f]+):([0-9A-Fa-f]+)$").unwrap()
});

/// Extract vendor and product id from a hidraw `uevent` file
pub fn parse_hid_id(uevent: &str) -> Option<(u16, u16)> {
    // Find the HID_ID line
    let captures = HID_ID.captures(uevent)?;
    // Parse ids, sysfs pads them to 8 digits
    let vendor_id = u32::from_str_radix(&captures[2], 16).ok()?;
    let product_id = u32::from_str_radix(&captures[3], 16).ok()?;
    // USB ids fit in 16 bits
    Some((
        u16::try_from(vendor_id).ok()?,
        u16::try_from(product_id).ok()?,
    ))
}

/// Find the device node of the first hidraw interface matching the ids
///
/// `class_path` is scanned for `hidrawN/device/uevent` entries and the
/// matching node is returned as `dev_path/hidrawN`
pub fn find_hidraw_node(
    class_path: &Path,
    dev_path: &Path,
    vendor_id: u16,
    product_id: u16,
) -> Option<PathBuf> {
    // Check if path is a directory
    if !class_path.is_dir() {
        tracing::error!("{} is not a directory", class_path.display());
        return None;
    }
    tracing::trace!("Scanning directory: {}", class_path.display());
    // Collect interface directories
    let mut entries: Vec<PathBuf> = match fs::read_dir(class_path) {
        Ok(entries) => entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .collect(),
        Err(error) => {
            tracing::warn!("Failed to scan {}: {}", class_path.display(), error);
            return None;
        }
    };
    // Lowest numbered interface wins when a device exposes several
    entries.sort();
    entries.into_iter().find_map(|entry| {
        // Read uevent of the parent HID device
        let uevent = fs::read_to_string(entry.join("device").join("uevent")).ok()?;
        let ids = parse_hid_id(&uevent)?;
        tracing::trace!("{} reports {:04x}:{:04x}", entry.display(), ids.0, ids.1);
        // Skip other devices
        if ids != (vendor_id, product_id) {
            return None;
        }
        // Node has the same name as the class entry
        Some(dev_path.join(entry.file_name()?))
    })
}
