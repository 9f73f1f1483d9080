// Platform capability enumeration
//
// Vulkan exposes extensions and layers through a two-call protocol (ask for
// the count, then fill a buffer of that size). ash already performs both
// calls; this module turns the raw property structs into owned records and
// puts a trait in front so the finder can be driven by a stub in tests.

use ash::{vk, Entry};
use std::ffi::{CStr, CString};
use std::fmt;

/// An extension reported by the loader or a physical device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionRecord {
    name: CString,
    pub spec_version: u32,
}

impl ExtensionRecord {
    pub fn new(name: CString, spec_version: u32) -> Self {
        Self { name, spec_version }
    }

    pub fn name(&self) -> &CStr {
        &self.name
    }

    /// Exact, case-sensitive byte comparison against `name`
    pub fn matches(&self, name: &str) -> bool {
        self.name.as_bytes() == name.as_bytes()
    }

    fn from_properties(props: &vk::ExtensionProperties) -> Self {
        Self {
            name: fixed_to_cstring(&props.extension_name),
            spec_version: props.spec_version,
        }
    }
}

impl fmt::Display for ExtensionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name.to_string_lossy())
    }
}

/// An instance layer reported by the loader
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerRecord {
    name: CString,
    pub spec_version: u32,
    pub implementation_version: u32,
    pub description: String,
}

impl LayerRecord {
    pub fn new(name: CString) -> Self {
        Self {
            name,
            spec_version: 0,
            implementation_version: 0,
            description: String::new(),
        }
    }

    pub fn name(&self) -> &CStr {
        &self.name
    }

    /// Exact, case-sensitive byte comparison against `name`
    pub fn matches(&self, name: &str) -> bool {
        self.name.as_bytes() == name.as_bytes()
    }

    fn from_properties(props: &vk::LayerProperties) -> Self {
        Self {
            name: fixed_to_cstring(&props.layer_name),
            spec_version: props.spec_version,
            implementation_version: props.implementation_version,
            description: fixed_to_cstring(&props.description)
                .to_string_lossy()
                .into_owned(),
        }
    }
}

impl fmt::Display for LayerRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name.to_string_lossy())
    }
}

/// Source of capability lists.
///
/// Enumeration never fails from the caller's point of view: an error from
/// the underlying query is reported as an empty list.
pub trait CapabilitySource {
    fn instance_extensions(&self) -> Vec<ExtensionRecord>;
    fn device_extensions(&self, device: vk::PhysicalDevice) -> Vec<ExtensionRecord>;
    fn instance_layers(&self) -> Vec<LayerRecord>;
}

/// Capability source backed by the real Vulkan loader.
///
/// Instance-level queries only need the entry. Device-level queries need an
/// instance; without one they report nothing.
pub struct VulkanPlatform<'a> {
    entry: &'a Entry,
    instance: Option<&'a ash::Instance>,
}

impl<'a> VulkanPlatform<'a> {
    pub fn new(entry: &'a Entry) -> Self {
        Self {
            entry,
            instance: None,
        }
    }

    pub fn with_instance(entry: &'a Entry, instance: &'a ash::Instance) -> Self {
        Self {
            entry,
            instance: Some(instance),
        }
    }
}

impl CapabilitySource for VulkanPlatform<'_> {
    fn instance_extensions(&self) -> Vec<ExtensionRecord> {
        match self.entry.enumerate_instance_extension_properties(None) {
            Ok(props) => props.iter().map(ExtensionRecord::from_properties).collect(),
            Err(e) => {
                log::warn!("Enumerating instance extensions failed: {}", e);
                Vec::new()
            }
        }
    }

    fn device_extensions(&self, device: vk::PhysicalDevice) -> Vec<ExtensionRecord> {
        let Some(instance) = self.instance else {
            log::warn!("Device extensions requested without an instance");
            return Vec::new();
        };

        // Safety: the physical device must come from this instance; that is
        // the caller's contract for every device-scoped query
        match unsafe { instance.enumerate_device_extension_properties(device) } {
            Ok(props) => props.iter().map(ExtensionRecord::from_properties).collect(),
            Err(e) => {
                log::warn!("Enumerating device extensions failed: {}", e);
                Vec::new()
            }
        }
    }

    fn instance_layers(&self) -> Vec<LayerRecord> {
        match self.entry.enumerate_instance_layer_properties() {
            Ok(props) => props.iter().map(LayerRecord::from_properties).collect(),
            Err(e) => {
                log::warn!("Enumerating instance layers failed: {}", e);
                Vec::new()
            }
        }
    }
}

/// Copy a fixed-size, NUL-terminated Vulkan string into an owned `CString`.
/// A missing terminator takes the whole array.
fn fixed_to_cstring(raw: &[std::os::raw::c_char]) -> CString {
    let bytes: Vec<u8> = raw
        .iter()
        .take_while(|&&c| c != 0)
        .map(|&c| c as u8)
        .collect();
    // No interior NUL is possible after take_while
    CString::new(bytes).unwrap_or_default()
}
