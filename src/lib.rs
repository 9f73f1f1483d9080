// =============================================================================
// VKPROBE - Vulkan capability probing and shader module bootstrap
// =============================================================================
//
// A thin layer over the Vulkan enumeration and object-creation calls:
//
// ┌─────────────────────────────────────────────────────────────────┐
// │  capabilities  (report + find extensions / layers)              │
// │    └── backend::platform   (CapabilitySource: two-call enum)    │
// │  loader        (file -> Vec<u8>)                                │
// │    └── backend::shader     (Vec<u8> -> vk::ShaderModule)        │
// │          └── backend::device  (ShaderModuleFactory)             │
// └─────────────────────────────────────────────────────────────────┘
//
// Nothing here keeps state between calls. Instance and device creation
// belong to the caller; `backend::device::ProbeContext` is only the minimal
// setup the `vkprobe` binary needs.
//
// =============================================================================

pub mod backend;
pub mod capabilities;
pub mod config;
pub mod error;
pub mod loader;

pub use backend::device::ShaderModuleFactory;
pub use backend::platform::{CapabilitySource, ExtensionRecord, LayerRecord, VulkanPlatform};
pub use backend::shader::{create_shader_module, load_shader_module};
pub use capabilities::{
    available_layers, has_all_validation_layers, has_extension, has_instance_extension,
    has_validation_layers, list_device_extensions, list_instance_extensions, list_instance_layers,
};
pub use error::{Error, ModuleCreationError, Result};
pub use loader::read_file;

pub use ash;
