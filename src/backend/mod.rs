// Backend module - Vulkan adapters
//
// Design: thin traits over the ash calls the library needs, so everything
// above them can run against stubs

pub mod device;
pub mod platform;
pub mod shader;

pub use device::{ProbeContext, ShaderModuleFactory};
pub use platform::{CapabilitySource, VulkanPlatform};
