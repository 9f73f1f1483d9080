// Vulkan device side
//
// Responsibilities:
// - ShaderModuleFactory: the one device call the library needs
// - ProbeContext: minimal instance + logical device setup for the probe
//   binary (instance with optional validation, debug messenger, physical
//   device listing, a logical device with one graphics queue)

use crate::capabilities;
use anyhow::{Context, Result};
use ash::prelude::VkResult;
use ash::{vk, Entry};
use std::ffi::{CStr, CString};

/// Anything that can turn SPIR-V words into a shader module
pub trait ShaderModuleFactory {
    fn create_module(&self, code: &[u32]) -> VkResult<vk::ShaderModule>;
}

impl ShaderModuleFactory for ash::Device {
    fn create_module(&self, code: &[u32]) -> VkResult<vk::ShaderModule> {
        let create_info = vk::ShaderModuleCreateInfo::builder().code(code);

        // Safety: `code` outlives the call and the device handle is live for
        // as long as this ash::Device exists
        unsafe { self.create_shader_module(&create_info, None) }
    }
}

/// Instance and physical devices for the probe binary, plus an optional
/// logical device created on demand.
pub struct ProbeContext<'e> {
    entry: &'e Entry,
    pub instance: ash::Instance,
    pub physical_devices: Vec<vk::PhysicalDevice>,

    // Debug utils (if validation enabled)
    debug_utils: Option<(ash::extensions::ext::DebugUtils, vk::DebugUtilsMessengerEXT)>,
}

impl<'e> ProbeContext<'e> {
    /// Create an instance
    ///
    /// # Arguments
    /// * `app_name` - Application name reported to the driver
    /// * `layers` - Validation layers to enable, already checked by the caller
    pub fn new(entry: &'e Entry, app_name: &str, layers: &[String]) -> Result<Self> {
        log::info!("Creating Vulkan instance: {}", app_name);

        let debug_available = !layers.is_empty()
            && capabilities::has_instance_extension(
                &crate::VulkanPlatform::new(entry),
                &ash::extensions::ext::DebugUtils::name().to_string_lossy(),
            );

        let instance = Self::create_instance(entry, app_name, layers, debug_available)?;

        // From here on Drop owns the instance, including on the error paths
        let mut context = Self {
            entry,
            instance,
            physical_devices: Vec::new(),
            debug_utils: None,
        };

        if debug_available {
            context.debug_utils = Some(Self::setup_debug_messenger(entry, &context.instance)?);
        }

        context.physical_devices = unsafe { context.instance.enumerate_physical_devices() }
            .context("Failed to enumerate physical devices")?;
        log::info!(
            "Found {} physical device(s)",
            context.physical_devices.len()
        );

        Ok(context)
    }

    pub fn entry(&self) -> &'e Entry {
        self.entry
    }

    fn create_instance(
        entry: &Entry,
        app_name: &str,
        layers: &[String],
        debug_utils: bool,
    ) -> Result<ash::Instance> {
        let app_name_cstr = CString::new(app_name)?;
        let engine_name = CString::new("vkprobe")?;

        let app_info = vk::ApplicationInfo::builder()
            .application_name(&app_name_cstr)
            .application_version(vk::make_api_version(0, 0, 1, 0))
            .engine_name(&engine_name)
            .engine_version(vk::make_api_version(0, 0, 1, 0))
            .api_version(vk::API_VERSION_1_0);

        let mut extensions = Vec::new();
        if debug_utils {
            extensions.push(ash::extensions::ext::DebugUtils::name().as_ptr());
        }

        let layer_cstrs = layers
            .iter()
            .map(|l| CString::new(l.as_str()))
            .collect::<Result<Vec<_>, _>>()
            .context("Layer name contains a NUL byte")?;
        let layer_names: Vec<_> = layer_cstrs.iter().map(|l| l.as_ptr()).collect();

        let create_info = vk::InstanceCreateInfo::builder()
            .application_info(&app_info)
            .enabled_extension_names(&extensions)
            .enabled_layer_names(&layer_names);

        let instance = unsafe { entry.create_instance(&create_info, None) }
            .context("Failed to create Vulkan instance")?;

        Ok(instance)
    }

    fn setup_debug_messenger(
        entry: &Entry,
        instance: &ash::Instance,
    ) -> Result<(ash::extensions::ext::DebugUtils, vk::DebugUtilsMessengerEXT)> {
        let debug_utils = ash::extensions::ext::DebugUtils::new(entry, instance);

        let create_info = vk::DebugUtilsMessengerCreateInfoEXT::builder()
            .message_severity(
                vk::DebugUtilsMessageSeverityFlagsEXT::WARNING
                    | vk::DebugUtilsMessageSeverityFlagsEXT::ERROR,
            )
            .message_type(
                vk::DebugUtilsMessageTypeFlagsEXT::GENERAL
                    | vk::DebugUtilsMessageTypeFlagsEXT::VALIDATION
                    | vk::DebugUtilsMessageTypeFlagsEXT::PERFORMANCE,
            )
            .pfn_user_callback(Some(debug_callback));

        let messenger = unsafe { debug_utils.create_debug_utils_messenger(&create_info, None) }
            .context("Failed to create debug messenger")?;

        Ok((debug_utils, messenger))
    }

    /// Human-readable device name
    pub fn device_name(&self, physical_device: vk::PhysicalDevice) -> String {
        let props = unsafe { self.instance.get_physical_device_properties(physical_device) };
        unsafe { CStr::from_ptr(props.device_name.as_ptr()) }
            .to_string_lossy()
            .into_owned()
    }

    /// Create a logical device with a single graphics queue and no
    /// extensions. The caller destroys it.
    pub fn create_logical_device(&self, physical_device: vk::PhysicalDevice) -> Result<ash::Device> {
        let queue_families = unsafe {
            self.instance
                .get_physical_device_queue_family_properties(physical_device)
        };

        let graphics_family = queue_families
            .iter()
            .position(|props| props.queue_flags.contains(vk::QueueFlags::GRAPHICS))
            .map(|i| i as u32)
            .ok_or_else(|| anyhow::anyhow!("No graphics queue family on this device"))?;

        let queue_priorities = [1.0];
        let queue_create_info = vk::DeviceQueueCreateInfo::builder()
            .queue_family_index(graphics_family)
            .queue_priorities(&queue_priorities)
            .build();

        let create_info = vk::DeviceCreateInfo::builder()
            .queue_create_infos(std::slice::from_ref(&queue_create_info));

        let device = unsafe {
            self.instance
                .create_device(physical_device, &create_info, None)
        }
        .context("Failed to create logical device")?;

        Ok(device)
    }
}

impl Drop for ProbeContext<'_> {
    fn drop(&mut self) {
        log::info!("Destroying Vulkan instance...");

        unsafe {
            if let Some((debug_utils, messenger)) = self.debug_utils.take() {
                debug_utils.destroy_debug_utils_messenger(messenger, None);
            }

            self.instance.destroy_instance(None);
        }
    }
}

// Debug callback for validation layers
unsafe extern "system" fn debug_callback(
    message_severity: vk::DebugUtilsMessageSeverityFlagsEXT,
    _message_type: vk::DebugUtilsMessageTypeFlagsEXT,
    p_callback_data: *const vk::DebugUtilsMessengerCallbackDataEXT,
    _p_user_data: *mut std::ffi::c_void,
) -> vk::Bool32 {
    let message = CStr::from_ptr((*p_callback_data).p_message);

    match message_severity {
        vk::DebugUtilsMessageSeverityFlagsEXT::ERROR => {
            log::error!("[Vulkan] {}", message.to_string_lossy());
        }
        vk::DebugUtilsMessageSeverityFlagsEXT::WARNING => {
            log::warn!("[Vulkan] {}", message.to_string_lossy());
        }
        _ => {
            log::debug!("[Vulkan] {}", message.to_string_lossy());
        }
    }

    vk::FALSE
}
