// =============================================================================
// VKPROBE - report what the local Vulkan implementation offers
// =============================================================================
//
// FLOW:
// 1. Load config (path from the first argument, else vkprobe.toml)
// 2. List instance extensions and layers
// 3. Check configured validation layers and instance extensions
// 4. Create an instance (with the layers, if any are available)
// 5. Per physical device: list extensions, check configured ones
// 6. If a shader path is configured: build a shader module on the first
//    device, report it, destroy it
//
// =============================================================================

use anyhow::{Context, Result};
use ash::Entry;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use vkprobe::backend::ProbeContext;
use vkprobe::config::{Config, DEFAULT_CONFIG_PATH};
use vkprobe::{capabilities, VulkanPlatform};

fn main() -> Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

    // Parse before logging is up; problems are reported once it is
    let (config, load_error) = match Config::load_from_path(&config_path) {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };

    init_logging(&config);
    if let Some(e) = load_error {
        log::warn!("Failed to load {}: {:#}. Using defaults.", config_path, e);
    }
    log::info!("Starting {}", config.app.name);

    // Step 1: Load Vulkan library
    let entry = unsafe { Entry::load() }
        .context("Failed to load Vulkan library. Is Vulkan installed?")?;

    // Step 2: Instance-level report and checks
    let platform = VulkanPlatform::new(&entry);
    if config.report.instance_extensions {
        capabilities::list_instance_extensions(&platform);
    }
    if config.report.instance_layers {
        capabilities::list_instance_layers(&platform);
    }

    let requested_layers = config.requested_layers();
    let layers = capabilities::available_layers(&platform, requested_layers);
    if layers.len() < requested_layers.len() {
        log::warn!(
            "Requested validation layers {:?}, only {:?} available",
            requested_layers,
            layers
        );
    } else if !layers.is_empty() {
        log::info!("Validation layers available: {:?}", layers);
    }

    for name in &config.extensions.instance {
        report_presence("instance", name, capabilities::has_instance_extension(&platform, name));
    }

    // Step 3: Instance and per-device report
    let context = ProbeContext::new(&entry, &config.app.name, &layers)?;
    let platform = VulkanPlatform::with_instance(context.entry(), &context.instance);

    for &physical_device in &context.physical_devices {
        println!("Device: {}", context.device_name(physical_device));
        if config.report.device_extensions {
            capabilities::list_device_extensions(&platform, physical_device);
        }
        for name in &config.extensions.device {
            report_presence(
                "device",
                name,
                capabilities::has_extension(&platform, name, physical_device),
            );
        }
    }

    // Step 4: Shader module
    if let Some(path) = &config.shader.path {
        let physical_device = *context
            .physical_devices
            .first()
            .ok_or_else(|| anyhow::anyhow!("No Vulkan-capable GPU found"))?;

        let device = context.create_logical_device(physical_device)?;
        let result = vkprobe::load_shader_module(&device, path);

        // The module and device are ours to release either way
        unsafe {
            if let Ok(module) = &result {
                println!("Shader module created from {:?}: {:?}", path, module);
                device.destroy_shader_module(*module, None);
            }
            device.destroy_device(None);
        }

        result.with_context(|| format!("Failed to load shader {:?}", path))?;
    }

    log::info!("Done");
    Ok(())
}

fn report_presence(scope: &str, name: &str, present: bool) {
    println!(
        "{} extension {}: {}",
        scope,
        name,
        if present { "available" } else { "missing" }
    );
}

/// Initialize logging, to the log file if enabled and it can be opened
fn init_logging(config: &Config) {
    use env_logger::{Builder, Target};

    let mut builder = Builder::new();
    builder.filter_level(config.log_level_filter());
    builder.parse_default_env();

    if config.debug.log_to_file {
        match open_log_file(&config.debug.log_file) {
            Ok(file) => {
                builder.target(Target::Pipe(Box::new(file)));
            }
            Err(e) => eprintln!("Couldn't open log file {}: {}", config.debug.log_file, e),
        }
    }

    builder.init();
}

/// Create/clear the log file and stamp a header
fn open_log_file(path: impl AsRef<Path>) -> io::Result<File> {
    let mut file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)?;

    writeln!(file, "=== vkprobe Log ===")?;
    writeln!(file, "Started: {:?}", std::time::SystemTime::now())?;
    writeln!(file)?;
    Ok(file)
}
