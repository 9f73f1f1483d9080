// Capability reporting and lookup
//
// Reporter: prints what the platform offers.
// Finder: answers "is X available?" with exact, case-sensitive name matches.
//
// Every call re-enumerates; results are never cached because drivers and
// layers can change underneath a running process.

use crate::backend::platform::CapabilitySource;
use ash::vk;
use std::fmt::{Display, Write};

// =============================================================================
// REPORTER
// =============================================================================

/// Print every available instance extension to stdout
pub fn list_instance_extensions<S: CapabilitySource + ?Sized>(source: &S) {
    let extensions = source.instance_extensions();
    print!("{}", format_listing("Available instance extensions:", &extensions));
}

/// Print every extension of `device` to stdout
pub fn list_device_extensions<S: CapabilitySource + ?Sized>(source: &S, device: vk::PhysicalDevice) {
    let extensions = source.device_extensions(device);
    print!("{}", format_listing("Available device extensions:", &extensions));
}

/// Print every available instance layer to stdout
pub fn list_instance_layers<S: CapabilitySource + ?Sized>(source: &S) {
    let layers = source.instance_layers();
    print!("{}", format_listing("Available instance layers:", &layers));
}

/// Header line followed by one tab-indented entry per line
pub fn format_listing<T: Display>(header: &str, items: &[T]) -> String {
    let mut out = String::with_capacity(header.len() + 1 + items.len() * 32);
    out.push_str(header);
    out.push('\n');
    for item in items {
        // Writing into a String cannot fail
        let _ = writeln!(out, "\t{}", item);
    }
    out
}

// =============================================================================
// FINDER
// =============================================================================

/// True iff the platform reports an instance extension named exactly `name`
pub fn has_instance_extension<S: CapabilitySource + ?Sized>(source: &S, name: &str) -> bool {
    source
        .instance_extensions()
        .iter()
        .any(|ext| ext.matches(name))
}

/// True iff `name` is an instance extension or an extension of `device`.
///
/// The instance set is checked first; the device is only enumerated when the
/// instance set has no match.
pub fn has_extension<S: CapabilitySource + ?Sized>(
    source: &S,
    name: &str,
    device: vk::PhysicalDevice,
) -> bool {
    has_instance_extension(source, name)
        || source
            .device_extensions(device)
            .iter()
            .any(|ext| ext.matches(name))
}

/// True as soon as ANY requested layer is available.
///
/// This is an "at least one" check, not "all of them"; see
/// [`has_all_validation_layers`] for the strict form. An empty request is
/// never satisfied.
pub fn has_validation_layers<S, L>(source: &S, requested: &[L]) -> bool
where
    S: CapabilitySource + ?Sized,
    L: AsRef<str>,
{
    let available = source.instance_layers();
    requested
        .iter()
        .any(|wanted| available.iter().any(|layer| layer.matches(wanted.as_ref())))
}

/// True iff EVERY requested layer is available. An empty request is
/// trivially satisfied.
pub fn has_all_validation_layers<S, L>(source: &S, requested: &[L]) -> bool
where
    S: CapabilitySource + ?Sized,
    L: AsRef<str>,
{
    let available = source.instance_layers();
    requested
        .iter()
        .all(|wanted| available.iter().any(|layer| layer.matches(wanted.as_ref())))
}

/// The requested layers that are actually available, in request order.
/// Enabling only these keeps instance creation from failing on a layer
/// that is missing.
pub fn available_layers<S, L>(source: &S, requested: &[L]) -> Vec<String>
where
    S: CapabilitySource + ?Sized,
    L: AsRef<str>,
{
    let available = source.instance_layers();
    requested
        .iter()
        .filter(|wanted| available.iter().any(|layer| layer.matches(wanted.as_ref())))
        .map(|wanted| wanted.as_ref().to_string())
        .collect()
}
