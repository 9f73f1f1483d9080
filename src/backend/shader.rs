// Shader module loading
//
// Vulkan consumes SPIR-V bytecode as 32-bit words. This module turns
// loaded bytes into a shader module owned by the device.

use super::device::ShaderModuleFactory;
use crate::error::{ModuleCreationError, Result};
use crate::loader;
use ash::vk;
use std::path::Path;

const SPIRV_MAGIC: u32 = 0x0723_0203;

/// Create a shader module from SPIR-V bytes.
///
/// The bytes are copied into an aligned word buffer (file buffers carry no
/// alignment guarantee), so `code` can come straight from [`loader::read_file`].
/// The returned handle belongs to the caller, who must destroy it before the
/// device goes away.
pub fn create_shader_module<D>(device: &D, code: &[u8]) -> Result<vk::ShaderModule>
where
    D: ShaderModuleFactory + ?Sized,
{
    if code.is_empty() || code.len() % 4 != 0 {
        return Err(ModuleCreationError::BytecodeSize(code.len()).into());
    }

    let words = to_words(code);

    let module = device
        .create_module(&words)
        .map_err(ModuleCreationError::Device)?;

    log::debug!("Created shader module {:?} ({} words)", module, words.len());
    Ok(module)
}

/// Copy bytes into native-endian words, swapping them all if the first word
/// is the SPIR-V magic number in the opposite byte order. Content is not
/// validated; the device decides what it accepts.
fn to_words(code: &[u8]) -> Vec<u32> {
    let mut words: Vec<u32> = code
        .chunks_exact(4)
        .map(|b| u32::from_ne_bytes([b[0], b[1], b[2], b[3]]))
        .collect();

    if words.first() == Some(&SPIRV_MAGIC.swap_bytes()) {
        for word in &mut words {
            *word = word.swap_bytes();
        }
    }
    words
}

/// Read a SPIR-V file and create a shader module from it
pub fn load_shader_module<D, P>(device: &D, path: P) -> Result<vk::ShaderModule>
where
    D: ShaderModuleFactory + ?Sized,
    P: AsRef<Path>,
{
    let code = loader::read_file(path)?;
    create_shader_module(device, &code)
}

/// Helper to load shader from embedded bytes at compile time
#[macro_export]
macro_rules! load_shader {
    ($device:expr, $path:expr) => {{
        let bytes = include_bytes!($path);
        $crate::backend::shader::create_shader_module($device, bytes)
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use ash::prelude::VkResult;
    use ash::vk::Handle;
    use std::cell::{Cell, RefCell};

    /// Hands out increasing handles and remembers what it was given
    #[derive(Default)]
    struct MockDevice {
        next: Cell<u64>,
        reject: Option<vk::Result>,
        seen: RefCell<Vec<Vec<u32>>>,
    }

    impl ShaderModuleFactory for MockDevice {
        fn create_module(&self, code: &[u32]) -> VkResult<vk::ShaderModule> {
            if let Some(err) = self.reject {
                return Err(err);
            }
            self.seen.borrow_mut().push(code.to_vec());
            self.next.set(self.next.get() + 1);
            Ok(vk::ShaderModule::from_raw(self.next.get()))
        }
    }

    fn words_to_bytes(words: &[u32]) -> Vec<u8> {
        words.iter().flat_map(|w| w.to_ne_bytes()).collect()
    }

    #[test]
    fn accepted_bytecode_yields_distinct_handles() {
        let device = MockDevice::default();
        let code = words_to_bytes(&[SPIRV_MAGIC, 0x0001_0000, 0, 1, 0]);

        let a = create_shader_module(&device, &code).unwrap();
        let b = create_shader_module(&device, &code).unwrap();
        let c = create_shader_module(&device, &code).unwrap();

        assert_ne!(a, b);
        assert_ne!(b, c);
        assert_ne!(a, c);
        assert_ne!(a, vk::ShaderModule::null());
    }

    #[test]
    fn words_reach_the_device_unchanged() {
        let device = MockDevice::default();
        let words = [SPIRV_MAGIC, 0x0001_0300, 7, 42, 0];

        create_shader_module(&device, &words_to_bytes(&words)).unwrap();
        assert_eq!(device.seen.borrow()[0], words);
    }

    #[test]
    fn swapped_endianness_is_corrected() {
        let device = MockDevice::default();
        let words = [SPIRV_MAGIC, 0x0001_0000, 9];
        let swapped: Vec<u32> = words.iter().map(|w| w.swap_bytes()).collect();

        create_shader_module(&device, &words_to_bytes(&swapped)).unwrap();
        assert_eq!(device.seen.borrow()[0], words);
    }

    #[test]
    fn bytecode_without_magic_reaches_the_device() {
        let device = MockDevice::default();
        let code = [1u8, 2, 3, 4, 5, 6, 7, 8];

        let module = create_shader_module(&device, &code).unwrap();
        assert_eq!(module.as_raw(), 1);
        assert_eq!(
            device.seen.borrow()[0],
            [
                u32::from_ne_bytes([1, 2, 3, 4]),
                u32::from_ne_bytes([5, 6, 7, 8])
            ]
        );
    }

    #[test]
    fn device_verdict_on_bad_content_is_kept() {
        let device = MockDevice {
            reject: Some(vk::Result::ERROR_INITIALIZATION_FAILED),
            ..Default::default()
        };

        match create_shader_module(&device, &[0u8; 16]) {
            Err(Error::ModuleCreation(ModuleCreationError::Device(r))) => {
                assert_eq!(r, vk::Result::ERROR_INITIALIZATION_FAILED)
            }
            other => panic!("expected device error, got {:?}", other),
        }
    }

    #[test]
    fn unaligned_length_is_rejected_before_the_device() {
        let device = MockDevice::default();
        for len in [1usize, 2, 3, 5, 21] {
            let code = vec![0u8; len];
            match create_shader_module(&device, &code) {
                Err(Error::ModuleCreation(ModuleCreationError::BytecodeSize(n))) => {
                    assert_eq!(n, len)
                }
                other => panic!("expected BytecodeSize, got {:?}", other),
            }
        }
        assert!(device.seen.borrow().is_empty());
    }

    #[test]
    fn empty_bytecode_is_rejected() {
        let device = MockDevice::default();
        assert!(matches!(
            create_shader_module(&device, &[]),
            Err(Error::ModuleCreation(ModuleCreationError::BytecodeSize(0)))
        ));
    }

    #[test]
    fn device_rejection_is_module_creation_error() {
        let device = MockDevice {
            reject: Some(vk::Result::ERROR_OUT_OF_DEVICE_MEMORY),
            ..Default::default()
        };
        let code = words_to_bytes(&[SPIRV_MAGIC, 0xdead_beef]);

        match create_shader_module(&device, &code) {
            Err(Error::ModuleCreation(ModuleCreationError::Device(r))) => {
                assert_eq!(r, vk::Result::ERROR_OUT_OF_DEVICE_MEMORY)
            }
            other => panic!("expected device error, got {:?}", other),
        }
    }

    #[test]
    fn load_from_missing_file_is_open_error() {
        let device = MockDevice::default();
        let path = std::env::temp_dir().join("vkprobe-shader-missing.spv");

        assert!(matches!(
            load_shader_module(&device, &path),
            Err(Error::FileOpen { .. })
        ));
    }

    #[test]
    fn load_from_file() {
        let device = MockDevice::default();
        let path = std::env::temp_dir().join(format!(
            "vkprobe-shader-{}.spv",
            std::process::id()
        ));
        let words = [SPIRV_MAGIC, 0x0001_0000, 0, 3, 0];
        std::fs::write(&path, words_to_bytes(&words)).unwrap();

        let module = load_shader_module(&device, &path).unwrap();
        assert_eq!(module.as_raw(), 1);
        assert_eq!(device.seen.borrow()[0], words);

        std::fs::remove_file(&path).unwrap();
    }
}
