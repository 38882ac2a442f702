#![no_main]

use libfuzzer_sys::fuzz_target;
use resdep::catalog::{target_from_str, CatalogFormat};

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        // Malformed catalogs must be rejected with an error, never a panic,
        // and any catalog that loads must classify every call.
        if let Ok(target) = target_from_str(input, CatalogFormat::Toml) {
            let wanted = target.all_calls();
            let result = target.transitively_enabled_calls(&wanted);
            assert_eq!(result.supported.len() + result.disabled.len(), wanted.len());
        }
    }
});
