#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut manifest = optiga_manifest::Manifest::default();
    if optiga_manifest::parse_manifest(data, &mut manifest).is_ok() {
        assert_eq!(manifest.raw.len(), data.len());
    } else {
        assert_eq!(manifest, optiga_manifest::Manifest::default());
    }
});
