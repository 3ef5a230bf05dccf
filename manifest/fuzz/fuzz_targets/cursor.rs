#![no_main]

use libfuzzer_sys::fuzz_target;
use optiga_cbor::decode::{Cursor, Destination};

fuzz_target!(|data: &[u8]| {
    // Walk the buffer as a sequence of map entries, as the manifest headers are read
    let mut cursor = Cursor::new(data);
    let mut value = [0u8; 2];
    while cursor
        .read_mapped_entry(Destination::Bytes(Some(&mut value)))
        .is_ok()
    {}
    assert!(cursor.offset() <= data.len());
});
