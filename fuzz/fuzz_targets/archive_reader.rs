#![no_main]

use akaibu_core::{decode_size, encode_size};
use akaibu_storage::ArchiveReader;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Any decoded prefix must re-encode to a prefix no longer than the input
    let mut cursor = data;
    if let Ok((value, octets)) = decode_size(&mut cursor) {
        let prefix = encode_size(value).expect("decoded values are in range");
        assert!(prefix.len() <= octets);
    }

    // Malformed headers, bad prefixes, corrupt zlib/snappy bodies and
    // truncated payloads must all surface as errors, never panics.
    if let Ok(mut reader) = ArchiveReader::open(data) {
        let mut records = 0u64;
        loop {
            match reader.read() {
                Ok(Some(_)) => records += 1,
                Ok(None) | Err(_) => break,
            }
        }
        assert_eq!(reader.records_read(), records);
        let _ = reader.close();
        assert!(reader.read().is_err());
    }
});
