#![no_main]

use byml_format::Header;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(header) = Header::decode(data) {
        assert!(header.version == 2 || header.version == 3);
        if header.big_endian {
            assert_eq!(&data[0..2], b"BY");
        } else {
            assert_eq!(&data[0..2], b"YB");
        }
    }
});
