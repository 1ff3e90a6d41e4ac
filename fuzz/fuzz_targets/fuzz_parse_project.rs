#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let inv = cfdi::parser::parse_cfdi(s);
        let projection = cfdi::projection::to_projection(&inv);
        assert_eq!(projection.confidence == 1.0, inv.parse_success);
    }
});
