#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Must not panic, and a failed parse carries exactly one error.
    let inv = cfdi::parser::parse_cfdi(data);
    if !inv.parse_success {
        assert_eq!(inv.parse_errors.len(), 1);
    }
});
