#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // Must not panic; non-numeric input yields None.
        if let Some(out) = nfse_tinus::format_amount(s) {
            assert_eq!(out.split_once('.').map(|(_, d)| d.len()), Some(2));
        }
        if let Some(out) = nfse_tinus::format_rate(s) {
            assert_eq!(out.split_once('.').map(|(_, d)| d.len()), Some(4));
        }
        let _ = nfse_tinus::pad_registration(s);
    }
});
