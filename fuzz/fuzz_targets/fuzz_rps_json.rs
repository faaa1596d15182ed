#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // Load → validate → render must not panic; errors are fine.
        if let Ok(record) = nfse_tinus::Rps::from_json(s) {
            let _ = nfse_tinus::validate_rps(&record, None);
            let _ = nfse_tinus::rps::to_rps_xml(&record, None);
        }
    }
});
