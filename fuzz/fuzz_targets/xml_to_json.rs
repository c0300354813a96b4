#![no_main]
use libfuzzer_sys::fuzz_target;
use xmljson::{json, xml, xml_to_json};

fuzz_target!(|data: &[u8]| {
    if let Ok(doc) = xml::from_bytes(data) {
        if let Ok(value) = xml_to_json(&doc) {
            let _ = json::to_string(&value);
        }
    }
});
