#![no_main]
use libfuzzer_sys::fuzz_target;
use xmljson::{fs::json_to_root, fs::xml_string, json, Config, ScalarPolicy};

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(value) = json::from_str(s) {
            let config = Config::default().with_scalars(ScalarPolicy::Text);
            if let Ok(root) = json_to_root(&value, &config) {
                let _ = xml_string(&root);
            }
        }
    }
});
