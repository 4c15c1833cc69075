//! Fuzz target for model.json parsing.
//!
//! Arbitrary bytes must parse into a model or an error, and a parsed
//! model must validate without panicking.

#![no_main]

use libfuzzer_sys::fuzz_target;
use ud_config::validate::model_issues;
use ud_config::Model;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(model) = Model::from_str(text) {
        let _ = model_issues(&model);
    }
});
