//! Fuzz target for advisory response parsing.
//!
//! Provider replies are untrusted text. Parsing must either yield a
//! response with a confidence in [0, 1] or an error, never a panic.

#![no_main]

use libfuzzer_sys::fuzz_target;
use vaultsmith::advisory::{AdvisoryInsight, AdvisoryResponse};

fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data);

    if let Ok(response) = AdvisoryResponse::parse(&text) {
        assert!((0.0..=1.0).contains(&response.confidence_score));
        let insight = AdvisoryInsight::from_response(response);
        assert!(!insight.is_fallback());
    }
});
