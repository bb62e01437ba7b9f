//! Fuzz target for column classification and schema building.
//!
//! This fuzzer tests that the classifier:
//! 1. Never panics on arbitrary cell values
//! 2. Regex-based pattern detection doesn't crash on pathological input
//! 3. Always produces a model without dangling references

#![no_main]

use libfuzzer_sys::fuzz_target;
use vaultsmith::{ColumnClassifier, DataTable, SchemaBuilder};

fuzz_target!(|data: &[u8]| {
    if data.len() > 10_000 {
        return;
    }

    let text = String::from_utf8_lossy(data);
    let values: Vec<String> = text.split('\n').map(str::to_string).collect();
    let reversed: Vec<String> = values.iter().rev().cloned().collect();

    let table = DataTable::from_columns(vec![("fuzz_id", values), ("fuzz_code", reversed)]);
    let classifier = ColumnClassifier::new();

    if let Ok(batch) = classifier.analyze_table(&table) {
        for profile in &batch.profiles {
            assert!((0.0..=1.0).contains(&profile.unique_ratio));
        }
        let model = SchemaBuilder::new().build(&batch.profiles, "Fuzz");
        assert!(model.validate().is_empty());
    }
});
