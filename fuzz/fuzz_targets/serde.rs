#![no_main]

use hll_aggregate::Sketch;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(mut sketch) = serde_json::from_slice::<Sketch>(data) {
        sketch.add(b"1");
        assert!(sketch.estimate() > 0);
    }
});
