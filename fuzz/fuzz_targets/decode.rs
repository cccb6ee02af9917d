#![no_main]

use hll_aggregate::Sketch;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(mut sketch) = Sketch::deserialize(data) {
        assert_eq!(sketch.serialize(), data);
        sketch.add(b"1");
        assert!(sketch.estimate() > 0);
    }
    if let Ok(sketch) = Sketch::from_base64(data) {
        assert_eq!(Sketch::from_base64(sketch.to_base64()).unwrap(), sketch);
    }
});
