#![no_main]

use hll_aggregate::Sketch;
use libfuzzer_sys::fuzz_target;
use wyhash::wyhash;

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    let split_index = wyhash(data, 0) as usize % data.len();
    let (first_half, second_half) = data.split_at(split_index);

    let mut sketch1 = Sketch::new(4 + data[0] % 13).unwrap();
    for chunk in first_half.chunks(4) {
        sketch1.add(chunk);
        assert!(sketch1.estimate() > 0);
    }

    let mut sketch2 = Sketch::new(sketch1.precision()).unwrap();
    for chunk in second_half.chunks(4) {
        sketch2.add(chunk);
        assert!(sketch2.estimate() > 0);
    }

    let mut merged = sketch1.clone();
    merged.merge(&sketch2).unwrap();
    let mut reversed = sketch2.clone();
    reversed.merge(&sketch1).unwrap();
    assert_eq!(merged, reversed);

    assert_eq!(Sketch::deserialize(&merged.serialize()).unwrap(), merged);
});
