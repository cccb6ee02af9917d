#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

use hll_aggregate::Sketch;
use tabled::{
    settings::{Settings, Style},
    Table, Tabled,
};

#[derive(Tabled)]
struct Record {
    precision: u8,
    cardinality: usize,
    total_bytes: u64,
    total_blocks: u64,
    serialize_blocks: u64,
}

fn measure_memory_usage(precision: u8, cardinality: usize) -> Record {
    let _profiler = dhat::Profiler::builder().testing().build();
    let mut sketch = Sketch::new(precision).unwrap();
    for i in 0..cardinality {
        sketch.add(&i.to_le_bytes());
    }
    let _ = sketch.estimate();
    let stats = dhat::HeapStats::get();

    // building, adding and estimating allocate the register array only
    dhat::assert_eq!(stats.total_blocks, 1);
    dhat::assert_eq!(stats.total_bytes, 1u64 << precision);

    let serialized = sketch.serialize();
    let after = dhat::HeapStats::get();
    dhat::assert_eq!(after.total_blocks - stats.total_blocks, 1);
    dhat::assert_eq!(serialized.len() as u64, (1u64 << precision) + 2);

    Record {
        precision,
        cardinality,
        total_bytes: stats.total_bytes,
        total_blocks: stats.total_blocks,
        serialize_blocks: after.total_blocks - stats.total_blocks,
    }
}

#[test]
fn test_allocations() {
    let results: Vec<Record> = [4u8, 12, 16]
        .into_iter()
        .flat_map(|precision| {
            std::iter::once(0)
                .chain((0..).map(|c| 1 << c))
                .take_while(|&c| c <= 1 << 16)
                .step_by(4)
                .map(move |cardinality| (precision, cardinality))
        })
        .map(|(precision, cardinality)| measure_memory_usage(precision, cardinality))
        .collect();

    let table_config = Settings::default().with(Style::markdown());
    let markdown = Table::new(results).with(table_config).to_string();
    println!("{}", markdown);
}
