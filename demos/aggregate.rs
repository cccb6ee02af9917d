use hll_aggregate::{Aggregate, AggregateFunction, AggregateKind, AggregateOutput, ArgType, Sketch};
use tracing_subscriber::EnvFilter;

/// Simulates a host running `HLL_CREATE` per region, then `HLL_MERGE_COMPUTE` over the results.
///
/// Set `HLL_LOG=debug` to see the aggregate lifecycle.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_env("HLL_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let regions = [("eu", 0..6_000), ("us", 4_000..15_000), ("ap", 14_000..16_000)];

    let mut create = AggregateFunction::init(AggregateKind::Create, &[ArgType::String])?;
    let mut partials = Vec::new();
    for (region, users) in regions {
        create.clear();
        for user in users {
            create.accumulate(&[Some(format!("user-{user}").as_bytes())])?;
        }
        if let AggregateOutput::Sketch(text) = create.finalize() {
            let estimate = Sketch::from_base64(&text)?.estimate();
            println!("{region}: estimate = {estimate}, sketch = {} chars", text.len());
            partials.push(text);
        }
    }

    let mut merge = AggregateFunction::init(AggregateKind::MergeCompute, &[ArgType::String])?;
    for text in &partials {
        merge.accumulate(&[Some(text.as_bytes())])?;
    }
    println!("all regions: {:?} (exact 16000)", merge.finalize());

    Ok(())
}
