use clap::Parser;
use hood_hash::HashMap;
use hood_hash::PerfectHashMap;
use hood_hash::hashing::DefaultHashBuilder;

#[derive(Parser, Debug)]
struct Args {
    #[arg(short = 'c', long = "target_capacity", default_value_t = 1000)]
    target_capacity: usize,

    /// Seed for the default hasher.
    #[arg(short = 's', long = "seed")]
    seed: Option<u32>,

    /// Also build a perfect hash map over the same keys.
    #[arg(short = 'p', long = "perfect")]
    perfect: bool,
}

fn main() {
    let args = Args::parse();

    println!(
        "Creating HashMap with target capacity: {}",
        args.target_capacity
    );

    let hasher = args
        .seed
        .map(DefaultHashBuilder::with_seed)
        .unwrap_or_default();
    let mut map: HashMap<u64, u64> =
        HashMap::with_capacity_and_hasher(args.target_capacity, hasher.clone());

    println!("Actual capacity: {}", map.capacity());
    println!("Filling map with u64 keys up to the load limit...");

    // Stay below the 75% threshold so the table does not grow mid-fill.
    let num_values = (map.capacity() * 3 / 4).saturating_sub(1);
    for i in 0..num_values {
        let key = i as u64;
        assert!(map.insert(key, key * 2), "key already present: {key}");
    }

    println!("Inserted {} values into map", map.len());
    println!(
        "Final load factor: {:.2}%",
        (map.len() as f64 / map.capacity() as f64) * 100.0
    );

    map.probe_histogram().print();
    map.debug_stats().print();

    if args.perfect {
        let items: Vec<(u64, u64)> = map.drain().collect();
        let built: Result<PerfectHashMap<u64, u64>, _> =
            PerfectHashMap::with_hasher(items, hasher);
        match built {
            Ok(perfect) => {
                println!(
                    "Perfect hash map: {} keys in {} slots ({:.2}% full)",
                    perfect.count(),
                    perfect.size(),
                    perfect.count() as f64 / perfect.size().max(1) as f64 * 100.0
                );
            }
            Err(err) => println!("Perfect hash build failed: {err}"),
        }
    }
}
