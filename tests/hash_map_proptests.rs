// HashMap / HashSet property tests against a std::collections model.
//
// Property 1: a random sequence of insert, assign, remove, entry and lookup
// operations leaves the map holding exactly the model's entries.
//  - Invariant after every step: len() matches the model, the touched key's
//    presence matches, and len * 100 < capacity * 75.
//
// Property 2: growth and reserve preserve membership.
//
// Property 3: cursor erase by position removes exactly the visited entries
// and visits every entry once.
//
// Property 4: HashSet mirrors a BTreeSet model.
use std::collections::BTreeSet;
use std::collections::HashMap as ModelMap;

use hood_hash::HashMap;
use hood_hash::HashSet;
use hood_hash::hashing::DefaultHashBuilder;
use proptest::prelude::*;

fn key(k: u16) -> String {
    format!("k{k}")
}

fn assert_load_factor<K, V, H: hood_hash::HashWidth, S>(
    map: &HashMap<K, V, H, S>,
) -> Result<(), TestCaseError> {
    prop_assert!(
        map.len() * 100 < map.capacity() * 75,
        "len {} capacity {}",
        map.len(),
        map.capacity()
    );
    Ok(())
}

proptest! {
    #[test]
    fn prop_map_matches_model(
        key_space in 1u16..=64,
        ops in proptest::collection::vec((0u8..=5u8, any::<u16>(), any::<i32>()), 1..400),
    ) {
        let mut map: HashMap<String, i32> = HashMap::with_capacity(1);
        let mut model: ModelMap<String, i32> = ModelMap::new();

        for (op, raw_k, value) in ops {
            let k = key(raw_k % key_space);
            match op {
                // Insert never overwrites.
                0 => {
                    let inserted = map.insert(k.clone(), value);
                    prop_assert_eq!(inserted, !model.contains_key(&k));
                    model.entry(k.clone()).or_insert(value);
                }
                1 => {
                    let previous = map.insert_or_assign(k.clone(), value);
                    prop_assert_eq!(previous, model.insert(k.clone(), value));
                }
                2 => {
                    let removed = map.remove(k.as_str());
                    prop_assert_eq!(removed, model.remove(&k));
                }
                3 => {
                    *map.entry(k.clone()).or_insert(0) += 1;
                    *model.entry(k.clone()).or_insert(0) += 1;
                }
                4 => {
                    let was_absent = !model.contains_key(&k);
                    let (stored, inserted) = map.try_emplace(k.clone(), || value);
                    let stored = *stored;
                    let expected = *model.entry(k.clone()).or_insert(value);
                    prop_assert_eq!(stored, expected);
                    prop_assert_eq!(inserted, was_absent);
                }
                5 => {
                    prop_assert_eq!(map.get(k.as_str()), model.get(&k));
                    prop_assert_eq!(map.at(k.as_str()).ok(), model.get(&k));
                }
                _ => unreachable!(),
            }

            prop_assert_eq!(map.len(), model.len());
            prop_assert_eq!(map.contains_key(k.as_str()), model.contains_key(&k));
            assert_load_factor(&map)?;
        }

        for (k, v) in &model {
            prop_assert_eq!(map.get(k.as_str()), Some(v));
            prop_assert_eq!(map.get(k), Some(v));
        }
        prop_assert_eq!(map.iter().count(), model.len());
    }

    #[test]
    fn prop_growth_preserves_membership(
        keys in proptest::collection::hash_set(any::<u64>(), 0..600),
        reserve_to in 0usize..4096,
        seed in any::<u64>(),
    ) {
        let mut map: HashMap<u64, u64, u64> =
            HashMap::with_capacity_and_hasher(1, DefaultHashBuilder::with_seed(seed));
        for &k in &keys {
            prop_assert!(map.insert(k, k ^ 0xFF));
            assert_load_factor(&map)?;
        }

        let capacity_before = map.capacity();
        map.reserve(reserve_to);
        prop_assert!(map.capacity() >= capacity_before);
        prop_assert!(map.capacity() >= reserve_to);
        prop_assert!(map.capacity().is_power_of_two());

        prop_assert_eq!(map.len(), keys.len());
        for &k in &keys {
            prop_assert_eq!(map.get(&k), Some(&(k ^ 0xFF)));
        }
    }

    #[test]
    fn prop_cursor_erase_visits_each_entry_once(
        keys in proptest::collection::hash_set(0u32..10_000, 0..300),
        modulus in 1u32..5,
    ) {
        let mut map: HashMap<u32, u32> = keys.iter().map(|&k| (k, k)).collect();
        let mut seen = BTreeSet::new();
        let mut removed = BTreeSet::new();

        let mut cursor = map.cursor_mut();
        while let Some(&k) = cursor.key() {
            prop_assert!(seen.insert(k), "visited {} twice", k);
            if k % modulus == 0 {
                let (removed_key, _) = cursor.remove_current().unwrap();
                prop_assert_eq!(removed_key, k);
                removed.insert(k);
            } else {
                cursor.move_next();
            }
        }

        let all: BTreeSet<u32> = keys.iter().copied().collect();
        prop_assert_eq!(&seen, &all);
        prop_assert_eq!(map.len(), keys.len() - removed.len());
        for k in &keys {
            prop_assert_eq!(map.contains_key(k), !removed.contains(k));
        }
    }

    #[test]
    fn prop_set_matches_model(
        ops in proptest::collection::vec((any::<bool>(), 0u8..100), 1..300),
    ) {
        let mut set: HashSet<u8> = HashSet::new();
        let mut model = BTreeSet::new();

        for (insert, value) in ops {
            if insert {
                prop_assert_eq!(set.insert(value), model.insert(value));
            } else {
                prop_assert_eq!(set.remove(&value), model.remove(&value));
            }
            prop_assert_eq!(set.len(), model.len());
        }

        let collected: BTreeSet<u8> = set.iter().copied().collect();
        prop_assert_eq!(collected, model);
    }
}

#[test]
fn fruit_scenario() {
    let mut map: HashMap<String, i32> = HashMap::with_capacity(32);
    map.insert("apple".to_string(), 1);
    map.insert("banana".to_string(), 2);
    map.insert("cherry".to_string(), 3);

    assert_eq!(map.len(), 3);
    assert_eq!(map.capacity(), 32);
    assert_eq!(map.get("apple"), Some(&1));
    assert_eq!(map.get("missing"), None);

    assert_eq!(map.remove("banana"), Some(2));
    assert_eq!(map.len(), 2);
    assert!(!map.contains_key("banana"));
    assert_eq!(map.get("apple"), Some(&1));
    assert_eq!(map.get("cherry"), Some(&3));
}

#[test]
fn heterogeneous_lookup_finds_the_same_entry() {
    let map: HashMap<String, i32> = HashMap::from([("abc".to_string(), 7)]);
    let by_str = map.get_key_value("abc");
    let by_string = map.get_key_value(&String::from("abc"));
    assert_eq!(by_str, by_string);
    assert!(core::ptr::eq(by_str.unwrap().1, by_string.unwrap().1));
}
