use std::collections::BTreeMap;

const NUM_OF_OPERATIONS: usize = 10_000;

macro_rules! bst_map_tests {
    ($($module_name:ident: $type_name:ident$(,)*)*) => {
        $(
            mod $module_name {
                use balanced_collections::$module_name::$type_name;
                use balanced_collections::Error;
                use rand::Rng;
                use std::collections::BTreeMap;
                use super::NUM_OF_OPERATIONS;

                fn populate(
                    rng: &mut rand::XorShiftRng,
                    map: &mut $type_name<u32, u32>,
                    expected: &mut BTreeMap<u32, u32>,
                ) {
                    for _ in 0..NUM_OF_OPERATIONS {
                        let key = rng.gen_range(0, 2 * NUM_OF_OPERATIONS as u32);
                        let val = rng.gen::<u32>();

                        if !expected.contains_key(&key) {
                            assert_eq!(map.insert(key, val), None);
                            expected.insert(key, val);
                        }
                    }
                }

                #[test]
                fn int_test_map() {
                    let mut rng: rand::XorShiftRng = rand::SeedableRng::from_seed([1, 1, 1, 1]);
                    let mut map = $type_name::new();
                    let mut expected = BTreeMap::new();
                    populate(&mut rng, &mut map, &mut expected);

                    assert_eq!(map.len(), expected.len());
                    assert_eq!(map.min(), expected.iter().next().ok_or(Error::EmptyMap));
                    assert_eq!(map.max(), expected.iter().next_back().ok_or(Error::EmptyMap));
                    assert_eq!(
                        map.iter().collect::<Vec<(&u32, &u32)>>(),
                        expected.iter().collect::<Vec<(&u32, &u32)>>(),
                    );

                    for _ in 0..NUM_OF_OPERATIONS {
                        let key = rng.gen_range(0, 2 * NUM_OF_OPERATIONS as u32);

                        assert_eq!(map.find(&key).ok(), expected.get(&key));
                        assert_eq!(
                            map.remove(&key),
                            Ok(expected.remove(&key).map(|val| (key, val))),
                        );
                        assert_eq!(map.find(&key), Err(Error::NotFound));
                    }

                    assert_eq!(map.len(), expected.len());
                    assert_eq!(
                        map.into_iter().collect::<Vec<(u32, u32)>>(),
                        expected.into_iter().collect::<Vec<(u32, u32)>>(),
                    );
                }

                #[test]
                fn int_test_map_remove_all() {
                    let mut rng: rand::XorShiftRng = rand::SeedableRng::from_seed([1, 1, 1, 1]);
                    let mut map = $type_name::new();
                    let mut expected = BTreeMap::new();
                    populate(&mut rng, &mut map, &mut expected);

                    let mut keys = expected.keys().cloned().collect::<Vec<u32>>();
                    rng.shuffle(&mut keys);
                    for key in &keys {
                        assert!(map.remove(key).unwrap().is_some());
                    }

                    assert!(map.is_empty());
                    assert_eq!(map.remove(&0), Err(Error::EmptyMap));
                    assert_eq!(map.min(), Err(Error::EmptyMap));
                }

                #[test]
                fn int_test_map_slots_recycled() {
                    let mut rng: rand::XorShiftRng = rand::SeedableRng::from_seed([1, 1, 1, 1]);
                    let mut map = $type_name::with_chunk_size(16);
                    let mut expected = BTreeMap::new();
                    populate(&mut rng, &mut map, &mut expected);
                    let peak = map.slots();

                    for _ in 0..10 {
                        let mut removed = Vec::new();
                        for _ in 0..NUM_OF_OPERATIONS / 10 {
                            let key = rng.gen_range(0, 2 * NUM_OF_OPERATIONS as u32);
                            if expected.remove(&key).is_some() {
                                map.remove(&key).unwrap();
                                removed.push(key);
                            }
                        }
                        for key in removed {
                            let val = rng.gen::<u32>();
                            map.insert(key, val);
                            expected.insert(key, val);
                        }
                        assert!(map.slots() <= peak);
                        assert_eq!(map.len(), expected.len());
                    }
                }
            }
        )*
    }
}

bst_map_tests!(avl_tree: AvlMap, red_black_tree: RedBlackMap);

#[test]
fn int_test_balanced_map() {
    use balanced_collections::{Balance, BalancedMap, OrderedMap};
    use rand::Rng;

    for balance in &[Balance::Avl, Balance::RedBlack] {
        let mut rng: rand::XorShiftRng = rand::SeedableRng::from_seed([1, 1, 1, 1]);
        let mut map = BalancedMap::new(*balance);
        let mut expected = BTreeMap::new();

        for _ in 0..NUM_OF_OPERATIONS {
            let key = rng.gen_range(0, 1000);
            if rng.gen::<bool>() {
                let val = rng.gen::<u32>();
                if !expected.contains_key(&key) {
                    map.insert(key, val);
                    expected.insert(key, val);
                }
            } else if !map.is_empty() {
                assert_eq!(
                    map.remove(&key),
                    Ok(expected.remove(&key).map(|val| (key, val))),
                );
            }
        }

        assert_eq!(map.balance(), *balance);
        assert_eq!(map.len(), expected.len());
        assert_eq!(
            map.iter().collect::<Vec<(&u32, &u32)>>(),
            expected.iter().collect::<Vec<(&u32, &u32)>>(),
        );
    }
}
