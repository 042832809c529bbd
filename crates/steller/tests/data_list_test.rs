use steller::data::list_pool::{ListPool, ListRef};

fn collect(pool: &ListPool<i32>, list: ListRef) -> Vec<i32> {
    pool.iter(list).copied().collect()
}

#[test]
fn make_list_creates_a_single_element_list() {
    let mut pool: ListPool<i32> = ListPool::with_capacity(4);
    let list = pool.make_list(7);
    assert!(!list.is_empty());
    assert_eq!(collect(&pool, list), vec![7]);
}

#[test]
fn append_concatenates_in_constant_time_and_keeps_order() {
    let mut pool: ListPool<i32> = ListPool::with_capacity(8);
    let a = pool.make_list(1);
    let b = pool.make_list(2);
    let c = pool.make_list(3);
    let ab = pool.append(a, b);
    let abc = pool.append(ab, c);
    assert_eq!(collect(&pool, abc), vec![1, 2, 3]);
}

#[test]
fn append_with_an_empty_side_returns_the_other_side() {
    let mut pool: ListPool<i32> = ListPool::with_capacity(4);
    let a = pool.make_list(1);
    let empty = ListRef::default();
    assert_eq!(pool.append(a, empty), a);
    assert_eq!(pool.append(empty, a), a);
    assert!(pool.append(empty, empty).is_empty());
}

#[test]
fn head_gives_mutable_access_to_the_front_value() {
    let mut pool: ListPool<i32> = ListPool::with_capacity(4);
    let a = pool.make_list(1);
    let b = pool.make_list(2);
    let list = pool.append(a, b);
    let head = pool.head(list);
    *pool.value_mut(head) += 10;
    assert_eq!(collect(&pool, list), vec![11, 2]);
}

#[test]
fn split_tail_shares_the_suffix_starting_at_the_cursor() {
    let mut pool: ListPool<i32> = ListPool::with_capacity(8);
    let mut list = ListRef::default();
    for value in 1..=4 {
        let cell = pool.make_list(value);
        list = pool.append(list, cell);
    }

    // Advance to the third cell.
    let mut cursor = pool.head(list);
    cursor = pool.next(cursor);
    cursor = pool.next(cursor);
    let tail = pool.split_tail(list, cursor);
    assert_eq!(collect(&pool, tail), vec![3, 4]);

    // Splicing the tail onto another list mirrors how profiles merge.
    let other = pool.make_list(9);
    let merged = pool.append(other, tail);
    assert_eq!(collect(&pool, merged), vec![9, 3, 4]);
}

#[test]
fn cursors_walk_to_the_end_and_stop() {
    let mut pool: ListPool<i32> = ListPool::with_capacity(4);
    let a = pool.make_list(1);
    let b = pool.make_list(2);
    let list = pool.append(a, b);

    let mut cursor = pool.head(list);
    let mut seen = Vec::new();
    while cursor.is_some() {
        seen.push(*pool.value(cursor));
        cursor = pool.next(cursor);
    }
    assert_eq!(seen, vec![1, 2]);
    assert!(!cursor.is_some());
}
