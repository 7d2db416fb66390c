use super::*;

#[test]
fn test_shallow_recursion() {
    fn depth(n: u64) -> u64 {
        ensure_sufficient_stack(|| if n == 0 { 0 } else { depth(n - 1) + 1 })
    }

    assert_eq!(depth(10), 10);
}

#[test]
fn test_deep_recursion() {
    // A chain this long overflows a default thread stack without growth
    fn nested(n: u64) -> u64 {
        ensure_sufficient_stack(|| if n == 0 { 0 } else { nested(n - 1) + 1 })
    }

    assert_eq!(nested(100_000), 100_000);
}

#[test]
fn test_passes_result_through() {
    let result: Result<u32, &str> = ensure_sufficient_stack(|| Err("unknown variable"));
    assert_eq!(result, Err("unknown variable"));
}
