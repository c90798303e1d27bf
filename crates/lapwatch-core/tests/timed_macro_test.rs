//! `#[timed]` attribute expansion

use lapwatch_core::time_scope;
use lapwatch_macros::timed;
use std::num::ParseIntError;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("lapwatch_core=debug")
        .with_test_writer()
        .try_init();
}

#[timed]
fn add(a: i32, b: i32) -> i32 {
    a + b
}

#[timed("parse with early return")]
fn parse_positive(input: &str) -> Result<u32, ParseIntError> {
    let value: u32 = input.trim().parse()?;
    if value == 0 {
        return Ok(1);
    }
    Ok(value)
}

#[timed]
fn collect_into(target: &mut Vec<u8>) {
    target.extend_from_slice(b"lap");
}

#[timed]
fn evens(limit: u32) -> impl Iterator<Item = u32> {
    (0..limit).filter(|n| n % 2 == 0)
}

struct Counter {
    hits: u32,
}

impl Counter {
    #[timed]
    fn hit(&mut self) -> u32 {
        self.hits += 1;
        self.hits
    }
}

#[test]
fn test_timed_function_returns_its_value() {
    init_tracing();
    assert_eq!(add(2, 3), 5);
}

#[test]
fn test_timed_function_keeps_question_mark_and_return() {
    init_tracing();
    assert_eq!(parse_positive(" 42 ").unwrap(), 42);
    assert_eq!(parse_positive("0").unwrap(), 1);
    assert!(parse_positive("forty").is_err());
}

#[test]
fn test_timed_unit_and_impl_trait_functions() {
    let mut buffer = Vec::new();
    collect_into(&mut buffer);
    assert_eq!(buffer, b"lap");

    assert_eq!(evens(7).collect::<Vec<_>>(), vec![0, 2, 4, 6]);
}

#[test]
fn test_timed_method() {
    let mut counter = Counter { hits: 0 };
    counter.hit();
    assert_eq!(counter.hit(), 2);
}

#[test]
fn test_time_scope_directly() {
    init_tracing();
    let text = time_scope("format", || format!("{}-{}", "a", "b"));
    assert_eq!(text, "a-b");
}
