//! End-to-end runner scenarios: generation, rejection tallies, and the
//! rendered outcomes a caller sees.

use skein::{run_with, Config, Failure, Gen, TestResult};

fn seeded() -> Config {
    Config::default().with_seed(0x1dea)
}

#[test]
fn test_constant_failure_keeps_the_value_and_message() {
    let result = run_with(&seeded(), Gen::constant(42), |&v: &u32| {
        if v == 100 {
            Ok(())
        } else {
            Err(Failure::new("expected the answer to be 100"))
        }
    });
    match result {
        TestResult::Fail { value, message } => {
            assert_eq!(value, 42, "a constant has no choices to shrink");
            assert_eq!(message, "expected the answer to be 100");
        }
        other => panic!("expected a failure, got: {}", other),
    }
}

#[test]
fn test_satisfied_bound_passes_the_full_run() {
    let result = run_with(&seeded(), Gen::bounded(10), |&v: &u32| {
        if v <= 10 {
            Ok(())
        } else {
            Err(Failure::new("bounded overflowed its bound"))
        }
    });
    assert_eq!(result, TestResult::Pass);
}

#[test]
fn test_impossible_bound_shrinks_to_zero() {
    let result = run_with(&seeded(), Gen::bounded(10), |_: &u32| {
        Err(Failure::new("nothing is acceptable"))
    });
    match result {
        TestResult::Fail { value, .. } => assert_eq!(value, 0),
        other => panic!("expected a failure, got: {}", other),
    }
}

#[test]
fn test_range_failure_shrinks_to_the_lower_bound() {
    let result = run_with(&seeded(), Gen::bounded_range(3, 10), |_: &u32| {
        Err(Failure::new("nothing is acceptable"))
    });
    match result {
        TestResult::Fail { value, .. } => assert_eq!(value, 3),
        other => panic!("expected a failure, got: {}", other),
    }
}

#[test]
fn test_mapped_failure_shrinks_through_the_mapping() {
    // Values are multiples of 100; the smallest one above 321 is 400.
    let result = run_with(&seeded(), Gen::bounded(10).map(|n| n * 100), |&v: &u32| {
        if v <= 321 {
            Ok(())
        } else {
            Err(Failure::new("value too large"))
        }
    });
    match result {
        TestResult::Fail { value, message } => {
            assert_eq!(value, 400);
            assert_eq!(message, "value too large");
        }
        other => panic!("expected a failure, got: {}", other),
    }
}

#[test]
fn test_filtered_failure_respects_the_filter() {
    // The filter forbids 3, so the minimal counterexample is 4 even
    // though 3 is in the generator's range.
    let generator = Gen::bounded_range(3, 10).filter(|&v| v > 3);
    let result = run_with(&seeded(), generator, |_: &u32| {
        Err(Failure::new("nothing is acceptable"))
    });
    match result {
        TestResult::Fail { value, .. } => assert_eq!(value, 4),
        other => panic!("expected a failure, got: {}", other),
    }
}

#[test]
fn test_rejecting_generator_exhausts_with_its_reason_on_top() {
    let result = run_with(&seeded(), Gen::<u32>::reject("bad hair day"), |_| Ok(()));
    match &result {
        TestResult::ExhaustedGeneration { rejections } => {
            let (top_reason, top_count) = rejections
                .iter()
                .max_by_key(|(_, &count)| count)
                .expect("at least one rejection was tallied");
            assert_eq!(top_reason.to_string(), "bad hair day");
            assert_eq!(*top_count, 15, "one rejection per attempt");
        }
        other => panic!("expected exhaustion, got: {}", other),
    }
    let rendered = result.to_string();
    assert!(rendered.starts_with("Cannot generate values."));
    assert!(rendered.contains("bad hair day (15x)"));
}

#[test]
fn test_pass_and_fail_render_as_documented() {
    let pass = run_with(&seeded(), Gen::bounded(5), |_: &u32| Ok(()));
    assert_eq!(pass.to_string(), "Passes");

    let fail = run_with(&seeded(), Gen::constant(7), |_: &u32| {
        Err(Failure::new("seven is unlucky"))
    });
    assert_eq!(
        fail.to_string(),
        "Fails:\n - value: 7\n - error: \"seven is unlucky\""
    );
}

#[test]
fn test_failure_stops_the_run_at_the_first_counterexample() {
    // The check counts invocations; after the failing value only shrink
    // replays may call it, never fresh generation, so every recorded
    // value stays within the failing value's neighborhood.
    use std::cell::Cell;
    use std::rc::Rc;

    let calls = Rc::new(Cell::new(0usize));
    let seen = calls.clone();
    let property = skein::Property::new(Gen::constant(1), move |_: &u32| {
        seen.set(seen.get() + 1);
        Err(Failure::new("always fails"))
    });
    let result = property.run(&seeded());
    assert!(result.is_fail());
    assert_eq!(
        calls.get(),
        1,
        "an empty-footprint failure is checked exactly once"
    );
}
