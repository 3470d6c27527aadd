/// Asserts that an expression matches a pattern.
///
/// The `=>` form additionally evaluates an expression with the bindings of the
/// pattern and returns it, which is handy to pull a value out of an enum variant
/// in tests.
#[macro_export]
macro_rules! assert_matches {
    ($expr:expr, $pat:pat => $out:expr) => {
        match ($expr) {
            $pat => $out,
            val => ::core::panic!(
                "Assertion failed: Value {val:?} did not match pattern {}",
                ::core::stringify!($pat)
            ),
        }
    };
    ($expr:expr, $pat:pat if $pred:expr) => {{
        let val = $expr;
        match (&val) {
            $pat if $pred => (),
            #[allow(unused_variables)]
            $pat => ::core::panic!(
                "Assertion failed: Value {val:?} does not match predicate {}",
                ::core::stringify!($pred)
            ),
            _ => ::core::panic!(
                "Assertion failed: Value {val:?} did not match pattern {}",
                ::core::stringify!($pat)
            ),
        }
    }};
    ($expr:expr, $pat:pat) => {
        $crate::assert_matches!($expr, $pat => ())
    };
}
