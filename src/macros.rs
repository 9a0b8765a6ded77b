/// Build a `Default` value of some type and override the named fields
#[macro_export]
macro_rules! new_t {
    ($t:ty, $($k:ident = $v:expr),+ $(,)?) => {{
        let mut c = <$t>::default();
        $(c.$k = $v;)+
        c
    }};
}

/// Expand one test body into a test per listed type, with that type bound to `T`
#[macro_export]
macro_rules! test_t {
    ($name:ident[T: $($impl:ty)|*]() $body:tt ) => {$(
        ::paste::paste! {
            #[test]
            fn [<test_ $name _ $impl:snake>]() {
                type T = $impl;
                $body
            }
        }
    )+};
}

#[macro_export]
macro_rules! assert_f64_approx {
    ($l:expr, $r:expr) => {
        $crate::assert_f64_approx!($l, $r, f64::EPSILON)
    };
    ($l:expr, $r:expr, $tolerance:expr) => {{
        let (l, r): (f64, f64) = ($l, $r);
        assert!(
            (l - r).abs() < $tolerance,
            "assertion failed: {} !~ {} (tolerance {})",
            l,
            r,
            $tolerance
        )
    }};
}
