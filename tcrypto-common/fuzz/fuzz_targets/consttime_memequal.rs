#![no_main]

use libfuzzer_sys::fuzz_target;
use tcrypto_common::{consttime_memequal, ct_eq};

fuzz_target!(|data: &[u8]| {
    let (a, b) = data.split_at(data.len() / 2);
    let len = a.len().min(b.len());

    let expected = a[..len] == b[..len];
    assert_eq!(consttime_memequal(a, b, len) == 1, expected);
    assert_eq!(ct_eq(a, b), a == b);
    assert_eq!(consttime_memequal(a, a, a.len()), 1);
});
